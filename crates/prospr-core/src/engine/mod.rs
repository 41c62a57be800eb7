//! # Engine Module
//!
//! This module implements the search machinery of prospr: the algorithms
//! that drive a [`Lattice`](crate::core::models::lattice::Lattice) through
//! conformation space looking for a minimum-energy fold.
//!
//! ## Overview
//!
//! All searches share the same contract. They mutate one lattice in place
//! through its place/remove operations, rely on its incrementally exact
//! score, and return only after the lattice again holds a consistent
//! conformation, normally the best one found.
//!
//! ## Architecture
//!
//! - **Bounding Functions** ([`bounds`]) - Optimistic branch scores used to
//!   cut subtrees and to rank beam candidates
//! - **Searches** ([`search`]) - Depth-first enumeration, depth-first and
//!   best-first branch-and-bound, and heuristic beam search
//! - **Checkpointing** ([`checkpoint`]) - Resumable snapshots of
//!   long-running branch-and-bound runs
//! - **Cancellation** ([`cancel`]) - A token hosts can wire to their own
//!   signal handling
//! - **Progress Monitoring** ([`progress`]) - Progress reporting hooks for
//!   user feedback
//! - **Error Handling** ([`error`]) - Engine-specific error types

pub mod bounds;
pub mod cancel;
pub mod checkpoint;
pub mod error;
pub mod progress;
pub mod search;
