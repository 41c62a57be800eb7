//! # Workflows Module
//!
//! High-level entry points tying the core models and the engine together.
//!
//! ## Overview
//!
//! A workflow owns the full procedure a library user typically wants as a
//! single call: pick an algorithm, run it on a lattice, report progress,
//! and hand back a structured result.
//!
//! ## Architecture
//!
//! - **Folding Workflow** ([`fold`]) - Runs one of the search algorithms on
//!   a lattice and returns a [`fold::FoldReport`] with the final score,
//!   fold hash, bonds, and placement statistics.

pub mod fold;
