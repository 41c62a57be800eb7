//! # prospr Core Library
//!
//! The Protein Structure Prediction Toolbox: an engine for folding residue
//! sequences on cubic lattices under HP-family contact models, and a set of
//! exact and heuristic searches for minimum-energy conformations.
//!
//! ## Architectural Philosophy
//!
//! The library is designed with a strict three-layer architecture to keep
//! the state machine, the algorithms, and the user-facing surface apart.
//!
//! - **[`core`]: The Foundation.** The energy model table, the residue
//!   records, the move alphabet, and the [`core::models::lattice::Lattice`]
//!   conformation state with incremental, exactly reversible scoring.
//!
//! - **[`engine`]: The Logic Core.** The bounding functions and the search
//!   algorithms that exploit the lattice's reversibility: exhaustive
//!   depth-first enumeration, depth-first and best-first branch-and-bound,
//!   and beam search, plus checkpointing and cancellation for long runs.
//!
//! - **[`workflows`]: The Public API.** High-level entry points that run a
//!   configured search and return a structured report.
//!
//! ## Example
//!
//! ```
//! use prospr_core::core::models::lattice::Lattice;
//! use prospr_core::core::models::model::ModelTable;
//! use prospr_core::engine::bounds::Prune;
//! use prospr_core::engine::search::depth_first_bnb;
//!
//! let mut lattice = Lattice::new("PHPHPHPPH", 2, ModelTable::hp())?;
//! depth_first_bnb(&mut lattice, Prune::Reach)?;
//! assert_eq!(lattice.score(), -3);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod core;
pub mod engine;
pub mod workflows;
