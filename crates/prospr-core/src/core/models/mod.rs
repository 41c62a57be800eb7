//! Core data models for lattice protein folding.
//!
//! This module contains the fundamental data structures used to represent
//! a folding problem in prospr: the energy model table, the residue records,
//! the move alphabet, and the lattice conformation state itself. These
//! models provide the foundation the search algorithms operate on.

pub mod lattice;
pub mod model;
pub mod moves;
pub mod residue;
