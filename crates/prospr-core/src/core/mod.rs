//! # Core Module
//!
//! This module provides the fundamental building blocks for lattice protein
//! folding in prospr, serving as the computational core of the library.
//!
//! ## Overview
//!
//! The core module implements the essential data structures required to
//! state and evaluate a folding problem in an HP-family model: sequences of
//! residues placed as a self-avoiding walk on a cubic lattice, and an
//! energy table assigning integer weights to residue contacts.
//!
//! ## Architecture
//!
//! - **Data Models** ([`models`]) - The energy model table, residue records,
//!   the move alphabet, and the [`models::lattice::Lattice`] conformation
//!   state machine with incremental, exactly reversible scoring.
//!
//! ## Scientific Foundation
//!
//! Lattice models of the HP family reduce protein folding to placing a
//! hydrophobic/polar-labelled chain on integer grid points so that
//! non-adjacent chain neighbours in contact contribute fixed energies.
//! Finding a minimum-energy conformation is NP-hard even in this reduced
//! setting, which is why the engine layer provides both exact
//! branch-and-bound searches and heuristic beam search.

pub mod models;
