//! Tree searches over lattice conformations.
//!
//! Every search takes a mutable [`Lattice`](crate::core::models::lattice::Lattice),
//! grows and shrinks it in place through its place/remove operations, and
//! leaves it holding the best conformation found. All of them break the
//! lattice symmetries the same way: the second residue is pinned to move
//! `-1`, and the depth-first family additionally restricts the third
//! residue to negative moves.

pub mod beam;
pub mod best_first;
pub mod depth_first;
pub mod depth_first_bnb;

pub use beam::beam_search;
pub use best_first::best_first_bnb;
pub use depth_first::depth_first;
pub use depth_first_bnb::{depth_first_bnb, depth_first_bnb_with};

#[cfg(feature = "parallel")]
pub use depth_first_bnb::depth_first_bnb_parallel;

/// How a search run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The search space was exhausted; the lattice holds the best
    /// conformation found.
    Completed,
    /// A cancellation token stopped the run; the lattice holds the partial
    /// conformation the search was exploring.
    Interrupted,
}
