use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use tracing::{debug, info};

use super::SearchOutcome;
use crate::core::models::lattice::Lattice;
use crate::core::models::moves::{self, Move};
use crate::engine::bounds::BoundContext;
use crate::engine::error::EngineError;

/// A partial fold waiting in the priority queue, ordered by score first and
/// chain length second, with the insertion sequence as the deterministic
/// tie-breaker.
#[derive(Debug, Clone)]
struct Conformation {
    score: i32,
    length: usize,
    seq: u64,
    hash: Vec<Move>,
}

impl PartialEq for Conformation {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Conformation {}

impl PartialOrd for Conformation {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Conformation {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.score, self.length, self.seq).cmp(&(other.score, other.length, other.seq))
    }
}

/// Best-first branch-and-bound: partial folds are expanded lowest score
/// first (shortest first among equals), children are bounded with the
/// naive branch score before they enter the queue. Exact, like the
/// depth-first searches, but with a frontier of conformation hashes
/// instead of a single working chain.
///
/// As long as a fold has not left the all-negative quadrant, only negative
/// moves are expanded; that breaks the remaining axis symmetries the same
/// way the depth-first move restriction does.
pub fn best_first_bnb(lattice: &mut Lattice) -> Result<SearchOutcome, EngineError> {
    let max_length = lattice.max_length();

    // Chains this short cannot form a contact; any straight fold is optimal.
    if max_length <= 3 {
        for _ in 1..max_length {
            lattice.place_amino(-1, true)?;
        }
        return Ok(SearchOutcome::Completed);
    }

    let bounds = BoundContext::new(lattice);
    let all_moves = moves::alphabet(lattice.dim());
    let negative_moves: Vec<Move> = all_moves.iter().copied().filter(|&m| m < 0).collect();

    lattice.place_amino(-1, true)?;

    let mut queue: BinaryHeap<Reverse<Conformation>> = BinaryHeap::new();
    let mut seq: u64 = 0;
    queue.push(Reverse(Conformation {
        score: 0,
        length: 2,
        seq,
        hash: vec![-1],
    }));

    let mut best_score = 1;
    let mut best_hash: Option<Vec<Move>> = None;

    while let Some(Reverse(parent)) = queue.pop() {
        lattice.set_hash(&parent.hash, false)?;

        let candidate_moves = if parent.hash.iter().all(|&m| m < 0) {
            &negative_moves
        } else {
            &all_moves
        };

        for &m in candidate_moves {
            if !lattice.is_valid(m) {
                continue;
            }
            lattice.place_amino(m, true)?;
            let child_score = lattice.score();
            let complete = lattice.cur_len() == max_length;
            let bound = child_score + bounds.naive_branch_score(lattice);
            let child_hash = lattice.hash_fold();
            lattice.remove_amino()?;

            if complete {
                if child_score < best_score {
                    best_score = child_score;
                    best_hash = Some(child_hash);
                    debug!(score = best_score, "improved incumbent conformation");
                }
            } else if bound < best_score {
                seq += 1;
                queue.push(Reverse(Conformation {
                    score: child_score,
                    length: child_hash.len() + 1,
                    seq,
                    hash: child_hash,
                }));
            }
        }
    }

    match best_hash {
        Some(hash) => lattice.set_hash(&hash, false)?,
        None => lattice.reset_conformation(),
    }
    info!(
        score = lattice.score(),
        solutions_checked = lattice.solutions_checked(),
        "best-first branch-and-bound finished"
    );
    Ok(SearchOutcome::Completed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::model::ModelTable;

    fn hp_lattice(sequence: &str, dim: usize) -> Lattice {
        Lattice::new(sequence, dim, ModelTable::hp()).unwrap()
    }

    #[test]
    fn finds_the_2d_optimum() {
        let mut lattice = hp_lattice("PHPHPHPPH", 2);
        best_first_bnb(&mut lattice).unwrap();
        assert_eq!(lattice.score(), -3);
        assert_eq!(lattice.cur_len(), 9);
    }

    #[test]
    fn agrees_with_depth_first_on_a_small_chain() {
        let mut best_first = hp_lattice("HPHPPH", 2);
        best_first_bnb(&mut best_first).unwrap();

        let mut exhaustive = hp_lattice("HPHPPH", 2);
        crate::engine::search::depth_first(&mut exhaustive).unwrap();

        assert_eq!(best_first.score(), exhaustive.score());
    }

    #[test]
    fn short_chains_fold_straight() {
        let mut lattice = hp_lattice("HHH", 2);
        best_first_bnb(&mut lattice).unwrap();
        assert_eq!(lattice.cur_len(), 3);
        assert_eq!(lattice.hash_fold(), vec![-1, -1]);
        assert_eq!(lattice.score(), 0);
    }
}
