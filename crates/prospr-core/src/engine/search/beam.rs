use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use tracing::{info, warn};

use super::SearchOutcome;
use crate::core::models::lattice::Lattice;
use crate::core::models::moves::{self, Move};
use crate::engine::bounds::BoundContext;
use crate::engine::error::EngineError;

/// A partial conformation in the beam, keyed by its heuristic priority.
/// The insertion sequence number breaks priority ties so that expansion
/// order, and with it the whole search, is deterministic.
#[derive(Debug, Clone)]
struct Candidate {
    priority: i32,
    seq: u64,
    lattice: Lattice,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.seq == other.seq
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.priority, self.seq).cmp(&(other.priority, other.seq))
    }
}

/// Level-synchronous beam search keeping the `beam_width` most promising
/// partial conformations per chain length, ranked by current score plus
/// the reach bound on the unplaced suffix.
///
/// A `beam_width` of `-1` keeps every candidate, which makes the search an
/// exhaustive breadth-first enumeration and the result exact; any positive
/// width is a heuristic. Other widths leave the lattice at the symmetry
/// prefix. Children are cloned lattices, so only the final installation of
/// the winner advances the caller's placement counters.
pub fn beam_search(lattice: &mut Lattice, beam_width: i32) -> Result<SearchOutcome, EngineError> {
    lattice.reset_conformation();
    let max_length = lattice.max_length();

    if max_length > 1 {
        lattice.place_amino(-1, true)?;
    }
    if max_length <= 2 {
        return Ok(SearchOutcome::Completed);
    }
    if beam_width < 1 && beam_width != -1 {
        warn!(beam_width, "beam width must be positive or -1; not searching");
        return Ok(SearchOutcome::Completed);
    }

    let bounds = BoundContext::new(lattice);
    let all_moves = moves::alphabet(lattice.dim());
    let mut seq: u64 = 0;

    let mut beam = vec![Candidate {
        priority: lattice.score() + bounds.reach_branch_score(lattice),
        seq,
        lattice: lattice.clone(),
    }];

    while beam[0].lattice.cur_len() != max_length {
        let mut frontier: BinaryHeap<Reverse<Candidate>> = BinaryHeap::new();

        for parent in &beam {
            for &m in &all_moves {
                if !parent.lattice.is_valid(m) {
                    continue;
                }
                let mut child = parent.lattice.clone();
                child.place_amino(m, true)?;
                seq += 1;
                frontier.push(Reverse(Candidate {
                    priority: child.score() + bounds.reach_branch_score(&child),
                    seq,
                    lattice: child,
                }));
            }
        }

        if frontier.is_empty() {
            warn!(
                cur_len = beam[0].lattice.cur_len(),
                "every beam member is trapped; keeping the best partial fold"
            );
            break;
        }

        let keep = if beam_width == -1 {
            frontier.len()
        } else {
            frontier.len().min(beam_width as usize)
        };
        beam.clear();
        for _ in 0..keep {
            if let Some(Reverse(candidate)) = frontier.pop() {
                beam.push(candidate);
            }
        }
    }

    let best_hash = beam[0].lattice.hash_fold();
    lattice.set_hash(&best_hash, true)?;
    info!(
        score = lattice.score(),
        beam_width,
        "beam search finished"
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
    fn unbounded_beam_is_exact_in_2d() {
        let mut lattice = hp_lattice("PHPHPHPPH", 2);
        beam_search(&mut lattice, -1).unwrap();
        assert_eq!(lattice.score(), -3);
    }

    #[test]
    fn final_counters_reflect_only_the_winning_fold() {
        let mut lattice = hp_lattice("PHPHPHPPH", 2);
        beam_search(&mut lattice, -1).unwrap();
        // The symmetry prefix plus the eight winning placements.
        assert_eq!(lattice.aminos_placed(), 9);
        assert_eq!(lattice.solutions_checked(), 1);
    }

    #[test]
    fn narrow_beams_still_produce_a_complete_fold() {
        let mut lattice = hp_lattice("PHPHPHPPH", 2);
        beam_search(&mut lattice, 2).unwrap();
        assert_eq!(lattice.cur_len(), 9);
        assert!(lattice.score() <= 0);
    }

    #[test]
    fn invalid_widths_leave_the_symmetry_prefix() {
        for width in [0, -2] {
            let mut lattice = hp_lattice("PHPHPHPPH", 2);
            beam_search(&mut lattice, width).unwrap();
            assert_eq!(lattice.cur_len(), 2);
            assert_eq!(lattice.hash_fold(), vec![-1]);
        }
    }

    #[test]
    fn short_chains_keep_only_the_prefix() {
        let mut lattice = hp_lattice("HH", 2);
        beam_search(&mut lattice, -1).unwrap();
        assert_eq!(lattice.cur_len(), 2);

        let mut lattice = hp_lattice("H", 3);
        beam_search(&mut lattice, -1).unwrap();
        assert_eq!(lattice.cur_len(), 1);
    }

    #[test]
    fn rerunning_on_a_folded_lattice_resets_first() {
        let mut lattice = hp_lattice("PHPHPHPPH", 2);
        beam_search(&mut lattice, -1).unwrap();
        let first_score = lattice.score();
        beam_search(&mut lattice, -1).unwrap();
        assert_eq!(lattice.score(), first_score);
    }
}
