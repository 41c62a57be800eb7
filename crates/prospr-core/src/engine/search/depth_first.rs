use tracing::{debug, info};

use super::SearchOutcome;
use crate::core::models::lattice::Lattice;
use crate::core::models::moves::{self, Move};
use crate::engine::error::EngineError;

/// Exhaustively enumerate all symmetry-reduced conformations, leaving the
/// lattice set to a minimum-energy one.
///
/// The traversal is iterative: a stack holds, per placed residue, the next
/// move to try once the search returns to that depth, with `-dim - 1`
/// marking an exhausted level.
pub fn depth_first(lattice: &mut Lattice) -> Result<SearchOutcome, EngineError> {
    let max_length = lattice.max_length();
    let dim = lattice.dim() as Move;

    // Pin the second residue to break the axis-direction symmetry.
    if max_length > 1 {
        lattice.place_amino(-1, true)?;
    }
    if max_length <= 2 {
        return Ok(SearchOutcome::Completed);
    }

    let mut dfs_stack: Vec<Move> = Vec::new();
    // The third residue starts on the negative moves only, which removes
    // the remaining reflection symmetry.
    let mut mv: Move = -1;
    let mut best_score = 1;
    let mut best_hash: Vec<Move> = Vec::new();

    loop {
        let mut placed_amino = false;

        while !placed_amino && mv != -dim - 1 {
            if lattice.is_valid(mv) {
                lattice.place_amino(mv, true)?;
                placed_amino = true;
                dfs_stack.push(moves::descend(mv));
            } else {
                mv = moves::descend(mv);
            }
        }

        if placed_amino && lattice.cur_len() == max_length && lattice.score() < best_score {
            best_score = lattice.score();
            best_hash = lattice.hash_fold();
            debug!(score = best_score, "improved incumbent conformation");
        }

        if placed_amino && lattice.cur_len() != max_length {
            mv = dim;
        } else {
            mv = -dim - 1;
            while mv == -dim - 1 {
                match dfs_stack.pop() {
                    Some(next) => {
                        lattice.remove_amino()?;
                        mv = next;
                    }
                    None => break,
                }
            }
        }

        if mv == -dim - 1 && dfs_stack.is_empty() {
            break;
        }
    }

    lattice.set_hash(&best_hash, false)?;
    info!(
        score = lattice.score(),
        solutions_checked = lattice.solutions_checked(),
        "depth-first enumeration finished"
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
        depth_first(&mut lattice).unwrap();
        assert_eq!(lattice.score(), -3);
        assert_eq!(lattice.cur_len(), 9);
    }

    #[test]
    fn single_residue_chain_is_left_at_the_origin() {
        let mut lattice = hp_lattice("H", 2);
        depth_first(&mut lattice).unwrap();
        assert_eq!(lattice.cur_len(), 1);
        assert_eq!(lattice.score(), 0);
    }

    #[test]
    fn two_residue_chain_keeps_only_the_symmetry_prefix() {
        let mut lattice = hp_lattice("HH", 2);
        depth_first(&mut lattice).unwrap();
        assert_eq!(lattice.cur_len(), 2);
        assert_eq!(lattice.hash_fold(), vec![-1]);
    }

    #[test]
    fn the_fold_hash_reproduces_the_reported_score() {
        let mut lattice = hp_lattice("PHPHPHPPH", 2);
        depth_first(&mut lattice).unwrap();
        let hash = lattice.hash_fold();
        let score = lattice.score();

        let mut replay = hp_lattice("PHPHPHPPH", 2);
        replay.set_hash(&hash, false).unwrap();
        assert_eq!(replay.score(), score);
    }

    #[test]
    fn symmetry_reduction_starts_every_fold_with_minus_one() {
        let mut lattice = hp_lattice("PHPHPH", 2);
        depth_first(&mut lattice).unwrap();
        assert_eq!(lattice.hash_fold()[0], -1);
        // The third placement never used a positive move either.
        assert!(lattice.hash_fold()[1] < 0);
    }
}
