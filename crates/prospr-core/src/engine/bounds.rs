use crate::core::models::lattice::{Lattice, LatticeError};
use crate::core::models::moves::Move;

/// Bounding function used to cut branches in the branch-and-bound searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Prune {
    /// Credit every future weighted residue with its full free-neighbour
    /// capacity.
    #[default]
    Naive,
    /// Additionally cap each future weighted residue by the number of
    /// partners an actual self-avoiding walk can bring into contact.
    Reach,
}

/// Per-search precomputed tables for the bounding functions.
///
/// Both bounds are optimistic: they never under-estimate how much the score
/// can still drop, so a branch is only cut when no completion of it can
/// beat the incumbent.
#[derive(Debug, Clone)]
pub struct BoundContext {
    max_length: usize,
    /// Free neighbour slots of a future residue besides its two chain
    /// neighbours: `2^(dim - 1)`.
    free_neighbors: i32,
    /// Sequence indices with a nonzero maximum weight, ascending.
    weighted_idxs: Vec<usize>,
    /// For each weighted index, the chain distances to earlier weighted
    /// residues a self-avoiding walk can fold into contact: at least 3 and
    /// odd, the parity following from the bipartite cubic lattice.
    bond_dists: Vec<Vec<usize>>,
}

impl BoundContext {
    pub fn new(lattice: &Lattice) -> Self {
        let max_weights = lattice.max_weights();
        let mut weighted_idxs: Vec<usize> = Vec::new();
        let mut bond_dists = Vec::new();

        for (idx, &weight) in max_weights.iter().enumerate() {
            if weight == 0 {
                continue;
            }
            let dists = weighted_idxs
                .iter()
                .map(|&earlier| idx - earlier)
                .filter(|&dist| dist >= 3 && dist % 2 == 1)
                .collect();
            bond_dists.push(dists);
            weighted_idxs.push(idx);
        }

        Self {
            max_length: lattice.max_length(),
            free_neighbors: 1 << (lattice.dim() - 1),
            weighted_idxs,
            bond_dists,
        }
    }

    /// Most negative score the unplaced suffix could still add, assuming
    /// every future weighted residue fills all its free neighbour slots.
    /// The chain end gets one extra slot.
    pub fn naive_branch_score(&self, lattice: &Lattice) -> i32 {
        let cur_len = lattice.cur_len();
        let max_weights = lattice.max_weights();

        let remaining: i32 = max_weights[cur_len..].iter().sum();
        let mut branch_score = self.free_neighbors * remaining;

        let tail_weight = max_weights[self.max_length - 1];
        if cur_len != self.max_length && tail_weight != 0 {
            branch_score += tail_weight;
        }
        branch_score
    }

    /// Like the naive bound, but each future weighted residue is credited
    /// at most one contact per partner it can actually reach.
    pub fn reach_branch_score(&self, lattice: &Lattice) -> i32 {
        let cur_len = lattice.cur_len();
        let max_weights = lattice.max_weights();

        let mut branch_score = 0;
        for (slot, &idx) in self.weighted_idxs.iter().enumerate() {
            if idx < cur_len {
                continue;
            }
            let neighbor_slots = if idx == self.max_length - 1 {
                self.free_neighbors + 1
            } else {
                self.free_neighbors
            };
            let reachable = self.bond_dists[slot].len() as i32;
            branch_score += max_weights[idx] * neighbor_slots.min(reachable);
        }
        branch_score
    }

    pub fn branch_score(&self, lattice: &Lattice, prune: Prune) -> i32 {
        match prune {
            Prune::Naive => self.naive_branch_score(lattice),
            Prune::Reach => self.reach_branch_score(lattice),
        }
    }

    /// True when extending the chain with `m` cannot lead to a score below
    /// the incumbent. The move is placed tentatively, without counting
    /// towards the placement statistics, and removed again.
    pub fn prunes(
        &self,
        lattice: &mut Lattice,
        m: Move,
        best_score: i32,
        prune: Prune,
    ) -> Result<bool, LatticeError> {
        lattice.place_amino(m, false)?;
        let bound = lattice.score() + self.branch_score(lattice, prune);
        lattice.remove_amino()?;
        Ok(bound >= best_score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::model::ModelTable;

    fn hp_lattice(sequence: &str, dim: usize) -> Lattice {
        Lattice::new(sequence, dim, ModelTable::hp()).unwrap()
    }

    #[test]
    fn bond_dists_keep_odd_distances_of_at_least_three() {
        let lattice = hp_lattice("PHPHPHPPH", 2);
        let ctx = BoundContext::new(&lattice);
        assert_eq!(ctx.weighted_idxs, vec![1, 3, 5, 8]);
        // Index 8 can reach back to 1, 3 and 5; the closer pairs all sit at
        // even chain distance and can never touch.
        assert_eq!(
            ctx.bond_dists,
            vec![vec![], vec![], vec![], vec![7, 5, 3]]
        );
    }

    #[test]
    fn free_neighbor_slots_double_per_dimension() {
        assert_eq!(BoundContext::new(&hp_lattice("HH", 2)).free_neighbors, 2);
        assert_eq!(BoundContext::new(&hp_lattice("HH", 3)).free_neighbors, 4);
    }

    #[test]
    fn naive_bound_counts_the_full_remaining_weight() {
        let lattice = hp_lattice("PHPHPHPPH", 2);
        let ctx = BoundContext::new(&lattice);
        // From the start, indices 1..9 still carry -4 of weight, doubled by
        // the free neighbour count, plus the weighted chain end.
        assert_eq!(ctx.naive_branch_score(&lattice), 2 * -4 - 1);
    }

    #[test]
    fn reach_bound_caps_contacts_by_reachable_partners() {
        let lattice = hp_lattice("PHPHPHPPH", 2);
        let ctx = BoundContext::new(&lattice);
        // Only index 8 has reachable partners: three of them, equal to its
        // chain-end slot count of free_neighbors + 1.
        assert_eq!(ctx.reach_branch_score(&lattice), -3);
    }

    #[test]
    fn reach_end_bonus_never_credits_more_than_reachable_partners() {
        // The weighted chain end reaches four partners (distances 9, 7, 5
        // and 3) but only has free_neighbors + 1 = 3 contact slots; the
        // inner H residues sit at even distances and reach nothing.
        let lattice = hp_lattice("PPHPHPHPHPPH", 2);
        let ctx = BoundContext::new(&lattice);
        let slot = ctx.weighted_idxs.iter().position(|&i| i == 11).unwrap();
        assert_eq!(ctx.bond_dists[slot], vec![9, 7, 5, 3]);
        assert_eq!(ctx.reach_branch_score(&lattice), -3);
    }

    #[test]
    fn naive_bound_is_never_tighter_than_reach() {
        let mut lattice = hp_lattice("PHPHPHPPH", 2);
        let ctx = BoundContext::new(&lattice);
        for m in [-1, -1, 2, 1] {
            lattice.place_amino(m, true).unwrap();
            assert!(ctx.naive_branch_score(&lattice) <= ctx.reach_branch_score(&lattice));
        }
    }

    #[test]
    fn prunes_leaves_the_lattice_untouched() {
        let mut lattice = hp_lattice("PHPHPHPPH", 2);
        lattice.place_amino(-1, true).unwrap();
        let before = lattice.clone();

        let pruned = ctx_prunes(&mut lattice, -2);
        assert!(!pruned, "nothing can be cut before any score exists");
        assert_eq!(lattice, before);
        assert_eq!(lattice.score(), before.score());
        assert_eq!(lattice.aminos_placed(), before.aminos_placed());
    }

    fn ctx_prunes(lattice: &mut Lattice, m: Move) -> bool {
        let ctx = BoundContext::new(lattice);
        ctx.prunes(lattice, m, 1, Prune::Reach).unwrap()
    }
}
