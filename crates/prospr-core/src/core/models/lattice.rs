use ahash::AHashMap;
use std::fmt;
use thiserror::Error;

use super::model::ModelTable;
use super::moves::{self, Move};
use super::residue::Residue;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum LatticeError {
    #[error("Move {0} cannot extend the current conformation")]
    InvalidMove(Move),

    #[error("Move {0} would fold the chain onto itself")]
    FoldedOntoItself(Move),

    #[error("Cannot remove the residue at the origin")]
    EmptyChain,

    #[error("A lattice requires a sequence of at least one residue")]
    EmptySequence,

    #[error("Invalid lattice dimension: {0}")]
    InvalidDimension(usize),

    #[error("A fold hash of {hash_len} moves does not fit a chain of {max_length} residues")]
    HashTooLong { hash_len: usize, max_length: usize },
}

/// A partial self-avoiding walk on the `dim`-dimensional cubic lattice,
/// labelled by a residue sequence and scored under an HP-family model.
///
/// The walk always starts with the first residue at the origin. It grows and
/// shrinks exclusively through [`place_amino`](Lattice::place_amino) and
/// [`remove_amino`](Lattice::remove_amino), which maintain the score
/// incrementally so that it is exact after every call. Place followed by
/// remove restores the previous conformation state bit for bit, which is
/// what makes backtracking searches over this structure correct.
///
/// Residue records live in a flat arena indexed by sequence position; the
/// occupancy map stores arena indices, so cloning a lattice is a plain deep
/// value copy.
#[derive(Debug, Clone)]
pub struct Lattice {
    sequence: String,
    dim: usize,
    model: ModelTable,
    max_weights: Vec<i32>,
    residues: Vec<Residue>,
    occupancy: AHashMap<Vec<i32>, usize>,
    cur_len: usize,
    last_pos: Vec<i32>,
    last_move: Move,
    score: i32,
    aminos_placed: u64,
    solutions_checked: u64,
}

impl Lattice {
    /// Create a lattice with the first residue placed at the origin.
    pub fn new(sequence: &str, dim: usize, model: ModelTable) -> Result<Self, LatticeError> {
        if dim < 1 {
            return Err(LatticeError::InvalidDimension(dim));
        }
        if sequence.is_empty() {
            return Err(LatticeError::EmptySequence);
        }

        let residues: Vec<Residue> = sequence
            .chars()
            .enumerate()
            .map(|(index, res_type)| Residue::new(res_type, index))
            .collect();
        let max_weights = residues
            .iter()
            .map(|res| model.max_weight(res.res_type()))
            .collect();

        let last_pos = vec![0; dim];
        let mut occupancy = AHashMap::with_capacity(residues.len());
        occupancy.insert(last_pos.clone(), 0);

        Ok(Self {
            sequence: sequence.to_string(),
            dim,
            model,
            max_weights,
            residues,
            occupancy,
            cur_len: 1,
            last_pos,
            last_move: 0,
            score: 0,
            aminos_placed: 0,
            solutions_checked: 0,
        })
    }

    pub fn sequence(&self) -> &str {
        &self.sequence
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn bond_values(&self) -> &std::collections::BTreeMap<String, i32> {
        self.model.bond_values()
    }

    /// Number of residues in the full chain.
    pub fn max_length(&self) -> usize {
        self.residues.len()
    }

    /// Number of residues currently placed.
    pub fn cur_len(&self) -> usize {
        self.cur_len
    }

    /// The move that placed the chain end, or `0` when only the origin is
    /// placed.
    pub fn last_move(&self) -> Move {
        self.last_move
    }

    /// Position of the most recently placed residue.
    pub fn last_pos(&self) -> &[i32] {
        &self.last_pos
    }

    pub fn score(&self) -> i32 {
        self.score
    }

    pub fn aminos_placed(&self) -> u64 {
        self.aminos_placed
    }

    pub fn solutions_checked(&self) -> u64 {
        self.solutions_checked
    }

    /// Per-position largest-magnitude bond energies, `0` for residue types
    /// the model does not weight.
    pub fn max_weights(&self) -> &[i32] {
        &self.max_weights
    }

    /// The residue occupying `pos`, if any.
    pub fn get_amino(&self, pos: &[i32]) -> Option<&Residue> {
        self.occupancy.get(pos).map(|&idx| &self.residues[idx])
    }

    /// Whether the residue at sequence index `index` can score.
    pub fn is_weighted(&self, index: usize) -> bool {
        self.model.is_weighted(self.residues[index].res_type())
    }

    /// True when `m` is a move of this lattice and taking it from the chain
    /// end lands on a free position.
    pub fn is_valid(&self, m: Move) -> bool {
        m != 0
            && m.unsigned_abs() as usize <= self.dim
            && !self.occupancy.contains_key(&moves::offset(&self.last_pos, m))
    }

    /// Place the next residue by taking `m` from the chain end, updating the
    /// score with every new contact. With `track`, the placement counters
    /// advance as well. The call either applies completely or not at all.
    pub fn place_amino(&mut self, m: Move, track: bool) -> Result<(), LatticeError> {
        if m == 0 || m.unsigned_abs() as usize > self.dim || self.cur_len == self.residues.len() {
            return Err(LatticeError::InvalidMove(m));
        }
        let next_pos = moves::offset(&self.last_pos, m);
        if self.occupancy.contains_key(&next_pos) {
            return Err(LatticeError::FoldedOntoItself(m));
        }

        let idx = self.cur_len;
        self.residues[idx - 1].set_next_move(m);
        self.residues[idx].set_prev_move(m);
        self.residues[idx].set_next_move(0);
        self.occupancy.insert(next_pos.clone(), idx);
        self.last_pos = next_pos;
        self.last_move = m;

        if self.model.is_weighted(self.residues[idx].res_type()) {
            self.score += self.contact_sum(self.residues[idx].res_type(), m);
        }
        self.cur_len += 1;

        if track {
            self.aminos_placed += 1;
            if self.cur_len == self.residues.len() {
                self.solutions_checked += 1;
            }
        }
        Ok(())
    }

    /// Remove the chain end, exactly undoing the matching
    /// [`place_amino`](Lattice::place_amino). Counters are not rolled back.
    pub fn remove_amino(&mut self) -> Result<(), LatticeError> {
        if self.cur_len == 1 {
            return Err(LatticeError::EmptyChain);
        }

        self.cur_len -= 1;
        let idx = self.cur_len;
        if self.model.is_weighted(self.residues[idx].res_type()) {
            self.score -= self.contact_sum(self.residues[idx].res_type(), self.last_move);
        }

        self.occupancy.remove(&self.last_pos);
        moves::step_back(&mut self.last_pos, self.last_move);
        self.residues[idx - 1].set_next_move(0);
        self.last_move = self.residues[idx - 1].prev_move();
        Ok(())
    }

    /// Sum of bond energies between the residue at the chain end and every
    /// occupied neighbour except its chain predecessor, which sits in the
    /// `-incoming` direction.
    fn contact_sum(&self, res_type: char, incoming: Move) -> i32 {
        let mut sum = 0;
        let mut probe = self.last_pos.clone();
        let dim = self.dim as Move;
        for m in -dim..=dim {
            if m == 0 || m == -incoming {
                continue;
            }
            moves::step(&mut probe, m);
            if let Some(&idx) = self.occupancy.get(&probe) {
                sum += self
                    .model
                    .weight(res_type, self.residues[idx].res_type());
            }
            moves::step_back(&mut probe, m);
        }
        sum
    }

    /// The canonical serialization of the conformation: the moves from the
    /// origin to the chain end, `cur_len - 1` in total.
    pub fn hash_fold(&self) -> Vec<Move> {
        self.residues[..self.cur_len - 1]
            .iter()
            .map(|res| res.next_move())
            .collect()
    }

    /// Rebuild the conformation from a fold hash. Counters advance only
    /// with `track`.
    pub fn set_hash(&mut self, fold_hash: &[Move], track: bool) -> Result<(), LatticeError> {
        if fold_hash.len() >= self.residues.len() {
            return Err(LatticeError::HashTooLong {
                hash_len: fold_hash.len(),
                max_length: self.residues.len(),
            });
        }
        self.reset_conformation();
        for &m in fold_hash {
            self.place_amino(m, track)?;
        }
        Ok(())
    }

    /// Restore the conformation to the lone origin residue, keeping the
    /// placement counters.
    pub fn reset_conformation(&mut self) {
        self.occupancy.clear();
        self.cur_len = 1;
        self.last_pos.fill(0);
        self.last_move = 0;
        self.score = 0;
        for res in &mut self.residues {
            res.clear_moves();
        }
        self.occupancy.insert(self.last_pos.clone(), 0);
    }

    /// Restore the lattice to its just-constructed state, counters included.
    pub fn reset(&mut self) {
        self.reset_conformation();
        self.aminos_placed = 0;
        self.solutions_checked = 0;
    }

    pub(crate) fn set_aminos_placed(&mut self, placed: u64) {
        self.aminos_placed = placed;
    }

    pub(crate) fn set_solutions_checked(&mut self, checked: u64) {
        self.solutions_checked = checked;
    }

    /// All index pairs of residues forming a strictly negative contact, in
    /// chain order and with both orientations reported.
    pub fn get_bonds(&self) -> Vec<(usize, usize)> {
        let all_moves = moves::alphabet(self.dim);
        let mut pairs = Vec::new();
        let mut pos = vec![0; self.dim];

        let origin_next = self.residues[0].next_move();
        self.append_bond_pairs(
            &mut pairs,
            &pos,
            0,
            all_moves.iter().copied().filter(|&m| m != origin_next),
        );

        for (offset, &m) in self.hash_fold().iter().enumerate() {
            moves::step(&mut pos, m);
            let idx = offset + 1;
            let res = &self.residues[idx];
            let toward_prev = -res.prev_move();
            let next = res.next_move();
            self.append_bond_pairs(
                &mut pairs,
                &pos,
                idx,
                all_moves
                    .iter()
                    .copied()
                    .filter(|&mm| mm != toward_prev && (next == 0 || mm != next)),
            );
        }
        pairs
    }

    fn append_bond_pairs(
        &self,
        pairs: &mut Vec<(usize, usize)>,
        pos: &[i32],
        idx: usize,
        candidate_moves: impl Iterator<Item = Move>,
    ) {
        let res_type = self.residues[idx].res_type();
        if !self.model.is_weighted(res_type) {
            return;
        }
        for m in candidate_moves {
            let other_pos = moves::offset(pos, m);
            if let Some(&other_idx) = self.occupancy.get(&other_pos) {
                let other_type = self.residues[other_idx].res_type();
                if self.model.weight(res_type, other_type) < 0 {
                    pairs.push((idx, other_idx));
                }
            }
        }
    }
}

/// Conformation equality: same problem (sequence, dimension, bond table)
/// and same fold. Placement counters are deliberately excluded.
impl PartialEq for Lattice {
    fn eq(&self, other: &Self) -> bool {
        self.sequence == other.sequence
            && self.dim == other.dim
            && self.bond_values() == other.bond_values()
            && self.cur_len == other.cur_len
            && self.hash_fold() == other.hash_fold()
    }
}

impl Eq for Lattice {}

impl fmt::Display for Lattice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Lattice s={} l={}, [ ", self.score, self.cur_len)?;
        for m in self.hash_fold() {
            write!(f, "{m} ")?;
        }
        write!(f, "]>")
    }
}
