//! The axis-aligned move alphabet on the cubic lattice.
//!
//! A move is a nonzero integer whose magnitude selects a 1-based axis and
//! whose sign selects the direction along that axis. `0` is reserved for
//! "no outgoing move" and never appears in the alphabet.

/// A single unit step on the lattice, or `0` for "none".
pub type Move = i32;

/// All moves available in `dim` dimensions, in ascending order:
/// `[-dim, .., -1, 1, .., dim]`.
pub fn alphabet(dim: usize) -> Vec<Move> {
    let dim = dim as Move;
    (-dim..=dim).filter(|&m| m != 0).collect()
}

/// The 0-based axis a move steps along.
#[inline]
pub fn axis(m: Move) -> usize {
    (m.unsigned_abs() as usize) - 1
}

/// The signed direction of a move along its axis.
#[inline]
pub fn direction(m: Move) -> i32 {
    m.signum()
}

/// Advance `pos` by one move in place.
#[inline]
pub fn step(pos: &mut [i32], m: Move) {
    pos[axis(m)] += direction(m);
}

/// Undo one move on `pos` in place.
#[inline]
pub fn step_back(pos: &mut [i32], m: Move) {
    pos[axis(m)] -= direction(m);
}

/// The position reached by taking `m` from `pos`.
pub fn offset(pos: &[i32], m: Move) -> Vec<i32> {
    let mut next = pos.to_vec();
    step(&mut next, m);
    next
}

/// The next candidate in the fixed descending try order used by the
/// depth-first searches: `dim, .., 1, -1, .., -dim`, skipping `0`. Stepping
/// below `-dim` yields the `-dim - 1` backstop.
#[inline]
pub fn descend(m: Move) -> Move {
    if m == 1 { -1 } else { m - 1 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alphabet_skips_zero_and_is_ascending() {
        assert_eq!(alphabet(2), vec![-2, -1, 1, 2]);
        assert_eq!(alphabet(3), vec![-3, -2, -1, 1, 2, 3]);
    }

    #[test]
    fn step_and_step_back_are_inverse() {
        let mut pos = vec![0, 0, 0];
        step(&mut pos, 2);
        assert_eq!(pos, vec![0, 1, 0]);
        step(&mut pos, -3);
        assert_eq!(pos, vec![0, 1, -1]);
        step_back(&mut pos, -3);
        step_back(&mut pos, 2);
        assert_eq!(pos, vec![0, 0, 0]);
    }

    #[test]
    fn offset_leaves_the_input_untouched() {
        let pos = vec![1, -1];
        assert_eq!(offset(&pos, -1), vec![0, -1]);
        assert_eq!(pos, vec![1, -1]);
    }

    #[test]
    fn descend_walks_the_full_try_order() {
        let mut order = Vec::new();
        let mut m = 2;
        while m != -3 {
            order.push(m);
            m = descend(m);
        }
        assert_eq!(order, vec![2, 1, -1, -2]);
    }
}
