use std::fs;
use tracing::{debug, info, warn};

use super::SearchOutcome;
use crate::core::models::lattice::Lattice;
use crate::core::models::moves::{self, Move};
use crate::engine::bounds::{BoundContext, Prune};
use crate::engine::cancel::CancelToken;
use crate::engine::checkpoint::{self, BnbCheckpoint, BNB_ALGORITHM};
use crate::engine::error::EngineError;

/// Depth-first branch-and-bound with the given bounding function, without
/// external cancellation.
pub fn depth_first_bnb(lattice: &mut Lattice, prune: Prune) -> Result<SearchOutcome, EngineError> {
    depth_first_bnb_with(lattice, prune, &CancelToken::new())
}

/// Depth-first branch-and-bound that honours a cancellation token and, when
/// [`checkpoint::CACHE_DIR_ENV`] is configured, resumes from and writes
/// checkpoints.
///
/// The traversal is the depth-first enumeration with one extra gate: before
/// a move is committed, the bound is evaluated on the tentatively extended
/// chain, and the whole subtree is skipped when no completion can beat the
/// incumbent. On cancellation the current iteration finishes, a checkpoint
/// is written if configured, and the lattice is left mid-conformation
/// without surfacing a partial result.
pub fn depth_first_bnb_with(
    lattice: &mut Lattice,
    prune: Prune,
    cancel: &CancelToken,
) -> Result<SearchOutcome, EngineError> {
    let max_length = lattice.max_length();
    let dim = lattice.dim() as Move;
    let checkpoint_path = checkpoint::cache_file(BNB_ALGORITHM, lattice.sequence());

    let mut dfs_stack: Vec<Move> = Vec::new();
    let mut mv: Move = -1;
    let mut placed_amino = false;
    let mut best_score = 1;
    let mut best_hash: Vec<Move> = Vec::new();
    let mut iterations: u64 = 0;

    let mut resumed = false;
    if let Some(path) = checkpoint_path.as_deref().filter(|path| path.exists()) {
        match BnbCheckpoint::load(path) {
            Ok(snapshot) => match restore_conformation(lattice, &snapshot) {
                Ok(()) => {
                    dfs_stack = snapshot.dfs_stack;
                    mv = snapshot.next_move;
                    placed_amino = snapshot.placed_amino;
                    best_score = snapshot.best_score;
                    best_hash = snapshot.best_hash;
                    iterations = snapshot.iterations;
                    resumed = true;
                    info!(
                        path = %path.display(),
                        iterations,
                        best_score,
                        "resuming branch-and-bound from checkpoint"
                    );
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        %err,
                        "checkpoint does not fit this problem; starting fresh"
                    );
                }
            },
            Err(err) => {
                warn!(path = %path.display(), %err, "ignoring unreadable checkpoint");
            }
        }
    }

    if !resumed && max_length > 1 {
        lattice.place_amino(-1, true)?;
    }
    if max_length <= 2 {
        return Ok(SearchOutcome::Completed);
    }

    let bounds = BoundContext::new(lattice);

    loop {
        if cancel.is_cancelled() {
            if let Some(path) = checkpoint_path.as_deref() {
                let snapshot = BnbCheckpoint {
                    current_hash: lattice.hash_fold(),
                    aminos_placed: lattice.aminos_placed(),
                    solutions_checked: lattice.solutions_checked(),
                    dfs_stack: dfs_stack.clone(),
                    next_move: mv,
                    placed_amino,
                    best_score,
                    score: lattice.score(),
                    best_hash: best_hash.clone(),
                    iterations,
                };
                snapshot.save(path)?;
                info!(path = %path.display(), iterations, "wrote checkpoint before stopping");
            }
            return Ok(SearchOutcome::Interrupted);
        }

        iterations += 1;
        placed_amino = false;

        while !placed_amino && mv != -dim - 1 {
            if lattice.is_valid(mv) && !bounds.prunes(lattice, mv, best_score, prune)? {
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
        iterations,
        solutions_checked = lattice.solutions_checked(),
        "branch-and-bound finished"
    );

    // A finished run's snapshot would otherwise be picked up by the next
    // invocation and replay a terminal state.
    if let Some(path) = checkpoint_path.as_deref().filter(|path| path.exists()) {
        if let Err(err) = fs::remove_file(path) {
            warn!(path = %path.display(), %err, "could not remove completed checkpoint");
        }
    }
    Ok(SearchOutcome::Completed)
}

/// Replay a checkpointed conformation onto `lattice`, touching it only if
/// the whole snapshot applies cleanly.
fn restore_conformation(
    lattice: &mut Lattice,
    snapshot: &BnbCheckpoint,
) -> Result<(), crate::core::models::lattice::LatticeError> {
    let mut restored = lattice.clone();
    restored.reset();
    restored.set_hash(&snapshot.current_hash, false)?;
    restored.set_aminos_placed(snapshot.aminos_placed);
    restored.set_solutions_checked(snapshot.solutions_checked);
    *lattice = restored;
    Ok(())
}

/// Branch-and-bound over independent subtrees, one per valid third-residue
/// move, each explored on its own clone of the lattice. Workers share only
/// the incumbent: a lock-guarded score/hash pair plus an atomic copy of the
/// score that pruning reads without taking the lock. Placement counters are
/// summed back into the caller's lattice.
#[cfg(feature = "parallel")]
pub fn depth_first_bnb_parallel(
    lattice: &mut Lattice,
    prune: Prune,
) -> Result<SearchOutcome, EngineError> {
    use rayon::prelude::*;
    use std::sync::atomic::AtomicI32;
    use std::sync::Mutex;

    if lattice.max_length() <= 3 {
        return depth_first_bnb(lattice, prune);
    }

    lattice.place_amino(-1, true)?;
    let bounds = BoundContext::new(lattice);

    let dim = lattice.dim() as Move;
    let prefixes: Vec<Move> = (1..=dim)
        .map(|axis| -axis)
        .filter(|&m| lattice.is_valid(m))
        .collect();

    let incumbent: Mutex<(i32, Vec<Move>)> = Mutex::new((1, Vec::new()));
    let best_hint = AtomicI32::new(1);

    let counter_deltas = prefixes
        .par_iter()
        .map(|&third_move| {
            let mut work = lattice.clone();
            let placed_before = work.aminos_placed();
            let checked_before = work.solutions_checked();

            work.place_amino(third_move, true)?;
            explore_subtree(&mut work, &bounds, prune, &incumbent, &best_hint)?;

            Ok((
                work.aminos_placed() - placed_before,
                work.solutions_checked() - checked_before,
            ))
        })
        .collect::<Result<Vec<(u64, u64)>, EngineError>>()?;

    for (placed, checked) in counter_deltas {
        lattice.set_aminos_placed(lattice.aminos_placed() + placed);
        lattice.set_solutions_checked(lattice.solutions_checked() + checked);
    }

    let (score, best_hash) = incumbent.into_inner().unwrap_or_else(|err| err.into_inner());
    lattice.set_hash(&best_hash, false)?;
    info!(score, workers = prefixes.len(), "parallel branch-and-bound finished");
    Ok(SearchOutcome::Completed)
}

/// The sequential branch-and-bound loop rooted at the current chain end of
/// `work`, pruning against the shared incumbent.
#[cfg(feature = "parallel")]
fn explore_subtree(
    work: &mut Lattice,
    bounds: &BoundContext,
    prune: Prune,
    incumbent: &std::sync::Mutex<(i32, Vec<Move>)>,
    best_hint: &std::sync::atomic::AtomicI32,
) -> Result<(), EngineError> {
    use std::sync::atomic::Ordering;

    let max_length = work.max_length();
    let dim = work.dim() as Move;
    let base_len = work.cur_len();

    let submit = |work: &Lattice| {
        let score = work.score();
        if score < best_hint.load(Ordering::Relaxed) {
            let mut best = incumbent.lock().unwrap_or_else(|err| err.into_inner());
            if score < best.0 {
                best.0 = score;
                best.1 = work.hash_fold();
                best_hint.store(score, Ordering::Relaxed);
            }
        }
    };

    if work.cur_len() == max_length {
        submit(work);
        return Ok(());
    }

    let mut dfs_stack: Vec<Move> = Vec::new();
    let mut mv: Move = dim;

    loop {
        let mut placed_amino = false;

        while !placed_amino && mv != -dim - 1 {
            let best_score = best_hint.load(Ordering::Relaxed);
            if work.is_valid(mv) && !bounds.prunes(work, mv, best_score, prune)? {
                work.place_amino(mv, true)?;
                placed_amino = true;
                dfs_stack.push(moves::descend(mv));
            } else {
                mv = moves::descend(mv);
            }
        }

        if placed_amino && work.cur_len() == max_length {
            submit(work);
        }

        if placed_amino && work.cur_len() != max_length {
            mv = dim;
        } else {
            mv = -dim - 1;
            while mv == -dim - 1 {
                match dfs_stack.pop() {
                    Some(next) => {
                        work.remove_amino()?;
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

    debug_assert_eq!(work.cur_len(), base_len);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::model::ModelTable;
    use crate::engine::checkpoint::CACHE_DIR_ENV;
    use serial_test::serial;

    fn hp_lattice(sequence: &str, dim: usize) -> Lattice {
        Lattice::new(sequence, dim, ModelTable::hp()).unwrap()
    }

    #[test]
    #[serial]
    fn both_bounds_find_the_2d_optimum() {
        for prune in [Prune::Naive, Prune::Reach] {
            let mut lattice = hp_lattice("PHPHPHPPH", 2);
            depth_first_bnb(&mut lattice, prune).unwrap();
            assert_eq!(lattice.score(), -3, "{prune:?} missed the optimum");
        }
    }

    #[test]
    #[serial]
    fn pruning_matches_the_exhaustive_search_but_works_less() {
        let mut exhaustive = hp_lattice("PHPHPHPPH", 2);
        crate::engine::search::depth_first(&mut exhaustive).unwrap();

        let mut pruned = hp_lattice("PHPHPHPPH", 2);
        depth_first_bnb(&mut pruned, Prune::Reach).unwrap();

        assert_eq!(pruned.score(), exhaustive.score());
        assert!(pruned.aminos_placed() < exhaustive.aminos_placed());
        assert!(pruned.solutions_checked() < exhaustive.solutions_checked());
    }

    #[test]
    #[serial]
    fn cancelled_runs_report_interruption() {
        let cancel = CancelToken::new();
        cancel.cancel();

        let mut lattice = hp_lattice("PHPHPHPPH", 2);
        let outcome = depth_first_bnb_with(&mut lattice, Prune::Naive, &cancel).unwrap();
        assert_eq!(outcome, SearchOutcome::Interrupted);
        // Only the symmetry prefix was placed before the first poll.
        assert_eq!(lattice.cur_len(), 2);
    }

    #[test]
    #[serial]
    fn interrupted_runs_checkpoint_and_resume_to_the_optimum() {
        let dir = tempfile::tempdir().unwrap();
        std::env::set_var(CACHE_DIR_ENV, dir.path());

        let cancel = CancelToken::new();
        cancel.cancel();
        let mut lattice = hp_lattice("PHPHPHPPH", 2);
        let outcome = depth_first_bnb_with(&mut lattice, Prune::Naive, &cancel).unwrap();
        assert_eq!(outcome, SearchOutcome::Interrupted);

        let checkpoint_file = dir.path().join("depth_first_bnb/PHPHPHPPH.checkpoint");
        assert!(checkpoint_file.exists());

        let mut resumed = hp_lattice("PHPHPHPPH", 2);
        let outcome = depth_first_bnb(&mut resumed, Prune::Naive).unwrap();
        assert_eq!(outcome, SearchOutcome::Completed);
        assert_eq!(resumed.score(), -3);

        // A completed run must not leave a checkpoint behind.
        assert!(!checkpoint_file.exists());

        std::env::remove_var(CACHE_DIR_ENV);
    }

    #[test]
    #[serial]
    fn checkpoints_that_do_not_fit_the_problem_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        std::env::set_var(CACHE_DIR_ENV, dir.path());

        // A well-formed snapshot whose conformation is longer than the chain.
        let snapshot = BnbCheckpoint {
            current_hash: vec![-1; 9],
            ..BnbCheckpoint::default()
        };
        let algo_dir = dir.path().join("depth_first_bnb");
        std::fs::create_dir_all(&algo_dir).unwrap();
        snapshot
            .save(&algo_dir.join("PHPHPHPPH.checkpoint"))
            .unwrap();

        let mut lattice = hp_lattice("PHPHPHPPH", 2);
        depth_first_bnb(&mut lattice, Prune::Naive).unwrap();
        assert_eq!(lattice.score(), -3);

        std::env::remove_var(CACHE_DIR_ENV);
    }

    #[test]
    #[serial]
    fn garbage_checkpoints_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        std::env::set_var(CACHE_DIR_ENV, dir.path());

        let algo_dir = dir.path().join("depth_first_bnb");
        std::fs::create_dir_all(&algo_dir).unwrap();
        std::fs::write(algo_dir.join("PHPHPHPPH.checkpoint"), "definitely not INI").unwrap();

        let mut lattice = hp_lattice("PHPHPHPPH", 2);
        depth_first_bnb(&mut lattice, Prune::Naive).unwrap();
        assert_eq!(lattice.score(), -3);

        std::env::remove_var(CACHE_DIR_ENV);
    }

    #[cfg(feature = "parallel")]
    #[test]
    #[serial]
    fn parallel_subtrees_find_the_same_optimum() {
        let mut lattice = hp_lattice("PHPHPHPPH", 2);
        depth_first_bnb_parallel(&mut lattice, Prune::Reach).unwrap();
        assert_eq!(lattice.score(), -3);

        let mut lattice = hp_lattice("HPPHPHPHPH", 3);
        depth_first_bnb_parallel(&mut lattice, Prune::Naive).unwrap();
        assert_eq!(lattice.score(), -4);
    }
}
