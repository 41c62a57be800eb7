use tracing::{info, instrument};

use crate::core::models::lattice::Lattice;
use crate::core::models::moves::Move;
use crate::engine::bounds::Prune;
use crate::engine::cancel::CancelToken;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::search::{
    beam_search, best_first_bnb, depth_first, depth_first_bnb_with, SearchOutcome,
};

/// The search algorithm a fold run should use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    DepthFirst,
    DepthFirstBnb { prune: Prune },
    BeamSearch { beam_width: i32 },
    BestFirstBnb,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FoldConfig {
    pub algorithm: Algorithm,
}

/// Result of a fold run. On an interrupted run the conformation fields
/// describe the partial chain the search stopped on, not a solution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoldReport {
    pub outcome: SearchOutcome,
    pub score: i32,
    pub hash: Vec<Move>,
    pub bonds: Vec<(usize, usize)>,
    pub aminos_placed: u64,
    pub solutions_checked: u64,
}

/// Run the configured search on `lattice` and summarize the result.
#[instrument(skip_all, name = "fold_workflow")]
pub fn run(
    lattice: &mut Lattice,
    config: &FoldConfig,
    reporter: &ProgressReporter,
    cancel: &CancelToken,
) -> Result<FoldReport, EngineError> {
    info!(
        sequence = lattice.sequence(),
        dim = lattice.dim(),
        algorithm = ?config.algorithm,
        "starting fold search"
    );
    reporter.report(Progress::PhaseStart { name: "Searching" });

    let outcome = match config.algorithm {
        Algorithm::DepthFirst => depth_first(lattice)?,
        Algorithm::DepthFirstBnb { prune } => depth_first_bnb_with(lattice, prune, cancel)?,
        Algorithm::BeamSearch { beam_width } => beam_search(lattice, beam_width)?,
        Algorithm::BestFirstBnb => best_first_bnb(lattice)?,
    };

    reporter.report(Progress::PhaseFinish);
    match outcome {
        SearchOutcome::Completed => {
            reporter.report(Progress::Message(format!("best score {}", lattice.score())));
        }
        SearchOutcome::Interrupted => {
            reporter.report(Progress::Message("search interrupted".to_string()));
        }
    }

    Ok(FoldReport {
        outcome,
        score: lattice.score(),
        hash: lattice.hash_fold(),
        bonds: lattice.get_bonds(),
        aminos_placed: lattice.aminos_placed(),
        solutions_checked: lattice.solutions_checked(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::model::ModelTable;
    use serial_test::serial;

    fn hp_lattice(sequence: &str, dim: usize) -> Lattice {
        Lattice::new(sequence, dim, ModelTable::hp()).unwrap()
    }

    fn run_quietly(lattice: &mut Lattice, algorithm: Algorithm) -> FoldReport {
        run(
            lattice,
            &FoldConfig { algorithm },
            &ProgressReporter::new(),
            &CancelToken::new(),
        )
        .unwrap()
    }

    #[test]
    #[serial]
    fn every_exact_algorithm_reports_the_same_optimum() {
        for algorithm in [
            Algorithm::DepthFirst,
            Algorithm::DepthFirstBnb { prune: Prune::Naive },
            Algorithm::DepthFirstBnb { prune: Prune::Reach },
            Algorithm::BeamSearch { beam_width: -1 },
            Algorithm::BestFirstBnb,
        ] {
            let mut lattice = hp_lattice("PHPHPHPPH", 2);
            let report = run_quietly(&mut lattice, algorithm);
            assert_eq!(report.outcome, SearchOutcome::Completed);
            assert_eq!(report.score, -3, "{algorithm:?} missed the optimum");
            assert_eq!(report.hash.len(), 8);
        }
    }

    #[test]
    #[serial]
    fn report_carries_the_bonds_of_the_final_fold() {
        let mut lattice = hp_lattice("PHPHPHPPH", 2);
        let report = run_quietly(&mut lattice, Algorithm::DepthFirst);
        // Three bonds, each reported in both orientations.
        assert_eq!(report.bonds.len(), 6);
    }

    #[test]
    #[serial]
    fn progress_events_bracket_the_search() {
        use std::sync::Mutex;
        let events: Mutex<Vec<String>> = Mutex::new(Vec::new());

        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            let tag = match event {
                Progress::PhaseStart { name } => format!("start:{name}"),
                Progress::PhaseFinish => "finish".to_string(),
                Progress::Message(msg) => format!("msg:{msg}"),
            };
            events.lock().unwrap().push(tag);
        }));

        let mut lattice = hp_lattice("PHPH", 2);
        run(
            &mut lattice,
            &FoldConfig {
                algorithm: Algorithm::DepthFirst,
            },
            &reporter,
            &CancelToken::new(),
        )
        .unwrap();
        drop(reporter);

        let events = events.into_inner().unwrap();
        assert_eq!(events[0], "start:Searching");
        assert_eq!(events[1], "finish");
        assert!(events[2].starts_with("msg:best score"));
    }
}
