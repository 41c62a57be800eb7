use tracing::info;

use crate::cli::{AlgorithmArg, FoldArgs, PruneArg};
use crate::config;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use prospr_core::core::models::lattice::Lattice;
use prospr_core::core::models::model::ModelTable;
use prospr_core::engine::bounds::Prune;
use prospr_core::engine::cancel::CancelToken;
use prospr_core::engine::progress::ProgressReporter;
use prospr_core::engine::search::SearchOutcome;
use prospr_core::workflows::fold::{self, Algorithm, FoldConfig};

pub fn run(args: &FoldArgs) -> Result<()> {
    let model = match &args.model_file {
        Some(path) => config::load_model_table(path)?,
        None => ModelTable::preset(&args.model)?,
    };
    let mut lattice = Lattice::new(&args.sequence, args.dim, model)?;

    let algorithm = resolve_algorithm(args);
    let config = FoldConfig { algorithm };

    let handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(handler.get_callback());
    let report = fold::run(&mut lattice, &config, &reporter, &CancelToken::new())?;

    if report.outcome == SearchOutcome::Interrupted {
        info!("search interrupted before completion");
        println!("Search interrupted; no solution to report.");
        return Ok(());
    }

    println!("Sequence:          {}", args.sequence);
    println!("Dimensions:        {}", args.dim);
    println!("Algorithm:         {}", describe_algorithm(args));
    println!("Score:             {}", report.score);
    println!("Fold:              {}", format_fold(&report.hash));
    println!("Bonds:             {}", format_bonds(&report.bonds));
    println!("Aminos placed:     {}", report.aminos_placed);
    println!("Solutions checked: {}", report.solutions_checked);

    if args.grid {
        match crate::utils::render::render_2d(&lattice) {
            Some(grid) => println!("\n{grid}"),
            None => println!("(grid rendering is only available for 2D lattices)"),
        }
    }
    Ok(())
}

fn resolve_algorithm(args: &FoldArgs) -> Algorithm {
    match args.algorithm {
        AlgorithmArg::DepthFirst => Algorithm::DepthFirst,
        AlgorithmArg::DepthFirstBnb => Algorithm::DepthFirstBnb {
            prune: match args.prune {
                PruneArg::Naive => Prune::Naive,
                PruneArg::Reach => Prune::Reach,
            },
        },
        AlgorithmArg::BeamSearch => Algorithm::BeamSearch {
            beam_width: args.beam_width,
        },
        AlgorithmArg::BestFirstBnb => Algorithm::BestFirstBnb,
    }
}

fn describe_algorithm(args: &FoldArgs) -> String {
    match args.algorithm {
        AlgorithmArg::DepthFirst => "depth_first".to_string(),
        AlgorithmArg::DepthFirstBnb => match args.prune {
            PruneArg::Naive => "depth_first_bnb (naive bound)".to_string(),
            PruneArg::Reach => "depth_first_bnb (reach bound)".to_string(),
        },
        AlgorithmArg::BeamSearch => format!("beam_search (width {})", args.beam_width),
        AlgorithmArg::BestFirstBnb => "best_first_bnb".to_string(),
    }
}

fn format_fold(hash: &[i32]) -> String {
    let moves: Vec<String> = hash.iter().map(|m| m.to_string()).collect();
    format!("[{}]", moves.join(", "))
}

fn format_bonds(bonds: &[(usize, usize)]) -> String {
    if bonds.is_empty() {
        return "none".to_string();
    }
    let pairs: Vec<String> = bonds
        .iter()
        .filter(|(i, j)| i < j)
        .map(|(i, j)| format!("({i}, {j})"))
        .collect();
    pairs.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bonds_are_printed_once_per_contact() {
        let bonds = vec![(0, 3), (0, 7), (3, 0), (7, 0)];
        assert_eq!(format_bonds(&bonds), "(0, 3), (0, 7)");
        assert_eq!(format_bonds(&[]), "none");
    }

    #[test]
    fn folds_are_printed_as_move_lists() {
        assert_eq!(format_fold(&[-1, 2, -2]), "[-1, 2, -2]");
        assert_eq!(format_fold(&[]), "[]");
    }
}
