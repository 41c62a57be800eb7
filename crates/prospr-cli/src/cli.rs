use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

const ABOUT: &str = "prospr - Fold residue sequences on cubic lattices under HP-family contact \
                     models and search for minimum-energy conformations.";
const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = ABOUT,
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search for a minimum-energy conformation of a residue sequence.
    Fold(FoldArgs),
    /// Run the built-in end-to-end scenarios for one or all algorithms.
    Check(CheckArgs),
}

/// Arguments for the `fold` subcommand.
#[derive(Args, Debug)]
pub struct FoldArgs {
    /// The residue sequence to fold (e.g. "PHPHPHPPH").
    #[arg(short, long, required = true, value_name = "SEQUENCE")]
    pub sequence: String,

    /// Dimensionality of the lattice.
    #[arg(short, long, default_value_t = 2, value_name = "INT")]
    pub dim: usize,

    /// Energy model preset (HP or HPXN).
    #[arg(short, long, default_value = "HP", value_name = "NAME")]
    pub model: String,

    /// TOML file with an explicit bond table, overriding --model.
    ///
    /// Example file contents:
    ///
    ///   bond-symmetry = true
    ///
    ///   [bonds]
    ///   HH = -4
    ///   HP = -2
    #[arg(long, value_name = "PATH", conflicts_with = "model")]
    pub model_file: Option<PathBuf>,

    /// Search algorithm to run.
    #[arg(short, long, value_enum, default_value = "depth_first_bnb")]
    pub algorithm: AlgorithmArg,

    /// Bounding function for the branch-and-bound searches.
    #[arg(short, long, value_enum, default_value = "naive")]
    pub prune: PruneArg,

    /// Beam width for beam search; -1 keeps every candidate.
    #[arg(short, long, default_value_t = -1, allow_negative_numbers = true, value_name = "INT")]
    pub beam_width: i32,

    /// Draw the folded conformation as a character grid (2D only).
    #[arg(short, long)]
    pub grid: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlgorithmArg {
    #[value(name = "depth_first")]
    DepthFirst,
    #[value(name = "depth_first_bnb")]
    DepthFirstBnb,
    #[value(name = "beam_search")]
    BeamSearch,
    #[value(name = "best_first_bnb")]
    BestFirstBnb,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PruneArg {
    #[value(name = "naive")]
    Naive,
    #[value(name = "reach", alias = "reach_prune")]
    Reach,
}

/// Arguments for the `check` subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Algorithm to check (depth_first, depth_first_bnb or beam_search);
    /// all of them when omitted.
    #[arg(value_name = "ALGORITHM")]
    pub algorithm: Option<String>,
}
