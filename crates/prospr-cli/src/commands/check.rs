//! Built-in end-to-end scenarios, runnable per algorithm or all at once.

use crate::cli::CheckArgs;
use crate::error::{CliError, Result};
use prospr_core::core::models::lattice::Lattice;
use prospr_core::core::models::model::ModelTable;
use prospr_core::engine::bounds::Prune;
use prospr_core::engine::search::{beam_search, depth_first, depth_first_bnb};

const SEQ_2D: &str = "PHPHPHPPH";
const SEQ_3D: &str = "HPPHPHPHPH";

pub fn run(args: &CheckArgs) -> Result<()> {
    match args.algorithm.as_deref() {
        None => {
            println!("Checking all algorithms..");
            check_depth_first()?;
            check_depth_first_bnb()?;
            check_beam_search()?;
        }
        Some("depth_first") => check_depth_first()?,
        Some("depth_first_bnb") => check_depth_first_bnb()?,
        Some("beam_search") => check_beam_search()?,
        Some(other) => {
            return Err(CliError::Argument(format!(
                "unknown algorithm '{other}', expected depth_first, depth_first_bnb or beam_search"
            )));
        }
    }
    println!("All checks passed.");
    Ok(())
}

fn hp_lattice(sequence: &str, dim: usize) -> Result<Lattice> {
    Ok(Lattice::new(sequence, dim, ModelTable::hp())?)
}

fn expect_score(context: &str, lattice: &Lattice, expected: i32) -> Result<()> {
    if lattice.score() != expected {
        return Err(CliError::Check(format!(
            "{context}: expected score {expected}, found {}",
            lattice.score()
        )));
    }
    println!("  {context}: score {expected} matches");
    Ok(())
}

fn expect_score_between(context: &str, lattice: &Lattice, range: (i32, i32)) -> Result<()> {
    let (lowest, highest) = range;
    if lattice.score() < lowest || lattice.score() > highest {
        return Err(CliError::Check(format!(
            "{context}: expected a score in [{lowest}, {highest}], found {}",
            lattice.score()
        )));
    }
    println!(
        "  {context}: score {} within [{lowest}, {highest}]",
        lattice.score()
    );
    Ok(())
}

fn check_depth_first() -> Result<()> {
    let mut lattice = hp_lattice(SEQ_2D, 2)?;
    depth_first(&mut lattice)?;
    expect_score("depth_first 2D", &lattice, -3)?;

    check_bond_reporting()?;

    let mut lattice = hp_lattice(SEQ_3D, 3)?;
    depth_first(&mut lattice)?;
    expect_score("depth_first 3D", &lattice, -4)
}

fn check_depth_first_bnb() -> Result<()> {
    let mut lattice = hp_lattice(SEQ_2D, 2)?;
    depth_first_bnb(&mut lattice, Prune::Naive)?;
    expect_score("depth_first_bnb naive 2D", &lattice, -3)?;

    let mut lattice = hp_lattice(SEQ_2D, 2)?;
    depth_first_bnb(&mut lattice, Prune::Reach)?;
    expect_score("depth_first_bnb reach 2D", &lattice, -3)?;

    let mut lattice = hp_lattice(SEQ_3D, 3)?;
    depth_first_bnb(&mut lattice, Prune::Naive)?;
    expect_score("depth_first_bnb naive 3D", &lattice, -4)
}

fn check_beam_search() -> Result<()> {
    let mut lattice = hp_lattice(SEQ_2D, 2)?;
    beam_search(&mut lattice, -1)?;
    expect_score("beam_search unbounded 2D", &lattice, -3)?;

    // Finite widths are heuristic: which equal-priority candidates survive
    // a full beam decides whether the last bond is reachable.
    let mut lattice = hp_lattice(SEQ_2D, 2)?;
    beam_search(&mut lattice, 40)?;
    expect_score_between("beam_search width 40 2D", &lattice, (-3, -2))?;

    let mut lattice = hp_lattice(SEQ_3D, 3)?;
    beam_search(&mut lattice, 10)?;
    expect_score_between("beam_search width 10 3D", &lattice, (-4, -3))?;

    let mut lattice = hp_lattice(SEQ_3D, 3)?;
    beam_search(&mut lattice, 5)?;
    expect_score_between("beam_search width 5 3D", &lattice, (-4, -3))
}

fn check_bond_reporting() -> Result<()> {
    let mut lattice = hp_lattice("HPPHPPHH", 2)?;
    lattice.set_hash(&[1, 2, -1, -1, -1, -2, 1], false)?;

    let bonds = lattice.get_bonds();
    for pair in [(0, 3), (0, 7), (3, 0), (7, 0)] {
        if !bonds.contains(&pair) {
            return Err(CliError::Check(format!(
                "bond reporting: missing pair {pair:?} in {bonds:?}"
            )));
        }
    }
    println!("  bond reporting: both orientations present");
    Ok(())
}
