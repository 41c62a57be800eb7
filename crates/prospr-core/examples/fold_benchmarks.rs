//! Fold two small benchmark chains with every search and print the results.
//!
//! Run with `cargo run --example fold_benchmarks`.

use prospr_core::core::models::lattice::Lattice;
use prospr_core::core::models::model::ModelTable;
use prospr_core::engine::bounds::Prune;
use prospr_core::engine::search::{beam_search, best_first_bnb, depth_first, depth_first_bnb};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    for (sequence, dim) in [("PHPHPHPPH", 2), ("HPPHPHPHPH", 3)] {
        println!("{sequence} in {dim}D:");

        let mut lattice = Lattice::new(sequence, dim, ModelTable::hp())?;
        depth_first(&mut lattice)?;
        println!("  depth_first          {lattice}");

        lattice.reset();
        depth_first_bnb(&mut lattice, Prune::Naive)?;
        println!("  depth_first_bnb      {lattice}");

        lattice.reset();
        depth_first_bnb(&mut lattice, Prune::Reach)?;
        println!("  depth_first_bnb/reach {lattice}");

        lattice.reset();
        best_first_bnb(&mut lattice)?;
        println!("  best_first_bnb       {lattice}");

        lattice.reset();
        beam_search(&mut lattice, 40)?;
        println!("  beam_search/40       {lattice}");
    }
    Ok(())
}
