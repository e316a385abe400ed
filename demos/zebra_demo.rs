//! Walk through the bundled pet-owners puzzle one clue at a time
//!
//! Each clue is parsed, applied, and followed by the number of candidate
//! solutions still alive. The views are printed once the puzzle is solved.

use logic_grid_solver::puzzle::io::pet_owners_puzzle;
use logic_grid_solver::utils::{GridView, SummaryView};
use logic_grid_solver::Puzzle;
use std::time::Instant;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Logic Grid Demonstration ===\n");

    let definition = pet_owners_puzzle()?;
    let mut puzzle = Puzzle::new(&definition)?;
    println!(
        "{}: {} categories of {} items, {} variables, {} candidates\n",
        puzzle.name(),
        puzzle.num_categories(),
        puzzle.items_per_category(),
        puzzle.variable_count(),
        puzzle.candidate_count()
    );

    let start = Instant::now();
    for clue in &definition.clues {
        let consistent = puzzle.assess(clue)?;
        if consistent {
            println!("  ✅ {:<32} {:>6} candidates", clue, puzzle.candidate_count());
        } else {
            println!("  ❌ {:<32} inconsistent, ignored", clue);
        }
    }
    println!("\n  ⏱️  {:.3}ms\n", start.elapsed().as_secs_f64() * 1000.0);

    // A clue that contradicts the solution is rejected without touching the pool
    let before = puzzle.candidate_count();
    println!("Trying a contradiction: Alice/Cat");
    assert!(!puzzle.assess("Alice/Cat")?);
    assert_eq!(puzzle.candidate_count(), before);

    println!("\n{}", GridView::render(&puzzle));
    println!("{}", SummaryView::render(&puzzle));

    if !puzzle.solved() {
        return Err("Expected the bundled clues to solve the puzzle".into());
    }
    println!("✅ Puzzle solved!");
    Ok(())
}
