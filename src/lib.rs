//! Logic-grid puzzle solver
//!
//! Clues are written in a small propositional language over "item A is paired with
//! item B" variables. Every clue filters a pool of candidate solutions, and the
//! puzzle is solved once exactly one candidate survives.

pub mod config;
pub mod logic;
pub mod parse;
pub mod puzzle;
pub mod utils;

pub use config::Settings;
pub use logic::{Expression, LogicEngine, VariableStatus};
pub use parse::{ParseError, Parser};
pub use puzzle::{Puzzle, PuzzleDefinition, Session, SolveReport};

use anyhow::Result;

/// Open the configured puzzle, apply every clue it lists and report the result
pub fn solve_puzzle(settings: Settings) -> Result<SolveReport> {
    let mut session = Session::new(settings)?;
    session.apply_puzzle_clues();
    Ok(session.report())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::create_example_puzzles;
    use tempfile::tempdir;

    #[test]
    fn test_solve_puzzle_from_settings() {
        let temp_dir = tempdir().unwrap();
        create_example_puzzles(temp_dir.path()).unwrap();

        let mut settings = Settings::default();
        settings.input.puzzle_file = temp_dir.path().join("numbered.txt");
        let report = solve_puzzle(settings).unwrap();

        assert!(report.solved);
        assert_eq!(report.candidates_remaining, 1);
        assert_eq!(report.accepted_count(), 3);
    }
}
