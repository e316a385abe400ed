//! Puzzles, their files, and solving sessions

pub mod category;
pub mod groups;
pub mod io;
#[allow(clippy::module_inception)]
pub mod puzzle;
pub mod report;
pub mod session;

pub use category::Category;
pub use groups::{known_groups, Group};
pub use io::{
    create_example_puzzles, load_puzzle_from_file, parse_puzzle_from_str, parse_text_puzzle,
    save_puzzle_to_file,
};
pub use puzzle::{default_parse_strings, Puzzle, PuzzleDefinition};
pub use report::{ClueOutcome, ClueResult, SolveReport};
pub use session::{Command, Reply, Session};
