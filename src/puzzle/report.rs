//! Serializable record of a solving session

use super::groups::{known_groups, Group};
use super::Puzzle;
use crate::logic::VariableStatus;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What happened when a clue was submitted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum ClueResult {
    /// The clue was consistent and has been applied
    Accepted,
    /// The clue contradicts earlier clues and was discarded
    Inconsistent,
    /// The clue text could not be parsed
    Rejected { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClueOutcome {
    pub clue: String,
    #[serde(flatten)]
    pub result: ClueResult,
}

impl ClueOutcome {
    pub fn is_accepted(&self) -> bool {
        self.result == ClueResult::Accepted
    }
}

impl fmt::Display for ClueOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.result {
            ClueResult::Accepted => write!(f, "accepted      {}", self.clue),
            ClueResult::Inconsistent => write!(f, "inconsistent  {}", self.clue),
            ClueResult::Rejected { reason } => write!(f, "rejected      {} ({})", self.clue, reason),
        }
    }
}

/// Final state of a puzzle together with the clue history that produced it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveReport {
    pub puzzle: String,
    pub solved: bool,
    pub candidates_remaining: usize,
    pub variables: usize,
    pub unknown_variables: usize,
    pub clues: Vec<ClueOutcome>,
    pub groups: Vec<Group>,
}

impl SolveReport {
    pub fn new(puzzle: &Puzzle, clues: &[ClueOutcome]) -> Self {
        let unknown_variables = puzzle
            .statuses()
            .into_iter()
            .filter(|status| *status == VariableStatus::Unknown)
            .count();

        Self {
            puzzle: puzzle.name().to_string(),
            solved: puzzle.solved(),
            candidates_remaining: puzzle.candidate_count(),
            variables: puzzle.variable_count(),
            unknown_variables,
            clues: clues.to_vec(),
            groups: known_groups(puzzle),
        }
    }

    pub fn accepted_count(&self) -> usize {
        self.clues.iter().filter(|outcome| outcome.is_accepted()).count()
    }

    /// Convert to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> anyhow::Result<()> {
        let json = self.to_json()?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn load_from_file<P: AsRef<std::path::Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_json(&content)?)
    }

    /// File name used when saving the report into an output directory
    pub fn file_stem(&self) -> String {
        let stem: String = self
            .puzzle
            .chars()
            .map(|ch| if ch.is_alphanumeric() { ch.to_ascii_lowercase() } else { '_' })
            .collect();
        format!("{}_report", stem)
    }
}
