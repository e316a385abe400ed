//! An interactive solving session over a single puzzle

use super::{load_puzzle_from_file, ClueOutcome, ClueResult, Puzzle, PuzzleDefinition, SolveReport};
use crate::config::{Settings, ViewKind};
use crate::utils::render_view;
use anyhow::{Context, Result};
use std::fmt;

/// A single command typed at the session prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Evaluate a clue; `None` when the clue text follows on the next line
    Evaluate(Option<String>),
    Grid,
    Summary,
    /// Grid followed by summary
    Print,
    Vocabulary,
    Help,
    Quit,
}

impl Command {
    /// Parse a command line such as `e A * B`, `g` or `q`
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word.to_ascii_lowercase().as_str() {
            "e" => {
                let clue = (!rest.is_empty()).then(|| rest.to_string());
                return Ok(Command::Evaluate(clue));
            }
            "g" => Command::Grid,
            "s" => Command::Summary,
            "p" => Command::Print,
            "v" => Command::Vocabulary,
            "h" | "?" => Command::Help,
            "q" => Command::Quit,
            "" => anyhow::bail!("No command given"),
            other => anyhow::bail!("Invalid command '{}'", other),
        };

        if !rest.is_empty() {
            anyhow::bail!("Command '{}' takes no arguments", word);
        }
        Ok(command)
    }

    pub fn help() -> &'static str {
        "Commands:\n  e <clue>  evaluate a clue\n  g         show the grid\n  s         show the summary\n  p         show grid and summary\n  v         list parse-strings\n  h         show this help\n  q         quit\n"
    }
}

/// Result of handling a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Output(String),
    Outcome(ClueOutcome),
    /// The clue text still has to be read
    NeedClue,
    Quit,
}

/// Owns a puzzle, the clues submitted to it and the views configured for it
pub struct Session {
    settings: Settings,
    puzzle: Puzzle,
    puzzle_clues: Vec<String>,
    history: Vec<ClueOutcome>,
}

impl Session {
    /// Open the puzzle named in the settings
    pub fn new(settings: Settings) -> Result<Self> {
        let definition = load_puzzle_from_file(&settings.input.puzzle_file)
            .context("Failed to load puzzle file")?;
        Self::with_definition(settings, &definition)
    }

    /// Open a session on an explicit puzzle definition
    pub fn with_definition(settings: Settings, definition: &PuzzleDefinition) -> Result<Self> {
        definition.validate()?;

        match definition.candidate_count() {
            Some(count) if count <= settings.engine.max_candidates => {
                log::debug!("Puzzle '{}' starts with {} candidates", definition.name, count);
            }
            Some(count) => anyhow::bail!(
                "Puzzle '{}' has {} candidate solutions, above the configured limit of {}",
                definition.name,
                count,
                settings.engine.max_candidates
            ),
            None => anyhow::bail!(
                "Puzzle '{}' is too large to enumerate",
                definition.name
            ),
        }

        let puzzle = Puzzle::with_options(definition, settings.engine.options())?;

        Ok(Self {
            settings,
            puzzle,
            puzzle_clues: definition.clues.clone(),
            history: Vec::new(),
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn puzzle(&self) -> &Puzzle {
        &self.puzzle
    }

    /// Every clue submitted so far, in order
    pub fn history(&self) -> &[ClueOutcome] {
        &self.history
    }

    /// Clues listed in the puzzle file
    pub fn puzzle_clues(&self) -> &[String] {
        &self.puzzle_clues
    }

    /// Submit every clue from the puzzle file, returning their outcomes
    pub fn apply_puzzle_clues(&mut self) -> Vec<ClueOutcome> {
        let clues = self.puzzle_clues.clone();
        clues.iter().map(|clue| self.evaluate(clue)).collect()
    }

    /// Parse and apply a clue, recording the outcome
    pub fn evaluate(&mut self, text: &str) -> ClueOutcome {
        let result = match self.puzzle.assess(text) {
            Ok(true) => ClueResult::Accepted,
            Ok(false) => ClueResult::Inconsistent,
            Err(err) => {
                log::warn!("Rejected clue '{}': {}", text, err);
                ClueResult::Rejected {
                    reason: err.to_string(),
                }
            }
        };

        let outcome = ClueOutcome {
            clue: text.trim().to_string(),
            result,
        };
        self.history.push(outcome.clone());
        outcome
    }

    pub fn render(&self, kind: ViewKind) -> String {
        render_view(kind, &self.puzzle)
    }

    /// All configured views, separated by blank lines
    pub fn render_views(&self) -> String {
        self.settings
            .display
            .views
            .iter()
            .map(|&kind| self.render(kind))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn vocabulary(&self) -> String {
        self.puzzle.parser().to_string()
    }

    pub fn report(&self) -> SolveReport {
        SolveReport::new(&self.puzzle, &self.history)
    }

    pub fn handle(&mut self, command: Command) -> Reply {
        match command {
            Command::Evaluate(Some(clue)) => Reply::Outcome(self.evaluate(&clue)),
            Command::Evaluate(None) => Reply::NeedClue,
            Command::Grid => Reply::Output(self.render(ViewKind::Grid)),
            Command::Summary => Reply::Output(self.render(ViewKind::Summary)),
            Command::Print => Reply::Output(format!(
                "{}\n{}",
                self.render(ViewKind::Grid),
                self.render(ViewKind::Summary)
            )),
            Command::Vocabulary => Reply::Output(self.vocabulary()),
            Command::Help => Reply::Output(Command::help().to_string()),
            Command::Quit => Reply::Quit,
        }
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Puzzle: {}", self.puzzle.name())?;
        if !self.puzzle.description().is_empty() {
            writeln!(f, "{}", self.puzzle.description())?;
        }
        for category in self.puzzle.categories() {
            writeln!(f, "  {}", category)?;
        }
        writeln!(
            f,
            "{} variables, {} candidates remaining",
            self.puzzle.variable_count(),
            self.puzzle.candidate_count()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::io::{numbered_puzzle, pet_owners_puzzle, save_puzzle_to_file};
    use tempfile::tempdir;

    fn session() -> Session {
        Session::with_definition(Settings::default(), &numbered_puzzle().unwrap()).unwrap()
    }

    #[test]
    fn test_command_parsing() {
        assert_eq!(
            Command::parse("e A * B").unwrap(),
            Command::Evaluate(Some("A * B".to_string()))
        );
        assert_eq!(Command::parse("E").unwrap(), Command::Evaluate(None));
        assert_eq!(Command::parse(" g ").unwrap(), Command::Grid);
        assert_eq!(Command::parse("S").unwrap(), Command::Summary);
        assert_eq!(Command::parse("p").unwrap(), Command::Print);
        assert_eq!(Command::parse("v").unwrap(), Command::Vocabulary);
        assert_eq!(Command::parse("q").unwrap(), Command::Quit);
        assert!(Command::parse("").is_err());
        assert!(Command::parse("x").is_err());
        assert!(Command::parse("grid").is_err());
        assert!(Command::parse("g now").is_err());
    }

    #[test]
    fn test_evaluate_records_history() {
        let mut session = session();
        assert!(session.evaluate("6 + 8").is_accepted());
        assert_eq!(session.evaluate("(6 +").result, ClueResult::Rejected {
            reason: "clue ended unexpectedly".to_string()
        });
        assert!(session.evaluate("4").is_accepted());
        assert_eq!(session.evaluate("~4").result, ClueResult::Inconsistent);

        let clues: Vec<_> = session.history().iter().map(|o| o.clue.as_str()).collect();
        assert_eq!(clues, vec!["6 + 8", "(6 +", "4", "~4"]);
    }

    #[test]
    fn test_apply_puzzle_clues() {
        let mut session = session();
        let outcomes = session.apply_puzzle_clues();
        assert_eq!(outcomes.len(), 3);
        assert!(outcomes.iter().all(ClueOutcome::is_accepted));
        assert!(session.puzzle().solved());

        let report = session.report();
        assert!(report.solved);
        assert_eq!(report.clues.len(), 3);
    }

    #[test]
    fn test_handle_commands() {
        let mut session = session();
        assert_eq!(session.handle(Command::Evaluate(None)), Reply::NeedClue);
        assert_eq!(session.handle(Command::Quit), Reply::Quit);

        match session.handle(Command::Print) {
            Reply::Output(text) => {
                assert!(text.contains("Grid View: Numbered"));
                assert!(text.contains("There are not yet any groups"));
            }
            other => panic!("unexpected reply {:?}", other),
        }

        match session.handle(Command::Vocabulary) {
            Reply::Output(text) => assert!(text.starts_with(" 0: 0\n")),
            other => panic!("unexpected reply {:?}", other),
        }

        match session.handle(Command::Evaluate(Some("0".to_string()))) {
            Reply::Outcome(outcome) => assert!(outcome.is_accepted()),
            other => panic!("unexpected reply {:?}", other),
        }
    }

    #[test]
    fn test_render_configured_views() {
        let mut settings = Settings::default();
        settings.display.views = vec![ViewKind::Summary];
        let session = Session::with_definition(settings, &numbered_puzzle().unwrap()).unwrap();
        let text = session.render_views();
        assert!(text.starts_with("Summary View"));
        assert!(!text.contains("Grid View"));
    }

    #[test]
    fn test_candidate_limit() {
        let mut settings = Settings::default();
        settings.engine.max_candidates = 1000;
        assert!(Session::with_definition(settings.clone(), &numbered_puzzle().unwrap()).is_ok());
        assert!(Session::with_definition(settings, &pet_owners_puzzle().unwrap()).is_err());
    }

    #[test]
    fn test_session_from_settings() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("pets.yaml");
        save_puzzle_to_file(&pet_owners_puzzle().unwrap(), &path).unwrap();

        let mut settings = Settings::default();
        settings.input.puzzle_file = path;
        settings.engine.parallel_evaluation = true;
        let mut session = Session::new(settings).unwrap();
        assert_eq!(session.puzzle_clues().len(), 12);

        session.apply_puzzle_clues();
        assert!(session.puzzle().solved());
        assert!(session.to_string().starts_with("Puzzle: Pet Owners\n"));
    }
}
