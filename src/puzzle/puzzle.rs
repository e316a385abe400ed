//! Puzzle definitions and the live puzzle state built from them

use super::Category;
use crate::logic::{
    factorial, variables_needed, EngineOptions, Expression, ItemRef, LogicEngine,
    PermutationCache, VariableStatus,
};
use crate::parse::{is_reserved, ParseError, Parser};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Everything needed to set up a puzzle, as stored in puzzle files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleDefinition {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub categories: Vec<Category>,
    /// One parse-string per variable, in variable order. Generated from the
    /// item names when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parse_strings: Option<Vec<String>>,
    #[serde(default)]
    pub clues: Vec<String>,
}

impl PuzzleDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>, categories: Vec<Category>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            categories,
            parse_strings: None,
            clues: Vec::new(),
        }
    }

    pub fn with_parse_strings<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parse_strings = Some(tokens.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_clues<I, S>(mut self, clues: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.clues = clues.into_iter().map(Into::into).collect();
        self
    }

    pub fn items_per_category(&self) -> usize {
        self.categories.first().map(Category::len).unwrap_or(0)
    }

    pub fn variable_count(&self) -> usize {
        variables_needed(self.categories.len(), self.items_per_category())
    }

    /// Size of the initial candidate pool, or `None` if it overflows
    pub fn candidate_count(&self) -> Option<usize> {
        if self.categories.len() < 2 {
            return Some(0);
        }
        initial_candidates(self.categories.len(), self.items_per_category())
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            anyhow::bail!("Puzzle name cannot be empty");
        }
        if self.categories.len() < 2 {
            anyhow::bail!(
                "Puzzle '{}' has {} categories, at least 2 are required",
                self.name,
                self.categories.len()
            );
        }
        for category in &self.categories {
            category
                .validate()
                .with_context(|| format!("Invalid category in puzzle '{}'", self.name))?;
        }

        let items = self.items_per_category();
        if let Some(category) = self.categories.iter().find(|c| c.len() != items) {
            anyhow::bail!(
                "Category '{}' has {} items but '{}' has {}; all categories must be the same size",
                category.name,
                category.len(),
                self.categories[0].name,
                items
            );
        }

        if let Some(tokens) = &self.parse_strings {
            if tokens.len() != self.variable_count() {
                anyhow::bail!(
                    "Puzzle '{}' lists {} parse-strings but needs exactly {}",
                    self.name,
                    tokens.len(),
                    self.variable_count()
                );
            }
        }
        Ok(())
    }

    /// The explicit parse-strings, or ones generated from the item names
    pub fn resolved_parse_strings(&self) -> Vec<String> {
        match &self.parse_strings {
            Some(tokens) => tokens.clone(),
            None => default_parse_strings(&self.categories),
        }
    }
}

/// `items!^(categories - 1)`, or `None` when it does not fit in a `usize`
pub(crate) fn initial_candidates(categories: usize, items: usize) -> Option<usize> {
    if categories == 0 || items > 20 {
        return None;
    }
    let exponent = u32::try_from(categories - 1).ok()?;
    factorial(items).checked_pow(exponent)
}

/// Parse-strings of the form `<row item>/<column item>` for every variable
///
/// Whitespace inside item names becomes `_` and reserved characters are dropped.
pub fn default_parse_strings(categories: &[Category]) -> Vec<String> {
    let Some(first) = categories.first() else {
        return Vec::new();
    };
    let layout = crate::logic::VariableLayout::new(categories.len(), first.len());

    (0..layout.variable_count())
        .map(|variable| {
            let (row, column) = layout.pair_of(variable);
            format!(
                "{}/{}",
                token_fragment(categories[row.category].item(row.item)),
                token_fragment(categories[column.category].item(column.item))
            )
        })
        .collect()
}

fn token_fragment(item: &str) -> String {
    item.trim()
        .chars()
        .filter_map(|ch| {
            if ch.is_whitespace() {
                Some('_')
            } else if is_reserved(ch) {
                None
            } else {
                Some(ch)
            }
        })
        .collect()
}

/// A puzzle being solved: its categories, clue vocabulary and engine
#[derive(Debug, Clone)]
pub struct Puzzle {
    name: String,
    description: String,
    categories: Vec<Category>,
    parser: Parser,
    engine: LogicEngine,
}

impl Puzzle {
    pub fn new(definition: &PuzzleDefinition) -> Result<Self> {
        Self::with_options(definition, EngineOptions::default())
    }

    pub fn with_options(definition: &PuzzleDefinition, options: EngineOptions) -> Result<Self> {
        Self::build(definition, options, &mut PermutationCache::new())
    }

    /// Build the puzzle, sharing permutation lists through `cache`
    pub fn build(
        definition: &PuzzleDefinition,
        options: EngineOptions,
        cache: &mut PermutationCache,
    ) -> Result<Self> {
        definition.validate()?;

        let tokens = definition.resolved_parse_strings();
        let parser = Parser::from_tokens(tokens)
            .with_context(|| format!("Invalid parse-strings for puzzle '{}'", definition.name))?;
        if parser.len() != definition.variable_count() {
            anyhow::bail!(
                "Puzzle '{}' has {} distinct parse-strings for {} variables; parse-strings must be unique",
                definition.name,
                parser.len(),
                definition.variable_count()
            );
        }

        let engine = LogicEngine::with_cache(
            definition.categories.len(),
            definition.items_per_category(),
            cache,
        )
        .with_options(options);

        log::info!(
            "Opened puzzle '{}' with {} categories of {} items",
            definition.name,
            definition.categories.len(),
            definition.items_per_category()
        );

        Ok(Self {
            name: definition.name.clone(),
            description: definition.description.clone(),
            categories: definition.categories.clone(),
            parser,
            engine,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category(&self, index: usize) -> &Category {
        &self.categories[index]
    }

    pub fn num_categories(&self) -> usize {
        self.categories.len()
    }

    pub fn items_per_category(&self) -> usize {
        self.engine.items_per_category()
    }

    pub fn variable_count(&self) -> usize {
        self.engine.variable_count()
    }

    pub fn candidate_count(&self) -> usize {
        self.engine.candidate_count()
    }

    pub fn parser(&self) -> &Parser {
        &self.parser
    }

    pub fn engine(&self) -> &LogicEngine {
        &self.engine
    }

    /// Apply an already-parsed clue; `false` if it contradicts earlier clues
    pub fn apply_clue(&mut self, clue: &Expression) -> bool {
        self.engine.evaluate_clue(clue)
    }

    /// Parse `text` with this puzzle's vocabulary and apply it
    pub fn assess(&mut self, text: &str) -> Result<bool, ParseError> {
        let clue = self.parser.parse(text)?;
        Ok(self.apply_clue(&clue))
    }

    pub fn solved(&self) -> bool {
        self.engine.solved()
    }

    pub fn status(&self, variable: usize) -> VariableStatus {
        self.engine.status(variable)
    }

    pub fn statuses(&self) -> Vec<VariableStatus> {
        self.engine.statuses()
    }

    /// The two items a variable relates, as (row item, column item) of the grid
    pub fn variable_pair(&self, variable: usize) -> (ItemRef, ItemRef) {
        self.engine.layout().pair_of(variable)
    }

    pub fn item_name(&self, item: ItemRef) -> &str {
        self.categories[item.category].item(item.item)
    }

    /// Reconstruct a definition for this puzzle with the given clue list
    pub fn to_definition(&self, clues: Vec<String>) -> PuzzleDefinition {
        let mut tokens = vec![String::new(); self.variable_count()];
        for (index, token) in self.parser.entries() {
            tokens[index] = token.to_string();
        }

        PuzzleDefinition {
            name: self.name.clone(),
            description: self.description.clone(),
            categories: self.categories.clone(),
            parse_strings: Some(tokens),
            clues,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn categories() -> Vec<Category> {
        vec![
            Category::new("Name", ["Ann", "Bob", "Cal"]).unwrap(),
            Category::new("Pet", ["Dog", "Cat", "Pet Rock"]).unwrap(),
            Category::new("Drink", ["Tea", "Milk", "Gin+Tonic"]).unwrap(),
        ]
    }

    fn numbered_definition() -> PuzzleDefinition {
        PuzzleDefinition::new("Numbers", "Variables named by index", categories())
            .with_parse_strings((0..27).map(|i| i.to_string()))
    }

    #[test]
    fn test_default_parse_strings() {
        let tokens = default_parse_strings(&categories());
        assert_eq!(tokens.len(), 27);
        assert_eq!(tokens[0], "Ann/Dog");
        assert_eq!(tokens[5], "Ann/GinTonic");
        assert_eq!(tokens[8], "Bob/Pet_Rock");
        assert_eq!(tokens[18], "Tea/Dog");
        assert_eq!(tokens[26], "GinTonic/Pet_Rock");
    }

    #[test]
    fn test_puzzle_with_generated_vocabulary() {
        let definition = PuzzleDefinition::new("Pets", "", categories());
        let mut puzzle = Puzzle::new(&definition).unwrap();
        assert_eq!(puzzle.variable_count(), 27);
        assert_eq!(puzzle.candidate_count(), 36);

        assert_eq!(puzzle.assess("Ann/Dog * Bob/Cat"), Ok(true));
        assert_eq!(puzzle.status(0), VariableStatus::True);
        assert_eq!(puzzle.status(7), VariableStatus::True);
        assert_eq!(puzzle.status(14), VariableStatus::True);
        assert_eq!(puzzle.status(1), VariableStatus::False);
    }

    #[test]
    fn test_assess_reports_parse_errors() {
        let mut puzzle = Puzzle::new(&numbered_definition()).unwrap();
        assert_eq!(
            puzzle.assess("27"),
            Err(ParseError::UnrecognizedVariable("27".to_string()))
        );
        assert_eq!(puzzle.assess("(3 + 4"), Err(ParseError::UnmatchedGroup));
        assert_eq!(puzzle.candidate_count(), 36);
    }

    #[test]
    fn test_assess_solves_puzzle() {
        let mut puzzle = Puzzle::new(&numbered_definition()).unwrap();
        assert_eq!(puzzle.assess("6 + 8"), Ok(true));
        assert_eq!(puzzle.assess("((~2 * ~22) * 4)"), Ok(true));
        assert!(!puzzle.solved());
        assert_eq!(puzzle.assess("~4"), Ok(false));
        assert_eq!(puzzle.assess("17 > 14"), Ok(true));
        assert!(puzzle.solved());
        assert_eq!(puzzle.candidate_count(), 1);
    }

    #[test]
    fn test_variable_pair_names() {
        let puzzle = Puzzle::new(&numbered_definition()).unwrap();
        let (row, column) = puzzle.variable_pair(19);
        assert_eq!(puzzle.item_name(row), "Tea");
        assert_eq!(puzzle.item_name(column), "Cat");
    }

    #[test]
    fn test_validation_failures() {
        let mut uneven = categories();
        uneven[2] = Category::new("Drink", ["Tea", "Milk"]).unwrap();
        assert!(Puzzle::new(&PuzzleDefinition::new("Uneven", "", uneven)).is_err());

        let single = vec![categories().remove(0)];
        assert!(Puzzle::new(&PuzzleDefinition::new("Single", "", single)).is_err());

        assert!(Puzzle::new(&PuzzleDefinition::new("  ", "", categories())).is_err());

        let short = PuzzleDefinition::new("Short", "", categories())
            .with_parse_strings(["a", "b"]);
        assert!(Puzzle::new(&short).is_err());

        let duplicated = PuzzleDefinition::new("Dup", "", categories())
            .with_parse_strings((0..27).map(|i| (i % 26).to_string()));
        assert!(Puzzle::new(&duplicated).is_err());

        let reserved = PuzzleDefinition::new("Reserved", "", categories())
            .with_parse_strings((0..27).map(|i| format!("v {}", i)));
        assert!(Puzzle::new(&reserved).is_err());
    }

    #[test]
    fn test_candidate_count_estimate() {
        let definition = numbered_definition();
        assert_eq!(definition.candidate_count(), Some(36));

        let big = PuzzleDefinition::new(
            "Big",
            "",
            (0..6)
                .map(|c| Category::new(format!("C{}", c), (0..12).map(|i| format!("i{}", i))).unwrap())
                .collect(),
        );
        assert_eq!(big.candidate_count(), None);

        assert_eq!(initial_candidates(4, 4), Some(13824));
        assert_eq!(initial_candidates(99_999_999_999, 2), None);
        assert_eq!(initial_candidates(2, 21), None);
    }

    #[test]
    fn test_to_definition_round_trip() {
        let puzzle = Puzzle::new(&numbered_definition()).unwrap();
        let definition = puzzle.to_definition(vec!["6 + 8".to_string()]);
        assert_eq!(definition.parse_strings, numbered_definition().parse_strings);
        assert_eq!(definition.clues, vec!["6 + 8".to_string()]);
    }
}
