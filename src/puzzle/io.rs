//! Loading and saving puzzle definitions
//!
//! Two formats are understood. YAML files hold a serialized
//! [`PuzzleDefinition`]. Plain `.txt` files use a line-based layout:
//!
//! ```text
//! <puzzle name>
//! <description>
//! <number of categories>
//! <items per category>
//! <category name>          (repeated for every category)
//! <item name>              (one line per item)
//! <parse-string> ...       (one per variable, separated by whitespace)
//! <clue>                   (optional, one per line)
//! ```
//!
//! Blank lines are ignored wherever a line is expected.

use super::puzzle::initial_candidates;
use super::{Category, PuzzleDefinition};
use crate::logic::VariableLayout;
use anyhow::{Context, Result};
use std::path::Path;

/// Load a puzzle definition, picking the format from the file extension
pub fn load_puzzle_from_file<P: AsRef<Path>>(path: P) -> Result<PuzzleDefinition> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read puzzle file: {}", path.display()))?;

    let definition = if is_text_file(path) {
        parse_text_puzzle(&content)
    } else {
        parse_puzzle_from_str(&content)
    }
    .with_context(|| format!("Failed to parse puzzle file: {}", path.display()))?;

    log::debug!(
        "Loaded puzzle '{}' from {}",
        definition.name,
        path.display()
    );
    Ok(definition)
}

/// Parse a YAML puzzle definition
pub fn parse_puzzle_from_str(content: &str) -> Result<PuzzleDefinition> {
    let definition: PuzzleDefinition =
        serde_yaml::from_str(content).context("Invalid puzzle definition")?;
    definition.validate()?;
    Ok(definition)
}

/// Parse the line-based text format described in the module docs
pub fn parse_text_puzzle(content: &str) -> Result<PuzzleDefinition> {
    let mut cursor = TextCursor::new(content);

    let name = cursor.line("the puzzle name")?.to_string();
    let description = cursor.line("the puzzle description")?.to_string();
    let category_count = cursor.number("the number of categories")?;
    let items_per_category = cursor.number("the number of items per category")?;
    check_puzzle_size(category_count, items_per_category)?;

    let mut categories = Vec::with_capacity(category_count);
    for index in 0..category_count {
        let category_name = cursor.line(&format!("the name of category {}", index + 1))?;
        let items = (0..items_per_category)
            .map(|item| {
                cursor
                    .line(&format!("item {} of category '{}'", item + 1, category_name))
                    .map(str::to_string)
            })
            .collect::<Result<Vec<_>>>()?;
        categories.push(Category::new(category_name, items)?);
    }

    let mut definition = PuzzleDefinition::new(name, description, categories);
    definition.validate()?;

    let parse_strings = (0..definition.variable_count())
        .map(|variable| {
            cursor
                .word(&format!("parse-string {}", variable))
                .map(str::to_string)
        })
        .collect::<Result<Vec<_>>>()?;
    definition.parse_strings = Some(parse_strings);
    definition.clues = cursor.remaining_lines().map(str::to_string).collect();

    definition.validate()?;
    Ok(definition)
}

/// Reject category and item counts that cannot describe a solvable puzzle
fn check_puzzle_size(categories: usize, items: usize) -> Result<()> {
    if categories < 2 {
        anyhow::bail!("Puzzle has {} categories, at least 2 are required", categories);
    }
    if items < 2 {
        anyhow::bail!("Puzzle has {} items per category, at least 2 are required", items);
    }
    if initial_candidates(categories, items).is_none() {
        anyhow::bail!(
            "Puzzle with {} categories of {} items is too large to enumerate",
            categories,
            items
        );
    }
    Ok(())
}

/// Save a puzzle definition, picking the format from the file extension
pub fn save_puzzle_to_file<P: AsRef<Path>>(definition: &PuzzleDefinition, path: P) -> Result<()> {
    let path = path.as_ref();
    let content = if is_text_file(path) {
        text_puzzle_to_string(definition)
    } else {
        serde_yaml::to_string(definition).context("Failed to serialize puzzle")?
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    std::fs::write(path, content)
        .with_context(|| format!("Failed to write puzzle file: {}", path.display()))?;

    Ok(())
}

/// Render a definition in the line-based text format
///
/// Parse-strings are written one grid row per line, row-blocks in grid order.
/// An empty description is replaced by the puzzle name, since blank lines are
/// skipped when reading.
pub fn text_puzzle_to_string(definition: &PuzzleDefinition) -> String {
    let mut output = String::new();
    let description = if definition.description.trim().is_empty() {
        &definition.name
    } else {
        &definition.description
    };

    output.push_str(&format!("{}\n{}\n", definition.name, description));
    output.push_str(&format!(
        "{}\n{}\n",
        definition.categories.len(),
        definition.items_per_category()
    ));
    for category in &definition.categories {
        output.push_str(&category.name);
        output.push('\n');
        for item in category {
            output.push_str(item);
            output.push('\n');
        }
    }

    let tokens = definition.resolved_parse_strings();
    let mut rest = tokens.as_slice();
    let items = definition.items_per_category();
    if definition.categories.len() >= 2 && items >= 2 {
        let layout = VariableLayout::new(definition.categories.len(), items);
        for row_category in layout.row_categories() {
            let width = layout.column_categories(row_category).len() * items;
            for _ in 0..items {
                let (row, tail) = rest.split_at(width.min(rest.len()));
                if !row.is_empty() {
                    output.push_str(&row.join(" "));
                    output.push('\n');
                }
                rest = tail;
            }
        }
    }
    if !rest.is_empty() {
        output.push_str(&rest.join(" "));
        output.push('\n');
    }
    for clue in &definition.clues {
        output.push_str(clue);
        output.push('\n');
    }
    output
}

fn is_text_file(path: &Path) -> bool {
    path.extension().map_or(false, |extension| extension == "txt")
}

/// Reads whole lines or whitespace-separated words from puzzle text
struct TextCursor<'a> {
    rest: &'a str,
}

impl<'a> TextCursor<'a> {
    fn new(content: &'a str) -> Self {
        Self { rest: content }
    }

    fn line(&mut self, what: &str) -> Result<&'a str> {
        let trimmed = self.rest.trim_start();
        if trimmed.is_empty() {
            anyhow::bail!("Unexpected end of puzzle while reading {}", what);
        }
        let (line, rest) = trimmed.split_once('\n').unwrap_or((trimmed, ""));
        self.rest = rest;
        Ok(line.trim_end())
    }

    fn word(&mut self, what: &str) -> Result<&'a str> {
        let trimmed = self.rest.trim_start();
        if trimmed.is_empty() {
            anyhow::bail!("Unexpected end of puzzle while reading {}", what);
        }
        let end = trimmed.find(char::is_whitespace).unwrap_or(trimmed.len());
        let (word, rest) = trimmed.split_at(end);
        self.rest = rest;
        Ok(word)
    }

    fn number(&mut self, what: &str) -> Result<usize> {
        let word = self.word(what)?;
        word.parse()
            .with_context(|| format!("Expected a number for {}, found '{}'", what, word))
    }

    fn remaining_lines(self) -> impl Iterator<Item = &'a str> {
        self.rest.lines().map(str::trim).filter(|line| !line.is_empty())
    }
}

/// The 4x4 pet owners puzzle, solvable from its own clues
pub fn pet_owners_puzzle() -> Result<PuzzleDefinition> {
    let categories = vec![
        Category::new("Owner", ["Alice", "Bruno", "Chen", "Dana"])?,
        Category::new("Pet", ["Cat", "Dog", "Fish", "Parrot"])?,
        Category::new("Drink", ["Coffee", "Tea", "Milk", "Juice"])?,
        Category::new("Color", ["Red", "Green", "Blue", "Yellow"])?,
    ];

    Ok(PuzzleDefinition::new(
        "Pet Owners",
        "Four neighbours each own one pet, prefer one drink and painted their door one color.",
        categories,
    )
    .with_clues([
        "(Alice/Dog + Alice/Cat)",
        "Red/Dog",
        "(Alice/Tea > Alice/Red)",
        "(~Bruno/Fish * ~Chen/Fish)",
        "Yellow/Coffee",
        "(Chen/Parrot ^ Chen/Cat)",
        "Dana/Green",
        "(Juice/Cat = Bruno/Juice)",
        "Tea/Dog",
        "(Bruno/Blue + Bruno/Red)",
        "(~Milk/Cat * ~Green/Parrot)",
        "(Dana/Milk * ~Alice/Yellow)",
    ]))
}

/// A 3x3 puzzle whose parse-strings are the variable indices themselves
pub fn numbered_puzzle() -> Result<PuzzleDefinition> {
    let categories = vec![
        Category::new("Person", ["Ann", "Bob", "Cal"])?,
        Category::new("Town", ["Oslo", "Lima", "Pune"])?,
        Category::new("Sport", ["Golf", "Judo", "Polo"])?,
    ];

    Ok(
        PuzzleDefinition::new("Numbered", "Clues refer to variables by index.", categories)
            .with_parse_strings((0..27).map(|index| index.to_string()))
            .with_clues(["6 + 8", "((~2 * ~22) * 4)", "17 > 14"]),
    )
}

/// Create example puzzle files for trying out the solver
pub fn create_example_puzzles<P: AsRef<Path>>(output_dir: P) -> Result<()> {
    let dir = output_dir.as_ref();
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    save_puzzle_to_file(&pet_owners_puzzle()?, dir.join("pet_owners.yaml"))
        .context("Failed to write pet_owners.yaml")?;
    save_puzzle_to_file(&numbered_puzzle()?, dir.join("numbered.txt"))
        .context("Failed to write numbered.txt")?;

    Ok(())
}
