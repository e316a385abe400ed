//! Display and output formatting utilities

use crate::config::{OutputFormat, ViewKind};
use crate::logic::VariableStatus;
use crate::puzzle::{known_groups, Puzzle, SolveReport};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

const TRUE_MARK: char = '+';
const FALSE_MARK: char = '×';
const UNKNOWN_MARK: char = ' ';
const HARD_BORDER: char = '|';
const SOFT_BORDER: char = '·';
const UNDER_BORDER: char = '-';
const HEADER_BORDER: char = '=';

const NO_GROUPS_MESSAGE: &str = "There are not yet any groups";
const ITEM_PADDING: usize = 3;
const MIN_ITEM_WIDTH: usize = 4;

/// Render a configured view of the puzzle
pub fn render_view(kind: ViewKind, puzzle: &Puzzle) -> String {
    match kind {
        ViewKind::Grid => GridView::render(puzzle),
        ViewKind::Summary => SummaryView::render(puzzle),
    }
}

/// The staircase grid of every variable
///
/// Rows are labelled with the items of category 0 followed by categories
/// `C-1` down to `2`; column labels are the items of categories `1..`,
/// written vertically.
pub struct GridView;

impl GridView {
    pub fn render(puzzle: &Puzzle) -> String {
        let categories = puzzle.num_categories();
        let items = puzzle.items_per_category();
        let statuses = puzzle.statuses();
        let label = |category: usize, item: usize| -> Vec<char> {
            puzzle.category(category).item(item).chars().collect()
        };

        let label_height = (1..categories)
            .map(|category| puzzle.category(category).widest_item())
            .max()
            .unwrap_or(0);
        let label_width = (0..categories)
            .filter(|&category| category != 1)
            .map(|category| puzzle.category(category).widest_item())
            .max()
            .unwrap_or(0)
            + 1;

        let mut output = String::new();
        output.push_str(&format!("Grid View: {}\n", puzzle.name()));
        let total_width = label_width
            + 1
            + categories
            + 3 * (categories - 1) * items
            + (categories - 1) * (items - 1);
        output.push_str(&repeat(HEADER_BORDER, total_width));
        output.push_str("\n\n");

        // Column labels, bottom-aligned and written top to bottom
        for position in 0..label_height {
            output.push_str(&" ".repeat(label_width));
            let mut printed_last = false;
            for category in 1..categories {
                for item in 0..items {
                    let text = label(category, item);
                    let letter = (position + text.len()).checked_sub(label_height);
                    let shown = letter.map_or(' ', |index| text[index]);

                    let border = if item == 0 {
                        HARD_BORDER
                    } else if !printed_last || letter.is_none() {
                        ' '
                    } else {
                        SOFT_BORDER
                    };
                    output.push(' ');
                    output.push(border);
                    output.push(' ');
                    output.push(shown);
                    printed_last = letter.is_some();
                }
            }
            output.push(' ');
            output.push(HARD_BORDER);
            output.push('\n');
        }
        output.push_str(&repeat(UNDER_BORDER, label_width + 4 * items * (categories - 1) + 2));
        output.push('\n');

        let mut variable = 0;
        for row_category in puzzle.engine().layout().row_categories() {
            let column_blocks = puzzle.engine().layout().column_categories(row_category).len();
            for item in 0..items {
                let text = puzzle.category(row_category).item(item);
                output.push_str(&" ".repeat(label_width - text.chars().count()));
                output.push_str(text);

                for _ in 0..column_blocks {
                    for column_item in 0..items {
                        let border = if column_item == 0 { HARD_BORDER } else { SOFT_BORDER };
                        output.push(' ');
                        output.push(border);
                        output.push(' ');
                        output.push(status_mark(statuses[variable]));
                        variable += 1;
                    }
                }
                output.push(' ');
                output.push(HARD_BORDER);
                output.push('\n');

                if item + 1 != items {
                    output.push_str(&repeat(SOFT_BORDER, label_width + 1));
                    output.push(HARD_BORDER);
                    for _ in 0..column_blocks {
                        output.push_str(&repeat(SOFT_BORDER, 4 * items - 1));
                        output.push(HARD_BORDER);
                    }
                    output.push('\n');
                }
            }
            output.push_str(&repeat(UNDER_BORDER, label_width + 4 * items * column_blocks + 2));
            output.push('\n');
        }

        output
    }
}

fn status_mark(status: VariableStatus) -> char {
    match status {
        VariableStatus::True => TRUE_MARK,
        VariableStatus::False => FALSE_MARK,
        VariableStatus::Unknown => UNKNOWN_MARK,
    }
}

fn repeat(ch: char, count: usize) -> String {
    std::iter::repeat(ch).take(count).collect()
}

/// One line per known group, items centred in a column per category
pub struct SummaryView;

impl SummaryView {
    pub fn render(puzzle: &Puzzle) -> String {
        let groups = known_groups(puzzle);
        let mut output = format!("Summary View: {}\n", puzzle.name());

        if groups.is_empty() {
            output.push_str(&repeat(HEADER_BORDER, NO_GROUPS_MESSAGE.len()));
            output.push('\n');
            output.push_str(NO_GROUPS_MESSAGE);
            output.push('\n');
            return output;
        }

        let categories = puzzle.num_categories();
        let widths: Vec<usize> = (0..categories)
            .map(|category| {
                groups
                    .iter()
                    .filter_map(|group| group.member(category))
                    .map(|member| member.chars().count())
                    .fold(MIN_ITEM_WIDTH, usize::max)
            })
            .collect();

        let total: usize = widths.iter().sum();
        output.push_str(&repeat(HEADER_BORDER, total + categories * ITEM_PADDING * 2 + 2));
        output.push('\n');

        for group in &groups {
            output.push('{');
            for (category, width) in widths.iter().enumerate() {
                let member = group.member(category).unwrap_or("");
                let space = 2 * ITEM_PADDING + width - member.chars().count();
                let before = space / 2;
                output.push_str(&" ".repeat(before));
                output.push_str(member);
                output.push_str(&" ".repeat(space - before));
            }
            output.push_str("}\n");
        }

        output
    }
}

/// Format and save solve reports
pub struct ReportFormatter;

impl ReportFormatter {
    /// Plain-text rendering of a report
    pub fn format_report(report: &SolveReport) -> String {
        let mut output = String::new();

        output.push_str(&format!("=== {} ===\n", report.puzzle));
        output.push_str(&format!(
            "Status: {}\n",
            if report.solved { "solved" } else { "unsolved" }
        ));
        output.push_str(&format!("Candidates remaining: {}\n", report.candidates_remaining));
        output.push_str(&format!(
            "Unknown variables: {} of {}\n",
            report.unknown_variables, report.variables
        ));

        output.push_str(&format!(
            "\nClues ({} of {} accepted):\n",
            report.accepted_count(),
            report.clues.len()
        ));
        for outcome in &report.clues {
            output.push_str(&format!("  {}\n", outcome));
        }

        output.push_str("\nGroups:\n");
        if report.groups.is_empty() {
            output.push_str(&format!("  {}\n", NO_GROUPS_MESSAGE));
        }
        for group in &report.groups {
            let members: Vec<&str> = group
                .members
                .iter()
                .map(|member| member.as_deref().unwrap_or("?"))
                .collect();
            output.push_str(&format!("  {}\n", members.join(" | ")));
        }

        output
    }

    /// Save a report into `output_dir`, returning the written path
    pub fn save_report<P: AsRef<Path>>(
        report: &SolveReport,
        output_dir: P,
        format: OutputFormat,
    ) -> Result<PathBuf> {
        let output_dir = output_dir.as_ref();
        std::fs::create_dir_all(output_dir)
            .with_context(|| format!("Failed to create directory: {}", output_dir.display()))?;

        let path = match format {
            OutputFormat::Text => {
                let path = output_dir.join(format!("{}.txt", report.file_stem()));
                std::fs::write(&path, Self::format_report(report))
                    .with_context(|| format!("Failed to write report: {}", path.display()))?;
                path
            }
            OutputFormat::Json => {
                let path = output_dir.join(format!("{}.json", report.file_stem()));
                report
                    .save_to_file(&path)
                    .with_context(|| format!("Failed to write report: {}", path.display()))?;
                path
            }
        };

        Ok(path)
    }
}

static COLOR_DISABLED: AtomicBool = AtomicBool::new(false);

/// Color output utilities
pub struct ColorOutput;

impl ColorOutput {
    /// Format text with color (if terminal supports it)
    pub fn colored(text: &str, color: Color) -> String {
        if Self::supports_color() {
            format!("\x1b[{}m{}\x1b[0m", color.code(), text)
        } else {
            text.to_string()
        }
    }

    /// Turn coloring off for the rest of the process
    pub fn disable() {
        COLOR_DISABLED.store(true, Ordering::Relaxed);
    }

    /// Check if terminal supports color
    fn supports_color() -> bool {
        !COLOR_DISABLED.load(Ordering::Relaxed)
            && std::env::var("NO_COLOR").is_err()
            && (std::env::var("TERM").unwrap_or_default() != "dumb")
    }

    /// Format success message
    pub fn success(text: &str) -> String {
        Self::colored(text, Color::Green)
    }

    /// Format error message
    pub fn error(text: &str) -> String {
        Self::colored(text, Color::Red)
    }

    /// Format warning message
    pub fn warning(text: &str) -> String {
        Self::colored(text, Color::Yellow)
    }

    /// Format info message
    pub fn info(text: &str) -> String {
        Self::colored(text, Color::Blue)
    }

    /// Format a prompt
    pub fn prompt(text: &str) -> String {
        Self::colored(text, Color::Cyan)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Color {
    Red,
    Green,
    Yellow,
    Blue,
    Cyan,
}

impl Color {
    fn code(self) -> u8 {
        match self {
            Color::Red => 31,
            Color::Green => 32,
            Color::Yellow => 33,
            Color::Blue => 34,
            Color::Cyan => 36,
        }
    }
}
