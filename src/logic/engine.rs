//! Candidate-elimination engine for logic-grid puzzles

use super::layout::{ItemRef, VariableLayout};
use super::permutations::PermutationCache;
use super::{Assignment, Expression};
use itertools::Itertools;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What is currently known about a single variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableStatus {
    /// False in every remaining candidate
    False,
    /// True in every remaining candidate
    True,
    /// True in some remaining candidates and false in others
    Unknown,
}

impl VariableStatus {
    pub fn is_known(self) -> bool {
        self != VariableStatus::Unknown
    }
}

impl fmt::Display for VariableStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            VariableStatus::False => 'F',
            VariableStatus::True => 'T',
            VariableStatus::Unknown => '?',
        };
        write!(f, "{}", symbol)
    }
}

/// Tuning knobs for clue evaluation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineOptions {
    /// Evaluate clues against candidates on the rayon thread pool
    pub parallel_evaluation: bool,
}

/// Tracks every solution still consistent with the clues applied so far
///
/// A candidate is a complete assignment of all variables in which each item
/// belongs to exactly one group. Clues only ever remove candidates. A clue that
/// would remove all of them is rejected and leaves the engine untouched.
#[derive(Debug, Clone)]
pub struct LogicEngine {
    layout: VariableLayout,
    candidates: Vec<Assignment>,
    true_counts: Vec<usize>,
    options: EngineOptions,
}

impl LogicEngine {
    /// Build the engine for `categories` categories of `items` items each
    pub fn new(categories: usize, items: usize) -> Self {
        Self::with_cache(categories, items, &mut PermutationCache::new())
    }

    /// Build the engine, reusing permutation lists from `cache`
    pub fn with_cache(categories: usize, items: usize, cache: &mut PermutationCache) -> Self {
        let layout = VariableLayout::new(categories, items);
        let variable_count = layout.variable_count();

        let product = cache.product(categories - 1, items);
        let mut candidates = Vec::with_capacity(product.len());
        let mut true_counts = vec![0usize; variable_count];

        for element in product.iter() {
            let mut candidate = Assignment::new(variable_count);
            for group in 0..items {
                let members = std::iter::once(ItemRef::new(0, group)).chain(
                    (1..categories).map(|category| {
                        ItemRef::new(category, element[(category - 1) * items + group])
                    }),
                );
                for (first, second) in members.tuple_combinations() {
                    let index = layout.pair_index(first, second);
                    candidate.set_true(index);
                    true_counts[index] += 1;
                }
            }
            candidates.push(candidate);
        }

        log::debug!(
            "Built engine for {}x{} puzzle: {} variables, {} candidates",
            categories,
            items,
            variable_count,
            candidates.len()
        );

        Self {
            layout,
            candidates,
            true_counts,
            options: EngineOptions::default(),
        }
    }

    pub fn with_options(mut self, options: EngineOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> EngineOptions {
        self.options
    }

    pub fn layout(&self) -> &VariableLayout {
        &self.layout
    }

    pub fn categories(&self) -> usize {
        self.layout.categories()
    }

    pub fn items_per_category(&self) -> usize {
        self.layout.items_per_category()
    }

    pub fn variable_count(&self) -> usize {
        self.true_counts.len()
    }

    /// Number of candidate solutions still alive
    pub fn candidate_count(&self) -> usize {
        self.candidates.len()
    }

    /// Number of live candidates in which `variable` is true
    pub fn true_count(&self, variable: usize) -> usize {
        self.check_variable(variable);
        self.true_counts[variable]
    }

    pub fn status(&self, variable: usize) -> VariableStatus {
        self.check_variable(variable);
        let count = self.true_counts[variable];
        if count == 0 {
            VariableStatus::False
        } else if count == self.candidates.len() {
            VariableStatus::True
        } else {
            VariableStatus::Unknown
        }
    }

    pub fn statuses(&self) -> Vec<VariableStatus> {
        (0..self.variable_count()).map(|v| self.status(v)).collect()
    }

    /// True when no variable is unknown
    pub fn solved(&self) -> bool {
        let total = self.candidates.len();
        self.true_counts
            .iter()
            .all(|&count| count == 0 || count == total)
    }

    /// Remove every candidate for which `clue` is false
    ///
    /// Returns `false`, changing nothing, if the clue contradicts the clues
    /// already applied (that is, no candidate satisfies it).
    pub fn evaluate_clue(&mut self, clue: &Expression) -> bool {
        assert!(
            clue.max_variable() < self.variable_count(),
            "clue references variable {} but the puzzle has {} variables",
            clue.max_variable(),
            self.variable_count()
        );

        let failing: Vec<bool> = if self.options.parallel_evaluation {
            self.candidates
                .par_iter()
                .map(|candidate| !clue.evaluate(candidate))
                .collect()
        } else {
            self.candidates
                .iter()
                .map(|candidate| !clue.evaluate(candidate))
                .collect()
        };

        let removals = failing.iter().filter(|&&fails| fails).count();
        log::trace!(
            "Clue {} eliminates {} of {} candidates",
            clue,
            removals,
            self.candidates.len()
        );

        if removals == self.candidates.len() {
            log::warn!("Clue {} is inconsistent with earlier clues", clue);
            return false;
        }

        for (candidate, _) in self
            .candidates
            .iter()
            .zip(&failing)
            .filter(|(_, &fails)| fails)
        {
            for variable in candidate.true_indices() {
                self.true_counts[variable] -= 1;
            }
        }

        let mut verdicts = failing.into_iter();
        self.candidates
            .retain(|_| !verdicts.next().unwrap_or(false));

        if removals > 0 {
            log::info!(
                "Clue {} applied, {} candidates remain",
                clue,
                self.candidates.len()
            );
        }
        if self.solved() {
            log::info!("Puzzle solved");
        }
        true
    }

    fn check_variable(&self, variable: usize) {
        assert!(
            variable < self.true_counts.len(),
            "variable index {} out of range ({} variables)",
            variable,
            self.true_counts.len()
        );
    }
}
