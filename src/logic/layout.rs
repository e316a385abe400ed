//! Mapping between variable indices and pairs of puzzle items
//!
//! Variables are laid out like the classic staircase logic grid. Category 0
//! labels the first block of rows, followed by categories `C-1` down to `2`.
//! Each row-block spans the column categories `1..` up to (but excluding) its
//! own category, and every cell of the grid is one variable.

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// One item of one category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemRef {
    pub category: usize,
    pub item: usize,
}

impl ItemRef {
    pub fn new(category: usize, item: usize) -> Self {
        Self { category, item }
    }
}

/// Number of variables needed for `categories` categories of `items` items each
pub fn variables_needed(categories: usize, items: usize) -> usize {
    items * items * categories * (categories - 1) / 2
}

/// Deterministic bijection between variable indices and item pairs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariableLayout {
    categories: usize,
    items: usize,
}

impl VariableLayout {
    pub fn new(categories: usize, items: usize) -> Self {
        assert!(categories >= 2, "a puzzle needs at least two categories");
        assert!(items >= 2, "each category needs at least two items");
        Self { categories, items }
    }

    pub fn categories(&self) -> usize {
        self.categories
    }

    pub fn items_per_category(&self) -> usize {
        self.items
    }

    pub fn variable_count(&self) -> usize {
        variables_needed(self.categories, self.items)
    }

    /// Row categories in grid order: 0, then C-1 down to 2
    pub fn row_categories(&self) -> impl Iterator<Item = usize> {
        std::iter::once(0).chain((2..self.categories).rev())
    }

    /// Column categories paired with a row category, left to right
    pub fn column_categories(&self, row_category: usize) -> std::ops::Range<usize> {
        if row_category == 0 {
            1..self.categories
        } else {
            1..row_category
        }
    }

    /// Index of the variable stating that `first` and `second` share a group
    pub fn index_of(&self, first: ItemRef, second: ItemRef) -> Result<usize> {
        for item_ref in [first, second] {
            if item_ref.category >= self.categories {
                anyhow::bail!(
                    "Category {} out of bounds (categories: {})",
                    item_ref.category,
                    self.categories
                );
            }
            if item_ref.item >= self.items {
                anyhow::bail!(
                    "Item {} out of bounds (items per category: {})",
                    item_ref.item,
                    self.items
                );
            }
        }
        if first.category == second.category {
            anyhow::bail!(
                "Items {} and {} are both in category {}",
                first.item,
                second.item,
                first.category
            );
        }
        Ok(self.pair_index(first, second))
    }

    /// Unchecked form of [`VariableLayout::index_of`] for validated input
    pub(crate) fn pair_index(&self, first: ItemRef, second: ItemRef) -> usize {
        let (low, high) = if first.category < second.category {
            (first, second)
        } else {
            (second, first)
        };

        let (row, column) = if low.category == 0 {
            (low, high)
        } else {
            (high, low)
        };

        self.section_start(row.category)
            + row.item * self.row_width(row.category)
            + self.items * (column.category - 1)
            + column.item
    }

    /// The (row item, column item) pair a variable stands for
    pub fn pair_of(&self, index: usize) -> (ItemRef, ItemRef) {
        assert!(
            index < self.variable_count(),
            "variable index {} out of range ({} variables)",
            index,
            self.variable_count()
        );

        let mut start = 0;
        for row_category in self.row_categories() {
            let block = self.items * self.row_width(row_category);
            if index < start + block {
                let local = index - start;
                let width = self.row_width(row_category);
                let row = ItemRef::new(row_category, local / width);
                let column = local % width;
                let column = ItemRef::new(1 + column / self.items, column % self.items);
                return (row, column);
            }
            start += block;
        }
        unreachable!("every index below the variable count lies in some row-block")
    }

    /// Number of variables in one row of a row-block
    fn row_width(&self, row_category: usize) -> usize {
        self.column_categories(row_category).len() * self.items
    }

    /// First variable of the row-block labelled by `row_category`
    fn section_start(&self, row_category: usize) -> usize {
        self.row_categories()
            .take_while(|&category| category != row_category)
            .map(|category| self.items * self.row_width(category))
            .sum()
    }

    /// Summary of the layout for reporting
    pub fn statistics(&self) -> LayoutStatistics {
        LayoutStatistics {
            categories: self.categories,
            items_per_category: self.items,
            total_variables: self.variable_count(),
            category_pairs: self.categories * (self.categories - 1) / 2,
        }
    }
}

/// Statistics about the variable layout
#[derive(Debug, Clone)]
pub struct LayoutStatistics {
    pub categories: usize,
    pub items_per_category: usize,
    pub total_variables: usize,
    pub category_pairs: usize,
}

impl std::fmt::Display for LayoutStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Layout Statistics:")?;
        writeln!(f, "  Categories: {}", self.categories)?;
        writeln!(f, "  Items per category: {}", self.items_per_category)?;
        writeln!(f, "  Category pairs: {}", self.category_pairs)?;
        writeln!(f, "  Total variables: {}", self.total_variables)?;
        Ok(())
    }
}
