//! Named categories of puzzle items

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A named, fixed list of items such as "Nationality" or "Pet"
///
/// Item names need not be unique, although duplicate names make the grid
/// and summary views ambiguous.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub items: Vec<String>,
}

impl Category {
    pub fn new<I, S>(name: impl Into<String>, items: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let category = Self {
            name: name.into(),
            items: items.into_iter().map(Into::into).collect(),
        };
        category.validate()?;
        Ok(category)
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            anyhow::bail!("Category names cannot be empty");
        }
        if self.items.len() < 2 {
            anyhow::bail!(
                "Category '{}' has {} items, at least 2 are required",
                self.name,
                self.items.len()
            );
        }
        if let Some(position) = self.items.iter().position(|item| item.trim().is_empty()) {
            anyhow::bail!("Item {} of category '{}' is empty", position, self.name);
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Name of the `index`th item
    pub fn item(&self, index: usize) -> &str {
        &self.items[index]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.items.iter()
    }

    /// Length in characters of the longest item name
    pub fn widest_item(&self) -> usize {
        self.items
            .iter()
            .map(|item| item.chars().count())
            .max()
            .unwrap_or(0)
    }
}

impl<'a> IntoIterator for &'a Category {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.items.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_category() {
        let category = Category::new("Pet", ["Dog", "Snail", "Fox"]).unwrap();
        assert_eq!(category.len(), 3);
        assert_eq!(category.item(1), "Snail");
        assert_eq!(category.iter().count(), 3);
        assert_eq!(category.widest_item(), 5);
        assert_eq!(category.to_string(), "Pet: Dog, Snail, Fox");
    }

    #[test]
    fn test_invalid_categories() {
        assert!(Category::new("Pet", ["Dog"]).is_err());
        assert!(Category::new("", ["Dog", "Cat"]).is_err());
        assert!(Category::new("Pet", ["Dog", "  "]).is_err());
    }

    #[test]
    fn test_width_counts_characters() {
        let category = Category::new("Drink", ["Café", "Tea"]).unwrap();
        assert_eq!(category.widest_item(), 4);
    }
}
