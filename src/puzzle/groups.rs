//! Groups of items already known to belong together

use super::Puzzle;
use crate::logic::{ItemRef, VariableStatus};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Items known to share a group, one slot per category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub members: Vec<Option<String>>,
}

impl Group {
    /// Number of categories with a known member
    pub fn len(&self) -> usize {
        self.members.iter().filter(|member| member.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn member(&self, category: usize) -> Option<&str> {
        self.members.get(category).and_then(|member| member.as_deref())
    }

    pub fn is_complete(&self) -> bool {
        self.members.iter().all(Option::is_some)
    }
}

/// Earliest filled category first, then alphabetically by that member
fn group_order(a: &Group, b: &Group) -> Ordering {
    for (left, right) in a.members.iter().zip(&b.members) {
        match (left, right) {
            (None, None) => continue,
            (None, Some(_)) => return Ordering::Greater,
            (Some(_), None) => return Ordering::Less,
            (Some(left), Some(right)) => return left.cmp(right),
        }
    }
    Ordering::Equal
}

/// Union-find over item slots with path compression and union by rank
#[derive(Debug, Clone)]
struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u32>,
}

impl DisjointSet {
    fn new(size: usize) -> Self {
        Self {
            parent: (0..size).collect(),
            rank: vec![0; size],
        }
    }

    fn find(&mut self, node: usize) -> usize {
        let parent = self.parent[node];
        if parent != node {
            let root = self.find(parent);
            self.parent[node] = root;
        }
        self.parent[node]
    }

    fn join(&mut self, a: usize, b: usize) {
        let (a, b) = (self.find(a), self.find(b));
        if a == b {
            return;
        }
        match self.rank[a].cmp(&self.rank[b]) {
            Ordering::Less => self.parent[a] = b,
            Ordering::Greater => self.parent[b] = a,
            Ordering::Equal => {
                self.parent[b] = a;
                self.rank[a] += 1;
            }
        }
    }
}

/// Every group of two or more items joined by variables known to be true
pub fn known_groups(puzzle: &Puzzle) -> Vec<Group> {
    let categories = puzzle.num_categories();
    let items = puzzle.items_per_category();
    let slot = |item: ItemRef| item.category * items + item.item;

    let mut sets = DisjointSet::new(categories * items);
    for (variable, status) in puzzle.statuses().into_iter().enumerate() {
        if status == VariableStatus::True {
            let (row, column) = puzzle.variable_pair(variable);
            sets.join(slot(row), slot(column));
        }
    }

    let mut by_root: HashMap<usize, usize> = HashMap::new();
    let mut groups: Vec<Group> = Vec::new();
    for category in 0..categories {
        for item in 0..items {
            let item_ref = ItemRef::new(category, item);
            let root = sets.find(slot(item_ref));
            let position = *by_root.entry(root).or_insert_with(|| {
                groups.push(Group {
                    members: vec![None; categories],
                });
                groups.len() - 1
            });
            groups[position].members[category] = Some(puzzle.item_name(item_ref).to_string());
        }
    }

    groups.retain(|group| group.len() > 1);
    groups.sort_by(group_order);
    groups
}
