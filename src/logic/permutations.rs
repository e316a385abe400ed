//! Memoised permutations and their Cartesian products

use itertools::Itertools;
use std::collections::HashMap;
use std::rc::Rc;

/// A list of permutations, or of concatenated permutation blocks
pub type PermutationList = Rc<Vec<Vec<usize>>>;

/// Cache of permutation enumerations, owned by whoever builds engines
///
/// Lists are shared through `Rc`, so repeated lookups never copy them.
#[derive(Debug, Default)]
pub struct PermutationCache {
    permutations: HashMap<usize, PermutationList>,
    products: HashMap<(usize, usize), PermutationList>,
}

impl PermutationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every permutation of `0..size`, in lexicographic order
    pub fn permutations(&mut self, size: usize) -> PermutationList {
        assert!(size > 0, "cannot permute an empty set");

        self.permutations
            .entry(size)
            .or_insert_with(|| {
                log::trace!("Enumerating permutations of {} items", size);
                Rc::new((0..size).permutations(size).collect())
            })
            .clone()
    }

    /// Cartesian product of `blocks` permutation lists of `size` items
    ///
    /// Each element is the concatenation of one permutation per block, so it
    /// has `blocks * size` entries.
    pub fn product(&mut self, blocks: usize, size: usize) -> PermutationList {
        assert!(blocks > 0, "a product needs at least one block");
        assert!(size >= 2, "blocks must hold at least two items");

        if blocks == 1 {
            return self.permutations(size);
        }
        if let Some(list) = self.products.get(&(blocks, size)) {
            return list.clone();
        }

        let single = self.permutations(size);
        let rest = self.product(blocks - 1, size);
        let mut combined = Vec::with_capacity(single.len() * rest.len());
        for (head, tail) in single.iter().cartesian_product(rest.iter()) {
            let mut element = Vec::with_capacity(head.len() + tail.len());
            element.extend_from_slice(head);
            element.extend_from_slice(tail);
            combined.push(element);
        }

        let list = Rc::new(combined);
        self.products.insert((blocks, size), list.clone());
        list
    }

    /// Number of memoised lists
    pub fn len(&self) -> usize {
        self.permutations.len() + self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.permutations.clear();
        self.products.clear();
    }
}

/// `n!`
pub fn factorial(n: usize) -> usize {
    (1..=n).product()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permutations_are_lexicographic() {
        let mut cache = PermutationCache::new();
        let perms = cache.permutations(3);
        assert_eq!(
            *perms,
            vec![
                vec![0, 1, 2],
                vec![0, 2, 1],
                vec![1, 0, 2],
                vec![1, 2, 0],
                vec![2, 0, 1],
                vec![2, 1, 0],
            ]
        );
    }

    #[test]
    fn test_permutation_counts() {
        let mut cache = PermutationCache::new();
        for size in 1..=6 {
            assert_eq!(cache.permutations(size).len(), factorial(size));
        }
    }

    #[test]
    fn test_product_sizes() {
        let mut cache = PermutationCache::new();
        let product = cache.product(3, 3);
        assert_eq!(product.len(), 6 * 6 * 6);
        assert!(product.iter().all(|element| element.len() == 9));

        let product = cache.product(2, 4);
        assert_eq!(product.len(), 24 * 24);
    }

    #[test]
    fn test_product_elements_are_distinct() {
        let mut cache = PermutationCache::new();
        let product = cache.product(2, 3);
        let unique: std::collections::HashSet<_> = product.iter().collect();
        assert_eq!(unique.len(), product.len());
    }

    #[test]
    fn test_memoisation_shares_lists() {
        let mut cache = PermutationCache::new();
        let first = cache.product(2, 3);
        let second = cache.product(2, 3);
        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 2);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_factorial() {
        assert_eq!(factorial(0), 1);
        assert_eq!(factorial(1), 1);
        assert_eq!(factorial(5), 120);
    }
}
