//! Fixed-size boolean assignment over puzzle variables

use serde::{Deserialize, Serialize};
use std::fmt;

/// A truth value for each of a fixed number of variables
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Assignment {
    truths: Vec<bool>,
}

impl Assignment {
    /// Create an assignment of `size` variables, all false
    pub fn new(size: usize) -> Self {
        assert!(size > 0, "an assignment must cover at least one variable");
        Self {
            truths: vec![false; size],
        }
    }

    /// Number of variables covered
    #[inline]
    pub fn len(&self) -> usize {
        self.truths.len()
    }

    /// Always false; an assignment covers at least one variable
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.truths.is_empty()
    }

    /// Get the assigned value of a variable
    #[inline]
    pub fn get(&self, index: usize) -> bool {
        self.check_index(index);
        self.truths[index]
    }

    pub fn set_true(&mut self, index: usize) {
        self.check_index(index);
        self.truths[index] = true;
    }

    pub fn set_false(&mut self, index: usize) {
        self.check_index(index);
        self.truths[index] = false;
    }

    /// Ascending indices of the variables currently true
    pub fn true_indices(&self) -> VarIter<'_> {
        VarIter::new(self, true)
    }

    /// Ascending indices of the variables currently false
    pub fn false_indices(&self) -> VarIter<'_> {
        VarIter::new(self, false)
    }

    /// Count of variables currently true
    pub fn count_true(&self) -> usize {
        self.truths.iter().filter(|&&value| value).count()
    }

    fn check_index(&self, index: usize) {
        assert!(
            index < self.truths.len(),
            "variable index {} out of range for assignment of {} variables",
            index,
            self.truths.len()
        );
    }
}

/// Forward iterator over the indices of an [`Assignment`] holding a target value
///
/// The iterator borrows the assignment, so the assignment cannot change while
/// an iteration is in progress.
#[derive(Debug, Clone)]
pub struct VarIter<'a> {
    truths: &'a [bool],
    position: usize,
    target: bool,
}

impl<'a> VarIter<'a> {
    fn new(assignment: &'a Assignment, target: bool) -> Self {
        Self {
            truths: &assignment.truths,
            position: 0,
            target,
        }
    }
}

impl Iterator for VarIter<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        while self.position < self.truths.len() {
            let index = self.position;
            self.position += 1;
            if self.truths[index] == self.target {
                return Some(index);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.truths.len() - self.position))
    }
}

impl std::iter::FusedIterator for VarIter<'_> {}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &value in &self.truths {
            write!(f, "{}", if value { '1' } else { '0' })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_assignment() {
        let assignment = Assignment::new(12);
        assert_eq!(assignment.len(), 12);
        assert!((0..12).all(|i| !assignment.get(i)));
        assert_eq!(assignment.true_indices().count(), 0);
        assert_eq!(
            assignment.false_indices().collect::<Vec<_>>(),
            (0..12).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_set_and_clear() {
        let mut assignment = Assignment::new(8);
        for i in 0..8 {
            assignment.set_true(i);
            assert!(assignment.get(i));
            assignment.set_false(i);
            assert!(!assignment.get(i));
        }
    }

    #[test]
    fn test_filtered_iteration() {
        let mut assignment = Assignment::new(10);
        assignment.set_true(0);
        assignment.set_true(3);
        assignment.set_true(9);

        assert_eq!(assignment.true_indices().collect::<Vec<_>>(), vec![0, 3, 9]);
        assert_eq!(
            assignment.false_indices().collect::<Vec<_>>(),
            vec![1, 2, 4, 5, 6, 7, 8]
        );
        assert_eq!(assignment.count_true(), 3);
    }

    #[test]
    fn test_iteration_reflects_latest_state() {
        let mut assignment = Assignment::new(4);
        assignment.set_true(1);
        assert_eq!(assignment.true_indices().collect::<Vec<_>>(), vec![1]);

        assignment.set_false(1);
        assignment.set_true(2);
        assert_eq!(assignment.true_indices().collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn test_iterator_exhausts_cleanly() {
        let mut assignment = Assignment::new(3);
        assignment.set_true(2);

        let mut iter = assignment.true_indices();
        assert_eq!(iter.next(), Some(2));
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next(), None);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_out_of_range_get() {
        let assignment = Assignment::new(3);
        assignment.get(3);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_out_of_range_set() {
        let mut assignment = Assignment::new(3);
        assignment.set_true(7);
    }

    #[test]
    #[should_panic]
    fn test_zero_size_rejected() {
        Assignment::new(0);
    }

    #[test]
    fn test_display() {
        let mut assignment = Assignment::new(5);
        assignment.set_true(1);
        assignment.set_true(4);
        assert_eq!(assignment.to_string(), "01001");
    }
}
