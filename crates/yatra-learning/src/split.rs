//! Stratified data splitting.
//!
//! Both the single 80/20 split and the K-fold splitter group row indices
//! by class, shuffle each group with a seeded RNG, and allocate
//! proportionally, so class proportions survive on both sides.

use crate::error::{LearningError, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::BTreeMap;

/// Group row positions by label code, in deterministic label order.
fn group_by_class(labels: &[usize]) -> BTreeMap<usize, Vec<usize>> {
    let mut groups: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (row, &label) in labels.iter().enumerate() {
        groups.entry(label).or_default().push(row);
    }
    groups
}

/// Single stratified train/test split over row indices.
///
/// Every class contributes at least one row to each side, which is why
/// callers must run the rare-class filter first; a single-member class
/// here is an error, never a panic.
pub fn stratified_train_test_split(
    labels: &[usize],
    test_fraction: f64,
    seed: u64,
) -> Result<(Vec<usize>, Vec<usize>)> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut train = Vec::new();
    let mut test = Vec::new();

    for (class, mut rows) in group_by_class(labels) {
        if rows.len() < 2 {
            return Err(LearningError::ClassTooSmall(class));
        }
        rows.shuffle(&mut rng);

        let n_test = ((rows.len() as f64) * test_fraction).round() as usize;
        let n_test = n_test.clamp(1, rows.len() - 1);

        test.extend_from_slice(&rows[..n_test]);
        train.extend_from_slice(&rows[n_test..]);
    }

    train.sort_unstable();
    test.sort_unstable();
    Ok((train, test))
}

/// Stratified shuffled K-fold splitter.
#[derive(Debug, Clone, Copy)]
pub struct StratifiedKFold {
    pub n_splits: usize,
    pub seed: u64,
}

impl StratifiedKFold {
    pub fn new(n_splits: usize, seed: u64) -> Self {
        Self { n_splits, seed }
    }

    /// Produce `(train, validation)` index pairs over `labels`.
    ///
    /// Each class's shuffled rows are dealt round-robin across folds;
    /// classes smaller than `n_splits` simply miss some folds rather
    /// than failing.
    pub fn split(&self, labels: &[usize]) -> Vec<(Vec<usize>, Vec<usize>)> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut folds: Vec<Vec<usize>> = vec![Vec::new(); self.n_splits];

        for (_, mut rows) in group_by_class(labels) {
            rows.shuffle(&mut rng);
            for (i, row) in rows.into_iter().enumerate() {
                folds[i % self.n_splits].push(row);
            }
        }

        (0..self.n_splits)
            .map(|k| {
                let validation: Vec<usize> = folds[k].clone();
                let mut train: Vec<usize> = folds
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| *i != k)
                    .flat_map(|(_, fold)| fold.iter().copied())
                    .collect();
                train.sort_unstable();
                (train, validation)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn labels() -> Vec<usize> {
        // 10 of class 0, 5 of class 1, 5 of class 2
        let mut y = vec![0; 10];
        y.extend(vec![1; 5]);
        y.extend(vec![2; 5]);
        y
    }

    #[test]
    fn test_split_sizes_and_disjointness() {
        let y = labels();
        let (train, test) = stratified_train_test_split(&y, 0.2, 42).unwrap();
        assert_eq!(train.len() + test.len(), y.len());
        for idx in &test {
            assert!(!train.contains(idx));
        }
    }

    #[test]
    fn test_split_preserves_class_proportions() {
        let y = labels();
        let (_, test) = stratified_train_test_split(&y, 0.2, 42).unwrap();
        let mut per_class = [0usize; 3];
        for &idx in &test {
            per_class[y[idx]] += 1;
        }
        assert_eq!(per_class, [2, 1, 1]);
    }

    #[test]
    fn test_split_never_fails_after_rare_class_filter() {
        // Two-member classes are the minimum the filter lets through;
        // each must land one row on each side.
        let y = vec![0, 0, 1, 1];
        let (train, test) = stratified_train_test_split(&y, 0.2, 0).unwrap();
        assert_eq!(train.len(), 2);
        assert_eq!(test.len(), 2);
        let train_classes: Vec<usize> = train.iter().map(|&i| y[i]).collect();
        assert!(train_classes.contains(&0) && train_classes.contains(&1));
    }

    #[test]
    fn test_split_rejects_singleton_class() {
        let y = vec![0, 0, 1];
        let err = stratified_train_test_split(&y, 0.2, 0).unwrap_err();
        assert!(matches!(err, LearningError::ClassTooSmall(1)));
    }

    #[test]
    fn test_split_is_deterministic_for_a_seed() {
        let y = labels();
        let a = stratified_train_test_split(&y, 0.2, 42).unwrap();
        let b = stratified_train_test_split(&y, 0.2, 42).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_kfold_covers_every_row_exactly_once() {
        let y = labels();
        let splits = StratifiedKFold::new(5, 42).split(&y);
        assert_eq!(splits.len(), 5);

        let mut seen: Vec<usize> = splits
            .iter()
            .flat_map(|(_, validation)| validation.iter().copied())
            .collect();
        seen.sort_unstable();
        let expected: Vec<usize> = (0..y.len()).collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn test_kfold_train_and_validation_are_disjoint() {
        let y = labels();
        for (train, validation) in StratifiedKFold::new(5, 42).split(&y) {
            for idx in &validation {
                assert!(!train.contains(idx));
            }
            assert_eq!(train.len() + validation.len(), y.len());
        }
    }

    #[test]
    fn test_kfold_tolerates_tiny_classes() {
        // Class 1 has 2 members across 5 folds; no fold may crash.
        let y = vec![0, 0, 0, 0, 0, 1, 1];
        let splits = StratifiedKFold::new(5, 7).split(&y);
        assert_eq!(splits.len(), 5);
    }
}
