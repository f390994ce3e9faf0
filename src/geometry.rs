//! Geometric helpers for aggregating several items into one container.
//!
//! The multi-item heuristic treats every item as lying flat in a single
//! footprint and stacks them vertically. It does not rotate or interlock items.

use crate::types::{Dimensional, Dims, EPSILON_GENERAL};

/// Computes the stacked bounding extent of a group of items.
///
/// Takes the longest length, the widest width and the summed heights.
///
/// # Returns
/// `None` if the group is empty, otherwise the aggregated dimensions
///
/// # Example
/// ```ignore
/// let extent = stacked_extent([&a, &b]); // (max l, max w, sum h)
/// ```
pub fn stacked_extent<'a, T, I>(items: I) -> Option<Dims>
where
    T: Dimensional + 'a,
    I: IntoIterator<Item = &'a T>,
{
    items.into_iter().fold(None, |acc, item| {
        let dims = item.dimensions();
        Some(match acc {
            None => dims,
            Some(total) => Dims::new(
                total.length.max(dims.length),
                total.width.max(dims.width),
                total.height + dims.height,
            ),
        })
    })
}

/// Relative reduction from `before` to `after` in percent.
///
/// Returns 0.0 when `before` is (numerically) zero, e.g. for empty selections.
pub fn reduction_percent(before: f64, after: f64) -> f64 {
    if before.abs() < EPSILON_GENERAL {
        return 0.0;
    }
    (before - after) / before * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Item(Dims);

    impl Dimensional for Item {
        fn dimensions(&self) -> Dims {
            self.0
        }
    }

    #[test]
    fn empty_group_has_no_extent() {
        let items: Vec<Item> = Vec::new();
        assert_eq!(stacked_extent(&items), None);
    }

    #[test]
    fn stacks_heights_and_keeps_largest_footprint() {
        let items = vec![
            Item(Dims::new(10.0, 5.0, 2.0)),
            Item(Dims::new(4.0, 8.0, 3.0)),
            Item(Dims::new(7.0, 7.0, 1.5)),
        ];
        let extent = stacked_extent(&items).unwrap();
        assert_eq!(extent, Dims::new(10.0, 8.0, 6.5));
    }

    #[test]
    fn single_item_extent_is_item() {
        let items = vec![Item(Dims::new(3.0, 4.0, 5.0))];
        assert_eq!(stacked_extent(&items), Some(Dims::new(3.0, 4.0, 5.0)));
    }

    #[test]
    fn reduction_percent_handles_zero_baseline() {
        assert_eq!(reduction_percent(0.0, 10.0), 0.0);
        assert_eq!(reduction_percent(1e-9, 0.0), 0.0);
        assert!((reduction_percent(1728.0, 1331.0) - 22.974537).abs() < 1e-5);
        assert!((reduction_percent(100.0, 100.0)).abs() < EPSILON_GENERAL);
        assert!(reduction_percent(100.0, 150.0) < 0.0);
    }
}
