use core::iter::FusedIterator;

use crate::math::{GridPoint, IndexBox};

/// Iterator produced by [`IndexBox::interior_iter()`].
#[derive(Clone, Debug)]
pub struct IndexIter<const D: usize> {
    bounds: IndexBox<D>,
    /// The next index to produce, or [`None`] if iteration has finished.
    next: Option<GridPoint<D>>,
}

impl<const D: usize> IndexIter<D> {
    #[inline]
    pub(in crate::math) fn new(bounds: IndexBox<D>) -> Self {
        Self {
            bounds,
            next: Some(bounds.lower()),
        }
    }

    /// Returns the bounds which this iterator iterates over.
    /// This may be larger than the set of indices not yet produced, but it will not be smaller.
    #[inline]
    pub fn bounds(&self) -> IndexBox<D> {
        self.bounds
    }
}

impl<const D: usize> Iterator for IndexIter<D> {
    type Item = GridPoint<D>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let result = self.next?;

        let lower = self.bounds.lower();
        let upper = self.bounds.upper();
        let mut following = result;
        self.next = None;
        // Odometer: the last axis turns over fastest.
        for i in (0..D).rev() {
            if following[i] < upper[i] {
                following[i] += 1;
                self.next = Some(following);
                break;
            }
            following[i] = lower[i];
        }

        Some(result)
    }

    #[allow(clippy::missing_inline_in_public_items, reason = "unclear benefit")]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let Some(next) = self.next else {
            return (0, Some(0));
        };
        let upper = self.bounds.upper();
        let size = self.bounds.size();
        let mut remaining: u128 = 1;
        let mut stride: u128 = 1;
        for i in (0..D).rev() {
            remaining += u128::from(upper[i].abs_diff(next[i])) * stride;
            stride *= u128::from(size[i]);
        }
        match usize::try_from(remaining) {
            Ok(remaining) => (remaining, Some(remaining)),
            Err(_) => (usize::MAX, None),
        }
    }
}

impl<const D: usize> FusedIterator for IndexIter<D> {}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use pretty_assertions::assert_eq;

    #[test]
    fn one_dimension() {
        let b = IndexBox::from_lower_upper([-2], [1]);
        assert_eq!(
            b.interior_iter().collect::<Vec<_>>(),
            vec![[-2], [-1], [0], [1]]
        );
    }

    #[test]
    fn three_dimensions_order() {
        let b = IndexBox::from_lower_upper([0, 0, 0], [1, 1, 1]);
        assert_eq!(
            b.interior_iter().collect::<Vec<_>>(),
            vec![
                [0, 0, 0],
                [0, 0, 1],
                [0, 1, 0],
                [0, 1, 1],
                [1, 0, 0],
                [1, 0, 1],
                [1, 1, 0],
                [1, 1, 1],
            ]
        );
    }

    #[test]
    fn single_cell() {
        let mut iter = IndexBox::single_cell([5, 5]).interior_iter();
        assert_eq!(iter.size_hint(), (1, Some(1)));
        assert_eq!(iter.next(), Some([5, 5]));
        assert_eq!(iter.size_hint(), (0, Some(0)));
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn size_hint_counts_down() {
        let b = IndexBox::from_lower_upper([0, 10, 20], [2, 12, 23]);
        let mut iter = b.interior_iter();
        let expected_total = b.volume().unwrap();
        for remaining in (1..=expected_total).rev() {
            assert_eq!(iter.size_hint(), (remaining, Some(remaining)));
            assert!(iter.next().is_some());
        }
        assert_eq!(iter.size_hint(), (0, Some(0)));
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn all_within_bounds() {
        let b = IndexBox::from_lower_upper([-3, 4], [0, 6]);
        let iter = b.interior_iter();
        assert_eq!(iter.bounds(), b);
        let cells: Vec<_> = iter.collect();
        assert_eq!(cells.len(), 12);
        assert!(cells.iter().all(|&cell| b.contains_index(cell)));
    }
}
