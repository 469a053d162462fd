//! Axis-aligned integer index boxes with inclusive bounds ([`IndexBox`]), and the set
//! operations on them that overlap and ghost-region computations are built from.

use alloc::vec::Vec;
use core::fmt;
use core::ops::RangeInclusive;

use arrayvec::ArrayVec;

use crate::math::{
    Axis, GridCoordinate, GridPoint, GridSize, GridSizeCoord, GridVector, IndexIter,
};
use crate::util::ConciseDebug;

/// An axis-aligned box of cells in `D`-dimensional index space, `D` being 1, 2, or 3.
///
/// Both bounds are inclusive: a box containing a single cell has `lower() == upper()`,
/// and there is no such thing as an empty [`IndexBox`]. Operations which may produce no
/// cells, such as [`IndexBox::intersection()`], return [`Option`] or an empty [`Vec`]
/// instead.
#[derive(Clone, Copy, Eq, Hash, PartialEq)]
pub struct IndexBox<const D: usize> {
    lower: GridPoint<D>,
    /// Constructor checks ensure this is not smaller than `lower` on any axis.
    upper: GridPoint<D>,
}

impl<const D: usize> IndexBox<D> {
    const DIMENSION_CHECK: () = assert!(D >= 1 && D <= 3, "IndexBox must have 1, 2, or 3 axes");

    /// Constructs an [`IndexBox`] from inclusive lower and upper bounds.
    ///
    /// Returns [`Err`] if any of the `upper` bounds are less than the `lower` bounds.
    ///
    /// ```
    /// # extern crate amr_halo_base as amr_halo;
    /// use amr_halo::math::IndexBox;
    ///
    /// assert!(IndexBox::checked_from_lower_upper([0, 5], [31, 5]).is_ok());
    /// assert!(IndexBox::checked_from_lower_upper([0, 5], [31, 4]).is_err());
    /// ```
    #[allow(clippy::missing_inline_in_public_items, reason = "is generic already")]
    pub fn checked_from_lower_upper(
        lower: impl Into<GridPoint<D>>,
        upper: impl Into<GridPoint<D>>,
    ) -> Result<Self, GridOverflowError> {
        let () = Self::DIMENSION_CHECK;
        let lower = lower.into();
        let upper = upper.into();
        if (0..D).any(|i| upper[i] < lower[i]) {
            return Err(GridOverflowError(OverflowKind::Inverted {
                lower: to_bounds(lower),
                upper: to_bounds(upper),
            }));
        }
        Ok(Self { lower, upper })
    }

    /// Constructs an [`IndexBox`] from inclusive lower and upper bounds.
    ///
    /// For example, if on one axis the lower bound is 5 and the upper bound is 10,
    /// then the cells on that axis are numbered 5 through 10, six in total.
    ///
    /// Panics if any of the `upper` bounds are less than the `lower` bounds.
    /// Use [`IndexBox::checked_from_lower_upper()`] to avoid panics.
    #[track_caller]
    #[allow(clippy::missing_inline_in_public_items, reason = "is generic already")]
    pub fn from_lower_upper(
        lower: impl Into<GridPoint<D>>,
        upper: impl Into<GridPoint<D>>,
    ) -> Self {
        Self::checked_from_lower_upper(lower, upper).expect("IndexBox::from_lower_upper")
    }

    /// Constructs an [`IndexBox`] containing exactly the given cell.
    #[allow(clippy::missing_inline_in_public_items, reason = "is generic already")]
    pub fn single_cell(index: impl Into<GridPoint<D>>) -> Self {
        let () = Self::DIMENSION_CHECK;
        let index = index.into();
        Self {
            lower: index,
            upper: index,
        }
    }

    /// Inclusive lower bounds on cell indices, or the most negative corner of the box.
    #[inline]
    pub fn lower(&self) -> GridPoint<D> {
        self.lower
    }

    /// Inclusive upper bounds on cell indices, or the most positive corner of the box.
    #[inline]
    pub fn upper(&self) -> GridPoint<D> {
        self.upper
    }

    /// Number of cells along each axis, which is never zero.
    ///
    /// A box spanning the entire numeric range has one more cell than [`GridSizeCoord`]
    /// can count; its size saturates.
    ///
    /// ```
    /// # extern crate amr_halo_base as amr_halo;
    /// use amr_halo::math::IndexBox;
    ///
    /// assert_eq!(IndexBox::from_lower_upper([0], [63]).size(), [64]);
    /// assert_eq!(IndexBox::from_lower_upper([-2, 7], [-2, 9]).size(), [1, 3]);
    /// ```
    #[inline]
    pub fn size(&self) -> GridSize<D> {
        core::array::from_fn(|i| {
            // Two’s complement arithmetic trick: If the subtraction overflows and wraps, the
            // following conversion to u32 will give us the right answer anyway.
            i32::wrapping_sub(self.upper[i], self.lower[i])
                .cast_unsigned()
                .saturating_add(1)
        })
    }

    /// Computes the number of cells in this box, i.e. the product of all sizes.
    ///
    /// Returns [`None`] if the volume does not fit in a `usize`.
    #[inline]
    pub fn volume(&self) -> Option<usize> {
        self.size()
            .into_iter()
            .try_fold(1usize, |volume, size| volume.checked_mul(size as usize))
    }

    /// The range of cell indices within the box along the given axis.
    #[inline]
    pub fn axis_range(&self, axis: Axis) -> RangeInclusive<GridCoordinate> {
        self.lower[axis]..=self.upper[axis]
    }

    /// Returns whether the box includes the given cell.
    ///
    /// ```
    /// # extern crate amr_halo_base as amr_halo;
    /// use amr_halo::math::IndexBox;
    ///
    /// let b = IndexBox::from_lower_upper([0], [63]);
    /// assert!(!b.contains_index([-1]));
    /// assert!(b.contains_index([0]));
    /// assert!(b.contains_index([63]));
    /// assert!(!b.contains_index([64]));
    /// ```
    #[allow(clippy::missing_inline_in_public_items, reason = "is generic already")]
    pub fn contains_index(&self, index: impl Into<GridPoint<D>>) -> bool {
        let index = index.into();
        (0..D).all(|i| self.lower[i] <= index[i] && index[i] <= self.upper[i])
    }

    /// Returns whether this box includes every cell in the other box.
    #[inline]
    pub fn contains_box(&self, other: Self) -> bool {
        (0..D).all(|i| self.lower[i] <= other.lower[i] && other.upper[i] <= self.upper[i])
    }

    /// Returns the box containing every cell that both `self` and `other` do, and no others.
    ///
    /// Returns [`None`] if there are no such cells.
    ///
    /// ```
    /// # extern crate amr_halo_base as amr_halo;
    /// use amr_halo::math::IndexBox;
    ///
    /// assert_eq!(
    ///     IndexBox::from_lower_upper([-2], [33])
    ///         .intersection(IndexBox::from_lower_upper([30], [65])),
    ///     Some(IndexBox::from_lower_upper([30], [33])),
    /// );
    ///
    /// // Boxes which merely abut do not intersect.
    /// assert_eq!(
    ///     IndexBox::from_lower_upper([0], [31])
    ///         .intersection(IndexBox::from_lower_upper([32], [63])),
    ///     None,
    /// );
    /// ```
    #[inline]
    #[must_use]
    pub fn intersection(self, other: Self) -> Option<Self> {
        let lower: GridPoint<D> = core::array::from_fn(|i| self.lower[i].max(other.lower[i]));
        let upper: GridPoint<D> = core::array::from_fn(|i| self.upper[i].min(other.upper[i]));
        if (0..D).any(|i| lower[i] > upper[i]) {
            return None;
        }
        Some(Self { lower, upper })
    }

    /// Displaces the box by the given `offset`, leaving its size unchanged.
    ///
    /// Returns [`Err`] if that is impossible due to numeric overflow.
    #[allow(clippy::missing_inline_in_public_items, reason = "is generic already")]
    pub fn checked_translate(
        &self,
        offset: impl Into<GridVector<D>>,
    ) -> Result<Self, GridOverflowError> {
        let offset = offset.into();
        let overflow = || {
            GridOverflowError(OverflowKind::OverflowedTranslate {
                lower: to_bounds(self.lower),
                upper: to_bounds(self.upper),
                offset: to_bounds(offset),
            })
        };
        let mut lower = self.lower;
        let mut upper = self.upper;
        for i in 0..D {
            lower[i] = lower[i].checked_add(offset[i]).ok_or_else(overflow)?;
            upper[i] = upper[i].checked_add(offset[i]).ok_or_else(overflow)?;
        }
        Ok(Self { lower, upper })
    }

    /// Displaces the box by the given `offset`, leaving its size unchanged.
    ///
    /// Panics on numeric overflow. Use [`IndexBox::checked_translate()`] to avoid panics.
    ///
    /// ```
    /// # extern crate amr_halo_base as amr_halo;
    /// use amr_halo::math::IndexBox;
    ///
    /// assert_eq!(
    ///     IndexBox::from_lower_upper([32, 0], [63, 9]).translate([-64, 0]),
    ///     IndexBox::from_lower_upper([-32, 0], [-1, 9]),
    /// );
    /// ```
    #[track_caller]
    #[must_use]
    #[allow(clippy::missing_inline_in_public_items, reason = "is generic already")]
    pub fn translate(&self, offset: impl Into<GridVector<D>>) -> Self {
        self.checked_translate(offset).expect("IndexBox::translate")
    }

    /// Moves all bounds outward by `width` cells.
    ///
    /// If the result’s coordinates would overflow, they are as large as possible instead.
    ///
    /// ```
    /// # extern crate amr_halo_base as amr_halo;
    /// use amr_halo::math::IndexBox;
    ///
    /// assert_eq!(
    ///     IndexBox::from_lower_upper([0, 10], [31, 20]).grow(2),
    ///     IndexBox::from_lower_upper([-2, 8], [33, 22]),
    /// );
    /// ```
    #[inline]
    #[must_use]
    pub fn grow(self, width: GridSizeCoord) -> Self {
        Self {
            lower: self.lower.map(|c| c.saturating_sub_unsigned(width)),
            upper: self.upper.map(|c| c.saturating_add_unsigned(width)),
        }
    }

    /// Moves the upper bound on `axis` outward by one cell.
    ///
    /// This is how a box of cells is widened to also take in the node on its far side.
    /// If the result’s coordinates would overflow, the box is unchanged instead.
    #[inline]
    #[must_use]
    pub fn grow_upper(self, axis: Axis) -> Self {
        let mut upper = self.upper;
        upper[axis] = upper[axis].saturating_add(1);
        Self {
            lower: self.lower,
            upper,
        }
    }

    /// Scales the box up by the given refinement ratio, so that each cell becomes
    /// `ratio` cells along every axis.
    ///
    /// Panics if the ratio is not positive.
    ///
    /// ```
    /// # extern crate amr_halo_base as amr_halo;
    /// use amr_halo::math::IndexBox;
    ///
    /// assert_eq!(
    ///     IndexBox::from_lower_upper([0], [63]).refine(2),
    ///     Ok(IndexBox::from_lower_upper([0], [127])),
    /// );
    /// assert_eq!(
    ///     IndexBox::from_lower_upper([-1, 3], [1, 3]).refine(4),
    ///     Ok(IndexBox::from_lower_upper([-4, 12], [7, 15])),
    /// );
    /// ```
    #[track_caller]
    #[allow(clippy::missing_inline_in_public_items)]
    pub fn refine(self, ratio: GridCoordinate) -> Result<Self, GridOverflowError> {
        assert!(
            ratio > 0,
            "IndexBox::refine: ratio must be > 0, not {ratio}"
        );
        let overflow = || {
            GridOverflowError(OverflowKind::OverflowedRefine {
                lower: to_bounds(self.lower),
                upper: to_bounds(self.upper),
                ratio,
            })
        };
        let mut lower = self.lower;
        let mut upper = self.upper;
        for i in 0..D {
            lower[i] = lower[i].checked_mul(ratio).ok_or_else(overflow)?;
            upper[i] = upper[i]
                .checked_add(1)
                .and_then(|u| u.checked_mul(ratio))
                .and_then(|u| u.checked_sub(1))
                .ok_or_else(overflow)?;
        }
        Ok(Self { lower, upper })
    }

    /// Returns disjoint boxes which together contain exactly the cells of `self` that are
    /// not in `other`.
    ///
    /// The pieces are cut as slabs, one axis after another in the order X, Y, Z, with the
    /// slab below `other` preceding the slab above it on each axis.
    /// If the boxes do not intersect, the result is `[self]`;
    /// if `other` contains all of `self`, the result is empty.
    ///
    /// ```
    /// # extern crate amr_halo_base as amr_halo;
    /// use amr_halo::math::IndexBox;
    ///
    /// let ghost_box = IndexBox::from_lower_upper([-2], [65]);
    /// let interior = IndexBox::from_lower_upper([0], [63]);
    /// assert_eq!(
    ///     ghost_box.difference(interior),
    ///     vec![
    ///         IndexBox::from_lower_upper([-2], [-1]),
    ///         IndexBox::from_lower_upper([64], [65]),
    ///     ],
    /// );
    /// assert_eq!(interior.difference(ghost_box), vec![]);
    /// ```
    #[allow(clippy::missing_inline_in_public_items)]
    pub fn difference(self, other: Self) -> Vec<Self> {
        let Some(common) = self.intersection(other) else {
            return vec![self];
        };

        let mut pieces = Vec::new();
        // The part of `self` not yet assigned to a piece; shrinks toward `common`.
        let mut rest = self;
        for axis in Axis::first::<D>() {
            if rest.lower[axis] < common.lower[axis] {
                let mut slab = rest;
                slab.upper[axis] = common.lower[axis] - 1;
                pieces.push(slab);
                rest.lower[axis] = common.lower[axis];
            }
            if rest.upper[axis] > common.upper[axis] {
                let mut slab = rest;
                slab.lower[axis] = common.upper[axis] + 1;
                pieces.push(slab);
                rest.upper[axis] = common.upper[axis];
            }
        }
        debug_assert_eq!(rest, common);
        pieces
    }

    /// Iterate over all cells that this box contains, in lexicographic order with the X
    /// coordinate varying slowest.
    ///
    /// ```
    /// # extern crate amr_halo_base as amr_halo;
    /// use amr_halo::math::IndexBox;
    ///
    /// let b = IndexBox::from_lower_upper([10, 20], [11, 21]);
    /// assert_eq!(
    ///     b.interior_iter().collect::<Vec<_>>(),
    ///     [[10, 20], [10, 21], [11, 20], [11, 21]],
    /// );
    /// ```
    #[inline]
    pub fn interior_iter(self) -> IndexIter<D> {
        IndexIter::new(self)
    }
}

impl<const D: usize> fmt::Debug for IndexBox<D> {
    #[allow(clippy::missing_inline_in_public_items)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut t = f.debug_tuple("IndexBox");
        for axis in Axis::first::<D>() {
            t.field(&RangeWithLength(self.axis_range(axis)));
        }
        t.finish()
    }
}

impl<const D: usize> manyfmt::Fmt<ConciseDebug> for IndexBox<D> {
    #[allow(clippy::missing_inline_in_public_items)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>, _: &ConciseDebug) -> fmt::Result {
        write!(f, "{:?}..={:?}", self.lower, self.upper)
    }
}

#[cfg(feature = "arbitrary")]
#[mutants::skip]
impl<'a, const D: usize> arbitrary::Arbitrary<'a> for IndexBox<D> {
    #[allow(clippy::missing_inline_in_public_items)]
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        // Keep coordinates small enough that translating by a domain size cannot overflow,
        // and extents small enough that iterating over cells stays cheap.
        let mut lower = [0; D];
        let mut upper = [0; D];
        for i in 0..D {
            lower[i] = u.int_in_range(-ARBITRARY_COORDINATE_LIMIT..=ARBITRARY_COORDINATE_LIMIT)?;
            upper[i] = lower[i] + u.int_in_range(0..=ARBITRARY_EXTENT_LIMIT)?;
        }
        Self::checked_from_lower_upper(lower, upper)
            .map_err(|_| arbitrary::Error::IncorrectFormat)
    }

    #[allow(clippy::missing_inline_in_public_items)]
    fn size_hint(_depth: usize) -> (usize, Option<usize>) {
        let per_axis = size_of::<GridCoordinate>() * 2;
        (per_axis * D, Some(per_axis * D))
    }
}

#[cfg(feature = "arbitrary")]
const ARBITRARY_COORDINATE_LIMIT: GridCoordinate = 1 << 12;
#[cfg(feature = "arbitrary")]
const ARBITRARY_EXTENT_LIMIT: GridCoordinate = 1 << 6;

/// Error when an [`IndexBox`] cannot be constructed from the given input.
#[derive(Clone, Debug, displaydoc::Display, Eq, PartialEq)]
#[displaydoc("{0}")]
pub struct GridOverflowError(OverflowKind);

/// Up to three coordinates, as stored in [`OverflowKind`] regardless of dimensionality.
type Bounds = ArrayVec<GridCoordinate, 3>;

fn to_bounds<const D: usize>(point: [GridCoordinate; D]) -> Bounds {
    point.into_iter().collect()
}

/// Error details for [`GridOverflowError`].
#[derive(Clone, Debug, Eq, PartialEq)]
enum OverflowKind {
    Inverted {
        lower: Bounds,
        upper: Bounds,
    },
    OverflowedTranslate {
        lower: Bounds,
        upper: Bounds,
        offset: Bounds,
    },
    OverflowedRefine {
        lower: Bounds,
        upper: Bounds,
        ratio: GridCoordinate,
    },
}

impl fmt::Display for OverflowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverflowKind::Inverted { lower, upper } => {
                write!(
                    f,
                    "IndexBox's lower bounds {:?} were greater than upper bounds {:?}",
                    lower.as_slice(),
                    upper.as_slice()
                )
            }
            OverflowKind::OverflowedTranslate {
                lower,
                upper,
                offset,
            } => {
                write!(
                    f,
                    "translating IndexBox {:?}..={:?} by {:?} overflowed",
                    lower.as_slice(),
                    upper.as_slice(),
                    offset.as_slice(),
                )
            }
            OverflowKind::OverflowedRefine {
                lower,
                upper,
                ratio,
            } => {
                write!(
                    f,
                    "refining IndexBox {:?}..={:?} by a ratio of {ratio} overflowed",
                    lower.as_slice(),
                    upper.as_slice(),
                )
            }
        }
    }
}

impl core::error::Error for GridOverflowError {}

/// `Debug`-formatting helper
struct RangeWithLength(RangeInclusive<GridCoordinate>);
impl fmt::Debug for RangeWithLength {
    #[allow(clippy::missing_inline_in_public_items)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let range = &self.0;
        if f.alternate() {
            write!(
                f,
                "{range:?} ({len})",
                len = i64::from(*range.end()) - i64::from(*range.start()) + 1
            )
        } else {
            range.fmt(f)
        }
    }
}
