//! Numeric types used for coordinates and related quantities.

/// Coordinates that are locked to the cell grid.
pub type GridCoordinate = i32;

/// Numeric type in a [`GridSize`].
pub type GridSizeCoord = u32;

/// Cell indices, one coordinate per axis.
pub type GridPoint<const D: usize> = [GridCoordinate; D];

/// Displacements in index space, one coordinate per axis.
pub type GridVector<const D: usize> = [GridCoordinate; D];

/// Sizes of index boxes, in cells, one entry per axis.
pub type GridSize<const D: usize> = [GridSizeCoord; D];

/// Coordinates that are not locked to the cell grid, such as patch origins.
///
/// Note: Because `GridCoordinate = i32` and `FreeCoordinate = f64`, which has
/// more than 32 bits of mantissa, the infallible conversion
/// `From<GridCoordinate> for FreeCoordinate` exists, which is often convenient.
pub type FreeCoordinate = f64;

/// Returns the vector pointing the opposite way.
///
/// Panics on overflow, which only happens for [`GridCoordinate::MIN`] components.
#[inline]
#[must_use]
pub fn negate<const D: usize>(vector: GridVector<D>) -> GridVector<D> {
    vector.map(|c| -c)
}

/// Returns the vector which is `magnitude` along `axis` and zero on every other axis.
#[inline]
#[must_use]
pub fn axis_vector<const D: usize>(
    axis: crate::math::Axis,
    magnitude: GridCoordinate,
) -> GridVector<D> {
    core::array::from_fn(|i| if i == axis.index() { magnitude } else { 0 })
}
