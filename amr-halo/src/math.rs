//! Mathematical utilities and decisions.

#[doc(inline)]
pub use amr_halo_base::math::*;

pub use ordered_float::NotNan;

/// Physical position of a patch, such as its origin, one coordinate per axis.
///
/// The components are [`NotNan`] so that positions have a total order, which patches are
/// sorted by.
pub type FreePoint<const D: usize> = [NotNan<FreeCoordinate>; D];

/// Converts a [`FreePoint`] back to plain floats, such as for formatting.
#[inline]
pub fn free_point_to_f64<const D: usize>(point: FreePoint<D>) -> [FreeCoordinate; D] {
    point.map(NotNan::into_inner)
}
