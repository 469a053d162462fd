use core::fmt;

/// Enumeration of the axes of index space.
///
/// Can be used to infallibly index 3-component arrays, and to index shorter arrays when the
/// axis is known to be within the dimensionality, as it is for every axis produced by
/// [`Axis::first()`].
#[expect(clippy::exhaustive_enums)]
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[repr(u8)]
#[allow(missing_docs)]
pub enum Axis {
    X = 0,
    Y = 1,
    Z = 2,
}

impl Axis {
    /// All three axes in the standard order, [X, Y, Z].
    pub const ALL: [Self; 3] = [Self::X, Self::Y, Self::Z];

    /// The axis along which periodic wraparound and patch ordering happen.
    pub const PERIODIC: Self = Self::X;

    /// Returns the first `D` axes in the standard order.
    ///
    /// Panics if `D` is greater than 3.
    ///
    /// ```
    /// # extern crate amr_halo_base as amr_halo;
    /// use amr_halo::math::Axis;
    ///
    /// assert_eq!(Axis::first::<2>(), [Axis::X, Axis::Y]);
    /// ```
    #[inline]
    #[track_caller]
    pub fn first<const D: usize>() -> [Self; D] {
        assert!(D <= 3, "index space has at most 3 axes, not {D}");
        core::array::from_fn(|i| Self::ALL[i])
    }

    /// Convert the axis to a number for indexing arrays.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Format the axis as one of the strings "x", "y", or "z" (lowercase).
impl fmt::LowerHex for Axis {
    #[allow(clippy::missing_inline_in_public_items)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        })
    }
}
/// Format the axis as one of the strings "X", "Y", or "Z" (uppercase).
impl fmt::UpperHex for Axis {
    #[allow(clippy::missing_inline_in_public_items)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Axis::X => "X",
            Axis::Y => "Y",
            Axis::Z => "Z",
        })
    }
}

impl From<Axis> for usize {
    #[inline]
    fn from(value: Axis) -> Self {
        value as usize
    }
}

mod impl_index_axis {
    use super::Axis;
    use core::ops;

    // Indexing past the end of a shorter array panics, like any other out-of-bounds index.
    impl<T, const D: usize> ops::Index<Axis> for [T; D] {
        type Output = T;

        #[inline]
        fn index(&self, index: Axis) -> &Self::Output {
            &self[index as usize]
        }
    }
    impl<T, const D: usize> ops::IndexMut<Axis> for [T; D] {
        #[inline]
        fn index_mut(&mut self, index: Axis) -> &mut Self::Output {
            &mut self[index as usize]
        }
    }
}
