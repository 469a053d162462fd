//! Centerings of the field components of a Yee-staggered grid.

use crate::hierarchy::Centering::{self, Dual, Primal};
use crate::hierarchy::Quantity;
use crate::math::Axis;

/// A field component of an electromagnetic or magnetohydrodynamic model laid out on a Yee
/// grid, where each component has a fixed [`Centering`] along each axis.
///
/// Names are the conventional symbols, such as `"Bx"` or `"Etot"`, and are case-sensitive.
/// [`strum::IntoEnumIterator`] lists the components in the conventional order.
#[derive(
    Clone,
    Copy,
    Debug,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    strum::Display,
    strum::EnumIter,
    strum::EnumString,
    strum::IntoStaticStr,
)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[expect(clippy::exhaustive_enums)]
#[allow(missing_docs)]
pub enum YeeQuantity {
    #[strum(serialize = "rho")]
    Rho,
    Bx,
    By,
    Bz,
    Vx,
    Vy,
    Vz,
    P,
    Mx,
    My,
    Mz,
    Etot,
    Ex,
    Ey,
    Ez,
    Jx,
    Jy,
    Jz,
}

impl YeeQuantity {
    /// Centering along each of the three axes.
    ///
    /// Magnetic field components are primal along their own axis; electric field and current
    /// components are dual along their own axis and primal along the others. Everything else
    /// is cell-centered.
    #[inline]
    pub const fn centering3(self) -> [Centering; 3] {
        use YeeQuantity::*;
        match self {
            Bx => [Primal, Dual, Dual],
            By => [Dual, Primal, Dual],
            Bz => [Dual, Dual, Primal],
            Ex | Jx => [Dual, Primal, Primal],
            Ey | Jy => [Primal, Dual, Primal],
            Ez | Jz => [Primal, Primal, Dual],
            Rho | Vx | Vy | Vz | P | Mx | My | Mz | Etot => [Dual; 3],
        }
    }

    /// Centering along each of the first `D` axes.
    ///
    /// Panics if `D` is greater than 3.
    ///
    /// ```
    /// # extern crate amr_halo;
    /// use amr_halo::hierarchy::Centering::{Dual, Primal};
    /// use amr_halo::yee::YeeQuantity;
    ///
    /// assert_eq!(YeeQuantity::Ey.centering::<2>(), [Primal, Dual]);
    /// assert_eq!(YeeQuantity::Bz.centering::<1>(), [Dual]);
    /// ```
    #[inline]
    #[track_caller]
    pub fn centering<const D: usize>(self) -> [Centering; D] {
        let full = self.centering3();
        Axis::first::<D>().map(|axis| full[axis])
    }

    /// The field [`Quantity`] with this component’s centering.
    #[inline]
    #[track_caller]
    pub fn quantity<const D: usize>(self) -> Quantity<D> {
        Quantity::Field {
            centering: self.centering(),
        }
    }
}
