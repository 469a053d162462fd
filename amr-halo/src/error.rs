use alloc::string::String;
use alloc::vec::Vec;

use arcstr::ArcStr;

use crate::math::{GridCoordinate, GridOverflowError, GridSizeCoord};
use crate::periodic::Border;

/// Errors which abort a geometry pass, or construction of the hierarchy it operates on.
///
/// None of these are recoverable by retrying; each indicates that the hierarchy, or a
/// request about it, is malformed.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum GeometryError {
    /// Box arithmetic overflowed the range of [`GridCoordinate`].
    #[error("index box arithmetic failed")]
    Overflow(#[from] GridOverflowError),

    /// A domain border was named with something other than `"lower"` or `"upper"`.
    #[error("unknown domain border {0:?}; expected \"lower\" or \"upper\"")]
    UnknownBorder(String),

    /// The refinement ratio between levels was not positive.
    #[error("refinement ratio must be at least 1, not {0}")]
    InvalidRefinementRatio(GridCoordinate),

    /// The periodic extent of a domain does not fit in a [`GridCoordinate`].
    #[error("domain extent {size} is too large to be periodic")]
    PeriodTooLarge {
        /// Extent of the domain along the periodic axis.
        size: GridSizeCoord,
    },

    /// A level index was added to a hierarchy twice.
    #[error("level {0} is already present in the hierarchy")]
    DuplicateLevel(usize),

    /// Two patches of one level have overlapping interiors.
    #[error("patches {first:?} and {second:?} of level {level} have overlapping interiors")]
    OverlappingPatches {
        /// Level containing the patches.
        level: usize,
        /// Name of one of the patches.
        first: ArcStr,
        /// Name of the other patch.
        second: ArcStr,
    },

    /// A patch data descriptor does not share the interior box, or the name, of the patch it
    /// was added to.
    #[error("patch data {quantity:?} does not belong to patch {patch:?}")]
    InconsistentPatchData {
        /// Name of the patch.
        patch: ArcStr,
        /// Name of the patch data’s quantity.
        quantity: ArcStr,
    },

    /// A patch has two patch data descriptors for the same quantity.
    #[error("patch {patch:?} already has data for quantity {quantity:?}")]
    DuplicateQuantity {
        /// Name of the patch.
        patch: ArcStr,
        /// Name of the quantity.
        quantity: ArcStr,
    },

    /// A ghost box did not contain the interior box it surrounds.
    #[error("ghost box of {quantity:?} on patch {patch:?} does not contain the patch interior")]
    GhostBoxTooSmall {
        /// Name of the patch.
        patch: ArcStr,
        /// Name of the quantity.
        quantity: ArcStr,
    },

    /// A patch has no particle data, so it has no particle ghost area.
    #[error("patch {patch:?} of level {level} has no particle data")]
    MissingParticles {
        /// Level containing the patch.
        level: usize,
        /// Name of the patch.
        patch: ArcStr,
    },

    /// More than one patch touches the same border of a periodic domain.
    ///
    /// Periodic wraparound pairs exactly one patch at the lower border with exactly one at
    /// the upper border; other arrangements are not supported.
    #[error("patches {patches:?} all touch the {border} border of the periodic domain; at most one may")]
    UnsupportedPeriodicConfiguration {
        /// The border that is touched.
        border: Border,
        /// Names of the patches touching it.
        patches: Vec<ArcStr>,
    },

    /// The overlap of the first and last patch across the periodic boundary was found in
    /// only one direction.
    #[error(
        "periodic overlap of {quantity:?} between patches {first:?} and {last:?} is not symmetric"
    )]
    PeriodicAsymmetry {
        /// Name of the quantity.
        quantity: ArcStr,
        /// Name of the first patch by origin.
        first: ArcStr,
        /// Name of the last patch by origin.
        last: ArcStr,
    },
}
