//! Periodic wraparound at the borders of a level’s domain.
//!
//! The domain is periodic along [`Axis::PERIODIC`] (X), with a period equal to the domain’s
//! extent along that axis. Rather than special-casing the boundary, the engines work on a
//! [`periodic_list()`]: the level’s patches plus translated [`VirtualPatch`] copies of the
//! patches at the borders, placed one period away so that ordinary adjacency tests find the
//! neighbor across the boundary.

use alloc::string::String;
use alloc::vec::Vec;

use manyfmt::Refmt as _;

use crate::GeometryError;
use crate::hierarchy::{Patch, PatchData};
use crate::math::{Axis, GridCoordinate, GridVector, IndexBox, axis_vector, negate};
use crate::util::ConciseDebug;

// -------------------------------------------------------------------------------------------------

/// One of the two borders of a domain along [`Axis::PERIODIC`].
#[derive(
    Clone,
    Copy,
    Debug,
    Eq,
    Hash,
    PartialEq,
    strum::Display,
    strum::EnumIter,
    strum::EnumString,
    strum::IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
#[expect(clippy::exhaustive_enums)]
pub enum Border {
    /// The border at the domain’s lower bound.
    Lower,
    /// The border at the domain’s upper bound.
    Upper,
}

impl Border {
    /// Parses the lowercase name of a border, `"lower"` or `"upper"`.
    #[allow(clippy::missing_inline_in_public_items)]
    pub fn from_name(name: &str) -> Result<Self, GeometryError> {
        name.parse()
            .map_err(|_: strum::ParseError| GeometryError::UnknownBorder(String::from(name)))
    }
}

/// Returns whether `interior` reaches the given border of `domain`, i.e. whether its range
/// along the periodic axis includes the domain’s bound on that side.
///
/// ```
/// # extern crate amr_halo;
/// use amr_halo::math::IndexBox;
/// use amr_halo::periodic::{touches_domain_border, Border};
///
/// let domain = IndexBox::from_lower_upper([0], [63]);
/// let patch = IndexBox::from_lower_upper([32], [63]);
/// assert!(touches_domain_border(patch, domain, Border::Upper));
/// assert!(!touches_domain_border(patch, domain, Border::Lower));
/// ```
#[allow(clippy::missing_inline_in_public_items)]
pub fn touches_domain_border<const D: usize>(
    interior: IndexBox<D>,
    domain: IndexBox<D>,
    border: Border,
) -> bool {
    let bound = match border {
        Border::Lower => domain.lower()[Axis::PERIODIC],
        Border::Upper => domain.upper()[Axis::PERIODIC],
    };
    interior.axis_range(Axis::PERIODIC).contains(&bound)
}

/// Returns the translation by one period of `domain`: its extent along the periodic axis,
/// and zero along the others.
#[allow(clippy::missing_inline_in_public_items)]
pub fn period_vector<const D: usize>(domain: IndexBox<D>) -> Result<GridVector<D>, GeometryError> {
    let size = domain.size()[Axis::PERIODIC];
    let period =
        GridCoordinate::try_from(size).map_err(|_| GeometryError::PeriodTooLarge { size })?;
    Ok(axis_vector(Axis::PERIODIC, period))
}

/// Returns `patches`, each paired with its index in `patches`, sorted by origin.
///
/// The sort is stable, so patches with equal origins keep their given order.
#[allow(clippy::missing_inline_in_public_items)]
pub fn sort_by_origin<const D: usize>(patches: &[Patch<D>]) -> Vec<(usize, &Patch<D>)> {
    let mut sorted: Vec<(usize, &Patch<D>)> = patches.iter().enumerate().collect();
    sorted.sort_by_key(|(_, patch)| patch.origin());
    sorted
}

/// Finds the patch touching the given border of `domain`, if any.
///
/// Returns [`GeometryError::UnsupportedPeriodicConfiguration`] if there is more than one.
pub(crate) fn border_patch<'h, const D: usize>(
    sorted: &[(usize, &'h Patch<D>)],
    domain: IndexBox<D>,
    border: Border,
) -> Result<Option<(usize, &'h Patch<D>)>, GeometryError> {
    let touching: Vec<(usize, &'h Patch<D>)> = sorted
        .iter()
        .copied()
        .filter(|(_, patch)| touches_domain_border(patch.interior(), domain, border))
        .collect();
    match *touching.as_slice() {
        [] => Ok(None),
        [single] => Ok(Some(single)),
        _ => Err(GeometryError::UnsupportedPeriodicConfiguration {
            border,
            patches: touching
                .into_iter()
                .map(|(_, patch)| patch.name().clone())
                .collect(),
        }),
    }
}

// -------------------------------------------------------------------------------------------------

/// A view of a [`Patch`] at a translated position, used to model periodic wraparound without
/// copying or modifying the patch.
///
/// Produced by [`periodic_list()`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct VirtualPatch<'h, const D: usize> {
    patch: &'h Patch<D>,
    source_index: usize,
    offset: GridVector<D>,
    interior: IndexBox<D>,
}

impl<'h, const D: usize> VirtualPatch<'h, D> {
    fn new(
        source_index: usize,
        patch: &'h Patch<D>,
        offset: GridVector<D>,
    ) -> Result<Self, GeometryError> {
        Ok(Self {
            patch,
            source_index,
            offset,
            interior: patch.interior().checked_translate(offset)?,
        })
    }

    /// The patch this is a view of.
    #[inline]
    pub fn patch(&self) -> &'h Patch<D> {
        self.patch
    }

    /// Index of [`Self::patch()`] in the slice of patches the list was made from.
    ///
    /// A patch and its periodic copies share the same source index.
    #[inline]
    pub fn source_index(&self) -> usize {
        self.source_index
    }

    /// Translation from the patch’s actual position to this view’s position.
    #[inline]
    pub fn offset(&self) -> GridVector<D> {
        self.offset
    }

    /// Returns whether this view is translated, i.e. is a periodic copy.
    #[inline]
    pub fn is_periodic_copy(&self) -> bool {
        self.offset != [0; D]
    }

    /// The patch’s interior box, translated.
    #[inline]
    pub fn interior(&self) -> IndexBox<D> {
        self.interior
    }

    /// The ghost box of the given patch data, translated the same way as this view.
    #[allow(clippy::missing_inline_in_public_items)]
    pub fn ghost_box(&self, data: &PatchData<D>) -> Result<IndexBox<D>, GeometryError> {
        Ok(data.ghost_box().checked_translate(self.offset)?)
    }
}

/// Returns the patches sorted by origin, extended with periodic copies of the border patches.
///
/// If a patch touches the upper border of `domain`, a copy of it translated by minus one
/// period, so that it lies just below the lower border, is placed first. If a patch touches
/// the lower border, a copy translated by one period, just above the upper border, is placed
/// last. Both tests are made against the patches themselves, never against the copies.
/// A single patch spanning the whole domain therefore appears three times.
///
/// Returns [`GeometryError::UnsupportedPeriodicConfiguration`] if more than one patch touches
/// the same border.
///
/// ```
/// # extern crate amr_halo;
/// use amr_halo::hierarchy::Patch;
/// use amr_halo::math::{IndexBox, NotNan};
/// use amr_halo::periodic::periodic_list;
///
/// let domain = IndexBox::from_lower_upper([0], [63]);
/// let patches = [
///     Patch::new("right", [NotNan::new(3.2).unwrap()], IndexBox::from_lower_upper([32], [63])),
///     Patch::new("left", [NotNan::new(0.0).unwrap()], IndexBox::from_lower_upper([0], [31])),
/// ];
/// let list = periodic_list(&patches, domain).unwrap();
/// assert_eq!(
///     list.iter().map(|vp| (vp.patch().name().as_str(), vp.interior())).collect::<Vec<_>>(),
///     vec![
///         ("right", IndexBox::from_lower_upper([-32], [-1])),
///         ("left", IndexBox::from_lower_upper([0], [31])),
///         ("right", IndexBox::from_lower_upper([32], [63])),
///         ("left", IndexBox::from_lower_upper([64], [95])),
///     ]
/// );
/// ```
#[allow(clippy::missing_inline_in_public_items)]
pub fn periodic_list<'h, const D: usize>(
    patches: &'h [Patch<D>],
    domain: IndexBox<D>,
) -> Result<Vec<VirtualPatch<'h, D>>, GeometryError> {
    let sorted = sort_by_origin(patches);
    let period = period_vector(domain)?;
    let at_upper = border_patch(&sorted, domain, Border::Upper)?;
    let at_lower = border_patch(&sorted, domain, Border::Lower)?;

    let mut list = Vec::with_capacity(sorted.len() + 2);
    if let Some((index, patch)) = at_upper {
        list.push(VirtualPatch::new(index, patch, negate(period))?);
    }
    for (index, patch) in sorted {
        list.push(VirtualPatch::new(index, patch, [0; D])?);
    }
    if let Some((index, patch)) = at_lower {
        list.push(VirtualPatch::new(index, patch, period)?);
    }

    log::trace!(
        "periodic list over {domain}: {count} patches, {copies} periodic copies",
        domain = domain.refmt(&ConciseDebug),
        count = patches.len(),
        copies = list.len() - patches.len(),
    );
    Ok(list)
}
