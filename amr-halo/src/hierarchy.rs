//! The patch hierarchy that geometry passes operate on: [`Hierarchy`], [`Level`], [`Patch`],
//! and the [`PatchData`] descriptors carried by patches.
//!
//! These types only describe *where* data lives. They are built once from the simulation
//! state (or from a [`description`](crate::description)) and then read, never mutated, by
//! the [`overlap`](crate::overlap) and [`ghost`](crate::ghost) engines.

use alloc::collections::BTreeMap;
use alloc::collections::btree_map;
use alloc::vec::Vec;

use arcstr::ArcStr;
use itertools::Itertools as _;
use manyfmt::Refmt as _;

use crate::GeometryError;
use crate::math::{Axis, FreePoint, GridCoordinate, GridSizeCoord, IndexBox, free_point_to_f64};
use crate::util::ConciseDebug;

#[cfg(feature = "auto-threads")]
use rayon::iter::{IntoParallelIterator as _, ParallelIterator as _};

// -------------------------------------------------------------------------------------------------

/// Placement of a field quantity’s values relative to the cells of the grid, along one axis.
///
/// Written in lowercase, `"primal"` or `"dual"`, when formatted or parsed.
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
#[strum(serialize_all = "lowercase")]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[expect(clippy::exhaustive_enums)]
pub enum Centering {
    /// Node-centered. Values sit on cell corners, so a box of cells `lower..=upper` also
    /// owns the node at `upper + 1`.
    Primal,
    /// Cell-centered. Values sit at cell centers, one per cell.
    Dual,
}

// -------------------------------------------------------------------------------------------------

/// The kind of data a [`PatchData`] describes.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[non_exhaustive]
pub enum Quantity<const D: usize> {
    /// A grid field, with a [`Centering`] for each axis.
    Field {
        /// Centering along each axis.
        centering: [Centering; D],
    },
    /// Particles, which are not attached to grid nodes or cells.
    Particle,
}

impl<const D: usize> Quantity<D> {
    /// Returns whether this is [`Quantity::Particle`].
    #[inline]
    pub fn is_particle(&self) -> bool {
        matches!(self, Quantity::Particle)
    }

    /// Converts a box of cells into the box of values this quantity actually stores there.
    ///
    /// For a field, the upper bound is extended by one on every axis along which the field
    /// is [`Centering::Primal`], because the node at `upper + 1` belongs to the box too.
    /// Dual axes, and particle quantities, are left unchanged.
    ///
    /// This must be applied exactly once to any box computed from cell-indexed boxes;
    /// applying it twice claims one node too many.
    ///
    /// ```
    /// # extern crate amr_halo;
    /// use amr_halo::hierarchy::{Centering::{Dual, Primal}, Quantity};
    /// use amr_halo::math::IndexBox;
    ///
    /// let region = IndexBox::from_lower_upper([30, 0], [33, 9]);
    /// let field = Quantity::Field { centering: [Primal, Dual] };
    /// assert_eq!(field.field_box(region), IndexBox::from_lower_upper([30, 0], [34, 9]));
    /// assert_eq!(Quantity::Particle.field_box(region), region);
    /// ```
    #[allow(clippy::missing_inline_in_public_items)]
    #[must_use]
    pub fn field_box(&self, region: IndexBox<D>) -> IndexBox<D> {
        match self {
            Quantity::Particle => region,
            Quantity::Field { centering } => Axis::first::<D>()
                .into_iter()
                .filter(|&axis| centering[axis] == Centering::Primal)
                .fold(region, IndexBox::grow_upper),
        }
    }
}

// -------------------------------------------------------------------------------------------------

/// Describes one quantity living on one [`Patch`]: what kind of data it is, and which boxes
/// of index space it covers.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PatchData<const D: usize> {
    name: ArcStr,
    patch_name: ArcStr,
    quantity: Quantity<D>,
    interior: IndexBox<D>,
    /// Invariant: contains `interior`.
    ghost_box: IndexBox<D>,
}

impl<const D: usize> PatchData<D> {
    /// Constructs a [`PatchData`] whose ghost box is `interior` grown by `ghost_width` cells
    /// on every side.
    ///
    /// The ghost box is in cell indices for every kind of quantity; the extra node owned by
    /// primal fields is accounted for by [`Quantity::field_box()`] when boxes are used.
    #[allow(clippy::missing_inline_in_public_items)]
    pub fn new(
        name: impl Into<ArcStr>,
        patch_name: impl Into<ArcStr>,
        quantity: Quantity<D>,
        interior: IndexBox<D>,
        ghost_width: GridSizeCoord,
    ) -> Self {
        Self {
            name: name.into(),
            patch_name: patch_name.into(),
            quantity,
            interior,
            ghost_box: interior.grow(ghost_width),
        }
    }

    /// Constructs a [`PatchData`] with an explicitly chosen ghost box.
    ///
    /// Returns [`GeometryError::GhostBoxTooSmall`] if `ghost_box` does not contain `interior`.
    #[allow(clippy::missing_inline_in_public_items)]
    pub fn with_ghost_box(
        name: impl Into<ArcStr>,
        patch_name: impl Into<ArcStr>,
        quantity: Quantity<D>,
        interior: IndexBox<D>,
        ghost_box: IndexBox<D>,
    ) -> Result<Self, GeometryError> {
        let name = name.into();
        let patch_name = patch_name.into();
        if !ghost_box.contains_box(interior) {
            return Err(GeometryError::GhostBoxTooSmall {
                patch: patch_name,
                quantity: name,
            });
        }
        Ok(Self {
            name,
            patch_name,
            quantity,
            interior,
            ghost_box,
        })
    }

    /// Name of the quantity.
    #[inline]
    pub fn name(&self) -> &ArcStr {
        &self.name
    }

    /// Name of the [`Patch`] this data belongs to.
    #[inline]
    pub fn patch_name(&self) -> &ArcStr {
        &self.patch_name
    }

    /// Kind of the quantity.
    #[inline]
    pub fn quantity(&self) -> Quantity<D> {
        self.quantity
    }

    /// The patch’s interior box, in cell indices.
    #[inline]
    pub fn interior(&self) -> IndexBox<D> {
        self.interior
    }

    /// The interior plus the surrounding halo, in cell indices.
    #[inline]
    pub fn ghost_box(&self) -> IndexBox<D> {
        self.ghost_box
    }
}

// -------------------------------------------------------------------------------------------------

/// A named rectangular region of a [`Level`], and the data it carries.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Patch<const D: usize> {
    name: ArcStr,
    origin: FreePoint<D>,
    interior: IndexBox<D>,
    patch_datas: BTreeMap<ArcStr, PatchData<D>>,
}

impl<const D: usize> Patch<D> {
    /// Constructs a [`Patch`] with no data.
    ///
    /// `origin` is the physical position of the patch; it is used to order patches along
    /// the periodic axis.
    #[allow(clippy::missing_inline_in_public_items)]
    pub fn new(name: impl Into<ArcStr>, origin: FreePoint<D>, interior: IndexBox<D>) -> Self {
        Self {
            name: name.into(),
            origin,
            interior,
            patch_datas: BTreeMap::new(),
        }
    }

    /// Adds a data descriptor to this patch.
    ///
    /// Returns an error if the descriptor’s interior or patch name differ from this patch’s,
    /// or if there is already data for a quantity of the same name.
    #[allow(clippy::missing_inline_in_public_items)]
    pub fn insert_data(&mut self, data: PatchData<D>) -> Result<(), GeometryError> {
        if data.interior != self.interior || data.patch_name != self.name {
            return Err(GeometryError::InconsistentPatchData {
                patch: self.name.clone(),
                quantity: data.name,
            });
        }
        match self.patch_datas.entry(data.name.clone()) {
            btree_map::Entry::Occupied(_) => Err(GeometryError::DuplicateQuantity {
                patch: self.name.clone(),
                quantity: data.name,
            }),
            btree_map::Entry::Vacant(entry) => {
                entry.insert(data);
                Ok(())
            }
        }
    }

    /// Adds a data descriptor for `quantity` whose ghost box is this patch’s interior grown
    /// by `ghost_width`, and returns it.
    #[allow(clippy::missing_inline_in_public_items)]
    pub fn add_quantity(
        &mut self,
        name: impl Into<ArcStr>,
        quantity: Quantity<D>,
        ghost_width: GridSizeCoord,
    ) -> Result<&PatchData<D>, GeometryError> {
        let name = name.into();
        self.insert_data(PatchData::new(
            name.clone(),
            self.name.clone(),
            quantity,
            self.interior,
            ghost_width,
        ))?;
        Ok(&self.patch_datas[&name])
    }

    /// Name of the patch.
    #[inline]
    pub fn name(&self) -> &ArcStr {
        &self.name
    }

    /// Physical position of the patch.
    #[inline]
    pub fn origin(&self) -> FreePoint<D> {
        self.origin
    }

    /// The patch’s interior box, in cell indices.
    #[inline]
    pub fn interior(&self) -> IndexBox<D> {
        self.interior
    }

    /// Returns the data descriptor for the named quantity, if present.
    #[inline]
    pub fn patch_data(&self, name: &str) -> Option<&PatchData<D>> {
        self.patch_datas.get(name)
    }

    /// Returns all data descriptors of this patch, ordered by quantity name.
    #[inline]
    pub fn patch_datas(&self) -> impl ExactSizeIterator<Item = &PatchData<D>> + '_ {
        self.patch_datas.values()
    }

    /// Returns the first particle data descriptor of this patch, by quantity name.
    #[inline]
    pub fn particle_data(&self) -> Option<&PatchData<D>> {
        self.patch_datas.values().find(|data| data.quantity.is_particle())
    }

    /// Returns the pairs of data descriptors for the quantities that both `self` and `other`
    /// carry, ordered by quantity name. Quantities present on only one patch are skipped.
    #[allow(clippy::missing_inline_in_public_items)]
    pub fn shared_data<'a>(
        &'a self,
        other: &'a Self,
    ) -> impl Iterator<Item = (&'a PatchData<D>, &'a PatchData<D>)> + 'a {
        self.patch_datas
            .iter()
            .filter_map(move |(name, data)| Some((data, other.patch_datas.get(name)?)))
    }
}

// -------------------------------------------------------------------------------------------------

/// The patches at one refinement index of a [`Hierarchy`].
///
/// Obtained from [`Hierarchy::add_level()`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Level<const D: usize> {
    index: usize,
    domain: IndexBox<D>,
    patches: Vec<Patch<D>>,
}

impl<const D: usize> Level<D> {
    /// Refinement index of this level; 0 is the coarsest.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns whether this is the coarsest level.
    #[inline]
    pub fn is_root(&self) -> bool {
        self.index == 0
    }

    /// The domain box of the hierarchy, refined to this level’s resolution.
    #[inline]
    pub fn domain(&self) -> IndexBox<D> {
        self.domain
    }

    /// The patches of this level, in the order they were given.
    #[inline]
    pub fn patches(&self) -> &[Patch<D>] {
        &self.patches
    }

    /// Returns the patch with the given name, if present.
    #[inline]
    pub fn patch(&self, name: &str) -> Option<&Patch<D>> {
        self.patches.iter().find(|patch| patch.name.as_str() == name)
    }
}

// -------------------------------------------------------------------------------------------------

/// A stack of [`Level`]s over one periodic domain, each refined by a constant ratio relative
/// to the previous.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Hierarchy<const D: usize> {
    domain: IndexBox<D>,
    refinement_ratio: GridCoordinate,
    levels: BTreeMap<usize, Level<D>>,
}

impl<const D: usize> Hierarchy<D> {
    /// Constructs a [`Hierarchy`] with no levels.
    ///
    /// `domain` is the domain box at level 0, and `refinement_ratio` the number of cells
    /// each cell of a level is split into, along each axis, at the next level.
    #[allow(clippy::missing_inline_in_public_items)]
    pub fn new(
        domain: IndexBox<D>,
        refinement_ratio: GridCoordinate,
    ) -> Result<Self, GeometryError> {
        if refinement_ratio < 1 {
            return Err(GeometryError::InvalidRefinementRatio(refinement_ratio));
        }
        Ok(Self {
            domain,
            refinement_ratio,
            levels: BTreeMap::new(),
        })
    }

    /// The domain box at level 0.
    #[inline]
    pub fn domain(&self) -> IndexBox<D> {
        self.domain
    }

    /// Refinement ratio between consecutive levels.
    #[inline]
    pub fn refinement_ratio(&self) -> GridCoordinate {
        self.refinement_ratio
    }

    /// Returns the domain box at the resolution of the given level, i.e. refined by the
    /// cumulative ratio `refinement_ratio.pow(level)`.
    ///
    /// ```
    /// # extern crate amr_halo;
    /// use amr_halo::hierarchy::Hierarchy;
    /// use amr_halo::math::IndexBox;
    ///
    /// let h = Hierarchy::new(IndexBox::from_lower_upper([0], [63]), 2).unwrap();
    /// assert_eq!(h.refined_domain_box(0), Ok(IndexBox::from_lower_upper([0], [63])));
    /// assert_eq!(h.refined_domain_box(2), Ok(IndexBox::from_lower_upper([0], [255])));
    /// ```
    #[allow(clippy::missing_inline_in_public_items)]
    pub fn refined_domain_box(&self, level: usize) -> Result<IndexBox<D>, GeometryError> {
        if self.refinement_ratio == 1 {
            return Ok(self.domain);
        }
        let mut domain = self.domain;
        for _ in 0..level {
            domain = domain.refine(self.refinement_ratio)?;
        }
        Ok(domain)
    }

    /// Adds a level of patches at refinement index `index`.
    ///
    /// Returns an error if the level is already present, or if any two of the patches have
    /// overlapping interiors.
    #[allow(clippy::missing_inline_in_public_items)]
    pub fn add_level(
        &mut self,
        index: usize,
        patches: Vec<Patch<D>>,
    ) -> Result<&Level<D>, GeometryError> {
        if self.levels.contains_key(&index) {
            return Err(GeometryError::DuplicateLevel(index));
        }
        let domain = self.refined_domain_box(index)?;
        if let Some((first, second)) = patches
            .iter()
            .tuple_combinations()
            .find(|(a, b)| a.interior.intersection(b.interior).is_some())
        {
            return Err(GeometryError::OverlappingPatches {
                level: index,
                first: first.name.clone(),
                second: second.name.clone(),
            });
        }

        log::debug!(
            "level {index}: {count} patches in domain {domain}",
            count = patches.len(),
            domain = domain.refmt(&ConciseDebug),
        );
        for patch in &patches {
            log::trace!(
                "level {index}: patch {name:?} at {origin} covering {interior} with {data_count} quantities",
                name = patch.name,
                origin = free_point_to_f64(patch.origin).refmt(&ConciseDebug),
                interior = patch.interior.refmt(&ConciseDebug),
                data_count = patch.patch_datas.len(),
            );
        }

        Ok(self.levels.entry(index).or_insert(Level {
            index,
            domain,
            patches,
        }))
    }

    /// Returns the levels of this hierarchy, in increasing order of index.
    #[inline]
    pub fn levels(&self) -> btree_map::Values<'_, usize, Level<D>> {
        self.levels.values()
    }

    /// Returns the level with the given index, if present.
    #[inline]
    pub fn level(&self, index: usize) -> Option<&Level<D>> {
        self.levels.get(&index)
    }
}

/// Applies `f` to each of `levels`, collecting the results by level index.
///
/// With the `auto-threads` feature, the levels are processed in parallel.
/// Either way, the first error encountered, if any, is returned instead.
#[cfg(feature = "auto-threads")]
pub(crate) fn map_levels<'h, const D: usize, T, F>(
    levels: Vec<&'h Level<D>>,
    f: F,
) -> Result<BTreeMap<usize, T>, GeometryError>
where
    T: Send,
    F: Fn(&'h Level<D>) -> Result<T, GeometryError> + Sync + Send,
{
    levels
        .into_par_iter()
        .map(|level| Ok((level.index, f(level)?)))
        .collect()
}

#[cfg(not(feature = "auto-threads"))]
pub(crate) fn map_levels<'h, const D: usize, T, F>(
    levels: Vec<&'h Level<D>>,
    f: F,
) -> Result<BTreeMap<usize, T>, GeometryError>
where
    F: Fn(&'h Level<D>) -> Result<T, GeometryError>,
{
    levels
        .into_iter()
        .map(|level| Ok((level.index, f(level)?)))
        .collect()
}
