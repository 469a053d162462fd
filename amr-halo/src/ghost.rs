//! Ghost areas: the parts of each patch’s particle halo outside its interior, and the subset
//! of those which no sibling patch can fill.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use crate::GeometryError;
use crate::hierarchy::{self, Hierarchy, Level, PatchData};
use crate::math::IndexBox;
use crate::periodic::periodic_list;

/// Boxes of index space belonging to the halo of one patch’s data.
///
/// Produced by [`particle_ghost_area_boxes()`] and [`level_ghost_boxes()`].
#[derive(Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub struct GhostArea<'h, const D: usize> {
    /// The particle data whose halo this is.
    pub patch_data: &'h PatchData<D>,
    /// Pairwise disjoint boxes, all within the ghost box of `patch_data` and outside its
    /// interior.
    pub boxes: Vec<IndexBox<D>>,
}

/// Computes, for every patch of every level, the difference between the ghost box and the
/// interior of the patch’s particle data: the halo ring around the patch.
///
/// The result has an entry for every level, listing the patches in their given order.
///
/// Returns [`GeometryError::MissingParticles`] if any patch has no particle data.
///
/// ```
/// # extern crate amr_halo;
/// use amr_halo::ghost::particle_ghost_area_boxes;
/// use amr_halo::hierarchy::{Hierarchy, Patch, Quantity};
/// use amr_halo::math::{IndexBox, NotNan};
///
/// let domain = IndexBox::from_lower_upper([0], [63]);
/// let mut patch = Patch::new("whole", [NotNan::new(0.0).unwrap()], domain);
/// patch.add_quantity("particles", Quantity::Particle, 2).unwrap();
/// let mut hierarchy = Hierarchy::new(domain, 2).unwrap();
/// hierarchy.add_level(0, vec![patch]).unwrap();
///
/// let areas = particle_ghost_area_boxes(&hierarchy).unwrap();
/// assert_eq!(
///     areas[&0][0].boxes,
///     vec![
///         IndexBox::from_lower_upper([-2], [-1]),
///         IndexBox::from_lower_upper([64], [65]),
///     ]
/// );
/// ```
#[allow(clippy::missing_inline_in_public_items)]
pub fn particle_ghost_area_boxes<const D: usize>(
    hierarchy: &Hierarchy<D>,
) -> Result<BTreeMap<usize, Vec<GhostArea<'_, D>>>, GeometryError> {
    hierarchy::map_levels(hierarchy.levels().collect(), level_ghost_areas)
}

/// Computes, for every patch of every level except the root, the parts of its particle ghost
/// area that are not covered by the interior of any other patch of the same level, counting
/// periodic copies of the border patches as neighbors too.
///
/// These are the boxes that must be filled from the next coarser level. The root level has
/// none by definition and gets no entry; every other level gets an entry, which lists only
/// the patches with something left to fill.
///
/// Returns [`GeometryError::MissingParticles`] if any patch of a non-root level has no
/// particle data.
#[allow(clippy::missing_inline_in_public_items)]
pub fn level_ghost_boxes<const D: usize>(
    hierarchy: &Hierarchy<D>,
) -> Result<BTreeMap<usize, Vec<GhostArea<'_, D>>>, GeometryError> {
    let levels = hierarchy.levels().filter(|level| !level.is_root()).collect();
    hierarchy::map_levels(levels, |level| {
        let neighbors = periodic_list(level.patches(), level.domain())?;
        let mut level_ghosts = Vec::new();

        for (index, area) in level_ghost_areas(level)?.into_iter().enumerate() {
            let mut remaining = area.boxes;
            for neighbor in &neighbors {
                if neighbor.source_index() == index {
                    continue;
                }
                let covered = neighbor.interior();
                remaining = remaining
                    .into_iter()
                    .flat_map(|piece| piece.difference(covered))
                    .collect();
            }
            if !remaining.is_empty() {
                level_ghosts.push(GhostArea {
                    patch_data: area.patch_data,
                    boxes: remaining,
                });
            }
        }

        log::debug!(
            "level {index}: {count} of {patches} patches need level ghosts",
            index = level.index(),
            count = level_ghosts.len(),
            patches = level.patches().len(),
        );
        Ok(level_ghosts)
    })
}

/// The particle ghost area of each patch of `level`, in the order of the level’s patches.
fn level_ghost_areas<const D: usize>(
    level: &Level<D>,
) -> Result<Vec<GhostArea<'_, D>>, GeometryError> {
    level
        .patches()
        .iter()
        .map(|patch| {
            let patch_data =
                patch
                    .particle_data()
                    .ok_or_else(|| GeometryError::MissingParticles {
                        level: level.index(),
                        patch: patch.name().clone(),
                    })?;
            Ok(GhostArea {
                patch_data,
                boxes: patch_data.ghost_box().difference(patch_data.interior()),
            })
        })
        .collect()
}
