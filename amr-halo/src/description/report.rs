use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use arcstr::ArcStr;
use serde::{Serialize, Serializer};

use crate::ghost::GhostArea;
use crate::math::{GridVector, IndexBox};
use crate::overlap::Overlap;

/// Serializable summary of the result of
/// [`hierarchy_overlaps()`](crate::overlap::hierarchy_overlaps).
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[non_exhaustive]
pub struct OverlapReport<const D: usize> {
    /// Overlaps of each level, by level index.
    pub levels: BTreeMap<usize, Vec<OverlapRecord<D>>>,
}

/// One [`Overlap`] within an [`OverlapReport`].
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[non_exhaustive]
pub struct OverlapRecord<const D: usize> {
    /// Name of the quantity the overlap is of.
    pub quantity: ArcStr,
    /// Names of the two patches, in order of origin.
    pub patches: [ArcStr; 2],
    /// The overlapping region.
    pub region: IndexBox<D>,
    /// Translations applied to each patch’s ghost box.
    #[serde(serialize_with = "serialize_vector_pair")]
    pub offsets: [GridVector<D>; 2],
    /// Whether the overlap is across the periodic boundary.
    pub periodic: bool,
}

/// Serializable summary of the result of
/// [`particle_ghost_area_boxes()`](crate::ghost::particle_ghost_area_boxes) or
/// [`level_ghost_boxes()`](crate::ghost::level_ghost_boxes).
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[non_exhaustive]
pub struct GhostAreaReport<const D: usize> {
    /// Ghost areas of each level, by level index.
    pub levels: BTreeMap<usize, Vec<GhostAreaRecord<D>>>,
}

/// One [`GhostArea`] within a [`GhostAreaReport`].
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[non_exhaustive]
pub struct GhostAreaRecord<const D: usize> {
    /// Name of the patch.
    pub patch: ArcStr,
    /// Name of the particle quantity.
    pub quantity: ArcStr,
    /// The boxes of the ghost area.
    pub boxes: Vec<IndexBox<D>>,
}

/// Summarizes overlaps by the names of what they involve.
#[allow(clippy::missing_inline_in_public_items)]
pub fn report_overlaps<const D: usize>(
    overlaps: &BTreeMap<usize, Vec<Overlap<'_, D>>>,
) -> OverlapReport<D> {
    OverlapReport {
        levels: overlaps
            .iter()
            .map(|(&level, overlaps)| {
                let records = overlaps
                    .iter()
                    .map(|overlap| {
                        let (first, second) = overlap.patch_datas;
                        OverlapRecord {
                            quantity: first.name().clone(),
                            patches: [first.patch_name().clone(), second.patch_name().clone()],
                            region: overlap.region,
                            offsets: [overlap.offsets.0, overlap.offsets.1],
                            periodic: overlap.is_periodic(),
                        }
                    })
                    .collect();
                (level, records)
            })
            .collect(),
    }
}

/// Summarizes ghost areas by the names of what they involve.
#[allow(clippy::missing_inline_in_public_items)]
pub fn report_ghost_areas<const D: usize>(
    areas: &BTreeMap<usize, Vec<GhostArea<'_, D>>>,
) -> GhostAreaReport<D> {
    GhostAreaReport {
        levels: areas
            .iter()
            .map(|(&level, areas)| {
                let records = areas
                    .iter()
                    .map(|area| GhostAreaRecord {
                        patch: area.patch_data.patch_name().clone(),
                        quantity: area.patch_data.name().clone(),
                        boxes: area.boxes.clone(),
                    })
                    .collect();
                (level, records)
            })
            .collect(),
    }
}

// Arrays of generic length don't implement `Serialize`, so write them as slices.
fn serialize_vector_pair<S: Serializer, const D: usize>(
    pair: &[GridVector<D>; 2],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    [pair[0].as_slice(), pair[1].as_slice()].serialize(serializer)
}
