//! Overlaps between the ghost boxes of neighboring patches.
//!
//! Each [`Overlap`] identifies a region where two patches both hold values of the same
//! quantity, one of them as ghost (halo) values, so that data must be exchanged there.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use itertools::Itertools as _;
use manyfmt::Refmt as _;

use crate::GeometryError;
use crate::hierarchy::{self, Hierarchy, Patch, PatchData};
use crate::math::{GridVector, IndexBox, negate};
use crate::periodic::{Border, border_patch, period_vector, sort_by_origin};
use crate::util::ConciseDebug;

/// An overlap between the ghost boxes of the same quantity on two patches.
///
/// Produced by [`compute_overlaps()`].
#[derive(Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub struct Overlap<'h, const D: usize> {
    /// The two overlapping patch data descriptors, in order of their patches’ origins.
    pub patch_datas: (&'h PatchData<D>, &'h PatchData<D>),

    /// The overlapping region, with the [field adjustment](crate::hierarchy::Quantity::field_box)
    /// already applied.
    ///
    /// This is in the coordinates of the data that was *not* translated: for an overlap with
    /// `offsets == (0, -period)` it lies around the first patch, and for
    /// `offsets == (+period, 0)` around the second.
    pub region: IndexBox<D>,

    /// Translations which were applied to the ghost boxes of `patch_datas.0` and
    /// `patch_datas.1` respectively to find this overlap. Both are zero unless the overlap
    /// is across the periodic boundary.
    pub offsets: (GridVector<D>, GridVector<D>),
}

impl<const D: usize> Overlap<'_, D> {
    /// Returns whether this overlap is across the periodic boundary.
    #[inline]
    pub fn is_periodic(&self) -> bool {
        self.offsets != ([0; D], [0; D])
    }
}

/// Computes the overlaps between the ghost boxes of all pairs of `patches`, all belonging to
/// one level whose domain is `domain`.
///
/// For every pair of distinct patches, in order of origin, and every quantity both patches
/// carry, an [`Overlap`] with zero offsets is produced if their ghost boxes intersect.
///
/// Then the first and last patches by origin are tested against each other across the
/// periodic boundary. Where the last patch’s ghost box, translated by minus one period,
/// meets the first patch’s, an overlap with offsets `(0, -period)` is produced, followed by
/// its mirror image, found by translating the first patch’s ghost box by plus one period,
/// with offsets `(+period, 0)`.
///
/// Levels with fewer than two patches have no overlaps.
///
/// Returns [`GeometryError::PeriodicAsymmetry`] if a periodic overlap has no mirror image,
/// and [`GeometryError::UnsupportedPeriodicConfiguration`] if more than one patch touches
/// the same border of the domain.
#[allow(clippy::missing_inline_in_public_items)]
pub fn compute_overlaps<const D: usize>(
    patches: &[Patch<D>],
    domain: IndexBox<D>,
) -> Result<Vec<Overlap<'_, D>>, GeometryError> {
    let sorted: Vec<&Patch<D>> = sort_by_origin(patches)
        .into_iter()
        .map(|(_, patch)| patch)
        .collect();
    let mut overlaps = Vec::new();

    for (&a, &b) in sorted.iter().tuple_combinations() {
        for (data_a, data_b) in a.shared_data(b) {
            if let Some(region) = data_a.ghost_box().intersection(data_b.ghost_box()) {
                overlaps.push(Overlap {
                    patch_datas: (data_a, data_b),
                    region: data_a.quantity().field_box(region),
                    offsets: ([0; D], [0; D]),
                });
            }
        }
    }

    if let [first, .., last] = *sorted.as_slice() {
        check_single_border_patches(patches, domain)?;
        let period = period_vector(domain)?;
        for (data_first, data_last) in first.shared_data(last) {
            let wrapped_last = data_last.ghost_box().checked_translate(negate(period))?;
            let Some(region) = data_first.ghost_box().intersection(wrapped_last) else {
                continue;
            };
            overlaps.push(Overlap {
                patch_datas: (data_first, data_last),
                region: data_first.quantity().field_box(region),
                offsets: ([0; D], negate(period)),
            });

            let wrapped_first = data_first.ghost_box().checked_translate(period)?;
            let mirror = wrapped_first
                .intersection(data_last.ghost_box())
                .ok_or_else(|| GeometryError::PeriodicAsymmetry {
                    quantity: data_first.name().clone(),
                    first: first.name().clone(),
                    last: last.name().clone(),
                })?;
            overlaps.push(Overlap {
                patch_datas: (data_first, data_last),
                region: data_first.quantity().field_box(mirror),
                offsets: (period, [0; D]),
            });
        }
    }

    for overlap in &overlaps {
        log::trace!(
            "overlap of {quantity:?} between {a:?} and {b:?}: {region} at offsets {offsets:?}",
            quantity = overlap.patch_datas.0.name(),
            a = overlap.patch_datas.0.patch_name(),
            b = overlap.patch_datas.1.patch_name(),
            region = overlap.region.refmt(&ConciseDebug),
            offsets = overlap.offsets,
        );
    }
    Ok(overlaps)
}

/// Computes the [`compute_overlaps()`] of every level of `hierarchy`, each against that
/// level’s refined domain box.
///
/// Levels are independent of each other; with the `auto-threads` feature they are processed
/// in parallel.
#[allow(clippy::missing_inline_in_public_items)]
pub fn hierarchy_overlaps<const D: usize>(
    hierarchy: &Hierarchy<D>,
) -> Result<BTreeMap<usize, Vec<Overlap<'_, D>>>, GeometryError> {
    hierarchy::map_levels(hierarchy.levels().collect(), |level| {
        let overlaps = compute_overlaps(level.patches(), level.domain())?;
        log::debug!(
            "level {index}: {count} overlaps ({periodic} periodic) among {patches} patches",
            index = level.index(),
            count = overlaps.len(),
            periodic = overlaps.iter().filter(|o| o.is_periodic()).count(),
            patches = level.patches().len(),
        );
        Ok(overlaps)
    })
}

/// Rejects levels where more than one patch touches either border.
fn check_single_border_patches<const D: usize>(
    patches: &[Patch<D>],
    domain: IndexBox<D>,
) -> Result<(), GeometryError> {
    let sorted = sort_by_origin(patches);
    border_patch(&sorted, domain, Border::Lower)?;
    border_patch(&sorted, domain, Border::Upper)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::{Centering, Quantity};
    use crate::math::{GridCoordinate, NotNan};
    use pretty_assertions::assert_eq;

    /// Simplified form of an [`Overlap`] for comparison.
    type Summary<'h, const D: usize> = (
        &'h str,
        (&'h str, &'h str),
        IndexBox<D>,
        (GridVector<D>, GridVector<D>),
    );

    fn summarize<'h, const D: usize>(overlaps: &[Overlap<'h, D>]) -> Vec<Summary<'h, D>> {
        overlaps
            .iter()
            .map(|o| {
                let (a, b) = o.patch_datas;
                (
                    a.name().as_str(),
                    (a.patch_name().as_str(), b.patch_name().as_str()),
                    o.region,
                    o.offsets,
                )
            })
            .collect()
    }

    fn patch_1d(
        name: &str,
        lower: GridCoordinate,
        upper: GridCoordinate,
        quantities: &[(&str, Quantity<1>)],
    ) -> Patch<1> {
        let mut patch = Patch::new(
            name,
            [NotNan::new(f64::from(lower) * 0.1).unwrap()],
            IndexBox::from_lower_upper([lower], [upper]),
        );
        for &(quantity_name, quantity) in quantities {
            patch.add_quantity(quantity_name, quantity, 2).unwrap();
        }
        patch
    }

    const DUAL: Quantity<1> = Quantity::Field {
        centering: [Centering::Dual],
    };
    const PRIMAL: Quantity<1> = Quantity::Field {
        centering: [Centering::Primal],
    };

    fn b(lower: GridCoordinate, upper: GridCoordinate) -> IndexBox<1> {
        IndexBox::from_lower_upper([lower], [upper])
    }

    #[test]
    fn two_patches_dual_field() {
        let domain = b(0, 63);
        let patches = [
            patch_1d("p0", 0, 31, &[("rho", DUAL)]),
            patch_1d("p1", 32, 63, &[("rho", DUAL)]),
        ];
        let overlaps = compute_overlaps(&patches, domain).unwrap();
        assert_eq!(
            summarize(&overlaps),
            vec![
                ("rho", ("p0", "p1"), b(30, 33), ([0], [0])),
                ("rho", ("p0", "p1"), b(-2, 1), ([0], [-64])),
                ("rho", ("p0", "p1"), b(62, 65), ([64], [0])),
            ]
        );
    }

    #[test]
    fn primal_field_adjusted_once() {
        let domain = b(0, 63);
        let patches = [
            patch_1d("p0", 0, 31, &[("Ey", PRIMAL)]),
            patch_1d("p1", 32, 63, &[("Ey", PRIMAL)]),
        ];
        let overlaps = compute_overlaps(&patches, domain).unwrap();
        assert_eq!(
            overlaps.iter().map(|o| o.region).collect::<Vec<_>>(),
            vec![b(30, 34), b(-2, 2), b(62, 66)]
        );
    }

    #[test]
    fn particles_not_adjusted() {
        let domain = b(0, 63);
        let patches = [
            patch_1d("p0", 0, 31, &[("ions", Quantity::Particle)]),
            patch_1d("p1", 32, 63, &[("ions", Quantity::Particle)]),
        ];
        let overlaps = compute_overlaps(&patches, domain).unwrap();
        assert_eq!(overlaps[0].region, b(30, 33));
    }

    #[test]
    fn sorted_by_origin_not_given_order() {
        let domain = b(0, 63);
        let patches = [
            patch_1d("p1", 32, 63, &[("rho", DUAL)]),
            patch_1d("p0", 0, 31, &[("rho", DUAL)]),
        ];
        let overlaps = compute_overlaps(&patches, domain).unwrap();
        assert!(overlaps.iter().all(|o| o.patch_datas.0.patch_name() == "p0"));
        assert_eq!(overlaps.len(), 3);
    }

    #[test]
    fn absent_quantity_skipped() {
        let domain = b(0, 63);
        let patches = [
            patch_1d("p0", 0, 31, &[("rho", DUAL), ("ions", Quantity::Particle)]),
            patch_1d("p1", 32, 63, &[("rho", DUAL)]),
        ];
        let overlaps = compute_overlaps(&patches, domain).unwrap();
        assert!(overlaps.iter().all(|o| o.patch_datas.0.name() == "rho"));
        assert_eq!(overlaps.len(), 3);
    }

    #[test]
    fn single_patch_no_overlaps() {
        let domain = b(0, 63);
        let patches = [patch_1d("whole", 0, 63, &[("rho", DUAL)])];
        assert_eq!(compute_overlaps(&patches, domain), Ok(vec![]));
    }

    #[test]
    fn no_patches_no_overlaps() {
        assert_eq!(compute_overlaps::<1>(&[], b(0, 63)), Ok(vec![]));
    }

    #[test]
    fn distant_patches_no_overlaps() {
        let domain = b(0, 127);
        let patches = [
            patch_1d("p0", 10, 20, &[("rho", DUAL)]),
            patch_1d("p1", 60, 80, &[("rho", DUAL)]),
        ];
        assert_eq!(compute_overlaps(&patches, domain), Ok(vec![]));
    }

    #[test]
    fn periodic_without_touching_border() {
        // Neither patch reaches a border, but their halos still meet across it.
        let domain = b(0, 63);
        let patches = [
            patch_1d("p0", 1, 31, &[("rho", DUAL)]),
            patch_1d("p1", 32, 62, &[("rho", DUAL)]),
        ];
        let overlaps = compute_overlaps(&patches, domain).unwrap();
        assert_eq!(
            overlaps
                .iter()
                .map(|o| (o.region, o.offsets))
                .collect::<Vec<_>>(),
            vec![
                (b(30, 33), ([0], [0])),
                (b(-1, 0), ([0], [-64])),
                (b(63, 64), ([64], [0])),
            ]
        );
    }

    #[test]
    fn three_patches() {
        let domain = b(0, 95);
        let patches = [
            patch_1d("p0", 0, 31, &[("rho", DUAL)]),
            patch_1d("p1", 32, 63, &[("rho", DUAL)]),
            patch_1d("p2", 64, 95, &[("rho", DUAL)]),
        ];
        let overlaps = compute_overlaps(&patches, domain).unwrap();
        assert_eq!(
            summarize(&overlaps),
            vec![
                ("rho", ("p0", "p1"), b(30, 33), ([0], [0])),
                ("rho", ("p1", "p2"), b(62, 65), ([0], [0])),
                ("rho", ("p0", "p2"), b(-2, 1), ([0], [-96])),
                ("rho", ("p0", "p2"), b(94, 97), ([96], [0])),
            ]
        );
    }

    #[test]
    fn two_dimensional() {
        let domain = IndexBox::from_lower_upper([0, 0], [63, 15]);
        let quantity = Quantity::Field {
            centering: [Centering::Dual, Centering::Primal],
        };
        let make = |name: &str, lower: [GridCoordinate; 2], upper: [GridCoordinate; 2]| {
            let mut patch = Patch::new(
                name,
                lower.map(|c| NotNan::new(f64::from(c)).unwrap()),
                IndexBox::from_lower_upper(lower, upper),
            );
            patch.add_quantity("By", quantity, 1).unwrap();
            patch
        };
        let patches = [make("a", [0, 0], [31, 15]), make("b", [32, 0], [63, 15])];
        let overlaps = compute_overlaps(&patches, domain).unwrap();
        assert_eq!(
            overlaps
                .iter()
                .map(|o| (o.region, o.offsets))
                .collect::<Vec<_>>(),
            vec![
                (
                    IndexBox::from_lower_upper([31, -1], [32, 17]),
                    ([0, 0], [0, 0])
                ),
                (
                    IndexBox::from_lower_upper([-1, -1], [0, 17]),
                    ([0, 0], [-64, 0])
                ),
                (
                    IndexBox::from_lower_upper([63, -1], [64, 17]),
                    ([64, 0], [0, 0])
                ),
            ]
        );
    }

    #[test]
    fn periodic_overlaps_are_symmetric() {
        let domain = b(0, 63);
        let patches = [
            patch_1d("p0", 0, 31, &[("rho", DUAL)]),
            patch_1d("p1", 32, 63, &[("rho", DUAL)]),
        ];
        let overlaps = compute_overlaps(&patches, domain).unwrap();
        let periodic: Vec<&Overlap<'_, 1>> = overlaps.iter().filter(|o| o.is_periodic()).collect();
        let [forward, backward] = periodic.as_slice() else {
            panic!("expected two periodic overlaps, got {periodic:?}");
        };
        // Each is the other translated by one period.
        assert_eq!(forward.region.translate([64]), backward.region);
    }

    /// Four patches tiling a 64×64 domain two by two, so that two patches touch each border.
    fn quadrants() -> [Patch<2>; 4] {
        [
            ("a", [0, 0]),
            ("b", [0, 32]),
            ("c", [32, 0]),
            ("d", [32, 32]),
        ]
        .map(|(name, lower): (&str, [GridCoordinate; 2])| {
            let mut patch = Patch::new(
                name,
                lower.map(|c| NotNan::new(f64::from(c)).unwrap()),
                IndexBox::from_lower_upper(lower, lower.map(|c| c + 31)),
            );
            patch.add_quantity("ions", Quantity::Particle, 1).unwrap();
            patch
        })
    }

    #[test]
    fn two_patches_on_one_border_rejected() {
        let domain = IndexBox::from_lower_upper([0, 0], [63, 63]);
        assert_eq!(
            compute_overlaps(&quadrants(), domain),
            Err(GeometryError::UnsupportedPeriodicConfiguration {
                border: Border::Lower,
                patches: vec!["a".into(), "b".into()],
            })
        );
    }

    #[test]
    fn hierarchy_rejects_two_patches_on_one_border() {
        let mut h = Hierarchy::new(IndexBox::from_lower_upper([0, 0], [63, 63]), 2).unwrap();
        h.add_level(0, quadrants().into()).unwrap();
        assert!(matches!(
            hierarchy_overlaps(&h),
            Err(GeometryError::UnsupportedPeriodicConfiguration {
                border: Border::Lower,
                ..
            })
        ));
    }

    #[test]
    fn period_too_large() {
        let domain = b(0, GridCoordinate::MAX);
        let patches = [
            patch_1d("p0", 0, 31, &[("rho", DUAL)]),
            patch_1d("p1", 32, 63, &[("rho", DUAL)]),
        ];
        assert!(matches!(
            compute_overlaps(&patches, domain),
            Err(GeometryError::PeriodTooLarge { size: 0x8000_0000 })
        ));
    }
}
