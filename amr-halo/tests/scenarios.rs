//! Geometry passes over whole hierarchies, checking the properties their results must have.

#![allow(missing_docs)]

use std::collections::BTreeSet;

use pretty_assertions::assert_eq;
use rstest::rstest;

use amr_halo::ghost::{level_ghost_boxes, particle_ghost_area_boxes};
use amr_halo::hierarchy::{Centering, Hierarchy, Patch, Quantity};
use amr_halo::math::{GridCoordinate, GridPoint, IndexBox, NotNan};
use amr_halo::overlap::{Overlap, hierarchy_overlaps};
use amr_halo::periodic::periodic_list;
use amr_halo::yee::YeeQuantity;

const GHOST_WIDTH: u32 = 2;

fn patch<const D: usize>(
    name: &str,
    lower: [GridCoordinate; D],
    upper: [GridCoordinate; D],
) -> Patch<D> {
    let mut patch = Patch::new(
        name,
        lower.map(|c| NotNan::new(f64::from(c)).unwrap()),
        IndexBox::from_lower_upper(lower, upper),
    );
    patch
        .add_quantity("particles", Quantity::Particle, GHOST_WIDTH)
        .unwrap();
    patch
}

/// Collects the cells of `boxes`, asserting that no cell is in more than one box.
fn disjoint_cells<const D: usize>(boxes: &[IndexBox<D>]) -> BTreeSet<GridPoint<D>> {
    let mut cells = BTreeSet::new();
    for b in boxes {
        for cell in b.interior_iter() {
            assert!(cells.insert(cell), "cell {cell:?} is in more than one box");
        }
    }
    cells
}

/// A 2D hierarchy with a single root patch and the given patches at level 1.
fn two_level_2d(fine: Vec<Patch<2>>) -> Hierarchy<2> {
    let mut h = Hierarchy::new(IndexBox::from_lower_upper([0, 0], [15, 15]), 2).unwrap();
    h.add_level(0, vec![patch("root", [0, 0], [15, 15])])
        .unwrap();
    h.add_level(1, fine).unwrap();
    h
}

fn layout_2d(case: usize) -> Vec<Patch<2>> {
    match case {
        0 => vec![
            patch("left", [0, 0], [9, 31]),
            patch("middle", [10, 4], [19, 20]),
            patch("right", [20, 0], [31, 15]),
        ],
        1 => vec![
            patch("a", [2, 2], [7, 7]),
            patch("b", [8, 2], [13, 9]),
            patch("c", [20, 10], [31, 31]),
        ],
        2 => vec![patch("whole", [0, 0], [31, 31])],
        3 => vec![
            patch("upper", [16, 0], [31, 31]),
            patch("lower", [0, 8], [15, 23]),
        ],
        _ => unreachable!(),
    }
}

#[test]
fn two_patches_with_yee_fields() {
    let quantities = [YeeQuantity::Bx, YeeQuantity::Ey, YeeQuantity::Rho];
    let patches = [("p0", 0, 31), ("p1", 32, 63)].map(|(name, lower, upper)| {
        let mut p = patch(name, [lower], [upper]);
        for q in quantities {
            p.add_quantity(q.to_string(), q.quantity::<1>(), GHOST_WIDTH)
                .unwrap();
        }
        p
    });
    let mut h = Hierarchy::new(IndexBox::from_lower_upper([0], [63]), 2).unwrap();
    h.add_level(0, patches.into()).unwrap();

    let overlaps = hierarchy_overlaps(&h).unwrap();
    let summary: Vec<(&str, [GridCoordinate; 2], [GridCoordinate; 2])> = overlaps[&0]
        .iter()
        .map(|o| {
            (
                o.patch_datas.0.name().as_str(),
                [o.region.lower()[0], o.region.upper()[0]],
                [o.offsets.0[0], o.offsets.1[0]],
            )
        })
        .collect();

    // Bx and Ey are primal along X in 1D; rho and the particles are not.
    assert_eq!(
        summary,
        vec![
            ("Bx", [30, 34], [0, 0]),
            ("Ey", [30, 34], [0, 0]),
            ("particles", [30, 33], [0, 0]),
            ("rho", [30, 33], [0, 0]),
            ("Bx", [-2, 2], [0, -64]),
            ("Bx", [62, 66], [64, 0]),
            ("Ey", [-2, 2], [0, -64]),
            ("Ey", [62, 66], [64, 0]),
            ("particles", [-2, 1], [0, -64]),
            ("particles", [62, 65], [64, 0]),
            ("rho", [-2, 1], [0, -64]),
            ("rho", [62, 65], [64, 0]),
        ]
    );
}

#[test]
fn whole_domain_patch_ghost_areas() {
    let mut h = Hierarchy::new(IndexBox::from_lower_upper([0], [63]), 2).unwrap();
    h.add_level(0, vec![patch("whole", [0], [63])]).unwrap();

    let areas = particle_ghost_area_boxes(&h).unwrap();
    assert_eq!(
        areas[&0][0].boxes,
        vec![
            IndexBox::from_lower_upper([-2], [-1]),
            IndexBox::from_lower_upper([64], [65]),
        ]
    );
    assert!(level_ghost_boxes(&h).unwrap().is_empty());
    assert!(hierarchy_overlaps(&h).unwrap()[&0].is_empty());
}

#[test]
fn dual_fields_in_2d() {
    let mut h = Hierarchy::new(IndexBox::from_lower_upper([0, 0], [31, 31]), 2).unwrap();
    let mut patches = vec![
        patch("left", [0, 0], [15, 31]),
        patch("right", [16, 0], [31, 31]),
    ];
    for p in &mut patches {
        p.add_quantity(
            "rho",
            Quantity::Field {
                centering: [Centering::Dual; 2],
            },
            GHOST_WIDTH,
        )
        .unwrap();
    }
    h.add_level(0, patches).unwrap();

    let overlaps = hierarchy_overlaps(&h).unwrap();
    let rho: Vec<&Overlap<'_, 2>> = overlaps[&0]
        .iter()
        .filter(|o| o.patch_datas.0.name() == "rho")
        .collect();
    assert_eq!(
        rho.iter().map(|o| (o.region, o.offsets)).collect::<Vec<_>>(),
        vec![
            (
                IndexBox::from_lower_upper([14, -2], [17, 33]),
                ([0, 0], [0, 0])
            ),
            (
                IndexBox::from_lower_upper([-2, -2], [1, 33]),
                ([0, 0], [-32, 0])
            ),
            (
                IndexBox::from_lower_upper([30, -2], [33, 33]),
                ([32, 0], [0, 0])
            ),
        ]
    );
}

#[rstest]
fn periodic_overlaps_come_in_mirrored_pairs(
    #[values((0, 31), (0, 20), (5, 40), (2, 61))] split: (GridCoordinate, GridCoordinate),
) {
    let (first_upper, last_lower) = (split.0 + 10, split.1 + 1);
    let mut h = Hierarchy::new(IndexBox::from_lower_upper([0], [63]), 2).unwrap();
    h.add_level(
        0,
        vec![
            patch("first", [split.0], [first_upper]),
            patch("last", [last_lower], [63]),
        ],
    )
    .unwrap();

    let overlaps = hierarchy_overlaps(&h).unwrap();
    let periodic: Vec<&Overlap<'_, 1>> = overlaps[&0].iter().filter(|o| o.is_periodic()).collect();
    assert_eq!(periodic.len() % 2, 0);
    for pair in periodic.chunks(2) {
        let [forward, mirror] = pair else {
            unreachable!()
        };
        assert_eq!(forward.offsets, ([0], [-64]));
        assert_eq!(mirror.offsets, ([64], [0]));
        assert_eq!(
            forward.region.translate([64]),
            mirror.region,
            "mirror is the same region seen from the other side"
        );
    }
}

#[rstest]
fn ghost_area_covers_halo_exactly(#[values(0, 1, 2, 3)] case: usize) {
    let h = two_level_2d(layout_2d(case));
    let areas = particle_ghost_area_boxes(&h).unwrap();
    for level in h.levels() {
        for (patch, area) in level.patches().iter().zip(&areas[&level.index()]) {
            let data = patch.particle_data().unwrap();
            assert_eq!(area.patch_data, data);

            let expected: BTreeSet<_> = data
                .ghost_box()
                .interior_iter()
                .filter(|&cell| !data.interior().contains_index(cell))
                .collect();
            assert_eq!(disjoint_cells(&area.boxes), expected, "{}", patch.name());
        }
    }
}

#[rstest]
fn level_ghosts_are_uncovered_halo(#[values(0, 1, 2, 3)] case: usize) {
    let h = two_level_2d(layout_2d(case));
    let areas = particle_ghost_area_boxes(&h).unwrap();
    let level_ghosts = level_ghost_boxes(&h).unwrap();
    assert_eq!(level_ghosts.keys().copied().collect::<Vec<_>>(), vec![1]);

    let level = h.level(1).unwrap();
    let neighbors = periodic_list(level.patches(), level.domain()).unwrap();
    for ghost in &level_ghosts[&1] {
        let (index, _) = level
            .patches()
            .iter()
            .enumerate()
            .find(|(_, p)| p.name() == ghost.patch_data.patch_name())
            .unwrap();
        let ghost_cells = disjoint_cells(&ghost.boxes);
        assert!(!ghost_cells.is_empty(), "empty records are omitted");

        let area_cells = disjoint_cells(&areas[&1][index].boxes);
        assert!(ghost_cells.is_subset(&area_cells));

        for neighbor in neighbors.iter().filter(|n| n.source_index() != index) {
            assert!(
                ghost_cells
                    .iter()
                    .all(|&cell| !neighbor.interior().contains_index(cell)),
                "level ghost of {} overlaps {}",
                ghost.patch_data.patch_name(),
                neighbor.patch().name(),
            );
        }
    }
}

#[test]
fn level_ghosts_for_stacked_2d_layout() {
    // "upper" covers x ∈ [16, 31] and, through its periodic copy, x ∈ [-16, -1]; "lower"
    // covers x ∈ [0, 15] only where y ∈ [8, 23], so the rest of each halo remains.
    let h = two_level_2d(layout_2d(3));
    let ghosts = level_ghost_boxes(&h).unwrap();
    let by_patch: Vec<(&str, BTreeSet<GridPoint<2>>)> = ghosts[&1]
        .iter()
        .map(|g| (g.patch_data.patch_name().as_str(), disjoint_cells(&g.boxes)))
        .collect();
    assert_eq!(
        by_patch.iter().map(|(name, _)| *name).collect::<Vec<_>>(),
        vec!["upper", "lower"]
    );

    let lower_ghosts = &by_patch[1].1;
    // Directly above and below "lower", nothing covers the halo.
    assert!(lower_ghosts.contains(&[5, 6]));
    assert!(lower_ghosts.contains(&[5, 25]));
    // To either side, "upper" and its periodic copy do.
    assert!(!lower_ghosts.contains(&[-1, 10]));
    assert!(!lower_ghosts.contains(&[16, 10]));
}
