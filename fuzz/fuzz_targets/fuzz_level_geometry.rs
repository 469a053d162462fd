#![no_main]

use libfuzzer_sys::{Corpus, fuzz_target};

use amr_halo::ghost::{level_ghost_boxes, particle_ghost_area_boxes};
use amr_halo::hierarchy::{Centering, Hierarchy, Patch, Quantity};
use amr_halo::math::{IndexBox, NotNan};
use amr_halo::overlap::hierarchy_overlaps;

#[derive(Debug, arbitrary::Arbitrary)]
struct LevelInput {
    domain: IndexBox<1>,
    fine_patches: Vec<IndexBox<1>>,
    ghost_width: u8,
    centering: Centering,
}

fuzz_target!(|input: LevelInput| -> Corpus { check_level(input) });

fn check_level(input: LevelInput) -> Corpus {
    let LevelInput {
        domain,
        fine_patches,
        ghost_width,
        centering,
    } = input;
    let ghost_width = u32::from(ghost_width % 8);

    let make_patch = |name: String, interior: IndexBox<1>| {
        let mut patch = Patch::new(
            name,
            [NotNan::new(f64::from(interior.lower()[0])).unwrap()],
            interior,
        );
        patch
            .add_quantity("particles", Quantity::Particle, ghost_width)
            .unwrap();
        patch
            .add_quantity(
                "field",
                Quantity::Field {
                    centering: [centering],
                },
                ghost_width,
            )
            .unwrap();
        patch
    };

    let Ok(mut hierarchy) = Hierarchy::new(domain, 2) else {
        return Corpus::Reject;
    };
    let root = make_patch(String::from("root"), domain);
    if hierarchy.add_level(0, vec![root]).is_err() {
        return Corpus::Reject;
    }
    let fine = fine_patches
        .into_iter()
        .enumerate()
        .map(|(i, interior)| make_patch(format!("fine{i}"), interior))
        .collect();
    if hierarchy.add_level(1, fine).is_err() {
        return Corpus::Reject;
    }

    // Unsupported periodic configurations are errors, never panics.
    let Ok(overlaps) = hierarchy_overlaps(&hierarchy) else {
        return Corpus::Keep;
    };
    for overlap in overlaps.values().flatten() {
        let (a, b) = overlap.patch_datas;
        assert_eq!(a.name(), b.name());
        assert_eq!(overlap.is_periodic(), overlap.offsets != ([0], [0]));
    }

    let areas = particle_ghost_area_boxes(&hierarchy).unwrap();
    if let Ok(level_ghosts) = level_ghost_boxes(&hierarchy) {
        for ghost in &level_ghosts[&1] {
            let area = areas[&1]
                .iter()
                .find(|area| area.patch_data == ghost.patch_data)
                .unwrap();
            for cell in ghost.boxes.iter().flat_map(|b| b.interior_iter()) {
                assert!(area.boxes.iter().any(|b| b.contains_index(cell)));
            }
        }
    }
    Corpus::Keep
}
