#![no_main]

use std::collections::BTreeSet;

use libfuzzer_sys::fuzz_target;
use pretty_assertions::assert_eq;

use amr_halo::math::{GridPoint, IndexBox};

fuzz_target!(|input: (IndexBox<2>, IndexBox<2>)| check_difference(input.0, input.1));

fn check_difference(a: IndexBox<2>, b: IndexBox<2>) {
    let pieces = a.difference(b);

    let mut cells: BTreeSet<GridPoint<2>> = BTreeSet::new();
    for piece in &pieces {
        assert!(a.contains_box(*piece), "{piece:?} is not within {a:?}");
        assert_eq!(piece.intersection(b), None, "{piece:?} meets {b:?}");
        for cell in piece.interior_iter() {
            assert!(cells.insert(cell), "pieces overlap at {cell:?}");
        }
    }

    let expected: BTreeSet<GridPoint<2>> = a
        .interior_iter()
        .filter(|&cell| !b.contains_index(cell))
        .collect();
    assert_eq!(cells, expected);
    assert_eq!(a.intersection(b), b.intersection(a));
}
