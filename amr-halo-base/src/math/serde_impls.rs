#![allow(clippy::missing_inline_in_public_items)]

use alloc::vec::Vec;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::math::{GridCoordinate, GridPoint, IndexBox};

#[derive(Debug, Serialize)]
struct IndexBoxSer<'a> {
    // This one isn't an explicitly versioned enum because I expect we'll not need to change it
    lower: &'a [GridCoordinate],
    upper: &'a [GridCoordinate],
}

#[derive(Debug, Deserialize)]
struct IndexBoxDe {
    lower: Vec<GridCoordinate>,
    upper: Vec<GridCoordinate>,
}

impl<const D: usize> Serialize for IndexBox<D> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        IndexBoxSer {
            lower: &self.lower(),
            upper: &self.upper(),
        }
        .serialize(serializer)
    }
}

impl<'de, const D: usize> Deserialize<'de> for IndexBox<D> {
    fn deserialize<De>(deserializer: De) -> Result<Self, De::Error>
    where
        De: Deserializer<'de>,
    {
        let IndexBoxDe { lower, upper } = IndexBoxDe::deserialize(deserializer)?;
        let lower = to_point::<D, De::Error>(lower)?;
        let upper = to_point::<D, De::Error>(upper)?;
        IndexBox::checked_from_lower_upper(lower, upper).map_err(serde::de::Error::custom)
    }
}

fn to_point<const D: usize, E: serde::de::Error>(
    coordinates: Vec<GridCoordinate>,
) -> Result<GridPoint<D>, E> {
    let len = coordinates.len();
    GridPoint::<D>::try_from(coordinates).map_err(|_| {
        E::invalid_length(len, &format!("{D} coordinates").as_str())
    })
}
