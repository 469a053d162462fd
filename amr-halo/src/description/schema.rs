//! Data types which represent hierarchy descriptions in a format explicitly designed for
//! serialization, and versioned so that older descriptions stay readable.
//!
//! All types in this file should avoid referring to types outside this file, so that changes
//! to the internal representations do not leak into the description format.
//!
//! Points and vectors are represented as arrays with one element per axis, of whatever length
//! the description uses; the length is checked against the requested dimension when the
//! hierarchy is built.

use alloc::string::String;
use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(tag = "type")]
pub(crate) enum HierarchySer {
    HierarchyV1 {
        domain: BoxSer,
        #[serde(default = "default_refinement_ratio")]
        refinement_ratio: i32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        cell_width: Option<Vec<f64>>,
        #[serde(default = "default_ghost_width")]
        ghost_width: u32,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        quantities: Vec<QuantityV1Ser>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        levels: Vec<Vec<PatchV1Ser>>,
    },
}
fn default_refinement_ratio() -> i32 {
    2
}
fn default_ghost_width() -> u32 {
    1
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub(crate) struct BoxSer {
    pub(crate) lower: Vec<i32>,
    pub(crate) upper: Vec<i32>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub(crate) struct QuantityV1Ser {
    pub(crate) name: String,
    pub(crate) kind: QuantityKindSer,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) centering: Option<Vec<CenteringSer>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) yee: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) ghost_width: Option<u32>,
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum QuantityKindSer {
    Particle,
    Field,
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum CenteringSer {
    Primal,
    Dual,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub(crate) struct PatchV1Ser {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) name: Option<String>,
    #[serde(flatten)]
    pub(crate) bounds: BoxSer,
}
