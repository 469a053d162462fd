//! Hierarchy descriptions: a JSON format for specifying a [`Hierarchy`] without writing code,
//! and serializable reports of the results of geometry passes over it.
//!
//! A description looks like this:
//!
//! ```json
//! {
//!   "type": "HierarchyV1",
//!   "domain": { "lower": [0], "upper": [63] },
//!   "refinement_ratio": 2,
//!   "cell_width": [0.1],
//!   "ghost_width": 2,
//!   "quantities": [
//!     { "name": "particles", "kind": "particle" },
//!     { "name": "Bx", "kind": "field", "yee": "Bx" },
//!     { "name": "rho", "kind": "field", "centering": ["dual"] }
//!   ],
//!   "levels": [
//!     [ { "name": "p0", "lower": [0], "upper": [31] }, { "lower": [32], "upper": [63] } ]
//!   ]
//! }
//! ```
//!
//! * `levels` lists the patches of each level, starting from level 0. Patch boxes are in the
//!   index space of their own level.
//! * Every patch carries every quantity in `quantities`.
//! * `refinement_ratio` defaults to 2, `ghost_width` to 1, and `cell_width` to 1 along every
//!   axis. Each quantity may override `ghost_width`.
//! * A patch without a `name` is named `"{level}#{index}"`.
//! * A patch’s origin is its lower corner times the cell width of its level, which is
//!   `cell_width` divided by `refinement_ratio` once per level.

use alloc::string::String;

use serde::{Deserialize, Serialize};

use crate::GeometryError;
use crate::hierarchy::Hierarchy;
use crate::math::GridOverflowError;

mod conversion;
mod report;
pub use report::*;
mod schema;


/// A parsed hierarchy description, not yet checked for consistency.
///
/// See the [module documentation](self) for the format.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(transparent)]
pub struct HierarchyDescription(schema::HierarchySer);

impl HierarchyDescription {
    /// Parses a description from JSON text.
    #[allow(clippy::missing_inline_in_public_items)]
    pub fn from_json_str(json: &str) -> Result<Self, DescriptionError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Returns the number of axes of the described index space, as given by the domain.
    ///
    /// Use this to choose the `D` to pass to [`Self::build()`].
    #[inline]
    pub fn dimension(&self) -> usize {
        match &self.0 {
            schema::HierarchySer::HierarchyV1 { domain, .. } => domain.lower.len(),
        }
    }

    /// Constructs the described [`Hierarchy`].
    ///
    /// Returns an error if the description is not `D`-dimensional throughout, if any of its
    /// values are unusable, or if the resulting hierarchy is inconsistent.
    #[allow(clippy::missing_inline_in_public_items)]
    pub fn build<const D: usize>(&self) -> Result<Hierarchy<D>, DescriptionError> {
        conversion::build(&self.0)
    }
}

/// Errors from reading a [`HierarchyDescription`] or building a [`Hierarchy`] from it.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum DescriptionError {
    /// The text was not valid JSON, or did not match the description format.
    #[error("invalid hierarchy description")]
    Json(#[from] serde_json::Error),

    /// A list of coordinates or centerings had a different length than the number of axes.
    #[error("{what} has {found} components, but the hierarchy has {expected} axes")]
    DimensionMismatch {
        /// What was being read, such as `"domain"`.
        what: String,
        /// Number of axes requested.
        expected: usize,
        /// Number of components found.
        found: usize,
    },

    /// A box’s bounds were inverted.
    #[error("{what} is not a valid box")]
    BadBox {
        /// What was being read, such as `"domain"`.
        what: String,
        /// The problem with the box.
        source: GridOverflowError,
    },

    /// A field quantity specified neither `centering` nor `yee`.
    #[error("field quantity {0:?} needs either a centering or a Yee component")]
    MissingCentering(String),

    /// A field quantity specified both `centering` and `yee`.
    #[error("field quantity {0:?} has both a centering and a Yee component")]
    AmbiguousCentering(String),

    /// A field quantity named an unknown Yee component.
    #[error("field quantity {quantity:?} has an unknown Yee component {component:?}")]
    UnknownYeeQuantity {
        /// Name of the quantity.
        quantity: String,
        /// The component name as written.
        component: String,
        /// The problem with the Yee component.
        source: strum::ParseError,
    },

    /// A cell width was not a finite positive number.
    #[error("cell width {0} is not a finite positive number")]
    InvalidCellWidth(f64),

    /// A patch’s origin could not be computed from its position and the cell width.
    #[error("origin of patch {0:?} is not a number")]
    InvalidOrigin(String),

    /// The described hierarchy was inconsistent.
    #[error("described hierarchy is inconsistent")]
    Geometry(#[from] GeometryError),
}
