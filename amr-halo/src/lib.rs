//! `amr_halo` computes the index-space geometry that drives ghost-cell (halo) exchange
//! in a patch-based adaptive mesh refinement hierarchy.
//!
//! Given a [`Hierarchy`] of levels, each an ordered collection of rectangular [`Patch`]es
//! carrying field and particle data, this crate answers two questions:
//!
//! * Which regions of neighboring patches’ ghost boxes overlap, including across the
//!   periodic boundary of the domain? See [`overlap::hierarchy_overlaps()`].
//! * Which parts of a patch’s particle halo are not covered by any sibling patch’s interior,
//!   and so must be filled from the next coarser level? See [`ghost::level_ghost_boxes()`].
//!
//! It computes only *which index regions* are involved; it never touches data values,
//! and it never mutates the hierarchy it is given. Periodic wraparound is modeled with
//! translated [`VirtualPatch`](periodic::VirtualPatch) views.
//!
//! ## Coordinate system
//!
//! * Index space has 1, 2, or 3 dimensions, chosen by the const generic parameter `D` found
//!   on most types. Indices are [`i32`] and boxes have inclusive bounds on both ends.
//! * Periodicity, and the ordering of patches by origin, are along the X axis.
//!
//! ## Crate features
//!
//! This crate, `amr_halo`, defines the following feature flags:
//!
//! * `std` (default):
//!   Enables nicer behavior of some dependencies. Currently required by the other features.
//! * `description` (default):
//!   Enables reading [`Hierarchy`]s from JSON [`description`]s, and serializable reports of
//!   computed overlaps and ghost areas.
//! * `auto-threads`:
//!   Enable use of threads to process the levels of a hierarchy in parallel, via
//!   [`rayon`]’s global thread pool.
//!   This feature does not affect the public API or results, only performance and dependencies.
//! * `arbitrary`: Adds implementations of the [`arbitrary::Arbitrary`] trait for
//!   fuzzing / property testing on types defined by this crate.
//!
//! ## Dependencies and global state
//!
//! `amr_halo` has no global state. However, it does write log messages using the [`log`]
//! crate and is therefore subject to that global configuration.
//!
//! `amr_halo` depends on and re-exports the following crates as part of its public API:
//!
//! * [`arcstr`] for names of patches and quantities (as `amr_halo::arcstr`).
//! * [`ordered_float`] (as `amr_halo::math::NotNan`).
//!
//! [`Hierarchy`]: crate::hierarchy::Hierarchy
//! [`Patch`]: crate::hierarchy::Patch
#![cfg_attr(
    not(feature = "arbitrary"),
    doc = "[`arbitrary::Arbitrary`]: https://docs.rs/arbitrary/1/arbitrary/trait.Arbitrary.html"
)]
#![cfg_attr(not(feature = "auto-threads"), doc = "[`rayon`]: https://docs.rs/rayon/")]
#![cfg_attr(
    not(feature = "description"),
    doc = "[`description`]: https://docs.rs/amr-halo/latest/amr_halo/description/"
)]
#![no_std]
// Crate-specific lint settings. (General settings can be found in the workspace manifest.)
#![forbid(unsafe_code)]
#![cfg_attr(
    not(any(test, feature = "arbitrary", feature = "description")),
    warn(clippy::std_instead_of_core, clippy::std_instead_of_alloc)
)]
// Lenience for tests.
#![cfg_attr(test,
    allow(clippy::float_cmp), // deterministic tests
    allow(clippy::redundant_clone), // prefer regularity over efficiency
)]

#[macro_use]
extern crate alloc;
#[cfg(any(feature = "std", test))]
#[cfg_attr(test, macro_use)]
extern crate std;

pub mod math;

#[cfg(feature = "description")]
pub mod description;
mod error;
pub use error::GeometryError;
pub mod ghost;
pub mod hierarchy;
pub mod overlap;
pub mod periodic;
pub mod util;
pub mod yee;

/// Re-export the version of the `arcstr` string library we're using.
pub use arcstr;
