//! This library is an internal component of [`amr-halo`],
//! which defines the integer index-space types that the geometry engines operate on.
//! Do not depend on this library; use only [`amr-halo`] instead.
//!
//! [`amr-halo`]: https://crates.io/crates/amr-halo/

#![no_std]
// Crate-specific lint settings. (General settings can be found in the workspace manifest.)
#![cfg_attr(
    not(any(test, feature = "arbitrary")),
    warn(clippy::std_instead_of_core, clippy::std_instead_of_alloc)
)]
#![warn(clippy::missing_inline_in_public_items)]

#[cfg(any(feature = "std", test))]
#[cfg_attr(test, macro_use)]
extern crate std;
#[macro_use]
extern crate alloc;

/// Do not use this module directly; its contents are re-exported from `amr-halo`.
pub mod math;

/// Do not use this module directly; its contents are re-exported from `amr-halo`.
pub mod util;
