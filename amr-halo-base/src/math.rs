//! Mathematical utilities and decisions.

mod axis;
pub use axis::*;
mod coord;
pub use coord::*;
mod index_box;
pub use index_box::*;
mod index_iter;
pub use index_iter::*;
#[cfg(feature = "serde")]
mod serde_impls;

// We make an assumption in several places that `usize` is at least 32 bits.
// It's likely that compilation would not succeed anyway, but let's make it explicit.
#[cfg(target_pointer_width = "16")]
compile_error!("amr-halo does not support platforms with less than 32-bit `usize`");
