#![allow(clippy::missing_inline_in_public_items)]

use core::fmt;

use manyfmt::{Fmt, Refmt as _};

/// Format type for [`manyfmt::Fmt`] which is similar to [`fmt::Debug`], but uses an
/// alternate concise format.
///
/// This format may be on one line despite the pretty-printing option, and may lose
/// precision or Rust syntax in favor of a short at-a-glance representation.
#[expect(clippy::exhaustive_structs)]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct ConciseDebug;

impl<T: Fmt<ConciseDebug>, const N: usize> Fmt<ConciseDebug> for [T; N] {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>, fopt: &ConciseDebug) -> fmt::Result {
        fmt.debug_list().entries(self.iter().map(|item| item.refmt(fopt))).finish()
    }
}

/// Physical coordinates, such as patch origins, are printed with three decimal places
/// and an explicit sign.
impl Fmt<ConciseDebug> for f64 {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>, _: &ConciseDebug) -> fmt::Result {
        write!(fmt, "{self:+.3?}")
    }
}
