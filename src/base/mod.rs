//! Foundation types shared by every other module.
//!
//! - [`Symbol`] - names made of atoms, qualified or not
//! - [`TextRange`], [`TextSize`] - byte spans used for splicing
//! - [`LineCol`], [`LineIndex`] - line/column positions
//!
//! This module has NO dependencies on other phpns modules besides `error`.

mod span;
mod symbol;

pub use span::{LineCol, LineIndex, TextRange, TextSize};
pub use symbol::{NAMESPACE_ATOM, SEPARATOR, Symbol};
