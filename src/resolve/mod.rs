//! Name resolution against a [`ResolutionContext`](crate::context::ResolutionContext)
//! and its inverse, shortest reference generation.

mod probe;
mod reference;
mod resolver;

pub use probe::{FnProbe, KnownSymbols, NoSymbols, SymbolProbe};
pub use reference::SymbolReferenceGenerator;
pub use resolver::SymbolResolver;
