//! Resolution contexts: the namespace and imports in effect in a scope,
//! and synthesis of the imports needed to reference a set of symbols.

mod generator;
mod resolution;
mod use_statement;

pub use generator::ResolutionContextGenerator;
pub use resolution::ResolutionContext;
pub use use_statement::{UseClause, UseKind, UseStatement};
