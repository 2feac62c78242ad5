//! # phpns
//!
//! Namespace and import handling for PHP sources: parsing the resolution
//! contexts of a file, resolving references against them, computing the
//! shortest reference to a symbol, and synthesizing import statements.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! project  → Reading files and directories, parse cache
//!   ↓
//! resolve  → Resolver, existence probes, reference generator
//!   ↓
//! syntax   → Lexer, token normalizer, context parser
//!   ↓
//! context  → Resolution contexts, import statements, import synthesis
//!   ↓
//! base     → Primitives (Symbol, LineCol, TextRange)
//! ```

/// Foundation types: Symbol, positions, ranges
pub mod base;

/// Resolution contexts and import synthesis
pub mod context;

/// Error types
pub mod error;

/// Reading sources and files with memoized parsing
pub mod project;

/// Symbol resolution and shortest references
pub mod resolve;

/// Lexer, token normalizer and resolution context parser
pub mod syntax;

pub use base::{LineCol, LineIndex, Symbol, TextRange, TextSize};
pub use context::{ResolutionContext, ResolutionContextGenerator, UseClause, UseKind, UseStatement};
pub use error::{Error, Result};
pub use project::{ParseCache, ResolutionContextReader, SourceLocator, StaticLocator};
pub use resolve::{KnownSymbols, NoSymbols, SymbolProbe, SymbolReferenceGenerator, SymbolResolver};
pub use syntax::{ParsedResolutionContext, ParsedSymbol, ParsedUseStatement, ResolutionContextParser, SymbolKind};
