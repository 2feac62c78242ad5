//! Error types.
//!
//! Parsing and resolution are total over token input; errors only come
//! from building symbols out of untrusted strings, from unsupported
//! resolution kinds, from import synthesis on pathological input, and
//! from the file reading layer.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A symbol could not be built from the given atoms.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SymbolError {
    #[error("a symbol needs at least one atom")]
    EmptySymbol,
    #[error("symbol atoms cannot be empty")]
    EmptyAtom,
    #[error("atom '{atom}' contains the namespace separator")]
    SeparatorInAtom { atom: String },
    #[error("atom '{atom}' is not a valid identifier")]
    InvalidAtom { atom: String },
}

/// A resolver was asked for a kind it does not know.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("unsupported resolution kind '{kind}', expected 'function' or 'const'")]
    UnsupportedKind { kind: String },
}

/// Import synthesis could not find distinct aliases.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GenerateError {
    #[error("no distinct alias can be derived for '{alias}'")]
    AliasCollision { alias: String },
    #[error("alias disambiguation did not settle within {limit} rounds")]
    IterationLimit { limit: usize },
}

/// Failures of the source reading layer.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("unable to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("no resolution context at index {index} in '{}' ({found} found)", path.display())]
    UndefinedContext {
        path: PathBuf,
        index: usize,
        found: usize,
    },
    #[error("unable to locate the source of '{symbol}'")]
    SymbolNotLocated { symbol: String },
    #[error("'{symbol}' is not defined in '{}'", path.display())]
    SymbolNotDefined { symbol: String, path: PathBuf },
}

/// Any error produced by this crate.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Symbol(#[from] SymbolError),
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error(transparent)]
    Generate(#[from] GenerateError),
    #[error(transparent)]
    Read(#[from] ReadError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
