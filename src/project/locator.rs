//! Finding the file that defines a symbol.

use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;

use crate::base::Symbol;

/// Maps a fully qualified symbol to the file expected to define it.
///
/// Autoloaders, class maps and stub indexes implement this.
pub trait SourceLocator {
    fn locate(&self, symbol: &Symbol) -> Option<PathBuf>;
}

impl<F> SourceLocator for F
where
    F: Fn(&Symbol) -> Option<PathBuf>,
{
    fn locate(&self, symbol: &Symbol) -> Option<PathBuf> {
        self(symbol)
    }
}

/// A fixed symbol → path table.
#[derive(Clone, Debug, Default)]
pub struct StaticLocator {
    paths: FxHashMap<Symbol, PathBuf>,
}

impl StaticLocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, symbol: Symbol, path: impl AsRef<Path>) -> Self {
        self.insert(symbol, path);
        self
    }

    pub fn insert(&mut self, symbol: Symbol, path: impl AsRef<Path>) {
        self.paths.insert(symbol.to_qualified(), path.as_ref().to_path_buf());
    }
}

impl SourceLocator for StaticLocator {
    fn locate(&self, symbol: &Symbol) -> Option<PathBuf> {
        self.paths.get(&symbol.to_qualified()).cloned()
    }
}
