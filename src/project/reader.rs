//! Reading resolution contexts from sources, files and directories.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use indexmap::IndexMap;
use rayon::prelude::*;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::base::Symbol;
use crate::context::UseKind;
use crate::error::ReadError;
use crate::syntax::{ParsedResolutionContext, ResolutionContextParser};

use super::cache::ParseCache;
use super::locator::SourceLocator;

/// Reads parsed resolution contexts, memoizing parses through a
/// [`ParseCache`].
#[derive(Clone, Debug)]
pub struct ResolutionContextReader {
    parser: ResolutionContextParser,
    cache: Option<Arc<ParseCache>>,
    extensions: Vec<String>,
}

impl Default for ResolutionContextReader {
    fn default() -> Self {
        Self {
            parser: ResolutionContextParser::new(),
            cache: Some(Arc::new(ParseCache::new())),
            extensions: vec!["php".to_string()],
        }
    }
}

impl ResolutionContextReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable memoization.
    pub fn with_cache(mut self, enabled: bool) -> Self {
        self.cache = enabled.then(|| self.cache.take().unwrap_or_default());
        self
    }

    /// Share an existing cache between readers.
    pub fn with_shared_cache(mut self, cache: Arc<ParseCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// File extensions picked up by [`read_directory`](Self::read_directory).
    pub fn with_extensions(mut self, extensions: &[&str]) -> Self {
        self.extensions = extensions.iter().map(|e| e.to_string()).collect();
        self
    }

    pub fn cache(&self) -> Option<&ParseCache> {
        self.cache.as_deref()
    }

    pub fn read_from_source(&self, source: &str) -> Vec<ParsedResolutionContext> {
        self.parse(None, source)
    }

    pub fn read_from_file(&self, path: impl AsRef<Path>) -> Result<Vec<ParsedResolutionContext>, ReadError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| ReadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(self.parse(Some(path), &source))
    }

    /// The `index`-th context of a file, in source order.
    pub fn read_context_at(
        &self,
        path: impl AsRef<Path>,
        index: usize,
    ) -> Result<ParsedResolutionContext, ReadError> {
        let path = path.as_ref();
        let contexts = self.read_from_file(path)?;
        let found = contexts.len();
        contexts
            .into_iter()
            .nth(index)
            .ok_or_else(|| ReadError::UndefinedContext {
                path: path.to_path_buf(),
                index,
                found,
            })
    }

    /// The context a symbol is defined in.
    ///
    /// `kind` selects the definitions considered: [`UseKind::Type`] matches
    /// classes, interfaces and traits, [`UseKind::Function`] matches
    /// functions. Constant definitions are not tracked, so a constant is
    /// never found.
    pub fn read_from_symbol(
        &self,
        symbol: &Symbol,
        locator: &dyn SourceLocator,
        kind: UseKind,
    ) -> Result<ParsedResolutionContext, ReadError> {
        let symbol = symbol.to_qualified();
        let path = locator
            .locate(&symbol)
            .ok_or_else(|| ReadError::SymbolNotLocated {
                symbol: symbol.to_string(),
            })?;

        let defines = |context: &ParsedResolutionContext| {
            context.defined_symbol(&symbol).is_some_and(|defined| match kind {
                UseKind::Type => defined.kind.is_type(),
                UseKind::Function => !defined.kind.is_type(),
                UseKind::Const => false,
            })
        };

        self.read_from_file(&path)?
            .into_iter()
            .find(defines)
            .ok_or_else(|| ReadError::SymbolNotDefined {
                symbol: symbol.to_string(),
                path,
            })
    }

    /// Parse every matching file below `dir`, in parallel.
    ///
    /// Files that cannot be read are skipped with a warning; only a missing
    /// or unreadable `dir` fails. Results are ordered by path.
    pub fn read_directory(
        &self,
        dir: impl AsRef<Path>,
    ) -> Result<IndexMap<PathBuf, Vec<ParsedResolutionContext>>, ReadError> {
        let dir = dir.as_ref();
        fs::read_dir(dir).map_err(|source| ReadError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let paths = self.collect_file_paths(dir);
        debug!(dir = %dir.display(), files = paths.len(), "reading directory");

        let results: Vec<_> = paths
            .into_par_iter()
            .filter_map(|path| match self.read_from_file(&path) {
                Ok(contexts) => Some((path, contexts)),
                Err(e) => {
                    warn!("skipping {}: {e}", path.display());
                    None
                }
            })
            .collect();

        Ok(results.into_iter().collect())
    }

    fn collect_file_paths(&self, dir: &Path) -> Vec<PathBuf> {
        WalkDir::new(dir)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("skipping unreadable entry: {e}");
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| self.has_extension(path))
            .collect()
    }

    fn has_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
    }

    fn parse(&self, path: Option<&Path>, source: &str) -> Vec<ParsedResolutionContext> {
        match &self.cache {
            Some(cache) => cache
                .get_or_parse(path, source, |source| self.parser.parse_source(source))
                .to_vec(),
            None => self.parser.parse_source(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::StaticLocator;
    use tempfile::TempDir;

    fn sym(s: &str) -> Symbol {
        s.parse().unwrap()
    }

    fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, contents).unwrap();
        path
    }

    const TWO_NAMESPACES: &str = "<?php\nnamespace A;\nuse X\\Y;\nclass Foo {}\nnamespace B;\nfunction bar() {}\n";

    #[test]
    fn test_read_from_source_caches() {
        let reader = ResolutionContextReader::new();

        let first = reader.read_from_source(TWO_NAMESPACES);
        let second = reader.read_from_source(TWO_NAMESPACES);

        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
        assert_eq!(reader.cache().map(ParseCache::len), Some(1));
        assert!(ResolutionContextReader::new().with_cache(false).cache().is_none());
    }

    #[test]
    fn test_read_from_file_and_context_at() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "two.php", TWO_NAMESPACES);
        let reader = ResolutionContextReader::new();

        assert_eq!(reader.read_from_file(&path).unwrap().len(), 2);

        let second = reader.read_context_at(&path, 1).unwrap();
        assert_eq!(second.context.primary_namespace(), Some(&sym("\\B")));

        match reader.read_context_at(&path, 2) {
            Err(ReadError::UndefinedContext { index, found, .. }) => {
                assert_eq!((index, found), (2, 2));
            }
            other => panic!("expected UndefinedContext, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let reader = ResolutionContextReader::new();

        let result = reader.read_from_file(dir.path().join("missing.php"));
        assert!(matches!(result, Err(ReadError::Io { .. })));
    }

    #[test]
    fn test_read_from_symbol() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "two.php", TWO_NAMESPACES);
        let locator = StaticLocator::new()
            .with(sym("\\A\\Foo"), &path)
            .with(sym("\\B\\bar"), &path)
            .with(sym("\\A\\Ghost"), &path);
        let reader = ResolutionContextReader::new();

        let context = reader.read_from_symbol(&sym("A\\Foo"), &locator, UseKind::Type).unwrap();
        assert_eq!(context.context.primary_namespace(), Some(&sym("\\A")));

        let context = reader.read_from_symbol(&sym("\\B\\bar"), &locator, UseKind::Function).unwrap();
        assert_eq!(context.context.primary_namespace(), Some(&sym("\\B")));

        assert!(matches!(
            reader.read_from_symbol(&sym("\\B\\bar"), &locator, UseKind::Type),
            Err(ReadError::SymbolNotDefined { .. })
        ));
        assert!(matches!(
            reader.read_from_symbol(&sym("\\A\\Ghost"), &locator, UseKind::Type),
            Err(ReadError::SymbolNotDefined { .. })
        ));
        assert!(matches!(
            reader.read_from_symbol(&sym("\\Nowhere"), &locator, UseKind::Type),
            Err(ReadError::SymbolNotLocated { .. })
        ));
    }

    #[test]
    fn test_read_directory() {
        let dir = TempDir::new().unwrap();
        write(&dir, "b.php", "<?php namespace B;");
        write(&dir, "nested/a.php", "<?php namespace A; class Foo {}");
        write(&dir, "notes.txt", "<?php namespace Ignored;");
        write(&dir, "upper.PHP", "<?php namespace Upper;");

        let files = ResolutionContextReader::new().read_directory(dir.path()).unwrap();
        let names: Vec<_> = files
            .keys()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_string_lossy().replace('\\', "/"))
            .collect();

        assert_eq!(names, vec!["b.php", "nested/a.php", "upper.PHP"]);
        assert_eq!(files[0][0].context.primary_namespace(), Some(&sym("\\B")));
    }

    #[test]
    fn test_read_directory_custom_extensions() {
        let dir = TempDir::new().unwrap();
        write(&dir, "a.php", "<?php");
        write(&dir, "b.inc", "<?php");

        let files = ResolutionContextReader::new()
            .with_extensions(&["inc"])
            .read_directory(dir.path())
            .unwrap();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_read_missing_directory() {
        let dir = TempDir::new().unwrap();
        let result = ResolutionContextReader::new().read_directory(dir.path().join("absent"));
        assert!(matches!(result, Err(ReadError::Io { .. })));
    }
}
