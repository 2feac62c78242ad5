//! Memoized parse results.

use std::hash::BuildHasherDefault;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use indexmap::IndexMap;
use parking_lot::RwLock;
use rustc_hash::FxHasher;
use tracing::debug;

use crate::syntax::ParsedResolutionContext;

type Parsed = Arc<[ParsedResolutionContext]>;
type Entries = IndexMap<CacheKey, Arc<OnceLock<Parsed>>, BuildHasherDefault<FxHasher>>;

/// Identifies one version of one source: its path (if any) and its full
/// contents.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct CacheKey {
    path: Option<PathBuf>,
    content: Arc<str>,
}

impl CacheKey {
    fn new(path: Option<&Path>, source: &str) -> Self {
        Self {
            path: path.map(Path::to_path_buf),
            content: Arc::from(source),
        }
    }
}

/// Parse results keyed by path and content.
///
/// Each distinct (path, content) pair is parsed at most once, even when
/// requested from several threads at the same time.
#[derive(Debug, Default)]
pub struct ParseCache {
    entries: RwLock<Entries>,
}

impl ParseCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached result for `source`, running `parse` on a miss.
    pub fn get_or_parse<F>(&self, path: Option<&Path>, source: &str, parse: F) -> Parsed
    where
        F: FnOnce(&str) -> Vec<ParsedResolutionContext>,
    {
        let key = CacheKey::new(path, source);
        let cell = self.cell(key);

        if let Some(parsed) = cell.get() {
            debug!(path = ?path, "parse cache hit");
            return parsed.clone();
        }
        cell.get_or_init(|| {
            debug!(path = ?path, "parse cache miss");
            parse(source).into()
        })
        .clone()
    }

    fn cell(&self, key: CacheKey) -> Arc<OnceLock<Parsed>> {
        // Fast path: read lock
        if let Some(cell) = self.entries.read().get(&key) {
            return cell.clone();
        }
        self.entries.write().entry(key).or_default().clone()
    }

    /// Drop every entry recorded for `path`.
    pub fn invalidate(&self, path: &Path) {
        self.entries
            .write()
            .retain(|key, _| key.path.as_deref() != Some(path));
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
