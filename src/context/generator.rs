//! Import synthesis: the resolution context a file needs to reference a
//! set of fully qualified symbols.
//!
//! Symbols close enough to the target namespace are referenced directly;
//! every other symbol gets an import clause. Clauses whose natural alias
//! (the last atom) collides are disambiguated by prefixing atoms from
//! their own path, one round at a time: `A\X\Foo` and `B\Y\Foo` become
//! `XFoo` and `YFoo`.

use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxHashSet;
use smol_str::SmolStr;
use tracing::debug;

use crate::base::Symbol;
use crate::error::GenerateError;

use super::resolution::ResolutionContext;
use super::use_statement::{UseClause, UseKind, UseStatement};

const DEFAULT_MAX_REFERENCE_ATOMS: usize = 1;
const DEFAULT_ITERATION_LIMIT: usize = 64;

/// Builds minimal, collision-free resolution contexts.
#[derive(Copy, Clone, Debug)]
pub struct ResolutionContextGenerator {
    max_reference_atoms: usize,
    iteration_limit: usize,
}

impl Default for ResolutionContextGenerator {
    fn default() -> Self {
        Self {
            max_reference_atoms: DEFAULT_MAX_REFERENCE_ATOMS,
            iteration_limit: DEFAULT_ITERATION_LIMIT,
        }
    }
}

/// The symbols of one import kind and which of them need a clause.
struct KindGroup {
    kind: UseKind,
    symbols: Vec<Symbol>,
    imported: Vec<bool>,
}

impl KindGroup {
    fn imported(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols
            .iter()
            .zip(&self.imported)
            .filter_map(|(symbol, imported)| imported.then_some(symbol))
    }
}

impl ResolutionContextGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Symbols below the target namespace whose remainder has at most
    /// `atoms` atoms are referenced without an import.
    pub fn with_max_reference_atoms(mut self, atoms: usize) -> Self {
        self.max_reference_atoms = atoms;
        self
    }

    /// Maximum number of disambiguation rounds before giving up.
    pub fn with_iteration_limit(mut self, limit: usize) -> Self {
        self.iteration_limit = limit;
        self
    }

    pub fn max_reference_atoms(&self) -> usize {
        self.max_reference_atoms
    }

    pub fn iteration_limit(&self) -> usize {
        self.iteration_limit
    }

    /// Generate a context importing class-like `symbols` into `namespace`.
    pub fn generate(
        &self,
        namespace: Option<&Symbol>,
        symbols: &[Symbol],
    ) -> Result<ResolutionContext, GenerateError> {
        self.generate_with_keywords(namespace, symbols, &IndexMap::new())
    }

    /// Generate a context importing `symbols` as types plus the symbols of
    /// each keyword kind (`use function`, `use const`).
    ///
    /// Statements come out grouped by kind, types first, one clause per
    /// statement, in input order.
    pub fn generate_with_keywords(
        &self,
        namespace: Option<&Symbol>,
        symbols: &[Symbol],
        keyword_symbols: &IndexMap<UseKind, Vec<Symbol>>,
    ) -> Result<ResolutionContext, GenerateError> {
        let namespace = namespace.map(Symbol::to_qualified);

        let mut groups = Vec::new();
        for kind in UseKind::ALL {
            let base: &[Symbol] = if kind == UseKind::Type { symbols } else { &[] };
            let extra = keyword_symbols.get(&kind).map(Vec::as_slice).unwrap_or_default();
            let symbols = dedupe(base.iter().chain(extra));
            if symbols.is_empty() {
                continue;
            }
            let imported = symbols
                .iter()
                .map(|symbol| self.needs_import(namespace.as_ref(), symbol))
                .collect();
            groups.push(KindGroup { kind, symbols, imported });
        }

        // Every pass imports at least one more symbol, so this settles.
        loop {
            let aliases = groups
                .iter()
                .map(|group| self.assign_aliases(group.imported().collect()))
                .collect::<Result<Vec<_>, _>>()?;

            if !import_shadowed(&mut groups, &aliases, namespace.as_ref()) {
                let statements = groups
                    .iter()
                    .zip(aliases)
                    .flat_map(|(group, aliases)| {
                        group.imported().zip(aliases).map(move |(symbol, alias)| {
                            let alias = (alias.as_str() != symbol.last_atom())
                                .then(|| Symbol::from_trusted_atoms(vec![alias], false));
                            UseStatement::single(UseClause::new(symbol.clone(), alias), group.kind)
                        })
                    })
                    .collect();
                return Ok(ResolutionContext::new(namespace, statements));
            }
        }
    }

    fn needs_import(&self, namespace: Option<&Symbol>, symbol: &Symbol) -> bool {
        let remainder = match namespace {
            Some(namespace) => symbol.relative_to(namespace).map(|r| r.size()),
            None => Some(symbol.size()),
        };
        remainder.is_none_or(|atoms| atoms > self.max_reference_atoms)
    }

    /// Aliases for `symbols`, in order, distinct from one another.
    fn assign_aliases(&self, symbols: Vec<&Symbol>) -> Result<Vec<SmolStr>, GenerateError> {
        let mut depths = vec![1; symbols.len()];

        for round in 0..self.iteration_limit {
            let mut buckets: IndexMap<SmolStr, Vec<usize>> = IndexMap::new();
            for (i, symbol) in symbols.iter().enumerate() {
                buckets.entry(alias_at(symbol, depths[i])).or_default().push(i);
            }

            let mut collisions = 0;
            for (alias, members) in &buckets {
                if members.len() < 2 {
                    continue;
                }
                let growable: Vec<usize> = members
                    .iter()
                    .copied()
                    .filter(|&i| depths[i] < symbols[i].size())
                    .collect();
                if growable.is_empty() {
                    return Err(GenerateError::AliasCollision {
                        alias: alias.to_string(),
                    });
                }
                for i in growable {
                    depths[i] += 1;
                }
                collisions += 1;
            }

            if collisions == 0 {
                return Ok(symbols
                    .iter()
                    .zip(&depths)
                    .map(|(symbol, &depth)| alias_at(symbol, depth))
                    .collect());
            }
            debug!(round, collisions, "disambiguating import aliases");
        }

        Err(GenerateError::IterationLimit {
            limit: self.iteration_limit,
        })
    }
}

/// Keep the first occurrence of each symbol.
fn dedupe<'a>(symbols: impl Iterator<Item = &'a Symbol>) -> Vec<Symbol> {
    symbols
        .map(Symbol::to_qualified)
        .collect::<IndexSet<_>>()
        .into_iter()
        .collect()
}

/// The last `depth` atoms concatenated.
fn alias_at(symbol: &Symbol, depth: usize) -> SmolStr {
    let atoms = symbol.atoms();
    SmolStr::from(atoms[atoms.len() - depth..].concat())
}

/// Marks directly referenced symbols whose first reference atom an import
/// alias would capture. Returns whether any were marked.
fn import_shadowed(groups: &mut [KindGroup], aliases: &[Vec<SmolStr>], namespace: Option<&Symbol>) -> bool {
    let mut taken: FxHashSet<(UseKind, &str)> = FxHashSet::default();
    for (group, aliases) in groups.iter().zip(aliases) {
        taken.extend(aliases.iter().map(|alias| (group.kind, alias.as_str())));
    }

    let mut shadowed = Vec::new();
    for (g, group) in groups.iter().enumerate() {
        for (i, symbol) in group.symbols.iter().enumerate() {
            if group.imported[i] {
                continue;
            }
            let reference = match namespace {
                Some(namespace) => symbol.relative_to(namespace),
                None => Some(symbol.to_reference()),
            };
            let Some(reference) = reference else { continue };
            let bucket = if reference.size() == 1 { group.kind } else { UseKind::Type };
            if taken.contains(&(bucket, reference.first_atom())) {
                shadowed.push((g, i));
            }
        }
    }

    for &(g, i) in &shadowed {
        debug!(symbol = %groups[g].symbols[i], "direct reference shadowed, importing");
        groups[g].imported[i] = true;
    }
    !shadowed.is_empty()
}
