//! The resolution context: active namespace plus imports.

use std::fmt;

use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use crate::base::Symbol;

use super::use_statement::{UseKind, UseStatement};

/// Alias → target maps, one per import kind.
///
/// Built once at construction, read-only afterwards.
#[derive(Clone, Debug, Default)]
struct AliasIndex {
    types: FxHashMap<SmolStr, Symbol>,
    functions: FxHashMap<SmolStr, Symbol>,
    constants: FxHashMap<SmolStr, Symbol>,
}

impl AliasIndex {
    fn build(statements: &[UseStatement]) -> Self {
        let mut index = Self::default();
        for statement in statements {
            let bucket = index.bucket_mut(statement.kind());
            for clause in statement.clauses() {
                // Later imports of the same alias win.
                bucket.insert(SmolStr::new(clause.effective_alias()), clause.symbol().clone());
            }
        }
        index
    }

    fn bucket(&self, kind: UseKind) -> &FxHashMap<SmolStr, Symbol> {
        match kind {
            UseKind::Type => &self.types,
            UseKind::Function => &self.functions,
            UseKind::Const => &self.constants,
        }
    }

    fn bucket_mut(&mut self, kind: UseKind) -> &mut FxHashMap<SmolStr, Symbol> {
        match kind {
            UseKind::Type => &mut self.types,
            UseKind::Function => &mut self.functions,
            UseKind::Const => &mut self.constants,
        }
    }
}

/// The namespace and imports in effect at some point of a source file.
///
/// `primary_namespace` is `None` for the global namespace. Contexts are
/// immutable values; equality ignores the derived alias index.
#[derive(Clone)]
pub struct ResolutionContext {
    primary_namespace: Option<Symbol>,
    use_statements: Vec<UseStatement>,
    index: AliasIndex,
}

impl ResolutionContext {
    pub fn new(primary_namespace: Option<Symbol>, use_statements: Vec<UseStatement>) -> Self {
        let index = AliasIndex::build(&use_statements);
        Self {
            primary_namespace: primary_namespace.map(|ns| ns.to_qualified()),
            use_statements,
            index,
        }
    }

    /// The global namespace with no imports.
    pub fn global() -> Self {
        Self::new(None, Vec::new())
    }

    pub fn primary_namespace(&self) -> Option<&Symbol> {
        self.primary_namespace.as_ref()
    }

    pub fn use_statements(&self) -> &[UseStatement] {
        &self.use_statements
    }

    /// Statements importing the given kind.
    pub fn use_statements_of(&self, kind: UseKind) -> impl Iterator<Item = &UseStatement> {
        self.use_statements.iter().filter(move |s| s.kind() == kind)
    }

    /// The import target registered for `alias` under `kind`.
    pub fn symbol_by_alias(&self, alias: &str, kind: UseKind) -> Option<&Symbol> {
        self.index.bucket(kind).get(alias)
    }

    /// The import target whose alias is the first atom of `reference`.
    pub fn symbol_by_first_atom(&self, reference: &Symbol, kind: UseKind) -> Option<&Symbol> {
        self.symbol_by_alias(reference.first_atom(), kind)
    }
}

impl Default for ResolutionContext {
    fn default() -> Self {
        Self::global()
    }
}

impl PartialEq for ResolutionContext {
    fn eq(&self, other: &Self) -> bool {
        self.primary_namespace == other.primary_namespace
            && self.use_statements == other.use_statements
    }
}

impl Eq for ResolutionContext {}

impl fmt::Debug for ResolutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolutionContext")
            .field("primary_namespace", &self.primary_namespace)
            .field("use_statements", &self.use_statements)
            .finish()
    }
}

/// Renders as PHP source: the namespace declaration, then one line per
/// import statement.
impl fmt::Display for ResolutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(namespace) = &self.primary_namespace {
            writeln!(f, "namespace {};", namespace.to_reference())?;
            if !self.use_statements.is_empty() {
                writeln!(f)?;
            }
        }
        for statement in &self.use_statements {
            writeln!(f, "{statement}")?;
        }
        Ok(())
    }
}
