//! Symbol resolution: references to fully qualified symbols.
//!
//! Resolution follows the host compiler's rules, in order:
//!
//! 1. **Qualified** - `\Foo\Bar` is already absolute and returned as is
//! 2. **Namespace keyword** - `namespace\Foo` is relative to the current
//!    namespace, whatever the imports say
//! 3. **Qualified reference** - `Foo\Bar` resolves its first atom against
//!    the type imports, falling back to the current namespace
//! 4. **Bare name** - `Foo` resolves against the imports of its own kind,
//!    then the current namespace. Functions and constants that do not exist
//!    in the current namespace fall back to the global one.

use tracing::trace;

use crate::base::Symbol;
use crate::context::{ResolutionContext, UseKind};
use crate::error::ResolveError;

use super::probe::{NoSymbols, SymbolProbe};

// ============================================================================
// RESOLVER
// ============================================================================

/// Resolves references within a resolution context.
///
/// The probe decides the function and constant fallback; type resolution
/// never consults it.
#[derive(Clone, Debug, Default)]
pub struct SymbolResolver<P = NoSymbols> {
    probe: P,
}

impl<P: SymbolProbe> SymbolResolver<P> {
    pub fn new(probe: P) -> Self {
        Self { probe }
    }

    pub fn probe(&self) -> &P {
        &self.probe
    }

    /// Resolve `symbol` as a reference of the given kind.
    pub fn resolve(&self, context: &ResolutionContext, symbol: &Symbol, kind: UseKind) -> Symbol {
        if symbol.is_qualified() {
            return symbol.clone();
        }

        let namespace = context.primary_namespace();
        let atoms = symbol.atoms();

        if symbol.starts_with_namespace_atom() {
            return match (&atoms[1..], namespace) {
                ([], Some(namespace)) => namespace.clone(),
                ([], None) => symbol.to_qualified(),
                (rest, namespace) => Symbol::qualify_in(namespace, rest),
            };
        }

        if atoms.len() > 1 {
            return match context.symbol_by_first_atom(symbol, UseKind::Type) {
                Some(target) => target.join_atoms(&atoms[1..]),
                None => Symbol::qualify_in(namespace, atoms),
            };
        }

        if let Some(target) = context.symbol_by_alias(symbol.first_atom(), kind) {
            return target.clone();
        }

        let candidate = Symbol::qualify_in(namespace, atoms);
        let exists = match kind {
            UseKind::Type => return candidate,
            _ if namespace.is_none() => return candidate,
            UseKind::Function => self.probe.function_exists(&candidate.runtime_string()),
            UseKind::Const => self.probe.constant_exists(&candidate.runtime_string()),
        };
        if exists {
            candidate
        } else {
            trace!(%candidate, "not defined, falling back to the global namespace");
            symbol.to_qualified()
        }
    }

    /// Resolve a class, interface, trait or namespace reference.
    pub fn resolve_type(&self, context: &ResolutionContext, symbol: &Symbol) -> Symbol {
        self.resolve(context, symbol, UseKind::Type)
    }

    /// Resolve a function call target.
    pub fn resolve_function(&self, context: &ResolutionContext, symbol: &Symbol) -> Symbol {
        self.resolve(context, symbol, UseKind::Function)
    }

    /// Resolve a constant reference.
    pub fn resolve_constant(&self, context: &ResolutionContext, symbol: &Symbol) -> Symbol {
        self.resolve(context, symbol, UseKind::Const)
    }

    /// Resolve with the kind given as its keyword (`None`, `"function"` or
    /// `"const"`). Any other keyword is a caller bug and fails.
    pub fn resolve_as(
        &self,
        context: &ResolutionContext,
        symbol: &Symbol,
        kind: Option<&str>,
    ) -> Result<Symbol, ResolveError> {
        let kind = UseKind::from_keyword(kind)?;
        Ok(self.resolve(context, symbol, kind))
    }
}
