//! Shortest references: the inverse of resolution.

use smol_str::SmolStr;
use tracing::trace;

use crate::base::{NAMESPACE_ATOM, Symbol};
use crate::context::{ResolutionContext, UseKind};

/// Produces the shortest reference that resolves back to a qualified
/// symbol within a given context.
#[derive(Copy, Clone, Debug, Default)]
pub struct SymbolReferenceGenerator;

impl SymbolReferenceGenerator {
    pub fn new() -> Self {
        Self
    }

    /// The shortest reference to `symbol` as a `kind` reference.
    ///
    /// Unqualified input is returned unchanged. When no shorter reference
    /// exists the qualified symbol itself is returned. Among equally short
    /// candidates the first found wins: the namespace-relative form, then
    /// imports in statement order.
    pub fn reference_to(&self, context: &ResolutionContext, symbol: &Symbol, kind: UseKind) -> Symbol {
        if !symbol.is_qualified() {
            return symbol.clone();
        }

        let mut best = namespace_candidate(context, symbol, kind);

        for statement in context.use_statements() {
            for clause in statement.clauses() {
                let target = clause.symbol();
                let candidate = if statement.kind() == kind && symbol == target {
                    alias_symbol(clause.effective_alias())
                } else if statement.kind() == UseKind::Type && symbol.is_descendant_of(target) {
                    alias_symbol(clause.effective_alias()).join_atoms(&symbol.atoms()[target.size()..])
                } else {
                    continue;
                };

                // A later import of the same alias shadows this clause.
                if context.symbol_by_first_atom(&candidate, lookup_kind(&candidate, kind)) != Some(target) {
                    continue;
                }
                if best.as_ref().is_none_or(|b| candidate.size() < b.size()) {
                    best = Some(candidate);
                }
            }
        }

        match best {
            Some(candidate) if candidate.size() < symbol.size() => {
                trace!(%symbol, %candidate, "shortened reference");
                candidate
            }
            _ => symbol.clone(),
        }
    }
}

/// The reference relative to the current namespace, prefixed with
/// `namespace` when an import would capture its first atom.
fn namespace_candidate(context: &ResolutionContext, symbol: &Symbol, kind: UseKind) -> Option<Symbol> {
    let relative = match context.primary_namespace() {
        Some(namespace) => symbol.relative_to(namespace)?,
        None => symbol.to_reference(),
    };

    let shadowed = relative.starts_with_namespace_atom()
        || context
            .symbol_by_first_atom(&relative, lookup_kind(&relative, kind))
            .is_some();
    if shadowed {
        Some(alias_symbol(NAMESPACE_ATOM).join(&relative))
    } else {
        Some(relative)
    }
}

/// Single-atom references look up their own kind; longer ones go through
/// the type imports.
fn lookup_kind(reference: &Symbol, kind: UseKind) -> UseKind {
    if reference.size() == 1 { kind } else { UseKind::Type }
}

fn alias_symbol(alias: &str) -> Symbol {
    Symbol::from_trusted_atoms(vec![SmolStr::new(alias)], false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{UseClause, UseStatement};
    use crate::resolve::{NoSymbols, SymbolResolver};
    use rstest::rstest;

    fn sym(s: &str) -> Symbol {
        s.parse().unwrap()
    }

    fn context() -> ResolutionContext {
        ResolutionContext::new(
            Some(sym("\\App")),
            vec![
                UseStatement::new(
                    vec![
                        UseClause::new(sym("\\Vendor\\Http"), None),
                        UseClause::new(sym("\\Vendor\\Model"), Some(sym("Base"))),
                        UseClause::new(sym("\\Other\\Foo"), None),
                    ],
                    UseKind::Type,
                ),
                UseStatement::single(UseClause::new(sym("\\Vendor\\helper"), None), UseKind::Function),
            ],
        )
    }

    #[rstest]
    #[case("\\App\\Thing", UseKind::Type, "Thing")]
    #[case("\\App\\Sub\\Thing", UseKind::Type, "Sub\\Thing")]
    #[case("\\App\\Foo", UseKind::Type, "\\App\\Foo")]
    #[case("\\Other\\Foo", UseKind::Type, "Foo")]
    #[case("\\Vendor\\Model", UseKind::Type, "Base")]
    #[case("\\Vendor\\Http\\Client\\Pool", UseKind::Type, "Http\\Client\\Pool")]
    #[case("\\Vendor\\helper", UseKind::Function, "helper")]
    #[case("\\Vendor\\Model\\save", UseKind::Function, "Base\\save")]
    #[case("\\Vendor\\helper", UseKind::Type, "\\Vendor\\helper")]
    #[case("\\Unrelated", UseKind::Type, "\\Unrelated")]
    #[case("Already\\Relative", UseKind::Type, "Already\\Relative")]
    fn test_reference_to(#[case] symbol: &str, #[case] kind: UseKind, #[case] expected: &str) {
        let generator = SymbolReferenceGenerator::new();
        assert_eq!(generator.reference_to(&context(), &sym(symbol), kind), sym(expected));
    }

    #[test]
    fn test_namespace_prefix_for_shadowed_reference() {
        let context = ResolutionContext::new(
            Some(sym("\\App\\Web")),
            vec![UseStatement::single(UseClause::new(sym("\\Vendor\\Http"), None), UseKind::Type)],
        );
        let generator = SymbolReferenceGenerator;

        // `Http\Thing` alone would resolve through the `Http` import.
        assert_eq!(
            generator.reference_to(&context, &sym("\\App\\Web\\Http\\Thing"), UseKind::Type),
            sym("namespace\\Http\\Thing")
        );
    }

    #[test]
    fn test_shadowed_import_is_skipped() {
        let context = ResolutionContext::new(
            None,
            vec![
                UseStatement::single(UseClause::new(sym("\\A\\Foo"), None), UseKind::Type),
                UseStatement::single(UseClause::new(sym("\\B\\Foo"), None), UseKind::Type),
            ],
        );
        let generator = SymbolReferenceGenerator;

        assert_eq!(generator.reference_to(&context, &sym("\\A\\Foo"), UseKind::Type), sym("\\A\\Foo"));
        assert_eq!(generator.reference_to(&context, &sym("\\B\\Foo"), UseKind::Type), sym("Foo"));
    }

    #[test]
    fn test_references_resolve_back() {
        let context = context();
        let generator = SymbolReferenceGenerator;
        let resolver = SymbolResolver::new(NoSymbols);

        for name in [
            "\\App\\Thing",
            "\\App\\Foo",
            "\\App\\Http\\Thing",
            "\\Other\\Foo\\Deep",
            "\\Vendor\\Model",
            "\\Vendor\\Http\\Request",
            "\\Elsewhere\\Thing",
        ] {
            let symbol = sym(name);
            let reference = generator.reference_to(&context, &symbol, UseKind::Type);
            assert_eq!(resolver.resolve_type(&context, &reference), symbol, "via {reference}");
        }
    }
}
