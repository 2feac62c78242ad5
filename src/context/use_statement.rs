//! Import ("use") statements and their clauses.

use std::fmt;

use crate::base::Symbol;
use crate::error::ResolveError;

/// What an import statement brings into scope.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum UseKind {
    /// Classes, interfaces, traits and namespaces (`use Foo;`).
    #[default]
    Type,
    /// `use function Foo\bar;`
    Function,
    /// `use const Foo\BAR;`
    Const,
}

impl UseKind {
    pub const ALL: [UseKind; 3] = [UseKind::Type, UseKind::Function, UseKind::Const];

    /// Parse a kind keyword; `None` is the type kind.
    pub fn from_keyword(keyword: Option<&str>) -> Result<Self, ResolveError> {
        match keyword {
            None => Ok(UseKind::Type),
            Some(k) if k.eq_ignore_ascii_case("function") => Ok(UseKind::Function),
            Some(k) if k.eq_ignore_ascii_case("const") => Ok(UseKind::Const),
            Some(other) => Err(ResolveError::UnsupportedKind {
                kind: other.to_owned(),
            }),
        }
    }

    /// The keyword written after `use`, if any.
    pub fn keyword(self) -> Option<&'static str> {
        match self {
            UseKind::Type => None,
            UseKind::Function => Some("function"),
            UseKind::Const => Some("const"),
        }
    }
}

/// One `target [as alias]` entry of an import statement.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct UseClause {
    symbol: Symbol,
    alias: Option<Symbol>,
}

impl UseClause {
    /// The target is stored qualified; imports are always absolute.
    pub fn new(symbol: Symbol, alias: Option<Symbol>) -> Self {
        Self {
            symbol: symbol.to_qualified(),
            alias,
        }
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    pub fn alias(&self) -> Option<&Symbol> {
        self.alias.as_ref()
    }

    /// The explicit alias, or the target's last atom.
    pub fn effective_alias(&self) -> &str {
        match &self.alias {
            Some(alias) => alias.last_atom(),
            None => self.symbol.last_atom(),
        }
    }
}

impl fmt::Display for UseClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol.to_reference())?;
        if let Some(alias) = &self.alias {
            write!(f, " as {alias}")?;
        }
        Ok(())
    }
}

/// One import declaration, possibly bundling comma-joined clauses.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct UseStatement {
    clauses: Vec<UseClause>,
    kind: UseKind,
}

impl UseStatement {
    pub fn new(clauses: Vec<UseClause>, kind: UseKind) -> Self {
        debug_assert!(!clauses.is_empty());
        Self { clauses, kind }
    }

    /// A statement with a single clause.
    pub fn single(clause: UseClause, kind: UseKind) -> Self {
        Self::new(vec![clause], kind)
    }

    pub fn clauses(&self) -> &[UseClause] {
        &self.clauses
    }

    pub fn kind(&self) -> UseKind {
        self.kind
    }
}

impl fmt::Display for UseStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("use ")?;
        if let Some(keyword) = self.kind.keyword() {
            write!(f, "{keyword} ")?;
        }
        for (i, clause) in self.clauses.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{clause}")?;
        }
        f.write_str(";")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn sym(s: &str) -> Symbol {
        s.parse().unwrap()
    }

    #[rstest]
    #[case(None, UseKind::Type)]
    #[case(Some("function"), UseKind::Function)]
    #[case(Some("CONST"), UseKind::Const)]
    fn test_kind_from_keyword(#[case] keyword: Option<&str>, #[case] expected: UseKind) {
        assert_eq!(UseKind::from_keyword(keyword), Ok(expected));
    }

    #[test]
    fn test_kind_rejects_unknown_keyword() {
        assert_eq!(
            UseKind::from_keyword(Some("class")),
            Err(ResolveError::UnsupportedKind { kind: "class".into() })
        );
    }

    #[test]
    fn test_effective_alias() {
        let plain = UseClause::new(sym("Foo\\Bar"), None);
        assert_eq!(plain.effective_alias(), "Bar");
        assert!(plain.symbol().is_qualified());

        let aliased = UseClause::new(sym("\\Foo\\Bar"), Some(sym("Baz")));
        assert_eq!(aliased.effective_alias(), "Baz");
    }

    #[test]
    fn test_statement_display() {
        let statement = UseStatement::new(
            vec![
                UseClause::new(sym("\\Foo\\bar"), None),
                UseClause::new(sym("\\Foo\\baz"), Some(sym("qux"))),
            ],
            UseKind::Function,
        );
        assert_eq!(statement.to_string(), "use function Foo\\bar, Foo\\baz as qux;");
    }
}
