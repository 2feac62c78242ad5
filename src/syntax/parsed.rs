//! Parser output: contexts, imports and definitions with source positions.
//!
//! Every record carries its start position and byte range so a text
//! splicing layer can rewrite the source without reparsing it.

use std::fmt;

use crate::base::{LineCol, Symbol, TextRange, TextSize};
use crate::context::{ResolutionContext, UseStatement};

/// The kind of a top-level definition.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Class,
    Interface,
    Trait,
    Function,
}

impl SymbolKind {
    pub fn display(&self) -> &'static str {
        match self {
            SymbolKind::Class => "class",
            SymbolKind::Interface => "interface",
            SymbolKind::Trait => "trait",
            SymbolKind::Function => "function",
        }
    }

    /// Classes, interfaces and traits share the type import table.
    pub fn is_type(&self) -> bool {
        !matches!(self, SymbolKind::Function)
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display())
    }
}

/// A definition found directly under a resolution context.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedSymbol {
    /// Fully qualified name of the definition.
    pub symbol: Symbol,
    pub kind: SymbolKind,
    /// Position of the defining keyword.
    pub position: LineCol,
    /// From the defining keyword through the closing brace of its body.
    pub range: TextRange,
}

impl ParsedSymbol {
    pub fn offset(&self) -> TextSize {
        self.range.start()
    }

    pub fn size(&self) -> TextSize {
        self.range.len()
    }
}

/// An import statement with its source position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedUseStatement {
    pub statement: UseStatement,
    /// Position of the `use` keyword.
    pub position: LineCol,
    /// From the `use` keyword through the terminating `;`. A group mixing
    /// `function` and `const` clauses yields one statement per kind, all
    /// sharing this range.
    pub range: TextRange,
}

impl ParsedUseStatement {
    pub fn offset(&self) -> TextSize {
        self.range.start()
    }

    pub fn size(&self) -> TextSize {
        self.range.len()
    }
}

/// A resolution context as found in source.
///
/// For a declared namespace the range starts at the `namespace` keyword.
/// An unbraced context ends with its last import, definition or
/// statement, and is empty when nothing follows its declaration; a braced
/// one ends with its closing brace. A file without namespace declarations
/// yields one context for the global namespace starting just after the
/// open tag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedResolutionContext {
    pub context: ResolutionContext,
    pub use_statements: Vec<ParsedUseStatement>,
    pub symbols: Vec<ParsedSymbol>,
    pub position: LineCol,
    pub range: TextRange,
    /// Whether the context uses the `namespace X { ... }` form.
    pub braced: bool,
}

impl ParsedResolutionContext {
    pub fn offset(&self) -> TextSize {
        self.range.start()
    }

    pub fn size(&self) -> TextSize {
        self.range.len()
    }

    /// The definition of `symbol` within this context, if any.
    pub fn defined_symbol(&self, symbol: &Symbol) -> Option<&ParsedSymbol> {
        let qualified = symbol.to_qualified();
        self.symbols.iter().find(|s| s.symbol == qualified)
    }

    /// Byte range covering all import statements, if there are any.
    pub fn use_statements_range(&self) -> Option<TextRange> {
        let first = self.use_statements.first()?;
        let last = self.use_statements.last()?;
        Some(first.range.cover(last.range))
    }
}
