//! Resolution context parser.
//!
//! A hand-written state machine over normalized tokens. It splits a file
//! into resolution contexts (one per namespace declaration, or one for the
//! global namespace when nothing is declared), collects the import
//! statements of each, and records the classes, interfaces, traits and
//! functions defined directly under it.
//!
//! Both namespace syntaxes are handled:
//!
//! - unbraced: `namespace A; ... namespace B; ...`, where each declaration
//!   closes the previous context just before its `namespace` keyword;
//! - braced: `namespace A { ... } namespace { ... }`, where a context spans
//!   exactly its braces and `namespace {` opens the global namespace.
//!
//! Parsing never fails. Unterminated constructs are dropped when the
//! stream ends.

use indexmap::IndexMap;
use smol_str::SmolStr;
use tracing::trace;

use crate::base::{LineCol, Symbol, TextRange, TextSize};
use crate::context::{ResolutionContext, UseClause, UseKind, UseStatement};

use super::lexer;
use super::normalize::normalize;
use super::parsed::{ParsedResolutionContext, ParsedSymbol, ParsedUseStatement, SymbolKind};
use super::token::{RawToken, Token, TokenKind};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum State {
    /// Before the first open tag.
    Start,
    InPhpCode,
    /// After `namespace`: a declaration, `namespace {`, or `namespace\name`.
    PotentialNamespaceName,
    NamespaceName,
    InUseStatement,
    UseStatementName,
    UseStatementAlias,
    /// Between a defining keyword and the opening brace of its body.
    InSymbolHeader,
    InSymbolBody,
}

/// Start of a construct: its position and byte offset.
#[derive(Copy, Clone, Debug)]
struct Mark {
    position: LineCol,
    offset: TextSize,
}

impl Mark {
    fn at(token: &Token) -> Self {
        Self {
            position: token.position,
            offset: token.range.start(),
        }
    }

    fn after(token: &Token) -> Self {
        Self {
            position: token.position.advance(&token.text),
            offset: token.range.end(),
        }
    }
}

/// A resolution context still being collected.
#[derive(Debug)]
struct ContextFrame {
    namespace: Option<Symbol>,
    /// Opened by a `namespace` keyword rather than implied by the file.
    declared: bool,
    braced: bool,
    /// Brace nesting inside a braced namespace, the namespace's own brace
    /// included.
    depth: u32,
    start: Mark,
    end: TextSize,
    use_statements: Vec<ParsedUseStatement>,
    symbols: Vec<ParsedSymbol>,
}

impl ContextFrame {
    fn implicit(start: Mark) -> Self {
        Self {
            namespace: None,
            declared: false,
            braced: false,
            depth: 0,
            start,
            end: start.offset,
            use_statements: Vec::new(),
            symbols: Vec::new(),
        }
    }

    /// Starts empty at the `namespace` keyword; only what follows the
    /// declaration extends it.
    fn declared(namespace: Option<Symbol>, braced: bool, start: Mark) -> Self {
        Self {
            namespace,
            declared: true,
            braced,
            depth: u32::from(braced),
            start,
            end: start.offset,
            use_statements: Vec::new(),
            symbols: Vec::new(),
        }
    }

    /// No imports and no definitions yet.
    fn is_empty(&self) -> bool {
        self.use_statements.is_empty() && self.symbols.is_empty()
    }

    fn extend_to(&mut self, end: TextSize) {
        self.end = self.end.max(end);
    }

    fn finish(self) -> ParsedResolutionContext {
        let statements = self
            .use_statements
            .iter()
            .map(|parsed| parsed.statement.clone())
            .collect();
        trace!(
            namespace = ?self.namespace,
            imports = self.use_statements.len(),
            symbols = self.symbols.len(),
            "resolution context finalized"
        );
        ParsedResolutionContext {
            context: ResolutionContext::new(self.namespace, statements),
            use_statements: self.use_statements,
            symbols: self.symbols,
            position: self.start.position,
            range: TextRange::new(self.start.offset, self.end),
            braced: self.braced,
        }
    }
}

#[derive(Debug)]
struct PendingNamespace {
    start: Mark,
    keyword_end: TextSize,
    atoms: Vec<SmolStr>,
}

#[derive(Debug)]
struct PendingUse {
    start: Mark,
    kind: UseKind,
    clauses: Vec<(UseKind, UseClause)>,
    atoms: Vec<SmolStr>,
    alias: Option<SmolStr>,
    group_prefix: Option<Vec<SmolStr>>,
    /// `function` or `const` in front of a clause inside a group.
    clause_kind: Option<UseKind>,
}

impl PendingUse {
    /// Inside a group and before the next clause's name.
    fn awaits_group_clause(&self) -> bool {
        self.group_prefix.is_some() && self.atoms.is_empty() && self.clause_kind.is_none()
    }

    fn finish_clause(&mut self) {
        let kind = self.clause_kind.take().unwrap_or(self.kind);
        if self.atoms.is_empty() {
            self.alias = None;
            return;
        }
        let mut atoms = self.group_prefix.clone().unwrap_or_default();
        atoms.append(&mut self.atoms);
        let alias = self
            .alias
            .take()
            .map(|alias| Symbol::from_trusted_atoms(vec![alias], false));
        self.clauses
            .push((kind, UseClause::new(Symbol::from_trusted_atoms(atoms, true), alias)));
    }

    /// One statement per kind, in order of first appearance.
    fn into_statements(self) -> Vec<UseStatement> {
        let mut by_kind: IndexMap<UseKind, Vec<UseClause>> = IndexMap::new();
        for (kind, clause) in self.clauses {
            by_kind.entry(kind).or_default().push(clause);
        }
        by_kind
            .into_iter()
            .map(|(kind, clauses)| UseStatement::new(clauses, kind))
            .collect()
    }
}

#[derive(Debug)]
struct PendingSymbol {
    kind: SymbolKind,
    start: Mark,
    name: Option<SmolStr>,
    awaiting_name: bool,
    parens: u32,
    depth: u32,
}

/// Splits token streams into parsed resolution contexts.
///
/// The parser holds no state between calls; each parse runs on its own.
#[derive(Copy, Clone, Debug, Default)]
pub struct ResolutionContextParser;

impl ResolutionContextParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse PHP source text.
    pub fn parse_source(&self, source: &str) -> Vec<ParsedResolutionContext> {
        self.parse_raw(lexer::lex(source))
    }

    /// Parse raw tokenizer output.
    pub fn parse_raw(&self, raw: impl IntoIterator<Item = RawToken>) -> Vec<ParsedResolutionContext> {
        self.parse(&normalize(raw))
    }

    /// Parse normalized tokens.
    pub fn parse(&self, tokens: &[Token]) -> Vec<ParsedResolutionContext> {
        let mut run = ParseRun::default();
        for token in tokens {
            if token.kind == TokenKind::EndOfStream {
                break;
            }
            run.step(token);
        }
        run.finish()
    }
}

/// Scan state of a single parse.
#[derive(Debug)]
struct ParseRun {
    state: State,
    contexts: Vec<ParsedResolutionContext>,
    frame: Option<ContextFrame>,
    namespace: Option<PendingNamespace>,
    use_statement: Option<PendingUse>,
    symbol: Option<PendingSymbol>,
    seen_namespace: bool,
}

impl Default for ParseRun {
    fn default() -> Self {
        Self {
            state: State::Start,
            contexts: Vec::new(),
            frame: None,
            namespace: None,
            use_statement: None,
            symbol: None,
            seen_namespace: false,
        }
    }
}

/// Tokens that never change state outside of the `Start` state.
fn is_ignorable(token: &Token) -> bool {
    token.kind.is_trivia()
        || matches!(
            token.kind,
            TokenKind::InlineHtml | TokenKind::OpenTag | TokenKind::OpenTagWithEcho
        )
}

fn name_atoms(text: &str) -> impl Iterator<Item = SmolStr> + '_ {
    text.split('\\').filter(|atom| !atom.is_empty()).map(SmolStr::new)
}

/// Where a statement ended by `token` stops: after a `;`, before a `?>`.
fn statement_end(token: &Token) -> TextSize {
    if token.kind == TokenKind::CloseTag {
        token.range.start()
    } else {
        token.range.end()
    }
}

impl ParseRun {
    fn step(&mut self, token: &Token) {
        match self.state {
            State::Start => self.start(token),
            State::InPhpCode => self.in_php_code(token),
            State::PotentialNamespaceName => self.potential_namespace_name(token),
            State::NamespaceName => self.namespace_name(token),
            State::InUseStatement => self.in_use_statement(token),
            State::UseStatementName => self.use_statement_name(token),
            State::UseStatementAlias => self.use_statement_alias(token),
            State::InSymbolHeader => self.in_symbol_header(token),
            State::InSymbolBody => self.in_symbol_body(token),
        }
    }

    fn start(&mut self, token: &Token) {
        if matches!(token.kind, TokenKind::OpenTag | TokenKind::OpenTagWithEcho) {
            self.frame = Some(ContextFrame::implicit(Mark::after(token)));
            self.state = State::InPhpCode;
        }
    }

    /// The frame governing `token`, opening an implicit one if a braced
    /// namespace just closed.
    fn frame_mut(&mut self, token: &Token) -> &mut ContextFrame {
        self.frame
            .get_or_insert_with(|| ContextFrame::implicit(Mark::at(token)))
    }

    fn in_php_code(&mut self, token: &Token) {
        if is_ignorable(token) {
            return;
        }
        match token.kind {
            TokenKind::Namespace => {
                self.namespace = Some(PendingNamespace {
                    start: Mark::at(token),
                    keyword_end: token.range.end(),
                    atoms: Vec::new(),
                });
                self.state = State::PotentialNamespaceName;
            }
            TokenKind::Use => {
                self.use_statement = Some(PendingUse {
                    start: Mark::at(token),
                    kind: UseKind::Type,
                    clauses: Vec::new(),
                    atoms: Vec::new(),
                    alias: None,
                    group_prefix: None,
                    clause_kind: None,
                });
                self.state = State::InUseStatement;
            }
            TokenKind::Class | TokenKind::Interface | TokenKind::Trait | TokenKind::Function => {
                let kind = match token.kind {
                    TokenKind::Class => SymbolKind::Class,
                    TokenKind::Interface => SymbolKind::Interface,
                    TokenKind::Trait => SymbolKind::Trait,
                    _ => SymbolKind::Function,
                };
                self.symbol = Some(PendingSymbol {
                    kind,
                    start: Mark::at(token),
                    name: None,
                    awaiting_name: true,
                    parens: 0,
                    depth: 0,
                });
                self.state = State::InSymbolHeader;
            }
            _ => self.code(token),
        }
    }

    /// Any other statement token: extends the current context and tracks
    /// the braces of a braced namespace.
    fn code(&mut self, token: &Token) {
        let frame = self.frame_mut(token);
        if frame.braced {
            if token.is_open_brace() {
                frame.depth += 1;
            } else if token.is_close_brace() {
                frame.depth = frame.depth.saturating_sub(1);
                if frame.depth == 0 {
                    frame.extend_to(token.range.end());
                    self.finalize_current_context();
                    return;
                }
            }
        }
        frame.extend_to(token.range.end());
    }

    fn potential_namespace_name(&mut self, token: &Token) {
        if is_ignorable(token) {
            return;
        }
        match token.kind {
            TokenKind::Identifier => {
                if let Some(pending) = self.namespace.as_mut() {
                    pending.atoms.extend(name_atoms(&token.text));
                }
                self.state = State::NamespaceName;
            }
            TokenKind::NsSeparator => {
                // `namespace\name` is a relative name, not a declaration.
                self.abandon_namespace();
                self.code(token);
            }
            _ if token.is_punct("{") => self.open_namespace(true),
            _ => {
                self.abandon_namespace();
                self.in_php_code(token);
            }
        }
    }

    fn namespace_name(&mut self, token: &Token) {
        if is_ignorable(token) {
            return;
        }
        match token.kind {
            TokenKind::Identifier => {
                if let Some(pending) = self.namespace.as_mut() {
                    pending.atoms.extend(name_atoms(&token.text));
                }
            }
            TokenKind::NsSeparator => {}
            _ if token.ends_statement() => self.open_namespace(false),
            _ if token.is_punct("{") => self.open_namespace(true),
            _ => {
                self.abandon_namespace();
                self.in_php_code(token);
            }
        }
    }

    /// The `namespace` keyword turned out to be code.
    fn abandon_namespace(&mut self) {
        self.state = State::InPhpCode;
        if let Some(pending) = self.namespace.take() {
            let frame = self
                .frame
                .get_or_insert_with(|| ContextFrame::implicit(pending.start));
            frame.extend_to(pending.keyword_end);
        }
    }

    /// A namespace declaration ended with `;` or `?>` (unbraced) or `{`
    /// (braced).
    fn open_namespace(&mut self, braced: bool) {
        self.state = State::InPhpCode;
        let Some(pending) = self.namespace.take() else {
            return;
        };
        let namespace = (!pending.atoms.is_empty())
            .then(|| Symbol::from_trusted_atoms(pending.atoms, true));
        trace!(?namespace, braced, "namespace opened");
        self.seen_namespace = true;

        // The first unbraced declaration of a file is the file's own
        // context rather than a new one.
        if let Some(frame) = self.frame.as_mut() {
            if !braced && !frame.declared && frame.is_empty() {
                frame.namespace = namespace;
                frame.declared = true;
                frame.start = pending.start;
                frame.end = pending.start.offset;
                return;
            }
        }

        self.finalize_current_context();
        self.frame = Some(ContextFrame::declared(namespace, braced, pending.start));
    }

    /// Emit the current frame. Implicit frames that govern nothing are
    /// dropped once the file has declared a namespace.
    fn finalize_current_context(&mut self) {
        if let Some(frame) = self.frame.take() {
            if frame.declared || !frame.is_empty() || !self.seen_namespace {
                self.contexts.push(frame.finish());
            }
        }
    }

    fn in_use_statement(&mut self, token: &Token) {
        if is_ignorable(token) {
            return;
        }
        let Some(pending) = self.use_statement.as_mut() else {
            self.state = State::InPhpCode;
            return;
        };
        let fresh = pending.clauses.is_empty() && pending.group_prefix.is_none();
        match token.kind {
            TokenKind::Function if fresh => pending.kind = UseKind::Function,
            TokenKind::Const if fresh => pending.kind = UseKind::Const,
            TokenKind::Function if pending.awaits_group_clause() => {
                pending.clause_kind = Some(UseKind::Function);
            }
            TokenKind::Const if pending.awaits_group_clause() => {
                pending.clause_kind = Some(UseKind::Const);
            }
            TokenKind::Identifier => {
                pending.atoms.extend(name_atoms(&token.text));
                self.state = State::UseStatementName;
            }
            TokenKind::NsSeparator => {}
            _ if token.ends_statement() => self.finish_use_statement(token),
            _ if token.is_close_brace() => pending.group_prefix = None,
            _ => self.abandon_use_statement(token),
        }
    }

    fn use_statement_name(&mut self, token: &Token) {
        if is_ignorable(token) {
            return;
        }
        let Some(pending) = self.use_statement.as_mut() else {
            self.state = State::InPhpCode;
            return;
        };
        match token.kind {
            TokenKind::Identifier => pending.atoms.extend(name_atoms(&token.text)),
            TokenKind::NsSeparator => {}
            TokenKind::As => self.state = State::UseStatementAlias,
            _ if token.is_punct(",") => {
                pending.finish_clause();
                self.state = State::InUseStatement;
            }
            _ if token.ends_statement() => {
                pending.finish_clause();
                self.finish_use_statement(token);
            }
            _ if token.is_punct("{") => {
                pending.group_prefix = Some(std::mem::take(&mut pending.atoms));
                self.state = State::InUseStatement;
            }
            _ if token.is_close_brace() => {
                pending.finish_clause();
                pending.group_prefix = None;
            }
            _ => self.abandon_use_statement(token),
        }
    }

    fn use_statement_alias(&mut self, token: &Token) {
        if is_ignorable(token) {
            return;
        }
        let Some(pending) = self.use_statement.as_mut() else {
            self.state = State::InPhpCode;
            return;
        };
        match token.kind {
            TokenKind::Identifier => pending.alias = name_atoms(&token.text).last(),
            _ if token.is_punct(",") => {
                pending.finish_clause();
                self.state = State::InUseStatement;
            }
            _ if token.ends_statement() => {
                pending.finish_clause();
                self.finish_use_statement(token);
            }
            _ if token.is_close_brace() => {
                pending.finish_clause();
                pending.group_prefix = None;
                self.state = State::UseStatementName;
            }
            _ => self.abandon_use_statement(token),
        }
    }

    fn finish_use_statement(&mut self, terminator: &Token) {
        self.state = State::InPhpCode;
        let Some(pending) = self.use_statement.take() else {
            return;
        };
        let end = statement_end(terminator);
        let frame = self
            .frame
            .get_or_insert_with(|| ContextFrame::implicit(pending.start));
        frame.extend_to(end);
        let position = pending.start.position;
        let range = TextRange::new(pending.start.offset, end);
        frame.use_statements.extend(
            pending
                .into_statements()
                .into_iter()
                .map(|statement| ParsedUseStatement { statement, position, range }),
        );
    }

    /// Not an import after all; treat the token as code.
    fn abandon_use_statement(&mut self, token: &Token) {
        self.use_statement = None;
        self.state = State::InPhpCode;
        self.in_php_code(token);
    }

    fn in_symbol_header(&mut self, token: &Token) {
        if is_ignorable(token) {
            return;
        }
        let Some(pending) = self.symbol.as_mut() else {
            self.state = State::InPhpCode;
            return;
        };
        if pending.awaiting_name {
            if token.kind == TokenKind::Identifier && !token.text.contains('\\') {
                pending.name = Some(SmolStr::new(&token.text));
                pending.awaiting_name = false;
                return;
            }
            if pending.kind == SymbolKind::Function && token.is_punct("&") {
                return;
            }
            // Closures and anonymous classes have no name.
            pending.awaiting_name = false;
        }

        if token.is_punct("(") {
            pending.parens += 1;
        } else if token.is_punct(")") {
            pending.parens = pending.parens.saturating_sub(1);
        } else if pending.parens == 0 && token.is_open_brace() {
            pending.depth = 1;
            self.state = State::InSymbolBody;
        } else if pending.parens == 0 && token.ends_statement() {
            // A declaration without a body.
            self.symbol = None;
            self.state = State::InPhpCode;
            self.code(token);
        }
    }

    fn in_symbol_body(&mut self, token: &Token) {
        let Some(pending) = self.symbol.as_mut() else {
            self.state = State::InPhpCode;
            return;
        };
        if token.is_open_brace() {
            pending.depth += 1;
        } else if token.is_close_brace() {
            pending.depth -= 1;
            if pending.depth == 0 {
                self.finish_symbol(token);
            }
        }
    }

    fn finish_symbol(&mut self, closing: &Token) {
        self.state = State::InPhpCode;
        let Some(pending) = self.symbol.take() else {
            return;
        };
        let end = closing.range.end();
        let frame = self
            .frame
            .get_or_insert_with(|| ContextFrame::implicit(pending.start));
        frame.extend_to(end);

        let Some(name) = pending.name else {
            return;
        };
        let symbol = Symbol::qualify_in(frame.namespace.as_ref(), &[name]);
        trace!(%symbol, kind = %pending.kind, "symbol finalized");
        frame.symbols.push(ParsedSymbol {
            symbol,
            kind: pending.kind,
            position: pending.start.position,
            range: TextRange::new(pending.start.offset, end),
        });
    }

    /// End of stream: drop unterminated constructs and emit what is open.
    fn finish(mut self) -> Vec<ParsedResolutionContext> {
        self.namespace = None;
        self.use_statement = None;
        self.symbol = None;
        self.finalize_current_context();
        self.contexts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Vec<ParsedResolutionContext> {
        ResolutionContextParser::new().parse_source(source)
    }

    fn sym(s: &str) -> Symbol {
        s.parse().unwrap()
    }

    fn span(context: &ParsedResolutionContext) -> (u32, u32) {
        (context.offset().into(), context.size().into())
    }

    fn symbols(context: &ParsedResolutionContext) -> Vec<(String, SymbolKind)> {
        context
            .symbols
            .iter()
            .map(|s| (s.symbol.to_string(), s.kind))
            .collect()
    }

    #[test]
    fn test_no_open_tag_yields_no_contexts() {
        assert!(parse("").is_empty());
        assert!(parse("<html>namespace A;</html>").is_empty());
    }

    #[test]
    fn test_empty_file_yields_global_context_after_open_tag() {
        let contexts = parse("<?php\n");

        assert_eq!(contexts.len(), 1);
        assert_eq!(contexts[0].context, ResolutionContext::global());
        assert_eq!(span(&contexts[0]), (6, 0));
        assert_eq!(contexts[0].position, LineCol::new(1, 0));
    }

    #[test]
    fn test_single_unbraced_namespace() {
        let source = "<?php namespace A; use B\\C; class D {}";
        let contexts = parse(source);

        assert_eq!(contexts.len(), 1);
        let context = &contexts[0];
        assert_eq!(context.context.primary_namespace(), Some(&sym("\\A")));
        assert_eq!(context.use_statements.len(), 1);
        assert_eq!(context.use_statements[0].statement.clauses()[0].symbol(), &sym("\\B\\C"));
        assert_eq!(symbols(context), vec![("\\A\\D".to_string(), SymbolKind::Class)]);
        assert_eq!(span(context), (6, source.len() as u32 - 6));
        assert!(!context.braced);
    }

    #[test]
    fn test_two_unbraced_namespaces() {
        let source = "<?php namespace A; use X; namespace B; use Y;";
        let contexts = parse(source);

        assert_eq!(contexts.len(), 2);
        assert_eq!(contexts[0].context.primary_namespace(), Some(&sym("\\A")));
        assert_eq!(contexts[0].context.symbol_by_alias("X", UseKind::Type), Some(&sym("\\X")));
        assert_eq!(contexts[0].context.symbol_by_alias("Y", UseKind::Type), None);
        assert_eq!(contexts[1].context.primary_namespace(), Some(&sym("\\B")));
        assert_eq!(contexts[1].context.symbol_by_alias("Y", UseKind::Type), Some(&sym("\\Y")));

        let second_keyword = source.rfind("namespace").unwrap() as u32;
        assert_eq!(span(&contexts[0]), (6, 19));
        assert!(u32::from(contexts[0].range.end()) <= second_keyword);
        assert_eq!(u32::from(contexts[1].offset()), second_keyword);
    }

    #[test]
    fn test_bare_declaration_is_zero_size() {
        let source = "<?php namespace A; namespace B; use Y;";
        let contexts = parse(source);

        assert_eq!(contexts.len(), 2);
        assert_eq!(contexts[0].context.primary_namespace(), Some(&sym("\\A")));
        assert_eq!(span(&contexts[0]), (6, 0));
        assert_eq!(&source[contexts[1].range], "namespace B; use Y;");

        let contexts = parse("<?php\ndeclare(strict_types=1);\nnamespace App;\n");
        assert_eq!(contexts[0].size(), TextSize::from(0));
    }

    #[test]
    fn test_braced_namespaces_span_their_braces() {
        let source = "<?php\nnamespace A {\n    use X;\n    if (true) { f(); }\n}\nnamespace {\n    function g() {}\n}\n";
        let contexts = parse(source);

        assert_eq!(contexts.len(), 2);
        assert!(contexts[0].braced);
        let first = &source[contexts[0].range];
        assert!(first.starts_with("namespace A {"));
        assert!(first.ends_with("}"));
        assert!(!first.contains("namespace {"));

        assert_eq!(contexts[1].context.primary_namespace(), None);
        assert_eq!(symbols(&contexts[1]), vec![("\\g".to_string(), SymbolKind::Function)]);
        assert_eq!(&source[contexts[1].range], "namespace {\n    function g() {}\n}");
    }

    #[test]
    fn test_imports_before_namespace_belong_to_global_context() {
        let contexts = parse("<?php use Foo; class Bar {} namespace A; use Baz;");

        assert_eq!(contexts.len(), 2);
        assert_eq!(contexts[0].context.primary_namespace(), None);
        assert_eq!(symbols(&contexts[0]), vec![("\\Bar".to_string(), SymbolKind::Class)]);
        assert_eq!(contexts[1].context.primary_namespace(), Some(&sym("\\A")));
    }

    #[test]
    fn test_declare_before_namespace_does_not_split_context() {
        let contexts = parse("<?php\ndeclare(strict_types=1);\n\nnamespace App;\n");

        assert_eq!(contexts.len(), 1);
        assert_eq!(contexts[0].context.primary_namespace(), Some(&sym("\\App")));
        assert_eq!(contexts[0].position, LineCol::from_one_indexed(4, 1));
    }

    #[test]
    fn test_use_statement_variants() {
        let contexts = parse(
            "<?php namespace N;\nuse A\\B as C, D;\nuse function E\\f;\nuse const G\\H, I\\J as K;\nuse L\\{M, N\\O as P};",
        );
        let context = &contexts[0].context;

        assert_eq!(contexts[0].use_statements.len(), 4);
        assert_eq!(context.symbol_by_alias("C", UseKind::Type), Some(&sym("\\A\\B")));
        assert_eq!(context.symbol_by_alias("D", UseKind::Type), Some(&sym("\\D")));
        assert_eq!(context.symbol_by_alias("f", UseKind::Function), Some(&sym("\\E\\f")));
        assert_eq!(context.symbol_by_alias("H", UseKind::Const), Some(&sym("\\G\\H")));
        assert_eq!(context.symbol_by_alias("K", UseKind::Const), Some(&sym("\\I\\J")));
        assert_eq!(context.symbol_by_alias("M", UseKind::Type), Some(&sym("\\L\\M")));
        assert_eq!(context.symbol_by_alias("P", UseKind::Type), Some(&sym("\\L\\N\\O")));
        assert_eq!(contexts[0].use_statements[1].statement.kind(), UseKind::Function);
    }

    #[test]
    fn test_mixed_kind_group_use() {
        let source = "<?php namespace N; use A\\{function b, const C, D, E\\F as G}; class H {}";
        let contexts = parse(source);
        let context = &contexts[0];

        let kinds: Vec<_> = context.use_statements.iter().map(|u| u.statement.kind()).collect();
        assert_eq!(kinds, vec![UseKind::Function, UseKind::Const, UseKind::Type]);
        for parsed in &context.use_statements {
            assert_eq!(&source[parsed.range], "use A\\{function b, const C, D, E\\F as G};");
        }
        assert_eq!(context.context.symbol_by_alias("b", UseKind::Function), Some(&sym("\\A\\b")));
        assert_eq!(context.context.symbol_by_alias("C", UseKind::Const), Some(&sym("\\A\\C")));
        assert_eq!(context.context.symbol_by_alias("D", UseKind::Type), Some(&sym("\\A\\D")));
        assert_eq!(context.context.symbol_by_alias("G", UseKind::Type), Some(&sym("\\A\\E\\F")));
        assert_eq!(context.context.symbol_by_alias("b", UseKind::Type), None);
        assert_eq!(symbols(context), vec![("\\N\\H".to_string(), SymbolKind::Class)]);
        assert_eq!(&source[context.use_statements_range().unwrap()], &source[context.use_statements[0].range]);
    }

    #[test]
    fn test_use_statement_ranges() {
        let source = "<?php\nnamespace N;\n\nuse A\\B;\nuse C;\n";
        let contexts = parse(source);
        let uses = &contexts[0].use_statements;

        assert_eq!(&source[uses[0].range], "use A\\B;");
        assert_eq!(uses[0].position, LineCol::from_one_indexed(4, 1));
        assert_eq!(&source[uses[1].range], "use C;");
        assert_eq!(&source[contexts[0].use_statements_range().unwrap()], "use A\\B;\nuse C;");
    }

    #[test]
    fn test_symbol_bodies_skip_nested_braces() {
        let source = "<?php namespace A;\ninterface I {}\ntrait T { function t() { if (1) { $x = function () { return [1]; }; } } }\nabstract class C extends B implements I { }\nfunction &f($a = array()) { return \"}\"; }\n";
        let contexts = parse(source);

        assert_eq!(
            symbols(&contexts[0]),
            vec![
                ("\\A\\I".to_string(), SymbolKind::Interface),
                ("\\A\\T".to_string(), SymbolKind::Trait),
                ("\\A\\C".to_string(), SymbolKind::Class),
                ("\\A\\f".to_string(), SymbolKind::Function),
            ]
        );
        let trait_symbol = &contexts[0].symbols[1];
        assert!(source[trait_symbol.range].starts_with("trait T {"));
        assert!(source[trait_symbol.range].ends_with("} } }"));
    }

    #[test]
    fn test_closures_and_anonymous_classes_are_not_symbols() {
        let contexts = parse(
            "<?php namespace A;\n$f = function ($x) use ($y) { return $x; };\n$o = new class(1) extends B { };\nclass Real {}\n",
        );
        assert_eq!(symbols(&contexts[0]), vec![("\\A\\Real".to_string(), SymbolKind::Class)]);
    }

    #[test]
    fn test_relative_namespace_operator_is_code() {
        let contexts = parse("<?php namespace A;\nnamespace\\foo();\nclass B {}\n");

        assert_eq!(contexts.len(), 1);
        assert_eq!(symbols(&contexts[0]), vec![("\\A\\B".to_string(), SymbolKind::Class)]);
    }

    #[test]
    fn test_split_name_tokens() {
        let raw = vec![
            RawToken::tagged(TokenKind::OpenTag, "<?php ", 1),
            RawToken::tagged(TokenKind::Namespace, "namespace", 1),
            RawToken::tagged(TokenKind::Whitespace, " ", 1),
            RawToken::tagged(TokenKind::Identifier, "A", 1),
            RawToken::tagged(TokenKind::NsSeparator, "\\", 1),
            RawToken::tagged(TokenKind::Identifier, "B", 1),
            RawToken::literal(";"),
            RawToken::tagged(TokenKind::Use, "use", 1),
            RawToken::tagged(TokenKind::Whitespace, " ", 1),
            RawToken::tagged(TokenKind::Identifier, "C", 1),
            RawToken::tagged(TokenKind::NsSeparator, "\\", 1),
            RawToken::tagged(TokenKind::Identifier, "D", 1),
            RawToken::tagged(TokenKind::Whitespace, " ", 1),
            RawToken::tagged(TokenKind::As, "as", 1),
            RawToken::tagged(TokenKind::Whitespace, " ", 1),
            RawToken::tagged(TokenKind::Identifier, "E", 1),
            RawToken::literal(";"),
        ];
        let contexts = ResolutionContextParser::new().parse_raw(raw);

        assert_eq!(contexts.len(), 1);
        assert_eq!(contexts[0].context.primary_namespace(), Some(&sym("\\A\\B")));
        assert_eq!(contexts[0].context.symbol_by_alias("E", UseKind::Type), Some(&sym("\\C\\D")));
    }

    #[test]
    fn test_unterminated_constructs_are_dropped() {
        let contexts = parse("<?php namespace A; use B; class C { function d() {");

        assert_eq!(contexts.len(), 1);
        assert!(contexts[0].symbols.is_empty());
        assert_eq!(contexts[0].use_statements.len(), 1);
    }

    #[test]
    fn test_close_tag_terminates_statements() {
        let source = "<?php namespace A ?><?php use B ?>";
        let contexts = parse(source);

        assert_eq!(contexts[0].context.primary_namespace(), Some(&sym("\\A")));
        assert_eq!(&source[contexts[0].use_statements[0].range], "use B ");
    }

    #[test]
    fn test_line_comment_ends_at_close_tag() {
        let contexts = parse("<?php namespace A; // note ?>\n<p>class Foo {</p>\n<?php class Bar {}\n");

        assert_eq!(contexts.len(), 1);
        assert_eq!(symbols(&contexts[0]), vec![("\\A\\Bar".to_string(), SymbolKind::Class)]);
    }

    #[test]
    fn test_contexts_do_not_overlap() {
        let source = "<?php\nuse X;\nnamespace A { class B {} }\nnamespace C { use D; }\n";
        let contexts = parse(source);

        assert_eq!(contexts.len(), 3);
        for pair in contexts.windows(2) {
            assert!(pair[0].range.end() <= pair[1].range.start());
        }
    }
}
