//! PHP lexer producing the raw tokenizer contract.
//!
//! Only what the context parser needs is distinguished: tags, trivia,
//! names, the keywords that start namespaces, imports and definitions, and
//! punctuation. Strings, heredocs and comments are whole tokens so braces
//! inside them never reach the parser.

use logos::{Lexer, Logos};

use crate::base::{LineIndex, TextSize};

use super::token::{RawToken, TokenKind};

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum PhpToken {
    #[regex(r"<\?[pP][hH][pP]([ \t]|\r?\n)?")]
    OpenTag,
    #[token("<?=")]
    OpenTagWithEcho,
    #[regex(r"\?>(\r?\n)?")]
    CloseTag,

    #[regex(r"[ \t\r\n\f]+")]
    Whitespace,
    #[token("//", line_comment)]
    #[token("#", line_comment)]
    LineComment,
    #[token("/*", block_comment)]
    BlockComment,

    #[token("namespace", ignore(ascii_case))]
    Namespace,
    #[token("use", ignore(ascii_case))]
    Use,
    #[token("function", ignore(ascii_case))]
    Function,
    #[token("const", ignore(ascii_case))]
    Const,
    #[token("as", ignore(ascii_case))]
    As,
    #[token("class", ignore(ascii_case))]
    Class,
    #[token("interface", ignore(ascii_case))]
    Interface,
    #[token("trait", ignore(ascii_case))]
    Trait,
    #[token("extends", ignore(ascii_case))]
    Extends,
    #[token("implements", ignore(ascii_case))]
    Implements,

    #[regex(r"\\?[a-zA-Z_\x{80}-\x{10FFFF}][a-zA-Z0-9_\x{80}-\x{10FFFF}]*(\\[a-zA-Z_\x{80}-\x{10FFFF}][a-zA-Z0-9_\x{80}-\x{10FFFF}]*)*")]
    Name,
    #[token("\\")]
    NsSeparator,
    #[regex(r"\$[a-zA-Z_\x{80}-\x{10FFFF}][a-zA-Z0-9_\x{80}-\x{10FFFF}]*")]
    Variable,

    #[regex(r"'([^'\\]|\\(.|\n))*'")]
    #[regex(r#""([^"\\]|\\(.|\n))*""#)]
    #[regex(r"`([^`\\]|\\(.|\n))*`")]
    #[regex(r#"<<<[ \t]*("?[a-zA-Z_][a-zA-Z0-9_]*"?|'[a-zA-Z_][a-zA-Z0-9_]*')\r?\n"#, heredoc)]
    StringLiteral,
    #[regex(r"[0-9][0-9a-zA-Z_]*(\.[0-9][0-9a-zA-Z_]*)?")]
    Number,

    #[token("::")]
    #[token("->")]
    #[token("?->")]
    #[token("=>")]
    #[token("#[")]
    Operator,

    #[regex(r"[{}()\[\];,=&|\^!~@?:.+\-*/%<>$]")]
    Punct,
}

/// Skip to the end of a block comment; unterminated comments run to EOF.
fn block_comment(lex: &mut Lexer<PhpToken>) -> bool {
    let rest = lex.remainder();
    let len = rest.find("*/").map_or(rest.len(), |end| end + 2);
    lex.bump(len);
    true
}

/// A one-line comment ends before a newline or a close tag.
fn line_comment(lex: &mut Lexer<PhpToken>) -> bool {
    let rest = lex.remainder();
    let line = rest.find('\n').map_or(rest, |end| &rest[..end]);
    lex.bump(line.find("?>").unwrap_or(line.len()));
    true
}

/// Skip a heredoc or nowdoc body up to and including its closing label.
fn heredoc(lex: &mut Lexer<PhpToken>) -> bool {
    let label: String = lex
        .slice()
        .trim_start_matches("<<<")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();
    let rest = lex.remainder();

    let mut line_start = 0;
    while line_start <= rest.len() {
        let line_end = rest[line_start..]
            .find('\n')
            .map_or(rest.len(), |i| line_start + i);
        let line = &rest[line_start..line_end];
        let indent = line.len() - line.trim_start_matches([' ', '\t']).len();
        if let Some(after) = line[indent..].strip_prefix(label.as_str()) {
            let continues_name = after
                .chars()
                .next()
                .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_' || !c.is_ascii());
            if !continues_name {
                lex.bump(line_start + indent + label.len());
                return true;
            }
        }
        line_start = line_end + 1;
    }
    lex.bump(rest.len());
    true
}

impl PhpToken {
    fn kind(self) -> Option<TokenKind> {
        let kind = match self {
            PhpToken::OpenTag => TokenKind::OpenTag,
            PhpToken::OpenTagWithEcho => TokenKind::OpenTagWithEcho,
            PhpToken::CloseTag => TokenKind::CloseTag,
            PhpToken::Whitespace => TokenKind::Whitespace,
            PhpToken::LineComment | PhpToken::BlockComment => TokenKind::Comment,
            PhpToken::Namespace => TokenKind::Namespace,
            PhpToken::Use => TokenKind::Use,
            PhpToken::Function => TokenKind::Function,
            PhpToken::Const => TokenKind::Const,
            PhpToken::As => TokenKind::As,
            PhpToken::Class => TokenKind::Class,
            PhpToken::Interface => TokenKind::Interface,
            PhpToken::Trait => TokenKind::Trait,
            PhpToken::Extends => TokenKind::Extends,
            PhpToken::Implements => TokenKind::Implements,
            PhpToken::Name => TokenKind::Identifier,
            PhpToken::NsSeparator => TokenKind::NsSeparator,
            PhpToken::Variable => TokenKind::Variable,
            PhpToken::StringLiteral => TokenKind::StringLiteral,
            PhpToken::Number => TokenKind::Number,
            PhpToken::Operator => TokenKind::Operator,
            PhpToken::Punct => return None,
        };
        Some(kind)
    }

    fn is_keyword(self) -> bool {
        matches!(
            self,
            PhpToken::Namespace
                | PhpToken::Use
                | PhpToken::Function
                | PhpToken::Const
                | PhpToken::As
                | PhpToken::Class
                | PhpToken::Interface
                | PhpToken::Trait
                | PhpToken::Extends
                | PhpToken::Implements
        )
    }
}

/// Tokenize PHP source into the raw token contract.
///
/// Text outside `<?php ... ?>` becomes [`TokenKind::InlineHtml`]. Keywords
/// directly after `->`, `?->` or `::` are plain identifiers, so
/// `Foo::class` never starts a definition.
pub fn lex(source: &str) -> Vec<RawToken> {
    let lines = LineIndex::new(source);
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < source.len() {
        let html_end = find_open_tag(&source[pos..]).map_or(source.len(), |i| pos + i);
        if html_end > pos {
            tokens.push(RawToken::tagged(
                TokenKind::InlineHtml,
                &source[pos..html_end],
                line_at(&lines, pos),
            ));
        }
        if html_end == source.len() {
            break;
        }
        pos = lex_code(source, html_end, &lines, &mut tokens);
    }

    tokens
}

/// Lex from an open tag up to and including the next close tag. Returns
/// the byte offset where inline HTML resumes.
fn lex_code(source: &str, start: usize, lines: &LineIndex, tokens: &mut Vec<RawToken>) -> usize {
    let mut lexer = PhpToken::lexer(&source[start..]);
    let mut after_member_access = false;

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let text = lexer.slice();
        let line = line_at(lines, start + span.start);

        let token = match result {
            Ok(token) => token,
            Err(()) => {
                tokens.push(RawToken::literal(text));
                after_member_access = false;
                continue;
            }
        };

        match token.kind() {
            None => tokens.push(RawToken::literal(text)),
            Some(_) if after_member_access && token.is_keyword() => {
                tokens.push(RawToken::tagged(TokenKind::Identifier, text, line));
            }
            Some(kind) => tokens.push(RawToken::tagged(kind, text, line)),
        }

        if token == PhpToken::CloseTag {
            return start + span.end;
        }
        match token {
            PhpToken::Whitespace | PhpToken::LineComment | PhpToken::BlockComment => {}
            PhpToken::Operator => after_member_access = matches!(text, "::" | "->" | "?->"),
            _ => after_member_access = false,
        }
    }

    source.len()
}

fn find_open_tag(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    (0..bytes.len()).find(|&i| {
        bytes[i..].starts_with(b"<?=")
            || bytes
                .get(i..i + 5)
                .is_some_and(|tag| tag.eq_ignore_ascii_case(b"<?php"))
    })
}

fn line_at(lines: &LineIndex, offset: usize) -> u32 {
    lines.line_col(TextSize::from(offset as u32)).line_one_indexed()
}
