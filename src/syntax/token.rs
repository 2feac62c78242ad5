//! Token model: the raw tokenizer contract and the normalized record.

use crate::base::{LineCol, TextRange};

/// Kinds of tagged tokens the context parser cares about.
///
/// Punctuation is not a kind: tokenizers hand it over as a bare literal
/// string, which normalizes to [`TokenKind::Literal`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    InlineHtml,
    OpenTag,
    OpenTagWithEcho,
    CloseTag,
    Whitespace,
    Comment,
    DocComment,
    Namespace,
    Use,
    Function,
    Const,
    As,
    Class,
    Interface,
    Trait,
    Extends,
    Implements,
    /// A plain name, or a PHP 8 name token such as `Foo\Bar`.
    Identifier,
    NsSeparator,
    Variable,
    StringLiteral,
    Number,
    /// `{$` inside an interpolated string, closed by a bare `}`.
    CurlyOpen,
    /// `${` inside an interpolated string, closed by a bare `}`.
    DollarOpenCurlyBraces,
    /// `::`, `->`, `?->` and other multi-character operators.
    Operator,
    /// Any other tagged token (keywords the parser does not track).
    Other,
    /// A bare punctuation string.
    Literal,
    /// Synthetic final token appended by the normalizer.
    EndOfStream,
}

impl TokenKind {
    /// Whitespace and comments: tokens that never change parser state.
    pub fn is_trivia(self) -> bool {
        matches!(self, TokenKind::Whitespace | TokenKind::Comment | TokenKind::DocComment)
    }

    /// Tokens that open a brace the parser must balance.
    pub fn opens_brace(self) -> bool {
        matches!(self, TokenKind::CurlyOpen | TokenKind::DollarOpenCurlyBraces)
    }
}

/// One element of tokenizer output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RawToken {
    /// Bare punctuation such as `;`, `{` or `,`.
    Literal(String),
    /// A typed token with the 1-indexed line it starts on.
    Tagged {
        kind: TokenKind,
        text: String,
        line: u32,
    },
}

impl RawToken {
    pub fn literal(text: impl Into<String>) -> Self {
        RawToken::Literal(text.into())
    }

    pub fn tagged(kind: TokenKind, text: impl Into<String>, line: u32) -> Self {
        RawToken::Tagged {
            kind,
            text: text.into(),
            line,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            RawToken::Literal(text) => text,
            RawToken::Tagged { text, .. } => text,
        }
    }
}

/// A token annotated with its full position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    /// Where the token starts.
    pub position: LineCol,
    /// Byte range of the token in the source.
    pub range: TextRange,
}

impl Token {
    /// True for a bare punctuation token with exactly this text.
    pub fn is_punct(&self, punct: &str) -> bool {
        self.kind == TokenKind::Literal && self.text == punct
    }

    /// `{`, including the string interpolation openers.
    pub fn is_open_brace(&self) -> bool {
        self.is_punct("{") || self.kind.opens_brace()
    }

    pub fn is_close_brace(&self) -> bool {
        self.is_punct("}")
    }

    /// `;` or a close tag, which ends a statement the same way.
    pub fn ends_statement(&self) -> bool {
        self.is_punct(";") || self.kind == TokenKind::CloseTag
    }
}
