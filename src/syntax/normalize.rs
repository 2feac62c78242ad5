//! Token normalization: uniform position records for every token.

use crate::base::{LineCol, TextRange, TextSize};

use super::token::{RawToken, Token, TokenKind};

/// Annotate raw tokens with line, column and byte range.
///
/// Offsets accumulate token text lengths. Tagged tokens keep the line the
/// tokenizer reported; columns are always derived from the text. A final
/// [`TokenKind::EndOfStream`] token with an empty range at the end of the
/// input is appended so the parser always sees a last event.
pub fn normalize(raw: impl IntoIterator<Item = RawToken>) -> Vec<Token> {
    let raw = raw.into_iter();
    let mut tokens = Vec::with_capacity(raw.size_hint().0 + 1);
    let mut position = LineCol::new(0, 0);
    let mut offset = TextSize::from(0);

    for token in raw {
        let (kind, text, line) = match token {
            RawToken::Literal(text) => (TokenKind::Literal, text, None),
            RawToken::Tagged { kind, text, line } => (kind, text, Some(line)),
        };
        if let Some(line) = line {
            position.line = line.saturating_sub(1);
        }

        let end = offset + TextSize::of(text.as_str());
        let next = position.advance(&text);
        tokens.push(Token {
            kind,
            text,
            position,
            range: TextRange::new(offset, end),
        });
        position = next;
        offset = end;
    }

    tokens.push(Token {
        kind: TokenKind::EndOfStream,
        text: String::new(),
        position,
        range: TextRange::empty(offset),
    });
    tokens
}
