//! Syntax layer: from PHP source to parsed resolution contexts.
//!
//! ```text
//! source ──lexer──▶ RawToken ──normalize──▶ Token ──parser──▶ ParsedResolutionContext
//! ```
//!
//! The lexer is a convenience; any tokenizer producing [`RawToken`]s can
//! feed [`ResolutionContextParser::parse_raw`].

pub mod lexer;
mod normalize;
mod parsed;
mod parser;
mod token;

pub use lexer::lex;
pub use normalize::normalize;
pub use parsed::{ParsedResolutionContext, ParsedSymbol, ParsedUseStatement, SymbolKind};
pub use parser::ResolutionContextParser;
pub use token::{RawToken, Token, TokenKind};
