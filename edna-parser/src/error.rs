// edna-parser - Error types
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Errors raised while reducing a token stream.
//!
//! Lexical problems are not errors at the lexer level: they travel as
//! `lex-error` tokens and only become a [`ParseError`] when a fail-fast parse
//! meets one at a reduction boundary.

use thiserror::Error;

use crate::lexer::{LexErrorKind, Token, TokenKind};

/// Result type for parsing.
pub type Result<T> = std::result::Result<T, ParseError>;

/// Errors that can occur while parsing or reading.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// An opener without its closer, or a closer without its opener.
    #[error("At position {position}, unmatched {kind}")]
    UnmatchedDelimiter { kind: TokenKind, position: usize },

    /// A malformed token reached a reduction boundary.
    #[error("At position {position}, lexical error{}: {text:?}", fmt_lex_kind(.kind))]
    LexError {
        kind: Option<LexErrorKind>,
        text: String,
        position: usize,
    },

    /// No reader is registered for a tagged literal.
    #[error("At position {position}, no reader for tag #{name}")]
    UnknownTag { name: String, position: usize },

    /// A registered tag reader rejected its input.
    #[error("Tag reader #{tag} failed: {message}")]
    TagReader { tag: String, message: String },

    /// A well-formed number with no representable value.
    #[error("At position {position}, cannot decode number {text:?}")]
    InvalidNumber { text: String, position: usize },
}

fn fmt_lex_kind(kind: &Option<LexErrorKind>) -> String {
    match kind {
        Some(kind) => format!(" ({kind})"),
        None => String::new(),
    }
}

impl ParseError {
    /// The error for a raw token that should have been reduced by now.
    ///
    /// Lex-error tokens report their lexical problem, anything else is an
    /// unmatched delimiter.
    pub fn unreduced(token: &Token) -> Self {
        match token.kind {
            TokenKind::LexError => ParseError::LexError {
                kind: token.error,
                text: token.text.clone(),
                position: token.position,
            },
            kind => ParseError::UnmatchedDelimiter {
                kind,
                position: token.position,
            },
        }
    }

    /// Byte offset the error refers to, when it has one.
    pub fn position(&self) -> Option<usize> {
        match self {
            ParseError::UnmatchedDelimiter { position, .. }
            | ParseError::LexError { position, .. }
            | ParseError::UnknownTag { position, .. }
            | ParseError::InvalidNumber { position, .. } => Some(*position),
            ParseError::TagReader { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unreduced_opener() {
        let err = ParseError::unreduced(&Token::new(TokenKind::LParen, "(", 4));
        assert_eq!(
            err,
            ParseError::UnmatchedDelimiter {
                kind: TokenKind::LParen,
                position: 4
            }
        );
        assert_eq!(err.to_string(), "At position 4, unmatched lparen");
    }

    #[test]
    fn test_unreduced_lex_error() {
        let token = Token::lex_error("42x", 0, Some(LexErrorKind::InvalidNumberFormat));
        let err = ParseError::unreduced(&token);
        assert_eq!(err.position(), Some(0));
        assert_eq!(
            err.to_string(),
            "At position 0, lexical error (invalid-number-format): \"42x\""
        );
    }

    #[test]
    fn test_display_without_subkind() {
        let err = ParseError::unreduced(&Token::lex_error("\"abc", 2, None));
        assert_eq!(err.to_string(), "At position 2, lexical error: \"\\\"abc\"");
    }
}
