// edna-parser - Lexer, parser and unparser for Clojure syntax
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! # edna-parser
//!
//! Tokenizer and shift-reduce parser for Clojure and EDN source text.
//!
//! The [`Parser`] engine is generic over a [`Reducer`], which decides what a
//! leaf token or a closed collection turns into. [`AstReducer`] builds a
//! syntax tree that can keep whitespace and comments, and [`unparse`] turns
//! such a tree back into the exact text it came from.
//!
//! ```
//! use edna_parser::{ParseOptions, parse_source_with, unparse};
//!
//! let source = "(def x ; answer\n  42)";
//! let options = ParseOptions::default().with_lexical_preservation(true);
//! let root = parse_source_with(source, options).unwrap();
//! assert_eq!(unparse(&root), source);
//! ```

pub mod ast;
pub mod decode;
pub mod error;
mod intern;
pub mod keyword;
pub mod lexer;
pub mod parser;
pub mod symbol;
pub mod unparse;

pub use ast::{AstReducer, Node, NodeKind, Payload, parse_source, parse_source_with};
pub use bigdecimal::BigDecimal;
pub use decode::{Atom, Number, decode_char, decode_number, decode_string, decode_token};
pub use error::{ParseError, Result};
pub use keyword::Keyword;
pub use lexer::{LexErrorKind, Lexer, Token, TokenKind, next_token};
pub use num_bigint::BigInt;
pub use parser::{ParseOptions, Parser, Reducer, StackItem};
pub use symbol::Symbol;
pub use unparse::{unparse, unparse_into};
