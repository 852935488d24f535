// edna - Clojure syntax and EDN toolkit
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! # edna
//!
//! Tokenizer, shift-reduce parser, unparser and EDN reader for Clojure
//! syntax, gathered behind one crate.
//!
//! ## Syntax trees
//!
//! ```rust
//! use edna::{ParseOptions, parse_source_with, unparse};
//!
//! let source = "[1 #_2 3] ; trailing";
//! let options = ParseOptions::default().with_lexical_preservation(true);
//! let root = parse_source_with(source, options).unwrap();
//! assert_eq!(unparse(&root), source);
//! ```
//!
//! ## EDN values
//!
//! ```rust
//! use edna::{Value, read_edn};
//!
//! let value = read_edn("{:a 1 :a 2}").unwrap().unwrap();
//! assert_eq!(value.get(&Value::keyword("a")), Some(&Value::int(2)));
//! ```
//!
//! ## Tagged literals
//!
//! ```rust
//! use edna::{ParseOptions, TagReaders, Value, read_edn_with};
//!
//! let readers = TagReaders::default().with("double", |form| match form {
//!     Value::Int(n) => Ok(Value::int(n * 2)),
//!     other => Err(format!("expected an int, got {}", other)),
//! });
//! let value = read_edn_with("#double 21", ParseOptions::default(), &readers).unwrap();
//! assert_eq!(value, Some(Value::int(42)));
//! ```

pub use edna_parser::{
    Atom, AstReducer, Keyword, LexErrorKind, Lexer, Node, NodeKind, Number, ParseError,
    ParseOptions, Parser, Payload, Reducer, Result, StackItem, Symbol, Token, TokenKind,
    next_token, parse_source, parse_source_with, unparse,
};
pub use edna_reader::{
    EdnReader, EdnReducer, TagReader, TagReaders, Value, read_edn, read_edn_all,
    read_edn_all_with, read_edn_with,
};
