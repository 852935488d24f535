// edna-reader - EDN entry points
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Reading EDN text into [`Value`]s.

use edna_parser::{ParseOptions, Parser, Result, StackItem};

use crate::reducer::EdnReducer;
use crate::tag::TagReaders;
use crate::value::Value;

/// Read the first form of `source` with default options and tag readers.
///
/// Returns `None` when the source holds no form at all.
pub fn read_edn(source: &str) -> Result<Option<Value>> {
    read_edn_with(source, ParseOptions::default(), &TagReaders::default())
}

/// Read the first form of `source`.
pub fn read_edn_with(
    source: &str,
    options: ParseOptions,
    readers: &TagReaders,
) -> Result<Option<Value>> {
    EdnReader::new(source, options, readers).read()
}

/// Read every top-level form of `source` with default options and tag readers.
pub fn read_edn_all(source: &str) -> Result<Vec<Value>> {
    read_edn_all_with(source, ParseOptions::default(), &TagReaders::default())
}

/// Read every top-level form of `source`.
///
/// In lenient mode, tokens left unreduced at the top level come back as
/// [`Value::Unreduced`] in source order among the other values.
pub fn read_edn_all_with(
    source: &str,
    options: ParseOptions,
    readers: &TagReaders,
) -> Result<Vec<Value>> {
    let stack = Parser::new(source, EdnReducer::new(readers), options).parse()?;
    Ok(stack.into_iter().map(into_value).collect())
}

fn into_value(item: StackItem<Value>) -> Value {
    match item {
        StackItem::Node(value) => value,
        StackItem::Token(token) => Value::Unreduced(token),
    }
}

/// Reads successive top-level forms from one source.
///
/// ```
/// use edna_reader::{EdnReader, TagReaders, Value};
/// use edna_parser::ParseOptions;
///
/// let readers = TagReaders::default();
/// let mut reader = EdnReader::new("1 :two", ParseOptions::default(), &readers);
/// assert_eq!(reader.read().unwrap(), Some(Value::int(1)));
/// assert_eq!(reader.read().unwrap(), Some(Value::keyword("two")));
/// assert_eq!(reader.read().unwrap(), None);
/// ```
pub struct EdnReader<'a, 'r> {
    parser: Parser<'a, EdnReducer<'r>>,
}

impl<'a, 'r> EdnReader<'a, 'r> {
    pub fn new(source: &'a str, options: ParseOptions, readers: &'r TagReaders) -> Self {
        EdnReader {
            parser: Parser::new(source, EdnReducer::new(readers), options),
        }
    }

    /// Read the next form, or `None` at end of input.
    pub fn read(&mut self) -> Result<Option<Value>> {
        Ok(self.parser.parse_one()?.map(into_value))
    }

    /// Byte offset just past the last form read.
    pub fn cursor(&self) -> usize {
        self.parser.cursor()
    }
}

impl Iterator for EdnReader<'_, '_> {
    type Item = Result<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read().transpose()
    }
}
