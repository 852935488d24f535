// edna-reader - EDN reducer
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Reducer that builds native [`Value`]s directly, skipping the syntax tree.

use edna_parser::{
    ParseError, ParseOptions, Reducer, Result, StackItem, Symbol, Token, TokenKind, decode_number,
    decode_token,
};
use im::OrdMap;
use tracing::trace;

use crate::tag::TagReaders;
use crate::value::Value;

/// Builds EDN values, dispatching `#tag` forms to a [`TagReaders`] registry.
#[derive(Debug, Clone, Copy)]
pub struct EdnReducer<'r> {
    readers: &'r TagReaders,
}

impl<'r> EdnReducer<'r> {
    pub fn new(readers: &'r TagReaders) -> Self {
        EdnReducer { readers }
    }

    fn read_tagged(&self, opener: &Token, mut forms: Vec<Value>) -> Result<Value> {
        let name = opener.text.trim_start_matches('#');
        let Some(reader) = self.readers.get(&Symbol::parse(name)) else {
            return Err(ParseError::UnknownTag {
                name: name.to_string(),
                position: opener.position,
            });
        };

        let form = if forms.is_empty() {
            Value::Nil
        } else {
            forms.swap_remove(0)
        };
        trace!(tag = name, "read tagged literal");
        reader(form).map_err(|message| ParseError::TagReader {
            tag: name.to_string(),
            message,
        })
    }
}

fn into_value(item: StackItem<Value>) -> Value {
    match item {
        StackItem::Node(value) => value,
        StackItem::Token(token) => Value::Unreduced(token),
    }
}

/// Pair up map children; a trailing key without a value maps to nil.
fn build_map(values: Vec<Value>) -> Value {
    let mut map = OrdMap::new();
    let mut values = values.into_iter();
    while let Some(key) = values.next() {
        map.insert(key, values.next().unwrap_or(Value::Nil));
    }
    Value::Map(map)
}

impl Reducer for EdnReducer<'_> {
    type Node = Value;

    fn reduce_leaf(
        &self,
        stack: &mut Vec<StackItem<Value>>,
        token: Token,
        _options: &ParseOptions,
    ) -> Result<()> {
        let value = match token.kind {
            TokenKind::Whitespace | TokenKind::Comment => return Ok(()),
            TokenKind::Number => match decode_number(&token.text) {
                Some(n) => Value::from(n),
                None => {
                    return Err(ParseError::InvalidNumber {
                        text: token.text,
                        position: token.position,
                    });
                }
            },
            _ => match decode_token(&token) {
                Some(atom) => Value::from(atom),
                None => Value::Unreduced(token),
            },
        };
        stack.push(StackItem::Node(value));
        Ok(())
    }

    fn reduce_branch(
        &self,
        stack: &mut Vec<StackItem<Value>>,
        opener: Token,
        children: Vec<StackItem<Value>>,
        _options: &ParseOptions,
    ) -> Result<()> {
        let values: Vec<Value> = children.into_iter().map(into_value).collect();
        let value = match opener.kind {
            TokenKind::Discard => return Ok(()),
            TokenKind::Root => {
                stack.extend(values.into_iter().map(StackItem::Node));
                return Ok(());
            }
            TokenKind::LParen => Value::list(values),
            TokenKind::LBracket => Value::vector(values),
            TokenKind::Set => Value::set(values),
            TokenKind::LBrace => build_map(values),
            TokenKind::Tag => self.read_tagged(&opener, values)?,
            _ => return Err(ParseError::unreduced(&opener)),
        };
        stack.push(StackItem::Node(value));
        Ok(())
    }
}
