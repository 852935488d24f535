// edna-reader - Value types for EDN data
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Native value type produced by the EDN reader.
//!
//! `Value` has total equality, ordering and hashing so any value can be a
//! map key or set member. Its `Display` prints EDN text.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use bigdecimal::BigDecimal;
use chrono::{DateTime, FixedOffset, SecondsFormat};
use edna_parser::{Atom, Keyword, Number, Symbol, Token};
use im::{OrdMap, OrdSet, Vector};
use num_bigint::BigInt;
use num_traits::ToPrimitive;

/// An EDN value.
#[derive(Clone)]
pub enum Value {
    Nil,
    Bool(bool),
    /// 64-bit signed integer
    Int(i64),
    /// Integer outside the `i64` range
    BigInt(BigInt),
    Float(f64),
    /// Exact decimal, written with an `M` suffix
    Decimal(BigDecimal),
    Char(char),
    String(Rc<str>),
    Symbol(Symbol),
    Keyword(Keyword),
    List(Vector<Value>),
    Vector(Vector<Value>),
    Set(OrdSet<Value>),
    Map(OrdMap<Value, Value>),
    /// `#inst` timestamp
    Inst(DateTime<FixedOffset>),
    /// `#uuid` string, not validated
    Uuid(Rc<str>),
    /// Raw token left over by a lenient read
    Unreduced(Token),
}

impl Value {
    pub fn nil() -> Self {
        Value::Nil
    }

    pub fn bool(b: bool) -> Self {
        Value::Bool(b)
    }

    pub fn int(n: i64) -> Self {
        Value::Int(n)
    }

    pub fn float(n: f64) -> Self {
        Value::Float(n)
    }

    pub fn char(c: char) -> Self {
        Value::Char(c)
    }

    pub fn string(s: impl Into<Rc<str>>) -> Self {
        Value::String(s.into())
    }

    pub fn symbol(name: &str) -> Self {
        Value::Symbol(Symbol::parse(name))
    }

    pub fn keyword(name: &str) -> Self {
        Value::Keyword(Keyword::parse(name))
    }

    pub fn list(elements: Vec<Value>) -> Self {
        Value::List(elements.into_iter().collect())
    }

    pub fn vector(elements: Vec<Value>) -> Self {
        Value::Vector(elements.into_iter().collect())
    }

    /// Build a map from pairs; a later pair replaces an earlier equal key.
    pub fn map(pairs: Vec<(Value, Value)>) -> Self {
        Value::Map(pairs.into_iter().collect())
    }

    pub fn set(elements: Vec<Value>) -> Self {
        Value::Set(elements.into_iter().collect())
    }

    pub fn uuid(s: impl Into<Rc<str>>) -> Self {
        Value::Uuid(s.into())
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// True when this value or anything inside it is a raw leftover token.
    pub fn has_unreduced(&self) -> bool {
        match self {
            Value::Unreduced(_) => true,
            Value::List(items) | Value::Vector(items) => items.iter().any(Value::has_unreduced),
            Value::Set(items) => items.iter().any(Value::has_unreduced),
            Value::Map(map) => map
                .iter()
                .any(|(k, v)| k.has_unreduced() || v.has_unreduced()),
            _ => false,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Look up a key in a map value.
    pub fn get(&self, key: &Value) -> Option<&Value> {
        match self {
            Value::Map(map) => map.get(key),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::BigInt(_) => "bigint",
            Value::Float(_) => "float",
            Value::Decimal(_) => "decimal",
            Value::Char(_) => "char",
            Value::String(_) => "string",
            Value::Symbol(_) => "symbol",
            Value::Keyword(_) => "keyword",
            Value::List(_) => "list",
            Value::Vector(_) => "vector",
            Value::Set(_) => "set",
            Value::Map(_) => "map",
            Value::Inst(_) => "inst",
            Value::Uuid(_) => "uuid",
            Value::Unreduced(_) => "unreduced",
        }
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        match n {
            Number::Int(n) => Value::Int(n),
            Number::BigInt(n) => Value::BigInt(n),
            Number::Float(n) => Value::Float(n),
            Number::Decimal(d) => Value::Decimal(d),
        }
    }
}

impl From<Atom> for Value {
    fn from(atom: Atom) -> Self {
        match atom {
            Atom::Nil => Value::Nil,
            Atom::Bool(b) => Value::Bool(b),
            Atom::Number(n) => n.into(),
            Atom::String(s) => Value::String(s.into()),
            Atom::Char(c) => Value::Char(c),
            Atom::Symbol(sym) => Value::Symbol(sym),
            Atom::Keyword(kw) => Value::Keyword(kw),
        }
    }
}

// ============================================================================
// Display implementation
// ============================================================================

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::BigInt(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", Number::Float(*n)),
            Value::Decimal(d) => write!(f, "{}M", d),
            Value::Char(c) => write!(f, "\\{}", format_char(*c)),
            Value::String(s) => write!(f, "\"{}\"", escape_string(s)),
            Value::Symbol(sym) => write!(f, "{}", sym),
            Value::Keyword(kw) => write!(f, "{}", kw),
            Value::List(items) => write_seq(f, "(", items.iter(), ")"),
            Value::Vector(items) => write_seq(f, "[", items.iter(), "]"),
            Value::Set(items) => write_seq(f, "#{", items.iter(), "}"),
            Value::Map(map) => {
                write!(f, "{{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{} {}", k, v)?;
                }
                write!(f, "}}")
            }
            Value::Inst(dt) => write!(
                f,
                "#inst \"{}\"",
                dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)
            ),
            Value::Uuid(s) => write!(f, "#uuid \"{}\"", escape_string(s)),
            Value::Unreduced(token) => write!(f, "{}", token.text),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

fn write_seq<'v>(
    f: &mut fmt::Formatter<'_>,
    open: &str,
    items: impl Iterator<Item = &'v Value>,
    close: &str,
) -> fmt::Result {
    write!(f, "{}", open)?;
    for (i, item) in items.enumerate() {
        if i > 0 {
            write!(f, " ")?;
        }
        write!(f, "{}", item)?;
    }
    write!(f, "{}", close)
}

fn format_char(c: char) -> String {
    match c {
        '\n' => "newline".to_string(),
        ' ' => "space".to_string(),
        '\t' => "tab".to_string(),
        '\r' => "return".to_string(),
        '\x08' => "backspace".to_string(),
        '\x0C' => "formfeed".to_string(),
        _ => c.to_string(),
    }
}

fn escape_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\n' => result.push_str("\\n"),
            '\t' => result.push_str("\\t"),
            '\r' => result.push_str("\\r"),
            '\x08' => result.push_str("\\b"),
            '\x0C' => result.push_str("\\f"),
            '\\' => result.push_str("\\\\"),
            '"' => result.push_str("\\\""),
            _ => result.push(c),
        }
    }
    result
}

// ============================================================================
// Equality and ordering (for use as map keys and set elements)
// ============================================================================

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::BigInt(a), Value::BigInt(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Decimal(a), Value::Decimal(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::Keyword(a), Value::Keyword(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Vector(a), Value::Vector(b)) => a == b,
            (Value::Set(a), Value::Set(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Inst(a), Value::Inst(b)) => a == b,
            (Value::Uuid(a), Value::Uuid(b)) => a == b,
            (Value::Unreduced(a), Value::Unreduced(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        // Numbers share a rank so they sort by magnitude across kinds
        fn type_order(v: &Value) -> u8 {
            match v {
                Value::Nil => 0,
                Value::Bool(_) => 1,
                Value::Int(_) | Value::BigInt(_) | Value::Float(_) | Value::Decimal(_) => 2,
                Value::Char(_) => 3,
                Value::String(_) => 4,
                Value::Symbol(_) => 5,
                Value::Keyword(_) => 6,
                Value::List(_) => 7,
                Value::Vector(_) => 8,
                Value::Map(_) => 9,
                Value::Set(_) => 10,
                Value::Inst(_) => 11,
                Value::Uuid(_) => 12,
                Value::Unreduced(_) => 13,
            }
        }

        let ta = type_order(self);
        let tb = type_order(other);
        if ta != tb {
            return ta.cmp(&tb);
        }

        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Char(a), Value::Char(b)) => a.cmp(b),
            (Value::String(a), Value::String(b)) => a.cmp(b),
            (Value::Symbol(a), Value::Symbol(b)) => a.cmp(b),
            (Value::Keyword(a), Value::Keyword(b)) => a.cmp(b),
            (Value::List(a), Value::List(b)) => a.cmp(b),
            (Value::Vector(a), Value::Vector(b)) => a.cmp(b),
            (Value::Map(a), Value::Map(b)) => a.iter().cmp(b.iter()),
            (Value::Set(a), Value::Set(b)) => a.iter().cmp(b.iter()),
            (Value::Inst(a), Value::Inst(b)) => a.cmp(b),
            (Value::Uuid(a), Value::Uuid(b)) => a.cmp(b),
            (Value::Unreduced(a), Value::Unreduced(b)) => a.cmp(b),
            (a, b) if ta == 2 => cmp_numbers(a, b),
            _ => Ordering::Equal,
        }
    }
}

fn number_rank(v: &Value) -> u8 {
    match v {
        Value::Int(_) => 0,
        Value::BigInt(_) => 1,
        Value::Float(_) => 2,
        _ => 3,
    }
}

fn number_as_f64(v: &Value) -> f64 {
    match v {
        Value::Int(n) => *n as f64,
        Value::BigInt(n) => n.to_f64().unwrap_or(f64::NAN),
        Value::Float(n) => *n,
        Value::Decimal(d) => d.to_f64().unwrap_or(f64::NAN),
        _ => f64::NAN,
    }
}

/// Same-kind numbers compare exactly. Mixed kinds compare by magnitude,
/// then by kind, so distinct kinds are never `Equal`.
fn cmp_numbers(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => x.cmp(y),
        (Value::BigInt(x), Value::BigInt(y)) => x.cmp(y),
        (Value::Float(x), Value::Float(y)) => x.total_cmp(y),
        (Value::Decimal(x), Value::Decimal(y)) => x.cmp(y),
        (Value::Int(x), Value::BigInt(y)) => BigInt::from(*x).cmp(y).then(Ordering::Less),
        (Value::BigInt(x), Value::Int(y)) => x.cmp(&BigInt::from(*y)).then(Ordering::Greater),
        _ => number_as_f64(a)
            .total_cmp(&number_as_f64(b))
            .then_with(|| number_rank(a).cmp(&number_rank(b))),
    }
}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Nil => {}
            Value::Bool(b) => b.hash(state),
            Value::Int(n) => n.hash(state),
            Value::BigInt(n) => n.hash(state),
            Value::Float(n) => n.to_bits().hash(state),
            Value::Decimal(d) => d.hash(state),
            Value::Char(c) => c.hash(state),
            Value::String(s) => s.hash(state),
            Value::Symbol(sym) => sym.hash(state),
            Value::Keyword(kw) => kw.hash(state),
            Value::List(items) | Value::Vector(items) => items.hash(state),
            Value::Set(set) => {
                for item in set.iter() {
                    item.hash(state);
                }
            }
            Value::Map(map) => {
                for (k, v) in map.iter() {
                    k.hash(state);
                    v.hash(state);
                }
            }
            Value::Inst(dt) => dt.hash(state),
            Value::Uuid(s) => s.hash(state),
            Value::Unreduced(token) => token.hash(state),
        }
    }
}
