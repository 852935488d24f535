// edna-parser - Scalar decoding
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Decoding of leaf token text into semantic values.
//!
//! The lexer only checks the shape of a literal; these functions turn the
//! exact source slice into a number, string, character or identifier.

use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_traits::{Num, ToPrimitive};

use crate::keyword::Keyword;
use crate::lexer::{Token, TokenKind};
use crate::symbol::Symbol;

/// A decoded numeric literal.
#[derive(Debug, Clone, PartialEq)]
pub enum Number {
    Int(i64),
    /// Integer literal too large for `i64`
    BigInt(BigInt),
    Float(f64),
    /// Literal with the `M` suffix
    Decimal(BigDecimal),
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(n) => write!(f, "{}", n),
            Number::BigInt(n) => write!(f, "{}", n),
            Number::Float(n) => {
                if n.is_nan() {
                    write!(f, "##NaN")
                } else if n.is_infinite() {
                    if *n > 0.0 {
                        write!(f, "##Inf")
                    } else {
                        write!(f, "##-Inf")
                    }
                } else if n.fract() == 0.0 {
                    write!(f, "{}.0", n)
                } else {
                    write!(f, "{}", n)
                }
            }
            Number::Decimal(d) => write!(f, "{}M", d),
        }
    }
}

/// The decoded value of a leaf token.
#[derive(Debug, Clone, PartialEq)]
pub enum Atom {
    Nil,
    Bool(bool),
    Number(Number),
    String(String),
    Char(char),
    Symbol(Symbol),
    Keyword(Keyword),
}

/// Decode a leaf token.
///
/// Returns `None` for tokens without a semantic value (whitespace, comments,
/// delimiters, lex errors) and for numbers that are well-formed but not
/// representable, such as `2r3` or `40r1`.
pub fn decode_token(token: &Token) -> Option<Atom> {
    match token.kind {
        TokenKind::Nil => Some(Atom::Nil),
        TokenKind::True => Some(Atom::Bool(true)),
        TokenKind::False => Some(Atom::Bool(false)),
        TokenKind::Number => decode_number(&token.text).map(Atom::Number),
        TokenKind::String => Some(Atom::String(decode_string(&token.text))),
        TokenKind::Character => decode_char(&token.text).map(Atom::Char),
        TokenKind::Symbol => Some(Atom::Symbol(Symbol::parse(&token.text))),
        TokenKind::Keyword => Some(Atom::Keyword(Keyword::parse(&token.text))),
        _ => None,
    }
}

/// Decode the text of a `number` token.
pub fn decode_number(text: &str) -> Option<Number> {
    if let Some(body) = text.strip_suffix('M') {
        if body.contains('r') {
            return None;
        }
        return BigDecimal::from_str(body).ok().map(Number::Decimal);
    }

    if let Some(r_pos) = text.find('r') {
        return decode_radix(&text[..r_pos], &text[r_pos + 1..]);
    }

    if text.contains(['.', 'e', 'E']) {
        return text.parse::<f64>().ok().map(Number::Float);
    }

    match text.parse::<i64>() {
        Ok(n) => Some(Number::Int(n)),
        Err(_) => BigInt::from_str(text).ok().map(Number::BigInt),
    }
}

/// `NrDDD`: the digits after `r` in base `N`, signed by either side.
fn decode_radix(radix: &str, digits: &str) -> Option<Number> {
    let (negative, radix) = strip_sign(radix);
    let (negative_digits, digits) = strip_sign(digits);

    let radix: u32 = radix.parse().ok()?;
    if !(2..=36).contains(&radix) {
        return None;
    }
    let mut value = BigInt::from_str_radix(digits, radix).ok()?;
    if negative != negative_digits {
        value = -value;
    }
    Some(narrow(value))
}

fn strip_sign(s: &str) -> (bool, &str) {
    if let Some(rest) = s.strip_prefix('-') {
        (true, rest)
    } else {
        (false, s.strip_prefix('+').unwrap_or(s))
    }
}

fn narrow(value: BigInt) -> Number {
    match value.to_i64() {
        Some(n) => Number::Int(n),
        None => Number::BigInt(value),
    }
}

/// Decode the text of a `string` token, surrounding quotes included.
///
/// `\uXXXX` and `\oNNN` become a single character each; surrogate halves are
/// not paired and decode to U+FFFD. Unknown escapes are kept verbatim.
pub fn decode_string(text: &str) -> String {
    let inner = text
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(text);

    let mut out = String::with_capacity(inner.len());
    let mut rest = inner;
    while let Some(i) = rest.find('\\') {
        out.push_str(&rest[..i]);
        let escape = &rest[i + 1..];
        match decode_escape(escape) {
            Some((c, used)) => {
                out.push(c);
                rest = &escape[used..];
            }
            None => {
                out.push('\\');
                rest = escape;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Decode one string escape (the text after the backslash).
/// Returns the character and the number of bytes consumed.
fn decode_escape(escape: &str) -> Option<(char, usize)> {
    let c = match escape.chars().next()? {
        't' => '\t',
        'b' => '\x08',
        'n' => '\n',
        'r' => '\r',
        'f' => '\x0C',
        '\'' => '\'',
        '"' => '"',
        '\\' => '\\',
        'u' => return code_point(escape.get(1..5)?, 16).map(|c| (c, 5)),
        'o' => return code_point(escape.get(1..4)?, 8).map(|c| (c, 4)),
        _ => return None,
    };
    Some((c, 1))
}

/// Decode the text of a `character` token, backslash included.
pub fn decode_char(text: &str) -> Option<char> {
    let body = text.strip_prefix('\\')?;
    match body {
        "newline" => return Some('\n'),
        "return" => return Some('\r'),
        "space" => return Some(' '),
        "tab" => return Some('\t'),
        _ => {}
    }
    if body.len() == 5
        && let Some(hex) = body.strip_prefix('u')
        && let Some(c) = code_point(hex, 16)
    {
        return Some(c);
    }
    if body.len() == 4
        && let Some(octal) = body.strip_prefix('o')
        && let Some(c) = code_point(octal, 8)
    {
        return Some(c);
    }
    body.chars().next()
}

fn code_point(digits: &str, radix: u32) -> Option<char> {
    if !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    let code = u32::from_str_radix(digits, radix).ok()?;
    Some(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER))
}

// ============================================================================
// Tests
// ============================================================================
