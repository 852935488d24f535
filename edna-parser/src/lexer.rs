// edna-parser - Lexer for Clojure/EDN source
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Lexer (tokeniser) for Clojure and EDN source text.
//!
//! Lexing is a pure transition `(source, cursor) -> (token, cursor')`. It never
//! fails: malformed input becomes a [`TokenKind::LexError`] token that carries
//! the offending span, and the end of input is reported as [`TokenKind::Eof`]
//! on every call from then on.

use std::fmt;

/// The kind of a token produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TokenKind {
    Whitespace,
    Comment,

    // Delimiters
    LParen,   // (
    RParen,   // )
    LBracket, // [
    RBracket, // ]
    LBrace,   // {
    RBrace,   // }

    // Literals
    Number,
    Symbol,
    Nil,
    True,
    False,
    String,
    Character,
    Keyword,

    // Dispatch
    Set,     // #{
    Discard, // #_
    Tag,     // #name

    LexError,
    Eof,

    /// Never produced by the lexer. The parser synthesizes a root opener
    /// for the final reduction at end of input.
    Root,
}

impl TokenKind {
    /// Leaf kinds are handed to `reduce_leaf` as soon as they are read.
    pub fn is_leaf(self) -> bool {
        matches!(
            self,
            TokenKind::Whitespace
                | TokenKind::Comment
                | TokenKind::Number
                | TokenKind::Symbol
                | TokenKind::Nil
                | TokenKind::True
                | TokenKind::False
                | TokenKind::String
                | TokenKind::Character
                | TokenKind::Keyword
        )
    }

    /// Opening delimiters wait on the stack for their closer.
    pub fn is_opener(self) -> bool {
        matches!(
            self,
            TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace | TokenKind::Set
        )
    }

    /// Closing delimiters trigger a collection reduction.
    pub fn is_closer(self) -> bool {
        matches!(
            self,
            TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace
        )
    }

    /// Prefix markers apply to the next complete value.
    pub fn is_prefix(self) -> bool {
        matches!(self, TokenKind::Discard | TokenKind::Tag)
    }

    /// The opener kinds a closer of this kind may close.
    ///
    /// `}` closes both map and set literals.
    pub fn openers(self) -> &'static [TokenKind] {
        match self {
            TokenKind::RParen => &[TokenKind::LParen],
            TokenKind::RBracket => &[TokenKind::LBracket],
            TokenKind::RBrace => &[TokenKind::LBrace, TokenKind::Set],
            _ => &[],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Whitespace => "whitespace",
            TokenKind::Comment => "comment",
            TokenKind::LParen => "lparen",
            TokenKind::RParen => "rparen",
            TokenKind::LBracket => "lbracket",
            TokenKind::RBracket => "rbracket",
            TokenKind::LBrace => "lbrace",
            TokenKind::RBrace => "rbrace",
            TokenKind::Number => "number",
            TokenKind::Symbol => "symbol",
            TokenKind::Nil => "nil",
            TokenKind::True => "true",
            TokenKind::False => "false",
            TokenKind::String => "string",
            TokenKind::Character => "character",
            TokenKind::Keyword => "keyword",
            TokenKind::Set => "set",
            TokenKind::Discard => "discard",
            TokenKind::Tag => "tag",
            TokenKind::LexError => "lex-error",
            TokenKind::Eof => "eof",
            TokenKind::Root => "root",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Why a [`TokenKind::LexError`] token was produced.
///
/// Unterminated strings, a backslash at end of input and characters no rule
/// accepts carry no subkind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LexErrorKind {
    InvalidNumberFormat,
    InvalidKeyword,
    InvalidHashtagDispatcher,
}

impl LexErrorKind {
    pub fn name(self) -> &'static str {
        match self {
            LexErrorKind::InvalidNumberFormat => "invalid-number-format",
            LexErrorKind::InvalidKeyword => "invalid-keyword",
            LexErrorKind::InvalidHashtagDispatcher => "invalid-hashtag-dispatcher",
        }
    }
}

impl fmt::Display for LexErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A token produced by the lexer.
///
/// `text` is the exact source slice and `position` its byte offset.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub position: usize,
    pub error: Option<LexErrorKind>,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, position: usize) -> Self {
        Token {
            kind,
            text: text.into(),
            position,
            error: None,
        }
    }

    /// A `lex-error` token, optionally with a subkind.
    pub fn lex_error(text: impl Into<String>, position: usize, error: Option<LexErrorKind>) -> Self {
        Token {
            kind: TokenKind::LexError,
            text: text.into(),
            position,
            error,
        }
    }

    /// The synthetic opener used for the final reduction.
    pub fn root() -> Self {
        Token::new(TokenKind::Root, "", 0)
    }

    /// Byte offset just past the end of this token.
    pub fn end(&self) -> usize {
        self.position + self.text.len()
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.error {
            Some(error) => write!(f, "{} ({}) {:?} at {}", self.kind, error, self.text, self.position),
            None => write!(f, "{} {:?} at {}", self.kind, self.text, self.position),
        }
    }
}

/// Read the token starting at byte offset `cursor`.
///
/// Returns the token and the cursor just past it. At end of input the token
/// is `eof` and the cursor does not move. A cursor past the end is clamped,
/// and one inside a multi-byte character moves back to that character.
pub fn next_token(source: &str, cursor: usize) -> (Token, usize) {
    let cursor = snap_cursor(source, cursor);
    let rest = &source[cursor..];

    let Some((kind, len, error)) = scan(rest) else {
        return (Token::new(TokenKind::Eof, "", cursor), cursor);
    };

    let token = Token {
        kind,
        text: rest[..len].to_string(),
        position: cursor,
        error,
    };
    (token, cursor + len)
}

fn snap_cursor(source: &str, cursor: usize) -> usize {
    let mut cursor = cursor.min(source.len());
    while !source.is_char_boundary(cursor) {
        cursor -= 1;
    }
    cursor
}

/// A restartable pull lexer over one source string.
///
/// Iterating yields every token up to and including `eof`, then stops.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    source: &'a str,
    cursor: usize,
    finished: bool,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer at the start of `source`.
    pub fn new(source: &'a str) -> Self {
        Lexer::at(source, 0)
    }

    /// Create a lexer resuming from a previously saved cursor.
    ///
    /// The cursor is clamped to the source and snapped back to the start of
    /// the character it falls in.
    pub fn at(source: &'a str, cursor: usize) -> Self {
        Lexer {
            source,
            cursor: snap_cursor(source, cursor),
            finished: false,
        }
    }

    /// Get the next token, advancing the cursor past it.
    pub fn next_token(&mut self) -> Token {
        let (token, cursor) = next_token(self.source, self.cursor);
        self.cursor = cursor;
        token
    }

    /// Collect all remaining tokens, ending with `eof`.
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let eof = token.is(TokenKind::Eof);
            tokens.push(token);
            if eof {
                self.finished = true;
                return tokens;
            }
        }
    }

    /// Byte offset of the next unread character.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn source(&self) -> &'a str {
        self.source
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.finished {
            return None;
        }
        let token = self.next_token();
        self.finished = token.is(TokenKind::Eof);
        Some(token)
    }
}

// ============================================================================
// Scanning
// ============================================================================

type Lexeme = (TokenKind, usize, Option<LexErrorKind>);

/// Classify and measure the token at the start of `rest`.
fn scan(rest: &str) -> Option<Lexeme> {
    let mut chars = rest.chars();
    let c = chars.next()?;
    let next = chars.next();

    let lexeme = match c {
        _ if is_whitespace(c) => (TokenKind::Whitespace, take_while(rest, is_whitespace), None),

        '(' => (TokenKind::LParen, 1, None),
        ')' => (TokenKind::RParen, 1, None),
        '[' => (TokenKind::LBracket, 1, None),
        ']' => (TokenKind::RBracket, 1, None),
        '{' => (TokenKind::LBrace, 1, None),
        '}' => (TokenKind::RBrace, 1, None),

        _ if is_number_start(c, next) => scan_number(rest),
        _ if is_symbol_start(c) => scan_symbol(rest),

        '"' => scan_string(rest),
        '\\' => scan_char(rest),
        ':' => scan_keyword(rest),
        ';' => scan_comment(rest),
        '#' => scan_dispatch(rest, next),

        _ => (TokenKind::LexError, c.len_utf8(), None),
    };
    Some(lexeme)
}

fn scan_number(rest: &str) -> Lexeme {
    let bytes = rest.as_bytes();
    let mut i = 0;

    if matches!(bytes[0], b'+' | b'-') {
        i += 1;
    }
    i += take_digits(&rest[i..]);
    if bytes.get(i) == Some(&b'.') {
        i += 1;
        i += take_digits(&rest[i..]);
    }
    if matches!(bytes.get(i), Some(b'e' | b'E' | b'r')) {
        i += 1;
        if matches!(bytes.get(i), Some(b'+' | b'-')) {
            i += 1;
        }
        i += take_digits(&rest[i..]);
    }
    if bytes.get(i) == Some(&b'M') {
        i += 1;
    }

    // Greedy but rejecting: the first offending character is part of the error
    match rest[i..].chars().next() {
        Some(c) if c.is_alphabetic() || is_symbol_rest(c) => (
            TokenKind::LexError,
            i + c.len_utf8(),
            Some(LexErrorKind::InvalidNumberFormat),
        ),
        _ => (TokenKind::Number, i, None),
    }
}

fn scan_symbol(rest: &str) -> Lexeme {
    let len = take_while(rest, is_symbol_rest);
    let kind = match &rest[..len] {
        "nil" => TokenKind::Nil,
        "true" => TokenKind::True,
        "false" => TokenKind::False,
        _ => TokenKind::Symbol,
    };
    (kind, len, None)
}

fn scan_string(rest: &str) -> Lexeme {
    let mut chars = rest.char_indices().skip(1);
    while let Some((i, c)) = chars.next() {
        match c {
            '"' => return (TokenKind::String, i + 1, None),
            '\\' => {
                chars.next();
            }
            _ => {}
        }
    }
    (TokenKind::LexError, rest.len(), None)
}

fn scan_char(rest: &str) -> Lexeme {
    let body = &rest[1..];

    for name in ["newline", "return", "space", "tab"] {
        if body.starts_with(name) {
            return (TokenKind::Character, 1 + name.len(), None);
        }
    }
    if let Some(digits) = body.strip_prefix('u')
        && digits.len() >= 4
        && digits.bytes().take(4).all(|b| b.is_ascii_hexdigit())
    {
        return (TokenKind::Character, 6, None);
    }
    if let Some(digits) = body.strip_prefix('o')
        && digits.len() >= 3
        && digits.bytes().take(3).all(|b| matches!(b, b'0'..=b'7'))
    {
        return (TokenKind::Character, 5, None);
    }

    match body.chars().next() {
        Some(c) => (TokenKind::Character, 1 + c.len_utf8(), None),
        None => (TokenKind::LexError, 1, None),
    }
}

fn scan_keyword(rest: &str) -> Lexeme {
    let colons = take_while(rest, |c| c == ':');
    if colons > 2 {
        let len = colons + take_while(&rest[colons..], is_symbol_rest);
        return (TokenKind::LexError, len, Some(LexErrorKind::InvalidKeyword));
    }
    let len = colons + take_while(&rest[colons..], is_symbol_rest);
    (TokenKind::Keyword, len, None)
}

fn scan_comment(rest: &str) -> Lexeme {
    let len = match rest.find('\n') {
        Some(i) => i + 1,
        None => rest.len(),
    };
    (TokenKind::Comment, len, None)
}

fn scan_dispatch(rest: &str, next: Option<char>) -> Lexeme {
    match next {
        Some('{') => (TokenKind::Set, 2, None),
        Some('_') => (TokenKind::Discard, 2, None),
        Some(c) if c.is_alphabetic() => (TokenKind::Tag, 1 + take_while(&rest[1..], is_symbol_rest), None),
        _ => {
            let len = 1 + take_while(&rest[1..], |c| !is_whitespace(c));
            (TokenKind::LexError, len, Some(LexErrorKind::InvalidHashtagDispatcher))
        }
    }
}

// ============================================================================
// Character classes
// ============================================================================

/// Whitespace, with the comma counted as whitespace.
pub fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n' | ',')
}

/// Check if a character can start a symbol.
pub fn is_symbol_start(c: char) -> bool {
    c.is_alphabetic()
        || matches!(
            c,
            '.' | '*' | '+' | '!' | '-' | '_' | '?' | '$' | '%' | '&' | '=' | '<' | '>' | '/'
        )
}

/// Check if a character can appear after the first character of a symbol.
pub fn is_symbol_rest(c: char) -> bool {
    is_symbol_start(c) || c.is_ascii_digit() || c == ':' || c == '#'
}

/// A digit, or a sign or dot immediately followed by a digit.
fn is_number_start(c: char, next: Option<char>) -> bool {
    c.is_ascii_digit()
        || (matches!(c, '+' | '-' | '.') && next.is_some_and(|n| n.is_ascii_digit()))
}

/// Byte length of the longest prefix of `s` whose characters satisfy `pred`.
fn take_while(s: &str, pred: impl Fn(char) -> bool) -> usize {
    s.char_indices()
        .find(|&(_, c)| !pred(c))
        .map_or(s.len(), |(i, _)| i)
}

fn take_digits(s: &str) -> usize {
    s.bytes().take_while(u8::is_ascii_digit).count()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(s: &str) -> Vec<TokenKind> {
        Lexer::new(s).map(|t| t.kind).collect()
    }

    fn texts(s: &str) -> Vec<String> {
        Lexer::new(s).map(|t| t.text).collect()
    }

    fn single(s: &str) -> Token {
        Lexer::new(s).next_token()
    }

    #[test]
    fn test_list_of_numbers() {
        assert_eq!(
            kinds("(1 2 3)"),
            vec![
                TokenKind::LParen,
                TokenKind::Number,
                TokenKind::Whitespace,
                TokenKind::Number,
                TokenKind::Whitespace,
                TokenKind::Number,
                TokenKind::RParen,
                TokenKind::Eof,
            ]
        );
        assert_eq!(texts("(1 2 3)"), vec!["(", "1", " ", "2", " ", "3", ")", ""]);
    }

    #[test]
    fn test_delimiters() {
        assert_eq!(
            kinds("()[]{}"),
            vec![
                TokenKind::LParen,
                TokenKind::RParen,
                TokenKind::LBracket,
                TokenKind::RBracket,
                TokenKind::LBrace,
                TokenKind::RBrace,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_whitespace_run_includes_commas() {
        let token = single(" ,\t\r\n x");
        assert_eq!(token.kind, TokenKind::Whitespace);
        assert_eq!(token.text, " ,\t\r\n ");
    }

    #[test]
    fn test_eof_is_sticky() {
        let (token, cursor) = next_token("", 0);
        assert_eq!(token.kind, TokenKind::Eof);
        assert_eq!(cursor, 0);

        let (token, cursor) = next_token("a", 1);
        assert_eq!(token.kind, TokenKind::Eof);
        assert_eq!(token.position, 1);
        assert_eq!(cursor, 1);

        let mut lexer = Lexer::new("x");
        lexer.next_token();
        assert!(lexer.next_token().is(TokenKind::Eof));
        assert!(lexer.next_token().is(TokenKind::Eof));
        assert_eq!(lexer.cursor(), 1);
    }

    #[test]
    fn test_numbers() {
        for src in ["0", "42", "-1", "+5", ".5", "3.14", "1e10", "1.5e-3", "2r1010", "42M"] {
            let token = single(src);
            assert_eq!(token.kind, TokenKind::Number, "{src}");
            assert_eq!(token.text, src);
        }
    }

    #[test]
    fn test_full_number_shape() {
        let token = single("42.3e10M");
        assert_eq!(token.kind, TokenKind::Number);
        assert_eq!(token.text, "42.3e10M");
    }

    #[test]
    fn test_invalid_number_stops_after_first_letter() {
        let tokens = Lexer::new("42xyz").tokenize();
        assert_eq!(tokens[0].kind, TokenKind::LexError);
        assert_eq!(tokens[0].text, "42x");
        assert_eq!(tokens[0].error, Some(LexErrorKind::InvalidNumberFormat));
        assert_eq!(tokens[1].kind, TokenKind::Symbol);
        assert_eq!(tokens[1].text, "yz");
    }

    #[test]
    fn test_sign_without_digit_is_symbol() {
        assert_eq!(
            kinds("+ - -> .foo"),
            vec![
                TokenKind::Symbol,
                TokenKind::Whitespace,
                TokenKind::Symbol,
                TokenKind::Whitespace,
                TokenKind::Symbol,
                TokenKind::Whitespace,
                TokenKind::Symbol,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_symbols_and_reserved_words() {
        assert_eq!(
            kinds("nil true false nils clojure.core/map a:b#"),
            vec![
                TokenKind::Nil,
                TokenKind::Whitespace,
                TokenKind::True,
                TokenKind::Whitespace,
                TokenKind::False,
                TokenKind::Whitespace,
                TokenKind::Symbol,
                TokenKind::Whitespace,
                TokenKind::Symbol,
                TokenKind::Whitespace,
                TokenKind::Symbol,
                TokenKind::Eof,
            ]
        );
        assert_eq!(single("clojure.core/map").text, "clojure.core/map");
        assert_eq!(single("a:b#").text, "a:b#");
    }

    #[test]
    fn test_strings() {
        let token = single(r#""hello \"world\"" tail"#);
        assert_eq!(token.kind, TokenKind::String);
        assert_eq!(token.text, r#""hello \"world\"""#);
    }

    #[test]
    fn test_unterminated_string() {
        let token = single(r#""abc\""#);
        assert_eq!(token.kind, TokenKind::LexError);
        assert_eq!(token.text, r#""abc\""#);
        assert_eq!(token.error, None);
    }

    #[test]
    fn test_characters() {
        for (src, text) in [
            (r"\a", r"\a"),
            (r"\newline", r"\newline"),
            (r"\space)", r"\space"),
            (r"\tab", r"\tab"),
            (r"\return", r"\return"),
            (r"\o101", r"\o101"),
            (r"\u", r"\u"),
            (r"\(", r"\("),
            (r"\λ", r"\λ"),
        ] {
            let token = single(src);
            assert_eq!(token.kind, TokenKind::Character, "{src}");
            assert_eq!(token.text, text);
        }
    }

    #[test]
    fn test_backslash_at_end_of_input() {
        let token = single("\\");
        assert_eq!(token.kind, TokenKind::LexError);
        assert_eq!(token.error, None);
    }

    #[test]
    fn test_keywords() {
        for src in [":foo", ":user/foo", "::foo", ":a#b"] {
            let token = single(src);
            assert_eq!(token.kind, TokenKind::Keyword, "{src}");
            assert_eq!(token.text, src);
        }
    }

    #[test]
    fn test_triple_colon_keyword() {
        let token = single(":::foo bar");
        assert_eq!(token.kind, TokenKind::LexError);
        assert_eq!(token.text, ":::foo");
        assert_eq!(token.error, Some(LexErrorKind::InvalidKeyword));
    }

    #[test]
    fn test_comment_includes_newline() {
        let tokens = Lexer::new("; hi\n1").tokenize();
        assert_eq!(tokens[0].kind, TokenKind::Comment);
        assert_eq!(tokens[0].text, "; hi\n");
        assert_eq!(tokens[1].position, 5);

        assert_eq!(single(";; eof").text, ";; eof");
    }

    #[test]
    fn test_dispatch() {
        assert_eq!(single("#{1}").kind, TokenKind::Set);
        assert_eq!(single("#_1").kind, TokenKind::Discard);

        let tag = single("#inst \"2020\"");
        assert_eq!(tag.kind, TokenKind::Tag);
        assert_eq!(tag.text, "#inst");

        assert_eq!(single("#my.ns/thing{").text, "#my.ns/thing");
    }

    #[test]
    fn test_invalid_dispatch() {
        for (src, text) in [("#(foo) bar", "#(foo)"), ("#-x", "#-x"), ("#", "#"), ("#'a,b", "#'a")] {
            let token = single(src);
            assert_eq!(token.kind, TokenKind::LexError, "{src}");
            assert_eq!(token.error, Some(LexErrorKind::InvalidHashtagDispatcher));
            assert_eq!(token.text, text);
        }
    }

    #[test]
    fn test_unknown_character_consumes_one() {
        let tokens = Lexer::new("'a").tokenize();
        assert_eq!(tokens[0].kind, TokenKind::LexError);
        assert_eq!(tokens[0].text, "'");
        assert_eq!(tokens[0].error, None);
        assert_eq!(tokens[1].kind, TokenKind::Symbol);
    }

    #[test]
    fn test_restart_from_saved_cursor() {
        let source = "(a b)";
        let mut lexer = Lexer::new(source);
        lexer.next_token();
        lexer.next_token();
        let saved = lexer.cursor();
        let rest: Vec<String> = lexer.map(|t| t.text).collect();

        let resumed: Vec<String> = Lexer::at(source, saved).map(|t| t.text).collect();
        assert_eq!(rest, resumed);
        assert_eq!(resumed, vec![" ", "b", ")", ""]);
    }

    #[test]
    fn test_positions_are_byte_offsets() {
        let tokens = Lexer::new("λ \"é\" x").tokenize();
        let positions: Vec<usize> = tokens.iter().map(|t| t.position).collect();
        assert_eq!(positions, vec![0, 2, 3, 7, 8, 9]);
        assert_eq!(tokens[2].end(), 7);
    }

    #[test]
    fn test_cursor_inside_character_snaps_back() {
        let token = Lexer::at("λx", 1).next_token();
        assert_eq!(token.kind, TokenKind::Symbol);
        assert_eq!(token.text, "λx");
        assert_eq!(token.position, 0);

        let (token, cursor) = next_token("\"é\"", 2);
        assert_eq!((token.kind, token.position, cursor), (TokenKind::Symbol, 1, 3));
        assert_eq!(Lexer::at("é", 9).cursor(), 2);
    }
}
