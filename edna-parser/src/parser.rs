// edna-parser - Shift-reduce parser engine
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Generic stack-based shift-reduce parser.
//!
//! The engine decides *when* to reduce; a [`Reducer`] decides *what* a
//! reduction builds. Leaf tokens go straight to [`Reducer::reduce_leaf`],
//! closing delimiters pop back to their opener and hand the popped items to
//! [`Reducer::reduce_branch`], and everything else (openers, `#_`, `#tag`,
//! lex errors) is shifted onto the stack unreduced.
//!
//! After every token the engine looks for a prefix marker (`#_` or `#tag`)
//! sitting directly below the most recent complete value and reduces it with
//! that value as its child. The "next form" of a prefix can take many tokens
//! to complete, so the check runs after each one.

use tracing::{debug, trace};

use crate::error::{ParseError, Result};
use crate::lexer::{Lexer, Token, TokenKind};

/// An entry of the parse stack: a raw token or a reduced node.
#[derive(Debug, Clone, PartialEq)]
pub enum StackItem<N> {
    Token(Token),
    Node(N),
}

impl<N> StackItem<N> {
    pub fn is_token(&self) -> bool {
        matches!(self, StackItem::Token(_))
    }

    pub fn as_token(&self) -> Option<&Token> {
        match self {
            StackItem::Token(token) => Some(token),
            StackItem::Node(_) => None,
        }
    }

    pub fn as_node(&self) -> Option<&N> {
        match self {
            StackItem::Token(_) => None,
            StackItem::Node(node) => Some(node),
        }
    }

    pub fn into_node(self) -> Option<N> {
        match self {
            StackItem::Token(_) => None,
            StackItem::Node(node) => Some(node),
        }
    }
}

/// Options passed unchanged to every reducer call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Abort on the first structural or lexical error instead of returning
    /// a best-effort result with raw tokens left in it.
    pub fail_fast: bool,
    /// Keep whitespace, comments and discarded forms as nodes (AST only).
    pub lexical_preservation: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            fail_fast: true,
            lexical_preservation: false,
        }
    }
}

impl ParseOptions {
    /// Default options with fail-fast turned off.
    pub fn lenient() -> Self {
        ParseOptions::default().with_fail_fast(false)
    }

    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    pub fn with_lexical_preservation(mut self, lexical_preservation: bool) -> Self {
        self.lexical_preservation = lexical_preservation;
        self
    }
}

/// Decides what the parser builds.
///
/// Reducers receive the stack and push their result onto it. They must never
/// push a raw token back: anything they push is a reduced node.
pub trait Reducer {
    type Node;

    /// Handle a leaf token (whitespace, comment or a scalar literal).
    fn reduce_leaf(
        &self,
        stack: &mut Vec<StackItem<Self::Node>>,
        token: Token,
        options: &ParseOptions,
    ) -> Result<()>;

    /// Handle a completed collection, a prefix form or the final root.
    ///
    /// `children` are in source order and may contain raw tokens when
    /// `fail_fast` is off.
    fn reduce_branch(
        &self,
        stack: &mut Vec<StackItem<Self::Node>>,
        opener: Token,
        children: Vec<StackItem<Self::Node>>,
        options: &ParseOptions,
    ) -> Result<()>;

    /// Whether a stack item counts as a value a prefix marker can apply to.
    fn is_value(&self, item: &StackItem<Self::Node>, _options: &ParseOptions) -> bool {
        !item.is_token()
    }
}

/// The parser drives a [`Lexer`] and a [`Reducer`] over one source string.
pub struct Parser<'a, R: Reducer> {
    lexer: Lexer<'a>,
    reducer: R,
    options: ParseOptions,
    stack: Vec<StackItem<R::Node>>,
}

impl<'a, R: Reducer> Parser<'a, R> {
    /// Create a new parser for the given source code.
    pub fn new(source: &'a str, reducer: R, options: ParseOptions) -> Self {
        Parser {
            lexer: Lexer::new(source),
            reducer,
            options,
            stack: Vec::new(),
        }
    }

    /// Parse the whole source and perform the root reduction.
    ///
    /// Returns whatever the reducer left on the stack after reducing the
    /// synthetic root.
    pub fn parse(mut self) -> Result<Vec<StackItem<R::Node>>> {
        loop {
            let token = self.lexer.next_token();
            if token.is(TokenKind::Eof) {
                break;
            }
            self.step(token)?;
        }

        let children = std::mem::take(&mut self.stack);
        if let Some(token) = children.iter().find_map(StackItem::as_token) {
            if self.options.fail_fast {
                return Err(ParseError::unreduced(token));
            }
            debug!(%token, "end of input with unreduced tokens");
        }

        trace!(children = children.len(), "reduce root");
        let mut stack = Vec::new();
        self.reducer
            .reduce_branch(&mut stack, Token::root(), children, &self.options)?;
        Ok(stack)
    }

    /// Read the next complete top-level form.
    ///
    /// Stops as soon as no opener or prefix marker is left open on the
    /// stack, leaving the lexer just past the form. A raw token with nothing
    /// open beneath it, such as a lex error, is a form of its own: fail-fast
    /// parses report it and lenient ones return it. Returns `None` at end of
    /// input. When input ends in the middle of a form, a fail-fast parse
    /// reports it and a lenient one returns the stacked items one per call,
    /// in the same order `parse` would leave them.
    pub fn parse_one(&mut self) -> Result<Option<StackItem<R::Node>>> {
        loop {
            let token = self.lexer.next_token();
            if token.is(TokenKind::Eof) {
                return self.finish_one();
            }
            self.step(token)?;
            if let Some(form) = self.take_form()? {
                return Ok(Some(form));
            }
        }
    }

    /// Byte offset of the next unread character.
    pub fn cursor(&self) -> usize {
        self.lexer.cursor()
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    // ========================================================================
    // Shift and reduce
    // ========================================================================

    fn step(&mut self, token: Token) -> Result<()> {
        if token.kind.is_leaf() {
            trace!(%token, "reduce leaf");
            self.reducer
                .reduce_leaf(&mut self.stack, token, &self.options)?;
        } else if token.kind.is_closer() {
            self.reduce_collection(token)?;
        } else {
            trace!(%token, "shift");
            self.stack.push(StackItem::Token(token));
        }
        self.reduce_prefixes()
    }

    fn reduce_collection(&mut self, closer: Token) -> Result<()> {
        let openers = closer.kind.openers();
        let found = self
            .stack
            .iter()
            .enumerate()
            .rev()
            .find_map(|(i, item)| match item {
                StackItem::Token(t) if openers.contains(&t.kind) => Some((i, t.clone())),
                _ => None,
            });

        let Some((index, opener)) = found else {
            if self.options.fail_fast {
                return Err(ParseError::UnmatchedDelimiter {
                    kind: closer.kind,
                    position: closer.position,
                });
            }
            debug!(%closer, "dropping unmatched closer");
            return Ok(());
        };

        let children = self.stack.split_off(index + 1);
        if self.options.fail_fast
            && let Some(token) = children.iter().find_map(StackItem::as_token)
        {
            return Err(ParseError::unreduced(token));
        }
        self.stack.truncate(index);

        trace!(%opener, children = children.len(), "reduce collection");
        self.reducer
            .reduce_branch(&mut self.stack, opener, children, &self.options)
    }

    fn reduce_prefixes(&mut self) -> Result<()> {
        while let Some((index, marker)) = self.find_prefix() {
            let children = self.stack.split_off(index + 1);
            self.stack.truncate(index);

            trace!(%marker, children = children.len(), "reduce prefix");
            self.reducer
                .reduce_branch(&mut self.stack, marker, children, &self.options)?;
        }
        Ok(())
    }

    /// Find a prefix marker that applies to the topmost value.
    ///
    /// From the top, skip non-value nodes to the first value, then skip
    /// non-value nodes below it to a `#_` or `#tag` marker. Any other raw
    /// token, or a second value, means nothing applies yet.
    fn find_prefix(&self) -> Option<(usize, Token)> {
        let mut items = self.stack.iter().enumerate().rev();

        loop {
            let (_, item) = items.next()?;
            if item.is_token() {
                return None;
            }
            if self.reducer.is_value(item, &self.options) {
                break;
            }
        }

        for (i, item) in items {
            match item {
                StackItem::Token(t) if t.kind.is_prefix() => return Some((i, t.clone())),
                StackItem::Token(_) => return None,
                node if self.reducer.is_value(node, &self.options) => return None,
                _ => {}
            }
        }
        None
    }

    /// Whether an opener or prefix marker still waits for its form.
    fn has_open_form(&self) -> bool {
        self.stack
            .iter()
            .filter_map(StackItem::as_token)
            .any(|t| t.kind.is_opener() || t.kind.is_prefix())
    }

    /// Index of the first item that is a raw token or a value.
    fn first_form(&self) -> Option<usize> {
        self.stack
            .iter()
            .position(|item| item.is_token() || self.reducer.is_value(item, &self.options))
    }

    /// Pop the first form off the bottom of the stack, keeping what follows.
    fn take_first(&mut self, index: usize) -> StackItem<R::Node> {
        let form = self.stack.remove(index);
        self.stack.drain(..index);
        form
    }

    fn take_form(&mut self) -> Result<Option<StackItem<R::Node>>> {
        if self.has_open_form() {
            return Ok(None);
        }
        let Some(index) = self.first_form() else {
            return Ok(None);
        };
        if let Some(token) = self.stack[index].as_token() {
            if self.options.fail_fast {
                return Err(ParseError::unreduced(token));
            }
            debug!(%token, "unreduced token read as a form");
        }
        Ok(Some(self.take_first(index)))
    }

    fn finish_one(&mut self) -> Result<Option<StackItem<R::Node>>> {
        let first_token = self.stack.iter().find_map(StackItem::as_token);
        if let Some(token) = first_token {
            if self.options.fail_fast {
                let err = ParseError::unreduced(token);
                self.stack.clear();
                return Err(err);
            }
            debug!(%token, "end of input inside a form");
        }
        match self.first_form() {
            Some(index) => Ok(Some(self.take_first(index))),
            None => {
                self.stack.clear();
                Ok(None)
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Renders the reduction structure as a string. Discards drop their form.
    struct Sexp;

    impl Reducer for Sexp {
        type Node = String;

        fn reduce_leaf(
            &self,
            stack: &mut Vec<StackItem<String>>,
            token: Token,
            _options: &ParseOptions,
        ) -> Result<()> {
            if !matches!(token.kind, TokenKind::Whitespace | TokenKind::Comment) {
                stack.push(StackItem::Node(token.text));
            }
            Ok(())
        }

        fn reduce_branch(
            &self,
            stack: &mut Vec<StackItem<String>>,
            opener: Token,
            children: Vec<StackItem<String>>,
            _options: &ParseOptions,
        ) -> Result<()> {
            if opener.is(TokenKind::Discard) {
                return Ok(());
            }
            let parts: Vec<String> = children
                .into_iter()
                .map(|child| match child {
                    StackItem::Node(s) => s,
                    StackItem::Token(t) => format!("<{}>", t.kind),
                })
                .collect();
            let head = match opener.kind {
                TokenKind::Tag => opener.text,
                kind => kind.to_string(),
            };
            stack.push(StackItem::Node(format!("{}({})", head, parts.join(" "))));
            Ok(())
        }
    }

    fn parse_with(source: &str, options: ParseOptions) -> Result<String> {
        let stack = Parser::new(source, Sexp, options).parse()?;
        assert_eq!(stack.len(), 1);
        Ok(stack.into_iter().next().and_then(StackItem::into_node).unwrap())
    }

    fn parse(source: &str) -> String {
        parse_with(source, ParseOptions::default()).unwrap()
    }

    fn parse_lenient(source: &str) -> String {
        parse_with(source, ParseOptions::lenient()).unwrap()
    }

    #[test]
    fn test_collections() {
        assert_eq!(parse("(1 [2 3])"), "root(lparen(1 lbracket(2 3)))");
        assert_eq!(parse("#{1} {:a 1}"), "root(set(1) lbrace(:a 1))");
        assert_eq!(parse("{#{1}}"), "root(lbrace(set(1)))");
        assert_eq!(parse(""), "root()");
    }

    #[test]
    fn test_discard_inside_vector() {
        assert_eq!(parse("[1 #_2 3]"), "root(lbracket(1 3))");
    }

    #[test]
    fn test_stacked_discards() {
        assert_eq!(parse("#_ #_ 1 2 3"), "root(3)");
    }

    #[test]
    fn test_prefix_waits_for_complete_form() {
        assert_eq!(parse("#t (1 (2)) x"), "root(#t(lparen(1 lparen(2))) x)");
        assert_eq!(parse("#a #b 1"), "root(#a(#b(1)))");
        assert_eq!(parse("#_ #t 1 2"), "root(2)");
    }

    #[test]
    fn test_unmatched_closer() {
        assert_eq!(
            parse_with(")1", ParseOptions::default()),
            Err(ParseError::UnmatchedDelimiter {
                kind: TokenKind::RParen,
                position: 0
            })
        );
        assert_eq!(parse_lenient(")1"), "root(1)");
        assert_eq!(parse_lenient("(1 ])"), "root(lparen(1))");
    }

    #[test]
    fn test_unterminated_list() {
        assert_eq!(
            parse_with("(1 2", ParseOptions::default()),
            Err(ParseError::UnmatchedDelimiter {
                kind: TokenKind::LParen,
                position: 0
            })
        );
        assert_eq!(parse_lenient("(1 2"), "root(<lparen> 1 2)");
    }

    #[test]
    fn test_inner_opener_inside_closed_collection() {
        assert_eq!(
            parse_with("[(]", ParseOptions::default()),
            Err(ParseError::UnmatchedDelimiter {
                kind: TokenKind::LParen,
                position: 1
            })
        );
        assert_eq!(parse_lenient("[(]"), "root(lbracket(<lparen>))");
    }

    #[test]
    fn test_brace_closes_nearest_map_or_set() {
        assert_eq!(parse_lenient("{#{1}"), "root(<lbrace> set(1))");
        assert_eq!(parse_lenient("#{{1}"), "root(<set> lbrace(1))");
    }

    #[test]
    fn test_lex_error_reported_at_boundary() {
        assert!(matches!(
            parse_with("(42x)", ParseOptions::default()),
            Err(ParseError::LexError { position: 1, .. })
        ));
        assert_eq!(parse_lenient("(42x)"), "root(lparen(<lex-error>))");
    }

    #[test]
    fn test_parse_one_reads_successive_forms() {
        let mut parser = Parser::new("1 (2) #_x y", Sexp, ParseOptions::default());

        assert_eq!(parser.parse_one().unwrap(), Some(StackItem::Node("1".to_string())));
        assert_eq!(parser.cursor(), 1);
        assert_eq!(
            parser.parse_one().unwrap(),
            Some(StackItem::Node("lparen(2)".to_string()))
        );
        assert_eq!(parser.parse_one().unwrap(), Some(StackItem::Node("y".to_string())));
        assert_eq!(parser.parse_one().unwrap(), None);
    }

    #[test]
    fn test_parse_one_stops_before_trailing_garbage() {
        let mut parser = Parser::new("[1] )", Sexp, ParseOptions::default());
        assert_eq!(
            parser.parse_one().unwrap(),
            Some(StackItem::Node("lbracket(1)".to_string()))
        );
        assert!(parser.parse_one().is_err());
    }

    #[test]
    fn test_parse_one_unterminated() {
        let mut parser = Parser::new(" (1", Sexp, ParseOptions::default());
        assert_eq!(
            parser.parse_one(),
            Err(ParseError::UnmatchedDelimiter {
                kind: TokenKind::LParen,
                position: 1
            })
        );

        let mut parser = Parser::new(" (1", Sexp, ParseOptions::lenient());
        let item = parser.parse_one().unwrap().unwrap();
        assert_eq!(item.as_token().map(|t| t.kind), Some(TokenKind::LParen));
    }

    fn parse_each(source: &str, options: ParseOptions) -> Result<Vec<String>> {
        let mut parser = Parser::new(source, Sexp, options);
        let mut forms = Vec::new();
        while let Some(item) = parser.parse_one()? {
            forms.push(match item {
                StackItem::Node(s) => s,
                StackItem::Token(t) => format!("<{}>", t.kind),
            });
        }
        Ok(forms)
    }

    #[test]
    fn test_parse_one_top_level_lex_error() {
        assert_eq!(
            parse_each("42x 1 2", ParseOptions::lenient()).unwrap(),
            ["<lex-error>", "1", "2"]
        );
        assert!(matches!(
            parse_each("42x 1 2", ParseOptions::default()),
            Err(ParseError::LexError { position: 0, .. })
        ));

        let mut parser = Parser::new("42x 1", Sexp, ParseOptions::lenient());
        parser.parse_one().unwrap();
        assert_eq!(parser.cursor(), 3);
    }

    #[test]
    fn test_parse_one_agrees_with_parse_when_lenient() {
        for source in ["42x 1 (2", "#_ 42x 1", "1 ] #{2 42x} ::: 3", "{#{1}"] {
            let each = parse_each(source, ParseOptions::lenient()).unwrap();
            assert_eq!(
                format!("root({})", each.join(" ")),
                parse_lenient(source),
                "{}",
                source
            );
        }
    }
}
