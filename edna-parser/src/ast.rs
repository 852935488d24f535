// edna-parser - Syntax tree builder
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Abstract syntax tree for Clojure source, built by [`AstReducer`].
//!
//! Every node records the byte offset it starts at. With lexical
//! preservation on, whitespace, comments and `#_` forms stay in the tree as
//! nodes of their own, which is what lets [`crate::unparse`] reproduce the
//! source exactly.

use crate::decode::{Atom, decode_token};
use crate::error::Result;
use crate::lexer::{Token, TokenKind};
use crate::parser::{ParseOptions, Parser, Reducer, StackItem};
use crate::symbol::Symbol;

/// The kind of a syntax tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NodeKind {
    Root,
    List,
    Vector,
    Set,
    Map,
    Tag,
    Discard,
    Whitespace,
    Comment,
    Number,
    Symbol,
    Nil,
    True,
    False,
    String,
    Character,
    Keyword,
    /// A raw token a lenient parse could not reduce
    Unreduced,
}

impl NodeKind {
    fn of_leaf(kind: TokenKind) -> NodeKind {
        match kind {
            TokenKind::Whitespace => NodeKind::Whitespace,
            TokenKind::Comment => NodeKind::Comment,
            TokenKind::Number => NodeKind::Number,
            TokenKind::Symbol => NodeKind::Symbol,
            TokenKind::Nil => NodeKind::Nil,
            TokenKind::True => NodeKind::True,
            TokenKind::False => NodeKind::False,
            TokenKind::String => NodeKind::String,
            TokenKind::Character => NodeKind::Character,
            TokenKind::Keyword => NodeKind::Keyword,
            _ => NodeKind::Unreduced,
        }
    }

    fn of_opener(kind: TokenKind) -> NodeKind {
        match kind {
            TokenKind::Root => NodeKind::Root,
            TokenKind::LParen => NodeKind::List,
            TokenKind::LBracket => NodeKind::Vector,
            TokenKind::LBrace => NodeKind::Map,
            TokenKind::Set => NodeKind::Set,
            TokenKind::Tag => NodeKind::Tag,
            TokenKind::Discard => NodeKind::Discard,
            _ => NodeKind::Unreduced,
        }
    }

    /// Whitespace, comments and discarded forms: present only to keep the
    /// source text, never values.
    pub fn is_lexical(self) -> bool {
        matches!(
            self,
            NodeKind::Whitespace | NodeKind::Comment | NodeKind::Discard
        )
    }
}

/// What a node carries besides its kind and position.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Raw text and, for semantic kinds, the decoded value
    Leaf { text: String, value: Option<Atom> },
    Branch { children: Vec<Node> },
    /// `#name form`; `text` is the `#name` as written
    Tag {
        tag: Symbol,
        text: String,
        children: Vec<Node>,
    },
    Unreduced(Token),
}

/// A node of the syntax tree.
///
/// Dropping, unparsing and `has_unreduced` walk the tree without recursion.
/// The derived `Clone`, `PartialEq` and `Debug` still recurse per level.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub position: usize,
    pub payload: Payload,
}

impl Node {
    /// A leaf node for a leaf token, decoding its value.
    pub fn leaf(token: Token) -> Self {
        let value = decode_token(&token);
        Node {
            kind: NodeKind::of_leaf(token.kind),
            position: token.position,
            payload: Payload::Leaf {
                text: token.text,
                value,
            },
        }
    }

    pub fn branch(kind: NodeKind, position: usize, children: Vec<Node>) -> Self {
        Node {
            kind,
            position,
            payload: Payload::Branch { children },
        }
    }

    pub fn unreduced(token: Token) -> Self {
        Node {
            kind: NodeKind::Unreduced,
            position: token.position,
            payload: Payload::Unreduced(token),
        }
    }

    fn from_item(item: StackItem<Node>) -> Self {
        match item {
            StackItem::Node(node) => node,
            StackItem::Token(token) => Node::unreduced(token),
        }
    }

    /// Children in source order; empty for leaves.
    pub fn children(&self) -> &[Node] {
        match &self.payload {
            Payload::Branch { children } | Payload::Tag { children, .. } => children,
            Payload::Leaf { .. } | Payload::Unreduced(_) => &[],
        }
    }

    /// Children that are not whitespace, comments or discards.
    pub fn semantic_children(&self) -> impl Iterator<Item = &Node> {
        self.children().iter().filter(|child| !child.is_lexical())
    }

    /// Source text of a leaf, tag marker or unreduced token.
    pub fn text(&self) -> Option<&str> {
        match &self.payload {
            Payload::Leaf { text, .. } | Payload::Tag { text, .. } => Some(text),
            Payload::Unreduced(token) => Some(&token.text),
            Payload::Branch { .. } => None,
        }
    }

    /// Decoded value of a leaf.
    pub fn value(&self) -> Option<&Atom> {
        match &self.payload {
            Payload::Leaf { value, .. } => value.as_ref(),
            _ => None,
        }
    }

    /// Tag symbol of a `Tag` node, without the `#`.
    pub fn tag(&self) -> Option<&Symbol> {
        match &self.payload {
            Payload::Tag { tag, .. } => Some(tag),
            _ => None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.payload, Payload::Leaf { .. })
    }

    pub fn is_branch(&self) -> bool {
        matches!(self.payload, Payload::Branch { .. } | Payload::Tag { .. })
    }

    pub fn is_lexical(&self) -> bool {
        self.kind.is_lexical()
    }

    /// True when this node or any descendant is an unreduced raw token.
    pub fn has_unreduced(&self) -> bool {
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            if node.kind == NodeKind::Unreduced {
                return true;
            }
            pending.extend(node.children());
        }
        false
    }
}

fn take_children(payload: &mut Payload) -> Vec<Node> {
    match payload {
        Payload::Branch { children } | Payload::Tag { children, .. } => std::mem::take(children),
        Payload::Leaf { .. } | Payload::Unreduced(_) => Vec::new(),
    }
}

// Deeply nested trees must not recurse once per level on drop.
impl Drop for Node {
    fn drop(&mut self) {
        let mut pending = take_children(&mut self.payload);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut take_children(&mut node.payload));
        }
    }
}

/// Builds a [`Node`] tree.
#[derive(Debug, Clone, Copy, Default)]
pub struct AstReducer;

impl Reducer for AstReducer {
    type Node = Node;

    fn reduce_leaf(
        &self,
        stack: &mut Vec<StackItem<Node>>,
        token: Token,
        options: &ParseOptions,
    ) -> Result<()> {
        let lexical = matches!(token.kind, TokenKind::Whitespace | TokenKind::Comment);
        if options.lexical_preservation || !lexical {
            stack.push(StackItem::Node(Node::leaf(token)));
        }
        Ok(())
    }

    fn reduce_branch(
        &self,
        stack: &mut Vec<StackItem<Node>>,
        opener: Token,
        children: Vec<StackItem<Node>>,
        options: &ParseOptions,
    ) -> Result<()> {
        if opener.is(TokenKind::Discard) && !options.lexical_preservation {
            return Ok(());
        }

        let children: Vec<Node> = children.into_iter().map(Node::from_item).collect();
        let node = match opener.kind {
            TokenKind::Tag => Node {
                kind: NodeKind::Tag,
                position: opener.position,
                payload: Payload::Tag {
                    tag: Symbol::parse(opener.text.trim_start_matches('#')),
                    text: opener.text,
                    children,
                },
            },
            kind => Node::branch(NodeKind::of_opener(kind), opener.position, children),
        };
        stack.push(StackItem::Node(node));
        Ok(())
    }

    fn is_value(&self, item: &StackItem<Node>, _options: &ParseOptions) -> bool {
        match item {
            StackItem::Token(_) => false,
            StackItem::Node(node) => !node.is_lexical(),
        }
    }
}

/// Parse source text into a syntax tree with default options.
pub fn parse_source(source: &str) -> Result<Node> {
    parse_source_with(source, ParseOptions::default())
}

/// Parse source text into a syntax tree rooted at a `Root` node.
pub fn parse_source_with(source: &str, options: ParseOptions) -> Result<Node> {
    let stack = Parser::new(source, AstReducer, options).parse()?;
    Ok(stack
        .into_iter()
        .find_map(StackItem::into_node)
        .unwrap_or_else(|| Node::branch(NodeKind::Root, 0, Vec::new())))
}

// ============================================================================
// Tests
// ============================================================================
