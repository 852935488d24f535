// edna-parser - Source regeneration
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Turns a syntax tree back into source text.
//!
//! A tree built with lexical preservation unparses to exactly the text it
//! was parsed from. Without preservation the same walk runs, but there is
//! no whitespace left to emit between forms.

use crate::ast::{Node, NodeKind, Payload};

/// Regenerate source text for a node and everything under it.
pub fn unparse(node: &Node) -> String {
    let mut out = String::new();
    unparse_into(node, &mut out);
    out
}

/// Append the source text of a node to `out`.
pub fn unparse_into(node: &Node, out: &mut String) {
    let mut pending = vec![Piece::Node(node)];
    while let Some(piece) = pending.pop() {
        let node = match piece {
            Piece::Node(node) => node,
            Piece::Close(close) => {
                out.push_str(close);
                continue;
            }
        };
        match &node.payload {
            Payload::Leaf { text, .. } => out.push_str(text),
            Payload::Unreduced(token) => out.push_str(&token.text),
            Payload::Tag { text, children, .. } => {
                out.push_str(text);
                pending.extend(children.iter().rev().map(Piece::Node));
            }
            Payload::Branch { children } => {
                let (open, close) = delimiters(node.kind);
                out.push_str(open);
                pending.push(Piece::Close(close));
                pending.extend(children.iter().rev().map(Piece::Node));
            }
        }
    }
}

/// Work left for the unparse walk, popped last-in first-out.
enum Piece<'n> {
    Node(&'n Node),
    Close(&'static str),
}

fn delimiters(kind: NodeKind) -> (&'static str, &'static str) {
    match kind {
        NodeKind::List => ("(", ")"),
        NodeKind::Vector => ("[", "]"),
        NodeKind::Set => ("#{", "}"),
        NodeKind::Map => ("{", "}"),
        NodeKind::Discard => ("#_", ""),
        _ => ("", ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::parse_source_with;
    use crate::parser::ParseOptions;

    fn round_trip(source: &str) -> String {
        let options = ParseOptions::default().with_lexical_preservation(true);
        unparse(&parse_source_with(source, options).unwrap())
    }

    #[test]
    fn test_round_trip_collections() {
        for source in [
            "(1 2 3)",
            "[a b  c]",
            "{:a 1, :b 2}",
            "#{x y}",
            "(defn f [x]\n  (+ x 1))\n",
            "",
            "   ",
        ] {
            assert_eq!(round_trip(source), source);
        }
    }

    #[test]
    fn test_round_trip_lexical_content() {
        for source in [
            "; leading comment\n(foo) ; trailing",
            "[1 #_ 2 3]",
            "#_ #_ a b c",
            "#inst  \"2020-01-01\"",
            "#my/tag #_x {:k v}",
            r#""str \"with\" escapes" \newline \a"#,
        ] {
            assert_eq!(round_trip(source), source);
        }
    }

    #[test]
    fn test_round_trip_lenient_lex_error() {
        let options = ParseOptions::lenient().with_lexical_preservation(true);
        let root = parse_source_with("(a 42x)", options).unwrap();
        assert_eq!(unparse(&root), "(a 42x)");
    }

    #[test]
    fn test_unparse_without_preservation() {
        let root = parse_source_with("( a  #_b )", ParseOptions::default()).unwrap();
        assert_eq!(unparse(&root), "(a)");

        let root = parse_source_with("[1 2]", ParseOptions::default()).unwrap();
        assert_eq!(unparse(&root), "[12]");
    }

    #[test]
    fn test_unparse_subtree() {
        let options = ParseOptions::default().with_lexical_preservation(true);
        let root = parse_source_with("x {:a [1 2]}", options).unwrap();
        let map = &root.children()[2];
        assert_eq!(unparse(map), "{:a [1 2]}");
        assert_eq!(unparse(&map.children()[2]), "[1 2]");
    }
}
