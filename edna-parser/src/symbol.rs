// edna-parser - Symbol type with interning
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Symbols are identifiers that may be optionally namespaced.
//!
//! Symbols are interned (see [`crate::intern`]): two symbols with the same
//! namespace and name share storage, so equality and hashing are pointer
//! operations.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::intern::{Name, intern, split_qualified};

/// A symbol with optional namespace.
#[derive(Clone)]
pub struct Symbol {
    inner: Arc<Name>,
}

impl Symbol {
    /// Create a new symbol with no namespace.
    pub fn new(name: &str) -> Self {
        Symbol {
            inner: intern(None, name),
        }
    }

    /// Create a new symbol with a namespace.
    pub fn with_namespace(namespace: &str, name: &str) -> Self {
        Symbol {
            inner: intern(Some(namespace), name),
        }
    }

    /// Parse a symbol from source text like `foo` or `ns/foo`.
    pub fn parse(s: &str) -> Self {
        let (namespace, name) = split_qualified(s);
        Symbol {
            inner: intern(namespace, name),
        }
    }

    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        self.inner.namespace.as_deref()
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.inner.name
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.namespace() {
            Some(ns) => write!(f, "{}/{}", ns, self.name()),
            None => f.write_str(self.name()),
        }
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self)
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Symbol {}

impl PartialOrd for Symbol {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Symbol {
    fn cmp(&self, other: &Self) -> Ordering {
        // Non-namespaced before namespaced, then by namespace, then by name
        self.namespace()
            .cmp(&other.namespace())
            .then_with(|| self.name().cmp(other.name()))
    }
}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Arc::as_ptr(&self.inner).hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_symbol() {
        let sym = Symbol::parse("foo");
        assert_eq!(sym.name(), "foo");
        assert!(sym.namespace().is_none());
        assert_eq!(sym.to_string(), "foo");
    }

    #[test]
    fn test_namespaced_symbol() {
        let sym = Symbol::parse("clojure.core/map");
        assert_eq!(sym.namespace(), Some("clojure.core"));
        assert_eq!(sym.name(), "map");
        assert_eq!(sym, Symbol::with_namespace("clojure.core", "map"));
        assert_eq!(sym.to_string(), "clojure.core/map");
    }

    #[test]
    fn test_slash_symbol() {
        let sym = Symbol::parse("/");
        assert_eq!(sym.name(), "/");
        assert!(sym.namespace().is_none());
    }

    #[test]
    fn test_ordering() {
        let a = Symbol::new("a");
        let b = Symbol::new("b");
        let ns_a = Symbol::with_namespace("ns", "a");

        assert!(a < b);
        assert!(b < ns_a);
    }
}
