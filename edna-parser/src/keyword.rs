// edna-parser - Keyword type with interning
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Keywords are self-evaluating identifiers that may be optionally
//! namespaced. They share the name interner with symbols.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::intern::{Name, intern, split_qualified};

/// A keyword with optional namespace.
///
/// The stored name never includes the leading colon. An auto-resolved
/// keyword (`::foo`) keeps its second colon in the name, so it prints back
/// unchanged.
#[derive(Clone)]
pub struct Keyword {
    inner: Arc<Name>,
}

impl Keyword {
    pub fn new(name: &str) -> Self {
        Keyword {
            inner: intern(None, name),
        }
    }

    pub fn with_namespace(namespace: &str, name: &str) -> Self {
        Keyword {
            inner: intern(Some(namespace), name),
        }
    }

    /// Parse a keyword from source text, with or without its leading colon.
    pub fn parse(s: &str) -> Self {
        let body = s.strip_prefix(':').unwrap_or(s);
        let (namespace, name) = split_qualified(body);
        Keyword {
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

    /// True for `::name` keywords, which a Clojure reader resolves against
    /// the current namespace.
    pub fn is_auto_resolved(&self) -> bool {
        self.namespace()
            .unwrap_or(self.name())
            .starts_with(':')
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.namespace() {
            Some(ns) => write!(f, ":{}/{}", ns, self.name()),
            None => write!(f, ":{}", self.name()),
        }
    }
}

impl fmt::Debug for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Keyword({})", self)
    }
}

impl PartialEq for Keyword {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Keyword {}

impl PartialOrd for Keyword {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Keyword {
    fn cmp(&self, other: &Self) -> Ordering {
        self.namespace()
            .cmp(&other.namespace())
            .then_with(|| self.name().cmp(other.name()))
    }
}

impl Hash for Keyword {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Arc::as_ptr(&self.inner).hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_strips_one_colon() {
        let kw = Keyword::parse(":foo");
        assert_eq!(kw.name(), "foo");
        assert_eq!(kw, Keyword::new("foo"));
        assert_eq!(kw.to_string(), ":foo");
    }

    #[test]
    fn test_namespaced_keyword() {
        let kw = Keyword::parse(":user/foo");
        assert_eq!(kw.namespace(), Some("user"));
        assert_eq!(kw.name(), "foo");
        assert_eq!(kw.to_string(), ":user/foo");
    }

    #[test]
    fn test_auto_resolved_keyword() {
        let kw = Keyword::parse("::foo");
        assert!(kw.is_auto_resolved());
        assert_eq!(kw.to_string(), "::foo");
        assert!(!Keyword::parse(":foo").is_auto_resolved());

        let qualified = Keyword::parse("::alias/foo");
        assert!(qualified.is_auto_resolved());
        assert_eq!(qualified.to_string(), "::alias/foo");
    }

    #[test]
    fn test_equality() {
        assert_eq!(Keyword::new("a"), Keyword::parse(":a"));
        assert_ne!(Keyword::new("a"), Keyword::new("b"));
    }
}
