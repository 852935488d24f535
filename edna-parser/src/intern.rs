// edna-parser - Name interning shared by symbols and keywords
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Global interner for optionally namespaced names.
//!
//! Symbols and keywords are both backed by an interned [`Name`], so equal
//! names share one allocation and compare by pointer. Interned names are
//! never freed; the set of distinct identifiers in parsed source is bounded
//! in practice. The table is guarded by a `Mutex`; comparing and hashing
//! interned names never touches it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};

#[derive(Debug)]
pub(crate) struct Name {
    pub(crate) namespace: Option<Box<str>>,
    pub(crate) name: Box<str>,
}

type Key = (Option<Box<str>>, Box<str>);

static NAMES: OnceLock<Mutex<HashMap<Key, Arc<Name>>>> = OnceLock::new();

/// Intern a `(namespace, name)` pair.
pub(crate) fn intern(namespace: Option<&str>, name: &str) -> Arc<Name> {
    let key: Key = (namespace.map(Box::from), Box::from(name));
    let mut names = NAMES
        .get_or_init(|| Mutex::new(HashMap::new()))
        .lock()
        .expect("name interner mutex poisoned: another thread panicked while holding the lock");

    if let Some(existing) = names.get(&key) {
        return Arc::clone(existing);
    }
    let interned = Arc::new(Name {
        namespace: key.0.clone(),
        name: key.1.clone(),
    });
    names.insert(key, Arc::clone(&interned));
    interned
}

/// Split `ns/name` on the first slash. A lone `/` is a name.
pub(crate) fn split_qualified(s: &str) -> (Option<&str>, &str) {
    match s.find('/') {
        Some(i) if s != "/" => (Some(&s[..i]), &s[i + 1..]),
        _ => (None, s),
    }
}
