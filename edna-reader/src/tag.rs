// edna-reader - Tagged literal readers
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Registry of readers for `#tag form` literals.
//!
//! The built-in `inst` and `uuid` readers are created once per process and
//! never change. A [`TagReaders`] value starts as a copy of them; callers
//! add or override entries on their own copy before a read.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use edna_parser::Symbol;
use tracing::debug;

use crate::value::Value;

/// Turns the form following a tag into a value, or explains why it cannot.
pub type TagReader = Arc<dyn Fn(Value) -> Result<Value, String> + Send + Sync>;

static BUILTIN_READERS: OnceLock<HashMap<Symbol, TagReader>> = OnceLock::new();

fn builtin_readers() -> &'static HashMap<Symbol, TagReader> {
    BUILTIN_READERS.get_or_init(|| {
        let mut readers: HashMap<Symbol, TagReader> = HashMap::new();
        readers.insert(Symbol::new("inst"), Arc::new(read_inst));
        readers.insert(Symbol::new("uuid"), Arc::new(read_uuid));
        readers
    })
}

/// Tag readers for one read, keyed by tag symbol (`inst`, `my.app/point`).
#[derive(Clone)]
pub struct TagReaders {
    readers: HashMap<Symbol, TagReader>,
}

impl Default for TagReaders {
    fn default() -> Self {
        TagReaders {
            readers: builtin_readers().clone(),
        }
    }
}

impl TagReaders {
    /// The built-in readers.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with no readers at all; every tag is unknown.
    pub fn empty() -> Self {
        TagReaders {
            readers: HashMap::new(),
        }
    }

    /// Add or replace the reader for `tag`.
    pub fn with<F>(mut self, tag: &str, reader: F) -> Self
    where
        F: Fn(Value) -> Result<Value, String> + Send + Sync + 'static,
    {
        self.insert(tag, Arc::new(reader));
        self
    }

    /// Add or replace the reader for `tag`, returning the one it displaced.
    pub fn insert(&mut self, tag: &str, reader: TagReader) -> Option<TagReader> {
        let tag = Symbol::parse(tag.strip_prefix('#').unwrap_or(tag));
        let previous = self.readers.insert(tag.clone(), reader);
        if previous.is_some() {
            debug!(%tag, "tag reader overridden");
        }
        previous
    }

    pub fn get(&self, tag: &Symbol) -> Option<&TagReader> {
        self.readers.get(tag)
    }

    pub fn contains(&self, tag: &Symbol) -> bool {
        self.readers.contains_key(tag)
    }

    pub fn len(&self) -> usize {
        self.readers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readers.is_empty()
    }

    /// Registered tags in sorted order.
    pub fn tags(&self) -> Vec<&Symbol> {
        let mut tags: Vec<&Symbol> = self.readers.keys().collect();
        tags.sort();
        tags
    }
}

impl<S: AsRef<str>> Extend<(S, TagReader)> for TagReaders {
    fn extend<I: IntoIterator<Item = (S, TagReader)>>(&mut self, iter: I) {
        for (tag, reader) in iter {
            self.insert(tag.as_ref(), reader);
        }
    }
}

impl fmt::Debug for TagReaders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.tags()).finish()
    }
}

// ============================================================================
// Built-in readers
// ============================================================================

/// `#inst "..."`: a timestamp string to [`Value::Inst`].
pub fn read_inst(form: Value) -> Result<Value, String> {
    let Value::String(text) = &form else {
        return Err(format!("expected a string, got {}", form.type_name()));
    };
    parse_timestamp(text)
        .map(Value::Inst)
        .ok_or_else(|| format!("invalid timestamp {:?}", text))
}

/// `#uuid "..."`: wraps the string as [`Value::Uuid`] without validating it.
pub fn read_uuid(form: Value) -> Result<Value, String> {
    match form {
        Value::String(text) => Ok(Value::Uuid(text)),
        other => Err(format!("expected a string, got {}", other.type_name())),
    }
}

/// Parse an ISO-8601 style timestamp.
///
/// Accepts RFC 3339 with an offset, then a date and time without an offset
/// (taken as UTC), then a bare date (UTC midnight).
pub fn parse_timestamp(text: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt);
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc().fixed_offset());
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()?
        .and_hms_opt(0, 0, 0)
        .map(|naive| naive.and_utc().fixed_offset())
}
