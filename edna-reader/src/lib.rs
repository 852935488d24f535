// edna-reader - EDN value reader
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! # edna-reader
//!
//! Reads EDN text straight into native [`Value`]s using the `edna-parser`
//! engine, with `#tag` literals decoded by a [`TagReaders`] registry.

pub mod reader;
pub mod reducer;
pub mod tag;
pub mod value;

pub use im::{OrdMap, OrdSet, Vector};
pub use reader::{EdnReader, read_edn, read_edn_all, read_edn_all_with, read_edn_with};
pub use reducer::EdnReducer;
pub use tag::{TagReader, TagReaders, parse_timestamp, read_inst, read_uuid};
pub use value::Value;
