//! Report generation for scored repositories
//!
//! Records are written as NDJSON: one JSON object per line, keys in a fixed order, so the
//! output can be streamed into other tools or compared between runs.

mod ndjson;

pub use ndjson::generate as generate_ndjson;
