//! Value module - In-memory representation of YAML/JSON documents.
//!
//! Remote manifests and local block attributes are both held as [`Value`]
//! trees; only their shape conventions differ.

mod value;

pub use value::*;
