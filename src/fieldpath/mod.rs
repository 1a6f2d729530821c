//! Field path module - names and paths used while walking a resource tree.
//!
//! Local attribute paths are dotted and snake_cased (`spec.template.metadata`),
//! remote locations are JSON pointers (`/spec/template/metadata`).

mod naming;
mod pointer;
mod skip;

pub use naming::*;
pub use pointer::*;
pub use skip::*;
