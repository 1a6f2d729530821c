//! Schema module defines the type descriptors that drive transcoding.
//!
//! A resource type is described by a tree of [`SchemaNode`]s. Named
//! definitions live in a [`SchemaModel`], which also binds each
//! group/version/kind to its root definition.

mod elements;
mod model;

pub use elements::*;
pub use model::*;
