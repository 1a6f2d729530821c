//! State module - data the caller keeps between operations on a resource.

mod plan;
mod snapshot;

pub use plan::*;
pub use snapshot::*;
