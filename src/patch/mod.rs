//! Patch module - ordered structural edits of a remote tree.
//!
//! [`PatchOp`] sequences are produced by
//! [`WriteTranscoder::diff_to_patch`](crate::transcode::WriteTranscoder::diff_to_patch),
//! encoded with [`serialize`] and applied with [`apply`].

mod apply;
mod assemble;
mod op;

pub use apply::*;
pub use assemble::*;
pub use op::*;

use crate::fieldpath::PointerError;
use thiserror::Error;

/// PatchError represents a failure encoding, decoding or applying a patch.
#[derive(Debug, Error)]
pub enum PatchError {
    #[error("path not found: {0}")]
    NotFound(String),

    #[error("invalid array index in path: {0}")]
    InvalidIndex(String),

    #[error("path does not address a container: {0}")]
    InvalidTarget(String),

    #[error("{op} operation at {path:?} has no value")]
    MissingValue { op: OpKind, path: String },

    #[error(transparent)]
    InvalidPointer(#[from] PointerError),

    #[error("invalid patch payload: {0}")]
    Json(#[from] serde_json::Error),
}
