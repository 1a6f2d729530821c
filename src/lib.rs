//! # Kube Transcode
//!
//! Schema-driven conversion between Kubernetes resource manifests and the
//! flattened block attributes of a configuration-management engine.
//!
//! One recursive algorithm per direction, guided by a [`SchemaNode`] tree,
//! handles every resource shape: nested objects become one-element lists of
//! snake_cased maps on the way in and are expanded back on the way out, and
//! updates are expressed as ordered JSON patch operations.
//!
//! ## Modules
//!
//! - [`value`] - In-memory representation of YAML/JSON documents
//! - [`schema`] - Type descriptors and the model that names them
//! - [`fieldpath`] - Field name conversion, excluded paths and JSON pointers
//! - [`transcode`] - Read and write transcoders
//! - [`patch`] - Patch operations, their wire payload and application
//! - [`identity`] - Opaque resource identity tokens
//! - [`state`] - Attribute snapshots and plan clean-up kept by the caller
//! - [`config`] - Transcoder settings

pub mod config;
pub mod fieldpath;
pub mod identity;
pub mod patch;
pub mod schema;
pub mod state;
pub mod transcode;
pub mod value;

pub use config::TranscoderConfig;
pub use fieldpath::{Pointer, SkipPaths};
pub use identity::Identity;
pub use patch::{OpKind, PatchError, PatchOp};
pub use schema::{GroupVersionKind, SchemaModel, SchemaNode};
pub use transcode::{Outcome, ReadTranscoder, TranscodeError, TranscodeErrors, WriteTranscoder};
pub use value::Value;
