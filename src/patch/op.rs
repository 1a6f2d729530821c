//! Patch operation types.

use crate::fieldpath::Pointer;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The structural edit an operation performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpKind {
    Add,
    Remove,
    Replace,
}

/// PatchOp is one edit of a remote tree.
#[derive(Debug, Clone, PartialEq)]
pub struct PatchOp {
    pub kind: OpKind,
    pub pointer: Pointer,
    /// Present for `add` and `replace`, absent for `remove`.
    pub value: Option<Value>,
}

impl PatchOp {
    pub fn add(pointer: Pointer, value: Value) -> Self {
        PatchOp {
            kind: OpKind::Add,
            pointer,
            value: Some(value),
        }
    }

    pub fn remove(pointer: Pointer) -> Self {
        PatchOp {
            kind: OpKind::Remove,
            pointer,
            value: None,
        }
    }

    pub fn replace(pointer: Pointer, value: Value) -> Self {
        PatchOp {
            kind: OpKind::Replace,
            pointer,
            value: Some(value),
        }
    }
}

impl OpKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OpKind::Add => "add",
            OpKind::Remove => "remove",
            OpKind::Replace => "replace",
        }
    }
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for PatchOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.pointer)?;
        if let Some(value) = &self.value {
            match serde_json::to_string(value) {
                Ok(json) => write!(f, " {}", json)?,
                Err(_) => write!(f, " {:?}", value)?,
            }
        }
        Ok(())
    }
}
