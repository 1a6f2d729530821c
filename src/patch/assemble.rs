//! Wire encoding of patch operation sequences.
//!
//! The payload is a JSON array of `{"op", "path", "value"?}` records in
//! emission order, with RFC 6901 pointers as paths.

use super::op::{OpKind, PatchOp};
use super::PatchError;
use crate::fieldpath::Pointer;
use crate::value::Value;
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
struct RecordRef<'a> {
    op: OpKind,
    path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<&'a Value>,
}

#[derive(Deserialize)]
struct Record {
    op: OpKind,
    path: String,
    #[serde(default)]
    value: Option<Value>,
}

/// Serializes operations into a patch payload, preserving their order.
pub fn serialize(ops: &[PatchOp]) -> Result<Vec<u8>, PatchError> {
    let records: Vec<RecordRef<'_>> = ops
        .iter()
        .map(|op| RecordRef {
            op: op.kind,
            path: op.pointer.to_string(),
            value: op.value.as_ref(),
        })
        .collect();
    Ok(serde_json::to_vec(&records)?)
}

/// Reads a payload written by [`serialize`].
pub fn deserialize(bytes: &[u8]) -> Result<Vec<PatchOp>, PatchError> {
    let records: Vec<Record> = serde_json::from_slice(bytes)?;
    records
        .into_iter()
        .map(|record| {
            let pointer = Pointer::parse(&record.path)?;
            match (record.op, record.value) {
                (OpKind::Remove, _) => Ok(PatchOp::remove(pointer)),
                (OpKind::Add, Some(value)) => Ok(PatchOp::add(pointer, value)),
                (OpKind::Replace, Some(value)) => Ok(PatchOp::replace(pointer, value)),
                (kind, None) => Err(PatchError::MissingValue {
                    op: kind,
                    path: record.path,
                }),
            }
        })
        .collect()
}
