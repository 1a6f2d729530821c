//! Applying patch operations to a remote tree.

use super::op::{OpKind, PatchOp};
use super::PatchError;
use crate::value::Value;

/// Applies operations in order. Stops at the first failing one; operations
/// before it stay applied.
pub fn apply(doc: &mut Value, ops: &[PatchOp]) -> Result<(), PatchError> {
    for op in ops {
        apply_op(doc, op)?;
    }
    Ok(())
}

fn apply_op(doc: &mut Value, op: &PatchOp) -> Result<(), PatchError> {
    let (parent_path, key) = match op.pointer.split_last() {
        Some(split) => split,
        None => {
            *doc = match op.kind {
                OpKind::Remove => Value::Null,
                _ => required_value(op)?,
            };
            return Ok(());
        }
    };

    let parent = get_mut_at(doc, parent_path, op)?;
    match (op.kind, parent) {
        (OpKind::Add, Value::Map(map)) => {
            map.set(key, required_value(op)?);
        }
        (OpKind::Add, Value::List(list)) => {
            let value = required_value(op)?;
            if key == "-" {
                list.push(value);
            } else {
                let idx = parse_index(key, op)?;
                if idx > list.len() {
                    return Err(PatchError::InvalidIndex(op.pointer.to_string()));
                }
                list.insert(idx, value);
            }
        }
        (OpKind::Remove, Value::Map(map)) => {
            map.delete(key)
                .ok_or_else(|| PatchError::NotFound(op.pointer.to_string()))?;
        }
        (OpKind::Remove, Value::List(list)) => {
            let idx = parse_index(key, op)?;
            if idx >= list.len() {
                return Err(PatchError::NotFound(op.pointer.to_string()));
            }
            list.remove(idx);
        }
        (OpKind::Replace, Value::Map(map)) => {
            let value = required_value(op)?;
            let slot = map
                .get_mut(key)
                .ok_or_else(|| PatchError::NotFound(op.pointer.to_string()))?;
            *slot = value;
        }
        (OpKind::Replace, Value::List(list)) => {
            let value = required_value(op)?;
            let idx = parse_index(key, op)?;
            let slot = list
                .get_mut(idx)
                .ok_or_else(|| PatchError::NotFound(op.pointer.to_string()))?;
            *slot = value;
        }
        _ => return Err(PatchError::InvalidTarget(op.pointer.to_string())),
    }
    Ok(())
}

fn required_value(op: &PatchOp) -> Result<Value, PatchError> {
    op.value.clone().ok_or_else(|| PatchError::MissingValue {
        op: op.kind,
        path: op.pointer.to_string(),
    })
}

fn parse_index(segment: &str, op: &PatchOp) -> Result<usize, PatchError> {
    // RFC 6901 indexes are bare digits without leading zeros.
    let digits = !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit());
    if !digits || (segment.len() > 1 && segment.starts_with('0')) {
        return Err(PatchError::InvalidIndex(op.pointer.to_string()));
    }
    segment
        .parse()
        .map_err(|_| PatchError::InvalidIndex(op.pointer.to_string()))
}

fn get_mut_at<'v>(
    doc: &'v mut Value,
    segments: &[String],
    op: &PatchOp,
) -> Result<&'v mut Value, PatchError> {
    segments.iter().try_fold(doc, |current, segment| match current {
        Value::Map(map) => map
            .get_mut(segment)
            .ok_or_else(|| PatchError::NotFound(op.pointer.to_string())),
        Value::List(list) => {
            let idx = parse_index(segment, op)?;
            list.get_mut(idx)
                .ok_or_else(|| PatchError::NotFound(op.pointer.to_string()))
        }
        _ => Err(PatchError::InvalidTarget(op.pointer.to_string())),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fieldpath::Pointer;
    use crate::value::from_json;

    fn pointer(s: &str) -> Pointer {
        Pointer::parse(s).unwrap()
    }

    #[test]
    fn test_add_to_object() {
        let mut doc = from_json(r#"{"spec": {}}"#).unwrap();
        apply(&mut doc, &[PatchOp::add(pointer("/spec/replicas"), Value::Int(2))]).unwrap();
        assert_eq!(doc, from_json(r#"{"spec": {"replicas": 2}}"#).unwrap());
    }

    #[test]
    fn test_add_to_array() {
        let mut doc = from_json(r#"{"args": ["a", "c"]}"#).unwrap();
        apply(
            &mut doc,
            &[
                PatchOp::add(pointer("/args/1"), Value::from("b")),
                PatchOp::add(pointer("/args/-"), Value::from("d")),
            ],
        )
        .unwrap();
        assert_eq!(doc, from_json(r#"{"args": ["a", "b", "c", "d"]}"#).unwrap());
    }

    #[test]
    fn test_replace_only_touches_target() {
        let mut doc = from_json(r#"{"spec": {"replicas": 3, "paused": false}}"#).unwrap();
        apply(&mut doc, &[PatchOp::replace(pointer("/spec/replicas"), Value::Int(5))]).unwrap();
        assert_eq!(
            doc,
            from_json(r#"{"spec": {"replicas": 5, "paused": false}}"#).unwrap()
        );
    }

    #[test]
    fn test_remove() {
        let mut doc = from_json(r#"{"a": 1, "b": [1, 2]}"#).unwrap();
        apply(
            &mut doc,
            &[PatchOp::remove(pointer("/a")), PatchOp::remove(pointer("/b/0"))],
        )
        .unwrap();
        assert_eq!(doc, from_json(r#"{"b": [2]}"#).unwrap());
    }

    #[test]
    fn test_errors() {
        let mut doc = from_json(r#"{"a": 1}"#).unwrap();
        assert!(matches!(
            apply(&mut doc, &[PatchOp::replace(pointer("/b"), Value::Int(1))]),
            Err(PatchError::NotFound(_))
        ));
        assert!(matches!(
            apply(&mut doc, &[PatchOp::add(pointer("/a/b"), Value::Int(1))]),
            Err(PatchError::InvalidTarget(_))
        ));
        assert!(matches!(
            apply(&mut doc, &[PatchOp::add(pointer("/x/y"), Value::Int(1))]),
            Err(PatchError::NotFound(_))
        ));
    }

    #[test]
    fn test_array_index_must_be_plain_digits() {
        let original = from_json(r#"{"args": ["a", "b"]}"#).unwrap();
        for segment in ["+1", "01", " 1", "1e0", ""] {
            let mut doc = original.clone();
            let op = PatchOp::replace(Pointer::root().with("args").with(segment), Value::from("x"));
            assert!(
                matches!(apply(&mut doc, &[op]), Err(PatchError::InvalidIndex(_))),
                "index {:?} accepted",
                segment
            );
            assert_eq!(doc, original);
        }
    }

    #[test]
    fn test_replace_root() {
        let mut doc = from_json(r#"{"a": 1}"#).unwrap();
        apply(&mut doc, &[PatchOp::add(Pointer::root(), Value::Int(7))]).unwrap();
        assert_eq!(doc, Value::Int(7));
    }
}
