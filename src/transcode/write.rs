//! Local attributes to remote tree and patch operations.

use super::errors::{Outcome, TranscodeError, TranscodeErrors};
use super::{resolve_node, unescape_interpolation};
use crate::fieldpath::{join_path, to_snake, Pointer, SkipPaths};
use crate::patch::PatchOp;
use crate::schema::{Format, Kind, Primitive, PrimitiveType, SchemaModel, SchemaNode};
use crate::value::{Map, Value};
use tracing::debug;

/// WriteTranscoder expands local block attributes into a remote tree.
///
/// Create mode builds the whole object; update mode diffs two attribute sets
/// and emits the patch operations that turn one remote tree into the other.
#[derive(Debug, Clone, Copy)]
pub struct WriteTranscoder<'a> {
    model: &'a SchemaModel,
    skip: &'a SkipPaths,
}

impl<'a> WriteTranscoder<'a> {
    pub fn new(model: &'a SchemaModel, skip: &'a SkipPaths) -> Self {
        WriteTranscoder { model, skip }
    }

    /// Expands local attributes into the remote object sent on create.
    ///
    /// `apiVersion` and `kind` are not added here; see
    /// [`GroupVersionKind::stamp`](crate::schema::GroupVersionKind::stamp).
    pub fn build_create_payload(&self, root: &SchemaNode, local: &Value) -> Outcome<Option<Value>> {
        let mut errors = TranscodeErrors::new();
        let value = self.expand(root, local, "", &mut errors);
        Outcome::new(value, errors)
    }

    /// Diffs the previous attributes against the current ones.
    ///
    /// Operations are ordered by declared field order (map keys in sorted
    /// order) and each one touches a subtree no other operation touches, so
    /// they apply cleanly in sequence. Errors found in `previous` are not
    /// reported; it was accepted when it was applied.
    pub fn diff_to_patch(
        &self,
        root: &SchemaNode,
        previous: &Value,
        current: &Value,
    ) -> Outcome<Vec<PatchOp>> {
        let mut errors = TranscodeErrors::new();
        let mut ignored = TranscodeErrors::new();

        let old = self.expand(root, previous, "", &mut ignored);
        let new = self.expand(root, current, "", &mut errors);

        let mut ops = Vec::new();
        self.diff(root, old.as_ref(), new.as_ref(), "", &Pointer::root(), &mut ops);
        debug!(count = ops.len(), "computed patch operations");
        Outcome::new(ops, errors)
    }

    fn expand(
        &self,
        node: &SchemaNode,
        value: &Value,
        path: &str,
        errors: &mut TranscodeErrors,
    ) -> Option<Value> {
        if value.is_null() {
            return None;
        }

        let node = match resolve_node(self.model, node, path) {
            Ok(node) => node,
            Err(e) => {
                errors.add(e);
                return None;
            }
        };

        match node {
            SchemaNode::Primitive(primitive) => Some(write_primitive(primitive, value)),
            SchemaNode::Map(sub_type) => self.expand_map(sub_type, value, path, errors),
            SchemaNode::Array(sub_type) => self.expand_array(sub_type, value, path, errors),
            SchemaNode::Kind(kind) => self.expand_kind(kind, value, path, errors),
            SchemaNode::Reference(_) => None,
        }
    }

    fn expand_map(
        &self,
        sub_type: &SchemaNode,
        value: &Value,
        path: &str,
        errors: &mut TranscodeErrors,
    ) -> Option<Value> {
        let entries = match value.as_map() {
            Some(entries) => entries,
            None => {
                errors.add(TranscodeError::type_mismatch(path, "map", value.type_name()));
                return None;
            }
        };

        let mut out = Map::new();
        for (key, item) in entries.iter() {
            let item_path = join_path(path, &to_snake(key));
            if self.skip.is_skipped(&item_path) {
                continue;
            }
            if let Some(result) = self.expand(sub_type, item, path, errors) {
                out.set(key.clone(), result);
            }
        }

        if out.is_empty() {
            None
        } else {
            Some(Value::Map(out))
        }
    }

    fn expand_array(
        &self,
        sub_type: &SchemaNode,
        value: &Value,
        path: &str,
        errors: &mut TranscodeErrors,
    ) -> Option<Value> {
        let items = match value.as_list() {
            Some(items) => items,
            None => {
                errors.add(TranscodeError::type_mismatch(path, "list", value.type_name()));
                return None;
            }
        };

        let out: Vec<Value> = items
            .iter()
            .filter_map(|item| self.expand(sub_type, item, path, errors))
            .collect();

        if out.is_empty() {
            None
        } else {
            Some(Value::List(out))
        }
    }

    fn expand_kind(
        &self,
        kind: &Kind,
        value: &Value,
        path: &str,
        errors: &mut TranscodeErrors,
    ) -> Option<Value> {
        // An unset block is an empty list.
        if matches!(value, Value::List(l) if l.is_empty()) {
            return None;
        }
        let object = match value.as_block() {
            Some(object) => object,
            None => {
                errors.add(TranscodeError::type_mismatch(path, "block", value.type_name()));
                return None;
            }
        };

        let mut out = Map::new();
        for field in kind.fields() {
            let local_name = to_snake(&field.name);
            let field_path = join_path(path, &local_name);
            if self.skip.is_skipped(&field_path) {
                continue;
            }

            match object.get(&local_name) {
                Some(item) if !item.is_null() => {
                    if let Some(result) = self.expand(&field.node, item, &field_path, errors) {
                        out.set(field.name.clone(), result);
                    }
                }
                _ if kind.is_required(&field.name) => {
                    errors.add(TranscodeError::absent_required_field(path, field.name.clone()));
                }
                _ => {}
            }
        }

        if out.is_empty() {
            None
        } else {
            Some(Value::Map(out))
        }
    }

    /// Emits operations turning `old` into `new`, both already expanded.
    fn diff(
        &self,
        node: &SchemaNode,
        old: Option<&Value>,
        new: Option<&Value>,
        path: &str,
        pointer: &Pointer,
        ops: &mut Vec<PatchOp>,
    ) {
        let (old, new) = match (old, new) {
            (None, None) => return,
            (None, Some(new)) => {
                ops.push(PatchOp::add(pointer.clone(), new.clone()));
                return;
            }
            (Some(_), None) => {
                ops.push(PatchOp::remove(pointer.clone()));
                return;
            }
            (Some(old), Some(new)) if old == new => return,
            (Some(old), Some(new)) => (old, new),
        };

        // Both sides went through expand, so every reference resolves here.
        let node = match resolve_node(self.model, node, path) {
            Ok(node) => node,
            Err(_) => return,
        };

        match (node, old, new) {
            (SchemaNode::Kind(kind), Value::Map(old), Value::Map(new)) => {
                for field in kind.fields() {
                    let field_path = join_path(path, &to_snake(&field.name));
                    self.diff(
                        &field.node,
                        old.get(&field.name),
                        new.get(&field.name),
                        &field_path,
                        &pointer.with(field.name.clone()),
                        ops,
                    );
                }
            }
            (SchemaNode::Map(sub_type), Value::Map(old), Value::Map(new)) => {
                let mut keys: Vec<&String> = old.fields.keys().chain(new.fields.keys()).collect();
                keys.sort();
                keys.dedup();
                for key in keys {
                    self.diff(
                        sub_type,
                        old.get(key),
                        new.get(key),
                        path,
                        &pointer.with(key.clone()),
                        ops,
                    );
                }
            }
            _ => ops.push(PatchOp::replace(pointer.clone(), new.clone())),
        }
    }
}

fn write_primitive(primitive: &Primitive, value: &Value) -> Value {
    match (primitive.format(), primitive.primitive_type, value) {
        // Only canonical decimals become numbers; "+5" or "007" would read
        // back as "5" and "7".
        (Format::IntOrString, _, Value::String(s)) => match s.parse::<i64>() {
            Ok(i) if i.to_string() == *s => Value::Int(i),
            _ => value.clone(),
        },
        (Format::IntOrString, _, _) => value.clone(),
        (_, PrimitiveType::String, Value::String(s)) => Value::String(unescape_interpolation(s)),
        _ => value.clone(),
    }
}
