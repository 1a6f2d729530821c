//! Remote tree to local attributes.

use super::errors::{Outcome, TranscodeError, TranscodeErrors};
use super::{escape_interpolation, resolve_node};
use crate::fieldpath::{join_path, to_snake, SkipPaths};
use crate::schema::{Format, Kind, Primitive, PrimitiveType, SchemaModel, SchemaNode};
use crate::value::{Map, Value};
use tracing::{debug, warn};

/// ReadTranscoder converts a remote tree into local block attributes.
///
/// Objects become one-element lists holding a map whose keys are
/// snake_cased; free-form map keys are kept as they are. Subtrees that end up
/// empty are dropped, so an object with nothing left in it disappears from
/// its parent.
#[derive(Debug, Clone, Copy)]
pub struct ReadTranscoder<'a> {
    model: &'a SchemaModel,
    skip: &'a SkipPaths,
}

impl<'a> ReadTranscoder<'a> {
    pub fn new(model: &'a SchemaModel, skip: &'a SkipPaths) -> Self {
        ReadTranscoder { model, skip }
    }

    /// Transcodes a remote value described by `root`.
    pub fn transcode(&self, root: &SchemaNode, remote: &Value) -> Outcome<Option<Value>> {
        let mut errors = TranscodeErrors::new();
        let value = self.visit(root, remote, "", &mut errors);
        Outcome::new(value, errors)
    }

    fn visit(
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
            SchemaNode::Primitive(primitive) => Some(read_primitive(primitive, value, path)),
            SchemaNode::Map(sub_type) => self.visit_map(sub_type, value, path, errors),
            SchemaNode::Array(sub_type) => self.visit_array(sub_type, value, path, errors),
            SchemaNode::Kind(kind) => self.visit_kind(kind, value, path, errors),
            SchemaNode::Reference(_) => None,
        }
    }

    fn visit_map(
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
                debug!(path = item_path.as_str(), "skipping excluded path");
                continue;
            }
            // Values share the map's own path; the key only decides exclusion.
            if let Some(result) = self.visit(sub_type, item, path, errors) {
                out.set(key.clone(), result);
            }
        }

        if out.is_empty() {
            None
        } else {
            Some(Value::Map(out))
        }
    }

    fn visit_array(
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

        // Elements of an object list are stored as bare maps, not blocks.
        let unwrap_blocks = matches!(
            resolve_node(self.model, sub_type, path),
            Ok(SchemaNode::Kind(_))
        );

        let mut out = Vec::with_capacity(items.len());
        for item in items {
            if let Some(result) = self.visit(sub_type, item, path, errors) {
                match result {
                    Value::List(mut block) if unwrap_blocks && block.len() == 1 => {
                        out.push(block.swap_remove(0));
                    }
                    other => out.push(other),
                }
            }
        }

        if out.is_empty() {
            None
        } else {
            Some(Value::List(out))
        }
    }

    fn visit_kind(
        &self,
        kind: &Kind,
        value: &Value,
        path: &str,
        errors: &mut TranscodeErrors,
    ) -> Option<Value> {
        let object = match value.as_map() {
            Some(object) => object,
            None => {
                errors.add(TranscodeError::type_mismatch(path, "map", value.type_name()));
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

            match object.get(&field.name) {
                Some(item) if !item.is_null() => {
                    if let Some(result) = self.visit(&field.node, item, &field_path, errors) {
                        if out.set(local_name, result).is_some() {
                            warn!(
                                path = field_path.as_str(),
                                field = field.name.as_str(),
                                "field names collide after case conversion; keeping the last one"
                            );
                        }
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
            Some(Value::block(out))
        }
    }
}

/// Renders a number the way an int-or-string field stores it locally.
pub(crate) fn canonical_number(value: &Value) -> Option<String> {
    match value {
        Value::Int(i) => Some(i.to_string()),
        Value::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => Some(format!("{}", *f as i64)),
        Value::Float(f) => Some(f.to_string()),
        _ => None,
    }
}

fn read_primitive(primitive: &Primitive, value: &Value, path: &str) -> Value {
    match primitive.format() {
        Format::IntOrString => {
            return match canonical_number(value) {
                Some(s) => Value::String(s),
                None => value.clone(),
            };
        }
        Format::Unsupported(format) => {
            warn!(path, discriminator = format, "unsupported primitive format; passing value through");
        }
        Format::None | Format::Passthrough => {}
    }

    match (primitive.primitive_type, value) {
        (PrimitiveType::String, Value::String(s)) => Value::String(escape_interpolation(s)),
        _ => value.clone(),
    }
}
