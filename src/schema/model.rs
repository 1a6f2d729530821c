//! Schema model: named definitions plus the resource types bound to them.

use super::elements::SchemaNode;
use crate::transcode::TranscodeError;
use crate::value::{Map, Value};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Error loading a schema model document.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid model JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid model YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("resource {gvk} is bound to unknown definition {definition}")]
    UnknownDefinition { gvk: String, definition: String },
}

/// SchemaModel owns every definition for a set of resource types.
///
/// It is built once and then only read, so it can be shared across threads
/// by reference.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaModel {
    #[serde(default)]
    pub definitions: BTreeMap<String, SchemaNode>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<ResourceBinding>,
}

/// Binds a resource type to the definition describing it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceBinding {
    #[serde(default)]
    pub group: String,
    pub version: String,
    pub kind: String,
    pub definition: String,
}

/// GroupVersionKind identifies a resource type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupVersionKind {
    #[serde(default)]
    pub group: String,
    pub version: String,
    pub kind: String,
}

impl SchemaModel {
    pub fn new() -> Self {
        SchemaModel::default()
    }

    /// Parses a model document from JSON and checks its bindings.
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        let model: SchemaModel = serde_json::from_str(json)?;
        model.check_bindings()?;
        Ok(model)
    }

    /// Parses a model document from YAML and checks its bindings.
    ///
    /// Node variants are written as single-key maps (`kind:`, `reference:`)
    /// rather than YAML tags.
    pub fn from_yaml(yaml: &str) -> Result<Self, ModelError> {
        let model: SchemaModel = serde_yaml::with::singleton_map_recursive::deserialize(
            serde_yaml::Deserializer::from_str(yaml),
        )?;
        model.check_bindings()?;
        Ok(model)
    }

    fn check_bindings(&self) -> Result<(), ModelError> {
        for binding in &self.resources {
            if !self.definitions.contains_key(&binding.definition) {
                return Err(ModelError::UnknownDefinition {
                    gvk: binding.gvk().to_string(),
                    definition: binding.definition.clone(),
                });
            }
        }
        Ok(())
    }

    /// Adds a named definition.
    pub fn define(&mut self, name: impl Into<String>, node: SchemaNode) -> &mut Self {
        self.definitions.insert(name.into(), node);
        self
    }

    /// Binds a resource type to a definition name.
    pub fn bind(&mut self, gvk: GroupVersionKind, definition: impl Into<String>) -> &mut Self {
        self.resources.push(ResourceBinding {
            group: gvk.group,
            version: gvk.version,
            kind: gvk.kind,
            definition: definition.into(),
        });
        self
    }

    /// Returns the root node of a resource type.
    pub fn resolve_schema(
        &self,
        group: &str,
        version: &str,
        kind: &str,
    ) -> Result<&SchemaNode, TranscodeError> {
        self.resources
            .iter()
            .find(|b| b.group == group && b.version == version && b.kind == kind)
            .and_then(|b| self.definitions.get(&b.definition))
            .ok_or_else(|| TranscodeError::SchemaNotFound {
                group: group.to_string(),
                version: version.to_string(),
                kind: kind.to_string(),
            })
    }

    /// Looks up a named definition. Only one hop is taken per call.
    pub fn resolve_reference(&self, name: &str) -> Option<&SchemaNode> {
        self.definitions.get(name)
    }

    /// Iterates the resource types known to this model.
    pub fn resource_types(&self) -> impl Iterator<Item = GroupVersionKind> + '_ {
        self.resources.iter().map(ResourceBinding::gvk)
    }
}

impl ResourceBinding {
    pub fn gvk(&self) -> GroupVersionKind {
        GroupVersionKind::new(&self.group, &self.version, &self.kind)
    }
}

impl GroupVersionKind {
    pub fn new(group: impl Into<String>, version: impl Into<String>, kind: impl Into<String>) -> Self {
        GroupVersionKind {
            group: group.into(),
            version: version.into(),
            kind: kind.into(),
        }
    }

    /// Splits an `apiVersion` value (`v1`, `apps/v1`) into group and version.
    pub fn parse_api_version(api_version: &str, kind: impl Into<String>) -> Self {
        match api_version.split_once('/') {
            Some((group, version)) => GroupVersionKind::new(group, version, kind),
            None => GroupVersionKind::new("", api_version, kind),
        }
    }

    /// Parses the `group/version/Kind` form, with `version/Kind` for the core group.
    pub fn parse(s: &str) -> Option<Self> {
        let parts: Vec<&str> = s.split('/').collect();
        match parts.as_slice() {
            [version, kind] if !version.is_empty() && !kind.is_empty() => {
                Some(GroupVersionKind::new("", *version, *kind))
            }
            [group, version, kind] if !version.is_empty() && !kind.is_empty() => {
                Some(GroupVersionKind::new(*group, *version, *kind))
            }
            _ => None,
        }
    }

    /// The `apiVersion` value for this type.
    pub fn api_version(&self) -> String {
        if self.group.is_empty() {
            self.version.clone()
        } else {
            format!("{}/{}", self.group, self.version)
        }
    }

    /// Attaches the `apiVersion` and `kind` markers to a create payload.
    pub fn stamp(&self, object: &mut Map) {
        object.set("apiVersion", Value::String(self.api_version()));
        object.set("kind", Value::String(self.kind.clone()));
    }
}

impl fmt::Display for GroupVersionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.group.is_empty() {
            write!(f, "{}/{}", self.version, self.kind)
        } else {
            write!(f, "{}/{}/{}", self.group, self.version, self.kind)
        }
    }
}
