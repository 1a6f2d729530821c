//! Identity module - the opaque token naming one managed resource instance.
//!
//! An identity is `namespace/kind/name`. Each component is escaped so that
//! the separator never appears inside it: `%` becomes `%25` and `/` becomes
//! `%2F`. The namespace is empty for cluster-scoped resources.

use crate::fieldpath::to_snake;
use crate::transcode::TranscodeError;
use std::fmt;
use std::str::FromStr;

const SEPARATOR: char = '/';

/// Identity holds the components recoverable from an identity token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identity {
    pub namespace: String,
    pub kind: String,
    pub name: String,
}

impl Identity {
    pub fn new(namespace: impl Into<String>, kind: impl Into<String>, name: impl Into<String>) -> Self {
        Identity {
            namespace: namespace.into(),
            kind: kind.into(),
            name: name.into(),
        }
    }

    pub fn encode(&self) -> String {
        encode(&self.namespace, &self.kind, &self.name)
    }

    pub fn decode(token: &str) -> Result<Self, TranscodeError> {
        decode(token)
    }

    pub fn is_namespaced(&self) -> bool {
        !self.namespace.is_empty()
    }
}

/// Encodes the three components into one token.
pub fn encode(namespace: &str, kind: &str, name: &str) -> String {
    let mut token = String::with_capacity(namespace.len() + kind.len() + name.len() + 2);
    escape_into(namespace, &mut token);
    token.push(SEPARATOR);
    escape_into(kind, &mut token);
    token.push(SEPARATOR);
    escape_into(name, &mut token);
    token
}

/// Decodes a token produced by [`encode`].
pub fn decode(token: &str) -> Result<Identity, TranscodeError> {
    let parts: Vec<&str> = token.split(SEPARATOR).collect();
    let (namespace, kind, name) = match parts.as_slice() {
        [namespace, kind, name] => (*namespace, *kind, *name),
        _ => {
            return Err(TranscodeError::malformed_identity(
                token,
                format!("expected 3 components, found {}", parts.len()),
            ))
        }
    };

    let identity = Identity {
        namespace: unescape(namespace).ok_or_else(|| bad_escape(token))?,
        kind: unescape(kind).ok_or_else(|| bad_escape(token))?,
        name: unescape(name).ok_or_else(|| bad_escape(token))?,
    };

    if identity.kind.is_empty() {
        return Err(TranscodeError::malformed_identity(token, "kind is empty"));
    }
    if identity.name.is_empty() {
        return Err(TranscodeError::malformed_identity(token, "name is empty"));
    }
    Ok(identity)
}

fn bad_escape(token: &str) -> TranscodeError {
    TranscodeError::malformed_identity(token, "invalid escape sequence")
}

fn escape_into(component: &str, out: &mut String) {
    for c in component.chars() {
        match c {
            '%' => out.push_str("%25"),
            SEPARATOR => out.push_str("%2F"),
            c => out.push(c),
        }
    }
}

fn unescape(component: &str) -> Option<String> {
    if !component.contains('%') {
        return Some(component.to_string());
    }
    let mut out = String::with_capacity(component.len());
    let mut rest = component;
    while let Some(pos) = rest.find('%') {
        out.push_str(&rest[..pos]);
        let code = rest.get(pos + 1..pos + 3)?;
        match code {
            "25" => out.push('%'),
            "2F" | "2f" => out.push(SEPARATOR),
            _ => return None,
        }
        rest = &rest[pos + 3..];
    }
    out.push_str(rest);
    Some(out)
}

/// Local resource type name for a group/version/kind, e.g.
/// `k8s_apps_v1_deployment` or `k8s_core_v1_config_map`.
pub fn resource_key(group: &str, version: &str, kind: &str) -> String {
    let group = if group.is_empty() {
        "core".to_string()
    } else {
        group.replace(|c: char| c == '.' || c == '-', "_")
    };
    format!("k8s_{}_{}_{}", group, version, to_snake(kind))
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for Identity {
    type Err = TranscodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode(s)
    }
}
