//! Transcode module - schema-driven conversion between remote manifests and
//! local block attributes.
//!
//! [`ReadTranscoder`] turns a remote tree into local attributes,
//! [`WriteTranscoder`] expands local attributes back into a remote tree and
//! diffs two attribute sets into patch operations. Both walk the same
//! [`SchemaNode`] tree and consult the same [`SkipPaths`].

mod errors;
mod read;
mod write;

#[cfg(test)]
mod testdata;



#[cfg(test)]
mod roundtrip_test;

pub use errors::*;
pub use read::*;
pub use write::*;

use crate::schema::{SchemaModel, SchemaNode};
use tracing::warn;

/// Opening sequence of an interpolation expression in local configuration.
const INTERPOLATION_OPEN: &str = "${";

/// Escaped form stored in local attributes.
const INTERPOLATION_ESCAPED: &str = "$\\{";

/// Escapes every interpolation opening so the value is read literally.
pub fn escape_interpolation(s: &str) -> String {
    s.replace(INTERPOLATION_OPEN, INTERPOLATION_ESCAPED)
}

/// Reverses [`escape_interpolation`].
pub fn unescape_interpolation(s: &str) -> String {
    s.replace(INTERPOLATION_ESCAPED, INTERPOLATION_OPEN)
}

/// Follows references until a structural node is reached.
///
/// Each reference is one hop. A chain longer than the number of definitions
/// can only be an alias cycle and is reported as unresolved.
pub(crate) fn resolve_node<'m>(
    model: &'m SchemaModel,
    node: &'m SchemaNode,
    path: &str,
) -> Result<&'m SchemaNode, TranscodeError> {
    let mut current = node;
    let mut hops = 0;
    while let SchemaNode::Reference(name) = current {
        if hops > model.definitions.len() {
            warn!(path, name = name.as_str(), "reference chain does not reach a type");
            return Err(TranscodeError::unresolved_reference(path, name.clone()));
        }
        current = match model.resolve_reference(name) {
            Some(next) => next,
            None => {
                warn!(path, name = name.as_str(), "reference to unknown definition");
                return Err(TranscodeError::unresolved_reference(path, name.clone()));
            }
        };
        hops += 1;
    }
    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpolation_escaping() {
        assert_eq!(escape_interpolation("${foo}"), "$\\{foo}");
        assert_eq!(escape_interpolation("a ${b} ${c}"), "a $\\{b} $\\{c}");
        assert_eq!(escape_interpolation("$foo {bar}"), "$foo {bar}");
        assert_eq!(unescape_interpolation("$\\{foo}"), "${foo}");
    }

    #[test]
    fn test_resolve_alias_cycle() {
        let mut model = SchemaModel::new();
        model
            .define("A", SchemaNode::reference("B"))
            .define("B", SchemaNode::reference("A"));
        let err = resolve_node(&model, &SchemaNode::reference("A"), "spec").unwrap_err();
        assert!(matches!(err, TranscodeError::UnresolvedReference { .. }));
    }

    #[test]
    fn test_resolve_chain() {
        let mut model = SchemaModel::new();
        model
            .define("Alias", SchemaNode::reference("Name"))
            .define("Name", SchemaNode::string());
        let alias = SchemaNode::reference("Alias");
        let node = resolve_node(&model, &alias, "").unwrap();
        assert!(matches!(node, SchemaNode::Primitive(_)));
    }
}
