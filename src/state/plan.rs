//! Planned attribute changes and their clean-up before apply.

use std::collections::BTreeMap;

/// AttributeDiff is the planned change of one flattened attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeDiff {
    pub old: Option<String>,
    pub new: Option<String>,
    /// The new value is only known after apply.
    pub new_computed: bool,
}

/// Plan holds the attribute changes proposed for one resource.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Plan {
    /// True when the resource does not exist yet.
    pub create: bool,
    pub attributes: BTreeMap<String, AttributeDiff>,
}

impl AttributeDiff {
    pub fn new(old: Option<&str>, new: Option<&str>) -> Self {
        AttributeDiff {
            old: old.map(str::to_string),
            new: new.map(str::to_string),
            new_computed: false,
        }
    }

    pub fn computed(mut self) -> Self {
        self.new_computed = true;
        self
    }

    /// Computed, yet nothing would change.
    pub fn is_noop_computed(&self) -> bool {
        self.new_computed && self.old == self.new
    }
}

impl Plan {
    pub fn new(create: bool) -> Self {
        Plan {
            create,
            attributes: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, attribute: impl Into<String>, diff: AttributeDiff) {
        self.attributes.insert(attribute.into(), diff);
    }

    /// Drops the computed entries that would not change anything, unless the
    /// plan creates the resource. Returns how many entries were dropped.
    pub fn strip_noop_computed(&mut self) -> usize {
        if self.create {
            return 0;
        }
        let before = self.attributes.len();
        self.attributes.retain(|_, diff| !diff.is_noop_computed());
        before - self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(create: bool) -> Plan {
        let mut plan = Plan::new(create);
        plan.insert("metadata.0.uid", AttributeDiff::new(None, None).computed());
        plan.insert("spec.0.replicas", AttributeDiff::new(Some("3"), Some("5")));
        plan.insert(
            "metadata.0.resource_version",
            AttributeDiff::new(Some("10"), None).computed(),
        );
        plan
    }

    #[test]
    fn test_strip_on_update() {
        let mut plan = sample(false);
        assert_eq!(plan.strip_noop_computed(), 1);
        assert!(!plan.attributes.contains_key("metadata.0.uid"));
        assert!(plan.attributes.contains_key("spec.0.replicas"));
        assert!(plan.attributes.contains_key("metadata.0.resource_version"));
    }

    #[test]
    fn test_create_is_left_alone() {
        let mut plan = sample(true);
        assert_eq!(plan.strip_noop_computed(), 0);
        assert_eq!(plan.attributes.len(), 3);
    }
}
