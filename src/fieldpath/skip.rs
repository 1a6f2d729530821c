//! Excluded local paths.

use std::collections::BTreeSet;

/// SkipPaths is the set of dotted local paths that never enter the local
/// model and never produce patch operations.
///
/// An entry matches the path itself and every path below it. Matching is on
/// whole segments: `status` excludes `status.phase` but not `status_code`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkipPaths {
    entries: BTreeSet<String>,
}

impl SkipPaths {
    pub fn new() -> Self {
        SkipPaths::default()
    }

    /// Adds an entry. A leading dot is ignored.
    pub fn insert(&mut self, path: impl AsRef<str>) {
        let path = path.as_ref().trim_start_matches('.');
        if !path.is_empty() {
            self.entries.insert(path.to_string());
        }
    }

    /// Returns true if the path equals an entry or lies below one.
    pub fn is_skipped(&self, path: &str) -> bool {
        let path = path.trim_start_matches('.');
        self.entries.iter().any(|entry| {
            path == entry
                || (path.len() > entry.len()
                    && path.starts_with(entry.as_str())
                    && path.as_bytes()[entry.len()] == b'.')
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }
}

impl<S: AsRef<str>> FromIterator<S> for SkipPaths {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        let mut skip = SkipPaths::new();
        for path in iter {
            skip.insert(path);
        }
        skip
    }
}
