//! Transcoding errors and outcomes.

use std::fmt;
use thiserror::Error;

/// TranscodeError represents one failure while transcoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranscodeError {
    #[error("no schema found for {group}/{version}/{kind}")]
    SchemaNotFound {
        group: String,
        version: String,
        kind: String,
    },

    #[error("malformed identity {identity:?}: {reason}")]
    MalformedIdentity { identity: String, reason: String },

    #[error("{path}: missing required field: {field}")]
    AbsentRequiredField { path: String, field: String },

    #[error("{path}: no definition found matching: {name}")]
    UnresolvedReference { path: String, name: String },

    #[error("{path}: type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        path: String,
        expected: String,
        actual: String,
    },
}

fn display_path(path: &str) -> String {
    if path.is_empty() {
        "<root>".to_string()
    } else {
        path.to_string()
    }
}

impl TranscodeError {
    /// Creates a malformed identity error.
    pub fn malformed_identity(identity: impl Into<String>, reason: impl Into<String>) -> Self {
        TranscodeError::MalformedIdentity {
            identity: identity.into(),
            reason: reason.into(),
        }
    }

    /// Creates a missing required field error.
    pub fn absent_required_field(path: &str, field: impl Into<String>) -> Self {
        TranscodeError::AbsentRequiredField {
            path: display_path(path),
            field: field.into(),
        }
    }

    /// Creates an unresolved reference error.
    pub fn unresolved_reference(path: &str, name: impl Into<String>) -> Self {
        TranscodeError::UnresolvedReference {
            path: display_path(path),
            name: name.into(),
        }
    }

    /// Creates a type mismatch error.
    pub fn type_mismatch(path: &str, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        TranscodeError::TypeMismatch {
            path: display_path(path),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Returns true for errors that abort a whole operation rather than one field.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            TranscodeError::SchemaNotFound { .. } | TranscodeError::MalformedIdentity { .. }
        )
    }
}

/// TranscodeErrors is a collection of per-field errors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranscodeErrors {
    errors: Vec<TranscodeError>,
}

impl TranscodeErrors {
    pub fn new() -> Self {
        TranscodeErrors { errors: Vec::new() }
    }

    pub fn from_error(error: TranscodeError) -> Self {
        TranscodeErrors {
            errors: vec![error],
        }
    }

    pub fn add(&mut self, error: TranscodeError) {
        self.errors.push(error);
    }

    pub fn extend(&mut self, other: TranscodeErrors) {
        self.errors.extend(other.errors);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TranscodeError> {
        self.errors.iter()
    }
}

impl From<TranscodeError> for TranscodeErrors {
    fn from(error: TranscodeError) -> Self {
        TranscodeErrors::from_error(error)
    }
}

impl IntoIterator for TranscodeErrors {
    type Item = TranscodeError;
    type IntoIter = std::vec::IntoIter<TranscodeError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl fmt::Display for TranscodeErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", err)?;
        }
        Ok(())
    }
}

impl std::error::Error for TranscodeErrors {}

/// Outcome carries a transcoded result together with the per-field errors
/// met while producing it.
///
/// A failing field is left out of `value`; the rest of the tree is still
/// transcoded.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome<T> {
    pub value: T,
    pub errors: TranscodeErrors,
}

impl<T> Outcome<T> {
    pub fn new(value: T, errors: TranscodeErrors) -> Self {
        Outcome { value, errors }
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Fails if any field error was collected.
    pub fn into_result(self) -> Result<T, TranscodeErrors> {
        if self.errors.is_empty() {
            Ok(self.value)
        } else {
            Err(self.errors)
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        Outcome {
            value: f(self.value),
            errors: self.errors,
        }
    }
}
