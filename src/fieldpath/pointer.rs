//! JSON pointer into a remote tree.

use std::fmt;

/// Pointer is a sequence of unescaped segments addressing a remote node.
///
/// Its string form follows RFC 6901: each segment is preceded by `/`, with
/// `~` written as `~0` and `/` as `~1`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pointer {
    segments: Vec<String>,
}

/// Error parsing a pointer string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PointerError {
    #[error("pointer must be empty or start with '/': {0}")]
    MissingLeadingSlash(String),

    #[error("invalid escape sequence in pointer segment: {0}")]
    InvalidEscape(String),
}

impl Pointer {
    /// The pointer to the document root.
    pub fn root() -> Self {
        Pointer {
            segments: Vec::new(),
        }
    }

    pub fn from_segments(segments: Vec<String>) -> Self {
        Pointer { segments }
    }

    /// Parses the RFC 6901 string form.
    pub fn parse(s: &str) -> Result<Self, PointerError> {
        if s.is_empty() {
            return Ok(Pointer::root());
        }
        let rest = s
            .strip_prefix('/')
            .ok_or_else(|| PointerError::MissingLeadingSlash(s.to_string()))?;
        let segments = rest
            .split('/')
            .map(unescape_segment)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Pointer { segments })
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn push(&mut self, segment: impl Into<String>) {
        self.segments.push(segment.into());
    }

    /// Creates a new pointer with the given segment appended.
    pub fn with(&self, segment: impl Into<String>) -> Self {
        let mut pointer = self.clone();
        pointer.push(segment);
        pointer
    }

    /// Splits off the last segment, returning the parent and that segment.
    pub fn split_last(&self) -> Option<(&[String], &str)> {
        self.segments
            .split_last()
            .map(|(last, parent)| (parent, last.as_str()))
    }
}

/// Escapes one pointer segment.
pub fn escape_segment(segment: &str) -> String {
    if !segment.contains('~') && !segment.contains('/') {
        return segment.to_string();
    }
    segment.replace('~', "~0").replace('/', "~1")
}

/// Unescapes one pointer segment, rejecting a `~` not followed by `0` or `1`.
pub fn unescape_segment(segment: &str) -> Result<String, PointerError> {
    if !segment.contains('~') {
        return Ok(segment.to_string());
    }
    let mut out = String::with_capacity(segment.len());
    let mut chars = segment.chars();
    while let Some(c) = chars.next() {
        if c != '~' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('0') => out.push('~'),
            Some('1') => out.push('/'),
            _ => return Err(PointerError::InvalidEscape(segment.to_string())),
        }
    }
    Ok(out)
}

impl fmt::Display for Pointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            write!(f, "/{}", escape_segment(segment))?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Pointer {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let pointer = Pointer::root().with("spec").with("replicas");
        assert_eq!(pointer.to_string(), "/spec/replicas");
        assert_eq!(Pointer::root().to_string(), "");
    }

    #[test]
    fn test_escaping() {
        let pointer = Pointer::root()
            .with("metadata")
            .with("annotations")
            .with("example.com/owner~team");
        assert_eq!(
            pointer.to_string(),
            "/metadata/annotations/example.com~1owner~0team"
        );
        assert_eq!(Pointer::parse(&pointer.to_string()).unwrap(), pointer);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            Pointer::parse("spec"),
            Err(PointerError::MissingLeadingSlash(_))
        ));
        assert!(matches!(
            Pointer::parse("/a~2b"),
            Err(PointerError::InvalidEscape(_))
        ));
    }

    #[test]
    fn test_split_last() {
        let pointer = Pointer::root().with("spec").with("replicas");
        let (parent, last) = pointer.split_last().unwrap();
        assert_eq!(parent, &["spec".to_string()]);
        assert_eq!(last, "replicas");
        assert!(Pointer::root().split_last().is_none());
    }
}
