//! Field name case conversion between remote camelCase and local snake_case.

/// Converts a remote field name to its local snake_case form.
///
/// A boundary is placed before an upper-case letter that follows a lower-case
/// letter or digit, and before the last capital of an acronym run that is
/// followed by a lower-case letter (`URLPath` -> `url_path`). Characters other
/// than ASCII letters are copied unchanged.
pub fn to_snake(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 {
                let prev = chars[i - 1];
                let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_ascii_lowercase());
                if prev.is_ascii_lowercase()
                    || prev.is_ascii_digit()
                    || (prev.is_ascii_uppercase() && next_is_lower)
                {
                    out.push('_');
                }
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }

    out
}

/// Converts a local snake_case field name back to camelCase.
///
/// Acronyms do not survive the round trip: `pod_ip` becomes `podIp`, not
/// `podIP`. Transcoding always goes from the declared remote name to the
/// local one, so this is only needed for free-standing names.
pub fn to_camel(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = false;

    for c in name.chars() {
        if c == '_' && !out.is_empty() {
            upper_next = true;
            continue;
        }
        if upper_next {
            out.push(c.to_ascii_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }

    out
}

/// Joins a dotted local path and one more segment.
pub fn join_path(parent: &str, segment: &str) -> String {
    if parent.is_empty() {
        segment.to_string()
    } else {
        let mut path = String::with_capacity(parent.len() + segment.len() + 1);
        path.push_str(parent);
        path.push('.');
        path.push_str(segment);
        path
    }
}
