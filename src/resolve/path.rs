//! Reference-name and JSON Pointer codecs

const POINTER_PREFIX: &str = "#/";

/// Convert a `{group.token name}` reference into its flat key `group-token-name`.
///
/// Purely syntactic: the key is not checked for existence.
pub fn ref_to_name(reference: &str) -> String {
    let inner = reference.strip_prefix('{').unwrap_or(reference);
    let inner = inner.strip_suffix('}').unwrap_or(inner);
    inner.trim().replace(['.', ' '], "-")
}

/// Whether a string begins a symbolic `{...}` reference
pub fn is_symbolic_ref(value: &str) -> bool {
    value.starts_with('{')
}

pub fn is_pointer_ref(value: &str) -> bool {
    value.starts_with(POINTER_PREFIX)
}

/// Split a `#/a/b` pointer into unescaped segments.
///
/// Anything without the `#/` prefix yields no segments.
pub fn parse_pointer(pointer: &str) -> Vec<String> {
    let Some(path) = pointer.strip_prefix(POINTER_PREFIX) else {
        return Vec::new();
    };
    if path.is_empty() {
        return Vec::new();
    }
    path.split('/').map(unescape_segment).collect()
}

/// `~1` → `/` first, then `~0` → `~`
pub fn unescape_segment(segment: &str) -> String {
    segment.replace("~1", "/").replace("~0", "~")
}
