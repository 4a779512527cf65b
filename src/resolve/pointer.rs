//! Structural pointer resolution against raw JSON documents

use crate::error::{Result, TokenError};
use crate::resolve::path::{is_pointer_ref, parse_pointer};
use serde_json::Value;

/// Walk `document` one segment at a time.
///
/// Returns `None` when the path does not exist, which is distinct from a path
/// that exists and holds a falsy value such as `""`, `0` or `null`.
pub fn resolve_pointer<'a, S: AsRef<str>>(document: &'a Value, segments: &[S]) -> Option<&'a Value> {
    let mut current = document;

    for segment in segments {
        let segment = segment.as_ref();
        current = match current {
            Value::Array(items) => {
                if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
                    return None;
                }
                let index: usize = segment.parse().ok()?;
                items.get(index)?
            }
            Value::Object(map) => map.get(segment)?,
            _ => return None,
        };
    }

    Some(current)
}

/// Parse and resolve `pointer`, failing with the original pointer text if it
/// is malformed or addresses nothing.
pub fn resolve_pointer_str<'a>(document: &'a Value, pointer: &str) -> Result<&'a Value> {
    if !is_pointer_ref(pointer) {
        return Err(TokenError::PointerNotFound {
            pointer: pointer.to_string(),
        });
    }
    let segments = parse_pointer(pointer);
    resolve_pointer(document, &segments).ok_or_else(|| TokenError::PointerNotFound {
        pointer: pointer.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resolve_object_path() {
        let document = json!({"color": {"primary": {"$value": {"hex": "#0066cc"}}}});

        assert_eq!(
            resolve_pointer(&document, &["color", "primary", "$value", "hex"]),
            Some(&json!("#0066cc"))
        );
        assert_eq!(
            resolve_pointer(&document, &["color", "primary"]),
            Some(&json!({"$value": {"hex": "#0066cc"}}))
        );
        assert_eq!(resolve_pointer(&document, &["nonexistent"]), None);
    }

    #[test]
    fn test_resolve_array_indices() {
        let document = json!({"colors": ["red", "green", "blue"]});

        assert_eq!(resolve_pointer(&document, &["colors", "0"]), Some(&json!("red")));
        assert_eq!(resolve_pointer(&document, &["colors", "2"]), Some(&json!("blue")));
        assert_eq!(resolve_pointer(&document, &["colors", "3"]), None);
        assert_eq!(resolve_pointer(&document, &["colors", "first"]), None);
        assert_eq!(resolve_pointer(&document, &["colors", "-1"]), None);
    }

    #[test]
    fn test_scalar_with_remaining_segments() {
        let document = json!({"valid": {"$value": "test"}});
        assert_eq!(resolve_pointer(&document, &["valid", "$value", "missing", "property"]), None);
    }

    #[test]
    fn test_found_falsy_values() {
        let document = json!({"a": {"empty": "", "zero": 0, "nothing": null}});

        assert_eq!(resolve_pointer(&document, &["a", "empty"]), Some(&json!("")));
        assert_eq!(resolve_pointer(&document, &["a", "zero"]), Some(&json!(0)));
        assert_eq!(resolve_pointer(&document, &["a", "nothing"]), Some(&Value::Null));
        assert_eq!(resolve_pointer(&document, &["a", "nothing", "deeper"]), None);
    }

    #[test]
    fn test_empty_path_is_document() {
        let document = json!({"a": 1});
        let empty: [&str; 0] = [];
        assert_eq!(resolve_pointer(&document, &empty), Some(&document));
    }

    #[test]
    fn test_resolve_pointer_str_reports_original_pointer() {
        let document = json!({"a": {"b": 1}});

        assert_eq!(resolve_pointer_str(&document, "#/a/b").unwrap(), &json!(1));
        match resolve_pointer_str(&document, "#/nonexistent/path") {
            Err(TokenError::PointerNotFound { pointer }) => assert_eq!(pointer, "#/nonexistent/path"),
            other => panic!("expected PointerNotFound, got {:?}", other),
        }
    }
}
