//! Token tree flattening
//!
//! Walks an extension-resolved token tree and emits one flat entry per
//! terminal value, keyed by the dash-joined path of group and token names.

use crate::error::{Result, TokenError};
use crate::resolve::document::{Group, Token, TokenDocument, TokenNode, TokenValue, REF_KEY, TYPE_KEY};
use crate::resolve::extends::resolve_extends;
use crate::types::{FlatTable, ResolveConfig};
use serde_json::{Map, Value};

/// Flattens token documents into [`FlatTable`]s
pub struct TokenFlattener {
    config: ResolveConfig,
}

impl TokenFlattener {
    pub fn new(config: ResolveConfig) -> Self {
        TokenFlattener { config }
    }

    /// Flatten `document`, resolving its `$extends` against `full_document`.
    pub fn flatten(&self, document: &TokenDocument, full_document: &TokenDocument) -> Result<FlatTable> {
        let root = resolve_extends(&document.root, &[], full_document);

        let mut entries = FlatTable::new();
        let mut path = Vec::new();
        self.flatten_group(&root, &mut path, None, &mut entries)?;

        if self.config.should_sort() {
            entries.sort_keys();
        }
        Ok(entries)
    }

    fn flatten_group(
        &self,
        group: &Group,
        path: &mut Vec<String>,
        inherited_type: Option<&str>,
        entries: &mut FlatTable,
    ) -> Result<()> {
        let inherited_type = group.token_type.as_deref().or(inherited_type);

        for (name, node) in &group.children {
            path.push(name.clone());
            match node {
                TokenNode::Group(child) => self.flatten_group(child, path, inherited_type, entries)?,
                TokenNode::Token(token) => self.flatten_token(token, path, inherited_type, entries)?,
            }
            path.pop();
        }

        Ok(())
    }

    fn flatten_token(
        &self,
        token: &Token,
        path: &mut Vec<String>,
        inherited_type: Option<&str>,
        entries: &mut FlatTable,
    ) -> Result<()> {
        match &token.value {
            TokenValue::Text(text) => self.emit(path, Value::String(text.clone()), entries),
            TokenValue::Pointer(pointer) => {
                let mut reference = Map::new();
                reference.insert(REF_KEY.to_string(), Value::String(pointer.clone()));
                self.emit(path, Value::Object(reference), entries)
            }
            TokenValue::Composite(properties) => {
                for (key, value) in properties {
                    path.push(key.clone());
                    self.emit(path, value.clone(), entries)?;
                    path.pop();
                }

                // Materialise the effective type next to the sub-properties
                if !properties.contains_key(TYPE_KEY) {
                    if let Some(token_type) = token.token_type.as_deref().or(inherited_type) {
                        path.push(TYPE_KEY.to_string());
                        self.emit(path, Value::String(token_type.to_string()), entries)?;
                        path.pop();
                    }
                }
                Ok(())
            }
        }
    }

    fn emit(&self, path: &[String], value: Value, entries: &mut FlatTable) -> Result<()> {
        let key = self.flat_key(path);
        if entries.contains_key(&key) {
            return Err(TokenError::DuplicateKey { keys: vec![key] });
        }
        entries.insert(key, value);
        Ok(())
    }

    /// Build the flat key for `path`, applying any configured group prefix
    pub fn flat_key(&self, path: &[String]) -> String {
        let mut segments: Vec<String> = path.iter().map(|s| normalize_segment(s)).collect();

        if segments.len() >= 2 {
            if let Some(prefix) = self.config.prefixes.get(&path[0]) {
                let token = segments.remove(1);
                segments[0] = apply_prefix(prefix, &token);
                if segments[0].is_empty() {
                    segments.remove(0);
                }
            }
        }

        segments.join("-")
    }
}

/// Flatten raw JSON documents in one call
pub fn flatten_json(document: &Value, config: &ResolveConfig, full_document: &Value) -> Result<FlatTable> {
    let document = TokenDocument::from_value(document)?;
    let full_document = TokenDocument::from_value(full_document)?;
    TokenFlattener::new(config.clone()).flatten(&document, &full_document)
}

fn normalize_segment(segment: &str) -> String {
    segment.trim().replace(' ', "-")
}

/// `""` drops the group, `"size-"` concatenates, `"brand"` joins with a dash
fn apply_prefix(prefix: &str, token: &str) -> String {
    if prefix.is_empty() || prefix.ends_with('-') {
        format!("{}{}", prefix, token)
    } else {
        format!("{}-{}", prefix, token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use serde_json::json;

    fn flatten_self(tokens: &Value) -> FlatTable {
        flatten_json(tokens, &ResolveConfig::default(), tokens).unwrap()
    }

    fn keys(table: &FlatTable) -> Vec<&str> {
        table.keys().map(String::as_str).collect()
    }

    #[test]
    fn test_string_and_composite_values() {
        let tokens = json!({
            "color": {
                "white": {"$value": "#ffffff"},
                "brand": {"$value": {"colorSpace": "srgb", "components": [0, 0.4, 0.8], "hex": "#0066cc"}}
            }
        });

        let flat = flatten_self(&tokens);
        assert_eq!(
            keys(&flat),
            vec!["color-white", "color-brand-colorSpace", "color-brand-components", "color-brand-hex"]
        );
        assert_eq!(flat["color-brand-components"], json!([0, 0.4, 0.8]));
    }

    #[test]
    fn test_order_preserved_or_sorted() {
        let tokens = json!({"z": {"last": {"$value": "#000"}}, "a": {"first": {"$value": "#fff"}}});

        let preserved = flatten_self(&tokens);
        assert_eq!(keys(&preserved), vec!["z-last", "a-first"]);

        let config = ResolveConfig {
            preserve_order: false,
            ..ResolveConfig::default()
        };
        let sorted = flatten_json(&tokens, &config, &tokens).unwrap();
        assert_eq!(keys(&sorted), vec!["a-first", "z-last"]);
    }

    #[test]
    fn test_group_type_inheritance() {
        let tokens = json!({
            "spacing": {
                "$type": "dimension",
                "small": {"$value": {"value": 8, "unit": "px"}},
                "large": {"$value": {"value": 32, "unit": "px"}}
            },
            "ui": {
                "$type": "color",
                "button": {
                    "primary": {"$value": {"hex": "#0066cc"}},
                    "secondary": {"$type": "dimension", "$value": {"value": 2, "unit": "px"}}
                }
            }
        });

        let flat = flatten_self(&tokens);
        assert_eq!(flat["spacing-small-$type"], "dimension");
        assert_eq!(flat["spacing-large-$type"], "dimension");
        assert_eq!(flat["ui-button-primary-$type"], "color");
        assert_eq!(flat["ui-button-secondary-$type"], "dimension");
    }

    #[test]
    fn test_explicit_type_in_value_is_not_overwritten() {
        let tokens = json!({"g": {"$type": "color", "t": {"$value": {"$type": "custom", "x": "1"}}}});
        let flat = flatten_self(&tokens);
        assert_eq!(keys(&flat), vec!["g-t-$type", "g-t-x"]);
        assert_eq!(flat["g-t-$type"], "custom");
    }

    #[test]
    fn test_group_metadata_not_flattened() {
        let tokens = json!({
            "colors": {
                "$type": "color",
                "$description": "Brand color palette",
                "$deprecated": "Use new tokens instead",
                "$extensions": {"org.example.tool": {"customData": "value"}},
                "primary": {"$value": "#0066cc"}
            }
        });

        let flat = flatten_self(&tokens);
        assert_eq!(keys(&flat), vec!["colors-primary"]);
    }

    #[test]
    fn test_root_tokens() {
        let tokens = json!({
            "theme": {
                "$root": {"$value": "base-value"},
                "variant": {"$value": "variant-value"},
                "nested": {"$root": {"$value": "nested-base"}, "item": {"$value": "nested-item"}}
            },
            "spacing": {
                "$type": "dimension",
                "$root": {"$value": {"value": 16, "unit": "px"}}
            }
        });

        let flat = flatten_self(&tokens);
        assert_eq!(flat["theme-$root"], "base-value");
        assert_eq!(flat["theme-variant"], "variant-value");
        assert_eq!(flat["theme-nested-$root"], "nested-base");
        assert_eq!(flat["spacing-$root-value"], 16);
        assert_eq!(flat["spacing-$root-unit"], "px");
        assert_eq!(flat["spacing-$root-$type"], "dimension");
    }

    #[test]
    fn test_extension_inheritance_with_override() {
        let tokens = json!({
            "button": {
                "$type": "color",
                "background": {"$value": {"colorSpace": "srgb", "hex": "#0066cc"}},
                "text": {"$value": {"colorSpace": "srgb", "hex": "#ffffff"}}
            },
            "button-primary": {
                "$extends": "{button}",
                "background": {"$value": {"colorSpace": "srgb", "hex": "#cc0066"}}
            }
        });

        let flat = flatten_self(&tokens);
        assert_eq!(flat["button-primary-text-hex"], "#ffffff");
        assert_eq!(flat["button-primary-text-colorSpace"], "srgb");
        assert_eq!(flat["button-primary-background-hex"], "#cc0066");
        assert_eq!(flat["button-primary-background-$type"], "color");
        assert!(!flat.keys().any(|k| k.contains("$extends")));
    }

    #[test]
    fn test_extension_inherits_type() {
        let tokens = json!({
            "base": {"$type": "color", "primary": {"$value": {"hex": "#0066cc"}}},
            "extended": {"$extends": "{base}", "secondary": {"$value": {"hex": "#6699ff"}}}
        });

        let flat = flatten_self(&tokens);
        assert_eq!(flat["extended-primary-$type"], "color");
        assert_eq!(flat["extended-secondary-$type"], "color");
    }

    #[test]
    fn test_empty_base_group() {
        let tokens = json!({
            "empty": {"$description": "An empty group"},
            "extended": {"$extends": "{empty}", "token": {"$value": "value"}}
        });

        let flat = flatten_self(&tokens);
        let extended: Vec<&str> = keys(&flat).into_iter().filter(|k| k.starts_with("extended-")).collect();
        assert_eq!(extended, vec!["extended-token"]);
    }

    #[test]
    fn test_custom_prefixes() {
        let tokens = json!({
            "colors": {"error": {"$value": "#f00"}},
            "sizes": {"small": {"$value": "4px"}},
            "brand": {"primary": {"$value": "#000"}},
            "typography": {"body": {"size": {"$value": "16px"}}},
            "other": {"thing": {"$value": "x"}}
        });
        let mut prefixes = IndexMap::new();
        prefixes.insert("colors".to_string(), String::new());
        prefixes.insert("sizes".to_string(), "size-".to_string());
        prefixes.insert("brand".to_string(), "b".to_string());
        prefixes.insert("typography".to_string(), "text".to_string());
        let config = ResolveConfig {
            prefixes,
            ..ResolveConfig::default()
        };

        let flat = flatten_json(&tokens, &config, &tokens).unwrap();
        assert_eq!(keys(&flat), vec!["error", "size-small", "b-primary", "text-body-size", "other-thing"]);
    }

    #[test]
    fn test_spaces_become_dashes() {
        let tokens = json!({"brand colors": {"deep blue": {"$value": "#003"}}});
        assert_eq!(keys(&flatten_self(&tokens)), vec!["brand-colors-deep-blue"]);
    }

    #[test]
    fn test_segments_are_trimmed() {
        let tokens = json!({"color ": {" primary": {"$value": "#000"}, "deep blue ": {"$value": "#003"}}});
        let flat = flatten_self(&tokens);
        assert_eq!(keys(&flat), vec!["color-primary", "color-deep-blue"]);
        assert!(flat.contains_key(&crate::resolve::path::ref_to_name("{ color.primary }")));
    }

    #[test]
    fn test_pointer_token_kept_whole() {
        let tokens = json!({"alias": {"$value": {"$ref": "#/base/$value"}}, "base": {"$value": "1"}});
        let flat = flatten_self(&tokens);
        assert_eq!(flat["alias"], json!({"$ref": "#/base/$value"}));
    }

    #[test]
    fn test_invalid_value_shape() {
        let tokens = json!({"invalid": {"$value": 123}});
        let err = flatten_json(&tokens, &ResolveConfig::default(), &tokens).unwrap_err();
        assert!(err.to_string().contains("$value properties must be strings or objects"));
    }

    #[test]
    fn test_colliding_keys_within_file() {
        let tokens = json!({"a b": {"c": {"$value": "1"}}, "a-b": {"c": {"$value": "2"}}});
        match flatten_json(&tokens, &ResolveConfig::default(), &tokens) {
            Err(TokenError::DuplicateKey { keys }) => assert_eq!(keys, vec!["a-b-c"]),
            other => panic!("expected DuplicateKey, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_document() {
        assert!(flatten_self(&json!({})).is_empty());
    }
}
