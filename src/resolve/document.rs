//! Typed token tree
//!
//! A raw JSON document is classified once into groups and tokens: any object
//! carrying `$value` is a [`Token`], every other object is a [`Group`].
//! Each node is owned by its parent, so traversals never see aliased nodes.

use crate::error::{Result, TokenError};
use crate::resolve::path::is_pointer_ref;
use indexmap::IndexMap;
use serde_json::{Map, Value};

pub const VALUE_KEY: &str = "$value";
pub const TYPE_KEY: &str = "$type";
pub const DESCRIPTION_KEY: &str = "$description";
pub const DEPRECATED_KEY: &str = "$deprecated";
pub const EXTENSIONS_KEY: &str = "$extensions";
pub const EXTENDS_KEY: &str = "$extends";
pub const REF_KEY: &str = "$ref";

/// A node of the token tree
#[derive(Debug, Clone, PartialEq)]
pub enum TokenNode {
    Group(Group),
    Token(Token),
}

/// A named collection of tokens and sub-groups with inheritable metadata
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Group {
    /// `$type`, inherited by descendants that do not declare their own
    pub token_type: Option<String>,

    pub description: Option<Value>,
    pub deprecated: Option<Value>,
    pub extensions: Option<Value>,

    /// Raw `$extends` declaration, resolved away by the extension resolver
    pub extends: Option<String>,

    /// Child groups and tokens in document order (`$root` included)
    pub children: IndexMap<String, TokenNode>,
}

/// A leaf carrying a `$value`
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub token_type: Option<String>,
    pub value: TokenValue,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenValue {
    /// A plain string, possibly a `{group.token}` reference
    Text(String),
    /// An object whose keys become sub-properties
    Composite(Map<String, Value>),
    /// `{"$ref": "#/..."}`: a structural pointer into the source document.
    /// Any other keys next to the pointer are dropped.
    Pointer(String),
}

/// A parsed token file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenDocument {
    pub root: Group,
}

impl TokenDocument {
    /// Classify a raw JSON document into groups and tokens.
    ///
    /// Fails with `InvalidValueShape` on any `$value` that is not a string or
    /// object. A non-object document is treated as empty.
    pub fn from_value(value: &Value) -> Result<Self> {
        let root = match value {
            Value::Object(map) => parse_group(map, &mut Vec::new())?,
            _ => {
                log::warn!("Token document is not an object; treating it as empty");
                Group::default()
            }
        };
        Ok(TokenDocument { root })
    }

    /// Locate the group at `path`; `None` if missing or if the path ends on a token
    pub fn find_group<S: AsRef<str>>(&self, path: &[S]) -> Option<&Group> {
        let mut current = &self.root;
        for segment in path {
            match current.children.get(segment.as_ref())? {
                TokenNode::Group(group) => current = group,
                TokenNode::Token(_) => return None,
            }
        }
        Some(current)
    }

    pub fn is_empty(&self) -> bool {
        self.root.children.is_empty()
    }
}

fn parse_node(map: &Map<String, Value>, path: &mut Vec<String>) -> Result<TokenNode> {
    match map.get(VALUE_KEY) {
        Some(value) => Ok(TokenNode::Token(parse_token(map, value, path)?)),
        None => Ok(TokenNode::Group(parse_group(map, path)?)),
    }
}

fn parse_token(map: &Map<String, Value>, value: &Value, path: &[String]) -> Result<Token> {
    let value = match value {
        Value::String(s) => TokenValue::Text(s.clone()),
        Value::Object(obj) => match obj.get(REF_KEY) {
            Some(Value::String(pointer)) if is_pointer_ref(pointer) => {
                if obj.len() > 1 {
                    log::debug!("'{}': $ref takes precedence over sibling $value keys", path.join("."));
                }
                TokenValue::Pointer(pointer.clone())
            }
            _ => TokenValue::Composite(obj.clone()),
        },
        _ => {
            return Err(TokenError::InvalidValueShape {
                path: path.join("."),
            })
        }
    };

    Ok(Token {
        token_type: string_field(map, TYPE_KEY),
        value,
    })
}

fn parse_group(map: &Map<String, Value>, path: &mut Vec<String>) -> Result<Group> {
    let mut group = Group::default();

    for (key, value) in map {
        match key.as_str() {
            TYPE_KEY => group.token_type = value.as_str().map(str::to_string),
            DESCRIPTION_KEY => group.description = Some(value.clone()),
            DEPRECATED_KEY => group.deprecated = Some(value.clone()),
            EXTENSIONS_KEY => group.extensions = Some(value.clone()),
            EXTENDS_KEY => match value {
                Value::String(s) => group.extends = Some(s.clone()),
                _ => log::warn!("Ignoring non-string $extends in '{}'", path.join(".")),
            },
            _ => match value {
                Value::Object(child) => {
                    path.push(key.clone());
                    let node = parse_node(child, path)?;
                    path.pop();
                    group.children.insert(key.clone(), node);
                }
                _ => log::debug!("Ignoring non-object member '{}' in '{}'", key, path.join(".")),
            },
        }
    }

    Ok(group)
}

fn string_field(map: &Map<String, Value>, key: &str) -> Option<String> {
    map.get(key).and_then(Value::as_str).map(str::to_string)
}
