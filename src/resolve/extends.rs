//! Group extension (`$extends`) resolution
//!
//! An extending group is deep-merged over the (recursively resolved) group it
//! names: objects merge key by key, and anything declared locally wins.
//! Extension chains accumulate transitively. A link that would re-enter a
//! group already being expanded is skipped, so cyclic chains terminate.

use crate::resolve::document::{Group, Token, TokenDocument, TokenNode, TokenValue};
use serde_json::{Map, Value};

/// Resolve every `$extends` in `group` (located at `path`) and its subtree,
/// looking targets up in `document`. The input is left untouched.
pub fn resolve_extends(group: &Group, path: &[String], document: &TokenDocument) -> Group {
    let mut stack = vec![path.to_vec()];
    resolve_group(group.clone(), path, document, &mut stack)
}

/// Parse an `$extends` declaration into a group path.
///
/// Accepts `{a.b.c}` or a bare group name. Anything else is `None`.
pub fn parse_extends_target(raw: &str) -> Option<Vec<String>> {
    let raw = raw.trim();

    if let Some(inner) = raw.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
        let segments: Vec<String> = inner.trim().split('.').map(|s| s.trim().to_string()).collect();
        if segments.iter().any(String::is_empty) {
            return None;
        }
        return Some(segments);
    }

    let bare = !raw.is_empty()
        && !raw.contains(['{', '}'])
        && !raw.chars().any(char::is_whitespace);
    bare.then(|| vec![raw.to_string()])
}

fn resolve_group(
    mut group: Group,
    path: &[String],
    document: &TokenDocument,
    stack: &mut Vec<Vec<String>>,
) -> Group {
    if let Some(raw) = group.extends.take() {
        if let Some(base) = resolve_target(&raw, path, document, stack) {
            group = merge_groups(base, group);
        }
    }

    let children = std::mem::take(&mut group.children);
    group.children = children
        .into_iter()
        .map(|(name, node)| {
            let node = match node {
                TokenNode::Group(child) => {
                    let mut child_path = path.to_vec();
                    child_path.push(name.clone());
                    stack.push(child_path.clone());
                    let resolved = resolve_group(child, &child_path, document, stack);
                    stack.pop();
                    TokenNode::Group(resolved)
                }
                token => token,
            };
            (name, node)
        })
        .collect();

    group
}

fn resolve_target(
    raw: &str,
    path: &[String],
    document: &TokenDocument,
    stack: &mut Vec<Vec<String>>,
) -> Option<Group> {
    let Some(target) = parse_extends_target(raw) else {
        log::warn!("Ignoring malformed $extends '{}' in '{}'", raw, path.join("."));
        return None;
    };

    if stack.contains(&target) {
        log::warn!(
            "Skipping cyclic $extends '{}' in '{}': '{}' is already being extended",
            raw,
            path.join("."),
            target.join(".")
        );
        return None;
    }

    let Some(base) = document.find_group(&target) else {
        log::warn!("Ignoring $extends '{}' in '{}': no such group", raw, path.join("."));
        return None;
    };

    stack.push(target.clone());
    let resolved = resolve_group(base.clone(), &target, document, stack);
    stack.pop();
    Some(resolved)
}

fn merge_groups(base: Group, local: Group) -> Group {
    let mut children = base.children;
    for (name, node) in local.children {
        match children.get_mut(&name) {
            Some(existing) => {
                let inherited = std::mem::replace(existing, TokenNode::Group(Group::default()));
                *existing = merge_nodes(inherited, node);
            }
            None => {
                children.insert(name, node);
            }
        }
    }

    Group {
        token_type: local.token_type.or(base.token_type),
        description: local.description.or(base.description),
        deprecated: local.deprecated.or(base.deprecated),
        extensions: match (base.extensions, local.extensions) {
            (Some(b), Some(l)) => Some(merge_values(b, l)),
            (b, l) => l.or(b),
        },
        extends: local.extends,
        children,
    }
}

fn merge_nodes(base: TokenNode, local: TokenNode) -> TokenNode {
    match (base, local) {
        (TokenNode::Group(b), TokenNode::Group(l)) => TokenNode::Group(merge_groups(b, l)),
        (TokenNode::Token(b), TokenNode::Token(l)) => TokenNode::Token(merge_tokens(b, l)),
        (_, local) => local,
    }
}

fn merge_tokens(base: Token, local: Token) -> Token {
    let value = match (base.value, local.value) {
        (TokenValue::Composite(b), TokenValue::Composite(l)) => TokenValue::Composite(merge_maps(b, l)),
        (_, local) => local,
    };
    Token {
        token_type: local.token_type.or(base.token_type),
        value,
    }
}

fn merge_values(base: Value, local: Value) -> Value {
    match (base, local) {
        (Value::Object(b), Value::Object(l)) => Value::Object(merge_maps(b, l)),
        (_, local) => local,
    }
}

fn merge_maps(mut base: Map<String, Value>, local: Map<String, Value>) -> Map<String, Value> {
    for (key, value) in local {
        match base.get_mut(&key) {
            Some(existing) => {
                let inherited = existing.take();
                *existing = merge_values(inherited, value);
            }
            None => {
                base.insert(key, value);
            }
        }
    }
    base
}
