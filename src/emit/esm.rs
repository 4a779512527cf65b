use crate::emit::{convert_if_color, kept_reference};
use crate::types::{FlatTable, ResolveConfig};
use serde_json::Value;

/// Render tokens as an ES module exporting one object named after `group_name`
pub fn to_esm(tokens: &FlatTable, group_name: &str, config: &ResolveConfig) -> String {
    let prefix = config.name_prefix();
    let mut out = format!("export const {} = {{\n", camel_case(group_name));

    let last = tokens.len().saturating_sub(1);
    for (index, (key, value)) in tokens.iter().enumerate() {
        let rendered = match kept_reference(value, config) {
            Some(name) => quote(&format!("{{{}}}", name)),
            None => match convert_if_color(key, value, config) {
                Value::String(s) => quote(&s),
                other => other.to_string(),
            },
        };
        let comma = if index == last { "" } else { "," };
        out.push_str(&format!("\t'{}{}': {}{}\n", prefix, key, rendered, comma));
    }

    out.push('}');
    out
}

/// `my-colors` → `myColors`
fn camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut chars = name.chars();
    while let Some(c) = chars.next() {
        if c == '-' {
            if let Some(next) = chars.next() {
                out.extend(next.to_uppercase());
            }
        } else {
            out.push(c);
        }
    }
    out
}

fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'"))
}
