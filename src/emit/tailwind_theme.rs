use crate::emit::tailwind_config::categorize_token;
use crate::emit::{convert_if_color, kept_reference, plain_text};
use crate::types::{FlatTable, ResolveConfig};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static CAMEL_BOUNDARY: Lazy<Regex> = Lazy::new(|| Regex::new(r"([a-z])([A-Z])").unwrap());

/// Render tokens as a Tailwind v4 `@theme` block.
///
/// Each token becomes `--<namespace>-<name>` where the namespace comes from
/// the same categorization as the v3 config. Kept references point at the
/// target's theme variable.
pub fn to_tailwind_theme(tokens: &FlatTable, config: &ResolveConfig) -> String {
    let mut out = String::from("@theme {\n");

    for (key, value) in tokens {
        let value = convert_if_color(key, value, config);
        let rendered = match kept_reference(&value, config) {
            Some(name) => {
                let target = tokens.get(&name).cloned().unwrap_or(Value::Null);
                format!("var(--{})", theme_var(&name, &target))
            }
            None => plain_text(&value),
        };
        out.push_str(&format!("  --{}: {};\n", theme_var(key, &value), rendered));
    }

    out.push_str("}\n");
    out
}

/// `color-primary` → `color-primary`, `fontSizeBase` → `font-size-size-base`
fn theme_var(key: &str, value: &Value) -> String {
    let (category, path) = categorize_token(key, value);
    let kebab = CAMEL_BOUNDARY.replace_all(&path, "${1}-${2}").to_lowercase();
    format!("{}-{}", category.namespace(), kebab)
}
