use crate::emit::{convert_if_color, kept_reference, plain_text};
use crate::types::{FlatTable, ResolveConfig};

/// Color sub-properties left out of stylesheets; the `-hex` entry stands in for them
const SKIPPED_SUFFIXES: &[&str] = &["-colorSpace", "-components", "-alpha", "-$type"];

/// Render tokens as CSS custom properties inside a `:root` block
pub fn to_custom_props(tokens: &FlatTable, config: &ResolveConfig) -> String {
    let prefix = config.name_prefix();
    let mut out = String::from(":root {\n");

    for (key, value) in tokens {
        let rendered = match kept_reference(value, config) {
            Some(name) => format!("var(--{}{})", prefix, name),
            None => plain_text(&convert_if_color(key, value, config)),
        };

        if let Some(color_name) = key.strip_suffix("-hex") {
            out.push_str(&format!("\t--{}{}: {};\n", prefix, color_name, rendered));
        } else if !SKIPPED_SUFFIXES.iter().any(|s| key.contains(s)) {
            out.push_str(&format!("\t--{}{}: {};\n", prefix, key, rendered));
        }
    }

    out.push_str("}\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ColorFormat;
    use serde_json::json;

    fn tokens(value: serde_json::Value) -> FlatTable {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_custom_props() {
        let css = to_custom_props(
            &tokens(json!({"token-color-1": "#000", "token-color-2": "#fff"})),
            &ResolveConfig::default(),
        );
        assert_eq!(css, ":root {\n\t--token-color-1: #000;\n\t--token-color-2: #fff;\n}\n");
    }

    #[test]
    fn test_composite_color_collapses_to_hex() {
        let css = to_custom_props(
            &tokens(json!({
                "brand-colorSpace": "srgb",
                "brand-components": [0, 0.4, 0.8],
                "brand-hex": "#0066cc",
                "brand-$type": "color",
                "size-value": 16
            })),
            &ResolveConfig::default(),
        );
        assert_eq!(css, ":root {\n\t--brand: #0066cc;\n\t--size-value: 16;\n}\n");
    }

    #[test]
    fn test_only_trailing_hex_collapses() {
        let css = to_custom_props(
            &tokens(json!({"brand-hex-light": "#3399ff", "brand-hex": "#0066cc"})),
            &ResolveConfig::default(),
        );
        assert_eq!(css, ":root {\n\t--brand-hex-light: #3399ff;\n\t--brand: #0066cc;\n}\n");
    }

    #[test]
    fn test_references_prefix_and_colors() {
        let config = ResolveConfig {
            keep_references: true,
            global_prefix: "ds".to_string(),
            output_color_format: ColorFormat::Rgb,
            ..ResolveConfig::default()
        };
        let css = to_custom_props(
            &tokens(json!({"color-primary": "#ff6b35", "color-secondary": "{color.primary}"})),
            &config,
        );
        assert!(css.contains("--ds-color-primary: rgb(255, 107, 53);"));
        assert!(css.contains("--ds-color-secondary: var(--ds-color-primary);"));
    }
}
