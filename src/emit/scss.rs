use crate::emit::{convert_if_color, kept_reference, plain_text};
use crate::types::{FlatTable, ResolveConfig};

/// Render tokens as Sass variables.
///
/// In deferred mode the table must already be in dependency order, since
/// Sass requires a variable to be declared before it is used.
pub fn to_scss_vars(tokens: &FlatTable, config: &ResolveConfig) -> String {
    let prefix = config.name_prefix();
    let mut out = String::new();

    for (key, value) in tokens {
        let rendered = match kept_reference(value, config) {
            Some(name) => format!("${}{}", prefix, name),
            None => plain_text(&convert_if_color(key, value, config)),
        };
        out.push_str(&format!("${}{}: {};\n", prefix, key, rendered));
    }

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
    fn test_scss_vars() {
        let scss = to_scss_vars(
            &tokens(json!({"token-color-1": "#000", "token-color-2": "#fff"})),
            &ResolveConfig::default(),
        );
        assert_eq!(scss, "$token-color-1: #000;\n$token-color-2: #fff;\n");
    }

    #[test]
    fn test_color_conversion() {
        let config = ResolveConfig {
            output_color_format: ColorFormat::Hex,
            ..ResolveConfig::default()
        };
        let scss = to_scss_vars(
            &tokens(json!({
                "background-color": "#ff0000",
                "text-color": "rgb(0, 255, 0)",
                "border-color": "hsl(240, 100%, 50%)",
                "font-size": "16px"
            })),
            &config,
        );
        assert!(scss.contains("$background-color: #ff0000;"));
        assert!(scss.contains("$text-color: #00ff00;"));
        assert!(scss.contains("$border-color: #0000ff;"));
        assert!(scss.contains("$font-size: 16px;"));
    }

    #[test]
    fn test_references_become_variables() {
        let config = ResolveConfig {
            keep_references: true,
            output_color_format: ColorFormat::Rgb,
            ..ResolveConfig::default()
        };
        let scss = to_scss_vars(
            &tokens(json!({"primary-color": "#ff0000", "background-color": "{primary-color}"})),
            &config,
        );
        assert!(scss.contains("$primary-color: rgb(255, 0, 0);"));
        assert!(scss.contains("$background-color: $primary-color;"));
    }
}
