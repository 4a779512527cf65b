//! Tailwind v3 `tailwind.config.js` output
//!
//! Flat keys are sorted into `theme.extend` sections by naming convention.
//! Color keys are split on `-`/`.` into nested palettes, so `color-primary-500`
//! lands at `colors.primary["500"]`.

use crate::color::is_color_token;
use crate::emit::convert_if_color;
use crate::error::Result;
use crate::types::{FlatTable, ResolveConfig};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};

static COLOR_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(color|colors?|bg|background|fg|foreground|text|fill|stroke|border)").unwrap()
});

static SPACING_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(spacing|space)").unwrap());

static FONT_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(font|typography)").unwrap());

static BORDER_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^border").unwrap());

static SHADOW_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(shadow|box.shadow)").unwrap());

static Z_INDEX_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(z.index|zindex)").unwrap());

static LINE_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^line").unwrap());

const COLOR_WORDS: &[&str] = &["color", "bg", "background", "fg", "foreground", "text", "fill", "stroke"];

const SPACING_WORDS: &[&str] = &["spacing", "space", "margin", "padding", "gap", "inset"];

/// Tailwind theme section a token belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Color,
    Spacing,
    FontSize,
    FontFamily,
    FontWeight,
    BorderRadius,
    BorderWidth,
    BoxShadow,
    ZIndex,
    LineHeight,
}

impl Category {
    /// Section name under `theme.extend`
    pub fn section(self) -> &'static str {
        match self {
            Category::Color => "colors",
            Category::Spacing => "spacing",
            Category::FontSize => "fontSize",
            Category::FontFamily => "fontFamily",
            Category::FontWeight => "fontWeight",
            Category::BorderRadius => "borderRadius",
            Category::BorderWidth => "borderWidth",
            Category::BoxShadow => "boxShadow",
            Category::ZIndex => "zIndex",
            Category::LineHeight => "lineHeight",
        }
    }

    /// Custom property namespace used by Tailwind v4 `@theme`
    pub fn namespace(self) -> &'static str {
        match self {
            Category::Color => "color",
            Category::Spacing => "spacing",
            Category::FontSize => "font-size",
            Category::FontFamily => "font-family",
            Category::FontWeight => "font-weight",
            Category::BorderRadius => "border-radius",
            Category::BorderWidth => "border-width",
            Category::BoxShadow => "box-shadow",
            Category::ZIndex => "z-index",
            Category::LineHeight => "line-height",
        }
    }
}

/// Pick a category for `key` and the name it takes inside that category.
///
/// Checks run in a fixed order and the first match wins, so `letter-spacing-*`
/// keys land in spacing. Unmatched keys fall back to colors under their full name.
pub fn categorize_token(key: &str, value: &Value) -> (Category, String) {
    let lower = key.to_lowercase();
    let has = |word: &str| lower.contains(word);

    if is_color_token(key, value) || COLOR_WORDS.iter().any(|&w| has(w)) || (has("border") && has("color")) {
        return (Category::Color, extract_path(key, &COLOR_PREFIX, None));
    }
    if SPACING_WORDS.iter().any(|&w| has(w)) {
        return (Category::Spacing, extract_path(key, &SPACING_PREFIX, None));
    }

    let (category, prefix, word): (Category, &Regex, Option<&str>) = if has("font") && has("size") {
        (Category::FontSize, &*FONT_PREFIX, Some("size"))
    } else if has("font") && has("family") {
        (Category::FontFamily, &*FONT_PREFIX, Some("family"))
    } else if has("font") && has("weight") {
        (Category::FontWeight, &*FONT_PREFIX, Some("weight"))
    } else if has("border") && has("radius") {
        (Category::BorderRadius, &*BORDER_PREFIX, Some("radius"))
    } else if has("border") && has("width") {
        (Category::BorderWidth, &*BORDER_PREFIX, Some("width"))
    } else if has("shadow") {
        (Category::BoxShadow, &*SHADOW_PREFIX, None)
    } else if has("z-index") || has("zindex") {
        (Category::ZIndex, &*Z_INDEX_PREFIX, None)
    } else if has("line") && has("height") {
        (Category::LineHeight, &*LINE_PREFIX, Some("height"))
    } else {
        return (Category::Color, key.to_string());
    };

    (category, extract_path(key, prefix, word))
}

/// Strip the category prefix and the first occurrence of `word`, then any
/// leading separators. An empty result falls back to the whole key.
fn extract_path(key: &str, prefix: &Regex, word: Option<&str>) -> String {
    let mut path = prefix.replace(key, "").into_owned();
    if let Some(word) = word {
        if let Some(start) = path.find(word) {
            path.replace_range(start..start + word.len(), "");
        }
    }

    let path = path.trim_start_matches(['-', '_']);
    if path.is_empty() {
        key.to_string()
    } else {
        path.to_string()
    }
}

/// Render tokens as a Tailwind v3 config module extending the default theme
pub fn to_tailwind_config(tokens: &FlatTable, config: &ResolveConfig) -> Result<String> {
    let mut theme: IndexMap<&'static str, Map<String, Value>> = IndexMap::new();

    for (key, value) in tokens {
        let value = convert_if_color(key, value, config);
        let (category, path) = categorize_token(key, &value);
        let section = theme.entry(category.section()).or_default();

        if category == Category::Color {
            insert_nested(section, &path, value);
        } else {
            section.insert(path, value);
        }
    }

    let mut out = String::from("/** @type {import('tailwindcss').Config} */\n");
    out.push_str("export default {\n");
    out.push_str("  theme: {\n");
    out.push_str("    extend: {\n");

    let last = theme.len().saturating_sub(1);
    for (index, (section, entries)) in theme.into_iter().enumerate() {
        let body = pretty(&Value::Object(entries))?.replace('\n', "\n      ");
        let comma = if index == last { "" } else { "," };
        out.push_str(&format!("      {}: {}{}\n", section, body, comma));
    }

    out.push_str("    }\n");
    out.push_str("  }\n");
    out.push_str("}\n");
    Ok(out)
}

/// `primary-500` → `{"primary": {"500": value}}`, replacing scalars on the way
fn insert_nested(section: &mut Map<String, Value>, path: &str, value: Value) {
    let parts: Vec<&str> = path.split(['-', '.']).collect();
    let Some((last, parents)) = parts.split_last() else {
        return;
    };

    let mut current = section;
    for part in parents {
        let entry = current
            .entry(part.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        current = match entry {
            Value::Object(map) => map,
            _ => return,
        };
    }
    current.insert(last.to_string(), value);
}

fn pretty(value: &Value) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"        ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ColorFormat;
    use serde_json::json;

    fn render(value: Value) -> String {
        let tokens: FlatTable = serde_json::from_value(value).unwrap();
        to_tailwind_config(&tokens, &ResolveConfig::default()).unwrap()
    }

    #[test]
    fn test_color_tokens() {
        let out = render(json!({
            "color-primary": "#ff6b35",
            "color-secondary": "#007bff",
            "text-color": "#333333"
        }));

        assert!(out.starts_with("/** @type {import('tailwindcss').Config} */\nexport default {\n"));
        assert!(out.contains("  theme: {\n    extend: {\n      colors: {\n"));
        assert!(out.contains("\"primary\": \"#ff6b35\""));
        assert!(out.contains("\"secondary\": \"#007bff\""));
        assert!(out.contains("\"color\": \"#333333\""));
    }

    #[test]
    fn test_sections() {
        let out = render(json!({
            "spacing-sm": "8px",
            "font-size-base": "16px",
            "font-family-sans": "Inter, sans-serif",
            "border-radius-full": "9999px",
            "box-shadow-sm": "0 1px 2px 0 rgb(0 0 0 / 0.05)",
            "z-index-dropdown": "1000"
        }));

        assert!(out.contains("spacing: {"));
        assert!(out.contains("\"sm\": \"8px\""));
        assert!(out.contains("fontSize: {"));
        assert!(out.contains("\"base\": \"16px\""));
        assert!(out.contains("fontFamily: {"));
        assert!(out.contains("\"sans\": \"Inter, sans-serif\""));
        assert!(out.contains("borderRadius: {"));
        assert!(out.contains("\"full\": \"9999px\""));
        assert!(out.contains("boxShadow: {"));
        assert!(out.contains("\"sm\": \"0 1px 2px 0 rgb(0 0 0 / 0.05)\""));
        assert!(out.contains("zIndex: {"));
        assert!(out.contains("\"dropdown\": \"1000\""));
    }

    #[test]
    fn test_nested_palette() {
        let out = render(json!({
            "color-primary-50": "#fef2f2",
            "color-primary-500": "#ef4444"
        }));

        assert_eq!(
            out,
            "/** @type {import('tailwindcss').Config} */\n\
             export default {\n  theme: {\n    extend: {\n      \
             colors: {\n              \
             \"primary\": {\n                      \
             \"50\": \"#fef2f2\",\n                      \
             \"500\": \"#ef4444\"\n              \
             }\n      }\n    }\n  }\n}\n"
        );
    }

    #[test]
    fn test_color_conversion() {
        let tokens: FlatTable =
            serde_json::from_value(json!({"color-primary": "rgb(255, 107, 53)", "color-secondary": "#007bff"}))
                .unwrap();
        let config = ResolveConfig {
            output_color_format: ColorFormat::Hex,
            ..ResolveConfig::default()
        };
        let out = to_tailwind_config(&tokens, &config).unwrap();
        assert!(out.contains("\"primary\": \"#ff6b35\""));
        assert!(out.contains("\"secondary\": \"#007bff\""));
    }

    #[test]
    fn test_empty_tokens() {
        assert_eq!(
            render(json!({})),
            "/** @type {import('tailwindcss').Config} */\nexport default {\n  theme: {\n    extend: {\n    }\n  }\n}\n"
        );
    }

    #[test]
    fn test_categorize_token() {
        let cases = [
            ("bg-primary", "#ff6b35", Category::Color, "primary"),
            ("text-secondary", "#007bff", Category::Color, "secondary"),
            ("space-sm", "8px", Category::Spacing, "sm"),
            ("margin-md", "16px", Category::Spacing, "margin-md"),
            ("letter-spacing-tight", "-0.025em", Category::Spacing, "letter-spacing-tight"),
            ("font-family-heading", "Inter", Category::FontFamily, "heading"),
            ("fontSizeBase", "16px", Category::FontSize, "SizeBase"),
            ("border-radius-lg", "8px", Category::BorderRadius, "lg"),
            ("border-width-thin", "1px", Category::BorderWidth, "thin"),
            ("shadow-lg", "0 10px 15px -3px rgb(0 0 0 / 0.1)", Category::BoxShadow, "lg"),
            ("line-height-tight", "1.25", Category::LineHeight, "tight"),
            ("font-weight-bold", "700", Category::FontWeight, "bold"),
            ("typography-size-lg", "18px", Category::Color, "typography-size-lg"),
            ("z-dropdown", "1000", Category::Color, "z-dropdown"),
        ];

        for (key, value, category, path) in cases {
            assert_eq!(categorize_token(key, &json!(value)), (category, path.to_string()), "{}", key);
        }
    }
}
