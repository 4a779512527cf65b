//! Format emitters
//!
//! Emitters read a resolved [`FlatTable`] and render it as text. They never
//! mutate the table. In deferred mode references become the format's native
//! variable syntax (the Tailwind v3 config keeps them as written), and color
//! values are rewritten to the configured notation.

pub mod css;
pub mod esm;
pub mod json;
pub mod scss;
pub mod tailwind_config;
pub mod tailwind_theme;
pub mod writer;

pub use writer::OutputWriter;

use crate::color::{convert_color, is_color_token, ColorFormat};
use crate::error::{Result, TokenError};
use crate::resolve::path::{is_symbolic_ref, ref_to_name};
use crate::types::{FlatTable, ResolveConfig};
use serde_json::Value;
use std::str::FromStr;

/// Output formats selectable through a transform's `as` field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// CSS custom properties
    Css,
    /// Sass variables
    Scss,
    /// ES module exporting one object
    Esm,
    /// Flat JSON
    Json,
    /// Tailwind v3 `theme.extend` config module
    TailwindConfig,
    /// Tailwind v4 `@theme` block
    TailwindTheme,
}

impl FromStr for Format {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "css" => Ok(Format::Css),
            "scss" => Ok(Format::Scss),
            "js" | "mjs" | "esm" => Ok(Format::Esm),
            "json" => Ok(Format::Json),
            "tailwind" | "tailwind-config" => Ok(Format::TailwindConfig),
            "tailwind-theme" => Ok(Format::TailwindTheme),
            other => Err(TokenError::UnknownFormat(other.to_string())),
        }
    }
}

impl Format {
    /// Render `tokens` in this format. `group_name` names the ES module export.
    pub fn render(self, tokens: &FlatTable, group_name: &str, config: &ResolveConfig) -> Result<String> {
        match self {
            Format::Css => Ok(css::to_custom_props(tokens, config)),
            Format::Scss => Ok(scss::to_scss_vars(tokens, config)),
            Format::Esm => Ok(esm::to_esm(tokens, group_name, config)),
            Format::Json => json::to_json(tokens, config),
            Format::TailwindConfig => tailwind_config::to_tailwind_config(tokens, config),
            Format::TailwindTheme => Ok(tailwind_theme::to_tailwind_theme(tokens, config)),
        }
    }
}

/// The flat key a value refers to, when references are being kept
pub(crate) fn kept_reference(value: &Value, config: &ResolveConfig) -> Option<String> {
    if !config.keep_references {
        return None;
    }
    value.as_str().filter(|s| is_symbolic_ref(s)).map(ref_to_name)
}

/// Apply the configured color notation to color-like entries
pub(crate) fn convert_if_color(key: &str, value: &Value, config: &ResolveConfig) -> Value {
    if config.output_color_format == ColorFormat::Auto || !is_color_token(key, value) {
        return value.clone();
    }
    match value.as_str() {
        Some(s) => Value::String(convert_color(s, config.output_color_format)),
        None => value.clone(),
    }
}

/// Text form used by stylesheet formats
pub(crate) fn plain_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(plain_text).collect::<Vec<_>>().join(", "),
        other => other.to_string(),
    }
}
