use crate::color::ColorFormat;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Flat key → value table produced by flattening and consumed by emitters.
///
/// Values are either concrete scalars/composites or, before resolution,
/// references (`"{a.b}"` strings or `{"$ref": "#/..."}` objects).
pub type FlatTable = IndexMap<String, Value>;

/// Options that shape flattening, resolution and emission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResolveConfig {
    /// Keep keys in document order (false sorts them)
    pub preserve_order: bool,

    /// Legacy switch: sort keys alphabetically
    pub sort_tokens: bool,

    /// Per top-level group key prefixes. An empty prefix drops the group name.
    pub prefixes: IndexMap<String, String>,

    /// Prefix prepended by emitters to every emitted name
    pub global_prefix: String,

    /// Leave `{a.b}` references in place, ordered so targets come first
    pub keep_references: bool,

    /// Color notation emitters convert color values to
    pub output_color_format: ColorFormat,
}

impl Default for ResolveConfig {
    fn default() -> Self {
        ResolveConfig {
            preserve_order: true,
            sort_tokens: false,
            prefixes: IndexMap::new(),
            global_prefix: String::new(),
            keep_references: false,
            output_color_format: ColorFormat::Auto,
        }
    }
}

impl ResolveConfig {
    /// Whether flattened keys should be sorted lexicographically
    pub fn should_sort(&self) -> bool {
        self.sort_tokens || !self.preserve_order
    }

    /// Emitter-facing name prefix, `"<globalPrefix>-"` or empty
    pub fn name_prefix(&self) -> String {
        if self.global_prefix.is_empty() {
            String::new()
        } else {
            format!("{}-", self.global_prefix)
        }
    }
}
