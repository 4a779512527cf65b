use crate::emit::convert_if_color;
use crate::error::Result;
use crate::types::{FlatTable, ResolveConfig};
use serde::Serialize;
use serde_json::{Map, Value};

/// Render tokens as tab-indented flat JSON
pub fn to_json(tokens: &FlatTable, config: &ResolveConfig) -> Result<String> {
    let prefix = config.name_prefix();
    let mut out = Map::new();
    for (key, value) in tokens {
        out.insert(format!("{}{}", prefix, key), convert_if_color(key, value, config));
    }

    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    Value::Object(out).serialize(&mut serializer)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
