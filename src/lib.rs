//! # design-tokens - Design Token Resolution Engine
//!
//! Turns nested design-token documents (`$value`, `$type`, `$extends`,
//! `{group.token}` references and `$ref` JSON Pointers) into flat, uniquely
//! named tables, and renders them as CSS, SCSS, ES modules, JSON or Tailwind
//! theme configuration.
//!
//! ## Modules
//!
//! - **resolve**: parsing, `$extends`, flattening, the global namespace and reference resolution
//! - **emit**: output formats and the file writer
//! - **pipeline**: the `tokens.config.json` driven transform
//! - **color**: color parsing and notation conversion
//!
//! ## Quick Start
//!
//! ```rust
//! use design_tokens::resolve::{GlobalNamespace, TokenSource};
//! use design_tokens::ResolveConfig;
//! use serde_json::json;
//!
//! # fn main() -> anyhow::Result<()> {
//! let colors = json!({
//!     "color": {
//!         "primary": {"$value": "#0066cc"},
//!         "link": {"$value": "{color.primary}"}
//!     }
//! });
//!
//! let config = ResolveConfig::default();
//! let namespace = GlobalNamespace::build(&[TokenSource::new("colors", colors)], &config)?;
//! let resolved = namespace.resolve(&config)?;
//!
//! assert_eq!(resolved.pairs["color-link"], "#0066cc");
//! # Ok(())
//! # }
//! ```

use serde_json::Value;

pub mod color;
pub mod emit;
pub mod error;
pub mod pipeline;
pub mod resolve;
pub mod types;

// Re-export commonly used types for convenience
pub use color::ColorFormat;
pub use emit::Format;
pub use error::{Result, TokenError};
pub use pipeline::{transform, TokensConfig};
pub use types::{FlatTable, ResolveConfig};

/// Resolve a single token document into its flat table
pub fn resolve_document(document: Value, config: &ResolveConfig) -> Result<FlatTable> {
    let namespace = resolve::GlobalNamespace::build(&[resolve::TokenSource::new("tokens", document)], config)?;
    Ok(namespace.resolve(config)?.pairs)
}
