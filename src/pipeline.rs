//! Config-driven transform pipeline
//!
//! A `tokens.config.json` lists transforms. Each transform reads every token
//! file under its `from` directory, resolves them as one namespace and writes
//! one file per requested output format.

use crate::emit::{Format, OutputWriter};
use crate::error::TokenError;
use crate::resolve::{GlobalNamespace, TokenSource};
use crate::types::ResolveConfig;
use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// File name searched for when no config path is given
pub const CONFIG_FILE_NAME: &str = "tokens.config.json";

const TOKEN_FILE_SUFFIXES: &[&str] = &[".tokens.json", ".tokens"];

/// Top-level config file
#[derive(Debug, Clone, Deserialize)]
pub struct TokensConfig {
    #[serde(flatten)]
    pub resolve: ResolveConfig,
    pub transforms: Vec<Transform>,
}

/// One input directory and the outputs rendered from it
#[derive(Debug, Clone, Deserialize)]
pub struct Transform {
    /// When set, all tokens go to a single `<name>.tokens.<as>` per output
    #[serde(default)]
    pub name: Option<String>,
    pub from: PathBuf,
    pub to: Vec<Output>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Output {
    #[serde(rename = "as")]
    pub format: String,
    pub to: PathBuf,
}

/// Search `root` recursively for [`CONFIG_FILE_NAME`]
pub fn find_config(root: &Path) -> crate::error::Result<PathBuf> {
    let mut found: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && e.file_name() == CONFIG_FILE_NAME)
        .map(|e| e.into_path())
        .collect();
    found.sort();
    found
        .into_iter()
        .next()
        .ok_or_else(|| TokenError::ConfigNotFound(root.to_path_buf()))
}

pub fn load_config(path: &Path) -> Result<TokensConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    let raw: Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config: {}", path.display()))?;

    if !raw.get("transforms").is_some_and(Value::is_array) {
        return Err(TokenError::InvalidConfig("'transforms' must be an array".to_string()).into());
    }

    let config = serde_json::from_value(raw).map_err(|e| TokenError::InvalidConfig(e.to_string()))?;
    Ok(config)
}

/// Token files under `dir`, sorted by path
pub fn discover_token_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir) {
        let entry = entry.with_context(|| format!("Failed to read token directory: {}", dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let is_token_file = {
            let name = entry.file_name().to_string_lossy();
            TOKEN_FILE_SUFFIXES.iter().any(|suffix| name.ends_with(suffix))
        };
        if is_token_file {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

/// `colors.tokens.json` → `colors`
pub fn source_name(path: &Path) -> String {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    match file_name.split_once('.') {
        Some((stem, _)) => stem.to_string(),
        None => file_name,
    }
}

/// Parse a token file; a blank file reads as an empty document
pub fn read_token_file(path: &Path) -> Result<Value> {
    let mut content = std::fs::read(path)
        .with_context(|| format!("Failed to read token file: {}", path.display()))?;

    if content.iter().all(u8::is_ascii_whitespace) {
        log::debug!("{} is empty", path.display());
        return Ok(Value::Object(Map::new()));
    }

    let fallback = content.clone();
    match simd_json::serde::from_slice::<Value>(&mut content) {
        Ok(value) => Ok(value),
        Err(_) => serde_json::from_slice(&fallback)
            .with_context(|| format!("Failed to parse token file: {}", path.display())),
    }
}

/// Run one transform, returning the paths written
pub fn run_transform(transform: &Transform, config: &ResolveConfig) -> Result<Vec<PathBuf>> {
    let formats = transform
        .to
        .iter()
        .map(|output| Ok((output.format.parse::<Format>()?, output)))
        .collect::<std::result::Result<Vec<_>, TokenError>>()?;

    let mut sources = Vec::new();
    for path in discover_token_files(&transform.from)? {
        let document = read_token_file(&path)?;
        sources.push(TokenSource::new(source_name(&path), document));
    }
    log::info!("Loaded {} token files from {}", sources.len(), transform.from.display());

    let namespace = GlobalNamespace::build(&sources, config)
        .with_context(|| format!("Failed to build tokens from {}", transform.from.display()))?;
    let resolved = namespace
        .resolve(config)
        .with_context(|| format!("Failed to resolve tokens from {}", transform.from.display()))?;

    let mut written = Vec::new();
    for (format, output) in formats {
        let mut writer = OutputWriter::new(&output.to)?;
        match &transform.name {
            Some(name) => {
                let code = format.render(&resolved.pairs, name, config)?;
                writer.write(name, &output.format, &code)?;
            }
            None => {
                for source in namespace.split_by_source(&resolved.pairs) {
                    let code = format.render(&source.table, &source.name, config)?;
                    writer.write(&source.name, &output.format, &code)?;
                }
            }
        }
        written.extend_from_slice(writer.written());
    }

    Ok(written)
}

/// Load the config (or find one under the working directory) and run every
/// transform in order, stopping at the first failure.
pub fn transform(config_path: Option<&Path>) -> Result<Vec<PathBuf>> {
    let config_path = match config_path {
        Some(path) => path.to_path_buf(),
        None => find_config(Path::new("."))?,
    };
    log::info!("Using config {}", config_path.display());

    let config = load_config(&config_path)?;
    let mut written = Vec::new();
    for (index, t) in config.transforms.iter().enumerate() {
        let paths = run_transform(t, &config.resolve)
            .with_context(|| format!("Transform #{} failed", index + 1))?;
        log::info!("Transform #{} wrote {} files", index + 1, paths.len());
        written.extend(paths);
    }

    Ok(written)
}
