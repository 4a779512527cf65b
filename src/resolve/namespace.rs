//! Global token namespace for one run
//!
//! Built in two phases: every source is parsed and flattened on its own, then
//! the flat tables are merged into one global table. A key produced by more
//! than one source is fatal.

use crate::error::{Result, TokenError};
use crate::resolve::document::TokenDocument;
use crate::resolve::flatten::TokenFlattener;
use crate::resolve::graph::{DeferredTokens, ReferenceGraph};
use crate::types::{FlatTable, ResolveConfig};
use serde_json::{Map, Value};
use std::collections::HashSet;

/// One input token document
#[derive(Debug, Clone)]
pub struct TokenSource {
    /// Short name used for per-source output, e.g. `colors` for `colors.tokens.json`
    pub name: String,
    pub document: Value,
}

impl TokenSource {
    pub fn new(name: impl Into<String>, document: Value) -> Self {
        TokenSource {
            name: name.into(),
            document,
        }
    }
}

/// A source's flattened entries
#[derive(Debug, Clone)]
pub struct SourceTable {
    pub name: String,
    pub table: FlatTable,
}

/// Resolved values of a run, plus dependency data in deferred mode
#[derive(Debug, Clone)]
pub struct ResolvedTokens {
    pub pairs: FlatTable,
    pub deferred: Option<DeferredTokens>,
}

/// The merged, collision-free view of every source in a run
#[derive(Debug, Clone)]
pub struct GlobalNamespace {
    pub sources: Vec<SourceTable>,

    /// Union of all source tables, in source order
    pub table: FlatTable,

    /// All source documents merged, used to resolve `$ref` pointers
    pub document: Value,
}

impl GlobalNamespace {
    pub fn build(sources: &[TokenSource], config: &ResolveConfig) -> Result<Self> {
        let mut document = Value::Object(Map::new());
        for source in sources {
            merge_json(&mut document, &source.document);
        }
        let full_document = TokenDocument::from_value(&document)?;

        let flattener = TokenFlattener::new(config.clone());
        let mut tables = Vec::with_capacity(sources.len());
        for source in sources {
            let parsed = TokenDocument::from_value(&source.document)?;
            let table = flattener.flatten(&parsed, &full_document)?;
            log::debug!("Flattened {} tokens from '{}'", table.len(), source.name);
            tables.push(SourceTable {
                name: source.name.clone(),
                table,
            });
        }

        let duplicates = find_duplicates(tables.iter().flat_map(|t| t.table.keys()));
        if !duplicates.is_empty() {
            return Err(TokenError::DuplicateKey { keys: duplicates });
        }

        let mut table = FlatTable::new();
        for source in &tables {
            table.extend(source.table.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        if config.should_sort() {
            table.sort_keys();
        }

        Ok(GlobalNamespace {
            sources: tables,
            table,
            document,
        })
    }

    pub fn graph(&self) -> ReferenceGraph<'_> {
        ReferenceGraph::new(&self.table, &self.document)
    }

    /// Resolve eagerly, or keep references when the config asks for it
    pub fn resolve(&self, config: &ResolveConfig) -> Result<ResolvedTokens> {
        let graph = self.graph();
        if config.keep_references {
            let deferred = graph.keep_references()?;
            Ok(ResolvedTokens {
                pairs: deferred.pairs.clone(),
                deferred: Some(deferred),
            })
        } else {
            Ok(ResolvedTokens {
                pairs: graph.resolve_all()?,
                deferred: None,
            })
        }
    }

    /// Split resolved pairs back per source, in resolved order
    pub fn split_by_source(&self, resolved: &FlatTable) -> Vec<SourceTable> {
        self.sources
            .iter()
            .map(|source| SourceTable {
                name: source.name.clone(),
                table: resolved
                    .iter()
                    .filter(|(key, _)| source.table.contains_key(*key))
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect(),
            })
            .collect()
    }
}

/// Every name that occurs more than once, reported once each in order of
/// first repetition.
pub fn find_duplicates<'a, I>(keys: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a String>,
{
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    let mut duplicates = Vec::new();
    for key in keys {
        if !seen.insert(key.as_str()) && reported.insert(key.as_str()) {
            duplicates.push(key.clone());
        }
    }
    duplicates
}

/// Deep-merge `overlay` into `base`; objects merge key by key, anything else replaces.
fn merge_json(base: &mut Value, overlay: &Value) {
    match (base, overlay) {
        (Value::Object(base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(key) {
                    Some(existing) => merge_json(existing, value),
                    None => {
                        base.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (base, overlay) => *base = overlay.clone(),
    }
}
