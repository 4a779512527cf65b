//! Reference resolution over the global flat table
//!
//! Two modes:
//! - **eager** ([`ReferenceGraph::resolve_all`]): every `{a.b}` reference and
//!   every `$ref` pointer is replaced by the concrete value it leads to.
//! - **deferred** ([`ReferenceGraph::keep_references`]): pointers are still
//!   replaced, but `{a.b}` references are kept and the keys are returned in
//!   dependency order so emitters can declare targets before their users.

use crate::error::{Result, TokenError};
use crate::resolve::document::REF_KEY;
use crate::resolve::path::{is_pointer_ref, is_symbolic_ref, ref_to_name};
use crate::resolve::pointer::resolve_pointer_str;
use crate::types::FlatTable;
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Adjacency list keyed by flat key
pub type Adjacency = IndexMap<String, Vec<String>>;

/// Output of deferred resolution
#[derive(Debug, Clone, PartialEq)]
pub struct DeferredTokens {
    /// Values with pointers resolved and `{a.b}` references kept, in `order`
    pub pairs: FlatTable,

    /// Keys sorted so that every reference target precedes its users
    pub order: Vec<String>,

    /// key → keys it references
    pub dependencies: Adjacency,

    /// key → keys that reference it
    pub dependents: Adjacency,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    InProgress,
    Done,
}

/// Resolves references in a global flat table against the merged raw document
pub struct ReferenceGraph<'a> {
    table: &'a FlatTable,
    document: &'a Value,
}

impl<'a> ReferenceGraph<'a> {
    pub fn new(table: &'a FlatTable, document: &'a Value) -> Self {
        ReferenceGraph { table, document }
    }

    /// Replace every reference with its concrete value
    pub fn resolve_all(&self) -> Result<FlatTable> {
        self.table
            .keys()
            .map(|key| Ok((key.clone(), self.resolve_key(key)?)))
            .collect()
    }

    /// Fully resolve the value stored at `key`
    pub fn resolve_key(&self, key: &str) -> Result<Value> {
        let value = self.table.get(key).ok_or_else(|| TokenError::ReferenceNotFound {
            reference: key.to_string(),
            key: key.to_string(),
        })?;
        let mut chain = vec![key.to_string()];
        self.resolve_value(value, key, &mut chain, &mut Vec::new(), true)
    }

    /// Keep `{a.b}` references, ordered topologically
    pub fn keep_references(&self) -> Result<DeferredTokens> {
        let mut values = FlatTable::new();
        for (key, value) in self.table {
            let resolved = self.resolve_value(value, key, &mut Vec::new(), &mut Vec::new(), false)?;
            values.insert(key.clone(), resolved);
        }

        let mut dependencies: Adjacency = values.keys().map(|k| (k.clone(), Vec::new())).collect();
        let mut dependents: Adjacency = dependencies.clone();

        for (key, value) in &values {
            let Some(reference) = value.as_str().filter(|s| is_symbolic_ref(s)) else {
                continue;
            };
            let name = ref_to_name(reference);
            if !values.contains_key(&name) {
                return Err(TokenError::ReferenceNotFound {
                    reference: name,
                    key: key.clone(),
                });
            }
            dependencies[key].push(name.clone());
            dependents[&name].push(key.clone());
        }

        let mut marks: HashMap<&str, Mark> = HashMap::new();
        let mut order = Vec::with_capacity(values.len());
        for key in dependencies.keys() {
            visit(key, &dependencies, &mut marks, &mut order)?;
        }

        let mut pairs = FlatTable::with_capacity(values.len());
        for key in &order {
            if let Some(value) = values.swap_remove(key) {
                pairs.insert(key.clone(), value);
            }
        }

        Ok(DeferredTokens {
            pairs,
            order,
            dependencies,
            dependents,
        })
    }

    /// `chain` holds the symbolic keys on the current call stack and
    /// `pointers` the pointers being followed; both detect cycles.
    fn resolve_value(
        &self,
        value: &Value,
        owner: &str,
        chain: &mut Vec<String>,
        pointers: &mut Vec<String>,
        follow_symbolic: bool,
    ) -> Result<Value> {
        match value {
            Value::String(s) if follow_symbolic && is_symbolic_ref(s) => {
                let name = ref_to_name(s);
                let target = self.table.get(&name).ok_or_else(|| TokenError::ReferenceNotFound {
                    reference: name.clone(),
                    key: owner.to_string(),
                })?;
                if chain.contains(&name) {
                    return Err(TokenError::CircularReference { key: name });
                }
                chain.push(name.clone());
                let resolved = self.resolve_value(target, &name, chain, pointers, follow_symbolic);
                chain.pop();
                resolved
            }
            Value::Object(map) => {
                if let Some(pointer) = pointer_of(map) {
                    if pointers.iter().any(|p| p == pointer) {
                        return Err(TokenError::CircularReference {
                            key: pointer.to_string(),
                        });
                    }
                    let target = resolve_pointer_str(self.document, pointer)?;
                    pointers.push(pointer.to_string());
                    let resolved = self.resolve_value(target, owner, chain, pointers, follow_symbolic);
                    pointers.pop();
                    return resolved;
                }

                let mut resolved = Map::new();
                for (key, item) in map {
                    resolved.insert(key.clone(), self.resolve_value(item, owner, chain, pointers, follow_symbolic)?);
                }
                Ok(Value::Object(resolved))
            }
            Value::Array(items) => items
                .iter()
                .map(|item| self.resolve_value(item, owner, chain, pointers, follow_symbolic))
                .collect::<Result<Vec<_>>>()
                .map(Value::Array),
            other => Ok(other.clone()),
        }
    }
}

/// Eagerly resolve every reference in `table`
pub fn find_true_values(table: &FlatTable, document: &Value) -> Result<FlatTable> {
    ReferenceGraph::new(table, document).resolve_all()
}

/// Keep references, returning values in dependency order
pub fn keep_references(table: &FlatTable, document: &Value) -> Result<DeferredTokens> {
    ReferenceGraph::new(table, document).keep_references()
}

fn pointer_of(map: &Map<String, Value>) -> Option<&str> {
    map.get(REF_KEY).and_then(Value::as_str).filter(|s| is_pointer_ref(s))
}

fn visit<'k>(
    key: &'k str,
    dependencies: &'k Adjacency,
    marks: &mut HashMap<&'k str, Mark>,
    order: &mut Vec<String>,
) -> Result<()> {
    match marks.get(key) {
        Some(Mark::Done) => return Ok(()),
        Some(Mark::InProgress) => {
            return Err(TokenError::CircularReference { key: key.to_string() });
        }
        None => {}
    }

    marks.insert(key, Mark::InProgress);
    if let Some(targets) = dependencies.get(key) {
        for target in targets {
            visit(target, dependencies, marks, order)?;
        }
    }
    marks.insert(key, Mark::Done);
    order.push(key.to_string());
    Ok(())
}
