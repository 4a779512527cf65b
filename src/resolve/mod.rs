//! Token resolution engine
//!
//! Turns nested design-token documents into one flat, uniquely keyed table:
//! `$extends` is resolved on the typed tree, the tree is flattened, tables
//! from every source are merged, and references are then either substituted
//! (eager) or kept in dependency order (deferred).

pub mod document;
pub mod extends;
pub mod flatten;
pub mod graph;
pub mod namespace;
pub mod path;
pub mod pointer;

pub use document::{Group, Token, TokenDocument, TokenNode, TokenValue};
pub use extends::resolve_extends;
pub use flatten::{flatten_json, TokenFlattener};
pub use graph::{find_true_values, keep_references, DeferredTokens, ReferenceGraph};
pub use namespace::{find_duplicates, GlobalNamespace, ResolvedTokens, SourceTable, TokenSource};
pub use path::{is_pointer_ref, parse_pointer, ref_to_name};
pub use pointer::{resolve_pointer, resolve_pointer_str};
