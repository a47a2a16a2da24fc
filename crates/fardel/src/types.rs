//! Shared type definitions for the fardel crate
//!
//! This module contains common types that are used across multiple components
//! of the assembler, ensuring consistency and avoiding circular dependencies.

use std::fmt;
use std::hash::BuildHasherDefault;

use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxHasher;
use serde::{Deserialize, Serialize};

/// Type alias for `FxHasher`-based `IndexMap`
pub type FxIndexMap<K, V> = IndexMap<K, V, BuildHasherDefault<FxHasher>>;

/// Type alias for `FxHasher`-based `IndexSet`
pub type FxIndexSet<T> = IndexSet<T, BuildHasherDefault<FxHasher>>;

/// Stable identifier of one node in a structural tree.
///
/// Node ids are assigned by the indexing pass (or left as [`NodeId::DUMMY`]
/// for synthetic nodes) and survive cloning and splicing, which makes them
/// usable as rewrite-target addresses: a dependency call site recorded against
/// a module body keeps its id after that body has been moved into the output
/// tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// Id used for synthetic nodes that never act as rewrite targets.
    pub const DUMMY: NodeId = NodeId(u32::MAX);

    /// Create a node id from a raw index.
    pub const fn new(index: u32) -> Self {
        NodeId(index)
    }

    /// Raw index value.
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Whether this is the synthetic dummy id.
    pub const fn is_dummy(self) -> bool {
        self.0 == u32::MAX
    }
}

impl Default for NodeId {
    fn default() -> Self {
        NodeId::DUMMY
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_dummy() {
            write!(f, "<dummy>")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Registry key of one module, and the literal value substituted into sibling
/// require call sites.
///
/// Uids are opaque to the assembler: it never derives meaning from them, it
/// only copies them into key slots and argument literals. Both integer and
/// string uids are accepted because upstream resolution stages number modules
/// either way.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Uid {
    /// Numeric uid, e.g. a dense counter assigned during resolution.
    Int(u64),
    /// String uid, e.g. a canonical module name.
    Str(String),
}

impl From<u64> for Uid {
    fn from(value: u64) -> Self {
        Uid::Int(value)
    }
}

impl From<&str> for Uid {
    fn from(value: &str) -> Self {
        Uid::Str(value.to_owned())
    }
}

impl From<String> for Uid {
    fn from(value: String) -> Self {
        Uid::Str(value)
    }
}

impl fmt::Display for Uid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Uid::Int(n) => write!(f, "{n}"),
            Uid::Str(s) => write!(f, "{s}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dummy_node_id_is_recognizable() {
        assert!(NodeId::DUMMY.is_dummy());
        assert!(!NodeId::new(0).is_dummy());
        assert_eq!(NodeId::new(7).as_u32(), 7);
    }

    #[test]
    fn uid_deserializes_from_both_literal_forms() {
        let n: Uid = serde_json::from_str("3").expect("integer uid");
        let s: Uid = serde_json::from_str("\"utils/dom\"").expect("string uid");
        assert_eq!(n, Uid::Int(3));
        assert_eq!(s, Uid::Str("utils/dom".into()));
    }

    #[test]
    fn uid_display_is_plain() {
        assert_eq!(Uid::Int(12).to_string(), "12");
        assert_eq!(Uid::from("app").to_string(), "app");
    }
}
