//! Adapter-local registry of tool metadata.
//!
//! Distinct from whatever registry the engine keeps; this one only knows the
//! tools registered through [`ToolSandbox`](crate::ToolSandbox).

use std::sync::Mutex;

use indexmap::IndexMap;
use serde::Serialize;

use crate::signature::{ParameterDescriptor, Signature};

/// Metadata stored for a registered tool.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ToolRecord {
    /// Name the tool is exposed under.
    pub name: String,
    /// Parameters in declaration order.
    pub parameters: Vec<ParameterDescriptor>,
    /// Declared return type label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_type_label: Option<String>,
    /// Documentation text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

impl ToolRecord {
    /// Builds a record from an inspected signature.
    #[must_use]
    pub fn new(name: impl Into<String>, signature: Signature, doc: Option<String>) -> Self {
        Self {
            name: name.into(),
            parameters: signature.parameters,
            return_type_label: signature.return_type_label,
            doc,
        }
    }
}

/// Name-keyed, insertion-ordered tool metadata.
///
/// Re-registering a name replaces its record but keeps the position of the
/// first registration.
#[derive(Default)]
pub struct ToolRegistry {
    inner: Mutex<IndexMap<String, ToolRecord>>,
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock().expect("tool registry poisoned");
        let names: Vec<_> = inner.keys().cloned().collect();
        f.debug_struct("ToolRegistry")
            .field("registered", &names)
            .finish()
    }
}

impl ToolRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `record`, returning `true` if it replaced an existing one.
    ///
    /// # Panics
    ///
    /// Panics if the internal registry lock is poisoned.
    pub fn put(&self, record: ToolRecord) -> bool {
        let mut inner = self.inner.lock().expect("tool registry poisoned");
        inner.insert(record.name.clone(), record).is_some()
    }

    /// Returns the record stored under `name`.
    ///
    /// # Panics
    ///
    /// Panics if the internal registry lock is poisoned.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<ToolRecord> {
        let inner = self.inner.lock().expect("tool registry poisoned");
        inner.get(name).cloned()
    }

    /// Drops the record stored under `name`, keeping the order of the rest.
    ///
    /// # Panics
    ///
    /// Panics if the internal registry lock is poisoned.
    pub fn remove(&self, name: &str) -> Option<ToolRecord> {
        let mut inner = self.inner.lock().expect("tool registry poisoned");
        inner.shift_remove(name)
    }

    /// Snapshot of every record in iteration order.
    ///
    /// # Panics
    ///
    /// Panics if the internal registry lock is poisoned.
    #[must_use]
    pub fn get_all(&self) -> Vec<ToolRecord> {
        let inner = self.inner.lock().expect("tool registry poisoned");
        inner.values().cloned().collect()
    }

    /// Number of registered tools.
    ///
    /// # Panics
    ///
    /// Panics if the internal registry lock is poisoned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().expect("tool registry poisoned").len()
    }

    /// Returns `true` when no tools are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, doc: &str) -> ToolRecord {
        ToolRecord::new(name, Signature::default(), Some(doc.to_owned()))
    }

    #[test]
    fn put_and_get_round_trip() {
        let registry = ToolRegistry::new();
        assert!(registry.is_empty());

        assert!(!registry.put(record("echo", "Echo input")));
        let stored = registry.get("echo").unwrap();
        assert_eq!(stored.doc.as_deref(), Some("Echo input"));
        assert!(registry.get("missing").is_none());
    }

    #[test]
    fn get_all_preserves_insertion_order() {
        let registry = ToolRegistry::new();
        for name in ["zeta", "alpha", "mid"] {
            registry.put(record(name, ""));
        }

        let names: Vec<_> = registry.get_all().into_iter().map(|r| r.name).collect();
        assert_eq!(names, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn overwrite_keeps_first_position_and_latest_content() {
        let registry = ToolRegistry::new();
        registry.put(record("first", "v1"));
        registry.put(record("second", "v1"));

        assert!(registry.put(record("first", "v2")));

        let all = registry.get_all();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "first");
        assert_eq!(all[0].doc.as_deref(), Some("v2"));
        assert_eq!(all[1].name, "second");
    }

    #[test]
    fn remove_keeps_remaining_order() {
        let registry = ToolRegistry::new();
        for name in ["a", "b", "c"] {
            registry.put(record(name, ""));
        }

        assert_eq!(registry.remove("b").map(|r| r.name).as_deref(), Some("b"));
        assert!(registry.remove("b").is_none());

        let names: Vec<_> = registry.get_all().into_iter().map(|r| r.name).collect();
        assert_eq!(names, ["a", "c"]);
    }
}
