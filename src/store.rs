//! Thread-safe configuration store
//!
//! Values are organised in sections, each holding unique labels mapped to
//! opaque text. Every operation takes the lock once, so a single call is
//! atomic, and every read hands back an independent copy.

use indexmap::{IndexMap, IndexSet};
use parking_lot::RwLock;
use std::sync::Arc;

/// Labels of one section mapped to their values (preserves insertion order)
pub type Section = IndexMap<String, String>;

/// Section names mapped to their contents (preserves insertion order)
pub type Table = IndexMap<String, Section>;

/// Shared handle to a section/label/value table.
///
/// Cloning the handle does not copy the table: all clones observe and modify
/// the same contents. Use [`ConfigStore::snapshot`] for a detached copy.
#[derive(Debug, Clone, Default)]
pub struct ConfigStore {
    inner: Arc<RwLock<Table>>,
}

impl ConfigStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding a copy of `table`
    pub fn from_table(table: Table) -> Self {
        Self {
            inner: Arc::new(RwLock::new(table)),
        }
    }

    /// Returns the value of `label` in `section`, or an empty string
    pub fn get(&self, section: &str, label: &str) -> String {
        self.lookup(section, label).unwrap_or_default()
    }

    /// Returns the value of `label` in `section` if it exists
    pub fn lookup(&self, section: &str, label: &str) -> Option<String> {
        self.inner
            .read()
            .get(section)
            .and_then(|labels| labels.get(label))
            .cloned()
    }

    /// Assigns `value` to `label` in `section`, replacing any previous value
    pub fn set(&self, section: &str, label: &str, value: &str) {
        let mut table = self.inner.write();
        set_locked(&mut table, section, label, value.to_string());
    }

    /// Appends `value` to `label` in `section`.
    ///
    /// The result is `old + separator + value`. When the label has no value
    /// yet, or its value is empty, this behaves like [`ConfigStore::set`].
    pub fn append_value(&self, section: &str, label: &str, value: &str, separator: &str) {
        let mut table = self.inner.write();
        let combined = match table.get(section).and_then(|labels| labels.get(label)) {
            Some(current) if !current.is_empty() => {
                let mut combined =
                    String::with_capacity(current.len() + separator.len() + value.len());
                combined.push_str(current);
                combined.push_str(separator);
                combined.push_str(value);
                combined
            }
            _ => value.to_string(),
        };
        set_locked(&mut table, section, label, combined);
    }

    /// Replaces the contents of `section` with a copy of `labels`
    pub fn replace_section(&self, section: &str, labels: &Section) {
        let copy = labels.clone();
        self.inner.write().insert(section.to_string(), copy);
    }

    /// Replaces the whole table with a copy of `table`
    pub fn replace_all(&self, table: &Table) {
        let copy = table.clone();
        *self.inner.write() = copy;
    }

    /// Returns the names of all sections
    pub fn sections(&self) -> IndexSet<String> {
        self.inner.read().keys().cloned().collect()
    }

    /// Returns the labels of `section`, empty if the section does not exist
    pub fn labels(&self, section: &str) -> IndexSet<String> {
        self.inner
            .read()
            .get(section)
            .map(|labels| labels.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Returns a copy of one section
    pub fn section(&self, section: &str) -> Option<Section> {
        self.inner.read().get(section).cloned()
    }

    /// Returns true if `section` exists
    pub fn contains_section(&self, section: &str) -> bool {
        self.inner.read().contains_key(section)
    }

    /// Returns a deep copy of the full table
    pub fn snapshot(&self) -> Table {
        self.inner.read().clone()
    }

    /// Returns true if the store holds no sections
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Removes every section
    pub fn clear(&self) {
        self.inner.write().clear();
    }
}

impl From<Table> for ConfigStore {
    fn from(table: Table) -> Self {
        Self::from_table(table)
    }
}

fn set_locked(table: &mut Table, section: &str, label: &str, value: String) {
    match table.get_mut(section) {
        Some(labels) => {
            labels.insert(label.to_string(), value);
        }
        None => {
            let mut labels = Section::new();
            labels.insert(label.to_string(), value);
            table.insert(section.to_string(), labels);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(set: IndexSet<String>) -> Vec<String> {
        let mut names: Vec<String> = set.into_iter().collect();
        names.sort();
        names
    }

    #[test]
    fn test_replace_all_and_snapshot() {
        let store = ConfigStore::new();
        let mut table = Table::new();
        table.insert(
            "S0".to_string(),
            Section::from([
                ("L0".to_string(), "V0".to_string()),
                ("L1".to_string(), "V1".to_string()),
            ]),
        );
        table.insert(
            "S1".to_string(),
            Section::from([("L0".to_string(), "V0".to_string())]),
        );

        store.replace_all(&table);
        assert_eq!(store.snapshot(), table);
    }

    #[test]
    fn test_set_and_get() {
        let store = ConfigStore::new();
        assert_eq!(store.get("A", "B"), "");
        assert_eq!(store.lookup("A", "B"), None);

        store.set("A", "B", "C");
        assert_eq!(store.get("A", "B"), "C");
        assert_eq!(store.lookup("A", "B"), Some("C".to_string()));

        store.set("A", "B", "D");
        assert_eq!(store.get("A", "B"), "D");
    }

    #[test]
    fn test_append_value() {
        let store = ConfigStore::new();
        store.append_value("S0", "L0", "A", "");
        assert_eq!(store.get("S0", "L0"), "A");

        store.append_value("S0", "L0", "B", "");
        assert_eq!(store.get("S0", "L0"), "AB");

        store.append_value("S0", "L0", "C", ", ");
        assert_eq!(store.get("S0", "L0"), "AB, C");
    }

    #[test]
    fn test_append_onto_empty_value_has_no_separator() {
        let store = ConfigStore::new();
        store.set("S", "L", "");
        store.append_value("S", "L", "X", " ");
        assert_eq!(store.get("S", "L"), "X");
    }

    #[test]
    fn test_labels() {
        let store = ConfigStore::new();
        store.set("S1", "L1", "V1");
        store.set("S1", "L2", "V2");

        assert_eq!(sorted(store.labels("S1")), vec!["L1", "L2"]);
        assert!(store.labels("missing").is_empty());
    }

    #[test]
    fn test_replace_section() {
        let store = ConfigStore::new();
        store.set("A", "old", "gone");
        store.replace_section(
            "A",
            &Section::from([
                ("B".to_string(), "C".to_string()),
                ("D".to_string(), "E".to_string()),
            ]),
        );

        assert_eq!(store.get("A", "B"), "C");
        assert_eq!(store.get("A", "D"), "E");
        assert_eq!(store.lookup("A", "old"), None);
    }

    #[test]
    fn test_sections() {
        let store = ConfigStore::new();
        store.set("A", "B", "C");
        store.set("1", "2", "3");

        assert_eq!(sorted(store.sections()), vec!["1", "A"]);
        assert!(store.contains_section("A"));
        assert!(!store.contains_section("B"));
    }

    #[test]
    fn test_reads_are_detached_copies() {
        let store = ConfigStore::new();
        store.set("S", "L", "V");

        let mut snapshot = store.snapshot();
        snapshot["S"].insert("L".to_string(), "changed".to_string());
        assert_eq!(store.get("S", "L"), "V");

        let mut section = store.section("S").unwrap();
        section.clear();
        assert_eq!(store.labels("S").len(), 1);
    }

    #[test]
    fn test_clones_share_contents() {
        let store = ConfigStore::new();
        let handle = store.clone();
        handle.set("S", "L", "V");
        assert_eq!(store.get("S", "L"), "V");

        store.clear();
        assert!(handle.is_empty());
    }
}
