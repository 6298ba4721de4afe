//! In-process store for tests and dry runs

use std::collections::BTreeMap;
use std::sync::RwLock;

use serde_json::Value;

use crate::core::error::{PlannerError, Result};
use crate::storage::{validate_name, MemoryStore};

/// Thread-safe, not persistent across restarts
#[derive(Debug, Default)]
pub struct InMemoryStore {
    entries: RwLock<BTreeMap<String, Value>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned() -> PlannerError {
    PlannerError::Storage("store lock poisoned".into())
}

fn checked(name: &str) -> Result<&str> {
    validate_name(name)
        .ok_or_else(|| PlannerError::Storage(format!("Invalid entry name: '{}'", name)))
}

impl MemoryStore for InMemoryStore {
    fn save(&self, name: &str, data: &Value) -> Result<String> {
        let name = checked(name)?;
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        entries.insert(name.to_string(), data.clone());
        Ok(format!("memory://{}", name))
    }

    fn load(&self, name: &str) -> Result<Option<Value>> {
        let name = checked(name)?;
        let entries = self.entries.read().map_err(|_| poisoned())?;
        Ok(entries.get(name).cloned())
    }

    fn list(&self) -> Result<Vec<String>> {
        let entries = self.entries.read().map_err(|_| poisoned())?;
        Ok(entries.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_roundtrip_and_token() {
        let store = InMemoryStore::new();
        assert!(store.is_empty());
        let token = store.save("computed", &json!({"rounds": 3})).unwrap();
        assert_eq!(token, "memory://computed");
        assert_eq!(store.load("computed").unwrap(), Some(json!({"rounds": 3})));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_list_sorted() {
        let store = InMemoryStore::new();
        store.save("enemy", &json!(null)).unwrap();
        store.save("characters", &json!([])).unwrap();
        assert_eq!(store.list().unwrap(), vec!["characters", "enemy"]);
    }

    #[test]
    fn test_same_names_as_file_store() {
        let store = InMemoryStore::new();
        assert!(matches!(store.save("a b", &json!(1)), Err(PlannerError::Storage(_))));
        assert!(store.load("").is_err());
        assert!(!store.exists("a b"));
        assert!(store.is_empty());
    }
}
