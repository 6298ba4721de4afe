//! Key-value persistence for planning results and battle records
//!
//! Components receive a store handle explicitly; there is no global
//! instance. Payloads are JSON values, so any serializable record can be
//! stored under a name and loaded back.

pub mod file;
pub mod memory;

pub use file::FileMemoryStore;
pub use memory::InMemoryStore;

use crate::core::error::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Well-known entry names
pub mod keys {
    pub const CHARACTERS: &str = "characters";
    pub const ENEMY: &str = "enemy";
    pub const COMPUTED: &str = "computed";
    pub const PREFERENCES: &str = "preferences";
    pub const STRATEGY_PLAN: &str = "strategy_plan";
    pub const PLANNING_SUMMARY: &str = "planning_summary";
    pub const SELECTED_PLAN: &str = "selected_plan";
    pub const AI_STRATEGY_TEXT: &str = "ai_strategy_text";
    pub const BATTLE_STATS: &str = "battle_stats";
    pub const BATTLE_RECORD_PREFIX: &str = "battle_record_";

    /// Unique per call, so repeated battles never share a key
    pub fn battle_record(timestamp_millis: u64) -> String {
        format!(
            "{}{}_{}",
            BATTLE_RECORD_PREFIX,
            timestamp_millis,
            uuid::Uuid::new_v4().simple()
        )
    }
}

/// Save/load capability shared by the planner and the decision loop
pub trait MemoryStore: Send + Sync {
    /// Store `data` under `name`, returning a location token
    fn save(&self, name: &str, data: &Value) -> Result<String>;

    /// Load the payload stored under `name`
    fn load(&self, name: &str) -> Result<Option<Value>>;

    /// Names of every stored entry, sorted
    fn list(&self) -> Result<Vec<String>>;

    fn exists(&self, name: &str) -> bool {
        matches!(self.load(name), Ok(Some(_)))
    }
}

/// Serialize and save a typed record
pub fn save_record<T: Serialize + ?Sized>(
    store: &dyn MemoryStore,
    name: &str,
    record: &T,
) -> Result<String> {
    let value = serde_json::to_value(record)?;
    store.save(name, &value)
}

/// Load and deserialize a typed record
pub fn load_record<T: DeserializeOwned>(store: &dyn MemoryStore, name: &str) -> Result<Option<T>> {
    match store.load(name)? {
        Some(value) => Ok(Some(serde_json::from_value(value)?)),
        None => Ok(None),
    }
}

/// Accept names that are already filesystem-safe: `[A-Za-z0-9_.-]`, not
/// starting with a dot. Nothing is rewritten, so two names never share a file.
pub(crate) fn validate_name(name: &str) -> Option<&str> {
    let safe = !name.is_empty()
        && !name.starts_with('.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    safe.then_some(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Record {
        rounds: u32,
        result: String,
    }

    #[test]
    fn test_validate_name() {
        assert_eq!(validate_name("characters"), Some("characters"));
        assert_eq!(validate_name("battle_record_17_ab-c.v2"), Some("battle_record_17_ab-c.v2"));
        assert_eq!(validate_name("a_b"), Some("a_b"));
        assert_eq!(validate_name("a b"), None);
        assert_eq!(validate_name(" a_b"), None);
        assert_eq!(validate_name("../etc/passwd"), None);
        assert_eq!(validate_name("   "), None);
        assert_eq!(validate_name(""), None);
        assert_eq!(validate_name(".."), None);
    }

    #[test]
    fn test_battle_record_keys_are_valid_names() {
        let key = keys::battle_record(1_700_000_000_000);
        assert_eq!(validate_name(&key), Some(key.as_str()));
    }

    #[test]
    fn test_battle_record_keys_are_unique() {
        let a = keys::battle_record(1_700_000_000_000);
        let b = keys::battle_record(1_700_000_000_000);
        assert!(a.starts_with("battle_record_1700000000000_"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_typed_helpers() {
        let store = InMemoryStore::new();
        let record = Record {
            rounds: 3,
            result: "victory".into(),
        };
        save_record(&store, "last", &record).unwrap();
        let loaded: Option<Record> = load_record(&store, "last").unwrap();
        assert_eq!(loaded, Some(record));

        let missing: Option<Record> = load_record(&store, "nothing").unwrap();
        assert!(missing.is_none());
        assert!(store.exists("last"));
        assert!(!store.exists("nothing"));
    }

    #[test]
    fn test_typed_load_mismatch_is_error() {
        let store = InMemoryStore::new();
        store.save("last", &serde_json::json!("text")).unwrap();
        assert!(load_record::<Record>(&store, "last").is_err());
    }
}
