//! One JSON file per entry under a root directory

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::error::{PlannerError, Result};
use crate::storage::{validate_name, MemoryStore};

/// On-disk wrapper around every payload
#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    #[serde(rename = "_saved_at")]
    saved_at: u64,
    data: Value,
}

/// File-backed store writing `<root>/<name>.json`
///
/// Writes go to a temp file first and are renamed into place.
pub struct FileMemoryStore {
    root: PathBuf,
}

impl FileMemoryStore {
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn entry_path(&self, name: &str) -> Result<PathBuf> {
        let name = validate_name(name)
            .ok_or_else(|| PlannerError::Storage(format!("Invalid entry name: '{}'", name)))?;
        Ok(self.root.join(format!("{}.json", name)))
    }
}

fn unix_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

impl MemoryStore for FileMemoryStore {
    fn save(&self, name: &str, data: &Value) -> Result<String> {
        let path = self.entry_path(name)?;
        let temp_path = path.with_extension("json.tmp");

        let envelope = Envelope {
            saved_at: unix_seconds(),
            data: data.clone(),
        };
        let json = serde_json::to_string_pretty(&envelope)?;
        fs::write(&temp_path, json)?;
        fs::rename(&temp_path, &path)?;

        tracing::debug!("Saved entry '{}' to {}", name, path.display());
        Ok(path.display().to_string())
    }

    fn load(&self, name: &str) -> Result<Option<Value>> {
        let path = self.entry_path(name)?;
        if !path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&path)?;
        let value: Value = serde_json::from_str(&json)?;
        // Files written by hand may lack the envelope
        let payload = match serde_json::from_value::<Envelope>(value.clone()) {
            Ok(envelope) => envelope.data,
            Err(_) => value,
        };
        Ok(Some(payload))
    }

    fn list(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if let Some(name) = path
                .file_name()
                .and_then(|s| s.to_str())
                .and_then(|s| s.strip_suffix(".json"))
            {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}
