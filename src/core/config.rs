//! Planner configuration with documented defaults
//!
//! The TOML document is the loosely-typed outer boundary. Everything it
//! holds is converted into typed records before it reaches the engine.
//! Out-of-range values are clamped and reported by `validate`, never
//! rejected.

use crate::core::error::Result;
use crate::stats::{CharacterConfig, EnemyConfig};
use crate::strategy::{Preferences, StrategyMode};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_LLM_API_URL: &str = "https://api.anthropic.com/v1/messages";
pub const DEFAULT_LLM_MODEL: &str = "claude-3-haiku-20240307";

/// Reasoning collaborator settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Ask the advisor at all; off means every battle decision falls back
    pub enabled: bool,
    /// Falls back to `LLM_API_KEY`
    pub api_key: Option<String>,
    /// Falls back to `LLM_API_URL`, then the Anthropic messages endpoint
    pub api_url: Option<String>,
    /// Falls back to `LLM_MODEL`
    pub model: Option<String>,
    /// Upper bound on one planning advisory request
    pub timeout_secs: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_key: None,
            api_url: None,
            model: None,
            timeout_secs: 60,
        }
    }
}

impl AiConfig {
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| std::env::var("LLM_API_KEY").ok())
            .filter(|k| !k.trim().is_empty())
    }

    pub fn resolved_api_url(&self) -> String {
        self.api_url
            .clone()
            .or_else(|| std::env::var("LLM_API_URL").ok())
            .unwrap_or_else(|| DEFAULT_LLM_API_URL.into())
    }

    pub fn resolved_model(&self) -> String {
        self.model
            .clone()
            .or_else(|| std::env::var("LLM_MODEL").ok())
            .unwrap_or_else(|| DEFAULT_LLM_MODEL.into())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    /// Per-decision advisor timeout; a timeout is handled like any
    /// other reasoning failure
    pub decision_timeout_secs: u64,
    /// Rounds the CLI driver runs before ending the battle
    pub max_rounds: u32,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            decision_timeout_secs: 30,
            max_rounds: 30,
        }
    }
}

impl BattleConfig {
    pub fn decision_timeout(&self) -> Duration {
        Duration::from_secs(self.decision_timeout_secs.max(1))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub root: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("data/memory"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Strategy mode key; unknown keys fall back to material farming
    pub mode: String,
    pub preferences: Preferences,
    pub roster: Vec<CharacterConfig>,
    pub enemy: Option<EnemyConfig>,
    pub ai: AiConfig,
    pub battle: BattleConfig,
    pub storage: StorageConfig,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            mode: StrategyMode::MaterialFarm.key().into(),
            preferences: Preferences::default(),
            roster: Vec::new(),
            enemy: None,
            ai: AiConfig::default(),
            battle: BattleConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

impl PlannerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_toml_str(&text)?;
        tracing::info!(
            "Loaded config from {} ({} characters, mode {})",
            path.as_ref().display(),
            config.roster.len(),
            config.mode
        );
        Ok(config)
    }

    /// Human-readable warnings for values that will be clamped or ignored
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.mode.parse::<StrategyMode>().is_err() {
            warnings.push(format!(
                "mode '{}' is not recognized; material_farm will be used",
                self.mode
            ));
        }
        warnings.extend(self.preferences.validate());

        if self.ai.timeout_secs == 0 {
            warnings.push("ai.timeout_secs is 0; using 1 second".into());
        }
        if self.battle.decision_timeout_secs == 0 {
            warnings.push("battle.decision_timeout_secs is 0; using 1 second".into());
        }
        if self.battle.max_rounds == 0 {
            warnings.push("battle.max_rounds is 0; the battle command will not decide".into());
        }
        if self.ai.enabled && self.ai.resolved_api_key().is_none() {
            warnings.push("ai.enabled is set but no API key is configured".into());
        }

        warnings
    }
}
