//! User preferences that steer plan generation
//!
//! Out-of-range or unrecognized values are clamped or ignored with a
//! warning, never rejected.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_MAX_RETRIES: u32 = 5;
pub const MIN_RETRIES: u32 = 1;
pub const MAX_RETRIES: u32 = 50;

pub const DEFAULT_BAIT_TARGET: &str = "a designated character";
pub const DEFAULT_BAIT_CONDITION: &str = "a qualifying enemy attack";

/// Which branch of a stable/aggressive plan pair the player picked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanChoice {
    /// Option A: no reroll, steady clear
    Stable,
    /// Option B: minimum rounds, may rely on rerolls
    Aggressive,
}

impl PlanChoice {
    pub fn label(self) -> &'static str {
        match self {
            PlanChoice::Stable => "A",
            PlanChoice::Aggressive => "B",
        }
    }
}

impl fmt::Display for PlanChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PlanChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "a" | "stable" | "safe" | "0" => Ok(PlanChoice::Stable),
            "b" | "aggressive" | "extreme" | "reroll" | "1" => Ok(PlanChoice::Aggressive),
            other => Err(format!("Unknown plan option: {}", other)),
        }
    }
}

fn lenient_choice<'de, D>(deserializer: D) -> Result<Option<PlanChoice>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw
        .filter(|s| !s.trim().is_empty())
        .and_then(|s| match s.parse::<PlanChoice>() {
            Ok(choice) => Some(choice),
            Err(e) => {
                tracing::warn!("{} - no option preselected", e);
                None
            }
        }))
}

/// Bait settings for reroll plans
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RerollSettings {
    pub bait_target: Option<String>,
    pub bait_condition: Option<String>,
    pub max_retries: u32,
}

impl Default for RerollSettings {
    fn default() -> Self {
        Self {
            bait_target: None,
            bait_condition: None,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

impl RerollSettings {
    pub fn bait_target(&self) -> String {
        non_blank(self.bait_target.as_deref()).unwrap_or(DEFAULT_BAIT_TARGET).to_string()
    }

    pub fn bait_condition(&self) -> String {
        non_blank(self.bait_condition.as_deref())
            .unwrap_or(DEFAULT_BAIT_CONDITION)
            .to_string()
    }

    /// Retry budget clamped into `[MIN_RETRIES, MAX_RETRIES]`
    pub fn max_retries(&self) -> u32 {
        self.max_retries.clamp(MIN_RETRIES, MAX_RETRIES)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Whether plans that rely on restarting the encounter may be offered
    pub allow_reroll: bool,
    #[serde(deserialize_with = "lenient_choice")]
    pub selected_option: Option<PlanChoice>,
    /// Index into the generated plan list used when a battle starts
    pub plan_choice: Option<usize>,
    /// Environment buffs of a high-difficulty stage
    pub abyss_buffs: Vec<String>,
    #[serde(alias = "reroll_settings")]
    pub reroll: RerollSettings,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            allow_reroll: true,
            selected_option: None,
            plan_choice: None,
            abyss_buffs: Vec::new(),
            reroll: RerollSettings::default(),
        }
    }
}

impl Preferences {
    pub fn stable_only() -> Self {
        Self {
            allow_reroll: false,
            ..Default::default()
        }
    }

    pub fn aggressive() -> Self {
        Self {
            allow_reroll: true,
            selected_option: Some(PlanChoice::Aggressive),
            ..Default::default()
        }
    }

    /// The aggressive branch counts only when rerolls are allowed
    pub fn aggressive_selected(&self) -> bool {
        self.allow_reroll && self.selected_option == Some(PlanChoice::Aggressive)
    }

    /// Clamp a plan index into `[0, plan_count)`
    pub fn plan_index(&self, plan_count: usize) -> usize {
        let last = plan_count.saturating_sub(1);
        match self.plan_choice {
            Some(index) if index > last => {
                tracing::warn!(
                    "plan_choice {} out of range, using {} of {} plans",
                    index,
                    last,
                    plan_count
                );
                last
            }
            Some(index) => index,
            None => 0,
        }
    }

    /// Human-readable notes for every value that will be clamped
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        let retries = self.reroll.max_retries;
        if retries != self.reroll.max_retries() {
            warnings.push(format!(
                "reroll.max_retries ({}) clamped to {}",
                retries,
                self.reroll.max_retries()
            ));
        }
        if self.selected_option == Some(PlanChoice::Aggressive) && !self.allow_reroll {
            warnings.push(
                "selected_option is B but allow_reroll is false; the stable plan will be used"
                    .into(),
            );
        }
        warnings
    }
}
