//! Characters, their loadouts and trace bonuses

use crate::core::types::Attribute;
use crate::stats::attributes::{BaseAttributes, EffectiveStats, RelicAttributeBlock};
use crate::stats::resolver::resolve_character;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single trace bonus
///
/// Flat bonuses are added first; percent bonuses then multiply the
/// running value of their attribute by `(1 + fraction)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TraceBonus {
    Flat { attribute: Attribute, amount: f64 },
    PercentOf { attribute: Attribute, fraction: f64 },
}

impl TraceBonus {
    pub fn attribute(&self) -> Attribute {
        match self {
            TraceBonus::Flat { attribute, .. } | TraceBonus::PercentOf { attribute, .. } => {
                *attribute
            }
        }
    }

    /// Convert a legacy `"atk_percent" = 0.18` style entry
    ///
    /// Keys ending in `_percent` or `_pct` become percent bonuses, any
    /// other known attribute key becomes a flat bonus. Unknown keys yield None.
    pub fn from_legacy(key: &str, value: f64) -> Option<Self> {
        let key = key.trim();
        let percent_base = key
            .strip_suffix("_percent")
            .or_else(|| key.strip_suffix("_pct"));

        match percent_base {
            Some(base) => base.parse::<Attribute>().ok().map(|attribute| TraceBonus::PercentOf {
                attribute,
                fraction: value,
            }),
            None => key.parse::<Attribute>().ok().map(|attribute| TraceBonus::Flat {
                attribute,
                amount: value,
            }),
        }
    }
}

/// Trace bonuses as they appear in configuration
///
/// Either a list of typed entries or the legacy string-keyed map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TraceInput {
    Typed(Vec<TraceBonus>),
    Legacy(BTreeMap<String, f64>),
}

impl Default for TraceInput {
    fn default() -> Self {
        TraceInput::Typed(Vec::new())
    }
}

impl TraceInput {
    pub fn to_bonuses(&self) -> Vec<TraceBonus> {
        match self {
            TraceInput::Typed(list) => list.clone(),
            TraceInput::Legacy(map) => map
                .iter()
                .filter_map(|(key, value)| {
                    let bonus = TraceBonus::from_legacy(key, *value);
                    if bonus.is_none() {
                        tracing::warn!("Ignoring unknown trace bonus key '{}'", key);
                    }
                    bonus
                })
                .collect(),
        }
    }
}

/// Equipped loadout (weapon-like item) with its own modifier block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Loadout {
    pub name: String,
    pub level: u32,
    pub superimpose: u32,
    pub stats: RelicAttributeBlock,
}

impl Default for Loadout {
    fn default() -> Self {
        Self {
            name: String::new(),
            level: 80,
            superimpose: 1,
            stats: RelicAttributeBlock::default(),
        }
    }
}

/// Loosely-typed character record at the configuration boundary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterConfig {
    pub name: String,
    pub element: String,
    pub path: String,
    pub level: u32,
    #[serde(alias = "eidolon", alias = "eidolons")]
    pub ascension: u8,
    pub base_stats: BaseAttributes,
    #[serde(alias = "light_cone")]
    pub loadout: Option<Loadout>,
    pub relics: RelicAttributeBlock,
    pub relic_sets: Vec<String>,
    pub traces: TraceInput,
    pub skill_levels: BTreeMap<String, u32>,
}

impl Default for CharacterConfig {
    fn default() -> Self {
        Self {
            name: "unknown".into(),
            element: "unknown".into(),
            path: "unknown".into(),
            level: 80,
            ascension: 0,
            base_stats: BaseAttributes::default(),
            loadout: None,
            relics: RelicAttributeBlock::default(),
            relic_sets: Vec::new(),
            traces: TraceInput::default(),
            skill_levels: BTreeMap::new(),
        }
    }
}

/// A party member with a derived effective-stats snapshot
///
/// Inputs are only changed through the setters, each of which
/// re-resolves the snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Character {
    pub name: String,
    pub element: String,
    pub path: String,
    pub level: u32,
    pub ascension: u8,
    base: BaseAttributes,
    loadout: Option<Loadout>,
    relics: RelicAttributeBlock,
    traces: Vec<TraceBonus>,
    effective: EffectiveStats,
}

impl Character {
    pub fn new(
        name: impl Into<String>,
        element: impl Into<String>,
        path: impl Into<String>,
        base: BaseAttributes,
    ) -> Self {
        let mut character = Self {
            name: name.into(),
            element: element.into(),
            path: path.into(),
            level: 80,
            ascension: 0,
            base,
            loadout: None,
            relics: RelicAttributeBlock::default(),
            traces: Vec::new(),
            effective: EffectiveStats::default(),
        };
        character.refresh();
        character
    }

    pub fn from_config(config: &CharacterConfig) -> Self {
        let mut character = Self {
            name: config.name.clone(),
            element: config.element.clone(),
            path: config.path.clone(),
            level: config.level,
            ascension: config.ascension,
            base: config.base_stats.clone(),
            loadout: config.loadout.clone(),
            relics: config.relics.clone(),
            traces: config.traces.to_bonuses(),
            effective: EffectiveStats::default(),
        };
        character.refresh();
        character
    }

    pub fn with_loadout(mut self, loadout: Loadout) -> Self {
        self.set_loadout(Some(loadout));
        self
    }

    pub fn with_relics(mut self, relics: RelicAttributeBlock) -> Self {
        self.set_relics(relics);
        self
    }

    pub fn with_traces(mut self, traces: Vec<TraceBonus>) -> Self {
        self.set_traces(traces);
        self
    }

    pub fn set_base(&mut self, base: BaseAttributes) {
        self.base = base;
        self.refresh();
    }

    pub fn set_loadout(&mut self, loadout: Option<Loadout>) {
        self.loadout = loadout;
        self.refresh();
    }

    pub fn set_relics(&mut self, relics: RelicAttributeBlock) {
        self.relics = relics;
        self.refresh();
    }

    pub fn set_traces(&mut self, traces: Vec<TraceBonus>) {
        self.traces = traces;
        self.refresh();
    }

    pub fn base(&self) -> &BaseAttributes {
        &self.base
    }

    pub fn loadout(&self) -> Option<&Loadout> {
        self.loadout.as_ref()
    }

    pub fn relics(&self) -> &RelicAttributeBlock {
        &self.relics
    }

    pub fn traces(&self) -> &[TraceBonus] {
        &self.traces
    }

    pub fn effective(&self) -> &EffectiveStats {
        &self.effective
    }

    fn refresh(&mut self) {
        self.effective = resolve_character(
            &self.base,
            self.loadout.as_ref().map(|l| &l.stats),
            &self.relics,
            &self.traces,
        );
    }
}
