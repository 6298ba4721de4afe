//! Mode keys and the enum-keyed strategy table

use crate::analysis::{AnalysisBundle, RoundEstimator};
use crate::stats::Team;
use crate::strategy::abyss::AbyssStrategy;
use crate::strategy::custom::CustomStrategy;
use crate::strategy::material_farm::MaterialFarmStrategy;
use crate::strategy::plan::StrategyPlan;
use crate::strategy::preferences::Preferences;
use crate::strategy::Strategy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyMode {
    #[default]
    MaterialFarm,
    Abyss,
    Custom,
}

impl StrategyMode {
    pub const ALL: [StrategyMode; 3] = [
        StrategyMode::MaterialFarm,
        StrategyMode::Abyss,
        StrategyMode::Custom,
    ];

    pub fn key(self) -> &'static str {
        match self {
            StrategyMode::MaterialFarm => "material_farm",
            StrategyMode::Abyss => "abyss",
            StrategyMode::Custom => "custom",
        }
    }
}

impl fmt::Display for StrategyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for StrategyMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "material_farm" | "farm" | "material" => Ok(StrategyMode::MaterialFarm),
            "abyss" | "high_difficulty" | "memory_of_chaos" => Ok(StrategyMode::Abyss),
            "custom" => Ok(StrategyMode::Custom),
            other => Err(format!("Unknown strategy mode: {}", other)),
        }
    }
}

/// Plans for one request, plus any warnings raised while selecting the mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogOutcome {
    pub mode: StrategyMode,
    pub plans: Vec<StrategyPlan>,
    pub warnings: Vec<String>,
}

pub struct StrategyCatalog {
    entries: Vec<(StrategyMode, Box<dyn Strategy>)>,
    fallback: StrategyMode,
}

impl Default for StrategyCatalog {
    fn default() -> Self {
        Self::new(RoundEstimator::default())
    }
}

impl StrategyCatalog {
    /// Catalog of the built-in strategies sharing one estimator
    pub fn new(estimator: RoundEstimator) -> Self {
        Self {
            entries: vec![
                (
                    StrategyMode::MaterialFarm,
                    Box::new(MaterialFarmStrategy::new(estimator)),
                ),
                (StrategyMode::Abyss, Box::new(AbyssStrategy::new(estimator))),
                (StrategyMode::Custom, Box::new(CustomStrategy::new())),
            ],
            fallback: StrategyMode::MaterialFarm,
        }
    }

    pub fn modes(&self) -> impl Iterator<Item = StrategyMode> + '_ {
        self.entries.iter().map(|(mode, _)| *mode)
    }

    pub fn get(&self, mode: StrategyMode) -> Option<&dyn Strategy> {
        self.entries
            .iter()
            .find(|(m, _)| *m == mode)
            .map(|(_, strategy)| strategy.as_ref())
    }

    /// Map an external key onto a known mode
    ///
    /// Unknown keys resolve to the fallback mode and return a warning.
    pub fn resolve(&self, key: &str) -> (StrategyMode, Option<String>) {
        match key.parse::<StrategyMode>() {
            Ok(mode) if self.get(mode).is_some() => (mode, None),
            Ok(mode) => {
                let warning = format!(
                    "Strategy mode '{}' is not registered, falling back to {}",
                    mode, self.fallback
                );
                tracing::warn!("{}", warning);
                (self.fallback, Some(warning))
            }
            Err(_) => {
                let warning = format!(
                    "Unknown strategy mode '{}', falling back to {}",
                    key.trim(),
                    self.fallback
                );
                tracing::warn!("{}", warning);
                (self.fallback, Some(warning))
            }
        }
    }

    pub fn generate(
        &self,
        key: &str,
        team: &Team,
        analysis: &AnalysisBundle,
        preferences: &Preferences,
    ) -> CatalogOutcome {
        let (mode, warning) = self.resolve(key);
        let mut warnings: Vec<String> = warning.into_iter().collect();
        warnings.extend(preferences.validate());

        let plans = match self.get(mode) {
            Some(strategy) => strategy.generate(team, analysis, preferences),
            None => Vec::new(),
        };
        tracing::info!(
            "Generated {} plan(s) for mode {} ({} characters)",
            plans.len(),
            mode,
            team.len()
        );

        CatalogOutcome {
            mode,
            plans,
            warnings,
        }
    }
}
