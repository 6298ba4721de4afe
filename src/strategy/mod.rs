//! Mode-specific plan generation
//!
//! Each mode is one [`Strategy`] implementation. [`StrategyCatalog`] maps an
//! external mode key onto exactly one of them.

pub mod abyss;
pub mod cast;
pub mod catalog;
pub mod custom;
pub mod material_farm;
pub mod plan;
pub mod preferences;

pub use abyss::AbyssStrategy;
pub use catalog::{CatalogOutcome, StrategyCatalog, StrategyMode};
pub use custom::CustomStrategy;
pub use material_farm::MaterialFarmStrategy;
pub use plan::{PlanStep, PlanVariant, RerollCondition, StrategyPlan};
pub use preferences::{PlanChoice, Preferences, RerollSettings};

use crate::analysis::AnalysisBundle;
use crate::stats::Team;

/// A plan generator for one game mode
///
/// Implementations never fail: empty rosters and unknown enemies get
/// placeholder labels. The returned list always holds at least one plan,
/// and holds a reroll plan only when `preferences.allow_reroll` is set.
pub trait Strategy: Send + Sync {
    fn mode(&self) -> StrategyMode;

    /// General advice attached to every plan of this mode
    fn guidance(&self, analysis: &AnalysisBundle) -> Vec<String>;

    fn generate(
        &self,
        team: &Team,
        analysis: &AnalysisBundle,
        preferences: &Preferences,
    ) -> Vec<StrategyPlan>;
}
