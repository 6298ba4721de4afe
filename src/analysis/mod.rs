//! Combat analysis: turn order, damage expectation, synergy and the
//! expected-round heuristic built on top of them.

pub mod bundle;
pub mod damage;
pub mod estimator;
pub mod synergy;
pub mod turn_order;

pub use bundle::{AnalysisBundle, CharacterSnapshot, EnemySnapshot};
pub use damage::{damage_profile, team_estimates, DamageProfile, NamedDamageProfile};
pub use estimator::RoundEstimator;
pub use synergy::{synergy, SynergyMetrics};
pub use turn_order::{order_by_speed, turn_order, TurnSlot};
