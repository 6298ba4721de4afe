pub mod attributes;
pub mod character;
pub mod enemy;
pub mod resolver;
pub mod team;

pub use attributes::{BaseAttributes, EffectiveStats, RelicAttributeBlock};
pub use character::{Character, CharacterConfig, Loadout, TraceBonus, TraceInput};
pub use enemy::{Enemy, EnemyBaseStats, EnemyConfig, EnemyStats};
pub use resolver::{resolve_character, resolve_enemy, threat_score};
pub use team::Team;
