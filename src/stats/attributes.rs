//! Attribute blocks: base values, additive modifier blocks and resolved stats

use crate::core::types::Attribute;
use serde::{Deserialize, Serialize};

/// Percentage and flat modifiers carried by relics or an equipped loadout
///
/// Percent fields are fractions of the owner's *base* attribute
/// (0.12 = +12% of base). Rate fields (crit, break, energy) are plain
/// additive fractions. Everything defaults to zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelicAttributeBlock {
    pub atk_percent: f64,
    pub atk_flat: f64,
    pub hp_percent: f64,
    pub hp_flat: f64,
    pub def_percent: f64,
    pub def_flat: f64,
    pub spd_percent: f64,
    #[serde(alias = "speed")]
    pub spd_flat: f64,
    pub crit_rate: f64,
    pub crit_dmg: f64,
    pub break_effect: f64,
    pub effect_hit: f64,
    pub energy_regen: f64,
}

impl RelicAttributeBlock {
    /// Contribution of this block to one attribute, given the base value
    /// its percentage modifiers scale against.
    pub fn contribution(&self, attribute: Attribute, base: f64) -> f64 {
        match attribute {
            Attribute::Atk => base * self.atk_percent + self.atk_flat,
            Attribute::Hp => base * self.hp_percent + self.hp_flat,
            Attribute::Def => base * self.def_percent + self.def_flat,
            Attribute::Spd => base * self.spd_percent + self.spd_flat,
            Attribute::CritRate => self.crit_rate,
            Attribute::CritDmg => self.crit_dmg,
            Attribute::BreakEffect => self.break_effect,
            Attribute::EffectHit => self.effect_hit,
            Attribute::EnergyRegen => self.energy_regen,
        }
    }
}

/// Unmodified attributes of a character at its current level
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseAttributes {
    #[serde(alias = "attack")]
    pub atk: f64,
    pub hp: f64,
    #[serde(alias = "defense")]
    pub def: f64,
    #[serde(alias = "speed")]
    pub spd: f64,
    pub crit_rate: f64,
    #[serde(alias = "crit_damage")]
    pub crit_dmg: f64,
    pub break_effect: f64,
    pub effect_hit: f64,
    pub energy_regen: f64,
}

impl BaseAttributes {
    pub fn get(&self, attribute: Attribute) -> f64 {
        match attribute {
            Attribute::Atk => self.atk,
            Attribute::Hp => self.hp,
            Attribute::Def => self.def,
            Attribute::Spd => self.spd,
            Attribute::CritRate => self.crit_rate,
            Attribute::CritDmg => self.crit_dmg,
            Attribute::BreakEffect => self.break_effect,
            Attribute::EffectHit => self.effect_hit,
            Attribute::EnergyRegen => self.energy_regen,
        }
    }
}

/// Fully resolved character attributes
///
/// Produced only by the resolver. Crit rate is within [0, 1]; every other
/// field is non-negative. Flat stats carry 2 decimals, rates 4.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EffectiveStats {
    pub atk: f64,
    pub hp: f64,
    pub def: f64,
    pub spd: f64,
    pub crit_rate: f64,
    pub crit_dmg: f64,
    pub break_effect: f64,
    pub effect_hit: f64,
    pub energy_regen: f64,
}

impl EffectiveStats {
    pub fn get(&self, attribute: Attribute) -> f64 {
        match attribute {
            Attribute::Atk => self.atk,
            Attribute::Hp => self.hp,
            Attribute::Def => self.def,
            Attribute::Spd => self.spd,
            Attribute::CritRate => self.crit_rate,
            Attribute::CritDmg => self.crit_dmg,
            Attribute::BreakEffect => self.break_effect,
            Attribute::EffectHit => self.effect_hit,
            Attribute::EnergyRegen => self.energy_regen,
        }
    }

    pub(crate) fn set(&mut self, attribute: Attribute, value: f64) {
        let slot = match attribute {
            Attribute::Atk => &mut self.atk,
            Attribute::Hp => &mut self.hp,
            Attribute::Def => &mut self.def,
            Attribute::Spd => &mut self.spd,
            Attribute::CritRate => &mut self.crit_rate,
            Attribute::CritDmg => &mut self.crit_dmg,
            Attribute::BreakEffect => &mut self.break_effect,
            Attribute::EffectHit => &mut self.effect_hit,
            Attribute::EnergyRegen => &mut self.energy_regen,
        };
        *slot = value;
    }
}
