//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Decimal places kept for flat stats (attack, HP, defense, speed)
pub const FLAT_PRECISION: i32 = 2;

/// Decimal places kept for rate-like stats (crit, energy regen, break effect)
pub const RATE_PRECISION: i32 = 4;

/// 1-based party slot, as addressed by the ultimate hotkeys
pub type SlotIndex = u8;

/// Number of party slots addressable by the ultimate hotkeys
pub const MAX_PARTY_SLOTS: SlotIndex = 4;

/// Placeholder actor label used when the roster is empty
pub fn placeholder_actor(position: usize) -> String {
    format!("Character {}", position + 1)
}

/// Placeholder target label used when no enemy data is available
pub const PLACEHOLDER_TARGET: &str = "the enemy";

/// Round half away from zero to a fixed number of decimal places
///
/// Every resolved number passes through here so that resolving the
/// same input twice yields bit-identical output.
pub fn round_to(value: f64, places: i32) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// A numeric combat attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    #[serde(alias = "attack")]
    Atk,
    Hp,
    #[serde(alias = "defense")]
    Def,
    #[serde(alias = "speed")]
    Spd,
    CritRate,
    #[serde(alias = "crit_damage")]
    CritDmg,
    BreakEffect,
    EffectHit,
    EnergyRegen,
}

impl Attribute {
    pub const ALL: [Attribute; 9] = [
        Attribute::Atk,
        Attribute::Hp,
        Attribute::Def,
        Attribute::Spd,
        Attribute::CritRate,
        Attribute::CritDmg,
        Attribute::BreakEffect,
        Attribute::EffectHit,
        Attribute::EnergyRegen,
    ];

    /// Rate-like attributes are fractions (0.5 = 50%) and keep 4 decimals
    pub fn is_rate(self) -> bool {
        !matches!(
            self,
            Attribute::Atk | Attribute::Hp | Attribute::Def | Attribute::Spd
        )
    }

    pub fn precision(self) -> i32 {
        if self.is_rate() {
            RATE_PRECISION
        } else {
            FLAT_PRECISION
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Attribute::Atk => "atk",
            Attribute::Hp => "hp",
            Attribute::Def => "def",
            Attribute::Spd => "spd",
            Attribute::CritRate => "crit_rate",
            Attribute::CritDmg => "crit_dmg",
            Attribute::BreakEffect => "break_effect",
            Attribute::EffectHit => "effect_hit",
            Attribute::EnergyRegen => "energy_regen",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Attribute {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "atk" | "attack" => Ok(Attribute::Atk),
            "hp" => Ok(Attribute::Hp),
            "def" | "defense" => Ok(Attribute::Def),
            "spd" | "speed" => Ok(Attribute::Spd),
            "crit_rate" => Ok(Attribute::CritRate),
            "crit_dmg" | "crit_damage" => Ok(Attribute::CritDmg),
            "break_effect" => Ok(Attribute::BreakEffect),
            "effect_hit" => Ok(Attribute::EffectHit),
            "energy_regen" => Ok(Attribute::EnergyRegen),
            other => Err(format!("Unknown attribute: {}", other)),
        }
    }
}
