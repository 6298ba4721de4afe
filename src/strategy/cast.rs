//! Actor/target labels and reroll scaffolding shared by the mode strategies

use crate::analysis::AnalysisBundle;
use crate::core::types::{placeholder_actor, PLACEHOLDER_TARGET};
use crate::strategy::plan::{PlanStep, PlanVariant, RerollCondition, StrategyPlan};
use crate::strategy::preferences::Preferences;

/// Who acts and who gets hit, in turn order
///
/// Empty rosters and unknown enemies yield placeholder labels instead of
/// failing, so every strategy can narrate steps for any input.
#[derive(Debug, Clone)]
pub struct Cast {
    actors: Vec<String>,
    target: String,
}

impl Cast {
    pub fn from_analysis(analysis: &AnalysisBundle) -> Self {
        let name = analysis.enemy.name.trim();
        let target = if name.is_empty() || name.eq_ignore_ascii_case("unknown") {
            PLACEHOLDER_TARGET.to_string()
        } else {
            name.to_string()
        };
        Self {
            actors: analysis.actors_by_speed(),
            target,
        }
    }

    /// Actor at a turn-order position
    ///
    /// Short rosters reuse the fastest character; an empty roster falls
    /// back to a numbered placeholder.
    pub fn actor(&self, position: usize) -> String {
        self.actors
            .get(position)
            .or_else(|| self.actors.first())
            .cloned()
            .unwrap_or_else(|| placeholder_actor(position))
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn contains(&self, name: &str) -> bool {
        self.actors.iter().any(|a| a == name)
    }
}

/// Aggressive-branch round count: one fewer than the stable plan, never below one
pub fn aggressive_rounds(stable: u32) -> u32 {
    stable.saturating_sub(1).max(1)
}

pub fn reroll_condition(preferences: &Preferences, purpose: &str) -> RerollCondition {
    RerollCondition {
        target_character: preferences.reroll.bait_target(),
        trigger: preferences.reroll.bait_condition(),
        purpose: purpose.to_string(),
        max_retries: preferences.reroll.max_retries(),
    }
}

/// The opening step of a selected reroll plan
pub fn bait_step(condition: &RerollCondition, target: &str) -> PlanStep {
    PlanStep::new(1, condition.target_character.clone(), "Bait")
        .on(target)
        .because(format!(
            "restart unless {} occurs, at most {} retries",
            condition.trigger, condition.max_retries
        ))
}

pub fn bait_sentence(condition: &RerollCondition) -> String {
    format!(
        "Bait step: make sure {} is hit by {}; restart the encounter if it does not happen, up to {} times.",
        condition.target_character, condition.trigger, condition.max_retries
    )
}

/// Attach the reroll condition to an aggressive plan, and the bait step
/// when the player actually picked the aggressive option
pub fn arm_reroll(
    mut plan: StrategyPlan,
    preferences: &Preferences,
    cast: &Cast,
    purpose: &str,
) -> StrategyPlan {
    let condition = reroll_condition(preferences, purpose);
    if preferences.aggressive_selected() {
        plan.description = format!("{} {}", plan.description, bait_sentence(&condition));
        plan.steps.insert(0, bait_step(&condition, cast.target()));
    }
    plan.variant = PlanVariant::Aggressive;
    plan.requires_reroll = true;
    plan.reroll = Some(condition);
    plan
}

/// One line on how well the roster lines up with the enemy's weaknesses
pub fn coverage_note(analysis: &AnalysisBundle) -> String {
    let matches = &analysis.synergy.weakness_match_names;
    if matches.is_empty() {
        "No roster element matches the enemy's weaknesses; expect slower toughness breaks.".into()
    } else {
        format!("Weakness coverage: {}.", matches.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::TurnSlot;

    fn bundle(names: &[&str], enemy: &str) -> AnalysisBundle {
        let mut bundle = AnalysisBundle::default();
        bundle.turn_order = names
            .iter()
            .map(|n| TurnSlot {
                name: n.to_string(),
                speed: 100.0,
            })
            .collect();
        bundle.enemy.name = enemy.to_string();
        bundle
    }

    #[test]
    fn test_placeholders_for_empty_inputs() {
        let cast = Cast::from_analysis(&AnalysisBundle::default());
        assert_eq!(cast.actor(0), "Character 1");
        assert_eq!(cast.actor(2), "Character 3");
        assert_eq!(cast.target(), PLACEHOLDER_TARGET);
        assert!(!cast.contains("Character 1"));
    }

    #[test]
    fn test_short_roster_reuses_fastest() {
        let cast = Cast::from_analysis(&bundle(&["Seele", "Bronya"], "Cocolia"));
        assert_eq!(cast.actor(1), "Bronya");
        assert_eq!(cast.actor(2), "Seele");
        assert_eq!(cast.target(), "Cocolia");
    }

    #[test]
    fn test_unknown_enemy_uses_placeholder() {
        let cast = Cast::from_analysis(&bundle(&["Seele"], "unknown"));
        assert_eq!(cast.target(), PLACEHOLDER_TARGET);
    }

    #[test]
    fn test_aggressive_rounds_floor() {
        assert_eq!(aggressive_rounds(7), 6);
        assert_eq!(aggressive_rounds(1), 1);
        assert_eq!(aggressive_rounds(0), 1);
    }

    #[test]
    fn test_bait_step_from_preferences() {
        let mut prefs = Preferences::aggressive();
        prefs.reroll.bait_target = Some("March 7th".into());
        prefs.reroll.max_retries = 80;
        let condition = reroll_condition(&prefs, "energy");
        assert_eq!(condition.max_retries, 50);

        let step = bait_step(&condition, "Boss");
        assert_eq!(step.actor, "March 7th");
        assert_eq!(step.round, 1);
        assert!(bait_sentence(&condition).contains("March 7th"));
    }

    #[test]
    fn test_coverage_note() {
        let mut analysis = AnalysisBundle::default();
        assert!(coverage_note(&analysis).starts_with("No roster element"));
        analysis.synergy.weakness_match_names = vec!["Seele".into()];
        assert_eq!(coverage_note(&analysis), "Weakness coverage: Seele.");
    }
}
