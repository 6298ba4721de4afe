//! Generic plans for stages no other mode covers

use crate::analysis::AnalysisBundle;
use crate::stats::Team;
use crate::strategy::cast::{aggressive_rounds, arm_reroll, coverage_note, Cast};
use crate::strategy::catalog::StrategyMode;
use crate::strategy::plan::{PlanStep, PlanVariant, StrategyPlan};
use crate::strategy::preferences::Preferences;
use crate::strategy::Strategy;

pub const STABLE_ROUNDS: u32 = 3;

const OPTION_STABLE: &str = "A: standard three-round rotation";
const OPTION_FAST: &str = "B: compressed two-round rotation, restart on a bad opening";
const REROLL_PURPOSE: &str = "Compress the rotation by one round";

/// Static-shaped plans; ignores the round estimate
#[derive(Debug, Clone, Default)]
pub struct CustomStrategy;

impl CustomStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl Strategy for CustomStrategy {
    fn mode(&self) -> StrategyMode {
        StrategyMode::Custom
    }

    fn guidance(&self, analysis: &AnalysisBundle) -> Vec<String> {
        vec![
            "Open on the enemy's weakness to start the break early.".into(),
            "Hold ultimates for the damage window after a break.".into(),
            coverage_note(analysis),
        ]
    }

    fn generate(
        &self,
        _team: &Team,
        analysis: &AnalysisBundle,
        preferences: &Preferences,
    ) -> Vec<StrategyPlan> {
        let cast = Cast::from_analysis(analysis);
        let guidance = self.guidance(analysis);

        let mut options = vec![OPTION_STABLE.to_string()];
        if preferences.allow_reroll {
            options.push(OPTION_FAST.to_string());
        }

        let stable = StrategyPlan {
            name: "Standard three-round plan".into(),
            description: "Open on weakness, burst in the damage window, finish in round three."
                .into(),
            variant: PlanVariant::Stable,
            options: options.clone(),
            recommendation: None,
            steps: vec![
                PlanStep::new(1, cast.actor(0), "Open on weakness")
                    .on(cast.target())
                    .because("start the toughness break"),
                PlanStep::new(2, cast.actor(1), "Burst")
                    .on(cast.target())
                    .because("damage window"),
                PlanStep::new(3, cast.actor(0), "Finish").on(cast.target()),
            ],
            guidance: guidance.clone(),
            requires_reroll: false,
            reroll: None,
            expected_rounds: Some(STABLE_ROUNDS),
        };

        if !preferences.allow_reroll {
            return vec![stable];
        }

        let aggressive = StrategyPlan {
            name: "Compressed two-round plan".into(),
            description: "Break and burst together in round one, finish in round two.".into(),
            variant: PlanVariant::Aggressive,
            options,
            recommendation: None,
            steps: vec![
                PlanStep::new(1, cast.actor(0), "Break and burst").on(cast.target()),
                PlanStep::new(1, cast.actor(1), "Follow-up burst").on(cast.target()),
                PlanStep::new(2, cast.actor(0), "Finish").on(cast.target()),
            ],
            guidance,
            requires_reroll: true,
            reroll: None,
            expected_rounds: Some(aggressive_rounds(STABLE_ROUNDS)),
        };
        let aggressive = arm_reroll(aggressive, preferences, &cast, REROLL_PURPOSE);

        if preferences.aggressive_selected() {
            vec![aggressive, stable]
        } else {
            vec![stable, aggressive]
        }
    }
}
