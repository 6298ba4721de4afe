//! Material farming: clear the same stage quickly, wave after wave
//!
//! Plans front-load group attacks. A roster with a fast, hard-hitting
//! character gets the two-round plan first; everyone else sees the
//! steady three-round plan first.

use crate::analysis::{AnalysisBundle, RoundEstimator};
use crate::stats::{EffectiveStats, Team};
use crate::strategy::cast::{aggressive_rounds, arm_reroll, coverage_note, Cast};
use crate::strategy::catalog::StrategyMode;
use crate::strategy::plan::{PlanStep, PlanVariant, StrategyPlan};
use crate::strategy::preferences::Preferences;
use crate::strategy::Strategy;

/// Minimum resolved speed for the group-clear gate
pub const GROUP_CLEAR_MIN_SPEED: f64 = 120.0;
/// Attack above which a fast character counts as a group clearer
pub const GROUP_CLEAR_MIN_ATK: f64 = 1500.0;
/// Crit rate above which a fast character counts as a group clearer
pub const GROUP_CLEAR_MIN_CRIT_RATE: f64 = 0.3;

const OPTION_STABLE: &str = "A: steady clear, no reroll points, controllable rotation";
const OPTION_FAST: &str =
    "B: fastest clear, allows reroll points (e.g. taking a specific hit for energy or a follow-up)";
const REROLL_PURPOSE: &str = "Gain energy or a follow-up trigger from the bait hit";

/// Tunable heuristic: fast and either strong or crit-heavy
pub fn can_group_clear(stats: &EffectiveStats) -> bool {
    stats.spd >= GROUP_CLEAR_MIN_SPEED
        && (stats.atk > GROUP_CLEAR_MIN_ATK || stats.crit_rate > GROUP_CLEAR_MIN_CRIT_RATE)
}

#[derive(Debug, Clone, Default)]
pub struct MaterialFarmStrategy {
    estimator: RoundEstimator,
}

impl MaterialFarmStrategy {
    pub fn new(estimator: RoundEstimator) -> Self {
        Self { estimator }
    }

    fn steady_plan(
        &self,
        cast: &Cast,
        rounds: u32,
        group_clear: bool,
        options: &[String],
        guidance: &[String],
    ) -> StrategyPlan {
        let main_action = if group_clear {
            "Group attack"
        } else {
            "Single-target burst"
        };
        StrategyPlan {
            name: "Steady three-round farm".into(),
            description: "Buff or shred resistance first, clear with the main damage dealer, \
                          let the second damage dealer finish. No reroll needed."
                .into(),
            variant: PlanVariant::Stable,
            options: options.to_vec(),
            recommendation: Some(
                "Pick A when your rotation is already consistent; it avoids restarts.".into(),
            ),
            steps: vec![
                PlanStep::new(1, cast.actor(2), "Buff / resistance shred")
                    .because("open the damage window"),
                PlanStep::new(2, cast.actor(0), main_action)
                    .on(cast.target())
                    .because("clear the wave"),
                PlanStep::new(3, cast.actor(1), "Finisher")
                    .on(cast.target())
                    .because("clean up survivors"),
            ],
            guidance: guidance.to_vec(),
            requires_reroll: false,
            reroll: None,
            expected_rounds: Some(rounds),
        }
    }

    fn fast_plan(
        &self,
        cast: &Cast,
        stable_rounds: u32,
        options: &[String],
        guidance: &[String],
        preferences: &Preferences,
    ) -> StrategyPlan {
        let plan = StrategyPlan {
            name: "Fast two-round farm".into(),
            description: "Open with a group attack and burst the elite in round one, \
                          finish in round two. Relies on crits or break timing."
                .into(),
            variant: PlanVariant::Aggressive,
            options: options.to_vec(),
            recommendation: Some(
                "Pick B when chasing the fastest clear and restarts are acceptable.".into(),
            ),
            steps: vec![
                PlanStep::new(1, cast.actor(0), "Group attack")
                    .on(format!("{} group", cast.target()))
                    .because("thin the wave"),
                PlanStep::new(1, cast.actor(1), "Single-target burst")
                    .on(cast.target())
                    .because("delete the elite"),
                PlanStep::new(2, cast.actor(0), "Finish")
                    .on("survivors")
                    .because("two-round clear"),
            ],
            guidance: guidance.to_vec(),
            requires_reroll: true,
            reroll: None,
            expected_rounds: Some(aggressive_rounds(stable_rounds)),
        };
        arm_reroll(plan, preferences, cast, REROLL_PURPOSE)
    }
}

impl Strategy for MaterialFarmStrategy {
    fn mode(&self) -> StrategyMode {
        StrategyMode::MaterialFarm
    }

    fn guidance(&self, analysis: &AnalysisBundle) -> Vec<String> {
        vec![
            "Open with the fastest character on the grouped wave.".into(),
            "Keep ultimates for the elite instead of trash mobs.".into(),
            coverage_note(analysis),
        ]
    }

    fn generate(
        &self,
        team: &Team,
        analysis: &AnalysisBundle,
        preferences: &Preferences,
    ) -> Vec<StrategyPlan> {
        let cast = Cast::from_analysis(analysis);
        let rounds = self.estimator.estimate(Some(analysis));
        let group_clear = team.roster.iter().any(|c| can_group_clear(c.effective()));
        let guidance = self.guidance(analysis);

        let mut options = vec![OPTION_STABLE.to_string()];
        if preferences.allow_reroll {
            options.push(OPTION_FAST.to_string());
        }

        let steady = self.steady_plan(&cast, rounds, group_clear, &options, &guidance);
        if !preferences.allow_reroll {
            return vec![steady];
        }

        let fast = self.fast_plan(&cast, rounds, &options, &guidance, preferences);
        if group_clear {
            vec![fast, steady]
        } else {
            vec![steady, fast]
        }
    }
}
