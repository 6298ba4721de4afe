//! High-difficulty stages: survive first, clear second
//!
//! Stage buffs steer the narration. An element named in a buff picks the
//! character that leads the break step. Every estimate gets one extra
//! round of margin.

use crate::analysis::{AnalysisBundle, RoundEstimator};
use crate::stats::Team;
use crate::strategy::cast::{aggressive_rounds, arm_reroll, coverage_note, Cast};
use crate::strategy::catalog::StrategyMode;
use crate::strategy::plan::{PlanStep, PlanVariant, StrategyPlan};
use crate::strategy::preferences::Preferences;
use crate::strategy::Strategy;

/// Rounds added to the raw estimate for the stable plan
pub const SAFETY_MARGIN_ROUNDS: u32 = 1;

const OPTION_STABLE: &str = "A: safe clear with shields and buffs, one round of margin";
const OPTION_FAST: &str = "B: minimum-round clear, restart until the opening goes your way";
const REROLL_PURPOSE: &str = "Secure energy or break timing for a minimum-round clear";

/// Keyword to element; checked in order against lowercased buff text
const ELEMENT_KEYWORDS: &[(&str, &str)] = &[
    ("physical", "Physical"),
    ("fire", "Fire"),
    ("ice", "Ice"),
    ("lightning", "Lightning"),
    ("wind", "Wind"),
    ("quantum", "Quantum"),
    ("imaginary", "Imaginary"),
    ("物理", "Physical"),
    ("火", "Fire"),
    ("冰", "Ice"),
    ("雷", "Lightning"),
    ("风", "Wind"),
    ("量子", "Quantum"),
    ("虚数", "Imaginary"),
];

/// First element mentioned by any buff
///
/// Plain substring matching, so "Frozen Ice Field" and "冰属性伤害提高" both
/// hint Ice. Good enough for narration; not a buff parser.
pub fn element_hint<'a>(buffs: impl IntoIterator<Item = &'a String>) -> Option<&'static str> {
    buffs.into_iter().find_map(|buff| {
        let text = buff.to_lowercase();
        ELEMENT_KEYWORDS
            .iter()
            .find(|(keyword, _)| text.contains(keyword))
            .map(|(_, element)| *element)
    })
}

#[derive(Debug, Clone, Default)]
pub struct AbyssStrategy {
    estimator: RoundEstimator,
}

impl AbyssStrategy {
    pub fn new(estimator: RoundEstimator) -> Self {
        Self { estimator }
    }

    fn stage_buffs(team: &Team, preferences: &Preferences) -> Vec<String> {
        let mut buffs = preferences.abyss_buffs.clone();
        for buff in &team.enemy.buffs {
            if !buffs.contains(buff) {
                buffs.push(buff.clone());
            }
        }
        buffs.retain(|b| !b.trim().is_empty());
        buffs
    }

    /// Fastest roster member of the hinted element, if any
    fn break_lead(analysis: &AnalysisBundle, cast: &Cast, hint: Option<&str>) -> String {
        hint.and_then(|element| {
            analysis
                .turn_order
                .iter()
                .map(|slot| &slot.name)
                .find(|name| {
                    analysis
                        .character(name)
                        .is_some_and(|c| c.element.eq_ignore_ascii_case(element))
                })
                .filter(|name| cast.contains(name))
                .cloned()
        })
        .unwrap_or_else(|| cast.actor(1))
    }
}

impl Strategy for AbyssStrategy {
    fn mode(&self) -> StrategyMode {
        StrategyMode::Abyss
    }

    fn guidance(&self, analysis: &AnalysisBundle) -> Vec<String> {
        vec![
            "Read the stage buffs before committing to a lineup.".into(),
            "Keep a shield or heal ready for the boss's big attacks.".into(),
            "Break toughness before spending burst ultimates.".into(),
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
        let buffs = Self::stage_buffs(team, preferences);
        let hint = element_hint(&buffs);
        let lead = Self::break_lead(analysis, &cast, hint);

        let stable_rounds = self.estimator.estimate(Some(analysis)) + SAFETY_MARGIN_ROUNDS;
        let mut guidance = self.guidance(analysis);
        if !buffs.is_empty() {
            guidance.push(format!("Stage buffs: {}.", buffs.join("; ")));
        }

        let mut options = vec![OPTION_STABLE.to_string()];
        if preferences.allow_reroll {
            options.push(OPTION_FAST.to_string());
        }

        let break_rationale = match hint {
            Some(element) => format!("the stage favors {}", element),
            None => "set up the finisher".to_string(),
        };
        let stable = StrategyPlan {
            name: "Safe three-round clear".into(),
            description: "Shield and buff first, break toughness, then burst. \
                          Keeps one round of margin over the raw estimate."
                .into(),
            variant: PlanVariant::Stable,
            options: options.clone(),
            recommendation: Some("Pick A for a first clear or an unfamiliar stage.".into()),
            steps: vec![
                PlanStep::new(1, cast.actor(2), "Shield / damage buff")
                    .because("absorb the opening hits"),
                PlanStep::new(2, lead.clone(), "Break toughness / debuff")
                    .on(cast.target())
                    .because(break_rationale),
                PlanStep::new(3, cast.actor(1), "Burst finisher")
                    .on(cast.target())
                    .because("steady clear"),
            ],
            guidance: guidance.clone(),
            requires_reroll: false,
            reroll: None,
            expected_rounds: Some(stable_rounds),
        };

        if !preferences.allow_reroll {
            return vec![stable];
        }

        let aggressive = StrategyPlan {
            name: "Minimum-round clear".into(),
            description: "Use the speed lead and the stage buffs to clear in as few rounds \
                          as possible."
                .into(),
            variant: PlanVariant::Aggressive,
            options,
            recommendation: Some("Pick B when pushing for the round-count reward.".into()),
            steps: vec![
                PlanStep::new(1, cast.actor(0), "Manipulate action order")
                    .because("use the speed gap"),
                PlanStep::new(1, lead, "Targeted break / control")
                    .on(cast.target())
                    .because(format!("exploit buff: {}", hint.unwrap_or("general"))),
                PlanStep::new(2, cast.actor(0), "Burst clear")
                    .on(cast.target())
                    .because("two-round kill"),
            ],
            guidance,
            requires_reroll: true,
            reroll: None,
            expected_rounds: Some(aggressive_rounds(stable_rounds)),
        };
        let aggressive = arm_reroll(aggressive, preferences, &cast, REROLL_PURPOSE);

        if preferences.aggressive_selected() {
            vec![aggressive, stable]
        } else {
            vec![stable, aggressive]
        }
    }
}
