#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Maps classified emotional states onto gameplay directives.
//!
//! [`map_to_directives`] is a pure lookup over a fixed table keyed by label,
//! with a handful of label-specific deltas layered on top. The scalar
//! multipliers consumed by the ability registry are derived here as well, and
//! the [`AdaptiveEngine`] applies directives to the game state through an
//! explicit reducer while keeping a bounded adaptation history.

mod engine;
mod reducer;

use synaptic_wars_core::{
    AdaptationDirectives, BehaviorDirective, CooldownDirective, EmotionLabel, EmotionalState,
    EnvironmentDirective, NarrativeTone,
};

pub use crate::{
    engine::{AdaptationOutcome, AdaptiveEngine, ENGAGEMENT_WINDOW, SUCCESS_CONFIDENCE},
    reducer::{adapt_game_state, reduce, GameStateDelta, MIN_DIFFICULTY_MULTIPLIER},
};

/// Fixed table entry for one label.
#[derive(Clone, Copy, Debug)]
struct Strategy {
    behavior: BehaviorDirective,
    cooldowns: CooldownDirective,
    environment: EnvironmentDirective,
    narrative: NarrativeTone,
    spawn_health: bool,
}

const NEUTRAL: Strategy = Strategy {
    behavior: BehaviorDirective::Strategic,
    cooldowns: CooldownDirective::Normal,
    environment: EnvironmentDirective::Engaging,
    narrative: NarrativeTone::Balanced,
    spawn_health: false,
};

fn strategy(label: EmotionLabel) -> Strategy {
    match label {
        EmotionLabel::Focused => Strategy {
            behavior: BehaviorDirective::MoreAggressive,
            cooldowns: CooldownDirective::Reduced,
            environment: EnvironmentDirective::MoreChallenging,
            narrative: NarrativeTone::ChallengeAccepted,
            spawn_health: false,
        },
        EmotionLabel::Frustrated => Strategy {
            behavior: BehaviorDirective::LessAggressive,
            cooldowns: CooldownDirective::Reduced,
            environment: EnvironmentDirective::Supportive,
            narrative: NarrativeTone::Encouraging,
            spawn_health: true,
        },
        EmotionLabel::Calm => Strategy {
            behavior: BehaviorDirective::Strategic,
            cooldowns: CooldownDirective::Normal,
            environment: EnvironmentDirective::Engaging,
            narrative: NarrativeTone::Immersive,
            spawn_health: false,
        },
        EmotionLabel::Excited => Strategy {
            behavior: BehaviorDirective::Unpredictable,
            cooldowns: CooldownDirective::Variable,
            environment: EnvironmentDirective::Dynamic,
            narrative: NarrativeTone::Thrilling,
            spawn_health: false,
        },
        EmotionLabel::Neutral
        | EmotionLabel::Confused
        | EmotionLabel::Engaged
        | EmotionLabel::Tired => NEUTRAL,
    }
}

/// Derives the directives for an emotional state.
///
/// Labels without a table entry use the neutral entry. Pure: identical
/// states always yield identical directives.
#[must_use]
pub fn map_to_directives(state: &EmotionalState) -> AdaptationDirectives {
    let entry = strategy(state.label);
    let mut directives = AdaptationDirectives {
        label: state.label,
        behavior: entry.behavior,
        cooldowns: entry.cooldowns,
        environment: entry.environment,
        narrative: entry.narrative,
        difficulty_delta: 0.0,
        reward_multiplier: None,
        spawn_health: entry.spawn_health,
        health_boost: false,
        pacing_delta: 0.0,
        complexity_bonus: false,
        intensity: state.intensity,
    };

    match state.label {
        EmotionLabel::Frustrated => {
            directives.difficulty_delta = -0.2;
            directives.health_boost = true;
        }
        EmotionLabel::Focused => {
            directives.difficulty_delta = 0.15;
            directives.reward_multiplier = Some(1.2);
        }
        EmotionLabel::Calm => {
            directives.pacing_delta = 0.1;
            directives.complexity_bonus = true;
        }
        _ => {}
    }

    directives
}

/// Factor applied to elapsed time when abilities cool down.
///
/// [`CooldownDirective::Reduced`] speeds recovery up (1.3), while
/// [`CooldownDirective::Increased`] slows it down (0.7). No directive, or any
/// other directive, recovers at the baseline rate.
#[must_use]
pub fn cooldown_multiplier(directives: Option<&AdaptationDirectives>) -> f32 {
    match directives.map(|directives| directives.cooldowns) {
        Some(CooldownDirective::Reduced) => 1.3,
        Some(CooldownDirective::Increased) => 0.7,
        _ => 1.0,
    }
}

/// Scales ability effects up and costs down; ranges over `[0.8, 1.2]`.
#[must_use]
pub fn effectiveness_multiplier(intensity: f32) -> f32 {
    let intensity = if intensity.is_nan() {
        0.0
    } else {
        intensity.clamp(0.0, 1.0)
    };
    0.8 + intensity * 0.4
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(label: EmotionLabel, intensity: f32) -> EmotionalState {
        EmotionalState::new(label, intensity, 0.9, "", 0)
    }

    #[test]
    fn unmapped_labels_fall_back_to_neutral_entry() {
        let neutral = map_to_directives(&state(EmotionLabel::Neutral, 0.4));
        for label in [EmotionLabel::Confused, EmotionLabel::Engaged, EmotionLabel::Tired] {
            let directives = map_to_directives(&state(label, 0.4));
            assert_eq!(directives.behavior, neutral.behavior);
            assert_eq!(directives.cooldowns, neutral.cooldowns);
            assert_eq!(directives.narrative, NarrativeTone::Balanced);
            assert!(directives.difficulty_delta.abs() < f32::EPSILON);
        }
    }

    #[test]
    fn effectiveness_bounds() {
        assert!((effectiveness_multiplier(0.0) - 0.8).abs() < 1e-6);
        assert!((effectiveness_multiplier(1.0) - 1.2).abs() < 1e-6);
        assert!((effectiveness_multiplier(0.5) - 1.0).abs() < 1e-6);
    }
}
