use synaptic_wars_core::{AdaptationDirectives, GameState};

/// Floor below which a difficulty reduction never pushes the multiplier.
pub const MIN_DIFFICULTY_MULTIPLIER: f32 = 0.3;

/// Changes a set of directives makes to the game state.
///
/// Every field the adaptation loop may touch is named here; `None` leaves the
/// corresponding state field untouched.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GameStateDelta {
    /// New difficulty multiplier.
    pub difficulty_multiplier: Option<f32>,
    /// New spawn rate multiplier.
    pub spawn_rate_multiplier: Option<f32>,
    /// New reward multiplier.
    pub reward_multiplier: Option<f32>,
    /// New health pickup flag.
    pub health_pickup_pending: Option<bool>,
}

impl GameStateDelta {
    /// Reports whether the delta leaves the state untouched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Computes the delta `directives` imply for `state`.
#[must_use]
pub fn adapt_game_state(state: &GameState, directives: &AdaptationDirectives) -> GameStateDelta {
    let mut delta = GameStateDelta::default();

    let change = directives.difficulty_delta;
    if change > 0.0 {
        delta.difficulty_multiplier = Some(state.difficulty_multiplier + change);
    } else if change < 0.0 {
        delta.difficulty_multiplier =
            Some((state.difficulty_multiplier + change).max(MIN_DIFFICULTY_MULTIPLIER));
    }

    delta.reward_multiplier = directives.reward_multiplier;

    if directives.spawn_health || directives.health_boost {
        delta.health_pickup_pending = Some(true);
    }

    if directives.pacing_delta != 0.0 {
        delta.spawn_rate_multiplier = Some(state.spawn_rate_multiplier + directives.pacing_delta);
    }

    delta
}

/// Applies `delta` to `state`, field by field.
#[must_use]
pub fn reduce(state: GameState, delta: &GameStateDelta) -> GameState {
    GameState {
        difficulty_multiplier: delta
            .difficulty_multiplier
            .unwrap_or(state.difficulty_multiplier),
        spawn_rate_multiplier: delta
            .spawn_rate_multiplier
            .unwrap_or(state.spawn_rate_multiplier),
        reward_multiplier: delta.reward_multiplier.unwrap_or(state.reward_multiplier),
        health_pickup_pending: delta
            .health_pickup_pending
            .unwrap_or(state.health_pickup_pending),
        ..state
    }
}
