#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Synaptic Wars neuro-adaptive engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative Tangler world, and the pure systems. Adapters submit
//! [`Command`] values describing what the player asked for, the session
//! orchestrator executes them against the systems it owns, and then
//! broadcasts [`Event`] values for presentation layers to consume. All values
//! exchanged across crate boundaries live here so that no system needs to
//! reach into another system's internals.

pub mod config;
pub mod error;

use std::{fmt, str::FromStr, time::Duration};

use glam::Vec3;
use serde::{Deserialize, Serialize};

pub use crate::error::{
    ActivationError, ClassificationError, ConfigError, InitializationError, SignalError,
};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Synaptic Wars.";

/// Maximum number of classified emotional states retained in history.
pub const EMOTIONAL_HISTORY_CAPACITY: usize = 100;

/// Maximum number of adaptation records retained in history.
pub const ADAPTATION_HISTORY_CAPACITY: usize = 50;

/// Converts a simulation time into whole milliseconds, saturating on overflow.
#[must_use]
pub fn duration_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Converts seconds into a simulation time, saturating instead of panicking.
///
/// Zero, negative and NaN inputs map to [`Duration::ZERO`]; values too large
/// to represent map to [`Duration::MAX`].
#[must_use]
pub fn duration_from_secs(seconds: f32) -> Duration {
    if seconds.is_nan() || seconds <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f32(seconds).unwrap_or(Duration::MAX)
}

/// Signals that presentation layers may publish into the session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Requests that the session begin a new game.
    StartGame,
    /// Requests activation of the ability registered under the provided key.
    UseAbility {
        /// Registry key of the ability, such as `dendritic_lightning`.
        name: String,
    },
    /// Requests that the signal source switch to another simulation mode.
    SetEegMode {
        /// Name of the requested mode, such as `focused`.
        mode: String,
    },
    /// Requests that the session stop and disconnect the signal source.
    EndGame,
}

/// Events broadcast by the session after processing commands and ticks.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Announces that a game began.
    GameStarted,
    /// Announces that the active game ended.
    GameEnded,
    /// Confirms that a Tangler joined the live pool.
    TanglerSpawned {
        /// Identifier assigned to the new Tangler.
        tangler: TanglerId,
        /// Position the Tangler occupies after spawning.
        position: Vec3,
        /// Behavior variant assigned at spawn time.
        behavior: BehaviorVariant,
    },
    /// Reports that a Tangler took damage.
    TanglerDamaged {
        /// Identifier of the damaged Tangler.
        tangler: TanglerId,
        /// Amount of health subtracted.
        amount: f32,
        /// Health left after the damage was applied.
        remaining: f32,
    },
    /// Reports that a Tangler dropped under the erratic threshold.
    TanglerFrenzied {
        /// Identifier of the Tangler that turned erratic.
        tangler: TanglerId,
    },
    /// Confirms that a Tangler left the live pool.
    TanglerEliminated {
        /// Identifier of the removed Tangler.
        tangler: TanglerId,
    },
    /// Announces that a timed status effect is active until the provided time.
    EffectActivated {
        /// Effect that became active.
        effect: StatusEffect,
        /// Simulation time in milliseconds at which the effect expires.
        until_ms: u64,
    },
    /// Confirms that an ability fired.
    AbilityActivated {
        /// Outcome of the activation, including scaled effects.
        activation: Activation,
    },
    /// Reports that an ability activation request was rejected.
    AbilityRejected {
        /// Reason the registry refused the activation.
        reason: ActivationError,
    },
    /// Announces that the signal source switched simulation modes.
    EegModeChanged {
        /// Mode that becomes active on the next sample.
        mode: EegMode,
    },
    /// Reports a freshly classified emotional state.
    EmotionalStateClassified {
        /// State produced by the classifier.
        state: EmotionalState,
    },
    /// Reports that the Tangler spawn scales changed.
    AdaptationSettingsChanged {
        /// Scales applied to subsequently spawned Tanglers.
        settings: AdaptationSettings,
    },
    /// Aggregate per-tick snapshot for presentation layers.
    GameStateUpdate(Box<GameSnapshot>),
}

/// Unique identifier assigned to a Tangler.
///
/// Combines the simulation time of the spawn with a random suffix. The pool
/// regenerates the suffix whenever a collision with a live Tangler occurs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TanglerId {
    spawned_at_ms: u64,
    suffix: u64,
}

impl TanglerId {
    /// Creates a new identifier from a spawn timestamp and random suffix.
    #[must_use]
    pub const fn new(spawned_at_ms: u64, suffix: u64) -> Self {
        Self {
            spawned_at_ms,
            suffix,
        }
    }

    /// Simulation time in milliseconds at which the Tangler spawned.
    #[must_use]
    pub const fn spawned_at_ms(&self) -> u64 {
        self.spawned_at_ms
    }

    /// Random component distinguishing Tanglers spawned in the same millisecond.
    #[must_use]
    pub const fn suffix(&self) -> u64 {
        self.suffix
    }
}

impl fmt::Display for TanglerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "neuro-tangler-{}-", self.spawned_at_ms)?;
        let mut digits = [b'0'; 13];
        let mut value = self.suffix;
        let mut index = digits.len();
        loop {
            index -= 1;
            let digit = (value % 36) as u8;
            digits[index] = if digit < 10 {
                b'0' + digit
            } else {
                b'a' + digit - 10
            };
            value /= 36;
            if value == 0 || index == 0 {
                break;
            }
        }
        let start = index.min(digits.len() - 9);
        for byte in &digits[start..] {
            write!(f, "{}", *byte as char)?;
        }
        Ok(())
    }
}

/// Named simulation modes offered by the signal source.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EegMode {
    /// Time-varying baseline that drifts with a slow oscillation.
    #[default]
    Dynamic,
    /// High beta, low theta distribution.
    Focused,
    /// High beta with elevated theta and little calm.
    Stressed,
    /// High alpha distribution with strong calm.
    Relaxed,
}

impl EegMode {
    /// Every mode, in declaration order.
    pub const ALL: [Self; 4] = [Self::Dynamic, Self::Focused, Self::Stressed, Self::Relaxed];

    /// Canonical lowercase name of the mode.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dynamic => "dynamic",
            Self::Focused => "focused",
            Self::Stressed => "stressed",
            Self::Relaxed => "relaxed",
        }
    }
}

impl FromStr for EegMode {
    type Err = SignalError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == value)
            .ok_or_else(|| SignalError::UnknownMode(value.to_owned()))
    }
}

/// One simulated biosignal reading. Every value lies within `[0.05, 0.95]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Alpha band power.
    pub alpha: f32,
    /// Beta band power.
    pub beta: f32,
    /// Theta band power.
    pub theta: f32,
    /// Delta band power.
    pub delta: f32,
    /// Gamma band power.
    pub gamma: f32,
    /// Derived focus scalar.
    pub focus: f32,
    /// Derived calm scalar.
    pub calm: f32,
}

impl Sample {
    /// Lower bound enforced on every value.
    pub const MIN_VALUE: f32 = 0.05;
    /// Upper bound enforced on every value.
    pub const MAX_VALUE: f32 = 0.95;

    /// Returns every value in a fixed order.
    #[must_use]
    pub const fn values(&self) -> [f32; 7] {
        [
            self.alpha, self.beta, self.theta, self.delta, self.gamma, self.focus, self.calm,
        ]
    }

    /// Applies `f` to every value, producing a new sample.
    #[must_use]
    pub fn map(self, mut f: impl FnMut(f32) -> f32) -> Self {
        Self {
            alpha: f(self.alpha),
            beta: f(self.beta),
            theta: f(self.theta),
            delta: f(self.delta),
            gamma: f(self.gamma),
            focus: f(self.focus),
            calm: f(self.calm),
        }
    }
}

impl Default for Sample {
    fn default() -> Self {
        Self {
            alpha: 0.3,
            beta: 0.4,
            theta: 0.2,
            delta: 0.1,
            gamma: 0.5,
            focus: 0.5,
            calm: 0.5,
        }
    }
}

/// Discrete emotional labels the classifier can produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmotionLabel {
    /// Concentrated and engaged with the challenge.
    Focused,
    /// Struggling with the current difficulty.
    Frustrated,
    /// Energised and stimulated.
    Excited,
    /// Relaxed and composed.
    Calm,
    /// Unsure how to proceed.
    Confused,
    /// Invested without strong affect.
    Engaged,
    /// Fatigued.
    Tired,
    /// No dominant state.
    Neutral,
}

impl EmotionLabel {
    /// Canonical lowercase name of the label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Focused => "focused",
            Self::Frustrated => "frustrated",
            Self::Excited => "excited",
            Self::Calm => "calm",
            Self::Confused => "confused",
            Self::Engaged => "engaged",
            Self::Tired => "tired",
            Self::Neutral => "neutral",
        }
    }
}

impl fmt::Display for EmotionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable snapshot of a classified emotional state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EmotionalState {
    /// Classified label.
    pub label: EmotionLabel,
    /// Strength of the state in `[0, 1]`.
    pub intensity: f32,
    /// Classifier confidence in `[0, 1]`.
    pub confidence: f32,
    /// Free-form narrative prompt attached by the classifier.
    pub narrative: String,
    /// Simulation time in milliseconds at which the state was produced.
    pub timestamp_ms: u64,
}

impl EmotionalState {
    /// Creates a state, clamping intensity and confidence into `[0, 1]`.
    #[must_use]
    pub fn new(
        label: EmotionLabel,
        intensity: f32,
        confidence: f32,
        narrative: impl Into<String>,
        timestamp_ms: u64,
    ) -> Self {
        Self {
            label,
            intensity: unit_clamp(intensity),
            confidence: unit_clamp(confidence),
            narrative: narrative.into(),
            timestamp_ms,
        }
    }

    /// Neutral state substituted whenever classification is unavailable.
    #[must_use]
    pub fn neutral_default(timestamp_ms: u64) -> Self {
        Self::new(
            EmotionLabel::Neutral,
            0.5,
            0.5,
            "Default emotional state",
            timestamp_ms,
        )
    }
}

fn unit_clamp(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Entry of the emotional history: a state plus the game context it was derived from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EmotionalRecord {
    /// Classified state.
    pub state: EmotionalState,
    /// Game state observed when the classification was requested.
    pub context: GameState,
}

/// Direction of the recent emotional intensity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmotionalTrend {
    /// Mean intensity of recent states exceeds 0.7.
    Increasing,
    /// Mean intensity within `[0.3, 0.7]`, or fewer than five states recorded.
    #[default]
    Stable,
    /// Mean intensity of recent states is below 0.3.
    Decreasing,
}

/// How Tanglers should behave toward the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BehaviorDirective {
    /// Tanglers press harder.
    MoreAggressive,
    /// Tanglers hang back.
    LessAggressive,
    /// Tanglers keep their baseline tuning.
    Strategic,
    /// Tanglers move erratically.
    Unpredictable,
}

/// How ability cooldowns should recover.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CooldownDirective {
    /// Cooldowns recover faster.
    Reduced,
    /// Cooldowns recover at the baseline rate.
    Normal,
    /// Cooldowns vary; treated as the baseline rate.
    Variable,
    /// Cooldowns recover slower.
    Increased,
}

/// Environmental mood requested from presentation layers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvironmentDirective {
    /// Harder surroundings.
    MoreChallenging,
    /// Helpful surroundings.
    Supportive,
    /// Balanced surroundings.
    Engaging,
    /// Shifting surroundings.
    Dynamic,
}

/// Narrative tone requested from presentation layers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NarrativeTone {
    /// Acknowledge the player's focus.
    ChallengeAccepted,
    /// Encourage a struggling player.
    Encouraging,
    /// Deepen immersion.
    Immersive,
    /// Heighten excitement.
    Thrilling,
    /// No particular tone.
    Balanced,
}

/// Gameplay-tuning instructions derived from a single emotional state.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AdaptationDirectives {
    /// Label the directives were derived from.
    pub label: EmotionLabel,
    /// Requested Tangler behavior.
    pub behavior: BehaviorDirective,
    /// Requested cooldown recovery profile.
    pub cooldowns: CooldownDirective,
    /// Requested environmental mood.
    pub environment: EnvironmentDirective,
    /// Requested narrative tone.
    pub narrative: NarrativeTone,
    /// Signed difficulty change; negative values ease the game.
    pub difficulty_delta: f32,
    /// Reward multiplier override, if any.
    pub reward_multiplier: Option<f32>,
    /// Whether a health pickup should be offered.
    pub spawn_health: bool,
    /// Whether the player should receive a health boost.
    pub health_boost: bool,
    /// Increase applied to the spawn rate multiplier.
    pub pacing_delta: f32,
    /// Whether additional complexity should be layered in.
    pub complexity_bonus: bool,
    /// Intensity of the state the directives were derived from.
    pub intensity: f32,
}

/// Behavior variant driving a Tangler's movement and stats.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BehaviorVariant {
    /// No directive applied; stats stay as spawned.
    #[default]
    Normal,
    /// Faster and more aggressive.
    Aggressive,
    /// Slower and prone to retreating.
    Defensive,
    /// Baseline stats.
    Strategic,
    /// Randomised stats and jittery movement.
    Erratic,
}

impl BehaviorVariant {
    /// Resolves the variant requested by the current behavior directive.
    #[must_use]
    pub const fn from_directive(directive: Option<BehaviorDirective>) -> Self {
        match directive {
            Some(BehaviorDirective::MoreAggressive) => Self::Aggressive,
            Some(BehaviorDirective::LessAggressive) => Self::Defensive,
            Some(BehaviorDirective::Strategic) => Self::Strategic,
            Some(BehaviorDirective::Unpredictable) => Self::Erratic,
            None => Self::Normal,
        }
    }
}

/// Persistent scale factors applied to newly spawned Tanglers.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AdaptationSettings {
    /// Aggression scale.
    pub aggression: f32,
    /// Speed scale.
    pub speed: f32,
    /// Spawn rate scale.
    pub spawn_rate: f32,
    /// Health scale captured by each Tangler at spawn time.
    pub health: f32,
}

impl Default for AdaptationSettings {
    fn default() -> Self {
        Self {
            aggression: 1.0,
            speed: 1.0,
            spawn_rate: 1.0,
            health: 1.0,
        }
    }
}

/// Timed status effects that gate Tangler behavior.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusEffect {
    /// Dampens aggressive and erratic behavior.
    Calm,
    /// Splashes damage dealt to one Tangler onto another.
    Entanglement,
}

/// Immutable representation of a single Tangler used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TanglerSnapshot {
    /// Identifier of the Tangler.
    pub id: TanglerId,
    /// Current position.
    pub position: Vec3,
    /// Current health.
    pub health: f32,
    /// Health captured at spawn time.
    pub max_health: f32,
    /// Current aggression factor.
    pub aggression: f32,
    /// Current speed factor.
    pub speed: f32,
    /// Current behavior variant.
    pub behavior: BehaviorVariant,
}

/// Abilities available to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbilityKind {
    /// Damages one Tangler.
    DendriticLightning,
    /// Restores energy and calms the Tanglers.
    SerotoninTsunami,
    /// Links Tanglers so damage splashes.
    QuantumEntanglement,
}

impl AbilityKind {
    /// Every ability, in registry order.
    pub const ALL: [Self; 3] = [
        Self::DendriticLightning,
        Self::SerotoninTsunami,
        Self::QuantumEntanglement,
    ];

    /// Registry key used by [`Command::UseAbility`].
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::DendriticLightning => "dendritic_lightning",
            Self::SerotoninTsunami => "serotonin_tsunami",
            Self::QuantumEntanglement => "quantum_entanglement",
        }
    }

    /// Resolves an ability from its registry key.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.key() == key)
    }
}

/// Outcome of a successful ability activation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Activation {
    /// Ability that fired.
    pub ability: AbilityKind,
    /// Energy spent.
    pub cost: f32,
    /// Cooldown imposed on the ability, in seconds.
    pub cooldown: f32,
    /// Scaled damage.
    pub damage: f32,
    /// Scaled healing.
    pub healing: f32,
    /// Scaled effect duration, in seconds.
    pub duration: f32,
    /// Energy left after paying the cost.
    pub remaining_energy: f32,
}

/// Presentation view of one registered ability.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AbilitySnapshot {
    /// Ability kind.
    pub ability: AbilityKind,
    /// Display name.
    pub name: String,
    /// Display description.
    pub description: String,
    /// Seconds left before the ability is ready.
    pub current_cooldown: f32,
    /// Cooldown an activation would impose right now.
    pub adjusted_cooldown: f32,
    /// Cost an activation would charge right now.
    pub adjusted_cost: f32,
    /// Effectiveness multiplier currently applied.
    pub effectiveness_multiplier: f32,
    /// Whether the ability may be activated.
    pub ready: bool,
}

/// Mutable per-session game state.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Accumulated score.
    pub score: u32,
    /// Current level.
    pub level: u32,
    /// Energy available for abilities.
    pub player_energy: f32,
    /// Energy ceiling.
    pub max_energy: f32,
    /// Player position.
    pub player_position: Vec3,
    /// Difficulty scale adjusted by directives.
    pub difficulty_multiplier: f32,
    /// Spawn rate scale adjusted by directives.
    pub spawn_rate_multiplier: f32,
    /// Score reward scale adjusted by directives.
    pub reward_multiplier: f32,
    /// Whether a directive requested a health pickup.
    pub health_pickup_pending: bool,
    /// Whether a game is in progress.
    pub game_active: bool,
}

impl GameState {
    /// Creates the initial state for a new session.
    #[must_use]
    pub fn new(initial_energy: f32, max_energy: f32) -> Self {
        Self {
            score: 0,
            level: 1,
            player_energy: initial_energy.clamp(0.0, max_energy),
            max_energy,
            player_position: Vec3::ZERO,
            difficulty_multiplier: 1.0,
            spawn_rate_multiplier: 1.0,
            reward_multiplier: 1.0,
            health_pickup_pending: false,
            game_active: false,
        }
    }
}

/// Record of one applied adaptation, kept for reporting and export.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AdaptationRecord {
    /// State that triggered the adaptation.
    pub emotional_state: EmotionalState,
    /// Directives derived from the state.
    pub directives: AdaptationDirectives,
    /// Game state before the adaptation.
    pub before: GameState,
    /// Game state after the adaptation.
    pub after: GameState,
    /// Simulation time in milliseconds at which the adaptation applied.
    pub timestamp_ms: u64,
}

/// Aggregate metrics describing how the adaptation loop performs.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceReport {
    /// Adaptations whose state carried confidence above 0.6.
    pub adaptation_success: u32,
    /// Adaptations applied in total.
    pub adaptation_total: u32,
    /// `adaptation_success / adaptation_total`, zero before the first adaptation.
    pub success_rate: f32,
    /// Blend of recent intensity and label variety.
    pub engagement_score: f32,
    /// Directives currently in force, if any.
    pub current_directives: Option<AdaptationDirectives>,
    /// Number of records in the adaptation history.
    pub adaptation_history_count: usize,
    /// Recent emotional trend.
    pub emotional_trend: EmotionalTrend,
}

/// Read-only per-tick snapshot published to presentation layers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    /// Game state after the tick.
    pub state: GameState,
    /// Number of live Tanglers.
    pub tangler_count: usize,
    /// Per-ability presentation data.
    pub abilities: Vec<AbilitySnapshot>,
    /// Most recent emotional state.
    pub emotional_state: EmotionalState,
    /// Current performance metrics.
    pub performance: PerformanceReport,
}
