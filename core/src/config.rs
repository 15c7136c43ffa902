//! Static configuration consumed by every system.
//!
//! The configuration is loaded once when a session is built and never
//! mutated afterwards. Every section implements [`Default`] with the stock
//! tuning so partial TOML documents only need to name the fields they change.

use serde::{Deserialize, Serialize};

use crate::{AbilityKind, ConfigError};

/// Complete tuning surface of the game.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Root seed from which every random stream is derived.
    pub seed: u64,
    /// Player movement and energy economy.
    pub player: PlayerConfig,
    /// Spawn cadence and population floor.
    pub game: SpawnConfig,
    /// Per-ability base values.
    pub abilities: AbilitiesConfig,
    /// Tangler stats and behavior thresholds.
    pub tangler: TanglerConfig,
    /// Signal source cadence and jitter.
    pub signal: SignalConfig,
    /// Classifier backend selection and simulated latency.
    pub classifier: ClassifierConfig,
}

impl GameConfig {
    /// Parses a configuration from TOML text and validates it.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every range constraint the systems rely on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.player.max_energy <= 0.0 {
            return Err(invalid("player.max_energy", "must be positive"));
        }
        if self.player.initial_energy < 0.0 || self.player.initial_energy > self.player.max_energy
        {
            return Err(invalid(
                "player.initial_energy",
                "must lie within [0, player.max_energy]",
            ));
        }
        if self.player.energy_recovery_rate < 0.0 {
            return Err(invalid("player.energy_recovery_rate", "must not be negative"));
        }
        if !positive_finite(self.game.base_spawn_interval) {
            return Err(invalid("game.base_spawn_interval", "must be positive and finite"));
        }
        if !non_negative_finite(self.game.opening_spawn_spacing) {
            return Err(invalid(
                "game.opening_spawn_spacing",
                "must be finite and not negative",
            ));
        }
        for kind in AbilityKind::ALL {
            let ability = self.abilities.get(kind);
            if !non_negative_finite(ability.base_cooldown)
                || !non_negative_finite(ability.base_duration)
                || !non_negative_finite(ability.base_cost)
            {
                return Err(invalid(
                    "abilities",
                    "base cooldown, duration and cost must be finite and not negative",
                ));
            }
        }
        if self.tangler.base_health <= 0.0 {
            return Err(invalid("tangler.base_health", "must be positive"));
        }
        if !(0.0..=1.0).contains(&self.tangler.erratic_threshold) {
            return Err(invalid("tangler.erratic_threshold", "must lie within [0, 1]"));
        }
        if !positive_finite(self.tangler.behavior_refresh_interval) {
            return Err(invalid(
                "tangler.behavior_refresh_interval",
                "must be positive and finite",
            ));
        }
        if !positive_finite(self.signal.sample_interval) {
            return Err(invalid("signal.sample_interval", "must be positive and finite"));
        }
        if !non_negative_finite(self.signal.jitter) {
            return Err(invalid("signal.jitter", "must be finite and not negative"));
        }
        if !(0.0..=1.0).contains(&self.classifier.remote_failure_rate) {
            return Err(invalid(
                "classifier.remote_failure_rate",
                "must lie within [0, 1]",
            ));
        }
        Ok(())
    }
}

fn positive_finite(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

fn non_negative_finite(value: f32) -> bool {
    value.is_finite() && value >= 0.0
}

fn invalid(field: &'static str, reason: &'static str) -> ConfigError {
    ConfigError::Invalid { field, reason }
}

/// Player movement and energy economy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// World units travelled per second while a movement key is held.
    pub move_speed: f32,
    /// Energy at the start of a session.
    pub initial_energy: f32,
    /// Energy ceiling.
    pub max_energy: f32,
    /// Energy recovered per second.
    pub energy_recovery_rate: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            move_speed: 2.5,
            initial_energy: 100.0,
            max_energy: 100.0,
            energy_recovery_rate: 10.0,
        }
    }
}

/// Spawn cadence and population floor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    /// Seconds between timed spawns at a spawn rate multiplier of one.
    pub base_spawn_interval: f32,
    /// Live Tangler count below which a spawn is forced every tick.
    pub min_tangler_count: usize,
    /// Tanglers scheduled when a game starts.
    pub opening_spawns: u32,
    /// Seconds between the scheduled opening spawns.
    pub opening_spawn_spacing: f32,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            base_spawn_interval: 5.0,
            min_tangler_count: 2,
            opening_spawns: 3,
            opening_spawn_spacing: 1.0,
        }
    }
}

/// Base values of a single ability.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AbilityTuning {
    /// Display name.
    pub name: String,
    /// Display description.
    pub description: String,
    /// Cooldown in seconds at a cooldown multiplier of one.
    pub base_cooldown: f32,
    /// Energy cost at an effectiveness multiplier of one.
    pub base_cost: f32,
    /// Damage dealt to a Tangler.
    pub base_damage: f32,
    /// Energy restored to the player.
    pub base_healing: f32,
    /// Duration of the status effect in seconds.
    pub base_duration: f32,
}

impl Default for AbilityTuning {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            base_cooldown: 1.0,
            base_cost: 0.0,
            base_damage: 0.0,
            base_healing: 0.0,
            base_duration: 0.0,
        }
    }
}

/// Base values for every ability.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AbilitiesConfig {
    /// Single-target damage ability.
    pub dendritic_lightning: AbilityTuning,
    /// Energy restoration and calm ability.
    pub serotonin_tsunami: AbilityTuning,
    /// Damage splash ability.
    pub quantum_entanglement: AbilityTuning,
}

impl AbilitiesConfig {
    /// Returns the tuning registered for `kind`.
    #[must_use]
    pub fn get(&self, kind: AbilityKind) -> &AbilityTuning {
        match kind {
            AbilityKind::DendriticLightning => &self.dendritic_lightning,
            AbilityKind::SerotoninTsunami => &self.serotonin_tsunami,
            AbilityKind::QuantumEntanglement => &self.quantum_entanglement,
        }
    }
}

impl Default for AbilitiesConfig {
    fn default() -> Self {
        Self {
            dendritic_lightning: AbilityTuning {
                name: "Dendritic Lightning".to_owned(),
                description: "Electrifies Tau Tanglers with neural impulses".to_owned(),
                base_cooldown: 3.0,
                base_cost: 20.0,
                base_damage: 50.0,
                ..AbilityTuning::default()
            },
            serotonin_tsunami: AbilityTuning {
                name: "Serotonin Tsunami".to_owned(),
                description: "Releases healing energy that calms neural environment".to_owned(),
                base_cooldown: 5.0,
                base_cost: 30.0,
                base_healing: 25.0,
                base_duration: 3.0,
                ..AbilityTuning::default()
            },
            quantum_entanglement: AbilityTuning {
                name: "Quantum Entanglement".to_owned(),
                description: "Creates quantum links between Tau Tanglers".to_owned(),
                base_cooldown: 8.0,
                base_cost: 40.0,
                base_duration: 4.0,
                ..AbilityTuning::default()
            },
        }
    }
}

/// Tangler stats and behavior thresholds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TanglerConfig {
    /// Health at a health scale of one.
    pub base_health: f32,
    /// Score awarded for a kill at a reward multiplier of one.
    pub score_value: u32,
    /// World units per frame-equivalent at a speed factor of one.
    pub base_move_speed: f32,
    /// Fraction of max health below which a Tangler turns erratic.
    pub erratic_threshold: f32,
    /// Speed factor applied when direct damage crosses the erratic threshold.
    pub erratic_speed_multiplier: f32,
    /// Seconds between behavior re-derivations.
    pub behavior_refresh_interval: f32,
    /// Half-width of the cube random spawn positions are drawn from.
    pub spawn_half_extent: f32,
    /// Entanglement splash tuning.
    pub entanglement: EntanglementConfig,
}

impl Default for TanglerConfig {
    fn default() -> Self {
        Self {
            base_health: 100.0,
            score_value: 10,
            base_move_speed: 0.01,
            erratic_threshold: 0.3,
            erratic_speed_multiplier: 1.5,
            behavior_refresh_interval: 5.0,
            spawn_half_extent: 4.0,
            entanglement: EntanglementConfig::default(),
        }
    }
}

/// Entanglement splash tuning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntanglementConfig {
    /// Fraction of the original damage splashed onto another Tangler.
    pub splash_damage_multiplier: f32,
    /// Speed factor applied when splash damage crosses the erratic threshold.
    pub splash_speed_multiplier: f32,
}

impl Default for EntanglementConfig {
    fn default() -> Self {
        Self {
            splash_damage_multiplier: 0.5,
            splash_speed_multiplier: 1.2,
        }
    }
}

/// Signal source cadence and jitter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalConfig {
    /// Seconds between samples.
    pub sample_interval: f32,
    /// Width of the uniform jitter added to every value.
    pub jitter: f32,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            sample_interval: 1.0,
            jitter: 0.1,
        }
    }
}

/// Classifier backend selection and simulated latency.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Endpoint reported by the simulated remote service.
    pub remote_endpoint: String,
    /// Whether the simulated remote service passes its startup check.
    pub remote_available: bool,
    /// Simulated round-trip latency in milliseconds.
    pub remote_latency_ms: u64,
    /// Probability that a simulated remote call fails.
    pub remote_failure_rate: f32,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            remote_endpoint: "https://api.deepseek.com/v1".to_owned(),
            remote_available: true,
            remote_latency_ms: 300,
            remote_failure_rate: 0.0,
        }
    }
}
