//! Error taxonomy shared by every system.
//!
//! None of these errors are fatal to the game loop. Each one degrades to a
//! safe default at the call site and is surfaced through logging only.

use thiserror::Error;

use crate::AbilityKind;

/// Reasons an ability activation may be rejected.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ActivationError {
    /// No ability is registered under the requested key.
    #[error("ability `{name}` not found")]
    NotFound {
        /// Key that failed to resolve.
        name: String,
    },
    /// The ability has not finished cooling down.
    #[error("ability `{}` on cooldown for {remaining:.2}s", ability.key())]
    OnCooldown {
        /// Ability that is still cooling down.
        ability: AbilityKind,
        /// Seconds of cooldown left.
        remaining: f32,
    },
    /// The player cannot afford the ability.
    #[error("insufficient energy: {required:.1} required, {available:.1} available")]
    InsufficientEnergy {
        /// Energy the activation would cost.
        required: f32,
        /// Energy the player has.
        available: f32,
    },
}

/// Failures raised while inferring an emotional state.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ClassificationError {
    /// The sample contained a non-finite band value.
    #[error("sample contains non-finite band `{band}`")]
    InvalidSample {
        /// Name of the offending band.
        band: &'static str,
    },
    /// The remote inference service failed to answer.
    #[error("remote inference failed: {0}")]
    Remote(String),
}

/// Failures raised while checking a classifier dependency at startup.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum InitializationError {
    /// The remote inference service could not be reached.
    #[error("remote inference service `{endpoint}` unavailable")]
    RemoteUnavailable {
        /// Endpoint that failed the feasibility check.
        endpoint: String,
    },
}

/// Failures raised by the signal source.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SignalError {
    /// The requested simulation mode does not exist.
    #[error("unknown EEG simulation mode `{0}`")]
    UnknownMode(String),
}

/// Failures raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration text is not valid TOML for the expected schema.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    /// A field holds a value outside its permitted range.
    #[error("invalid configuration value for `{field}`: {reason}")]
    Invalid {
        /// Dotted path of the offending field.
        field: &'static str,
        /// Human-readable description of the constraint.
        reason: &'static str,
    },
}
