#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Emotional-state classification for the neuro-adaptive loop.
//!
//! A [`StateClassifier`] wraps one [`InferenceBackend`]. At construction the
//! preferred backend is probed; a failed probe switches the classifier to the
//! deterministic [`LocalInference`] rules. Classification never blocks the
//! caller: every request returns a [`Classification`] stamped with the
//! simulation time at which its result becomes visible, and the caller polls
//! it from its own tick. Backend failures are absorbed into the neutral
//! default state.

mod director;
mod local;
mod remote;

use std::time::Duration;

use synaptic_wars_core::{
    duration_millis, ClassificationError, EmotionLabel, EmotionalState, GameState,
    InitializationError, Sample,
};
use tracing::{debug, info, warn};

pub use crate::{
    director::{EmotionalDirector, TREND_WINDOW},
    local::LocalInference,
    remote::{RemoteStub, REMOTE_LABELS},
};

/// Raw inference produced by a backend before it is stamped with a timestamp.
#[derive(Clone, Debug, PartialEq)]
pub struct Inference {
    /// Classified label.
    pub label: EmotionLabel,
    /// Strength of the state; clamped into `[0, 1]` when stamped.
    pub intensity: f32,
    /// Backend confidence; clamped into `[0, 1]` when stamped.
    pub confidence: f32,
    /// Narrative prompt accompanying the label.
    pub narrative: String,
}

/// Pluggable inference service.
pub trait InferenceBackend {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Startup feasibility check.
    fn probe(&mut self) -> Result<(), InitializationError> {
        Ok(())
    }

    /// Simulated time between a request and its answer.
    fn latency(&self) -> Duration;

    /// Infers an emotional state from a sample and the surrounding game context.
    fn infer(
        &mut self,
        sample: &Sample,
        context: &GameState,
    ) -> Result<Inference, ClassificationError>;
}

/// Classification request in flight.
#[derive(Clone, Debug, PartialEq)]
pub struct Classification {
    state: EmotionalState,
    ready_at: Duration,
}

impl Classification {
    /// Simulation time at which the result becomes visible.
    #[must_use]
    pub fn ready_at(&self) -> Duration {
        self.ready_at
    }

    /// Reports whether the result is visible at `now`.
    #[must_use]
    pub fn is_ready(&self, now: Duration) -> bool {
        now >= self.ready_at
    }

    /// Peeks at the state the request will resolve to.
    #[must_use]
    pub fn state(&self) -> &EmotionalState {
        &self.state
    }

    /// Consumes the request, yielding its state.
    #[must_use]
    pub fn into_state(self) -> EmotionalState {
        self.state
    }
}

/// Which backend the classifier ended up using.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClassifierMode {
    /// The preferred backend passed its startup check.
    Preferred,
    /// The preferred backend failed its startup check; local rules are in use.
    LocalFallback,
}

/// Maps samples to emotional states through one backend.
pub struct StateClassifier {
    backend: Box<dyn InferenceBackend>,
    mode: ClassifierMode,
}

impl std::fmt::Debug for StateClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateClassifier")
            .field("backend", &self.backend.name())
            .field("mode", &self.mode)
            .finish()
    }
}

impl StateClassifier {
    /// Probes `preferred` and falls back to [`LocalInference`] when it is unavailable.
    #[must_use]
    pub fn initialize(mut preferred: Box<dyn InferenceBackend>) -> Self {
        match preferred.probe() {
            Ok(()) => {
                info!(backend = preferred.name(), "classifier ready");
                Self {
                    backend: preferred,
                    mode: ClassifierMode::Preferred,
                }
            }
            Err(error) => {
                warn!(%error, "classifier backend unavailable, using local fallback");
                Self {
                    backend: Box::new(LocalInference),
                    mode: ClassifierMode::LocalFallback,
                }
            }
        }
    }

    /// Backend selection made at initialization.
    #[must_use]
    pub fn mode(&self) -> ClassifierMode {
        self.mode
    }

    /// Name of the backend in use.
    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Submits a sample for classification at simulation time `now`.
    ///
    /// Failures resolve to [`EmotionalState::neutral_default`]; they are
    /// logged and never surface to the caller.
    pub fn classify(&mut self, sample: &Sample, context: &GameState, now: Duration) -> Classification {
        let ready_at = now.saturating_add(self.backend.latency());
        let timestamp_ms = duration_millis(ready_at);

        let state = match self.backend.infer(sample, context) {
            Ok(inference) => EmotionalState::new(
                inference.label,
                inference.intensity,
                inference.confidence,
                inference.narrative,
                timestamp_ms,
            ),
            Err(error) => {
                warn!(%error, backend = self.backend.name(), "classification failed");
                EmotionalState::neutral_default(timestamp_ms)
            }
        };

        debug!(label = %state.label, intensity = state.intensity, "classification submitted");
        Classification { state, ready_at }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Exploding;

    impl InferenceBackend for Exploding {
        fn name(&self) -> &'static str {
            "exploding"
        }

        fn latency(&self) -> Duration {
            Duration::from_millis(10)
        }

        fn infer(
            &mut self,
            _sample: &Sample,
            _context: &GameState,
        ) -> Result<Inference, ClassificationError> {
            Err(ClassificationError::Remote("boom".to_owned()))
        }
    }

    #[test]
    fn failures_resolve_to_neutral_default() {
        let mut classifier = StateClassifier::initialize(Box::new(Exploding));
        let context = GameState::new(100.0, 100.0);
        let pending = classifier.classify(&Sample::default(), &context, Duration::from_secs(2));

        assert!(!pending.is_ready(Duration::from_secs(2)));
        assert!(pending.is_ready(Duration::from_millis(2_010)));

        let state = pending.into_state();
        assert_eq!(state.label, EmotionLabel::Neutral);
        assert!((state.intensity - 0.5).abs() < f32::EPSILON);
        assert!((state.confidence - 0.5).abs() < f32::EPSILON);
        assert_eq!(state.timestamp_ms, 2_010);
    }
}
