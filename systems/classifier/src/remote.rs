use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use synaptic_wars_core::{
    config::ClassifierConfig, ClassificationError, EmotionLabel, GameState, InitializationError,
    Sample,
};
use tracing::debug;

use crate::{Inference, InferenceBackend};

/// Labels the simulated remote service answers with.
pub const REMOTE_LABELS: [EmotionLabel; 6] = [
    EmotionLabel::Focused,
    EmotionLabel::Frustrated,
    EmotionLabel::Excited,
    EmotionLabel::Calm,
    EmotionLabel::Confused,
    EmotionLabel::Engaged,
];

/// Stand-in for a remote inference service.
///
/// Ignores the sample content and answers with a uniformly drawn label after
/// a fixed simulated latency.
#[derive(Debug)]
pub struct RemoteStub {
    endpoint: String,
    available: bool,
    latency: Duration,
    failure_rate: f32,
    rng: ChaCha8Rng,
}

impl RemoteStub {
    /// Creates a stub with explicit behavior.
    #[must_use]
    pub fn new(
        endpoint: impl Into<String>,
        available: bool,
        latency: Duration,
        failure_rate: f32,
        rng_seed: u64,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            available,
            latency,
            failure_rate: failure_rate.clamp(0.0, 1.0),
            rng: ChaCha8Rng::seed_from_u64(rng_seed),
        }
    }

    /// Creates a stub from the static classifier section.
    #[must_use]
    pub fn from_settings(settings: &ClassifierConfig, rng_seed: u64) -> Self {
        Self::new(
            settings.remote_endpoint.clone(),
            settings.remote_available,
            Duration::from_millis(settings.remote_latency_ms),
            settings.remote_failure_rate,
            rng_seed,
        )
    }
}

impl InferenceBackend for RemoteStub {
    fn name(&self) -> &'static str {
        "remote-stub"
    }

    fn probe(&mut self) -> Result<(), InitializationError> {
        if self.available {
            Ok(())
        } else {
            Err(InitializationError::RemoteUnavailable {
                endpoint: self.endpoint.clone(),
            })
        }
    }

    fn latency(&self) -> Duration {
        self.latency
    }

    fn infer(
        &mut self,
        sample: &Sample,
        context: &GameState,
    ) -> Result<Inference, ClassificationError> {
        debug!(
            endpoint = %self.endpoint,
            beta = sample.beta,
            score = context.score,
            "remote inference requested"
        );

        if self.failure_rate > 0.0 && self.rng.gen::<f32>() < self.failure_rate {
            return Err(ClassificationError::Remote(format!(
                "{} timed out",
                self.endpoint
            )));
        }

        let label = REMOTE_LABELS[self.rng.gen_range(0..REMOTE_LABELS.len())];
        Ok(Inference {
            label,
            intensity: self.rng.gen_range(0.2..1.0),
            confidence: self.rng.gen_range(0.5..1.0),
            narrative: format!("Player shows signs of {label}. Adjust experience accordingly."),
        })
    }
}
