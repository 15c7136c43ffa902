use std::time::Duration;

use synaptic_wars_core::{ClassificationError, EmotionLabel, GameState, Sample};

use crate::{Inference, InferenceBackend};

const BAND_NAMES: [&str; 7] = ["alpha", "beta", "theta", "delta", "gamma", "focus", "calm"];

/// Deterministic threshold rules used when no remote service is available.
///
/// `focus = beta / (theta + 0.1)`. The label is `focused` when focus exceeds
/// 0.7, otherwise `calm` when alpha exceeds 0.6, otherwise `tired` when theta
/// exceeds 0.4, otherwise `neutral`.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalInference;

impl LocalInference {
    /// Applies the threshold rules to a sample.
    pub fn evaluate(sample: &Sample) -> Result<Inference, ClassificationError> {
        for (value, band) in sample.values().into_iter().zip(BAND_NAMES) {
            if !value.is_finite() {
                return Err(ClassificationError::InvalidSample { band });
            }
        }

        let focus = sample.beta / (sample.theta + 0.1);
        let label = if focus > 0.7 {
            EmotionLabel::Focused
        } else if sample.alpha > 0.6 {
            EmotionLabel::Calm
        } else if sample.theta > 0.4 {
            EmotionLabel::Tired
        } else {
            EmotionLabel::Neutral
        };

        Ok(Inference {
            label,
            intensity: focus.max(sample.alpha),
            confidence: 0.8,
            narrative: format!("Local inference: {label}"),
        })
    }
}

impl InferenceBackend for LocalInference {
    fn name(&self) -> &'static str {
        "local"
    }

    fn latency(&self) -> Duration {
        Duration::ZERO
    }

    fn infer(
        &mut self,
        sample: &Sample,
        _context: &GameState,
    ) -> Result<Inference, ClassificationError> {
        Self::evaluate(sample)
    }
}
