use std::collections::VecDeque;

use synaptic_wars_core::{
    EmotionLabel, EmotionalRecord, EmotionalState, EmotionalTrend, GameState,
    EMOTIONAL_HISTORY_CAPACITY,
};
use tracing::info;

/// Number of most recent states the emotional trend is computed over.
pub const TREND_WINDOW: usize = 5;

/// Keeps the current emotional state and its bounded history.
#[derive(Clone, Debug)]
pub struct EmotionalDirector {
    current: EmotionalState,
    history: VecDeque<EmotionalRecord>,
}

impl Default for EmotionalDirector {
    fn default() -> Self {
        Self::new()
    }
}

impl EmotionalDirector {
    /// Creates a director whose current state is the neutral default.
    #[must_use]
    pub fn new() -> Self {
        Self {
            current: EmotionalState::neutral_default(0),
            history: VecDeque::with_capacity(EMOTIONAL_HISTORY_CAPACITY),
        }
    }

    /// Most recent state; the neutral default before the first classification.
    #[must_use]
    pub fn current(&self) -> &EmotionalState {
        &self.current
    }

    /// Recorded states, oldest first.
    pub fn history(&self) -> impl ExactSizeIterator<Item = &EmotionalRecord> {
        self.history.iter()
    }

    /// Number of recorded states.
    #[must_use]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Records a resolved state and makes it current, evicting the oldest entry when full.
    pub fn record(&mut self, state: EmotionalState, context: GameState) {
        if state.intensity > 0.7 {
            info!(
                label = %state.label,
                intensity = state.intensity,
                "high intensity emotional state"
            );
        }

        while self.history.len() >= EMOTIONAL_HISTORY_CAPACITY {
            let _ = self.history.pop_front();
        }
        self.history.push_back(EmotionalRecord {
            state: state.clone(),
            context,
        });
        self.current = state;
    }

    /// Direction of the mean intensity across the last [`TREND_WINDOW`] states.
    #[must_use]
    pub fn trend(&self) -> EmotionalTrend {
        if self.history.len() < TREND_WINDOW {
            return EmotionalTrend::Stable;
        }

        let recent = self.history.iter().rev().take(TREND_WINDOW);
        let total: f32 = recent.map(|record| record.state.intensity).sum();
        let average = total / TREND_WINDOW as f32;
        if average > 0.7 {
            EmotionalTrend::Increasing
        } else if average < 0.3 {
            EmotionalTrend::Decreasing
        } else {
            EmotionalTrend::Stable
        }
    }

    /// Player-facing suggestions for the provided label.
    #[must_use]
    pub fn recommendations(label: EmotionLabel) -> &'static [&'static str] {
        match label {
            EmotionLabel::Frustrated => &[
                "Consider taking a brief break",
                "Try using defensive abilities more",
            ],
            EmotionLabel::Focused => &[
                "Perfect state for challenging content",
                "Try aggressive ability combinations",
            ],
            EmotionLabel::Calm => &[
                "Great for strategic planning",
                "Experiment with different approaches",
            ],
            _ => &[],
        }
    }

    /// Clears the history and restores the neutral default.
    pub fn reset(&mut self) {
        self.history.clear();
        self.current = EmotionalState::neutral_default(0);
    }
}
