use std::collections::{BTreeSet, VecDeque};

use synaptic_wars_core::{
    AdaptationDirectives, AdaptationRecord, EmotionalState, EmotionalTrend, GameState,
    PerformanceReport, ADAPTATION_HISTORY_CAPACITY,
};
use tracing::{debug, info};

use crate::{adapt_game_state, map_to_directives, reduce, GameStateDelta};

/// Confidence above which an adaptation counts as a success.
pub const SUCCESS_CONFIDENCE: f32 = 0.6;

/// Number of recent records the engagement score is computed over.
pub const ENGAGEMENT_WINDOW: usize = 10;

/// Result of applying one emotional state.
#[derive(Clone, Debug, PartialEq)]
pub struct AdaptationOutcome {
    /// Directives derived from the state.
    pub directives: AdaptationDirectives,
    /// Field-level changes made to the game state.
    pub delta: GameStateDelta,
    /// Game state after the delta.
    pub state: GameState,
}

#[derive(Clone, Copy, Debug, Default)]
struct Metrics {
    total: u32,
    success: u32,
    engagement: f32,
}

/// Applies emotional states to the game state and keeps a bounded history.
#[derive(Debug, Default)]
pub struct AdaptiveEngine {
    history: VecDeque<AdaptationRecord>,
    current: Option<AdaptationDirectives>,
    metrics: Metrics,
}

impl AdaptiveEngine {
    /// Creates an engine with no directives in force.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps `emotional` to directives, reduces `game` with them and records the result.
    pub fn apply(
        &mut self,
        emotional: &EmotionalState,
        game: &GameState,
        now_ms: u64,
    ) -> AdaptationOutcome {
        let directives = map_to_directives(emotional);
        let delta = adapt_game_state(game, &directives);
        let state = reduce(*game, &delta);

        if self.history.len() == ADAPTATION_HISTORY_CAPACITY {
            let _ = self.history.pop_front();
        }
        self.history.push_back(AdaptationRecord {
            emotional_state: emotional.clone(),
            directives,
            before: *game,
            after: state,
            timestamp_ms: now_ms,
        });
        self.current = Some(directives);
        self.track(emotional);

        info!(
            label = %emotional.label,
            behavior = ?directives.behavior,
            difficulty = state.difficulty_multiplier,
            "adaptation applied"
        );

        AdaptationOutcome {
            directives,
            delta,
            state,
        }
    }

    fn track(&mut self, emotional: &EmotionalState) {
        self.metrics.total = self.metrics.total.saturating_add(1);
        if emotional.confidence > SUCCESS_CONFIDENCE {
            self.metrics.success = self.metrics.success.saturating_add(1);
        }

        let recent = self
            .history
            .iter()
            .rev()
            .take(ENGAGEMENT_WINDOW)
            .map(|record| &record.emotional_state);
        let mut count = 0_usize;
        let mut intensity = 0.0_f32;
        let mut labels = BTreeSet::new();
        for state in recent {
            count += 1;
            intensity += state.intensity;
            let _ = labels.insert(state.label);
        }
        if count > 0 {
            let mean = intensity / count as f32;
            let variety = labels.len() as f32 / 10.0;
            self.metrics.engagement = (mean + variety) / 2.0;
        }
        debug!(engagement = self.metrics.engagement, "engagement updated");
    }

    /// Directives currently in force.
    #[must_use]
    pub fn current_directives(&self) -> Option<&AdaptationDirectives> {
        self.current.as_ref()
    }

    /// Applied adaptations, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &AdaptationRecord> {
        self.history.iter()
    }

    /// Number of records in the history.
    #[must_use]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Aggregates the engine metrics together with the supplied trend.
    #[must_use]
    pub fn performance_report(&self, trend: EmotionalTrend) -> PerformanceReport {
        let success_rate = if self.metrics.total == 0 {
            0.0
        } else {
            self.metrics.success as f32 / self.metrics.total as f32
        };
        PerformanceReport {
            adaptation_success: self.metrics.success,
            adaptation_total: self.metrics.total,
            success_rate,
            engagement_score: self.metrics.engagement,
            current_directives: self.current,
            adaptation_history_count: self.history.len(),
            emotional_trend: trend,
        }
    }

    /// Clears history, directives and metrics.
    pub fn reset(&mut self) {
        *self = Self::default();
        info!("adaptive engine reset");
    }
}
