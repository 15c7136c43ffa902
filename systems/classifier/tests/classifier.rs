use std::time::Duration;

use synaptic_wars_core::{
    EmotionLabel, EmotionalState, EmotionalTrend, GameState, Sample, EMOTIONAL_HISTORY_CAPACITY,
};
use synaptic_wars_system_classifier::{
    ClassifierMode, EmotionalDirector, RemoteStub, StateClassifier, REMOTE_LABELS,
};

fn context() -> GameState {
    GameState::new(100.0, 100.0)
}

fn remote(available: bool, failure_rate: f32) -> Box<RemoteStub> {
    Box::new(RemoteStub::new(
        "https://inference.invalid/v1",
        available,
        Duration::from_millis(300),
        failure_rate,
        0x5eed,
    ))
}

#[test]
fn remote_stub_draws_from_fixed_label_set_within_ranges() {
    let mut classifier = StateClassifier::initialize(remote(true, 0.0));
    assert_eq!(classifier.mode(), ClassifierMode::Preferred);
    assert_eq!(classifier.backend_name(), "remote-stub");

    for step in 0..200_u64 {
        let now = Duration::from_secs(step);
        let pending = classifier.classify(&Sample::default(), &context(), now);
        assert_eq!(pending.ready_at(), now + Duration::from_millis(300));

        let state = pending.state();
        assert!(REMOTE_LABELS.contains(&state.label), "{:?}", state.label);
        assert!((0.2..=1.0).contains(&state.intensity));
        assert!((0.5..=1.0).contains(&state.confidence));
        assert!(state.narrative.contains(state.label.as_str()));
    }
}

#[test]
fn remote_results_are_not_visible_before_latency_elapses() {
    let mut classifier = StateClassifier::initialize(remote(true, 0.0));
    let pending = classifier.classify(&Sample::default(), &context(), Duration::from_secs(1));
    assert!(!pending.is_ready(Duration::from_millis(1_299)));
    assert!(pending.is_ready(Duration::from_millis(1_300)));
}

#[test]
fn unavailable_remote_falls_back_to_local_rules() {
    let mut classifier = StateClassifier::initialize(remote(false, 0.0));
    assert_eq!(classifier.mode(), ClassifierMode::LocalFallback);
    assert_eq!(classifier.backend_name(), "local");

    let sample = Sample {
        alpha: 0.2,
        beta: 0.8,
        theta: 0.1,
        ..Sample::default()
    };
    let pending = classifier.classify(&sample, &context(), Duration::from_secs(4));
    assert!(pending.is_ready(Duration::from_secs(4)), "local rules answer immediately");

    let state = pending.into_state();
    assert_eq!(state.label, EmotionLabel::Focused);
    assert!((state.intensity - 1.0).abs() < f32::EPSILON, "intensity is clamped");
    assert!((state.confidence - 0.8).abs() < f32::EPSILON);
}

#[test]
fn remote_failures_degrade_to_neutral_default() {
    let mut classifier = StateClassifier::initialize(remote(true, 1.0));
    for step in 0..10 {
        let state = classifier
            .classify(&Sample::default(), &context(), Duration::from_secs(step))
            .into_state();
        assert_eq!(state.label, EmotionLabel::Neutral);
        assert!((state.intensity - 0.5).abs() < f32::EPSILON);
        assert!((state.confidence - 0.5).abs() < f32::EPSILON);
    }
}

#[test]
fn director_starts_neutral_and_tracks_latest_state() {
    let mut director = EmotionalDirector::new();
    assert_eq!(director.current().label, EmotionLabel::Neutral);
    assert_eq!(director.history_len(), 0);

    let state = EmotionalState::new(EmotionLabel::Excited, 0.9, 0.7, "", 1_000);
    director.record(state.clone(), context());
    assert_eq!(director.current(), &state);
    assert_eq!(director.history_len(), 1);
}

#[test]
fn director_history_is_bounded_and_evicts_oldest() {
    let mut director = EmotionalDirector::new();
    for step in 0..(EMOTIONAL_HISTORY_CAPACITY as u64 + 37) {
        director.record(
            EmotionalState::new(EmotionLabel::Calm, 0.5, 0.5, "", step),
            context(),
        );
        assert!(director.history_len() <= EMOTIONAL_HISTORY_CAPACITY);
    }

    let oldest = director.history().next().expect("history populated");
    assert_eq!(oldest.state.timestamp_ms, 37);
    assert_eq!(director.current().timestamp_ms, 136);
}

#[test]
fn trend_follows_recent_mean_intensity() {
    let mut director = EmotionalDirector::new();
    for step in 0..4 {
        director.record(
            EmotionalState::new(EmotionLabel::Excited, 0.95, 0.9, "", step),
            context(),
        );
    }
    assert_eq!(director.trend(), EmotionalTrend::Stable, "fewer than five states");

    director.record(
        EmotionalState::new(EmotionLabel::Excited, 0.95, 0.9, "", 4),
        context(),
    );
    assert_eq!(director.trend(), EmotionalTrend::Increasing);

    for step in 5..10 {
        director.record(
            EmotionalState::new(EmotionLabel::Tired, 0.1, 0.9, "", step),
            context(),
        );
    }
    assert_eq!(director.trend(), EmotionalTrend::Decreasing);

    director.reset();
    assert_eq!(director.history_len(), 0);
    assert_eq!(director.trend(), EmotionalTrend::Stable);
}

#[test]
fn recommendations_cover_actionable_labels() {
    assert_eq!(EmotionalDirector::recommendations(EmotionLabel::Frustrated).len(), 2);
    assert_eq!(EmotionalDirector::recommendations(EmotionLabel::Focused).len(), 2);
    assert_eq!(EmotionalDirector::recommendations(EmotionLabel::Calm).len(), 2);
    assert!(EmotionalDirector::recommendations(EmotionLabel::Confused).is_empty());
}
