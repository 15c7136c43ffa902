use std::{cell::RefCell, rc::Rc, time::Duration};

use synaptic_wars_core::{config::SignalConfig, EegMode, Sample, SignalError};
use synaptic_wars_system_signal::{Config, EegSimulator};

fn connected(seed: u64) -> EegSimulator {
    let mut simulator = EegSimulator::new(Config::new(Duration::from_secs(1), 0.1, seed));
    let _ = simulator.connect();
    simulator
}

#[test]
fn every_band_stays_within_clamp_for_all_modes() {
    for mode in EegMode::ALL {
        let mut simulator = connected(0xfeed_beef);
        simulator.set_mode(mode);
        for _ in 0..500 {
            let sample = simulator
                .advance(Duration::from_secs(1))
                .expect("one sample per second");
            for value in sample.values() {
                assert!(
                    (Sample::MIN_VALUE..=Sample::MAX_VALUE).contains(&value),
                    "{mode:?} produced out-of-range value {value}"
                );
            }
        }
    }
}

#[test]
fn non_finite_jitter_falls_back_to_unjittered_values() {
    for jitter in [f32::NAN, f32::INFINITY] {
        let mut simulator = EegSimulator::new(Config::new(Duration::from_secs(1), jitter, 3));
        let _ = simulator.connect();
        for _ in 0..20 {
            let sample = simulator.advance(Duration::from_secs(1)).expect("sample");
            assert!(sample
                .values()
                .iter()
                .all(|value| (Sample::MIN_VALUE..=Sample::MAX_VALUE).contains(value)));
        }
    }
}

#[test]
fn infinite_interval_setting_never_samples() {
    let settings = SignalConfig {
        sample_interval: f32::INFINITY,
        ..SignalConfig::default()
    };
    let mut simulator = EegSimulator::new(Config::from_settings(&settings, 4));
    let _ = simulator.connect();
    assert!(simulator.advance(Duration::from_secs(3_600)).is_none());
}

#[test]
fn extreme_jitter_is_still_clamped() {
    let mut simulator = EegSimulator::new(Config::new(Duration::from_secs(1), 10.0, 11));
    let _ = simulator.connect();
    simulator.set_mode(EegMode::Stressed);
    for _ in 0..200 {
        let sample = simulator.advance(Duration::from_secs(1)).expect("sample");
        assert!(sample
            .values()
            .iter()
            .all(|value| (Sample::MIN_VALUE..=Sample::MAX_VALUE).contains(value)));
    }
}

#[test]
fn produces_samples_at_fixed_cadence() {
    let mut simulator = connected(1);
    assert!(simulator.advance(Duration::from_millis(500)).is_none());
    assert!(simulator.advance(Duration::from_millis(499)).is_none());
    assert!(simulator.advance(Duration::from_millis(1)).is_some());
    assert!(simulator.advance(Duration::from_millis(999)).is_none());
}

#[test]
fn disconnected_source_produces_nothing() {
    let mut simulator = EegSimulator::new(Config::new(Duration::from_secs(1), 0.1, 2));
    assert!(simulator.advance(Duration::from_secs(5)).is_none());

    let _ = simulator.connect();
    assert!(simulator.advance(Duration::from_secs(1)).is_some());

    simulator.disconnect();
    assert!(!simulator.is_connected());
    assert!(simulator.advance(Duration::from_secs(5)).is_none());
}

#[test]
fn mode_switch_applies_to_next_sample_only() {
    let mut simulator = connected(5);
    simulator.set_mode(EegMode::Relaxed);
    let before = simulator.current();

    simulator.set_mode(EegMode::Focused);
    assert_eq!(simulator.current(), before, "no retroactive resampling");

    let sample = simulator.advance(Duration::from_secs(1)).expect("sample");
    assert!(sample.beta >= 0.55, "focused beta expected, got {}", sample.beta);
    assert!(sample.alpha <= 0.35, "focused alpha expected, got {}", sample.alpha);
}

#[test]
fn unknown_mode_is_rejected_without_changing_mode() {
    let mut simulator = connected(5);
    simulator.set_mode(EegMode::Stressed);
    assert_eq!(
        simulator.set_mode_by_name("asleep"),
        Err(SignalError::UnknownMode("asleep".to_owned()))
    );
    assert_eq!(simulator.mode(), EegMode::Stressed);
    assert_eq!(simulator.set_mode_by_name("relaxed"), Ok(EegMode::Relaxed));
}

#[test]
fn failing_consumer_does_not_stop_the_stream() {
    let mut simulator = connected(8);
    let calls = Rc::new(RefCell::new(0_u32));
    let seen = Rc::clone(&calls);
    simulator.set_data_update_handler(Box::new(move |_sample: &Sample| -> anyhow::Result<()> {
        *seen.borrow_mut() += 1;
        anyhow::bail!("consumer rejected sample")
    }));

    for _ in 0..3 {
        assert!(simulator.advance(Duration::from_secs(1)).is_some());
    }
    assert_eq!(*calls.borrow(), 3);
}

#[test]
fn panicking_consumer_does_not_stop_the_stream() {
    let mut simulator = connected(8);
    let calls = Rc::new(RefCell::new(0_u32));
    let seen = Rc::clone(&calls);
    simulator.set_data_update_handler(Box::new(move |_sample: &Sample| -> anyhow::Result<()> {
        *seen.borrow_mut() += 1;
        panic!("consumer exploded");
    }));

    for _ in 0..2 {
        assert!(simulator.advance(Duration::from_secs(1)).is_some());
    }
    assert_eq!(*calls.borrow(), 2);
}

#[test]
fn consumer_receives_each_sample_for_large_steps() {
    let mut simulator = connected(13);
    let received = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&received);
    simulator.set_data_update_handler(Box::new(move |sample: &Sample| -> anyhow::Result<()> {
        sink.borrow_mut().push(*sample);
        Ok(())
    }));

    let latest = simulator.advance(Duration::from_secs(4)).expect("sample");
    let received = received.borrow();
    assert_eq!(received.len(), 4);
    assert_eq!(received.last(), Some(&latest));
}

#[test]
fn identical_seeds_replay_identically() {
    let run = |seed| {
        let mut simulator = connected(seed);
        (0..20)
            .filter_map(|_| simulator.advance(Duration::from_secs(1)))
            .collect::<Vec<_>>()
    };
    assert_eq!(run(77), run(77));
    assert_ne!(run(77), run(78));
}
