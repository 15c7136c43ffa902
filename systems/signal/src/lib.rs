#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Simulated EEG signal source that emits one biosignal sample per cadence.
//!
//! The simulator accumulates simulated time and produces a [`Sample`] every
//! time a full sample interval elapses. Each mode draws its bands from a
//! distinct distribution; [`EegMode::Dynamic`] additionally drifts with a slow
//! sinusoid of the simulator's own clock. Every value is jittered and then
//! clamped into `[Sample::MIN_VALUE, Sample::MAX_VALUE]`.

use std::{
    panic::{self, AssertUnwindSafe},
    time::Duration,
};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use synaptic_wars_core::{
    config::SignalConfig, duration_from_secs, EegMode, Sample, SignalError,
};
use tracing::{debug, info, warn};

/// Callback invoked with every produced sample.
pub type SampleHandler = Box<dyn FnMut(&Sample) -> anyhow::Result<()>>;

/// Configuration parameters required to construct the simulator.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    sample_interval: Duration,
    jitter: f32,
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided cadence, jitter width and seed.
    #[must_use]
    pub const fn new(sample_interval: Duration, jitter: f32, rng_seed: u64) -> Self {
        Self {
            sample_interval,
            jitter,
            rng_seed,
        }
    }

    /// Derives a configuration from the static signal section.
    #[must_use]
    pub fn from_settings(settings: &SignalConfig, rng_seed: u64) -> Self {
        Self::new(
            duration_from_secs(settings.sample_interval.max(0.001)),
            settings.jitter,
            rng_seed,
        )
    }
}

/// Band distribution expressed as `base + uniform(0, spread)`.
#[derive(Clone, Copy, Debug)]
struct Band {
    base: f32,
    spread: f32,
}

const fn band(base: f32, spread: f32) -> Band {
    Band { base, spread }
}

/// Distributions for alpha, beta, theta, delta, gamma, focus and calm.
type Profile = [Band; 7];

const FOCUSED: Profile = [
    band(0.2, 0.1),
    band(0.6, 0.2),
    band(0.1, 0.1),
    band(0.05, 0.05),
    band(0.5, 0.2),
    band(0.8, 0.15),
    band(0.3, 0.2),
];

const STRESSED: Profile = [
    band(0.1, 0.1),
    band(0.7, 0.2),
    band(0.3, 0.2),
    band(0.1, 0.1),
    band(0.6, 0.2),
    band(0.9, 0.1),
    band(0.1, 0.1),
];

const RELAXED: Profile = [
    band(0.6, 0.2),
    band(0.2, 0.1),
    band(0.3, 0.2),
    band(0.2, 0.1),
    band(0.3, 0.1),
    band(0.4, 0.2),
    band(0.7, 0.2),
];

/// Simulated EEG headset producing samples at a fixed cadence.
pub struct EegSimulator {
    mode: EegMode,
    connected: bool,
    sample_interval: Duration,
    jitter: f32,
    accumulator: Duration,
    sample_clock: Duration,
    current: Sample,
    rng: ChaCha8Rng,
    handler: Option<SampleHandler>,
}

impl std::fmt::Debug for EegSimulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EegSimulator")
            .field("mode", &self.mode)
            .field("connected", &self.connected)
            .field("sample_interval", &self.sample_interval)
            .field("sample_clock", &self.sample_clock)
            .field("current", &self.current)
            .field("has_handler", &self.handler.is_some())
            .finish()
    }
}

impl EegSimulator {
    /// Creates a disconnected simulator in [`EegMode::Dynamic`].
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            mode: EegMode::Dynamic,
            connected: false,
            sample_interval: config.sample_interval,
            jitter: config.jitter,
            accumulator: Duration::ZERO,
            sample_clock: Duration::ZERO,
            current: Sample::default(),
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            handler: None,
        }
    }

    /// Starts the sample stream and returns the most recent sample.
    pub fn connect(&mut self) -> Sample {
        self.connected = true;
        self.accumulator = Duration::ZERO;
        info!("EEG simulator connected");
        self.current
    }

    /// Stops the sample stream; later calls to [`EegSimulator::advance`] produce nothing.
    pub fn disconnect(&mut self) {
        if self.connected {
            info!("EEG simulator disconnected");
        }
        self.connected = false;
        self.accumulator = Duration::ZERO;
    }

    /// Reports whether the stream is running.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Active simulation mode.
    #[must_use]
    pub fn mode(&self) -> EegMode {
        self.mode
    }

    /// Switches the simulation mode. Takes effect on the next produced sample.
    pub fn set_mode(&mut self, mode: EegMode) {
        self.mode = mode;
        info!(mode = mode.as_str(), "EEG simulation mode changed");
    }

    /// Switches the simulation mode by name, leaving the mode unchanged on error.
    pub fn set_mode_by_name(&mut self, name: &str) -> Result<EegMode, SignalError> {
        let mode = name.parse::<EegMode>()?;
        self.set_mode(mode);
        Ok(mode)
    }

    /// Most recently produced sample.
    #[must_use]
    pub fn current(&self) -> Sample {
        self.current
    }

    /// Registers the consumer notified with every produced sample, replacing any previous one.
    pub fn set_data_update_handler(&mut self, handler: SampleHandler) {
        self.handler = Some(handler);
    }

    /// Removes the registered consumer.
    pub fn clear_data_update_handler(&mut self) {
        self.handler = None;
    }

    /// Advances the simulator clock, producing one sample per elapsed interval.
    ///
    /// Returns the latest sample produced during this call, if any.
    pub fn advance(&mut self, dt: Duration) -> Option<Sample> {
        if !self.connected || self.sample_interval.is_zero() {
            return None;
        }

        self.accumulator = self.accumulator.saturating_add(dt);
        let mut latest = None;
        while self.accumulator >= self.sample_interval {
            self.accumulator -= self.sample_interval;
            self.sample_clock = self.sample_clock.saturating_add(self.sample_interval);
            let sample = self.produce();
            self.notify(&sample);
            latest = Some(sample);
        }
        latest
    }

    fn produce(&mut self) -> Sample {
        let base = match self.mode {
            EegMode::Focused => self.draw_profile(&FOCUSED),
            EegMode::Stressed => self.draw_profile(&STRESSED),
            EegMode::Relaxed => self.draw_profile(&RELAXED),
            EegMode::Dynamic => self.draw_dynamic(),
        };

        let jitter = self.jitter;
        let rng = &mut self.rng;
        let sample = base.map(|value| {
            let jittered = value + (rng.gen::<f32>() - 0.5) * jitter;
            let jittered = if jittered.is_finite() { jittered } else { value };
            jittered.clamp(Sample::MIN_VALUE, Sample::MAX_VALUE)
        });

        debug!(?sample, mode = self.mode.as_str(), "EEG sample produced");
        self.current = sample;
        sample
    }

    fn draw_profile(&mut self, profile: &Profile) -> Sample {
        let mut values = [0.0_f32; 7];
        for (value, band) in values.iter_mut().zip(profile.iter()) {
            *value = band.base + self.rng.gen::<f32>() * band.spread;
        }
        Sample {
            alpha: values[0],
            beta: values[1],
            theta: values[2],
            delta: values[3],
            gamma: values[4],
            focus: values[5],
            calm: values[6],
        }
    }

    fn draw_dynamic(&mut self) -> Sample {
        let time = self.sample_clock.as_secs_f32();
        let cycle = (time * 0.5).sin() * 0.5 + 0.5;
        Sample {
            alpha: 0.3 + cycle * 0.3,
            beta: 0.4 + (1.0 - cycle) * 0.3,
            theta: 0.2 + self.rng.gen::<f32>() * 0.2,
            delta: 0.1 + self.rng.gen::<f32>() * 0.1,
            gamma: 0.4 + cycle * 0.2,
            focus: 0.5 + (1.0 - cycle) * 0.3,
            calm: 0.3 + cycle * 0.4,
        }
    }

    fn notify(&mut self, sample: &Sample) {
        let Some(handler) = self.handler.as_mut() else {
            return;
        };

        match panic::catch_unwind(AssertUnwindSafe(|| handler(sample))) {
            Ok(Ok(())) => {}
            Ok(Err(error)) => warn!(%error, "EEG sample consumer failed"),
            Err(_) => warn!("EEG sample consumer panicked"),
        }
    }
}
