#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Game loop that wires the signal source, classifier, adaptation engine,
//! Tangler pool and ability registry together.
//!
//! A [`Session`] owns every component. Presentation layers push
//! [`Command`]s through [`Session::handle`] and advance simulated time with
//! [`Session::tick`]; both report what happened through the caller's event
//! buffer. Classification requests are stamped with the time their result
//! becomes visible and are polled each tick, so the loop never waits on them.

mod export;
mod input;

use std::{collections::VecDeque, time::Duration};

use glam::Vec3;
use synaptic_wars_core::{
    config::GameConfig, duration_from_secs, duration_millis, AbilityKind, Activation, Command,
    EmotionalState, Event, GameSnapshot, GameState, PerformanceReport, Sample,
};
use synaptic_wars_system_abilities::AbilityRegistry;
use synaptic_wars_system_adaptation::{
    cooldown_multiplier, effectiveness_multiplier, AdaptiveEngine,
};
use synaptic_wars_system_classifier::{
    Classification, EmotionalDirector, InferenceBackend, RemoteStub, StateClassifier,
};
use synaptic_wars_system_signal::{EegSimulator, SampleHandler};
use synaptic_wars_world::{query, World};
use tracing::{debug, info, warn};

pub use crate::{
    export::ExportDocument,
    input::{HeldKeys, InputState, NoInput},
};

/// Key codes steering the player.
const MOVE_UP: &str = "KeyW";
const MOVE_DOWN: &str = "KeyS";
const MOVE_LEFT: &str = "KeyA";
const MOVE_RIGHT: &str = "KeyD";

/// Shortest interval between timed spawns, in seconds.
const MIN_SPAWN_INTERVAL: f32 = 0.5;

/// Random stream identifiers derived from the root seed.
const SIGNAL_STREAM: u64 = 1;
const CLASSIFIER_STREAM: u64 = 2;
const WORLD_STREAM: u64 = 3;

/// Derives an independent seed for one component from the root seed.
#[must_use]
pub fn derive_seed(root: u64, stream: u64) -> u64 {
    let mut z = root ^ stream.wrapping_mul(0x9e37_79b9_7f4a_7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

#[derive(Clone, Debug)]
struct PendingClassification {
    game: u64,
    context: GameState,
    classification: Classification,
}

/// One player's game session.
#[derive(Debug)]
pub struct Session {
    config: GameConfig,
    state: GameState,
    clock: Duration,
    spawn_timer: f32,
    scheduled_spawns: Vec<Duration>,
    game: u64,
    pending: VecDeque<PendingClassification>,
    simulator: EegSimulator,
    classifier: StateClassifier,
    director: EmotionalDirector,
    engine: AdaptiveEngine,
    world: World,
    abilities: AbilityRegistry,
}

impl Session {
    /// Creates a session that prefers the configured remote classifier.
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        let remote = RemoteStub::from_settings(
            &config.classifier,
            derive_seed(config.seed, CLASSIFIER_STREAM),
        );
        Self::with_backend(config, Box::new(remote))
    }

    /// Creates a session around an explicit inference backend.
    ///
    /// The backend is probed once; the session falls back to local rules when
    /// the probe fails. The signal source is connected immediately.
    #[must_use]
    pub fn with_backend(config: GameConfig, backend: Box<dyn InferenceBackend>) -> Self {
        let mut simulator = EegSimulator::new(synaptic_wars_system_signal::Config::from_settings(
            &config.signal,
            derive_seed(config.seed, SIGNAL_STREAM),
        ));
        let _ = simulator.connect();

        let world = World::new(synaptic_wars_world::Config::new(
            config.tangler.clone(),
            derive_seed(config.seed, WORLD_STREAM),
        ));

        let session = Self {
            state: GameState::new(config.player.initial_energy, config.player.max_energy),
            clock: Duration::ZERO,
            spawn_timer: 0.0,
            scheduled_spawns: Vec::new(),
            game: 0,
            pending: VecDeque::new(),
            simulator,
            classifier: StateClassifier::initialize(backend),
            director: EmotionalDirector::new(),
            engine: AdaptiveEngine::new(),
            world,
            abilities: AbilityRegistry::new(&config.abilities),
            config,
        };
        info!(
            backend = session.classifier.backend_name(),
            "game and neuro engine initialized"
        );
        session
    }

    /// Processes one inbound command.
    pub fn handle(&mut self, command: Command, out_events: &mut Vec<Event>) {
        match command {
            Command::StartGame => self.start(out_events),
            Command::UseAbility { name } => self.use_ability(&name, out_events),
            Command::SetEegMode { mode } => match self.simulator.set_mode_by_name(&mode) {
                Ok(mode) => out_events.push(Event::EegModeChanged { mode }),
                Err(error) => warn!(%error, "EEG mode change rejected"),
            },
            Command::EndGame => self.end(out_events),
        }
    }

    fn start(&mut self, out_events: &mut Vec<Event>) {
        if self.state.game_active {
            debug!("start requested while a game is running");
            return;
        }

        self.state = GameState::new(
            self.config.player.initial_energy,
            self.config.player.max_energy,
        );
        self.state.game_active = true;
        self.game = self.game.wrapping_add(1);
        self.spawn_timer = 0.0;
        self.abilities.reset_cooldowns();
        self.world.clear(out_events);
        if !self.simulator.is_connected() {
            let _ = self.simulator.connect();
        }

        let now = self.clock;
        let spacing = duration_from_secs(self.config.game.opening_spawn_spacing);
        self.scheduled_spawns = (0..self.config.game.opening_spawns)
            .map(|index| now.saturating_add(spacing.saturating_mul(index)))
            .collect();

        info!(game = self.game, "game started");
        out_events.push(Event::GameStarted);
    }

    fn end(&mut self, out_events: &mut Vec<Event>) {
        if !self.state.game_active {
            return;
        }
        self.state.game_active = false;
        self.scheduled_spawns.clear();
        let dropped = self.pending.len();
        self.pending.clear();
        self.simulator.disconnect();
        info!(dropped, "game ended");
        out_events.push(Event::GameEnded);
    }

    fn use_ability(&mut self, name: &str, out_events: &mut Vec<Event>) {
        let activation = match self.abilities.activate(name, self.state.player_energy) {
            Ok(activation) => activation,
            Err(reason) => {
                warn!(%reason, "ability activation rejected");
                out_events.push(Event::AbilityRejected { reason });
                return;
            }
        };

        self.state.player_energy = activation.remaining_energy;
        self.apply_activation(&activation, out_events);
        out_events.push(Event::AbilityActivated { activation });
    }

    fn apply_activation(&mut self, activation: &Activation, out_events: &mut Vec<Event>) {
        match activation.ability {
            AbilityKind::DendriticLightning => {
                let Some(target) = self.world.random_target() else {
                    debug!("lightning fired with no tangler in range");
                    return;
                };
                if self.world.apply_damage(target, activation.damage, out_events) {
                    let reward =
                        self.config.tangler.score_value as f32 * self.state.reward_multiplier;
                    self.state.score =
                        self.state.score.saturating_add(reward.round().max(0.0) as u32);
                }
            }
            AbilityKind::SerotoninTsunami => {
                self.state.player_energy =
                    (self.state.player_energy + activation.healing).min(self.state.max_energy);
                self.world.apply_calm(activation.duration, out_events);
            }
            AbilityKind::QuantumEntanglement => {
                self.world.activate_entanglement(activation.duration, out_events);
            }
        }
    }

    /// Advances the session by `dt` of simulated time.
    ///
    /// Does nothing while no game is running.
    pub fn tick(&mut self, dt: Duration, input: &impl InputState, out_events: &mut Vec<Event>) {
        if !self.state.game_active {
            return;
        }
        self.clock = self.clock.saturating_add(dt);
        let seconds = dt.as_secs_f32();

        self.run_scheduled_spawns(out_events);
        self.move_player(seconds, input);

        let directives = self.engine.current_directives();
        self.abilities.set_multipliers(
            cooldown_multiplier(directives),
            effectiveness_multiplier(self.director.current().intensity),
        );
        self.abilities.tick(seconds);

        let live = self.world.tick(dt, self.state.player_position, out_events);
        self.spawn_tanglers(seconds, live, out_events);
        self.recover_energy(seconds);

        if let Some(sample) = self.simulator.advance(dt) {
            self.submit(&sample);
        }
        self.resolve_classifications(out_events);

        out_events.push(Event::GameStateUpdate(Box::new(self.snapshot())));
    }

    fn run_scheduled_spawns(&mut self, out_events: &mut Vec<Event>) {
        let now = self.clock;
        let mut due = 0;
        self.scheduled_spawns.retain(|at| {
            if *at <= now {
                due += 1;
                false
            } else {
                true
            }
        });
        for _ in 0..due {
            let _ = self.world.spawn(None, out_events);
        }
    }

    fn move_player(&mut self, seconds: f32, input: &impl InputState) {
        let step = self.config.player.move_speed * seconds;
        let mut delta = Vec3::ZERO;
        if input.is_pressed(MOVE_UP) {
            delta.y -= step;
        }
        if input.is_pressed(MOVE_DOWN) {
            delta.y += step;
        }
        if input.is_pressed(MOVE_LEFT) {
            delta.x -= step;
        }
        if input.is_pressed(MOVE_RIGHT) {
            delta.x += step;
        }
        self.state.player_position += delta;
    }

    fn spawn_tanglers(&mut self, seconds: f32, live: usize, out_events: &mut Vec<Event>) {
        let rate = if self.state.spawn_rate_multiplier > 0.0 {
            self.state.spawn_rate_multiplier
        } else {
            1.0
        };
        let interval = (self.config.game.base_spawn_interval / rate).max(MIN_SPAWN_INTERVAL);

        self.spawn_timer += seconds;
        let timer_fired = self.spawn_timer >= interval;
        if timer_fired {
            self.spawn_timer = 0.0;
        }
        if timer_fired || live < self.config.game.min_tangler_count {
            let _ = self.world.spawn(None, out_events);
        }
    }

    fn recover_energy(&mut self, seconds: f32) {
        let recovered =
            self.state.player_energy + self.config.player.energy_recovery_rate * seconds;
        self.state.player_energy = recovered.min(self.state.max_energy);
    }

    fn submit(&mut self, sample: &Sample) {
        let classification = self.classifier.classify(sample, &self.state, self.clock);
        self.pending.push_back(PendingClassification {
            game: self.game,
            context: self.state,
            classification,
        });
    }

    fn resolve_classifications(&mut self, out_events: &mut Vec<Event>) {
        let now = self.clock;
        let mut waiting = VecDeque::with_capacity(self.pending.len());
        let mut ready = Vec::new();
        for pending in self.pending.drain(..) {
            if pending.classification.is_ready(now) {
                ready.push(pending);
            } else {
                waiting.push_back(pending);
            }
        }
        self.pending = waiting;

        for pending in ready {
            if !self.state.game_active || pending.game != self.game {
                debug!("dropping classification from an inactive game");
                continue;
            }
            let emotional = pending.classification.into_state();
            self.apply_emotional_state(emotional, pending.context, out_events);
        }
    }

    fn apply_emotional_state(
        &mut self,
        emotional: EmotionalState,
        context: GameState,
        out_events: &mut Vec<Event>,
    ) {
        self.director.record(emotional.clone(), context);
        let now_ms = duration_millis(self.clock);
        let outcome = self.engine.apply(&emotional, &self.state, now_ms);
        self.state = outcome.state;
        self.world.set_behavior_directive(Some(outcome.directives.behavior));
        self.world
            .update_adaptation_settings(&outcome.directives, out_events);
        out_events.push(Event::EmotionalStateClassified { state: emotional });
    }

    /// Registers an observer notified with every raw signal sample.
    pub fn set_sample_observer(&mut self, handler: SampleHandler) {
        self.simulator.set_data_update_handler(handler);
    }

    /// Current game state.
    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Simulation time elapsed while a game was running.
    #[must_use]
    pub fn clock(&self) -> Duration {
        self.clock
    }

    /// Read-only access to the Tangler pool.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Read-only access to the ability registry.
    #[must_use]
    pub fn abilities(&self) -> &AbilityRegistry {
        &self.abilities
    }

    /// Read-only access to the emotional director.
    #[must_use]
    pub fn director(&self) -> &EmotionalDirector {
        &self.director
    }

    /// Number of classifications waiting for their result.
    #[must_use]
    pub fn pending_classifications(&self) -> usize {
        self.pending.len()
    }

    /// Current performance metrics.
    #[must_use]
    pub fn performance_report(&self) -> PerformanceReport {
        self.engine.performance_report(self.director.trend())
    }

    /// Aggregate view published at the end of every tick.
    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            state: self.state,
            tangler_count: query::tangler_count(&self.world),
            abilities: self.abilities.all_info(),
            emotional_state: self.director.current().clone(),
            performance: self.performance_report(),
        }
    }

    /// Collects the emotional and adaptation histories for export.
    #[must_use]
    pub fn export(&self, export_timestamp: u64) -> ExportDocument {
        ExportDocument {
            emotional_history: self.director.history().cloned().collect(),
            adaptation_history: self.engine.history().cloned().collect(),
            performance_report: self.performance_report(),
            export_timestamp,
        }
    }
}
