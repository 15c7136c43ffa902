#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative Tangler pool for Synaptic Wars.
//!
//! The world owns every live Tangler, the persistent adaptation scales and
//! the calm and entanglement windows. Time only moves through
//! [`World::tick`], so effect windows and behavior refreshes are measured on
//! the simulation clock. Every mutation reports what happened through the
//! caller's event buffer.

mod tangler;

use std::time::Duration;

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use synaptic_wars_core::{
    config::TanglerConfig, duration_from_secs, duration_millis, AdaptationDirectives,
    AdaptationSettings, BehaviorDirective, BehaviorVariant, Event, StatusEffect, TanglerId,
    WELCOME_BANNER,
};
use tracing::{debug, info};

use crate::tangler::Tangler;

/// Shortest window a status effect may be activated for.
const MIN_EFFECT_WINDOW: Duration = Duration::from_secs(1);

/// Id suffixes span nine base-36 digits.
const ID_SUFFIX_SPACE: u64 = 36_u64.pow(9);

/// Floor for the aggression scale after a difficulty reduction.
const MIN_AGGRESSION_SCALE: f32 = 0.3;

/// Floor for the health scale after a difficulty reduction.
const MIN_HEALTH_SCALE: f32 = 0.5;

/// Configuration parameters required to construct the world.
#[derive(Clone, Debug)]
pub struct Config {
    tangler: TanglerConfig,
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration from Tangler tuning and a seed.
    #[must_use]
    pub const fn new(tangler: TanglerConfig, rng_seed: u64) -> Self {
        Self { tangler, rng_seed }
    }
}

/// Represents the authoritative Synaptic Wars world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    tuning: TanglerConfig,
    tanglers: Vec<Tangler>,
    settings: AdaptationSettings,
    behavior_directive: Option<BehaviorDirective>,
    calm_until: Duration,
    entanglement_until: Duration,
    clock: Duration,
    rng: ChaCha8Rng,
}

impl World {
    /// Creates an empty world.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            banner: WELCOME_BANNER,
            tuning: config.tangler,
            tanglers: Vec::new(),
            settings: AdaptationSettings::default(),
            behavior_directive: None,
            calm_until: Duration::ZERO,
            entanglement_until: Duration::ZERO,
            clock: Duration::ZERO,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Removes every Tangler and closes both effect windows.
    ///
    /// Adaptation scales and the behavior directive survive; they describe the
    /// player rather than the match.
    pub fn clear(&mut self, out_events: &mut Vec<Event>) {
        for tangler in self.tanglers.drain(..) {
            out_events.push(Event::TanglerEliminated { tangler: tangler.id });
        }
        self.calm_until = self.clock;
        self.entanglement_until = self.clock;
    }

    /// Adds a Tangler at `position`, or at a random point around the origin.
    pub fn spawn(&mut self, position: Option<Vec3>, out_events: &mut Vec<Event>) -> TanglerId {
        let position = position.unwrap_or_else(|| self.random_position());
        let id = self.fresh_id();
        let max_health = self.tuning.base_health * self.settings.health;
        let behavior = BehaviorVariant::from_directive(self.behavior_directive);

        self.tanglers.push(Tangler {
            id,
            position,
            health: max_health,
            max_health,
            aggression: self.settings.aggression,
            speed: self.settings.speed,
            behavior,
            last_adaptation: self.clock,
            wound: 1.0,
        });

        info!(tangler = %id, ?behavior, "tangler spawned");
        out_events.push(Event::TanglerSpawned {
            tangler: id,
            position,
            behavior,
        });
        id
    }

    fn random_position(&mut self) -> Vec3 {
        let extent = self.tuning.spawn_half_extent * 2.0;
        Vec3::new(
            (self.rng.gen::<f32>() - 0.5) * extent,
            (self.rng.gen::<f32>() - 0.5) * extent,
            (self.rng.gen::<f32>() - 0.5) * extent,
        )
    }

    fn fresh_id(&mut self) -> TanglerId {
        let spawned_at = duration_millis(self.clock);
        loop {
            let id = TanglerId::new(spawned_at, self.rng.gen_range(0..ID_SUFFIX_SPACE));
            if self.index_of(id).is_none() {
                return id;
            }
        }
    }

    fn index_of(&self, id: TanglerId) -> Option<usize> {
        self.tanglers.iter().position(|tangler| tangler.id == id)
    }

    /// Advances the simulation clock by `dt` and updates every Tangler.
    ///
    /// Dead Tanglers are removed, live ones refresh their behavior, recompute
    /// their stats and move toward `player_position`. Returns the live count.
    pub fn tick(
        &mut self,
        dt: Duration,
        player_position: Vec3,
        out_events: &mut Vec<Event>,
    ) -> usize {
        self.clock = self.clock.saturating_add(dt);
        self.remove_dead(out_events);

        let calm = self.calm_active();
        let refresh = duration_from_secs(self.tuning.behavior_refresh_interval);
        let directed = BehaviorVariant::from_directive(self.behavior_directive);
        let now = self.clock;

        for tangler in &mut self.tanglers {
            if now.saturating_sub(tangler.last_adaptation) >= refresh {
                tangler.behavior = directed;
                tangler.last_adaptation = now;
            }
            tangler.restat(&self.settings, calm, &mut self.rng);
            tangler.advance(player_position, self.tuning.base_move_speed, dt, &mut self.rng);
        }

        self.tanglers.len()
    }

    fn remove_dead(&mut self, out_events: &mut Vec<Event>) {
        self.tanglers.retain(|tangler| {
            if tangler.is_dead() {
                out_events.push(Event::TanglerEliminated { tangler: tangler.id });
                false
            } else {
                true
            }
        });
    }

    /// Subtracts `amount` from the Tangler's health.
    ///
    /// While entanglement is active, a share of the damage splashes onto one
    /// other live Tangler. Killed Tanglers leave the pool immediately. Returns
    /// whether the targeted Tangler died; unknown ids are ignored.
    pub fn apply_damage(
        &mut self,
        id: TanglerId,
        amount: f32,
        out_events: &mut Vec<Event>,
    ) -> bool {
        let Some(index) = self.index_of(id) else {
            debug!(tangler = %id, "damage ignored for unknown tangler");
            return false;
        };

        let direct = self.tuning.erratic_speed_multiplier;
        self.wound(index, amount, direct, out_events);

        if self.entanglement_active() {
            let others: Vec<TanglerId> = self
                .tanglers
                .iter()
                .filter(|tangler| tangler.id != id && !tangler.is_dead())
                .map(|tangler| tangler.id)
                .collect();
            if !others.is_empty() {
                let target = others[self.rng.gen_range(0..others.len())];
                let splash =
                    (amount * self.tuning.entanglement.splash_damage_multiplier).round();
                let factor = self.tuning.entanglement.splash_speed_multiplier;
                if let Some(other) = self.index_of(target) {
                    debug!(from = %id, to = %target, splash, "entanglement splash");
                    self.wound(other, splash, factor, out_events);
                    let _ = self.remove_if_dead(target, out_events);
                }
            }
        }

        self.remove_if_dead(id, out_events)
    }

    fn wound(
        &mut self,
        index: usize,
        amount: f32,
        speed_factor: f32,
        out_events: &mut Vec<Event>,
    ) {
        let threshold = self.tuning.erratic_threshold;
        let tangler = &mut self.tanglers[index];
        tangler.health -= amount;
        out_events.push(Event::TanglerDamaged {
            tangler: tangler.id,
            amount,
            remaining: tangler.health,
        });

        if tangler.health < tangler.max_health * threshold {
            tangler.behavior = BehaviorVariant::Erratic;
            if !tangler.is_wounded() {
                tangler.wound = speed_factor;
                tangler.speed *= speed_factor;
                out_events.push(Event::TanglerFrenzied { tangler: tangler.id });
            }
        }
    }

    fn remove_if_dead(&mut self, id: TanglerId, out_events: &mut Vec<Event>) -> bool {
        match self.index_of(id) {
            Some(index) if self.tanglers[index].is_dead() => {
                let _ = self.tanglers.remove(index);
                info!(tangler = %id, "tangler eliminated");
                out_events.push(Event::TanglerEliminated { tangler: id });
                true
            }
            _ => false,
        }
    }

    /// Opens the calm window for `seconds`, at least one second.
    pub fn apply_calm(&mut self, seconds: f32, out_events: &mut Vec<Event>) {
        self.calm_until = self.window_end(seconds);
        out_events.push(Event::EffectActivated {
            effect: StatusEffect::Calm,
            until_ms: duration_millis(self.calm_until),
        });
    }

    /// Opens the entanglement window for `seconds`, at least one second.
    pub fn activate_entanglement(&mut self, seconds: f32, out_events: &mut Vec<Event>) {
        self.entanglement_until = self.window_end(seconds);
        out_events.push(Event::EffectActivated {
            effect: StatusEffect::Entanglement,
            until_ms: duration_millis(self.entanglement_until),
        });
    }

    fn window_end(&self, seconds: f32) -> Duration {
        self.clock
            .saturating_add(duration_from_secs(seconds).max(MIN_EFFECT_WINDOW))
    }

    fn calm_active(&self) -> bool {
        self.clock < self.calm_until
    }

    fn entanglement_active(&self) -> bool {
        self.clock < self.entanglement_until
    }

    /// Replaces the persistent scales according to `directives`.
    ///
    /// Only Tanglers spawned afterwards capture the new health scale.
    pub fn update_adaptation_settings(
        &mut self,
        directives: &AdaptationDirectives,
        out_events: &mut Vec<Event>,
    ) {
        let change = directives.difficulty_delta;
        if change > 0.0 {
            self.settings.aggression = 1.0 + change;
            self.settings.health = 1.0 + change * 0.5;
        } else if change < 0.0 {
            let reduction = -change;
            self.settings.aggression = (1.0 - reduction).max(MIN_AGGRESSION_SCALE);
            self.settings.health = (1.0 - reduction * 0.5).max(MIN_HEALTH_SCALE);
        }
        if directives.pacing_delta > 0.0 {
            self.settings.spawn_rate = 1.0 + directives.pacing_delta;
        }

        debug!(settings = ?self.settings, "tangler adaptation settings updated");
        out_events.push(Event::AdaptationSettingsChanged {
            settings: self.settings,
        });
    }

    /// Sets the directive future behavior refreshes resolve against.
    pub fn set_behavior_directive(&mut self, directive: Option<BehaviorDirective>) {
        self.behavior_directive = directive;
    }

    /// Picks a uniformly random live Tangler.
    pub fn random_target(&mut self) -> Option<TanglerId> {
        let live: Vec<TanglerId> = self
            .tanglers
            .iter()
            .filter(|tangler| !tangler.is_dead())
            .map(|tangler| tangler.id)
            .collect();
        if live.is_empty() {
            return None;
        }
        Some(live[self.rng.gen_range(0..live.len())])
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use synaptic_wars_core::{AdaptationSettings, BehaviorDirective, TanglerId, TanglerSnapshot};

    use super::World;

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Simulation time elapsed in the world.
    #[must_use]
    pub fn clock(world: &World) -> Duration {
        world.clock
    }

    /// Snapshots of every Tangler in spawn order.
    #[must_use]
    pub fn tanglers(world: &World) -> Vec<TanglerSnapshot> {
        world.tanglers.iter().map(|tangler| tangler.snapshot()).collect()
    }

    /// Snapshot of a single Tangler.
    #[must_use]
    pub fn tangler(world: &World, id: TanglerId) -> Option<TanglerSnapshot> {
        world
            .tanglers
            .iter()
            .find(|tangler| tangler.id == id)
            .map(|tangler| tangler.snapshot())
    }

    /// Number of Tanglers in the pool.
    #[must_use]
    pub fn tangler_count(world: &World) -> usize {
        world.tanglers.len()
    }

    /// Persistent scales applied to new spawns.
    #[must_use]
    pub fn adaptation_settings(world: &World) -> AdaptationSettings {
        world.settings
    }

    /// Directive behavior refreshes currently resolve against.
    #[must_use]
    pub fn behavior_directive(world: &World) -> Option<BehaviorDirective> {
        world.behavior_directive
    }

    /// Reports whether the calm window is open.
    #[must_use]
    pub fn calm_active(world: &World) -> bool {
        world.calm_active()
    }

    /// Reports whether the entanglement window is open.
    #[must_use]
    pub fn entanglement_active(world: &World) -> bool {
        world.entanglement_active()
    }

    /// Simulation time at which the calm window closes.
    #[must_use]
    pub fn calm_until(world: &World) -> Duration {
        world.calm_until
    }

    /// Simulation time at which the entanglement window closes.
    #[must_use]
    pub fn entanglement_until(world: &World) -> Duration {
        world.entanglement_until
    }
}
