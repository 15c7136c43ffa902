#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Ability registry whose costs, cooldowns and effects scale with the
//! player's emotional state.
//!
//! The registry holds two registry-wide multipliers. The cooldown multiplier
//! scales how fast elapsed time drains cooldowns; the effectiveness multiplier
//! scales effects up and costs down. Both are pushed in by the game loop every
//! tick before [`AbilityRegistry::tick`] runs.

use synaptic_wars_core::{
    config::{AbilitiesConfig, AbilityTuning},
    AbilityKind, AbilitySnapshot, Activation, ActivationError,
};
use tracing::{debug, info};

#[derive(Clone, Debug)]
struct Ability {
    kind: AbilityKind,
    tuning: AbilityTuning,
    current_cooldown: f32,
    ready: bool,
}

/// Registry of the three player abilities.
#[derive(Clone, Debug)]
pub struct AbilityRegistry {
    abilities: Vec<Ability>,
    cooldown_multiplier: f32,
    effectiveness_multiplier: f32,
}

impl AbilityRegistry {
    /// Creates a registry with every ability ready.
    #[must_use]
    pub fn new(config: &AbilitiesConfig) -> Self {
        let abilities = AbilityKind::ALL
            .into_iter()
            .map(|kind| Ability {
                kind,
                tuning: config.get(kind).clone(),
                current_cooldown: 0.0,
                ready: true,
            })
            .collect();
        Self {
            abilities,
            cooldown_multiplier: 1.0,
            effectiveness_multiplier: 1.0,
        }
    }

    /// Replaces the registry-wide multipliers.
    ///
    /// Non-positive or non-finite values reset the affected multiplier to one.
    pub fn set_multipliers(&mut self, cooldown: f32, effectiveness: f32) {
        self.cooldown_multiplier = sanitize(cooldown);
        self.effectiveness_multiplier = sanitize(effectiveness);
    }

    /// Factor applied to elapsed time while cooling down.
    #[must_use]
    pub fn cooldown_multiplier(&self) -> f32 {
        self.cooldown_multiplier
    }

    /// Factor applied to effects and, inverted, to costs.
    #[must_use]
    pub fn effectiveness_multiplier(&self) -> f32 {
        self.effectiveness_multiplier
    }

    /// Drains cooldowns by `dt` seconds scaled by the cooldown multiplier.
    pub fn tick(&mut self, dt: f32) {
        let step = dt.max(0.0) * self.cooldown_multiplier;
        for ability in &mut self.abilities {
            if ability.current_cooldown > 0.0 {
                ability.current_cooldown -= step;
                if ability.current_cooldown <= 0.0 {
                    ability.current_cooldown = 0.0;
                    ability.ready = true;
                    debug!(ability = ability.kind.key(), "ability ready");
                }
            }
        }
    }

    /// Attempts to activate the ability registered under `name`.
    ///
    /// On success the ability starts cooling down and the returned
    /// [`Activation`] carries the scaled cost and effects. The caller owns the
    /// player's energy and deducts `cost` itself.
    pub fn activate(&mut self, name: &str, energy: f32) -> Result<Activation, ActivationError> {
        let cooldown_multiplier = self.cooldown_multiplier;
        let effectiveness = self.effectiveness_multiplier;
        let ability = self
            .abilities
            .iter_mut()
            .find(|ability| ability.kind.key() == name)
            .ok_or_else(|| ActivationError::NotFound {
                name: name.to_owned(),
            })?;

        if !ability.ready {
            return Err(ActivationError::OnCooldown {
                ability: ability.kind,
                remaining: ability.current_cooldown,
            });
        }

        let cost = ability.tuning.base_cost / effectiveness;
        if energy < cost {
            return Err(ActivationError::InsufficientEnergy {
                required: cost,
                available: energy,
            });
        }

        let cooldown = (ability.tuning.base_cooldown / cooldown_multiplier).max(0.0);
        ability.current_cooldown = cooldown;
        ability.ready = cooldown <= 0.0;

        let activation = Activation {
            ability: ability.kind,
            cost,
            cooldown,
            damage: ability.tuning.base_damage * effectiveness,
            healing: ability.tuning.base_healing * effectiveness,
            duration: ability.tuning.base_duration * effectiveness,
            remaining_energy: energy - cost,
        };
        info!(
            ability = ability.kind.key(),
            cost, cooldown, effectiveness, "ability activated"
        );
        Ok(activation)
    }

    /// Presentation data for the ability registered under `name`.
    #[must_use]
    pub fn info(&self, name: &str) -> Option<AbilitySnapshot> {
        self.abilities
            .iter()
            .find(|ability| ability.kind.key() == name)
            .map(|ability| self.snapshot(ability))
    }

    /// Presentation data for every ability, in registry order.
    #[must_use]
    pub fn all_info(&self) -> Vec<AbilitySnapshot> {
        self.abilities
            .iter()
            .map(|ability| self.snapshot(ability))
            .collect()
    }

    /// Makes every ability ready immediately.
    pub fn reset_cooldowns(&mut self) {
        for ability in &mut self.abilities {
            ability.current_cooldown = 0.0;
            ability.ready = true;
        }
    }

    fn snapshot(&self, ability: &Ability) -> AbilitySnapshot {
        AbilitySnapshot {
            ability: ability.kind,
            name: ability.tuning.name.clone(),
            description: ability.tuning.description.clone(),
            current_cooldown: ability.current_cooldown,
            adjusted_cooldown: ability.tuning.base_cooldown / self.cooldown_multiplier,
            adjusted_cost: ability.tuning.base_cost / self.effectiveness_multiplier,
            effectiveness_multiplier: self.effectiveness_multiplier,
            ready: ability.ready,
        }
    }
}

fn sanitize(multiplier: f32) -> f32 {
    if multiplier.is_finite() && multiplier > 0.0 {
        multiplier
    } else {
        1.0
    }
}
