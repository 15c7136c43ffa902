use std::time::Duration;

use glam::Vec3;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use synaptic_wars_core::{AdaptationSettings, BehaviorVariant, TanglerId, TanglerSnapshot};

/// Jitter added to each axis of an erratic Tangler's heading.
const ERRATIC_HEADING_JITTER: f32 = 0.3;

/// Probability that a defensive Tangler retreats instead of advancing.
const DEFENSIVE_RETREAT_CHANCE: f64 = 0.3;

/// Movement is tuned in frame-equivalents at sixty frames per second.
const FRAMES_PER_SECOND: f32 = 60.0;

#[derive(Clone, Debug)]
pub(crate) struct Tangler {
    pub(crate) id: TanglerId,
    pub(crate) position: Vec3,
    pub(crate) health: f32,
    pub(crate) max_health: f32,
    pub(crate) aggression: f32,
    pub(crate) speed: f32,
    pub(crate) behavior: BehaviorVariant,
    pub(crate) last_adaptation: Duration,
    /// Speed factor picked up the first time the Tangler dropped below the
    /// erratic threshold; one until then.
    pub(crate) wound: f32,
}

impl Tangler {
    pub(crate) fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    pub(crate) fn is_wounded(&self) -> bool {
        self.wound != 1.0
    }

    /// Recomputes aggression and speed from the variant and current scales.
    pub(crate) fn restat(
        &mut self,
        settings: &AdaptationSettings,
        calm: bool,
        rng: &mut ChaCha8Rng,
    ) {
        let (aggression, speed) = match self.behavior {
            BehaviorVariant::Normal => return,
            BehaviorVariant::Aggressive if calm => (1.0, 1.0),
            BehaviorVariant::Aggressive => (1.3, 1.2),
            BehaviorVariant::Defensive if calm => (0.6, 0.7),
            BehaviorVariant::Defensive => (0.7, 0.8),
            BehaviorVariant::Strategic => (1.0, 1.0),
            BehaviorVariant::Erratic if calm => (0.6, 0.9),
            BehaviorVariant::Erratic => (
                0.5 + rng.gen::<f32>(),
                0.8 + rng.gen::<f32>() * 0.4,
            ),
        };
        self.aggression = settings.aggression * aggression;
        self.speed = settings.speed * speed * self.wound;
    }

    /// Steps toward `target`, honouring the variant's movement quirks.
    pub(crate) fn advance(
        &mut self,
        target: Vec3,
        base_move_speed: f32,
        dt: Duration,
        rng: &mut ChaCha8Rng,
    ) {
        let mut heading = (target - self.position).normalize_or_zero();
        match self.behavior {
            BehaviorVariant::Erratic => {
                heading += Vec3::new(
                    (rng.gen::<f32>() - 0.5) * ERRATIC_HEADING_JITTER,
                    (rng.gen::<f32>() - 0.5) * ERRATIC_HEADING_JITTER,
                    (rng.gen::<f32>() - 0.5) * ERRATIC_HEADING_JITTER,
                );
            }
            BehaviorVariant::Defensive => {
                if rng.gen_bool(DEFENSIVE_RETREAT_CHANCE) {
                    heading = -heading;
                }
            }
            _ => {}
        }

        let step = base_move_speed * self.speed * dt.as_secs_f32() * FRAMES_PER_SECOND;
        self.position += heading * step;
    }

    pub(crate) fn snapshot(&self) -> TanglerSnapshot {
        TanglerSnapshot {
            id: self.id,
            position: self.position,
            health: self.health,
            max_health: self.max_health,
            aggression: self.aggression,
            speed: self.speed,
            behavior: self.behavior,
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;

    fn tangler(behavior: BehaviorVariant) -> Tangler {
        Tangler {
            id: TanglerId::new(0, 1),
            position: Vec3::new(3.0, 0.0, 0.0),
            health: 100.0,
            max_health: 100.0,
            aggression: 1.0,
            speed: 1.0,
            behavior,
            last_adaptation: Duration::ZERO,
            wound: 1.0,
        }
    }

    #[test]
    fn normal_variant_keeps_spawn_stats() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut subject = tangler(BehaviorVariant::Normal);
        subject.speed = 0.42;
        let settings = AdaptationSettings {
            speed: 3.0,
            ..AdaptationSettings::default()
        };
        subject.restat(&settings, false, &mut rng);
        assert!((subject.speed - 0.42).abs() < f32::EPSILON);
    }

    #[test]
    fn calm_dampens_aggressive_variant() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut subject = tangler(BehaviorVariant::Aggressive);
        let settings = AdaptationSettings::default();

        subject.restat(&settings, false, &mut rng);
        assert!((subject.aggression - 1.3).abs() < 1e-6);
        assert!((subject.speed - 1.2).abs() < 1e-6);

        subject.restat(&settings, true, &mut rng);
        assert!((subject.aggression - 1.0).abs() < 1e-6);
        assert!((subject.speed - 1.0).abs() < 1e-6);
    }

    #[test]
    fn wound_persists_across_recomputes() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut subject = tangler(BehaviorVariant::Strategic);
        subject.wound = 1.5;
        for _ in 0..3 {
            subject.restat(&AdaptationSettings::default(), false, &mut rng);
        }
        assert!((subject.speed - 1.5).abs() < 1e-6, "penalty must not compound");
    }

    #[test]
    fn strategic_tangler_closes_distance() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut subject = tangler(BehaviorVariant::Strategic);
        subject.advance(Vec3::ZERO, 0.01, Duration::from_secs(1), &mut rng);
        assert!((subject.position.x - 2.4).abs() < 1e-5);
    }
}
