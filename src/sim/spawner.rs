//! Enemy wave cadence and composition
//!
//! Two countdowns run side by side: the spawn cooldown releases a wave when it
//! expires, and the ramp timer periodically shortens the spawn cooldown down to
//! a floor.

use glam::DVec2;
use rand::Rng;
use rand::seq::IndexedRandom;

use super::arena::Arena;
use super::cooldown::Cooldown;
use super::entity::{Body, Enemy, EnemyTier};
use crate::assets::SpriteRef;
use crate::config::SpawnTuning;

/// Standard and elite sprites for one palette key
#[derive(Debug, Clone, PartialEq)]
pub struct EnemySkin {
    pub key: String,
    pub standard: SpriteRef,
    pub elite: SpriteRef,
}

#[derive(Debug, Clone)]
pub struct Spawner {
    spawn: Cooldown,
    ramp: Cooldown,
    palette: Vec<EnemySkin>,
    tuning: SpawnTuning,
    waves: u32,
}

impl Spawner {
    /// The first wave is released on the first call; the first ramp comes one
    /// full ramp period later.
    pub fn new(tuning: SpawnTuning, palette: Vec<EnemySkin>) -> Self {
        Self {
            spawn: Cooldown::new(tuning.initial_interval),
            ramp: Cooldown::primed(tuning.ramp_period),
            palette,
            tuning,
            waves: 0,
        }
    }

    /// Current time between waves
    pub fn spawn_interval(&self) -> f64 {
        self.spawn.duration()
    }

    /// Waves released so far
    pub fn waves(&self) -> u32 {
        self.waves
    }

    /// Advance both timers by `dt`, spawning into `arena` when due.
    /// Returns the number of enemies spawned.
    pub fn maybe_spawn<R: Rng>(&mut self, dt: f64, arena: &mut Arena, rng: &mut R) -> usize {
        let mut spawned = 0;

        if self.spawn.trigger() {
            spawned = self.spawn_wave(arena, rng);
        }

        if self.ramp.trigger() {
            let interval = self.spawn.duration();
            let tightened = (interval - self.tuning.ramp_step).max(self.tuning.min_interval);
            if tightened < interval {
                self.spawn.set_duration(tightened);
                log::debug!("Spawn interval {interval:.3}s -> {tightened:.3}s");
            }
        }

        self.spawn.tick(dt);
        self.ramp.tick(dt);
        spawned
    }

    fn spawn_wave<R: Rng>(&mut self, arena: &mut Arena, rng: &mut R) -> usize {
        let Some(skin) = self.palette.choose(rng).cloned() else {
            return 0;
        };

        let tuning = &self.tuning;
        let count = rng.random_range(tuning.wave_min..=tuning.wave_max);
        let max_x = arena.screen().size.x - tuning.spawn_margin;

        for _ in 0..count {
            let x = random_x(rng, max_x);
            let speed = self.roll_speed(rng);
            let enemy = Enemy {
                body: Body::new(
                    arena.next_entity_id(),
                    DVec2::new(x, tuning.spawn_y),
                    DVec2::new(0.0, speed),
                    skin.standard,
                ),
                hp: tuning.enemy_hp,
                reward: tuning.enemy_reward,
                tier: EnemyTier::Standard,
                palette: skin.key.clone(),
            };
            arena.add_enemy(enemy);
        }

        let mut spawned = count as usize;
        if rng.random_ratio(1, tuning.elite_one_in) {
            let x = random_x(rng, max_x);
            let speed = self.roll_speed(rng) * tuning.elite_speed_factor;
            let elite = Enemy {
                body: Body::new(
                    arena.next_entity_id(),
                    DVec2::new(x, tuning.spawn_y),
                    DVec2::new(0.0, speed),
                    skin.elite,
                ),
                hp: tuning.elite_hp,
                reward: tuning.elite_reward,
                tier: EnemyTier::Elite,
                palette: skin.key.clone(),
            };
            arena.add_enemy(elite);
            spawned += 1;
        }

        self.waves += 1;
        log::debug!("Wave {}: {} {} enemies", self.waves, spawned, skin.key);
        spawned
    }

    /// Descent speed from `speed_min..=speed_max` in `speed_step` increments
    fn roll_speed<R: Rng>(&self, rng: &mut R) -> f64 {
        let tuning = &self.tuning;
        let steps = ((tuning.speed_max - tuning.speed_min) / tuning.speed_step).floor() as u32;
        tuning.speed_min + rng.random_range(0..=steps) as f64 * tuning.speed_step
    }
}

fn random_x<R: Rng>(rng: &mut R, max_x: f64) -> f64 {
    if max_x > 0.0 {
        rng.random_range(0.0..max_x)
    } else {
        0.0
    }
}
