//! The player's ship: thrust, wall bounces and cooldown-gated abilities

use std::collections::BTreeMap;

use glam::DVec2;

use super::cooldown::Cooldown;
use super::entity::{Body, Entity, Projectile};
use super::rect::Rect;
use crate::assets::{SpriteRef, Sprites};
use crate::config::PlayerTuning;
use crate::sign_preserving_boost;

/// Cooldown-gated player abilities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Ability {
    Primary,
    Special,
    Burst,
}

impl Ability {
    pub const ALL: [Ability; 3] = [Ability::Primary, Ability::Special, Ability::Burst];

    pub fn label(self) -> &'static str {
        match self {
            Ability::Primary => "LASER",
            Ability::Special => "SPREAD",
            Ability::Burst => "BURST",
        }
    }
}

/// Held thrust control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Thrust {
    Left,
    Right,
    Up,
    Down,
}

/// What happened when the ship met the play area edges
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoundsOutcome {
    pub bounced: bool,
    /// The bounce was fast enough to deserve the impact cue
    pub hard: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub body: Body,
    /// Power level, 1-based
    pub level: u32,
    cooldowns: BTreeMap<Ability, Cooldown>,
    tuning: PlayerTuning,
}

impl Player {
    pub fn new(id: u32, sprite: SpriteRef, tuning: PlayerTuning) -> Self {
        let start = DVec2::new(tuning.start.0, tuning.start.1);
        let cooldowns = BTreeMap::from([
            (Ability::Primary, Cooldown::new(tuning.primary_cooldown(1))),
            (Ability::Special, Cooldown::new(tuning.special_cooldown)),
            (Ability::Burst, Cooldown::new(tuning.burst_cooldown)),
        ]);
        Self {
            body: Body::new(id, start, DVec2::ZERO, sprite),
            level: 1,
            cooldowns,
            tuning,
        }
    }

    pub fn cooldown(&self, ability: Ability) -> Option<&Cooldown> {
        self.cooldowns.get(&ability)
    }

    pub fn tuning(&self) -> &PlayerTuning {
        &self.tuning
    }

    fn trigger(&mut self, ability: Ability) -> bool {
        self.cooldowns
            .get_mut(&ability)
            .is_some_and(|cooldown| cooldown.trigger())
    }

    /// Fixed velocity step per held control, independent of frame length
    pub fn apply_thrust(&mut self, direction: Thrust, _dt: f64) {
        let vel = &mut self.body.vel;
        match direction {
            Thrust::Left => vel.x -= self.tuning.horizontal_thrust,
            Thrust::Right => vel.x += self.tuning.horizontal_thrust,
            Thrust::Up => vel.y -= self.tuning.vertical_thrust,
            Thrust::Down => vel.y += self.tuning.vertical_thrust,
        }
    }

    pub fn integrate(&mut self, dt: f64) {
        self.body.integrate(dt);
    }

    /// Bounce off the side walls, losing half the speed; stop at top/bottom
    pub fn resolve_bounds(&mut self, screen: &Rect) -> BoundsOutcome {
        let mut outcome = BoundsOutcome::default();
        let rect = self.body.rect();
        let dx = self.body.vel.x;

        if (rect.right() > screen.right() && dx > 0.0) || (rect.left() < screen.left() && dx < 0.0) {
            outcome.bounced = true;
            outcome.hard = dx.abs() > self.tuning.hard_collision_speed;
            self.body.vel.x = -(dx + (0.0 - dx / 2.0));
        }

        if rect.top() < screen.top() || rect.bottom() > screen.bottom() {
            self.body.vel.y = 0.0;
            let max_y = (screen.bottom() - rect.size.y).max(screen.top());
            self.body.pos.y = self.body.pos.y.clamp(screen.top(), max_y);
        }

        outcome
    }

    /// Count every ability cooldown down by `dt`
    pub fn tick_cooldowns(&mut self, dt: f64) {
        for cooldown in self.cooldowns.values_mut() {
            cooldown.tick(dt);
        }
    }

    /// Movement and cooldowns for one frame; thrust/burst must already be applied
    pub fn update(&mut self, dt: f64, screen: &Rect) -> BoundsOutcome {
        self.integrate(dt);
        let outcome = self.resolve_bounds(screen);
        self.tick_cooldowns(dt);
        outcome
    }

    /// Forward lasers: one from the nose, or a side-mounted pair from the
    /// dual-fire level on. Empty while the cooldown runs.
    pub fn fire_primary(&mut self, sprites: &Sprites, mut next_id: impl FnMut() -> u32) -> Vec<Projectile> {
        if !self.trigger(Ability::Primary) {
            return Vec::new();
        }

        let nose = self.body.rect().mid_top();
        let vel = DVec2::new(0.0, -self.tuning.primary_speed);
        let sprite = sprites.primary_laser;

        if self.level >= self.tuning.dual_fire_level {
            let offset = DVec2::new(self.tuning.dual_fire_offset, 0.0);
            vec![
                Projectile::new(next_id(), nose - offset, vel, sprite),
                Projectile::new(next_id(), nose + offset, vel, sprite),
            ]
        } else {
            vec![Projectile::new(next_id(), nose, vel, sprite)]
        }
    }

    /// Two slower lasers diverging left and right
    pub fn fire_special(&mut self, sprites: &Sprites, mut next_id: impl FnMut() -> u32) -> Vec<Projectile> {
        if !self.trigger(Ability::Special) {
            return Vec::new();
        }

        let nose = self.body.rect().mid_top();
        let forward = -self.tuning.special_forward_speed;
        let lateral = self.tuning.special_lateral_speed;
        let sprite = sprites.special_laser;

        vec![
            Projectile::new(next_id(), nose, DVec2::new(-lateral, forward), sprite),
            Projectile::new(next_id(), nose, DVec2::new(lateral, forward), sprite),
        ]
    }

    /// Speed up along the current direction of travel on each axis
    pub fn burst(&mut self) -> bool {
        if !self.trigger(Ability::Burst) {
            return false;
        }
        let force = self.tuning.burst_force;
        self.body.vel.x = sign_preserving_boost(self.body.vel.x, force);
        self.body.vel.y = sign_preserving_boost(self.body.vel.y, force);
        true
    }

    /// Gain a level and its faster primary fire; false at max level
    pub fn apply_powerup(&mut self) -> bool {
        if self.level >= self.tuning.max_level {
            return false;
        }
        self.level += 1;
        let duration = self.tuning.primary_cooldown(self.level);
        if let Some(primary) = self.cooldowns.get_mut(&Ability::Primary) {
            primary.set_duration(duration);
        }
        log::info!("Player level {} (laser cooldown {:.3}s)", self.level, duration);
        true
    }
}

impl Entity for Player {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }
}
