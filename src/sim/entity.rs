//! Entity variants and the shared body they move with
//!
//! Every variant embeds a [`Body`] and exposes it through [`Entity`]; variant
//! updates compose the shared [`integrate_and_cull`] step instead of
//! overriding a base update.

use glam::DVec2;

use super::rect::Rect;
use crate::assets::{ResourceHandle, SpriteRef};

/// Display-only transform, never affects collision
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Radians, clockwise, 0 = as drawn
    pub rotation: f64,
    /// Uniform scale about the sprite's center
    pub scale: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            rotation: 0.0,
            scale: 1.0,
        }
    }
}

impl Transform {
    pub fn is_identity(&self) -> bool {
        self.rotation == 0.0 && self.scale == 1.0
    }
}

/// State shared by every entity
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub id: u32,
    /// Top-left corner
    pub pos: DVec2,
    /// Units per second
    pub vel: DVec2,
    pub size: DVec2,
    pub visual: ResourceHandle,
    pub transform: Transform,
    /// Tombstone: dead bodies are skipped until purged
    pub alive: bool,
}

impl Body {
    pub fn new(id: u32, pos: DVec2, vel: DVec2, sprite: SpriteRef) -> Self {
        Self {
            id,
            pos,
            vel,
            size: sprite.size,
            visual: sprite.handle,
            transform: Transform::default(),
            alive: true,
        }
    }

    /// Collision box, always derived from the current position
    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    #[inline]
    pub fn integrate(&mut self, dt: f64) {
        self.pos += self.vel * dt;
    }

    pub fn kill(&mut self) {
        self.alive = false;
    }
}

/// Capability set shared by all entity variants
pub trait Entity {
    fn body(&self) -> &Body;
    fn body_mut(&mut self) -> &mut Body;

    fn is_alive(&self) -> bool {
        self.body().alive
    }

    fn rect(&self) -> Rect {
        self.body().rect()
    }
}

/// Move by velocity, then kill the body once it no longer overlaps `bounds`
pub fn integrate_and_cull(body: &mut Body, dt: f64, bounds: &Rect) {
    body.integrate(dt);
    if !body.rect().intersects(bounds) {
        body.kill();
    }
}

/// A laser shot
#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub body: Body,
    /// Hit points removed per hit
    pub damage: u32,
    /// Display rotation speed in radians/sec
    pub spin: f64,
}

impl Projectile {
    /// Spawn with its bottom-center at `muzzle`, pointed along its velocity
    pub fn new(id: u32, muzzle: DVec2, vel: DVec2, sprite: SpriteRef) -> Self {
        let pos = muzzle - DVec2::new(sprite.size.x / 2.0, sprite.size.y);
        let mut body = Body::new(id, pos, vel, sprite);
        body.transform.rotation = heading(vel);
        Self {
            body,
            damage: 1,
            spin: 0.0,
        }
    }

    pub fn update(&mut self, dt: f64, bounds: &Rect) {
        integrate_and_cull(&mut self.body, dt, bounds);
        self.body.transform.rotation += self.spin * dt;
    }
}

/// Clockwise angle of `vel` from straight up
fn heading(vel: DVec2) -> f64 {
    vel.x.atan2(-vel.y)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyTier {
    Standard,
    Elite,
}

/// A descending enemy ship
#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    pub body: Body,
    pub hp: u32,
    pub reward: u64,
    pub tier: EnemyTier,
    /// Palette key the skin came from
    pub palette: String,
}

impl Enemy {
    pub fn update(&mut self, dt: f64, bounds: &Rect) {
        integrate_and_cull(&mut self.body, dt, bounds);
    }

    /// Apply damage; returns true when this hit destroyed the enemy
    pub fn take_hit(&mut self, damage: u32) -> bool {
        if !self.body.alive {
            return false;
        }
        self.hp = self.hp.saturating_sub(damage);
        if self.hp == 0 {
            self.body.kill();
            true
        } else {
            false
        }
    }
}

/// Short-lived cosmetic sprite (hit sparks)
#[derive(Debug, Clone, PartialEq)]
pub struct Effect {
    pub body: Body,
    pub ttl: f64,
    lifetime: f64,
}

impl Effect {
    /// Centered on `at`, shrinking to nothing over `ttl` seconds
    pub fn new(id: u32, at: DVec2, rotation: f64, sprite: SpriteRef, ttl: f64) -> Self {
        let mut body = Body::new(id, at - sprite.size / 2.0, DVec2::ZERO, sprite);
        body.transform.rotation = rotation;
        Self {
            body,
            ttl,
            lifetime: ttl,
        }
    }

    pub fn update(&mut self, dt: f64) {
        self.ttl = (self.ttl - dt).max(0.0);
        self.body.transform.scale = self.ttl / self.lifetime;
        if self.ttl == 0.0 {
            self.body.kill();
        }
    }
}

macro_rules! impl_entity {
    ($($ty:ty),*) => {
        $(
            impl Entity for $ty {
                fn body(&self) -> &Body {
                    &self.body
                }

                fn body_mut(&mut self) -> &mut Body {
                    &mut self.body
                }
            }
        )*
    };
}

impl_entity!(Projectile, Enemy, Effect);
