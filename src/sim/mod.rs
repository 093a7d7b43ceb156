//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Stable iteration order (insertion order, IDs ascending)
//! - No rendering or platform dependencies: output is a draw list and audio cues

pub mod arena;
pub mod collision;
pub mod cooldown;
pub mod entity;
pub mod level;
pub mod player;
pub mod rect;
pub mod spawner;
pub mod state;
pub mod tick;

pub use arena::Arena;
pub use collision::{CollisionOutcome, Destroyed};
pub use cooldown::Cooldown;
pub use entity::{Body, Effect, Enemy, EnemyTier, Entity, Projectile, Transform};
pub use level::{Level, LevelPhase, Stage};
pub use player::{Ability, BoundsOutcome, Player, Thrust};
pub use rect::Rect;
pub use spawner::{EnemySkin, Spawner};
pub use state::{GamePhase, GameState};
pub use tick::{FrameOutput, TickInput, autopilot, tick};
