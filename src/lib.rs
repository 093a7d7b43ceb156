//! Star Strike - a scrolling starfield arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, cooldowns, spawning, collisions, levels)
//! - `render`: Draw list handed to an external renderer
//! - `audio`: Fire-and-forget audio cue boundary
//! - `assets`: Resource loading and the path-keyed handle cache
//! - `config`: Level list and data-driven game balance
//! - `clock`: Frame pacing and dt measurement

pub mod assets;
pub mod audio;
pub mod clock;
pub mod config;
pub mod error;
pub mod render;
pub mod settings;
pub mod sim;
pub mod starfield;

pub use config::GameConfig;
pub use error::{AssetError, ConfigError, GameError};
pub use settings::{QualityPreset, Settings};

/// Game configuration constants
pub mod consts {
    /// Target frame rate of the session loop
    pub const TARGET_FPS: u32 = 60;
    /// Largest dt a single frame may report (stalls, window drags)
    pub const MAX_FRAME_DT: f64 = 0.1;

    /// Play area dimensions
    pub const SCREEN_WIDTH: f64 = 1000.0;
    pub const SCREEN_HEIGHT: f64 = 1000.0;

    /// Player defaults
    pub const PLAYER_START: (f64, f64) = (500.0, 650.0);
    pub const HORIZONTAL_THRUST: f64 = 15.0;
    pub const VERTICAL_THRUST: f64 = 5.0;
    /// Wall impacts faster than this play the collision cue
    pub const HARD_COLLISION_SPEED: f64 = 400.0;
    pub const MAX_PLAYER_LEVEL: u32 = 5;
    /// Primary fire splits into two side-mounted lasers from this level on
    pub const DUAL_FIRE_LEVEL: u32 = 3;
    /// Primary fire cooldown per player level (index 0 = level 1)
    pub const PRIMARY_COOLDOWNS: [f64; 5] = [0.3, 0.26, 0.23, 0.21, 0.2];
    pub const PRIMARY_SPEED: f64 = 400.0;
    /// Horizontal distance of each dual-fire laser from the ship's center
    pub const DUAL_FIRE_OFFSET: f64 = 30.0;
    pub const SPECIAL_COOLDOWN: f64 = 1.5;
    pub const SPECIAL_FORWARD_SPEED: f64 = 250.0;
    pub const SPECIAL_LATERAL_SPEED: f64 = 150.0;
    pub const BURST_COOLDOWN: f64 = 5.0;
    pub const BURST_FORCE: f64 = 250.0;

    /// Spawning
    pub const INITIAL_SPAWN_INTERVAL: f64 = 4.0;
    /// How often the spawn interval tightens
    pub const SPAWN_RAMP_PERIOD: f64 = 10.0;
    pub const SPAWN_RAMP_STEP: f64 = 0.2;
    pub const MIN_SPAWN_INTERVAL: f64 = 0.6;
    pub const WAVE_SIZE_MIN: u32 = 1;
    pub const WAVE_SIZE_MAX: u32 = 3;
    pub const ENEMY_SPAWN_Y: f64 = -100.0;
    /// Enemies never spawn within this distance of the right edge
    pub const ENEMY_SPAWN_MARGIN: f64 = 70.0;
    pub const ENEMY_SPEED_MIN: f64 = 90.0;
    pub const ENEMY_SPEED_MAX: f64 = 160.0;
    pub const ENEMY_SPEED_STEP: f64 = 10.0;
    pub const ENEMY_HP: u32 = 1;
    pub const ENEMY_REWARD: u64 = 100;
    /// One elite in this many waves, on average
    pub const ELITE_ONE_IN: u32 = 3;
    pub const ELITE_HP: u32 = 3;
    pub const ELITE_REWARD: u64 = 300;
    pub const ELITE_SPEED_FACTOR: f64 = 0.8;

    /// Progression
    pub const LEVEL_GRACE_PERIOD: f64 = 3.0;
    pub const POWERUP_THRESHOLD: u64 = 5000;

    /// Effects
    pub const HIT_EFFECT_TTL: f64 = 0.25;

    /// Music
    pub const MUSIC_VOLUME: f64 = 0.9;
    pub const MUSIC_VOLUME_STEP: f64 = 0.1;
    pub const MUSIC_FADE_IN: f64 = 2.0;
}

/// Add `force` to the magnitude of `v`, keeping its sign.
///
/// A zero component has no direction to push along and stays zero.
#[inline]
pub fn sign_preserving_boost(v: f64, force: f64) -> f64 {
    if v == 0.0 {
        0.0
    } else {
        (v.abs() + force).copysign(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boost_keeps_sign() {
        assert_eq!(sign_preserving_boost(100.0, 250.0), 350.0);
        assert_eq!(sign_preserving_boost(-100.0, 250.0), -350.0);
    }

    #[test]
    fn test_boost_zero_axis_is_noop() {
        assert_eq!(sign_preserving_boost(0.0, 250.0), 0.0);
        assert_eq!(sign_preserving_boost(-0.0, 250.0), 0.0);
    }
}
