//! Level list and data-driven game balance
//!
//! Every section is `#[serde(default)]`, so a JSON file only needs to name the
//! values it overrides. Defaults mirror [`crate::consts`].

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Play area size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    pub width: f64,
    pub height: f64,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            width: SCREEN_WIDTH,
            height: SCREEN_HEIGHT,
        }
    }
}

/// Resource paths shared by every level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetPaths {
    pub player: String,
    pub primary_laser: String,
    pub special_laser: String,
    pub hit_effect: String,
    pub score_font: String,
    pub stats_font: String,
    pub laser_sound: String,
    pub special_sound: String,
    pub burst_sound: String,
    pub collide_sound: String,
    pub explosion_sound: String,
    pub powerup_sound: String,
}

impl Default for AssetPaths {
    fn default() -> Self {
        Self {
            player: "assets/ssr/PNG/playerShip1_orange.png".into(),
            primary_laser: "assets/ssr/PNG/Lasers/laserBlue07.png".into(),
            special_laser: "assets/ssr/PNG/Lasers/laserGreen13.png".into(),
            hit_effect: "assets/ssr/PNG/Lasers/laserBlue08.png".into(),
            score_font: "assets/ssr/Bonus/kenvector_future.ttf".into(),
            stats_font: "assets/fonts/ShareTechMono-Regular.ttf".into(),
            laser_sound: "assets/sound/laser_1.wav".into(),
            special_sound: "assets/sound/laser_2.wav".into(),
            burst_sound: "assets/sound/burst.wav".into(),
            collide_sound: "assets/sound/collide_1.wav".into(),
            explosion_sound: "assets/sound/explosion_1.wav".into(),
            powerup_sound: "assets/sound/powerup_1.wav".into(),
        }
    }
}

/// Enemy skins for one color family
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaletteConfig {
    pub standard: String,
    pub elite: String,
}

impl PaletteConfig {
    fn kenney(color: &str) -> Self {
        Self {
            standard: format!("assets/ssr/PNG/Enemies/enemy{color}3.png"),
            elite: format!("assets/ssr/PNG/Enemies/enemy{color}5.png"),
        }
    }
}

/// One entry of the ordered level list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub background: String,
    pub music: String,
    /// Palette keys enemies of this level are drawn from
    pub palette: Vec<String>,
    pub score_threshold: u64,
}

/// Player movement and ability balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub start: (f64, f64),
    pub horizontal_thrust: f64,
    pub vertical_thrust: f64,
    pub hard_collision_speed: f64,
    pub max_level: u32,
    pub dual_fire_level: u32,
    pub primary_cooldowns: Vec<f64>,
    pub primary_speed: f64,
    pub dual_fire_offset: f64,
    pub special_cooldown: f64,
    pub special_forward_speed: f64,
    pub special_lateral_speed: f64,
    pub burst_cooldown: f64,
    pub burst_force: f64,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            start: PLAYER_START,
            horizontal_thrust: HORIZONTAL_THRUST,
            vertical_thrust: VERTICAL_THRUST,
            hard_collision_speed: HARD_COLLISION_SPEED,
            max_level: MAX_PLAYER_LEVEL,
            dual_fire_level: DUAL_FIRE_LEVEL,
            primary_cooldowns: PRIMARY_COOLDOWNS.to_vec(),
            primary_speed: PRIMARY_SPEED,
            dual_fire_offset: DUAL_FIRE_OFFSET,
            special_cooldown: SPECIAL_COOLDOWN,
            special_forward_speed: SPECIAL_FORWARD_SPEED,
            special_lateral_speed: SPECIAL_LATERAL_SPEED,
            burst_cooldown: BURST_COOLDOWN,
            burst_force: BURST_FORCE,
        }
    }
}

impl PlayerTuning {
    /// Primary fire cooldown for a 1-based player level
    pub fn primary_cooldown(&self, level: u32) -> f64 {
        let index = (level.max(1) - 1) as usize;
        self.primary_cooldowns
            .get(index)
            .or(self.primary_cooldowns.last())
            .copied()
            .unwrap_or(PRIMARY_COOLDOWNS[0])
    }
}

/// Wave cadence and composition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnTuning {
    pub initial_interval: f64,
    pub ramp_period: f64,
    pub ramp_step: f64,
    pub min_interval: f64,
    pub wave_min: u32,
    pub wave_max: u32,
    pub spawn_y: f64,
    pub spawn_margin: f64,
    pub speed_min: f64,
    pub speed_max: f64,
    pub speed_step: f64,
    pub enemy_hp: u32,
    pub enemy_reward: u64,
    pub elite_one_in: u32,
    pub elite_hp: u32,
    pub elite_reward: u64,
    pub elite_speed_factor: f64,
}

impl Default for SpawnTuning {
    fn default() -> Self {
        Self {
            initial_interval: INITIAL_SPAWN_INTERVAL,
            ramp_period: SPAWN_RAMP_PERIOD,
            ramp_step: SPAWN_RAMP_STEP,
            min_interval: MIN_SPAWN_INTERVAL,
            wave_min: WAVE_SIZE_MIN,
            wave_max: WAVE_SIZE_MAX,
            spawn_y: ENEMY_SPAWN_Y,
            spawn_margin: ENEMY_SPAWN_MARGIN,
            speed_min: ENEMY_SPEED_MIN,
            speed_max: ENEMY_SPEED_MAX,
            speed_step: ENEMY_SPEED_STEP,
            enemy_hp: ENEMY_HP,
            enemy_reward: ENEMY_REWARD,
            elite_one_in: ELITE_ONE_IN,
            elite_hp: ELITE_HP,
            elite_reward: ELITE_REWARD,
            elite_speed_factor: ELITE_SPEED_FACTOR,
        }
    }
}

/// Level transitions, powerups and music
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionTuning {
    pub grace_period: f64,
    pub powerup_threshold: u64,
    pub hit_effect_ttl: f64,
    pub music_volume: f64,
    pub music_volume_step: f64,
    pub music_fade_in: f64,
}

impl Default for SessionTuning {
    fn default() -> Self {
        Self {
            grace_period: LEVEL_GRACE_PERIOD,
            powerup_threshold: POWERUP_THRESHOLD,
            hit_effect_ttl: HIT_EFFECT_TTL,
            music_volume: MUSIC_VOLUME,
            music_volume_step: MUSIC_VOLUME_STEP,
            music_fade_in: MUSIC_FADE_IN,
        }
    }
}

/// Complete game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub screen: ScreenConfig,
    pub assets: AssetPaths,
    pub palettes: BTreeMap<String, PaletteConfig>,
    pub levels: Vec<LevelConfig>,
    pub player: PlayerTuning,
    pub spawn: SpawnTuning,
    pub session: SessionTuning,
}

impl Default for GameConfig {
    fn default() -> Self {
        let palettes = ["Black", "Blue", "Green", "Red"]
            .into_iter()
            .map(|color| (color.to_lowercase(), PaletteConfig::kenney(color)))
            .collect();

        let levels = vec![
            LevelConfig {
                background: "assets/art/spacefield1600x1000.png".into(),
                music: "assets/sound/music/DigitalNativeLooped.ogg".into(),
                palette: vec!["black".into()],
                score_threshold: 3000,
            },
            LevelConfig {
                background: "assets/art/nebula1600x1000.png".into(),
                music: "assets/sound/music/ObservingTheStar.ogg".into(),
                palette: vec!["black".into(), "blue".into()],
                score_threshold: 6000,
            },
            LevelConfig {
                background: "assets/art/deepspace1600x1000.png".into(),
                music: "assets/sound/music/EpicBattle.ogg".into(),
                palette: vec!["blue".into(), "green".into(), "red".into()],
                score_threshold: 10000,
            },
        ];

        Self {
            screen: ScreenConfig::default(),
            assets: AssetPaths::default(),
            palettes,
            levels,
            player: PlayerTuning::default(),
            spawn: SpawnTuning::default(),
            session: SessionTuning::default(),
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_json(&json)?;
        log::info!(
            "Loaded configuration from {} ({} levels)",
            path.display(),
            config.levels.len()
        );
        Ok(config)
    }

    /// Reject configurations the session loop cannot run
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.levels.is_empty() {
            return Err(ConfigError::NoLevels);
        }

        for (level, cfg) in self.levels.iter().enumerate() {
            if cfg.score_threshold == 0 {
                return Err(ConfigError::NonPositiveThreshold { level });
            }
            if cfg.palette.is_empty() {
                return Err(ConfigError::EmptyPalette { level });
            }
            if let Some(key) = cfg.palette.iter().find(|k| !self.palettes.contains_key(*k)) {
                return Err(ConfigError::UnknownPalette {
                    level,
                    key: key.clone(),
                });
            }
        }

        positive("screen.width", self.screen.width)?;
        positive("screen.height", self.screen.height)?;

        let player = &self.player;
        if player.max_level == 0 {
            return invalid("player.max_level must be at least 1");
        }
        if player.primary_cooldowns.len() < player.max_level as usize {
            return invalid("player.primary_cooldowns needs one entry per level");
        }
        for cooldown in &player.primary_cooldowns {
            positive("player.primary_cooldowns", *cooldown)?;
        }
        positive("player.special_cooldown", player.special_cooldown)?;
        positive("player.burst_cooldown", player.burst_cooldown)?;
        positive("player.primary_speed", player.primary_speed)?;
        positive("player.special_forward_speed", player.special_forward_speed)?;

        let spawn = &self.spawn;
        positive("spawn.initial_interval", spawn.initial_interval)?;
        positive("spawn.ramp_period", spawn.ramp_period)?;
        positive("spawn.min_interval", spawn.min_interval)?;
        positive("spawn.speed_min", spawn.speed_min)?;
        positive("spawn.speed_step", spawn.speed_step)?;
        if spawn.ramp_step < 0.0 {
            return invalid("spawn.ramp_step must not be negative");
        }
        if spawn.min_interval > spawn.initial_interval {
            return invalid("spawn.min_interval exceeds spawn.initial_interval");
        }
        if spawn.wave_min > spawn.wave_max {
            return invalid("spawn.wave_min exceeds spawn.wave_max");
        }
        if spawn.speed_min > spawn.speed_max {
            return invalid("spawn.speed_min exceeds spawn.speed_max");
        }
        if spawn.spawn_margin >= self.screen.width {
            return invalid("spawn.spawn_margin leaves no room to spawn");
        }
        if spawn.enemy_hp == 0 || spawn.elite_hp == 0 {
            return invalid("enemy hp must be at least 1");
        }
        if spawn.enemy_reward == 0 || spawn.elite_reward == 0 {
            return invalid("enemy rewards must be positive");
        }
        if spawn.elite_one_in == 0 {
            return invalid("spawn.elite_one_in must be at least 1");
        }

        let session = &self.session;
        positive("session.grace_period", session.grace_period)?;
        positive("session.hit_effect_ttl", session.hit_effect_ttl)?;
        if session.powerup_threshold == 0 {
            return invalid("session.powerup_threshold must be positive");
        }
        if !(0.0..=1.0).contains(&session.music_volume) {
            return invalid("session.music_volume must be within 0.0 - 1.0");
        }

        Ok(())
    }
}

fn positive(name: &str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::InvalidTuning(format!("{name} must be positive, got {value}")))
    }
}

fn invalid(message: &str) -> Result<(), ConfigError> {
    Err(ConfigError::InvalidTuning(message.to_string()))
}
