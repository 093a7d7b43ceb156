//! Session state and the level sequence
//!
//! Everything the loop mutates from frame to frame lives here, seeded once
//! so identical input sequences replay identically.

use glam::DVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::arena::Arena;
use super::level::{Level, Stage};
use super::player::Player;
use super::rect::Rect;
use super::tick::TickInput;
use crate::assets::{Assets, Fonts, Sprites};
use crate::audio::AudioEvent;
use crate::config::{GameConfig, SessionTuning, SpawnTuning};
use crate::error::ConfigError;
use crate::settings::Settings;
use crate::starfield::Starfield;

/// ID of the player ship; everything else is allocated after it
pub const PLAYER_ID: u32 = 1;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Updates and rendering suspended; input still read
    Paused,
    /// Loop ends at this frame boundary
    Quit,
}

#[derive(Debug)]
pub struct GameState {
    /// RNG seed for reproducibility
    pub seed: u64,
    /// Gameplay RNG: spawning and hit effects
    pub rng: Pcg32,
    pub phase: GamePhase,
    /// Simulated (unpaused) frames
    pub time_ticks: u64,
    /// Simulated seconds
    pub elapsed: f64,
    /// Score across every level played
    pub total_score: u64,
    /// Points toward the next player level-up
    pub powerup_points: u64,
    pub level: Level,
    pub settings: Settings,
    pub starfield: Starfield,
    /// Smoothed frames per second
    pub fps: f64,
    pub screen: Rect,
    pub sprites: Sprites,
    pub fonts: Fonts,
    stages: Vec<Stage>,
    pub spawn: SpawnTuning,
    pub session: SessionTuning,
    /// Last frame's input, for edge-triggered controls
    pub(crate) prev_input: TickInput,
    /// Audio raised outside a tick, delivered with the next one
    pub(crate) pending_audio: Vec<AudioEvent>,
}

impl GameState {
    /// Start a session on the first configured level
    pub fn new(
        config: &GameConfig,
        assets: &Assets,
        seed: u64,
        settings: Settings,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let stages = assets.stages.clone();
        let first = stages.first().ok_or(ConfigError::NoLevels)?;

        let screen = Rect::new(0.0, 0.0, config.screen.width, config.screen.height);
        let player = Player::new(PLAYER_ID, assets.sprites.player, config.player.clone());
        let arena = Arena::new(screen, player);
        let level = Level::new(
            0,
            first,
            arena,
            config.spawn.clone(),
            config.session.grace_period,
        );

        let starfield = Starfield::new(
            settings.quality.star_count(),
            DVec2::new(config.screen.width, config.screen.height),
            seed ^ 0x5354_4152,
        );

        let pending_audio = vec![AudioEvent::StartMusic {
            track: first.music,
            fade_in: config.session.music_fade_in,
        }];

        log::info!("Session started (seed {seed}, {} levels)", stages.len());

        Ok(Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Playing,
            time_ticks: 0,
            elapsed: 0.0,
            total_score: 0,
            powerup_points: 0,
            level,
            settings,
            starfield,
            fps: 0.0,
            screen,
            sprites: assets.sprites.clone(),
            fonts: assets.fonts,
            stages,
            spawn: config.spawn.clone(),
            session: config.session.clone(),
            prev_input: TickInput::default(),
            pending_audio,
        })
    }

    /// Stage for a level index; past the end the last stage repeats
    pub fn stage(&self, index: usize) -> &Stage {
        let last = self.stages.len().saturating_sub(1);
        &self.stages[index.min(last)]
    }

    pub fn player(&self) -> &Player {
        &self.level.arena.player
    }

    /// Replace the ended level with the next one, carrying the player over.
    /// Returns the new level's music track.
    pub fn advance_level(&mut self) -> AudioEvent {
        let index = self.level.index() + 1;
        let stage = self.stage(index).clone();
        let arena = self.level.arena.successor();
        log::info!(
            "Advancing to level {} (total score {})",
            index + 1,
            self.total_score
        );
        self.level = Level::new(
            index,
            &stage,
            arena,
            self.spawn.clone(),
            self.session.grace_period,
        );
        AudioEvent::StartMusic {
            track: stage.music,
            fade_in: self.session.music_fade_in,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::fixtures;

    #[test]
    fn test_new_state_queues_music() {
        let state = fixtures::state(42);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.level.index(), 0);
        assert_eq!(state.player().level, 1);
        assert!(matches!(
            state.pending_audio.as_slice(),
            [AudioEvent::StartMusic { fade_in, .. }] if *fade_in == 2.0
        ));
    }

    #[test]
    fn test_last_stage_repeats() {
        let state = fixtures::state(1);
        let last = state.stage(2).score_threshold;
        assert_eq!(state.stage(7).score_threshold, last);
    }

    #[test]
    fn test_advance_level_keeps_player() {
        let mut state = fixtures::state(1);
        state.level.arena.player.level = 3;
        state.level.arena.player.body.vel = DVec2::new(40.0, 0.0);
        let music = state.advance_level();
        assert_eq!(state.level.index(), 1);
        assert_eq!(state.player().level, 3);
        assert_eq!(state.player().body.vel, DVec2::new(40.0, 0.0));
        assert!(matches!(music, AudioEvent::StartMusic { track, .. } if track == state.stage(1).music));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let assets = fixtures::assets();
        let config = GameConfig {
            levels: Vec::new(),
            ..GameConfig::default()
        };
        assert!(matches!(
            GameState::new(&config, &assets, 0, Settings::default()),
            Err(ConfigError::NoLevels)
        ));
    }
}
