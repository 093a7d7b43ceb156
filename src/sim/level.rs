//! Level progression: ACTIVE until the score threshold, then a grace period

use rand::Rng;

use super::arena::Arena;
use super::spawner::{EnemySkin, Spawner};
use crate::assets::{ResourceHandle, SpriteRef};
use crate::config::SpawnTuning;

/// Resolved resources and goal for one configured level
#[derive(Debug, Clone)]
pub struct Stage {
    pub background: SpriteRef,
    pub music: ResourceHandle,
    pub palette: Vec<EnemySkin>,
    pub score_threshold: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelPhase {
    /// Spawning and scoring
    Active,
    /// Threshold reached; no spawning, grace countdown running
    Complete,
    /// Terminal, the session moves on
    Ended,
}

#[derive(Debug, Clone)]
pub struct Level {
    index: usize,
    pub background: SpriteRef,
    pub music: ResourceHandle,
    pub arena: Arena,
    spawner: Spawner,
    score: u64,
    threshold: u64,
    phase: LevelPhase,
    /// Seconds of grace left once complete
    end_timer: f64,
    grace: f64,
}

impl Level {
    pub fn new(index: usize, stage: &Stage, arena: Arena, tuning: SpawnTuning, grace: f64) -> Self {
        log::info!(
            "Level {} started (threshold {}, {} palettes)",
            index + 1,
            stage.score_threshold,
            stage.palette.len()
        );
        Self {
            index,
            background: stage.background,
            music: stage.music,
            arena,
            spawner: Spawner::new(tuning, stage.palette.clone()),
            score: 0,
            threshold: stage.score_threshold,
            phase: LevelPhase::Active,
            end_timer: grace,
            grace,
        }
    }

    /// Zero-based position in the session
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn threshold(&self) -> u64 {
        self.threshold
    }

    pub fn phase(&self) -> LevelPhase {
        self.phase
    }

    pub fn is_complete(&self) -> bool {
        self.phase != LevelPhase::Active
    }

    pub fn is_ended(&self) -> bool {
        self.phase == LevelPhase::Ended
    }

    pub fn end_timer(&self) -> f64 {
        self.end_timer
    }

    pub fn spawn_interval(&self) -> f64 {
        self.spawner.spawn_interval()
    }

    /// Run the spawner; nothing spawns once the level is complete
    pub fn spawn<R: Rng>(&mut self, dt: f64, rng: &mut R) -> usize {
        if self.phase != LevelPhase::Active {
            return 0;
        }
        self.spawner.maybe_spawn(dt, &mut self.arena, rng)
    }

    /// Add destroyed-enemy rewards. Returns true on the frame the threshold is reached.
    pub fn add_score(&mut self, points: u64) -> bool {
        self.score += points;
        if self.phase == LevelPhase::Active && self.score >= self.threshold {
            self.phase = LevelPhase::Complete;
            self.end_timer = self.grace;
            log::info!(
                "Level {} complete with {} points after {} waves",
                self.index + 1,
                self.score,
                self.spawner.waves()
            );
            return true;
        }
        false
    }

    /// Count the grace period down. Returns true on the frame the level ends.
    pub fn advance(&mut self, dt: f64) -> bool {
        if self.phase != LevelPhase::Complete {
            return false;
        }
        self.end_timer = (self.end_timer - dt).max(0.0);
        if self.end_timer == 0.0 {
            self.phase = LevelPhase::Ended;
            log::info!("Level {} ended", self.index + 1);
            return true;
        }
        false
    }
}
