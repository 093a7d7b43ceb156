//! Display and audio preferences
//!
//! Toggled at runtime from the input snapshot; never persisted.

use serde::{Deserialize, Serialize};

use crate::config::SessionTuning;
use crate::consts::MUSIC_VOLUME;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Number of background stars for this preset
    pub fn star_count(&self) -> usize {
        match self {
            QualityPreset::Low => 100,
            QualityPreset::Medium => 300,
            QualityPreset::High => 600,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === HUD ===
    /// Stats overlay (F1)
    pub show_stats: bool,
    /// Scrolling starfield (F2)
    pub show_starfield: bool,

    // === Audio ===
    /// Music volume (0.0 - 1.0)
    pub music_volume: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            show_stats: false,
            show_starfield: true,
            music_volume: MUSIC_VOLUME,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset (applies preset defaults)
    pub fn from_preset(preset: QualityPreset) -> Self {
        let mut settings = Self::default();
        settings.apply_preset(preset);
        settings
    }

    /// Preset defaults with the configured starting music volume
    pub fn for_session(preset: QualityPreset, session: &SessionTuning) -> Self {
        let mut settings = Self::from_preset(preset);
        settings.music_volume = session.music_volume.clamp(0.0, 1.0);
        settings
    }

    /// Apply a quality preset (updates quality-dependent settings)
    pub fn apply_preset(&mut self, preset: QualityPreset) {
        self.quality = preset;

        // Low preset starts with the starfield off
        if preset == QualityPreset::Low {
            self.show_starfield = false;
        }
    }

    /// Flip the stats overlay, returning the new state
    pub fn toggle_stats(&mut self) -> bool {
        self.show_stats = !self.show_stats;
        self.show_stats
    }

    /// Flip the starfield, returning the new state
    pub fn toggle_starfield(&mut self) -> bool {
        self.show_starfield = !self.show_starfield;
        self.show_starfield
    }

    /// Nudge music volume, clamped to 0.0 - 1.0. Returns the change actually applied.
    pub fn adjust_music_volume(&mut self, delta: f64) -> f64 {
        let before = self.music_volume;
        self.music_volume = (before + delta).clamp(0.0, 1.0);
        self.music_volume - before
    }
}
