//! Audio cue boundary
//!
//! The simulation emits fire-and-forget [`AudioEvent`]s; a host-side
//! [`AudioSink`] turns them into actual playback. Nothing ever waits on audio.

use std::collections::BTreeMap;

use crate::assets::ResourceHandle;

/// Sound effect cues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Cue {
    /// Primary laser fired
    LaserPrimary,
    /// Spread shot fired
    LaserSpecial,
    /// Speed burst
    Burst,
    /// Hard impact against a side wall
    Collide,
    /// Enemy destroyed
    Explosion,
    /// Player leveled up
    Powerup,
}

/// Everything the core can ask of the audio backend
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AudioEvent {
    Play(Cue),
    /// Start looping a music track, fading in over `fade_in` seconds
    StartMusic { track: ResourceHandle, fade_in: f64 },
    /// Relative music volume change
    SetMusicVolume { delta: f64 },
    /// Fade the current track out over `seconds`
    FadeMusic { seconds: f64 },
}

/// Host-side consumer of audio events
pub trait AudioSink {
    fn handle(&mut self, event: &AudioEvent);
}

/// Sink that only logs, for headless runs
#[derive(Debug, Default)]
pub struct LogAudio {
    sounds: BTreeMap<Cue, ResourceHandle>,
    played: usize,
    volume: MusicVolume,
}

impl LogAudio {
    pub fn new(volume: f64, sounds: BTreeMap<Cue, ResourceHandle>) -> Self {
        Self {
            sounds,
            played: 0,
            volume: MusicVolume::new(volume),
        }
    }

    /// Number of sound effects played so far
    pub fn played(&self) -> usize {
        self.played
    }

    pub fn music_volume(&self) -> f64 {
        self.volume.get()
    }
}

impl AudioSink for LogAudio {
    fn handle(&mut self, event: &AudioEvent) {
        match *event {
            AudioEvent::Play(cue) => match self.sounds.get(&cue) {
                Some(sound) => {
                    self.played += 1;
                    log::trace!("play {cue:?} (#{})", sound.index());
                }
                None => log::warn!("No sound loaded for {cue:?}"),
            },
            AudioEvent::StartMusic { track, fade_in } => {
                log::debug!("music #{} (fade in {fade_in:.1}s)", track.index());
            }
            AudioEvent::SetMusicVolume { delta } => {
                let volume = self.volume.adjust(delta);
                log::debug!("music volume {volume:.1}");
            }
            AudioEvent::FadeMusic { seconds } => {
                log::debug!("music fading over {seconds:.1}s");
            }
        }
    }
}

/// Music volume clamped to 0.0 - 1.0
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MusicVolume(f64);

impl Default for MusicVolume {
    fn default() -> Self {
        Self(crate::consts::MUSIC_VOLUME)
    }
}

impl MusicVolume {
    pub fn new(volume: f64) -> Self {
        Self(volume.clamp(0.0, 1.0))
    }

    pub fn get(self) -> f64 {
        self.0
    }

    /// Apply a relative change, returning the new volume
    pub fn adjust(&mut self, delta: f64) -> f64 {
        self.0 = (self.0 + delta).clamp(0.0, 1.0);
        self.0
    }
}
