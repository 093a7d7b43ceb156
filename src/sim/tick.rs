//! Per-frame session update
//!
//! One call per frame: input, update, collision, progression, then the
//! render hand-off. Variable dt, no sub-stepping.

use serde::{Deserialize, Serialize};

use super::entity::Entity;
use super::player::{Ability, Thrust};
use super::state::{GamePhase, GameState};
use crate::audio::{AudioEvent, Cue};
use crate::render::{self, Frame};

/// Control state for a single frame (a snapshot, not events)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    pub move_left: bool,
    pub move_right: bool,
    pub thrust_up: bool,
    pub thrust_down: bool,
    pub fire_primary: bool,
    pub fire_special: bool,
    pub burst: bool,
    /// Pause toggle
    pub pause: bool,
    pub toggle_stats: bool,
    pub toggle_starfield: bool,
    pub volume_up: bool,
    pub volume_down: bool,
    pub quit: bool,
}

impl TickInput {
    /// Controls held now but not in `prev`
    pub fn pressed_since(&self, prev: &TickInput) -> TickInput {
        TickInput {
            move_left: self.move_left && !prev.move_left,
            move_right: self.move_right && !prev.move_right,
            thrust_up: self.thrust_up && !prev.thrust_up,
            thrust_down: self.thrust_down && !prev.thrust_down,
            fire_primary: self.fire_primary && !prev.fire_primary,
            fire_special: self.fire_special && !prev.fire_special,
            burst: self.burst && !prev.burst,
            pause: self.pause && !prev.pause,
            toggle_stats: self.toggle_stats && !prev.toggle_stats,
            toggle_starfield: self.toggle_starfield && !prev.toggle_starfield,
            volume_up: self.volume_up && !prev.volume_up,
            volume_down: self.volume_down && !prev.volume_down,
            quit: self.quit && !prev.quit,
        }
    }
}

/// What one frame hands back to the host
#[derive(Debug, Clone, Default)]
pub struct FrameOutput {
    /// None while paused: the host re-presents its last frame
    pub frame: Option<Frame>,
    pub audio: Vec<AudioEvent>,
    pub quit: bool,
}

/// Advance the session by one frame of `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f64) -> FrameOutput {
    let mut out = FrameOutput {
        audio: std::mem::take(&mut state.pending_audio),
        ..FrameOutput::default()
    };

    if state.phase == GamePhase::Quit {
        out.quit = true;
        return out;
    }

    let pressed = input.pressed_since(&state.prev_input);
    state.prev_input = *input;

    // Session controls are read even while paused
    if input.quit {
        log::info!("Quit requested at tick {}", state.time_ticks);
        state.phase = GamePhase::Quit;
        out.quit = true;
        return out;
    }
    if pressed.toggle_stats {
        let shown = state.settings.toggle_stats();
        log::debug!("Stats overlay {}", if shown { "on" } else { "off" });
    }
    if pressed.toggle_starfield {
        let shown = state.settings.toggle_starfield();
        log::debug!("Starfield {}", if shown { "on" } else { "off" });
    }
    let step = state.session.music_volume_step;
    for (held, delta) in [(pressed.volume_up, step), (pressed.volume_down, -step)] {
        if held {
            let applied = state.settings.adjust_music_volume(delta);
            if applied != 0.0 {
                out.audio.push(AudioEvent::SetMusicVolume { delta: applied });
            }
        }
    }

    if pressed.pause {
        state.phase = match state.phase {
            GamePhase::Playing => {
                log::info!("Paused");
                GamePhase::Paused
            }
            GamePhase::Paused => {
                log::info!("Resumed");
                GamePhase::Playing
            }
            GamePhase::Quit => GamePhase::Quit,
        };
    }
    if state.phase == GamePhase::Paused {
        return out;
    }

    state.time_ticks += 1;
    state.elapsed += dt;
    if dt > 0.0 {
        let instant = 1.0 / dt;
        state.fps = if state.fps == 0.0 {
            instant
        } else {
            state.fps * 0.9 + instant * 0.1
        };
    }

    // Player controls
    let arena = &mut state.level.arena;
    for (held, direction) in [
        (input.move_left, Thrust::Left),
        (input.move_right, Thrust::Right),
        (input.thrust_up, Thrust::Up),
        (input.thrust_down, Thrust::Down),
    ] {
        if held {
            arena.player.apply_thrust(direction, dt);
        }
    }
    for (held, ability, cue) in [
        (input.fire_primary, Ability::Primary, Cue::LaserPrimary),
        (input.fire_special, Ability::Special, Cue::LaserSpecial),
        (input.burst, Ability::Burst, Cue::Burst),
    ] {
        if held && arena.fire(ability, &state.sprites) {
            out.audio.push(AudioEvent::Play(cue));
        }
    }

    state.level.spawn(dt, &mut state.rng);

    let bounds = state.level.arena.update(dt);
    if bounds.hard {
        out.audio.push(AudioEvent::Play(Cue::Collide));
    }

    if state.settings.show_starfield {
        state.starfield.update(dt);
    }

    let destroyed = state.level.arena.resolve_collisions(
        state.sprites.hit_effect,
        state.session.hit_effect_ttl,
        &mut state.rng,
    );
    let mut points = 0;
    for kill in &destroyed {
        out.audio.push(AudioEvent::Play(Cue::Explosion));
        points += kill.reward;
    }

    // Progression
    let mut just_completed = false;
    if points > 0 {
        state.total_score += points;
        state.powerup_points += points;
        just_completed = state.level.add_score(points);
        if just_completed {
            out.audio.push(AudioEvent::FadeMusic {
                seconds: state.session.grace_period,
            });
        }
    }

    if state.powerup_points >= state.session.powerup_threshold {
        state.powerup_points = 0;
        if state.level.arena.player.apply_powerup() {
            out.audio.push(AudioEvent::Play(Cue::Powerup));
        }
    }

    if !just_completed && state.level.advance(dt) {
        let music = state.advance_level();
        out.audio.push(music);
    }

    out.frame = Some(render::compose(state));
    out
}

/// Deterministic demo pilot: chase the lowest enemy and keep firing
pub fn autopilot(state: &GameState) -> TickInput {
    let arena = &state.level.arena;
    let player = &arena.player;
    let ship = player.rect().center();

    let target = arena
        .enemies()
        .iter()
        .filter(|e| e.is_alive() && e.rect().bottom() < ship.y)
        .max_by(|a, b| a.body.pos.y.total_cmp(&b.body.pos.y))
        .map(|e| e.rect().center().x);

    let mut input = TickInput::default();
    let Some(target_x) = target else {
        // Drift back toward the middle and hold position
        input.move_left = player.body.vel.x > player.tuning().horizontal_thrust;
        input.move_right = player.body.vel.x < -player.tuning().horizontal_thrust;
        return input;
    };

    // Aim for a velocity proportional to the horizontal error
    let wanted = (target_x - ship.x).clamp(-300.0, 300.0);
    let thrust = player.tuning().horizontal_thrust;
    input.move_right = player.body.vel.x < wanted - thrust;
    input.move_left = player.body.vel.x > wanted + thrust;
    input.fire_primary = true;
    input.fire_special = (target_x - ship.x).abs() < 150.0;
    input
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::fixtures;

    const DT: f64 = 1.0 / 60.0;

    #[test]
    fn test_first_tick_starts_music_and_spawns() {
        let mut state = fixtures::state(12345);
        let out = tick(&mut state, &TickInput::default(), DT);
        assert!(matches!(out.audio.first(), Some(AudioEvent::StartMusic { .. })));
        assert!(out.frame.is_some());
        assert!(!state.level.arena.enemies().is_empty());
        assert_eq!(state.time_ticks, 1);
    }

    #[test]
    fn test_tick_pause() {
        let mut state = fixtures::state(12345);
        tick(&mut state, &TickInput::default(), DT);
        let enemies_y: Vec<f64> = state.level.arena.enemies().iter().map(|e| e.body.pos.y).collect();

        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        let out = tick(&mut state, &pause, DT);
        assert_eq!(state.phase, GamePhase::Paused);
        assert!(out.frame.is_none());

        // Holding the key does not toggle again
        let out = tick(&mut state, &pause, DT);
        assert!(out.frame.is_none());
        assert_eq!(state.time_ticks, 1);
        let still: Vec<f64> = state.level.arena.enemies().iter().map(|e| e.body.pos.y).collect();
        assert_eq!(enemies_y, still);

        // Toggles are still read while paused
        let stats = TickInput {
            toggle_stats: true,
            ..Default::default()
        };
        tick(&mut state, &stats, DT);
        assert!(state.settings.show_stats);

        // Release, then press again to resume
        tick(&mut state, &TickInput::default(), DT);
        let out = tick(&mut state, &pause, DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(out.frame.is_some());
        assert_eq!(state.time_ticks, 2);
    }

    #[test]
    fn test_quit_ends_at_frame_boundary() {
        let mut state = fixtures::state(1);
        let quit = TickInput {
            quit: true,
            ..Default::default()
        };
        let out = tick(&mut state, &quit, DT);
        assert!(out.quit);
        assert!(out.frame.is_none());
        assert_eq!(state.phase, GamePhase::Quit);
        assert!(tick(&mut state, &TickInput::default(), DT).quit);
    }

    #[test]
    fn test_pause_key_cannot_leave_quit() {
        let mut state = fixtures::state(1);
        let both = TickInput {
            quit: true,
            pause: true,
            ..Default::default()
        };
        assert!(tick(&mut state, &both, DT).quit);
        assert_eq!(state.phase, GamePhase::Quit);

        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &TickInput::default(), DT);
        let out = tick(&mut state, &pause, DT);
        assert!(out.quit);
        assert!(out.frame.is_none());
        assert_eq!(state.phase, GamePhase::Quit);
        assert_eq!(state.time_ticks, 0);
    }

    #[test]
    fn test_fps_smoothed_from_dt() {
        let mut state = fixtures::state(1);
        tick(&mut state, &TickInput::default(), 1.0 / 30.0);
        assert!((state.fps - 30.0).abs() < 1e-9);
        for _ in 0..120 {
            tick(&mut state, &TickInput::default(), DT);
        }
        assert!((state.fps - 60.0).abs() < 0.01, "fps = {}", state.fps);
    }

    #[test]
    fn test_fire_emits_cue_only_when_ready() {
        let mut state = fixtures::state(1);
        let fire = TickInput {
            fire_primary: true,
            ..Default::default()
        };
        let out = tick(&mut state, &fire, DT);
        assert!(out.audio.contains(&AudioEvent::Play(Cue::LaserPrimary)));
        let out = tick(&mut state, &fire, DT);
        assert!(!out.audio.contains(&AudioEvent::Play(Cue::LaserPrimary)));
    }

    #[test]
    fn test_volume_keys_are_edge_triggered() {
        let mut state = fixtures::state(1);
        let down = TickInput {
            volume_down: true,
            ..Default::default()
        };
        let first = tick(&mut state, &down, DT);
        let held = tick(&mut state, &down, DT);
        let changes = |out: &FrameOutput| {
            out.audio
                .iter()
                .filter(|e| matches!(e, AudioEvent::SetMusicVolume { .. }))
                .count()
        };
        assert_eq!(changes(&first), 1);
        assert_eq!(changes(&held), 0);
        assert!((state.settings.music_volume - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_determinism() {
        let run = || {
            let mut state = fixtures::state(99999);
            for _ in 0..600 {
                let input = autopilot(&state);
                tick(&mut state, &input, DT);
            }
            (
                state.total_score,
                state.level.index(),
                state.player().body.pos,
                state.level.arena.enemies().len(),
            )
        };
        assert_eq!(run(), run());
    }
}
