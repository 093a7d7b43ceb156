//! Render boundary: an ordered draw list per frame
//!
//! The core never touches pixels. Each frame it produces a [`Frame`] that an
//! external [`DrawSink`] presents in order, back to front.

use glam::DVec2;
use thousands::Separable;

use crate::assets::ResourceHandle;
use crate::sim::entity::{Entity, Transform};
use crate::sim::player::Ability;
use crate::sim::rect::Rect;
use crate::sim::state::GameState;

/// Score margin from the top-right corner
const SCORE_MARGIN: f64 = 10.0;
/// Stats overlay origin and line spacing
const STATS_ORIGIN: DVec2 = DVec2::new(10.0, 10.0);
const STATS_LINE_HEIGHT: f64 = 20.0;
/// Ability gauges, stacked up from the bottom-left corner
const GAUGE_SIZE: DVec2 = DVec2::new(100.0, 6.0);
const GAUGE_SPACING: f64 = 12.0;
const GAUGE_MARGIN: f64 = 10.0;
const GAUGE_EMPTY_SHADE: u8 = 60;
const GAUGE_FULL_SHADE: u8 = 200;

/// Horizontal anchoring of a text command's position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// An image with its top-left corner at `pos`
    Sprite {
        handle: ResourceHandle,
        pos: DVec2,
        /// None when the sprite is drawn as-is
        transform: Option<Transform>,
    },
    /// Solid grey rectangle
    Fill { rect: Rect, shade: u8 },
    Text {
        font: ResourceHandle,
        text: String,
        pos: DVec2,
        align: Align,
    },
}

/// Everything to present for one frame, back to front
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    pub commands: Vec<DrawCommand>,
}

impl Frame {
    pub fn sprite(&mut self, handle: ResourceHandle, pos: DVec2) {
        self.commands.push(DrawCommand::Sprite {
            handle,
            pos,
            transform: None,
        });
    }

    /// Draw an entity at its body position with its display transform
    pub fn entity<E: Entity + ?Sized>(&mut self, entity: &E) {
        let body = entity.body();
        let transform = (!body.transform.is_identity()).then_some(body.transform);
        self.commands.push(DrawCommand::Sprite {
            handle: body.visual,
            pos: body.pos,
            transform,
        });
    }

    pub fn text(&mut self, font: ResourceHandle, text: impl Into<String>, pos: DVec2, align: Align) {
        self.commands.push(DrawCommand::Text {
            font,
            text: text.into(),
            pos,
            align,
        });
    }

    pub fn fill(&mut self, rect: Rect, shade: u8) {
        self.commands.push(DrawCommand::Fill { rect, shade });
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Host-side presenter
pub trait DrawSink {
    fn present(&mut self, frame: &Frame);
}

/// Sink that keeps only the most recent frame, for headless runs
#[derive(Debug, Default)]
pub struct FrameLog {
    last: Option<Frame>,
    presented: u64,
}

impl FrameLog {
    pub fn last(&self) -> Option<&Frame> {
        self.last.as_ref()
    }

    pub fn presented(&self) -> u64 {
        self.presented
    }
}

impl DrawSink for FrameLog {
    fn present(&mut self, frame: &Frame) {
        self.presented += 1;
        if self.last.as_ref() != Some(frame) {
            self.last = Some(frame.clone());
        }
    }
}

/// Build the draw list for the current state
pub fn compose(state: &GameState) -> Frame {
    let mut frame = Frame::default();

    frame.sprite(state.level.background.handle, DVec2::ZERO);
    if state.settings.show_starfield {
        state.starfield.draw(&mut frame);
    }
    state.level.arena.draw(&mut frame);

    frame.text(
        state.fonts.score,
        state.total_score.separate_with_commas(),
        DVec2::new(state.screen.right() - SCORE_MARGIN, SCORE_MARGIN),
        Align::Right,
    );

    draw_gauges(state, &mut frame);

    if state.settings.show_stats {
        for (i, line) in stats_lines(state).into_iter().enumerate() {
            let pos = STATS_ORIGIN + DVec2::new(0.0, i as f64 * STATS_LINE_HEIGHT);
            frame.text(state.fonts.stats, line, pos, Align::Left);
        }
    }

    frame
}

/// One bar per ability, filled by cooldown charge
fn draw_gauges(state: &GameState, frame: &mut Frame) {
    let player = state.player();
    for (i, ability) in Ability::ALL.into_iter().enumerate() {
        let Some(cooldown) = player.cooldown(ability) else {
            continue;
        };
        let y = state.screen.bottom() - GAUGE_MARGIN - GAUGE_SIZE.y - i as f64 * GAUGE_SPACING;
        let origin = DVec2::new(GAUGE_MARGIN, y);
        frame.fill(Rect::from_pos_size(origin, GAUGE_SIZE), GAUGE_EMPTY_SHADE);

        let charge = cooldown.charge().clamp(0.0, 1.0);
        if charge > 0.0 {
            let filled = DVec2::new(GAUGE_SIZE.x * charge, GAUGE_SIZE.y);
            frame.fill(Rect::from_pos_size(origin, filled), GAUGE_FULL_SHADE);
        }
    }
}

fn stats_lines(state: &GameState) -> Vec<String> {
    let player = state.player();
    let laser = player
        .cooldown(Ability::Primary)
        .map_or(0.0, |cooldown| cooldown.duration());
    vec![
        format!("FPS {:.0}", state.fps),
        format!("Player dx={:+} dy={:+}", player.body.vel.x, player.body.vel.y),
        format!("Laser Atk Speed {laser:.3}"),
        format!("Wave Spawn Interval {:.3}", state.level.spawn_interval()),
        format!("Player Level {}", player.level),
        format!("Level {}", state.level.index() + 1),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::fixtures;

    fn texts(frame: &Frame) -> Vec<&str> {
        frame
            .commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_background_first_and_score_formatted() {
        let mut state = fixtures::state(1);
        state.total_score = 1_234_500;
        let frame = compose(&state);
        assert!(matches!(
            frame.commands[0],
            DrawCommand::Sprite { handle, .. } if handle == state.level.background.handle
        ));
        assert_eq!(texts(&frame), vec!["1,234,500"]);
    }

    #[test]
    fn test_starfield_toggle() {
        let mut state = fixtures::state(1);
        let with_stars = compose(&state).len();
        state.settings.show_starfield = false;
        let without = compose(&state).len();
        assert_eq!(with_stars - without, state.starfield.stars().len());
    }

    #[test]
    fn test_stats_overlay() {
        let mut state = fixtures::state(1);
        state.settings.show_stats = true;
        let frame = compose(&state);
        let lines = texts(&frame);
        assert_eq!(lines.len(), 7);
        assert_eq!(lines[3], "Laser Atk Speed 0.300");
        assert_eq!(lines[4], "Wave Spawn Interval 4.000");
        assert_eq!(lines[6], "Level 1");
    }

    #[test]
    fn test_gauges_full_when_ready() {
        let mut state = fixtures::state(1);
        state.settings.show_starfield = false;
        let frame = compose(&state);
        let full = frame
            .commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Fill { shade, .. } if *shade == GAUGE_FULL_SHADE))
            .count();
        assert_eq!(full, Ability::ALL.len());
    }

    #[test]
    fn test_frame_log_keeps_last() {
        let mut sink = FrameLog::default();
        let mut frame = Frame::default();
        frame.fill(Rect::new(0.0, 0.0, 1.0, 1.0), 10);
        sink.present(&frame);
        sink.present(&frame);
        assert_eq!(sink.presented(), 2);
        assert_eq!(sink.last(), Some(&frame));
    }
}
