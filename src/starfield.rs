//! Scrolling background starfield
//!
//! Purely cosmetic. It draws from its own RNG stream so toggling it never
//! changes gameplay randomness.

use glam::DVec2;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::render::{DrawCommand, Frame};
use crate::sim::rect::Rect;

/// (fall speed in units/sec, grey shade) per depth tier
pub const STAR_TIERS: [(f64, u8); 3] = [(4.0, 100), (6.0, 120), (8.0, 180)];
pub const STAR_SIZE: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Star {
    pub pos: DVec2,
    pub speed: f64,
    pub shade: u8,
}

#[derive(Debug, Clone)]
pub struct Starfield {
    stars: Vec<Star>,
    size: DVec2,
    rng: Pcg32,
}

impl Starfield {
    pub fn new(count: usize, size: DVec2, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let stars = (0..count)
            .map(|_| {
                let y = random_coord(&mut rng, size.y - 1.0);
                let mut star = Star {
                    pos: DVec2::new(0.0, y),
                    speed: 0.0,
                    shade: 0,
                };
                randomize(&mut star, &mut rng, size.x);
                star
            })
            .collect();
        Self { stars, size, rng }
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    /// Scroll down; stars leaving the bottom wrap to the top with a new column and tier
    pub fn update(&mut self, dt: f64) {
        for star in &mut self.stars {
            star.pos.y += star.speed * dt;
            if star.pos.y >= self.size.y {
                star.pos.y = 0.0;
                randomize(star, &mut self.rng, self.size.x);
            }
        }
    }

    pub fn draw(&self, frame: &mut Frame) {
        let size = DVec2::splat(STAR_SIZE);
        frame.commands.extend(self.stars.iter().map(|star| DrawCommand::Fill {
            rect: Rect::from_pos_size(star.pos, size),
            shade: star.shade,
        }));
    }
}

fn randomize(star: &mut Star, rng: &mut Pcg32, width: f64) {
    star.pos.x = random_coord(rng, width);
    let &(speed, shade) = STAR_TIERS.choose(rng).unwrap_or(&STAR_TIERS[0]);
    star.speed = speed;
    star.shade = shade;
}

fn random_coord(rng: &mut Pcg32, max: f64) -> f64 {
    if max > 0.0 {
        rng.random_range(0.0..max).floor()
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIZE: DVec2 = DVec2::new(1000.0, 1000.0);

    #[test]
    fn test_stars_within_screen_and_tiers() {
        let field = Starfield::new(300, SIZE, 11);
        assert_eq!(field.stars().len(), 300);
        for star in field.stars() {
            assert!(star.pos.x >= 0.0 && star.pos.x < SIZE.x);
            assert!(star.pos.y >= 0.0 && star.pos.y < SIZE.y);
            assert!(STAR_TIERS.contains(&(star.speed, star.shade)));
        }
    }

    #[test]
    fn test_stars_wrap_to_top() {
        let mut field = Starfield::new(50, SIZE, 3);
        // Long enough for every tier to cross the whole screen at least once
        for _ in 0..300 {
            field.update(1.0);
            for star in field.stars() {
                assert!(star.pos.y < SIZE.y);
            }
        }
    }

    #[test]
    fn test_draw_emits_one_fill_per_star() {
        let field = Starfield::new(20, SIZE, 1);
        let mut frame = Frame::default();
        field.draw(&mut frame);
        assert_eq!(frame.commands.len(), 20);
        assert!(matches!(frame.commands[0], DrawCommand::Fill { .. }));
    }
}
