//! Axis-aligned rectangles for collision boxes and screen bounds
//!
//! Screen coordinates: x grows right, y grows down, `pos` is the top-left corner.

use glam::DVec2;

/// An axis-aligned box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub pos: DVec2,
    pub size: DVec2,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self {
            pos: DVec2::new(x, y),
            size: DVec2::new(w, h),
        }
    }

    pub fn from_pos_size(pos: DVec2, size: DVec2) -> Self {
        Self { pos, size }
    }

    #[inline]
    pub fn left(&self) -> f64 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f64 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.pos.y + self.size.y
    }

    pub fn center(&self) -> DVec2 {
        self.pos + self.size / 2.0
    }

    /// Middle of the top edge (where the ship's guns sit)
    pub fn mid_top(&self) -> DVec2 {
        DVec2::new(self.pos.x + self.size.x / 2.0, self.pos.y)
    }

    /// Strict overlap: boxes that only share an edge do not intersect
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }

    /// Overlapping region, if any
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        if !self.intersects(other) {
            return None;
        }
        let min = self.pos.max(other.pos);
        let max = DVec2::new(self.right(), self.bottom()).min(DVec2::new(other.right(), other.bottom()));
        Some(Rect::from_pos_size(min, max - min))
    }

    /// Grow upward by `amount` (keeps the bottom edge)
    pub fn extend_top(&self, amount: f64) -> Rect {
        Rect::new(self.pos.x, self.pos.y - amount, self.size.x, self.size.y + amount)
    }
}
