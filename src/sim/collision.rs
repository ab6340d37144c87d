//! Axis-aligned collision detection
//!
//! Everything in the runner is a box: the actor, each obstacle. Overlap is
//! strict on all four sides so boxes that only share an edge never collide.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle, `min` is the top-left corner (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.min.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.min.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.min.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.min.y + self.size.y
    }

    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }

    /// Strict overlap test. Touching edges do not count.
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }
}

/// Index of the first rect in `others` that overlaps `subject`
pub fn first_overlap<'a>(subject: &Rect, others: impl IntoIterator<Item = &'a Rect>) -> Option<usize> {
    others.into_iter().position(|r| subject.overlaps(r))
}
