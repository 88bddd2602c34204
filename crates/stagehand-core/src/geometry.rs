//! Planar geometry: points, sizes and axis-aligned boxes
//!
//! Screen coordinates: x grows to the right, y grows downwards.

use serde::{Deserialize, Serialize};

/// A 2D vector used for positions and velocities
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Unscaled width and height of an actor's image
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub width: f64,
    pub height: f64,
}

impl Extent {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl Default for Extent {
    fn default() -> Self {
        Self {
            width: 50.0,
            height: 50.0,
        }
    }
}

/// An axis-aligned bounding box anchored at its top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn min_x(&self) -> f64 {
        self.x
    }

    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    pub fn min_y(&self) -> f64 {
        self.y
    }

    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    /// Whether the two boxes overlap with positive area
    ///
    /// Boxes that only share an edge do not intersect.
    pub fn intersects(&self, other: &Bounds) -> bool {
        self.min_x() < other.max_x()
            && other.min_x() < self.max_x()
            && self.min_y() < other.max_y()
            && other.min_y() < self.max_y()
    }

    /// Whether the point lies inside the box, edges included
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.min_x() && x <= self.max_x() && y >= self.min_y() && y <= self.max_y()
    }

    /// Penetration depth along each axis, or `None` if the boxes are apart
    pub fn overlap(&self, other: &Bounds) -> Option<(f64, f64)> {
        if !self.intersects(other) {
            return None;
        }
        let dx = self.max_x().min(other.max_x()) - self.min_x().max(other.min_x());
        let dy = self.max_y().min(other.max_y()) - self.min_y().max(other.min_y());
        Some((dx, dy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intersects() {
        let a = Bounds::new(0.0, 0.0, 10.0, 10.0);
        let b = Bounds::new(5.0, 5.0, 10.0, 10.0);
        let touching = Bounds::new(10.0, 0.0, 10.0, 10.0);
        let apart = Bounds::new(30.0, 30.0, 5.0, 5.0);

        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        assert!(!a.intersects(&touching));
        assert!(!a.intersects(&apart));
    }

    #[test]
    fn test_contains_edges() {
        let a = Bounds::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.contains(0.0, 0.0));
        assert!(a.contains(10.0, 10.0));
        assert!(!a.contains(10.5, 5.0));
    }

    #[test]
    fn test_overlap_depth() {
        let a = Bounds::new(0.0, 0.0, 10.0, 10.0);
        let b = Bounds::new(8.0, 3.0, 10.0, 10.0);
        assert_eq!(a.overlap(&b), Some((2.0, 7.0)));
        assert_eq!(a.overlap(&Bounds::new(20.0, 0.0, 1.0, 1.0)), None);
    }
}
