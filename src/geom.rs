use macroquad::prelude::*;

/// Screen, world or (fractional) map coordinate.
pub type Point = Vec2;

/// Axis-aligned box, `min` is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Aabb {
    /// Top-left corner.
    pub min: Point,
    /// Bottom-right corner.
    pub max: Point,
}

impl Aabb {
    /// Box from its two corners, taken as given.
    pub fn new(min: Point, max: Point) -> Self {
        Aabb { min, max }
    }

    /// Builds a box from a corner and a size, normalizing negative sizes.
    pub fn from_corner(corner: Point, size: Vec2) -> Self {
        let other = corner + size;
        Aabb {
            min: corner.min(other),
            max: corner.max(other),
        }
    }

    /// Horizontal extent.
    #[inline]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    /// Vertical extent.
    #[inline]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Whether `p` lies inside or on the edge.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Touching edges count as overlapping.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
    }
}

/// Segment between two points, used for polyline boundaries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    /// Start point.
    pub p1: Point,
    /// End point.
    pub p2: Point,
}

impl Line {
    /// Segment from `p1` to `p2`.
    pub fn new(p1: Point, p2: Point) -> Self {
        Line { p1, p2 }
    }

    /// Euclidean length.
    pub fn length(&self) -> f32 {
        self.p1.distance(self.p2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_corner_normalizes_negative_size() {
        let b = Aabb::from_corner(vec2(10.0, 10.0), vec2(-4.0, 6.0));
        assert_eq!(b.min, vec2(6.0, 10.0));
        assert_eq!(b.max, vec2(10.0, 16.0));
        assert_eq!(b.width(), 4.0);
    }

    #[test]
    fn overlap_includes_touching_edges() {
        let a = Aabb::new(vec2(0.0, 0.0), vec2(32.0, 32.0));
        let b = Aabb::new(vec2(32.0, 0.0), vec2(64.0, 32.0));
        let c = Aabb::new(vec2(33.0, 0.0), vec2(64.0, 32.0));
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
    }
}
