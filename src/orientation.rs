//! Map cell <-> screen point projections for the three supported orientations.

use crate::error::MapError;
use crate::geom::Point;
use macroquad::prelude::*;
use std::fmt;
use std::str::FromStr;

/// Geometric projection rule of a level, as named by the map document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Square grid.
    Orthogonal,
    /// Diamond grid.
    Isometric,
    /// Isometric tiles in offset rows.
    Staggered,
}

impl Orientation {
    /// Tag as written in the map document.
    pub fn as_str(self) -> &'static str {
        match self {
            Orientation::Orthogonal => "orthogonal",
            Orientation::Isometric => "isometric",
            Orientation::Staggered => "staggered",
        }
    }
}

impl FromStr for Orientation {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "orthogonal" => Ok(Orientation::Orthogonal),
            "isometric" => Ok(Orientation::Isometric),
            "staggered" => Ok(Orientation::Staggered),
            other => Err(MapError::UnsupportedOrientation(other.to_owned())),
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved projection for one level.
///
/// Built once from the orientation, the tile size and the grid size; every
/// method is a pure function of those. Half sizes use integer halving of the
/// tile size, so odd tile dimensions lose their remainder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    orientation: Orientation,
    tile_w: f32,
    tile_h: f32,
    half_w: f32,
    half_h: f32,
    max_bounds: Point,
}

impl Projection {
    /// Projection for a grid of `width` x `height` cells.
    pub fn new(
        orientation: Orientation,
        tile_width: u32,
        tile_height: u32,
        width: u32,
        height: u32,
    ) -> Self {
        let (tw, th) = (tile_width as u64, tile_height as u64);
        let (w, h) = (width as u64, height as u64);

        let max_bounds = match orientation {
            Orientation::Orthogonal => vec2((tw * w) as f32, (th * h) as f32),
            Orientation::Isometric | Orientation::Staggered => vec2(
                (tw * w) as f32 + (tw / 2) as f32,
                (th / 2 * h) as f32 + (th / 2) as f32,
            ),
        };

        Projection {
            orientation,
            tile_w: tile_width as f32,
            tile_h: tile_height as f32,
            half_w: (tile_width / 2) as f32,
            half_h: (tile_height / 2) as f32,
            max_bounds,
        }
    }

    /// Parses the orientation tag and builds the projection.
    pub fn resolve(
        orientation: &str,
        tile_width: u32,
        tile_height: u32,
        width: u32,
        height: u32,
    ) -> Result<Self, MapError> {
        let orientation = orientation.parse::<Orientation>()?;
        Ok(Self::new(orientation, tile_width, tile_height, width, height))
    }

    /// Orientation this projection was built for.
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Map cell (sub-cell accurate) to a point, before the level offset.
    pub fn map_to_point(&self, cell: Point) -> Point {
        match self.orientation {
            Orientation::Orthogonal => vec2(cell.x * self.tile_w, cell.y * self.tile_h),
            Orientation::Isometric => {
                let x = (cell.x - cell.y) * self.half_w;
                let y = (cell.x + cell.y) * self.half_h;
                vec2(x, y)
            }
            Orientation::Staggered => {
                let stagger_x = if is_odd_row(cell.y) { self.half_w } else { 0.0 };
                vec2(cell.x * self.tile_w + stagger_x, cell.y * self.half_h)
            }
        }
    }

    /// Point (offset already removed) back to a fractional map cell.
    ///
    /// Orthogonal and isometric invert `map_to_point` exactly. Staggered is a
    /// picking approximation: the row comes first and its parity decides the
    /// stagger applied to the column.
    pub fn point_to_map(&self, p: Point) -> Point {
        match self.orientation {
            Orientation::Orthogonal => vec2(p.x / self.tile_w, p.y / self.tile_h),
            Orientation::Isometric => {
                let u = p.x / self.half_w;
                let v = p.y / self.half_h;
                vec2((u + v) / 2.0, (v - u) / 2.0)
            }
            Orientation::Staggered => {
                let row = (p.y - p.x) / self.tile_h;
                let stagger_x = if is_odd_row(row) { self.half_w } else { 0.0 };
                let col = (p.x + p.y - stagger_x) / self.tile_w;
                vec2(col, row)
            }
        }
    }

    /// Full extent of the map before the origin offset.
    pub fn max_bounds(&self) -> Point {
        self.max_bounds
    }
}

// Floor parity: row -2.5 lies in row -3, which is odd.
#[inline]
fn is_odd_row(y: f32) -> bool {
    (y.floor() as i64).rem_euclid(2) == 1
}
