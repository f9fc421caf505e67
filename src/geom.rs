//! Pixel-grid geometry: integer pixel coordinates, the eight compass
//! directions, and the sub-pixel edge point between two pixels.

use kurbo::Point;

/// How far outside the image an edge point against an off-image
/// neighbour is placed.
pub const OFF_IMAGE_NUDGE: f64 = 0.001;

/// Integer pixel coordinates. May lie outside the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PixelPoint {
    pub x: i32,
    pub y: i32,
}

impl PixelPoint {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The neighbouring pixel in direction `dir`.
    pub fn step(self, dir: Direction) -> Self {
        let (dx, dy) = dir.offset();
        Self::new(self.x + dx, self.y + dy)
    }

    /// The neighbouring pixel directly behind, relative to `dir`.
    pub fn backstep(self, dir: Direction) -> Self {
        self.step(dir.reverse())
    }
}

/// One of the eight neighbour directions, numbered clockwise from the top left:
///
/// ```text
/// 0 1 2
/// 7 . 3
/// 6 5 4
/// ```
///
/// Image y grows downwards, so `North` is `-y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    NorthWest = 0,
    North = 1,
    NorthEast = 2,
    East = 3,
    SouthEast = 4,
    South = 5,
    SouthWest = 6,
    West = 7,
}

impl Direction {
    const ALL: [Direction; 8] = [
        Direction::NorthWest,
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
    ];

    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn from_index(index: u8) -> Self {
        Self::ALL[usize::from(index % 8)]
    }

    /// Quarter turn anticlockwise.
    pub fn turn_left(self) -> Self {
        Self::from_index(self.index() + 6)
    }

    /// Quarter turn clockwise.
    pub fn turn_right(self) -> Self {
        Self::from_index(self.index() + 2)
    }

    pub fn reverse(self) -> Self {
        Self::from_index(self.index() + 4)
    }

    /// Pixel offset `(dx, dy)` of one step in this direction.
    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::NorthWest => (-1, -1),
            Direction::North => (0, -1),
            Direction::NorthEast => (1, -1),
            Direction::East => (1, 0),
            Direction::SouthEast => (1, 1),
            Direction::South => (0, 1),
            Direction::SouthWest => (-1, 1),
            Direction::West => (-1, 0),
        }
    }
}

/// A pixel together with its luminance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    pub at: PixelPoint,
    pub luma: u8,
}

/// Sub-pixel point on the shape boundary between an outside and an inside pixel.
///
/// The position is interpolated linearly by where `threshold` lies between
/// the two luminances, then shifted by half a pixel so that pixel edges fall
/// on integer coordinates. An axis on which `outside` is off the image is
/// pinned just beyond the image edge instead.
///
/// # Panics
///
/// If the pair does not straddle the threshold (`inside < threshold <= outside`).
/// The scanner and tracer only ever present straddling pairs.
pub fn edge_point(outside: Sample, inside: Sample, threshold: u8, dims: (u32, u32)) -> Point {
    assert!(
        outside.luma != inside.luma && inside.luma < threshold && threshold <= outside.luma,
        "edge_point: invalid values for outside ({}), threshold ({}), and inside ({})",
        outside.luma,
        threshold,
        inside.luma,
    );
    let proportion = f64::from(outside.luma - threshold) / f64::from(outside.luma - inside.luma);
    let (width, height) = dims;
    Point::new(
        interpolate_axis(outside.at.x, inside.at.x, proportion, width),
        interpolate_axis(outside.at.y, inside.at.y, proportion, height),
    )
}

fn interpolate_axis(out: i32, inside: i32, proportion: f64, extent: u32) -> f64 {
    if out < 0 {
        -OFF_IMAGE_NUDGE
    } else if out as u32 >= extent {
        f64::from(extent) + OFF_IMAGE_NUDGE
    } else {
        f64::from(out) + f64::from(inside - out) * proportion + 0.5
    }
}

/// Per-axis approximate equality.
pub fn same_point(a: Point, b: Point, tolerance: f64) -> bool {
    (a.x - b.x).abs() < tolerance && (a.y - b.y).abs() < tolerance
}

/// Direction of travel from `a` to `b`, radians anticlockwise from +x.
pub fn heading(a: Point, b: Point) -> f64 {
    (b - a).atan2()
}

/// Whether two headings agree within `tolerance`, allowing for wrap-around at ±π.
pub fn same_heading(a: f64, b: f64, tolerance: f64) -> bool {
    let diff = (a - b).abs() % std::f64::consts::TAU;
    diff.min(std::f64::consts::TAU - diff) < tolerance
}
