//! Boundary following: walk one shape's outline with the inside on the left.
//!
//! The tracer keeps a pair of adjacent pixels, one inside the shape and one
//! outside, and a facing direction. Each step looks at the two pixels ahead
//! of the pair:
//!
//! ```text
//! +----------+----------+
//! | next out | next in  |   ^
//! +----------+----------+   | facing
//! |   out    |    in    |
//! +----------+----------+
//! ```
//!
//! - next out is inside the shape: it becomes the inside pixel, turn left
//! - next in is outside the shape: it becomes the outside pixel, turn right
//! - otherwise both step ahead
//!
//! Every pair yields one interpolated edge point.

use kurbo::Point;

use crate::contour::Contour;
use crate::geom::{edge_point, Direction, PixelPoint, Sample};
use crate::luminance::LuminanceField;

/// Direction of travel when the raster scan reaches a shape's first pixel.
///
/// Tied to the left-to-right scan in [`crate::scan`]: the pixel before the
/// start pixel is always outside.
pub const APPROACH: Direction = Direction::East;

/// What one tracer step did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    TurnLeft,
    TurnRight,
    Straight,
}

/// Tracer position: an inside/outside pixel pair and the facing direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TracerState {
    pub inside: PixelPoint,
    pub outside: PixelPoint,
    pub facing: Direction,
}

impl TracerState {
    /// State after arriving at `start` along [`APPROACH`] and turning left,
    /// so the inside is on the left of travel.
    pub fn start(start: PixelPoint) -> Self {
        Self {
            inside: start,
            outside: start.backstep(APPROACH),
            facing: APPROACH.turn_left(),
        }
    }

    /// One transition of the boundary walk.
    pub fn advance<F: LuminanceField + ?Sized>(self, field: &F, threshold: u8) -> (Self, Move) {
        let next_outside = self.outside.step(self.facing);
        let next_inside = self.inside.step(self.facing);

        if field.get(next_outside) < threshold {
            let state = Self {
                inside: next_outside,
                facing: self.facing.turn_left(),
                ..self
            };
            (state, Move::TurnLeft)
        } else if field.get(next_inside) >= threshold {
            let state = Self {
                outside: next_inside,
                facing: self.facing.turn_right(),
                ..self
            };
            (state, Move::TurnRight)
        } else {
            let state = Self {
                inside: next_inside,
                outside: next_outside,
                ..self
            };
            (state, Move::Straight)
        }
    }

    /// Edge point for the current pixel pair.
    pub fn edge_point<F: LuminanceField + ?Sized>(&self, field: &F, threshold: u8) -> Point {
        let outside = Sample {
            at: self.outside,
            luma: field.get(self.outside),
        };
        let inside = Sample {
            at: self.inside,
            luma: field.get(self.inside),
        };
        edge_point(outside, inside, threshold, field.dimensions())
    }
}

/// Output of tracing one shape.
#[derive(Debug, Clone)]
pub struct TracedBoundary {
    /// Edge points in walk order; the last repeats the first.
    pub contour: Contour,
    /// Every inside pixel the walk stood on, starting with the start pixel.
    pub visited: Vec<PixelPoint>,
    /// Length of the contour polyline.
    pub length: f64,
}

/// Trace the shape containing `start`, which must be inside at `threshold`
/// with its west neighbour outside.
///
/// Stops on returning to `start` with the starting orientation. Returning to
/// the start pixel alone isn't enough: pinched and one-pixel-wide shapes pass
/// through it mid-walk.
pub fn trace_boundary<F: LuminanceField + ?Sized>(
    field: &F,
    threshold: u8,
    start: PixelPoint,
) -> TracedBoundary {
    let approach = TracerState {
        facing: APPROACH,
        ..TracerState::start(start)
    };
    let mut prev = approach.edge_point(field, threshold);
    let mut points = vec![prev];
    let mut visited = vec![start];
    let mut length = 0.0;

    let initial = TracerState::start(start);
    let mut state = initial;
    loop {
        let (next, step) = state.advance(field, threshold);
        if step != Move::TurnRight {
            visited.push(next.inside);
        }
        let point = next.edge_point(field, threshold);
        length += prev.distance(point);
        points.push(point);
        prev = point;
        state = next;
        if state.inside == initial.inside && state.facing == initial.facing {
            break;
        }
    }

    TracedBoundary {
        contour: Contour::new(points),
        visited,
        length,
    }
}
