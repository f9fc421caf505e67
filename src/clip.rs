//! Splitting contours at the image boundary into plotter-safe polylines.

use kurbo::Point;

use crate::config::Tolerances;
use crate::contour::Contour;
use crate::simplify::compress;

/// One drawable piece of a contour.
#[derive(Debug, Clone, PartialEq)]
pub enum PlotShape {
    /// Closed outline.
    Polygon(Contour),
    /// Open run that starts and/or ends on the image edge.
    Polyline(Contour),
}

impl PlotShape {
    /// Classify a compressed piece by whether it closes on itself.
    pub fn from_piece(piece: Contour, tolerance: f64) -> Self {
        if piece.is_closed(tolerance) {
            PlotShape::Polygon(piece)
        } else {
            PlotShape::Polyline(piece)
        }
    }

    pub fn contour(&self) -> &Contour {
        match self {
            PlotShape::Polygon(c) | PlotShape::Polyline(c) => c,
        }
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, PlotShape::Polygon(_))
    }
}

/// Off-image means beyond `[0, width] x [0, height]`; the image edge
/// itself is on the image.
pub fn is_off_image(p: Point, dims: (u32, u32)) -> bool {
    let (width, height) = (f64::from(dims.0), f64::from(dims.1));
    p.x < 0.0 || p.y < 0.0 || p.x > width || p.y > height
}

/// Where the segment from `outside` (off-image) to `inside` (on-image)
/// crosses the image boundary.
///
/// Each crossed edge is resolved in turn (left, right, top, bottom), so a
/// segment leaving across a corner lands on the edge it crosses last.
pub fn edge_crossing(outside: Point, inside: Point, dims: (u32, u32)) -> Point {
    let (width, height) = (f64::from(dims.0), f64::from(dims.1));
    let mut p = outside;
    if p.x < 0.0 {
        p = intercept_vertical(inside, p, 0.0);
    }
    if p.x > width {
        p = intercept_vertical(inside, p, width);
    }
    if p.y < 0.0 {
        p = intercept_horizontal(inside, p, 0.0);
    }
    if p.y > height {
        p = intercept_horizontal(inside, p, height);
    }
    p
}

/// Point at `x` on the line through `a` and `b`.
fn intercept_vertical(a: Point, b: Point, x: f64) -> Point {
    let m = (b.y - a.y) / (b.x - a.x);
    let c = a.y - m * a.x;
    Point::new(x, m * x + c)
}

/// Point at `y` on the line through `a` and `b`.
fn intercept_horizontal(a: Point, b: Point, y: f64) -> Point {
    if a.x == b.x {
        return Point::new(a.x, y);
    }
    let m = (b.y - a.y) / (b.x - a.x);
    let c = a.y - m * a.x;
    Point::new((y - c) / m, y)
}

/// Cut a raw contour into the runs that lie on the image, each compressed
/// and ending exactly on the edge it leaves by.
///
/// A contour that never leaves the image comes back as a single polygon.
/// Off-image points between runs are dropped.
pub fn split_at_edges(contour: &Contour, dims: (u32, u32), tolerances: &Tolerances) -> Vec<PlotShape> {
    let points = contour.points();
    let mut pieces: Vec<Vec<Point>> = Vec::new();
    let mut open: Option<Vec<Point>> = None;

    for (i, &p) in points.iter().enumerate() {
        if is_off_image(p, dims) {
            if let Some(mut run) = open.take() {
                run.push(edge_crossing(p, points[i - 1], dims));
                pieces.push(run);
            }
        } else {
            let run = open.get_or_insert_with(|| {
                let mut run = Vec::new();
                if i > 0 {
                    run.push(edge_crossing(points[i - 1], p, dims));
                }
                run
            });
            run.push(p);
        }
    }
    if let Some(run) = open {
        pieces.push(run);
    }

    pieces
        .into_iter()
        .map(|run| {
            let piece = compress(&Contour::new(run), tolerances);
            PlotShape::from_piece(piece, tolerances.point)
        })
        .collect()
}
