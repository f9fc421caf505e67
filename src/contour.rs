use std::fmt;

use kurbo::Point;

use crate::geom::same_point;

/// Ordered boundary points of one shape at one threshold, in image
/// coordinates (pixel edges on integers, y down).
///
/// Contours are values: every transform builds a new one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Contour {
    points: Vec<Point>,
}

impl Contour {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn into_points(self) -> Vec<Point> {
        self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<Point> {
        self.points.first().copied()
    }

    pub fn last(&self) -> Option<Point> {
        self.points.last().copied()
    }

    /// First and last points coincide within `tolerance`.
    pub fn is_closed(&self, tolerance: f64) -> bool {
        match (self.first(), self.last()) {
            (Some(first), Some(last)) => self.len() > 1 && same_point(first, last, tolerance),
            _ => false,
        }
    }

    /// Sum of segment lengths.
    pub fn length(&self) -> f64 {
        self.points.windows(2).map(|w| w[0].distance(w[1])).sum()
    }

    /// Same number of points, each within `tolerance` of its counterpart.
    pub fn approx_eq(&self, other: &Contour, tolerance: f64) -> bool {
        self.len() == other.len()
            && self
                .points
                .iter()
                .zip(&other.points)
                .all(|(a, b)| same_point(*a, *b, tolerance))
    }
}

impl From<Vec<Point>> for Contour {
    fn from(points: Vec<Point>) -> Self {
        Self::new(points)
    }
}

impl From<&[(f64, f64)]> for Contour {
    fn from(points: &[(f64, f64)]) -> Self {
        Self::new(points.iter().map(|&(x, y)| Point::new(x, y)).collect())
    }
}

impl fmt::Display for Contour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, p) in self.points.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{{{:.3}, {:.3}}}", p.x, p.y)?;
        }
        write!(f, "}}")
    }
}
