//! Contour compression: redundant vertex removal.
//!
//! Drops repeated points and vertices in the middle of straight runs.
//! The outline itself is unchanged.

use kurbo::Point;

use crate::config::Tolerances;
use crate::contour::Contour;
use crate::geom::{heading, same_heading, same_point};

/// Remove repeated and collinear vertices, keeping the first and last points.
///
/// Passes repeat until nothing more is removed, so compressing a compressed
/// contour returns it unchanged. Contours of fewer than three points are
/// returned as they are.
pub fn compress(contour: &Contour, tolerances: &Tolerances) -> Contour {
    if contour.len() < 3 {
        return contour.clone();
    }
    let mut points = drop_repeats(contour.points(), tolerances.point);
    loop {
        let merged = merge_collinear(&points, tolerances.angle);
        if merged.len() == points.len() {
            return Contour::new(merged);
        }
        points = merged;
    }
}

/// Drop zero-length moves. A final point equal to its predecessor
/// replaces it, so the contour still ends where it did.
fn drop_repeats(points: &[Point], tolerance: f64) -> Vec<Point> {
    let Some((&last, rest)) = points.split_last() else {
        return Vec::new();
    };
    let mut out: Vec<Point> = Vec::with_capacity(points.len());
    for &p in rest {
        match out.last() {
            Some(&prev) if same_point(prev, p, tolerance) => {}
            _ => out.push(p),
        }
    }
    let kept = out.len();
    match out.last_mut() {
        Some(prev) if kept > 1 && same_point(*prev, last, tolerance) => *prev = last,
        _ => out.push(last),
    }
    out
}

/// One pass over consecutive triples: a middle point heading the same way
/// as the run it continues is dropped, and the run's heading is kept for
/// the next comparison.
fn merge_collinear(points: &[Point], angle_tolerance: f64) -> Vec<Point> {
    if points.len() < 3 {
        return points.to_vec();
    }
    let mut out = Vec::with_capacity(points.len());
    out.push(points[0]);
    let mut run = heading(points[0], points[1]);
    for w in points.windows(3) {
        let (mid, next) = (w[1], w[2]);
        let turn = heading(mid, next);
        if !same_heading(run, turn, angle_tolerance) {
            out.push(mid);
            run = turn;
        }
    }
    out.push(points[points.len() - 1]);
    out
}
