//! Raster scan that traces every shape at a threshold exactly once.

use crate::contour::Contour;
use crate::geom::PixelPoint;
use crate::luminance::LuminanceField;
use crate::trace::trace_boundary;

/// Raw contours found at one threshold.
#[derive(Debug, Clone)]
pub struct ScanResult {
    pub threshold: u8,
    /// One contour per trace, in scan order.
    pub contours: Vec<Contour>,
    /// Summed length of all contours.
    pub length: f64,
}

/// Scan rows top to bottom, columns left to right, starting a trace at
/// each inside pixel that isn't already part of a traced boundary and
/// isn't in the middle of an inside run on its row.
///
/// The scan order fixes the tracer's approach direction
/// ([`crate::trace::APPROACH`]).
pub fn find_contours<F: LuminanceField + ?Sized>(field: &F, threshold: u8) -> ScanResult {
    let (width, height) = field.dimensions();
    let (w, h) = (width as usize, height as usize);
    let mut seen = vec![false; w * h];
    let mut contours = Vec::new();
    let mut length = 0.0;

    for y in 0..h {
        let mut skipping = false;
        for x in 0..w {
            let p = PixelPoint::new(x as i32, y as i32);
            if field.get(p) >= threshold {
                skipping = false;
                continue;
            }
            if !seen[y * w + x] && !skipping {
                let traced = trace_boundary(field, threshold, p);
                // inside pixels are never off-image, so visited is in bounds
                for v in &traced.visited {
                    seen[v.y as usize * w + v.x as usize] = true;
                }
                tracing::debug!(
                    threshold,
                    x,
                    y,
                    points = traced.contour.len(),
                    length = traced.length,
                    "traced contour"
                );
                length += traced.length;
                contours.push(traced.contour);
            }
            skipping = true;
        }
    }

    ScanResult {
        threshold,
        contours,
        length,
    }
}
