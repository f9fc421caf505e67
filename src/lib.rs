//! lumatrace: raster image → sub-pixel luminance contours for pen plotters.
//!
//! Traces the boundaries of regions darker than one or more luminance
//! thresholds, interpolating each boundary point between the pixels on
//! either side of it, and lays the result out as an SVG page.
//!
//! # Example
//!
//! ```no_run
//! use lumatrace::{trace, PlotConfig, SvgMetadata, ThresholdSpec, TracingConfig};
//! use std::path::Path;
//!
//! let config = TracingConfig {
//!     thresholds: ThresholdSpec::Count(3),
//!     ..TracingConfig::default()
//! };
//! let result = trace(Path::new("photo.png"), &config)?;
//! let svg = lumatrace::svg::to_svg(&result, &PlotConfig::default(), &SvgMetadata::default())?;
//! std::fs::write("photo.svg", svg)?;
//! # Ok::<(), lumatrace::TraceError>(())
//! ```

#![forbid(unsafe_code)]

pub mod clip;
pub mod config;
pub mod contour;
pub mod error;
pub mod geom;
pub mod luminance;
pub mod page;
pub mod scan;
pub mod simplify;
pub mod svg;
pub mod trace;

#[cfg(test)]
mod test_utils;

// Re-export kurbo so downstream users get the same version
// used by Contour points.
pub use kurbo;

pub use clip::PlotShape;
pub use config::{PlotConfig, RenderMode, ThresholdSpec, Tolerances, TracingConfig};
pub use contour::Contour;
pub use error::TraceError;
pub use luminance::{LumaField, LuminanceField};
pub use page::{PageLayout, PaperSize};
pub use svg::SvgMetadata;

use std::path::Path;
use std::time::Instant;

use clip::split_at_edges;
use scan::find_contours;
use simplify::compress;

/// Everything drawn for one threshold.
#[derive(Debug, Clone)]
pub struct ThresholdLayer {
    pub threshold: u8,
    /// Contours traced, before any splitting at the image edge.
    pub contour_count: usize,
    /// Summed raw contour length in pixels.
    pub length: f64,
    /// Compressed pieces ready to plot.
    pub shapes: Vec<PlotShape>,
}

/// The result of tracing: one layer per threshold.
#[derive(Debug, Clone)]
pub struct TraceResult {
    /// Source image width in pixels.
    pub width: u32,
    /// Source image height in pixels.
    pub height: u32,
    /// Mode the shapes were produced in.
    pub render_mode: RenderMode,
    /// Layers in processing order, highest threshold first.
    pub layers: Vec<ThresholdLayer>,
    /// Summed length of every layer, in pixels.
    pub total_length: f64,
}

/// Full pipeline: image path → per-threshold plot shapes.
pub fn trace(image_path: &Path, config: &TracingConfig) -> Result<TraceResult, TraceError> {
    let t_start = Instant::now();

    let field = LumaField::open(image_path)?;
    let (w, h) = field.dimensions();
    tracing::info!(path = %image_path.display(), width = w, height = h, "loaded image");

    let result = trace_field(&field, config)?;
    tracing::info!(
        elapsed_ms = t_start.elapsed().as_millis() as u64,
        "traced {}",
        image_path.display()
    );
    Ok(result)
}

/// Same pipeline as [`trace`] on an already-built luminance field.
///
/// Thresholds run one at a time from the highest down, so lighter levels,
/// whose regions are larger, are drawn underneath darker ones.
pub fn trace_field<F: LuminanceField + ?Sized>(
    field: &F,
    config: &TracingConfig,
) -> Result<TraceResult, TraceError> {
    let levels = config.thresholds.levels()?;
    let (width, height) = field.dimensions();

    let mut layers = Vec::with_capacity(levels.len());
    let mut total_length = 0.0;
    for &threshold in levels.iter().rev() {
        let layer = extract_layer(field, threshold, config);
        tracing::info!(
            threshold,
            contours = layer.contour_count,
            shapes = layer.shapes.len(),
            length = layer.length,
            "threshold traced"
        );
        total_length += layer.length;
        layers.push(layer);
    }
    tracing::info!(
        thresholds = layers.len(),
        length = total_length,
        "total contour length"
    );

    Ok(TraceResult {
        width,
        height,
        render_mode: config.render_mode,
        layers,
        total_length,
    })
}

/// Scan one threshold and turn its raw contours into plot shapes.
fn extract_layer<F: LuminanceField + ?Sized>(
    field: &F,
    threshold: u8,
    config: &TracingConfig,
) -> ThresholdLayer {
    let found = find_contours(field, threshold);
    let dims = field.dimensions();
    let tolerances = &config.tolerances;

    let mut shapes = Vec::new();
    for contour in &found.contours {
        match config.render_mode {
            RenderMode::Broken => {
                let pieces = split_at_edges(contour, dims, tolerances);
                tracing::debug!(
                    threshold,
                    raw = contour.len(),
                    compressed = pieces.iter().map(|s| s.contour().len()).sum::<usize>(),
                    pieces = pieces.len(),
                    "plotted contour"
                );
                shapes.extend(pieces);
            }
            RenderMode::Clipped => {
                let whole = compress(contour, tolerances);
                tracing::debug!(
                    threshold,
                    raw = contour.len(),
                    compressed = whole.len(),
                    pieces = 1,
                    "plotted contour"
                );
                shapes.push(PlotShape::Polygon(whole));
            }
        }
    }

    ThresholdLayer {
        threshold,
        contour_count: found.contours.len(),
        length: found.length,
        shapes,
    }
}
