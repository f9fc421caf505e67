use crate::error::TraceError;
use crate::page::PaperSize;

/// Two points closer than this on both axes are the same point.
pub const POINT_TOLERANCE: f64 = 0.001;

/// Two segment directions closer than this (radians) are collinear.
pub const ANGLE_TOLERANCE: f64 = 0.01;

/// All engine parameters in one struct.
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Luminance levels to trace at.
    pub thresholds: ThresholdSpec,
    /// How contours that leave the image are rendered.
    pub render_mode: RenderMode,
    /// Geometric comparison tolerances.
    pub tolerances: Tolerances,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            thresholds: ThresholdSpec::Levels(vec![128]),
            render_mode: RenderMode::Broken,
            tolerances: Tolerances::default(),
        }
    }
}

/// Point and angle tolerances used by compression and closure tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    /// Per-axis distance under which points are considered equal.
    pub point: f64,
    /// Angular difference (radians) under which directions are considered equal.
    pub angle: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            point: POINT_TOLERANCE,
            angle: ANGLE_TOLERANCE,
        }
    }
}

/// Rendering of contours that cross the image boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// Split edge-crossing contours into open polylines ending on the image edge.
    /// Safe for plotters that can't honour clip paths.
    #[default]
    Broken,
    /// Keep every contour whole and let the SVG clip path hide what's off-image.
    /// Allows filling, but a plotter will draw the hidden parts.
    Clipped,
}

/// Which threshold levels to trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThresholdSpec {
    /// Explicit levels, each 0..=255.
    Levels(Vec<u8>),
    /// This many evenly spaced levels between 0 and 256.
    Count(u32),
}

impl ThresholdSpec {
    /// The levels to trace, ascending and without repeats.
    pub fn levels(&self) -> Result<Vec<u8>, TraceError> {
        let mut levels = match self {
            ThresholdSpec::Levels(levels) => levels.clone(),
            ThresholdSpec::Count(n) => even_thresholds(*n),
        };
        if levels.is_empty() {
            return Err(TraceError::NoThresholds);
        }
        levels.sort_unstable();
        levels.dedup();
        Ok(levels)
    }
}

/// How traced layers are placed and drawn on the page.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotConfig {
    pub paper: PaperSize,
    /// Minimum blank border, mm.
    pub margin: f64,
    /// Contour stroke width, mm.
    pub line_width: f64,
    /// Frame stroke width around the image, mm. Zero draws no frame.
    pub frame_width: f64,
    /// Reference the source image behind the contours.
    pub background_image: bool,
    /// Layer fill colours: `rrggbb`, `c1,c2,...` or `c1-c2`.
    pub colours: Option<String>,
    /// Draw the paper and plot-area outlines.
    pub debug: bool,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            paper: PaperSize::A4_LANDSCAPE,
            margin: 15.0,
            line_width: 0.5,
            frame_width: 0.0,
            background_image: false,
            colours: None,
            debug: false,
        }
    }
}

/// `n` levels spaced evenly across the luminance range, `n` clamped to 1..=255.
pub fn even_thresholds(n: u32) -> Vec<u8> {
    let n = n.clamp(1, 255);
    let step = 256.0 / f64::from(n + 1);
    (1..=n)
        .map(|i| (step * f64::from(i)).round() as u8)
        .collect()
}
