//! Paper sizes, margins and fitting the image onto the page.
//!
//! Everything on the page side is in millimetres. Image coordinates are
//! mapped onto the page with one uniform scale and a translation that
//! centres the image along the axis with room to spare.

use std::fmt;
use std::str::FromStr;

use kurbo::{Size, Vec2};

use crate::error::TraceError;

/// Paper dimensions at or below this are taken to be inches.
pub const PAPER_INCH_LIMIT: f64 = 30.0;

/// Margins at or below this are taken to be inches.
pub const MARGIN_INCH_LIMIT: f64 = 2.0;

const MM_PER_INCH: f64 = 25.4;

/// Millimetres, or inches converted to millimetres when `value <= limit`.
pub fn mm_or_inch(value: f64, limit: f64) -> f64 {
    if value > limit {
        value
    } else {
        value * MM_PER_INCH
    }
}

/// Shortest decimal form with at most four places: `297`, `10.3`, `0.4318`.
pub fn format_mm(value: f64) -> String {
    let s = format!("{:.4}", value);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

/// A sheet of paper in millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaperSize {
    pub width: f64,
    pub height: f64,
}

impl PaperSize {
    pub const A4_LANDSCAPE: PaperSize = PaperSize::new(297.0, 210.0);
    pub const A4_PORTRAIT: PaperSize = PaperSize::new(210.0, 297.0);
    pub const A3_LANDSCAPE: PaperSize = PaperSize::new(420.0, 297.0);
    pub const A3_PORTRAIT: PaperSize = PaperSize::new(297.0, 420.0);

    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Check that a margin leaves room to draw on.
    pub fn check_margin(&self, margin: f64) -> Result<(), TraceError> {
        if self.width < margin * 3.0 || self.height < margin * 3.0 {
            return Err(TraceError::MarginTooLarge {
                margin,
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

impl Default for PaperSize {
    fn default() -> Self {
        Self::A4_LANDSCAPE
    }
}

/// `A4L`, `A4P`, `A3L`, `A3P` (any case), or `WxH` with each side in
/// millimetres or inches.
impl FromStr for PaperSize {
    type Err = TraceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        let named = match upper.as_str() {
            "A4L" => Some(Self::A4_LANDSCAPE),
            "A4P" => Some(Self::A4_PORTRAIT),
            "A3L" => Some(Self::A3_LANDSCAPE),
            "A3P" => Some(Self::A3_PORTRAIT),
            _ => None,
        };
        if let Some(paper) = named {
            return Ok(paper);
        }

        let invalid = || TraceError::InvalidPaper(s.to_string());
        let (w, h) = upper.split_once('X').ok_or_else(invalid)?;
        let w: f64 = w.trim().parse().map_err(|_| invalid())?;
        let h: f64 = h.trim().parse().map_err(|_| invalid())?;
        if !(w > 0.0 && h > 0.0) || !w.is_finite() || !h.is_finite() {
            return Err(invalid());
        }
        Ok(Self::new(
            mm_or_inch(w, PAPER_INCH_LIMIT),
            mm_or_inch(h, PAPER_INCH_LIMIT),
        ))
    }
}

impl fmt::Display for PaperSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x {} mm", format_mm(self.width), format_mm(self.height))
    }
}

/// Placement of the image on the page: page = image * scale + translate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageLayout {
    pub translate: Vec2,
    /// Millimetres per image pixel.
    pub scale: f64,
}

impl PageLayout {
    /// Fit an image of `dims` pixels inside the margin and frame.
    ///
    /// The axis that runs out of room first gets exactly the printable
    /// extent and sits against the margin plus frame. The image is centred
    /// on the other axis.
    pub fn fit(dims: (u32, u32), margin: f64, paper: &PaperSize, frame_width: f64) -> Self {
        let image = Size::new(f64::from(dims.0), f64::from(dims.1));
        let inset = 2.0 * margin + 2.0 * frame_width;
        let printable = Size::new(paper.width - inset, paper.height - inset);
        let edge = margin + frame_width;

        if image.width / image.height > printable.width / printable.height {
            let scale = printable.width / image.width;
            Self {
                translate: Vec2::new(edge, (paper.height - image.height * scale) / 2.0),
                scale,
            }
        } else {
            let scale = printable.height / image.height;
            Self {
                translate: Vec2::new((paper.width - image.width * scale) / 2.0, edge),
                scale,
            }
        }
    }

    /// Convert a pixel length to metres on the page.
    pub fn metres(&self, pixels: f64) -> f64 {
        pixels * self.scale / 1000.0
    }
}
