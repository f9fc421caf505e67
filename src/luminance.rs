use std::path::Path;

use image::{DynamicImage, GrayImage, ImageReader};

use crate::error::TraceError;
use crate::geom::PixelPoint;

/// Luminance reported for every pixel outside the image.
///
/// It is the lightest value, so off-image neighbours are always outside
/// any shape and tracing can step past the image edge.
pub const OFF_IMAGE_LUMA: u8 = 255;

/// Read-only integer luminance per pixel.
pub trait LuminanceField {
    /// `(width, height)` in pixels.
    fn dimensions(&self) -> (u32, u32);

    /// Luminance at an in-bounds pixel.
    fn luma_at(&self, x: u32, y: u32) -> u8;

    /// Luminance at any pixel, [`OFF_IMAGE_LUMA`] outside the image.
    fn get(&self, p: PixelPoint) -> u8 {
        let (width, height) = self.dimensions();
        if p.x < 0 || p.y < 0 || p.x as u32 >= width || p.y as u32 >= height {
            return OFF_IMAGE_LUMA;
        }
        self.luma_at(p.x as u32, p.y as u32)
    }
}

/// Decoded image reduced to one luminance byte per pixel.
#[derive(Debug, Clone)]
pub struct LumaField {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl LumaField {
    /// Load and decode an image file, format detected from its content.
    pub fn open(path: &Path) -> Result<Self, TraceError> {
        let img = ImageReader::open(path)
            .map_err(|e| TraceError::ImageLoad(format!("{}: {}", path.display(), e)))?
            .with_guessed_format()
            .map_err(|e| TraceError::ImageLoad(format!("{}: {}", path.display(), e)))?
            .decode()
            .map_err(|e| TraceError::ImageLoad(format!("{}: {}", path.display(), e)))?;
        Ok(Self::from_image(&img))
    }

    /// `Y = round(0.299 R + 0.587 G + 0.114 B)`; alpha is ignored.
    pub fn from_image(img: &DynamicImage) -> Self {
        let rgb = img.to_rgb8();
        let (width, height) = rgb.dimensions();
        let data = rgb
            .pixels()
            .map(|px| {
                let [r, g, b] = px.0;
                luma_from_rgb(r, g, b)
            })
            .collect();
        Self { width, height, data }
    }
}

impl LuminanceField for LumaField {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn luma_at(&self, x: u32, y: u32) -> u8 {
        self.data[(y as usize) * (self.width as usize) + x as usize]
    }
}

impl LuminanceField for GrayImage {
    fn dimensions(&self) -> (u32, u32) {
        GrayImage::dimensions(self)
    }

    fn luma_at(&self, x: u32, y: u32) -> u8 {
        self.get_pixel(x, y).0[0]
    }
}

fn luma_from_rgb(r: u8, g: u8, b: u8) -> u8 {
    let y = 0.299 * f64::from(r) + 0.587 * f64::from(g) + 0.114 * f64::from(b);
    y.round().clamp(0.0, 255.0) as u8
}
