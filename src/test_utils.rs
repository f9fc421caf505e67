//! Shared fixtures for unit tests.

use image::{GrayImage, Luma};

/// Build a black-on-white image from rows of `#` (0) and `.` (255).
pub fn ascii_image(rows: &[&str]) -> GrayImage {
    let height = rows.len() as u32;
    let width = rows.first().map_or(0, |r| r.len()) as u32;
    GrayImage::from_fn(width, height, |x, y| {
        let cell = rows[y as usize].as_bytes()[x as usize];
        Luma([if cell == b'#' { 0 } else { 255 }])
    })
}

/// Build a grey image from a luminance function.
pub fn gray_image(width: u32, height: u32, f: impl Fn(u32, u32) -> u8) -> GrayImage {
    GrayImage::from_fn(width, height, |x, y| Luma([f(x, y)]))
}
