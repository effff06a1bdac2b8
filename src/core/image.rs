use std::sync::Arc;

use super::error::{CursorError, Result};

/// Native image APIs take dimensions as C `int`.
pub const MAX_DIMENSION: u32 = i32::MAX as u32;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PixelPoint {
    pub x: i32,
    pub y: i32,
}

impl PixelPoint {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Decoded cursor image in premultiplied ARGB, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

impl Bitmap {
    /// Builds a bitmap from straight (non-premultiplied) RGBA bytes.
    pub fn from_rgba(width: u32, height: u32, rgba: &[u8]) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(CursorError::InvalidArgument(format!(
                "bitmap dimensions must be non-zero, got {}x{}",
                width, height
            )));
        }

        if width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(CursorError::InvalidArgument(format!(
                "bitmap dimensions must not exceed {}, got {}x{}",
                MAX_DIMENSION, width, height
            )));
        }

        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(CursorError::InvalidArgument(format!(
                "expected {} bytes of RGBA data for {}x{}, got {}",
                expected,
                width,
                height,
                rgba.len()
            )));
        }

        let pixels = rgba
            .chunks_exact(4)
            .map(|px| {
                let a = px[3] as u32;
                let premul = |c: u8| (c as u32 * a + 127) / 255;
                (a << 24) | (premul(px[0]) << 16) | (premul(px[1]) << 8) | premul(px[2])
            })
            .collect();

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub fn contains(&self, point: PixelPoint) -> bool {
        point.x >= 0
            && point.y >= 0
            && (point.x as u32) < self.width
            && (point.y as u32) < self.height
    }
}

/// One DPI variant of a custom cursor.
#[derive(Clone, Debug)]
pub struct ScaledImage {
    image: Arc<Bitmap>,
    hotspot: PixelPoint,
    scale: f64,
}

impl ScaledImage {
    pub fn new(image: Arc<Bitmap>, hotspot: PixelPoint, scale: f64) -> Result<Self> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(CursorError::InvalidArgument(format!(
                "scale must be a positive number, got {}",
                scale
            )));
        }

        Ok(Self {
            image,
            hotspot,
            scale,
        })
    }

    pub fn image(&self) -> &Arc<Bitmap> {
        &self.image
    }

    pub fn hotspot(&self) -> PixelPoint {
        self.hotspot
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }
}
