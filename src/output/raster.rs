//! RGBA raster canvas.
//!
//! Rows are padded to a 64-byte stride.

use crate::color::Rgba;
use crate::error::{Error, Result};

use super::scene::{Scene, Shape};

/// Row alignment in bytes.
const ROW_ALIGNMENT: usize = 64;

/// Pixel buffer that scenes are rasterized into.
#[derive(Debug, Clone)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    stride: usize,
}

impl Canvas {
    /// Create a transparent canvas.
    ///
    /// # Errors
    ///
    /// Returns an error if width or height is zero.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions { width, height });
        }
        let row_bytes = (width as usize) * 4;
        let stride = (row_bytes + ROW_ALIGNMENT - 1) & !(ROW_ALIGNMENT - 1);
        Ok(Self { width, height, pixels: vec![0; stride * height as usize], stride })
    }

    /// Rasterize a scene. Text shapes are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the scene has zero dimensions.
    pub fn from_scene(scene: &Scene) -> Result<Self> {
        let mut canvas = Self::new(scene.width, scene.height)?;
        canvas.clear(scene.background);
        for shape in &scene.shapes {
            canvas.draw(shape);
        }
        Ok(canvas)
    }

    /// Width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Row stride in bytes, including padding.
    #[must_use]
    pub const fn stride(&self) -> usize {
        self.stride
    }

    /// Fill the whole canvas.
    pub fn clear(&mut self, color: Rgba) {
        let px = color.to_array();
        let row_bytes = self.width as usize * 4;
        for row in self.pixels.chunks_exact_mut(self.stride) {
            for chunk in row[..row_bytes].chunks_exact_mut(4) {
                chunk.copy_from_slice(&px);
            }
        }
    }

    /// Color at a pixel, or `None` out of bounds.
    #[must_use]
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = self.index(x, y);
        Some(Rgba::new(self.pixels[i], self.pixels[i + 1], self.pixels[i + 2], self.pixels[i + 3]))
    }

    /// Blend `color` over a pixel; out-of-bounds writes are ignored.
    pub fn blend_pixel(&mut self, x: i64, y: i64, color: Rgba) {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return;
        }
        let i = self.index(x as u32, y as u32);
        if color.a == 255 {
            self.pixels[i..i + 4].copy_from_slice(&color.to_array());
            return;
        }
        let alpha = f32::from(color.a) / 255.0;
        let src = [color.r, color.g, color.b];
        for (dst, src) in self.pixels[i..i + 3].iter_mut().zip(src) {
            *dst = (f32::from(src) * alpha + f32::from(*dst) * (1.0 - alpha)).round() as u8;
        }
        let dst_a = f32::from(self.pixels[i + 3]) / 255.0;
        self.pixels[i + 3] = ((alpha + dst_a * (1.0 - alpha)) * 255.0).round() as u8;
    }

    /// Fill a rectangle, clipped to the canvas.
    pub fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Rgba) {
        let x0 = x.round().max(0.0) as i64;
        let y0 = y.round().max(0.0) as i64;
        let x1 = (x + width).round().min(self.width as f32) as i64;
        let y1 = (y + height).round().min(self.height as f32) as i64;
        for py in y0..y1 {
            for px in x0..x1 {
                self.blend_pixel(px, py, color);
            }
        }
    }

    /// Outline a rectangle with a one-pixel border.
    pub fn stroke_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Rgba) {
        self.fill_rect(x, y, width, 1.0, color);
        self.fill_rect(x, y + height - 1.0, width, 1.0, color);
        self.fill_rect(x, y, 1.0, height, color);
        self.fill_rect(x + width - 1.0, y, 1.0, height, color);
    }

    /// Bresenham line.
    pub fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, color: Rgba) {
        let (mut x, mut y) = (x1.round() as i64, y1.round() as i64);
        let (xe, ye) = (x2.round() as i64, y2.round() as i64);
        let dx = (xe - x).abs();
        let dy = -(ye - y).abs();
        let sx = if x < xe { 1 } else { -1 };
        let sy = if y < ye { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.blend_pixel(x, y, color);
            if x == xe && y == ye {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Filled circle by scanlines.
    pub fn fill_circle(&mut self, cx: f32, cy: f32, r: f32, color: Rgba) {
        let r2 = r * r;
        let top = (cy - r).floor() as i64;
        let bottom = (cy + r).ceil() as i64;
        for py in top..=bottom {
            let dy = py as f32 + 0.5 - cy;
            if dy * dy > r2 {
                continue;
            }
            let half = (r2 - dy * dy).sqrt();
            let left = (cx - half).round() as i64;
            let right = (cx + half).round() as i64;
            for px in left..right {
                self.blend_pixel(px, py, color);
            }
        }
    }

    fn draw(&mut self, shape: &Shape) {
        match shape {
            Shape::Rect { x, y, width, height, fill, stroke } => {
                self.fill_rect(*x, *y, *width, *height, *fill);
                if let Some(stroke) = stroke {
                    self.stroke_rect(*x, *y, *width, *height, *stroke);
                }
            }
            Shape::Line { x1, y1, x2, y2, stroke, .. } => {
                self.draw_line(*x1, *y1, *x2, *y2, *stroke);
            }
            Shape::Circle { cx, cy, r, fill } => self.fill_circle(*cx, *cy, *r, *fill),
            Shape::Text { .. } => {}
        }
    }

    /// Pixels without row padding, as PNG expects.
    #[must_use]
    pub fn to_compact_pixels(&self) -> Vec<u8> {
        let row_bytes = self.width as usize * 4;
        if self.stride == row_bytes {
            return self.pixels.clone();
        }
        let mut compact = Vec::with_capacity(row_bytes * self.height as usize);
        for row in self.pixels.chunks_exact(self.stride) {
            compact.extend_from_slice(&row[..row_bytes]);
        }
        compact
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize) * self.stride + (x as usize) * 4
    }
}
