//! Frame buffer with 2D pixel access.
//!
//! Owns a color and a depth buffer with bounds-checked access. The depth
//! buffer enables hidden surface removal via the z-buffer algorithm.

use std::path::Path;

use image::{ImageBuffer, Rgb as ImageRgb, RgbImage};

use crate::colors::{self, unpack_color};

/// Offset added to line depths so edges drawn over a filled face win the
/// depth test against that same face.
const LINE_DEPTH_BIAS: f32 = 1.0e-4;

/// Color and depth storage for one rendered frame.
///
/// # Depth Buffer
///
/// The depth buffer stores 1/w values (reciprocal of clip-space W) for each pixel.
/// Using 1/w instead of z because it can be linearly interpolated in screen space.
/// Larger values are closer to the camera, and a cleared pixel holds 0.
pub struct FrameBuffer {
    color_buffer: Vec<u32>,
    depth_buffer: Vec<f32>,
    width: u32,
    height: u32,
}

impl FrameBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        let len = (width * height) as usize;
        Self {
            color_buffer: vec![colors::BACKGROUND; len],
            depth_buffer: vec![0.0; len],
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Reallocates both buffers for a new size. Contents are cleared.
    pub fn resize(&mut self, width: u32, height: u32) {
        let len = (width * height) as usize;
        self.width = width;
        self.height = height;
        self.color_buffer = vec![colors::BACKGROUND; len];
        self.depth_buffer = vec![0.0; len];
    }

    /// Fills the color buffer with `color` and resets depth.
    pub fn clear(&mut self, color: u32) {
        self.color_buffer.fill(color);
        self.clear_depth();
    }

    pub fn clear_depth(&mut self) {
        self.depth_buffer.fill(0.0);
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            Some((y as u32 * self.width + x as u32) as usize)
        } else {
            None
        }
    }

    /// Set a pixel at (x, y) with depth testing.
    ///
    /// The pixel is only written if the depth value is greater than the existing
    /// depth at that location (closer to camera, since we store 1/w).
    /// Silently ignores out-of-bounds coordinates.
    #[inline]
    pub fn set_pixel_with_depth(&mut self, x: i32, y: i32, depth: f32, color: u32) {
        if let Some(idx) = self.index(x, y) {
            // Depth test: larger 1/w means closer to camera
            if depth > self.depth_buffer[idx] {
                self.depth_buffer[idx] = depth;
                self.color_buffer[idx] = color;
            }
        }
    }

    /// Blends `color` over the pixel if it passes the depth test.
    ///
    /// Depth is tested but not written, so translucent layers never hide
    /// what is drawn behind them afterwards.
    #[inline]
    pub fn blend_pixel_with_depth(&mut self, x: i32, y: i32, depth: f32, color: u32, alpha: f32) {
        if let Some(idx) = self.index(x, y) {
            if depth > self.depth_buffer[idx] {
                self.color_buffer[idx] = colors::blend(self.color_buffer[idx], color, alpha);
            }
        }
    }

    /// Set a pixel without depth testing (for overlays, UI, etc.)
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, color: u32) {
        if let Some(idx) = self.index(x, y) {
            self.color_buffer[idx] = color;
        }
    }

    /// Get the color at (x, y), or None if out of bounds.
    #[inline]
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<u32> {
        self.index(x, y).map(|idx| self.color_buffer[idx])
    }

    /// Get the stored 1/w at (x, y), or None if out of bounds.
    #[inline]
    pub fn get_depth(&self, x: i32, y: i32) -> Option<f32> {
        self.index(x, y).map(|idx| self.depth_buffer[idx])
    }

    pub fn pixels(&self) -> &[u32] {
        &self.color_buffer
    }

    /// The color buffer as raw ARGB8888 bytes, for texture upload.
    pub fn as_bytes(&self) -> &[u8] {
        // SAFETY: u32 has no padding and any byte pattern is a valid u8. The
        // length is scaled by size_of::<u32>() and the lifetime is tied to
        // &self.
        unsafe {
            std::slice::from_raw_parts(
                self.color_buffer.as_ptr() as *const u8,
                self.color_buffer.len() * std::mem::size_of::<u32>(),
            )
        }
    }

    /// Draws a depth-tested line between two screen points using Bresenham's
    /// algorithm. Depth (1/w) is interpolated linearly along the line.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_line(
        &mut self,
        x0: i32,
        y0: i32,
        depth0: f32,
        x1: i32,
        y1: i32,
        depth1: f32,
        color: u32,
    ) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let steps = dx.max(-dy).max(1) as f32;

        let (mut x, mut y) = (x0, y0);
        let mut err = dx + dy;
        let mut step = 0.0;
        loop {
            let depth = depth0 + (depth1 - depth0) * (step / steps) + LINE_DEPTH_BIAS;
            self.set_pixel_with_depth(x, y, depth, color);
            if x == x1 && y == y1 {
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
            step += 1.0;
        }
    }

    /// Copies the color buffer into an RGB image.
    pub fn to_image(&self) -> RgbImage {
        ImageBuffer::from_fn(self.width, self.height, |x, y| {
            let (r, g, b) = unpack_color(self.color_buffer[(y * self.width + x) as usize]);
            ImageRgb([
                (r * 255.0).round() as u8,
                (g * 255.0).round() as u8,
                (b * 255.0).round() as u8,
            ])
        })
    }

    /// Writes the color buffer to `path`; the format follows the extension.
    pub fn save(&self, path: &Path) -> Result<(), image::ImageError> {
        self.to_image().save(path)
    }
}
