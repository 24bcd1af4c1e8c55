//! Render loop around the path integrator.
//!
//! Implements the caller side of `Integrator::trace`:
//! - Multi-sampling with per-pixel jitter
//! - Invalid-sample filtering (NaN or negative channels)
//! - Gamma correction and PNG output

use crate::tile::{Tile, DEFAULT_TILE_SIZE};
use crate::{Camera, Color, Integrator};
use image::{ColorType, ImageFormat, ImageResult};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Per-render settings shared by every pixel.
///
/// Every field has a default, so a partial JSON document is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub samples_per_pixel: u32,
    /// Maximum number of path segments
    pub max_depth: u32,
    /// Weight a camera path starts with
    pub initial_weight: f32,
    /// Radiance of rays that leave the scene
    pub background: Color,
    /// Edge length of a render tile in pixels
    pub tile_size: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            samples_per_pixel: 100,
            max_depth: 20,
            initial_weight: 1.0,
            background: Color::ZERO,
            tile_size: DEFAULT_TILE_SIZE,
        }
    }
}

/// Zero every NaN or negative channel of a sample.
///
/// Returns the cleaned sample and how many channels were dropped.
pub fn sanitize_sample(mut color: Color) -> (Color, u32) {
    let mut dropped = 0;
    for channel in color.as_mut() {
        if channel.is_nan() || *channel < 0.0 {
            *channel = 0.0;
            dropped += 1;
        }
    }
    (color, dropped)
}

/// Gamma 2 encoding; anything not positive maps to black.
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    linear.max(0.0).sqrt()
}

/// Gamma-encoded, saturated, opaque 8-bit pixel.
pub fn color_to_rgba(color: Color) -> [u8; 4] {
    let [r, g, b] = color
        .to_array()
        .map(|channel| (255.0 * linear_to_gamma(channel).min(1.0)) as u8);
    [r, g, b, 255]
}

/// Mean of `samples_per_pixel` traced samples through pixel (x, y).
///
/// Each invalid channel of a sample counts as one lost sample, and the sum
/// is divided by what is left (at least 1).
pub fn render_pixel(
    camera: &Camera,
    integrator: &Integrator,
    x: u32,
    y: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    let mut sum = Color::ZERO;
    let mut actual_samples = config.samples_per_pixel as f32;

    for _ in 0..config.samples_per_pixel {
        let ray = camera.get_ray(x, y, rng);
        let radiance = integrator.trace(&ray, config.max_depth, config.initial_weight, rng);
        let (radiance, dropped) = sanitize_sample(radiance);
        actual_samples -= dropped as f32;
        sum += radiance;
    }

    if actual_samples < 1.0 {
        if config.samples_per_pixel > 0 {
            log::warn!("Pixel ({}, {}) lost every sample to invalid radiance", x, y);
        }
        actual_samples = 1.0;
    }

    sum / actual_samples
}

/// Linear radiance per pixel, rows top to bottom.
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// All-black image.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let i = self.index(x, y);
        self.pixels[i] = color;
    }

    /// Four bytes per pixel, in the layout `image` expects for `Rgba8`.
    pub fn to_rgba(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|&c| color_to_rgba(c)).collect()
    }

    /// Write the gamma-corrected image as an 8-bit PNG.
    pub fn save_png(&self, path: impl AsRef<Path>) -> ImageResult<()> {
        image::save_buffer_with_format(
            path,
            &self.to_rgba(),
            self.width,
            self.height,
            ColorType::Rgba8,
            ImageFormat::Png,
        )
    }
}

/// Render the entire image on the calling thread.
pub fn render(
    camera: &Camera,
    integrator: &Integrator,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> ImageBuffer {
    let (width, height) = (camera.image_width, camera.image_height);
    let mut image = ImageBuffer::new(width, height);
    let whole = Tile {
        x0: 0,
        y0: 0,
        x1: width,
        y1: height,
    };
    for (x, y) in whole.pixels() {
        let color = render_pixel(camera, integrator, x, y, config, rng);
        image.set(x, y, color);
    }
    image
}
