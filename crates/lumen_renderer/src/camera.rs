//! Thin-lens camera.

use crate::sampling::{gen_f32, random_in_unit_disk};
use crate::Ray;
use lumen_math::Vec3;
use rand::RngCore;

/// Where the camera stands and how its lens is set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraSettings {
    pub look_from: Vec3,
    pub look_at: Vec3,
    pub vup: Vec3,
    /// Vertical field of view in degrees
    pub vfov: f32,
    /// Lens diameter; 0 is a pinhole
    pub aperture: f32,
    /// Distance to the plane in perfect focus
    pub focus_dist: f32,
    /// Ray times are drawn uniformly from this interval
    pub shutter: (f32, f32),
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            look_from: Vec3::ZERO,
            look_at: -Vec3::Z,
            vup: Vec3::Y,
            vfov: 90.0,
            aperture: 0.0,
            focus_dist: 1.0,
            shutter: (0.0, 0.0),
        }
    }
}

/// Generates primary rays for an image of fixed size.
#[derive(Debug, Clone)]
pub struct Camera {
    pub image_width: u32,
    pub image_height: u32,
    center: Vec3,
    pixel00: Vec3,
    pixel_du: Vec3,
    pixel_dv: Vec3,
    // Lens disk axes, scaled by the lens radius
    lens_u: Vec3,
    lens_v: Vec3,
    shutter: (f32, f32),
}

impl Camera {
    pub fn new(image_width: u32, image_height: u32, settings: &CameraSettings) -> Self {
        let aspect = image_width as f32 / image_height.max(1) as f32;
        let height = 2.0 * (settings.vfov.to_radians() / 2.0).tan() * settings.focus_dist;
        let width = height * aspect;

        let w = (settings.look_from - settings.look_at).normalize();
        let u = settings.vup.cross(w).normalize();
        let v = w.cross(u);

        // Image rows run downward.
        let across = width * u;
        let down = -height * v;
        let pixel_du = across / image_width.max(1) as f32;
        let pixel_dv = down / image_height.max(1) as f32;
        let corner = settings.look_from - settings.focus_dist * w - (across + down) / 2.0;

        let lens_radius = settings.aperture / 2.0;
        Self {
            image_width,
            image_height,
            center: settings.look_from,
            pixel00: corner + 0.5 * (pixel_du + pixel_dv),
            pixel_du,
            pixel_dv,
            lens_u: lens_radius * u,
            lens_v: lens_radius * v,
            shutter: settings.shutter,
        }
    }

    /// Ray through a random point of pixel (i, j), leaving a random point
    /// of the lens at a random time within the shutter.
    pub fn get_ray(&self, i: u32, j: u32, rng: &mut dyn RngCore) -> Ray {
        let jitter_x = gen_f32(rng);
        let jitter_y = gen_f32(rng);
        let target = self.pixel00
            + (i as f32 + jitter_x - 0.5) * self.pixel_du
            + (j as f32 + jitter_y - 0.5) * self.pixel_dv;

        let origin = if self.lens_u == Vec3::ZERO {
            self.center
        } else {
            let p = random_in_unit_disk(rng);
            self.center + p.x * self.lens_u + p.y * self.lens_v
        };

        let (open, close) = self.shutter;
        let time = open + gen_f32(rng) * (close - open);
        Ray::new(origin, target - origin, time)
    }
}
