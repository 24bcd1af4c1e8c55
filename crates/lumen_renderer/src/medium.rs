//! Constant-density participating medium (smoke, fog).

use crate::hittable::{HitRecord, Hittable};
use crate::material::{Color, Isotropic};
use crate::sampling::mix64;
use crate::Ray;
use lumen_math::{Aabb, Interval, Vec3};
use std::sync::Arc;

/// A volume of constant density filling a closed boundary.
///
/// A ray entering the volume travels an exponentially distributed distance
/// before scattering off the isotropic phase function. The random draw is a
/// SplitMix64 hash of the ray's bit pattern, so intersection stays a pure
/// function of its inputs and gives the same answer on every toolchain.
pub struct ConstantMedium {
    boundary: Arc<dyn Hittable>,
    neg_inv_density: f32,
    phase_function: Isotropic,
}

impl ConstantMedium {
    pub fn new(boundary: Arc<dyn Hittable>, density: f32, albedo: Color) -> Self {
        Self {
            boundary,
            neg_inv_density: -1.0 / density,
            phase_function: Isotropic::new(albedo),
        }
    }

    /// Uniform sample in (0, 1] derived from the ray.
    fn ray_sample(ray: &Ray) -> f32 {
        let (o, d) = (ray.origin(), ray.direction());
        let hash = [o.x, o.y, o.z, d.x, d.y, d.z, ray.time()]
            .into_iter()
            .fold(0, |h: u64, x| mix64(h ^ u64::from(x.to_bits())));

        // Top 24 bits fill the f32 mantissa exactly.
        1.0 - (hash >> 40) as f32 / (1u64 << 24) as f32
    }
}

impl Hittable for ConstantMedium {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let entry = self.boundary.hit(ray, Interval::UNIVERSE)?;
        let exit = self
            .boundary
            .hit(ray, Interval::from_min(entry.t + 0.0001))?;

        let mut t_enter = entry.t.max(ray_t.min);
        let t_exit = exit.t.min(ray_t.max);
        if t_enter >= t_exit {
            return None;
        }
        if t_enter < 0.0 {
            t_enter = 0.0;
        }

        let ray_length = ray.direction().length();
        let distance_inside_boundary = (t_exit - t_enter) * ray_length;
        let hit_distance = self.neg_inv_density * Self::ray_sample(ray).ln();
        if hit_distance > distance_inside_boundary {
            return None;
        }

        let t = t_enter + hit_distance / ray_length;
        Some(HitRecord {
            p: ray.at(t),
            // Normal and facing are meaningless inside a volume.
            normal: Vec3::X,
            material: &self.phase_function,
            u: 0.0,
            v: 0.0,
            t,
            front_face: true,
        })
    }

    fn bounding_box(&self, time0: f32, time1: f32) -> Option<Aabb> {
        self.boundary.bounding_box(time0, time1)
    }
}
