//! Sphere primitive, optionally moving for motion blur.

use crate::{
    hittable::{HitRecord, Hittable},
    Material, Ray,
};
use crate::sampling::random_to_sphere;
use lumen_math::{Aabb, Interval, Onb, Vec3};
use rand::RngCore;
use std::f32::consts::PI;

/// A sphere primitive.
///
/// The center moves linearly from `center` at time 0 to
/// `center + motion` at time 1; a static sphere has zero motion.
pub struct Sphere<M: Material> {
    center: Vec3,
    motion: Vec3,
    radius: f32,
    material: M,
}

impl<M: Material> Sphere<M> {
    /// Create a new static sphere.
    pub fn new(center: Vec3, radius: f32, material: M) -> Self {
        Self::moving(center, center, radius, material)
    }

    /// Create a sphere that travels from `center0` (time 0) to `center1` (time 1).
    pub fn moving(center0: Vec3, center1: Vec3, radius: f32, material: M) -> Self {
        Self {
            center: center0,
            motion: center1 - center0,
            radius: radius.max(0.0),
            material,
        }
    }

    /// Center position at the given time.
    #[inline]
    pub fn center_at(&self, time: f32) -> Vec3 {
        self.center + time * self.motion
    }

    /// Get the UV coordinates for a point on the unit sphere.
    fn get_sphere_uv(p: Vec3) -> (f32, f32) {
        // theta: angle down from +Y, phi: angle around Y axis from -X
        let theta = (-p.y).acos();
        let phi = (-p.z).atan2(p.x) + PI;

        (phi / (2.0 * PI), theta / PI)
    }

    fn box_at(&self, time: f32) -> Aabb {
        let rvec = Vec3::splat(self.radius);
        let center = self.center_at(time);
        Aabb::from_points(center - rvec, center + rvec)
    }

    /// Cosine of the half-angle of the cone subtended from `origin`, or
    /// `None` when `origin` is inside the sphere.
    fn cos_theta_max(&self, origin: Vec3) -> Option<f32> {
        let distance_squared = (self.center - origin).length_squared();
        let r2 = self.radius * self.radius;
        if distance_squared <= r2 {
            return None;
        }
        Some((1.0 - r2 / distance_squared).sqrt())
    }
}

impl<M: Material + 'static> Hittable for Sphere<M> {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let center = self.center_at(ray.time());
        let oc = center - ray.origin();
        let a = ray.direction().length_squared();
        let h = ray.direction().dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();

        // Find the nearest root in the acceptable range
        let mut root = (h - sqrtd) / a;
        if !ray_t.surrounds(root) {
            root = (h + sqrtd) / a;
            if !ray_t.surrounds(root) {
                return None;
            }
        }

        let outward_normal = (ray.at(root) - center) / self.radius;
        Some(HitRecord::new(
            ray,
            root,
            outward_normal,
            &self.material,
            Self::get_sphere_uv(outward_normal),
        ))
    }

    fn bounding_box(&self, time0: f32, time1: f32) -> Option<Aabb> {
        Some(Aabb::surrounding(&self.box_at(time0), &self.box_at(time1)))
    }

    /// Uniform density over the cone of directions that see the sphere.
    ///
    /// Light sampling uses the time-0 position.
    fn pdf_value(&self, origin: Vec3, direction: Vec3) -> f32 {
        let Some(cos_theta_max) = self.cos_theta_max(origin) else {
            return 0.0;
        };
        let to_center = (self.center - origin).normalize();
        if direction.normalize().dot(to_center) < cos_theta_max {
            return 0.0;
        }
        let solid_angle = 2.0 * PI * (1.0 - cos_theta_max);
        1.0 / solid_angle
    }

    fn sample_direction(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        let direction = self.center - origin;
        let uvw = Onb::from_w(direction);
        uvw.local(random_to_sphere(self.radius, direction.length_squared(), rng))
    }
}
