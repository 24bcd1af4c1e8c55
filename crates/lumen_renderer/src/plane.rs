//! Infinite plane primitive.

use crate::{
    hittable::{HitRecord, Hittable},
    Material, Ray,
};
use lumen_math::{Aabb, Interval, Vec3};

/// An unbounded plane through `point` with the given normal.
///
/// Has no bounding box, so it cannot be placed inside a BVH; keep it in a
/// [`HittableList`](crate::HittableList) next to the hierarchy instead.
pub struct Plane<M: Material> {
    normal: Vec3,
    d: f32,
    material: M,
}

impl<M: Material> Plane<M> {
    pub fn new(point: Vec3, normal: Vec3, material: M) -> Self {
        let normal = normal.normalize();
        Self {
            normal,
            d: normal.dot(point),
            material,
        }
    }
}

impl<M: Material + 'static> Hittable for Plane<M> {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let denom = self.normal.dot(ray.direction());
        if denom.abs() < 1e-8 {
            return None;
        }

        let t = (self.d - self.normal.dot(ray.origin())) / denom;
        if !ray_t.surrounds(t) {
            return None;
        }

        let p = ray.at(t);
        Some(HitRecord::new(ray, t, self.normal, &self.material, (p.x, p.z)))
    }

    fn bounding_box(&self, _time0: f32, _time1: f32) -> Option<Aabb> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Lambertian;

    #[test]
    fn test_plane_hit() {
        let plane = Plane::new(Vec3::new(0.0, -1.0, 0.0), Vec3::Y, Lambertian::new(Vec3::ONE));
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::new(0.0, -2.0, 0.0));

        let rec = plane.hit(&ray, Interval::from_min(0.001)).unwrap();
        assert!((rec.t - 0.5).abs() < 1e-6);
        assert!(rec.front_face);
    }

    #[test]
    fn test_plane_is_unbounded() {
        let plane = Plane::new(Vec3::ZERO, Vec3::Y, Lambertian::new(Vec3::ONE));
        assert!(plane.bounding_box(0.0, 1.0).is_none());
        assert!(plane
            .hit(&Ray::new_simple(Vec3::Y, Vec3::X), Interval::from_min(0.001))
            .is_none());
    }
}
