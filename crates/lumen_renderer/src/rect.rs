//! Rectangle primitive, the usual shape for area lights.

use crate::{
    hittable::{HitRecord, Hittable, HittableList},
    Material, Ray,
};
use crate::sampling::gen_f32;
use lumen_math::{Aabb, Interval, Vec3};
use rand::RngCore;
use std::sync::Arc;

/// A finite rectangle spanned by two perpendicular axes through `center`.
///
/// The outward normal is `length_axis × width_axis`.
pub struct Rect<M: Material> {
    center: Vec3,
    length_axis: Vec3,
    width_axis: Vec3,
    half_length: f32,
    half_width: f32,
    normal: Vec3,
    /// Plane offset: normal · center
    d: f32,
    material: M,
}

impl<M: Material> Rect<M> {
    /// Create a rectangle of size `length × width` centered at `center`.
    ///
    /// `length_axis` and `width_axis` must be perpendicular; they are normalized here.
    pub fn new(
        center: Vec3,
        length_axis: Vec3,
        width_axis: Vec3,
        length: f32,
        width: f32,
        material: M,
    ) -> Self {
        let length_axis = length_axis.normalize();
        let width_axis = width_axis.normalize();
        let normal = length_axis.cross(width_axis).normalize();

        Self {
            center,
            length_axis,
            width_axis,
            half_length: length / 2.0,
            half_width: width / 2.0,
            normal,
            d: normal.dot(center),
            material,
        }
    }

    pub fn area(&self) -> f32 {
        4.0 * self.half_length * self.half_width
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    fn corners(&self) -> [Vec3; 4] {
        let l = self.length_axis * self.half_length;
        let w = self.width_axis * self.half_width;
        [
            self.center - l - w,
            self.center - l + w,
            self.center + l - w,
            self.center + l + w,
        ]
    }
}

impl<M: Material + 'static> Hittable for Rect<M> {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let denom = self.normal.dot(ray.direction());
        // Parallel to the plane
        if denom.abs() < 1e-8 {
            return None;
        }

        let t = (self.d - self.normal.dot(ray.origin())) / denom;
        if !ray_t.surrounds(t) {
            return None;
        }

        let offset = ray.at(t) - self.center;
        let x = offset.dot(self.length_axis);
        let y = offset.dot(self.width_axis);
        if x.abs() >= self.half_length || y.abs() >= self.half_width {
            return None;
        }

        let uv = (
            x / (2.0 * self.half_length) + 0.5,
            y / (2.0 * self.half_width) + 0.5,
        );
        Some(HitRecord::new(ray, t, self.normal, &self.material, uv))
    }

    fn bounding_box(&self, _time0: f32, _time1: f32) -> Option<Aabb> {
        let corners = self.corners();
        let (min, max) = corners
            .iter()
            .fold((corners[0], corners[0]), |(lo, hi), &p| (lo.min(p), hi.max(p)));
        let pad = Vec3::splat(0.001);
        Some(Aabb::from_points(min - pad, max + pad))
    }

    /// Area-sampling density converted to solid angle.
    fn pdf_value(&self, origin: Vec3, direction: Vec3) -> f32 {
        let ray = Ray::new_simple(origin, direction);
        let Some(rec) = self.hit(&ray, Interval::from_min(0.001)) else {
            return 0.0;
        };

        let length = direction.length();
        let distance_squared = rec.t * rec.t * length * length;
        let cosine = (direction.dot(self.normal) / length).abs();
        if cosine <= 0.0 {
            return 0.0;
        }

        distance_squared / (cosine * self.area())
    }

    fn sample_direction(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        let a = (2.0 * gen_f32(rng) - 1.0) * self.half_length;
        let b = (2.0 * gen_f32(rng) - 1.0) * self.half_width;
        let point = self.center + a * self.length_axis + b * self.width_axis;
        point - origin
    }
}

/// Closed axis-aligned box made of six outward-facing rectangles.
pub fn axis_box<M>(a: Vec3, b: Vec3, material: M) -> HittableList
where
    M: Material + Clone + 'static,
{
    let min = a.min(b);
    let max = a.max(b);
    let size = max - min;
    let c = (min + max) * 0.5;

    // (center, length axis, width axis, length, width); length × width points outward
    let faces = [
        (Vec3::new(c.x, c.y, max.z), Vec3::X, Vec3::Y, size.x, size.y),
        (Vec3::new(c.x, c.y, min.z), Vec3::Y, Vec3::X, size.y, size.x),
        (Vec3::new(max.x, c.y, c.z), Vec3::Y, Vec3::Z, size.y, size.z),
        (Vec3::new(min.x, c.y, c.z), Vec3::Z, Vec3::Y, size.z, size.y),
        (Vec3::new(c.x, max.y, c.z), Vec3::Z, Vec3::X, size.z, size.x),
        (Vec3::new(c.x, min.y, c.z), Vec3::X, Vec3::Z, size.x, size.z),
    ];

    let mut sides = HittableList::new();
    for (center, length_axis, width_axis, length, width) in faces {
        sides.add(Arc::new(Rect::new(
            center,
            length_axis,
            width_axis,
            length,
            width,
            material.clone(),
        )));
    }
    sides
}
