//! Instanced placement of a hittable: scale, rotation and translation.

use crate::hittable::{HitRecord, Hittable};
use crate::Ray;
use lumen_math::{Aabb, Interval, Mat4, Vec3};
use rand::RngCore;
use std::sync::Arc;

/// A hittable seen through an affine transform.
///
/// Rays are carried into object space with the inverse matrix and are not
/// renormalized, so the hit parameter `t` is the same in both spaces.
/// Normals come back through the inverse transpose.
///
/// Light sampling delegates to the wrapped object and is exact for rigid
/// motions only. A scaled light reports the density of its unscaled shape.
pub struct Transform {
    object: Arc<dyn Hittable>,
    matrix: Mat4,
    inverse: Mat4,
    normal_matrix: Mat4,
}

impl Transform {
    /// Wrap `object` with an arbitrary invertible matrix.
    pub fn new(object: Arc<dyn Hittable>, matrix: Mat4) -> Self {
        let inverse = matrix.inverse();
        Self {
            object,
            matrix,
            inverse,
            normal_matrix: inverse.transpose(),
        }
    }

    /// Scale first, then rotate about X, Y and Z (degrees), then translate.
    pub fn from_parts(
        object: Arc<dyn Hittable>,
        scale: Vec3,
        rotate_degrees: Vec3,
        translate: Vec3,
    ) -> Self {
        let matrix = Mat4::from_translation(translate)
            * Mat4::from_rotation_x(rotate_degrees.x.to_radians())
            * Mat4::from_rotation_y(rotate_degrees.y.to_radians())
            * Mat4::from_rotation_z(rotate_degrees.z.to_radians())
            * Mat4::from_scale(scale);
        Self::new(object, matrix)
    }

    pub fn translated(object: Arc<dyn Hittable>, offset: Vec3) -> Self {
        Self::new(object, Mat4::from_translation(offset))
    }

    /// Turn about the Y axis, then move by `offset`.
    pub fn rotated_y(object: Arc<dyn Hittable>, degrees: f32, offset: Vec3) -> Self {
        Self::from_parts(object, Vec3::ONE, Vec3::new(0.0, degrees, 0.0), offset)
    }

    pub fn matrix(&self) -> Mat4 {
        self.matrix
    }

    fn to_object(&self, ray: &Ray) -> Ray {
        Ray::new(
            self.inverse.transform_point3(ray.origin()),
            self.inverse.transform_vector3(ray.direction()),
            ray.time(),
        )
    }
}

impl Hittable for Transform {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let mut rec = self.object.hit(&self.to_object(ray), ray_t)?;

        // n . d is unchanged by the pair (inverse transpose, matrix), so the
        // facing decided in object space still holds.
        rec.p = ray.at(rec.t);
        rec.normal = self.normal_matrix.transform_vector3(rec.normal).normalize();
        Some(rec)
    }

    fn bounding_box(&self, time0: f32, time1: f32) -> Option<Aabb> {
        let bbox = self.object.bounding_box(time0, time1)?;
        let (lo, hi) = (bbox.min(), bbox.max());

        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for corner in 0..8 {
            let local = Vec3::new(
                if corner & 1 == 0 { lo.x } else { hi.x },
                if corner & 2 == 0 { lo.y } else { hi.y },
                if corner & 4 == 0 { lo.z } else { hi.z },
            );
            let world = self.matrix.transform_point3(local);
            min = min.min(world);
            max = max.max(world);
        }
        Some(Aabb::from_points(min, max))
    }

    fn pdf_value(&self, origin: Vec3, direction: Vec3) -> f32 {
        self.object.pdf_value(
            self.inverse.transform_point3(origin),
            self.inverse.transform_vector3(direction),
        )
    }

    fn sample_direction(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        let local = self
            .object
            .sample_direction(self.inverse.transform_point3(origin), rng);
        self.matrix.transform_vector3(local)
    }
}
