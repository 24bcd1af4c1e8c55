use crate::{axis_component, Interval, Ray, Vec3};

/// Axis-Aligned Bounding Box for the BVH.
///
/// Stored as one interval per axis; `min()`/`max()` give the two corners.
/// Outside of transient states (like [`Aabb::EMPTY`] used as a fold seed)
/// every axis satisfies `min <= max`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub x: Interval,
    pub y: Interval,
    pub z: Interval,
}

impl Aabb {
    pub const EMPTY: Aabb = Aabb {
        x: Interval::EMPTY,
        y: Interval::EMPTY,
        z: Interval::EMPTY,
    };

    pub const UNIVERSE: Aabb = Aabb {
        x: Interval::UNIVERSE,
        y: Interval::UNIVERSE,
        z: Interval::UNIVERSE,
    };

    /// Create a new AABB from three intervals.
    pub fn new(x: Interval, y: Interval, z: Interval) -> Self {
        Self { x, y, z }
    }

    /// Create an AABB from two opposite corners, in any order.
    ///
    /// Flat axes are padded slightly so the box never has zero thickness.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        let mut aabb = Self {
            x: Interval::new(a.x.min(b.x), a.x.max(b.x)),
            y: Interval::new(a.y.min(b.y), a.y.max(b.y)),
            z: Interval::new(a.z.min(b.z), a.z.max(b.z)),
        };
        aabb.pad_to_minimums();
        aabb
    }

    /// Per-axis min of minimums and max of maximums.
    pub fn surrounding(box0: &Aabb, box1: &Aabb) -> Self {
        Self {
            x: Interval::surrounding(&box0.x, &box1.x),
            y: Interval::surrounding(&box0.y, &box1.y),
            z: Interval::surrounding(&box0.z, &box1.z),
        }
    }

    /// Get the interval for a specific axis (0=X, 1=Y, 2=Z).
    pub fn axis_interval(&self, n: usize) -> Interval {
        match n {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    /// Minimum corner.
    pub fn min(&self) -> Vec3 {
        Vec3::new(self.x.min, self.y.min, self.z.min)
    }

    /// Maximum corner.
    pub fn max(&self) -> Vec3 {
        Vec3::new(self.x.max, self.y.max, self.z.max)
    }

    /// Slab test that narrows `ray_t` to the part of the ray inside the box.
    ///
    /// Returns the narrowed interval, or `None` as soon as it becomes empty.
    /// A zero direction component divides to +/- infinity, so that axis
    /// degrades to always-pass or always-fail. When the origin also lies
    /// exactly on a slab plane the 0/0 NaN is discarded by `f32::min`/`max`
    /// and the ray is rejected.
    pub fn clip(&self, r: &Ray, mut ray_t: Interval) -> Option<Interval> {
        let origin = r.origin();
        let direction = r.direction();

        for axis in 0..3 {
            let slab = self.axis_interval(axis);
            let o = axis_component(origin, axis);
            let d = axis_component(direction, axis);

            let ta = (slab.min - o) / d;
            let tb = (slab.max - o) / d;
            let t0 = ta.min(tb);
            let t1 = ta.max(tb);

            ray_t.min = t0.max(ray_t.min);
            ray_t.max = t1.min(ray_t.max);
            if ray_t.max <= ray_t.min {
                return None;
            }
        }

        Some(ray_t)
    }

    /// Test if a ray intersects this AABB within the given interval.
    #[inline]
    pub fn hit(&self, r: &Ray, ray_t: Interval) -> bool {
        self.clip(r, ray_t).is_some()
    }

    /// Total surface area of the six faces.
    pub fn surface_area(&self) -> f32 {
        let a = self.x.size();
        let b = self.y.size();
        let c = self.z.size();
        2.0 * (a * b + b * c + c * a)
    }

    /// Returns the index (0=X, 1=Y, 2=Z) of the axis with the longest extent.
    ///
    /// Ties resolve toward the later axis.
    pub fn longest_axis(&self) -> usize {
        let x_size = self.x.size();
        let y_size = self.y.size();
        let z_size = self.z.size();

        if x_size > y_size && x_size > z_size {
            0
        } else if y_size > z_size {
            1
        } else {
            2
        }
    }

    /// True when `other` lies entirely inside this box.
    pub fn contains_box(&self, other: &Aabb) -> bool {
        self.x.encloses(&other.x) && self.y.encloses(&other.y) && self.z.encloses(&other.z)
    }

    fn pad_to_minimums(&mut self) {
        let delta = 0.0001;
        if self.x.size() < delta {
            self.x = self.x.expand(delta);
        }
        if self.y.size() < delta {
            self.y = self.y.expand(delta);
        }
        if self.z.size() < delta {
            self.z = self.z.expand(delta);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> Aabb {
        Aabb::from_points(Vec3::splat(-1.0), Vec3::splat(1.0))
    }

    #[test]
    fn test_aabb_from_points_any_order() {
        let aabb = Aabb::from_points(Vec3::new(10.0, 0.0, 10.0), Vec3::new(0.0, 10.0, 0.0));

        assert_eq!(aabb.min(), Vec3::ZERO);
        assert_eq!(aabb.max(), Vec3::splat(10.0));
    }

    #[test]
    fn test_aabb_flat_axis_is_padded() {
        let aabb = Aabb::from_points(Vec3::ZERO, Vec3::new(1.0, 0.0, 1.0));
        assert!(aabb.y.size() > 0.0);
        assert!(aabb.y.min < 0.0 && aabb.y.max > 0.0);
    }

    #[test]
    fn test_surrounding_is_smallest_enclosing_box() {
        let a = Aabb::from_points(Vec3::ZERO, Vec3::new(5.0, 1.0, 2.0));
        let b = Aabb::from_points(Vec3::new(3.0, -2.0, 1.0), Vec3::new(10.0, 0.5, 1.5));
        let s = Aabb::surrounding(&a, &b);

        assert!(s.contains_box(&a));
        assert!(s.contains_box(&b));
        // Every face of s touches one of the inputs.
        assert_eq!(s.min(), a.min().min(b.min()));
        assert_eq!(s.max(), a.max().max(b.max()));
    }

    #[test]
    fn test_aabb_hit() {
        let aabb = unit_box();

        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z, 0.0);
        assert!(aabb.hit(&ray, Interval::new(0.0, 100.0)));

        let away = Ray::new(Vec3::new(0.0, 0.0, -5.0), -Vec3::Z, 0.0);
        assert!(!aabb.hit(&away, Interval::new(0.0, 100.0)));

        let miss = Ray::new(Vec3::new(10.0, 0.0, 0.0), Vec3::Z, 0.0);
        assert!(!aabb.hit(&miss, Interval::new(0.0, 100.0)));
    }

    #[test]
    fn test_clip_narrows_both_ends() {
        let aabb = unit_box();
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z, 0.0);

        let clipped = aabb.clip(&ray, Interval::new(0.0, 100.0)).unwrap();
        assert!((clipped.min - 4.0).abs() < 1e-5);
        assert!((clipped.max - 6.0).abs() < 1e-5);

        // A tighter caller bound is respected.
        assert!(aabb.clip(&ray, Interval::new(0.0, 3.5)).is_none());
    }

    #[test]
    fn test_origin_inside_box_spans_zero() {
        let aabb = unit_box();
        let directions = [
            Vec3::new(0.3, -0.7, 0.2),
            Vec3::new(-1.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 2.0),
            Vec3::new(1.0, 1.0, 1.0),
        ];
        for dir in directions {
            let ray = Ray::new(Vec3::new(0.1, 0.2, -0.3), dir, 0.0);
            let clipped = aabb.clip(&ray, Interval::UNIVERSE).unwrap();
            assert!(clipped.min <= 0.0, "entry {} should be behind origin", clipped.min);
            assert!(clipped.max >= 0.0, "exit {} should be ahead of origin", clipped.max);
        }
    }

    #[test]
    fn test_parallel_ray_degrades_to_pass_or_fail() {
        let aabb = unit_box();

        // Parallel to the X slabs and inside them: passes on that axis.
        let inside = Ray::new(Vec3::new(0.5, 0.0, -5.0), Vec3::Z, 0.0);
        assert!(aabb.hit(&inside, Interval::new(0.0, 100.0)));

        // Parallel to the X slabs but outside them: always fails.
        let outside = Ray::new(Vec3::new(2.0, 0.0, -5.0), Vec3::Z, 0.0);
        assert!(!aabb.hit(&outside, Interval::new(0.0, 100.0)));

        // Origin exactly on a slab plane: the NaN from 0/0 is dropped and the
        // remaining infinity rejects the ray instead of poisoning the interval.
        let on_plane = Ray::new(Vec3::new(1.0, 0.0, -5.0), Vec3::Z, 0.0);
        assert!(aabb.clip(&on_plane, Interval::new(0.0, 100.0)).is_none());
    }

    #[test]
    fn test_surface_area() {
        let aabb = Aabb::new(
            Interval::new(0.0, 1.0),
            Interval::new(0.0, 2.0),
            Interval::new(0.0, 3.0),
        );
        assert_eq!(aabb.surface_area(), 22.0);
    }

    #[test]
    fn test_aabb_longest_axis() {
        let aabb_x = Aabb::from_points(Vec3::ZERO, Vec3::new(10.0, 1.0, 1.0));
        assert_eq!(aabb_x.longest_axis(), 0);

        let aabb_y = Aabb::from_points(Vec3::ZERO, Vec3::new(1.0, 10.0, 1.0));
        assert_eq!(aabb_y.longest_axis(), 1);

        let aabb_z = Aabb::from_points(Vec3::ZERO, Vec3::new(1.0, 1.0, 10.0));
        assert_eq!(aabb_z.longest_axis(), 2);
    }

    #[test]
    fn test_longest_axis_ties_prefer_later_axis() {
        let xy = Aabb::from_points(Vec3::ZERO, Vec3::new(4.0, 4.0, 1.0));
        assert_eq!(xy.longest_axis(), 1);

        let xz = Aabb::from_points(Vec3::ZERO, Vec3::new(4.0, 1.0, 4.0));
        assert_eq!(xz.longest_axis(), 2);

        let cube = Aabb::from_points(Vec3::ZERO, Vec3::splat(2.0));
        assert_eq!(cube.longest_axis(), 2);
    }
}
