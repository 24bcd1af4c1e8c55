//! Path integrator.
//!
//! Estimates the radiance carried along a camera ray by following a single
//! scattered path through the scene. Diffuse bounces draw their continuation
//! from an equal mixture of light sampling and the material's own density;
//! specular bounces follow the material's deterministic ray.
//!
//! The path is walked iteratively, carrying the product of all bounce
//! factors (`throughput`) and the radiance gathered so far, so deep paths
//! never grow the call stack.

use crate::pdf::{HittablePdf, MixturePdf, Pdf};
use crate::{Color, Hittable, Ray, ScatterRecord, Scene};
use lumen_math::Interval;
use rand::RngCore;

/// Tunables of the path estimator.
#[derive(Debug, Clone, Copy)]
pub struct IntegratorSettings {
    /// Paths whose weight is below this contribute nothing.
    ///
    /// Skipping them biases the estimate slightly darker.
    pub min_weight: f32,
    /// Offset from the surface when casting continuation rays.
    pub epsilon: f32,
    /// Sampled directions with a mixture density at or below this end the path.
    pub min_pdf: f32,
}

impl Default for IntegratorSettings {
    fn default() -> Self {
        Self {
            min_weight: 1e-3,
            epsilon: 1e-3,
            min_pdf: 1e-8,
        }
    }
}

/// Radiance estimator over a built [`Scene`].
///
/// Holds only shared references, so one integrator can be used from many
/// threads as long as each thread brings its own random generator.
pub struct Integrator<'a> {
    scene: &'a Scene,
    settings: IntegratorSettings,
}

impl<'a> Integrator<'a> {
    pub fn new(scene: &'a Scene) -> Self {
        Self::with_settings(scene, IntegratorSettings::default())
    }

    pub fn with_settings(scene: &'a Scene, settings: IntegratorSettings) -> Self {
        Self { scene, settings }
    }

    /// Radiance arriving along a camera ray.
    ///
    /// Samples may come back NaN or negative; filtering them is up to the
    /// caller.
    pub fn trace(
        &self,
        ray: &Ray,
        max_depth: u32,
        initial_weight: f32,
        rng: &mut dyn RngCore,
    ) -> Color {
        self.trace_path(ray, max_depth, initial_weight, true, rng)
    }

    /// Radiance arriving along `ray`, which may start mid-path.
    ///
    /// When `is_primary` is set, an emitter hit by the first segment is seen
    /// directly and returns its raw emission instead of its illumination.
    pub fn trace_path(
        &self,
        ray: &Ray,
        max_depth: u32,
        weight: f32,
        is_primary: bool,
        rng: &mut dyn RngCore,
    ) -> Color {
        let mut radiance = Color::ZERO;
        if weight < self.settings.min_weight {
            return radiance;
        }

        let mut throughput = Color::ONE;
        let mut ray = *ray;
        let mut direct_view = is_primary;

        for _ in 0..max_depth {
            let Some(rec) = self
                .scene
                .world
                .hit(&ray, Interval::from_min(self.settings.epsilon))
            else {
                radiance += throughput * self.scene.background;
                break;
            };

            let Some(srec) = rec.material.scatter(&ray, &rec, rng) else {
                radiance += throughput * rec.material.emitted(&rec, direct_view);
                break;
            };

            radiance += throughput * rec.material.emitted(&rec, false);

            match srec {
                ScatterRecord::Specular {
                    ray: specular,
                    attenuation,
                } => {
                    throughput *= attenuation;
                    ray = specular;
                }
                ScatterRecord::Diffuse { attenuation, pdf } => {
                    // Without lights the mixture would send half the samples nowhere.
                    let (direction, pdf_value) = if self.scene.lights.is_empty() {
                        let direction = pdf.generate(rng);
                        (direction, pdf.value(direction))
                    } else {
                        let mixture =
                            MixturePdf::new(HittablePdf::new(&self.scene.lights, rec.p), pdf);
                        let direction = mixture.generate(rng);
                        (direction, mixture.value(direction))
                    };

                    if !pdf_value.is_finite() || pdf_value <= self.settings.min_pdf {
                        break;
                    }

                    let scattered = Ray::new(rec.p, direction, ray.time());
                    let scattering_pdf = rec.material.scattering_pdf(&ray, &rec, &scattered);
                    throughput *= attenuation * scattering_pdf / pdf_value;
                    ray = scattered;
                }
            }

            direct_view = false;
        }

        radiance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DiffuseLight, HittableList, Lambertian, Metal, Rect, Sphere, Vec3};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    const EMIT: Color = Color::new(4.0, 4.0, 4.0);

    /// A 1x1 light at y = 2 facing down over a 10x10 gray floor at y = 0.
    fn light_over_floor(illumination: f32) -> Scene {
        let light: Arc<dyn Hittable> = Arc::new(Rect::new(
            Vec3::new(0.0, 2.0, 0.0),
            Vec3::X,
            Vec3::Z,
            1.0,
            1.0,
            DiffuseLight::with_illumination(EMIT, illumination),
        ));
        let floor: Arc<dyn Hittable> = Arc::new(Rect::new(
            Vec3::ZERO,
            Vec3::Z,
            Vec3::X,
            10.0,
            10.0,
            Lambertian::new(Color::splat(0.4)),
        ));

        let mut lights = HittableList::new();
        lights.add(Arc::clone(&light));

        let mut rng = StdRng::seed_from_u64(0);
        Scene::build(vec![light, floor], lights, Color::ZERO, 0.0, 1.0, &mut rng).unwrap()
    }

    #[test]
    fn test_direct_view_of_light_is_raw_emission() {
        let scene = light_over_floor(0.5);
        let integrator = Integrator::new(&scene);
        let mut rng = StdRng::seed_from_u64(1);

        let ray = Ray::new_simple(Vec3::new(0.0, 1.0, 0.0), Vec3::Y);
        assert_eq!(integrator.trace(&ray, 20, 1.0, &mut rng), EMIT);
        assert_eq!(integrator.trace(&ray, 1, 1.0, &mut rng), EMIT);
    }

    #[test]
    fn test_indirect_view_of_light_uses_illumination() {
        let scene = light_over_floor(0.5);
        let integrator = Integrator::new(&scene);
        let mut rng = StdRng::seed_from_u64(2);

        let ray = Ray::new_simple(Vec3::new(0.0, 1.0, 0.0), Vec3::Y);
        let color = integrator.trace_path(&ray, 20, 1.0, false, &mut rng);
        assert_eq!(color, EMIT * 0.5);
    }

    #[test]
    fn test_floor_is_dimmer_than_light() {
        let scene = light_over_floor(1.0);
        let integrator = Integrator::new(&scene);
        let mut rng = StdRng::seed_from_u64(3);

        let ray = Ray::new_simple(Vec3::new(0.0, 1.0, 0.0), -Vec3::Y);
        let mut total = Color::ZERO;
        for _ in 0..256 {
            let color = integrator.trace(&ray, 20, 1.0, &mut rng);
            assert!(color.cmpge(Color::ZERO).all(), "negative sample {color:?}");
            assert!(color.cmplt(EMIT).all(), "sample {color:?} not below emission");
            total += color;
        }
        assert!(total.x > 0.0, "floor below a light should receive some light");
    }

    #[test]
    fn test_weight_below_threshold_is_zero() {
        let scene = light_over_floor(1.0);
        let integrator = Integrator::new(&scene);
        let mut rng = StdRng::seed_from_u64(4);

        for direction in [Vec3::Y, -Vec3::Y, Vec3::X] {
            let ray = Ray::new_simple(Vec3::new(0.0, 1.0, 0.0), direction);
            for depth in [0, 1, 50] {
                assert_eq!(integrator.trace(&ray, depth, 1e-4, &mut rng), Color::ZERO);
            }
        }
    }

    #[test]
    fn test_zero_depth_and_background() {
        let mut scene = light_over_floor(1.0);
        scene.background = Color::new(0.1, 0.2, 0.3);
        let integrator = Integrator::new(&scene);
        let mut rng = StdRng::seed_from_u64(5);

        let escaping = Ray::new_simple(Vec3::new(0.0, 1.0, 0.0), Vec3::X);
        assert_eq!(integrator.trace(&escaping, 0, 1.0, &mut rng), Color::ZERO);
        assert_eq!(integrator.trace(&escaping, 5, 1.0, &mut rng), scene.background);
    }

    #[test]
    fn test_specular_bounce_attenuates() {
        let light: Arc<dyn Hittable> = Arc::new(Sphere::new(
            Vec3::new(0.0, 5.0, 0.0),
            1.0,
            DiffuseLight::with_illumination(EMIT, 0.5),
        ));
        let mirror: Arc<dyn Hittable> = Arc::new(Rect::new(
            Vec3::ZERO,
            Vec3::Z,
            Vec3::X,
            4.0,
            4.0,
            Metal::new(Color::splat(0.5), 0.0),
        ));
        let mut lights = HittableList::new();
        lights.add(Arc::clone(&light));

        let mut rng = StdRng::seed_from_u64(6);
        let scene =
            Scene::build(vec![light, mirror], lights, Color::ZERO, 0.0, 1.0, &mut rng).unwrap();
        let integrator = Integrator::new(&scene);

        // Straight down onto the mirror, straight back up into the light.
        let ray = Ray::new_simple(Vec3::new(0.0, 2.0, 0.0), -Vec3::Y);
        let color = integrator.trace(&ray, 10, 1.0, &mut rng);
        assert!((color - EMIT * 0.5 * 0.5).length() < 1e-5, "got {color:?}");
    }

    #[test]
    fn test_diffuse_without_lights_uses_material_density() {
        let floor: Arc<dyn Hittable> = Arc::new(Rect::new(
            Vec3::ZERO,
            Vec3::Z,
            Vec3::X,
            10.0,
            10.0,
            Lambertian::new(Color::splat(0.5)),
        ));
        let mut rng = StdRng::seed_from_u64(7);
        let scene =
            Scene::build(vec![floor], HittableList::new(), Color::ONE, 0.0, 1.0, &mut rng).unwrap();
        let integrator = Integrator::new(&scene);

        // Under a white sky the cosine-sampled estimate is exactly albedo.
        let ray = Ray::new_simple(Vec3::new(0.0, 1.0, 0.0), -Vec3::Y);
        for _ in 0..32 {
            let color = integrator.trace(&ray, 5, 1.0, &mut rng);
            assert!((color - Color::splat(0.5)).length() < 1e-3, "got {color:?}");
        }
    }

    /// Gray floor under a uniform white sky, with one light as bright as the sky.
    fn furnace(light: Arc<dyn Hittable>) -> Scene {
        let floor: Arc<dyn Hittable> = Arc::new(Rect::new(
            Vec3::ZERO,
            Vec3::Z,
            Vec3::X,
            10.0,
            10.0,
            Lambertian::new(Color::splat(0.5)),
        ));
        let mut lights = HittableList::new();
        lights.add(Arc::clone(&light));

        let mut rng = StdRng::seed_from_u64(8);
        Scene::build(vec![light, floor], lights, Color::ONE, 0.0, 1.0, &mut rng).unwrap()
    }

    fn mean_floor_radiance(scene: &Scene, samples: u32, seed: u64) -> f32 {
        let integrator = Integrator::new(scene);
        let mut rng = StdRng::seed_from_u64(seed);
        let ray = Ray::new_simple(Vec3::new(0.0, 1.0, 0.0), -Vec3::Y);

        let total: f32 = (0..samples)
            .map(|_| integrator.trace(&ray, 5, 1.0, &mut rng).x)
            .sum();
        total / samples as f32
    }

    // Whatever the mixture picks, the floor must come out at its albedo.
    #[test]
    fn test_furnace_with_sphere_light() {
        let light: Arc<dyn Hittable> = Arc::new(Sphere::new(
            Vec3::new(0.0, 3.0, 0.0),
            0.5,
            DiffuseLight::new(Color::ONE),
        ));
        let mean = mean_floor_radiance(&furnace(light), 40_000, 11);
        assert!((mean - 0.5).abs() < 0.01, "furnace mean {mean}");
    }

    #[test]
    fn test_furnace_with_rect_light() {
        let light: Arc<dyn Hittable> = Arc::new(Rect::new(
            Vec3::new(0.0, 2.0, 0.0),
            Vec3::X,
            Vec3::Z,
            1.0,
            1.0,
            DiffuseLight::new(Color::ONE),
        ));
        let mean = mean_floor_radiance(&furnace(light), 40_000, 12);
        assert!((mean - 0.5).abs() < 0.01, "furnace mean {mean}");
    }

    #[test]
    fn test_custom_weight_cutoff() {
        let scene = light_over_floor(1.0);
        let settings = IntegratorSettings {
            min_weight: 0.5,
            ..Default::default()
        };
        let integrator = Integrator::with_settings(&scene, settings);
        let mut rng = StdRng::seed_from_u64(9);

        let ray = Ray::new_simple(Vec3::new(0.0, 1.0, 0.0), Vec3::Y);
        assert_eq!(integrator.trace(&ray, 10, 0.4, &mut rng), Color::ZERO);
        assert_eq!(integrator.trace(&ray, 10, 0.6, &mut rng), EMIT);
    }
}
