//! Material trait for surface scattering.

use crate::pdf::{CosinePdf, MaterialPdf, SpherePdf};
use crate::sampling::{gen_f32, random_in_unit_sphere, reflect, refract};
use crate::{hittable::HitRecord, Ray};
use lumen_math::Vec3;
use rand::RngCore;
use std::f32::consts::PI;

/// Color type alias (linear RGB)
pub type Color = Vec3;

/// Outcome of a material's scatter decision.
#[derive(Debug, Clone, Copy)]
pub enum ScatterRecord {
    /// Mirror or refractive continuation; no continuous density exists.
    Specular { ray: Ray, attenuation: Color },
    /// General scattering described by a direction density.
    Diffuse { attenuation: Color, pdf: MaterialPdf },
}

/// Trait for materials that describe how light interacts with surfaces.
pub trait Material: Send + Sync {
    /// Decide how an incoming ray continues, or `None` if it is absorbed
    /// (pure emitters never scatter).
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterRecord>;

    /// Closed-form density of scattering from `ray_in` into `scattered`.
    ///
    /// Only meaningful for materials that return [`ScatterRecord::Diffuse`].
    fn scattering_pdf(&self, _ray_in: &Ray, _rec: &HitRecord, _scattered: &Ray) -> f32 {
        0.0
    }

    /// Light emitted at the hit point.
    ///
    /// `direct_view` is set for the first surface seen from the camera, so
    /// lights can show their raw color there and their illumination-scaled
    /// radiance everywhere else. Most materials return black.
    fn emitted(&self, _rec: &HitRecord, _direct_view: bool) -> Color {
        Color::ZERO
    }
}

/// Lambertian (diffuse) material.
#[derive(Debug, Clone)]
pub struct Lambertian {
    albedo: Color,
}

impl Lambertian {
    /// Create a new Lambertian material with the given albedo color.
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }
}

impl Material for Lambertian {
    fn scatter(
        &self,
        _ray_in: &Ray,
        rec: &HitRecord,
        _rng: &mut dyn RngCore,
    ) -> Option<ScatterRecord> {
        Some(ScatterRecord::Diffuse {
            attenuation: self.albedo,
            pdf: MaterialPdf::Cosine(CosinePdf::new(rec.normal)),
        })
    }

    fn scattering_pdf(&self, _ray_in: &Ray, rec: &HitRecord, scattered: &Ray) -> f32 {
        let cosine = rec.normal.dot(scattered.unit_direction());
        if cosine < 0.0 {
            0.0
        } else {
            cosine / PI
        }
    }
}

/// Metal (specular) material.
#[derive(Debug, Clone)]
pub struct Metal {
    albedo: Color,
    fuzz: f32,
}

impl Metal {
    /// Create a new Metal material.
    ///
    /// - `albedo`: The color of the metal
    /// - `fuzz`: Roughness, 0.0 = perfect mirror, 1.0 = very rough
    pub fn new(albedo: Color, fuzz: f32) -> Self {
        Self {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }
}

impl Material for Metal {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterRecord> {
        let reflected = reflect(ray_in.unit_direction(), rec.normal);
        let direction = reflected + self.fuzz * random_in_unit_sphere(rng);

        // Fuzz pushed the reflection below the surface: absorb.
        if direction.dot(rec.normal) <= 0.0 {
            return None;
        }

        Some(ScatterRecord::Specular {
            ray: Ray::new(rec.p, direction, ray_in.time()),
            attenuation: self.albedo,
        })
    }
}

/// Dielectric (glass) material.
#[derive(Debug, Clone)]
pub struct Dielectric {
    /// Index of refraction
    ior: f32,
}

impl Dielectric {
    /// - `ior`: Index of refraction (1.0 = air, 1.5 = glass, 2.4 = diamond)
    pub fn new(ior: f32) -> Self {
        Self { ior }
    }

    /// Schlick's approximation for reflectance
    fn reflectance(cosine: f32, ior: f32) -> f32 {
        let r0 = ((1.0 - ior) / (1.0 + ior)).powi(2);
        r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
    }
}

impl Material for Dielectric {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterRecord> {
        let refraction_ratio = if rec.front_face { 1.0 / self.ior } else { self.ior };

        let unit_direction = ray_in.unit_direction();
        let cos_theta = (-unit_direction).dot(rec.normal).min(1.0);
        let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

        let cannot_refract = refraction_ratio * sin_theta > 1.0;
        let direction =
            if cannot_refract || Self::reflectance(cos_theta, refraction_ratio) > gen_f32(rng) {
                reflect(unit_direction, rec.normal)
            } else {
                refract(unit_direction, rec.normal, refraction_ratio)
            };

        Some(ScatterRecord::Specular {
            ray: Ray::new(rec.p, direction, ray_in.time()),
            attenuation: Color::ONE,
        })
    }
}

/// Diffuse light emitter.
#[derive(Debug, Clone)]
pub struct DiffuseLight {
    emit: Color,
    /// Scale applied when the light is reached by a bounced path
    illumination: f32,
}

impl DiffuseLight {
    pub fn new(emit: Color) -> Self {
        Self::with_illumination(emit, 1.0)
    }

    pub fn with_illumination(emit: Color, illumination: f32) -> Self {
        Self { emit, illumination }
    }
}

impl Material for DiffuseLight {
    fn scatter(
        &self,
        _ray_in: &Ray,
        _rec: &HitRecord,
        _rng: &mut dyn RngCore,
    ) -> Option<ScatterRecord> {
        None
    }

    fn emitted(&self, _rec: &HitRecord, direct_view: bool) -> Color {
        if direct_view {
            self.emit
        } else {
            self.emit * self.illumination
        }
    }
}

/// Phase function of participating media: scatters uniformly in all directions.
#[derive(Debug, Clone)]
pub struct Isotropic {
    albedo: Color,
}

impl Isotropic {
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }
}

impl Material for Isotropic {
    fn scatter(
        &self,
        _ray_in: &Ray,
        _rec: &HitRecord,
        _rng: &mut dyn RngCore,
    ) -> Option<ScatterRecord> {
        Some(ScatterRecord::Diffuse {
            attenuation: self.albedo,
            pdf: MaterialPdf::Sphere(SpherePdf),
        })
    }

    fn scattering_pdf(&self, _ray_in: &Ray, _rec: &HitRecord, _scattered: &Ray) -> f32 {
        1.0 / (4.0 * PI)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::Pdf;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn record<'a>(material: &'a dyn Material, ray: &Ray) -> HitRecord<'a> {
        HitRecord::new(ray, 1.0, Vec3::Y, material, (0.5, 0.5))
    }

    #[test]
    fn test_lambertian_is_diffuse_with_cosine_pdf() {
        let mat = Lambertian::new(Color::new(0.2, 0.4, 0.6));
        let ray = Ray::new_simple(Vec3::new(0.0, 1.0, 0.0), -Vec3::Y);
        let rec = record(&mat, &ray);
        let mut rng = StdRng::seed_from_u64(1);

        match mat.scatter(&ray, &rec, &mut rng) {
            Some(ScatterRecord::Diffuse { attenuation, pdf }) => {
                assert_eq!(attenuation, Color::new(0.2, 0.4, 0.6));
                assert!((pdf.value(Vec3::Y) - 1.0 / PI).abs() < 1e-6);
            }
            other => panic!("expected diffuse scatter, got {:?}", other),
        }

        let up = Ray::new_simple(rec.p, Vec3::Y);
        let down = Ray::new_simple(rec.p, -Vec3::Y);
        assert!((mat.scattering_pdf(&ray, &rec, &up) - 1.0 / PI).abs() < 1e-6);
        assert_eq!(mat.scattering_pdf(&ray, &rec, &down), 0.0);
    }

    #[test]
    fn test_mirror_metal_is_specular_reflection() {
        let mat = Metal::new(Color::splat(0.9), 0.0);
        let ray = Ray::new_simple(Vec3::new(-1.0, 1.0, 0.0), Vec3::new(1.0, -1.0, 0.0));
        let rec = record(&mat, &ray);
        let mut rng = StdRng::seed_from_u64(2);

        match mat.scatter(&ray, &rec, &mut rng) {
            Some(ScatterRecord::Specular { ray: out, attenuation }) => {
                assert_eq!(attenuation, Color::splat(0.9));
                let expected = Vec3::new(1.0, 1.0, 0.0).normalize();
                assert!((out.direction() - expected).length() < 1e-5);
            }
            other => panic!("expected specular scatter, got {:?}", other),
        }
    }

    #[test]
    fn test_dielectric_always_scatters_specular() {
        let mat = Dielectric::new(1.5);
        let ray = Ray::new_simple(Vec3::new(0.3, 1.0, 0.0), Vec3::new(-0.3, -1.0, 0.0));
        let rec = record(&mat, &ray);
        let mut rng = StdRng::seed_from_u64(3);

        for _ in 0..100 {
            assert!(matches!(
                mat.scatter(&ray, &rec, &mut rng),
                Some(ScatterRecord::Specular { attenuation, .. }) if attenuation == Color::ONE
            ));
        }
    }

    #[test]
    fn test_diffuse_light_emission() {
        let mat = DiffuseLight::with_illumination(Color::new(4.0, 3.0, 2.0), 0.5);
        let ray = Ray::new_simple(Vec3::new(0.0, 1.0, 0.0), -Vec3::Y);
        let rec = record(&mat, &ray);
        let mut rng = StdRng::seed_from_u64(4);

        assert!(mat.scatter(&ray, &rec, &mut rng).is_none());
        assert_eq!(mat.emitted(&rec, true), Color::new(4.0, 3.0, 2.0));
        assert_eq!(mat.emitted(&rec, false), Color::new(2.0, 1.5, 1.0));
    }

    #[test]
    fn test_non_emissive_materials_are_black() {
        let mat = Lambertian::new(Color::ONE);
        let ray = Ray::new_simple(Vec3::new(0.0, 1.0, 0.0), -Vec3::Y);
        let rec = record(&mat, &ray);
        assert_eq!(mat.emitted(&rec, true), Color::ZERO);
    }

    #[test]
    fn test_isotropic_uses_uniform_sphere() {
        let mat = Isotropic::new(Color::splat(0.7));
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::X);
        let rec = record(&mat, &ray);
        let mut rng = StdRng::seed_from_u64(5);

        match mat.scatter(&ray, &rec, &mut rng) {
            Some(ScatterRecord::Diffuse { pdf: MaterialPdf::Sphere(_), .. }) => {}
            other => panic!("expected uniform sphere scatter, got {:?}", other),
        }
        let any = Ray::new_simple(rec.p, Vec3::new(0.3, -0.2, 0.9));
        assert_eq!(mat.scattering_pdf(&ray, &rec, &any), 1.0 / (4.0 * PI));
    }
}
