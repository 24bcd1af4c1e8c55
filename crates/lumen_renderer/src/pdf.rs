//! Probability densities over directions.
//!
//! Each density can be evaluated at a direction and sampled. The integrator
//! combines a light-driven density with the material's own density through
//! [`MixturePdf`], which gives multiple-importance-style variance reduction
//! without explicit MIS weights.

use crate::sampling::{gen_f32, random_cosine_direction, random_unit_vector};
use crate::Hittable;
use lumen_math::{Onb, Vec3};
use rand::RngCore;
use std::f32::consts::PI;

/// A sampleable distribution over unit directions.
///
/// `value` integrates to 1 over the sphere and `generate` draws directions
/// distributed accordingly. Generated directions are not required to be
/// unit length; `value` accepts any non-zero vector.
pub trait Pdf {
    fn value(&self, direction: Vec3) -> f32;

    fn generate(&self, rng: &mut dyn RngCore) -> Vec3;
}

/// Cosine-weighted hemisphere around a normal.
#[derive(Debug, Clone, Copy)]
pub struct CosinePdf {
    uvw: Onb,
}

impl CosinePdf {
    pub fn new(normal: Vec3) -> Self {
        Self {
            uvw: Onb::from_w(normal),
        }
    }
}

impl Pdf for CosinePdf {
    fn value(&self, direction: Vec3) -> f32 {
        let cosine = direction.normalize().dot(self.uvw.w());
        if cosine <= 0.0 {
            0.0
        } else {
            cosine / PI
        }
    }

    fn generate(&self, rng: &mut dyn RngCore) -> Vec3 {
        self.uvw.local(random_cosine_direction(rng))
    }
}

/// Uniform density over the whole sphere of directions.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpherePdf;

impl Pdf for SpherePdf {
    fn value(&self, _direction: Vec3) -> f32 {
        1.0 / (4.0 * PI)
    }

    fn generate(&self, rng: &mut dyn RngCore) -> Vec3 {
        random_unit_vector(rng)
    }
}

/// Density of directions toward a set of light-emitting objects.
///
/// Both operations delegate to the objects' own solid-angle sampling.
pub struct HittablePdf<'a> {
    objects: &'a dyn Hittable,
    origin: Vec3,
}

impl<'a> HittablePdf<'a> {
    pub fn new(objects: &'a dyn Hittable, origin: Vec3) -> Self {
        Self { objects, origin }
    }
}

impl Pdf for HittablePdf<'_> {
    fn value(&self, direction: Vec3) -> f32 {
        self.objects.pdf_value(self.origin, direction)
    }

    fn generate(&self, rng: &mut dyn RngCore) -> Vec3 {
        self.objects.sample_direction(self.origin, rng)
    }
}

/// Equal-weight mixture of two densities.
pub struct MixturePdf<A, B> {
    p0: A,
    p1: B,
}

impl<A: Pdf, B: Pdf> MixturePdf<A, B> {
    pub fn new(p0: A, p1: B) -> Self {
        Self { p0, p1 }
    }
}

impl<A: Pdf, B: Pdf> Pdf for MixturePdf<A, B> {
    fn value(&self, direction: Vec3) -> f32 {
        0.5 * self.p0.value(direction) + 0.5 * self.p1.value(direction)
    }

    fn generate(&self, rng: &mut dyn RngCore) -> Vec3 {
        if gen_f32(rng) < 0.5 {
            self.p0.generate(rng)
        } else {
            self.p1.generate(rng)
        }
    }
}

/// Densities a material can hand back from a diffuse scatter.
#[derive(Debug, Clone, Copy)]
pub enum MaterialPdf {
    Cosine(CosinePdf),
    Sphere(SpherePdf),
}

impl Pdf for MaterialPdf {
    fn value(&self, direction: Vec3) -> f32 {
        match self {
            MaterialPdf::Cosine(pdf) => pdf.value(direction),
            MaterialPdf::Sphere(pdf) => pdf.value(direction),
        }
    }

    fn generate(&self, rng: &mut dyn RngCore) -> Vec3 {
        match self {
            MaterialPdf::Cosine(pdf) => pdf.generate(rng),
            MaterialPdf::Sphere(pdf) => pdf.generate(rng),
        }
    }
}
