//! Lumen - CPU Path Tracing
//!
//! A Monte Carlo path tracer that combines light sampling with material
//! sampling through an equal-weight mixture density, over a randomized
//! bounding volume hierarchy.

mod bvh;
mod camera;
mod error;
mod hittable;
mod integrator;
mod material;
mod medium;
pub mod pdf;
mod plane;
mod rect;
mod renderer;
pub mod sampling;
mod scene;
mod sphere;
mod tile;
mod transform;

pub use bvh::BvhNode;
pub use camera::{Camera, CameraSettings};
pub use error::{BuildError, BuildResult};
pub use hittable::{HitRecord, Hittable, HittableList};
pub use integrator::{Integrator, IntegratorSettings};
pub use material::{
    Color, Dielectric, DiffuseLight, Isotropic, Lambertian, Material, Metal, ScatterRecord,
};
pub use medium::ConstantMedium;
pub use pdf::{CosinePdf, HittablePdf, MaterialPdf, MixturePdf, Pdf, SpherePdf};
pub use plane::Plane;
pub use rect::{axis_box, Rect};
pub use renderer::{
    color_to_rgba, linear_to_gamma, render, render_pixel, sanitize_sample, ImageBuffer,
    RenderConfig,
};
pub use scene::Scene;
pub use sphere::Sphere;
pub use tile::{render_parallel, render_tile, tile_rng, tiles, Tile, DEFAULT_TILE_SIZE};
pub use transform::Transform;

/// Re-export Vec3 and common math types from lumen_math
pub use lumen_math::{Aabb, Interval, Onb, Ray, Vec3};
