//! Renderable scene: acceleration structure, light list and background.

use crate::error::BuildResult;
use crate::{BvhNode, Color, Hittable, HittableList};
use rand::RngCore;
use std::sync::Arc;

/// Everything the integrator needs, immutable once built.
pub struct Scene {
    /// All geometry, lights included.
    pub world: BvhNode,
    /// Emitters targeted by light sampling. Each must also be in `world`.
    pub lights: HittableList,
    /// Radiance returned by rays that escape the scene.
    pub background: Color,
}

impl Scene {
    /// Build the BVH over `objects` for the shutter interval `[time0, time1]`.
    pub fn build(
        objects: Vec<Arc<dyn Hittable>>,
        lights: HittableList,
        background: Color,
        time0: f32,
        time1: f32,
        rng: &mut dyn RngCore,
    ) -> BuildResult<Self> {
        log::debug!(
            "Building scene: {} objects, {} lights",
            objects.len(),
            lights.len()
        );

        let world = BvhNode::new(objects, time0, time1, rng)?;

        Ok(Self {
            world,
            lights,
            background,
        })
    }
}
