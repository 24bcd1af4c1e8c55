//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! A binary tree built by randomized spatial-median splits: every node
//! picks one of the three axes uniformly at random, orders its objects by
//! the minimum corner of their boxes on that axis, and splits the sorted
//! range in half. The random source is supplied by the caller, so the tree
//! shape is reproducible only when the generator is seeded identically.
//!
//! The tree is immutable after construction and is shared read-only by all
//! render threads.

use crate::error::{BuildError, BuildResult};
use crate::sampling::gen_index;
use crate::{HitRecord, Hittable, Ray};
use lumen_math::{axis_component, Aabb, Interval};
use rand::RngCore;
use std::cmp::Ordering;
use std::sync::Arc;

/// An object paired with its precomputed bounding box.
type Entry = (Arc<dyn Hittable>, Aabb);

/// BVH node.
///
/// Using an enum keeps node-to-node traversal free of dynamic dispatch;
/// only the objects themselves are trait objects.
pub enum BvhNode {
    /// Exactly one object.
    Leaf { object: Arc<dyn Hittable>, bbox: Aabb },
    /// Two objects ordered along the node's split axis.
    Pair {
        left: Arc<dyn Hittable>,
        right: Arc<dyn Hittable>,
        bbox: Aabb,
    },
    /// Internal node with two subtrees.
    Branch {
        left: Box<BvhNode>,
        right: Box<BvhNode>,
        bbox: Aabb,
    },
}

impl BvhNode {
    /// Create a BVH over `objects`, boxing each over `[time0, time1]`.
    ///
    /// Fails if the list is empty or any object is unbounded.
    pub fn new(
        objects: Vec<Arc<dyn Hittable>>,
        time0: f32,
        time1: f32,
        rng: &mut dyn RngCore,
    ) -> BuildResult<Self> {
        if objects.is_empty() {
            return Err(BuildError::EmptyScene);
        }

        let mut entries = objects
            .into_iter()
            .enumerate()
            .map(|(index, object)| {
                let bbox = object
                    .bounding_box(time0, time1)
                    .ok_or(BuildError::MissingBoundingBox { index })?;
                Ok((object, bbox))
            })
            .collect::<BuildResult<Vec<Entry>>>()?;

        let root = Self::build(&mut entries, rng);

        log::info!(
            "Built BVH: {} objects, {} nodes, depth {}",
            entries.len(),
            root.node_count(),
            root.depth()
        );

        Ok(root)
    }

    /// Recursive construction over a sub-range, sorted in place.
    fn build(entries: &mut [Entry], rng: &mut dyn RngCore) -> Self {
        let axis = gen_index(rng, 3);

        match entries.len() {
            1 => BvhNode::Leaf {
                object: Arc::clone(&entries[0].0),
                bbox: entries[0].1,
            },
            2 => {
                // Ties keep input order.
                let swap = box_compare(&entries[1], &entries[0], axis) == Ordering::Less;
                let (left, right) = if swap {
                    (&entries[1], &entries[0])
                } else {
                    (&entries[0], &entries[1])
                };
                BvhNode::Pair {
                    left: Arc::clone(&left.0),
                    right: Arc::clone(&right.0),
                    bbox: Aabb::surrounding(&left.1, &right.1),
                }
            }
            len => {
                entries.sort_by(|a, b| box_compare(a, b, axis));

                let (lower, upper) = entries.split_at_mut(len / 2);
                let left = Self::build(lower, rng);
                let right = Self::build(upper, rng);
                let bbox = Aabb::surrounding(&left.bbox(), &right.bbox());

                BvhNode::Branch {
                    left: Box::new(left),
                    right: Box::new(right),
                    bbox,
                }
            }
        }
    }

    /// The cached box covering everything below this node.
    pub fn bbox(&self) -> Aabb {
        match self {
            BvhNode::Leaf { bbox, .. }
            | BvhNode::Pair { bbox, .. }
            | BvhNode::Branch { bbox, .. } => *bbox,
        }
    }

    /// Number of nodes in the tree.
    pub fn node_count(&self) -> usize {
        match self {
            BvhNode::Leaf { .. } | BvhNode::Pair { .. } => 1,
            BvhNode::Branch { left, right, .. } => 1 + left.node_count() + right.node_count(),
        }
    }

    /// Length of the longest root-to-leaf path, counting nodes.
    pub fn depth(&self) -> usize {
        match self {
            BvhNode::Leaf { .. } | BvhNode::Pair { .. } => 1,
            BvhNode::Branch { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }
}

/// Order two entries by the minimum corner of their boxes on `axis`.
fn box_compare(a: &Entry, b: &Entry, axis: usize) -> Ordering {
    let a_min = axis_component(a.1.min(), axis);
    let b_min = axis_component(b.1.min(), axis);
    a_min.partial_cmp(&b_min).unwrap_or(Ordering::Equal)
}

/// Probe both children; the second only up to the first one's hit distance,
/// so whatever it returns is strictly closer.
#[inline]
fn hit_children<'a>(
    left: &'a dyn Hittable,
    right: &'a dyn Hittable,
    ray: &Ray,
    ray_t: Interval,
) -> Option<HitRecord<'a>> {
    let hit_left = left.hit(ray, ray_t);
    let right_max = hit_left.map_or(ray_t.max, |rec| rec.t);
    right.hit(ray, ray_t.with_max(right_max)).or(hit_left)
}

impl Hittable for BvhNode {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        if !self.bbox().hit(ray, ray_t) {
            return None;
        }

        match self {
            BvhNode::Leaf { object, .. } => object.hit(ray, ray_t),
            BvhNode::Pair { left, right, .. } => {
                hit_children(&**left, &**right, ray, ray_t)
            }
            BvhNode::Branch { left, right, .. } => {
                hit_children(&**left, &**right, ray, ray_t)
            }
        }
    }

    fn bounding_box(&self, _time0: f32, _time1: f32) -> Option<Aabb> {
        Some(self.bbox())
    }
}
