//! Errors raised while assembling a scene.

use thiserror::Error;

/// Construction-time failures. These are fatal: rendering cannot start
/// without a valid acceleration structure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("cannot build a BVH over zero objects")]
    EmptyScene,

    #[error("object {index} has no bounding box and cannot be placed in a BVH")]
    MissingBoundingBox { index: usize },
}

pub type BuildResult<T> = Result<T, BuildError>;
