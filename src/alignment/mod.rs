//! Rigid registration of an estimated trajectory onto ground truth.
//!
//! - [`rigid_transform_from_correspondences`]: least-squares `[R | t]` from
//!   paired point sets
//! - [`TrajectoryAligner`]: strategy selection (identity, anchor, SVD) and
//!   application to whole trajectories

use crate::transform::RigidTransform;
use std::collections::BTreeMap;

pub mod aligner;
pub mod svd;

pub use aligner::{AlignmentMethod, AlignmentResult, TrajectoryAligner};
pub use svd::rigid_transform_from_correspondences;

/// Poses keyed by frame id, iterated in id order.
pub type Trajectory = BTreeMap<usize, RigidTransform>;
