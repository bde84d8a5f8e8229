//! Trajectory registration against ground truth.
//!
//! The aligner picks one of three strategies from the number of
//! correspondences `n` and [`AlignmentConfig::min_svd_correspondences`]
//! (default 6):
//!
//! | n                   | Method                        | Result                   |
//! |---------------------|-------------------------------|--------------------------|
//! | 0                   | [`AlignmentMethod::Identity`] | identity                 |
//! | 1 ..= threshold − 1 | [`AlignmentMethod::Anchor`]   | `A₀ · B₀⁻¹`              |
//! | ≥ threshold         | [`AlignmentMethod::Svd`]      | least-squares `[R \| t]` |
//!
//! The anchor transform is exact at the first correspondence and approximate
//! elsewhere. The threshold and the choice of the first correspondence as
//! anchor are kept as policy constants, not derived quantities.

use super::Trajectory;
use super::svd::rigid_transform_from_correspondences;
use crate::config::AlignmentConfig;
use crate::error::{GeometryError, GeometryResult};
use crate::transform::RigidTransform;
use nalgebra::Point3;
use std::fmt;
use tracing::{debug, warn};

/// Strategy used to produce an alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignmentMethod {
    /// No correspondences; nothing to align.
    Identity,
    /// Too few correspondences for SVD; first correspondence used as anchor.
    Anchor,
    /// Least-squares absolute orientation.
    Svd,
}

impl fmt::Display for AlignmentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AlignmentMethod::Identity => "identity",
            AlignmentMethod::Anchor => "anchor",
            AlignmentMethod::Svd => "svd",
        };
        write!(f, "{name}")
    }
}

/// Outcome of an alignment.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentResult {
    /// Transform mapping the estimate frame onto the reference frame
    pub transform: RigidTransform,
    /// Strategy that produced `transform`
    pub method: AlignmentMethod,
    /// Number of correspondences used
    pub correspondences: usize,
}

impl fmt::Display for AlignmentResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Alignment [ method: {}, correspondences: {}, transform: {} ]",
            self.method, self.correspondences, self.transform
        )
    }
}

impl AlignmentResult {
    fn identity() -> Self {
        Self {
            transform: RigidTransform::identity(),
            method: AlignmentMethod::Identity,
            correspondences: 0,
        }
    }

    /// Apply the alignment to every pose of `trajectory`.
    ///
    /// This must be the *entire* estimated trajectory, not only the poses
    /// that had a correspondence. An identity alignment returns a copy.
    pub fn apply(&self, trajectory: &Trajectory) -> Trajectory {
        if self.transform.is_identity() {
            return trajectory.clone();
        }
        trajectory
            .iter()
            .map(|(&id, pose)| (id, self.transform.compose(pose)))
            .collect()
    }

    /// Apply the alignment to every position of `points`.
    pub fn apply_to_points(&self, points: &[Point3<f64>]) -> Vec<Point3<f64>> {
        if self.transform.is_identity() {
            return points.to_vec();
        }
        points
            .iter()
            .map(|p| self.transform.transform_point(p))
            .collect()
    }
}

/// Registers an estimated trajectory onto a reference trajectory.
#[derive(Debug, Clone, Default)]
pub struct TrajectoryAligner {
    config: AlignmentConfig,
}

impl TrajectoryAligner {
    /// Create an aligner with the default policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an aligner with the given policy.
    pub fn with_config(config: AlignmentConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AlignmentConfig {
        &self.config
    }

    /// Align bare positions.
    ///
    /// The anchor fallback for positions is the pure translation `A₀ − B₀`.
    ///
    /// # Errors
    /// [`GeometryError::CorrespondenceMismatch`] if the slices differ in length.
    pub fn align_points(
        &self,
        reference: &[Point3<f64>],
        estimate: &[Point3<f64>],
    ) -> GeometryResult<AlignmentResult> {
        check_lengths(reference.len(), estimate.len())?;
        let n = reference.len();

        if n == 0 {
            return Ok(AlignmentResult::identity());
        }
        if n < self.config.min_svd_correspondences {
            warn!(
                "Only {} correspondences (< {}), anchoring alignment on the first one",
                n, self.config.min_svd_correspondences
            );
            return Ok(AlignmentResult {
                transform: RigidTransform::from_translation(reference[0] - estimate[0]),
                method: AlignmentMethod::Anchor,
                correspondences: n,
            });
        }

        debug!("Aligning {} correspondences with SVD", n);
        Ok(AlignmentResult {
            transform: rigid_transform_from_correspondences(reference, estimate)?,
            method: AlignmentMethod::Svd,
            correspondences: n,
        })
    }

    /// Align full poses.
    ///
    /// Positions drive the SVD solution; the anchor fallback uses the whole
    /// first pose pair, `A₀ · B₀⁻¹`, so rotation is carried too.
    ///
    /// # Errors
    /// [`GeometryError::CorrespondenceMismatch`] if the slices differ in length.
    pub fn align_poses(
        &self,
        reference: &[RigidTransform],
        estimate: &[RigidTransform],
    ) -> GeometryResult<AlignmentResult> {
        check_lengths(reference.len(), estimate.len())?;
        let n = reference.len();

        if n == 0 {
            return Ok(AlignmentResult::identity());
        }
        if n < self.config.min_svd_correspondences {
            warn!(
                "Only {} correspondences (< {}), anchoring alignment on the first pose",
                n, self.config.min_svd_correspondences
            );
            return Ok(AlignmentResult {
                transform: reference[0].compose(&estimate[0].inverse()),
                method: AlignmentMethod::Anchor,
                correspondences: n,
            });
        }

        let reference_points: Vec<_> = reference.iter().map(position).collect();
        let estimate_points: Vec<_> = estimate.iter().map(position).collect();
        debug!("Aligning {} pose correspondences with SVD", n);
        Ok(AlignmentResult {
            transform: rigid_transform_from_correspondences(&reference_points, &estimate_points)?,
            method: AlignmentMethod::Svd,
            correspondences: n,
        })
    }

    /// Align an id-keyed estimate onto id-keyed ground truth.
    ///
    /// Correspondences are the ids present in both maps, in id order; the
    /// first of them is the anchor when the fallback applies.
    ///
    /// # Errors
    /// [`GeometryError::Numerical`] if the SVD fails.
    pub fn align_trajectory(
        &self,
        estimate: &Trajectory,
        ground_truth: &Trajectory,
    ) -> GeometryResult<AlignmentResult> {
        let (reference, estimated): (Vec<_>, Vec<_>) = estimate
            .iter()
            .filter_map(|(id, pose)| ground_truth.get(id).map(|gt| (*gt, *pose)))
            .unzip();

        debug!(
            "{} of {} estimated poses have ground truth",
            reference.len(),
            estimate.len()
        );

        self.align_poses(&reference, &estimated)
    }

    /// Align `estimate` onto `ground_truth` and return the whole aligned trajectory.
    pub fn align_and_apply(
        &self,
        estimate: &Trajectory,
        ground_truth: &Trajectory,
    ) -> GeometryResult<(Trajectory, AlignmentResult)> {
        let result = self.align_trajectory(estimate, ground_truth)?;
        Ok((result.apply(estimate), result))
    }
}

fn position(pose: &RigidTransform) -> Point3<f64> {
    Point3::from(pose.translation())
}

fn check_lengths(reference: usize, estimate: usize) -> GeometryResult<()> {
    if reference != estimate {
        return Err(GeometryError::CorrespondenceMismatch {
            reference,
            estimate,
        });
    }
    Ok(())
}
