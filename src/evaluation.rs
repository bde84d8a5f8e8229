//! Drift statistics of an aligned trajectory against ground truth.
//!
//! For every frame id present in both trajectories two errors are measured:
//!
//! - translational: `‖t_est − t_gt‖` in meters
//! - rotational: angle in degrees between `R_est·x̂` and `R_gt·x̂`, the
//!   directions the two poses are facing
//!
//! The estimate is expected to already be expressed in the ground-truth frame,
//! typically the output of [`TrajectoryAligner::align_and_apply`].
//!
//! [`TrajectoryAligner::align_and_apply`]: crate::alignment::TrajectoryAligner::align_and_apply

use crate::alignment::Trajectory;
use crate::transform::RigidTransform;
use nalgebra::Vector3;
use std::fmt;
use tracing::debug;

/// Summary statistics of one error series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ErrorStats {
    /// Root mean square
    pub rmse: f64,
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation (n − 1 denominator); zero for fewer than two samples
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

impl ErrorStats {
    /// Statistics of `errors`, or `None` when empty.
    pub fn from_errors(errors: &[f64]) -> Option<Self> {
        if errors.is_empty() {
            return None;
        }
        let n = errors.len() as f64;

        let mut sorted = errors.to_vec();
        sorted.sort_by(f64::total_cmp);

        let mid = sorted.len() / 2;
        let median = if sorted.len() % 2 == 0 {
            (sorted[mid - 1] + sorted[mid]) / 2.0
        } else {
            sorted[mid]
        };

        let mean = errors.iter().sum::<f64>() / n;
        let rmse = (errors.iter().map(|e| e * e).sum::<f64>() / n).sqrt();
        let std = if errors.len() < 2 {
            0.0
        } else {
            (errors.iter().map(|e| (e - mean).powi(2)).sum::<f64>() / (n - 1.0)).sqrt()
        };

        Some(Self {
            rmse,
            mean,
            median,
            std,
            min: sorted[0],
            max: sorted[sorted.len() - 1],
        })
    }
}

/// Translational and rotational error statistics of a trajectory.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrajectoryErrorStats {
    /// Number of poses compared
    pub count: usize,
    /// Translational error in meters
    pub translational: ErrorStats,
    /// Rotational error in degrees
    pub rotational: ErrorStats,
}

impl fmt::Display for TrajectoryErrorStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let t = &self.translational;
        let r = &self.rotational;
        writeln!(f, "=== Ground truth comparison ===")?;
        writeln!(f, "Poses compared:     {}", self.count)?;
        writeln!(f, "Translational RMSE: {:.6} m", t.rmse)?;
        writeln!(f, "Translational mean: {:.6} m", t.mean)?;
        writeln!(f, "Translational med.: {:.6} m", t.median)?;
        writeln!(f, "Translational std:  {:.6} m", t.std)?;
        writeln!(f, "Translational min:  {:.6} m", t.min)?;
        writeln!(f, "Translational max:  {:.6} m", t.max)?;
        writeln!(f, "Rotational RMSE:    {:.6} deg", r.rmse)?;
        writeln!(f, "Rotational mean:    {:.6} deg", r.mean)?;
        writeln!(f, "Rotational med.:    {:.6} deg", r.median)?;
        writeln!(f, "Rotational std:     {:.6} deg", r.std)?;
        writeln!(f, "Rotational min:     {:.6} deg", r.min)?;
        writeln!(f, "Rotational max:     {:.6} deg", r.max)?;
        Ok(())
    }
}

/// Translational error between two poses, in meters.
pub fn translational_error(estimate: &RigidTransform, ground_truth: &RigidTransform) -> f64 {
    estimate.distance(ground_truth)
}

/// Angle in degrees between the x axes of two poses.
pub fn rotational_error(estimate: &RigidTransform, ground_truth: &RigidTransform) -> f64 {
    let a = estimate.transform_vector(&Vector3::x());
    let b = ground_truth.transform_vector(&Vector3::x());
    // atan2 stays exact at zero, acos does not
    a.cross(&b).norm().atan2(a.dot(&b)).to_degrees()
}

/// Compare `estimate` against `ground_truth` over their common frame ids.
///
/// Returns `None` when the trajectories share no id.
pub fn evaluate_trajectory(
    estimate: &Trajectory,
    ground_truth: &Trajectory,
) -> Option<TrajectoryErrorStats> {
    let (translational, rotational): (Vec<f64>, Vec<f64>) = estimate
        .iter()
        .filter_map(|(id, pose)| {
            ground_truth
                .get(id)
                .map(|gt| (translational_error(pose, gt), rotational_error(pose, gt)))
        })
        .unzip();

    debug!(
        "Evaluating {} poses against ground truth",
        translational.len()
    );

    Some(TrajectoryErrorStats {
        count: translational.len(),
        translational: ErrorStats::from_errors(&translational)?,
        rotational: ErrorStats::from_errors(&rotational)?,
    })
}
