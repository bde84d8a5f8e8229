//! Closed-form absolute orientation via SVD.
//!
//! For index-paired sets `A` (reference) and `B` (estimate) this finds the
//! rigid transform `T = [R | t]` minimizing `Σ‖Aᵢ − T·Bᵢ‖²`:
//!
//! ```text
//! a̅, b̅  = centroids of A and B
//! H     = Σ (Bᵢ − b̅)(Aᵢ − a̅)ᵀ
//! H     = U Σ Vᵀ
//! R     = V · diag(1, 1, det(V Uᵀ)) · Uᵀ
//! t     = a̅ − R b̅
//! ```
//!
//! The determinant term flips the axis of the smallest singular value so the
//! result is a proper rotation, never a reflection.

use crate::error::{GeometryError, GeometryResult};
use crate::transform::RigidTransform;
use nalgebra::{Matrix3, Point3, Rotation3, Vector3};

/// Rigid transform mapping `estimate` onto `reference`.
///
/// Returns the identity for empty input. Fewer than three non-collinear
/// correspondences leave the rotation under-determined; the result is still
/// a valid rigid transform.
///
/// # Errors
/// - [`GeometryError::CorrespondenceMismatch`] if the slices differ in length
/// - [`GeometryError::Numerical`] if the decomposition does not yield U or Vᵀ
///
/// # Example
/// ```
/// use slam_geometry::alignment::rigid_transform_from_correspondences;
/// use nalgebra::Point3;
///
/// let estimate = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// ];
/// let shift = nalgebra::Vector3::new(1.0, 2.0, 3.0);
/// let reference: Vec<_> = estimate.iter().map(|p| p + shift).collect();
///
/// let t = rigid_transform_from_correspondences(&reference, &estimate).unwrap();
/// assert!((t.transform_point(&estimate[0]) - reference[0]).norm() < 1e-9);
/// ```
pub fn rigid_transform_from_correspondences(
    reference: &[Point3<f64>],
    estimate: &[Point3<f64>],
) -> GeometryResult<RigidTransform> {
    if reference.len() != estimate.len() {
        return Err(GeometryError::CorrespondenceMismatch {
            reference: reference.len(),
            estimate: estimate.len(),
        });
    }
    if reference.is_empty() {
        return Ok(RigidTransform::identity());
    }

    let reference_centroid = centroid(reference);
    let estimate_centroid = centroid(estimate);

    // Cross-covariance of the centered sets
    let mut h = Matrix3::zeros();
    for (a, b) in reference.iter().zip(estimate.iter()) {
        h += (b.coords - estimate_centroid) * (a.coords - reference_centroid).transpose();
    }

    let svd = h.svd(true, true);
    let u = svd
        .u
        .ok_or_else(|| GeometryError::Numerical("SVD did not return U".to_string()))?;
    let v_t = svd
        .v_t
        .ok_or_else(|| GeometryError::Numerical("SVD did not return V^T".to_string()))?;
    let v = v_t.transpose();

    // Correct the axis of the smallest singular value
    let mut correction = Matrix3::identity();
    correction[(svd.singular_values.imin(), svd.singular_values.imin())] =
        (v * u.transpose()).determinant().signum();

    let rotation = v * correction * u.transpose();
    let translation = reference_centroid - rotation * estimate_centroid;

    Ok(RigidTransform::new(
        Rotation3::from_matrix_unchecked(rotation),
        translation,
    ))
}

/// Mean position of a non-empty point set.
pub(crate) fn centroid(points: &[Point3<f64>]) -> Vector3<f64> {
    points
        .iter()
        .fold(Vector3::zeros(), |acc, p| acc + p.coords)
        / points.len() as f64
}
