//! Batch transformation of ordered point collections.
//!
//! Output order always matches input order (or index order for subsets):
//! downstream consumers treat position in the collection as temporal or
//! spatial adjacency. Batches at or above the configured threshold are split
//! across rayon workers; each point is independent, so the result is the same
//! as the sequential path.

use crate::config::TransformConfig;
use crate::error::{GeometryError, GeometryResult};
use crate::points::TransformPoint;
use crate::transform::{RigidTransform, effective};
use rayon::prelude::*;
use tracing::debug;

/// Transform every point of `cloud` with the default [`TransformConfig`].
///
/// `None` and the identity return a copy of the input.
///
/// # Example
/// ```
/// use slam_geometry::{PointXyz, RigidTransform, transform_cloud};
/// use nalgebra::Vector3;
///
/// let cloud = vec![PointXyz::new(0.0, 0.0, 0.0), PointXyz::new(1.0, 0.0, 0.0)];
/// let shift = RigidTransform::from_translation(Vector3::new(0.0, 0.0, 2.0));
/// let moved = transform_cloud(&cloud, Some(&shift));
/// assert_eq!(moved[1], PointXyz::new(1.0, 0.0, 2.0));
/// ```
pub fn transform_cloud<P: TransformPoint>(
    cloud: &[P],
    transform: Option<&RigidTransform>,
) -> Vec<P> {
    transform_cloud_with_config(cloud, transform, &TransformConfig::default())
}

/// Transform every point of `cloud`, using `config` to pick the execution strategy.
pub fn transform_cloud_with_config<P: TransformPoint>(
    cloud: &[P],
    transform: Option<&RigidTransform>,
    config: &TransformConfig,
) -> Vec<P> {
    let Some(t) = effective(transform) else {
        return cloud.to_vec();
    };

    if cloud.len() >= config.parallel_threshold {
        debug!("Transforming {} points in parallel", cloud.len());
        cloud.par_iter().map(|p| p.transformed(t)).collect()
    } else {
        cloud.iter().map(|p| p.transformed(t)).collect()
    }
}

/// Transform the points selected by `indices`, in `indices` order.
///
/// The output has exactly `indices.len()` points; repeated indices produce
/// repeated points.
///
/// # Errors
/// [`GeometryError::IndexOutOfBounds`] if any index is past the end of `cloud`.
/// Indices are checked before any point is transformed.
pub fn transform_cloud_indices<P: TransformPoint>(
    cloud: &[P],
    indices: &[usize],
    transform: Option<&RigidTransform>,
) -> GeometryResult<Vec<P>> {
    transform_cloud_indices_with_config(cloud, indices, transform, &TransformConfig::default())
}

/// Index-subset variant of [`transform_cloud_with_config`].
pub fn transform_cloud_indices_with_config<P: TransformPoint>(
    cloud: &[P],
    indices: &[usize],
    transform: Option<&RigidTransform>,
    config: &TransformConfig,
) -> GeometryResult<Vec<P>> {
    if let Some(&index) = indices.iter().find(|&&i| i >= cloud.len()) {
        return Err(GeometryError::IndexOutOfBounds {
            index,
            len: cloud.len(),
        });
    }

    let Some(t) = effective(transform) else {
        return Ok(indices.iter().map(|&i| cloud[i].clone()).collect());
    };

    let transformed = if indices.len() >= config.parallel_threshold {
        debug!("Transforming {} indexed points in parallel", indices.len());
        indices.par_iter().map(|&i| cloud[i].transformed(t)).collect()
    } else {
        indices.iter().map(|&i| cloud[i].transformed(t)).collect()
    };
    Ok(transformed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::points::{PointNormal, PointXyz, PointXyzRgb};
    use nalgebra::Vector3;

    fn line_cloud(n: usize) -> Vec<PointXyz> {
        (0..n).map(|i| PointXyz::new(i as f32, 0.0, 0.0)).collect()
    }

    #[test]
    fn test_transform_cloud_preserves_order_and_length() {
        let cloud = line_cloud(10);
        let t = RigidTransform::from_translation(Vector3::new(0.0, 1.0, 0.0));
        let out = transform_cloud(&cloud, Some(&t));

        assert_eq!(out.len(), cloud.len());
        for (i, p) in out.iter().enumerate() {
            assert_eq!(p.x, i as f32);
            assert_eq!(p.y, 1.0);
        }
        // Input untouched
        assert_eq!(cloud[3], PointXyz::new(3.0, 0.0, 0.0));
    }

    #[test]
    fn test_fast_path_returns_equal_cloud() {
        let cloud = vec![
            PointXyzRgb::new(0.1, 0.2, 0.3, [1, 2, 3]),
            PointXyzRgb::new(-4.0, 5.5, 1e6, [9, 8, 7]),
        ];
        assert_eq!(transform_cloud(&cloud, None), cloud);
        assert_eq!(
            transform_cloud(&cloud, Some(&RigidTransform::identity())),
            cloud
        );
    }

    #[test]
    fn test_empty_cloud() {
        let cloud: Vec<PointNormal> = Vec::new();
        let out = transform_cloud(&cloud, Some(&RigidTransform::random()));
        assert!(out.is_empty());

        let out = transform_cloud_indices(&cloud, &[], Some(&RigidTransform::random()));
        assert_eq!(out.map(|v| v.len()), Ok(0));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let cloud = line_cloud(257);
        let t = RigidTransform::random();
        let sequential =
            transform_cloud_with_config(&cloud, Some(&t), &TransformConfig::sequential());
        let parallel = transform_cloud_with_config(
            &cloud,
            Some(&t),
            &TransformConfig::new().with_parallel_threshold(1),
        );
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_indices_subset() -> GeometryResult<()> {
        let cloud = line_cloud(5);
        let t = RigidTransform::from_translation(Vector3::new(0.0, 0.0, 1.0));
        let out = transform_cloud_indices(&cloud, &[4, 1, 1], Some(&t))?;

        assert_eq!(out.len(), 3);
        assert_eq!(out[0], PointXyz::new(4.0, 0.0, 1.0));
        assert_eq!(out[1], PointXyz::new(1.0, 0.0, 1.0));
        assert_eq!(out[2], out[1]);

        let copied = transform_cloud_indices(&cloud, &[2, 0], None)?;
        assert_eq!(copied, vec![cloud[2], cloud[0]]);
        Ok(())
    }

    #[test]
    fn test_indices_out_of_bounds() {
        let cloud = line_cloud(3);
        let result = transform_cloud_indices(&cloud, &[0, 3], Some(&RigidTransform::random()));
        assert_eq!(
            result,
            Err(GeometryError::IndexOutOfBounds { index: 3, len: 3 })
        );

        // Contract is checked even on the fast path
        let result = transform_cloud_indices(&cloud, &[7], None);
        assert!(result.is_err());
    }
}
