//! Configuration for transform batching, trajectory alignment and the local
//! geodetic frame.
//!
//! All structs implement `Default`, builder-style `with_*` setters and serde
//! (de)serialization with per-field defaults, so a partial document such as
//! `{"alignment": {"min_svd_correspondences": 10}}` is a valid configuration.

use crate::error::{GeometryError, GeometryResult};
use crate::geodetic::GeodeticCoordinate;
use serde::{Deserialize, Serialize};

/// Batch transform settings for clouds and scans.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformConfig {
    /// Element count at which batch transforms are sharded across rayon workers
    pub parallel_threshold: usize,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            parallel_threshold: 10_000,
        }
    }
}

impl TransformConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the element count at which batches run in parallel.
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Never shard; every batch runs on the calling thread.
    pub fn sequential() -> Self {
        Self {
            parallel_threshold: usize::MAX,
        }
    }
}

/// Trajectory alignment policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignmentConfig {
    /// Smallest correspondence count solved with SVD; below it the first
    /// correspondence anchors the alignment.
    pub min_svd_correspondences: usize,
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self {
            min_svd_correspondences: 6,
        }
    }
}

impl AlignmentConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum number of correspondences for the SVD solution.
    pub fn with_min_svd_correspondences(mut self, count: usize) -> Self {
        self.min_svd_correspondences = count;
        self
    }
}

/// Local tangent-plane frame settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeodeticConfig {
    /// Origin of the local ENU frame. Required before any ENU conversion.
    pub origin: Option<GeodeticCoordinate>,
}

impl GeodeticConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the ENU origin.
    pub fn with_origin(mut self, origin: GeodeticCoordinate) -> Self {
        self.origin = Some(origin);
        self
    }
}

/// Top-level configuration grouping every sub-config.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    pub transform: TransformConfig,
    pub alignment: AlignmentConfig,
    pub geodetic: GeodeticConfig,
}

impl GeometryConfig {
    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> GeometryResult<()> {
        if self.transform.parallel_threshold == 0 {
            return Err(GeometryError::InvalidConfig(
                "transform.parallel_threshold must be at least 1".to_string(),
            ));
        }
        if self.alignment.min_svd_correspondences < 3 {
            return Err(GeometryError::InvalidConfig(format!(
                "alignment.min_svd_correspondences must be at least 3, got {}",
                self.alignment.min_svd_correspondences
            )));
        }
        if let Some(origin) = &self.geodetic.origin {
            if !(-90.0..=90.0).contains(&origin.latitude()) {
                return Err(GeometryError::InvalidConfig(format!(
                    "geodetic.origin latitude {} outside [-90, 90]",
                    origin.latitude()
                )));
            }
        }
        Ok(())
    }
}
