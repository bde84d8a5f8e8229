//! Geometric core of a visual SLAM pipeline.
//!
//! Rigid transforms applied to points, clouds and laser scans, WGS84
//! geodetic to ECEF/ENU conversion, and registration plus drift evaluation
//! of an estimated trajectory against ground truth. All operations are pure
//! functions over value types.

pub mod alignment;
pub mod cloud;
pub mod config;
pub mod error;
pub mod evaluation;
pub mod geodetic;
pub mod logger;
pub mod points;
pub mod scan;
pub mod transform;

pub use alignment::{
    AlignmentMethod, AlignmentResult, Trajectory, TrajectoryAligner,
    rigid_transform_from_correspondences,
};
pub use cloud::{transform_cloud, transform_cloud_indices};
pub use config::{AlignmentConfig, GeodeticConfig, GeometryConfig, TransformConfig};
pub use error::{GeometryError, GeometryResult};
pub use evaluation::{ErrorStats, TrajectoryErrorStats, evaluate_trajectory};
pub use geodetic::{GeodeticCoordinate, LocalFrame};
pub use logger::{init_logger, init_logger_with_level};
pub use points::{
    PointNormal, PointXyz, PointXyzRgb, PointXyzRgbNormal, TransformPoint, transform_point,
};
pub use scan::{LaserScan, ScanEncoding, transform_scan};
pub use transform::RigidTransform;
