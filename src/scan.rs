//! Flat range-sensor scan buffers and their transformation.
//!
//! A [`LaserScan`] is a contiguous `f32` buffer of fixed-width records. The
//! record layout is one of four [`ScanEncoding`]s, fixed when the scan is
//! built; a width outside the closed set is rejected at construction, so a
//! transform can never mis-stride a buffer.
//!
//! | Encoding    | Width | Fields                  | Transformed                   |
//! |-------------|-------|-------------------------|-------------------------------|
//! | `Xy`        | 2     | x y                     | x y (z taken as 0)            |
//! | `Xyz`       | 3     | x y z                   | x y z                         |
//! | `Xyzi`      | 4     | x y z intensity         | x y z                         |
//! | `XyzNormal` | 6     | x y z nx ny nz          | x y z, normal by rotation     |

use crate::config::TransformConfig;
use crate::error::{GeometryError, GeometryResult};
use crate::transform::{RigidTransform, effective};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Record layout of a scan buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScanEncoding {
    /// Planar scan: x, y
    Xy,
    /// 3D scan: x, y, z
    Xyz,
    /// 3D scan with intensity: x, y, z, i
    Xyzi,
    /// 3D scan with normals: x, y, z, nx, ny, nz
    XyzNormal,
}

impl ScanEncoding {
    /// Number of `f32` fields per record.
    pub const fn width(self) -> usize {
        match self {
            ScanEncoding::Xy => 2,
            ScanEncoding::Xyz => 3,
            ScanEncoding::Xyzi => 4,
            ScanEncoding::XyzNormal => 6,
        }
    }

    /// Encoding for an observed record width.
    ///
    /// # Errors
    /// [`GeometryError::InvalidScanWidth`] for any width other than 2, 3, 4 or 6.
    pub fn from_width(width: usize) -> GeometryResult<Self> {
        match width {
            2 => Ok(ScanEncoding::Xy),
            3 => Ok(ScanEncoding::Xyz),
            4 => Ok(ScanEncoding::Xyzi),
            6 => Ok(ScanEncoding::XyzNormal),
            _ => Err(GeometryError::InvalidScanWidth { width }),
        }
    }

    pub const fn is_2d(self) -> bool {
        matches!(self, ScanEncoding::Xy)
    }

    pub const fn has_intensity(self) -> bool {
        matches!(self, ScanEncoding::Xyzi)
    }

    pub const fn has_normals(self) -> bool {
        matches!(self, ScanEncoding::XyzNormal)
    }
}

impl fmt::Display for ScanEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScanEncoding::Xy => "XY",
            ScanEncoding::Xyz => "XYZ",
            ScanEncoding::Xyzi => "XYZI",
            ScanEncoding::XyzNormal => "XYZ+Normal",
        };
        write!(f, "{name}")
    }
}

/// Flat scan buffer with a fixed record encoding.
///
/// Deserialization goes through [`LaserScan::new`], so a decoded scan holds
/// the same whole-records guarantee as a constructed one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawLaserScan")]
pub struct LaserScan {
    data: Vec<f32>,
    encoding: ScanEncoding,
}

/// Unvalidated wire form of [`LaserScan`].
#[derive(Deserialize)]
struct RawLaserScan {
    data: Vec<f32>,
    encoding: ScanEncoding,
}

impl TryFrom<RawLaserScan> for LaserScan {
    type Error = GeometryError;

    fn try_from(raw: RawLaserScan) -> GeometryResult<Self> {
        Self::new(raw.data, raw.encoding)
    }
}

impl LaserScan {
    /// Wrap a buffer laid out as `encoding` records.
    ///
    /// # Errors
    /// [`GeometryError::ScanLengthMismatch`] if `data` is not a whole number of records.
    pub fn new(data: Vec<f32>, encoding: ScanEncoding) -> GeometryResult<Self> {
        let width = encoding.width();
        if data.len() % width != 0 {
            return Err(GeometryError::ScanLengthMismatch {
                len: data.len(),
                width,
            });
        }
        Ok(Self { data, encoding })
    }

    /// Wrap a buffer whose record width was observed at runtime.
    ///
    /// # Errors
    /// [`GeometryError::InvalidScanWidth`] for unsupported widths, then the
    /// same length check as [`LaserScan::new`].
    pub fn from_raw(data: Vec<f32>, width: usize) -> GeometryResult<Self> {
        Self::new(data, ScanEncoding::from_width(width)?)
    }

    /// Empty scan of the given encoding.
    pub fn empty(encoding: ScanEncoding) -> Self {
        Self {
            data: Vec::new(),
            encoding,
        }
    }

    pub fn encoding(&self) -> ScanEncoding {
        self.encoding
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.data.len() / self.encoding.width()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Raw buffer.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn into_data(self) -> Vec<f32> {
        self.data
    }

    /// Fields of record `index`, if present.
    pub fn record(&self, index: usize) -> Option<&[f32]> {
        let width = self.encoding.width();
        let start = index.checked_mul(width)?;
        let end = start.checked_add(width)?;
        self.data.get(start..end)
    }

    /// Iterate over records.
    pub fn records(&self) -> impl Iterator<Item = &[f32]> {
        self.data.chunks_exact(self.encoding.width())
    }
}

/// Transform a scan with the default [`TransformConfig`].
///
/// The output has the input's encoding and record count. `None` and the
/// identity return a copy.
///
/// # Example
/// ```
/// use slam_geometry::{LaserScan, RigidTransform, transform_scan};
/// use nalgebra::Vector3;
///
/// // One XYZI record; intensity 0.5 is never touched
/// let scan = LaserScan::from_raw(vec![1.0, 2.0, 3.0, 0.5], 4).unwrap();
/// let lifted = RigidTransform::from_translation(Vector3::new(0.0, 0.0, 1.0));
/// let out = transform_scan(&scan, Some(&lifted));
/// assert_eq!(out.data(), &[1.0, 2.0, 4.0, 0.5]);
/// ```
pub fn transform_scan(scan: &LaserScan, transform: Option<&RigidTransform>) -> LaserScan {
    transform_scan_with_config(scan, transform, &TransformConfig::default())
}

/// Transform a scan, using `config` to pick the execution strategy.
pub fn transform_scan_with_config(
    scan: &LaserScan,
    transform: Option<&RigidTransform>,
    config: &TransformConfig,
) -> LaserScan {
    let mut output = scan.clone();
    let Some(t) = effective(transform) else {
        return output;
    };

    let encoding = scan.encoding;
    let width = encoding.width();
    if scan.len() >= config.parallel_threshold {
        debug!("Transforming {} {} records in parallel", scan.len(), encoding);
        output
            .data
            .par_chunks_exact_mut(width)
            .for_each(|record| transform_record(record, encoding, t));
    } else {
        output
            .data
            .chunks_exact_mut(width)
            .for_each(|record| transform_record(record, encoding, t));
    }
    output
}

/// Transform one record in place according to its encoding.
fn transform_record(record: &mut [f32], encoding: ScanEncoding, transform: &RigidTransform) {
    match encoding {
        ScanEncoding::Xy => {
            let [x, y, _] = transform.transform_coords(record[0], record[1], 0.0);
            record[0] = x;
            record[1] = y;
        }
        ScanEncoding::Xyz | ScanEncoding::Xyzi => {
            let [x, y, z] = transform.transform_coords(record[0], record[1], record[2]);
            record[0] = x;
            record[1] = y;
            record[2] = z;
        }
        ScanEncoding::XyzNormal => {
            let [x, y, z] = transform.transform_coords(record[0], record[1], record[2]);
            let [nx, ny, nz] = transform.rotate_coords(record[3], record[4], record[5]);
            record.copy_from_slice(&[x, y, z, nx, ny, nz]);
        }
    }
}
