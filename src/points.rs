//! Point attribute shapes and the per-point transform.
//!
//! Four closed shapes are supported, one type each:
//!
//! | Type                  | Position | Color | Normal |
//! |-----------------------|----------|-------|--------|
//! | [`PointXyz`]          | yes      |       |        |
//! | [`PointXyzRgb`]       | yes      | yes   |        |
//! | [`PointNormal`]       | yes      |       | yes    |
//! | [`PointXyzRgbNormal`] | yes      | yes   | yes    |
//!
//! Positions receive the full rigid transform, normals only its rotation, and
//! color bytes are copied through untouched. The shape is resolved statically
//! through [`TransformPoint`], so there is no per-point probing of fields.

use crate::transform::RigidTransform;
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// A point type that a rigid transform can act on.
pub trait TransformPoint: Clone + Send + Sync {
    /// Return a transformed copy of this point.
    fn transformed(&self, transform: &RigidTransform) -> Self;
}

/// Position-only point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PointXyz {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// Position with an RGB color.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PointXyzRgb {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub rgb: [u8; 3],
}

/// Position with a surface normal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PointNormal {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub normal_x: f32,
    pub normal_y: f32,
    pub normal_z: f32,
}

/// Position with an RGB color and a surface normal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PointXyzRgbNormal {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub rgb: [u8; 3],
    pub normal_x: f32,
    pub normal_y: f32,
    pub normal_z: f32,
}

impl PointXyz {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn position(&self) -> Point3<f64> {
        Point3::new(self.x as f64, self.y as f64, self.z as f64)
    }
}

impl PointXyzRgb {
    pub fn new(x: f32, y: f32, z: f32, rgb: [u8; 3]) -> Self {
        Self { x, y, z, rgb }
    }

    pub fn position(&self) -> Point3<f64> {
        Point3::new(self.x as f64, self.y as f64, self.z as f64)
    }
}

impl PointNormal {
    pub fn new(position: [f32; 3], normal: [f32; 3]) -> Self {
        Self {
            x: position[0],
            y: position[1],
            z: position[2],
            normal_x: normal[0],
            normal_y: normal[1],
            normal_z: normal[2],
        }
    }

    pub fn position(&self) -> Point3<f64> {
        Point3::new(self.x as f64, self.y as f64, self.z as f64)
    }

    pub fn normal(&self) -> Vector3<f64> {
        Vector3::new(
            self.normal_x as f64,
            self.normal_y as f64,
            self.normal_z as f64,
        )
    }
}

impl PointXyzRgbNormal {
    pub fn new(position: [f32; 3], rgb: [u8; 3], normal: [f32; 3]) -> Self {
        Self {
            x: position[0],
            y: position[1],
            z: position[2],
            rgb,
            normal_x: normal[0],
            normal_y: normal[1],
            normal_z: normal[2],
        }
    }

    pub fn position(&self) -> Point3<f64> {
        Point3::new(self.x as f64, self.y as f64, self.z as f64)
    }

    pub fn normal(&self) -> Vector3<f64> {
        Vector3::new(
            self.normal_x as f64,
            self.normal_y as f64,
            self.normal_z as f64,
        )
    }
}

impl TransformPoint for PointXyz {
    fn transformed(&self, transform: &RigidTransform) -> Self {
        let [x, y, z] = transform.transform_coords(self.x, self.y, self.z);
        Self { x, y, z }
    }
}

impl TransformPoint for PointXyzRgb {
    fn transformed(&self, transform: &RigidTransform) -> Self {
        let [x, y, z] = transform.transform_coords(self.x, self.y, self.z);
        Self {
            x,
            y,
            z,
            rgb: self.rgb,
        }
    }
}

impl TransformPoint for PointNormal {
    fn transformed(&self, transform: &RigidTransform) -> Self {
        let [x, y, z] = transform.transform_coords(self.x, self.y, self.z);
        let [normal_x, normal_y, normal_z] =
            transform.rotate_coords(self.normal_x, self.normal_y, self.normal_z);
        Self {
            x,
            y,
            z,
            normal_x,
            normal_y,
            normal_z,
        }
    }
}

impl TransformPoint for PointXyzRgbNormal {
    fn transformed(&self, transform: &RigidTransform) -> Self {
        let [x, y, z] = transform.transform_coords(self.x, self.y, self.z);
        let [normal_x, normal_y, normal_z] =
            transform.rotate_coords(self.normal_x, self.normal_y, self.normal_z);
        Self {
            x,
            y,
            z,
            rgb: self.rgb,
            normal_x,
            normal_y,
            normal_z,
        }
    }
}

impl TransformPoint for Point3<f64> {
    fn transformed(&self, transform: &RigidTransform) -> Self {
        transform.transform_point(self)
    }
}

impl TransformPoint for Point3<f32> {
    fn transformed(&self, transform: &RigidTransform) -> Self {
        let [x, y, z] = transform.transform_coords(self.x, self.y, self.z);
        Point3::new(x, y, z)
    }
}

/// Transform a single point.
///
/// `None` and the identity return an unmodified copy.
pub fn transform_point<P: TransformPoint>(point: &P, transform: Option<&RigidTransform>) -> P {
    match crate::transform::effective(transform) {
        Some(t) => point.transformed(t),
        None => point.clone(),
    }
}
