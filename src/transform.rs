//! Rigid body transformations in 3D
//!
//! A [`RigidTransform`] is the 3×4 matrix `[R | t]` with `R` orthonormal and
//! `det(R) = +1`. It acts on positions as `R·p + t` and on direction vectors
//! (normals) as `R·v`.
//!
//! "No transform known" is not an in-band value: APIs that accept an optional
//! transform take `Option<&RigidTransform>`, and `None` as well as the exact
//! identity take a copy fast path that never touches coordinates.
//!
//! # Notes
//! Composition and inverse follow the usual SE(3) matrix identities:
//!
//! ```text
//! M_a M_b = [ R_a·R_b   R_a·t_b + t_a ]
//! M⁻¹     = [ Rᵀ        −Rᵀ·t         ]
//! ```

use nalgebra::{
    Isometry3, Matrix3, Matrix3x4, Matrix4, Point3, Quaternion, Rotation3, Translation3,
    UnitQuaternion, Vector3,
};
use crate::error::{GeometryError, GeometryResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Mul;

/// Rigid transform `[R | t]` acting on 3D coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RigidTransform {
    /// Rotation block
    rotation: Rotation3<f64>,
    /// Translation column
    translation: Vector3<f64>,
}

impl fmt::Display for RigidTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let t = self.translation;
        let q = self.quaternion();
        write!(
            f,
            "RigidTransform(translation: [{:.4}, {:.4}, {:.4}], \
             rotation: [w: {:.4}, x: {:.4}, y: {:.4}, z: {:.4}])",
            t.x, t.y, t.z, q.w, q.i, q.j, q.k
        )
    }
}

impl Default for RigidTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl RigidTransform {
    /// Create a transform from a rotation and a translation.
    pub fn new(rotation: Rotation3<f64>, translation: Vector3<f64>) -> Self {
        Self {
            rotation,
            translation,
        }
    }

    /// The identity transform.
    pub fn identity() -> Self {
        Self {
            rotation: Rotation3::identity(),
            translation: Vector3::zeros(),
        }
    }

    /// Pure translation.
    pub fn from_translation(translation: Vector3<f64>) -> Self {
        Self {
            rotation: Rotation3::identity(),
            translation,
        }
    }

    /// Build from a 3×4 `[R | t]` matrix.
    ///
    /// The rotation block is taken as-is. For a block that is not orthonormal,
    /// [`RigidTransform::isometry`] and [`RigidTransform::quaternion`] describe
    /// the nearest rotation instead of the stored one; use
    /// [`RigidTransform::try_from_matrix`] for matrices read from outside.
    pub fn from_matrix(matrix: &Matrix3x4<f64>) -> Self {
        let rotation: Matrix3<f64> = matrix.fixed_view::<3, 3>(0, 0).into_owned();
        let translation: Vector3<f64> = matrix.fixed_view::<3, 1>(0, 3).into_owned();
        Self {
            rotation: Rotation3::from_matrix_unchecked(rotation),
            translation,
        }
    }

    /// Build from a 3×4 `[R | t]` matrix, rejecting a rotation block that is
    /// not orthonormal with determinant +1 within `tolerance`.
    ///
    /// # Errors
    /// [`GeometryError::InvalidRotation`] with the largest deviation found.
    pub fn try_from_matrix(matrix: &Matrix3x4<f64>, tolerance: f64) -> GeometryResult<Self> {
        let transform = Self::from_matrix(matrix);
        let deviation = transform.rotation_deviation();
        if deviation < tolerance {
            Ok(transform)
        } else {
            Err(GeometryError::InvalidRotation { deviation })
        }
    }

    /// Create from translation components and Euler angles (radians).
    pub fn from_translation_euler(x: f64, y: f64, z: f64, roll: f64, pitch: f64, yaw: f64) -> Self {
        Self {
            rotation: Rotation3::from_euler_angles(roll, pitch, yaw),
            translation: Vector3::new(x, y, z),
        }
    }

    /// Create from translation components and quaternion coefficients.
    ///
    /// The quaternion is normalized before use.
    pub fn from_translation_quaternion(
        x: f64,
        y: f64,
        z: f64,
        qx: f64,
        qy: f64,
        qz: f64,
        qw: f64,
    ) -> Self {
        let quaternion = UnitQuaternion::from_quaternion(Quaternion::new(qw, qx, qy, qz));
        Self {
            rotation: quaternion.to_rotation_matrix(),
            translation: Vector3::new(x, y, z),
        }
    }

    /// Create from an nalgebra isometry.
    pub fn from_isometry(isometry: &Isometry3<f64>) -> Self {
        Self {
            rotation: isometry.rotation.to_rotation_matrix(),
            translation: isometry.translation.vector,
        }
    }

    /// Rotation block.
    pub fn rotation(&self) -> Rotation3<f64> {
        self.rotation
    }

    /// Rotation block as a plain matrix.
    pub fn rotation_matrix(&self) -> Matrix3<f64> {
        *self.rotation.matrix()
    }

    /// Rotation as a unit quaternion.
    pub fn quaternion(&self) -> UnitQuaternion<f64> {
        UnitQuaternion::from_rotation_matrix(&self.rotation)
    }

    /// Translation column.
    pub fn translation(&self) -> Vector3<f64> {
        self.translation
    }

    pub fn x(&self) -> f64 {
        self.translation.x
    }

    pub fn y(&self) -> f64 {
        self.translation.y
    }

    pub fn z(&self) -> f64 {
        self.translation.z
    }

    /// The 3×4 `[R | t]` matrix.
    pub fn matrix(&self) -> Matrix3x4<f64> {
        let mut m = Matrix3x4::zeros();
        m.fixed_view_mut::<3, 3>(0, 0)
            .copy_from(self.rotation.matrix());
        m.fixed_view_mut::<3, 1>(0, 3).copy_from(&self.translation);
        m
    }

    /// The 4×4 homogeneous matrix, with the same rotation block as [`RigidTransform::matrix`].
    pub fn homogeneous(&self) -> Matrix4<f64> {
        let mut h = Matrix4::identity();
        h.fixed_view_mut::<3, 4>(0, 0).copy_from(&self.matrix());
        h
    }

    /// Convert to an nalgebra isometry.
    ///
    /// The rotation goes through a unit quaternion, so it matches
    /// [`RigidTransform::matrix`] only for a valid rotation block.
    pub fn isometry(&self) -> Isometry3<f64> {
        Isometry3::from_parts(Translation3::from(self.translation), self.quaternion())
    }

    /// Exact comparison against the identity.
    ///
    /// Only the exact identity qualifies for the copy fast path.
    pub fn is_identity(&self) -> bool {
        self.translation == Vector3::zeros() && *self.rotation.matrix() == Matrix3::identity()
    }

    /// Check that the rotation block is orthonormal with determinant +1.
    pub fn is_valid(&self, tolerance: f64) -> bool {
        self.rotation_deviation() < tolerance
    }

    /// Largest of `max|RᵀR − I|` and `|det R − 1|`.
    fn rotation_deviation(&self) -> f64 {
        let r = self.rotation.matrix();
        let orthogonality = (r.transpose() * r - Matrix3::identity()).abs().max();
        orthogonality.max((r.determinant() - 1.0).abs())
    }

    /// Composition `self ∘ other`: apply `other` first, then `self`.
    pub fn compose(&self, other: &RigidTransform) -> RigidTransform {
        RigidTransform {
            rotation: self.rotation * other.rotation,
            translation: self.rotation * other.translation + self.translation,
        }
    }

    /// Inverse `[Rᵀ | −Rᵀ·t]`.
    pub fn inverse(&self) -> RigidTransform {
        let rotation = self.rotation.inverse();
        RigidTransform {
            rotation,
            translation: -(rotation * self.translation),
        }
    }

    /// Apply to a position: `R·p + t`.
    pub fn transform_point(&self, point: &Point3<f64>) -> Point3<f64> {
        self.rotation * point + self.translation
    }

    /// Apply to a direction: `R·v`. Translation is ignored.
    pub fn transform_vector(&self, vector: &Vector3<f64>) -> Vector3<f64> {
        self.rotation * vector
    }

    /// Apply to single-precision coordinates, computing in double precision.
    pub fn transform_coords(&self, x: f32, y: f32, z: f32) -> [f32; 3] {
        let p = self.transform_point(&Point3::new(x as f64, y as f64, z as f64));
        [p.x as f32, p.y as f32, p.z as f32]
    }

    /// Rotate single-precision direction components.
    pub fn rotate_coords(&self, x: f32, y: f32, z: f32) -> [f32; 3] {
        let v = self.transform_vector(&Vector3::new(x as f64, y as f64, z as f64));
        [v.x as f32, v.y as f32, v.z as f32]
    }

    /// Euclidean distance between the translations of two transforms.
    pub fn distance(&self, other: &RigidTransform) -> f64 {
        (self.translation - other.translation).norm()
    }

    /// Random transform with translation in [-1, 1]³ and uniform rotation.
    pub fn random() -> Self {
        use rand::Rng;
        let mut rng = rand::rng();

        let translation = Vector3::new(
            rng.random_range(-1.0..1.0),
            rng.random_range(-1.0..1.0),
            rng.random_range(-1.0..1.0),
        );
        let quaternion = UnitQuaternion::from_quaternion(Quaternion::new(
            rng.random_range(-1.0..1.0),
            rng.random_range(-1.0..1.0),
            rng.random_range(-1.0..1.0),
            rng.random_range(-1.0..1.0),
        ));

        Self {
            rotation: quaternion.to_rotation_matrix(),
            translation,
        }
    }
}

impl Mul for RigidTransform {
    type Output = RigidTransform;

    fn mul(self, rhs: RigidTransform) -> RigidTransform {
        self.compose(&rhs)
    }
}

impl Mul<&RigidTransform> for &RigidTransform {
    type Output = RigidTransform;

    fn mul(self, rhs: &RigidTransform) -> RigidTransform {
        self.compose(rhs)
    }
}

impl Mul<Point3<f64>> for &RigidTransform {
    type Output = Point3<f64>;

    fn mul(self, rhs: Point3<f64>) -> Point3<f64> {
        self.transform_point(&rhs)
    }
}

impl From<Isometry3<f64>> for RigidTransform {
    fn from(isometry: Isometry3<f64>) -> Self {
        Self::from_isometry(&isometry)
    }
}

/// Collapse `None` and the exact identity into `None`.
///
/// Batch operations use this to decide whether the copy fast path applies.
pub(crate) fn effective(transform: Option<&RigidTransform>) -> Option<&RigidTransform> {
    transform.filter(|t| !t.is_identity())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    const TOLERANCE: f64 = 1e-9;

    #[test]
    fn test_identity() {
        let identity = RigidTransform::identity();
        assert!(identity.is_identity());
        assert!(identity.is_valid(TOLERANCE));
        assert_eq!(RigidTransform::default(), identity);

        let p = Point3::new(1.0, -2.0, 3.5);
        assert_eq!(identity.transform_point(&p), p);
    }

    #[test]
    fn test_is_identity_is_exact() {
        let nearly = RigidTransform::from_translation(Vector3::new(1e-15, 0.0, 0.0));
        assert!(!nearly.is_identity());
    }

    #[test]
    fn test_transform_point_includes_translation() {
        let t = RigidTransform::from_translation_euler(1.0, 2.0, 3.0, 0.0, 0.0, FRAC_PI_2);
        let p = t.transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert!((p - Point3::new(1.0, 3.0, 3.0)).norm() < TOLERANCE);
    }

    #[test]
    fn test_transform_vector_excludes_translation() {
        let t = RigidTransform::from_translation_euler(10.0, 20.0, 30.0, 0.0, 0.0, FRAC_PI_2);
        let v = t.transform_vector(&Vector3::new(1.0, 0.0, 0.0));
        assert!((v - Vector3::new(0.0, 1.0, 0.0)).norm() < TOLERANCE);
    }

    #[test]
    fn test_inverse_round_trip() {
        for _ in 0..20 {
            let t = RigidTransform::random();
            let p = Point3::new(0.3, -4.0, 12.0);
            let back = t.inverse().transform_point(&t.transform_point(&p));
            assert!((back - p).norm() < 1e-6);
        }
    }

    #[test]
    fn test_compose_with_inverse_is_identity() {
        let t = RigidTransform::random();
        let composed = t.compose(&t.inverse());
        assert!(composed.translation().norm() < TOLERANCE);
        assert!((composed.rotation_matrix() - Matrix3::identity()).abs().max() < TOLERANCE);
    }

    #[test]
    fn test_compose_order() {
        let a = RigidTransform::from_translation(Vector3::new(1.0, 0.0, 0.0));
        let b = RigidTransform::from_translation_euler(0.0, 0.0, 0.0, 0.0, 0.0, FRAC_PI_2);
        let p = Point3::new(1.0, 0.0, 0.0);

        // a ∘ b applies b first
        let ab = a.compose(&b).transform_point(&p);
        assert!((ab - Point3::new(1.0, 1.0, 0.0)).norm() < TOLERANCE);

        let via_mul = (a * b).transform_point(&p);
        assert!((via_mul - ab).norm() < TOLERANCE);
        assert!((&a * p - Point3::new(2.0, 0.0, 0.0)).norm() < TOLERANCE);
    }

    #[test]
    fn test_matrix_round_trip() {
        let t = RigidTransform::from_translation_quaternion(1.0, 2.0, 3.0, 0.1, 0.2, 0.3, 0.9);
        let m = t.matrix();
        assert_eq!(m[(0, 3)], 1.0);
        assert_eq!(m[(1, 3)], 2.0);
        assert_eq!(m[(2, 3)], 3.0);

        let back = RigidTransform::from_matrix(&m);
        assert!((back.matrix() - m).abs().max() < TOLERANCE);
        assert!(back.is_valid(1e-9));

        let h = t.homogeneous();
        assert!((h.fixed_view::<3, 4>(0, 0) - m).abs().max() < TOLERANCE);
        assert_eq!(h[(3, 3)], 1.0);
    }

    #[test]
    fn test_try_from_matrix_rejects_scaled_rotation() {
        let valid = RigidTransform::random().matrix();
        let checked = RigidTransform::try_from_matrix(&valid, 1e-9);
        assert!(checked.is_ok());

        // Uniform scale 2 on the rotation block
        let mut scaled = valid;
        scaled.fixed_view_mut::<3, 3>(0, 0).scale_mut(2.0);
        match RigidTransform::try_from_matrix(&scaled, 1e-9) {
            Err(GeometryError::InvalidRotation { deviation }) => assert!(deviation > 1.0),
            other => panic!("expected InvalidRotation, got {other:?}"),
        }
    }

    #[test]
    fn test_homogeneous_matches_matrix_for_unchecked_block() {
        let mut m = Matrix3x4::identity();
        m[(0, 1)] = 0.5;
        m[(2, 3)] = 4.0;
        let t = RigidTransform::from_matrix(&m);
        assert!(!t.is_valid(1e-9));

        let h = t.homogeneous();
        assert_eq!(h.fixed_view::<3, 4>(0, 0).into_owned(), m);
        let bottom = nalgebra::RowVector4::new(0.0, 0.0, 0.0, 1.0);
        assert_eq!(h.fixed_view::<1, 4>(3, 0).into_owned(), bottom);
    }

    #[test]
    fn test_isometry_conversion() {
        let t = RigidTransform::random();
        let back = RigidTransform::from(t.isometry());
        assert!((back.matrix() - t.matrix()).abs().max() < TOLERANCE);
    }

    #[test]
    fn test_f32_helpers() {
        let t = RigidTransform::from_translation_euler(1.0, 0.0, 0.0, 0.0, 0.0, FRAC_PI_2);
        let p = t.transform_coords(1.0, 0.0, 0.0);
        assert!((p[0] - 1.0).abs() < 1e-6);
        assert!((p[1] - 1.0).abs() < 1e-6);

        let n = t.rotate_coords(1.0, 0.0, 0.0);
        assert!(n[0].abs() < 1e-6);
        assert!((n[1] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_effective_filters_identity() {
        let identity = RigidTransform::identity();
        let t = RigidTransform::random();
        assert!(effective(None).is_none());
        assert!(effective(Some(&identity)).is_none());
        assert!(effective(Some(&t)).is_some());
    }

    #[test]
    fn test_distance_and_display() {
        let a = RigidTransform::from_translation(Vector3::new(0.0, 3.0, 4.0));
        let b = RigidTransform::identity();
        assert!((a.distance(&b) - 5.0).abs() < TOLERANCE);
        assert!(a.to_string().starts_with("RigidTransform(translation: [0.0000, 3.0000, 4.0000]"));
    }
}
