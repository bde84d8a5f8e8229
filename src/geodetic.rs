//! Geodetic to Earth-centered and local East-North-Up conversion on WGS84.
//!
//! Everything here is a closed-form double-precision evaluation; there is no
//! iteration and no branching on input magnitude.
//!
//! # Notes
//! With `a` the semi-major axis, `b` the semi-minor axis and `ae = acos(b/a)`
//! the angular eccentricity, the prime-vertical radius of curvature is
//!
//! ```text
//! N(φ) = a / sqrt(1 − sin²(ae)·sin²(φ))
//! ```
//!
//! and the geocentric (ECEF) coordinates of `(φ, λ, h)` are
//!
//! ```text
//! x = (N + h)·cos φ·cos λ
//! y = (N + h)·cos φ·sin λ
//! z = (cos²(ae)·N + h)·sin φ
//! ```
//!
//! ENU coordinates are obtained by subtracting the origin's ECEF position and
//! rotating by the transpose of the ENU→ECEF rotation at the origin.

use crate::config::GeodeticConfig;
use crate::error::{GeometryError, GeometryResult};
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use std::fmt;

/// WGS84 semi-major axis (meters)
pub const WGS84_SEMI_MAJOR_AXIS: f64 = 6_378_137.0;

/// WGS84 semi-minor axis (meters)
pub const WGS84_SEMI_MINOR_AXIS: f64 = 6_356_752.3142;

/// Geodetic position: latitude and longitude in decimal degrees, altitude in meters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GeodeticCoordinate {
    latitude: f64,
    longitude: f64,
    altitude: f64,
}

impl fmt::Display for GeodeticCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Geodetic(lat: {:.8}°, lon: {:.8}°, alt: {:.3} m)",
            self.latitude, self.longitude, self.altitude
        )
    }
}

impl GeodeticCoordinate {
    pub fn new(latitude: f64, longitude: f64, altitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            altitude,
        }
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn altitude(&self) -> f64 {
        self.altitude
    }

    /// Earth-centered, Earth-fixed coordinates in meters.
    pub fn to_geocentric(&self) -> Point3<f64> {
        let ae = (WGS84_SEMI_MINOR_AXIS / WGS84_SEMI_MAJOR_AXIS).acos();
        let cos2_ae = ae.cos().powi(2);
        let sin2_ae = ae.sin().powi(2);

        let lat = self.latitude.to_radians();
        let lon = self.longitude.to_radians();

        let n = WGS84_SEMI_MAJOR_AXIS / (1.0 - sin2_ae * lat.sin().powi(2)).sqrt();

        Point3::new(
            (n + self.altitude) * lat.cos() * lon.cos(),
            (n + self.altitude) * lat.cos() * lon.sin(),
            (cos2_ae * n + self.altitude) * lat.sin(),
        )
    }

    /// East-North-Up coordinates in meters relative to `origin`.
    pub fn to_enu(&self, origin: &GeodeticCoordinate) -> Point3<f64> {
        let d: Vector3<f64> = self.to_geocentric() - origin.to_geocentric();

        let (slat, clat) = origin.latitude.to_radians().sin_cos();
        let (slon, clon) = origin.longitude.to_radians().sin_cos();

        Point3::new(
            -slon * d.x + clon * d.y,
            -clon * slat * d.x - slon * slat * d.y + clat * d.z,
            clon * clat * d.x + slon * clat * d.y + slat * d.z,
        )
    }
}

/// Local tangent-plane frame anchored at a geodetic origin.
///
/// The origin is mandatory; building a frame from a configuration that lacks
/// one fails with [`GeometryError::MissingOrigin`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalFrame {
    origin: GeodeticCoordinate,
}

impl LocalFrame {
    pub fn new(origin: GeodeticCoordinate) -> Self {
        Self { origin }
    }

    /// Build the frame from configuration.
    ///
    /// # Errors
    /// [`GeometryError::MissingOrigin`] if `config.origin` is unset.
    pub fn from_config(config: &GeodeticConfig) -> GeometryResult<Self> {
        config
            .origin
            .map(Self::new)
            .ok_or(GeometryError::MissingOrigin)
    }

    pub fn origin(&self) -> &GeodeticCoordinate {
        &self.origin
    }

    /// ENU coordinates of `coord` in this frame.
    pub fn to_enu(&self, coord: &GeodeticCoordinate) -> Point3<f64> {
        coord.to_enu(&self.origin)
    }

    /// ENU coordinates of every coordinate, in input order.
    pub fn to_enu_all(&self, coords: &[GeodeticCoordinate]) -> Vec<Point3<f64>> {
        coords.iter().map(|c| self.to_enu(c)).collect()
    }
}
