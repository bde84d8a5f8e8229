//! Shared fixtures for integration tests
//!
//! Deterministic trajectories and scans so failures reproduce exactly.

#![allow(dead_code)]

use slam_geometry::{RigidTransform, Trajectory};

/// Smooth 3D trajectory of `n` poses driving forward while weaving and climbing
///
/// Positions are non-coplanar for n ≥ 4, which keeps the SVD well conditioned.
pub fn weaving_trajectory(n: usize) -> Trajectory {
    (0..n)
        .map(|i| {
            let s = i as f64;
            let pose = RigidTransform::from_translation_euler(
                2.0 * s,
                3.0 * (0.35 * s).sin(),
                0.5 * (0.2 * s).cos() + 0.05 * s,
                0.01 * s,
                0.0,
                0.08 * s,
            );
            (i, pose)
        })
        .collect()
}

/// Express every pose of `trajectory` in a frame offset by `offset⁻¹`
///
/// Aligning the result back onto `trajectory` must recover `offset`.
pub fn drifted(trajectory: &Trajectory, offset: &RigidTransform) -> Trajectory {
    let inverse = offset.inverse();
    trajectory
        .iter()
        .map(|(&id, pose)| (id, inverse.compose(pose)))
        .collect()
}

/// XYZI ring of `n` returns at 10 m range, intensity = record index
pub fn ring_scan_xyzi(n: usize) -> Vec<f32> {
    (0..n)
        .flat_map(|i| {
            let a = i as f32 / n as f32 * std::f32::consts::TAU;
            [10.0 * a.cos(), 10.0 * a.sin(), 0.3, i as f32]
        })
        .collect()
}
