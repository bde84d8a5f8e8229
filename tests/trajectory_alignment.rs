//! End-to-end registration of an estimated trajectory onto ground truth
//!
//! Covers the full evaluation path: correspondence selection by frame id,
//! method selection, application to the whole trajectory and drift statistics.

#![allow(clippy::expect_used)]
#![allow(clippy::unwrap_used)]

use slam_geometry::{
    AlignmentConfig, AlignmentMethod, RigidTransform, Trajectory, TrajectoryAligner,
    evaluate_trajectory,
};
use std::collections::BTreeMap;
use tracing::info;

mod test_utils;
use test_utils::*;

#[test]
fn test_svd_alignment_removes_frame_offset() {
    // ============================================================================
    // 1. Ground Truth and Drifted Estimate
    // ============================================================================

    let ground_truth = weaving_trajectory(40);
    let offset = RigidTransform::from_translation_euler(12.0, -4.0, 1.5, 0.1, -0.05, 0.7);
    let estimate = drifted(&ground_truth, &offset);

    let before = evaluate_trajectory(&estimate, &ground_truth).expect("trajectories overlap");
    assert!(before.translational.rmse > 1.0);

    // ============================================================================
    // 2. Align
    // ============================================================================

    let (aligned, result) = TrajectoryAligner::new()
        .align_and_apply(&estimate, &ground_truth)
        .expect("alignment should succeed");

    info!("{}", result);
    assert_eq!(result.method, AlignmentMethod::Svd);
    assert_eq!(result.correspondences, 40);
    assert!((result.transform.matrix() - offset.matrix()).abs().max() < 1e-6);

    // ============================================================================
    // 3. Evaluate
    // ============================================================================

    let after = evaluate_trajectory(&aligned, &ground_truth).expect("trajectories overlap");
    info!("{}", after);
    assert_eq!(after.count, 40);
    assert!(after.translational.rmse < 1e-6);
    assert!(after.translational.max < 1e-6);
    assert!(after.rotational.max < 1e-4);
}

#[test]
fn test_partial_ground_truth_aligns_every_pose() {
    // Ground truth only for every third frame; all frames must still move
    let full = weaving_trajectory(30);
    let ground_truth: Trajectory = full
        .iter()
        .filter(|(id, _)| *id % 3 == 0)
        .map(|(&id, pose)| (id, *pose))
        .collect();

    let offset = RigidTransform::from_translation_euler(-3.0, 8.0, 0.0, 0.0, 0.0, -1.2);
    let estimate = drifted(&full, &offset);

    let (aligned, result) = TrajectoryAligner::new()
        .align_and_apply(&estimate, &ground_truth)
        .unwrap();

    assert_eq!(result.correspondences, 10);
    assert_eq!(aligned.len(), estimate.len());

    // Frames without ground truth land on the full reference too
    let after = evaluate_trajectory(&aligned, &full).unwrap();
    assert!(after.translational.rmse < 1e-6);
}

#[test]
fn test_short_overlap_falls_back_to_anchor() {
    let ground_truth = weaving_trajectory(20);
    let offset = RigidTransform::from_translation_euler(1.0, 2.0, 3.0, 0.0, 0.2, 0.4);
    let estimate = drifted(&ground_truth, &offset);

    // Only ids 7..=10 overlap
    let overlap: Trajectory = ground_truth
        .range(7..=10)
        .map(|(&id, pose)| (id, *pose))
        .collect();

    let result = TrajectoryAligner::new()
        .align_trajectory(&estimate, &overlap)
        .unwrap();

    assert_eq!(result.method, AlignmentMethod::Anchor);
    assert_eq!(result.correspondences, 4);

    // Exact at the first common id
    let anchored = result.transform.compose(&estimate[&7]);
    assert!((anchored.matrix() - ground_truth[&7].matrix()).abs().max() < 1e-9);
}

#[test]
fn test_threshold_from_config() {
    let ground_truth = weaving_trajectory(8);
    let estimate = drifted(&ground_truth, &RigidTransform::random());

    let strict = TrajectoryAligner::with_config(
        AlignmentConfig::new().with_min_svd_correspondences(10),
    );
    let result = strict.align_trajectory(&estimate, &ground_truth).unwrap();
    assert_eq!(result.method, AlignmentMethod::Anchor);

    let result = TrajectoryAligner::new()
        .align_trajectory(&estimate, &ground_truth)
        .unwrap();
    assert_eq!(result.method, AlignmentMethod::Svd);
}

#[test]
fn test_disjoint_trajectories() {
    let estimate = weaving_trajectory(5);
    let ground_truth: Trajectory = weaving_trajectory(10)
        .into_iter()
        .filter(|(id, _)| *id >= 5)
        .collect();

    let (aligned, result) = TrajectoryAligner::new()
        .align_and_apply(&estimate, &ground_truth)
        .unwrap();
    assert_eq!(result.method, AlignmentMethod::Identity);
    assert_eq!(aligned, estimate);
    assert!(evaluate_trajectory(&aligned, &ground_truth).is_none());

    let empty: Trajectory = BTreeMap::new();
    let (aligned, _) = TrajectoryAligner::new()
        .align_and_apply(&empty, &ground_truth)
        .unwrap();
    assert!(aligned.is_empty());
}
