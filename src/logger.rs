//! Log output for programs that embed slam-geometry
//!
//! Library code only emits `tracing` events: dispatch to the parallel path at
//! `debug`, alignment fallbacks at `warn`. Evaluation harnesses and
//! benchmarks that want to see them install a subscriber once with
//! [`init_logger`].

use tracing::Level;

/// Install the fmt subscriber at INFO, or at the level named by `RUST_LOG`
///
/// # Example
/// ```no_run
/// use slam_geometry::{TrajectoryAligner, init_logger};
///
/// init_logger();
/// let aligner = TrajectoryAligner::new();
/// tracing::info!("SVD needs {} poses", aligner.config().min_svd_correspondences);
/// ```
///
/// To see which batches run in parallel and why an alignment fell back:
/// ```bash
/// RUST_LOG=slam_geometry=debug cargo bench
/// ```
pub fn init_logger() {
    init_logger_with_level(Level::INFO)
}

/// Install the fmt subscriber with `default_level` unless `RUST_LOG` overrides it
///
/// Only the first call installs a subscriber; later calls, including one
/// racing with a host program that already set its own, are no-ops.
pub fn init_logger_with_level(default_level: Level) {
    let filter = tracing_subscriber::EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .try_init();
}
