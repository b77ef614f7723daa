//! Unified tuning constants for the cellular water simulation.
//!
//! All simulation modules should use these constants instead of defining
//! their own. This prevents drift between subsystems and makes tuning easier.

/// Mass a cell holds at rest without anything stacked on top.
///
/// Used by:
/// - `flow::stable_state` (branch points of the piecewise curve)
/// - `flow::cell_outflow` (per-exchange flow cap)
pub const MAX_MASS: f32 = 1.0;

/// Extra mass a cell accepts per cell of water above it.
///
/// Models slight compressibility: deep columns pack more mass into their
/// lower cells, which is what makes water rise back up through a U-bend.
pub const MAX_COMPRESS: f32 = 0.02;

/// Flows above this are halved before being applied.
///
/// Smooths large transfers over several iterations so columns collapse
/// without visible popping.
pub const FLOW_SMOOTHING_THRESHOLD: f32 = 0.1;

/// Hard cap on mass moved across one cell edge in one sub-pass.
pub const MAX_FLOW: f32 = 1.0;

/// Mass written into each open cell touched by the water brush.
pub const BRUSH_WATER_MASS: f32 = 0.5;

/// Default brush radius in cells.
pub const DEFAULT_BRUSH_RADIUS: i32 = 10;

/// Length of one logical simulation step in seconds.
///
/// The simulation advances in fixed steps; a frame runs as many steps as
/// wall-clock time has accumulated, clamped to keep slow frames from
/// spiraling. See [`steps_for_elapsed`].
pub const STEP_SECONDS: f32 = 1.0 / 600.0;

/// Minimum iterations run per tick, even for very short frames.
pub const MIN_STEPS_PER_TICK: usize = 1;

/// Maximum iterations run per tick, even after a long stall.
pub const MAX_STEPS_PER_TICK: usize = 10;

/// Number of flow iterations owed for `seconds` of elapsed wall-clock time,
/// clamped to `[MIN_STEPS_PER_TICK, MAX_STEPS_PER_TICK]`.
///
/// Negative and NaN inputs count as zero elapsed time and yield the
/// minimum.
pub fn steps_for_elapsed(seconds: f32) -> usize {
    ((seconds / STEP_SECONDS) as usize).clamp(MIN_STEPS_PER_TICK, MAX_STEPS_PER_TICK)
}
