//! Error types for simulator construction.
//!
//! A running simulation is infallible: every tick operates on buffers sized
//! at construction. The only recoverable failure is bringing up the worker
//! pool, which is reported before the first tick rather than mid-frame.

use thiserror::Error;

/// Result alias used across the crate.
pub type SimResult<T> = Result<T, SimError>;

/// Errors surfaced while building a simulator.
#[derive(Debug, Error)]
pub enum SimError {
    /// The rayon worker pool could not be constructed.
    #[error("worker pool unavailable: {0}")]
    Backend(#[from] rayon::ThreadPoolBuildError),
}
