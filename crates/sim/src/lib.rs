//! 2D cellular water simulation.
//!
//! Water is a per-cell mass on a rectangular grid; a separate occupancy
//! mask marks solid terrain. Every iteration, each open cell pushes mass to
//! its four neighbors (down under gravity, sideways to equalize, up when
//! compressed past capacity), scheduled over nine staggered offset classes
//! so the whole grid updates in parallel without write conflicts. An
//! interactive brush paints water, walls, and erasure.
//!
//! This crate is framework-agnostic - it handles simulation only. Rendering
//! and input-device handling belong to frontends; the brush takes an
//! already-decoded [`BrushAction`], and [`BrushAction::from_button`] is the
//! single place raw button codes are interpreted.
//!
//! # Example
//!
//! ```
//! use glam::Vec2;
//! use sim::{BrushAction, PointerState, WaterSimulation};
//!
//! let mut sim = WaterSimulation::new(64, 48).expect("worker pool");
//!
//! // Paint a blob of water near the top and let it fall for a few frames.
//! let stroke = PointerState::held(BrushAction::AddWater, Vec2::new(0.5, 0.25));
//! sim.tick(1, &stroke);
//! for _ in 0..10 {
//!     sim.tick(1, &PointerState::idle());
//! }
//! assert!(sim.total_mass() > 0.0);
//! ```

pub mod brush;
pub mod error;
pub mod flow;
pub mod grid;
pub mod mass;
pub mod physics;
pub mod schedule;
pub mod simulation;
pub mod terrain;

pub use brush::{BrushAction, PointerState};
pub use error::{SimError, SimResult};
pub use grid::Grid;
pub use mass::MassField;
pub use physics::steps_for_elapsed;
pub use schedule::{OffsetClass, StaggeredScheduler};
pub use simulation::WaterSimulation;
pub use terrain::{FbmTerrain, OccupancySource};
