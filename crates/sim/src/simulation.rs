//! Top-level simulation facade.
//!
//! Owns the grid, the mass buffers, and the scheduler, and exposes the one
//! entry point frontends drive: [`WaterSimulation::tick`]. Everything is
//! sized at construction; there is no global state anywhere in the crate.

use log::debug;

use crate::brush::{self, PointerState};
use crate::error::SimResult;
use crate::grid::Grid;
use crate::mass::MassField;
use crate::schedule::StaggeredScheduler;
use crate::terrain::{OccupancySource, BASE_OCCUPANCY, SOLID_THRESHOLD};

/// Cellular water simulation over a fixed-size grid.
pub struct WaterSimulation {
    pub grid: Grid,
    pub mass: MassField,
    scheduler: StaggeredScheduler,
}

impl WaterSimulation {
    /// Simulation with its own worker pool.
    ///
    /// Panics if either dimension is zero (a caller bug, same contract as
    /// [`Grid::new`]). Returns an error only if the worker pool cannot be
    /// brought up; after construction, ticking is infallible.
    pub fn new(width: usize, height: usize) -> SimResult<Self> {
        Ok(Self::with_scheduler(width, height, StaggeredScheduler::new()?))
    }

    /// Simulation on a caller-supplied scheduler.
    ///
    /// Useful for pinning the worker count or sharing a pool configuration
    /// across side-by-side simulations.
    pub fn with_scheduler(width: usize, height: usize, scheduler: StaggeredScheduler) -> Self {
        let grid = Grid::new(width, height);
        let mass = MassField::new(width * height);
        debug!(
            "water simulation {width}x{height} on {} workers",
            scheduler.threads()
        );
        Self {
            grid,
            mass,
            scheduler,
        }
    }

    /// One frame: apply the brush if the pointer is held, then run
    /// `iterations` flow iterations.
    ///
    /// `iterations` is taken as already clamped to the frame budget (see
    /// [`crate::physics::steps_for_elapsed`]). Zero iterations is a valid
    /// no-op for the flow phase; a held brush still lands.
    pub fn tick(&mut self, iterations: usize, pointer: &PointerState) {
        if pointer.action.is_some() {
            brush::apply(&mut self.grid, &mut self.mass, pointer);
        }
        for _ in 0..iterations {
            self.scheduler.run_iteration(&self.grid, &mut self.mass);
        }
    }

    /// Replaces the occupancy mask from a terrain source.
    ///
    /// Cells sampling above [`SOLID_THRESHOLD`] turn solid with occupancy
    /// `BASE_OCCUPANCY + sample` and lose any water they held; all other
    /// cells open up and keep theirs.
    pub fn seed_terrain(&mut self, source: &impl OccupancySource) {
        let mut solid_cells = 0usize;
        for y in 0..self.grid.height {
            for x in 0..self.grid.width {
                let idx = self.grid.cell_index(x, y);
                let sample = source.sample(x, y);
                if sample > SOLID_THRESHOLD {
                    self.grid.occupancy[idx] = BASE_OCCUPANCY + sample;
                    self.mass.set_both(idx, 0.0);
                    solid_cells += 1;
                } else {
                    self.grid.occupancy[idx] = 0.0;
                }
            }
        }
        debug!(
            "seeded terrain: {solid_cells}/{} cells solid",
            self.grid.width * self.grid.height
        );
    }

    /// Places water directly, bypassing the brush. Ignored on solid cells.
    ///
    /// Writes both buffers, so the water is immediately live. Meant for
    /// scenario setup in tests, examples, and tools.
    pub fn set_mass(&mut self, x: usize, y: usize, mass: f32) {
        if self.grid.is_open(x, y) {
            let idx = self.grid.cell_index(x, y);
            self.mass.set_both(idx, mass);
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.grid.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.grid.height
    }

    /// Committed water mass at `(x, y)`.
    #[inline]
    pub fn mass_at(&self, x: usize, y: usize) -> f32 {
        self.mass.get(self.grid.cell_index(x, y))
    }

    /// Occupancy at `(x, y)`: `0.0` open, above that solid.
    #[inline]
    pub fn occupancy_at(&self, x: usize, y: usize) -> f32 {
        self.grid.occupancy[self.grid.cell_index(x, y)]
    }

    /// Sum of all committed water mass.
    pub fn total_mass(&self) -> f32 {
        self.mass.total()
    }

    /// Worker count of the owned scheduler, for diagnostics.
    pub fn threads(&self) -> usize {
        self.scheduler.threads()
    }
}
