//! Simulation grid and the solid occupancy mask.
//!
//! Cells are addressed row-major with `x` growing rightward and `y` growing
//! downward, so gravity pulls toward +y. The boundary is open: there are no
//! implicit walls at the edges, and water that flows past them leaves the
//! simulation.

/// Rectangular cell grid with a per-cell occupancy mask.
///
/// Occupancy is stored as `f32`: `0.0` is open, anything greater is solid.
/// Brush walls write exactly `1.0`; seeded terrain stores `0.9 + noise` so
/// the mask doubles as a shading weight for frontends.
pub struct Grid {
    pub width: usize,
    pub height: usize,
    /// Occupancy per cell, row-major. `0.0` = open, `> 0.0` = solid.
    pub occupancy: Vec<f32>,
}

impl Grid {
    /// Creates an all-open grid.
    ///
    /// Panics if either dimension is zero; sizing is fixed for the grid's
    /// lifetime and a degenerate grid is a caller bug, not a runtime state.
    pub fn new(width: usize, height: usize) -> Self {
        assert!(
            width > 0 && height > 0,
            "grid dimensions must be nonzero, got {width}x{height}"
        );
        Self {
            width,
            height,
            occupancy: vec![0.0; width * height],
        }
    }

    #[inline]
    pub fn cell_index(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.width && y < self.height);
        y * self.width + x
    }

    /// True when `(x, y)` lies inside the grid.
    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// Solid check for in-bounds coordinates.
    ///
    /// Out-of-bounds cells are neither solid nor open here; they are the open
    /// boundary, and callers handle the edge before asking about solidity.
    #[inline]
    pub fn is_solid(&self, x: usize, y: usize) -> bool {
        self.occupancy[self.cell_index(x, y)] > 0.0
    }

    #[inline]
    pub fn is_open(&self, x: usize, y: usize) -> bool {
        !self.is_solid(x, y)
    }

    /// Marks a cell solid with the given occupancy value (must be positive).
    ///
    /// Solid cells must carry zero mass; the brush and terrain seeding clear
    /// the mass buffers alongside this call.
    #[inline]
    pub fn set_solid(&mut self, x: usize, y: usize, occupancy: f32) {
        debug_assert!(occupancy > 0.0);
        let idx = self.cell_index(x, y);
        self.occupancy[idx] = occupancy;
    }

    /// Opens a cell.
    #[inline]
    pub fn clear_solid(&mut self, x: usize, y: usize) {
        let idx = self.cell_index(x, y);
        self.occupancy[idx] = 0.0;
    }
}
