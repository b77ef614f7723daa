//! Per-cell mass redistribution rules.
//!
//! Each open cell pushes mass to its four von Neumann neighbors in a fixed
//! order: down (gravity), then left and right (equalization), then up
//! (overflow when compressed past capacity). The kernel is a pure function
//! of the occupancy mask and the committed mass buffer; it never writes.
//! Applying the resulting deltas is the scheduler's job, which is what keeps
//! the parallel story simple.

use crate::grid::Grid;
use crate::physics::{FLOW_SMOOTHING_THRESHOLD, MAX_COMPRESS, MAX_FLOW, MAX_MASS};

/// Neighbor visit order: down, left, right, up.
pub const NEIGHBOR_OFFSETS: [(i32, i32); 4] = [(0, 1), (-1, 0), (1, 0), (0, -1)];

/// Mass leaving one cell during a sub-pass, split by direction.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Outflow {
    /// Mass sent toward each neighbor, indexed like [`NEIGHBOR_OFFSETS`].
    /// Off-grid directions still appear here; that mass drains away.
    pub flows: [f32; 4],
    /// Total mass leaving the cell, including mass lost past the grid edge.
    pub total: f32,
}

/// Mass the lower cell of a vertical pair keeps, given the pair's combined
/// mass.
///
/// Piecewise continuous: up to [`MAX_MASS`] the lower cell keeps everything;
/// while the pair can still absorb compression the split follows a linear
/// blend; past that the excess divides evenly with a [`MAX_COMPRESS`] bias
/// toward the bottom. `stable_state(1.0) == 1.0` and
/// `stable_state(2.0 + MAX_COMPRESS) == 1.0 + MAX_COMPRESS` from both sides.
#[inline]
pub fn stable_state(total: f32) -> f32 {
    if total <= MAX_MASS {
        total
    } else if total < 2.0 * MAX_MASS + MAX_COMPRESS {
        (MAX_MASS * MAX_MASS + total * MAX_COMPRESS) / (MAX_MASS + MAX_COMPRESS)
    } else {
        (total + MAX_COMPRESS) / 2.0
    }
}

/// Computes the outflow of the open cell at `(x, y)` against the committed
/// mass in `current`.
///
/// Solid cells emit nothing. Solid neighbors are skipped; off-grid neighbors
/// read as empty and swallow whatever flows at them. Each candidate flow
/// above [`FLOW_SMOOTHING_THRESHOLD`] is halved, then clamped to
/// `[0, min(MAX_FLOW, remaining)]` so a cell never sends mass it no longer
/// has.
pub fn cell_outflow(grid: &Grid, current: &[f32], x: usize, y: usize) -> Outflow {
    let mut out = Outflow::default();
    if grid.is_solid(x, y) {
        return out;
    }

    let mass = current[grid.cell_index(x, y)];
    let mut remaining = mass;

    for (dir, (dx, dy)) in NEIGHBOR_OFFSETS.iter().enumerate() {
        if remaining <= 0.0 {
            break;
        }
        let nx = x as i32 + dx;
        let ny = y as i32 + dy;
        let edge = !grid.contains(nx, ny);
        if !edge && grid.is_solid(nx as usize, ny as usize) {
            continue;
        }
        let neighbor_mass = if edge {
            0.0
        } else {
            current[grid.cell_index(nx as usize, ny as usize)]
        };

        let mut flow = match dir {
            // Down: fill the cell below to its stable share.
            0 => stable_state(remaining + neighbor_mass) - neighbor_mass,
            // Sideways: quarter of the difference, from the pre-pass mass.
            1 | 2 => (mass - neighbor_mass) / 4.0,
            // Up: shed whatever exceeds this cell's own stable share.
            _ => remaining - stable_state(remaining + neighbor_mass),
        };
        if flow > FLOW_SMOOTHING_THRESHOLD {
            flow *= 0.5;
        }
        flow = flow.clamp(0.0, MAX_FLOW.min(remaining));

        out.flows[dir] = flow;
        out.total += flow;
        remaining -= flow;
    }

    out
}
