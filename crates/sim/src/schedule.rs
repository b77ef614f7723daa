//! Staggered parallel execution of flow iterations.
//!
//! One iteration runs nine sub-passes, one per stride-3 offset class, then
//! commits the staged mass. Cells of one class sit at least three cells
//! apart along each axis, so their write footprints (the cell plus its four
//! neighbors) never touch. That lets a sub-pass fan out across worker
//! threads without locks: the staging buffer is carved into disjoint
//! mutable row bands, one per class row, and each band is handed to exactly
//! one task. The carving is done with `split_at_mut`, so handing two tasks
//! overlapping memory is not expressible.
//!
//! Every sub-pass of an iteration reads the same committed buffer, and each
//! staged slot is written by at most one task per sub-pass, in a fixed
//! order, so results are bit-identical however many threads the pool runs.

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::error::SimResult;
use crate::flow::{self, NEIGHBOR_OFFSETS};
use crate::grid::Grid;
use crate::mass::MassField;

/// One of the nine stride-3 offset classes.
///
/// A cell `(x, y)` belongs to the class `(x % 3, y % 3)`; the nine classes
/// partition the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OffsetClass {
    pub ox: usize,
    pub oy: usize,
}

impl OffsetClass {
    pub const COUNT: usize = 9;

    /// All nine classes in dispatch order, row offset outermost.
    ///
    /// The order is fixed for reproducibility; the physics does not depend
    /// on it.
    pub fn dispatch_order() -> impl Iterator<Item = OffsetClass> {
        (0..3).flat_map(|oy| (0..3).map(move |ox| OffsetClass { ox, oy }))
    }

    /// True when `(x, y)` belongs to this class.
    #[inline]
    pub fn contains(self, x: usize, y: usize) -> bool {
        x % 3 == self.ox && y % 3 == self.oy
    }
}

/// The slice of the staging buffer one class row may write.
///
/// Covers the class row plus the rows directly above and below it, clamped
/// to the grid. Class rows are three apart, so the bands of one sub-pass
/// never overlap.
struct RowBand<'a> {
    /// Class row served by this band.
    y: usize,
    /// Grid row of the band's first slot.
    first_row: usize,
    width: usize,
    cells: &'a mut [f32],
}

impl RowBand<'_> {
    #[inline]
    fn add(&mut self, x: usize, y: usize, delta: f32) {
        debug_assert!(y >= self.first_row && x < self.width);
        self.cells[(y - self.first_row) * self.width + x] += delta;
    }
}

/// Splits `staged` into disjoint row bands for the class rows of `oy`.
fn carve_bands(staged: &mut [f32], width: usize, height: usize, oy: usize) -> Vec<RowBand<'_>> {
    let mut bands = Vec::with_capacity(height / 3 + 1);
    let mut rest = staged;
    let mut consumed = 0;

    let mut y = oy;
    while y < height {
        let lo = y.saturating_sub(1).max(consumed);
        let hi = (y + 1).min(height - 1);
        let tail = std::mem::take(&mut rest);
        let (_, tail) = tail.split_at_mut((lo - consumed) * width);
        let (cells, tail) = tail.split_at_mut((hi - lo + 1) * width);
        rest = tail;
        consumed = hi + 1;
        bands.push(RowBand {
            y,
            first_row: lo,
            width,
            cells,
        });
        y += 3;
    }

    bands
}

/// Applies the outflow of every cell of one class row into the row's band.
///
/// Debits are applied per direction, in the same order the kernel computed
/// them. The staged slot then goes through the exact rounding sequence the
/// kernel's `remaining` went through, so it cannot end up negative.
fn update_class_row(grid: &Grid, current: &[f32], band: &mut RowBand<'_>, ox: usize) {
    let y = band.y;
    for x in (ox..grid.width).step_by(3) {
        let out = flow::cell_outflow(grid, current, x, y);
        if out.total <= 0.0 {
            continue;
        }
        for (dir, (dx, dy)) in NEIGHBOR_OFFSETS.iter().enumerate() {
            let flow = out.flows[dir];
            if flow <= 0.0 {
                continue;
            }
            band.add(x, y, -flow);
            let nx = x as i32 + dx;
            let ny = y as i32 + dy;
            // Flow at the boundary was debited but drains off-grid.
            if grid.contains(nx, ny) {
                band.add(nx as usize, ny as usize, flow);
            }
        }
    }
}

/// Drives flow iterations across an owned worker pool.
pub struct StaggeredScheduler {
    pool: ThreadPool,
}

impl StaggeredScheduler {
    /// Scheduler on its own worker pool, one worker per logical core.
    pub fn new() -> SimResult<Self> {
        Self::with_threads(0)
    }

    /// Scheduler with an explicit worker count; `0` means rayon's default.
    ///
    /// Fails if the pool cannot be brought up, which is the only fallible
    /// step anywhere in the simulation.
    pub fn with_threads(threads: usize) -> SimResult<Self> {
        let pool = ThreadPoolBuilder::new().num_threads(threads).build()?;
        Ok(Self { pool })
    }

    /// Worker count, for diagnostics.
    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Runs one full iteration: nine staggered sub-passes, then a commit.
    pub fn run_iteration(&self, grid: &Grid, mass: &mut MassField) {
        debug_assert_eq!(mass.len(), grid.width * grid.height);
        for class in OffsetClass::dispatch_order() {
            self.run_sub_pass(grid, mass, class);
        }
        mass.commit();
    }

    fn run_sub_pass(&self, grid: &Grid, mass: &mut MassField, class: OffsetClass) {
        let (current, staged) = mass.split();
        let bands = carve_bands(staged, grid.width, grid.height, class.oy);
        self.pool.install(|| {
            bands
                .into_par_iter()
                .for_each(|mut band| update_class_row(grid, current, &mut band, class.ox));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classes_partition_the_grid() {
        assert_eq!(OffsetClass::dispatch_order().count(), OffsetClass::COUNT);
        let (width, height) = (7, 5);
        for y in 0..height {
            for x in 0..width {
                let owners = OffsetClass::dispatch_order()
                    .filter(|class| class.contains(x, y))
                    .count();
                assert_eq!(owners, 1, "cell ({x}, {y}) owned by {owners} classes");
            }
        }
    }

    #[test]
    fn same_class_cells_are_never_neighbors() {
        let (width, height) = (6, 6);
        for class in OffsetClass::dispatch_order() {
            let cells: Vec<(usize, usize)> = (0..height)
                .flat_map(|y| (0..width).map(move |x| (x, y)))
                .filter(|&(x, y)| class.contains(x, y))
                .collect();
            for &(ax, ay) in &cells {
                for &(bx, by) in &cells {
                    if (ax, ay) == (bx, by) {
                        continue;
                    }
                    let dist = ax.abs_diff(bx) + ay.abs_diff(by);
                    assert!(
                        dist > 1,
                        "class ({}, {}) cells ({ax}, {ay}) and ({bx}, {by}) are adjacent",
                        class.ox,
                        class.oy
                    );
                }
            }
        }
    }

    #[test]
    fn bands_cover_exactly_the_writable_rows() {
        let (width, height) = (4, 10);
        for oy in 0..3 {
            let mut staged = vec![0.0_f32; width * height];
            let mut covered = vec![false; height];

            let bands = carve_bands(&mut staged, width, height, oy);
            let mut prev_end = 0;
            for band in &bands {
                let rows = band.cells.len() / width;
                assert_eq!(band.cells.len() % width, 0);
                // Band holds its class row and nothing beyond one row around it.
                assert!(band.first_row <= band.y && band.y < band.first_row + rows);
                assert!(band.first_row + rows <= band.y + 2);
                // Bands appear in order without overlap.
                assert!(band.first_row >= prev_end, "band rows overlap");
                prev_end = band.first_row + rows;
                for row in band.first_row..band.first_row + rows {
                    covered[row] = true;
                }
            }

            for y in (oy..height).step_by(3) {
                assert!(covered[y], "class row {y} not writable");
                if y > 0 {
                    assert!(covered[y - 1], "row above class row {y} not writable");
                }
                if y + 1 < height {
                    assert!(covered[y + 1], "row below class row {y} not writable");
                }
            }
        }
    }

    #[test]
    fn band_writes_land_in_the_right_slots() {
        let (width, height) = (3, 7);
        let mut staged = vec![0.0_f32; width * height];
        let mut bands = carve_bands(&mut staged, width, height, 1);
        for band in &mut bands {
            band.add(2, band.y, 1.0);
            band.add(0, band.y - 1, 0.5);
        }
        drop(bands);
        assert_eq!(staged[width + 2], 1.0);
        assert_eq!(staged[0], 0.5);
        assert_eq!(staged[4 * width + 2], 1.0);
        assert_eq!(staged[3 * width], 0.5);
    }

    #[test]
    fn iteration_matches_serial_reference() {
        let grid = seeded_grid();
        let mut reference = seeded_mass(&grid);
        serial_iteration(&grid, &mut reference);

        let scheduler = StaggeredScheduler::with_threads(4).unwrap();
        let mut mass = seeded_mass(&grid);
        scheduler.run_iteration(&grid, &mut mass);

        for idx in 0..mass.len() {
            assert_eq!(
                mass.get(idx),
                reference.get(idx),
                "cell {idx} diverged from the serial reference"
            );
        }
    }

    #[test]
    fn thread_count_does_not_change_results() {
        let grid = seeded_grid();
        let one = StaggeredScheduler::with_threads(1).unwrap();
        let many = StaggeredScheduler::with_threads(3).unwrap();

        let mut a = seeded_mass(&grid);
        let mut b = seeded_mass(&grid);
        for _ in 0..20 {
            one.run_iteration(&grid, &mut a);
            many.run_iteration(&grid, &mut b);
        }

        for idx in 0..a.len() {
            assert_eq!(a.get(idx), b.get(idx), "cell {idx} depends on thread count");
        }
    }

    #[test]
    fn degenerate_grids_schedule_cleanly() {
        let scheduler = StaggeredScheduler::with_threads(2).unwrap();
        for (width, height) in [(1, 1), (2, 2), (4, 1), (1, 5)] {
            let grid = Grid::new(width, height);
            let mut mass = MassField::new(width * height);
            for idx in 0..mass.len() {
                mass.set_both(idx, 0.8);
            }
            for _ in 0..5 {
                scheduler.run_iteration(&grid, &mut mass);
            }
            for idx in 0..mass.len() {
                assert!(mass.get(idx).is_finite());
                assert!(mass.get(idx) >= 0.0);
            }
        }
    }

    fn seeded_grid() -> Grid {
        let mut grid = Grid::new(7, 6);
        grid.set_solid(2, 3, 1.0);
        grid.set_solid(3, 3, 1.0);
        grid.set_solid(5, 1, 1.0);
        grid
    }

    fn seeded_mass(grid: &Grid) -> MassField {
        let mut mass = MassField::new(grid.width * grid.height);
        for y in 0..grid.height {
            for x in 0..grid.width {
                if grid.is_open(x, y) {
                    let idx = grid.cell_index(x, y);
                    mass.set_both(idx, ((idx % 5) as f32) * 0.3);
                }
            }
        }
        mass
    }

    fn serial_iteration(grid: &Grid, mass: &mut MassField) {
        let (current, staged) = mass.split();
        for class in OffsetClass::dispatch_order() {
            for y in (class.oy..grid.height).step_by(3) {
                for x in (class.ox..grid.width).step_by(3) {
                    let out = flow::cell_outflow(grid, current, x, y);
                    for (dir, (dx, dy)) in NEIGHBOR_OFFSETS.iter().enumerate() {
                        let flow = out.flows[dir];
                        if flow <= 0.0 {
                            continue;
                        }
                        staged[grid.cell_index(x, y)] -= flow;
                        let nx = x as i32 + dx;
                        let ny = y as i32 + dy;
                        if grid.contains(nx, ny) {
                            staged[grid.cell_index(nx as usize, ny as usize)] += flow;
                        }
                    }
                }
            }
        }
        mass.commit();
    }
}
