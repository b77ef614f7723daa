//! Water Grid Profiler
//!
//! Measures flow-iteration throughput across grid sizes and worker counts.
//! Run with: cargo run --release --example profile -p sim

use std::time::Instant;

use sim::{PointerState, StaggeredScheduler, WaterSimulation};

const WARMUP: usize = 30;
const FRAMES: usize = 200;

fn main() {
    println!("=== Water Grid Profiler ===\n");

    for &(width, height) in &[(128, 64), (256, 128), (512, 256)] {
        for &threads in &[1, 2, 4] {
            profile_at(width, height, threads);
        }
        println!();
    }
}

fn profile_at(width: usize, height: usize, threads: usize) {
    let scheduler = StaggeredScheduler::with_threads(threads).expect("worker pool");
    let mut sim = WaterSimulation::with_scheduler(width, height, scheduler);

    // Floor plus a broad sheet of water that keeps every class busy.
    for x in 0..width {
        sim.grid.set_solid(x, height - 1, 1.0);
    }
    for y in height / 4..height / 2 {
        for x in width / 8..width * 7 / 8 {
            sim.set_mass(x, y, 0.9);
        }
    }

    for _ in 0..WARMUP {
        sim.tick(1, &PointerState::idle());
    }

    let start = Instant::now();
    for _ in 0..FRAMES {
        sim.tick(1, &PointerState::idle());
    }
    let per_iter = start.elapsed().as_secs_f64() / FRAMES as f64;

    let mcells = (width * height) as f64 / per_iter / 1e6;
    println!(
        "{width:4}x{height:<4} {threads} workers: {:8.3} ms/iteration  {mcells:7.1} Mcells/s",
        per_iter * 1e3
    );
}
