//! Terrain Rain Pooling
//!
//! Seeds rocky terrain from fractal noise, rains water onto it with the
//! brush at random positions, then lets everything settle and shows where
//! it pooled.
//! Run with: cargo run --release --example terrain_pool -p sim

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sim::{BrushAction, FbmTerrain, PointerState, WaterSimulation};

const WIDTH: usize = 64;
const HEIGHT: usize = 32;
const SEED: u32 = 7;
const RAIN_FRAMES: usize = 150;
const SETTLE_FRAMES: usize = 300;

fn main() {
    env_logger::init();

    let mut sim = WaterSimulation::new(WIDTH, HEIGHT).expect("worker pool");
    // The default frequency suits huge grids; a small demo grid needs
    // coarser features to get pockets worth pooling in.
    let terrain = FbmTerrain::new(SEED).with_frequency(0.05);
    sim.seed_terrain(&terrain);

    let solid = sim.grid.occupancy.iter().filter(|&&o| o > 0.0).count();
    println!("=== Terrain Rain Pooling ===");
    println!("{WIDTH}x{HEIGHT}, seed {SEED}: {solid} solid cells\n");

    let mut rng = ChaCha8Rng::seed_from_u64(SEED as u64);
    for frame in 0..RAIN_FRAMES {
        let x = rng.gen_range(0.1f32..0.9);
        let drop = PointerState::held(BrushAction::AddWater, Vec2::new(x, 0.08)).with_radius(2);
        sim.tick(10, &drop);

        if frame % 50 == 49 {
            println!(
                "rained {:3} frames, total mass {:7.2}",
                frame + 1,
                sim.total_mass()
            );
        }
    }

    for _ in 0..SETTLE_FRAMES {
        sim.tick(10, &PointerState::idle());
    }

    println!(
        "\nafter settling: total mass {:.2} (the rest drained off-grid)",
        sim.total_mass()
    );
    println!("('#' water, 'X' rock):");
    render(&sim);
}

fn render(sim: &WaterSimulation) {
    for y in 0..sim.height() {
        let mut row = String::with_capacity(sim.width());
        for x in 0..sim.width() {
            let c = if sim.occupancy_at(x, y) > 0.0 {
                'X'
            } else if sim.mass_at(x, y) > 0.05 {
                '#'
            } else {
                ' '
            };
            row.push(c);
        }
        println!("{row}");
    }
}
