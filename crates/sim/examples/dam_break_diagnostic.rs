//! Dam Break Diagnostic
//!
//! Releases a full-height water column inside a sealed box and tracks how
//! it collapses and levels out, frame by frame.
//! Run with: cargo run --release --example dam_break_diagnostic -p sim

use sim::{steps_for_elapsed, PointerState, WaterSimulation};

const WIDTH: usize = 48;
const HEIGHT: usize = 24;
const FRAMES: usize = 240;
// Simulate at a fixed 60 Hz frame cadence.
const FRAME_SECONDS: f32 = 1.0 / 60.0;

fn main() {
    env_logger::init();

    let mut sim = WaterSimulation::new(WIDTH, HEIGHT).expect("worker pool");

    // Sealed box so the run doubles as a conservation check.
    for x in 0..WIDTH {
        sim.grid.set_solid(x, 0, 1.0);
        sim.grid.set_solid(x, HEIGHT - 1, 1.0);
    }
    for y in 0..HEIGHT {
        sim.grid.set_solid(0, y, 1.0);
        sim.grid.set_solid(WIDTH - 1, y, 1.0);
    }

    // Dam: water column against the left wall.
    for y in 1..HEIGHT - 1 {
        for x in 1..9 {
            sim.set_mass(x, y, 1.0);
        }
    }

    let initial = sim.total_mass();
    println!("=== Dam Break Diagnostic ===");
    println!(
        "{WIDTH}x{HEIGHT} box, {} workers, initial mass {initial:.3}\n",
        sim.threads()
    );

    let iterations = steps_for_elapsed(FRAME_SECONDS);
    for frame in 0..FRAMES {
        sim.tick(iterations, &PointerState::idle());

        if frame % 24 == 0 || frame == FRAMES - 1 {
            let (front, surface) = wavefront(&sim);
            println!(
                "frame {frame:3}: total {:8.3}  wavefront x={front:2}  surface y={surface:2}",
                sim.total_mass()
            );
        }
    }

    println!("\nfinal state ('#' deep, '~' shallow, 'X' solid):");
    render(&sim);

    let drift = (sim.total_mass() - initial).abs() / initial;
    println!("\nmass drift over the run: {:.4}%", drift * 100.0);
}

/// Rightmost wet column and highest wet row, ignoring films under 0.05.
fn wavefront(sim: &WaterSimulation) -> (usize, usize) {
    let mut front = 0;
    let mut surface = sim.height();
    for y in 0..sim.height() {
        for x in 0..sim.width() {
            if sim.mass_at(x, y) > 0.05 {
                front = front.max(x);
                surface = surface.min(y);
            }
        }
    }
    (front, surface)
}

fn render(sim: &WaterSimulation) {
    for y in 0..sim.height() {
        let mut row = String::with_capacity(sim.width());
        for x in 0..sim.width() {
            let c = if sim.occupancy_at(x, y) > 0.0 {
                'X'
            } else {
                match sim.mass_at(x, y) {
                    m if m > 0.5 => '#',
                    m if m > 0.05 => '~',
                    _ => ' ',
                }
            };
            row.push(c);
        }
        println!("{row}");
    }
}
