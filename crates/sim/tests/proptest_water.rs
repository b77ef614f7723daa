//! Property-based tests for the water grid using proptest
//!
//! These check physics invariants across random worlds:
//! - Mass stays finite and nonnegative
//! - Solid cells never accumulate mass
//! - Sealed containers conserve total mass
//! - Evolution is deterministic for identical inputs

use proptest::prelude::*;
use sim::{PointerState, StaggeredScheduler, WaterSimulation};

const STEPS: usize = 15;
const WORKER_THREADS: usize = 2;

/// Random world: dimensions, wall pattern, initial water.
fn arb_world() -> impl Strategy<Value = (usize, usize, Vec<bool>, Vec<f32>)> {
    (4usize..14, 4usize..14).prop_flat_map(|(w, h)| {
        let cells = w * h;
        (
            Just(w),
            Just(h),
            prop::collection::vec(prop::bool::weighted(0.15), cells),
            prop::collection::vec(0.0f32..1.5, cells),
        )
    })
}

fn build_world(
    width: usize,
    height: usize,
    walls: &[bool],
    masses: &[f32],
    sealed: bool,
) -> WaterSimulation {
    let scheduler = StaggeredScheduler::with_threads(WORKER_THREADS).unwrap();
    let mut sim = WaterSimulation::with_scheduler(width, height, scheduler);
    for y in 0..height {
        for x in 0..width {
            let idx = y * width + x;
            let rim = x == 0 || y == 0 || x == width - 1 || y == height - 1;
            if (sealed && rim) || walls[idx] {
                sim.grid.set_solid(x, y, 1.0);
            } else {
                sim.set_mass(x, y, masses[idx]);
            }
        }
    }
    sim
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// Mass must stay finite and nonnegative, and walls must stay dry, no
    /// matter the world.
    #[test]
    fn mass_stays_sane((width, height, walls, masses) in arb_world()) {
        let mut sim = build_world(width, height, &walls, &masses, false);
        for _ in 0..STEPS {
            sim.tick(1, &PointerState::idle());
        }

        for y in 0..height {
            for x in 0..width {
                let m = sim.mass_at(x, y);
                prop_assert!(m.is_finite(), "cell ({}, {}) non-finite", x, y);
                prop_assert!(m >= 0.0, "cell ({}, {}) negative: {}", x, y, m);
                if sim.occupancy_at(x, y) > 0.0 {
                    prop_assert!(m == 0.0, "solid cell ({}, {}) holds {}", x, y, m);
                }
            }
        }
    }

    /// With a sealed rim, flow only shuffles mass around.
    #[test]
    fn sealed_worlds_conserve_mass((width, height, walls, masses) in arb_world()) {
        let mut sim = build_world(width, height, &walls, &masses, true);
        let before = sim.total_mass();

        for _ in 0..STEPS {
            sim.tick(1, &PointerState::idle());
        }

        let after = sim.total_mass();
        prop_assert!(
            (after - before).abs() <= before * 0.01 + 1e-3,
            "sealed world leaked: {} -> {}",
            before,
            after
        );
    }

    /// The same world evolved twice gives bit-identical results.
    #[test]
    fn evolution_is_deterministic((width, height, walls, masses) in arb_world()) {
        let mut a = build_world(width, height, &walls, &masses, false);
        let mut b = build_world(width, height, &walls, &masses, false);

        for _ in 0..STEPS {
            a.tick(1, &PointerState::idle());
            b.tick(1, &PointerState::idle());
        }

        prop_assert!(
            a.mass.current() == b.mass.current(),
            "identical worlds diverged"
        );
    }
}
