//! Interactive circular brush for painting water, walls, and erasure.
//!
//! Brush edits write through to both mass buffers so a stroke is visible to
//! the very next sub-pass and survives the commit at the end of the
//! iteration.

use glam::Vec2;

use crate::grid::Grid;
use crate::mass::MassField;
use crate::physics::{BRUSH_WATER_MASS, DEFAULT_BRUSH_RADIUS};

/// What a brush stroke does to the cells it covers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BrushAction {
    /// Fill open cells with a fixed mass of water. Solid cells are left
    /// alone.
    AddWater,
    /// Turn cells solid, evicting any water they held.
    PlaceWall,
    /// Open cells up, evicting any water they held.
    Erase,
}

impl BrushAction {
    /// Maps a raw pointer-device button code to an action.
    ///
    /// `-1` means nothing is held. Code `1` places walls, `2` erases, and
    /// any other held code paints water. This is the only place device
    /// codes appear; everything else works in terms of [`BrushAction`].
    pub fn from_button(button: i32) -> Option<Self> {
        match button {
            -1 => None,
            1 => Some(BrushAction::PlaceWall),
            2 => Some(BrushAction::Erase),
            _ => Some(BrushAction::AddWater),
        }
    }
}

/// Pointer input, sampled once per tick.
#[derive(Clone, Copy, Debug)]
pub struct PointerState {
    /// Stroke to apply, if any button is held.
    pub action: Option<BrushAction>,
    /// Position normalized to `[0, 1]` over the grid in both axes.
    pub position: Vec2,
    /// Brush radius in cells.
    pub radius: i32,
}

impl PointerState {
    /// Idle pointer. Ticks carrying this state only run flow iterations.
    pub fn idle() -> Self {
        Self {
            action: None,
            position: Vec2::ZERO,
            radius: DEFAULT_BRUSH_RADIUS,
        }
    }

    /// Pointer held at normalized `position` with the given action.
    pub fn held(action: BrushAction, position: Vec2) -> Self {
        Self {
            action: Some(action),
            position,
            radius: DEFAULT_BRUSH_RADIUS,
        }
    }

    pub fn with_radius(mut self, radius: i32) -> Self {
        self.radius = radius;
        self
    }
}

impl Default for PointerState {
    fn default() -> Self {
        Self::idle()
    }
}

/// Stamps the brush onto the grid.
///
/// The center cell is `floor(position * dims)`; the stroke covers every
/// in-grid cell whose center distance to the brush center is strictly less
/// than the radius. Strokes hanging past the boundary are clipped, and a
/// position at or past `1.0` simply centers the brush off-grid.
pub fn apply(grid: &mut Grid, mass: &mut MassField, pointer: &PointerState) {
    let Some(action) = pointer.action else {
        return;
    };
    let center_x = (pointer.position.x * grid.width as f32).floor() as i32;
    let center_y = (pointer.position.y * grid.height as f32).floor() as i32;
    let radius = pointer.radius;

    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if Vec2::new(dx as f32, dy as f32).length() >= radius as f32 {
                continue;
            }
            let (x, y) = (center_x + dx, center_y + dy);
            if !grid.contains(x, y) {
                continue;
            }
            let (x, y) = (x as usize, y as usize);
            let idx = grid.cell_index(x, y);
            match action {
                BrushAction::AddWater => {
                    if grid.is_open(x, y) {
                        mass.set_both(idx, BRUSH_WATER_MASS);
                    }
                }
                BrushAction::PlaceWall => {
                    grid.set_solid(x, y, 1.0);
                    mass.set_both(idx, 0.0);
                }
                BrushAction::Erase => {
                    grid.clear_solid(x, y);
                    mass.set_both(idx, 0.0);
                }
            }
        }
    }
}
