//! Double-buffered water mass storage.
//!
//! Flow iterations read committed mass while accumulating signed deltas into
//! a staging buffer, then publish the staged values in one step. Keeping the
//! pair inside one type makes the read/write split explicit instead of
//! relying on callers to juggle two loose buffers.

/// Committed and staged mass, one `f32` per cell, row-major.
///
/// Outside an iteration the two buffers are identical: edits write both, and
/// [`commit`](MassField::commit) republishes the staged buffer after the
/// sub-passes of an iteration have applied their deltas. Because of this the
/// staging buffer never needs an explicit copy-forward at iteration start.
pub struct MassField {
    current: Vec<f32>,
    staged: Vec<f32>,
}

impl MassField {
    /// All-empty field of `cell_count` cells.
    pub fn new(cell_count: usize) -> Self {
        Self {
            current: vec![0.0; cell_count],
            staged: vec![0.0; cell_count],
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.current.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    /// Committed mass at `idx`.
    #[inline]
    pub fn get(&self, idx: usize) -> f32 {
        self.current[idx]
    }

    /// Writes `mass` to both buffers.
    ///
    /// Used by edits that must survive the next commit and be visible to the
    /// very next sub-pass (brush strokes, terrain seeding, test setup).
    #[inline]
    pub fn set_both(&mut self, idx: usize, mass: f32) {
        self.current[idx] = mass;
        self.staged[idx] = mass;
    }

    /// Committed mass, whole grid.
    #[inline]
    pub fn current(&self) -> &[f32] {
        &self.current
    }

    /// Read view of committed mass plus the writable staging buffer.
    ///
    /// This is the only mutable path into staged mass, so a sub-pass cannot
    /// accidentally write the buffer it is reading.
    #[inline]
    pub(crate) fn split(&mut self) -> (&[f32], &mut [f32]) {
        (&self.current, &mut self.staged)
    }

    /// Publishes staged mass as the new committed state.
    pub fn commit(&mut self) {
        self.current.copy_from_slice(&self.staged);
    }

    /// Sum of committed mass. Diagnostic; conservation checks live on this.
    pub fn total(&self) -> f32 {
        self.current.iter().sum()
    }
}
