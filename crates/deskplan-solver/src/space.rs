//! The decision space: one boolean decision per (worker, day, shift,
//! location) tuple, addressed through a fixed index bijection.
//!
//! Every array in the pipeline (availability, solved assignments, solver
//! variables) shares this ordering, so an index computed here is valid
//! everywhere downstream.

use deskplan_core::Dimensions;

/// A slot in the decision space.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SlotId {
    pub worker: usize,
    pub day: usize,
    pub shift: usize,
    pub location: usize,
}

/// Index bijection over the four scheduling axes.
///
/// The flat order is worker-major: `((w * D + d) * S + s) * L + l`. This is
/// the same order `Availability` and `AssignmentGrid` use.
#[derive(Clone, Copy, Debug)]
pub struct DecisionSpace {
    dims: Dimensions,
}

impl DecisionSpace {
    /// Builds the bijection. Dimensions come from an already-validated
    /// configuration; a zero axis would make every stride degenerate.
    pub fn new(dims: Dimensions) -> Self {
        debug_assert!(
            dims.workers > 0 && dims.days > 0 && dims.shifts > 0 && dims.locations > 0,
            "decision space requires positive dimensions"
        );
        Self { dims }
    }

    pub fn dims(&self) -> Dimensions {
        self.dims
    }

    /// Number of decision variables.
    pub fn len(&self) -> usize {
        self.dims.cardinality()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn index(&self, worker: usize, day: usize, shift: usize, location: usize) -> usize {
        debug_assert!(worker < self.dims.workers);
        debug_assert!(day < self.dims.days);
        debug_assert!(shift < self.dims.shifts);
        debug_assert!(location < self.dims.locations);
        ((worker * self.dims.days + day) * self.dims.shifts + shift) * self.dims.locations
            + location
    }

    pub fn slot(&self, index: usize) -> SlotId {
        let location = index % self.dims.locations;
        let rest = index / self.dims.locations;
        let shift = rest % self.dims.shifts;
        let rest = rest / self.dims.shifts;
        let day = rest % self.dims.days;
        let worker = rest / self.dims.days;
        SlotId {
            worker,
            day,
            shift,
            location,
        }
    }

    /// All slots in flat order.
    pub fn iter(&self) -> impl Iterator<Item = SlotId> + '_ {
        (0..self.len()).map(|i| self.slot(i))
    }
}
