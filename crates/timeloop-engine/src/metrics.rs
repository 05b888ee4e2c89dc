//! Per-tick reports from the time-loop controller.
//!
//! [`TickReport`] summarises one call to
//! [`TimeLoopController::tick`](crate::TimeLoopController::tick): which
//! pass ran, how many actors it touched, and which of them had nothing
//! left to rewind.

use smallvec::SmallVec;
use timeloop_core::{ActorId, TickId};

/// Which pass a tick ran.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TickMode {
    /// Behaviors updated, then every registered actor recorded.
    #[default]
    Record,
    /// Every registered actor popped and restored one snapshot.
    Rewind,
}

/// Summary of a single controller tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickReport {
    /// Loop position after this tick.
    pub tick: TickId,
    /// The pass that ran.
    pub mode: TickMode,
    /// Registered actors that were present and visited.
    pub visited: usize,
    /// Actors that restored a snapshot. Always 0 on record ticks.
    pub restored: usize,
    /// Actors whose history was already empty on a rewind tick.
    pub exhausted: SmallVec<[ActorId; 4]>,
    /// Longest history among visited actors after the pass.
    pub deepest_history: usize,
    /// This play tick reached the end of the loop, cleared every
    /// registered history, and restarted the loop at tick 0.
    pub loop_reset: bool,
    /// Wall-clock time for the whole tick, in microseconds.
    pub elapsed_us: u64,
}

impl TickReport {
    /// Whether this was a rewind tick on which no actor had history left.
    pub fn fully_exhausted(&self) -> bool {
        self.mode == TickMode::Rewind && self.restored == 0
    }
}
