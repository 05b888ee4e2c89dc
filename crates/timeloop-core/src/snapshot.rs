//! The immutable per-tick [`Snapshot`] value.

use glam::Vec2;

/// One actor's full reversible state at one tick.
///
/// `M` carries whatever discrete mode and auxiliary scalars the actor
/// needs to resume simulation identically (e.g. an AI state plus a
/// patrol direction). Actors without discrete state use `()`.
///
/// Fields are private: once built, a snapshot cannot be changed, and
/// the [`HistoryBuffer`](crate::HistoryBuffer) only hands snapshots out
/// by value or shared reference.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Snapshot<M = ()> {
    position: Vec2,
    velocity: Vec2,
    state: M,
}

/// Snapshot of an actor that only owns a physical body.
pub type BodySnapshot = Snapshot<()>;

impl<M: Copy> Snapshot<M> {
    /// Capture position, velocity, and actor-specific state.
    pub fn new(position: Vec2, velocity: Vec2, state: M) -> Self {
        Self {
            position,
            velocity,
            state,
        }
    }

    /// World-space location at the recorded tick.
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Linear velocity at the recorded tick.
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Actor-specific discrete mode and auxiliaries.
    pub fn state(&self) -> M {
        self.state
    }
}

impl BodySnapshot {
    /// Capture a body-only snapshot.
    pub fn body(position: Vec2, velocity: Vec2) -> Self {
        Self::new(position, velocity, ())
    }
}
