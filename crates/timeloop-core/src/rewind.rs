//! The [`Rewindable`] capability.

use crate::physics::PhysicsWorld;

/// Participation contract for the time loop.
///
/// Every tick, the controller calls exactly one of these methods on
/// each registered actor: [`record_state`](Self::record_state) while
/// playing, [`rewind_state`](Self::rewind_state) while rewinding.
///
/// # Contract
///
/// - `record_state` captures the actor's *current* live state (body
///   position and velocity plus any discrete mode) into its own history
///   buffer, bounded by `max_frames`.
/// - `rewind_state` pops the newest snapshot and restores every part of
///   it. With an empty history it changes nothing and returns `false`.
/// - An actor only ever touches its own history and its own body.
pub trait Rewindable {
    /// Push the current state onto the history, evicting the oldest
    /// entries beyond `max_frames`.
    fn record_state(&mut self, physics: &dyn PhysicsWorld, max_frames: usize);

    /// Pop the most recent state and restore it.
    ///
    /// Returns `true` if a snapshot was restored, `false` if the
    /// history was already exhausted.
    fn rewind_state(&mut self, physics: &mut dyn PhysicsWorld) -> bool;

    /// Number of snapshots currently held.
    fn history_len(&self) -> usize;

    /// Drop every held snapshot. Live state is left untouched.
    ///
    /// Called when the session loop restarts, so that no rewind can
    /// reach back past the restart.
    fn clear_history(&mut self);
}
