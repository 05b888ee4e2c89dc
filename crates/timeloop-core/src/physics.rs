//! The boundary to the external rigid-body engine.
//!
//! Timeloop does not integrate motion or resolve collisions. Actors
//! read and write their bodies through [`PhysicsWorld`], probe for
//! ground contact through it, and resolve tagged targets through it.
//! Tests substitute an in-memory stub (see `timeloop-test-utils`).

use crate::id::{BodyId, LayerMask};
use glam::Vec2;

/// Opaque read/write access to the physics engine's bodies and queries.
///
/// # Absence
///
/// Bodies are addressed by [`BodyId`]. Reading an unknown body returns
/// `None`; writing to one is ignored. Callers treat absence as "nothing
/// to do", never as a fault.
///
/// # Object safety
///
/// This trait is object-safe; actors receive `&dyn PhysicsWorld` or
/// `&mut dyn PhysicsWorld` through their step context.
pub trait PhysicsWorld: Send {
    /// Current world-space position of `body`.
    fn position(&self, body: BodyId) -> Option<Vec2>;

    /// Overwrite the position of `body`.
    fn set_position(&mut self, body: BodyId, position: Vec2);

    /// Current linear velocity of `body`.
    fn velocity(&self, body: BodyId) -> Option<Vec2>;

    /// Overwrite the linear velocity of `body`.
    fn set_velocity(&mut self, body: BodyId, velocity: Vec2);

    /// Apply an instantaneous impulse to `body`.
    fn apply_impulse(&mut self, body: BodyId, impulse: Vec2);

    /// Whether any collider on `layers` overlaps the circle at `center`.
    fn overlap_circle(&self, center: Vec2, radius: f32, layers: LayerMask) -> bool;

    /// Resolve the body carrying `tag`, if any.
    fn find_tagged(&self, tag: &str) -> Option<BodyId>;

    /// Advance the engine's own integration by `dt` seconds.
    ///
    /// Called once per recorded tick, after actor behaviors have set
    /// their velocities and before the record pass. Default: no-op,
    /// for engines that are stepped outside the time loop.
    fn integrate(&mut self, _dt: f64) {}
}
