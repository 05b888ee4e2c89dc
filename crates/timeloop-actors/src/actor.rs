//! The [`Actor`] trait and `dyn Actor` downcast support.

use std::any::Any;

use timeloop_core::{BodyId, PhysicsWorld, Rewindable};

use crate::context::StepContext;

/// A simulated actor that can take part in the time loop.
///
/// # Contract
///
/// - [`activate()`](Actor::activate) is called once, when the actor is
///   spawned into a world, before its first tick.
/// - [`update()`](Actor::update) is called once per recorded tick, before
///   the record pass. It is never called on a rewind tick.
/// - The [`Rewindable`] half is driven by the controller; see its docs.
///
/// # Object safety
///
/// The world stores actors as `Box<dyn Actor>`. Use
/// [`downcast_ref`](trait.Actor.html#method.downcast_ref) to get back a
/// concrete type.
pub trait Actor: Rewindable + Any + Send + 'static {
    /// Human-readable name for logs.
    fn name(&self) -> &str;

    /// The physics body this actor drives.
    fn body(&self) -> BodyId;

    /// One-time setup against the physics world (target lookup,
    /// initial placement). Default: nothing.
    fn activate(&mut self, _physics: &mut dyn PhysicsWorld) {}

    /// Advance this actor's own behavior by one tick.
    fn update(&mut self, ctx: &mut StepContext<'_>);
}

impl dyn Actor {
    /// Attempt to downcast a trait object to a concrete actor type.
    pub fn downcast_ref<T: Actor>(&self) -> Option<&T> {
        (self as &dyn Any).downcast_ref::<T>()
    }

    /// Mutable variant of [`downcast_ref`](Self::downcast_ref).
    pub fn downcast_mut<T: Actor>(&mut self) -> Option<&mut T> {
        (self as &mut dyn Any).downcast_mut::<T>()
    }
}
