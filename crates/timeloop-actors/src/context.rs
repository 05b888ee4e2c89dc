//! Execution context passed to actors during a recorded tick.
//!
//! [`StepContext`] gives each actor mutable access to the physics
//! boundary plus the tick's input sample, id, and timestep.

use timeloop_core::{PhysicsWorld, TickId};

use crate::input::TickInput;

/// Execution context passed to each actor's `update()` method.
///
/// Uses dynamic dispatch (`&mut dyn PhysicsWorld`) to keep the
/// [`Actor`](crate::Actor) trait object-safe while supporting stub
/// physics in tests.
pub struct StepContext<'a> {
    physics: &'a mut dyn PhysicsWorld,
    input: TickInput,
    tick_id: TickId,
    dt: f64,
}

impl<'a> StepContext<'a> {
    /// Construct a new step context.
    ///
    /// Typically called by the controller, not by actors directly.
    pub fn new(
        physics: &'a mut dyn PhysicsWorld,
        input: TickInput,
        tick_id: TickId,
        dt: f64,
    ) -> Self {
        Self {
            physics,
            input,
            tick_id,
            dt,
        }
    }

    /// Read-only physics access.
    pub fn physics(&self) -> &dyn PhysicsWorld {
        &*self.physics
    }

    /// Mutable physics access.
    pub fn physics_mut(&mut self) -> &mut dyn PhysicsWorld {
        &mut *self.physics
    }

    /// Control sample for this tick.
    pub fn input(&self) -> TickInput {
        self.input
    }

    /// The tick being simulated.
    pub fn tick_id(&self) -> TickId {
        self.tick_id
    }

    /// Fixed timestep in seconds.
    pub fn dt(&self) -> f64 {
        self.dt
    }
}
