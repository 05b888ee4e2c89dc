//! Session world: actors, physics, and controller in one place.
//!
//! [`TimeLoopWorld`] is the user-facing entry point. Each
//! [`step()`](TimeLoopWorld::step) runs one fixed tick at the configured
//! `fixed_dt` and returns its [`TickReport`].
//!
//! # Ownership model
//!
//! `TimeLoopWorld` is [`Send`] but not shared: every mutating method
//! takes `&mut self`, so registration can never change while a record
//! or rewind pass is walking the registry.

use std::fmt;

use timeloop_actors::{Actor, TickInput};
use timeloop_core::{ActorId, PhysicsWorld};

use crate::config::{ConfigError, TimeLoopConfig};
use crate::controller::TimeLoopController;
use crate::metrics::TickReport;
use crate::table::ActorTable;

// Compile-time assertion: TimeLoopWorld is Send for any physics backend.
const _: () = {
    #[allow(dead_code)]
    fn assert_send<T: Send>() {}
    #[allow(dead_code)]
    fn check<P: PhysicsWorld>() {
        assert_send::<TimeLoopWorld<P>>();
    }
};

/// A single time-loop session over physics backend `P`.
///
/// # Example
///
/// ```rust
/// use glam::Vec2;
/// use timeloop_actors::{PlayerConfig, PlayerController, TickInput};
/// use timeloop_core::PhysicsWorld;
/// use timeloop_engine::{TickMode, TimeLoopConfig, TimeLoopWorld};
/// use timeloop_test_utils::StubPhysics;
///
/// let mut physics = StubPhysics::new();
/// let body = physics.add_body(Vec2::ZERO);
/// let mut world = TimeLoopWorld::new(TimeLoopConfig::default(), physics).unwrap();
/// let player = world.spawn(PlayerController::new(body, PlayerConfig::default()));
///
/// for _ in 0..5 {
///     world.step(TickInput::moving(1.0));
/// }
/// let after_play = world.physics().position(body);
///
/// let report = world.step(TickInput::rewind());
/// assert_eq!(report.mode, TickMode::Rewind);
/// assert_eq!(world.physics().position(body), after_play);
/// assert_eq!(world.actor::<PlayerController>(player).unwrap().history().len(), 4);
/// ```
pub struct TimeLoopWorld<P: PhysicsWorld> {
    controller: TimeLoopController,
    actors: ActorTable,
    physics: P,
}

impl<P: PhysicsWorld> TimeLoopWorld<P> {
    /// Validate `config` and create an empty session over `physics`.
    pub fn new(config: TimeLoopConfig, physics: P) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            controller: TimeLoopController::new(config),
            actors: ActorTable::new(),
            physics,
        })
    }

    /// Activate `actor`, add it to the session, and register it for
    /// recording.
    pub fn spawn<A: Actor>(&mut self, actor: A) -> ActorId {
        let id = self.insert(Box::new(actor));
        self.controller.register(id);
        id
    }

    /// Activate `actor` and add it to the session without registering
    /// it. It updates every play tick but never records or rewinds.
    pub fn spawn_unrecorded<A: Actor>(&mut self, actor: A) -> ActorId {
        self.insert(Box::new(actor))
    }

    fn insert(&mut self, mut actor: Box<dyn Actor>) -> ActorId {
        actor.activate(&mut self.physics);
        tracing::debug!(name = actor.name(), body = %actor.body(), "actor spawned");
        self.actors.insert(actor)
    }

    /// Unregister and remove an actor, returning it.
    ///
    /// Unknown ids are a no-op.
    pub fn despawn(&mut self, id: ActorId) -> Option<Box<dyn Actor>> {
        self.controller.unregister(id);
        self.actors.remove(id)
    }

    /// Run one tick at the configured `fixed_dt`.
    pub fn step(&mut self, input: TickInput) -> TickReport {
        let dt = self.controller.config().fixed_dt;
        self.controller
            .tick(dt, input, &mut self.actors, &mut self.physics)
    }

    /// Typed access to a live actor.
    pub fn actor<T: Actor>(&self, id: ActorId) -> Option<&T> {
        self.actors.get(id)?.downcast_ref::<T>()
    }

    /// Typed mutable access to a live actor.
    pub fn actor_mut<T: Actor>(&mut self, id: ActorId) -> Option<&mut T> {
        self.actors.get_mut(id)?.downcast_mut::<T>()
    }

    /// Number of live actors.
    pub fn actor_count(&self) -> usize {
        self.actors.len()
    }

    /// The physics backend.
    pub fn physics(&self) -> &P {
        &self.physics
    }

    /// Mutable access to the physics backend.
    pub fn physics_mut(&mut self) -> &mut P {
        &mut self.physics
    }

    /// The session controller.
    pub fn controller(&self) -> &TimeLoopController {
        &self.controller
    }

    /// Mutable access to the controller, for manual registration.
    pub fn controller_mut(&mut self) -> &mut TimeLoopController {
        &mut self.controller
    }

    /// Consume the world, returning the physics backend.
    pub fn into_physics(self) -> P {
        self.physics
    }
}

impl<P: PhysicsWorld> fmt::Debug for TimeLoopWorld<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimeLoopWorld")
            .field("current_tick", &self.controller.current_tick())
            .field("rewinding", &self.controller.is_rewinding())
            .field("actors", &self.actors.len())
            .field("registered", &self.controller.len())
            .field("max_frames", &self.controller.max_frames())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use timeloop_actors::{EnemyAi, PlayerConfig, PlayerController};
    use timeloop_core::{BodyId, TickId};
    use timeloop_test_utils::{
        flat_ground, short_route, spawn_player_body, test_enemy_config, RecordingActor, StubPhysics,
    };

    fn config() -> TimeLoopConfig {
        TimeLoopConfig {
            max_rewind_seconds: 0.06,
            ..Default::default()
        }
    }

    #[test]
    fn new_rejects_invalid_config() {
        let bad = TimeLoopConfig {
            fixed_dt: -0.02,
            ..Default::default()
        };
        let err = TimeLoopWorld::new(bad, StubPhysics::new()).unwrap_err();
        assert!(matches!(err, ConfigError::NonPositive { .. }));
    }

    #[test]
    fn spawn_registers_and_unrecorded_does_not() {
        let mut physics = StubPhysics::new();
        let a = physics.add_body(Vec2::ZERO);
        let b = physics.add_body(Vec2::ZERO);
        let mut world = TimeLoopWorld::new(config(), physics).unwrap();

        let rec = world.spawn(RecordingActor::new("rec", a));
        let loose = world.spawn_unrecorded(RecordingActor::new("loose", b));

        assert!(world.controller().is_registered(rec));
        assert!(!world.controller().is_registered(loose));
        assert_eq!(world.actor_count(), 2);
        assert_eq!(world.controller().len(), 1);
    }

    #[test]
    fn spawn_activates_the_actor() {
        let mut physics = StubPhysics::new();
        let target = spawn_player_body(&mut physics, 20.0);
        let body = physics.add_body(Vec2::new(50.0, 0.0));
        let mut world = TimeLoopWorld::new(config(), physics).unwrap();

        let id = world.spawn(EnemyAi::new(body, test_enemy_config(), short_route()));

        assert_eq!(world.actor::<EnemyAi>(id).unwrap().target(), Some(target));
        assert_eq!(world.physics().position(body), Some(Vec2::ZERO));
    }

    #[test]
    fn despawn_unregisters_and_returns_actor() {
        let mut physics = StubPhysics::new();
        let body = physics.add_body(Vec2::ZERO);
        let mut world = TimeLoopWorld::new(config(), physics).unwrap();
        let id = world.spawn(RecordingActor::new("p", body));

        let removed = world.despawn(id).unwrap();
        assert_eq!(removed.name(), "p");
        assert!(!world.controller().is_registered(id));
        assert!(world.despawn(id).is_none());

        let report = world.step(TickInput::idle());
        assert_eq!(report.visited, 0);
    }

    #[test]
    fn typed_lookup_rejects_wrong_type() {
        let mut physics = StubPhysics::new();
        flat_ground(&mut physics);
        let body = physics.add_body(Vec2::ZERO);
        let mut world = TimeLoopWorld::new(config(), physics).unwrap();
        let id = world.spawn(PlayerController::new(body, PlayerConfig::default()));

        assert!(world.actor::<PlayerController>(id).is_some());
        assert!(world.actor::<EnemyAi>(id).is_none());
        assert!(world.actor::<PlayerController>(ActorId(7)).is_none());
        assert!(world.actor_mut::<PlayerController>(id).is_some());
    }

    #[test]
    fn step_uses_fixed_dt() {
        let mut physics = StubPhysics::new();
        flat_ground(&mut physics);
        let body = physics.add_body(Vec2::ZERO);
        let mut world = TimeLoopWorld::new(config(), physics).unwrap();
        world.spawn(PlayerController::new(body, PlayerConfig::default()));

        world.step(TickInput::moving(1.0));
        // 5 u/s for 0.02 s.
        let x = world.physics().position(body).unwrap().x;
        assert!((x - 0.1).abs() < 1e-6);
        assert_eq!(world.controller().max_frames(), Some(3));
        assert_eq!(world.controller().current_tick(), TickId(1));
    }

    #[test]
    fn debug_output_summarises_session() {
        let mut world = TimeLoopWorld::new(config(), StubPhysics::new()).unwrap();
        world.spawn_unrecorded(RecordingActor::new("p", BodyId(0)));
        let dbg = format!("{world:?}");
        assert!(dbg.contains("TimeLoopWorld"));
        assert!(dbg.contains("actors: 1"));
        assert!(dbg.contains("registered: 0"));
    }
}
