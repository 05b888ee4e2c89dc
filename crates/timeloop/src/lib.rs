//! Timeloop: bounded per-actor rewind for fixed-timestep simulations.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all Timeloop sub-crates. Every play tick, each registered actor records
//! a snapshot of its body and discrete state; while rewind is held, each
//! pops and restores its newest snapshot instead.
//!
//! # Quick start
//!
//! ```rust
//! use timeloop::prelude::*;
//! use timeloop_test_utils::StubPhysics;
//!
//! let mut physics = StubPhysics::new();
//! physics.add_ground(Vec2::new(-50.0, -1.0), Vec2::new(50.0, 0.0), LayerMask::default());
//! let body = physics.add_body(Vec2::ZERO);
//!
//! let config = TimeLoopConfig { max_rewind_seconds: 1.0, ..Default::default() };
//! let mut world = TimeLoopWorld::new(config, physics).unwrap();
//! world.spawn(PlayerController::new(body, PlayerConfig::default()));
//!
//! for _ in 0..10 {
//!     world.step(TickInput::moving(1.0));
//! }
//! let report = world.step(TickInput::rewind());
//! assert_eq!(report.mode, TickMode::Rewind);
//! assert_eq!(report.restored, 1);
//! assert_eq!(world.controller().current_tick(), TickId(9));
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `timeloop-core` | IDs, snapshots, history buffer, physics boundary |
//! | [`actors`] | `timeloop-actors` | `Actor` trait, player and enemy behaviors |
//! | [`engine`] | `timeloop-engine` | Controller, session world, configuration |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, traits, and IDs (`timeloop-core`).
///
/// Contains [`types::Snapshot`], [`types::HistoryBuffer`], the
/// [`types::Rewindable`] capability, and the [`types::PhysicsWorld`]
/// boundary.
pub use timeloop_core as types;

/// Actor trait and reference behaviors (`timeloop-actors`).
///
/// [`actors::PlayerController`] for input-driven motion,
/// [`actors::EnemyAi`] for the reversible patrol/chase state machine.
pub use timeloop_actors as actors;

/// Controller and session world (`timeloop-engine`).
///
/// [`engine::TimeLoopWorld`] for stepping a session,
/// [`engine::SessionConfig`] for TOML-backed tuning.
pub use timeloop_engine as engine;

/// Common imports for typical Timeloop usage.
///
/// ```rust
/// use timeloop::prelude::*;
/// ```
pub mod prelude {
    // Core types and traits
    pub use timeloop_core::{
        ActorId, BodyId, BodySnapshot, HistoryBuffer, LayerMask, PhysicsWorld, Rewindable,
        Snapshot, TickId, Vec2,
    };

    // Actors
    pub use timeloop_actors::{
        Actor, EnemyAi, EnemyConfig, EnemyMode, PatrolRoute, PlayerConfig, PlayerController,
        StepContext, TickInput,
    };

    // Engine
    pub use timeloop_engine::{
        ConfigError, SessionConfig, TickMode, TickReport, TimeLoopConfig, TimeLoopController,
        TimeLoopWorld,
    };
}
