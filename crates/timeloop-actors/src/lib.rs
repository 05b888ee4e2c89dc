//! Reversible player and enemy behaviors for Timeloop simulations.
//!
//! Defines the [`Actor`] trait (a [`Rewindable`](timeloop_core::Rewindable)
//! that also advances its own simulation each tick), the per-tick
//! [`StepContext`], and the two reference actors:
//!
//! - [`PlayerController`]: input-driven horizontal motion and grounded jumps.
//! - [`EnemyAi`]: a patrol/chase state machine whose discrete mode is
//!   captured alongside its body state, so rewinding restores both.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod actor;
pub mod context;
pub mod enemy;
pub mod input;
pub mod player;

pub use actor::Actor;
pub use context::StepContext;
pub use enemy::{EnemyAi, EnemyConfig, EnemyMode, EnemySnapshot, EnemyState, PatrolRoute};
pub use input::TickInput;
pub use player::{PlayerConfig, PlayerController};
