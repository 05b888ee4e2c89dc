//! Time-loop controller and session world for Timeloop simulations.
//!
//! - [`TimeLoopController`]: ordered registry of rewindable actors and
//!   the per-tick record/rewind decision.
//! - [`TimeLoopWorld`]: owns the controller, the [`ActorTable`], and a
//!   [`PhysicsWorld`](timeloop_core::PhysicsWorld) backend.
//! - [`SessionConfig`] / [`TimeLoopConfig`]: serde-backed tuning with
//!   validation and TOML loading.
//! - [`TickReport`]: what each tick did.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod controller;
pub mod metrics;
pub mod table;
pub mod world;

pub use config::{max_frames_for, ConfigError, SessionConfig, TimeLoopConfig};
pub use controller::TimeLoopController;
pub use metrics::{TickMode, TickReport};
pub use table::ActorTable;
pub use world::TimeLoopWorld;
