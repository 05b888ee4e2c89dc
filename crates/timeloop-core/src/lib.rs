//! Core types and traits for the Timeloop rewind framework.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the fundamental abstractions used throughout the Timeloop workspace:
//! identifiers, the immutable [`Snapshot`] value, the bounded
//! [`HistoryBuffer`], the [`Rewindable`] capability, and the
//! [`PhysicsWorld`] boundary that actors read and write their bodies
//! through.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod history;
pub mod id;
pub mod physics;
pub mod rewind;
pub mod snapshot;

pub use glam::Vec2;
pub use history::HistoryBuffer;
pub use id::{ActorId, BodyId, LayerMask, TickId};
pub use physics::PhysicsWorld;
pub use rewind::Rewindable;
pub use snapshot::{BodySnapshot, Snapshot};
