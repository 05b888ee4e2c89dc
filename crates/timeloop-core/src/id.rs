//! Strongly-typed identifiers and the [`LayerMask`] collision filter.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies an actor within a session.
///
/// Allocated sequentially by the actor table when an actor is spawned.
/// Ids are never reused within a session, so a stale id held by the
/// controller's registry can only miss, never alias another actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActorId(pub u32);

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for ActorId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Identifies a rigid body owned by the external physics world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub u32);

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for BodyId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Position of the session clock, in fixed ticks.
///
/// Advances by one on every recorded tick and steps back by one on
/// every rewind tick that restored at least one actor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TickId(pub u64);

impl fmt::Display for TickId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for TickId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// Bit set of collision layers used by overlap queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerMask(pub u32);

impl LayerMask {
    /// Matches no layer.
    pub const NONE: Self = Self(0);
    /// Matches every layer.
    pub const ALL: Self = Self(u32::MAX);

    /// Mask containing the single layer `index` (0..32).
    ///
    /// # Panics
    ///
    /// Panics if `index >= 32`.
    pub const fn layer(index: u32) -> Self {
        assert!(index < 32, "layer index must be < 32");
        Self(1 << index)
    }

    /// Whether the two masks share at least one layer.
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        Self::layer(0)
    }
}

impl fmt::Display for LayerMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}
