//! Test utilities and stub physics for Timeloop development.
//!
//! Provides an in-memory [`StubPhysics`] implementing
//! [`PhysicsWorld`](timeloop_core::PhysicsWorld), a [`RecordingActor`] that
//! logs every call the controller makes on it, and configuration
//! fixtures in [`fixtures`].

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::collections::HashMap;

use glam::Vec2;
use timeloop_actors::{Actor, StepContext};
use timeloop_core::{
    BodyId, BodySnapshot, HistoryBuffer, LayerMask, PhysicsWorld, Rewindable, TickId,
};

pub use fixtures::*;

/// One body in a [`StubPhysics`] world.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StubBody {
    pub position: Vec2,
    pub velocity: Vec2,
}

/// Axis-aligned collider used by ground probes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StubCollider {
    pub min: Vec2,
    pub max: Vec2,
    pub layers: LayerMask,
}

impl StubCollider {
    fn overlaps_circle(&self, center: Vec2, radius: f32) -> bool {
        let nearest = center.clamp(self.min, self.max);
        nearest.distance_squared(center) <= radius * radius
    }
}

/// In-memory stand-in for a rigid-body engine.
///
/// Bodies have unit mass. [`integrate`](PhysicsWorld::integrate) applies
/// gravity and explicit Euler motion; there is no collision response.
pub struct StubPhysics {
    bodies: HashMap<BodyId, StubBody>,
    tags: HashMap<String, BodyId>,
    colliders: Vec<StubCollider>,
    gravity: Vec2,
    next_body: u32,
    integrate_calls: u64,
}

impl StubPhysics {
    pub fn new() -> Self {
        Self {
            bodies: HashMap::new(),
            tags: HashMap::new(),
            colliders: Vec::new(),
            gravity: Vec2::ZERO,
            next_body: 0,
            integrate_calls: 0,
        }
    }

    /// Same world with gravity applied on every `integrate` call.
    pub fn with_gravity(mut self, gravity: Vec2) -> Self {
        self.gravity = gravity;
        self
    }

    /// Add a body at rest at `position`.
    pub fn add_body(&mut self, position: Vec2) -> BodyId {
        let id = BodyId(self.next_body);
        self.next_body += 1;
        self.bodies.insert(
            id,
            StubBody {
                position,
                velocity: Vec2::ZERO,
            },
        );
        id
    }

    /// Remove a body; later reads of it return `None`.
    pub fn remove_body(&mut self, body: BodyId) -> Option<StubBody> {
        self.tags.retain(|_, b| *b != body);
        self.bodies.remove(&body)
    }

    /// Attach `tag` to `body`, replacing any previous holder.
    pub fn tag(&mut self, body: BodyId, tag: &str) {
        self.tags.insert(tag.to_string(), body);
    }

    /// Add a static ground box spanning `min..=max`.
    pub fn add_ground(&mut self, min: Vec2, max: Vec2, layers: LayerMask) {
        self.colliders.push(StubCollider { min, max, layers });
    }

    pub fn body(&self, body: BodyId) -> Option<&StubBody> {
        self.bodies.get(&body)
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Number of `integrate` calls so far.
    pub fn integrate_calls(&self) -> u64 {
        self.integrate_calls
    }
}

impl Default for StubPhysics {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsWorld for StubPhysics {
    fn position(&self, body: BodyId) -> Option<Vec2> {
        self.bodies.get(&body).map(|b| b.position)
    }

    fn set_position(&mut self, body: BodyId, position: Vec2) {
        if let Some(b) = self.bodies.get_mut(&body) {
            b.position = position;
        }
    }

    fn velocity(&self, body: BodyId) -> Option<Vec2> {
        self.bodies.get(&body).map(|b| b.velocity)
    }

    fn set_velocity(&mut self, body: BodyId, velocity: Vec2) {
        if let Some(b) = self.bodies.get_mut(&body) {
            b.velocity = velocity;
        }
    }

    fn apply_impulse(&mut self, body: BodyId, impulse: Vec2) {
        if let Some(b) = self.bodies.get_mut(&body) {
            b.velocity += impulse;
        }
    }

    fn overlap_circle(&self, center: Vec2, radius: f32, layers: LayerMask) -> bool {
        self.colliders
            .iter()
            .any(|c| c.layers.intersects(layers) && c.overlaps_circle(center, radius))
    }

    fn find_tagged(&self, tag: &str) -> Option<BodyId> {
        self.tags.get(tag).copied()
    }

    fn integrate(&mut self, dt: f64) {
        let dt = dt as f32;
        for b in self.bodies.values_mut() {
            b.velocity += self.gravity * dt;
            b.position += b.velocity * dt;
        }
        self.integrate_calls += 1;
    }
}

/// A controller call observed by a [`RecordingActor`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PassCall {
    Update(TickId),
    Record,
    Rewind { restored: bool },
    ClearHistory,
}

/// Body-only actor that logs every call made on it.
///
/// Useful for checking pass ordering and record/rewind exclusivity.
/// Behavior update does nothing to the body.
pub struct RecordingActor {
    name: String,
    body: BodyId,
    calls: Vec<PassCall>,
    history: HistoryBuffer<BodySnapshot>,
}

impl RecordingActor {
    pub fn new(name: impl Into<String>, body: BodyId) -> Self {
        Self {
            name: name.into(),
            body,
            calls: Vec::new(),
            history: HistoryBuffer::new(),
        }
    }

    pub fn calls(&self) -> &[PassCall] {
        &self.calls
    }

    /// Number of record and rewind calls.
    pub fn pass_calls(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, PassCall::Record | PassCall::Rewind { .. }))
            .count()
    }
}

impl Rewindable for RecordingActor {
    fn record_state(&mut self, physics: &dyn PhysicsWorld, max_frames: usize) {
        self.calls.push(PassCall::Record);
        if let (Some(p), Some(v)) = (physics.position(self.body), physics.velocity(self.body)) {
            self.history.record(BodySnapshot::body(p, v), max_frames);
        }
    }

    fn rewind_state(&mut self, physics: &mut dyn PhysicsWorld) -> bool {
        let restored = match self.history.pop_latest() {
            Some(snap) => {
                physics.set_position(self.body, snap.position());
                physics.set_velocity(self.body, snap.velocity());
                true
            }
            None => false,
        };
        self.calls.push(PassCall::Rewind { restored });
        restored
    }

    fn history_len(&self) -> usize {
        self.history.len()
    }

    fn clear_history(&mut self) {
        self.calls.push(PassCall::ClearHistory);
        self.history.clear();
    }
}

impl Actor for RecordingActor {
    fn name(&self) -> &str {
        &self.name
    }

    fn body(&self) -> BodyId {
        self.body
    }

    fn update(&mut self, ctx: &mut StepContext<'_>) {
        self.calls.push(PassCall::Update(ctx.tick_id()));
    }
}
