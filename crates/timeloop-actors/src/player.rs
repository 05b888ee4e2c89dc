//! Input-driven player motion controller.
//!
//! Sets horizontal velocity from the input axis and jumps with an
//! upward impulse when the ground probe reports contact. Only the body
//! state is reversible; the player has no discrete mode.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use timeloop_core::{BodyId, BodySnapshot, HistoryBuffer, LayerMask, PhysicsWorld, Rewindable};

use crate::actor::Actor;
use crate::context::StepContext;

/// Tuning parameters for [`PlayerController`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Horizontal speed at full axis deflection, in units per second. Default: 5.
    pub movement_speed: f32,
    /// Upward impulse applied on a grounded jump. Default: 5.
    pub jump_force: f32,
    /// Radius of the ground probe circle centred on the body. Default: 0.1.
    pub ground_probe_radius: f32,
    /// Layers that count as ground. Default: layer 0.
    pub ground_layer: LayerMask,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            movement_speed: 5.0,
            jump_force: 5.0,
            ground_probe_radius: 0.1,
            ground_layer: LayerMask::default(),
        }
    }
}

/// The player's reversible motion controller.
pub struct PlayerController {
    body: BodyId,
    config: PlayerConfig,
    grounded: bool,
    history: HistoryBuffer<BodySnapshot>,
}

impl PlayerController {
    /// Create a controller driving `body`.
    pub fn new(body: BodyId, config: PlayerConfig) -> Self {
        Self {
            body,
            config,
            grounded: false,
            history: HistoryBuffer::new(),
        }
    }

    /// Result of the most recent ground probe.
    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    /// The controller's tuning parameters.
    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    /// Recorded history, oldest first.
    pub fn history(&self) -> &HistoryBuffer<BodySnapshot> {
        &self.history
    }
}

impl Rewindable for PlayerController {
    fn record_state(&mut self, physics: &dyn PhysicsWorld, max_frames: usize) {
        let (Some(position), Some(velocity)) =
            (physics.position(self.body), physics.velocity(self.body))
        else {
            return;
        };
        self.history
            .record(BodySnapshot::body(position, velocity), max_frames);
    }

    fn rewind_state(&mut self, physics: &mut dyn PhysicsWorld) -> bool {
        let Some(snap) = self.history.pop_latest() else {
            return false;
        };
        physics.set_position(self.body, snap.position());
        physics.set_velocity(self.body, snap.velocity());
        true
    }

    fn history_len(&self) -> usize {
        self.history.len()
    }

    fn clear_history(&mut self) {
        self.history.clear();
    }
}

impl Actor for PlayerController {
    fn name(&self) -> &str {
        "player"
    }

    fn body(&self) -> BodyId {
        self.body
    }

    fn update(&mut self, ctx: &mut StepContext<'_>) {
        let input = ctx.input();
        let (Some(position), Some(velocity)) = (
            ctx.physics().position(self.body),
            ctx.physics().velocity(self.body),
        ) else {
            return;
        };

        // Move: axis drives x, y belongs to the physics engine.
        let vx = input.axis() * self.config.movement_speed;
        ctx.physics_mut()
            .set_velocity(self.body, Vec2::new(vx, velocity.y));

        // Jump: only from the ground.
        self.grounded = ctx.physics().overlap_circle(
            position,
            self.config.ground_probe_radius,
            self.config.ground_layer,
        );
        if self.grounded && input.jump {
            ctx.physics_mut()
                .apply_impulse(self.body, Vec2::Y * self.config.jump_force);
        }
    }
}
