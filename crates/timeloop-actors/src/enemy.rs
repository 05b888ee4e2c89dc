//! Reversible patrol/chase enemy AI.
//!
//! [`EnemyAi`] is a two-state machine evaluated once per recorded tick:
//!
//! ```text
//!            distance <= detection_radius
//!   Patrol ─────────────────────────────────▶ Chase
//!     ▲                                          │
//!     └──────────────────────────────────────────┘
//!      no target, or distance > detection_radius × 1.5
//! ```
//!
//! The gap between the entry and exit thresholds is a hysteresis band:
//! an enemy hovering at the detection edge cannot flicker between states.
//!
//! Each tick first evaluates the transition, then applies the behavior of
//! the resulting state. The mode and patrol direction are recorded with
//! the body state, so rewinding across a transition restores both the
//! discrete mode and the motion.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use timeloop_core::{BodyId, HistoryBuffer, PhysicsWorld, Rewindable, Snapshot};

use crate::actor::Actor;
use crate::context::StepContext;

/// Multiplier on `detection_radius` past which a chase is abandoned.
pub const CHASE_EXIT_FACTOR: f32 = 1.5;

/// Discrete behavior state of an [`EnemyAi`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EnemyMode {
    /// Walking back and forth between the patrol waypoints.
    #[default]
    Patrol,
    /// Running toward the target's x position.
    Chase,
}

/// The enemy's reversible non-body state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyState {
    /// Current behavior state.
    pub mode: EnemyMode,
    /// Patrol heading: `1.0` toward the right waypoint, `-1.0` toward the left.
    pub patrol_direction: f32,
}

impl Default for EnemyState {
    fn default() -> Self {
        Self {
            mode: EnemyMode::Patrol,
            patrol_direction: 1.0,
        }
    }
}

/// One recorded tick of an [`EnemyAi`].
pub type EnemySnapshot = Snapshot<EnemyState>;

/// The two horizontal endpoints of a patrol.
///
/// A missing endpoint holds the enemy in place while it is heading
/// toward that side.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PatrolRoute {
    /// Waypoint reached while heading left (`patrol_direction < 0`).
    pub left: Option<Vec2>,
    /// Waypoint reached while heading right (`patrol_direction > 0`).
    pub right: Option<Vec2>,
}

impl PatrolRoute {
    /// Route between two waypoints, ordered by x.
    pub fn between(a: Vec2, b: Vec2) -> Self {
        let (left, right) = if a.x <= b.x { (a, b) } else { (b, a) };
        Self {
            left: Some(left),
            right: Some(right),
        }
    }

    /// Route with no waypoints: the enemy never patrols.
    pub fn none() -> Self {
        Self::default()
    }

    fn toward(&self, direction: f32) -> Option<Vec2> {
        if direction >= 0.0 {
            self.right
        } else {
            self.left
        }
    }
}

/// Tuning parameters for [`EnemyAi`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    /// Horizontal speed while patrolling. Default: 2.
    pub patrol_speed: f32,
    /// Horizontal speed while chasing. Default: 3.5.
    pub chase_speed: f32,
    /// Distance at or below which a patrolling enemy starts chasing. Default: 5.
    pub detection_radius: f32,
    /// Horizontal distance to a waypoint that counts as arrival. Default: 0.15.
    pub waypoint_arrival_threshold: f32,
    /// Distance at or below which the target counts as in attack range.
    /// `None` disables the check. Default: 1.
    pub attack_range: Option<f32>,
    /// Tag resolved once at activation to find the target. Default: `"player"`.
    pub target_tag: String,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            patrol_speed: 2.0,
            chase_speed: 3.5,
            detection_radius: 5.0,
            waypoint_arrival_threshold: 0.15,
            attack_range: Some(1.0),
            target_tag: "player".to_string(),
        }
    }
}

/// Reversible patrol/chase enemy.
///
/// The target is resolved by tag once, in [`Actor::activate`]. If that
/// lookup fails the enemy patrols forever; it does not retry. If the
/// resolved body later vanishes from the physics world, the target reads
/// as absent for as long as it is gone.
pub struct EnemyAi {
    body: BodyId,
    config: EnemyConfig,
    route: PatrolRoute,
    target: Option<BodyId>,
    state: EnemyState,
    in_attack_range: bool,
    history: HistoryBuffer<EnemySnapshot>,
}

impl EnemyAi {
    /// Create an enemy driving `body` along `route`.
    pub fn new(body: BodyId, config: EnemyConfig, route: PatrolRoute) -> Self {
        Self {
            body,
            config,
            route,
            target: None,
            state: EnemyState::default(),
            in_attack_range: false,
            history: HistoryBuffer::new(),
        }
    }

    /// Start heading in the given direction (sign only).
    pub fn with_patrol_direction(mut self, direction: f32) -> Self {
        self.state.patrol_direction = if direction < 0.0 { -1.0 } else { 1.0 };
        self
    }

    /// Current behavior state.
    pub fn mode(&self) -> EnemyMode {
        self.state.mode
    }

    /// Current patrol heading (`1.0` or `-1.0`).
    pub fn patrol_direction(&self) -> f32 {
        self.state.patrol_direction
    }

    /// Full reversible non-body state.
    pub fn state(&self) -> EnemyState {
        self.state
    }

    /// The body resolved as target at activation, if any.
    pub fn target(&self) -> Option<BodyId> {
        self.target
    }

    /// Whether the target was within `attack_range` on the last update.
    ///
    /// Presentation-only: not recorded, so it is stale after a rewind
    /// until the next recorded tick.
    pub fn in_attack_range(&self) -> bool {
        self.in_attack_range
    }

    /// The enemy's tuning parameters.
    pub fn config(&self) -> &EnemyConfig {
        &self.config
    }

    /// Recorded history, oldest first.
    pub fn history(&self) -> &HistoryBuffer<EnemySnapshot> {
        &self.history
    }

    /// Apply the hysteresis rule to `mode` given the target distance.
    fn next_mode(&self, distance: Option<f32>) -> EnemyMode {
        let radius = self.config.detection_radius;
        match (self.state.mode, distance) {
            (EnemyMode::Patrol, Some(d)) if d <= radius => EnemyMode::Chase,
            (EnemyMode::Chase, None) => EnemyMode::Patrol,
            (EnemyMode::Chase, Some(d)) if d > radius * CHASE_EXIT_FACTOR => EnemyMode::Patrol,
            (mode, _) => mode,
        }
    }

    /// Horizontal velocity for one patrol tick; may flip the heading.
    fn patrol_velocity(&mut self, x: f32) -> f32 {
        let Some(waypoint) = self.route.toward(self.state.patrol_direction) else {
            return 0.0;
        };
        // Distance still to cover along the heading; negative once passed.
        let remaining = (waypoint.x - x) * self.state.patrol_direction;
        if remaining < self.config.waypoint_arrival_threshold {
            self.state.patrol_direction = -self.state.patrol_direction;
            if self.route.toward(self.state.patrol_direction).is_none() {
                return 0.0;
            }
        }
        self.state.patrol_direction * self.config.patrol_speed
    }

    /// Horizontal velocity for one chase tick.
    fn chase_velocity(&self, x: f32, target_x: f32) -> f32 {
        let dx = target_x - x;
        if dx == 0.0 {
            0.0
        } else {
            dx.signum() * self.config.chase_speed
        }
    }
}

impl Rewindable for EnemyAi {
    fn record_state(&mut self, physics: &dyn PhysicsWorld, max_frames: usize) {
        let (Some(position), Some(velocity)) =
            (physics.position(self.body), physics.velocity(self.body))
        else {
            return;
        };
        self.history
            .record(EnemySnapshot::new(position, velocity, self.state), max_frames);
    }

    fn rewind_state(&mut self, physics: &mut dyn PhysicsWorld) -> bool {
        let Some(snap) = self.history.pop_latest() else {
            return false;
        };
        physics.set_position(self.body, snap.position());
        physics.set_velocity(self.body, snap.velocity());
        self.state = snap.state();
        true
    }

    fn history_len(&self) -> usize {
        self.history.len()
    }

    fn clear_history(&mut self) {
        self.history.clear();
    }
}

impl Actor for EnemyAi {
    fn name(&self) -> &str {
        "enemy"
    }

    fn body(&self) -> BodyId {
        self.body
    }

    fn activate(&mut self, physics: &mut dyn PhysicsWorld) {
        if let Some(start) = self.route.left {
            physics.set_position(self.body, start);
        }
        self.target = physics.find_tagged(&self.config.target_tag);
        if self.target.is_none() {
            tracing::warn!(
                body = %self.body,
                tag = %self.config.target_tag,
                "enemy target not found; patrolling only"
            );
        }
    }

    fn update(&mut self, ctx: &mut StepContext<'_>) {
        let (Some(position), Some(velocity)) = (
            ctx.physics().position(self.body),
            ctx.physics().velocity(self.body),
        ) else {
            return;
        };
        let target_position = self.target.and_then(|t| ctx.physics().position(t));
        let distance = target_position.map(|p| position.distance(p));

        let next = self.next_mode(distance);
        if next != self.state.mode {
            tracing::debug!(
                body = %self.body,
                tick = %ctx.tick_id(),
                from = ?self.state.mode,
                to = ?next,
                "enemy state transition"
            );
            self.state.mode = next;
        }

        let vx = match (self.state.mode, target_position) {
            (EnemyMode::Chase, Some(target)) => self.chase_velocity(position.x, target.x),
            _ => self.patrol_velocity(position.x),
        };
        ctx.physics_mut()
            .set_velocity(self.body, Vec2::new(vx, velocity.y));

        let in_range = matches!(
            (self.config.attack_range, distance),
            (Some(range), Some(d)) if d <= range
        );
        if in_range && !self.in_attack_range {
            tracing::debug!(body = %self.body, tick = %ctx.tick_id(), "target in attack range");
        }
        self.in_attack_range = in_range;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use timeloop_core::TickId;
    use timeloop_test_utils::StubPhysics;

    use crate::input::TickInput;

    const EPS: f32 = 1e-3;

    fn config() -> EnemyConfig {
        EnemyConfig {
            patrol_speed: 2.0,
            chase_speed: 4.0,
            detection_radius: 5.0,
            waypoint_arrival_threshold: 0.15,
            attack_range: Some(1.0),
            target_tag: "player".into(),
        }
    }

    /// Enemy at `enemy_x` (not snapped to a waypoint), target at `target_x`.
    fn setup(enemy_x: f32, target_x: Option<f32>) -> (StubPhysics, EnemyAi, Option<BodyId>) {
        let mut physics = StubPhysics::new();
        let body = physics.add_body(Vec2::new(enemy_x, 0.0));
        let target = target_x.map(|x| {
            let t = physics.add_body(Vec2::new(x, 0.0));
            physics.tag(t, "player");
            t
        });
        let route = PatrolRoute {
            left: Some(Vec2::new(0.0, 0.0)),
            right: Some(Vec2::new(10.0, 0.0)),
        };
        let mut enemy = EnemyAi::new(body, config(), route);
        enemy.target = physics.find_tagged("player");
        (physics, enemy, target)
    }

    fn step(physics: &mut StubPhysics, enemy: &mut EnemyAi) {
        let mut ctx = StepContext::new(physics, TickInput::idle(), TickId(1), 0.02);
        enemy.update(&mut ctx);
    }

    #[test]
    fn patrol_flips_direction_near_right_waypoint() {
        // 10 - 9.9 = 0.1 < 0.15 → flip to left in one tick.
        let (mut physics, mut enemy, _) = setup(9.9, None);
        assert_eq!(enemy.patrol_direction(), 1.0);

        step(&mut physics, &mut enemy);

        assert_eq!(enemy.patrol_direction(), -1.0);
        assert_eq!(physics.velocity(enemy.body()).unwrap().x, -2.0);
        assert_eq!(enemy.mode(), EnemyMode::Patrol);
    }

    #[test]
    fn patrol_keeps_heading_away_from_waypoints() {
        let (mut physics, mut enemy, _) = setup(5.0, None);
        step(&mut physics, &mut enemy);
        assert_eq!(enemy.patrol_direction(), 1.0);
        assert_eq!(physics.velocity(enemy.body()).unwrap().x, 2.0);
    }

    #[test]
    fn patrol_flips_after_overshooting_waypoint() {
        let (mut physics, mut enemy, _) = setup(12.0, None);
        step(&mut physics, &mut enemy);
        assert_eq!(enemy.patrol_direction(), -1.0);
    }

    #[test]
    fn patrol_flips_back_at_left_waypoint() {
        let (mut physics, mut enemy, _) = setup(0.1, None);
        enemy.state.patrol_direction = -1.0;
        step(&mut physics, &mut enemy);
        assert_eq!(enemy.patrol_direction(), 1.0);
        assert_eq!(physics.velocity(enemy.body()).unwrap().x, 2.0);
    }

    #[test]
    fn missing_waypoint_holds_horizontal_velocity_at_zero() {
        let mut physics = StubPhysics::new();
        let body = physics.add_body(Vec2::new(3.0, 0.0));
        physics.set_velocity(body, Vec2::new(7.0, -1.0));
        let route = PatrolRoute {
            left: Some(Vec2::ZERO),
            right: None,
        };
        let mut enemy = EnemyAi::new(body, config(), route);

        step(&mut physics, &mut enemy);

        assert_eq!(physics.velocity(body), Some(Vec2::new(0.0, -1.0)));
    }

    #[test]
    fn no_route_never_moves() {
        let mut physics = StubPhysics::new();
        let body = physics.add_body(Vec2::new(3.0, 0.0));
        let mut enemy = EnemyAi::new(body, config(), PatrolRoute::none());
        for _ in 0..5 {
            step(&mut physics, &mut enemy);
        }
        assert_eq!(physics.velocity(body), Some(Vec2::ZERO));
    }

    #[test]
    fn route_between_orders_by_x() {
        let route = PatrolRoute::between(Vec2::new(8.0, 1.0), Vec2::new(-2.0, 1.0));
        assert_eq!(route.left, Some(Vec2::new(-2.0, 1.0)));
        assert_eq!(route.right, Some(Vec2::new(8.0, 1.0)));
    }

    #[test]
    fn detection_hysteresis_band() {
        // Just outside detection: stays in Patrol.
        let (mut physics, mut enemy, _) = setup(5.0, Some(5.0 + 5.0 + EPS));
        step(&mut physics, &mut enemy);
        assert_eq!(enemy.mode(), EnemyMode::Patrol);

        // Just inside detection: Chase.
        let (mut physics, mut enemy, target) = setup(5.0, Some(5.0 + 5.0 - EPS));
        let target = target.unwrap();
        step(&mut physics, &mut enemy);
        assert_eq!(enemy.mode(), EnemyMode::Chase);

        // Inside the band (radius < d <= 1.5 × radius): keeps chasing.
        physics.set_position(enemy.body(), Vec2::new(5.0, 0.0));
        physics.set_position(target, Vec2::new(5.0 + 7.5, 0.0));
        step(&mut physics, &mut enemy);
        assert_eq!(enemy.mode(), EnemyMode::Chase);

        // Past the band: back to Patrol.
        physics.set_position(enemy.body(), Vec2::new(5.0, 0.0));
        physics.set_position(target, Vec2::new(5.0 + 7.5 + EPS, 0.0));
        step(&mut physics, &mut enemy);
        assert_eq!(enemy.mode(), EnemyMode::Patrol);
    }

    #[test]
    fn detection_radius_boundary_is_inclusive() {
        let (mut physics, mut enemy, _) = setup(2.0, Some(7.0));
        step(&mut physics, &mut enemy);
        assert_eq!(enemy.mode(), EnemyMode::Chase);
    }

    #[test]
    fn chase_moves_toward_target_x() {
        let (mut physics, mut enemy, target) = setup(5.0, Some(3.0));
        step(&mut physics, &mut enemy);
        assert_eq!(enemy.mode(), EnemyMode::Chase);
        assert_eq!(physics.velocity(enemy.body()).unwrap().x, -4.0);

        physics.set_position(target.unwrap(), Vec2::new(6.0, 2.0));
        step(&mut physics, &mut enemy);
        assert_eq!(physics.velocity(enemy.body()).unwrap().x, 4.0);
    }

    #[test]
    fn chase_stops_when_aligned_with_target() {
        let (mut physics, mut enemy, _) = setup(5.0, Some(5.0));
        step(&mut physics, &mut enemy);
        assert_eq!(enemy.mode(), EnemyMode::Chase);
        assert_eq!(physics.velocity(enemy.body()).unwrap().x, 0.0);
    }

    #[test]
    fn vanished_target_ends_chase() {
        let (mut physics, mut enemy, target) = setup(5.0, Some(6.0));
        step(&mut physics, &mut enemy);
        assert_eq!(enemy.mode(), EnemyMode::Chase);

        physics.remove_body(target.unwrap());
        step(&mut physics, &mut enemy);
        assert_eq!(enemy.mode(), EnemyMode::Patrol);
    }

    #[test]
    fn attack_range_is_reported() {
        let (mut physics, mut enemy, target) = setup(5.0, Some(5.5));
        step(&mut physics, &mut enemy);
        assert!(enemy.in_attack_range());

        physics.set_position(target.unwrap(), Vec2::new(8.0, 0.0));
        step(&mut physics, &mut enemy);
        assert!(!enemy.in_attack_range());
    }

    #[test]
    fn activate_snaps_to_left_waypoint_and_resolves_target() {
        let mut physics = StubPhysics::new();
        let body = physics.add_body(Vec2::new(40.0, 40.0));
        let player = physics.add_body(Vec2::ZERO);
        physics.tag(player, "player");
        let mut enemy = EnemyAi::new(
            body,
            config(),
            PatrolRoute::between(Vec2::new(1.0, 0.5), Vec2::new(6.0, 0.5)),
        );

        enemy.activate(&mut physics);

        assert_eq!(physics.position(body), Some(Vec2::new(1.0, 0.5)));
        assert_eq!(enemy.target(), Some(player));
    }

    #[test]
    fn unresolved_target_patrols_forever() {
        let mut physics = StubPhysics::new();
        let body = physics.add_body(Vec2::new(5.0, 0.0));
        let mut enemy = EnemyAi::new(
            body,
            config(),
            PatrolRoute::between(Vec2::ZERO, Vec2::new(10.0, 0.0)),
        );
        enemy.activate(&mut physics);

        // A player spawned after activation is never picked up.
        let late = physics.add_body(Vec2::new(5.5, 0.0));
        physics.tag(late, "player");
        for _ in 0..10 {
            step(&mut physics, &mut enemy);
            assert_eq!(enemy.mode(), EnemyMode::Patrol);
        }
        assert_eq!(enemy.target(), None);
    }

    #[test]
    fn rewind_restores_mode_direction_and_body() {
        let (mut physics, mut enemy, target) = setup(5.0, Some(6.0));
        let body = enemy.body();
        step(&mut physics, &mut enemy);
        assert_eq!(enemy.mode(), EnemyMode::Chase);
        enemy.record_state(&physics, 8);
        let recorded_velocity = physics.velocity(body).unwrap();

        // Target leaves; the enemy drops back to patrol and turns around.
        physics.set_position(target.unwrap(), Vec2::new(50.0, 0.0));
        physics.set_position(body, Vec2::new(10.0, 0.0));
        step(&mut physics, &mut enemy);
        assert_eq!(enemy.mode(), EnemyMode::Patrol);
        assert_eq!(enemy.patrol_direction(), -1.0);

        assert!(enemy.rewind_state(&mut physics));
        assert_eq!(enemy.mode(), EnemyMode::Chase);
        assert_eq!(enemy.patrol_direction(), 1.0);
        assert_eq!(physics.position(body), Some(Vec2::new(5.0, 0.0)));
        assert_eq!(physics.velocity(body), Some(recorded_velocity));
    }

    #[test]
    fn exhausted_rewind_leaves_state_alone() {
        let (mut physics, mut enemy, _) = setup(5.0, None);
        enemy.state.patrol_direction = -1.0;
        assert!(!enemy.rewind_state(&mut physics));
        assert!(!enemy.rewind_state(&mut physics));
        assert_eq!(enemy.patrol_direction(), -1.0);
        assert_eq!(enemy.mode(), EnemyMode::Patrol);
        assert_eq!(physics.position(enemy.body()), Some(Vec2::new(5.0, 0.0)));
    }

    #[test]
    fn with_patrol_direction_normalizes_sign() {
        let physics_body = BodyId(0);
        let enemy = EnemyAi::new(physics_body, config(), PatrolRoute::none())
            .with_patrol_direction(-0.3);
        assert_eq!(enemy.patrol_direction(), -1.0);
    }

    // ── proptest ───────────────────────────────────────────────

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn patrol_enters_chase_only_within_radius(d in 0.0f32..20.0) {
                let (mut physics, mut enemy, _) = setup(2.0, Some(2.0 + d));
                step(&mut physics, &mut enemy);
                let dx = (2.0f32 + d) - 2.0;
                let expected = if dx <= 5.0 { EnemyMode::Chase } else { EnemyMode::Patrol };
                prop_assert_eq!(enemy.mode(), expected);
            }

            #[test]
            fn chase_exits_only_beyond_band(d in 0.0f32..20.0) {
                let (mut physics, mut enemy, target) = setup(2.0, Some(2.5));
                step(&mut physics, &mut enemy);
                prop_assert_eq!(enemy.mode(), EnemyMode::Chase);

                physics.set_position(enemy.body(), Vec2::new(2.0, 0.0));
                physics.set_position(target.unwrap(), Vec2::new(2.0 + d, 0.0));
                step(&mut physics, &mut enemy);
                let dx = (2.0f32 + d) - 2.0;
                let expected = if dx > 7.5 { EnemyMode::Patrol } else { EnemyMode::Chase };
                prop_assert_eq!(enemy.mode(), expected);
            }

            #[test]
            fn record_rewind_is_inverse(
                x in -20.0f32..20.0,
                vx in -10.0f32..10.0,
                vy in -10.0f32..10.0,
                chasing in any::<bool>(),
                left in any::<bool>(),
            ) {
                let (mut physics, mut enemy, _) = setup(x, None);
                let body = enemy.body();
                physics.set_velocity(body, Vec2::new(vx, vy));
                enemy.state = EnemyState {
                    mode: if chasing { EnemyMode::Chase } else { EnemyMode::Patrol },
                    patrol_direction: if left { -1.0 } else { 1.0 },
                };
                let before = enemy.state();

                enemy.record_state(&physics, 4);
                step(&mut physics, &mut enemy);
                physics.set_position(body, Vec2::new(x + 3.0, 1.0));
                prop_assert!(enemy.rewind_state(&mut physics));

                prop_assert_eq!(enemy.state(), before);
                prop_assert_eq!(physics.position(body), Some(Vec2::new(x, 0.0)));
                prop_assert_eq!(physics.velocity(body), Some(Vec2::new(vx, vy)));
            }
        }
    }
}
