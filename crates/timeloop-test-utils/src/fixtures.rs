//! Reusable actor and world fixtures.
//!
//! - [`flat_ground`]: a wide ground strip on the default layer with its top at `y = 0`.
//! - [`spawn_player_body`]: a tagged player body standing on that ground.
//! - [`short_route`]: the `0..10` patrol route used across tests.

use glam::Vec2;
use timeloop_actors::{EnemyConfig, PatrolRoute};
use timeloop_core::{BodyId, LayerMask};

use crate::StubPhysics;

/// Add a ground strip spanning `x in [-1000, 1000]` with its top at `y = 0`.
pub fn flat_ground(physics: &mut StubPhysics) {
    physics.add_ground(
        Vec2::new(-1000.0, -10.0),
        Vec2::new(1000.0, 0.0),
        LayerMask::default(),
    );
}

/// Add a body tagged `"player"` at `(x, 0)`.
pub fn spawn_player_body(physics: &mut StubPhysics, x: f32) -> BodyId {
    let body = physics.add_body(Vec2::new(x, 0.0));
    physics.tag(body, "player");
    body
}

/// Patrol route between `x = 0` and `x = 10` at ground level.
pub fn short_route() -> PatrolRoute {
    PatrolRoute::between(Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0))
}

/// Enemy tuning used by the engine tests: detection at 5, chase at 4.
pub fn test_enemy_config() -> EnemyConfig {
    EnemyConfig {
        patrol_speed: 2.0,
        chase_speed: 4.0,
        detection_radius: 5.0,
        waypoint_arrival_threshold: 0.15,
        attack_range: Some(1.0),
        target_tag: "player".into(),
    }
}
