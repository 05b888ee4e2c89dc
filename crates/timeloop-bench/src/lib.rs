//! Benchmark profiles and utilities for the Timeloop rewind framework.
//!
//! - [`arena_profile`]: one player plus `n` patrolling enemies on flat ground
//! - [`input_stream`]: deterministic per-tick input from a seed

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use timeloop_actors::{EnemyAi, EnemyConfig, PatrolRoute, PlayerConfig, PlayerController, TickInput};
use timeloop_engine::{ConfigError, TimeLoopConfig, TimeLoopWorld};
use timeloop_test_utils::{flat_ground, StubPhysics};

/// Enemies are spread over `[0, ARENA_WIDTH)`.
pub const ARENA_WIDTH: f32 = 200.0;

/// Build a session with a player at the arena centre and `enemies`
/// patrol routes placed from `seed`.
///
/// Uses the default 5 s window at 50 Hz (250 frames per actor).
pub fn arena_profile(enemies: usize, seed: u64) -> Result<TimeLoopWorld<StubPhysics>, ConfigError> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut physics = StubPhysics::new().with_gravity(Vec2::new(0.0, -9.8));
    flat_ground(&mut physics);

    let player = physics.add_body(Vec2::new(ARENA_WIDTH / 2.0, 0.0));
    physics.tag(player, "player");
    let enemy_bodies: Vec<_> = (0..enemies)
        .map(|_| physics.add_body(Vec2::ZERO))
        .collect();

    let mut world = TimeLoopWorld::new(TimeLoopConfig::default(), physics)?;
    world.spawn(PlayerController::new(player, PlayerConfig::default()));
    for body in enemy_bodies {
        let left = rng.random_range(0.0..ARENA_WIDTH - 10.0);
        let span = rng.random_range(2.0..10.0);
        let route = PatrolRoute::between(Vec2::new(left, 0.0), Vec2::new(left + span, 0.0));
        world.spawn(EnemyAi::new(body, EnemyConfig::default(), route));
    }
    Ok(world)
}

/// `len` ticks of seeded input. Each tick holds rewind with
/// probability `rewind_p`.
pub fn input_stream(seed: u64, len: usize, rewind_p: f64) -> Vec<TickInput> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..len)
        .map(|_| TickInput {
            horizontal: rng.random_range(-1.0..=1.0),
            jump: rng.random_bool(0.05),
            rewind_held: rng.random_bool(rewind_p),
        })
        .collect()
}
