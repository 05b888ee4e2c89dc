//! Timeloop Quickstart: a player, one patrolling enemy, and a rewind.
//!
//! Demonstrates:
//!   1. Loading a SessionConfig from TOML
//!   2. Spawning actors into a TimeLoopWorld over stub physics
//!   3. Playing seeded input, then holding rewind until history runs out
//!
//! Run with:
//!   RUST_LOG=timeloop_engine=debug,timeloop_actors=debug cargo run --example quickstart

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use timeloop_actors::{EnemyAi, PatrolRoute, PlayerController, TickInput};
use timeloop_core::PhysicsWorld;
use timeloop_engine::{SessionConfig, TimeLoopWorld};
use timeloop_test_utils::StubPhysics;
use tracing_subscriber::EnvFilter;

const SESSION: &str = r#"
[time_loop]
max_rewind_seconds = 2.0

[enemy]
detection_radius = 4.0
attack_range = 0.8
"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = SessionConfig::from_toml_str(SESSION)?;

    // ─── Physics ────────────────────────────────────────────────
    let mut physics = StubPhysics::new().with_gravity(Vec2::new(0.0, -9.8));
    physics.add_ground(
        Vec2::new(-100.0, -1.0),
        Vec2::new(100.0, 0.0),
        config.player.ground_layer,
    );
    let player_body = physics.add_body(Vec2::new(-6.0, 0.0));
    physics.tag(player_body, &config.enemy.target_tag);
    let enemy_body = physics.add_body(Vec2::ZERO);

    // ─── World ──────────────────────────────────────────────────
    let mut world = TimeLoopWorld::new(config.time_loop.clone(), physics)?;
    world.spawn(PlayerController::new(player_body, config.player.clone()));
    let enemy = world.spawn(EnemyAi::new(
        enemy_body,
        config.enemy.clone(),
        PatrolRoute::between(Vec2::new(0.0, 0.0), Vec2::new(6.0, 0.0)),
    ));

    // ─── Play: walk right with the odd hop ──────────────────────
    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    for _ in 0..150 {
        let input = TickInput::moving(rng.random_range(0.2..1.0));
        let input = if rng.random_bool(0.03) {
            input.with_jump()
        } else {
            input
        };
        world.step(input);
    }
    let ai = world.actor::<EnemyAi>(enemy).ok_or("enemy missing")?;
    println!(
        "tick {}: player at {:?}, enemy {:?} at {:?}",
        world.controller().current_tick(),
        world.physics().position(player_body),
        ai.mode(),
        world.physics().position(enemy_body),
    );

    // ─── Rewind until every history is spent ────────────────────
    let mut rewound = 0;
    loop {
        let report = world.step(TickInput::rewind());
        if report.fully_exhausted() {
            break;
        }
        rewound += 1;
    }
    let ai = world.actor::<EnemyAi>(enemy).ok_or("enemy missing")?;
    println!(
        "rewound {rewound} ticks (time scale {}): back at tick {}, player at {:?}, enemy {:?}",
        world.controller().time_scale(),
        world.controller().current_tick(),
        world.physics().position(player_body),
        ai.mode(),
    );

    // ─── Release and play on ────────────────────────────────────
    let report = world.step(TickInput::idle());
    println!("released: {:?} tick {}", report.mode, report.tick);
    Ok(())
}
