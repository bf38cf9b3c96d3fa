mod common;

use arena_sim::plugins::enemies::{EnemyRecord, EnemyVariant, LifecycleCounters};
use arena_sim::plugins::player::Player;
use arena_sim::plugins::presentation::RenderSnapshot;
use arena_sim::plugins::projectiles::pool::BulletPool;
use arena_sim::plugins::world::Wall;
use bevy::prelude::*;

#[test]
fn boots_into_a_populated_level() {
    let mut app = common::app_headless();

    assert_eq!(common::count::<Wall>(&mut app), 6);
    assert_eq!(common::count::<Player>(&mut app), 1);
    let pool = app.world().resource::<BulletPool>();
    assert_eq!(pool.free.len(), pool.capacity);
}

#[test]
fn full_roster_survives_a_few_seconds() {
    let mut app = common::app_headless();
    for (i, variant) in EnemyVariant::ALL.into_iter().enumerate() {
        common::spawn(&mut app, variant, Vec2::new(-500.0 + i as f32 * 100.0, 300.0));
    }
    // Keep the player alive so every behaviour keeps running.
    common::intent(&mut app).aim = Vec2::new(0.0, 300.0);

    for _ in 0..192 {
        common::step(&mut app);
        let world = app.world_mut();
        for mut p in world.query::<&mut Player>().iter_mut(world) {
            p.health = p.max_health;
        }
    }

    let counters = *app.world().resource::<LifecycleCounters>();
    assert_eq!(counters.live(), common::count::<EnemyRecord>(&mut app) as u64);

    // A full frame rebuilds the render snapshot.
    app.update();
    let live = common::count::<EnemyRecord>(&mut app) as u64;
    let snapshot = app.world().resource::<RenderSnapshot>();
    assert_eq!(snapshot.enemies.len() as u64, live);
    assert!(snapshot.player.is_some());
}
