mod common;

use arena_sim::common::layers::Faction;
use arena_sim::plugins::combat::events::{CombatEvent, ImpactTarget};
use arena_sim::plugins::enemies::{EnemyRecord, EnemyVariant};
use arena_sim::plugins::projectiles::components::{Bullet, BulletState};
use bevy::prelude::*;

fn active_player_bullets(app: &mut App) -> usize {
    let world = app.world_mut();
    world
        .query::<(&Bullet, &BulletState)>()
        .iter(world)
        .filter(|(b, s)| b.faction == Faction::Player && **s != BulletState::Inactive)
        .count()
}

#[test]
fn player_shot_hits_once_and_returns_to_pool_same_frame() {
    let mut app = common::app_headless();
    let target = common::spawn(&mut app, EnemyVariant::Sentry, Vec2::new(100.0, 0.0));
    {
        let mut intent = common::intent(&mut app);
        intent.aim = Vec2::new(100.0, 0.0);
        intent.fire = true;
    }

    common::step(&mut app);
    assert_eq!(active_player_bullets(&mut app), 1);

    let hit = common::step_until(&mut app, 30, |events| {
        events
            .iter()
            .any(|e| matches!(e, CombatEvent::Impact { target: ImpactTarget::Enemy(t), .. } if *t == target))
    });
    assert!(hit.is_some(), "bullet never reached the sentry");

    // Returned to the pool within the hit frame.
    assert_eq!(active_player_bullets(&mut app), 0);

    let record = app.world().get::<EnemyRecord>(target).unwrap();
    assert_eq!(record.body.max_health - record.body.health, 25);

    // Holding the trigger on a semi-auto does not fire again.
    for _ in 0..20 {
        common::step(&mut app);
    }
    let record = app.world().get::<EnemyRecord>(target).unwrap();
    assert_eq!(record.body.max_health - record.body.health, 25);
}
