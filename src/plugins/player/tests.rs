use bevy::prelude::*;

use super::*;
use crate::common::rng::SimRng;
use crate::common::test_utils::{fixed_time_with_delta, run_system_once};
use crate::plugins::weapons::Shot;

fn world() -> World {
    let mut world = World::new();
    world.insert_resource(Tunables::default());
    world.insert_resource(fixed_time_with_delta(0.1));
    world.init_resource::<PlayerIntent>();
    world.init_resource::<HandleRegistry>();
    world
}

fn player(world: &mut World) -> Mut<'_, Player> {
    let e = world.query_filtered::<Entity, With<Player>>().single(world).unwrap();
    world.get_mut::<Player>(e).unwrap()
}

#[test]
fn spawn_creates_one_armed_player() {
    let mut world = world();
    run_system_once(&mut world, spawn);
    run_system_once(&mut world, spawn);

    assert_eq!(world.query::<&Player>().iter(&world).count(), 1);
    let live = world.resource::<HandleRegistry>().live_count();
    assert!(live > 0);

    let p = player(&mut world);
    assert_eq!(p.gun.kind, Some(GunKind::Pistol));
    assert_eq!(p.reserve_ammo, Tunables::default().player_max_ammo / 2);
}

#[test]
fn release_frees_handles_and_despawns() {
    let mut world = world();
    run_system_once(&mut world, spawn);
    run_system_once(&mut world, release);

    assert_eq!(world.query::<&Player>().iter(&world).count(), 0);
    assert_eq!(world.resource::<HandleRegistry>().live_count(), 0);
}

#[test]
fn movement_uses_speed_and_stops_at_walls() {
    let mut world = world();
    run_system_once(&mut world, spawn);
    world.resource_mut::<PlayerIntent>().move_axis = Vec2::new(1.0, 0.0);

    run_system_once(&mut world, apply_movement);
    assert_eq!(player(&mut world).velocity, Vec2::new(300.0, 0.0));
    assert!((player(&mut world).position.x - 30.0).abs() < 1e-3);

    // Wall right in front: the next step is cancelled.
    world.spawn(Wall::solid(Vec2::new(60.0, 0.0), Vec2::new(20.0, 200.0)));
    run_system_once(&mut world, apply_movement);
    assert!((player(&mut world).position.x - 30.0).abs() < 1e-3);
}

#[test]
fn dead_player_does_not_move() {
    let mut world = world();
    run_system_once(&mut world, spawn);
    player(&mut world).health = 0;
    world.resource_mut::<PlayerIntent>().move_axis = Vec2::Y;

    run_system_once(&mut world, apply_movement);

    assert_eq!(player(&mut world).position, Vec2::ZERO);
}

#[test]
fn damage_heal_and_drain_are_clamped() {
    let tunables = Tunables::default();
    let mut p = Player::new(Vec2::ZERO, GunData::from_kind(GunKind::Pistol, Faction::Player), &tunables);

    assert_eq!(p.apply_damage(30), 30);
    assert_eq!(p.heal(50), 30);
    assert_eq!(p.health, p.max_health);
    assert_eq!(p.apply_damage(500), 100);
    assert!(!p.is_alive());
    assert_eq!(p.apply_damage(5), 0);

    assert_eq!(p.drain_energy(-4.0), 0.0);
    assert_eq!(p.drain_energy(250.0), tunables.player_max_energy);
}

#[test]
fn contact_damage_opens_an_invincibility_window() {
    let mut world = world();
    run_system_once(&mut world, spawn);

    assert_eq!(player(&mut world).apply_contact_damage(10, 0.25), Some(10));
    assert_eq!(player(&mut world).apply_contact_damage(10, 0.25), None);

    // 0.1 s per frame: still covered after two frames, clear after three.
    run_system_once(&mut world, reset_player_frame);
    run_system_once(&mut world, reset_player_frame);
    assert_eq!(player(&mut world).apply_contact_damage(10, 0.25), None);
    run_system_once(&mut world, reset_player_frame);
    assert_eq!(player(&mut world).apply_contact_damage(10, 0.25), Some(10));
}

#[test]
fn kills_grant_capped_reserve_ammo() {
    let tunables = Tunables::default();
    let mut p = Player::new(Vec2::ZERO, GunData::from_kind(GunKind::Smg, Faction::Player), &tunables);
    p.reserve_ammo = tunables.player_max_ammo - 5;

    p.reward_kill(tunables.kill_ammo_bonus);

    assert_eq!(p.kills, 1);
    assert_eq!(p.reserve_ammo, tunables.player_max_ammo);
}

#[test]
fn equip_releases_old_handles_before_attaching_new() {
    let mut registry = HandleRegistry::default();
    let mut pistol = GunData::from_kind(GunKind::Pistol, Faction::Player);
    pistol.attach_handles(&mut registry);
    let mut p = Player::new(Vec2::ZERO, pistol, &Tunables::default());
    let held = registry.live_count();

    let old = p.equip_gun(GunData::from_kind(GunKind::Shotgun, Faction::Enemy), &mut registry);

    assert_eq!(old.kind, Some(GunKind::Pistol));
    assert!(old.handles().is_none());
    assert!(p.gun.handles().is_some());
    assert_eq!(p.gun.owner, Faction::Player);
    assert_eq!(registry.live_count(), held);
}

#[test]
fn empty_magazine_reloads_from_reserve() {
    let mut world = world();
    run_system_once(&mut world, spawn);
    {
        let mut p = player(&mut world);
        p.gun.magazine = 0;
        p.gun.start_reload();
    }
    let reserve_before = player(&mut world).reserve_ammo;
    let reload = player(&mut world).gun.stats.reload_time;

    let frames = (reload / 0.1).ceil() as usize + 1;
    for _ in 0..frames {
        run_system_once(&mut world, reset_player_frame);
    }

    let p = player(&mut world);
    assert_eq!(p.gun.magazine, p.gun.stats.ammo_capacity);
    assert_eq!(p.reserve_ammo, reserve_before - p.gun.stats.ammo_capacity);
}

#[test]
fn dry_reload_resumes_once_reserve_refills() {
    let mut world = world();
    run_system_once(&mut world, spawn);
    {
        let mut p = player(&mut world);
        p.reserve_ammo = 0;
        p.gun.magazine = 0;
        p.gun.start_reload();
    }
    let reload = player(&mut world).gun.stats.reload_time;
    let frames = (reload / 0.1).ceil() as usize + 2;

    for _ in 0..frames {
        run_system_once(&mut world, reset_player_frame);
    }
    {
        let p = player(&mut world);
        assert_eq!(p.gun.magazine, 0);
        assert!(!p.gun.is_reloading());
    }

    player(&mut world).reward_kill(30);
    for _ in 0..frames {
        run_system_once(&mut world, reset_player_frame);
    }

    let mut rng = SimRng::seeded(9);
    let mut p = player(&mut world);
    assert!(p.gun.magazine > 0);
    assert!(p.gun.fire(Vec2::ZERO, Shot::Aimed(Vec2::X), &mut rng, None).is_some());
}
