use bevy::prelude::*;

use super::*;
use crate::common::test_utils::run_system_once;
use crate::common::tunables::Tunables;

fn world_with_player(position: Vec2) -> (World, Entity) {
    let mut world = World::new();
    world.init_resource::<HandleRegistry>();
    world.init_resource::<PlayerIntent>();
    world.insert_resource(SimRng::seeded(5));

    let mut gun = GunData::from_kind(GunKind::Pistol, Faction::Player);
    gun.attach_handles(&mut world.resource_mut::<HandleRegistry>());
    let player = world.spawn(Player::new(position, gun, &Tunables::default())).id();
    (world, player)
}

fn spawn_with(world: &mut World, f: impl FnOnce(&mut Commands) -> Result<Entity, InteractableError>) -> Entity {
    let e = {
        let mut commands = world.commands();
        f(&mut commands).expect("valid interactable")
    };
    world.flush();
    e
}

/// Press interact for one frame, then release it.
fn press_interact(world: &mut World) {
    world.resource_mut::<PlayerIntent>().interact = true;
    run_system_once(world, update_focus);
    run_system_once(world, player_interact);
    world.resource_mut::<PlayerIntent>().interact = false;
    run_system_once(world, player_interact);
}

fn player(world: &World, e: Entity) -> &Player {
    world.get::<Player>(e).unwrap()
}

#[test]
fn payload_must_match_kind() {
    let gun = GunData::from_kind(GunKind::Smg, Faction::Player);
    assert!(Interactable::new(InteractableKind::Weapon, Vec2::ZERO, InteractablePayload::Gun(gun)).is_ok());

    assert_eq!(
        Interactable::new(InteractableKind::HealthLarge, Vec2::ZERO, InteractablePayload::CrateGun(GunKind::Smg)).unwrap_err(),
        InteractableError::PayloadMismatch { kind: InteractableKind::HealthLarge, payload: "CrateGun" }
    );
    assert!(Interactable::new(InteractableKind::WeaponCrateClosed, Vec2::ZERO, InteractablePayload::None).is_err());
    assert!(Interactable::new(InteractableKind::WeaponCrateOpen, Vec2::ZERO, InteractablePayload::Health(5)).is_err());
}

#[test]
fn equipped_gun_cannot_be_dropped() {
    let mut registry = HandleRegistry::default();
    let mut gun = GunData::from_kind(GunKind::Shotgun, Faction::Player);
    gun.attach_handles(&mut registry);

    let err = Interactable::new(InteractableKind::Weapon, Vec2::ZERO, InteractablePayload::Gun(gun)).unwrap_err();
    assert_eq!(err, InteractableError::GunStillEquipped("Shotgun".into()));
}

#[test]
fn accessors_check_the_kind() {
    let crate_item =
        Interactable::new(InteractableKind::WeaponCrateClosed, Vec2::ZERO, InteractablePayload::CrateGun(GunKind::BattleRifle)).unwrap();
    assert_eq!(crate_item.crate_gun(), Some(GunKind::BattleRifle));
    assert!(crate_item.gun().is_none());
    assert!(crate_item.health_amount().is_none());
    assert_eq!(crate_item.label.as_deref(), Some("Open Crate"));

    let health = Interactable::new(InteractableKind::HealthSmall, Vec2::ZERO, InteractablePayload::Health(HEALTH_SMALL_AMOUNT)).unwrap();
    assert_eq!(health.health_amount(), Some(HEALTH_SMALL_AMOUNT));
    assert!(health.crate_gun().is_none());
}

#[test]
fn health_pickups_always_resolve_large() {
    let (mut world, _) = world_with_player(Vec2::ZERO);
    for i in 0..8 {
        world.resource_scope(|world, mut rng: Mut<SimRng>| {
            let mut commands = world.commands();
            spawn_health_pickup(&mut commands, &mut rng, Vec2::new(i as f32 * 50.0, 300.0)).unwrap();
        });
        world.flush();
    }
    let kinds: Vec<_> = world.query::<&Interactable>().iter(&world).map(|i| i.kind).collect();
    assert_eq!(kinds.len(), 8);
    assert!(kinds.iter().all(|k| *k == InteractableKind::HealthLarge));
}

#[test]
fn only_the_first_overlap_is_focused() {
    let (mut world, _) = world_with_player(Vec2::ZERO);
    let a = spawn_with(&mut world, |c| spawn_weapon_crate(c, GunKind::Smg, Vec2::new(4.0, 0.0)));
    let b = spawn_with(&mut world, |c| spawn_weapon_crate(c, GunKind::Shotgun, Vec2::new(-4.0, 0.0)));
    let far = spawn_with(&mut world, |c| spawn_weapon_crate(c, GunKind::Pistol, Vec2::new(500.0, 0.0)));

    run_system_once(&mut world, update_focus);

    assert!(world.get::<Interactable>(a).unwrap().focused);
    assert!(!world.get::<Interactable>(b).unwrap().focused);
    assert!(!world.get::<Interactable>(far).unwrap().focused);
}

#[test]
fn opening_a_crate_drops_its_gun() {
    let (mut world, _) = world_with_player(Vec2::ZERO);
    let c = spawn_with(&mut world, |c| spawn_weapon_crate(c, GunKind::AssaultRifle, Vec2::ZERO));

    press_interact(&mut world);

    let opened = world.get::<Interactable>(c).unwrap();
    assert_eq!(opened.kind, InteractableKind::WeaponCrateOpen);
    assert!(opened.crate_gun().is_none());

    let dropped: Vec<_> = world
        .query::<&Interactable>()
        .iter(&world)
        .filter(|i| i.kind == InteractableKind::Weapon)
        .map(|i| i.gun().map(|g| g.kind))
        .collect();
    assert_eq!(dropped, vec![Some(Some(GunKind::AssaultRifle))]);
}

#[test]
fn holding_interact_only_triggers_once() {
    let (mut world, p) = world_with_player(Vec2::ZERO);
    spawn_with(&mut world, |c| spawn_weapon(c, GunData::from_kind(GunKind::Smg, Faction::Player), Vec2::ZERO));

    world.resource_mut::<PlayerIntent>().interact = true;
    for _ in 0..5 {
        run_system_once(&mut world, update_focus);
        run_system_once(&mut world, player_interact);
    }

    // One swap: holding the SMG, the pistol lies on the floor.
    assert_eq!(player(&world, p).gun.kind, Some(GunKind::Smg));
}

#[test]
fn health_pickup_heals_up_to_max_and_disappears() {
    let (mut world, p) = world_with_player(Vec2::ZERO);
    world.get_mut::<Player>(p).unwrap().health = 80;
    let h = spawn_with(&mut world, |c| {
        create_interactable(c, InteractableKind::HealthLarge, Vec2::ZERO, InteractablePayload::Health(HEALTH_LARGE_AMOUNT))
    });

    press_interact(&mut world);

    assert_eq!(player(&world, p).health, player(&world, p).max_health);
    assert!(world.get_entity(h).is_err());
}

#[test]
fn weapon_swaps_never_leak_handles() {
    let (mut world, p) = world_with_player(Vec2::ZERO);
    let held = world.resource::<HandleRegistry>().live_count();
    spawn_with(&mut world, |c| spawn_weapon(c, GunData::from_kind(GunKind::Smg, Faction::Player), Vec2::ZERO));

    for i in 0..10 {
        press_interact(&mut world);

        let expected = if i % 2 == 0 { GunKind::Smg } else { GunKind::Pistol };
        assert_eq!(player(&world, p).gun.kind, Some(expected));
        assert_eq!(world.resource::<HandleRegistry>().live_count(), held);

        let pickups: Vec<_> = world.query::<&Interactable>().iter(&world).collect();
        assert_eq!(pickups.len(), 1);
        assert!(pickups[0].gun().is_some_and(|g| g.handles().is_none()));
    }
}

#[test]
fn open_crate_is_inert() {
    let (mut world, p) = world_with_player(Vec2::ZERO);
    let c = spawn_with(&mut world, |c| create_interactable(c, InteractableKind::WeaponCrateOpen, Vec2::ZERO, InteractablePayload::None));

    press_interact(&mut world);

    assert!(!world.get::<Interactable>(c).unwrap().focused);
    assert_eq!(player(&world, p).gun.kind, Some(GunKind::Pistol));
    assert_eq!(world.query::<&Interactable>().iter(&world).count(), 1);
}
