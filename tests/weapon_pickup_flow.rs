mod common;

use arena_sim::plugins::interactables::{spawn_weapon_crate, Interactable, InteractableKind};
use arena_sim::plugins::weapons::{GunKind, HandleRegistry};
use bevy::prelude::*;

fn press(app: &mut App) {
    common::intent(app).interact = true;
    common::step(app);
    common::intent(app).interact = false;
    common::step(app);
}

#[test]
fn crate_to_hand() {
    let mut app = common::app_headless();
    {
        let world = app.world_mut();
        let mut commands = world.commands();
        spawn_weapon_crate(&mut commands, GunKind::Shotgun, Vec2::new(0.0, 10.0)).unwrap();
    }
    app.world_mut().flush();
    let handles = app.world().resource::<HandleRegistry>().live_count();

    // Open the crate: it drops a shotgun below itself.
    press(&mut app);
    let drop_at = {
        let world = app.world_mut();
        world
            .query::<&Interactable>()
            .iter(world)
            .find(|i| i.kind == InteractableKind::Weapon)
            .map(|i| i.position)
            .expect("crate dropped a weapon")
    };

    // Walk onto it and pick it up.
    let toward = (drop_at - common::player(&mut app).position).normalize_or_zero();
    common::intent(&mut app).move_axis = toward;
    for _ in 0..64 {
        common::step(&mut app);
        if common::player(&mut app).position.distance(drop_at) < 4.0 {
            break;
        }
    }
    common::intent(&mut app).move_axis = Vec2::ZERO;
    press(&mut app);

    assert_eq!(common::player(&mut app).gun.kind, Some(GunKind::Shotgun));
    assert_eq!(app.world().resource::<HandleRegistry>().live_count(), handles);

    // The pistol is on the floor now.
    let world = app.world_mut();
    let pistols = world
        .query::<&Interactable>()
        .iter(world)
        .filter(|i| i.gun().is_some_and(|g| g.kind == Some(GunKind::Pistol)))
        .count();
    assert_eq!(pistols, 1);
}
