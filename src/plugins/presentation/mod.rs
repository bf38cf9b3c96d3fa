//! Presentation: the read-only view the renderer consumes.
//!
//! The simulation never draws. Once per frame, after the fixed steps have
//! run, `build_render_snapshot` copies what a renderer needs into
//! `RenderSnapshot`. Entries are ordered by entity so two identical worlds
//! produce identical snapshots.

pub mod visual;

pub use visual::{EnemyVisual, GunPose, Overlay, OverlayStyle};

use bevy::prelude::*;

use crate::common::layers::Faction;
use crate::common::state::GameState;
use crate::plugins::enemies::{EnemyRecord, EnemyVariant};
use crate::plugins::interactables::{Interactable, InteractableKind};
use crate::plugins::player::Player;
use crate::plugins::projectiles::components::{Bullet, BulletMotion, BulletState};

#[derive(Clone, Debug, PartialEq)]
pub struct EnemySnapshot {
    pub entity: Entity,
    pub variant: EnemyVariant,
    pub position: Vec2,
    pub facing: Vec2,
    pub health: i32,
    pub max_health: i32,
    /// 0 when the spawn marker appears, 1 once active.
    pub materialize: f32,
    pub visual: EnemyVisual,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BulletSnapshot {
    pub position: Vec2,
    pub velocity: Vec2,
    pub faction: Faction,
}

#[derive(Clone, Debug, PartialEq)]
pub struct InteractableSnapshot {
    pub entity: Entity,
    pub kind: InteractableKind,
    pub texture_key: &'static str,
    pub position: Vec2,
    pub label: Option<String>,
    pub focused: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlayerSnapshot {
    pub position: Vec2,
    pub health: i32,
    pub max_health: i32,
    pub energy: f32,
    pub reserve_ammo: u32,
    pub kills: u32,
    pub invincible: bool,
    pub gun_name: String,
    pub magazine: u32,
    pub gun: GunPose,
}

#[derive(Resource, Default, Debug, Clone, PartialEq)]
pub struct RenderSnapshot {
    pub enemies: Vec<EnemySnapshot>,
    pub bullets: Vec<BulletSnapshot>,
    pub interactables: Vec<InteractableSnapshot>,
    pub player: Option<PlayerSnapshot>,
}

pub fn plugin(app: &mut App) {
    app.init_resource::<RenderSnapshot>().add_systems(
        PostUpdate,
        build_render_snapshot.run_if(in_state(GameState::InGame)),
    );
}

pub fn build_render_snapshot(
    mut snapshot: ResMut<RenderSnapshot>,
    q_enemies: Query<(Entity, &EnemyRecord)>,
    q_bullets: Query<(&BulletState, &Bullet, &BulletMotion)>,
    q_items: Query<(Entity, &Interactable)>,
    q_player: Query<&Player>,
) {
    let snap = &mut *snapshot;

    snap.enemies.clear();
    // `render` logs and returns None for released records.
    snap.enemies.extend(q_enemies.iter().filter_map(|(entity, record)| {
        let visual = record.render()?;
        Some(EnemySnapshot {
            entity,
            variant: record.variant,
            position: record.body.position,
            facing: record.body.facing,
            health: record.body.health,
            max_health: record.body.max_health,
            materialize: record.phase.progress(),
            visual,
        })
    }));
    snap.enemies.sort_unstable_by_key(|e| e.entity);

    snap.bullets.clear();
    snap.bullets.extend(
        q_bullets
            .iter()
            .filter(|(state, _, _)| **state == BulletState::Active)
            .map(|(_, bullet, motion)| BulletSnapshot {
                position: motion.position,
                velocity: motion.velocity,
                faction: bullet.faction,
            }),
    );

    snap.interactables.clear();
    snap.interactables.extend(q_items.iter().map(|(entity, item)| InteractableSnapshot {
        entity,
        kind: item.kind,
        texture_key: item.kind.texture_key(),
        position: item.position,
        label: item.label.clone(),
        focused: item.focused,
    }));
    snap.interactables.sort_unstable_by_key(|i| i.entity);

    snap.player = q_player.single().ok().map(|p| PlayerSnapshot {
        position: p.position,
        health: p.health,
        max_health: p.max_health,
        energy: p.energy,
        reserve_ammo: p.reserve_ammo,
        kills: p.kills,
        invincible: p.invincibility > 0.0,
        gun_name: p.gun.name.clone(),
        magazine: p.gun.magazine,
        gun: GunPose::of(&p.gun, p.position),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::rng::SimRng;
    use crate::common::test_utils::run_system_once;
    use crate::common::tunables::Tunables;
    use crate::plugins::combat::events::FrameEvents;
    use crate::plugins::enemies::behavior::DeathContext;
    use crate::plugins::enemies::{spawn_enemy_now, EnemyPresets, LifecycleCounters};
    use crate::plugins::interactables::InteractablePayload;
    use crate::plugins::weapons::{GunData, GunKind, HandleRegistry};

    fn world() -> World {
        let mut world = World::new();
        world.init_resource::<RenderSnapshot>();
        world.init_resource::<EnemyPresets>();
        world.init_resource::<LifecycleCounters>();
        world.init_resource::<HandleRegistry>();
        world.init_resource::<FrameEvents>();
        world.insert_resource(SimRng::seeded(9));
        world
    }

    #[test]
    fn snapshot_covers_every_live_thing() {
        let mut world = world();
        let gun = GunData::from_kind(GunKind::Pistol, Faction::Player);
        world.spawn(Player::new(Vec2::new(5.0, 5.0), gun, &Tunables::default()));
        let sentry = spawn_enemy_now(&mut world, EnemyVariant::Sentry, Vec2::new(100.0, 0.0), 0.0).unwrap();
        spawn_enemy_now(&mut world, EnemyVariant::Kamikaze, Vec2::new(-100.0, 0.0), 1.0).unwrap();

        let mut active = Bullet::inactive();
        active.reset_for_fire(Faction::Enemy, 5, 1.0, Some(sentry));
        world.spawn((BulletState::Active, active, BulletMotion::launch(Vec2::ZERO, Vec2::X)));
        world.spawn((BulletState::Inactive, Bullet::inactive(), BulletMotion::default()));

        let item = Interactable::new(InteractableKind::WeaponCrateClosed, Vec2::new(0.0, 50.0), InteractablePayload::CrateGun(GunKind::Smg))
            .unwrap();
        world.spawn(item);

        run_system_once(&mut world, build_render_snapshot);

        let snap = world.resource::<RenderSnapshot>();
        assert_eq!(snap.enemies.len(), 2);
        assert_eq!(snap.enemies[0].visual.texture_key, "sentry");
        assert_eq!(snap.enemies[0].materialize, 1.0);
        assert_eq!(snap.enemies[1].materialize, 0.0);
        assert_eq!(snap.bullets, vec![BulletSnapshot { position: Vec2::ZERO, velocity: Vec2::X, faction: Faction::Enemy }]);
        assert_eq!(snap.interactables.len(), 1);
        assert_eq!(snap.interactables[0].label.as_deref(), Some("Open Crate"));
        let player = snap.player.as_ref().unwrap();
        assert_eq!(player.position, Vec2::new(5.0, 5.0));
        assert_eq!(player.gun_name, "Pistol");
    }

    #[test]
    fn released_records_are_skipped() {
        let mut world = world();
        let e = spawn_enemy_now(&mut world, EnemyVariant::Proxy, Vec2::ZERO, 0.0).unwrap();
        world.resource_scope(|world, mut handles: Mut<HandleRegistry>| {
            world.resource_scope(|world, mut events: Mut<FrameEvents>| {
                let mut record = world.get_mut::<EnemyRecord>(e).unwrap();
                let mut ctx = DeathContext { entity: e, handles: &mut handles, events: &mut events };
                record.release(&mut ctx).unwrap();
            });
        });

        run_system_once(&mut world, build_render_snapshot);

        assert!(world.resource::<RenderSnapshot>().enemies.is_empty());
    }
}
