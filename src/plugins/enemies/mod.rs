//! Enemies plugin: records, the behaviour table, and the per-frame driver.
//!
//! Each enemy is one entity carrying an `EnemyRecord`. The record holds the
//! state every variant shares (`EnemyBody`) and the variant config that owns
//! everything else, including gun handles.
//!
//! Frame shape (all in `FixedUpdate`):
//! ```text
//!  PreUpdate  reset_enemy_frame, process_spawn_requests
//!  Update     run_enemy_updates   snapshot -> variant updates -> flush -> movement
//!  Resolve    (combat / projectiles apply damage to records)
//!  Death      enemy_death_trigger release once, mark PendingDespawn
//!  Cleanup    despawn_marked_enemies
//! ```
//!
//! Records are never despawned in the middle of a frame. A record whose
//! health hits zero still exists (released, marked) until Cleanup, so
//! nothing that runs earlier in the frame can observe a dangling entity.

pub mod behavior;
pub mod error;
pub mod motion;
pub mod presets;
pub mod record;
pub mod spawn;
pub mod variants;

pub use behavior::{EnemyBehavior, EnemyConfig};
pub use error::{DataLoadError, ReleaseError, SpawnError};
pub use presets::{EnemyPreset, EnemyPresets, EnemyStats, EnemyVariant};
pub use record::{EnemyBody, EnemyRecord, SpawnPhase};
pub use spawn::{build_enemy_record, spawn_enemy, spawn_enemy_now, SpawnEnemyRequest};

use bevy::ecs::message::{MessageWriter, Messages};
use bevy::prelude::*;

use crate::common::geometry::Aabb;
use crate::common::rng::SimRng;
use crate::common::state::GameState;
use crate::common::tunables::Tunables;
use crate::plugins::combat::events::{CombatEvent, FrameEvents};
use crate::plugins::combat::messages::CombatRequest;
use crate::plugins::core::SimSet;
use crate::plugins::player::{self, Player};
use crate::plugins::projectiles::messages::SpawnBulletRequest;
use crate::plugins::weapons::HandleRegistry;
use crate::plugins::world::{wall_hitboxes, Wall};

use behavior::{AllyView, DeathContext, FrameContext, FrameOutput, PlayerView};

/// Marker: released this frame, removed in Cleanup.
#[derive(Component, Debug, Clone, Copy)]
pub struct PendingDespawn;

/// How many Start and OnDeath calls have happened. Equal counts after a
/// level transition mean nothing leaked.
#[derive(Resource, Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifecycleCounters {
    pub started: u64,
    pub released: u64,
}

impl LifecycleCounters {
    pub fn live(&self) -> u64 {
        self.started.saturating_sub(self.released)
    }
}

fn update_spawn_requests(mut msgs: ResMut<Messages<SpawnEnemyRequest>>) {
    msgs.update();
}

pub fn plugin(app: &mut App) {
    app.init_resource::<EnemyPresets>()
        .init_resource::<LifecycleCounters>()
        .init_resource::<Messages<SpawnEnemyRequest>>()
        .add_systems(Startup, presets::load_enemy_presets);

    app.add_systems(
        FixedUpdate,
        (reset_enemy_frame, spawn::process_spawn_requests)
            .chain()
            .in_set(SimSet::PreUpdate)
            .run_if(in_state(GameState::InGame)),
    );

    app.add_systems(
        FixedUpdate,
        run_enemy_updates
            .after(player::apply_movement)
            .in_set(SimSet::Update)
            .run_if(in_state(GameState::InGame)),
    );

    app.add_systems(
        FixedUpdate,
        enemy_death_trigger
            .in_set(SimSet::Death)
            .run_if(in_state(GameState::InGame)),
    );

    app.add_systems(
        FixedUpdate,
        (despawn_marked_enemies, update_spawn_requests)
            .in_set(SimSet::Cleanup)
            .run_if(in_state(GameState::InGame)),
    );

    app.add_systems(OnExit(GameState::InGame), release_level_enemies);
}

// -----------------------------------------------------------------------------
// PreUpdate
// -----------------------------------------------------------------------------

/// Clear per-frame flags and latch the command buff resolved last frame.
pub fn reset_enemy_frame(mut q: Query<&mut EnemyRecord, Without<PendingDespawn>>) {
    for mut record in &mut q {
        let body = &mut record.body;
        body.hit_this_frame = false;
        body.speed_scale = 1.0;
        body.buff = body.pending_buff;
        body.pending_buff = 1.0;
    }
}

// -----------------------------------------------------------------------------
// Update
// -----------------------------------------------------------------------------

/// Drive every active enemy for one frame.
///
/// 1. Tick materialization. A record that activates on top of a wall, the
///    player or another enemy dies.
/// 2. Snapshot the player, live enemies and walls.
/// 3. Run each variant update against the snapshot, flushing its bullets,
///    requests and events.
/// 4. Move bodies in entity order, blocked by walls, the player and the
///    others' current positions.
#[allow(clippy::too_many_arguments)]
pub fn run_enemy_updates(
    time: Res<Time<Fixed>>,
    tunables: Res<Tunables>,
    mut rng: ResMut<SimRng>,
    mut events: ResMut<FrameEvents>,
    mut bullets: MessageWriter<SpawnBulletRequest>,
    mut requests: MessageWriter<CombatRequest>,
    q_walls: Query<&Wall>,
    q_player: Query<(Entity, &Player)>,
    mut q_enemies: Query<(Entity, &mut EnemyRecord), Without<PendingDespawn>>,
) {
    let dt = time.delta_secs();
    let walls = wall_hitboxes(&q_walls);
    let player = q_player.single().ok().map(|(entity, p)| PlayerView {
        entity,
        position: p.position,
        velocity: p.velocity,
        hitbox: p.hitbox(),
        alive: p.is_alive(),
    });

    let mut order: Vec<Entity> = q_enemies.iter().map(|(e, _)| e).collect();
    order.sort_unstable();

    // 1. Materialization.
    let mut activated = Vec::new();
    for &e in &order {
        let Ok((_, mut record)) = q_enemies.get_mut(e) else { continue };
        if let SpawnPhase::Materializing { remaining, total } = record.phase {
            let remaining = remaining - dt;
            record.phase = if remaining <= 0.0 {
                activated.push(e);
                SpawnPhase::Active
            } else {
                SpawnPhase::Materializing { remaining, total }
            };
        }
    }
    for &e in &activated {
        let Ok((_, record)) = q_enemies.get(e) else { continue };
        let hitbox = record.body.hitbox();
        let blocked = walls.iter().any(|w| hitbox.overlaps(w))
            || player.is_some_and(|p| p.alive && hitbox.overlaps(&p.hitbox))
            || q_enemies
                .iter()
                .any(|(other, r)| other != e && r.is_hittable() && hitbox.overlaps(&r.body.hitbox()));
        if blocked {
            let Ok((_, mut record)) = q_enemies.get_mut(e) else { continue };
            debug!("{:?} materialized inside an obstacle", record.variant);
            record.body.health = 0;
        }
    }

    // 2. Snapshot.
    let views: Vec<AllyView> = order
        .iter()
        .filter_map(|&e| q_enemies.get(e).ok())
        .filter(|(_, r)| r.is_hittable())
        .map(|(entity, r)| AllyView {
            entity,
            variant: r.variant,
            position: r.body.position,
            health: r.body.health,
            max_health: r.body.max_health,
        })
        .collect();

    // 3. Behaviour.
    let mut allies = Vec::with_capacity(views.len());
    let mut out = FrameOutput::default();
    for &e in &order {
        let Ok((_, mut record)) = q_enemies.get_mut(e) else { continue };
        if !record.is_hittable() {
            continue;
        }

        allies.clear();
        allies.extend(views.iter().filter(|a| a.entity != e).copied());

        let mut ctx = FrameContext {
            dt: dt * record.body.buff,
            entity: e,
            player,
            allies: &allies,
            walls: &walls,
            rng: &mut rng,
            out: &mut out,
        };
        record.update(&mut ctx);

        bullets.write_batch(out.bullets.drain(..));
        requests.write_batch(out.requests.drain(..));
        events.extend(out.events.drain(..));
    }

    // 4. Movement.
    let mut bodies: Vec<(Entity, Aabb)> = order
        .iter()
        .filter_map(|&e| q_enemies.get(e).ok())
        .filter(|(_, r)| r.is_hittable())
        .map(|(e, r)| (e, r.body.hitbox()))
        .collect();
    let mut blockers = Vec::with_capacity(walls.len() + bodies.len() + 1);
    for i in 0..bodies.len() {
        let e = bodies[i].0;
        let Ok((_, mut record)) = q_enemies.get_mut(e) else { continue };

        blockers.clear();
        blockers.extend_from_slice(&walls);
        if let Some(p) = player.filter(|p| p.alive) {
            blockers.push(p.hitbox);
        }
        blockers.extend(bodies.iter().filter(|(other, _)| *other != e).map(|(_, hb)| *hb));

        motion::step_body(&mut record.body, dt, tunables.lateral_damping, &blockers);
        bodies[i].1 = record.body.hitbox();
    }
}

// -----------------------------------------------------------------------------
// Death / Cleanup
// -----------------------------------------------------------------------------

/// Release every record whose health reached zero, exactly once.
pub fn enemy_death_trigger(
    mut commands: Commands,
    tunables: Res<Tunables>,
    mut handles: ResMut<HandleRegistry>,
    mut events: ResMut<FrameEvents>,
    mut counters: ResMut<LifecycleCounters>,
    mut q_player: Query<&mut Player>,
    mut q: Query<(Entity, &mut EnemyRecord), Without<PendingDespawn>>,
) {
    for (entity, mut record) in &mut q {
        if record.body.is_alive() {
            continue;
        }

        let mut ctx = DeathContext { entity, handles: &mut handles, events: &mut events };
        if let Err(e) = record.release(&mut ctx) {
            error!("{:?} {entity:?}: {e}", record.variant);
            debug_assert!(false, "dead record released twice");
            commands.entity(entity).insert(PendingDespawn);
            continue;
        }

        counters.released += 1;
        commands.entity(entity).insert(PendingDespawn);
        events.push(CombatEvent::EnemyKilled {
            entity,
            variant: record.variant,
            position: record.body.position,
        });
        if let Ok(mut player) = q_player.single_mut() {
            player.reward_kill(tunables.kill_ammo_bonus);
        }
    }
}

pub fn despawn_marked_enemies(mut commands: Commands, q: Query<Entity, With<PendingDespawn>>) {
    for e in &q {
        commands.entity(e).despawn();
    }
}

/// Leaving the level: release what is still live, then remove every record.
pub fn release_level_enemies(
    mut commands: Commands,
    mut handles: ResMut<HandleRegistry>,
    mut events: ResMut<FrameEvents>,
    mut counters: ResMut<LifecycleCounters>,
    mut q: Query<(Entity, &mut EnemyRecord)>,
) {
    for (entity, mut record) in &mut q {
        if !record.is_released() {
            let mut ctx = DeathContext { entity, handles: &mut handles, events: &mut events };
            if record.release(&mut ctx).is_ok() {
                counters.released += 1;
            }
        }
        commands.entity(entity).despawn();
    }
    info!("Level enemies released: {} started, {} released", counters.started, counters.released);
}
