//! Building enemy records and turning them into entities.
//!
//! `build_enemy_record` is the one place Start runs. It never touches the
//! world, so a failed Start leaves nothing behind.

use bevy::ecs::message::MessageReader;
use bevy::prelude::*;

use crate::common::rng::SimRng;
use crate::common::tunables::Tunables;
use crate::plugins::weapons::HandleRegistry;

use super::behavior::{EnemyConfig, StartContext};
use super::error::SpawnError;
use super::presets::{EnemyPresets, EnemyVariant};
use super::record::{EnemyBody, EnemyRecord, SpawnPhase};
use super::LifecycleCounters;

/// Produced by wave logic or triggers outside the core; consumed in pre-update.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct SpawnEnemyRequest {
    pub variant: EnemyVariant,
    pub position: Vec2,
    /// Materialize delay in seconds. `None` uses `Tunables::spawn_delay`;
    /// zero or less spawns active.
    pub delay: Option<f32>,
}

impl SpawnEnemyRequest {
    pub fn immediate(variant: EnemyVariant, position: Vec2) -> Self {
        Self { variant, position, delay: Some(0.0) }
    }
}

pub fn build_enemy_record(
    variant: EnemyVariant,
    position: Vec2,
    delay: f32,
    presets: &EnemyPresets,
    handles: &mut HandleRegistry,
    rng: &mut SimRng,
) -> Result<EnemyRecord, SpawnError> {
    let preset = presets.get(variant).ok_or(SpawnError::MissingPreset(variant))?;
    if preset.stats.max_health <= 0 {
        return Err(SpawnError::InvalidHealth { variant, max_health: preset.stats.max_health });
    }
    if !position.is_finite() {
        return Err(SpawnError::InvalidPosition { variant, position });
    }

    let mut ctx = StartContext { variant, position, preset, handles, rng };
    let config = EnemyConfig::start(&mut ctx)?;

    let phase = if delay > 0.0 {
        SpawnPhase::Materializing { remaining: delay, total: delay }
    } else {
        SpawnPhase::Active
    };
    Ok(EnemyRecord::new(variant, EnemyBody::new(position, preset.stats.clone()), phase, config))
}

/// Build and spawn through `commands`. Returns the new entity.
#[allow(clippy::too_many_arguments)]
pub fn spawn_enemy(
    commands: &mut Commands,
    variant: EnemyVariant,
    position: Vec2,
    delay: f32,
    presets: &EnemyPresets,
    handles: &mut HandleRegistry,
    rng: &mut SimRng,
    counters: &mut LifecycleCounters,
) -> Result<Entity, SpawnError> {
    let record = build_enemy_record(variant, position, delay, presets, handles, rng)?;
    counters.started += 1;
    Ok(commands.spawn((Name::new(variant.name()), record)).id())
}

/// Immediate variant of `spawn_enemy` for exclusive contexts and tests.
pub fn spawn_enemy_now(
    world: &mut World,
    variant: EnemyVariant,
    position: Vec2,
    delay: f32,
) -> Result<Entity, SpawnError> {
    let record = world.resource_scope(|world, mut handles: Mut<HandleRegistry>| {
        world.resource_scope(|world, mut rng: Mut<SimRng>| {
            let presets = world.resource::<EnemyPresets>();
            build_enemy_record(variant, position, delay, presets, &mut handles, &mut rng)
        })
    })?;
    world.resource_mut::<LifecycleCounters>().started += 1;
    Ok(world.spawn((Name::new(variant.name()), record)).id())
}

/// Pre-update: materialize queued spawn requests. Refused requests are logged
/// and dropped.
pub fn process_spawn_requests(
    mut commands: Commands,
    mut requests: MessageReader<SpawnEnemyRequest>,
    tunables: Res<Tunables>,
    presets: Res<EnemyPresets>,
    mut handles: ResMut<HandleRegistry>,
    mut rng: ResMut<SimRng>,
    mut counters: ResMut<LifecycleCounters>,
) {
    for req in requests.read() {
        let delay = req.delay.unwrap_or(tunables.spawn_delay);
        match spawn_enemy(
            &mut commands,
            req.variant,
            req.position,
            delay,
            &presets,
            &mut handles,
            &mut rng,
            &mut counters,
        ) {
            Ok(entity) => debug!("Spawned {:?} as {entity:?}", req.variant),
            Err(e) => warn!("Spawn refused: {e}"),
        }
    }
}
