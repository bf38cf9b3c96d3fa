//! Producer: the player's trigger.
//!
//! Reads `PlayerIntent`, pulls the held gun's trigger and writes the resulting
//! `SpawnBulletRequest`s. Semi-automatic guns fire once per press.

use bevy::prelude::*;
use bevy::ecs::message::MessageWriter;

use crate::common::rng::SimRng;
use crate::plugins::combat::events::{CombatEvent, FrameEvents};
use crate::plugins::player::{Player, PlayerIntent};
use crate::plugins::weapons::{FireMode, Shot};

use super::messages::SpawnBulletRequest;

/// Distance from the player centre to the muzzle.
const MUZZLE_OFFSET: f32 = 18.0;

pub fn request_player_bullets(
    intent: Res<PlayerIntent>,
    mut rng: ResMut<SimRng>,
    mut events: ResMut<FrameEvents>,
    mut q_player: Query<(Entity, &mut Player)>,
    mut writer: MessageWriter<SpawnBulletRequest>,
) {
    let Ok((entity, mut player)) = q_player.single_mut() else {
        return;
    };

    let pressed = intent.fire && !player.trigger_latched;
    player.trigger_latched = intent.fire;

    if !player.is_alive() {
        return;
    }

    let dir = (intent.aim - player.position).normalize_or_zero();
    player.gun.aim(dir);

    let wants_fire = match player.gun.stats.fire_mode {
        FireMode::Semi => pressed,
        FireMode::Auto => intent.fire,
    };
    if !wants_fire || dir == Vec2::ZERO {
        return;
    }

    let origin = player.position + dir * MUZZLE_OFFSET;
    let Some(requests) = player.gun.fire(origin, Shot::Aimed(dir), &mut rng, Some(entity)) else {
        debug!("player trigger pulled while gun not ready");
        return;
    };

    events.push(CombatEvent::Fired { faction: player.gun.owner, origin, direction: dir });
    writer.write_batch(requests);
}
