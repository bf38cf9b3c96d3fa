//! Resolution of cross-entity effects.

use bevy::ecs::message::MessageReader;
use bevy::prelude::*;

use crate::common::geometry::Aabb;
use crate::common::layers::Faction;
use crate::common::tunables::Tunables;
use crate::plugins::enemies::{EnemyRecord, EnemyVariant, PendingDespawn};
use crate::plugins::player::Player;

use super::events::{CombatEvent, FrameEvents};
use super::messages::CombatRequest;

/// Walking bodies stop at the player's edge, so contact is tested against a
/// slightly grown hitbox.
const CONTACT_MARGIN: f32 = 2.0;

pub fn resolve_combat_requests(
    mut reader: MessageReader<CombatRequest>,
    mut events: ResMut<FrameEvents>,
    mut q_enemies: Query<(Entity, &mut EnemyRecord), Without<PendingDespawn>>,
    mut q_player: Query<&mut Player>,
) {
    for req in reader.read() {
        match *req {
            CombatRequest::AreaDamage { faction, center, radius, damage, .. } => match faction {
                Faction::Enemy => {
                    for mut player in &mut q_player {
                        if player.is_alive() && player.hitbox().overlaps_circle(center, radius) {
                            let applied = player.apply_damage(damage);
                            events.push(CombatEvent::PlayerDamaged { amount: applied, remaining: player.health });
                        }
                    }
                }
                Faction::Player => {
                    for (_, mut record) in &mut q_enemies {
                        if record.is_hittable() && record.body.hitbox().overlaps_circle(center, radius) {
                            record.take_damage(damage);
                        }
                    }
                }
            },
            CombatRequest::DamagePlayer { amount, .. } => {
                for mut player in &mut q_player {
                    if player.is_alive() {
                        let applied = player.apply_damage(amount);
                        events.push(CombatEvent::PlayerDamaged { amount: applied, remaining: player.health });
                    }
                }
            }
            CombatRequest::DrainPlayer { source, amount } => {
                for mut player in &mut q_player {
                    let drained = player.drain_energy(amount);
                    if drained > 0.0 {
                        events.push(CombatEvent::Drain { source, amount: drained });
                    }
                }
            }
            CombatRequest::HealAllies { center, radius, amount, .. } => {
                for (_, mut record) in &mut q_enemies {
                    if !record.body.is_alive() || record.is_released() {
                        continue;
                    }
                    if record.body.position.distance(center) < radius {
                        let share = if record.variant == EnemyVariant::Recharge { amount / 2 } else { amount };
                        record.heal(share);
                    }
                }
            }
            CombatRequest::Buff { target, factor, .. } => {
                if let Ok((_, mut record)) = q_enemies.get_mut(target) {
                    record.body.pending_buff = record.body.pending_buff.max(factor);
                }
            }
        }
    }
}

/// Touching a live enemy hurts, at most once per invincibility window.
pub fn resolve_contact_damage(
    tunables: Res<Tunables>,
    mut events: ResMut<FrameEvents>,
    q_enemies: Query<&EnemyRecord, Without<PendingDespawn>>,
    mut q_player: Query<&mut Player>,
) {
    let Ok(mut player) = q_player.single_mut() else {
        return;
    };
    if !player.is_alive() {
        return;
    }

    let hb = player.hitbox();
    let reach = Aabb::new(
        hb.x - CONTACT_MARGIN,
        hb.y - CONTACT_MARGIN,
        hb.w + CONTACT_MARGIN * 2.0,
        hb.h + CONTACT_MARGIN * 2.0,
    );

    let Some(damage) = q_enemies
        .iter()
        .filter(|r| r.is_hittable() && r.body.stats.contact_damage > 0)
        .filter(|r| r.body.hitbox().overlaps(&reach))
        .map(|r| r.body.stats.contact_damage)
        .max()
    else {
        return;
    };

    if let Some(applied) = player.apply_contact_damage(damage, tunables.contact_invincibility) {
        events.push(CombatEvent::PlayerDamaged { amount: applied, remaining: player.health });
    }
}
