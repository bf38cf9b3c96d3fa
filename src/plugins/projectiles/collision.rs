//! Bullet hit resolution.
//!
//! Each active bullet sweeps its hitbox from last frame's position to this
//! frame's and collects every wall and opposing-faction hitbox it crosses. The
//! candidate nearest the start of the sweep wins; exact ties go to the lower
//! `Entity`. A bullet hits at most one thing and leaves the active set in the
//! same frame.

use std::cmp::Ordering;

use bevy::prelude::*;

use crate::common::geometry::Aabb;
use crate::common::layers::{Faction, Layer};
use crate::common::tunables::Tunables;
use crate::plugins::combat::events::{CombatEvent, FrameEvents, ImpactTarget};
use crate::plugins::enemies::{EnemyRecord, PendingDespawn};
use crate::plugins::player::Player;
use crate::plugins::world::Wall;

use super::components::{Bullet, BulletMotion, BulletState, PooledBullet};

#[derive(Clone, Copy, Debug)]
struct Candidate {
    distance_sq: f32,
    entity: Entity,
    target: ImpactTarget,
}

/// Nearest to the sweep origin first, then lowest entity.
fn closer(a: &Candidate, b: &Candidate) -> Ordering {
    a.distance_sq
        .partial_cmp(&b.distance_sq)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.entity.cmp(&b.entity))
}

/// Pick the surface a bullet with `sweep` (starting at `from`) hits, if any.
pub fn first_hit(
    faction: Faction,
    from: Vec2,
    sweep: &Aabb,
    walls: &[(Entity, Aabb)],
    enemies: &[(Entity, Aabb)],
    player: Option<(Entity, Aabb)>,
) -> Option<ImpactTarget> {
    let targets = faction.bullet_targets();
    let mut best: Option<Candidate> = None;

    let mut consider = |entity: Entity, rect: &Aabb, target: ImpactTarget| {
        if !sweep.overlaps(rect) {
            return;
        }
        let c = Candidate {
            distance_sq: from.distance_squared(rect.closest_point(from)),
            entity,
            target,
        };
        if best.as_ref().is_none_or(|b| closer(&c, b) == Ordering::Less) {
            best = Some(c);
        }
    };

    if targets.contains(Layer::World) {
        for (e, rect) in walls {
            consider(*e, rect, ImpactTarget::Wall(*e));
        }
    }
    if targets.contains(Layer::Enemy) {
        for (e, rect) in enemies {
            consider(*e, rect, ImpactTarget::Enemy(*e));
        }
    }
    if targets.contains(Layer::Player) {
        if let Some((e, rect)) = player {
            consider(e, &rect, ImpactTarget::Player(e));
        }
    }

    best.map(|c| c.target)
}

pub fn resolve_bullet_hits(
    tunables: Res<Tunables>,
    mut events: ResMut<FrameEvents>,
    mut q_bullets: Query<(&Bullet, &BulletMotion, &mut BulletState), With<PooledBullet>>,
    q_walls: Query<(Entity, &Wall)>,
    mut q_enemies: Query<(Entity, &mut EnemyRecord), Without<PendingDespawn>>,
    mut q_player: Query<(Entity, &mut Player)>,
) {
    let walls: Vec<(Entity, Aabb)> = q_walls.iter().map(|(e, w)| (e, w.hitbox)).collect();
    let mut enemies: Vec<(Entity, Aabb)> = q_enemies
        .iter()
        .filter(|(_, r)| r.is_hittable())
        .map(|(e, r)| (e, r.body.hitbox()))
        .collect();
    let mut player = q_player
        .iter()
        .find(|(_, p)| p.is_alive())
        .map(|(e, p)| (e, p.hitbox()));

    let size = Vec2::splat(tunables.bullet_hitbox);

    for (bullet, motion, mut state) in &mut q_bullets {
        if *state != BulletState::Active {
            continue;
        }

        let sweep = Aabb::centered(motion.previous, size).union(Aabb::centered(motion.position, size));
        let Some(target) = first_hit(bullet.faction, motion.previous, &sweep, &walls, &enemies, player) else {
            continue;
        };

        *state = BulletState::PendingReturn;
        let direction = motion.velocity.normalize_or_zero();

        match target {
            ImpactTarget::Wall(_) => {}
            ImpactTarget::Enemy(e) => {
                if let Ok((_, mut record)) = q_enemies.get_mut(e) {
                    record.take_damage(bullet.damage);
                    if !record.is_hittable() {
                        enemies.retain(|(other, _)| *other != e);
                    }
                }
            }
            ImpactTarget::Player(e) => {
                if let Ok((_, mut p)) = q_player.get_mut(e) {
                    let applied = p.apply_damage(bullet.damage);
                    events.push(CombatEvent::PlayerDamaged { amount: applied, remaining: p.health });
                    if !p.is_alive() {
                        player = None;
                    }
                }
            }
        }

        events.push(CombatEvent::Impact { position: motion.position, direction, target });
    }
}
