//! Spawn consumer: activate bullets from the pool.
//!
//! The pool free list contains only pooled bullet entities, so a popped entity
//! must match the bullet query. A mismatch is logged and the request dropped.

use bevy::prelude::*;
use bevy::ecs::message::MessageReader;

use super::components::{Bullet, BulletMotion, BulletState, PooledBullet};
use super::messages::SpawnBulletRequest;
use super::pool::{BulletEntity, BulletPool};

pub fn allocate_bullets_from_pool(
    mut pool: ResMut<BulletPool>,
    mut reader: MessageReader<SpawnBulletRequest>,
    mut q: Query<(&mut BulletState, &mut Bullet, &mut BulletMotion), With<PooledBullet>>,
) {
    for req in reader.read() {
        let Some(BulletEntity(e)) = pool.pop_free() else {
            // Capacity decision, not a correctness failure.
            debug!("bullet pool exhausted, dropping {:?} shot", req.faction);
            continue;
        };

        let Ok((mut state, mut bullet, mut motion)) = q.get_mut(e) else {
            error!("bullet pool held {e:?} without pooled bullet components");
            continue;
        };

        *state = BulletState::Active;
        bullet.reset_for_fire(req.faction, req.damage, req.lifetime, req.owner);
        *motion = BulletMotion::launch(req.pos, req.vel);
    }
}
