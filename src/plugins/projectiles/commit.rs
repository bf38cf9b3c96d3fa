//! Return commit: recycle bullets back into the pool.
//!
//! This system owns the *Inactive invariants*: an inactive bullet has zero
//! velocity, sits at the origin, and is on the free list exactly once.

use bevy::prelude::*;

use super::components::{BulletMotion, BulletState, PooledBullet};
use super::pool::{BulletEntity, BulletPool};

pub fn return_to_pool_commit(
    mut pool: ResMut<BulletPool>,
    mut q: Query<(Entity, &mut BulletState, &mut BulletMotion), With<PooledBullet>>,
) {
    for (e, mut state, mut motion) in &mut q {
        if *state != BulletState::PendingReturn {
            continue;
        }

        *state = BulletState::Inactive;
        *motion = BulletMotion::default();

        pool.push_free(BulletEntity(e));
    }
}
