//! Pre-spawned bullet entities and their free list.

use bevy::prelude::*;

use super::components::{Bullet, BulletMotion, BulletState, PooledBullet};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BulletEntity(pub Entity);

#[derive(Resource, Debug)]
pub struct BulletPool {
    pub free: Vec<BulletEntity>,
    pub capacity: usize,
}

impl BulletPool {
    pub fn new(capacity: usize) -> Self {
        Self { free: Vec::with_capacity(capacity), capacity }
    }

    #[inline]
    pub fn pop_free(&mut self) -> Option<BulletEntity> {
        self.free.pop()
    }

    #[inline]
    pub fn push_free(&mut self, e: BulletEntity) {
        self.free.push(e);
    }

    pub fn in_use(&self) -> usize {
        self.capacity - self.free.len()
    }
}

/// Pre-spawn pooled bullets (inactive).
pub fn init_bullet_pool(mut commands: Commands, mut pool: ResMut<BulletPool>) {
    pool.free.clear();
    let cap = pool.capacity;
    pool.free.reserve(cap);

    for _ in 0..cap {
        let e = commands
            .spawn((
                Name::new("Bullet(Pooled)"),
                PooledBullet,
                BulletState::Inactive,
                Bullet::inactive(),
                BulletMotion::default(),
            ))
            .id();

        pool.push_free(BulletEntity(e));
    }
}

/// Level exit: every bullet in flight goes back to the pool.
pub fn recall_all_bullets(
    mut pool: ResMut<BulletPool>,
    mut q: Query<(Entity, &mut BulletState, &mut BulletMotion), With<PooledBullet>>,
) {
    let mut recalled = 0usize;
    for (e, mut state, mut motion) in &mut q {
        if *state == BulletState::Inactive {
            continue;
        }
        *state = BulletState::Inactive;
        *motion = BulletMotion::default();
        pool.push_free(BulletEntity(e));
        recalled += 1;
    }
    if recalled > 0 {
        debug!("recalled {recalled} bullets on level exit");
    }
}
