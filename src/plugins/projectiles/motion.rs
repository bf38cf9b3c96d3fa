//! Bullet integration and lifetime expiry.
//!
//! Expiry runs after hit resolution, so a bullet that reaches a target on its
//! last frame still hits.

use bevy::prelude::*;

use crate::plugins::combat::events::{CombatEvent, FrameEvents};

use super::components::{Bullet, BulletMotion, BulletState, PooledBullet};

pub fn advance_bullets(
    time: Res<Time<Fixed>>,
    mut q: Query<(&mut Bullet, &mut BulletMotion, &BulletState), With<PooledBullet>>,
) {
    let dt = time.delta_secs();

    for (mut bullet, mut motion, state) in &mut q {
        if *state != BulletState::Active {
            continue;
        }

        motion.previous = motion.position;
        let step = motion.velocity * dt;
        motion.position += step;
        bullet.lifetime -= dt;
    }
}

pub fn expire_bullets(
    mut events: ResMut<FrameEvents>,
    mut q: Query<(&Bullet, &BulletMotion, &mut BulletState), With<PooledBullet>>,
) {
    for (bullet, motion, mut state) in &mut q {
        if *state == BulletState::Active && bullet.lifetime <= 0.0 {
            *state = BulletState::PendingReturn;
            events.push(CombatEvent::BulletExpired { position: motion.position });
        }
    }
}
