//! Enemy locomotion.
//!
//! Variants only say where they want to go (`facing`, `speed_scale`). This
//! step accelerates along the facing up to the scaled top speed, damps the
//! sideways component, brakes with drag when idle, then moves one axis at a
//! time against the blockers.

use bevy::prelude::*;

use crate::common::geometry::Aabb;
use crate::plugins::world::try_move;

use super::record::EnemyBody;

pub fn step_body(body: &mut EnemyBody, dt: f32, lateral_damping: f32, blockers: &[Aabb]) {
    let max_speed = (body.stats.max_speed * body.speed_scale).max(0.0);
    let dir = body.facing.normalize_or_zero();

    if max_speed <= 0.0 {
        body.velocity = Vec2::ZERO;
        return;
    }

    if dir != Vec2::ZERO {
        let forward = body.velocity.dot(dir);
        let lateral = body.velocity - dir * forward;
        let forward = (forward + body.stats.acceleration * dt).min(max_speed);
        body.velocity = (dir * forward + lateral * lateral_damping).clamp_length_max(max_speed);
    } else {
        body.velocity *= (1.0 - body.stats.drag * dt).max(0.0);
    }

    let (pos, blocked) = try_move(body.position, body.stats.hitbox_size(), body.velocity * dt, blockers);
    if blocked.x {
        body.velocity.x = 0.0;
    }
    if blocked.y {
        body.velocity.y = 0.0;
    }
    body.position = pos;

    if body.velocity.x < -1.0 {
        body.flip = true;
    } else if body.velocity.x > 1.0 {
        body.flip = false;
    }
}
