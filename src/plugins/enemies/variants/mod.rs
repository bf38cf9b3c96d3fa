//! One behaviour per enemy variant, plus the helpers they share.

pub mod echo;
pub mod juggernaut;
pub mod kamikaze;
pub mod libet;
pub mod proxy;
pub mod radius;
pub mod recharge;
pub mod sabot;
pub mod sentry;
pub mod tactician;
pub mod vantage;

use bevy::prelude::*;

use crate::common::layers::Faction;
use crate::plugins::weapons::GunData;

use super::behavior::{DeathContext, StartContext};
use super::error::SpawnError;
use super::record::EnemyBody;

/// Build the variant's gun from its preset. Handles are acquired only once
/// the stats are known to be usable.
pub(crate) fn equip_gun(ctx: &mut StartContext) -> Result<GunData, SpawnError> {
    let stats = ctx.preset.gun.clone().ok_or(SpawnError::MissingGun(ctx.variant))?;
    if let Some(reason) = stats.invalid_reason() {
        return Err(SpawnError::InvalidGun { variant: ctx.variant, reason });
    }
    let mut gun = GunData::new(ctx.variant.name(), stats, Faction::Enemy);
    gun.attach_handles(ctx.handles);
    Ok(gun)
}

pub(crate) fn release_gun(gun: &mut GunData, ctx: &mut DeathContext) {
    gun.release_handles(ctx.handles);
}

/// Aim at `target` from `origin`; flip follows the body's movement.
pub(crate) fn track(gun: &mut GunData, body: &EnemyBody, origin: Vec2, target: Vec2) {
    gun.aim(target - origin);
    gun.set_flip_from_motion(body.velocity);
}

pub(crate) fn move_clip(body: &EnemyBody) -> &'static str {
    if body.velocity.length_squared() > 1.0 { "move" } else { "idle" }
}

#[cfg(test)]
pub(crate) mod testing;
