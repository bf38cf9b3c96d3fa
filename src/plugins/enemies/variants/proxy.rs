//! Proxy: erratic wanderer that takes potshots from its previous position.

use bevy::prelude::*;

use crate::plugins::enemies::behavior::{DeathContext, EnemyBehavior, FrameContext, StartContext};
use crate::plugins::enemies::error::SpawnError;
use crate::plugins::enemies::record::EnemyBody;
use crate::plugins::presentation::visual::{EnemyVisual, GunPose};
use crate::plugins::weapons::{GunData, Shot};

use super::{equip_gun, move_clip, release_gun, track};

#[derive(Debug)]
pub struct ProxyConfig {
    pub gun: GunData,
    pub gun_offset: Vec2,
    pub direction_change_time: f32,
    pub direction_change_timer: f32,
    /// Body position at the start of the latest update; the muzzle anchors here.
    pub last_position: Vec2,
    pub engage_range: f32,
}

impl EnemyBehavior for ProxyConfig {
    fn start(ctx: &mut StartContext) -> Result<Self, SpawnError> {
        Ok(Self {
            gun: equip_gun(ctx)?,
            gun_offset: Vec2::new(0.0, 10.0),
            direction_change_time: ctx.rng.range(0.5, 2.0),
            direction_change_timer: 0.0,
            last_position: ctx.position,
            engage_range: 320.0,
        })
    }

    fn update(&mut self, body: &mut EnemyBody, ctx: &mut FrameContext) {
        let dt = ctx.dt;
        self.last_position = body.position;
        self.gun.tick(dt, None);

        self.direction_change_timer += dt;
        if self.direction_change_timer >= self.direction_change_time || body.facing == Vec2::ZERO {
            self.direction_change_timer = 0.0;
            self.direction_change_time = ctx.rng.range(0.5, 2.0);
            body.facing = ctx.rng.unit_direction();
        }

        let Some(player) = ctx.target() else {
            return;
        };
        let origin = self.last_position + self.gun_offset;
        track(&mut self.gun, body, origin, player.position);

        if origin.distance(player.position) <= self.engage_range && ctx.can_see(origin, player.position) {
            ctx.fire(&mut self.gun, origin, Shot::Aimed(player.position - origin));
        }
    }

    fn render(&self, body: &EnemyBody) -> EnemyVisual {
        EnemyVisual::new("proxy", move_clip(body), body.flip)
            .with_gun(GunPose::of(&self.gun, self.last_position + self.gun_offset))
    }

    fn on_death(mut self, _body: &EnemyBody, ctx: &mut DeathContext) {
        release_gun(&mut self.gun, ctx);
    }
}
