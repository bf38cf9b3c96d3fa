//! Juggernaut: slow, armoured gunner that enrages after soaking enough damage.

use bevy::prelude::*;

use crate::plugins::enemies::behavior::{DeathContext, EnemyBehavior, FrameContext, StartContext};
use crate::plugins::enemies::error::SpawnError;
use crate::plugins::enemies::record::EnemyBody;
use crate::plugins::presentation::visual::{EnemyVisual, GunPose};
use crate::plugins::weapons::{GunData, Shot};

use super::{equip_gun, move_clip, release_gun, track};

#[derive(Debug)]
pub struct JuggernautConfig {
    pub gun: GunData,
    pub gun_offset: Vec2,
    /// Fraction of incoming damage absorbed.
    pub armor_value: f32,
    /// Speed multiplier while calm.
    pub slow_factor: f32,
    pub rage_meter: f32,
    pub enrage_threshold: f32,
    pub is_enraged: bool,
    pub engage_range: f32,
}

impl EnemyBehavior for JuggernautConfig {
    fn start(ctx: &mut StartContext) -> Result<Self, SpawnError> {
        Ok(Self {
            gun: equip_gun(ctx)?,
            gun_offset: Vec2::new(0.0, 12.0),
            armor_value: 0.5,
            slow_factor: 0.7,
            rage_meter: 0.0,
            enrage_threshold: 75.0,
            is_enraged: false,
            engage_range: 300.0,
        })
    }

    fn update(&mut self, body: &mut EnemyBody, ctx: &mut FrameContext) {
        let gun_clock = if self.is_enraged { 2.0 } else { 1.0 };
        self.gun.tick(ctx.dt * gun_clock, None);

        if !self.is_enraged {
            body.speed_scale *= self.slow_factor;
        }

        let Some(player) = ctx.target() else {
            body.stop();
            return;
        };
        body.seek(player.position);

        let origin = body.position + self.gun_offset;
        track(&mut self.gun, body, origin, player.position);
        if origin.distance(player.position) <= self.engage_range && ctx.can_see(origin, player.position) {
            ctx.fire(&mut self.gun, origin, Shot::Aimed(player.position - origin));
        }
    }

    fn render(&self, body: &EnemyBody) -> EnemyVisual {
        let texture = if self.is_enraged { "juggernaut_enraged" } else { "juggernaut" };
        EnemyVisual::new(texture, move_clip(body), body.flip)
            .with_gun(GunPose::of(&self.gun, body.position + self.gun_offset))
    }

    fn on_death(mut self, _body: &EnemyBody, ctx: &mut DeathContext) {
        release_gun(&mut self.gun, ctx);
    }

    fn on_damaged(&mut self, _body: &EnemyBody, amount: i32) -> i32 {
        if amount <= 0 {
            return 0;
        }
        let reduced = ((amount as f32) * (1.0 - self.armor_value)).round().max(1.0) as i32;
        self.rage_meter += reduced as f32;
        if !self.is_enraged && self.rage_meter >= self.enrage_threshold {
            self.is_enraged = true;
        }
        reduced
    }
}
