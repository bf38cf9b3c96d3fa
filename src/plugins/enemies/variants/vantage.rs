//! Vantage: sniper. Holds a band around its preferred range, steadies its
//! aim, then fires where the player will be.

use bevy::prelude::*;

use crate::plugins::enemies::behavior::{DeathContext, EnemyBehavior, FrameContext, StartContext};
use crate::plugins::enemies::error::SpawnError;
use crate::plugins::enemies::record::EnemyBody;
use crate::plugins::presentation::visual::{EnemyVisual, GunPose, Overlay};
use crate::plugins::weapons::{GunData, Shot};

use super::{equip_gun, move_clip, release_gun, track};

#[derive(Debug)]
pub struct VantageConfig {
    pub gun: GunData,
    pub gun_offset: Vec2,
    pub detection_range: f32,
    pub sniper_range: f32,
    pub aim_time: f32,
    pub is_aiming: bool,
    pub aim_timer: f32,
    /// Predicted impact point for the shot being lined up.
    pub target_position: Vec2,
}

/// Where a target moving at `velocity` will be when a bullet of `speed`
/// fired from `origin` arrives.
pub fn lead_target(origin: Vec2, position: Vec2, velocity: Vec2, speed: f32) -> Vec2 {
    if speed <= 0.0 {
        return position;
    }
    let travel = origin.distance(position) / speed;
    position + velocity * travel
}

impl EnemyBehavior for VantageConfig {
    fn start(ctx: &mut StartContext) -> Result<Self, SpawnError> {
        Ok(Self {
            gun: equip_gun(ctx)?,
            gun_offset: Vec2::new(0.0, 6.0),
            detection_range: 500.0,
            sniper_range: 350.0,
            aim_time: 1.2,
            is_aiming: false,
            aim_timer: 0.0,
            target_position: ctx.position,
        })
    }

    fn update(&mut self, body: &mut EnemyBody, ctx: &mut FrameContext) {
        self.gun.tick(ctx.dt, None);

        let Some(player) = ctx.target() else {
            body.stop();
            self.is_aiming = false;
            self.aim_timer = 0.0;
            return;
        };

        let dist = body.position.distance(player.position);
        if dist > self.detection_range {
            body.stop();
            self.is_aiming = false;
            self.aim_timer = 0.0;
            return;
        }

        let in_band = dist >= self.sniper_range * 0.8 && dist <= self.sniper_range;
        if dist < self.sniper_range * 0.8 {
            body.flee(player.position);
        } else if dist > self.sniper_range {
            body.seek(player.position);
        } else {
            body.stop();
        }

        let origin = body.position + self.gun_offset;
        if !in_band || !ctx.can_see(origin, player.position) {
            self.is_aiming = false;
            self.aim_timer = 0.0;
            return;
        }

        self.is_aiming = true;
        self.aim_timer += ctx.dt;
        self.target_position = lead_target(origin, player.position, player.velocity, self.gun.stats.bullet_speed);
        track(&mut self.gun, body, origin, self.target_position);

        if self.aim_timer >= self.aim_time
            && ctx.fire(&mut self.gun, origin, Shot::Aimed(self.target_position - origin))
        {
            self.is_aiming = false;
            self.aim_timer = 0.0;
        }
    }

    fn render(&self, body: &EnemyBody) -> EnemyVisual {
        let origin = body.position + self.gun_offset;
        let clip = if self.is_aiming { "aim" } else { move_clip(body) };
        let visual = EnemyVisual::new("vantage", clip, body.flip).with_gun(GunPose::of(&self.gun, origin));
        if self.is_aiming {
            visual.with_overlay(Overlay::Laser { from: origin, to: self.target_position })
        } else {
            visual
        }
    }

    fn on_death(mut self, _body: &EnemyBody, ctx: &mut DeathContext) {
        release_gun(&mut self.gun, ctx);
    }
}
