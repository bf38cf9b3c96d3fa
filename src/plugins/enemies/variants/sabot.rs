//! Sabot: winds up, dashes through the player's line while blasting, recovers.

use bevy::prelude::*;

use crate::plugins::enemies::behavior::{DeathContext, EnemyBehavior, FrameContext, StartContext};
use crate::plugins::enemies::error::SpawnError;
use crate::plugins::enemies::record::EnemyBody;
use crate::plugins::presentation::visual::{EnemyVisual, GunPose, Overlay, OverlayStyle};
use crate::plugins::weapons::{GunData, Shot};

use super::{equip_gun, move_clip, release_gun, track};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SabotState {
    Approaching,
    Charging { timer: f32 },
    Dashing { timer: f32 },
    Recovering { timer: f32 },
}

#[derive(Debug)]
pub struct SabotConfig {
    pub gun: GunData,
    pub state: SabotState,
    pub trigger_range: f32,
    pub charge_time: f32,
    /// Speed multiplier while dashing.
    pub charge_speed: f32,
    pub dash_time: f32,
    pub recover_time: f32,
    pub charge_direction: Vec2,
}

impl EnemyBehavior for SabotConfig {
    fn start(ctx: &mut StartContext) -> Result<Self, SpawnError> {
        Ok(Self {
            gun: equip_gun(ctx)?,
            state: SabotState::Approaching,
            trigger_range: 260.0,
            charge_time: 1.5,
            charge_speed: 2.5,
            dash_time: 0.45,
            recover_time: 0.8,
            charge_direction: Vec2::X,
        })
    }

    fn update(&mut self, body: &mut EnemyBody, ctx: &mut FrameContext) {
        let dt = ctx.dt;
        self.gun.tick(dt, None);
        let player = ctx.target();

        self.state = match self.state {
            SabotState::Approaching => match player {
                Some(p) if body.position.distance(p.position) <= self.trigger_range => {
                    body.stop();
                    self.charge_direction = (p.position - body.position).normalize_or(Vec2::X);
                    SabotState::Charging { timer: 0.0 }
                }
                Some(p) => {
                    body.seek(p.position);
                    SabotState::Approaching
                }
                None => {
                    body.stop();
                    SabotState::Approaching
                }
            },
            SabotState::Charging { timer } => {
                body.stop();
                if let Some(p) = player {
                    self.charge_direction = (p.position - body.position).normalize_or(self.charge_direction);
                }
                let timer = timer + dt;
                if timer >= self.charge_time {
                    SabotState::Dashing { timer: 0.0 }
                } else {
                    SabotState::Charging { timer }
                }
            }
            SabotState::Dashing { timer } => {
                body.facing = self.charge_direction;
                body.speed_scale = self.charge_speed;
                let origin = body.position;
                track(&mut self.gun, body, origin, origin + self.charge_direction);
                ctx.fire(&mut self.gun, origin, Shot::Aimed(self.charge_direction));
                let timer = timer + dt;
                if timer >= self.dash_time {
                    SabotState::Recovering { timer: 0.0 }
                } else {
                    SabotState::Dashing { timer }
                }
            }
            SabotState::Recovering { timer } => {
                body.stop();
                let timer = timer + dt;
                if timer >= self.recover_time {
                    SabotState::Approaching
                } else {
                    SabotState::Recovering { timer }
                }
            }
        };
    }

    fn render(&self, body: &EnemyBody) -> EnemyVisual {
        let (clip, overlay) = match self.state {
            SabotState::Approaching => (move_clip(body), None),
            SabotState::Charging { timer } => (
                "charge",
                Some(Overlay::Radius {
                    center: body.position,
                    radius: body.stats.hitbox.0,
                    style: OverlayStyle::Charge((timer / self.charge_time).clamp(0.0, 1.0)),
                }),
            ),
            SabotState::Dashing { .. } => ("dash", None),
            SabotState::Recovering { .. } => ("idle", None),
        };
        let visual = EnemyVisual::new("sabot", clip, body.flip).with_gun(GunPose::of(&self.gun, body.position));
        match overlay {
            Some(o) => visual.with_overlay(o),
            None => visual,
        }
    }

    fn on_death(mut self, _body: &EnemyBody, ctx: &mut DeathContext) {
        release_gun(&mut self.gun, ctx);
    }
}
