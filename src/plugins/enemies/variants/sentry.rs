//! Sentry: fixed emplacement. Paints the player with a laser, then fires.

use bevy::prelude::*;

use crate::plugins::enemies::behavior::{DeathContext, EnemyBehavior, FrameContext, StartContext};
use crate::plugins::enemies::error::SpawnError;
use crate::plugins::enemies::record::EnemyBody;
use crate::plugins::presentation::visual::{EnemyVisual, GunPose, Overlay};
use crate::plugins::weapons::{GunData, Shot};

use super::{equip_gun, release_gun, track};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SentryState {
    Idle,
    Aiming { timer: f32 },
}

#[derive(Debug)]
pub struct SentryConfig {
    pub gun: GunData,
    pub gun_offset: Vec2,
    pub guard_radius: f32,
    pub aim_time: f32,
    pub state: SentryState,
    /// Laser endpoints while aiming.
    pub laser: Option<(Vec2, Vec2)>,
}

impl SentryConfig {
    fn muzzle(&self, body: &EnemyBody) -> Vec2 {
        body.position + self.gun_offset
    }
}

impl EnemyBehavior for SentryConfig {
    fn start(ctx: &mut StartContext) -> Result<Self, SpawnError> {
        Ok(Self {
            gun: equip_gun(ctx)?,
            gun_offset: Vec2::new(0.0, 10.0),
            guard_radius: 350.0,
            aim_time: 0.8,
            state: SentryState::Idle,
            laser: None,
        })
    }

    fn update(&mut self, body: &mut EnemyBody, ctx: &mut FrameContext) {
        body.stop();
        self.gun.tick(ctx.dt, None);

        let muzzle = self.muzzle(body);
        let sighted = ctx.target().filter(|p| {
            muzzle.distance(p.position) <= self.guard_radius && ctx.can_see(muzzle, p.position)
        });

        let Some(player) = sighted else {
            self.state = SentryState::Idle;
            self.laser = None;
            return;
        };

        track(&mut self.gun, body, muzzle, player.position);
        self.laser = Some((muzzle, player.position));

        self.state = match self.state {
            SentryState::Idle => SentryState::Aiming { timer: 0.0 },
            SentryState::Aiming { timer } => {
                let timer = timer + ctx.dt;
                if timer >= self.aim_time && ctx.fire(&mut self.gun, muzzle, Shot::Aimed(player.position - muzzle)) {
                    SentryState::Idle
                } else {
                    SentryState::Aiming { timer }
                }
            }
        };
    }

    fn render(&self, body: &EnemyBody) -> EnemyVisual {
        let clip = match self.state {
            SentryState::Idle => "idle",
            SentryState::Aiming { .. } => "aim",
        };
        let visual = EnemyVisual::new("sentry", clip, body.flip).with_gun(GunPose::of(&self.gun, self.muzzle(body)));
        match self.laser {
            Some((from, to)) => visual.with_overlay(Overlay::Laser { from, to }),
            None => visual,
        }
    }

    fn on_death(mut self, _body: &EnemyBody, ctx: &mut DeathContext) {
        release_gun(&mut self.gun, ctx);
    }
}
