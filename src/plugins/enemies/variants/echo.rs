//! Echo: blinks toward the player at intervals, leaving fading afterimages.

use bevy::prelude::*;

use crate::common::geometry::Aabb;
use crate::plugins::enemies::behavior::{DeathContext, EnemyBehavior, FrameContext, StartContext};
use crate::plugins::enemies::error::SpawnError;
use crate::plugins::enemies::record::EnemyBody;
use crate::plugins::presentation::visual::{EnemyVisual, GunPose, Overlay};
use crate::plugins::weapons::{GunData, Shot};

use super::{equip_gun, move_clip, release_gun, track};

const MAX_AFTERIMAGES: usize = 4;
/// Blinks stop this far short of the player.
const BLINK_STANDOFF: f32 = 60.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Afterimage {
    pub position: Vec2,
    pub age: f32,
}

#[derive(Debug)]
pub struct EchoConfig {
    pub gun: GunData,
    pub gun_offset: Vec2,
    pub detection_range: f32,
    pub engage_range: f32,
    pub blink_interval: f32,
    pub blink_timer: f32,
    pub blink_distance: f32,
    pub afterimage_lifetime: f32,
    pub afterimages: Vec<Afterimage>,
}

impl EchoConfig {
    fn blink(&mut self, body: &mut EnemyBody, target: Vec2, walls: &[Aabb]) -> bool {
        let to_target = target - body.position;
        let reach = (to_target.length() - BLINK_STANDOFF).min(self.blink_distance);
        if reach <= 0.0 {
            return false;
        }
        let dest = body.position + to_target.normalize_or_zero() * reach;
        let landing = Aabb::centered(dest, body.stats.hitbox_size());
        if walls.iter().any(|w| w.overlaps(&landing)) {
            return false;
        }

        if self.afterimages.len() == MAX_AFTERIMAGES {
            self.afterimages.remove(0);
        }
        self.afterimages.push(Afterimage { position: body.position, age: 0.0 });
        body.position = dest;
        body.velocity = Vec2::ZERO;
        true
    }
}

impl EnemyBehavior for EchoConfig {
    fn start(ctx: &mut StartContext) -> Result<Self, SpawnError> {
        Ok(Self {
            gun: equip_gun(ctx)?,
            gun_offset: Vec2::new(0.0, 10.0),
            detection_range: 500.0,
            engage_range: 400.0,
            blink_interval: 2.5,
            blink_timer: 0.0,
            blink_distance: 120.0,
            afterimage_lifetime: 0.6,
            afterimages: Vec::new(),
        })
    }

    fn update(&mut self, body: &mut EnemyBody, ctx: &mut FrameContext) {
        let dt = ctx.dt;
        self.gun.tick(dt, None);

        let lifetime = self.afterimage_lifetime;
        for image in &mut self.afterimages {
            image.age += dt;
        }
        self.afterimages.retain(|i| i.age < lifetime);

        let Some(player) = ctx.target() else {
            body.stop();
            return;
        };
        if body.position.distance(player.position) > self.detection_range {
            body.stop();
            return;
        }

        body.seek(player.position);
        self.blink_timer += dt;
        if self.blink_timer >= self.blink_interval && self.blink(body, player.position, ctx.walls) {
            self.blink_timer = 0.0;
        }

        let origin = body.position + self.gun_offset;
        track(&mut self.gun, body, origin, player.position);
        if origin.distance(player.position) <= self.engage_range && ctx.can_see(origin, player.position) {
            ctx.fire(&mut self.gun, origin, Shot::Aimed(player.position - origin));
        }
    }

    fn render(&self, body: &EnemyBody) -> EnemyVisual {
        self.afterimages.iter().fold(
            EnemyVisual::new("echo", move_clip(body), body.flip)
                .with_gun(GunPose::of(&self.gun, body.position + self.gun_offset)),
            |visual, image| {
                visual.with_overlay(Overlay::Afterimage {
                    position: image.position,
                    alpha: (1.0 - image.age / self.afterimage_lifetime).clamp(0.0, 1.0),
                })
            },
        )
    }

    fn on_death(mut self, _body: &EnemyBody, ctx: &mut DeathContext) {
        release_gun(&mut self.gun, ctx);
    }
}
