//! Tactician: commands nearby allies, keeps its distance, and ducks behind
//! cover when the player closes in.

use bevy::prelude::*;

use crate::common::geometry::Aabb;
use crate::plugins::combat::messages::CombatRequest;
use crate::plugins::enemies::behavior::{DeathContext, EnemyBehavior, FrameContext, StartContext};
use crate::plugins::enemies::error::SpawnError;
use crate::plugins::enemies::presets::EnemyVariant;
use crate::plugins::enemies::record::EnemyBody;
use crate::plugins::presentation::visual::{EnemyVisual, GunPose, Overlay, OverlayStyle};
use crate::plugins::weapons::{GunData, Shot};

use super::{equip_gun, move_clip, release_gun, track};

const COVER_SEARCH: f32 = 250.0;
/// Only walls this small count as cover; arena borders do not.
const MAX_COVER_EXTENT: f32 = 256.0;
const COVER_MARGIN: f32 = 24.0;

#[derive(Debug)]
pub struct TacticianConfig {
    pub gun: GunData,
    pub gun_offset: Vec2,
    pub command_radius: f32,
    pub buff_strength: f32,
    pub max_controlled_units: usize,
    pub controlled: Vec<Entity>,
    pub preferred_range: f32,
    pub engage_range: f32,
    pub cover_point: Option<Vec2>,
    strafe_sign: f32,
}

impl TacticianConfig {
    pub fn is_commanding(&self) -> bool {
        !self.controlled.is_empty()
    }
}

/// The spot on the far side of the nearest small wall, as seen from `threat`.
pub fn find_cover(position: Vec2, threat: Vec2, walls: &[Aabb]) -> Option<Vec2> {
    walls
        .iter()
        .filter(|w| w.w.max(w.h) <= MAX_COVER_EXTENT)
        .filter(|w| w.closest_point(position).distance(position) <= COVER_SEARCH)
        .map(|w| {
            let away = (w.center() - threat).normalize_or_zero();
            w.center() + away * (w.size().length() * 0.5 + COVER_MARGIN)
        })
        .min_by(|a, b| a.distance_squared(position).total_cmp(&b.distance_squared(position)))
}

impl EnemyBehavior for TacticianConfig {
    fn start(ctx: &mut StartContext) -> Result<Self, SpawnError> {
        let strafe_sign = if ctx.rng.chance(0.5) { 1.0 } else { -1.0 };
        Ok(Self {
            gun: equip_gun(ctx)?,
            gun_offset: Vec2::new(0.0, 8.0),
            command_radius: 200.0,
            buff_strength: 1.25,
            max_controlled_units: 5,
            controlled: Vec::new(),
            preferred_range: 220.0,
            engage_range: 320.0,
            cover_point: None,
            strafe_sign,
        })
    }

    fn update(&mut self, body: &mut EnemyBody, ctx: &mut FrameContext) {
        self.gun.tick(ctx.dt, None);

        let mut nearby: Vec<_> = ctx
            .allies
            .iter()
            .filter(|a| a.variant != EnemyVariant::Tactician)
            .filter(|a| a.position.distance(body.position) < self.command_radius)
            .map(|a| (a.position.distance_squared(body.position), a.entity))
            .collect();
        nearby.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        nearby.truncate(self.max_controlled_units);

        self.controlled.clear();
        for (_, target) in nearby {
            self.controlled.push(target);
            ctx.request(CombatRequest::Buff { source: ctx.entity, target, factor: self.buff_strength });
        }

        let Some(player) = ctx.target() else {
            body.stop();
            self.cover_point = None;
            return;
        };

        let dist = body.position.distance(player.position);
        if dist < self.preferred_range * 0.75 {
            self.cover_point = find_cover(body.position, player.position, ctx.walls);
            match self.cover_point {
                Some(cover) if cover.distance(body.position) > 8.0 => body.seek(cover),
                Some(_) => body.stop(),
                None => body.flee(player.position),
            }
        } else if dist > self.engage_range {
            self.cover_point = None;
            body.seek(player.position);
        } else {
            self.cover_point = None;
            let to_player = (player.position - body.position).normalize_or_zero();
            body.facing = to_player.perp() * self.strafe_sign;
        }

        let origin = body.position + self.gun_offset;
        track(&mut self.gun, body, origin, player.position);
        if dist <= self.engage_range && ctx.can_see(origin, player.position) {
            ctx.fire(&mut self.gun, origin, Shot::Aimed(player.position - origin));
        }
    }

    fn render(&self, body: &EnemyBody) -> EnemyVisual {
        let visual = EnemyVisual::new("tactician", move_clip(body), body.flip)
            .with_gun(GunPose::of(&self.gun, body.position + self.gun_offset));
        if self.is_commanding() {
            visual.with_overlay(Overlay::Radius {
                center: body.position,
                radius: self.command_radius,
                style: OverlayStyle::Command,
            })
        } else {
            visual
        }
    }

    fn on_death(mut self, _body: &EnemyBody, ctx: &mut DeathContext) {
        release_gun(&mut self.gun, ctx);
    }
}
