//! Radius: charges while the player lingers nearby, discharges an area blast,
//! and leaves a field that keeps pulsing for a while.

use bevy::prelude::*;

use crate::common::layers::Faction;
use crate::plugins::combat::events::CombatEvent;
use crate::plugins::combat::messages::CombatRequest;
use crate::plugins::enemies::behavior::{EnemyBehavior, FrameContext, StartContext};
use crate::plugins::enemies::error::SpawnError;
use crate::plugins::enemies::record::EnemyBody;
use crate::plugins::presentation::visual::{EnemyVisual, Overlay, OverlayStyle};

use super::move_clip;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LingeringField {
    pub center: Vec2,
    pub remaining: f32,
    pub tick_timer: f32,
}

#[derive(Debug, Clone)]
pub struct RadiusConfig {
    pub aoe_radius: f32,
    pub explosion_damage: i32,
    pub chargeup_time: f32,
    pub is_charging: bool,
    /// Charge progress in `[0, 1]`.
    pub current_charge: f32,
    pub cooldown: f32,
    pub cooldown_timer: f32,
    pub field_time: f32,
    pub field_tick: f32,
    pub field_damage: i32,
    pub field: Option<LingeringField>,
}

impl RadiusConfig {
    fn discharge(&mut self, body: &EnemyBody, ctx: &mut FrameContext) {
        ctx.request(CombatRequest::AreaDamage {
            source: ctx.entity,
            faction: Faction::Enemy,
            center: body.position,
            radius: self.aoe_radius,
            damage: self.explosion_damage,
        });
        ctx.emit(CombatEvent::Explosion { source: ctx.entity, position: body.position, radius: self.aoe_radius });
        self.field = Some(LingeringField {
            center: body.position,
            remaining: self.field_time,
            tick_timer: self.field_tick,
        });
        self.current_charge = 0.0;
        self.is_charging = false;
        self.cooldown_timer = self.cooldown;
    }

    fn pulse_field(&mut self, ctx: &mut FrameContext) {
        let Some(field) = self.field.as_mut() else {
            return;
        };
        field.remaining -= ctx.dt;
        field.tick_timer -= ctx.dt;
        if field.tick_timer <= 0.0 && field.remaining > 0.0 {
            field.tick_timer += self.field_tick;
            let center = field.center;
            ctx.request(CombatRequest::AreaDamage {
                source: ctx.entity,
                faction: Faction::Enemy,
                center,
                radius: self.aoe_radius,
                damage: self.field_damage,
            });
            ctx.emit(CombatEvent::FieldPulse { source: ctx.entity, position: center, radius: self.aoe_radius });
        }
        if field.remaining <= 0.0 {
            self.field = None;
        }
    }
}

impl EnemyBehavior for RadiusConfig {
    fn start(_ctx: &mut StartContext) -> Result<Self, SpawnError> {
        Ok(Self {
            aoe_radius: 120.0,
            explosion_damage: 35,
            chargeup_time: 2.0,
            is_charging: false,
            current_charge: 0.0,
            cooldown: 1.5,
            cooldown_timer: 0.0,
            field_time: 1.5,
            field_tick: 0.5,
            field_damage: 5,
            field: None,
        })
    }

    fn update(&mut self, body: &mut EnemyBody, ctx: &mut FrameContext) {
        let dt = ctx.dt;
        self.pulse_field(ctx);

        let Some(player) = ctx.target() else {
            body.stop();
            self.is_charging = false;
            return;
        };

        if self.cooldown_timer > 0.0 {
            self.cooldown_timer = (self.cooldown_timer - dt).max(0.0);
            body.seek(player.position);
            return;
        }

        if player.hitbox.overlaps_circle(body.position, self.aoe_radius) {
            self.is_charging = true;
            body.stop();
            self.current_charge = (self.current_charge + dt / self.chargeup_time).min(1.0);
            if self.current_charge >= 1.0 {
                self.discharge(body, ctx);
            }
        } else {
            self.is_charging = false;
            self.current_charge = (self.current_charge - dt / self.chargeup_time).max(0.0);
            body.seek(player.position);
        }
    }

    fn render(&self, body: &EnemyBody) -> EnemyVisual {
        let clip = if self.is_charging { "charge" } else { move_clip(body) };
        let mut visual = EnemyVisual::new("radius", clip, body.flip);
        if self.is_charging {
            visual = visual.with_overlay(Overlay::Radius {
                center: body.position,
                radius: self.aoe_radius,
                style: OverlayStyle::Charge(self.current_charge),
            });
        }
        if let Some(field) = self.field {
            visual = visual.with_overlay(Overlay::Radius {
                center: field.center,
                radius: self.aoe_radius,
                style: OverlayStyle::Field,
            });
        }
        visual
    }
}
