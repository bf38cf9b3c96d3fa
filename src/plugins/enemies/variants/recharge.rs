//! Recharge: support unit. Drifts toward allies, and when the player strays
//! close it drains their energy for a bounded window and pulses a heal.

use bevy::prelude::*;

use crate::common::geometry::rotate_degrees;
use crate::plugins::combat::events::CombatEvent;
use crate::plugins::combat::messages::CombatRequest;
use crate::plugins::enemies::behavior::{EnemyBehavior, FrameContext, StartContext};
use crate::plugins::enemies::error::SpawnError;
use crate::plugins::enemies::presets::EnemyVariant;
use crate::plugins::enemies::record::EnemyBody;
use crate::plugins::presentation::visual::{EnemyVisual, Overlay, OverlayStyle};

use super::move_clip;

#[derive(Debug, Clone)]
pub struct RechargeConfig {
    pub recharge_radius: f32,
    pub is_recharging: bool,
    /// Longest a single drain may last, in seconds.
    pub recharge_time: f32,
    pub active_timer: f32,
    /// Energy per second while draining.
    pub energy_drain_rate: f32,
    pub cooldown_timer: f32,
    pub heal_amount: i32,
    pub direction_change_time: f32,
    pub direction_change_timer: f32,
    pub recharge_position: Vec2,
}

impl RechargeConfig {
    fn pick_direction(&mut self, body: &mut EnemyBody, ctx: &mut FrameContext) {
        let nearest = ctx
            .allies
            .iter()
            .filter(|a| a.variant != EnemyVariant::Recharge)
            .min_by(|a, b| {
                body.position
                    .distance_squared(a.position)
                    .total_cmp(&body.position.distance_squared(b.position))
            });

        body.facing = match nearest {
            Some(ally) => {
                let toward = (ally.position - body.position).normalize_or_zero();
                rotate_degrees(toward, ctx.rng.range(-45.0, 45.0))
            }
            None => ctx.rng.unit_direction(),
        };
        self.direction_change_time = ctx.rng.range(0.5, 2.0);
        self.direction_change_timer = 0.0;
    }
}

impl EnemyBehavior for RechargeConfig {
    fn start(ctx: &mut StartContext) -> Result<Self, SpawnError> {
        Ok(Self {
            recharge_radius: 120.0,
            is_recharging: false,
            recharge_time: 1.0,
            active_timer: 0.0,
            energy_drain_rate: 25.0,
            cooldown_timer: 2.0,
            heal_amount: 100,
            direction_change_time: 0.0,
            direction_change_timer: 0.0,
            recharge_position: ctx.position,
        })
    }

    fn update(&mut self, body: &mut EnemyBody, ctx: &mut FrameContext) {
        let dt = ctx.dt;

        self.direction_change_timer += dt;
        if self.direction_change_timer >= self.direction_change_time {
            self.pick_direction(body, ctx);
        }

        self.cooldown_timer = (self.cooldown_timer - dt).max(0.0);

        let in_range = ctx
            .target()
            .is_some_and(|p| p.hitbox.overlaps_circle(body.position, self.recharge_radius));

        if self.is_recharging {
            self.active_timer += dt;
            if !in_range || self.active_timer >= self.recharge_time {
                self.is_recharging = false;
                self.active_timer = 0.0;
                self.cooldown_timer = ctx.rng.range(1.0, 3.0);
            } else {
                ctx.request(CombatRequest::DrainPlayer {
                    source: ctx.entity,
                    amount: self.energy_drain_rate * dt,
                });
            }
        } else if in_range && self.cooldown_timer <= 0.0 {
            self.is_recharging = true;
            self.active_timer = 0.0;
            self.recharge_position = body.position;
            ctx.request(CombatRequest::HealAllies {
                source: ctx.entity,
                center: body.position,
                radius: self.recharge_radius,
                amount: self.heal_amount,
            });
            ctx.emit(CombatEvent::Heal {
                source: ctx.entity,
                position: body.position,
                radius: self.recharge_radius,
            });
        }

        if self.is_recharging {
            body.stop();
        }
    }

    fn render(&self, body: &EnemyBody) -> EnemyVisual {
        let visual = EnemyVisual::new("recharge", move_clip(body), body.flip);
        if self.is_recharging {
            visual.with_overlay(Overlay::Radius {
                center: self.recharge_position,
                radius: self.recharge_radius,
                style: OverlayStyle::Drain,
            })
        } else {
            visual
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::enemies::variants::testing::Harness;

    fn drained(h: &Harness) -> f32 {
        h.out
            .requests
            .iter()
            .map(|r| match r {
                CombatRequest::DrainPlayer { amount, .. } => *amount,
                _ => 0.0,
            })
            .sum()
    }

    #[test]
    fn drain_is_bounded_by_recharge_time() {
        let mut h = Harness::new();
        let (mut cfg, mut body) = h.start::<RechargeConfig>(EnemyVariant::Recharge, Vec2::ZERO);
        cfg.cooldown_timer = 0.0;
        h.player_at(Vec2::new(40.0, 0.0));

        h.step(&mut cfg, &mut body, 0.1);
        assert!(cfg.is_recharging);
        assert!(h.out.requests.iter().any(|r| matches!(r, CombatRequest::HealAllies { .. })));

        let mut total = 0.0;
        for _ in 0..15 {
            h.step(&mut cfg, &mut body, 0.1);
            total += drained(&h);
        }
        assert!(total > 0.0);
        assert!(total <= cfg.energy_drain_rate * cfg.recharge_time + 1e-3, "drained {total}");
    }

    #[test]
    fn activation_requests_one_heal_of_100() {
        let mut h = Harness::new();
        let (mut cfg, mut body) = h.start::<RechargeConfig>(EnemyVariant::Recharge, Vec2::ZERO);
        cfg.cooldown_timer = 0.0;
        h.player_at(Vec2::new(40.0, 0.0));
        h.step(&mut cfg, &mut body, 0.1);

        let heals: Vec<i32> = h
            .out
            .requests
            .iter()
            .filter_map(|r| match r {
                CombatRequest::HealAllies { amount, .. } => Some(*amount),
                _ => None,
            })
            .collect();
        assert_eq!(heals, vec![100]);
    }

    #[test]
    fn stops_when_player_leaves() {
        let mut h = Harness::new();
        let (mut cfg, mut body) = h.start::<RechargeConfig>(EnemyVariant::Recharge, Vec2::ZERO);
        cfg.cooldown_timer = 0.0;
        h.player_at(Vec2::new(40.0, 0.0));
        h.step(&mut cfg, &mut body, 0.1);
        assert!(cfg.is_recharging);

        h.player_at(Vec2::new(400.0, 0.0));
        h.step(&mut cfg, &mut body, 0.1);
        assert!(!cfg.is_recharging);
        assert!(cfg.cooldown_timer >= 1.0);
        assert_eq!(drained(&h), 0.0);
    }

    #[test]
    fn wanders_toward_non_recharge_allies() {
        let mut h = Harness::new();
        let (mut cfg, mut body) = h.start::<RechargeConfig>(EnemyVariant::Recharge, Vec2::ZERO);
        h.ally(EnemyVariant::Recharge, Vec2::new(-50.0, 0.0), 100, 100);
        h.ally(EnemyVariant::Sentry, Vec2::new(300.0, 0.0), 75, 75);
        h.step(&mut cfg, &mut body, 0.01);
        assert!(body.facing.x > 0.7, "facing {:?}", body.facing);
    }
}
