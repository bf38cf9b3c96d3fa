//! Kamikaze: runs at the player, primes, and detonates once.

use bevy::prelude::*;

use crate::common::layers::Faction;
use crate::plugins::combat::events::CombatEvent;
use crate::plugins::combat::messages::CombatRequest;
use crate::plugins::enemies::behavior::{EnemyBehavior, FrameContext, StartContext};
use crate::plugins::enemies::error::SpawnError;
use crate::plugins::enemies::record::EnemyBody;
use crate::plugins::presentation::visual::{EnemyVisual, Overlay, OverlayStyle};

use super::move_clip;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KamikazeState {
    Seeking,
    Indicating,
    Exploding,
    Dead,
}

#[derive(Debug, Clone)]
pub struct KamikazeConfig {
    pub state: KamikazeState,
    pub explosion_radius: f32,
    pub explosion_damage: i32,
    /// Seconds between priming and detonation.
    pub indicator_delay: f32,
    pub explosion_timer: f32,
    /// Minimum seeking time before priming is allowed.
    pub direction_change_time: f32,
    pub direction_change_timer: f32,
    pub detection_range: f32,
}

impl Default for KamikazeConfig {
    fn default() -> Self {
        Self {
            state: KamikazeState::Seeking,
            explosion_radius: 50.0,
            explosion_damage: 40,
            indicator_delay: 1.0,
            explosion_timer: 0.0,
            direction_change_time: 0.0,
            direction_change_timer: 0.0,
            detection_range: 500.0,
        }
    }
}

impl KamikazeConfig {
    fn detonate(&mut self, body: &mut EnemyBody, ctx: &mut FrameContext) {
        ctx.request(CombatRequest::AreaDamage {
            source: ctx.entity,
            faction: Faction::Enemy,
            center: body.position,
            radius: self.explosion_radius,
            damage: self.explosion_damage,
        });
        ctx.emit(CombatEvent::Explosion {
            source: ctx.entity,
            position: body.position,
            radius: self.explosion_radius,
        });
        self.state = KamikazeState::Dead;
        body.health = 0;
        body.stop();
    }
}

impl EnemyBehavior for KamikazeConfig {
    fn start(_ctx: &mut StartContext) -> Result<Self, SpawnError> {
        Ok(Self::default())
    }

    fn update(&mut self, body: &mut EnemyBody, ctx: &mut FrameContext) {
        let dt = ctx.dt;
        self.direction_change_timer += dt;

        match self.state {
            KamikazeState::Seeking => {
                let Some(player) = ctx.target() else {
                    body.stop();
                    return;
                };
                if body.position.distance(player.position) < self.detection_range {
                    body.seek(player.position);
                } else {
                    body.stop();
                }

                let in_reach = player.hitbox.overlaps_circle(body.position, self.explosion_radius);
                if in_reach && self.direction_change_timer >= self.direction_change_time {
                    self.state = KamikazeState::Indicating;
                    self.explosion_timer = self.indicator_delay;
                    body.stop();
                    ctx.emit(CombatEvent::ExplosionPrimed {
                        source: ctx.entity,
                        position: body.position,
                        radius: self.explosion_radius,
                    });
                }
            }
            KamikazeState::Indicating => {
                body.stop();
                self.explosion_timer -= dt;
                if self.explosion_timer <= 0.0 {
                    self.state = KamikazeState::Exploding;
                }
            }
            KamikazeState::Exploding | KamikazeState::Dead => {}
        }

        if self.state == KamikazeState::Exploding {
            self.detonate(body, ctx);
        }
    }

    fn render(&self, body: &EnemyBody) -> EnemyVisual {
        match self.state {
            KamikazeState::Seeking => EnemyVisual::new("kamikaze", move_clip(body), body.flip),
            KamikazeState::Indicating => EnemyVisual::new("kamikaze", "prime", body.flip).with_overlay(Overlay::Radius {
                center: body.position,
                radius: self.explosion_radius,
                style: OverlayStyle::Warning,
            }),
            KamikazeState::Exploding | KamikazeState::Dead => EnemyVisual::new("kamikaze", "explode", body.flip),
        }
    }
}
