//! Libet: the boss. Rotating bullet rings; below half health it goes into a
//! frenzy with faster rings and aimed shots in between.

use bevy::prelude::*;

use crate::plugins::combat::events::CombatEvent;
use crate::plugins::enemies::behavior::{DeathContext, EnemyBehavior, FrameContext, StartContext};
use crate::plugins::enemies::error::SpawnError;
use crate::plugins::enemies::record::EnemyBody;
use crate::plugins::presentation::visual::{EnemyVisual, GunPose};
use crate::plugins::weapons::{GunData, Shot};

use super::{equip_gun, move_clip, release_gun, track};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LibetPhase {
    Opening,
    Frenzy,
}

#[derive(Debug)]
pub struct LibetConfig {
    pub gun: GunData,
    pub phase: LibetPhase,
    pub volley_timer: f32,
    pub ring_phase_deg: f32,
    pub ring_step_deg: f32,
    pub aimed_timer: f32,
    pub hover_range: f32,
    /// Health fraction that triggers the frenzy.
    pub frenzy_threshold: f32,
}

impl LibetConfig {
    pub fn volley_interval(&self) -> f32 {
        match self.phase {
            LibetPhase::Opening => 2.0,
            LibetPhase::Frenzy => 1.2,
        }
    }

    pub fn ring_count(&self) -> u32 {
        match self.phase {
            LibetPhase::Opening => 12,
            LibetPhase::Frenzy => 18,
        }
    }
}

const AIMED_INTERVAL: f32 = 0.35;

impl EnemyBehavior for LibetConfig {
    fn start(ctx: &mut StartContext) -> Result<Self, SpawnError> {
        Ok(Self {
            gun: equip_gun(ctx)?,
            phase: LibetPhase::Opening,
            volley_timer: 0.0,
            ring_phase_deg: 0.0,
            ring_step_deg: 7.5,
            aimed_timer: 0.0,
            hover_range: 250.0,
            frenzy_threshold: 0.5,
        })
    }

    fn update(&mut self, body: &mut EnemyBody, ctx: &mut FrameContext) {
        let dt = ctx.dt;
        self.gun.tick(dt, None);

        if self.phase == LibetPhase::Opening && body.health_fraction() <= self.frenzy_threshold {
            self.phase = LibetPhase::Frenzy;
            ctx.emit(CombatEvent::BossPhase { source: ctx.entity, phase: 2 });
        }

        let Some(player) = ctx.target() else {
            body.stop();
            return;
        };

        if body.position.distance(player.position) > self.hover_range {
            body.seek(player.position);
        } else {
            body.stop();
        }

        let origin = body.position;
        track(&mut self.gun, body, origin, player.position);

        self.volley_timer += dt;
        if self.volley_timer >= self.volley_interval() {
            let shot = Shot::Ring { count: self.ring_count(), phase_deg: self.ring_phase_deg };
            if ctx.fire(&mut self.gun, origin, shot) {
                self.volley_timer = 0.0;
                self.ring_phase_deg = (self.ring_phase_deg + self.ring_step_deg) % 360.0;
            }
            return;
        }

        if self.phase == LibetPhase::Frenzy {
            self.aimed_timer += dt;
            if self.aimed_timer >= AIMED_INTERVAL
                && ctx.fire(&mut self.gun, origin, Shot::Aimed(player.position - origin))
            {
                self.aimed_timer = 0.0;
            }
        }
    }

    fn render(&self, body: &EnemyBody) -> EnemyVisual {
        let texture = match self.phase {
            LibetPhase::Opening => "libet",
            LibetPhase::Frenzy => "libet_frenzy",
        };
        EnemyVisual::new(texture, move_clip(body), body.flip).with_gun(GunPose::of(&self.gun, body.position))
    }

    fn on_death(mut self, _body: &EnemyBody, ctx: &mut DeathContext) {
        release_gun(&mut self.gun, ctx);
        ctx.events.push(CombatEvent::BossDefeated { entity: ctx.entity });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::enemies::presets::EnemyVariant;
    use crate::plugins::enemies::variants::testing::Harness;

    #[test]
    fn fires_rotating_rings() {
        let mut h = Harness::new();
        let (mut cfg, mut body) = h.start::<LibetConfig>(EnemyVariant::Libet, Vec2::ZERO);
        h.player_at(Vec2::new(100.0, 0.0));

        let mut rings = Vec::new();
        for _ in 0..40 {
            h.step(&mut cfg, &mut body, 0.125);
            if !h.out.bullets.is_empty() {
                rings.push(h.out.bullets.len());
            }
        }
        assert_eq!(rings, vec![12, 12]);
        assert_eq!(cfg.ring_phase_deg, 15.0);
    }

    #[test]
    fn frenzy_below_half_health() {
        let mut h = Harness::new();
        let (mut cfg, mut body) = h.start::<LibetConfig>(EnemyVariant::Libet, Vec2::ZERO);
        h.player_at(Vec2::new(100.0, 0.0));
        body.health = body.max_health / 2;

        h.step(&mut cfg, &mut body, 0.125);
        assert_eq!(cfg.phase, LibetPhase::Frenzy);
        assert!(h.out.events.iter().any(|e| matches!(e, CombatEvent::BossPhase { phase: 2, .. })));

        let mut aimed = 0;
        for _ in 0..8 {
            h.step(&mut cfg, &mut body, 0.125);
            if !h.out.bullets.is_empty() {
                aimed += 1;
            }
        }
        assert!(aimed >= 2);
    }

    #[test]
    fn death_announces_defeat() {
        let mut h = Harness::new();
        let (cfg, body) = h.start::<LibetConfig>(EnemyVariant::Libet, Vec2::ZERO);
        h.kill(cfg, &body);
        assert_eq!(h.events.count(|e| matches!(e, CombatEvent::BossDefeated { .. })), 1);
        assert_eq!(h.handles.live_count(), 0);
    }
}
