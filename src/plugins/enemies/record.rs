//! The per-enemy record: shared body state plus the variant config.

use bevy::prelude::*;

use crate::common::geometry::Aabb;
use crate::plugins::presentation::visual::EnemyVisual;

use super::behavior::{DeathContext, EnemyConfig, FrameContext};
use super::error::ReleaseError;
use super::presets::{EnemyStats, EnemyVariant};

/// State every variant shares. Variants steer by writing `facing` and
/// `speed_scale`; the movement step turns that into velocity.
#[derive(Debug, Clone, PartialEq)]
pub struct EnemyBody {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Desired movement direction this frame. Zero brakes.
    pub facing: Vec2,
    pub health: i32,
    pub max_health: i32,
    pub stats: EnemyStats,
    /// Multiplier on `max_speed`, reset to 1 every frame.
    pub speed_scale: f32,
    /// Behaviour-clock multiplier latched from last frame's command buffs.
    pub buff: f32,
    pub pending_buff: f32,
    pub hit_this_frame: bool,
    pub flip: bool,
}

impl EnemyBody {
    pub fn new(position: Vec2, stats: EnemyStats) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            facing: Vec2::ZERO,
            health: stats.max_health,
            max_health: stats.max_health,
            stats,
            speed_scale: 1.0,
            buff: 1.0,
            pending_buff: 1.0,
            hit_this_frame: false,
            flip: false,
        }
    }

    #[inline]
    pub fn hitbox(&self) -> Aabb {
        Aabb::centered(self.position, self.stats.hitbox_size())
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn seek(&mut self, target: Vec2) {
        self.facing = (target - self.position).normalize_or_zero();
    }

    pub fn flee(&mut self, threat: Vec2) {
        self.facing = (self.position - threat).normalize_or_zero();
    }

    pub fn stop(&mut self) {
        self.facing = Vec2::ZERO;
    }

    pub fn health_fraction(&self) -> f32 {
        if self.max_health > 0 { self.health as f32 / self.max_health as f32 } else { 0.0 }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SpawnPhase {
    /// Visible spawn marker; not updated, not hittable.
    Materializing { remaining: f32, total: f32 },
    Active,
}

impl SpawnPhase {
    /// 0 at the start of materialization, 1 once active.
    pub fn progress(&self) -> f32 {
        match *self {
            SpawnPhase::Materializing { remaining, total } if total > 0.0 => (1.0 - remaining / total).clamp(0.0, 1.0),
            SpawnPhase::Materializing { .. } => 0.0,
            SpawnPhase::Active => 1.0,
        }
    }
}

#[derive(Component, Debug)]
pub struct EnemyRecord {
    pub variant: EnemyVariant,
    pub body: EnemyBody,
    pub phase: SpawnPhase,
    config: Option<EnemyConfig>,
}

impl EnemyRecord {
    pub(crate) fn new(variant: EnemyVariant, body: EnemyBody, phase: SpawnPhase, config: EnemyConfig) -> Self {
        Self { variant, body, phase, config: Some(config) }
    }

    pub fn config(&self) -> Option<&EnemyConfig> {
        self.config.as_ref()
    }

    #[inline]
    pub fn is_released(&self) -> bool {
        self.config.is_none()
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.phase == SpawnPhase::Active
    }

    /// Can be struck by bullets, area damage and body contact.
    #[inline]
    pub fn is_hittable(&self) -> bool {
        self.is_active() && self.body.is_alive() && !self.is_released()
    }

    /// Apply damage after the variant's own adjustment. Returns what was taken.
    pub fn take_damage(&mut self, amount: i32) -> i32 {
        let amount = match self.config.as_mut() {
            Some(config) => config.on_damaged(&self.body, amount),
            None => amount,
        };
        let applied = amount.clamp(0, self.body.health.max(0));
        self.body.health -= applied;
        self.body.hit_this_frame = true;
        applied
    }

    /// Restore health up to max. Returns what was restored.
    pub fn heal(&mut self, amount: i32) -> i32 {
        let healed = amount.clamp(0, (self.body.max_health - self.body.health).max(0));
        self.body.health += healed;
        healed
    }

    pub fn update(&mut self, ctx: &mut FrameContext) {
        let Some(config) = self.config.as_mut() else {
            warn!("update on released {:?} ignored", self.variant);
            return;
        };
        config.update(&mut self.body, ctx);
    }

    pub fn render(&self) -> Option<EnemyVisual> {
        let Some(config) = self.config.as_ref() else {
            warn!("render of released {:?} ignored", self.variant);
            return None;
        };
        Some(config.render(&self.body))
    }

    /// Run OnDeath. A second call fails with `AlreadyReleased`.
    pub fn release(&mut self, ctx: &mut DeathContext) -> Result<(), ReleaseError> {
        let config = self.config.take().ok_or(ReleaseError::AlreadyReleased)?;
        config.on_death(&self.body, ctx);
        Ok(())
    }
}
