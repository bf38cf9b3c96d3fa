//! Drive a single variant config without a `World` schedule.

use bevy::prelude::*;

use crate::common::geometry::Aabb;
use crate::common::rng::SimRng;
use crate::common::tunables::Tunables;
use crate::plugins::combat::events::FrameEvents;
use crate::plugins::enemies::behavior::{
    AllyView, DeathContext, EnemyBehavior, FrameContext, FrameOutput, PlayerView, StartContext,
};
use crate::plugins::enemies::error::SpawnError;
use crate::plugins::enemies::motion::step_body;
use crate::plugins::enemies::presets::{EnemyPresets, EnemyVariant};
use crate::plugins::enemies::record::EnemyBody;
use crate::plugins::weapons::HandleRegistry;

pub struct Harness {
    pub world: World,
    pub rng: SimRng,
    pub handles: HandleRegistry,
    pub presets: EnemyPresets,
    pub events: FrameEvents,
    pub out: FrameOutput,
    pub walls: Vec<Aabb>,
    pub allies: Vec<AllyView>,
    pub player: Option<PlayerView>,
    pub entity: Entity,
}

impl Harness {
    pub fn new() -> Self {
        let mut world = World::new();
        let entity = world.spawn_empty().id();
        Self {
            world,
            rng: SimRng::seeded(11),
            handles: HandleRegistry::default(),
            presets: EnemyPresets::default(),
            events: FrameEvents::default(),
            out: FrameOutput::default(),
            walls: Vec::new(),
            allies: Vec::new(),
            player: None,
            entity,
        }
    }

    pub fn try_start<B: EnemyBehavior>(&mut self, variant: EnemyVariant, position: Vec2) -> Result<(B, EnemyBody), SpawnError> {
        let preset = self.presets.get(variant).ok_or(SpawnError::MissingPreset(variant))?.clone();
        let mut ctx = StartContext {
            variant,
            position,
            preset: &preset,
            handles: &mut self.handles,
            rng: &mut self.rng,
        };
        let cfg = B::start(&mut ctx)?;
        Ok((cfg, EnemyBody::new(position, preset.stats.clone())))
    }

    pub fn start<B: EnemyBehavior>(&mut self, variant: EnemyVariant, position: Vec2) -> (B, EnemyBody) {
        self.try_start(variant, position).expect("start succeeds")
    }

    pub fn player_at(&mut self, position: Vec2) {
        self.player = Some(PlayerView {
            entity: Entity::PLACEHOLDER,
            position,
            velocity: Vec2::ZERO,
            hitbox: Aabb::centered(position, Tunables::default().player_hitbox),
            alive: true,
        });
    }

    pub fn ally(&mut self, variant: EnemyVariant, position: Vec2, health: i32, max_health: i32) -> Entity {
        let entity = self.world.spawn_empty().id();
        self.allies.push(AllyView { entity, variant, position, health, max_health });
        entity
    }

    /// One update with fresh output buffers.
    pub fn step<B: EnemyBehavior>(&mut self, cfg: &mut B, body: &mut EnemyBody, dt: f32) {
        self.out.clear();
        let mut ctx = FrameContext {
            dt,
            entity: self.entity,
            player: self.player,
            allies: &self.allies,
            walls: &self.walls,
            rng: &mut self.rng,
            out: &mut self.out,
        };
        cfg.update(body, &mut ctx);
    }

    /// Update, then integrate movement.
    pub fn step_and_move<B: EnemyBehavior>(&mut self, cfg: &mut B, body: &mut EnemyBody, dt: f32) {
        self.step(cfg, body, dt);
        step_body(body, dt, Tunables::default().lateral_damping, &self.walls);
        body.speed_scale = 1.0;
    }

    pub fn kill<B: EnemyBehavior>(&mut self, cfg: B, body: &EnemyBody) {
        let mut ctx = DeathContext { entity: self.entity, handles: &mut self.handles, events: &mut self.events };
        cfg.on_death(body, &mut ctx);
    }
}
