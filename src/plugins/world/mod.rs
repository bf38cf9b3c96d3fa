//! World plugin: the static environment collision surface.
//!
//! Walls are spawned from `ArenaLayout` when a level starts and are never
//! mutated afterwards. Systems that need them copy the hitboxes into a
//! per-frame `Vec<Aabb>` snapshot.

use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::geometry::Aabb;
use crate::common::state::GameState;

const TILE: f32 = 64.0;
const HALF_W: f32 = TILE * 16.0;
const HALF_H: f32 = TILE * 9.0;
const THICKNESS: f32 = 30.0;

#[derive(Component, Debug, Clone, PartialEq)]
pub struct Wall {
    pub render_rect: Aabb,
    pub hitbox: Aabb,
    pub texture: Option<String>,
}

impl Wall {
    /// A wall whose drawn rectangle and hitbox coincide.
    pub fn solid(center: Vec2, size: Vec2) -> Self {
        let rect = Aabb::centered(center, size);
        Self { render_rect: rect, hitbox: rect, texture: None }
    }
}

#[derive(Resource, Debug, Clone)]
pub struct ArenaLayout {
    pub walls: Vec<(String, Wall)>,
}

impl Default for ArenaLayout {
    fn default() -> Self {
        let span_w = HALF_W * 2.0 + THICKNESS * 2.0;
        let span_h = HALF_H * 2.0;
        Self {
            walls: vec![
                ("WallTop".into(), Wall::solid(Vec2::new(0.0, HALF_H + THICKNESS * 0.5), Vec2::new(span_w, THICKNESS))),
                ("WallBottom".into(), Wall::solid(Vec2::new(0.0, -HALF_H - THICKNESS * 0.5), Vec2::new(span_w, THICKNESS))),
                ("WallLeft".into(), Wall::solid(Vec2::new(-HALF_W - THICKNESS * 0.5, 0.0), Vec2::new(THICKNESS, span_h))),
                ("WallRight".into(), Wall::solid(Vec2::new(HALF_W + THICKNESS * 0.5, 0.0), Vec2::new(THICKNESS, span_h))),
                ("PillarWest".into(), Wall::solid(Vec2::new(-TILE * 6.0, 0.0), Vec2::splat(TILE))),
                ("PillarEast".into(), Wall::solid(Vec2::new(TILE * 6.0, 0.0), Vec2::splat(TILE))),
            ],
        }
    }
}

impl ArenaLayout {
    /// No walls at all. Handy for scenario tests.
    pub fn empty() -> Self {
        Self { walls: Vec::new() }
    }
}

pub fn plugin(app: &mut App) {
    app.init_resource::<ArenaLayout>();
    app.add_systems(OnEnter(GameState::InGame), spawn_arena);
}

fn spawn_arena(mut commands: Commands, layout: Res<ArenaLayout>) {
    for (name, wall) in &layout.walls {
        commands.spawn((Name::new(name.clone()), wall.clone(), DespawnOnExit(GameState::InGame)));
    }
}

/// Hitboxes of every wall, for one frame's worth of queries.
pub fn wall_hitboxes<'a>(walls: impl IntoIterator<Item = &'a Wall>) -> Vec<Aabb> {
    walls.into_iter().map(|w| w.hitbox).collect()
}

/// Move a body of `size` by `delta`, one axis at a time. An axis whose step
/// would overlap a blocker is cancelled. Returns the new position and which
/// axes were blocked.
pub fn try_move(position: Vec2, size: Vec2, delta: Vec2, blockers: &[Aabb]) -> (Vec2, BVec2) {
    let mut pos = position;
    let mut blocked = BVec2::FALSE;

    if delta.x != 0.0 {
        let next = pos + Vec2::new(delta.x, 0.0);
        let rect = Aabb::centered(next, size);
        if blockers.iter().any(|b| b.overlaps(&rect)) {
            blocked.x = true;
        } else {
            pos = next;
        }
    }

    if delta.y != 0.0 {
        let next = pos + Vec2::new(0.0, delta.y);
        let rect = Aabb::centered(next, size);
        if blockers.iter().any(|b| b.overlaps(&rect)) {
            blocked.y = true;
        } else {
            pos = next;
        }
    }

    (pos, blocked)
}
