use bevy::prelude::*;

use crate::common::layers::Faction;

#[derive(Component)]
pub struct PooledBullet;

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BulletState {
    #[default]
    Inactive,
    Active,
    PendingReturn,
}

#[derive(Component, Debug, Clone)]
pub struct Bullet {
    pub faction: Faction,
    pub damage: i32,
    /// Seconds left before the bullet expires.
    pub lifetime: f32,
    pub owner: Option<Entity>,
}

impl Bullet {
    pub fn inactive() -> Self {
        Self { faction: Faction::Player, damage: 0, lifetime: 0.0, owner: None }
    }

    #[inline]
    pub fn reset_for_fire(&mut self, faction: Faction, damage: i32, lifetime: f32, owner: Option<Entity>) {
        self.faction = faction;
        self.damage = damage;
        self.lifetime = lifetime;
        self.owner = owner;
    }
}

/// Kinematic state. `previous` is where the bullet started this frame, so hit
/// tests can sweep the whole step.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct BulletMotion {
    pub position: Vec2,
    pub previous: Vec2,
    pub velocity: Vec2,
}

impl BulletMotion {
    pub fn launch(pos: Vec2, vel: Vec2) -> Self {
        Self { position: pos, previous: pos, velocity: vel }
    }
}
