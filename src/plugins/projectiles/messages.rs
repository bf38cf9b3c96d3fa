//! Buffered spawn requests.
//!
//! We use Bevy **Messages** here instead of direct pool access.
//! Producers (the player trigger, enemy guns) create intent; the allocator
//! applies it (pool pop + component writes).

use bevy::prelude::*;

use crate::common::layers::Faction;

#[derive(Message, Clone, Copy, Debug, PartialEq)]
pub struct SpawnBulletRequest {
    pub faction: Faction,
    pub pos: Vec2,
    pub vel: Vec2,
    pub damage: i32,
    pub lifetime: f32,
    pub owner: Option<Entity>,
}
