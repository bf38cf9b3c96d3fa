//! Cross-entity effects requested during the update phase.
//!
//! An enemy update may only mutate its own record. Anything that touches the
//! player or another enemy becomes a `CombatRequest`, applied in
//! `SimSet::Resolve` in the order it was written.

use bevy::prelude::*;

use crate::common::layers::Faction;

#[derive(Message, Clone, Copy, Debug, PartialEq)]
pub enum CombatRequest {
    /// Damages the side opposing `faction` inside the circle.
    AreaDamage { source: Entity, faction: Faction, center: Vec2, radius: f32, damage: i32 },
    DamagePlayer { source: Entity, amount: i32 },
    DrainPlayer { source: Entity, amount: f32 },
    /// Heals enemies inside the circle. Recharge units receive half.
    HealAllies { source: Entity, center: Vec2, radius: f32, amount: i32 },
    /// Latches a behaviour-clock multiplier on `target` for the next frame.
    Buff { source: Entity, target: Entity, factor: f32 },
}
