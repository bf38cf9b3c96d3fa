//! Per-frame presentation events.
//!
//! Systems push into `FrameEvents` during a frame; the buffer is cleared at the
//! start of the next one. Presentation reads it after the frame completes.

use bevy::prelude::*;

use crate::common::layers::Faction;
use crate::plugins::enemies::EnemyVariant;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImpactTarget {
    Wall(Entity),
    Enemy(Entity),
    Player(Entity),
}

#[derive(Clone, Debug, PartialEq)]
pub enum CombatEvent {
    Fired { faction: Faction, origin: Vec2, direction: Vec2 },
    Impact { position: Vec2, direction: Vec2, target: ImpactTarget },
    BulletExpired { position: Vec2 },
    /// A kamikaze started its detonation countdown.
    ExplosionPrimed { source: Entity, position: Vec2, radius: f32 },
    Explosion { source: Entity, position: Vec2, radius: f32 },
    FieldPulse { source: Entity, position: Vec2, radius: f32 },
    Drain { source: Entity, amount: f32 },
    Heal { source: Entity, position: Vec2, radius: f32 },
    PlayerDamaged { amount: i32, remaining: i32 },
    EnemyKilled { entity: Entity, variant: EnemyVariant, position: Vec2 },
    BossPhase { source: Entity, phase: u8 },
    BossDefeated { entity: Entity },
}

#[derive(Resource, Debug, Default)]
pub struct FrameEvents {
    events: Vec<CombatEvent>,
}

impl FrameEvents {
    pub fn push(&mut self, event: CombatEvent) {
        self.events.push(event);
    }

    pub fn iter(&self) -> impl Iterator<Item = &CombatEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn count(&self, pred: impl Fn(&CombatEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl Extend<CombatEvent> for FrameEvents {
    fn extend<T: IntoIterator<Item = CombatEvent>>(&mut self, iter: T) {
        self.events.extend(iter);
    }
}

pub fn clear_frame_events(mut events: ResMut<FrameEvents>) {
    events.clear();
}
