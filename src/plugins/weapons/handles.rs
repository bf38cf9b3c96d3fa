//! Presentation handles owned by guns.
//!
//! A gun holds three handles (animation, bullet preset, fragment emitter). Each
//! handle is exclusively owned: `GunHandles` is not `Clone`, and releasing it
//! consumes it. `HandleRegistry` tracks what is live so leaks are observable.

use bevy::platform::collections::HashMap;
use bevy::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandleId(u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HandleKind {
    GunAnimation,
    BulletPreset,
    FragmentEmitter,
}

#[derive(Resource, Debug, Default)]
pub struct HandleRegistry {
    next: u32,
    live: HashMap<HandleId, HandleKind>,
}

impl HandleRegistry {
    pub fn acquire(&mut self, kind: HandleKind) -> HandleId {
        let id = HandleId(self.next);
        self.next = self.next.wrapping_add(1);
        self.live.insert(id, kind);
        id
    }

    /// Returns false if the handle was not live.
    pub fn release(&mut self, id: HandleId) -> bool {
        self.live.remove(&id).is_some()
    }

    pub fn is_live(&self, id: HandleId) -> bool {
        self.live.contains_key(&id)
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct GunHandles {
    pub animation: HandleId,
    pub bullet_preset: HandleId,
    pub fragment_emitter: HandleId,
}

impl GunHandles {
    pub fn acquire(registry: &mut HandleRegistry) -> Self {
        Self {
            animation: registry.acquire(HandleKind::GunAnimation),
            bullet_preset: registry.acquire(HandleKind::BulletPreset),
            fragment_emitter: registry.acquire(HandleKind::FragmentEmitter),
        }
    }

    pub fn release(self, registry: &mut HandleRegistry) {
        for id in [self.animation, self.bullet_preset, self.fragment_emitter] {
            if !registry.release(id) {
                error!("gun handle {id:?} was not live at release");
            }
        }
    }

    pub fn ids(&self) -> [HandleId; 3] {
        [self.animation, self.bullet_preset, self.fragment_emitter]
    }
}
