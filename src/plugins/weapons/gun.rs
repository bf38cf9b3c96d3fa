//! Gun state and the shared fire entry point.
//!
//! Players and enemies fire through `GunData::fire`. It gates on the fire timer,
//! reload and magazine, then emits one `SpawnBulletRequest` per bullet. The
//! bullet allocator turns requests into pooled bullets later in the frame.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::common::geometry::rotate_degrees;
use crate::common::layers::Faction;
use crate::common::rng::SimRng;
use crate::plugins::projectiles::messages::SpawnBulletRequest;

use super::handles::{GunHandles, HandleRegistry};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GunKind {
    Pistol,
    Smg,
    AssaultRifle,
    BattleRifle,
    Shotgun,
}

impl GunKind {
    pub const ALL: [GunKind; 5] = [
        GunKind::Pistol,
        GunKind::Smg,
        GunKind::AssaultRifle,
        GunKind::BattleRifle,
        GunKind::Shotgun,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            GunKind::Pistol => "Glock 17",
            GunKind::Smg => "KRISS Vector",
            GunKind::AssaultRifle => "M4A1 URG-I",
            GunKind::BattleRifle => "FN SCAR-H",
            GunKind::Shotgun => "Beretta 1301 Tactical",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FireMode {
    /// One shot per trigger press.
    Semi,
    /// Fires while the trigger is held.
    Auto,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GunStats {
    /// Rounds per minute.
    pub fire_rate: f32,
    /// Total cone, in degrees.
    pub spread_angle: f32,
    pub damage: i32,
    pub fire_mode: FireMode,
    pub bullet_speed: f32,
    pub bullet_lifetime: f32,
    pub bullets_per_shot: u32,
    pub ammo_capacity: u32,
    pub ammo_consumption: u32,
    pub reload_time: f32,
}

impl GunStats {
    /// Seconds between shots.
    pub fn cooldown(&self) -> f32 {
        if self.fire_rate > 0.0 { 60.0 / self.fire_rate } else { f32::INFINITY }
    }

    /// Reason the stats cannot back a working gun, if any.
    pub fn invalid_reason(&self) -> Option<&'static str> {
        if !(self.fire_rate > 0.0) {
            Some("fire rate must be positive")
        } else if self.bullets_per_shot == 0 {
            Some("bullets per shot must be at least one")
        } else if self.ammo_consumption > self.ammo_capacity {
            Some("consumption exceeds magazine capacity")
        } else if !(self.bullet_lifetime > 0.0) {
            Some("bullet lifetime must be positive")
        } else {
            None
        }
    }

    pub fn for_kind(kind: GunKind) -> Self {
        match kind {
            GunKind::Pistol => Self {
                fire_rate: 400.0,
                spread_angle: 4.0,
                damage: 25,
                fire_mode: FireMode::Semi,
                bullet_speed: 900.0,
                bullet_lifetime: 1.2,
                bullets_per_shot: 1,
                ammo_capacity: 17,
                ammo_consumption: 1,
                reload_time: 1.2,
            },
            GunKind::Smg => Self {
                fire_rate: 1100.0,
                spread_angle: 9.0,
                damage: 14,
                fire_mode: FireMode::Auto,
                bullet_speed: 850.0,
                bullet_lifetime: 0.9,
                bullets_per_shot: 1,
                ammo_capacity: 30,
                ammo_consumption: 1,
                reload_time: 1.6,
            },
            GunKind::AssaultRifle => Self {
                fire_rate: 800.0,
                spread_angle: 5.0,
                damage: 22,
                fire_mode: FireMode::Auto,
                bullet_speed: 1000.0,
                bullet_lifetime: 1.2,
                bullets_per_shot: 1,
                ammo_capacity: 30,
                ammo_consumption: 1,
                reload_time: 2.0,
            },
            GunKind::BattleRifle => Self {
                fire_rate: 600.0,
                spread_angle: 3.0,
                damage: 40,
                fire_mode: FireMode::Auto,
                bullet_speed: 1100.0,
                bullet_lifetime: 1.4,
                bullets_per_shot: 1,
                ammo_capacity: 20,
                ammo_consumption: 1,
                reload_time: 2.3,
            },
            GunKind::Shotgun => Self {
                fire_rate: 120.0,
                spread_angle: 24.0,
                damage: 12,
                fire_mode: FireMode::Semi,
                bullet_speed: 800.0,
                bullet_lifetime: 0.5,
                bullets_per_shot: 8,
                ammo_capacity: 6,
                ammo_consumption: 1,
                reload_time: 2.6,
            },
        }
    }
}

/// Firing pattern for one trigger pull.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shot {
    /// `bullets_per_shot` bullets scattered within the spread cone.
    Aimed(Vec2),
    /// `count` bullets evenly spaced around the muzzle, rotated by `phase_deg`.
    Ring { count: u32, phase_deg: f32 },
}

#[derive(Debug)]
pub struct GunData {
    pub name: String,
    pub kind: Option<GunKind>,
    pub owner: Faction,
    pub stats: GunStats,
    pub fire_timer: f32,
    pub reload_timer: f32,
    pub magazine: u32,
    /// Aim angle in degrees.
    pub angle: f32,
    pub flip: bool,
    handles: Option<GunHandles>,
}

impl GunData {
    pub fn new(name: impl Into<String>, stats: GunStats, owner: Faction) -> Self {
        Self {
            name: name.into(),
            kind: None,
            owner,
            magazine: stats.ammo_capacity,
            stats,
            fire_timer: 0.0,
            reload_timer: 0.0,
            angle: 0.0,
            flip: false,
            handles: None,
        }
    }

    pub fn from_kind(kind: GunKind, owner: Faction) -> Self {
        let mut gun = Self::new(kind.display_name(), GunStats::for_kind(kind), owner);
        gun.kind = Some(kind);
        gun
    }

    /// Same gun model with fresh state and no handles.
    pub fn unequipped_copy(&self) -> Self {
        let mut gun = Self::new(self.name.clone(), self.stats.clone(), self.owner);
        gun.kind = self.kind;
        gun
    }

    pub fn handles(&self) -> Option<&GunHandles> {
        self.handles.as_ref()
    }

    /// Acquire presentation handles. No-op if the gun already holds a set.
    pub fn attach_handles(&mut self, registry: &mut HandleRegistry) {
        if self.handles.is_none() {
            self.handles = Some(GunHandles::acquire(registry));
        }
    }

    /// Returns true if handles were held and are now released.
    pub fn release_handles(&mut self, registry: &mut HandleRegistry) -> bool {
        match self.handles.take() {
            Some(h) => {
                h.release(registry);
                true
            }
            None => false,
        }
    }

    pub fn is_reloading(&self) -> bool {
        self.reload_timer > 0.0
    }

    pub fn is_ready(&self) -> bool {
        self.fire_timer <= 0.0 && !self.is_reloading() && self.magazine >= self.stats.ammo_consumption
    }

    /// Advance timers. A finished reload refills the magazine from `reserve`, or
    /// from nothing when `reserve` is `None`. A magazine too low to fire starts a
    /// reload as soon as there is ammo to load.
    pub fn tick(&mut self, dt: f32, mut reserve: Option<&mut u32>) {
        self.fire_timer = (self.fire_timer - dt).max(0.0);

        if self.reload_timer > 0.0 {
            self.reload_timer -= dt;
            if self.reload_timer <= 0.0 {
                self.reload_timer = 0.0;
                let missing = self.stats.ammo_capacity.saturating_sub(self.magazine);
                let refill = match reserve.as_deref_mut() {
                    Some(r) => {
                        let n = missing.min(*r);
                        *r -= n;
                        n
                    }
                    None => missing,
                };
                self.magazine += refill;
            }
        }

        let has_ammo = reserve.is_none_or(|r| *r > 0);
        if self.magazine < self.stats.ammo_consumption.max(1) && has_ammo {
            self.start_reload();
        }
    }

    pub fn start_reload(&mut self) {
        if !self.is_reloading() && self.magazine < self.stats.ammo_capacity {
            self.reload_timer = self.stats.reload_time.max(f32::EPSILON);
        }
    }

    /// Aim angle follows the target direction.
    pub fn aim(&mut self, direction: Vec2) {
        if direction != Vec2::ZERO {
            self.angle = direction.y.atan2(direction.x).to_degrees();
        }
    }

    /// Sprite flip follows the owner's movement, never the aim.
    pub fn set_flip_from_motion(&mut self, motion: Vec2) {
        if motion.x < 0.0 {
            self.flip = true;
        } else if motion.x > 0.0 {
            self.flip = false;
        }
    }

    /// Pull the trigger. Returns `None` when the gun is not ready.
    pub fn fire(
        &mut self,
        origin: Vec2,
        shot: Shot,
        rng: &mut SimRng,
        owner: Option<Entity>,
    ) -> Option<Vec<SpawnBulletRequest>> {
        if !self.is_ready() {
            return None;
        }

        let directions: Vec<Vec2> = match shot {
            Shot::Aimed(dir) => {
                let dir = dir.normalize_or_zero();
                if dir == Vec2::ZERO {
                    return None;
                }
                self.aim(dir);
                let half = self.stats.spread_angle * 0.5;
                (0..self.stats.bullets_per_shot)
                    .map(|_| rotate_degrees(dir, rng.range(-half, half)))
                    .collect()
            }
            Shot::Ring { count, phase_deg } => {
                if count == 0 {
                    return None;
                }
                let step = 360.0 / count as f32;
                (0..count)
                    .map(|i| rotate_degrees(Vec2::X, phase_deg + step * i as f32))
                    .collect()
            }
        };

        self.fire_timer = self.stats.cooldown();
        self.magazine -= self.stats.ammo_consumption;
        if self.magazine < self.stats.ammo_consumption.max(1) {
            self.start_reload();
        }

        Some(
            directions
                .into_iter()
                .map(|d| SpawnBulletRequest {
                    faction: self.owner,
                    pos: origin,
                    vel: d * self.stats.bullet_speed,
                    damage: self.stats.damage,
                    lifetime: self.stats.bullet_lifetime,
                    owner,
                })
                .collect(),
        )
    }
}
