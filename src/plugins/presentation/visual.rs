//! What a variant wants drawn this frame.
//!
//! Variants return an `EnemyVisual` from `render`; the renderer (outside this
//! crate) maps texture keys and clips onto real assets.

use bevy::prelude::*;

use crate::plugins::weapons::{GunData, HandleId};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum OverlayStyle {
    Warning,
    Drain,
    /// Charge progress in `[0, 1]`.
    Charge(f32),
    Field,
    Command,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Overlay {
    Radius { center: Vec2, radius: f32, style: OverlayStyle },
    Laser { from: Vec2, to: Vec2 },
    Afterimage { position: Vec2, alpha: f32 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GunPose {
    pub position: Vec2,
    /// Degrees.
    pub angle: f32,
    pub flip: bool,
    pub animation: Option<HandleId>,
}

impl GunPose {
    pub fn of(gun: &GunData, position: Vec2) -> Self {
        Self {
            position,
            angle: gun.angle,
            flip: gun.flip,
            animation: gun.handles().map(|h| h.animation),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct EnemyVisual {
    pub texture_key: &'static str,
    pub clip: &'static str,
    pub flip: bool,
    pub gun: Option<GunPose>,
    pub overlays: Vec<Overlay>,
}

impl EnemyVisual {
    pub fn new(texture_key: &'static str, clip: &'static str, flip: bool) -> Self {
        Self { texture_key, clip, flip, gun: None, overlays: Vec::new() }
    }

    pub fn with_gun(mut self, pose: GunPose) -> Self {
        self.gun = Some(pose);
        self
    }

    pub fn with_overlay(mut self, overlay: Overlay) -> Self {
        self.overlays.push(overlay);
        self
    }
}
