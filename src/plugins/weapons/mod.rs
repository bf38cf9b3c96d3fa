//! Weapons: gun data, the shared fire path, and the presentation handles guns own.

use bevy::prelude::*;

pub mod gun;
pub mod handles;

pub use gun::{FireMode, GunData, GunKind, GunStats, Shot};
pub use handles::{GunHandles, HandleId, HandleKind, HandleRegistry};

pub fn plugin(app: &mut App) {
    app.init_resource::<HandleRegistry>();
}
