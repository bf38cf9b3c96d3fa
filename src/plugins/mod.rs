//! Feature plugins.

use bevy::prelude::*;

use crate::plugins::projectiles::ProjectilesPlugin;

pub mod combat;
pub mod core;
pub mod enemies;
pub mod interactables;
pub mod player;
pub mod presentation;
pub mod projectiles;
pub mod weapons;
pub mod world;

/// Register every simulation plugin. None of them need a window or renderer.
///
/// `core` goes first: later plugins read `Tunables` while building.
pub fn register_gameplay(app: &mut App) {
    core::plugin(app);
    weapons::plugin(app);
    world::plugin(app);
    player::plugin(app);
    enemies::plugin(app);
    combat::plugin(app);
    interactables::plugin(app);
    presentation::plugin(app);
    app.add_plugins(ProjectilesPlugin);
}
