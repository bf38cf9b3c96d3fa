//! Game composition root.
//!
//! - `configure_headless`: the simulation on whatever runtime plugins the
//!   host already added (tests add `MinimalPlugins` + `StatesPlugin`).
//! - `run`: a standalone headless loop at the fixed rate.

use std::time::Duration;

use bevy::app::ScheduleRunnerPlugin;
use bevy::prelude::*;
use bevy::state::app::StatesPlugin;

use crate::common::state::GameState;
use crate::plugins;

/// Fixed simulation rate.
pub const TICK_HZ: f64 = 64.0;

pub fn run() {
    App::new()
        .add_plugins((
            MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(1.0 / TICK_HZ))),
            StatesPlugin,
        ))
        .add_plugins(configure_headless)
        .run();
}

/// Headless configuration, shared by `run` and the integration tests.
///
/// Do NOT add DefaultPlugins here; the host decides how frames are driven.
pub fn configure_headless(app: &mut App) {
    configure_game(app);
}

/// Configuration shared by every host.
pub fn configure_game(app: &mut App) {
    app.init_state::<GameState>();
    app.insert_resource(Time::<Fixed>::from_hz(TICK_HZ));
    plugins::register_gameplay(app);
}
