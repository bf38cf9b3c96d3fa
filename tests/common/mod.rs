//! Integration test harness.
//!
//! Keep integration tests headless and deterministic:
//! - `MinimalPlugins` + `StatesPlugin` provide the ECS runtime.
//! - `arena_sim::game::configure_headless` installs the simulation.
//! - Frames are driven by `step`, which advances `Time<Fixed>` by one tick and
//!   runs `FixedUpdate` directly, so wall-clock time never matters.

#![allow(dead_code)]

use bevy::prelude::*;
use bevy::state::app::StatesPlugin;

use arena_sim::common::state::GameState;
use arena_sim::plugins::combat::events::FrameEvents;
use arena_sim::plugins::enemies::{spawn_enemy_now, EnemyVariant};
use arena_sim::plugins::player::{Player, PlayerIntent};

/// App booted into `InGame`: startup has run and the level is populated.
pub fn app_headless() -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, StatesPlugin));
    arena_sim::game::configure_headless(&mut app);
    app.update();
    app
}

/// One fixed simulation frame.
pub fn step(app: &mut App) {
    let world = app.world_mut();
    let dt = world.resource::<Time<Fixed>>().timestep();
    world.resource_mut::<Time<Fixed>>().advance_by(dt);
    world.run_schedule(FixedUpdate);
}

/// Step until `pred` holds on this frame's events, up to `max` frames.
/// Returns the frame index it held on.
pub fn step_until(app: &mut App, max: usize, pred: impl Fn(&FrameEvents) -> bool) -> Option<usize> {
    (0..max).find(|_| {
        step(app);
        pred(app.world().resource::<FrameEvents>())
    })
}

pub fn change_state(app: &mut App, state: GameState) {
    app.world_mut().resource_mut::<NextState<GameState>>().set(state);
    app.world_mut().run_schedule(StateTransition);
}

pub fn spawn(app: &mut App, variant: EnemyVariant, position: Vec2) -> Entity {
    spawn_enemy_now(app.world_mut(), variant, position, 0.0).expect("spawn")
}

pub fn intent(app: &mut App) -> Mut<'_, PlayerIntent> {
    app.world_mut().resource_mut::<PlayerIntent>()
}

pub fn player(app: &mut App) -> &Player {
    let world = app.world_mut();
    let e = world.query_filtered::<Entity, With<Player>>().single(world).expect("one player");
    world.get::<Player>(e).expect("player")
}

pub fn count<C: Component>(app: &mut App) -> usize {
    let world = app.world_mut();
    world.query::<&C>().iter(world).count()
}
