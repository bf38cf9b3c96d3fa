//! Combat plugin: request resolution, contact damage, and the frame event buffer.

pub mod events;
pub mod messages;
pub mod resolve;

use bevy::ecs::message::Messages;
use bevy::prelude::*;

use crate::common::state::GameState;
use crate::plugins::core::SimSet;
use crate::plugins::projectiles::collision::resolve_bullet_hits;

fn update_combat_messages(mut msgs: ResMut<Messages<messages::CombatRequest>>) {
    msgs.update();
}

pub fn plugin(app: &mut App) {
    app.init_resource::<events::FrameEvents>();
    app.init_resource::<Messages<messages::CombatRequest>>();

    app.add_systems(
        FixedUpdate,
        events::clear_frame_events
            .in_set(SimSet::PreUpdate)
            .run_if(in_state(GameState::InGame)),
    );

    // Bullets land first, then requested effects, then body contact.
    app.add_systems(
        FixedUpdate,
        (resolve::resolve_combat_requests, resolve::resolve_contact_damage)
            .chain()
            .after(resolve_bullet_hits)
            .in_set(SimSet::Resolve)
            .run_if(in_state(GameState::InGame)),
    );

    app.add_systems(
        FixedUpdate,
        update_combat_messages
            .in_set(SimSet::Cleanup)
            .run_if(in_state(GameState::InGame)),
    );
}
