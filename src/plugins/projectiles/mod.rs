//! Projectiles plugin: **Message-based producer → consumer** spawning + pooling.
//!
//! # Data flow (one simulation frame)
//! ```text
//!  SimSet::Update
//!   (A) Producers: request_player_bullets, enemy guns (via run_enemy_updates)
//!       - write: SpawnBulletRequest
//!   (B) Consumer: allocate_bullets_from_pool
//!       - mutates: BulletPool.free, BulletState, Bullet, BulletMotion
//!
//!  SimSet::Resolve
//!   (C) advance_bullets: integrate, count down lifetime
//!   (D) resolve_bullet_hits: swept test vs walls + opposing faction,
//!       nearest wins, state -> PendingReturn
//!   (E) expire_bullets: bullets that hit nothing and ran out -> PendingReturn
//!
//!  SimSet::Cleanup
//!   (F) return_to_pool_commit: PendingReturn -> Inactive, push free
//! ```
//!
//! Producers do **not** borrow `ResMut<BulletPool>`. They only enqueue intent.
//! The allocator is the single writer that pops from the pool and the commit is
//! the single writer that pushes back.

pub mod allocator;
pub mod collision;
pub mod commit;
pub mod components;
pub mod messages;
pub mod motion;
pub mod pool;
pub mod request;

use bevy::ecs::message::Messages;
use bevy::prelude::*;

use crate::common::state::GameState;
use crate::common::tunables::Tunables;
use crate::plugins::core::SimSet;
use crate::plugins::enemies;

pub struct ProjectilesPlugin;

/// Messages are double-buffered; `update()` advances buffers once per frame.
fn update_spawn_messages(mut msgs: ResMut<Messages<messages::SpawnBulletRequest>>) {
    msgs.update();
}

impl Plugin for ProjectilesPlugin {
    fn build(&self, app: &mut App) {
        let capacity = app
            .world()
            .get_resource::<Tunables>()
            .map_or(Tunables::default().bullet_pool_capacity, |t| t.bullet_pool_capacity);

        app.insert_resource(pool::BulletPool::new(capacity))
            .add_systems(Startup, pool::init_bullet_pool);

        app.init_resource::<Messages<messages::SpawnBulletRequest>>();

        app.add_systems(
            FixedUpdate,
            (
                request::request_player_bullets,
                allocator::allocate_bullets_from_pool
                    .after(request::request_player_bullets)
                    .after(enemies::run_enemy_updates),
            )
                .in_set(SimSet::Update)
                .run_if(in_state(GameState::InGame)),
        );

        app.add_systems(
            FixedUpdate,
            (
                motion::advance_bullets,
                collision::resolve_bullet_hits,
                motion::expire_bullets,
            )
                .chain()
                .in_set(SimSet::Resolve)
                .run_if(in_state(GameState::InGame)),
        );

        app.add_systems(
            FixedUpdate,
            (commit::return_to_pool_commit, update_spawn_messages)
                .chain()
                .in_set(SimSet::Cleanup)
                .run_if(in_state(GameState::InGame)),
        );

        app.add_systems(OnExit(GameState::InGame), pool::recall_all_bullets);
    }
}
