//! Core plugin: shared resources and the per-frame phase chain.
//!
//! Every gameplay system runs in `FixedUpdate` inside exactly one `SimSet`:
//!
//! ```text
//! PreUpdate -> Update -> Resolve -> Death -> Cleanup
//! ```
//!
//! - PreUpdate: clear frame events, admit spawn requests, reset transient flags.
//! - Update: per-entity behaviour. An update only mutates its own record and
//!   emits requests for anything cross-entity.
//! - Resolve: bullets, area damage, drain, heal, buffs, contact damage.
//! - Death: release every dead record exactly once and mark it.
//! - Cleanup: structural removal, pool returns, message buffer swaps.

use bevy::prelude::*;

use crate::common::rng::SimRng;
use crate::common::tunables::Tunables;

#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimSet {
    PreUpdate,
    Update,
    Resolve,
    Death,
    Cleanup,
}

pub fn plugin(app: &mut App) {
    app.insert_resource(Tunables::default());
    app.insert_resource(SimRng::default());
    app.configure_sets(
        FixedUpdate,
        (
            SimSet::PreUpdate,
            SimSet::Update,
            SimSet::Resolve,
            SimSet::Death,
            SimSet::Cleanup,
        )
            .chain(),
    );
}
