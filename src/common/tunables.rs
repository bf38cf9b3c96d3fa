//! Tunable gameplay constants.

use bevy::prelude::*;

#[derive(Resource, Debug, Clone)]
pub struct Tunables {
    pub player_speed: f32,
    pub player_hitbox: Vec2,
    pub player_max_health: i32,
    pub player_max_energy: f32,
    pub player_max_ammo: u32,
    /// Seconds of immunity to contact damage after a contact hit.
    pub contact_invincibility: f32,
    /// Seconds an enemy spends materializing before it becomes active.
    pub spawn_delay: f32,
    /// Fraction of sideways velocity kept per step while an enemy walks.
    pub lateral_damping: f32,
    pub kill_ammo_bonus: u32,
    pub bullet_pool_capacity: usize,
    pub bullet_hitbox: f32,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            player_speed: 300.0,
            player_hitbox: Vec2::new(20.0, 28.0),
            player_max_health: 100,
            player_max_energy: 100.0,
            player_max_ammo: 240,
            contact_invincibility: 0.5,
            spawn_delay: 1.0,
            lateral_damping: 0.9,
            kill_ammo_bonus: 20,
            bullet_pool_capacity: 512,
            bullet_hitbox: 6.0,
        }
    }
}
