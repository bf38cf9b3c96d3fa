//! Player plugin.
//!
//! The player is an external collaborator of the simulation core. Input is
//! written into `PlayerIntent` by whoever hosts the simulation; combat code
//! mutates the player only through the narrow methods on `Player`.
//!
//! Pipeline:
//! - PreUpdate: tick invincibility and the held gun
//! - Update: apply movement against walls

use bevy::prelude::*;

use crate::common::geometry::Aabb;
use crate::common::layers::Faction;
use crate::common::state::GameState;
use crate::common::tunables::Tunables;
use crate::plugins::core::SimSet;
use crate::plugins::weapons::{GunData, GunKind, HandleRegistry};
use crate::plugins::world::{try_move, wall_hitboxes, Wall};

#[derive(Component, Debug)]
pub struct Player {
    pub position: Vec2,
    pub velocity: Vec2,
    pub hitbox_size: Vec2,
    pub health: i32,
    pub max_health: i32,
    pub energy: f32,
    pub max_energy: f32,
    pub reserve_ammo: u32,
    pub max_ammo: u32,
    pub kills: u32,
    /// Seconds of remaining contact-damage immunity.
    pub invincibility: f32,
    pub gun: GunData,
    pub(crate) trigger_latched: bool,
    pub(crate) interact_latched: bool,
}

impl Player {
    pub fn new(position: Vec2, gun: GunData, tunables: &Tunables) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            hitbox_size: tunables.player_hitbox,
            health: tunables.player_max_health,
            max_health: tunables.player_max_health,
            energy: tunables.player_max_energy,
            max_energy: tunables.player_max_energy,
            reserve_ammo: tunables.player_max_ammo / 2,
            max_ammo: tunables.player_max_ammo,
            kills: 0,
            invincibility: 0.0,
            gun,
            trigger_latched: false,
            interact_latched: false,
        }
    }

    #[inline]
    pub fn hitbox(&self) -> Aabb {
        Aabb::centered(self.position, self.hitbox_size)
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Returns the damage actually taken.
    pub fn apply_damage(&mut self, amount: i32) -> i32 {
        let applied = amount.clamp(0, self.health.max(0));
        self.health -= applied;
        applied
    }

    /// Body contact. Ignored while invincible; a hit starts a new window.
    pub fn apply_contact_damage(&mut self, amount: i32, window: f32) -> Option<i32> {
        if self.invincibility > 0.0 || !self.is_alive() {
            return None;
        }
        self.invincibility = window;
        Some(self.apply_damage(amount))
    }

    /// Returns the energy actually removed.
    pub fn drain_energy(&mut self, amount: f32) -> f32 {
        let drained = amount.clamp(0.0, self.energy.max(0.0));
        self.energy -= drained;
        drained
    }

    /// Returns the health actually restored.
    pub fn heal(&mut self, amount: i32) -> i32 {
        let healed = amount.clamp(0, (self.max_health - self.health).max(0));
        self.health += healed;
        healed
    }

    pub fn reward_kill(&mut self, ammo_bonus: u32) {
        self.kills += 1;
        self.reserve_ammo = (self.reserve_ammo + ammo_bonus).min(self.max_ammo);
    }

    /// Swap in `gun`. The held gun's handles are released before the new gun
    /// acquires its own; the previous gun is returned without handles.
    pub fn equip_gun(&mut self, mut gun: GunData, registry: &mut HandleRegistry) -> GunData {
        self.gun.release_handles(registry);
        gun.owner = Faction::Player;
        gun.attach_handles(registry);
        std::mem::replace(&mut self.gun, gun)
    }
}

/// Per-frame player input, written by the host.
#[derive(Resource, Default, Debug, Clone)]
pub struct PlayerIntent {
    pub move_axis: Vec2,
    /// World-space aim point.
    pub aim: Vec2,
    pub fire: bool,
    pub interact: bool,
}

pub fn plugin(app: &mut App) {
    app.insert_resource(PlayerIntent::default())
        .add_systems(OnEnter(GameState::InGame), spawn)
        .add_systems(OnExit(GameState::InGame), release)
        .add_systems(
            FixedUpdate,
            reset_player_frame
                .in_set(SimSet::PreUpdate)
                .run_if(in_state(GameState::InGame)),
        )
        .add_systems(
            FixedUpdate,
            apply_movement
                .in_set(SimSet::Update)
                .run_if(in_state(GameState::InGame)),
        );
}

fn spawn(
    mut commands: Commands,
    tunables: Res<Tunables>,
    mut registry: ResMut<HandleRegistry>,
    q_existing: Query<(), With<Player>>,
) {
    if !q_existing.is_empty() {
        return;
    }

    let mut gun = GunData::from_kind(GunKind::Pistol, Faction::Player);
    gun.attach_handles(&mut registry);

    commands.spawn((Name::new("Player"), Player::new(Vec2::ZERO, gun, &tunables)));
}

fn release(
    mut commands: Commands,
    mut registry: ResMut<HandleRegistry>,
    mut q_player: Query<(Entity, &mut Player)>,
) {
    for (e, mut player) in &mut q_player {
        player.gun.release_handles(&mut registry);
        commands.entity(e).despawn();
    }
}

pub fn reset_player_frame(time: Res<Time<Fixed>>, mut q_player: Query<&mut Player>) {
    let dt = time.delta_secs();
    for mut player in &mut q_player {
        player.invincibility = (player.invincibility - dt).max(0.0);
        let Player { gun, reserve_ammo, .. } = &mut *player;
        gun.tick(dt, Some(reserve_ammo));
    }
}

pub fn apply_movement(
    time: Res<Time<Fixed>>,
    tunables: Res<Tunables>,
    intent: Res<PlayerIntent>,
    q_walls: Query<&Wall>,
    mut q_player: Query<&mut Player>,
) {
    let Ok(mut player) = q_player.single_mut() else {
        return;
    };
    if !player.is_alive() {
        player.velocity = Vec2::ZERO;
        return;
    }

    let axis = intent.move_axis.normalize_or_zero();
    player.velocity = axis * tunables.player_speed;

    let walls = wall_hitboxes(&q_walls);
    let delta = player.velocity * time.delta_secs();
    let (pos, _) = try_move(player.position, player.hitbox_size, delta, &walls);
    player.position = pos;
    player.gun.set_flip_from_motion(axis);
}

#[cfg(test)]
mod tests;
