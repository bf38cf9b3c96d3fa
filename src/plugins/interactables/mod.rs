//! Interactables plugin: weapon crates, dropped guns and health pickups.
//!
//! An interactable owns its payload outright. The payload's shape is fixed by
//! the kind and checked once at construction; afterwards it can only be read
//! through accessors that check the kind again.
//!
//! Pipeline (`SimSet::Update`, after player movement):
//! - `update_focus`: the first interactable under the player is focused
//! - `player_interact`: on the rising edge of the interact input, use it

use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;
use thiserror::Error;

use crate::common::geometry::Aabb;
use crate::common::layers::Faction;
use crate::common::rng::SimRng;
use crate::common::state::GameState;
use crate::plugins::core::SimSet;
use crate::plugins::player::{self, Player, PlayerIntent};
use crate::plugins::weapons::{GunData, GunKind, HandleRegistry};

pub const HEALTH_SMALL_AMOUNT: i32 = 25;
pub const HEALTH_LARGE_AMOUNT: i32 = 50;

const CRATE_SIZE: Vec2 = Vec2::new(40.0, 20.0);
const WEAPON_SIZE: Vec2 = Vec2::new(10.0, 10.0);
const HEALTH_SIZE: Vec2 = Vec2::new(16.0, 16.0);
/// Where an opened crate puts its gun, relative to the crate.
const CRATE_DROP_OFFSET: Vec2 = Vec2::new(0.0, -24.0);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InteractableKind {
    WeaponCrateClosed,
    WeaponCrateOpen,
    Weapon,
    HealthSmall,
    HealthLarge,
}

impl InteractableKind {
    pub fn hitbox_size(self) -> Vec2 {
        match self {
            Self::WeaponCrateClosed | Self::WeaponCrateOpen => CRATE_SIZE,
            Self::Weapon => WEAPON_SIZE,
            Self::HealthSmall | Self::HealthLarge => HEALTH_SIZE,
        }
    }

    pub fn texture_key(self) -> &'static str {
        match self {
            Self::WeaponCrateClosed => "weapon_crate_closed",
            Self::WeaponCrateOpen => "weapon_crate_open",
            Self::Weapon => "weapon",
            Self::HealthSmall => "health_small",
            Self::HealthLarge => "health_large",
        }
    }

    /// Whether the player can use it at all.
    pub fn is_enabled(self) -> bool {
        !matches!(self, Self::WeaponCrateOpen)
    }
}

/// What an interactable carries. Which shape is legal depends on the kind.
#[derive(Debug)]
pub enum InteractablePayload {
    None,
    CrateGun(GunKind),
    Gun(GunData),
    Health(i32),
}

impl InteractablePayload {
    fn shape(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::CrateGun(_) => "CrateGun",
            Self::Gun(_) => "Gun",
            Self::Health(_) => "Health",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InteractableError {
    #[error("{kind:?} cannot carry a {payload} payload")]
    PayloadMismatch { kind: InteractableKind, payload: &'static str },

    #[error("Gun '{0}' still holds presentation handles; drop an unequipped gun")]
    GunStillEquipped(String),
}

#[derive(Component, Debug)]
pub struct Interactable {
    pub kind: InteractableKind,
    pub position: Vec2,
    /// Presentation text shown while focused.
    pub label: Option<String>,
    pub focused: bool,
    payload: InteractablePayload,
}

impl Interactable {
    pub fn new(kind: InteractableKind, position: Vec2, payload: InteractablePayload) -> Result<Self, InteractableError> {
        use InteractableKind as K;
        use InteractablePayload as P;

        let label = match (kind, &payload) {
            (K::WeaponCrateClosed, P::CrateGun(_)) => Some("Open Crate".to_string()),
            (K::WeaponCrateOpen, P::None) => None,
            (K::Weapon, P::Gun(gun)) => {
                if gun.handles().is_some() {
                    return Err(InteractableError::GunStillEquipped(gun.name.clone()));
                }
                Some(gun.name.clone())
            }
            (K::HealthSmall, P::Health(_)) => Some("Health".to_string()),
            (K::HealthLarge, P::Health(_)) => Some("Large Health".to_string()),
            _ => {
                return Err(InteractableError::PayloadMismatch { kind, payload: payload.shape() });
            }
        };

        Ok(Self { kind, position, label, focused: false, payload })
    }

    #[inline]
    pub fn hitbox(&self) -> Aabb {
        Aabb::centered(self.position, self.kind.hitbox_size())
    }

    pub fn crate_gun(&self) -> Option<GunKind> {
        match (self.kind, &self.payload) {
            (InteractableKind::WeaponCrateClosed, InteractablePayload::CrateGun(kind)) => Some(*kind),
            _ => None,
        }
    }

    pub fn gun(&self) -> Option<&GunData> {
        match (self.kind, &self.payload) {
            (InteractableKind::Weapon, InteractablePayload::Gun(gun)) => Some(gun),
            _ => None,
        }
    }

    pub fn health_amount(&self) -> Option<i32> {
        match (self.kind, &self.payload) {
            (InteractableKind::HealthSmall | InteractableKind::HealthLarge, InteractablePayload::Health(n)) => Some(*n),
            _ => None,
        }
    }

    /// Move the gun out of a weapon pickup. The pickup is left empty.
    fn take_gun(&mut self) -> Option<GunData> {
        if self.kind != InteractableKind::Weapon {
            return None;
        }
        match std::mem::replace(&mut self.payload, InteractablePayload::None) {
            InteractablePayload::Gun(gun) => Some(gun),
            other => {
                self.payload = other;
                None
            }
        }
    }

    /// Closed crate -> open crate. Returns the gun kind it held.
    fn open_crate(&mut self) -> Option<GunKind> {
        let kind = self.crate_gun()?;
        self.kind = InteractableKind::WeaponCrateOpen;
        self.payload = InteractablePayload::None;
        self.label = None;
        self.focused = false;
        Some(kind)
    }
}

// -----------------------------------------------------------------------------
// Spawning
// -----------------------------------------------------------------------------

/// Validate, then spawn. Nothing is spawned on error.
pub fn create_interactable(
    commands: &mut Commands,
    kind: InteractableKind,
    position: Vec2,
    payload: InteractablePayload,
) -> Result<Entity, InteractableError> {
    let interactable = Interactable::new(kind, position, payload)?;
    let name = interactable.label.clone().unwrap_or_else(|| format!("{kind:?}"));
    Ok(commands
        .spawn((Name::new(name), interactable, DespawnOnExit(GameState::InGame)))
        .id())
}

pub fn spawn_weapon_crate(commands: &mut Commands, gun: GunKind, position: Vec2) -> Result<Entity, InteractableError> {
    create_interactable(commands, InteractableKind::WeaponCrateClosed, position, InteractablePayload::CrateGun(gun))
}

pub fn spawn_weapon(commands: &mut Commands, gun: GunData, position: Vec2) -> Result<Entity, InteractableError> {
    create_interactable(commands, InteractableKind::Weapon, position, InteractablePayload::Gun(gun))
}

/// Spawn a health pickup of a random tier.
///
/// The rolled tier is currently always overridden to the large one.
pub fn spawn_health_pickup(commands: &mut Commands, rng: &mut SimRng, position: Vec2) -> Result<Entity, InteractableError> {
    let rolled = if rng.chance(0.5) { InteractableKind::HealthSmall } else { InteractableKind::HealthLarge };
    if rolled != InteractableKind::HealthLarge {
        debug!("Health pickup rolled {rolled:?}; overriding to HealthLarge");
    }
    create_interactable(
        commands,
        InteractableKind::HealthLarge,
        position,
        InteractablePayload::Health(HEALTH_LARGE_AMOUNT),
    )
}

// -----------------------------------------------------------------------------
// Systems
// -----------------------------------------------------------------------------

pub fn plugin(app: &mut App) {
    app.add_systems(
        FixedUpdate,
        (update_focus, player_interact)
            .chain()
            .after(player::apply_movement)
            .in_set(SimSet::Update)
            .run_if(in_state(GameState::InGame)),
    );
}

/// Focus the first enabled interactable the player stands on; unfocus the rest.
pub fn update_focus(q_player: Query<&Player>, mut q: Query<(Entity, &mut Interactable)>) {
    let player_box = q_player.single().ok().filter(|p| p.is_alive()).map(Player::hitbox);

    let mut items: Vec<_> = q.iter_mut().collect();
    items.sort_unstable_by_key(|(e, _)| *e);

    let mut found = false;
    for (_, mut item) in items {
        let hit = !found
            && item.kind.is_enabled()
            && player_box.is_some_and(|pb| pb.overlaps(&item.hitbox()));
        found |= hit;
        if item.focused != hit {
            item.focused = hit;
        }
    }
}

/// Use the focused interactable on the rising edge of the interact input.
pub fn player_interact(
    mut commands: Commands,
    intent: Res<PlayerIntent>,
    mut registry: ResMut<HandleRegistry>,
    mut q_player: Query<&mut Player>,
    mut q: Query<(Entity, &mut Interactable)>,
) {
    let Ok(mut player) = q_player.single_mut() else {
        return;
    };
    let pressed = intent.interact && !player.interact_latched;
    player.interact_latched = intent.interact;
    if !pressed || !player.is_alive() {
        return;
    }

    let Some((entity, mut item)) = q.iter_mut().find(|(_, i)| i.focused) else {
        return;
    };

    match item.kind {
        InteractableKind::WeaponCrateClosed => {
            let Some(kind) = item.open_crate() else { return };
            let drop_at = item.position + CRATE_DROP_OFFSET;
            if let Err(e) = spawn_weapon(&mut commands, GunData::from_kind(kind, Faction::Player), drop_at) {
                error!("Crate drop failed: {e}");
            }
        }
        InteractableKind::Weapon => {
            let Some(gun) = item.take_gun() else { return };
            let old = player.equip_gun(gun, &mut registry);
            info!("Picked up {}, dropped {}", player.gun.name, old.name);
            commands.entity(entity).despawn();
            if let Err(e) = spawn_weapon(&mut commands, old, player.position) {
                error!("Gun drop failed: {e}");
            }
        }
        InteractableKind::HealthSmall | InteractableKind::HealthLarge => {
            let Some(amount) = item.health_amount() else { return };
            player.heal(amount);
            commands.entity(entity).despawn();
        }
        InteractableKind::WeaponCrateOpen => {}
    }
}

#[cfg(test)]
mod tests;
