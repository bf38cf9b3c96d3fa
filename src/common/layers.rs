//! Collision layers and factions.
//!
//! A `Faction` says who fired or who owns an entity; a `LayerMask` says which
//! surfaces a bullet is tested against.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Faction {
    Player,
    Enemy,
}

impl Faction {
    /// Surfaces a bullet of this faction can hit.
    pub fn bullet_targets(self) -> LayerMask {
        match self {
            Faction::Player => LayerMask::EMPTY.with(Layer::World).with(Layer::Enemy),
            Faction::Enemy => LayerMask::EMPTY.with(Layer::World).with(Layer::Player),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Layer {
    World,
    Player,
    Enemy,
}

impl Layer {
    #[inline]
    const fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LayerMask(u8);

impl LayerMask {
    pub const EMPTY: Self = Self(0);

    pub const fn with(self, layer: Layer) -> Self {
        Self(self.0 | layer.bit())
    }

    #[inline]
    pub const fn contains(self, layer: Layer) -> bool {
        self.0 & layer.bit() != 0
    }
}
