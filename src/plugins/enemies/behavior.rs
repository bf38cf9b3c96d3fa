//! The per-variant behaviour table.
//!
//! Each variant is a config type implementing `EnemyBehavior`. `EnemyConfig`
//! is the closed set of them; its methods dispatch on the tag.
//!
//! Lifecycle: `start` builds the config, `update` runs once per frame, `render`
//! is read-only, and `on_death` consumes the config. Because `on_death` takes
//! `self` by value a config cannot be released twice.

use bevy::prelude::*;

use crate::common::geometry::{line_of_sight, Aabb};
use crate::common::rng::SimRng;
use crate::plugins::combat::events::{CombatEvent, FrameEvents};
use crate::plugins::combat::messages::CombatRequest;
use crate::plugins::presentation::visual::EnemyVisual;
use crate::plugins::projectiles::messages::SpawnBulletRequest;
use crate::plugins::weapons::{GunData, HandleRegistry, Shot};

use super::error::SpawnError;
use super::presets::{EnemyPreset, EnemyVariant};
use super::record::EnemyBody;
use super::variants::{
    echo::EchoConfig, juggernaut::JuggernautConfig, kamikaze::KamikazeConfig, libet::LibetConfig,
    proxy::ProxyConfig, radius::RadiusConfig, recharge::RechargeConfig, sabot::SabotConfig,
    sentry::SentryConfig, tactician::TacticianConfig, vantage::VantageConfig,
};

// ----- Contexts -----

pub struct StartContext<'a> {
    pub variant: EnemyVariant,
    pub position: Vec2,
    pub preset: &'a EnemyPreset,
    pub handles: &'a mut HandleRegistry,
    pub rng: &'a mut SimRng,
}

/// Read-only copy of the player taken before any enemy updates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerView {
    pub entity: Entity,
    pub position: Vec2,
    pub velocity: Vec2,
    pub hitbox: Aabb,
    pub alive: bool,
}

/// Read-only copy of another enemy taken before any enemy updates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AllyView {
    pub entity: Entity,
    pub variant: EnemyVariant,
    pub position: Vec2,
    pub health: i32,
    pub max_health: i32,
}

/// Everything an update wants done outside its own record.
#[derive(Debug, Default)]
pub struct FrameOutput {
    pub bullets: Vec<SpawnBulletRequest>,
    pub requests: Vec<CombatRequest>,
    pub events: Vec<CombatEvent>,
}

impl FrameOutput {
    pub fn clear(&mut self) {
        self.bullets.clear();
        self.requests.clear();
        self.events.clear();
    }
}

pub struct FrameContext<'a> {
    /// Behaviour clock step, already scaled by any command buff.
    pub dt: f32,
    pub entity: Entity,
    pub player: Option<PlayerView>,
    /// Every other live enemy.
    pub allies: &'a [AllyView],
    pub walls: &'a [Aabb],
    pub rng: &'a mut SimRng,
    pub out: &'a mut FrameOutput,
}

impl FrameContext<'_> {
    /// The player, if alive.
    pub fn target(&self) -> Option<PlayerView> {
        self.player.filter(|p| p.alive)
    }

    pub fn can_see(&self, from: Vec2, to: Vec2) -> bool {
        line_of_sight(from, to, self.walls)
    }

    pub fn request(&mut self, request: CombatRequest) {
        self.out.requests.push(request);
    }

    pub fn emit(&mut self, event: CombatEvent) {
        self.out.events.push(event);
    }

    /// Fire `gun` through the shared entry point. Returns true if it fired.
    pub fn fire(&mut self, gun: &mut GunData, origin: Vec2, shot: Shot) -> bool {
        let Some(requests) = gun.fire(origin, shot, self.rng, Some(self.entity)) else {
            return false;
        };
        let direction = match shot {
            Shot::Aimed(dir) => dir.normalize_or_zero(),
            Shot::Ring { .. } => Vec2::ZERO,
        };
        self.out.events.push(CombatEvent::Fired { faction: gun.owner, origin, direction });
        self.out.bullets.extend(requests);
        true
    }
}

pub struct DeathContext<'a> {
    pub entity: Entity,
    pub handles: &'a mut HandleRegistry,
    pub events: &'a mut FrameEvents,
}

// ----- Behaviour -----

pub trait EnemyBehavior: Sized {
    fn start(ctx: &mut StartContext) -> Result<Self, SpawnError>;

    fn update(&mut self, body: &mut EnemyBody, ctx: &mut FrameContext);

    fn render(&self, body: &EnemyBody) -> EnemyVisual;

    /// Release owned resources. Runs exactly once, in the death phase.
    fn on_death(self, _body: &EnemyBody, _ctx: &mut DeathContext) {}

    /// Adjust incoming damage before it reaches health.
    fn on_damaged(&mut self, _body: &EnemyBody, amount: i32) -> i32 {
        amount
    }
}

#[derive(Debug)]
pub enum EnemyConfig {
    Kamikaze(KamikazeConfig),
    Proxy(ProxyConfig),
    Recharge(RechargeConfig),
    Sentry(SentryConfig),
    Tactician(TacticianConfig),
    Vantage(VantageConfig),
    Sabot(SabotConfig),
    Radius(RadiusConfig),
    Juggernaut(JuggernautConfig),
    Echo(EchoConfig),
    Libet(LibetConfig),
}

macro_rules! dispatch {
    ($value:expr, $cfg:ident => $body:expr) => {
        match $value {
            EnemyConfig::Kamikaze($cfg) => $body,
            EnemyConfig::Proxy($cfg) => $body,
            EnemyConfig::Recharge($cfg) => $body,
            EnemyConfig::Sentry($cfg) => $body,
            EnemyConfig::Tactician($cfg) => $body,
            EnemyConfig::Vantage($cfg) => $body,
            EnemyConfig::Sabot($cfg) => $body,
            EnemyConfig::Radius($cfg) => $body,
            EnemyConfig::Juggernaut($cfg) => $body,
            EnemyConfig::Echo($cfg) => $body,
            EnemyConfig::Libet($cfg) => $body,
        }
    };
}

impl EnemyConfig {
    pub fn start(ctx: &mut StartContext) -> Result<Self, SpawnError> {
        Ok(match ctx.variant {
            EnemyVariant::Kamikaze => Self::Kamikaze(KamikazeConfig::start(ctx)?),
            EnemyVariant::Proxy => Self::Proxy(ProxyConfig::start(ctx)?),
            EnemyVariant::Recharge => Self::Recharge(RechargeConfig::start(ctx)?),
            EnemyVariant::Sentry => Self::Sentry(SentryConfig::start(ctx)?),
            EnemyVariant::Tactician => Self::Tactician(TacticianConfig::start(ctx)?),
            EnemyVariant::Vantage => Self::Vantage(VantageConfig::start(ctx)?),
            EnemyVariant::Sabot => Self::Sabot(SabotConfig::start(ctx)?),
            EnemyVariant::Radius => Self::Radius(RadiusConfig::start(ctx)?),
            EnemyVariant::Juggernaut => Self::Juggernaut(JuggernautConfig::start(ctx)?),
            EnemyVariant::Echo => Self::Echo(EchoConfig::start(ctx)?),
            EnemyVariant::Libet => Self::Libet(LibetConfig::start(ctx)?),
        })
    }

    pub fn variant(&self) -> EnemyVariant {
        match self {
            Self::Kamikaze(_) => EnemyVariant::Kamikaze,
            Self::Proxy(_) => EnemyVariant::Proxy,
            Self::Recharge(_) => EnemyVariant::Recharge,
            Self::Sentry(_) => EnemyVariant::Sentry,
            Self::Tactician(_) => EnemyVariant::Tactician,
            Self::Vantage(_) => EnemyVariant::Vantage,
            Self::Sabot(_) => EnemyVariant::Sabot,
            Self::Radius(_) => EnemyVariant::Radius,
            Self::Juggernaut(_) => EnemyVariant::Juggernaut,
            Self::Echo(_) => EnemyVariant::Echo,
            Self::Libet(_) => EnemyVariant::Libet,
        }
    }

    pub fn update(&mut self, body: &mut EnemyBody, ctx: &mut FrameContext) {
        dispatch!(self, cfg => cfg.update(body, ctx))
    }

    pub fn render(&self, body: &EnemyBody) -> EnemyVisual {
        dispatch!(self, cfg => cfg.render(body))
    }

    pub fn on_death(self, body: &EnemyBody, ctx: &mut DeathContext) {
        dispatch!(self, cfg => cfg.on_death(body, ctx))
    }

    pub fn on_damaged(&mut self, body: &EnemyBody, amount: i32) -> i32 {
        dispatch!(self, cfg => cfg.on_damaged(body, amount))
    }

    /// The gun this variant carries, if any.
    pub fn gun(&self) -> Option<&GunData> {
        match self {
            Self::Kamikaze(_) | Self::Recharge(_) | Self::Radius(_) => None,
            Self::Proxy(c) => Some(&c.gun),
            Self::Sentry(c) => Some(&c.gun),
            Self::Tactician(c) => Some(&c.gun),
            Self::Vantage(c) => Some(&c.gun),
            Self::Sabot(c) => Some(&c.gun),
            Self::Juggernaut(c) => Some(&c.gun),
            Self::Echo(c) => Some(&c.gun),
            Self::Libet(c) => Some(&c.gun),
        }
    }
}
