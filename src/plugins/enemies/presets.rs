//! Enemy presets: base stats and guns per variant.
//!
//! Built-in defaults cover every variant. A RON file can override any subset
//! of them at startup:
//!
//! ```ron
//! {
//!     Sentry: (
//!         stats: (max_health: 90, contact_damage: 35, max_speed: 0.0, acceleration: 0.0, drag: 0.0, hitbox: (20.0, 20.0)),
//!         gun: Some((fire_rate: 200.0, spread_angle: 0.5, damage: 35, fire_mode: Auto, bullet_speed: 600.0,
//!                    bullet_lifetime: 1.5, bullets_per_shot: 1, ammo_capacity: 8, ammo_consumption: 1, reload_time: 2.0)),
//!     ),
//! }
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::plugins::weapons::{FireMode, GunStats};

use super::error::DataLoadError;

pub const PRESETS_PATH: &str = "assets/data/enemy_presets.ron";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EnemyVariant {
    Kamikaze,
    Proxy,
    Recharge,
    Sentry,
    Tactician,
    Vantage,
    Sabot,
    Radius,
    Juggernaut,
    Echo,
    /// Boss.
    Libet,
}

impl EnemyVariant {
    pub const ALL: [EnemyVariant; 11] = [
        EnemyVariant::Kamikaze,
        EnemyVariant::Proxy,
        EnemyVariant::Recharge,
        EnemyVariant::Sentry,
        EnemyVariant::Tactician,
        EnemyVariant::Vantage,
        EnemyVariant::Sabot,
        EnemyVariant::Radius,
        EnemyVariant::Juggernaut,
        EnemyVariant::Echo,
        EnemyVariant::Libet,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EnemyVariant::Kamikaze => "Kamikaze",
            EnemyVariant::Proxy => "Proxy",
            EnemyVariant::Recharge => "Recharge",
            EnemyVariant::Sentry => "Sentry",
            EnemyVariant::Tactician => "Tactician",
            EnemyVariant::Vantage => "Vantage",
            EnemyVariant::Sabot => "Sabot",
            EnemyVariant::Radius => "Radius",
            EnemyVariant::Juggernaut => "Juggernaut",
            EnemyVariant::Echo => "Echo",
            EnemyVariant::Libet => "Libet",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemyStats {
    pub max_health: i32,
    pub contact_damage: i32,
    pub max_speed: f32,
    pub acceleration: f32,
    pub drag: f32,
    pub hitbox: (f32, f32),
}

impl EnemyStats {
    #[inline]
    pub fn hitbox_size(&self) -> Vec2 {
        Vec2::new(self.hitbox.0, self.hitbox.1)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemyPreset {
    pub stats: EnemyStats,
    #[serde(default)]
    pub gun: Option<GunStats>,
}

#[derive(Resource, Clone, Debug)]
pub struct EnemyPresets {
    presets: HashMap<EnemyVariant, EnemyPreset>,
}

impl EnemyPresets {
    pub fn get(&self, variant: EnemyVariant) -> Option<&EnemyPreset> {
        self.presets.get(&variant)
    }

    pub fn insert(&mut self, variant: EnemyVariant, preset: EnemyPreset) {
        self.presets.insert(variant, preset);
    }

    pub fn remove(&mut self, variant: EnemyVariant) -> Option<EnemyPreset> {
        self.presets.remove(&variant)
    }

    /// Overlay the entries in `contents` on top of the current presets.
    /// Returns how many variants were overridden.
    pub fn merge_ron(&mut self, contents: &str, path: &str) -> Result<usize, DataLoadError> {
        let overrides: HashMap<EnemyVariant, EnemyPreset> =
            ron::from_str(contents).map_err(|e| DataLoadError::ParseError {
                path: path.to_string(),
                details: e.to_string(),
            })?;
        let n = overrides.len();
        self.presets.extend(overrides);
        Ok(n)
    }

    pub fn merge_file(&mut self, path: &Path) -> Result<usize, DataLoadError> {
        let display = path.display().to_string();
        if !path.exists() {
            return Err(DataLoadError::FileNotFound(display));
        }
        let contents = fs::read_to_string(path).map_err(|e| DataLoadError::ReadError {
            path: display.clone(),
            details: e.to_string(),
        })?;
        self.merge_ron(&contents, &display)
    }
}

fn stats(max_health: i32, contact_damage: i32, max_speed: f32, acceleration: f32, drag: f32, hitbox: (f32, f32)) -> EnemyStats {
    EnemyStats { max_health, contact_damage, max_speed, acceleration, drag, hitbox }
}

#[allow(clippy::too_many_arguments)]
fn gun(
    fire_rate: f32,
    spread_angle: f32,
    damage: i32,
    bullet_speed: f32,
    bullet_lifetime: f32,
    bullets_per_shot: u32,
    ammo_capacity: u32,
    reload_time: f32,
) -> Option<GunStats> {
    Some(GunStats {
        fire_rate,
        spread_angle,
        damage,
        fire_mode: FireMode::Auto,
        bullet_speed,
        bullet_lifetime,
        bullets_per_shot,
        ammo_capacity,
        ammo_consumption: 1,
        reload_time,
    })
}

impl Default for EnemyPresets {
    fn default() -> Self {
        use EnemyVariant::*;

        let table = [
            (Kamikaze, stats(100, 10, 100.0, 500.0, 5.0, (15.0, 15.0)), None),
            (Proxy, stats(80, 15, 120.0, 450.0, 4.0, (25.0, 25.0)), gun(90.0, 6.0, 10, 380.0, 1.2, 1, 6, 1.5)),
            (Recharge, stats(100, 10, 150.0, 500.0, 5.0, (20.0, 20.0)), None),
            (Sentry, stats(75, 35, 0.0, 0.0, 0.0, (20.0, 20.0)), gun(200.0, 0.5, 35, 600.0, 1.5, 1, 8, 2.0)),
            (Tactician, stats(90, 8, 90.0, 350.0, 4.0, (24.0, 24.0)), gun(150.0, 8.0, 8, 420.0, 1.0, 1, 12, 1.5)),
            (Vantage, stats(45, 30, 80.0, 300.0, 5.0, (26.0, 26.0)), gun(40.0, 0.0, 30, 700.0, 1.5, 1, 4, 2.5)),
            (Sabot, stats(60, 25, 140.0, 600.0, 3.0, (28.0, 28.0)), gun(300.0, 20.0, 6, 450.0, 0.5, 4, 8, 1.2)),
            (Radius, stats(85, 20, 85.0, 420.0, 4.5, (30.0, 30.0)), None),
            (Juggernaut, stats(200, 35, 60.0, 250.0, 8.0, (40.0, 40.0)), gun(450.0, 12.0, 7, 400.0, 1.0, 1, 30, 3.0)),
            (Echo, stats(100, 0, 100.0, 500.0, 5.0, (20.0, 32.0)), gun(120.0, 4.0, 8, 400.0, 1.2, 1, 10, 1.5)),
            (Libet, stats(10_000, 20, 80.0, 300.0, 5.0, (40.0, 40.0)), gun(600.0, 0.0, 12, 300.0, 3.0, 1, 1_000, 0.5)),
        ];

        Self {
            presets: table
                .into_iter()
                .map(|(variant, stats, gun)| (variant, EnemyPreset { stats, gun }))
                .collect(),
        }
    }
}

/// Startup: overlay presets from disk, keeping built-ins on any failure.
pub fn load_enemy_presets(mut presets: ResMut<EnemyPresets>) {
    match presets.merge_file(Path::new(PRESETS_PATH)) {
        Ok(n) => info!("Loaded {n} enemy preset override(s) from {PRESETS_PATH}"),
        Err(DataLoadError::FileNotFound(path)) => {
            warn!("Enemy preset file not found: {path}; using built-in presets");
        }
        Err(e) => warn!("{e}; using built-in presets"),
    }
}
