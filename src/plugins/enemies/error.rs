//! Error types for enemy construction, release and preset loading.

use bevy::prelude::*;
use thiserror::Error;

use super::presets::EnemyVariant;

/// Start refused to build a record. No entity is created.
#[derive(Debug, Error, PartialEq)]
pub enum SpawnError {
    #[error("No preset registered for {0:?}")]
    MissingPreset(EnemyVariant),

    #[error("{0:?} needs a gun but its preset has none")]
    MissingGun(EnemyVariant),

    #[error("{variant:?} gun is unusable: {reason}")]
    InvalidGun { variant: EnemyVariant, reason: &'static str },

    #[error("{variant:?} preset has non-positive max health {max_health}")]
    InvalidHealth { variant: EnemyVariant, max_health: i32 },

    #[error("{variant:?} spawn position is not finite: {position}")]
    InvalidPosition { variant: EnemyVariant, position: Vec2 },
}

/// OnDeath was requested for a record whose config is already gone.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReleaseError {
    #[error("Enemy config already released")]
    AlreadyReleased,
}

/// Errors that can occur when loading enemy preset data.
#[derive(Debug, Error)]
pub enum DataLoadError {
    /// File could not be found.
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// File could not be read.
    #[error("Failed to read file '{path}': {details}")]
    ReadError { path: String, details: String },

    /// RON parsing failed.
    #[error("Parse error in '{path}': {details}")]
    ParseError { path: String, details: String },
}
