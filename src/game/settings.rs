//! Player-adjustable mod settings
//!
//! Only two knobs exist: a damage multiplier and a movement speed tier. The
//! active value is handed to every bot decision explicitly.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::game::constants::{movement, settings};

/// Settings parse/validation error
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SettingsError {
    #[error("Unknown movement speed '{0}' (expected standard, fast or veryfast)")]
    UnknownSpeed(String),
    #[error("Damage multiplier must be a finite number, got {0}")]
    InvalidDamage(f32),
}

/// Bot movement speed tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MovementSpeed {
    #[default]
    Standard,
    Fast,
    VeryFast,
}

impl MovementSpeed {
    pub fn multiplier(&self) -> f32 {
        match self {
            MovementSpeed::Standard => movement::STANDARD_MULTIPLIER,
            MovementSpeed::Fast => movement::FAST_MULTIPLIER,
            MovementSpeed::VeryFast => movement::VERY_FAST_MULTIPLIER,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MovementSpeed::Standard => "Standard",
            MovementSpeed::Fast => "Fast",
            MovementSpeed::VeryFast => "Very Fast",
        }
    }
}

impl fmt::Display for MovementSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for MovementSpeed {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();

        match normalized.as_str() {
            "standard" => Ok(MovementSpeed::Standard),
            "fast" => Ok(MovementSpeed::Fast),
            "veryfast" => Ok(MovementSpeed::VeryFast),
            _ => Err(SettingsError::UnknownSpeed(s.to_string())),
        }
    }
}

/// Active mod settings. Deserializing goes through the same clamp as `new`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawModSettings")]
pub struct ModSettings {
    /// Outgoing bot damage multiplier, within [1, 5]
    damage_multiplier: f32,
    movement_speed: MovementSpeed,
}

/// Unchecked wire form of `ModSettings`
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawModSettings {
    damage_multiplier: f32,
    #[serde(default)]
    movement_speed: MovementSpeed,
}

impl TryFrom<RawModSettings> for ModSettings {
    type Error = SettingsError;

    fn try_from(raw: RawModSettings) -> Result<Self, Self::Error> {
        Self::new(raw.damage_multiplier, raw.movement_speed)
    }
}

impl Default for ModSettings {
    fn default() -> Self {
        Self {
            damage_multiplier: settings::MIN_DAMAGE_MULTIPLIER,
            movement_speed: MovementSpeed::Standard,
        }
    }
}

impl ModSettings {
    /// Build settings, clamping the multiplier into its slider range
    pub fn new(damage_multiplier: f32, movement_speed: MovementSpeed) -> Result<Self, SettingsError> {
        Ok(Self {
            damage_multiplier: clamp_damage_multiplier(damage_multiplier)?,
            movement_speed,
        })
    }

    pub fn damage_multiplier(&self) -> f32 {
        self.damage_multiplier
    }

    pub fn movement_speed(&self) -> MovementSpeed {
        self.movement_speed
    }

    /// Copy with a different damage multiplier (clamped)
    pub fn with_damage_multiplier(self, damage_multiplier: f32) -> Result<Self, SettingsError> {
        Self::new(damage_multiplier, self.movement_speed)
    }

    pub fn with_movement_speed(self, movement_speed: MovementSpeed) -> Self {
        Self {
            movement_speed,
            ..self
        }
    }

    /// Bot speed in units per tick for the current tier
    pub fn bot_speed(&self) -> f32 {
        crate::game::constants::bot_speed(self.movement_speed.multiplier())
    }
}

fn clamp_damage_multiplier(value: f32) -> Result<f32, SettingsError> {
    if !value.is_finite() {
        return Err(SettingsError::InvalidDamage(value));
    }
    Ok(value.clamp(settings::MIN_DAMAGE_MULTIPLIER, settings::MAX_DAMAGE_MULTIPLIER))
}
