//! Line-based control commands
//!
//! Mirrors the in-game options panel: a damage slider, a speed selector and
//! the pause/reset buttons, driven from plain text.

use std::str::FromStr;

use tracing::info;

use crate::game::game_loop::Simulation;
use crate::game::settings::{MovementSpeed, SettingsError};

/// Control command parse error
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ControlError {
    #[error("Empty command")]
    Empty,
    #[error("Unknown command '{0}' (try damage, speed, pause, resume, reset, status, quit)")]
    Unknown(String),
    #[error("Command '{0}' needs an argument")]
    MissingArgument(&'static str),
    #[error("Invalid argument '{value}' for '{command}'")]
    InvalidArgument { command: &'static str, value: String },
    #[error(transparent)]
    Settings(#[from] SettingsError),
}

/// A single operator command
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlCommand {
    /// Set the damage multiplier (clamped to the slider range)
    SetDamage(f32),
    SetSpeed(MovementSpeed),
    Pause,
    Resume,
    Reset,
    /// Log the current status line
    Status,
    Quit,
}

/// What the driver should do after a command was applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlEffect {
    Continue,
    ShowStatus,
    Quit,
}

impl ControlCommand {
    pub fn parse(line: &str) -> Result<Self, ControlError> {
        let mut parts = line.split_whitespace();
        let Some(name) = parts.next() else {
            return Err(ControlError::Empty);
        };
        let rest = parts.collect::<Vec<_>>().join(" ");

        match name.to_ascii_lowercase().as_str() {
            "damage" | "dmg" => {
                if rest.is_empty() {
                    return Err(ControlError::MissingArgument("damage"));
                }
                let value = rest.parse::<f32>().map_err(|_| ControlError::InvalidArgument {
                    command: "damage",
                    value: rest.clone(),
                })?;
                if !value.is_finite() {
                    return Err(SettingsError::InvalidDamage(value).into());
                }
                Ok(ControlCommand::SetDamage(value))
            }
            "speed" => {
                if rest.is_empty() {
                    return Err(ControlError::MissingArgument("speed"));
                }
                Ok(ControlCommand::SetSpeed(rest.parse()?))
            }
            "pause" => Ok(ControlCommand::Pause),
            "resume" => Ok(ControlCommand::Resume),
            "reset" => Ok(ControlCommand::Reset),
            "status" => Ok(ControlCommand::Status),
            "quit" | "exit" => Ok(ControlCommand::Quit),
            _ => Err(ControlError::Unknown(name.to_string())),
        }
    }

    /// Apply this command to a running simulation
    pub fn apply(self, sim: &mut Simulation) -> Result<ControlEffect, ControlError> {
        match self {
            ControlCommand::SetDamage(value) => {
                let settings = sim.settings().with_damage_multiplier(value)?;
                sim.update_settings(settings);
            }
            ControlCommand::SetSpeed(speed) => {
                let settings = sim.settings().with_movement_speed(speed);
                sim.update_settings(settings);
            }
            ControlCommand::Pause => sim.pause(),
            ControlCommand::Resume => sim.resume(),
            ControlCommand::Reset => sim.reset(),
            ControlCommand::Status => return Ok(ControlEffect::ShowStatus),
            ControlCommand::Quit => {
                info!("Quit requested");
                return Ok(ControlEffect::Quit);
            }
        }
        Ok(ControlEffect::Continue)
    }
}

impl FromStr for ControlCommand {
    type Err = ControlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
