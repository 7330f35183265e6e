use std::time::Duration;

use crate::game::constants::{arena, tick};
use crate::game::settings::{ModSettings, MovementSpeed};
use crate::game::state::Arena;

/// Smallest arena edge that still leaves room inside the cover margin
const MIN_ARENA_EXTENT: f32 = arena::COVER_MARGIN * 2.0;

/// Configuration validation error
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("Arena must be larger than {min}x{min}, got {width}x{height}")]
    ArenaTooSmall { width: f32, height: f32, min: f32 },
    #[error("Tick interval cannot be 0")]
    ZeroTickInterval,
    #[error("Status interval cannot be 0")]
    ZeroStatusInterval,
}

/// Headless simulation configuration
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Arena width in world units
    pub arena_width: f32,
    /// Arena height in world units
    pub arena_height: f32,
    /// Wall-clock time between ticks
    pub tick_interval_ms: u64,
    /// Stop after this many ticks (runs until interrupted if unset)
    pub max_ticks: Option<u64>,
    /// Ticks between status log lines
    pub status_interval_ticks: u64,
    /// Seed for wave spawning (random if unset)
    pub rng_seed: Option<u64>,
    /// Initial mod settings
    pub settings: ModSettings,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            arena_width: arena::DEFAULT_WIDTH,
            arena_height: arena::DEFAULT_HEIGHT,
            tick_interval_ms: tick::DURATION_MS,
            max_ticks: None,
            status_interval_ticks: 60,
            rng_seed: None,
            settings: ModSettings::default(),
        }
    }
}

impl SimulationConfig {
    /// Load config from environment or use defaults
    pub fn load_or_default() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load config from an arbitrary key lookup, falling back per key
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(width) = lookup("ARENA_WIDTH") {
            match width.parse::<f32>() {
                Ok(parsed) if parsed.is_finite() && parsed > MIN_ARENA_EXTENT => config.arena_width = parsed,
                _ => tracing::warn!("Invalid ARENA_WIDTH '{}', using default", width),
            }
        }

        if let Some(height) = lookup("ARENA_HEIGHT") {
            match height.parse::<f32>() {
                Ok(parsed) if parsed.is_finite() && parsed > MIN_ARENA_EXTENT => config.arena_height = parsed,
                _ => tracing::warn!("Invalid ARENA_HEIGHT '{}', using default", height),
            }
        }

        if let Some(interval) = lookup("TICK_INTERVAL_MS") {
            if let Ok(parsed) = interval.parse::<u64>() {
                if parsed > 0 {
                    config.tick_interval_ms = parsed;
                } else {
                    tracing::warn!("TICK_INTERVAL_MS must be > 0, using default");
                }
            } else {
                tracing::warn!("Invalid TICK_INTERVAL_MS '{}', using default", interval);
            }
        }

        if let Some(max_ticks) = lookup("MAX_TICKS") {
            if let Ok(parsed) = max_ticks.parse::<u64>() {
                config.max_ticks = Some(parsed);
            } else {
                tracing::warn!("Invalid MAX_TICKS '{}', running until interrupted", max_ticks);
            }
        }

        if let Some(status) = lookup("STATUS_INTERVAL") {
            match status.parse::<u64>() {
                Ok(parsed) if parsed > 0 => config.status_interval_ticks = parsed,
                _ => tracing::warn!("Invalid STATUS_INTERVAL '{}', using default", status),
            }
        }

        if let Some(seed) = lookup("RNG_SEED") {
            if let Ok(parsed) = seed.parse::<u64>() {
                config.rng_seed = Some(parsed);
            } else {
                tracing::warn!("Invalid RNG_SEED '{}', using a random seed", seed);
            }
        }

        if let Some(damage) = lookup("DAMAGE_MULTIPLIER") {
            match damage.parse::<f32>().ok().map(|d| config.settings.with_damage_multiplier(d)) {
                Some(Ok(settings)) => config.settings = settings,
                _ => tracing::warn!("Invalid DAMAGE_MULTIPLIER '{}', using default", damage),
            }
        }

        if let Some(speed) = lookup("MOVEMENT_SPEED") {
            match speed.parse::<MovementSpeed>() {
                Ok(parsed) => config.settings = config.settings.with_movement_speed(parsed),
                Err(e) => tracing::warn!("{}, using default", e),
            }
        }

        config
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.arena_width > MIN_ARENA_EXTENT && self.arena_height > MIN_ARENA_EXTENT) {
            return Err(ConfigError::ArenaTooSmall {
                width: self.arena_width,
                height: self.arena_height,
                min: MIN_ARENA_EXTENT,
            });
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }
        if self.status_interval_ticks == 0 {
            return Err(ConfigError::ZeroStatusInterval);
        }
        Ok(())
    }

    pub fn arena(&self) -> Arena {
        Arena::new(self.arena_width, self.arena_height)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}
