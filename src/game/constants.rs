/// Simulation clock. Time units are milliseconds.
pub mod tick {
    /// Time advanced per tick (~60 Hz)
    pub const DURATION_MS: u64 = 16;
}

/// Default arena layout
pub mod arena {
    pub const DEFAULT_WIDTH: f32 = 800.0;
    pub const DEFAULT_HEIGHT: f32 = 600.0;
    /// Bots stay at least this far inside every edge
    pub const BOT_MARGIN: f32 = 10.0;
    /// Cover points stay at least this far inside every edge
    pub const COVER_MARGIN: f32 = 20.0;
    /// Enemies spawn this far inside the chosen edge
    pub const SPAWN_INSET: f32 = 20.0;
}

/// Bot decision thresholds
pub mod ai {
    /// Enemies closer than this to the player are top-priority targets
    pub const THREAT_RADIUS: f32 = 150.0;
    /// Enemies below this fraction of max health are second-priority targets
    pub const LOW_HEALTH_FRACTION: f32 = 0.3;
    /// Beyond this distance to its target a bot closes in
    pub const ATTACK_RANGE: f32 = 200.0;
    /// Attack range multiplier while retreating to cover
    pub const COVER_ATTACK_RANGE_FACTOR: f32 = 1.5;
    /// Without a target, bots idle inside this distance to the player
    pub const FOLLOW_RADIUS: f32 = 150.0;
    /// With a target, bots drop everything beyond this distance to the player
    pub const LEASH_RADIUS: f32 = 400.0;
    /// Speed bonus when snapping back to the player
    pub const CATCH_UP_FACTOR: f32 = 1.2;
}

/// Cover seeking
pub mod cover {
    /// Bots below this fraction of max health retreat
    pub const HEALTH_FRACTION: f32 = 0.4;
    /// Distance of the retreat point from the bot, away from its target
    pub const DISTANCE: f32 = 80.0;
}

/// Movement speeds in units per tick
pub mod movement {
    pub const BASE_SPEED: f32 = 2.0;
    pub const STANDARD_MULTIPLIER: f32 = 1.0;
    pub const FAST_MULTIPLIER: f32 = 1.5;
    pub const VERY_FAST_MULTIPLIER: f32 = 2.5;
    /// Enemies walk straight at the player at this speed
    pub const ENEMY_SPEED: f32 = 1.2;
}

/// Bot self-buff
pub mod ability {
    /// Time between activations
    pub const COOLDOWN_MS: u64 = 5000;
    /// How long the damage bonus lasts after activation
    pub const ACTIVE_MS: u64 = 2000;
    pub const DAMAGE_BONUS: f32 = 1.5;
}

/// Combat resolution
pub mod combat {
    /// Damage per tick a bot deals to its target before multipliers
    pub const BOT_BASE_DAMAGE: f32 = 0.3;
    /// Enemies hurt anything within this distance
    pub const CONTACT_RANGE: f32 = 30.0;
    pub const ENEMY_DAMAGE_TO_PLAYER: f32 = 0.1;
    pub const ENEMY_DAMAGE_TO_BOT: f32 = 0.08;
    /// Health regained per tick by bots out of combat
    pub const BOT_REGEN: f32 = 0.05;
}

/// Player-adjustable settings bounds
pub mod settings {
    pub const MIN_DAMAGE_MULTIPLIER: f32 = 1.0;
    pub const MAX_DAMAGE_MULTIPLIER: f32 = 5.0;
}

/// Starting roster
pub mod roster {
    pub const PLAYER_HEALTH: f32 = 100.0;
    pub const BOT_HEALTH: f32 = 80.0;
    /// Bot spawn offsets relative to the arena centre
    pub const BOT_OFFSETS: [(f32, f32); 3] = [(-50.0, 50.0), (50.0, 50.0), (0.0, 80.0)];
}

/// Enemy waves
pub mod waves {
    pub const BASE_COUNT: usize = 3;
    pub const COUNT_PER_WAVE: usize = 2;
    pub const MAX_COUNT: usize = 15;
    pub const BASE_HEALTH: f32 = 50.0;
    pub const HEALTH_PER_WAVE: f32 = 10.0;
}

/// Movement speed for a tier multiplier
#[inline]
pub fn bot_speed(tier_multiplier: f32) -> f32 {
    movement::BASE_SPEED * tier_multiplier
}

/// Number of enemies in wave `wave` (1-based)
pub fn wave_enemy_count(wave: u32) -> usize {
    let grown = waves::BASE_COUNT + waves::COUNT_PER_WAVE * wave as usize;
    grown.min(waves::MAX_COUNT)
}

/// Health of each enemy in wave `wave`
#[inline]
pub fn wave_enemy_health(wave: u32) -> f32 {
    waves::BASE_HEALTH + waves::HEALTH_PER_WAVE * wave as f32
}
