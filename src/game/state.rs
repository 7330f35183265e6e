//! Game state definitions and structures
//!
//! Contains the entities (player, bots, enemies), the arena rectangle and the
//! aggregate state the tick driver rebuilds on reset.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::game::constants::{arena, roster};
use crate::util::vec2::Vec2;

/// Unique entity identifier
pub type EntityId = String;

/// Which side an entity fights for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Team {
    Player,
    Enemy,
}

/// Concrete entity type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Player,
    Bot,
    Enemy,
}

/// Capabilities shared by everything on the field.
///
/// Health is kept in `[0, max_health]` by the combat resolver, but callers
/// must tolerate a transiently negative value between damage and removal.
pub trait Entity {
    fn id(&self) -> &str;
    fn position(&self) -> Vec2;
    fn health(&self) -> f32;
    fn max_health(&self) -> f32;
    fn team(&self) -> Team;
    fn kind(&self) -> EntityKind;

    fn is_alive(&self) -> bool {
        self.health() > 0.0
    }

    /// True when health is strictly below `fraction` of max health
    fn is_below_health_fraction(&self, fraction: f32) -> bool {
        self.health() < self.max_health() * fraction
    }
}

/// The human-controlled point the bots protect
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: EntityId,
    pub position: Vec2,
    pub health: f32,
    pub max_health: f32,
}

impl Player {
    pub fn new(id: impl Into<EntityId>, position: Vec2) -> Self {
        Self {
            id: id.into(),
            position,
            health: roster::PLAYER_HEALTH,
            max_health: roster::PLAYER_HEALTH,
        }
    }
}

impl Entity for Player {
    fn id(&self) -> &str {
        &self.id
    }
    fn position(&self) -> Vec2 {
        self.position
    }
    fn health(&self) -> f32 {
        self.health
    }
    fn max_health(&self) -> f32 {
        self.max_health
    }
    fn team(&self) -> Team {
        Team::Player
    }
    fn kind(&self) -> EntityKind {
        EntityKind::Player
    }
}

/// Hostile unit created by the wave spawner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: EntityId,
    pub position: Vec2,
    pub velocity: Vec2,
    pub health: f32,
    pub max_health: f32,
}

impl Enemy {
    pub fn new(id: impl Into<EntityId>, position: Vec2, health: f32) -> Self {
        Self {
            id: id.into(),
            position,
            velocity: Vec2::ZERO,
            health,
            max_health: health,
        }
    }
}

impl Entity for Enemy {
    fn id(&self) -> &str {
        &self.id
    }
    fn position(&self) -> Vec2 {
        self.position
    }
    fn health(&self) -> f32 {
        self.health
    }
    fn max_health(&self) -> f32 {
        self.max_health
    }
    fn team(&self) -> Team {
        Team::Enemy
    }
    fn kind(&self) -> EntityKind {
        EntityKind::Enemy
    }
}

/// Bot behaviour state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BotState {
    /// Near the player with nothing to fight
    #[default]
    Idle,
    /// Closing in on a target
    Moving,
    /// In range of a target
    Attacking,
    /// Low health, retreating to a cover point
    Covering,
    /// Heading back to the player
    Following,
}

impl BotState {
    pub const ALL: [BotState; 5] = [
        BotState::Idle,
        BotState::Moving,
        BotState::Attacking,
        BotState::Covering,
        BotState::Following,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BotState::Idle => "idle",
            BotState::Moving => "moving",
            BotState::Attacking => "attacking",
            BotState::Covering => "covering",
            BotState::Following => "following",
        }
    }

    /// Bots in combat do not regenerate
    pub fn is_engaged(&self) -> bool {
        matches!(self, BotState::Attacking | BotState::Covering)
    }
}

impl fmt::Display for BotState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Allied AI teammate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bot {
    pub id: EntityId,
    pub position: Vec2,
    pub velocity: Vec2,
    pub health: f32,
    pub max_health: f32,
    /// Id of the enemy engaged this tick (looked up, never owned)
    pub target: Option<EntityId>,
    pub state: BotState,
    /// Time of the last ability activation
    pub last_ability_use: u64,
    /// Retreat point held for the current cover episode
    pub cover_position: Option<Vec2>,
}

impl Bot {
    pub fn new(id: impl Into<EntityId>, position: Vec2) -> Self {
        Self {
            id: id.into(),
            position,
            velocity: Vec2::ZERO,
            health: roster::BOT_HEALTH,
            max_health: roster::BOT_HEALTH,
            target: None,
            state: BotState::Idle,
            last_ability_use: 0,
            cover_position: None,
        }
    }
}

impl Entity for Bot {
    fn id(&self) -> &str {
        &self.id
    }
    fn position(&self) -> Vec2 {
        self.position
    }
    fn health(&self) -> f32 {
        self.health
    }
    fn max_health(&self) -> f32 {
        self.max_health
    }
    fn team(&self) -> Team {
        Team::Player
    }
    fn kind(&self) -> EntityKind {
        EntityKind::Bot
    }
}

/// Rectangular arena, origin at the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
}

impl Default for Arena {
    fn default() -> Self {
        Self::new(arena::DEFAULT_WIDTH, arena::DEFAULT_HEIGHT)
    }
}

impl Arena {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Keep a bot position inside the playable area
    pub fn clamp_bot_position(&self, position: Vec2) -> Vec2 {
        position.clamp_inside(self.width, self.height, arena::BOT_MARGIN)
    }

    /// Keep a cover point away from the walls
    pub fn clamp_cover_position(&self, position: Vec2) -> Vec2 {
        position.clamp_inside(self.width, self.height, arena::COVER_MARGIN)
    }
}

/// Complete simulation state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub player: Player,
    /// Updated in order once per tick
    pub bots: Vec<Bot>,
    pub enemies: Vec<Enemy>,
    /// Elapsed time
    pub time: u64,
    pub arena: Arena,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(Arena::default())
    }
}

impl GameState {
    /// Fresh game: player at the centre, three bots just below, no enemies
    pub fn new(arena: Arena) -> Self {
        let center = arena.center();
        let bots = roster::BOT_OFFSETS
            .iter()
            .enumerate()
            .map(|(i, &(dx, dy))| {
                Bot::new(format!("bot{}", i + 1), center + Vec2::new(dx, dy))
            })
            .collect();

        Self {
            player: Player::new("player", center),
            bots,
            enemies: Vec::new(),
            time: 0,
            arena,
        }
    }

    /// Rebuild the initial layout in the same arena
    pub fn reset(&mut self) {
        *self = Self::new(self.arena);
    }

    /// Position of an enemy in `enemies` by id
    pub fn enemy_index(&self, id: &str) -> Option<usize> {
        self.enemies.iter().position(|e| e.id == id)
    }

    pub fn find_enemy(&self, id: &str) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id == id)
    }

    pub fn get_bot(&self, id: &str) -> Option<&Bot> {
        self.bots.iter().find(|b| b.id == id)
    }

    /// Bots with health left
    pub fn alive_bots(&self) -> impl Iterator<Item = &Bot> {
        self.bots.iter().filter(|b| b.is_alive())
    }

    pub fn alive_bot_count(&self) -> usize {
        self.alive_bots().count()
    }
}
