//! Fixed-step simulation driver
//!
//! Owns the game state and advances it one tick at a time. Each tick runs,
//! in order: wave respawn, bot decisions, enemy movement, bot attacks,
//! dead-enemy removal, enemy contact damage and out-of-combat regeneration.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing::{info, warn};

use crate::game::constants::tick;
use crate::game::settings::ModSettings;
use crate::game::state::{Arena, Bot, BotState, Enemy, Entity, EntityId, GameState, Player};
use crate::game::systems::ai::BotAi;
use crate::game::systems::{combat, enemies};
use crate::util::vec2::Vec2;

/// Running totals for the current session
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionStats {
    pub enemies_killed: u32,
    pub damage_dealt: f32,
    /// Wave that spawns next
    pub wave_number: u32,
}

impl Default for SessionStats {
    fn default() -> Self {
        Self {
            enemies_killed: 0,
            damage_dealt: 0.0,
            wave_number: 1,
        }
    }
}

/// Notable things that happened during a tick
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationEvent {
    WaveSpawned { wave: u32, enemies: usize },
    StateChanged { bot_id: EntityId, from: BotState, to: BotState },
    AbilityUsed { bot_id: EntityId },
    EnemyKilled { bot_id: EntityId, enemy_id: EntityId },
    BotDown { bot_id: EntityId },
    PlayerDown,
}

/// What a renderer needs to draw one bot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BotView {
    pub id: EntityId,
    pub state: BotState,
    pub position: Vec2,
    pub velocity: Vec2,
    pub target: Option<EntityId>,
    pub cover_position: Option<Vec2>,
    pub health: f32,
    pub max_health: f32,
}

impl From<&Bot> for BotView {
    fn from(bot: &Bot) -> Self {
        Self {
            id: bot.id.clone(),
            state: bot.state,
            position: bot.position,
            velocity: bot.velocity,
            target: bot.target.clone(),
            cover_position: bot.cover_position,
            health: bot.health,
            max_health: bot.max_health,
        }
    }
}

/// What a renderer needs to draw the player
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerView {
    pub position: Vec2,
    pub health: f32,
    pub max_health: f32,
}

impl From<&Player> for PlayerView {
    fn from(player: &Player) -> Self {
        Self {
            position: player.position,
            health: player.health,
            max_health: player.max_health,
        }
    }
}

/// What a renderer needs to draw one enemy; bot targets refer to `id`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnemyView {
    pub id: EntityId,
    pub position: Vec2,
    pub velocity: Vec2,
    pub health: f32,
    pub max_health: f32,
}

impl From<&Enemy> for EnemyView {
    fn from(enemy: &Enemy) -> Self {
        Self {
            id: enemy.id.clone(),
            position: enemy.position,
            velocity: enemy.velocity,
            health: enemy.health,
            max_health: enemy.max_health,
        }
    }
}

/// Read-only view of the whole simulation
#[derive(Debug, Clone, Serialize)]
pub struct SimulationSnapshot {
    pub tick: u64,
    pub time: u64,
    pub paused: bool,
    pub game_over: bool,
    pub settings: ModSettings,
    pub stats: SessionStats,
    pub player_health: f32,
    pub active_bots: usize,
    pub active_enemies: usize,
    pub arena: Arena,
    pub player: PlayerView,
    pub bots: Vec<BotView>,
    pub enemies: Vec<EnemyView>,
}

/// Headless arena simulation
pub struct Simulation {
    state: GameState,
    ai: BotAi,
    stats: SessionStats,
    rng: StdRng,
    paused: bool,
    tick: u64,
}

impl Simulation {
    /// New game; `seed` makes wave spawns reproducible
    pub fn new(arena: Arena, settings: ModSettings, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            state: GameState::new(arena),
            ai: BotAi::new(settings),
            stats: SessionStats::default(),
            rng,
            paused: false,
            tick: 0,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn settings(&self) -> &ModSettings {
        self.ai.settings()
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn pause(&mut self) {
        if !self.paused {
            info!("Simulation paused at t={}", self.state.time);
        }
        self.paused = true;
    }

    pub fn resume(&mut self) {
        if self.paused {
            info!("Simulation resumed at t={}", self.state.time);
        }
        self.paused = false;
    }

    /// The player is down; ticks no longer advance the game
    pub fn is_over(&self) -> bool {
        !self.state.player.is_alive()
    }

    /// Swap in new settings; takes effect from the next tick
    pub fn update_settings(&mut self, settings: ModSettings) {
        info!(
            "Settings updated: damage x{:.1}, speed {}",
            settings.damage_multiplier(), settings.movement_speed()
        );
        self.ai.update_settings(settings);
    }

    /// Back to the initial layout with fresh stats. Settings are kept.
    pub fn reset(&mut self) {
        self.state.reset();
        self.stats = SessionStats::default();
        self.tick = 0;
        info!("Simulation reset");
    }

    /// Advance one fixed step
    pub fn tick(&mut self) -> Vec<SimulationEvent> {
        let mut events = Vec::new();
        if self.paused || self.is_over() {
            return events;
        }

        self.tick += 1;
        self.state.time += tick::DURATION_MS;

        if self.state.enemies.is_empty() {
            let wave = self.stats.wave_number;
            self.state.enemies = enemies::spawn_wave(wave, &self.state.arena, &mut self.rng);
            self.stats.wave_number += 1;

            info!("Wave {} incoming: {} enemies", wave, self.state.enemies.len());
            events.push(SimulationEvent::WaveSpawned {
                wave,
                enemies: self.state.enemies.len(),
            });
        }

        self.update_bots(&mut events);
        enemies::advance_enemies(&mut self.state);

        let attacks = combat::resolve_bot_attacks(&mut self.state, &self.ai);
        self.stats.damage_dealt += attacks.damage_dealt;
        for kill in attacks.kills {
            self.stats.enemies_killed += 1;
            info!("{} eliminated {}", kill.bot_id, kill.enemy_id);
            events.push(SimulationEvent::EnemyKilled {
                bot_id: kill.bot_id,
                enemy_id: kill.enemy_id,
            });
        }
        combat::remove_dead_enemies(&mut self.state);
        combat::clear_stale_targets(&mut self.state);

        let contacts = combat::resolve_enemy_contacts(&mut self.state);
        for bot_id in contacts.bots_downed {
            warn!("{} is down", bot_id);
            events.push(SimulationEvent::BotDown { bot_id });
        }
        if contacts.player_downed {
            warn!("Player is down at t={}", self.state.time);
            events.push(SimulationEvent::PlayerDown);
        }

        combat::regenerate_bots(&mut self.state);

        events
    }

    /// Living bots decide in roster order; downed bots are frozen
    fn update_bots(&mut self, events: &mut Vec<SimulationEvent>) {
        let now = self.state.time;
        let Arena { width, height } = self.state.arena;

        for bot in self.state.bots.iter_mut().filter(|b| b.is_alive()) {
            let transition = self
                .ai
                .update(bot, &self.state.enemies, &self.state.player, now, width, height);

            if transition.changed() {
                events.push(SimulationEvent::StateChanged {
                    bot_id: bot.id.clone(),
                    from: transition.from,
                    to: transition.to,
                });
            }
            if transition.ability_used {
                events.push(SimulationEvent::AbilityUsed {
                    bot_id: bot.id.clone(),
                });
            }
        }
    }

    pub fn snapshot(&self) -> SimulationSnapshot {
        SimulationSnapshot {
            tick: self.tick,
            time: self.state.time,
            paused: self.paused,
            game_over: self.is_over(),
            settings: *self.ai.settings(),
            stats: self.stats.clone(),
            player_health: self.state.player.health,
            active_bots: self.state.alive_bot_count(),
            active_enemies: self.state.enemies.len(),
            arena: self.state.arena,
            player: PlayerView::from(&self.state.player),
            bots: self.state.bots.iter().map(BotView::from).collect(),
            enemies: self.state.enemies.iter().map(EnemyView::from).collect(),
        }
    }

    /// One-line summary for periodic status logging
    pub fn status_line(&self) -> String {
        let bots = self
            .state
            .bots
            .iter()
            .map(|b| format!("{}={}({:.0}/{:.0})", b.id, b.state, b.health.max(0.0), b.max_health))
            .collect::<Vec<_>>()
            .join(" ");

        format!(
            "t={} wave={} kills={} dmg={:.0} player={:.0}% bots={}/{} enemies={} | {}",
            self.state.time,
            self.stats.wave_number,
            self.stats.enemies_killed,
            self.stats.damage_dealt,
            self.state.player.health.max(0.0),
            self.state.alive_bot_count(),
            self.state.bots.len(),
            self.state.enemies.len(),
            bots
        )
    }
}
