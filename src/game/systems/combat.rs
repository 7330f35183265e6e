//! Combat resolution
//!
//! Applies bot attacks, removes dead enemies, lets enemies hurt whatever they
//! touch and regenerates idle bots. Health is floored at zero here; the bot
//! logic never clamps it.

use crate::game::constants::ability::DAMAGE_BONUS;
use crate::game::constants::combat::*;
use crate::game::state::{BotState, Entity, EntityId, GameState};
use crate::game::systems::ai::{is_ability_active, BotAi};

/// Outgoing damage: `base × multiplier`, ×1.5 while the ability is active.
/// Not clamped to the target's remaining health.
#[inline]
pub fn calculate_damage(base_damage: f32, damage_multiplier: f32, ability_active: bool) -> f32 {
    let damage = base_damage * damage_multiplier;
    if ability_active {
        damage * DAMAGE_BONUS
    } else {
        damage
    }
}

/// A bot landed the killing blow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Kill {
    pub bot_id: EntityId,
    pub enemy_id: EntityId,
}

/// Result of one round of bot attacks
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttackOutcome {
    pub damage_dealt: f32,
    pub kills: Vec<Kill>,
}

/// Result of enemies touching the player and bots
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactOutcome {
    /// Bots whose health reached zero this tick
    pub bots_downed: Vec<EntityId>,
    /// Player health reached zero this tick
    pub player_downed: bool,
}

/// Every living bot in `Attacking` hits its target, if the target still exists
pub fn resolve_bot_attacks(state: &mut GameState, ai: &BotAi) -> AttackOutcome {
    let now = state.time;
    let mut outcome = AttackOutcome::default();

    for bot in state.bots.iter().filter(|b| b.is_alive()) {
        if bot.state != BotState::Attacking {
            continue;
        }
        let Some(target_id) = bot.target.as_deref() else {
            continue;
        };
        let Some(enemy) = state.enemies.iter_mut().find(|e| e.id == target_id) else {
            continue;
        };
        // Already killed by an earlier bot this tick
        if !enemy.is_alive() {
            continue;
        }

        let damage = ai.calculate_damage(BOT_BASE_DAMAGE, is_ability_active(bot.last_ability_use, now));
        enemy.health -= damage;
        outcome.damage_dealt += damage;

        if !enemy.is_alive() {
            outcome.kills.push(Kill {
                bot_id: bot.id.clone(),
                enemy_id: enemy.id.clone(),
            });
        }
    }

    outcome
}

/// Drop enemies with no health left, returning how many were removed
pub fn remove_dead_enemies(state: &mut GameState) -> usize {
    let before = state.enemies.len();
    state.enemies.retain(|e| e.is_alive());
    before - state.enemies.len()
}

/// Forget targets that were removed this tick; the next decision picks anew
pub fn clear_stale_targets(state: &mut GameState) {
    for bot in &mut state.bots {
        let stale = bot
            .target
            .as_deref()
            .is_some_and(|id| !state.enemies.iter().any(|e| e.id == id));
        if stale {
            bot.target = None;
        }
    }
}

/// Enemies in contact range chip away at the player and at living bots
pub fn resolve_enemy_contacts(state: &mut GameState) -> ContactOutcome {
    let mut outcome = ContactOutcome::default();
    let player_was_alive = state.player.is_alive();

    for enemy in &state.enemies {
        if enemy.position.distance_to(state.player.position) < CONTACT_RANGE {
            state.player.health = (state.player.health - ENEMY_DAMAGE_TO_PLAYER).max(0.0);
        }

        for bot in state.bots.iter_mut().filter(|b| b.is_alive()) {
            if enemy.position.distance_to(bot.position) < CONTACT_RANGE {
                bot.health = (bot.health - ENEMY_DAMAGE_TO_BOT).max(0.0);
                if !bot.is_alive() {
                    outcome.bots_downed.push(bot.id.clone());
                }
            }
        }
    }

    outcome.player_downed = player_was_alive && !state.player.is_alive();
    outcome
}

/// Living bots out of combat regain a little health
pub fn regenerate_bots(state: &mut GameState) {
    for bot in state.bots.iter_mut().filter(|b| b.is_alive()) {
        if !bot.state.is_engaged() {
            bot.health = (bot.health + BOT_REGEN).min(bot.max_health);
        }
    }
}
