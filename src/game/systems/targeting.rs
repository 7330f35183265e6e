//! Target prioritization
//!
//! Every tick each bot picks one enemy from scratch using a strict tier
//! order. Nothing persists between ticks, so two near-equidistant enemies can
//! swap places from one tick to the next.

use crate::game::constants::ai::{LOW_HEALTH_FRACTION, THREAT_RADIUS};
use crate::game::state::{Bot, Enemy, Entity, Player};
use crate::util::vec2::Vec2;

/// Tier that produced a target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetTier {
    /// Enemy is within threat radius of the player
    Threatening,
    /// Enemy is badly hurt
    LowHealth,
    /// Fallback: closest enemy
    Nearest,
}

/// Pick the enemy `bot` should engage, or `None` when there are no enemies
pub fn prioritize_target<'a>(bot: &Bot, enemies: &'a [Enemy], player: &Player) -> Option<&'a Enemy> {
    select_target(bot.position, enemies, player.position).map(|(enemy, _)| enemy)
}

/// Tiered selection as seen from `from`, also reporting the winning tier
pub fn select_target<'a>(
    from: Vec2,
    enemies: &'a [Enemy],
    player_position: Vec2,
) -> Option<(&'a Enemy, TargetTier)> {
    if enemies.is_empty() {
        return None;
    }

    let threatening = enemies
        .iter()
        .filter(|e| e.position.distance_to(player_position) < THREAT_RADIUS);
    if let Some(enemy) = find_nearest(from, threatening) {
        return Some((enemy, TargetTier::Threatening));
    }

    let low_health = enemies
        .iter()
        .filter(|e| e.is_below_health_fraction(LOW_HEALTH_FRACTION));
    if let Some(enemy) = find_nearest(from, low_health) {
        return Some((enemy, TargetTier::LowHealth));
    }

    find_nearest(from, enemies).map(|enemy| (enemy, TargetTier::Nearest))
}

/// Closest candidate to `from`; the first one wins on equal distance
pub fn find_nearest<'a, I>(from: Vec2, candidates: I) -> Option<&'a Enemy>
where
    I: IntoIterator<Item = &'a Enemy>,
{
    let mut nearest: Option<(&Enemy, f32)> = None;

    for enemy in candidates {
        let dist = from.distance_to(enemy.position);
        let closer = nearest.map_or(true, |(_, d)| dist < d);
        if closer {
            nearest = Some((enemy, dist));
        }
    }

    nearest.map(|(enemy, _)| enemy)
}
