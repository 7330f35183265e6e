//! Cover seeking
//!
//! A hurt bot backs away from its target to a retreat point. The point is
//! computed once when the cover episode starts and held until the bot is
//! healthy again.

use crate::game::constants::cover;
use crate::game::state::{Arena, Bot, Entity};
use crate::util::vec2::Vec2;

/// Whether the bot is hurt enough to retreat
pub fn should_take_cover(bot: &Bot) -> bool {
    bot.is_below_health_fraction(cover::HEALTH_FRACTION)
}

/// Retreat point `cover::DISTANCE` away from `threat`, kept off the walls.
///
/// If the bot sits exactly on the threat there is no "away" direction and
/// the point collapses onto the bot's own (clamped) position.
pub fn find_cover_position(from: Vec2, threat: Vec2, arena: &Arena) -> Vec2 {
    let away = threat.direction_to(from);
    arena.clamp_cover_position(from + away * cover::DISTANCE)
}

/// The bot's held retreat point, or a fresh one if this episode just started
pub fn episode_cover_position(bot: &Bot, threat: Vec2, arena: &Arena) -> Vec2 {
    bot.cover_position
        .unwrap_or_else(|| find_cover_position(bot.position, threat, arena))
}
