use tracing::debug;

use crate::game::constants::ability::{ACTIVE_MS, COOLDOWN_MS};
use crate::game::constants::ai::*;
use crate::game::settings::ModSettings;
use crate::game::state::{Arena, Bot, BotState, Enemy, EntityId, Player};
use crate::game::systems::combat::calculate_damage;
use crate::game::systems::cover::{episode_cover_position, should_take_cover};
use crate::game::systems::targeting::prioritize_target;
use crate::util::vec2::Vec2;

/// Everything one tick of bot logic decides, computed without touching the bot
#[derive(Debug, Clone, PartialEq)]
pub struct BotDecision {
    pub target: Option<EntityId>,
    pub state: BotState,
    pub velocity: Vec2,
    /// Position after applying `velocity` and clamping to the arena
    pub position: Vec2,
    pub cover_position: Option<Vec2>,
    pub last_ability_use: u64,
    pub ability_used: bool,
}

/// What changed when a decision was applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BotTransition {
    pub from: BotState,
    pub to: BotState,
    pub ability_used: bool,
}

impl BotTransition {
    pub fn changed(&self) -> bool {
        self.from != self.to
    }
}

/// Bot logic bound to the active mod settings
#[derive(Debug, Clone, Default)]
pub struct BotAi {
    settings: ModSettings,
}

impl BotAi {
    pub fn new(settings: ModSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ModSettings {
        &self.settings
    }

    /// Replace the settings snapshot used from the next call on
    pub fn update_settings(&mut self, settings: ModSettings) {
        self.settings = settings;
    }

    /// Run one tick of decision making for `bot` and write the result back
    pub fn update(
        &self,
        bot: &mut Bot,
        enemies: &[Enemy],
        player: &Player,
        now: u64,
        width: f32,
        height: f32,
    ) -> BotTransition {
        update_bot(bot, enemies, player, &self.settings, now, &Arena::new(width, height))
    }

    /// Outgoing damage for a hit of `base_damage`
    pub fn calculate_damage(&self, base_damage: f32, ability_active: bool) -> f32 {
        calculate_damage(base_damage, self.settings.damage_multiplier(), ability_active)
    }
}

/// Decide and apply one tick for a single bot
pub fn update_bot(
    bot: &mut Bot,
    enemies: &[Enemy],
    player: &Player,
    settings: &ModSettings,
    now: u64,
    arena: &Arena,
) -> BotTransition {
    let decision = decide(bot, enemies, player, settings, now, arena);
    let from = bot.state;

    bot.target = decision.target;
    bot.state = decision.state;
    bot.velocity = decision.velocity;
    bot.position = decision.position;
    bot.cover_position = decision.cover_position;
    bot.last_ability_use = decision.last_ability_use;

    let transition = BotTransition {
        from,
        to: bot.state,
        ability_used: decision.ability_used,
    };

    if transition.changed() {
        debug!(
            "Bot {}: {} -> {} (target: {})",
            bot.id,
            transition.from,
            transition.to,
            bot.target.as_deref().unwrap_or("none")
        );
    }
    if transition.ability_used {
        debug!("Bot {} activated ability at t={}", bot.id, now);
    }

    transition
}

/// Pure bot decision.
///
/// Only `cover_position` and `last_ability_use` carry over from the previous
/// tick; everything else is recomputed from the snapshot.
pub fn decide(
    bot: &Bot,
    enemies: &[Enemy],
    player: &Player,
    settings: &ModSettings,
    now: u64,
    arena: &Arena,
) -> BotDecision {
    let speed = settings.bot_speed();
    let target = prioritize_target(bot, enemies, player);
    let dist_to_player = bot.position.distance_to(player.position);

    let mut cover_position = bot.cover_position;
    let mut last_ability_use = bot.last_ability_use;
    let mut ability_used = false;

    let (state, velocity) = match target {
        None => {
            // Cover point is left as is until the bot next has a target
            if dist_to_player > FOLLOW_RADIUS {
                (BotState::Following, bot.position.direction_to(player.position) * speed)
            } else {
                (BotState::Idle, Vec2::ZERO)
            }
        }
        Some(target) => {
            let dist_to_target = bot.position.distance_to(target.position);

            let (mut state, mut velocity) = if should_take_cover(bot) {
                let point = episode_cover_position(bot, target.position, arena);
                cover_position = Some(point);
                let velocity = bot.position.direction_to(point) * speed;

                // Shoots back from cover but keeps retreating
                if dist_to_target < ATTACK_RANGE * COVER_ATTACK_RANGE_FACTOR {
                    (BotState::Attacking, velocity)
                } else {
                    (BotState::Covering, velocity)
                }
            } else {
                cover_position = None;

                if dist_to_target > ATTACK_RANGE {
                    (BotState::Moving, bot.position.direction_to(target.position) * speed)
                } else {
                    if is_ability_ready(last_ability_use, now) {
                        last_ability_use = now;
                        ability_used = true;
                    }
                    (BotState::Attacking, Vec2::ZERO)
                }
            };

            if dist_to_player > LEASH_RADIUS {
                state = BotState::Following;
                velocity = bot.position.direction_to(player.position) * (speed * CATCH_UP_FACTOR);
            }

            (state, velocity)
        }
    };

    BotDecision {
        target: target.map(|e| e.id.clone()),
        state,
        velocity,
        position: arena.clamp_bot_position(bot.position + velocity),
        cover_position,
        last_ability_use,
        ability_used,
    }
}

/// Cooldown has elapsed since the last activation
#[inline]
pub fn is_ability_ready(last_ability_use: u64, now: u64) -> bool {
    now.saturating_sub(last_ability_use) > COOLDOWN_MS
}

/// Damage bonus window is still open
#[inline]
pub fn is_ability_active(last_ability_use: u64, now: u64) -> bool {
    now.saturating_sub(last_ability_use) < ACTIVE_MS
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::settings::MovementSpeed;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const EPSILON: f32 = 1e-3;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn create_bot(x: f32, y: f32) -> Bot {
        Bot::new("bot1", Vec2::new(x, y))
    }

    fn create_enemy(id: &str, x: f32, y: f32) -> Enemy {
        Enemy::new(id, Vec2::new(x, y), 60.0)
    }

    fn create_player(x: f32, y: f32) -> Player {
        Player::new("player", Vec2::new(x, y))
    }

    #[test]
    fn test_attacks_enemy_in_range() {
        let ai = BotAi::default();
        let mut bot = create_bot(400.0, 300.0);
        let enemies = vec![create_enemy("e1", 400.0, 320.0)];
        let player = create_player(400.0, 300.0);

        ai.update(&mut bot, &enemies, &player, 16, 800.0, 600.0);

        assert_eq!(bot.target.as_deref(), Some("e1"));
        assert_eq!(bot.state, BotState::Attacking);
        assert_eq!(bot.velocity, Vec2::ZERO);
        assert_eq!(bot.position, Vec2::new(400.0, 300.0));
    }

    #[test]
    fn test_moves_toward_distant_target() {
        let ai = BotAi::default();
        let mut bot = create_bot(400.0, 300.0);
        let enemies = vec![create_enemy("e1", 400.0, 50.0)];
        let player = create_player(400.0, 300.0);

        ai.update(&mut bot, &enemies, &player, 16, 800.0, 600.0);

        assert_eq!(bot.state, BotState::Moving);
        assert!(bot.velocity.approx_eq(Vec2::new(0.0, -2.0), EPSILON));
        assert!(bot.position.approx_eq(Vec2::new(400.0, 298.0), EPSILON));
    }

    #[test]
    fn test_attack_range_boundary() {
        let player = create_player(400.0, 300.0);
        let settings = ModSettings::default();
        let arena = Arena::default();

        // Exactly 200 away is still in range
        let bot = create_bot(400.0, 300.0);
        let enemies = vec![create_enemy("e1", 600.0, 300.0)];
        let decision = decide(&bot, &enemies, &player, &settings, 16, &arena);
        assert_eq!(decision.state, BotState::Attacking);

        let enemies = vec![create_enemy("e1", 600.5, 300.0)];
        let decision = decide(&bot, &enemies, &player, &settings, 16, &arena);
        assert_eq!(decision.state, BotState::Moving);
    }

    #[test]
    fn test_follow_radius_boundary() {
        let player = create_player(400.0, 300.0);
        let settings = ModSettings::default();
        let arena = Arena::default();

        // Exactly 150 away with nothing to fight: stays put
        let bot = create_bot(550.0, 300.0);
        let decision = decide(&bot, &[], &player, &settings, 16, &arena);
        assert_eq!(decision.state, BotState::Idle);
        assert_eq!(decision.velocity, Vec2::ZERO);

        let bot = create_bot(550.5, 300.0);
        let decision = decide(&bot, &[], &player, &settings, 16, &arena);
        assert_eq!(decision.state, BotState::Following);
        assert!(decision.velocity.approx_eq(Vec2::new(-2.0, 0.0), EPSILON));
    }

    #[test]
    fn test_leash_radius_boundary() {
        let player = create_player(100.0, 300.0);
        let settings = ModSettings::default();
        let arena = Arena::default();

        // Exactly 400 away from the player, enemy in reach: keeps fighting
        let bot = create_bot(500.0, 300.0);
        let enemies = vec![create_enemy("e1", 520.0, 300.0)];
        let decision = decide(&bot, &enemies, &player, &settings, 16, &arena);
        assert_eq!(decision.state, BotState::Attacking);
        assert_eq!(decision.velocity, Vec2::ZERO);

        let bot = create_bot(500.5, 300.0);
        let decision = decide(&bot, &enemies, &player, &settings, 16, &arena);
        assert_eq!(decision.state, BotState::Following);
        assert!(decision.velocity.approx_eq(Vec2::new(-2.4, 0.0), EPSILON));
    }

    #[test]
    fn test_covering_holds_point_until_healed() {
        let ai = BotAi::default();
        let mut bot = create_bot(400.0, 300.0);
        bot.health = 30.0; // 37.5% of 80
        let enemies = vec![create_enemy("e1", 700.0, 300.0)];
        let player = create_player(400.0, 300.0);

        ai.update(&mut bot, &enemies, &player, 16, 800.0, 600.0);

        assert_eq!(bot.state, BotState::Covering);
        let point = bot.cover_position.expect("cover point set");
        assert!(point.approx_eq(Vec2::new(320.0, 300.0), EPSILON));
        assert!(bot.velocity.approx_eq(Vec2::new(-2.0, 0.0), EPSILON));

        for tick in 2..12 {
            ai.update(&mut bot, &enemies, &player, tick * 16, 800.0, 600.0);
            assert_eq!(bot.state, BotState::Covering);
            assert_eq!(bot.cover_position, Some(point));
        }
        assert!(bot.position.approx_eq(Vec2::new(378.0, 300.0), EPSILON));

        // Back at the threshold: episode over
        bot.health = 32.0;
        ai.update(&mut bot, &enemies, &player, 200, 800.0, 600.0);
        assert!(bot.cover_position.is_none());
        assert_eq!(bot.state, BotState::Moving);
    }

    #[test]
    fn test_new_cover_episode_recomputes_point() {
        let ai = BotAi::default();
        let player = create_player(400.0, 300.0);
        let mut bot = create_bot(400.0, 300.0);
        bot.health = 10.0;

        let enemies = vec![create_enemy("e1", 700.0, 300.0)];
        ai.update(&mut bot, &enemies, &player, 16, 800.0, 600.0);
        let first = bot.cover_position.unwrap();

        bot.health = 80.0;
        ai.update(&mut bot, &enemies, &player, 32, 800.0, 600.0);
        assert!(bot.cover_position.is_none());

        bot.health = 10.0;
        let enemies = vec![create_enemy("e1", bot.position.x, 50.0)];
        ai.update(&mut bot, &enemies, &player, 48, 800.0, 600.0);
        let second = bot.cover_position.unwrap();
        assert_ne!(first, second);
        // Away from a threat straight above: straight down
        assert!(approx_eq(second.y - (bot.position.y - 2.0), 80.0));
    }

    #[test]
    fn test_attacks_while_retreating() {
        let settings = ModSettings::default();
        let arena = Arena::default();
        let mut bot = create_bot(400.0, 300.0);
        bot.health = 20.0;
        let enemies = vec![create_enemy("e1", 500.0, 300.0)];
        let player = create_player(400.0, 300.0);

        let decision = decide(&bot, &enemies, &player, &settings, 10_000, &arena);

        assert_eq!(decision.state, BotState::Attacking);
        // Velocity still points at the retreat point
        assert!(decision.velocity.approx_eq(Vec2::new(-2.0, 0.0), EPSILON));
        assert!(decision.cover_position.is_some());
        // No ability on the cover path even though the cooldown is over
        assert!(!decision.ability_used);
        assert_eq!(decision.last_ability_use, 0);
    }

    #[test]
    fn test_cover_attack_range_is_strict() {
        let settings = ModSettings::default();
        let arena = Arena::default();
        let mut bot = create_bot(400.0, 300.0);
        bot.health = 20.0;
        let player = create_player(400.0, 300.0);

        let enemies = vec![create_enemy("e1", 699.0, 300.0)];
        let decision = decide(&bot, &enemies, &player, &settings, 16, &arena);
        assert_eq!(decision.state, BotState::Attacking);

        let enemies = vec![create_enemy("e1", 700.0, 300.0)];
        let decision = decide(&bot, &enemies, &player, &settings, 16, &arena);
        assert_eq!(decision.state, BotState::Covering);
    }

    #[test]
    fn test_follows_player_without_enemies() {
        let ai = BotAi::default();
        let mut bot = create_bot(100.0, 400.0);
        let player = create_player(600.0, 400.0);

        ai.update(&mut bot, &[], &player, 16, 1200.0, 800.0);

        assert_eq!(bot.state, BotState::Following);
        assert!(bot.target.is_none());
        // Plain follow: no catch-up bonus
        assert!(approx_eq(bot.velocity.length(), 2.0));
        assert!(bot.velocity.approx_eq(Vec2::new(2.0, 0.0), EPSILON));
        assert!(bot.position.approx_eq(Vec2::new(102.0, 400.0), EPSILON));
    }

    #[test]
    fn test_idles_near_player_without_enemies() {
        let ai = BotAi::default();
        let mut bot = create_bot(450.0, 350.0);
        bot.state = BotState::Attacking;
        let player = create_player(400.0, 300.0);

        let transition = ai.update(&mut bot, &[], &player, 16, 800.0, 600.0);

        assert_eq!(bot.state, BotState::Idle);
        assert_eq!(bot.velocity, Vec2::ZERO);
        assert_eq!(bot.position, Vec2::new(450.0, 350.0));
        assert!(transition.changed());
        assert_eq!(transition.from, BotState::Attacking);
        assert_eq!(transition.to, BotState::Idle);
    }

    #[test]
    fn test_no_target_keeps_cover_point() {
        let ai = BotAi::default();
        let mut bot = create_bot(400.0, 300.0);
        bot.health = 10.0;
        bot.cover_position = Some(Vec2::new(50.0, 50.0));
        let player = create_player(400.0, 300.0);

        ai.update(&mut bot, &[], &player, 16, 800.0, 600.0);

        assert_eq!(bot.cover_position, Some(Vec2::new(50.0, 50.0)));
        assert_eq!(bot.state, BotState::Idle);
    }

    #[test]
    fn test_leash_overrides_combat() {
        let ai = BotAi::default();
        let mut bot = create_bot(700.0, 100.0);
        // Enemy right next to the bot: would be attacking
        let enemies = vec![create_enemy("e1", 710.0, 100.0)];
        let player = create_player(100.0, 500.0);

        ai.update(&mut bot, &enemies, &player, 10_000, 800.0, 600.0);

        assert_eq!(bot.state, BotState::Following);
        assert_eq!(bot.target.as_deref(), Some("e1"));
        assert!(approx_eq(bot.velocity.length(), 2.4));
        let expected_dir = Vec2::new(-600.0, 400.0).normalize();
        assert!(bot.velocity.approx_eq(expected_dir * 2.4, EPSILON));
        // The attack branch ran before the override, so the ability fired
        assert_eq!(bot.last_ability_use, 10_000);
    }

    #[test]
    fn test_leash_overrides_cover_but_keeps_point() {
        let settings = ModSettings::default();
        let arena = Arena::default();
        let mut bot = create_bot(700.0, 100.0);
        bot.health = 10.0;
        let enemies = vec![create_enemy("e1", 750.0, 100.0)];
        let player = create_player(100.0, 500.0);

        let decision = decide(&bot, &enemies, &player, &settings, 16, &arena);

        assert_eq!(decision.state, BotState::Following);
        assert!(decision.cover_position.is_some());
        assert!(approx_eq(decision.velocity.length(), 2.4));
    }

    #[test]
    fn test_ability_cooldown() {
        let settings = ModSettings::default();
        let arena = Arena::default();
        let player = create_player(400.0, 300.0);
        let enemies = vec![create_enemy("e1", 400.0, 320.0)];
        let mut bot = create_bot(400.0, 300.0);
        bot.last_ability_use = 8000;

        let decision = decide(&bot, &enemies, &player, &settings, 12_000, &arena);
        assert!(!decision.ability_used);
        assert_eq!(decision.last_ability_use, 8000);

        // Exactly the cooldown is not enough
        let decision = decide(&bot, &enemies, &player, &settings, 13_000, &arena);
        assert!(!decision.ability_used);

        let decision = decide(&bot, &enemies, &player, &settings, 13_001, &arena);
        assert!(decision.ability_used);
        assert_eq!(decision.last_ability_use, 13_001);
    }

    #[test]
    fn test_ability_windows() {
        assert!(!is_ability_ready(0, 5000));
        assert!(is_ability_ready(0, 5001));
        assert!(is_ability_active(1000, 2999));
        assert!(!is_ability_active(1000, 3000));
        // Clock behind the stamp never underflows
        assert!(is_ability_active(5000, 100));
        assert!(!is_ability_ready(5000, 100));
    }

    #[test]
    fn test_movement_speed_tiers() {
        let player = create_player(400.0, 300.0);
        let enemies = vec![create_enemy("e1", 400.0, 50.0)];
        let arena = Arena::default();
        let bot = create_bot(400.0, 300.0);

        for (speed, expected) in [
            (MovementSpeed::Standard, 2.0),
            (MovementSpeed::Fast, 3.0),
            (MovementSpeed::VeryFast, 5.0),
        ] {
            let settings = ModSettings::default().with_movement_speed(speed);
            let decision = decide(&bot, &enemies, &player, &settings, 16, &arena);
            assert_eq!(decision.state, BotState::Moving);
            assert!(approx_eq(decision.velocity.length(), expected), "{:?}", speed);
        }
    }

    #[test]
    fn test_update_settings_applies_next_call() {
        let mut ai = BotAi::default();
        let player = create_player(400.0, 300.0);
        let enemies = vec![create_enemy("e1", 400.0, 50.0)];
        let mut bot = create_bot(400.0, 300.0);

        ai.update(&mut bot, &enemies, &player, 16, 800.0, 600.0);
        assert!(approx_eq(bot.velocity.length(), 2.0));

        ai.update_settings(ModSettings::new(3.0, MovementSpeed::Fast).unwrap());
        ai.update(&mut bot, &enemies, &player, 32, 800.0, 600.0);
        assert!(approx_eq(bot.velocity.length(), 3.0));
        assert_eq!(ai.settings().damage_multiplier(), 3.0);
    }

    #[test]
    fn test_position_clamped_to_arena() {
        let ai = BotAi::default();
        let mut bot = create_bot(10.5, 300.0);
        let enemies = vec![create_enemy("e1", -250.0, 300.0)];
        let player = create_player(200.0, 300.0);

        ai.update(&mut bot, &enemies, &player, 16, 800.0, 600.0);

        assert_eq!(bot.state, BotState::Moving);
        assert_eq!(bot.position, Vec2::new(10.0, 300.0));
    }

    #[test]
    fn test_target_rederived_from_current_list() {
        let ai = BotAi::default();
        let player = create_player(400.0, 300.0);
        let mut bot = create_bot(400.0, 300.0);

        let enemies = vec![create_enemy("e1", 400.0, 320.0), create_enemy("e2", 600.0, 500.0)];
        ai.update(&mut bot, &enemies, &player, 16, 800.0, 600.0);
        assert_eq!(bot.target.as_deref(), Some("e1"));

        // e1 removed by the resolver
        let enemies = vec![create_enemy("e2", 600.0, 500.0)];
        ai.update(&mut bot, &enemies, &player, 32, 800.0, 600.0);
        assert_eq!(bot.target.as_deref(), Some("e2"));

        ai.update(&mut bot, &[], &player, 48, 800.0, 600.0);
        assert!(bot.target.is_none());
    }

    #[test]
    fn test_calculate_damage_uses_multiplier() {
        let ai = BotAi::new(ModSettings::new(2.0, MovementSpeed::Standard).unwrap());
        assert!(approx_eq(ai.calculate_damage(0.3, false), 0.6));
        assert!(approx_eq(ai.calculate_damage(0.3, true), 0.9));
    }

    #[test]
    fn test_random_scenarios_stay_in_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        let arena = Arena::new(800.0, 600.0);

        for round in 0..500 {
            let settings = ModSettings::new(
                rng.gen_range(1.0..5.0),
                [MovementSpeed::Standard, MovementSpeed::Fast, MovementSpeed::VeryFast][round % 3],
            )
            .unwrap();

            let mut bot = create_bot(rng.gen_range(0.0..800.0), rng.gen_range(0.0..600.0));
            bot.health = rng.gen_range(0.0..80.0);
            let player = create_player(rng.gen_range(0.0..800.0), rng.gen_range(0.0..600.0));
            let enemies: Vec<Enemy> = (0..rng.gen_range(0..6))
                .map(|i| {
                    let mut e = create_enemy(&format!("e{}", i), rng.gen_range(0.0..800.0), rng.gen_range(0.0..600.0));
                    e.health = rng.gen_range(1.0..60.0);
                    e
                })
                .collect();

            for step in 0..5u64 {
                update_bot(&mut bot, &enemies, &player, &settings, round as u64 * 100 + step * 16, &arena);

                assert!(BotState::ALL.contains(&bot.state));
                assert!(bot.position.x >= 10.0 && bot.position.x <= 790.0);
                assert!(bot.position.y >= 10.0 && bot.position.y <= 590.0);
                assert_eq!(bot.target.is_none(), enemies.is_empty());
            }
        }
    }
}
