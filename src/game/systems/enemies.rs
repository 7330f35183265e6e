//! Enemy waves and enemy movement

use rand::Rng;
use uuid::Builder;

use crate::game::constants::arena::SPAWN_INSET;
use crate::game::constants::movement::ENEMY_SPEED;
use crate::game::constants::{wave_enemy_count, wave_enemy_health};
use crate::game::state::{Arena, Enemy, GameState};
use crate::util::vec2::Vec2;

/// Arena edge an enemy enters from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Top, Edge::Right, Edge::Bottom, Edge::Left];

    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    /// Random point along this edge, `SPAWN_INSET` inside the wall
    pub fn spawn_point<R: Rng>(&self, arena: &Arena, rng: &mut R) -> Vec2 {
        match self {
            Edge::Top => Vec2::new(rng.gen::<f32>() * arena.width, SPAWN_INSET),
            Edge::Right => Vec2::new(arena.width - SPAWN_INSET, rng.gen::<f32>() * arena.height),
            Edge::Bottom => Vec2::new(rng.gen::<f32>() * arena.width, arena.height - SPAWN_INSET),
            Edge::Left => Vec2::new(SPAWN_INSET, rng.gen::<f32>() * arena.height),
        }
    }
}

/// Build wave `wave` (1-based): more and tougher enemies each wave
pub fn spawn_wave<R: Rng>(wave: u32, arena: &Arena, rng: &mut R) -> Vec<Enemy> {
    let count = wave_enemy_count(wave);
    let health = wave_enemy_health(wave);

    (0..count)
        .map(|_| {
            let position = Edge::random(rng).spawn_point(arena, rng);
            Enemy::new(enemy_id(rng), position, health)
        })
        .collect()
}

/// Random v4-style id drawn from `rng`, so seeded runs repeat exactly
fn enemy_id<R: Rng>(rng: &mut R) -> String {
    let uuid = Builder::from_random_bytes(rng.gen()).into_uuid();
    format!("enemy_{}", uuid.simple())
}

/// Walk every enemy straight at the player
pub fn advance_enemies(state: &mut GameState) {
    let target = state.player.position;

    for enemy in &mut state.enemies {
        let to_player = target - enemy.position;
        if to_player.length_sq() > 0.0 {
            enemy.velocity = to_player.normalize() * ENEMY_SPEED;
            enemy.position += enemy.velocity;
        }
    }
}
