pub mod targeting;
pub mod cover;
pub mod ai;
pub mod combat;
pub mod enemies;
