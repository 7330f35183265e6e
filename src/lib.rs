//! Smart Teammates
//!
//! AI teammates for a top-down arena shooter. Three bots pick targets, take
//! cover, use a timed ability and follow the player, driven by a fixed-step
//! headless simulation.

pub mod config;
pub mod control;
pub mod game;
pub mod util;
