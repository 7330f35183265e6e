pub mod constants;
pub mod settings;
pub mod state;
pub mod systems;
pub mod game_loop;
