use std::io::BufRead;

use anyhow::Context;
use tokio::sync::mpsc;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use smart_teammates::config::SimulationConfig;
use smart_teammates::control::{ControlCommand, ControlEffect};
use smart_teammates::game::game_loop::Simulation;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    info!("Smart Teammates v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = SimulationConfig::load_or_default();
    config.validate().context("invalid simulation configuration")?;
    info!(
        "Configuration loaded: arena {}x{}, tick {}ms, damage x{:.1}, speed {}",
        config.arena_width,
        config.arena_height,
        config.tick_interval_ms,
        config.settings.damage_multiplier(),
        config.settings.movement_speed()
    );

    let mut sim = Simulation::new(config.arena(), config.settings, config.rng_seed);

    // Operator commands, one per stdin line, read on a plain thread
    let (command_tx, mut command_rx) = mpsc::channel::<ControlCommand>(32);
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    error!("Failed to read stdin: {}", e);
                    break;
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            match ControlCommand::parse(&line) {
                Ok(command) => {
                    if command_tx.blocking_send(command).is_err() {
                        break;
                    }
                }
                Err(e) => warn!("Ignoring command: {}", e),
            }
        }
    });

    let mut ticker = interval(config.tick_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    info!("Simulation running");

    'run: loop {
        tokio::select! {
            _ = ticker.tick() => {
                while let Ok(command) = command_rx.try_recv() {
                    match command.apply(&mut sim) {
                        Ok(ControlEffect::Continue) => {}
                        Ok(ControlEffect::ShowStatus) => info!("{}", sim.status_line()),
                        Ok(ControlEffect::Quit) => break 'run,
                        Err(e) => warn!("Command rejected: {}", e),
                    }
                }

                sim.tick();

                if sim.tick_count() > 0 && sim.tick_count() % config.status_interval_ticks == 0 && !sim.is_paused() {
                    info!("{}", sim.status_line());
                }

                if sim.is_over() {
                    info!("Game over after {} ticks", sim.tick_count());
                    break;
                }

                if config.max_ticks.is_some_and(|max| sim.tick_count() >= max) {
                    info!("Reached tick limit of {}", sim.tick_count());
                    break;
                }
            }
            result = &mut shutdown => {
                match result {
                    Ok(()) => info!("Shutdown signal received"),
                    Err(e) => error!("Failed to listen for Ctrl+C: {}", e),
                }
                break;
            }
        }
    }

    let snapshot = serde_json::to_string_pretty(&sim.snapshot()).context("failed to serialize snapshot")?;
    println!("{}", snapshot);
    info!("Simulation stopped");

    Ok(())
}
