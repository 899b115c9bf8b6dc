use std::process::ExitCode;

use anyhow::Context;
use tracing::error;
use tracing_subscriber::EnvFilter;

use toruslife::config::Config;
use toruslife::game::Game;
use toruslife::input::InputThread;
use toruslife::render::Terminal;
use toruslife::world::World;

fn main() -> ExitCode {
    init_tracing();

    let config = Config::default();

    // Nothing is allocated for the simulation until the terminal is ours
    let terminal = match config.validate().and_then(|()| Terminal::acquire()) {
        Ok(terminal) => terminal,
        Err(e) => {
            error!("initialization failed: {e}");
            eprintln!("Could not start the game: {e}");

            return ExitCode::FAILURE;
        }
    };

    match run(&config, terminal) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config, terminal: Terminal) -> anyhow::Result<()> {
    let keys = InputThread::spawn().context("Failed to start reading input")?;
    let world = World::from_config(config);

    let mut game = Game::new(config, world, terminal, keys);
    let res = game.run().context("Failed to draw to the terminal");

    let (_, terminal, keys) = game.into_parts();
    let stopped = keys.shutdown().context("Failed to read input");

    // restores the terminal before anything gets reported
    drop(terminal);

    res.and(stopped)
}

/// Logs go to stderr, filtered by `RUST_LOG`, so they can be redirected away from the board
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}
