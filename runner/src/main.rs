mod config;
mod game_loop;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::{Parser, ValueEnum};
use config::{get_config_manager, GameSpeed, Validate, CONFIG_FILE};
use game_loop::run_game_loop;
use tron_common::games::tron::GameMode;
use tron_common::logger::{self, LogLevel};
use tron_common::log;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeArg {
    Single,
    TwoPlayer,
    VsBot,
    TwoPlayerVsBot,
}

impl From<ModeArg> for GameMode {
    fn from(value: ModeArg) -> Self {
        match value {
            ModeArg::Single => GameMode::SinglePlayer,
            ModeArg::TwoPlayer => GameMode::TwoPlayer,
            ModeArg::VsBot => GameMode::VsBot,
            ModeArg::TwoPlayerVsBot => GameMode::TwoPlayerVsBot,
        }
    }
}

#[derive(Parser)]
#[command(name = "tron_runner", about = "Headless light-cycle rounds")]
struct Args {
    /// YAML config, created with defaults when missing
    #[arg(long, default_value = CONFIG_FILE)]
    config: String,
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,
    #[arg(long)]
    rounds: Option<u32>,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long, value_enum)]
    speed: Option<GameSpeed>,
    #[arg(long)]
    use_log_prefix: bool,
    /// Per-tick debug output
    #[arg(long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let prefix = if args.use_log_prefix {
        Some("Runner".to_string())
    } else {
        None
    };
    let level = if args.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };
    logger::init_logger(prefix, level);

    let mut config = get_config_manager(&args.config).load_or_init()?;
    if let Some(mode) = args.mode {
        config.mode = mode.into();
    }
    if let Some(rounds) = args.rounds {
        config.rounds = rounds;
    }
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(speed) = args.speed {
        config.speed = speed;
        config.tick_interval_ms = None;
    }
    config.validate()?;

    log!(
        "Running {} round(s) of {:?} on {}x{}, tick {:?}, bot {:?}",
        config.rounds,
        config.mode,
        config.arena.width,
        config.arena.height,
        config.tick_interval(),
        config.bot.difficulty
    );

    let running = Arc::new(AtomicBool::new(true));
    let shutdown_flag = Arc::clone(&running);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                log!("Shutdown signal received, stopping after the current tick...");
                shutdown_flag.store(false, Ordering::Relaxed);
            }
            Err(e) => log!("Failed to listen for Ctrl+C: {}", e),
        }
    });

    let summary = run_game_loop(&config, running).await?;
    summary.log_table();

    Ok(())
}
