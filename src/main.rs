use log::{error, info};
use std::env;
use std::io::{self, Write};
use std::process;
use std::time::Instant;

use great_escape_bot::bot::Bot;
use great_escape_bot::config::Config;
use great_escape_bot::debug_logger::DebugLogger;
use great_escape_bot::handler::{format_command, InputReader};
use great_escape_bot::simple_profiler;

fn main() {
    // Default to 'info' level logging unless `RUST_LOG` says otherwise.
    // env_logger writes to stderr, which the referee ignores.
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }

    env_logger::init();

    info!("Starting Great Escape bot...");

    let config = Config::load_or_default();
    let started = Instant::now();

    let stdin = io::stdin();
    let mut reader = InputReader::new(stdin.lock());

    let setup = reader.read_setup().unwrap_or_else(|e| {
        error!("Invalid game setup: {}", e);
        process::exit(1);
    });
    info!(
        "Board {}x{}, {} players, playing seat {}",
        setup.width, setup.height, setup.player_count, setup.my_id
    );

    let mut bot = Bot::new(config.clone(), setup).unwrap_or_else(|e| {
        error!("Cannot start bot: {}", e);
        process::exit(1);
    });
    let mut debug_logger = DebugLogger::new(config.debug.enabled, &config.debug.log_file_path);
    let message = config.protocol.move_message.as_deref();

    let stdout = io::stdout();
    loop {
        let turn = match reader.read_turn(&setup) {
            Ok(Some(turn)) => turn,
            Ok(None) => break,
            Err(e) => {
                error!("Invalid turn input: {}", e);
                process::exit(1);
            }
        };

        let latch_before = bot.session().stay_aggressive;
        let report = bot.get_move(&turn);
        let command = format_command(&report.decision, message);

        let mut out = stdout.lock();
        if let Err(e) = writeln!(out, "{}", command).and_then(|_| out.flush()) {
            error!("Failed to write command: {}", e);
            process::exit(1);
        }

        debug_logger.log_turn(
            report.turn,
            &setup,
            &turn,
            latch_before,
            &report.decision.to_command(),
        );
    }

    info!("GAME OVER");
    simple_profiler::print_report(started.elapsed().as_millis() as u64);
}
