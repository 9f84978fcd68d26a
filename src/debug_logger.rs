// Debug logging module for per-turn decision logging
//
// Each turn's input, latch state and chosen command is appended to a JSONL
// file so that games can be replayed offline. Write failures are logged and
// never interrupt the game loop.

use log::error;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::Write;

use crate::types::{GameSetup, TurnInput};

/// Represents a single debug log entry
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct LogEntry {
    pub turn: u32,
    pub setup: GameSetup,
    pub state: TurnInput,
    /// Latch value before the turn was decided
    pub stay_aggressive: bool,
    pub decision: String,
    pub timestamp: String,
}

pub struct DebugLogger {
    file: Option<File>,
}

impl DebugLogger {
    /// Creates a new debug logger
    /// If enabled is true, initializes the log file (truncating if it exists)
    pub fn new(enabled: bool, log_file_path: &str) -> Self {
        if !enabled {
            return Self::disabled();
        }

        match OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(log_file_path)
        {
            Ok(file) => {
                log::info!("Debug logging enabled: {}", log_file_path);
                DebugLogger { file: Some(file) }
            }
            Err(e) => {
                error!("Failed to create debug log file '{}': {}", log_file_path, e);
                Self::disabled()
            }
        }
    }

    /// Creates a disabled debug logger (no-op)
    pub fn disabled() -> Self {
        DebugLogger { file: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.file.is_some()
    }

    /// Appends one turn to the log
    pub fn log_turn(
        &mut self,
        turn: u32,
        setup: &GameSetup,
        state: &TurnInput,
        stay_aggressive: bool,
        decision: &str,
    ) {
        let Some(file) = self.file.as_mut() else {
            return;
        };

        let entry = LogEntry {
            turn,
            setup: *setup,
            state: state.clone(),
            stay_aggressive,
            decision: decision.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        match serde_json::to_string(&entry) {
            Ok(json_line) => {
                if let Err(e) = writeln!(file, "{}", json_line) {
                    error!("Failed to write debug log entry: {}", e);
                } else if let Err(e) = file.flush() {
                    error!("Failed to flush debug log: {}", e);
                }
            }
            Err(e) => {
                error!("Failed to serialize debug log entry: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Coord, Direction, Player, Wall};
    use std::fs;

    #[test]
    fn test_logged_turn_round_trips() {
        let path = std::env::temp_dir().join(format!("great_escape_log_{}.jsonl", std::process::id()));
        let path_str = path.to_string_lossy().to_string();

        let setup = GameSetup { width: 9, height: 9, player_count: 2, my_id: 0 };
        let state = TurnInput {
            players: vec![
                Player { id: 0, coord: Coord::new(0, 4), walls_left: 10, alive: true, goal: Direction::Right },
                Player { id: 1, coord: Coord::new(8, 4), walls_left: 9, alive: true, goal: Direction::Left },
            ],
            walls: vec![Wall::vertical(4, 4)],
        };

        let mut logger = DebugLogger::new(true, &path_str);
        assert!(logger.is_enabled());
        logger.log_turn(1, &setup, &state, false, "RIGHT");
        drop(logger);

        let contents = fs::read_to_string(&path).unwrap();
        let entry: LogEntry = serde_json::from_str(contents.lines().next().unwrap()).unwrap();
        assert_eq!(entry.turn, 1);
        assert_eq!(entry.setup, setup);
        assert_eq!(entry.state, state);
        assert_eq!(entry.decision, "RIGHT");
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_disabled_logger_is_noop() {
        let mut logger = DebugLogger::disabled();
        assert!(!logger.is_enabled());
        let setup = GameSetup { width: 9, height: 9, player_count: 2, my_id: 0 };
        logger.log_turn(1, &setup, &TurnInput { players: vec![], walls: vec![] }, false, "UP");
    }
}
