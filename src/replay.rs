// Replay module for analyzing historical game states and debugging decision-making
//
// This module provides functionality to:
// 1. Parse JSONL debug logs
// 2. Replay the policy on historical states
// 3. Compare recorded vs replayed commands
// 4. Generate analysis reports

use log::{info, warn};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::bot::{Bot, TurnClock};
use crate::config::Config;
use crate::debug_logger::LogEntry;
use crate::handler::validate_turn;
use crate::types::Decision;

/// Result of replaying a single turn
#[derive(Debug, Clone)]
pub struct ReplayResult {
    pub turn: u32,
    pub original: Decision,
    pub replayed: Decision,
    pub matches: bool,
    pub best_score: Option<i64>,
    pub candidates_evaluated: usize,
    pub computation_time_ms: u128,
}

/// Statistics for a complete replay session
#[derive(Debug, Default)]
pub struct ReplayStats {
    pub total_turns: usize,
    pub matches: usize,
    pub mismatches: usize,
    pub match_rate: f64,
}

/// Replay engine for analyzing debug logs
pub struct ReplayEngine {
    config: Config,
    verbose: bool,
}

impl ReplayEngine {
    /// Creates a new replay engine with the given configuration
    pub fn new(config: Config, verbose: bool) -> Self {
        ReplayEngine { config, verbose }
    }

    /// Loads all log entries from a JSONL file
    pub fn load_log_file<P: AsRef<Path>>(&self, log_path: P) -> Result<Vec<LogEntry>, String> {
        let file = File::open(log_path.as_ref())
            .map_err(|e| format!("Failed to open log file: {}", e))?;

        let reader = BufReader::new(file);
        let mut entries = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| format!("Failed to read line {}: {}", line_num + 1, e))?;

            if line.trim().is_empty() {
                continue;
            }

            let entry: LogEntry = serde_json::from_str(&line)
                .map_err(|e| format!("Failed to parse JSON on line {}: {}", line_num + 1, e))?;

            entries.push(entry);
        }

        info!("Loaded {} log entries", entries.len());
        Ok(entries)
    }

    /// Re-runs the policy on a logged turn with the recorded latch and no time limit
    pub fn replay_entry(&self, entry: &LogEntry) -> Result<ReplayResult, String> {
        if self.verbose {
            info!("Replaying turn {}...", entry.turn);
        }

        let original = Decision::parse(&entry.decision)?;
        validate_turn(&entry.setup, &entry.state)
            .map_err(|e| format!("Turn {}: {}", entry.turn, e))?;

        let mut bot = Bot::new(self.config.clone(), entry.setup)?;
        bot.set_stay_aggressive(entry.stay_aggressive);
        let report = bot.decide(&entry.state, &TurnClock::unlimited());

        let replayed = report.decision;
        let matches = original == replayed;

        if self.verbose {
            if matches {
                info!(
                    "Turn {}: ✓ MATCH - {} (score: {:?}, candidates: {}, time: {}ms)",
                    entry.turn,
                    replayed.to_command(),
                    report.best_score,
                    report.candidates_evaluated,
                    report.elapsed_ms
                );
            } else {
                warn!(
                    "Turn {}: ✗ MISMATCH - Original: {}, Replayed: {} (score: {:?}, candidates: {}, time: {}ms)",
                    entry.turn,
                    original.to_command(),
                    replayed.to_command(),
                    report.best_score,
                    report.candidates_evaluated,
                    report.elapsed_ms
                );
            }
        }

        Ok(ReplayResult {
            turn: entry.turn,
            original,
            replayed,
            matches,
            best_score: report.best_score,
            candidates_evaluated: report.candidates_evaluated,
            computation_time_ms: report.elapsed_ms,
        })
    }

    /// Replays all entries in a log file
    pub fn replay_all(&self, entries: &[LogEntry]) -> Vec<ReplayResult> {
        let mut results = Vec::new();

        for entry in entries {
            match self.replay_entry(entry) {
                Ok(result) => results.push(result),
                Err(e) => {
                    warn!("Failed to replay turn {}: {}", entry.turn, e);
                }
            }
        }

        results
    }

    /// Replays specific turns from a log file
    pub fn replay_turns(
        &self,
        entries: &[LogEntry],
        turn_numbers: &[u32],
    ) -> Result<Vec<ReplayResult>, String> {
        let mut results = Vec::new();

        for turn_num in turn_numbers {
            let entry = entries
                .iter()
                .find(|e| e.turn == *turn_num)
                .ok_or_else(|| format!("Turn {} not found in log file", turn_num))?;

            match self.replay_entry(entry) {
                Ok(result) => results.push(result),
                Err(e) => {
                    warn!("Failed to replay turn {}: {}", turn_num, e);
                }
            }
        }

        Ok(results)
    }

    /// Generates statistics from replay results
    pub fn generate_stats(&self, results: &[ReplayResult]) -> ReplayStats {
        let total_turns = results.len();
        let matches = results.iter().filter(|r| r.matches).count();
        let mismatches = total_turns - matches;
        let match_rate = if total_turns > 0 {
            (matches as f64 / total_turns as f64) * 100.0
        } else {
            0.0
        };

        ReplayStats {
            total_turns,
            matches,
            mismatches,
            match_rate,
        }
    }

    /// Prints a detailed report of replay results
    pub fn print_report(&self, results: &[ReplayResult]) {
        let stats = self.generate_stats(results);

        println!("\n═══════════════════════════════════════════════════════════");
        println!("                    REPLAY REPORT");
        println!("═══════════════════════════════════════════════════════════");
        println!("Total Turns:    {}", stats.total_turns);
        println!("Matches:        {} ({:.1}%)", stats.matches, stats.match_rate);
        println!("Mismatches:     {}", stats.mismatches);
        println!("═══════════════════════════════════════════════════════════\n");

        if !results.is_empty() {
            let avg_time: f64 = results.iter().map(|r| r.computation_time_ms as f64).sum::<f64>()
                / results.len() as f64;
            let avg_candidates: f64 = results
                .iter()
                .map(|r| r.candidates_evaluated as f64)
                .sum::<f64>()
                / results.len() as f64;

            println!("Average Candidates Evaluated: {:.1}", avg_candidates);
            println!("Average Computation Time:     {:.1}ms\n", avg_time);
        }

        let mismatches: Vec<_> = results.iter().filter(|r| !r.matches).collect();
        if !mismatches.is_empty() {
            println!("═══════════════════════════════════════════════════════════");
            println!("                  DETAILED MISMATCHES");
            println!("═══════════════════════════════════════════════════════════");

            for result in mismatches {
                println!(
                    "Turn {}: {} → {} (score: {:?}, candidates: {}, time: {}ms)",
                    result.turn,
                    result.original.to_command(),
                    result.replayed.to_command(),
                    result.best_score,
                    result.candidates_evaluated,
                    result.computation_time_ms
                );
            }
            println!();
        }
    }

    /// Validates that specific expected commands were recorded
    pub fn validate_expected_moves(
        &self,
        entries: &[LogEntry],
        expected: &[(u32, Vec<Decision>)], // (turn, acceptable decisions)
    ) -> Result<(), String> {
        for (turn, acceptable) in expected {
            let entry = entries
                .iter()
                .find(|e| e.turn == *turn)
                .ok_or_else(|| format!("Turn {} not found in log", turn))?;

            let actual = Decision::parse(&entry.decision)?;

            if !acceptable.contains(&actual) {
                return Err(format!(
                    "Turn {}: Expected one of {:?}, but got {}",
                    turn,
                    acceptable.iter().map(|d| d.to_command()).collect::<Vec<_>>(),
                    actual.to_command()
                ));
            }
        }

        Ok(())
    }
}
