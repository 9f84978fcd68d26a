// Configuration module for reading Escape.toml
// Holds the time budget, the policy thresholds and the wall scoring weights

use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Main configuration structure containing all tunable parameters
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Config {
    pub timing: TimingConfig,
    pub policy: PolicyConfig,
    pub scoring: ScoringConfig,
    pub protocol: ProtocolConfig,
    pub debug: DebugConfig,
}

/// Per-turn time budget
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct TimingConfig {
    pub turn_budget_ms: u64,
    pub first_turn_budget_ms: u64,
    pub safety_margin_ms: u64,
}

impl TimingConfig {
    /// Computes the effective computation budget for a turn
    pub fn effective_budget_ms(&self, first_turn: bool) -> u64 {
        let budget = if first_turn {
            self.first_turn_budget_ms
        } else {
            self.turn_budget_ms
        };
        budget.saturating_sub(self.safety_margin_ms)
    }
}

/// Gating thresholds for attempting a wall.
/// These are heuristic constants, not derived quantities.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct PolicyConfig {
    /// Walls are considered once the leader is strictly closer than this
    pub leader_distance_threshold: u32,
    /// ...and the last-placed live player is strictly farther than this
    pub trailing_distance_threshold: u32,
}

/// Weights of the wall score: leader * L - self * S + other * O
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ScoringConfig {
    pub leader_weight: i64,
    pub self_weight: i64,
    pub other_weight: i64,
}

/// Output formatting
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ProtocolConfig {
    /// Optional comment appended to every command
    pub move_message: Option<String>,
}

/// Debug configuration
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct DebugConfig {
    pub enabled: bool,
    pub log_file_path: String,
}

impl Config {
    /// Loads configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the Escape.toml configuration file
    ///
    /// # Returns
    /// * `Result<Config, String>` - Parsed configuration or error message
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let contents = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, String> {
        toml::from_str(contents).map_err(|e| format!("Failed to parse config file: {}", e))
    }

    /// Loads default configuration from Escape.toml in the working directory
    pub fn load_default() -> Result<Self, String> {
        Self::from_file("Escape.toml")
    }

    /// Creates a configuration with hardcoded default values as fallback
    /// This should match the constants defined in Escape.toml
    pub fn default_hardcoded() -> Self {
        Config {
            timing: TimingConfig {
                turn_budget_ms: 100,
                first_turn_budget_ms: 1000,
                safety_margin_ms: 15,
            },
            policy: PolicyConfig {
                leader_distance_threshold: 4,
                trailing_distance_threshold: 2,
            },
            scoring: ScoringConfig {
                leader_weight: 100,
                self_weight: 70,
                other_weight: 40,
            },
            protocol: ProtocolConfig { move_message: None },
            debug: DebugConfig {
                enabled: false,
                log_file_path: "great_escape_debug.jsonl".to_string(),
            },
        }
    }

    /// Attempts to load from file, falls back to hardcoded defaults on error
    pub fn load_or_default() -> Self {
        Self::load_default().unwrap_or_else(|e| {
            log::warn!("Could not load Escape.toml ({}), using hardcoded defaults", e);
            Self::default_hardcoded()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_budget_calculation() {
        let config = Config::default_hardcoded();
        assert_eq!(config.timing.effective_budget_ms(false), 85);
        assert_eq!(config.timing.effective_budget_ms(true), 985);
    }

    #[test]
    fn test_escape_toml_matches_hardcoded_defaults() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("Escape.toml");
        let file_config = Config::from_file(path).expect("Escape.toml should be parseable");
        assert_eq!(file_config, Config::default_hardcoded());
    }

    #[test]
    fn test_partial_toml_is_rejected() {
        let result = Config::from_toml_str("[timing]\nturn_budget_ms = 50\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_move_message_is_optional() {
        let toml = r#"
            [timing]
            turn_budget_ms = 50
            first_turn_budget_ms = 500
            safety_margin_ms = 5

            [policy]
            leader_distance_threshold = 3
            trailing_distance_threshold = 1

            [scoring]
            leader_weight = 10
            self_weight = 7
            other_weight = 4

            [protocol]
            move_message = "go go go!"

            [debug]
            enabled = true
            log_file_path = "out.jsonl"
        "#;
        let config = Config::from_toml_str(toml).unwrap();
        assert_eq!(config.protocol.move_message.as_deref(), Some("go go go!"));
        assert_eq!(config.policy.leader_distance_threshold, 3);
        assert!(config.debug.enabled);
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        let result = Config::from_file("nonexistent.toml");
        assert!(result.is_err());
    }
}
