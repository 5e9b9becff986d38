//! Engine configuration
//!
//! All tunable parameters in one place. Loaded from TOML at startup,
//! falls back to defaults if no config file exists.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Capacity limits of the bounded data structures.
    pub capacity: CapacityConfig,
    /// Temporal reasoning parameters.
    pub temporal: TemporalConfig,
    /// Decision-making and motor parameters.
    pub decision: DecisionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CapacityConfig {
    /// Events retained in each event queue, oldest evicted first.
    pub fifo_size: usize,
    /// Implications retained per table, weakest evicted first.
    pub table_size: usize,
    /// Concepts retained in memory, least recently used evicted first.
    pub concept_capacity: usize,
    /// Registered operations (one implication table per operation, plus one
    /// for implications with no operation).
    pub max_operations: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TemporalConfig {
    /// Longest compound sequence formed from consecutive events.
    pub max_sequence_len: usize,
    /// Max cycles between an operation and its outcome for a procedural
    /// implication to be induced.
    pub event_horizon: u64,
    /// Extra cycles granted past an implication's learned delay before an
    /// unconfirmed anticipation counts as a failure.
    pub anticipation_grace: u64,
    /// Confidence of the negative evidence applied when an anticipation
    /// expires unconfirmed.
    pub anticipation_confidence: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionConfig {
    /// Minimum expectation for a procedural implication to trigger
    /// execution of its operation.
    pub decision_threshold: f64,
    /// Probability of executing a random operation when no learned
    /// implication reaches the threshold.
    pub motor_babbling_chance: f64,
    /// Best implications considered per table during subgoal derivation.
    pub subgoal_branch: usize,
    /// Max depth of subgoal derivation from an unreachable goal.
    pub max_subgoal_depth: usize,
    /// Seed for the babbling RNG, fixed for reproducible runs.
    pub rng_seed: u64,
}

// ============================================================
// Defaults
// ============================================================

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: CapacityConfig::default(),
            temporal: TemporalConfig::default(),
            decision: DecisionConfig::default(),
        }
    }
}

impl Default for CapacityConfig {
    fn default() -> Self {
        Self {
            fifo_size: 32,
            table_size: 32,
            concept_capacity: 256,
            max_operations: 10,
        }
    }
}

impl Default for TemporalConfig {
    fn default() -> Self {
        Self {
            max_sequence_len: 3,
            event_horizon: 20,
            anticipation_grace: 8,
            anticipation_confidence: 0.02,
        }
    }
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self {
            decision_threshold: 0.501,
            motor_babbling_chance: 0.2,
            subgoal_branch: 3,
            max_subgoal_depth: 4,
            rng_seed: 1337,
        }
    }
}

// ============================================================
// Loading
// ============================================================

impl Config {
    /// Load config from a TOML file, falling back to defaults.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse {}: {} — using defaults", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => {
                tracing::info!("No config at {} — using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Write the current config as TOML (for generating a default config file).
    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_default()
    }

    /// Disable random motor exploration; useful for deterministic tests.
    pub fn without_babbling(mut self) -> Self {
        self.decision.motor_babbling_chance = 0.0;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_consistent() {
        let c = Config::default();
        assert_eq!(c.capacity.fifo_size, 32);
        assert_eq!(c.temporal.max_sequence_len, 3);
        assert!(c.decision.decision_threshold > 0.5);
        assert_eq!(c.without_babbling().decision.motor_babbling_chance, 0.0);
    }

    #[test]
    fn partial_toml_keeps_defaults_elsewhere() {
        let c: Config = toml::from_str("[decision]\nmotor_babbling_chance = 0.5\n")
            .expect("partial config parses");
        assert_eq!(c.decision.motor_babbling_chance, 0.5);
        assert_eq!(c.capacity.fifo_size, 32);
        assert_eq!(c.temporal.event_horizon, 20);
    }

    #[test]
    fn config_round_trips_through_toml() {
        let c = Config::default();
        let parsed: Config = toml::from_str(&c.to_toml()).expect("generated toml parses");
        assert_eq!(parsed.decision.rng_seed, c.decision.rng_seed);
    }
}
