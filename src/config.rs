//! Simulation policy knobs, persisted as JSON next to the binary.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// How pairwise body-body contacts are resolved each tick.
///
/// The playground visits every *ordered* pair, so each contact is resolved
/// twice per tick against sequentially-updated positions. That doubled,
/// slightly asymmetric impulse is part of the feel and is the default;
/// `Single` resolves each unordered pair once instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PairResolution {
    #[default]
    Double,
    Single,
}

/// Tunable simulation policy. Physics constants themselves are compiled in
/// (see `crate::consts`); this only carries the knobs that change behavior
/// between runs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Pairwise contact resolution policy
    pub pair_resolution: PairResolution,
    /// Seed for spawn-color picks. 0 means "derive from the clock at
    /// startup"; any other value makes runs with identical inputs replay
    /// identically.
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            pair_resolution: PairResolution::default(),
            seed: 0,
        }
    }
}

impl SimConfig {
    /// Load config from a JSON file, falling back to defaults on any error.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(config) => {
                    log::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    log::warn!("Bad config in {}: {e}; using defaults", path.display());
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("No config at {}; using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Write config as pretty JSON. Failures are logged, never fatal.
    pub fn save(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        match serde_json::to_string_pretty(self) {
            Ok(json) => match fs::write(path, json) {
                Ok(()) => log::info!("Config saved to {}", path.display()),
                Err(e) => log::warn!("Failed to write {}: {e}", path.display()),
            },
            Err(e) => log::warn!("Failed to serialize config: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = SimConfig::load("/nonexistent/ballpit.json");
        assert_eq!(config, SimConfig::default());
        assert_eq!(config.pair_resolution, PairResolution::Double);
    }

    #[test]
    fn config_round_trips_through_json() {
        let path = std::env::temp_dir().join("ballpit_test_config.json");
        let config = SimConfig {
            pair_resolution: PairResolution::Single,
            seed: 42,
        };
        config.save(&path);
        let loaded = SimConfig::load(&path);
        assert_eq!(loaded, config);
        let _ = std::fs::remove_file(&path);
    }
}
