use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use thiserror::Error;

use crate::constants::*;
use crate::world::generator::WorldType;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Encoding error: {0}")]
    Encode(#[from] bincode::Error),
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct EngineConfig {
    #[serde(default)]
    pub world: WorldConfig,
    #[serde(default)]
    pub streaming: StreamingConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct WorldConfig {
    /// Seed string; numeric strings are used verbatim, anything else is
    /// hashed. Empty means pick a random seed at startup.
    pub seed: String,
    pub world_type: WorldType,
    pub day_length_secs: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: String::new(),
            world_type: WorldType::Default,
            day_length_secs: DEFAULT_DAY_LENGTH_SECS,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StreamingConfig {
    pub view_radius: i32,
    pub initial_radius: i32,
    pub budget_ms: u64,
    pub max_dirty_per_tick: usize,
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            view_radius: DEFAULT_VIEW_RADIUS,
            initial_radius: DEFAULT_INITIAL_RADIUS,
            budget_ms: DEFAULT_TICK_BUDGET_MS,
            max_dirty_per_tick: DEFAULT_MAX_DIRTY_PER_TICK,
        }
    }
}

pub fn save_config<P: AsRef<Path>>(path: P, config: &EngineConfig) -> Result<(), ConfigError> {
    let encoded = bincode::serialize(config)?;
    let mut file = File::create(path)?;
    file.write_all(&encoded)?;
    Ok(())
}

/// Loads the config, falling back to defaults when the file is missing or
/// unreadable rather than failing startup.
pub fn load_config<P: AsRef<Path>>(path: P) -> EngineConfig {
    match try_load(path.as_ref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Could not read config ({}), using defaults", e);
            EngineConfig::default()
        }
    }
}

fn try_load(path: &Path) -> Result<EngineConfig, ConfigError> {
    let mut file = File::open(path)?;
    let mut encoded = Vec::new();
    file.read_to_end(&mut encoded)?;
    Ok(bincode::deserialize(&encoded)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_constants() {
        let config = EngineConfig::default();
        assert_eq!(config.streaming.view_radius, DEFAULT_VIEW_RADIUS);
        assert_eq!(config.streaming.budget_ms, DEFAULT_TICK_BUDGET_MS);
        assert!(config.world.seed.is_empty());
        assert_eq!(config.world.world_type, WorldType::Default);
    }

    #[test]
    fn test_config_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.bin");

        let mut config = EngineConfig::default();
        config.world.seed = "glacier".to_string();
        config.world.world_type = WorldType::Amplified;
        config.streaming.view_radius = 3;

        save_config(&path, &config).unwrap();
        let loaded = load_config(&path);
        assert_eq!(loaded.world.seed, "glacier");
        assert_eq!(loaded.world.world_type, WorldType::Amplified);
        assert_eq!(loaded.streaming.view_radius, 3);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let loaded = load_config("/nonexistent/engine.bin");
        assert_eq!(loaded.streaming.view_radius, DEFAULT_VIEW_RADIUS);
    }
}
