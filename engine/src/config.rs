use std::io::ErrorKind;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

/// Engine tuning knobs. Loaded from an optional YAML file; anything missing
/// falls back to the defaults below, which match the original arcade build
/// (480px canvas / 30px cells, 100ms ticks floored at 70ms).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub tile_count: i32,
    pub initial_tick_ms: u64,
    pub min_tick_ms: u64,
    pub fruit_spawn_chance: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tile_count: 16,
            initial_tick_ms: 100,
            min_tick_ms: 70,
            fruit_spawn_chance: 0.005,
        }
    }
}

impl EngineConfig {
    pub fn initial_tick_interval(&self) -> Duration {
        Duration::from_millis(self.initial_tick_ms)
    }

    pub fn min_tick_interval(&self) -> Duration {
        Duration::from_millis(self.min_tick_ms)
    }
}

impl Validate for EngineConfig {
    fn validate(&self) -> Result<(), String> {
        if !(10..=100).contains(&self.tile_count) {
            return Err("Tile count must be between 10 and 100".to_string());
        }
        if !(20..=5000).contains(&self.initial_tick_ms) {
            return Err("Initial tick interval must be between 20ms and 5000ms".to_string());
        }
        if self.min_tick_ms > self.initial_tick_ms {
            return Err("Minimum tick interval cannot exceed the initial interval".to_string());
        }
        if !(0.0..=1.0).contains(&self.fruit_spawn_chance) {
            return Err("Fruit spawn chance must be between 0.0 and 1.0".to_string());
        }
        Ok(())
    }
}

/// Read a config file, treating a missing file as "use defaults" and an
/// unreadable or invalid one as a startup error.
pub fn load_config(path: &str) -> Result<EngineConfig, String> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(EngineConfig::default()),
        Err(err) => return Err(format!("Failed to read config file: {}", err)),
    };

    let config: EngineConfig = serde_yaml_ng::from_str(&content)
        .map_err(|e| format!("Failed to deserialize config: {}", e))?;
    config
        .validate()
        .map_err(|e| format!("Config validation error: {}", e))?;
    Ok(config)
}
