//! Simulator configuration.
//!
//! Values come from built-in defaults, then an optional TOML file, then
//! `MEMSIM_*` environment variables. Invalid environment values are ignored
//! and the previous value is kept.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |---|---|---|
//! | `MEMSIM_MEMORY_SIZE` | unset | Initialize memory with this size at startup |
//! | `MEMSIM_STRATEGY` | first_fit | Placement strategy |
//! | `MEMSIM_L1_SIZE` | 256 | L1 size (bytes) |
//! | `MEMSIM_L1_BLOCK` | 16 | L1 block size (bytes) |
//! | `MEMSIM_L1_ASSOC` | 2 | L1 associativity |
//! | `MEMSIM_L2_SIZE` | 1024 | L2 size (bytes) |
//! | `MEMSIM_L2_BLOCK` | 16 | L2 block size (bytes) |
//! | `MEMSIM_L2_ASSOC` | 4 | L2 associativity |
//! | `MEMSIM_LOG` | warn | Log filter |
//! | `MEMSIM_LOG_FORMAT` | pretty | `pretty` or `json` |
//! | `MEMSIM_LOG_FILE` | unset | Write logs to this file instead of stderr |

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::allocator::Strategy;
use crate::cache::CacheGeometry;
use crate::telemetry::{LogConfig, LogFormat};

pub const DEFAULT_L1: CacheGeometry = CacheGeometry { size: 256, block_size: 16, associativity: 2 };
pub const DEFAULT_L2: CacheGeometry = CacheGeometry { size: 1024, block_size: 16, associativity: 4 };

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Full simulator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimConfig {
    /// Memory size to initialize at startup. `None` waits for `init`.
    pub memory_size: Option<usize>,
    pub strategy: Strategy,
    pub l1: CacheGeometry,
    pub l2: CacheGeometry,
    pub log: LogConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            memory_size: None,
            strategy: Strategy::FirstFit,
            l1: DEFAULT_L1,
            l2: DEFAULT_L2,
            log: LogConfig::default(),
        }
    }
}

/// Parse a `usize` env var, returning `current` on missing or invalid.
fn parse_usize(key: &str, current: usize) -> usize {
    match std::env::var(key) {
        Ok(val) => val.trim().parse::<usize>().unwrap_or(current),
        Err(_) => current,
    }
}

fn load_geometry(prefix: &str, current: CacheGeometry) -> CacheGeometry {
    CacheGeometry {
        size: parse_usize(&format!("{}_SIZE", prefix), current.size),
        block_size: parse_usize(&format!("{}_BLOCK", prefix), current.block_size),
        associativity: parse_usize(&format!("{}_ASSOC", prefix), current.associativity),
    }
}

fn load_log_config(current: LogConfig) -> LogConfig {
    let level = std::env::var("MEMSIM_LOG").unwrap_or(current.level);
    let format = match std::env::var("MEMSIM_LOG_FORMAT").as_deref() {
        Ok("json") => LogFormat::Json,
        Ok("pretty") => LogFormat::Pretty,
        _ => current.format,
    };
    let output_path = std::env::var("MEMSIM_LOG_FILE")
        .ok()
        .map(PathBuf::from)
        .or(current.output_path);
    LogConfig { format, level, output_path }
}

/// Read a TOML config file. Missing keys take their defaults.
pub fn load_file(path: &Path) -> Result<SimConfig, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(toml::from_str(&text)?)
}

/// Overlay `MEMSIM_*` environment variables onto `config`.
pub fn apply_env(config: SimConfig) -> SimConfig {
    let memory_size = std::env::var("MEMSIM_MEMORY_SIZE")
        .ok()
        .and_then(|v| v.trim().parse::<usize>().ok())
        .or(config.memory_size);
    let strategy = std::env::var("MEMSIM_STRATEGY")
        .ok()
        .and_then(|v| v.parse::<Strategy>().ok())
        .unwrap_or(config.strategy);

    SimConfig {
        memory_size,
        strategy,
        l1: load_geometry("MEMSIM_L1", config.l1),
        l2: load_geometry("MEMSIM_L2", config.l2),
        log: load_log_config(config.log),
    }
}

/// Load configuration: defaults, then `path` if given, then environment.
pub fn load(path: Option<&Path>) -> Result<SimConfig, ConfigError> {
    let base = match path {
        Some(path) => load_file(path)?,
        None => SimConfig::default(),
    };
    Ok(apply_env(base))
}

impl SimConfig {
    /// Problems that would make the simulator refuse to start.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.memory_size == Some(0) {
            problems.push("MEMSIM_MEMORY_SIZE must be positive".to_string());
        }
        for (name, geometry) in [("L1", self.l1), ("L2", self.l2)] {
            if let Err(e) = geometry.num_sets() {
                problems.push(format!("{} cache: {}", name, e));
            }
        }
        problems
    }

    /// Effective values keyed by their environment variable names.
    pub fn to_env_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            (
                "MEMSIM_MEMORY_SIZE",
                self.memory_size.map(|s| s.to_string()).unwrap_or_default(),
            ),
            ("MEMSIM_STRATEGY", self.strategy.to_string()),
            ("MEMSIM_L1_SIZE", self.l1.size.to_string()),
            ("MEMSIM_L1_BLOCK", self.l1.block_size.to_string()),
            ("MEMSIM_L1_ASSOC", self.l1.associativity.to_string()),
            ("MEMSIM_L2_SIZE", self.l2.size.to_string()),
            ("MEMSIM_L2_BLOCK", self.l2.block_size.to_string()),
            ("MEMSIM_L2_ASSOC", self.l2.associativity.to_string()),
            ("MEMSIM_LOG", self.log.level.clone()),
            ("MEMSIM_LOG_FORMAT", self.log.format.as_str().to_string()),
            (
                "MEMSIM_LOG_FILE",
                self.log
                    .output_path
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default(),
            ),
        ]
    }
}
