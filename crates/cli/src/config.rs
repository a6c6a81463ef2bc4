use std::path::{Path, PathBuf};

use clap::Args;
use keyward_hasher::{CostConfig, PoolConfig};
use serde::Deserialize;
use thiserror::Error;

/// Top-level configuration, loaded from a TOML file.
///
/// ```toml
/// [scrypt]
/// iteration_count = 32768
/// block_size = 8
/// thread_count = 1
/// hash_prefix = 2
///
/// [pool]
/// max_concurrent = 4
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct KeywardConfig {
    /// Cost parameters for new hashes and the rehash decision.
    #[serde(default)]
    pub scrypt: CostConfig,
    /// Concurrency limit for derivations.
    #[serde(default)]
    pub pool: PoolConfig,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Command-line and environment overrides for individual settings.
///
/// Values given here win over the config file.
#[derive(Args, Debug, Default)]
pub struct Overrides {
    /// scrypt CPU/memory cost N (power of two).
    #[arg(long, env = "KEYWARD_ITERATION_COUNT", global = true)]
    pub iteration_count: Option<u32>,
    /// scrypt block size r.
    #[arg(long, env = "KEYWARD_BLOCK_SIZE", global = true)]
    pub block_size: Option<u32>,
    /// scrypt parallelism p.
    #[arg(long, env = "KEYWARD_THREAD_COUNT", global = true)]
    pub thread_count: Option<u32>,
    /// Outer tag byte for new blobs (decimal or 0x-prefixed hex).
    #[arg(long, env = "KEYWARD_HASH_PREFIX", value_parser = parse_prefix, global = true)]
    pub hash_prefix: Option<u8>,
    /// Maximum concurrent derivations.
    #[arg(long, env = "KEYWARD_MAX_CONCURRENT", global = true)]
    pub max_concurrent: Option<usize>,
}

impl KeywardConfig {
    /// Load from `path`, or use defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    pub fn apply(&mut self, overrides: &Overrides) {
        if let Some(n) = overrides.iteration_count {
            self.scrypt.iteration_count = n;
        }
        if let Some(r) = overrides.block_size {
            self.scrypt.block_size = r;
        }
        if let Some(p) = overrides.thread_count {
            self.scrypt.thread_count = p;
        }
        if let Some(prefix) = overrides.hash_prefix {
            self.scrypt.hash_prefix = prefix;
        }
        if let Some(max) = overrides.max_concurrent {
            self.pool.max_concurrent = max;
        }
    }
}

fn parse_prefix(s: &str) -> Result<u8, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| format!("invalid hash prefix `{s}`: {e}"))
}
