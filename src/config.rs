use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_BUFFER_CAPACITY: usize = 1024;
const DEFAULT_READ_CHUNK_SIZE: usize = 1024;

/// Environment variable naming an optional YAML config file.
pub const CONFIG_FILE_ENV: &str = "RINGFRAME_CONFIG";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub framing: FramingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FramingConfig {
    /// Bytes a connection may hold before a request is framed.
    pub buffer_capacity: usize,
    /// Largest single read from the socket.
    pub read_chunk_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
        }
    }
}

impl Default for FramingConfig {
    fn default() -> Self {
        Self {
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            read_chunk_size: DEFAULT_READ_CHUNK_SIZE,
        }
    }
}

impl Config {
    /// Builds the runtime config.
    ///
    /// Starts from the YAML file named by `RINGFRAME_CONFIG` (or the defaults),
    /// then applies the `LISTEN`, `RING_CAPACITY` and `READ_CHUNK` overrides.
    pub fn load() -> anyhow::Result<Self> {
        let mut cfg = match std::env::var(CONFIG_FILE_ENV) {
            Ok(path) => Self::from_file(&path)?,
            Err(_) => Self::default(),
        };

        if let Ok(addr) = std::env::var("LISTEN") {
            cfg.server.listen_addr = addr;
        }
        if let Some(capacity) = env_usize("RING_CAPACITY")? {
            cfg.framing.buffer_capacity = capacity;
        }
        if let Some(chunk) = env_usize("READ_CHUNK")? {
            cfg.framing.read_chunk_size = chunk;
        }

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_yaml_str(&raw).with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn from_yaml_str(raw: &str) -> anyhow::Result<Self> {
        let cfg: Self = serde_yaml::from_str(raw).context("failed to parse YAML config")?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.server.listen_addr.trim().is_empty() {
            anyhow::bail!("server.listen_addr must not be empty");
        }
        if self.framing.buffer_capacity == 0 {
            anyhow::bail!("framing.buffer_capacity must be greater than zero");
        }
        if self.framing.read_chunk_size == 0 {
            anyhow::bail!("framing.read_chunk_size must be greater than zero");
        }
        Ok(())
    }
}

fn env_usize(key: &str) -> anyhow::Result<Option<usize>> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("{key} must be an unsigned integer, got {raw:?}")),
        Err(_) => Ok(None),
    }
}
