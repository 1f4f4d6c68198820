use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Worker count used when neither the CLI nor the config file says otherwise.
pub const DEFAULT_THREADS: usize = 2;

/// Name used when the URL has no usable final path segment.
pub const DEFAULT_FALLBACK_FILENAME: &str = "downloaded_file";

/// Global configuration loaded from `~/.config/mtdl/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MtdlConfig {
    /// Number of range workers when `--threads` is not given.
    pub default_threads: usize,
    /// Output name when `--name` is absent and the URL path yields nothing.
    pub fallback_filename: String,
    /// Follow HTTP redirects on the probe and on every range request.
    pub follow_redirects: bool,
    /// Optional `User-Agent` header sent with every request.
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Optional curl receive buffer size in bytes (None = libcurl default).
    #[serde(default)]
    pub buffer_size: Option<usize>,
    /// Optional total receive cap in bytes per second, split evenly across workers.
    #[serde(default)]
    pub max_bytes_per_sec: Option<u64>,
}

impl Default for MtdlConfig {
    fn default() -> Self {
        Self {
            default_threads: DEFAULT_THREADS,
            fallback_filename: DEFAULT_FALLBACK_FILENAME.to_string(),
            follow_redirects: true,
            user_agent: None,
            buffer_size: None,
            max_bytes_per_sec: None,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("mtdl")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<MtdlConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = MtdlConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: MtdlConfig = toml::from_str(&data)?;
    if cfg.default_threads == 0 {
        anyhow::bail!("{}: default_threads must be at least 1", path.display());
    }
    Ok(cfg)
}
