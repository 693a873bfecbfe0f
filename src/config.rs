use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CATALOG_ENV: &str = "MENTORS_CATALOG";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub catalog_path: Option<PathBuf>,
    pub toast_duration_ms: u64,
    pub default_timezone: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_path: None,
            toast_duration_ms: 5000,
            default_timezone: "ist".to_string(),
        }
    }
}

impl Config {
    /// Loads `config.json` from the user config directory, or defaults if absent.
    pub fn load() -> Result<Self> {
        match project_dirs() {
            Some(dirs) => Self::load_from(&dirs.config_dir().join("config.json")),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    /// Catalog location: CLI flag, then `MENTORS_CATALOG`, then the config file,
    /// then `catalog.json` in the data directory if one exists.
    /// `None` means the built-in sample catalog.
    pub fn catalog_path(&self, cli_override: Option<&Path>) -> Option<PathBuf> {
        let from_env = std::env::var_os(CATALOG_ENV).map(PathBuf::from);
        let from_data_dir = data_dir()
            .map(|dir| dir.join("catalog.json"))
            .filter(|p| p.exists());
        resolve_catalog_path(
            cli_override,
            from_env,
            self.catalog_path.clone(),
            from_data_dir,
        )
    }
}

fn resolve_catalog_path(
    cli_override: Option<&Path>,
    from_env: Option<PathBuf>,
    from_config: Option<PathBuf>,
    from_data_dir: Option<PathBuf>,
) -> Option<PathBuf> {
    cli_override
        .map(Path::to_path_buf)
        .or(from_env)
        .or(from_config)
        .or(from_data_dir)
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("", "", "mentors")
}

pub fn data_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.data_dir().to_path_buf())
}
