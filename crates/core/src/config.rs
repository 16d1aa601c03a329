use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{LogsiftError, Result};
use crate::filter::FilePattern;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub log_dir: PathBuf,
    pub file_pattern: Option<String>,
    pub http_addr: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("Logs"),
            file_pattern: None,
            http_addr: "127.0.0.1:5080".to_string(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let mut cfg = Self::default();
        let config_path = config_file_path();
        if let Some(file_overrides) = load_file_overrides(&config_path)? {
            apply_overrides(&mut cfg, file_overrides, "config file")?;
        }
        let env_overrides = load_env_overrides();
        apply_overrides(&mut cfg, env_overrides, "environment")?;
        Ok(cfg)
    }

    pub fn file_pattern(&self) -> Result<Option<FilePattern>> {
        self.file_pattern.as_deref().map(FilePattern::parse).transpose()
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigOverrides {
    log_dir: Option<PathBuf>,
    file_pattern: Option<String>,
    http_addr: Option<String>,
}

fn config_file_path() -> PathBuf {
    if let Ok(path) = env::var("LOGSIFT_CONFIG") {
        return PathBuf::from(path);
    }

    let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
    let config_home = env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(home).join(".config"));
    config_home.join("logsift/config.toml")
}

fn load_file_overrides(path: &Path) -> Result<Option<ConfigOverrides>> {
    if !path.exists() {
        return Ok(None);
    }

    let raw = fs::read_to_string(path)
        .map_err(|e| LogsiftError::Config(format!("failed reading {}: {e}", path.display())))?;
    let parsed: ConfigOverrides = toml::from_str(&raw)
        .map_err(|e| LogsiftError::Config(format!("failed parsing {}: {e}", path.display())))?;
    Ok(Some(parsed))
}

fn load_env_overrides() -> ConfigOverrides {
    ConfigOverrides {
        log_dir: env::var("LOGSIFT_LOG_DIR").ok().map(PathBuf::from),
        file_pattern: env::var("LOGSIFT_FILE_PATTERN").ok(),
        http_addr: env::var("LOGSIFT_HTTP_ADDR").ok(),
    }
}

fn apply_overrides(cfg: &mut Config, overrides: ConfigOverrides, source: &str) -> Result<()> {
    if let Some(v) = overrides.log_dir {
        cfg.log_dir = v;
    }
    if let Some(v) = overrides.file_pattern {
        FilePattern::parse(&v).map_err(|e| {
            LogsiftError::Config(format!("bad file_pattern in {source}: {e} (value={v})"))
        })?;
        cfg.file_pattern = Some(v);
    }
    if let Some(v) = overrides.http_addr {
        if v.trim().is_empty() {
            return Err(LogsiftError::Config(format!(
                "bad http_addr in {source}: address cannot be empty"
            )));
        }
        cfg.http_addr = v;
    }
    Ok(())
}
