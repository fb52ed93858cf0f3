use std::{
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "roster.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_url: String,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:8000".into(),
            log_filter: "info".into(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    server_url: Option<String>,
    log_filter: Option<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{}': {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse config file '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid server url: {0}")]
    InvalidServerUrl(#[from] shared::error::ClientError),
}

/// Defaults, then the config file, then the process environment.
///
/// A missing file is only an error when it was asked for explicitly.
pub fn load_settings(config_path: Option<&Path>) -> Result<Settings, ConfigError> {
    let mut settings = Settings::default();

    let (path, required) = match config_path {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
    };
    match fs::read_to_string(&path) {
        Ok(raw) => apply_file(&mut settings, &path, &raw)?,
        Err(err) if err.kind() == io::ErrorKind::NotFound && !required => {}
        Err(source) => return Err(ConfigError::Read { path, source }),
    }

    let env: HashMap<String, String> = std::env::vars().collect();
    apply_env(&mut settings, |key| env.get(key).cloned());

    Ok(settings)
}

fn apply_file(settings: &mut Settings, path: &Path, raw: &str) -> Result<(), ConfigError> {
    let file_cfg: FileSettings = toml::from_str(raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    if let Some(v) = file_cfg.server_url {
        settings.server_url = v;
    }
    if let Some(v) = file_cfg.log_filter {
        settings.log_filter = v;
    }
    Ok(())
}

/// `APP__*` names win over the shorter ones.
fn apply_env(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("ROSTER_SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = lookup("APP__SERVER_URL") {
        settings.server_url = v;
    }

    if let Some(v) = lookup("ROSTER_LOG") {
        settings.log_filter = v;
    }
    if let Some(v) = lookup("APP__LOG_FILTER") {
        settings.log_filter = v;
    }
}

impl Settings {
    /// Command-line values take precedence over everything else.
    pub fn with_overrides(
        mut self,
        server_url: Option<String>,
        log_filter: Option<String>,
    ) -> Self {
        if let Some(v) = server_url {
            self.server_url = v;
        }
        if let Some(v) = log_filter {
            self.log_filter = v;
        }
        self
    }

    pub fn validated(mut self) -> Result<Self, ConfigError> {
        self.server_url = client_core::normalize_base_url(&self.server_url)?;
        if self.log_filter.trim().is_empty() {
            self.log_filter = Settings::default().log_filter;
        }
        Ok(self)
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
