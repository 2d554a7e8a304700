use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

pub const DEFAULT_CONFIG_FILE: &str = "devcommits.toml";
pub const DEFAULT_TABLE: &str = "commits";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

const URL_KEYS: [&str; 3] = ["SUPABASE_URL", "VITE_SUPABASE_URL", "APP__SUPABASE_URL"];
const ANON_KEY_KEYS: [&str; 3] = [
    "SUPABASE_ANON_KEY",
    "VITE_SUPABASE_ANON_KEY",
    "APP__SUPABASE_ANON_KEY",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required setting '{0}'")]
    Missing(&'static str),
    #[error("invalid supabase url '{value}': {reason}")]
    InvalidUrl { value: String, reason: String },
    #[error("failed to read config file '{}': {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse config file '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Raw, partially filled settings collected from file, environment and flags.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct Settings {
    pub supabase_url: Option<String>,
    pub supabase_anon_key: Option<String>,
    pub table: Option<String>,
    pub request_timeout_secs: Option<u64>,
}

impl Settings {
    /// Reads `path`, or `devcommits.toml` when no path is given. Only an
    /// explicitly named file is required to exist.
    pub fn from_file(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };

        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) if !required && err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "config: no settings file");
                return Ok(Self::default());
            }
            Err(source) => return Err(ConfigError::Read { path, source }),
        };

        let settings =
            toml::from_str::<Settings>(&raw).map_err(|source| ConfigError::Parse {
                path: path.clone(),
                source,
            })?;
        info!(path = %path.display(), "config: loaded settings file");
        Ok(settings)
    }

    /// Applies environment overrides. Within each group the later spelling wins.
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        for key in URL_KEYS {
            if let Some(v) = lookup(key) {
                self.supabase_url = Some(v);
            }
        }
        for key in ANON_KEY_KEYS {
            if let Some(v) = lookup(key) {
                self.supabase_anon_key = Some(v);
            }
        }
        if let Some(v) = lookup("APP__TABLE") {
            self.table = Some(v);
        }
        if let Some(v) = lookup("APP__REQUEST_TIMEOUT_SECS") {
            if let Ok(parsed) = v.trim().parse::<u64>() {
                self.request_timeout_secs = Some(parsed);
            }
        }
    }

    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    pub fn apply_overrides(&mut self, supabase_url: Option<String>, anon_key: Option<String>) {
        if supabase_url.is_some() {
            self.supabase_url = supabase_url;
        }
        if anon_key.is_some() {
            self.supabase_anon_key = anon_key;
        }
    }
}

/// Credentials and endpoint the gateway is constructed with.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub supabase_url: Url,
    pub anon_key: String,
    pub table: String,
    pub request_timeout: Duration,
}

impl GatewayConfig {
    pub fn new(supabase_url: &str, anon_key: impl Into<String>) -> Result<Self, ConfigError> {
        Self::from_settings(Settings {
            supabase_url: Some(supabase_url.to_string()),
            supabase_anon_key: Some(anon_key.into()),
            ..Settings::default()
        })
    }

    pub fn from_settings(settings: Settings) -> Result<Self, ConfigError> {
        let raw_url =
            non_blank(settings.supabase_url).ok_or(ConfigError::Missing("supabase_url"))?;
        let anon_key = non_blank(settings.supabase_anon_key)
            .ok_or(ConfigError::Missing("supabase_anon_key"))?;

        Ok(Self {
            supabase_url: normalize_base_url(&raw_url)?,
            anon_key,
            table: non_blank(settings.table).unwrap_or_else(|| DEFAULT_TABLE.to_string()),
            request_timeout: Duration::from_secs(
                settings
                    .request_timeout_secs
                    .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
            ),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn normalize_base_url(raw: &str) -> Result<Url, ConfigError> {
    let mut url = Url::parse(raw).map_err(|err| ConfigError::InvalidUrl {
        value: raw.to_string(),
        reason: err.to_string(),
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidUrl {
            value: raw.to_string(),
            reason: "scheme must be http or https".into(),
        });
    }

    // Relative joins replace the last path segment unless it ends with '/'.
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);
    url.set_fragment(None);

    Ok(url)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
