use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::client::Role;
use crate::error::{Error, Result};
use crate::pager::DEFAULT_PAGE_SIZE;

fn default_base_url() -> String {
    "http://127.0.0.1:3000".into()
}

fn default_role() -> String {
    "user".into()
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

/// `console.toml`. Secrets may be given literally or via the `*_env`
/// indirection naming an environment variable.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    pub base_url: String,
    pub base_url_env: Option<String>,
    pub token: Option<String>,
    pub token_env: Option<String>,
    /// "admin" or "user".
    pub role: String,
    pub page_size: usize,
    pub prefs_path: Option<String>,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            base_url_env: None,
            token: None,
            token_env: None,
            role: default_role(),
            page_size: default_page_size(),
            prefs_path: None,
        }
    }
}

impl ConsoleConfig {
    pub fn resolve_base_url(&self) -> String {
        resolve_string_field(Some(&self.base_url), self.base_url_env.as_deref())
            .unwrap_or_else(default_base_url)
            .trim_end_matches('/')
            .to_string()
    }

    pub fn resolve_token(&self) -> Option<String> {
        resolve_string_field(self.token.as_deref(), self.token_env.as_deref())
    }

    pub fn resolve_role(&self) -> Result<Role> {
        match self.role.trim() {
            "admin" => Ok(Role::Admin),
            "user" | "" => Ok(Role::User),
            other => Err(Error::msg(format!(
                "invalid role '{other}' (expected 'admin' or 'user')"
            ))),
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size.max(1)
    }

    pub fn prefs_path(&self) -> PathBuf {
        match self.prefs_path.as_deref().map(str::trim) {
            Some(p) if !p.is_empty() => PathBuf::from(p),
            _ => crate::prefs::default_path(),
        }
    }
}

/// Missing config file falls back to defaults so `mjc` works against a
/// local gateway with zero setup.
pub fn load(path: &Path) -> Result<ConsoleConfig> {
    if !path.exists() {
        return Ok(ConsoleConfig::default());
    }
    let data = fs::read_to_string(path)
        .map_err(|e| Error::msg(format!("failed to read config {}: {e}", path.display())))?;
    let cfg: ConsoleConfig = toml::from_str(&data)
        .map_err(|e| Error::msg(format!("TOML parse error in {}: {e}", path.display())))?;
    Ok(cfg)
}

fn resolve_env_ref(env_key: Option<&str>) -> Option<String> {
    env_key
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|k| std::env::var(k).ok())
        .map(|v| v.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn resolve_string_field(literal: Option<&str>, env_key: Option<&str>) -> Option<String> {
    let direct = literal
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned);
    direct.or_else(|| resolve_env_ref(env_key))
}
