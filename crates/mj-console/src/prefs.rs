use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Small persisted viewer preferences. The gateway keeps the authoritative
/// settings; this only caches what gates pure display decisions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Prefs {
    /// String-typed on purpose: mirrors the gateway option value verbatim.
    pub mj_notify_enabled: String,
}

impl Prefs {
    /// The privileged banner shows until this reads exactly "true".
    pub fn notify_enabled(&self) -> bool {
        self.mj_notify_enabled == "true"
    }
}

pub fn default_path() -> PathBuf {
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home)
            .join(".config")
            .join("mj-console")
            .join("prefs.toml"),
        None => PathBuf::from("mj-console-prefs.toml"),
    }
}

/// Missing or unreadable prefs behave like defaults; prefs are advisory.
pub fn load(path: &Path) -> Prefs {
    let Ok(data) = fs::read_to_string(path) else {
        return Prefs::default();
    };
    toml::from_str(&data).unwrap_or_default()
}

pub fn store(path: &Path, prefs: &Prefs) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            Error::msg(format!(
                "failed to create prefs dir {}: {e}",
                parent.display()
            ))
        })?;
    }
    let body = toml::to_string(prefs)
        .map_err(|e| Error::msg(format!("failed to encode prefs: {e}")))?;
    fs::write(path, body)
        .map_err(|e| Error::msg(format!("failed to write prefs {}: {e}", path.display())))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_means_disabled() {
        let p = load(Path::new("/definitely/not/here/prefs.toml"));
        assert!(!p.notify_enabled());
    }

    #[test]
    fn round_trips_through_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("prefs.toml");
        let prefs = Prefs {
            mj_notify_enabled: "true".into(),
        };
        store(&path, &prefs).expect("store");
        assert!(load(&path).notify_enabled());
    }

    #[test]
    fn only_the_exact_string_true_enables() {
        let p = Prefs {
            mj_notify_enabled: "True".into(),
        };
        assert!(!p.notify_enabled());
    }
}
