//! Uploader configuration.
//!
//! Reads `~/.config/resumedrop/config.json` (or the `--config` path), then
//! applies environment overrides for the API address.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use resumedrop_upload::UploadConfig;

const DEFAULT_API_PORT: &str = "8000";

/// Contents of `config.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(flatten)]
    pub upload: UploadConfig,

    /// Preferred UI language, any tag `normalize_locale` understands.
    #[serde(default)]
    pub locale: Option<String>,
}

impl AppConfig {
    /// Loads the config file.
    ///
    /// A missing default file yields defaults. A missing explicit path is an
    /// error. A file that fails to parse is logged and ignored.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let path = default_config_path();
                if !path.exists() {
                    return Ok(Self::default());
                }
                path
            }
        };

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config {}", path.display()))?;
        match serde_json::from_str::<AppConfig>(&content) {
            Ok(config) => {
                tracing::debug!(path = %path.display(), "configuration loaded");
                Ok(config)
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to parse config, using defaults"
                );
                Ok(Self::default())
            }
        }
    }

    /// Applies `RESUMEDROP_API_URL`, falling back to a localhost address on
    /// `RESUMEDROP_API_PORT` when no URL is configured anywhere.
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        let non_blank = |name: &str| var(name).filter(|v| !v.trim().is_empty());

        if let Some(url) = non_blank("RESUMEDROP_API_URL") {
            self.upload.api_base_url = Some(url.trim().trim_end_matches('/').to_string());
            return;
        }

        let configured = self
            .upload
            .api_base_url
            .as_deref()
            .is_some_and(|u| !u.trim().is_empty());
        if !configured {
            let port = non_blank("RESUMEDROP_API_PORT").unwrap_or_else(|| DEFAULT_API_PORT.into());
            self.upload.api_base_url = Some(format!("http://localhost:{}", port.trim()));
        }
    }
}

pub fn default_config_path() -> PathBuf {
    config_base_dir().join("resumedrop").join("config.json")
}

fn config_base_dir() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        let appdata =
            std::env::var("APPDATA").unwrap_or_else(|_| "C:\\Users\\Default\\AppData".into());
        PathBuf::from(appdata)
    }

    #[cfg(not(target_os = "windows"))]
    {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        PathBuf::from(home).join(".config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn env_url_wins_and_is_trimmed() {
        let mut cfg = AppConfig::default();
        cfg.upload.api_base_url = Some("http://from-file".into());
        cfg.apply_env(env(&[("RESUMEDROP_API_URL", "https://api.example.com/")]));
        assert_eq!(
            cfg.upload.api_base_url.as_deref(),
            Some("https://api.example.com")
        );
    }

    #[test]
    fn falls_back_to_localhost_port() {
        let mut cfg = AppConfig::default();
        cfg.apply_env(env(&[]));
        assert_eq!(
            cfg.upload.api_base_url.as_deref(),
            Some("http://localhost:8000")
        );

        let mut cfg = AppConfig::default();
        cfg.apply_env(env(&[("RESUMEDROP_API_PORT", "9100")]));
        assert_eq!(
            cfg.upload.api_base_url.as_deref(),
            Some("http://localhost:9100")
        );
    }

    #[test]
    fn file_url_kept_without_env() {
        let mut cfg = AppConfig::default();
        cfg.upload.api_base_url = Some("http://from-file".into());
        cfg.apply_env(env(&[("RESUMEDROP_API_PORT", "9100")]));
        assert_eq!(cfg.upload.api_base_url.as_deref(), Some("http://from-file"));
    }

    #[test]
    fn loads_partial_file_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{ "max_size_bytes": 1024, "locale": "en", "auto_submit": false }"#,
        )
        .unwrap();

        let cfg = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(cfg.upload.max_size_bytes, 1024);
        assert!(!cfg.upload.auto_submit);
        assert_eq!(cfg.upload.default_model, "gpt-4.1-mini");
        assert_eq!(cfg.locale.as_deref(), Some("en"));
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let cfg = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(cfg.upload, UploadConfig::default());
        assert!(cfg.locale.is_none());
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(AppConfig::load(Some(&dir.path().join("nope.json"))).is_err());
    }
}
