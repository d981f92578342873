//! Configuration loading and management

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::state::StateKind;

const DEFAULT_LANGUAGE: &str = "en";
const DEFAULT_PROBE_ADDR: &str = "1.1.1.1:53";
const DEFAULT_PROBE_INTERVAL_SECS: u64 = 30;

/// Assistant configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory for runtime data
    pub data_dir: PathBuf,

    /// Default spoken-language tag, restored after every turn
    pub spoken_language: String,

    /// Audit log file. `None` routes turn records through `tracing`.
    pub log_file: Option<PathBuf>,

    /// State the session starts in
    pub initial_state: StateKind,

    /// Address the connectivity probe connects to
    pub probe_addr: String,

    /// Time between connectivity probes
    pub probe_interval: Duration,
}

impl Config {
    /// Load configuration from environment and defaults
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let home = lookup("HOME").context("HOME is not set")?;
        let data_dir = PathBuf::from(&home)
            .join(".local")
            .join("share")
            .join("emma");

        let spoken_language = lookup("EMMA_LANG")
            .filter(|lang| !lang.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());

        let log_file = match lookup("EMMA_LOG_FILE") {
            Some(path) if path == "-" => None,
            Some(path) => Some(PathBuf::from(path)),
            None => Some(data_dir.join("turns.log")),
        };

        let initial_state = match lookup("EMMA_INITIAL_STATE") {
            Some(name) => name.parse().context("invalid EMMA_INITIAL_STATE")?,
            None => StateKind::Text,
        };

        let probe_addr = lookup("EMMA_PROBE_ADDR").unwrap_or_else(|| DEFAULT_PROBE_ADDR.to_string());

        let probe_interval = match lookup("EMMA_PROBE_INTERVAL_SECS") {
            Some(secs) => {
                let secs: u64 = secs
                    .parse()
                    .with_context(|| format!("invalid EMMA_PROBE_INTERVAL_SECS: {}", secs))?;
                if secs == 0 {
                    bail!("EMMA_PROBE_INTERVAL_SECS must be at least 1");
                }
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_PROBE_INTERVAL_SECS),
        };

        Ok(Self {
            data_dir,
            spoken_language,
            log_file,
            initial_state,
            probe_addr,
            probe_interval,
        })
    }

    /// Ensure data directory exists
    pub fn ensure_dirs(&self) -> Result<()> {
        std::fs::create_dir_all(&self.data_dir)
            .with_context(|| format!("failed to create {}", self.data_dir.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_config_defaults() {
        let config = load(&[("HOME", "/home/ada")]).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/home/ada/.local/share/emma"));
        assert_eq!(config.spoken_language, "en");
        assert_eq!(
            config.log_file,
            Some(PathBuf::from("/home/ada/.local/share/emma/turns.log"))
        );
        assert_eq!(config.initial_state, StateKind::Text);
        assert_eq!(config.probe_addr, "1.1.1.1:53");
        assert_eq!(config.probe_interval, Duration::from_secs(30));
    }

    #[test]
    fn test_config_overrides() {
        let config = load(&[
            ("HOME", "/home/ada"),
            ("EMMA_LANG", "fa"),
            ("EMMA_LOG_FILE", "-"),
            ("EMMA_INITIAL_STATE", "audio"),
            ("EMMA_PROBE_INTERVAL_SECS", "5"),
        ])
        .unwrap();
        assert_eq!(config.spoken_language, "fa");
        assert_eq!(config.log_file, None);
        assert_eq!(config.initial_state, StateKind::Audio);
        assert_eq!(config.probe_interval, Duration::from_secs(5));
    }

    #[test]
    fn test_config_rejects_bad_values() {
        assert!(load(&[]).is_err());
        assert!(load(&[("HOME", "/h"), ("EMMA_INITIAL_STATE", "idle")]).is_err());
        assert!(load(&[("HOME", "/h"), ("EMMA_PROBE_INTERVAL_SECS", "soon")]).is_err());
        assert!(load(&[("HOME", "/h"), ("EMMA_PROBE_INTERVAL_SECS", "0")]).is_err());
    }

    #[test]
    fn test_ensure_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let home = dir.path().to_string_lossy().into_owned();
        let config = load(&[("HOME", home.as_str())]).unwrap();

        config.ensure_dirs().unwrap();
        assert!(config.data_dir.is_dir());
    }
}
