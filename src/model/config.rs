use std::path::Path;

use serde::{Deserialize, Serialize};

/// Settings read from `config.toml` in the data directory. A missing or
/// partial file falls back to defaults field by field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// How long a deleted task stays restorable, in seconds.
    #[serde(default = "default_undo_ttl")]
    pub undo_ttl_secs: u64,
    /// Show creation times next to tasks in list output.
    #[serde(default = "default_true")]
    pub show_times: bool,
}

fn default_undo_ttl() -> u64 {
    300
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Config {
        Config {
            undo_ttl_secs: default_undo_ttl(),
            show_times: default_true(),
        }
    }
}

impl Config {
    /// Load `config.toml` from `dir`. A missing file yields defaults; a file
    /// that does not parse is an error so typos are not silently ignored.
    pub fn load(dir: &Path) -> Result<Config, toml::de::Error> {
        let path = dir.join("config.toml");
        match std::fs::read_to_string(&path) {
            Ok(text) => toml::from_str(&text),
            Err(_) => Ok(Config::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn missing_file_means_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.undo_ttl_secs, 300);
        assert!(config.show_times);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("config.toml"), "undo_ttl_secs = 5\n").unwrap();

        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.undo_ttl_secs, 5);
        assert!(config.show_times);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("config.toml"), "undo_ttl_secs = \"soon\"\n").unwrap();
        assert!(Config::load(dir.path()).is_err());
    }
}
