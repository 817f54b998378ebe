//! Configuration management with layered hierarchy

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::sample::DEFAULT_SEED;
use crate::core::store::DEFAULT_LIMIT;

/// Directory holding the project-level config, searched upward from the cwd
pub const PROJECT_DIR: &str = ".dxb";

/// Store location when nothing else is configured
pub const DEFAULT_DATABASE_PATH: &str = "data/dld.db";

/// Store location override
pub const ENV_DATABASE_PATH: &str = "DLD_DATABASE_PATH";

/// Enables or disables falling back to sample data
pub const ENV_SAMPLE_FALLBACK: &str = "DXB_SAMPLE_FALLBACK";

/// DXB configuration with layered hierarchy
#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Path to the SQLite transaction store
    pub database_path: Option<PathBuf>,

    /// Serve sample data when the store is unavailable
    pub sample_fallback: Option<bool>,

    /// Seed for generated sample data
    pub sample_seed: Option<u64>,

    /// Default page size for `dxb tx`
    pub default_limit: Option<usize>,

    /// Default output format
    pub default_format: Option<String>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        let project_config = std::env::current_dir()
            .ok()
            .and_then(|cwd| Self::find_project_config(&cwd));

        let mut config = Self::load_files(Self::global_config_path().as_deref(), project_config.as_deref());
        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    /// Merge the global and project YAML files over the built-in defaults
    pub fn load_files(global: Option<&Path>, project: Option<&Path>) -> Self {
        let mut config = Config::default();

        // Global user config (~/.config/dxb/config.yaml)
        if let Some(other) = global.and_then(Self::read_file) {
            config.merge(other);
        }

        // Project config (.dxb/config.yaml)
        if let Some(other) = project.and_then(Self::read_file) {
            config.merge(other);
        }

        config
    }

    /// Apply environment overrides through `lookup`
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup(ENV_DATABASE_PATH).filter(|p| !p.trim().is_empty()) {
            self.database_path = Some(PathBuf::from(path));
        }
        if let Some(value) = lookup(ENV_SAMPLE_FALLBACK) {
            match parse_bool(&value) {
                Some(flag) => self.sample_fallback = Some(flag),
                None => log::warn!("ignoring {}={:?}: expected true or false", ENV_SAMPLE_FALLBACK, value),
            }
        }
    }

    fn read_file(path: &Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }
        let contents = std::fs::read_to_string(path).ok()?;
        match serde_yml::from_str::<Config>(&contents) {
            Ok(config) => {
                log::debug!("loaded config {}", path.display());
                Some(config)
            }
            Err(e) => {
                log::warn!("ignoring config {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Get the path to the global config file
    fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "dxb")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Nearest `.dxb/config.yaml` at or above `start`
    pub fn find_project_config(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(PROJECT_DIR).join("config.yaml"))
            .find(|path| path.is_file())
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.database_path.is_some() {
            self.database_path = other.database_path;
        }
        if other.sample_fallback.is_some() {
            self.sample_fallback = other.sample_fallback;
        }
        if other.sample_seed.is_some() {
            self.sample_seed = other.sample_seed;
        }
        if other.default_limit.is_some() {
            self.default_limit = other.default_limit;
        }
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
    }

    /// Store path, falling back to `data/dld.db`
    pub fn database_path(&self) -> PathBuf {
        self.database_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_PATH))
    }

    pub fn sample_fallback(&self) -> bool {
        self.sample_fallback.unwrap_or(true)
    }

    pub fn sample_seed(&self) -> u64 {
        self.sample_seed.unwrap_or(DEFAULT_SEED)
    }

    pub fn default_limit(&self) -> usize {
        self.default_limit.filter(|&n| n > 0).unwrap_or(DEFAULT_LIMIT)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.database_path(), PathBuf::from("data/dld.db"));
        assert!(config.sample_fallback());
        assert_eq!(config.sample_seed(), DEFAULT_SEED);
        assert_eq!(config.default_limit(), 20);
    }

    #[test]
    fn test_project_overrides_global() {
        let tmp = TempDir::new().unwrap();
        let global = write(
            tmp.path(),
            "global.yaml",
            "database_path: /srv/dld.db\nsample_seed: 9\n",
        );
        let project = write(tmp.path(), "project.yaml", "database_path: local.db\n");

        let config = Config::load_files(Some(&global), Some(&project));
        assert_eq!(config.database_path(), PathBuf::from("local.db"));
        assert_eq!(config.sample_seed(), 9);
    }

    #[test]
    fn test_bad_yaml_is_skipped() {
        let tmp = TempDir::new().unwrap();
        let global = write(tmp.path(), "global.yaml", "default_limit: 50\n");
        let project = write(tmp.path(), "project.yaml", "default_limit: [not a number\n");

        let config = Config::load_files(Some(&global), Some(&project));
        assert_eq!(config.default_limit(), 50);
    }

    #[test]
    fn test_env_overrides_files() {
        let env: HashMap<&str, &str> = [
            (ENV_DATABASE_PATH, "/tmp/other.db"),
            (ENV_SAMPLE_FALLBACK, "false"),
        ]
        .into_iter()
        .collect();

        let mut config = Config {
            database_path: Some(PathBuf::from("file.db")),
            ..Default::default()
        };
        config.apply_env(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.database_path(), PathBuf::from("/tmp/other.db"));
        assert!(!config.sample_fallback());
    }

    #[test]
    fn test_unparseable_env_flag_ignored() {
        let mut config = Config::default();
        config.apply_env(|key| (key == ENV_SAMPLE_FALLBACK).then(|| "maybe".to_string()));
        assert_eq!(config.sample_fallback, None);
    }

    #[test]
    fn test_find_project_config_walks_up() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir_all(tmp.path().join(".dxb")).unwrap();
        write(&tmp.path().join(".dxb"), "config.yaml", "sample_fallback: false\n");
        let nested = tmp.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        let found = Config::find_project_config(&nested).unwrap();
        assert_eq!(found, tmp.path().join(".dxb").join("config.yaml"));
    }

    #[test]
    fn test_zero_default_limit_ignored() {
        let config = Config {
            default_limit: Some(0),
            ..Default::default()
        };
        assert_eq!(config.default_limit(), 20);
    }
}
