use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::SenpaiError;
use crate::models::WatchStatus;

const DEFAULT_CONFIG: &str = include_str!("../../../config/default.toml");

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub storage: StorageConfig,
    pub thresholds: Thresholds,
    pub closer: CloserConfig,
    pub features: FeaturesConfig,
    /// Keyword → handler bindings, the command descriptor table.
    pub commands: BTreeMap<String, CommandBinding>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub anilist_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: String,
    pub identity_file: String,
    pub credential_file: String,
    pub compare_dump: String,
    pub close_list: String,
    pub status_files: StatusFileNames,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusFileNames {
    pub watching: String,
    pub on_hold: String,
    pub dropped: String,
    pub plan_to_watch: String,
    pub completed: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thresholds {
    /// Similarity ratio above which two titles count as the same show.
    pub similarity: f64,
    /// Unseen-title count at which the comparison offers a dump file.
    pub compare_overflow: usize,
    pub recommendation_score: u32,
    /// Opening + ending minutes deducted per episode.
    pub intro_outro_minutes: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloserConfig {
    pub max_passes: u32,
    pub default_processes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeaturesConfig {
    /// Handler identifiers that may be dispatched to.
    pub enabled: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandBinding {
    pub handler: String,
    #[serde(default)]
    pub description: String,
}

impl AppConfig {
    /// Load config: the user file (explicit path or the platform default)
    /// merged table-by-table over the built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, SenpaiError> {
        let mut merged: toml::Value =
            toml::from_str(DEFAULT_CONFIG).map_err(|e| SenpaiError::Config(e.to_string()))?;

        let user_path = match explicit {
            Some(path) if !path.exists() => {
                return Err(SenpaiError::Config(format!(
                    "config file {} does not exist",
                    path.display()
                )));
            }
            Some(path) => Some(path.to_path_buf()),
            None => Some(Self::config_path()).filter(|p| p.exists()),
        };

        if let Some(path) = user_path {
            tracing::debug!(path = %path.display(), "loading user config");
            let user_str = std::fs::read_to_string(&path)?;
            let user: toml::Value =
                toml::from_str(&user_str).map_err(|e| SenpaiError::Config(e.to_string()))?;
            merge(&mut merged, user);
        }

        merged
            .try_into()
            .map_err(|e: toml::de::Error| SenpaiError::Config(e.to_string()))
    }

    /// Path to user config file (XDG on Linux, AppData on Windows).
    pub fn config_path() -> PathBuf {
        project_dirs()
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }

    /// Resolve the data directory: explicit override, then `storage.data_dir`,
    /// then the platform data directory.
    pub fn data_dir(&self, override_dir: Option<&Path>) -> PathBuf {
        if let Some(dir) = override_dir {
            return dir.to_path_buf();
        }
        if !self.storage.data_dir.trim().is_empty() {
            return PathBuf::from(self.storage.data_dir.trim());
        }
        project_dirs()
            .map(|d| d.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn is_enabled(&self, handler: &str) -> bool {
        self.features.enabled.iter().any(|h| h == handler)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("built-in default config is valid TOML")
    }
}

/// Absolute locations of every local file, resolved once at startup.
#[derive(Debug, Clone)]
pub struct DataPaths {
    pub root: PathBuf,
    pub identity: PathBuf,
    pub credential: PathBuf,
    pub compare_dump: PathBuf,
    pub close_list: PathBuf,
    watching: PathBuf,
    on_hold: PathBuf,
    dropped: PathBuf,
    plan_to_watch: PathBuf,
    completed: PathBuf,
}

impl DataPaths {
    pub fn resolve(config: &AppConfig, root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let s = &config.storage;
        let files = &s.status_files;
        Self {
            identity: root.join(&s.identity_file),
            credential: root.join(&s.credential_file),
            compare_dump: root.join(&s.compare_dump),
            close_list: root.join(&s.close_list),
            watching: root.join(&files.watching),
            on_hold: root.join(&files.on_hold),
            dropped: root.join(&files.dropped),
            plan_to_watch: root.join(&files.plan_to_watch),
            completed: root.join(&files.completed),
            root,
        }
    }

    /// Create the data directory if needed.
    pub fn ensure(&self) -> Result<(), SenpaiError> {
        std::fs::create_dir_all(&self.root)?;
        Ok(())
    }

    pub fn status_file(&self, status: WatchStatus) -> &Path {
        match status {
            WatchStatus::Watching => &self.watching,
            WatchStatus::OnHold => &self.on_hold,
            WatchStatus::Dropped => &self.dropped,
            WatchStatus::PlanToWatch => &self.plan_to_watch,
            WatchStatus::Completed => &self.completed,
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "senpai")
}

/// Recursively overlay `overlay` onto `base`; tables merge, everything else replaces.
fn merge(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base), toml::Value::Table(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses() {
        let config = AppConfig::default();
        assert_eq!(config.api.anilist_url, "https://graphql.anilist.co");
        assert_eq!(config.thresholds.compare_overflow, 21);
        assert_eq!(config.thresholds.recommendation_score, 65);
        assert!((config.thresholds.similarity - 0.8).abs() < f64::EPSILON);
        assert_eq!(config.commands["-ulist"].handler, "sync");
    }

    #[test]
    fn test_every_binding_is_enabled_by_default() {
        let config = AppConfig::default();
        for (keyword, binding) in &config.commands {
            assert!(
                config.is_enabled(&binding.handler),
                "{keyword} is bound to disabled handler {}",
                binding.handler
            );
        }
    }

    #[test]
    fn test_user_file_overlays_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
            [thresholds]
            compare_overflow = 5

            [commands]
            "-s" = { handler = "search", description = "short search" }
            "#,
        )
        .unwrap();

        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.thresholds.compare_overflow, 5);
        // Untouched keys keep their defaults.
        assert_eq!(config.thresholds.recommendation_score, 65);
        assert_eq!(config.commands["-s"].handler, "search");
        assert_eq!(config.commands["-search"].handler, "search");
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(matches!(
            AppConfig::load(Some(&missing)),
            Err(SenpaiError::Config(_))
        ));
    }

    #[test]
    fn test_data_dir_precedence() {
        let mut config = AppConfig::default();
        config.storage.data_dir = "/from/config".into();
        assert_eq!(
            config.data_dir(Some(Path::new("/from/flag"))),
            PathBuf::from("/from/flag")
        );
        assert_eq!(config.data_dir(None), PathBuf::from("/from/config"));
    }

    #[test]
    fn test_status_file_paths() {
        let config = AppConfig::default();
        let paths = DataPaths::resolve(&config, "/data");
        assert_eq!(
            paths.status_file(WatchStatus::Completed),
            Path::new("/data/watched_anime.txt")
        );
        assert_eq!(
            paths.status_file(WatchStatus::Watching),
            Path::new("/data/currently_watching.txt")
        );
    }
}
