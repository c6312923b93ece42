use crate::{Error, Result};
use agpulse_types::SourceKind;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Resolve the workspace data directory path based on priority:
/// 1. Explicit path (with tilde expansion)
/// 2. AGPULSE_PATH environment variable (with tilde expansion)
/// 3. XDG data directory (recommended default)
/// 4. ~/.agpulse (fallback for systems without XDG)
pub fn resolve_workspace_path(explicit_path: Option<&str>) -> Result<PathBuf> {
    if let Some(path) = explicit_path {
        return Ok(expand_tilde(path));
    }

    if let Ok(env_path) = std::env::var("AGPULSE_PATH") {
        return Ok(expand_tilde(&env_path));
    }

    if let Some(data_dir) = dirs::data_dir() {
        return Ok(data_dir.join("agpulse"));
    }

    if let Some(home) = std::env::var_os("HOME") {
        return Ok(PathBuf::from(home).join(".agpulse"));
    }

    Err(Error::Config(
        "Could not determine workspace path: no HOME directory or XDG data directory found"
            .to_string(),
    ))
}

/// Expand tilde (~) in paths to the user's home directory
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/")
        && let Some(home) = std::env::var_os("HOME")
    {
        return PathBuf::from(home).join(stripped);
    }
    PathBuf::from(path)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub enabled: bool,
    pub log_root: PathBuf,
}

/// Reporting window lengths in days. The snapshot's `window_7d` and
/// `window_30d` keys stay fixed; these only move the boundaries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    #[serde(default = "default_active_days")]
    pub active_days: i64,
    #[serde(default = "default_history_days")]
    pub history_days: i64,
}

fn default_active_days() -> i64 {
    7
}

fn default_history_days() -> i64 {
    30
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            active_days: default_active_days(),
            history_days: default_history_days(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Directory whose direct children are git checkouts. Unset means no
    /// commit scanning.
    #[serde(default)]
    pub repos_dir: Option<PathBuf>,

    /// Only count commits whose author name or email contains this string.
    #[serde(default)]
    pub author: Option<String>,

    /// Repository names left out of the snapshot entirely. Sessions that
    /// resolve to one of these lose their attribution but still count in
    /// the global totals.
    #[serde(default)]
    pub excluded_repos: Vec<String>,

    #[serde(default)]
    pub windows: WindowConfig,

    /// Per-source settings, keyed by source name. A source absent here
    /// runs enabled at its default storage path.
    #[serde(default)]
    pub sources: HashMap<String, SourceConfig>,
}

impl Config {
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path(data_dir: &Path) -> PathBuf {
        data_dir.join("config.toml")
    }

    /// Probe the machine for installed tools and a conventional checkout
    /// root, and return a config describing what was found.
    pub fn detect() -> Self {
        let mut sources = HashMap::new();
        for (kind, path) in agpulse_providers::get_default_log_paths() {
            if path.exists() {
                sources.insert(
                    kind.name().to_string(),
                    SourceConfig {
                        enabled: true,
                        log_root: path,
                    },
                );
            }
        }

        let repos_dir = dirs::home_dir()
            .map(|home| home.join("git"))
            .filter(|dir| dir.is_dir());

        Config {
            repos_dir,
            sources,
            ..Config::default()
        }
    }

    /// Reject window settings the aggregation cannot honor. This is the
    /// only class of problem that fails a run instead of degrading it.
    pub fn validate(&self) -> Result<()> {
        if self.windows.active_days < 1 {
            return Err(Error::Config(format!(
                "windows.active_days must be at least 1, got {}",
                self.windows.active_days
            )));
        }
        if self.windows.history_days < 1 {
            return Err(Error::Config(format!(
                "windows.history_days must be at least 1, got {}",
                self.windows.history_days
            )));
        }
        if self.windows.active_days > self.windows.history_days {
            return Err(Error::Config(format!(
                "windows.active_days ({}) cannot exceed windows.history_days ({})",
                self.windows.active_days, self.windows.history_days
            )));
        }
        Ok(())
    }

    /// The effective (enabled, log root) pair for one source, falling back
    /// to defaults when the config does not mention it.
    pub fn source_settings(&self, kind: SourceKind) -> (bool, Option<PathBuf>) {
        match self.sources.get(kind.name()) {
            Some(source) => {
                let root = source
                    .log_root
                    .to_str()
                    .map(expand_tilde)
                    .unwrap_or_else(|| source.log_root.clone());
                (source.enabled, Some(root))
            }
            None => (true, agpulse_providers::default_log_path(kind)),
        }
    }

    pub fn repos_dir_expanded(&self) -> Option<PathBuf> {
        self.repos_dir
            .as_ref()
            .map(|dir| match dir.to_str() {
                Some(text) => expand_tilde(text),
                None => dir.clone(),
            })
    }

    pub fn set_source(&mut self, kind: SourceKind, source: SourceConfig) {
        self.sources.insert(kind.name().to_string(), source);
    }
}
