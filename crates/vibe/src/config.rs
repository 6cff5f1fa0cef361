//! Configuration file support for vibe.
//!
//! Two optional TOML files are read: the global `<config_dir>/vibe/config.toml`
//! and a project `vibe.toml` in the working directory. Project values win.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use vibe_forge::DEFAULT_GITHUB_API;
use vibe_git::Identity;
use vibe_llm::GeneratorConfig;

/// Directory under the platform config dir holding the global config
pub const GLOBAL_CONFIG_DIR: &str = "vibe";
pub const GLOBAL_CONFIG_FILE: &str = "config.toml";
/// The project config file name
pub const PROJECT_CONFIG_FILE: &str = "vibe.toml";

/// Contents of either config file; every key is optional
#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Model name, e.g. `gpt-4o-mini`
    pub model: Option<String>,
    /// Base URL of an OpenAI-compatible API
    pub api_base: Option<String>,
    /// Timeout for model and GitHub requests
    pub timeout_secs: Option<u64>,
    /// Remote used for pushes and repository detection
    pub remote: Option<String>,
    /// Append JSON event lines to this file
    pub log_file: Option<PathBuf>,
    /// GitHub REST base URL (GitHub Enterprise)
    pub github_api: Option<String>,
    #[serde(default)]
    pub author: AuthorConfig,
}

/// Fallback commit identity when the repository has none configured
#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct AuthorConfig {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl FileConfig {
    /// Load a config file.
    ///
    /// Returns:
    /// - `Ok(Some(config))` if file exists and parses successfully
    /// - `Ok(None)` if file does not exist
    /// - `Err(...)` if file exists but fails to parse (hard error)
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let config: FileConfig =
            toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))?;

        Ok(Some(config))
    }

    pub fn global_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(GLOBAL_CONFIG_DIR).join(GLOBAL_CONFIG_FILE))
    }

    /// Field-by-field merge; `self` wins where both are set
    fn or(self, fallback: FileConfig) -> FileConfig {
        FileConfig {
            model: self.model.or(fallback.model),
            api_base: self.api_base.or(fallback.api_base),
            timeout_secs: self.timeout_secs.or(fallback.timeout_secs),
            remote: self.remote.or(fallback.remote),
            log_file: self.log_file.or(fallback.log_file),
            github_api: self.github_api.or(fallback.github_api),
            author: AuthorConfig {
                name: self.author.name.or(fallback.author.name),
                email: self.author.email.or(fallback.author.email),
            },
        }
    }
}

/// Fully resolved settings passed to the constructors that need them
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub model: String,
    pub api_base: String,
    pub timeout: Duration,
    pub remote: String,
    pub log_file: Option<PathBuf>,
    pub github_api: String,
    pub identity: Identity,
}

impl Settings {
    /// Read both config files and the environment
    pub fn load(working_dir: &Path) -> Result<Self> {
        let global = match FileConfig::global_path() {
            Some(path) => FileConfig::load(&path).context("Failed to load global configuration")?,
            None => None,
        };
        let project = FileConfig::load(&working_dir.join(PROJECT_CONFIG_FILE))
            .context("Failed to load project configuration")?;

        Ok(Self::resolve(global, project, |key| std::env::var(key).ok()))
    }

    /// Priority: project file > global file > environment > built-in default.
    /// The environment only supplies the author identity.
    pub fn resolve(
        global: Option<FileConfig>,
        project: Option<FileConfig>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let merged = project.unwrap_or_default().or(global.unwrap_or_default());
        let defaults = Identity::default();
        let non_blank = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

        let identity = Identity {
            name: non_blank(merged.author.name)
                .or_else(|| non_blank(env("GIT_AUTHOR_NAME")))
                .unwrap_or(defaults.name),
            email: non_blank(merged.author.email)
                .or_else(|| non_blank(env("GIT_AUTHOR_EMAIL")))
                .unwrap_or(defaults.email),
        };

        Self {
            model: merged
                .model
                .unwrap_or_else(|| GeneratorConfig::DEFAULT_MODEL.to_string()),
            api_base: merged
                .api_base
                .unwrap_or_else(|| GeneratorConfig::DEFAULT_API_BASE.to_string()),
            timeout: merged
                .timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(GeneratorConfig::DEFAULT_TIMEOUT),
            remote: merged.remote.unwrap_or_else(|| "origin".to_string()),
            log_file: merged.log_file,
            github_api: merged
                .github_api
                .unwrap_or_else(|| DEFAULT_GITHUB_API.to_string()),
            identity,
        }
    }
}
