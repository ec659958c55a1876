use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::discover::find_upward;
use crate::error::{Result, TagError};
use crate::git::TagAuthor;

/// Prefix for configuration environment variables (e.g., `TAG_DRY_RUN`)
pub const ENV_PREFIX: &str = "TAG_";

/// Config file searched for from the working directory upwards
pub const CONFIG_FILE_NAME: &str = ".tag.yaml";

/// Version file searched for when no version is configured
pub const DEFAULT_VERSION_FILE: &str = "VERSION";

/// Directory under the user config dir holding the fallback `config.yaml`
pub const USER_CONFIG_DIR: &str = "semver-tag";

/// One layer of configuration. Unset keys are `None`.
///
/// Keys are kebab-case in YAML (`git-author-name`) and upper snake case with
/// the [ENV_PREFIX] in the environment (`TAG_GIT_AUTHOR_NAME`).
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct PartialConfig {
    #[serde(default)]
    pub version: Option<String>,

    #[serde(default)]
    pub version_file: Option<String>,

    #[serde(default)]
    pub dry_run: Option<bool>,

    #[serde(default)]
    pub git_author_name: Option<String>,

    #[serde(default)]
    pub git_author_email: Option<String>,

    #[serde(default)]
    pub create_major_alias: Option<bool>,
}

impl PartialConfig {
    /// Build a layer from `(name, value)` environment pairs.
    ///
    /// Only names starting with [ENV_PREFIX] are considered. The prefix is
    /// stripped, the rest lowercased and `_` mapped to `-`. Unknown keys are
    /// ignored.
    pub fn from_env<I, K, V>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut layer = PartialConfig::default();

        for (name, value) in vars {
            let Some(key) = name.as_ref().strip_prefix(ENV_PREFIX) else {
                continue;
            };
            let key = key.to_lowercase().replace('_', "-");
            let value = value.as_ref();

            match key.as_str() {
                "version" => layer.version = Some(value.to_string()),
                "version-file" => layer.version_file = Some(value.to_string()),
                "dry-run" => layer.dry_run = Some(parse_bool(&key, value)?),
                "git-author-name" => layer.git_author_name = Some(value.to_string()),
                "git-author-email" => layer.git_author_email = Some(value.to_string()),
                "create-major-alias" => layer.create_major_alias = Some(parse_bool(&key, value)?),
                _ => {}
            }
        }

        Ok(layer)
    }

    /// Parse a YAML layer. An empty document yields an empty layer.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(PartialConfig::default());
        }
        serde_yaml::from_str(content)
            .map_err(|e| TagError::config(format!("Invalid YAML configuration: {}", e)))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            TagError::config(format!("Cannot read config file '{}': {}", path.display(), e))
        })?;
        Self::from_yaml_str(&content).map_err(|e| {
            TagError::config(format!("In config file '{}': {}", path.display(), e))
        })
    }

    /// Combine two layers; keys set in `higher` win.
    pub fn merge(self, higher: PartialConfig) -> PartialConfig {
        PartialConfig {
            version: higher.version.or(self.version),
            version_file: higher.version_file.or(self.version_file),
            dry_run: higher.dry_run.or(self.dry_run),
            git_author_name: higher.git_author_name.or(self.git_author_name),
            git_author_email: higher.git_author_email.or(self.git_author_email),
            create_major_alias: higher.create_major_alias.or(self.create_major_alias),
        }
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" | "" => Ok(false),
        other => Err(TagError::config(format!(
            "Invalid boolean '{}' for '{}'",
            other, key
        ))),
    }
}

/// Validated settings for one tagging run
#[derive(Debug, Clone, PartialEq)]
pub struct TaggerConfig {
    /// Requested version, as written in config or the version file
    pub version: String,
    pub dry_run: bool,
    pub author: TagAuthor,
    pub create_major_alias: bool,
}

/// Where configuration is read from.
///
/// [ConfigSources::from_process] captures the real working directory,
/// environment and user config directory; tests build one by hand.
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    /// Directory the upward searches start from
    pub working_dir: PathBuf,

    /// Last directory checked by upward searches; `None` walks to the root
    pub ceiling: Option<PathBuf>,

    /// `(name, value)` environment pairs
    pub env: Vec<(String, String)>,

    /// Explicit config file; disables discovery when set
    pub config_file: Option<PathBuf>,

    /// Base user config directory (e.g., `~/.config`)
    pub user_config_dir: Option<PathBuf>,
}

impl ConfigSources {
    /// Sources rooted at `working_dir` with no environment and no user config
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        ConfigSources {
            working_dir: working_dir.into(),
            ..Default::default()
        }
    }

    /// Capture the current process's working directory and environment
    pub fn from_process(config_file: Option<PathBuf>) -> Result<Self> {
        let working_dir = std::env::current_dir()?;
        let env = std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .filter(|(k, _)| k.starts_with(ENV_PREFIX))
            .collect();

        Ok(ConfigSources {
            working_dir,
            ceiling: None,
            env,
            config_file,
            user_config_dir: dirs::config_dir(),
        })
    }

    /// Resolve the YAML file to load, if any.
    ///
    /// Order:
    /// 1. Explicit `config_file` (must exist)
    /// 2. [CONFIG_FILE_NAME] in the working directory or any parent
    /// 3. `<user config dir>/semver-tag/config.yaml`
    pub fn locate_config_file(&self) -> Result<Option<PathBuf>> {
        if let Some(path) = &self.config_file {
            if !path.is_file() {
                return Err(TagError::config(format!(
                    "Config file '{}' does not exist",
                    path.display()
                )));
            }
            return Ok(Some(path.clone()));
        }

        if let Some(found) = find_upward(&self.working_dir, CONFIG_FILE_NAME, self.ceiling.as_deref())? {
            return Ok(Some(found));
        }

        Ok(self
            .user_config_dir
            .as_ref()
            .map(|dir| dir.join(USER_CONFIG_DIR).join("config.yaml"))
            .filter(|path| path.is_file()))
    }
}

/// Read the version from the first line of `file_name`, searched for upwards
/// from `start`.
pub fn version_from_file(start: &Path, file_name: &str, ceiling: Option<&Path>) -> Result<String> {
    let path = find_upward(start, file_name, ceiling)?.ok_or_else(|| {
        TagError::config(format!(
            "Unable to find {} file in any path up to root",
            file_name
        ))
    })?;

    let content = fs::read_to_string(&path).map_err(|e| {
        TagError::config(format!("Cannot read version file '{}': {}", path.display(), e))
    })?;

    Ok(content.lines().next().unwrap_or_default().trim().to_string())
}

/// Merge every configuration layer and validate the result.
///
/// Precedence, lowest to highest: environment, YAML file, `overrides` (CLI
/// flags). If no version is set, the version file is read.
pub fn load_config(sources: &ConfigSources, overrides: PartialConfig) -> Result<TaggerConfig> {
    let env_layer = PartialConfig::from_env(
        sources
            .env
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str())),
    )?;
    let file_layer = match sources.locate_config_file()? {
        Some(path) => PartialConfig::from_file(&path)?,
        None => PartialConfig::default(),
    };
    let merged = env_layer.merge(file_layer).merge(overrides);

    let version = match merged.version.filter(|v| !v.trim().is_empty()) {
        Some(version) => version,
        None => version_from_file(
            &sources.working_dir,
            merged
                .version_file
                .as_deref()
                .unwrap_or(DEFAULT_VERSION_FILE),
            sources.ceiling.as_deref(),
        )?,
    };

    let name = required(merged.git_author_name, "git-author-name")?;
    let email = required(merged.git_author_email, "git-author-email")?;

    Ok(TaggerConfig {
        version,
        dry_run: merged.dry_run.unwrap_or(false),
        author: TagAuthor::new(name, email),
        create_major_alias: merged.create_major_alias.unwrap_or(false),
    })
}

fn required(value: Option<String>, key: &str) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(TagError::config(format!(
            "Missing required setting '{}' (set {}{} or add it to {})",
            key,
            ENV_PREFIX,
            key.to_uppercase().replace('-', "_"),
            CONFIG_FILE_NAME
        ))),
    }
}
