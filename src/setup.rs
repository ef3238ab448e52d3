//! Setup resource: which processes belong to which application.
//!
//! A setup file maps an OS key (`linux`, `mac`, `win`) to application ids,
//! each with a path filter, a parent filter and the binary a workload driver
//! should launch. Filters are plain [`MatcherSpec`] data; nothing in the file
//! is executed. It supports YAML, JSON, and TOML formats.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::matcher::MatcherSpec;
use crate::process::ClassificationPredicate;

/// Setup resource compiled into the binary.
pub const BUILTIN_SETUP: &str = include_str!("../data/setup.yaml");

/// Origin label used in errors for the built-in setup.
const BUILTIN_ORIGIN: &str = "<built-in>";

/// Serialization format of a setup file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupFormat {
    Yaml,
    Json,
    Toml,
}

impl SetupFormat {
    /// Picks the format from the file extension; anything unknown is YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|s| s.to_str()) {
            Some("json") => SetupFormat::Json,
            Some("toml") => SetupFormat::Toml,
            _ => SetupFormat::Yaml,
        }
    }
}

impl fmt::Display for SetupFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetupFormat::Yaml => write!(f, "YAML"),
            SetupFormat::Json => write!(f, "JSON"),
            SetupFormat::Toml => write!(f, "TOML"),
        }
    }
}

/// Errors raised while loading or resolving a setup.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("Failed to read setup file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse {format} setup {origin}: {message}")]
    Parse {
        origin: String,
        format: SetupFormat,
        message: String,
    },

    #[error("No setups defined for OS '{os}' (available: {available})")]
    UnknownPlatform { os: String, available: String },

    #[error("No setup for application '{app}' on '{os}' (available: {available})")]
    UnknownApplication {
        os: String,
        app: String,
        available: String,
    },

    #[error("Invalid {filter} for '{app}': {source}")]
    InvalidMatcher {
        app: String,
        filter: &'static str,
        #[source]
        source: regex::Error,
    },
}

/// One application's entry in the setup resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSetup {
    /// Binary the workload driver launches. The sampler does not use it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binary: Option<PathBuf>,
    /// Selects the application's processes by executable path.
    pub path_filter: MatcherSpec,
    /// Selects the parent process by command line.
    pub parent_filter: MatcherSpec,
}

impl AppSetup {
    /// Compiles both filters into a predicate pair.
    pub fn predicate(&self, app: &str) -> Result<ClassificationPredicate, SetupError> {
        let path = self
            .path_filter
            .compile()
            .map_err(|source| SetupError::InvalidMatcher {
                app: app.to_string(),
                filter: "path_filter",
                source,
            })?;
        let parent = self
            .parent_filter
            .compile()
            .map_err(|source| SetupError::InvalidMatcher {
                app: app.to_string(),
                filter: "parent_filter",
                source,
            })?;
        Ok(ClassificationPredicate::from_matchers(path, parent))
    }
}

/// OS key → application id → setup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SetupFile {
    platforms: BTreeMap<String, BTreeMap<String, AppSetup>>,
}

impl SetupFile {
    /// Parses setup content in the given format. `origin` only labels errors.
    pub fn parse(content: &str, format: SetupFormat, origin: &str) -> Result<Self, SetupError> {
        let parsed: Result<Self, String> = match format {
            SetupFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
            SetupFormat::Toml => toml::from_str(content).map_err(|e| e.to_string()),
            SetupFormat::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
        };
        parsed.map_err(|message| SetupError::Parse {
            origin: origin.to_string(),
            format,
            message,
        })
    }

    /// The setup embedded in the binary.
    pub fn builtin() -> Result<Self, SetupError> {
        Self::parse(BUILTIN_SETUP, SetupFormat::Yaml, BUILTIN_ORIGIN)
    }

    /// Loads a setup file, choosing the format by extension.
    pub fn load(path: &Path) -> Result<Self, SetupError> {
        let content = fs::read_to_string(path).map_err(|source| SetupError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let format = SetupFormat::from_path(path);
        let setup = Self::parse(&content, format, &path.display().to_string())?;
        info!("Loaded {} setup from: {}", format, path.display());
        Ok(setup)
    }

    /// Loads `path` when given, the built-in setup otherwise.
    pub fn load_or_builtin(path: Option<&Path>) -> Result<Self, SetupError> {
        match path {
            Some(p) => Self::load(p),
            None => Self::builtin(),
        }
    }

    /// Serializes the setup in the requested format.
    pub fn render(&self, format: SetupFormat) -> Result<String, Box<dyn std::error::Error>> {
        Ok(match format {
            SetupFormat::Json => serde_json::to_string_pretty(self)?,
            SetupFormat::Toml => toml::to_string_pretty(self)?,
            SetupFormat::Yaml => serde_yaml::to_string(self)?,
        })
    }

    pub fn platforms(&self) -> impl Iterator<Item = &str> {
        self.platforms.keys().map(String::as_str)
    }

    /// All applications configured for `os`.
    pub fn platform(&self, os: &str) -> Result<&BTreeMap<String, AppSetup>, SetupError> {
        self.platforms
            .get(os)
            .ok_or_else(|| SetupError::UnknownPlatform {
                os: os.to_string(),
                available: join_keys(self.platforms.keys()),
            })
    }

    /// Looks up `app` for `os`. An exact id wins; otherwise ids are compared
    /// ignoring ASCII case. Returns the canonical id with the setup.
    pub fn app(&self, os: &str, app: &str) -> Result<(&str, &AppSetup), SetupError> {
        let apps = self.platform(os)?;
        if let Some((id, setup)) = apps.get_key_value(app) {
            return Ok((id.as_str(), setup));
        }
        apps.iter()
            .find(|(id, _)| id.eq_ignore_ascii_case(app))
            .map(|(id, setup)| (id.as_str(), setup))
            .ok_or_else(|| SetupError::UnknownApplication {
                os: os.to_string(),
                app: app.to_string(),
                available: join_keys(apps.keys()),
            })
    }
}

fn join_keys<'a>(keys: impl Iterator<Item = &'a String>) -> String {
    let keys: Vec<&str> = keys.map(String::as_str).collect();
    if keys.is_empty() {
        "none".to_string()
    } else {
        keys.join(", ")
    }
}

/// Setup key of the OS this binary runs on.
pub fn platform_key() -> &'static str {
    os_key(std::env::consts::OS)
}

/// Maps a Rust OS name to a setup key. Unknown names pass through.
pub fn os_key(os: &'static str) -> &'static str {
    match os {
        "macos" => "mac",
        "windows" => "win",
        other => other,
    }
}
