use crate::error::{Error, Result};
use crate::runtime::SYSTEM_DEFAULT_RUNTIME;
use crate::server::ServerId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

const DEFAULT_ENTRY_ARTIFACT: &str = "server.jar";
const DEFAULT_MIN_HEAP_MB: u32 = 1024;
const DEFAULT_MAX_HEAP_MB: u32 = 2048;
const DEFAULT_STOP_COMMAND: &str = "stop";
const DEFAULT_LOG_BUFFER_LINES: usize = 1000;

fn default_entry_artifact() -> String {
    DEFAULT_ENTRY_ARTIFACT.to_string()
}

fn default_runtime_path() -> String {
    SYSTEM_DEFAULT_RUNTIME.to_string()
}

fn default_min_heap_mb() -> u32 {
    DEFAULT_MIN_HEAP_MB
}

fn default_max_heap_mb() -> u32 {
    DEFAULT_MAX_HEAP_MB
}

fn default_server_args() -> Vec<String> {
    vec!["nogui".to_string()]
}

fn default_stop_command() -> String {
    DEFAULT_STOP_COMMAND.to_string()
}

fn default_log_buffer_lines() -> usize {
    DEFAULT_LOG_BUFFER_LINES
}

fn default_true() -> bool {
    true
}

/// Configuration for a single managed game server.
///
/// The record is owned by the host application. A supervisor reads it afresh
/// on every start, so a replacement takes effect at the next launch.
///
/// # Examples
///
/// Building a configuration in code:
///
/// ```
/// use gameserver_supervisor::config::ServerConfig;
///
/// let mut config = ServerConfig::new("survival", "/srv/minecraft/survival");
/// config.min_heap_mb = 1024;
/// config.max_heap_mb = 4096;
/// config.custom_flags.push("-Dfile.encoding=UTF-8".to_string());
///
/// assert_eq!(config.entry_artifact, "server.jar");
/// assert!(config.auto_restart);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    /// Stable identifier; generated when the file omits it.
    #[serde(default = "ServerId::generate")]
    pub id: ServerId,

    /// Directory the server runs in. Must exist at start time.
    pub working_directory: PathBuf,

    /// Jar launched with `-jar`, relative to the working directory.
    #[serde(default = "default_entry_artifact")]
    pub entry_artifact: String,

    /// Java executable. `"java"` means "system default" and lets the
    /// runtime resolver pick a discovered install.
    #[serde(default = "default_runtime_path")]
    pub runtime_path: String,

    /// Initial heap in MiB (`-Xms`).
    #[serde(default = "default_min_heap_mb")]
    pub min_heap_mb: u32,

    /// Maximum heap in MiB (`-Xmx`).
    #[serde(default = "default_max_heap_mb")]
    pub max_heap_mb: u32,

    /// Extra JVM flags placed after the default tuning flags.
    #[serde(default)]
    pub custom_flags: Vec<String>,

    /// Restart the server automatically after a crash.
    #[serde(default = "default_true")]
    pub auto_restart: bool,

    /// Arguments passed to the server after the jar.
    #[serde(default = "default_server_args")]
    pub server_args: Vec<String>,

    /// Console command that asks the server to shut down.
    #[serde(default = "default_stop_command")]
    pub stop_command: String,

    /// Write `eula=true` into the working directory before launch.
    #[serde(default = "default_true")]
    pub accept_eula: bool,

    /// Number of console lines kept for on-demand retrieval.
    #[serde(default = "default_log_buffer_lines")]
    pub log_buffer_lines: usize,

    /// Environment variables added to the child's environment.
    #[serde(default)]
    pub env: HashMap<String, String>,
}

impl ServerConfig {
    /// Creates a configuration with default launch settings.
    pub fn new(id: impl Into<ServerId>, working_directory: impl Into<PathBuf>) -> Self {
        Self {
            id: id.into(),
            working_directory: working_directory.into(),
            entry_artifact: default_entry_artifact(),
            runtime_path: default_runtime_path(),
            min_heap_mb: DEFAULT_MIN_HEAP_MB,
            max_heap_mb: DEFAULT_MAX_HEAP_MB,
            custom_flags: Vec::new(),
            auto_restart: true,
            server_args: default_server_args(),
            stop_command: default_stop_command(),
            accept_eula: true,
            log_buffer_lines: DEFAULT_LOG_BUFFER_LINES,
            env: HashMap::new(),
        }
    }

    /// Full path of the entry artifact.
    pub fn entry_artifact_path(&self) -> PathBuf {
        self.working_directory.join(&self.entry_artifact)
    }
}

/// Top-level configuration: the set of servers the host manages.
///
/// # Schema
///
/// ```json
/// {
///   "servers": [
///     {
///       "id": "survival",
///       "workingDirectory": "/srv/minecraft/survival",
///       "entryArtifact": "paper.jar",
///       "runtimePath": "java",
///       "minHeapMb": 1024,
///       "maxHeapMb": 4096,
///       "customFlags": ["-Dfile.encoding=UTF-8"],
///       "autoRestart": true
///     }
///   ]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Managed servers, in file order.
    #[serde(default)]
    pub servers: Vec<ServerConfig>,
}

impl Config {
    /// Loads a configuration from a file path.
    ///
    /// Files ending in `.yaml` or `.yml` are parsed as YAML, everything else
    /// as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigParse`] if the file cannot be read or does not
    /// match the schema.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::ConfigParse(format!("Failed to read config file: {}", e)))?;

        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

        if is_yaml {
            Self::parse_from_yaml_str(&content)
        } else {
            Self::parse_from_str(&content)
        }
    }

    /// Parses a configuration from a JSON string.
    pub fn parse_from_str(content: &str) -> Result<Self> {
        serde_json::from_str(content)
            .map_err(|e| Error::ConfigParse(format!("Failed to parse JSON config: {}", e)))
    }

    /// Parses a configuration from a YAML string.
    pub fn parse_from_yaml_str(content: &str) -> Result<Self> {
        serde_yaml::from_str(content)
            .map_err(|e| Error::ConfigParse(format!("Failed to parse YAML config: {}", e)))
    }

    /// Looks up a server configuration by id.
    pub fn server(&self, id: &ServerId) -> Option<&ServerConfig> {
        self.servers.iter().find(|s| &s.id == id)
    }
}
