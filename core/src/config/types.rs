use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub workspace: WorkspaceConfig,

    #[serde(default)]
    pub plugins: PluginsConfig,

    #[serde(default)]
    pub run: RunConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where packages live relative to the workspace root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    #[serde(default = "default_package_globs")]
    pub packages: Vec<String>,
}

fn default_package_globs() -> Vec<String> {
    vec!["packages/*".to_string()]
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            packages: default_package_globs(),
        }
    }
}

/// Ordered plugin search locations, each relative to the workspace root
/// unless absolute.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginsConfig {
    #[serde(default = "default_plugin_search")]
    pub search: Vec<String>,
}

fn default_plugin_search() -> Vec<String> {
    vec!["plugins".to_string(), "tools/plugins".to_string()]
}

impl Default for PluginsConfig {
    fn default() -> Self {
        Self {
            search: default_plugin_search(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Concurrency ceiling within a batch. 0 means unbounded.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// If true, batch packages in dependency order instead of one flat batch.
    #[serde(default)]
    pub sort: bool,

    /// Per-task wall clock limit in seconds. 0 means no limit.
    #[serde(default)]
    pub task_timeout_secs: u64,

    /// How many bytes of combined plugin output to keep per task.
    #[serde(default = "default_capture_bytes")]
    pub capture_bytes: usize,
}

fn default_concurrency() -> usize {
    4
}

fn default_capture_bytes() -> usize {
    64 * 1024
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            sort: false,
            task_timeout_secs: 0,
            capture_bytes: default_capture_bytes(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_enabled")]
    pub enabled: bool,

    /// If true, log to stderr.
    #[serde(default = "default_logging_console")]
    pub console: bool,

    /// If true, log to a file under `directory`.
    #[serde(default)]
    pub file: bool,

    /// EnvFilter string, e.g. "info" or "plugrun_core=debug".
    #[serde(default = "default_logging_level")]
    pub level: String,

    /// Directory for log files. If empty or unset, `.plugrun/logs` under
    /// the workspace root is used.
    #[serde(default)]
    pub directory: Option<String>,
}

fn default_logging_enabled() -> bool {
    true
}

fn default_logging_console() -> bool {
    true
}

fn default_logging_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_logging_enabled(),
            console: default_logging_console(),
            file: false,
            level: default_logging_level(),
            directory: None,
        }
    }
}
