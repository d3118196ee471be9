//! Workspace configuration: `plugrun.toml` discovery, parsing, and
//! environment variable overrides.

mod load;
mod types;

pub use load::{find_root, load_at, load_from, WORKSPACE_FILE};
pub use types::{AppConfig, LoggingConfig, PluginsConfig, RunConfig, WorkspaceConfig};
