use std::path::{Path, PathBuf};

use anyhow::Context;

use super::types::AppConfig;

/// Marker and configuration file at the workspace root.
pub const WORKSPACE_FILE: &str = "plugrun.toml";

/// Walk up from `start` to the nearest directory containing the workspace
/// marker file.
pub fn find_root(start: &Path) -> Option<PathBuf> {
    let mut dir = Some(start);
    while let Some(d) = dir {
        if d.join(WORKSPACE_FILE).is_file() {
            return Some(d.to_path_buf());
        }
        dir = d.parent();
    }
    None
}

/// Load the configuration stored at `root`, then apply environment variable
/// overrides (highest priority).
pub fn load_at(root: &Path) -> anyhow::Result<AppConfig> {
    let path = root.join(WORKSPACE_FILE);
    let s = std::fs::read_to_string(&path)
        .with_context(|| format!("cannot read '{}'", path.display()))?;
    let mut cfg: AppConfig = toml::from_str(&s)
        .with_context(|| format!("invalid configuration in '{}'", path.display()))?;

    apply_env_overrides(&mut cfg);
    Ok(cfg)
}

/// Locate the workspace root above `start` and load its configuration.
pub fn load_from(start: &Path) -> anyhow::Result<(PathBuf, AppConfig)> {
    let root = find_root(start).ok_or_else(|| {
        anyhow::anyhow!(
            "no {} found in '{}' or any parent directory",
            WORKSPACE_FILE,
            start.display()
        )
    })?;
    let cfg = load_at(&root)?;
    Ok((root, cfg))
}

fn apply_env_overrides(cfg: &mut AppConfig) {
    if let Ok(v) = std::env::var("PLUGRUN_CONCURRENCY") {
        if let Ok(n) = v.trim().parse::<usize>() {
            cfg.run.concurrency = n;
        }
    }
    if let Ok(v) = std::env::var("PLUGRUN_LOG") {
        if !v.trim().is_empty() {
            cfg.logging.level = v;
        }
    }
}
