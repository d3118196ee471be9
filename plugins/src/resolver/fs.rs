use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::debug;

use plugrun_core::error::ResolveError;
use plugrun_core::plugin::{
    AttemptOutcome, PluginResolver, Resolution, ResolutionAttempt, ResolvedPlugin,
};

/// Resolves plugin scripts against an explicit base directory.
///
/// Search patterns are walked in configured order; each pattern expands to
/// candidate directories and every `<dir>/<script>` probe is recorded as an
/// attempt, hits and misses alike. The process working directory is never
/// consulted.
pub struct FsPluginResolver {
    base: PathBuf,
    patterns: Vec<String>,
}

impl FsPluginResolver {
    pub fn new(base: impl Into<PathBuf>, patterns: Vec<String>) -> Self {
        Self {
            base: base.into(),
            patterns,
        }
    }

    fn probe(candidate: &Path) -> ResolutionAttempt {
        match std::fs::metadata(candidate) {
            Ok(md) if md.is_file() => ResolutionAttempt::found(candidate),
            Ok(_) => ResolutionAttempt::not_found(candidate),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                ResolutionAttempt::not_found(candidate)
            }
            Err(e) => ResolutionAttempt::io(candidate, e),
        }
    }
}

impl PluginResolver for FsPluginResolver {
    fn name(&self) -> &str {
        "fs-resolver"
    }

    fn resolve(&self, script: &str) -> Result<Resolution, ResolveError> {
        let mut visited: HashSet<PathBuf> = HashSet::new();
        let mut attempts = Vec::new();

        for pattern in &self.patterns {
            // An absolute pattern replaces the base in `join`.
            let full = self.base.join(pattern);
            let full = full.to_string_lossy();
            let entries = glob::glob(&full).map_err(|e| ResolveError::BadPattern {
                pattern: pattern.clone(),
                reason: e.to_string(),
            })?;

            for entry in entries {
                let dir = match entry {
                    Ok(dir) => dir,
                    Err(e) => {
                        let path = e.path().to_path_buf();
                        attempts.push(ResolutionAttempt::io(path, e));
                        continue;
                    }
                };
                if !dir.is_dir() || !visited.insert(dir.clone()) {
                    continue;
                }

                let candidate = dir.join(script);
                let attempt = Self::probe(&candidate);
                let hit = attempt.outcome == AttemptOutcome::Found;
                debug!(candidate = %candidate.display(), hit, "plugin probe");
                attempts.push(attempt);

                if hit {
                    return Ok(Resolution {
                        plugin: ResolvedPlugin::new(script, candidate),
                        attempts,
                    });
                }
            }
        }

        Err(ResolveError::NotFound {
            script: script.to_string(),
            attempts,
        })
    }
}
