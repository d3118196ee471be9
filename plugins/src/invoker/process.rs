use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use anyhow::anyhow;
use async_trait::async_trait;
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tokio::task::JoinHandle;
use tracing::debug;

use plugrun_core::error::TaskError;
use plugrun_core::executor::TaskOutput;
use plugrun_core::plugin::{PluginInvoker, ResolvedPlugin};
use plugrun_core::util::TailBuffer;
use plugrun_core::workspace::PackageNode;

/// Runs a resolved plugin as a child process, once per package.
///
/// The child starts in the package directory with the package context in
/// `PLUGRUN_*` environment variables and the user args passed through
/// positionally. stdout and stderr are tail-captured into one shared buffer;
/// a non-zero exit, spawn failure or timeout becomes a [`TaskError`].
pub struct ProcessPluginInvoker {
    workspace_root: PathBuf,
    run_id: String,
    /// Per-task wall clock limit in seconds. 0 disables the limit.
    timeout_secs: u64,
    capture_bytes: usize,
}

impl ProcessPluginInvoker {
    pub fn new(
        workspace_root: impl Into<PathBuf>,
        run_id: impl Into<String>,
        timeout_secs: u64,
        capture_bytes: usize,
    ) -> Self {
        Self {
            workspace_root: workspace_root.into(),
            run_id: run_id.into(),
            timeout_secs,
            capture_bytes,
        }
    }
}

/// Drain `rd` into the shared tail until EOF. A read failure ends capture;
/// the child's exit status still decides the task outcome.
fn spawn_tail_reader<R>(rd: Option<R>, tail: TailBuffer) -> JoinHandle<()>
where
    R: tokio::io::AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let Some(mut rd) = rd else { return };
        let mut buf = vec![0u8; 8 * 1024];
        loop {
            match rd.read(&mut buf).await {
                Ok(0) | Err(_) => break,
                Ok(n) => tail.push(&buf[..n]),
            }
        }
    })
}

#[async_trait]
impl PluginInvoker for ProcessPluginInvoker {
    fn name(&self) -> &str {
        "process-invoker"
    }

    async fn invoke(
        &self,
        plugin: &ResolvedPlugin,
        package: &PackageNode,
        args: &[String],
    ) -> Result<TaskOutput, TaskError> {
        debug!(
            package = %package.name,
            plugin = %plugin.path.display(),
            "spawning plugin"
        );

        let mut child = Command::new(&plugin.path)
            .args(args)
            .current_dir(&package.path)
            .env("PLUGRUN_PACKAGE_NAME", &package.name)
            .env("PLUGRUN_PACKAGE_PATH", &package.path)
            .env("PLUGRUN_WORKSPACE_ROOT", &self.workspace_root)
            .env("PLUGRUN_RUN_ID", &self.run_id)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                TaskError::new(
                    &package.name,
                    anyhow::Error::new(e).context(format!(
                        "failed to spawn plugin '{}'",
                        plugin.path.display()
                    )),
                )
            })?;

        let tail = TailBuffer::new(self.capture_bytes);
        let out_task = spawn_tail_reader(child.stdout.take(), tail.clone());
        let err_task = spawn_tail_reader(child.stderr.take(), tail.clone());

        let status = if self.timeout_secs == 0 {
            child.wait().await
        } else {
            let limit = Duration::from_secs(self.timeout_secs);
            match tokio::time::timeout(limit, child.wait()).await {
                Ok(res) => res,
                Err(_) => {
                    // Kill closes the pipes, which ends both reader tasks.
                    let _ = child.kill().await;
                    let _ = tokio::join!(out_task, err_task);
                    return Err(TaskError::new(
                        &package.name,
                        anyhow!(
                            "plugin '{}' timed out after {}s",
                            plugin.script,
                            self.timeout_secs
                        ),
                    )
                    .with_output_tail(tail.snapshot()));
                }
            }
        };

        let _ = tokio::join!(out_task, err_task);
        let output_tail = tail.snapshot();

        let status = status.map_err(|e| {
            TaskError::new(
                &package.name,
                anyhow::Error::new(e)
                    .context(format!("failed waiting for plugin '{}'", plugin.script)),
            )
            .with_output_tail(output_tail.clone())
        })?;

        if status.success() {
            debug!(package = %package.name, "plugin succeeded");
            return Ok(TaskOutput::new(output_tail));
        }

        let mut err = match status.code() {
            Some(code) => TaskError::new(
                &package.name,
                anyhow!("plugin '{}' exited with code {code}", plugin.script),
            )
            .with_exit_code(code),
            None => TaskError::new(
                &package.name,
                anyhow!("plugin '{}' was terminated by a signal", plugin.script),
            ),
        };
        err = err.with_output_tail(output_tail);
        Err(err)
    }
}
