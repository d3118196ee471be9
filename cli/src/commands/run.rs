//! Assembly for `plugrun run`: merge CLI flags over the workspace
//! configuration, resolve the plugin, then drive the execution engine with
//! a process task per package.

use std::sync::Arc;

use plugrun_core::api as core_api;

use crate::commands::cli::RunArgs;

#[tracing::instrument(name = "cli.run", skip(workspace, run_args))]
pub async fn run_cmd(
    workspace: &core_api::Workspace,
    run_args: RunArgs,
) -> Result<i32, core_api::CliError> {
    let script = run_args.script.trim().to_string();
    if script.is_empty() {
        return Err(core_api::ExecError::MissingInput(
            "you must specify which plugin to run".to_string(),
        )
        .into());
    }

    let resolver = plugrun_plugins::factory::build_resolver(workspace);
    let resolution = resolver.resolve(&script)?;
    tracing::debug!(
        plugin = %resolution.plugin.path.display(),
        attempts = resolution.attempts.len(),
        "plugin resolved"
    );

    let packages = workspace.packages()?;
    if packages.is_empty() {
        println!("no packages matched the workspace patterns");
        return Ok(0);
    }

    let run_cfg = &workspace.config().run;
    let sort = run_args.sort || run_cfg.sort;
    let concurrency = run_args.concurrency.unwrap_or(run_cfg.concurrency);
    let run_id = uuid::Uuid::new_v4().to_string();
    tracing::debug!(run_id = %run_id, sort, concurrency, "run initialized");

    let opts = core_api::RunOptions::new(run_id.clone())
        .sorted(sort)
        .concurrency(concurrency);

    let mut engine = core_api::ExecutionEngine::new(opts);
    let is_tty = atty::is(atty::Stream::Stderr);
    if let Some(reporter) = plugrun_plugins::factory::build_reporter(
        &run_args.stream_format,
        run_args.quiet,
        run_args.ascii,
        is_tty,
    ) {
        engine = engine.with_reporter(reporter);
    }

    let invoker: Arc<dyn core_api::PluginInvoker> =
        Arc::from(plugrun_plugins::factory::build_invoker(workspace, &run_id));
    let plugin = Arc::new(resolution.plugin);
    let plugin_args = Arc::new(run_args.args);

    let report = engine
        .execute(&packages, move |pkg| {
            let invoker = Arc::clone(&invoker);
            let plugin = Arc::clone(&plugin);
            let plugin_args = Arc::clone(&plugin_args);
            async move { invoker.invoke(&plugin, &pkg, &plugin_args).await }
        })
        .await?;

    match &report.outcome {
        core_api::RunOutcome::Success => Ok(0),
        core_api::RunOutcome::Failed { first_error, .. } => {
            eprintln!(
                "plugin '{}' failed in package '{}': {}",
                script, first_error.package, first_error.source
            );
            if !first_error.output_tail.is_empty() {
                eprintln!("--- output tail ---");
                eprintln!("{}", first_error.output_tail.trim_end());
            }
            if report.skipped > 0 {
                eprintln!("{} packages were not started", report.skipped);
            }
            Ok(first_error.exit_code.unwrap_or(1))
        }
    }
}
