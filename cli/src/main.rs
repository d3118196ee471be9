use clap::Parser;
mod commands;
use commands::cli;
use plugrun_core::error;
use plugrun_core::workspace::Workspace;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

static LOG_GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
    std::sync::OnceLock::new();

#[tokio::main]
async fn main() {
    let exit = match real_main().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{e}");
            exit_code_for_error(&e)
        }
    };

    std::process::exit(exit);
}

async fn real_main() -> Result<i32, error::CliError> {
    let args = cli::Args::parse();

    let start = std::env::current_dir()?;
    let workspace =
        Workspace::locate(&start).map_err(|e| error::CliError::Config(e.to_string()))?;

    let mut logging = workspace.config().logging.clone();
    if let cli::Commands::Run(run_args) = &args.command {
        if run_args.verbose {
            logging.level = "debug".to_string();
        }
    }
    init_tracing(workspace.root(), &logging).map_err(error::CliError::Command)?;
    tracing::debug!(root = %workspace.root().display(), "workspace located");

    dispatch(args.command, workspace).await
}

fn exit_code_for_error(e: &error::CliError) -> i32 {
    // 0: success
    // 11: config/workspace error
    // 12: plugin not found
    // 13: cyclic dependency
    // 14: missing input
    // 20: io error
    // 50: internal/uncategorized
    match e {
        error::CliError::Config(_) => 11,
        error::CliError::Workspace(_) => 11,
        error::CliError::Resolve(re) => match re {
            error::ResolveError::NotFound { .. } => 12,
            error::ResolveError::BadPattern { .. } => 11,
        },
        error::CliError::Exec(ee) => match ee {
            error::ExecError::DuplicatePackage(_) => 11,
            error::ExecError::CyclicDependency(_) => 13,
            error::ExecError::MissingInput(_) => 14,
        },
        error::CliError::Command(_) => 20,
        error::CliError::Io(_) => 20,
        error::CliError::Anyhow(_) => 50,
    }
}

async fn dispatch(cmd: cli::Commands, workspace: Workspace) -> Result<i32, error::CliError> {
    match cmd {
        cli::Commands::Run(run_args) => commands::run::run_cmd(&workspace, run_args).await,
        cli::Commands::List(list_args) => commands::list::list_cmd(&workspace, list_args),
        cli::Commands::Resolve(resolve_args) => {
            commands::resolve::resolve_cmd(&workspace, resolve_args)
        }
    }
}

fn init_tracing(
    root: &std::path::Path,
    logging: &plugrun_core::config::LoggingConfig,
) -> Result<(), String> {
    if !logging.enabled {
        return Ok(());
    }

    let filter = match std::env::var("RUST_LOG") {
        Ok(v) if !v.trim().is_empty() => EnvFilter::from_default_env(),
        _ => EnvFilter::try_new(logging.level.clone()).map_err(|e| e.to_string())?,
    };

    let mut maybe_writer = None;

    if logging.file {
        let dir = match logging
            .directory
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            Some(d) => std::path::PathBuf::from(d),
            None => root.join(".plugrun/logs"),
        };

        std::fs::create_dir_all(&dir).map_err(|e| format!("create log dir failed: {e}"))?;
        let file_name = format!("plugrun.{}.log", std::process::id());
        let appender = tracing_appender::rolling::never(dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(appender);
        let _ = LOG_GUARD.set(guard);
        maybe_writer = Some(non_blocking);
    }

    if !logging.console && maybe_writer.is_none() {
        return Err("logging disabled for both console and file".to_string());
    }

    let console_layer = logging.console.then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(atty::is(atty::Stream::Stderr))
    });

    let file_layer = maybe_writer.map(|w| {
        tracing_subscriber::fmt::layer()
            .with_writer(w)
            .with_ansi(false)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_the_error_class() {
        let cycle = error::CliError::Exec(error::ExecError::CyclicDependency(
            "a -> b -> a".to_string(),
        ));
        assert_eq!(exit_code_for_error(&cycle), 13);

        let missing = error::CliError::Exec(error::ExecError::MissingInput("x".to_string()));
        assert_eq!(exit_code_for_error(&missing), 14);

        let not_found = error::CliError::Resolve(error::ResolveError::NotFound {
            script: "lint".to_string(),
            attempts: Vec::new(),
        });
        assert_eq!(exit_code_for_error(&not_found), 12);

        let config = error::CliError::Config("bad".to_string());
        assert_eq!(exit_code_for_error(&config), 11);

        let internal = error::CliError::Anyhow(anyhow::anyhow!("boom"));
        assert_eq!(exit_code_for_error(&internal), 50);
    }
}
