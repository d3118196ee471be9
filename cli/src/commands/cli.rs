use clap::{Args as ClapArgs, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "plugrun", version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct RunArgs {
    /// Plugin script to resolve and run once per package.
    pub script: String,

    /// Arguments passed through to the plugin. Flag-like values go after
    /// `--`, e.g. `plugrun run lint -- --fix`.
    #[arg(trailing_var_arg = true)]
    pub args: Vec<String>,

    /// Run dependency-ordered batches instead of one flat batch.
    #[arg(long)]
    pub sort: bool,

    /// Concurrency ceiling within a batch. 0 means unbounded.
    /// Defaults to the workspace configuration.
    #[arg(long)]
    pub concurrency: Option<usize>,

    #[arg(long, default_value = "text")]
    pub stream_format: String,

    /// Suppress progress output entirely.
    #[arg(long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log at debug level.
    #[arg(long)]
    pub verbose: bool,

    /// Plain ASCII progress markers.
    #[arg(long)]
    pub ascii: bool,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct ListArgs {
    /// Print the dependency-ordered batch plan instead of a flat listing.
    #[arg(long)]
    pub sort: bool,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct ResolveArgs {
    /// Plugin script to look up.
    pub script: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a plugin script across every package of the workspace.
    Run(RunArgs),
    /// List discovered packages, optionally as the batch plan.
    List(ListArgs),
    /// Show every location consulted while resolving a plugin script.
    Resolve(ResolveArgs),
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn run_parses_script_flags_and_passthrough_args() {
        let args = Args::try_parse_from([
            "plugrun", "run", "lint", "--sort", "--concurrency", "3", "--", "--fix", "fast",
        ])
        .unwrap();

        match args.command {
            Commands::Run(run) => {
                assert_eq!(run.script, "lint");
                assert!(run.sort);
                assert_eq!(run.concurrency, Some(3));
                assert_eq!(run.args, vec!["--fix", "fast"]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let res = Args::try_parse_from(["plugrun", "run", "lint", "--quiet", "--verbose"]);
        assert!(res.is_err());
    }

    #[test]
    fn concurrency_defaults_to_config() {
        let args = Args::try_parse_from(["plugrun", "run", "lint"]).unwrap();
        match args.command {
            Commands::Run(run) => assert_eq!(run.concurrency, None),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn resolve_requires_a_script() {
        assert!(Args::try_parse_from(["plugrun", "resolve"]).is_err());
        let args = Args::try_parse_from(["plugrun", "resolve", "build"]).unwrap();
        assert!(matches!(args.command, Commands::Resolve(r) if r.script == "build"));
    }
}
