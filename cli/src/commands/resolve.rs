use plugrun_core::api as core_api;

use crate::commands::cli::ResolveArgs;

fn print_attempts(attempts: &[core_api::ResolutionAttempt]) {
    for attempt in attempts {
        match &attempt.outcome {
            core_api::AttemptOutcome::Found => {
                println!("  found  {}", attempt.location.display());
            }
            core_api::AttemptOutcome::NotFound => {
                println!("  miss   {}", attempt.location.display());
            }
            core_api::AttemptOutcome::Io(msg) => {
                println!("  error  {}: {}", attempt.location.display(), msg);
            }
        }
    }
}

/// Show every location consulted for a script, then the winner or the
/// not-found error.
pub fn resolve_cmd(
    workspace: &core_api::Workspace,
    args: ResolveArgs,
) -> Result<i32, core_api::CliError> {
    let script = args.script.trim();
    if script.is_empty() {
        return Err(core_api::ExecError::MissingInput(
            "you must specify which plugin to resolve".to_string(),
        )
        .into());
    }

    let resolver = plugrun_plugins::factory::build_resolver(workspace);
    match resolver.resolve(script) {
        Ok(resolution) => {
            print_attempts(&resolution.attempts);
            println!(
                "resolved '{}' -> {}",
                script,
                resolution.plugin.path.display()
            );
            Ok(0)
        }
        Err(e) => {
            print_attempts(e.attempts());
            Err(e.into())
        }
    }
}
