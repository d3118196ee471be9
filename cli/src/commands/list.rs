use plugrun_core::api as core_api;

use crate::commands::cli::ListArgs;

/// Print discovered packages, either flat or as the batch plan the engine
/// would execute with sorting on.
pub fn list_cmd(
    workspace: &core_api::Workspace,
    args: ListArgs,
) -> Result<i32, core_api::CliError> {
    let packages = workspace.packages()?;
    if packages.is_empty() {
        println!("no packages matched the workspace patterns");
        return Ok(0);
    }

    if args.sort {
        let plan = core_api::PackageGraph::from_packages(&packages)?.batched()?;
        for (idx, batch) in plan.names().iter().enumerate() {
            println!("batch {}: {}", idx, batch.join(", "));
        }
    } else {
        for pkg in &packages {
            println!("{}  {}", pkg.name, pkg.path.display());
        }
    }
    println!("{} packages", packages.len());
    Ok(0)
}
