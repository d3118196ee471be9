#[allow(clippy::module_inception)]
pub mod error;
pub mod exec;

pub use error::{CliError, ResolveError, WorkspaceError};
pub use exec::{ExecError, TaskError};
