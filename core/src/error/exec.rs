use thiserror::Error;

/// Planning and scheduling errors. These abort a run before any task has
/// been started; per-task failures travel as [`TaskError`] instead.
#[derive(Error, Debug)]
pub enum ExecError {
    #[error("duplicate package name: {0}")]
    DuplicatePackage(String),

    #[error("cyclic dependency detected: {0}")]
    CyclicDependency(String),

    #[error("missing input: {0}")]
    MissingInput(String),
}

/// Failure of one package's task. Carries the package name so the first
/// error of a run can be attributed after the in-flight window drains.
#[derive(Error, Debug)]
#[error("task for package '{package}' failed: {source}")]
pub struct TaskError {
    pub package: String,
    /// Exit code of the plugin process, when the failure produced one.
    pub exit_code: Option<i32>,
    /// Tail of the task's combined output, possibly empty.
    pub output_tail: String,
    #[source]
    pub source: anyhow::Error,
}

impl TaskError {
    pub fn new(package: impl Into<String>, source: anyhow::Error) -> Self {
        Self {
            package: package.into(),
            exit_code: None,
            output_tail: String::new(),
            source,
        }
    }

    pub fn with_exit_code(mut self, code: i32) -> Self {
        self.exit_code = Some(code);
        self
    }

    pub fn with_output_tail(mut self, tail: impl Into<String>) -> Self {
        self.output_tail = tail.into();
        self
    }
}
