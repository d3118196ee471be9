mod jsonl;
mod progress;
mod text;

pub use jsonl::JsonlReporter;
pub use progress::ProgressReporter;
pub use text::TextReporter;
