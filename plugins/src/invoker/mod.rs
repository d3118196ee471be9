mod process;

pub use process::ProcessPluginInvoker;
