mod fs;

pub use fs::FsPluginResolver;
