//! Filesystem plugin resolution, process invocation and run reporters
//! for plugrun.

pub mod factory;
pub mod invoker;
pub mod reporter;
pub mod resolver;
