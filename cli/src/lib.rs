//! plugrun-cli library surface, exposed for unit tests.

pub mod commands;
