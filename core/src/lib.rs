//! Core library for plugrun: workspace discovery, dependency batch
//! planning, and bounded parallel execution of one task per package.

pub mod api;
pub mod config;
pub mod error;
pub mod executor;
pub mod plugin;
pub mod util;
pub mod workspace;
