pub mod cli;
pub mod list;
pub mod resolve;
pub mod run;
