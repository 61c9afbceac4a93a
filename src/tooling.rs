//! Tooling
//!
//! Command-line front end over the pack store, asset host and exporter.

pub mod cli;
pub mod format;

pub use cli::{Cli, CliContext, Commands, OutputFormat};
