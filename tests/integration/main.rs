//! Integration tests for packmaker

mod cli_commands;
mod export_cycle;
mod support;
mod tree_properties;
