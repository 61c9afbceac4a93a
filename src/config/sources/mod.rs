//! File layers. The environment overlay lives with the merge service.

pub mod global_file;
pub mod workspace_file;
