//! Packmaker: Virtual Asset Packs
//!
//! Groups project assets into named virtual folder trees ("packs") without
//! touching them, and exports a pack by moving its assets into a real folder
//! hierarchy that mirrors the pack. A build can be reverted, putting every
//! asset back where it came from.

pub mod codec;
pub mod config;
pub mod error;
pub mod exporter;
pub mod host;
pub mod import;
pub mod logging;
pub mod pack;
pub mod store;
pub mod tooling;
pub mod tree;
pub mod types;
