// LogSieve - core/mod.rs
//
// Core business logic layer: line grammar, filtering, formatting.
// Must NOT depend on: platform, app, or touch the filesystem.

pub mod filter;
pub mod format;
pub mod model;
pub mod parser;
