// LogSieve - platform/mod.rs
//
// Platform layer: filesystem access and configuration.
// Dependencies: core model types, directories crate.
// Must NOT depend on: app.

pub mod config;
pub mod fs;
