// LogSieve - lib.rs
//
// Library entry point, exposing the parsing/filtering pipeline for the
// binary and for integration testing.

pub mod app;
pub mod core;
pub mod platform;
pub mod util;
