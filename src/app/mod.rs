// LogSieve - app/mod.rs
//
// Application layer: run orchestration and optional instrumentation.
// Dependencies: core and platform layers.

pub mod pipeline;
pub mod profiler;
