// LogSieve - app/profiler.rs
//
// Optional call-count and timing instrumentation.
//
// The profiler is an explicit value handed to the pipeline driver, which
// wraps each stage at its call site. Nothing is registered globally; a run
// without a profiler pays only an `Option` check per stage.

use crate::util::constants;
use std::fmt;
use std::time::{Duration, Instant};

/// Aggregated timings for one named operation.
#[derive(Debug, Clone, Copy)]
struct Samples {
    count: u64,
    total: Duration,
    min: Duration,
    max: Duration,
}

impl Samples {
    const EMPTY: Samples = Samples {
        count: 0,
        total: Duration::ZERO,
        min: Duration::ZERO,
        max: Duration::ZERO,
    };

    fn add(&mut self, elapsed: Duration) {
        if self.count == 0 {
            self.min = elapsed;
            self.max = elapsed;
        } else {
            self.min = self.min.min(elapsed);
            self.max = self.max.max(elapsed);
        }
        self.count += 1;
        self.total += elapsed;
    }
}

/// Collects call counts and min/max/average durations per operation name.
///
/// Names are reported in the order they were first seen. Only aggregates
/// are kept, so memory does not grow with the number of calls.
#[derive(Debug, Default)]
pub struct Profiler {
    operations: Vec<(&'static str, Samples)>,
}

impl Profiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `name` appear in the report even if it is never measured.
    pub fn register(&mut self, name: &'static str) {
        self.entry(name);
    }

    /// Run `f`, record its wall-clock duration under `name`, and return its
    /// result unchanged.
    pub fn measure<T>(&mut self, name: &'static str, f: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let result = f();
        self.record(name, start.elapsed());
        result
    }

    /// Record one externally timed call.
    pub fn record(&mut self, name: &'static str, elapsed: Duration) {
        self.entry(name).add(elapsed);
    }

    /// Statistics for every operation seen so far.
    pub fn report(&self) -> Vec<FunctionStats> {
        self.operations
            .iter()
            .map(|(name, samples)| FunctionStats {
                function: (*name).to_string(),
                samples: samples.count,
                min: samples.min,
                max: samples.max,
                average: if samples.count == 0 {
                    Duration::ZERO
                } else {
                    // Sample counts beyond u32::MAX saturate the divisor.
                    samples.total / u32::try_from(samples.count).unwrap_or(u32::MAX)
                },
            })
            .collect()
    }

    fn entry(&mut self, name: &'static str) -> &mut Samples {
        let idx = match self.operations.iter().position(|(n, _)| *n == name) {
            Some(idx) => idx,
            None => {
                self.operations.push((name, Samples::EMPTY));
                self.operations.len() - 1
            }
        };
        &mut self.operations[idx].1
    }
}

/// Run `f` under `profiler` when one is supplied, or plainly otherwise.
pub fn timed<T>(profiler: Option<&mut Profiler>, name: &'static str, f: impl FnOnce() -> T) -> T {
    match profiler {
        Some(p) => p.measure(name, f),
        None => f(),
    }
}

/// Report line for one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionStats {
    pub function: String,
    pub samples: u64,
    pub min: Duration,
    pub max: Duration,
    pub average: Duration,
}

impl fmt::Display for FunctionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = constants::PROFILE_TIME_PRECISION;
        write!(
            f,
            "Function: {}\nNumSamples: {}\nMin: {:.precision$}\nMax: {:.precision$}\nAverage: {:.precision$}",
            self.function,
            self.samples,
            self.min.as_secs_f64(),
            self.max.as_secs_f64(),
            self.average.as_secs_f64(),
        )
    }
}
