// LogSieve - app/pipeline.rs
//
// End-to-end driver: line source -> line grammar -> filter -> formatter -> sink.
//
// One line is in flight at a time and output order equals file order.

use crate::app::profiler::{timed, Profiler};
use crate::core::filter::FilterSpec;
use crate::core::format::format_record;
use crate::core::model::MalformedPolicy;
use crate::core::parser::parse_numbered_line;
use crate::platform::fs::open_lines;
use crate::util::constants;
use crate::util::error::{LogSieveError, Result};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Profiler names for the wrapped pipeline stages.
pub const STAGE_OPEN: &str = "open_log_file";
pub const STAGE_LOAD: &str = "load_line";
pub const STAGE_PARSE: &str = "parse_line";
pub const STAGE_FILTER: &str = "filter_line";
pub const STAGE_FORMAT: &str = "format_line";

/// Per-run options that are not filter constraints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Applied to every malformed line when a filter is active.
    pub malformed_policy: MalformedPolicy,
}

/// Counters for a completed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Lines pulled from the source.
    pub lines_read: u64,
    /// Lines written to the sink, markers included.
    pub lines_emitted: u64,
    /// Lines that failed the line grammar.
    pub malformed_lines: u64,
}

/// Stream `path` through the pipeline, writing matching lines to `out`.
///
/// With an empty `spec` every raw line is written unchanged and nothing is
/// parsed. Otherwise each line is parsed, malformed lines are handled per
/// `options.malformed_policy`, and records passing the filter are written in
/// canonical form.
///
/// Failing to open the file is terminal and happens before anything is
/// written. When `profiler` is supplied each stage is timed under the
/// `STAGE_*` names.
pub fn run<W: Write>(
    path: &Path,
    spec: &FilterSpec,
    options: &RunOptions,
    mut out: W,
    mut profiler: Option<&mut Profiler>,
) -> Result<RunSummary> {
    if let Some(p) = profiler.as_deref_mut() {
        for stage in [STAGE_OPEN, STAGE_LOAD, STAGE_PARSE, STAGE_FILTER, STAGE_FORMAT] {
            p.register(stage);
        }
    }

    let mut lines = timed(profiler.as_deref_mut(), STAGE_OPEN, || open_lines(path))?;

    tracing::info!(
        path = %path.display(),
        constraints = spec.len(),
        policy = %options.malformed_policy,
        "Processing log file"
    );

    let mut summary = RunSummary::default();

    loop {
        let next = timed(profiler.as_deref_mut(), STAGE_LOAD, || lines.next());
        let Some(line) = next else { break };
        let line = line?;

        if spec.is_empty() {
            emit(&mut out, &line.text)?;
            summary.lines_emitted += 1;
            continue;
        }

        let parsed = timed(profiler.as_deref_mut(), STAGE_PARSE, || {
            parse_numbered_line(&line.text, line.number)
        });

        match parsed {
            Ok(record) => {
                if timed(profiler.as_deref_mut(), STAGE_FILTER, || spec.matches(&record)) {
                    let rendered =
                        timed(profiler.as_deref_mut(), STAGE_FORMAT, || format_record(&record));
                    emit(&mut out, &rendered)?;
                    summary.lines_emitted += 1;
                }
            }
            Err(e) => {
                summary.malformed_lines += 1;
                match options.malformed_policy {
                    MalformedPolicy::Skip => {
                        tracing::debug!(line_number = line.number, "Skipping malformed line");
                    }
                    MalformedPolicy::Marker => {
                        tracing::debug!(line_number = line.number, "Marking malformed line");
                        emit(&mut out, constants::MALFORMED_LINE_MARKER)?;
                        summary.lines_emitted += 1;
                    }
                    MalformedPolicy::Fail => {
                        tracing::error!(line_number = line.number, "Malformed line; aborting");
                        return Err(e.into());
                    }
                }
            }
        }
    }

    out.flush().map_err(output_error)?;
    summary.lines_read = lines.lines_read();

    tracing::info!(
        lines_read = summary.lines_read,
        lines_emitted = summary.lines_emitted,
        malformed = summary.malformed_lines,
        "Processing complete"
    );

    Ok(summary)
}

fn emit<W: Write>(out: &mut W, text: &str) -> Result<()> {
    writeln!(out, "{text}").map_err(output_error)
}

fn output_error(source: std::io::Error) -> LogSieveError {
    LogSieveError::Io {
        path: PathBuf::from("<output>"),
        operation: "write",
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::error::{ParseError, SourceError};

    const GOOD_A: &str =
        "2012-09-13 16:04:22 DEBUG SID:34523 BID:1329 RID:65d33 'Starting new session'";
    const GOOD_B: &str = "2012-09-14 10:20:01 INFO SID:42111 BID:319 RID:7a323 'Loading profile'";
    const BAD: &str = "this is not a log line";

    fn write_temp(lines: &[&str]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        for line in lines {
            writeln!(file, "{line}").unwrap();
        }
        file.flush().unwrap();
        file
    }

    fn run_to_string(
        path: &Path,
        spec: &FilterSpec,
        policy: MalformedPolicy,
    ) -> (Result<RunSummary>, String) {
        let mut buf = Vec::new();
        let options = RunOptions {
            malformed_policy: policy,
        };
        let result = run(path, spec, &options, &mut buf, None);
        (result, String::from_utf8(buf).unwrap())
    }

    #[test]
    fn test_unfiltered_passes_raw_lines_through() {
        let file = write_temp(&[GOOD_A, BAD, GOOD_B]);
        let (result, out) =
            run_to_string(file.path(), &FilterSpec::default(), MalformedPolicy::Fail);
        // No parsing happens without a filter, so even the fail policy is inert.
        assert_eq!(out, format!("{GOOD_A}\n{BAD}\n{GOOD_B}\n"));
        let summary = result.unwrap();
        assert_eq!(summary.lines_read, 3);
        assert_eq!(summary.lines_emitted, 3);
        assert_eq!(summary.malformed_lines, 0);
    }

    #[test]
    fn test_filtered_emits_formatted_matches_in_order() {
        let file = write_temp(&[GOOD_A, GOOD_B, GOOD_A]);
        let spec = FilterSpec::from_pairs([("loglevel", "debug")]).unwrap();
        let (result, out) = run_to_string(file.path(), &spec, MalformedPolicy::Skip);
        assert_eq!(out, format!("{GOOD_A}\n{GOOD_A}\n"));
        assert_eq!(result.unwrap().lines_emitted, 2);
    }

    #[test]
    fn test_skip_policy_drops_malformed() {
        let file = write_temp(&[GOOD_A, BAD, GOOD_B]);
        let spec = FilterSpec::from_pairs([("date_range", "2012-09-01 2012-09-30")]).unwrap();
        let (result, out) = run_to_string(file.path(), &spec, MalformedPolicy::Skip);
        assert_eq!(out, format!("{GOOD_A}\n{GOOD_B}\n"));
        assert_eq!(result.unwrap().malformed_lines, 1);
    }

    #[test]
    fn test_marker_policy_emits_sentinel() {
        let file = write_temp(&[GOOD_A, BAD, GOOD_B]);
        let spec = FilterSpec::from_pairs([("date_range", "2012-09-01 2012-09-30")]).unwrap();
        let (result, out) = run_to_string(file.path(), &spec, MalformedPolicy::Marker);
        assert_eq!(out, format!("{GOOD_A}\nInvalid log line\n{GOOD_B}\n"));
        let summary = result.unwrap();
        assert_eq!(summary.lines_emitted, 3);
        assert_eq!(summary.malformed_lines, 1);
    }

    #[test]
    fn test_fail_policy_aborts_with_line_number() {
        let file = write_temp(&[GOOD_A, BAD, GOOD_B]);
        let spec = FilterSpec::from_pairs([("loglevel", "DEBUG")]).unwrap();
        let (result, out) = run_to_string(file.path(), &spec, MalformedPolicy::Fail);
        assert_eq!(out, format!("{GOOD_A}\n"));
        match result {
            Err(LogSieveError::Parse(ParseError::MalformedLine { line_number, .. })) => {
                assert_eq!(line_number, 2)
            }
            other => panic!("expected MalformedLine, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_file_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let (result, out) = run_to_string(
            &dir.path().join("absent.log"),
            &FilterSpec::default(),
            MalformedPolicy::Skip,
        );
        assert!(out.is_empty());
        assert!(matches!(
            result,
            Err(LogSieveError::Source(SourceError::FileNotFound { .. }))
        ));
    }

    #[test]
    fn test_profiler_counts_each_stage() {
        let file = write_temp(&[GOOD_A, BAD, GOOD_B]);
        let spec = FilterSpec::from_pairs([("loglevel", "DEBUG")]).unwrap();
        let mut profiler = Profiler::new();
        let mut buf = Vec::new();
        run(
            file.path(),
            &spec,
            &RunOptions::default(),
            &mut buf,
            Some(&mut profiler),
        )
        .unwrap();

        let counts: Vec<(String, u64)> = profiler
            .report()
            .into_iter()
            .map(|s| (s.function, s.samples))
            .collect();
        assert_eq!(
            counts,
            vec![
                (STAGE_OPEN.to_string(), 1),
                // Three lines plus the final end-of-file poll.
                (STAGE_LOAD.to_string(), 4),
                (STAGE_PARSE.to_string(), 3),
                (STAGE_FILTER.to_string(), 2),
                (STAGE_FORMAT.to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_write_failure_is_io_error() {
        struct FailingSink;
        impl Write for FailingSink {
            fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let file = write_temp(&[GOOD_A]);
        let result = run(
            file.path(),
            &FilterSpec::default(),
            &RunOptions::default(),
            FailingSink,
            None,
        );
        assert!(matches!(result, Err(LogSieveError::Io { .. })));
    }
}
