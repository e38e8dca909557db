// LogSieve - main.rs
//
// Command-line entry point. Handles:
// 1. CLI argument parsing
// 2. Configuration loading and logging initialisation
// 3. Filter construction (fail fast before reading the log)
// 4. Running the pipeline to stdout and mapping errors to exit codes

use clap::Parser;
use logsieve::app::pipeline::{self, RunOptions};
use logsieve::app::profiler::Profiler;
use logsieve::core::filter::FilterSpec;
use logsieve::core::model::MalformedPolicy;
use logsieve::platform::config::{self, AppConfig};
use logsieve::util::error::LogSieveError;
use logsieve::util::{constants, logging};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

/// LogSieve - import a log file and print all or a subsection of its lines.
///
/// Lines have the form
/// `YYYY-MM-DD HH:MM:SS LEVEL SID:<n> BID:<n> RID:<id> 'message'`.
/// All given filters must match.
#[derive(Parser, Debug)]
#[command(name = "logsieve", version, about)]
struct Cli {
    /// Log file path.
    path: PathBuf,

    /// Filter by log level (DEBUG, INFO, WARNING, ERROR, ...).
    #[arg(short = 'l', long = "loglevel")]
    loglevel: Option<String>,

    /// Filter by business ID (`319` or `BID:319`).
    #[arg(short = 'b', long = "business-id")]
    business_id: Option<String>,

    /// Filter by session ID (`42111` or `SID:42111`).
    #[arg(short = 's', long = "session-id")]
    session_id: Option<String>,

    /// Filter by request ID (`7a323` or `RID:7a323`).
    #[arg(short = 'r', long = "request-id")]
    request_id: Option<String>,

    /// Filter by inclusive date range ("YYYY-MM-DD YYYY-MM-DD").
    #[arg(short = 'd', long = "date-range")]
    date_range: Option<String>,

    /// How to treat lines that do not match the log format when filtering:
    /// skip, marker or fail. Overrides config.toml.
    #[arg(long = "malformed", value_name = "POLICY")]
    malformed: Option<MalformedPolicy>,

    /// Print per-stage call counts and timings to stderr after the run.
    #[arg(long = "profile")]
    profile: bool,

    /// Configuration file (defaults to the platform config directory).
    #[arg(long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(long = "debug")]
    debug: bool,
}

impl Cli {
    /// Filter `(name, value)` pairs for every flag that was given a value.
    ///
    /// An empty value (`-l ""`) counts as absent.
    fn filter_pairs(&self) -> Vec<(&'static str, &str)> {
        [
            ("loglevel", &self.loglevel),
            ("business_id", &self.business_id),
            ("session_id", &self.session_id),
            ("request_id", &self.request_id),
            (constants::DATE_RANGE_FILTER, &self.date_range),
        ]
        .into_iter()
        .filter_map(|(name, value)| match value.as_deref() {
            Some(v) if !v.trim().is_empty() => Some((name, v)),
            _ => None,
        })
        .collect()
    }
}

fn main() {
    let cli = Cli::parse();

    let (app_config, config_warnings) = match cli.config.clone().or_else(config::default_config_path)
    {
        Some(path) => config::load_config(&path),
        None => (AppConfig::default(), Vec::new()),
    };

    logging::init(cli.debug, app_config.log_level.as_deref());

    for warning in &config_warnings {
        tracing::warn!(error = %warning, "Config loading warning");
    }

    tracing::debug!(
        version = constants::APP_VERSION,
        path = %cli.path.display(),
        "LogSieve starting"
    );

    let spec = match FilterSpec::from_pairs(cli.filter_pairs()) {
        Ok(spec) => spec,
        Err(e) => fail(&LogSieveError::from(e)),
    };

    let options = RunOptions {
        malformed_policy: cli.malformed.unwrap_or(app_config.malformed_policy),
    };
    let mut profiler = (cli.profile || app_config.profile).then(Profiler::new);

    let stdout = io::stdout();
    let out = BufWriter::new(stdout.lock());
    let result = pipeline::run(&cli.path, &spec, &options, out, profiler.as_mut());

    if let Some(ref profiler) = profiler {
        let mut stderr = io::stderr().lock();
        for stats in profiler.report() {
            // Best effort: a closed stderr must not change the exit status.
            let _ = writeln!(stderr, "\n{stats}");
        }
    }

    match result {
        Ok(_) => {}
        Err(LogSieveError::Io { ref source, .. }) if source.kind() == io::ErrorKind::BrokenPipe => {
            // Downstream reader went away (e.g. `| head`); not an error.
            tracing::debug!("Output closed early");
        }
        Err(e) => fail(&e),
    }
}

/// Report `err` to the user and exit non-zero.
fn fail(err: &LogSieveError) -> ! {
    tracing::error!(error = %err, "LogSieve failed");
    eprintln!("Error: {err}");
    std::process::exit(1);
}
