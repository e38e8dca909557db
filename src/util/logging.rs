// LogSieve - util/logging.rs
//
// Diagnostics for the sieve itself: config warnings, the per-run processing
// summary and per-line skip/marker decisions at debug level.
//
// Level selection, highest priority first:
//   - RUST_LOG environment variable
//   - --debug on the CLI
//   - [logging] level in config.toml
//   - "warn", so a normal run prints nothing but matching log lines
//
// Output: stderr only. Standard output carries the filtered log lines and
// must stay byte-clean for piping.

use super::constants;
use tracing_subscriber::EnvFilter;

/// Initialise the logging subsystem.
///
/// `debug_flag` is true when `--debug` was passed; `config_level` is the
/// already-validated `[logging] level` from config.toml.
pub fn init(debug_flag: bool, config_level: Option<&str>) {
    let (filter, chosen_by) = if std::env::var("RUST_LOG").is_ok() {
        (EnvFilter::from_default_env(), "RUST_LOG")
    } else if debug_flag {
        (EnvFilter::new("debug"), "--debug")
    } else if let Some(level) = config_level {
        (EnvFilter::new(level), "config.toml")
    } else {
        (EnvFilter::new(constants::DEFAULT_LOG_LEVEL), "default")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .compact()
        .init();

    tracing::debug!(
        app = constants::APP_NAME,
        version = constants::APP_VERSION,
        level_from = chosen_by,
        "Logging initialised"
    );
}
