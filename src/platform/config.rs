// LogSieve - platform/config.rs
//
// Config directory resolution and config.toml loading with startup
// validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::core::model::MalformedPolicy;
use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Default location of config.toml for this platform, if one can be resolved.
pub fn default_config_path() -> Option<PathBuf> {
    match ProjectDirs::from("", "", constants::APP_ID) {
        Some(proj_dirs) => {
            let path = proj_dirs.config_dir().join(constants::CONFIG_FILE_NAME);
            tracing::debug!(path = %path.display(), "Platform config path resolved");
            Some(path)
        }
        None => {
            tracing::debug!("Could not determine platform config directory");
            None
        }
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[parsing]` section.
    pub parsing: ParsingSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
    /// `[output]` section.
    pub output: OutputSection,
}

/// `[parsing]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ParsingSection {
    /// Malformed-line policy: "skip", "marker" or "fail".
    pub malformed_lines: Option<String>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

/// `[output]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct OutputSection {
    /// Print per-stage call counts and timings to stderr after the run.
    pub profile: Option<bool>,
}

/// Validated application configuration derived from `config.toml`.
///
/// Invalid values produce warnings and fall back to defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// How malformed lines are handled when a filter is active.
    pub malformed_policy: MalformedPolicy,
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
    /// Whether to print the profiling report.
    pub profile: bool,
}

/// Load and validate the config file at `config_path`.
///
/// Returns the validated config and a list of non-fatal problems. A missing
/// file yields defaults with no warnings. An unreadable or unparseable file
/// yields defaults plus a warning describing why.
pub fn load_config(config_path: &Path) -> (AppConfig, Vec<ConfigError>) {
    let mut warnings = Vec::new();

    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "No config.toml found; using defaults");
        return (AppConfig::default(), warnings);
    }

    let content = match std::fs::read_to_string(config_path) {
        Ok(c) => c,
        Err(e) => {
            warnings.push(ConfigError::Io {
                path: config_path.to_path_buf(),
                source: e,
            });
            return (AppConfig::default(), warnings);
        }
    };

    match parse_config(&content, config_path) {
        Ok((config, value_warnings)) => {
            tracing::debug!(path = %config_path.display(), "Loaded config.toml");
            (config, value_warnings)
        }
        Err(e) => {
            warnings.push(e);
            (AppConfig::default(), warnings)
        }
    }
}

/// Parse and validate config.toml content.
///
/// Fails only when the TOML itself cannot be parsed; each out-of-range value
/// is reported as a warning and left at its default.
pub fn parse_config(
    content: &str,
    config_path: &Path,
) -> Result<(AppConfig, Vec<ConfigError>), ConfigError> {
    let raw: RawConfig = toml::from_str(content).map_err(|e| ConfigError::TomlParse {
        path: config_path.to_path_buf(),
        source: e,
    })?;

    let mut config = AppConfig::default();
    let mut warnings = Vec::new();

    // -- Parsing: malformed_lines --
    if let Some(ref policy) = raw.parsing.malformed_lines {
        match policy.parse::<MalformedPolicy>() {
            Ok(p) => config.malformed_policy = p,
            Err(_) => warnings.push(ConfigError::InvalidValue {
                field: "[parsing] malformed_lines".to_string(),
                value: policy.clone(),
                expected: "\"skip\", \"marker\" or \"fail\"".to_string(),
            }),
        }
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        if constants::VALID_LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.to_lowercase());
        } else {
            warnings.push(ConfigError::InvalidValue {
                field: "[logging] level".to_string(),
                value: level.clone(),
                expected: constants::VALID_LOG_LEVELS.join(", "),
            });
        }
    }

    // -- Output: profile --
    if let Some(profile) = raw.output.profile {
        config.profile = profile;
    }

    Ok((config, warnings))
}
