use std::io::Write;

use log::LevelFilter;

/// Where and how much the logger writes for a given set of global flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LogConfig {
    pub level: LevelFilter,
    /// `--json` reserves stdout for the JSON document.
    pub to_stderr: bool,
    pub timestamps: bool,
}

impl LogConfig {
    pub(crate) fn from_flags(quiet: bool, verbose: bool, json: bool) -> Self {
        let level = if quiet {
            LevelFilter::Warn
        } else if verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        };
        Self {
            level,
            to_stderr: json,
            timestamps: verbose,
        }
    }
}

/// Install the logger used for all human-readable output.
///
/// Normal runs print bare messages to stdout. `--verbose` adds debug
/// messages with timestamps and module targets; `--quiet` keeps only
/// warnings and errors. With `--json` everything logged goes to stderr.
/// `RUST_LOG` still overrides the level.
pub(crate) fn init(config: LogConfig) {
    let target = if config.to_stderr {
        env_logger::Target::Stderr
    } else {
        env_logger::Target::Stdout
    };

    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(config.level)
        .target(target)
        .parse_default_env();

    if config.timestamps {
        builder.format(|buf, record| {
            writeln!(
                buf,
                "{} {:<5} {}] {}",
                buf.timestamp_millis(),
                record.level(),
                record.target(),
                record.args()
            )
        });
    } else {
        builder.format(|buf, record| writeln!(buf, "{}", record.args()));
    }

    // A logger may already be installed when running under a test harness.
    let _ = builder.try_init();
}

/// Log an empty line (keeps output quiet-aware).
pub(crate) fn log_blank() {
    log::info!("");
}

#[cfg(test)]
#[path = "tests/logging_tests.rs"]
mod tests;
