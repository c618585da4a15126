//! Logging setup shared by the commands.

use crate::Result;
use camino::Utf8Path;
use clap::ValueEnum;
use ohno::IntoAppError;
use std::fs::File;

/// Log level for diagnostic output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    #[value(alias = "0")]
    None,

    /// Only error messages
    Error,

    /// Warning and error messages
    Warn,

    /// Info, warning, and error messages
    #[value(alias = "1")]
    Info,

    /// Debug, info, warning, and error messages
    #[value(alias = "2")]
    Debug,

    /// Trace, debug, info, warning, and error messages
    Trace,
}

/// Initialize the logger, optionally sending output to `log_file` instead of stderr.
///
/// A logger that is already installed is left in place.
pub fn init_logging(log_level: LogLevel, log_file: Option<&Utf8Path>) -> Result<()> {
    let level = match log_level {
        LogLevel::None => return Ok(()),
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    };

    let env = env_logger::Env::default().filter_or("RUST_LOG", level);
    let mut builder = env_logger::Builder::from_env(env);
    let _ = builder
        .format_module_path(false)
        .format_target(matches!(log_level, LogLevel::Debug | LogLevel::Trace));

    if let Some(path) = log_file {
        let file = File::create(path).into_app_err_with(|| format!("creating log file '{path}'"))?;
        let _ = builder.target(env_logger::Target::Pipe(Box::new(file))).write_style(env_logger::WriteStyle::Never);
    } else {
        let _ = builder.format_timestamp(None);
    }

    if builder.try_init().is_err() {
        log::debug!("Logger already initialized, keeping the existing one");
    }

    Ok(())
}
