use crate::symbolic::symbolic_errors::TaskError;
use log::info;
use simplelog::*;
use std::fs::File;
use std::path::Path;

/// Maps a level name to a filter; `off` and `none` disable logging.
pub fn parse_log_level(level: &str) -> Result<LevelFilter, TaskError> {
    match level.to_lowercase().as_str() {
        "debug" => Ok(LevelFilter::Debug),
        "info" => Ok(LevelFilter::Info),
        "warn" => Ok(LevelFilter::Warn),
        "error" => Ok(LevelFilter::Error),
        "off" | "none" => Ok(LevelFilter::Off),
        _ => Err(TaskError::UnknownLogLevel(level.to_string())),
    }
}

/// Installs a terminal logger and, if `log_file` is given, a file logger at the same level.
/// A logger installed earlier in the process is kept.
pub fn init_logger(level: LevelFilter, log_file: Option<&Path>) -> Result<(), TaskError> {
    if level == LevelFilter::Off {
        return Ok(());
    }
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    if let Some(path) = log_file {
        let file = File::create(path)?;
        loggers.push(WriteLogger::new(level, Config::default(), file));
    }
    if CombinedLogger::init(loggers).is_ok() {
        info!("logging started with level {}", level);
    }
    Ok(())
}
