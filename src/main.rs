#![allow(non_snake_case)]
use RustedDiff::Utils::logger::{init_logger, parse_log_level};
use RustedDiff::Utils::task_parser::DiffTask;
use RustedDiff::symbolic::symbolic_errors::SymbolicError;
use clap::Parser;
use log::error;
use std::path::PathBuf;
use std::process::ExitCode;

/// Differentiates the function of a task file, expands it into a Taylor series and
/// builds its tangent line
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct CliArgs {
    /// Path to the task file
    task_file: PathBuf,
    /// One of debug, info, warn, error, off
    #[arg(long, default_value = "info")]
    loglevel: String,
    /// Also write the log to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn run(args: &CliArgs) -> Result<(), SymbolicError> {
    let level = parse_log_level(&args.loglevel)?;
    init_logger(level, args.log_file.as_deref())?;
    let task = DiffTask::from_file(&args.task_file)?;
    let report = task.solve()?;
    print!("{}", report);
    Ok(())
}

fn main() -> ExitCode {
    let args = CliArgs::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
