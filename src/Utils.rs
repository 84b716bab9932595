//! different utility modules used by the command-line driver
/// tiny module to set up logging (terminal and optional log file)
pub mod logger;
/// parse task file with the function, Taylor series, tangent and plot range sections
pub mod task_parser;
/// run a parsed task through the symbolic pipeline
pub mod task_report;
///
mod task_parser_tests;
