//! NutriScan CLI library.
//!
//! This library provides the core functionality for the `nutriscan` command-line
//! interface, including configuration management, OCR invocation, command
//! execution, and output formatting.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod ocr;
pub mod output;
pub mod repl;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
