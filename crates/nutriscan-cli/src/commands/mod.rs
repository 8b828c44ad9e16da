//! Command implementations.

mod analyze;
mod config;
mod parse;

pub use analyze::execute_analyze;
pub use config::execute_config;
pub use parse::execute_parse;

use crate::error::{CliError, Result};
use std::io::Read;
use std::path::Path;

/// Read the whole input from a file or from stdin.
pub(crate) fn read_input(file: Option<&Path>, stdin: bool) -> Result<String> {
    match (file, stdin) {
        (Some(path), _) => Ok(std::fs::read_to_string(path)?),
        (None, true) => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
        (None, false) => Err(CliError::InvalidInput("No input given".to_string())),
    }
}
