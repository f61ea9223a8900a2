use std::fs;

use super::report_failure;
use crate::EXIT_SUCCESS;
use crate::cli::InitArgs;
use crate::config::DEFAULT_CONFIG_TEMPLATE;
use crate::error::{ReportError, Result};

#[must_use]
pub fn run_init(args: &InitArgs) -> i32 {
    match run_init_impl(args) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => report_failure(&e),
    }
}

/// Writes the commented default configuration.
///
/// # Errors
/// Returns an error if the file already exists (without --force) or cannot be written.
pub fn run_init_impl(args: &InitArgs) -> Result<()> {
    let output_path = &args.output;

    if output_path.exists() && !args.force {
        return Err(ReportError::Config(format!(
            "Configuration file already exists: {}. Use --force to overwrite.",
            output_path.display()
        )));
    }

    fs::write(output_path, DEFAULT_CONFIG_TEMPLATE).map_err(|source| ReportError::FileAccess {
        path: output_path.clone(),
        source,
    })?;

    println!("Created configuration file: {}", output_path.display());
    Ok(())
}

#[cfg(test)]
#[path = "init_tests.rs"]
mod tests;
