pub mod chart;
pub mod cli;
pub mod commands;
pub mod config;
pub mod dataset;
pub mod error;
pub mod logging;
pub mod report;
pub mod store;
pub mod summary;

pub use error::{ReportError, Result};

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_INPUT_ERROR: i32 = 1;
pub const EXIT_RUNTIME_ERROR: i32 = 2;

/// Exit code for a failed command: rejected input versus everything else.
#[must_use]
pub const fn exit_code(err: &ReportError) -> i32 {
    if err.is_input_error() {
        EXIT_INPUT_ERROR
    } else {
        EXIT_RUNTIME_ERROR
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
