use tracing::info;

use super::{read_input, report_failure, write_output};
use crate::EXIT_SUCCESS;
use crate::cli::SummarizeArgs;
use crate::error::Result;
use crate::summary::{DatasetSummary, summarize_csv};

#[must_use]
pub fn run_summarize(args: &SummarizeArgs) -> i32 {
    match run_summarize_impl(args) {
        Ok(_) => EXIT_SUCCESS,
        Err(e) => report_failure(&e),
    }
}

/// Summarize a CSV file and emit the JSON to stdout or `--output`.
///
/// # Errors
/// Returns an error if the file cannot be read or is not a valid dataset.
pub fn run_summarize_impl(args: &SummarizeArgs) -> Result<DatasetSummary> {
    let raw = read_input(&args.input)?;
    let result = summarize_csv(&raw)?;
    let json = serde_json::to_string_pretty(&result)?;

    match &args.output {
        Some(path) => {
            write_output(path, json.as_bytes())?;
            info!(path = %path.display(), "wrote summary");
        }
        None => println!("{json}"),
    }
    Ok(result)
}

#[cfg(test)]
#[path = "summarize_tests.rs"]
mod tests;
