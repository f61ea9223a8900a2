use std::path::Path;

use super::{CommandContext, DatasetView, read_input, report_failure};
use crate::EXIT_SUCCESS;
use crate::cli::{Cli, UploadArgs};
use crate::error::Result;
use crate::store::DatasetStore;
use crate::summary::summarize_csv;

#[must_use]
pub fn run_upload(args: &UploadArgs, cli: &Cli) -> i32 {
    match CommandContext::from_cli(cli).and_then(|ctx| run_upload_impl(args, &ctx)) {
        Ok(_) => EXIT_SUCCESS,
        Err(e) => report_failure(&e),
    }
}

/// Summarize and persist a CSV file, then print the stored view.
///
/// Nothing is stored when the file fails to parse or lacks a required
/// column.
///
/// # Errors
/// Returns an error if the file is rejected or the store cannot be written.
pub fn run_upload_impl(args: &UploadArgs, ctx: &CommandContext) -> Result<DatasetView> {
    let raw = read_input(&args.input)?;
    let result = summarize_csv(&raw)?;
    let filename = args
        .name
        .clone()
        .unwrap_or_else(|| display_name(&args.input));

    let record = ctx
        .store()
        .insert(&filename, args.owner.as_deref(), &raw, &result.summary)?;
    let view = DatasetView::new(record, result.preview_rows);
    println!("{}", serde_json::to_string_pretty(&view)?);
    Ok(view)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into_owned())
}

#[cfg(test)]
#[path = "upload_tests.rs"]
mod tests;
