use super::{CommandContext, DatasetView, report_failure, stored_preview};
use crate::EXIT_SUCCESS;
use crate::cli::{Cli, ShowArgs};
use crate::error::Result;
use crate::store::DatasetStore;

#[must_use]
pub fn run_show(args: &ShowArgs, cli: &Cli) -> i32 {
    match CommandContext::from_cli(cli).and_then(|ctx| run_show_impl(args, &ctx)) {
        Ok(_) => EXIT_SUCCESS,
        Err(e) => report_failure(&e),
    }
}

/// Print the stored summary with preview rows re-read from the upload.
///
/// # Errors
/// Returns `ReportError::DatasetNotFound` for unknown ids.
pub fn run_show_impl(args: &ShowArgs, ctx: &CommandContext) -> Result<DatasetView> {
    let store = ctx.store();
    let record = store.require(args.id)?;
    let preview = stored_preview(&store, &record);
    let view = DatasetView::new(record, preview);
    println!("{}", serde_json::to_string_pretty(&view)?);
    Ok(view)
}

#[cfg(test)]
#[path = "show_tests.rs"]
mod tests;
