use std::path::PathBuf;

use tracing::info;

use super::{CommandContext, generated_by, report_failure, stored_preview, write_output};
use crate::EXIT_SUCCESS;
use crate::cli::{Cli, ReportArgs};
use crate::error::Result;
use crate::report::{ComposeContext, RenderedReport, ReportRequest};
use crate::store::DatasetStore;
use crate::summary::DatasetSummary;

/// Attachment name of a stored dataset's report.
#[must_use]
pub fn report_filename(id: u64) -> String {
    format!("report_dataset_{id}.pdf")
}

#[must_use]
pub fn run_report(args: &ReportArgs, cli: &Cli) -> i32 {
    match CommandContext::from_cli(cli).and_then(|ctx| run_report_impl(args, &ctx)) {
        Ok(_) => EXIT_SUCCESS,
        Err(e) => report_failure(&e),
    }
}

/// Compose the full report of a stored dataset and write it to disk.
///
/// Returns the written path and the rendered report.
///
/// # Errors
/// Returns `ReportError::DatasetNotFound` for unknown ids, or an error if
/// the document cannot be composed or written.
pub fn run_report_impl(args: &ReportArgs, ctx: &CommandContext) -> Result<(PathBuf, RenderedReport)> {
    let store = ctx.store();
    let record = store.require(args.id)?;
    let preview_rows = stored_preview(&store, &record);

    let request = ReportRequest::for_dataset(
        DatasetSummary {
            summary: record.summary.clone(),
            preview_rows,
        },
        args.chart_type,
    )
    .with_filename(report_filename(record.id));
    let context = ComposeContext::new(generated_by(args.generated_by.as_deref()))
        .with_source(record.original_filename.clone());

    let rendered = ctx.composer().compose(&request, &context)?;
    let path = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(&rendered.filename));
    write_output(&path, &rendered.bytes)?;

    info!(id = record.id, path = %path.display(), "wrote report");
    println!(
        "Wrote {} ({} page{})",
        path.display(),
        rendered.page_count,
        if rendered.page_count == 1 { "" } else { "s" }
    );
    Ok((path, rendered))
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;
