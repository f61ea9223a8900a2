use std::path::PathBuf;

use tracing::{debug, info};

use super::{CommandContext, generated_by, read_input, report_failure, write_output};
use crate::EXIT_SUCCESS;
use crate::cli::{Cli, ComposeArgs};
use crate::error::Result;
use crate::report::{ComposeContext, RenderedReport, ReportRequest};

#[must_use]
pub fn run_compose(args: &ComposeArgs, cli: &Cli) -> i32 {
    match CommandContext::from_cli(cli).and_then(|ctx| run_compose_impl(args, &ctx)) {
        Ok(_) => EXIT_SUCCESS,
        Err(e) => report_failure(&e),
    }
}

/// Compose an ad-hoc report from a JSON request file, or stdin for `-`.
///
/// The PDF lands at `--output`, else at the request's sanitized filename.
///
/// # Errors
/// Returns `ReportError::Parse` for malformed requests, or an error if the
/// document cannot be composed or written.
pub fn run_compose_impl(args: &ComposeArgs, ctx: &CommandContext) -> Result<(PathBuf, RenderedReport)> {
    let payload = read_input(&args.request)?;
    let request = ReportRequest::from_json(&payload)?;
    debug!(
        types = request.summary.type_count(),
        preview = request.preview().len(),
        "parsed report request"
    );

    let context = ComposeContext::new(generated_by(args.generated_by.as_deref()));
    let rendered = ctx.composer().compose(&request, &context)?;
    let path = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(&rendered.filename));
    write_output(&path, &rendered.bytes)?;

    info!(path = %path.display(), pages = rendered.page_count, "wrote report");
    println!("Wrote {}", path.display());
    Ok((path, rendered))
}

#[cfg(test)]
#[path = "compose_tests.rs"]
mod tests;
