//! Query command
//!
//! Runs one query end to end:
//!
//! ```text
//! resolve -from/-to (one shared now) → build request → execute → decode → report
//! ```

use chrono::{DateTime, FixedOffset};
use std::io::Write;
use std::time::Instant;

use crate::cli::QueryCommand;
use crate::client::StoreClient;
use crate::query::{QueryError, QueryRequest, QueryResult, Result};
use crate::report::{report, ReportSummary};
use crate::time::{resolve, TimeField};

/// Run `command` against the store, writing records to `out` and the window
/// and statistics to `diag`.
///
/// `now` anchors both ends of the window, so `-from -1h -to now` always spans
/// exactly one hour.
pub async fn run<O, D>(
    command: &QueryCommand,
    client: &StoreClient,
    now: DateTime<FixedOffset>,
    out: &mut O,
    diag: &mut D,
) -> Result<ReportSummary>
where
    O: Write + ?Sized,
    D: Write + ?Sized,
{
    let begin = Instant::now();

    let from = resolve(TimeField::From, &command.from, now)?;
    let to = resolve(TimeField::To, &command.to, now)?;
    writeln!(diag, "-from {} -to {}", from, to).map_err(QueryError::Diagnostics)?;
    tracing::debug!(%from, %to, engine = %command.engine, "resolved query window");

    let request = QueryRequest::build(
        &command.store,
        command.engine,
        from,
        to,
        &command.expression,
        command.stats_only,
    )?;

    let response = client.execute(&request).await?;
    let result = QueryResult::from_response(response, request.stats_only)?;

    report(result, command.suppress_body, begin.elapsed(), out, diag).await
}
