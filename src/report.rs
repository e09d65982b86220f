//! Result Reporting
//!
//! Prints the query statistics to the diagnostic sink, then copies (or drops)
//! the record bytes. The record stream is always released before returning.

use std::io::Write;
use std::time::Duration;

use crate::query::{QueryError, QueryResult, Result};

/// What a report did with the record stream
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportSummary {
    pub bytes_copied: u64,
}

/// Write the statistics for `result`, then forward its records to `out`
/// unless `suppress_body` is set.
///
/// Diagnostics are written before any record bytes. A failed copy is returned
/// as [`QueryError::Copy`] after the stream has been released; the lines
/// already written to `diag` stand.
pub async fn report<O, D>(
    mut result: QueryResult,
    suppress_body: bool,
    elapsed: Duration,
    out: &mut O,
    diag: &mut D,
) -> Result<ReportSummary>
where
    O: Write + ?Sized,
    D: Write + ?Sized,
{
    if let Err(e) = write_statistics(&result, elapsed, diag) {
        result.records.close();
        return Err(QueryError::Diagnostics(e));
    }

    let copied = if suppress_body {
        Ok(0)
    } else {
        result.records.copy_to(out).await
    };
    result.records.close();

    let bytes_copied = copied.map_err(QueryError::Copy)?;
    tracing::debug!(bytes_copied, suppress_body, "records forwarded");

    Ok(ReportSummary { bytes_copied })
}

fn write_statistics<D: Write + ?Sized>(
    result: &QueryResult,
    elapsed: Duration,
    diag: &mut D,
) -> std::io::Result<()> {
    let stats = &result.stats;

    writeln!(diag, "Response in {:?}", elapsed)?;
    writeln!(diag, "Used engine {}", result.engine)?;
    writeln!(diag, "Queried from {}", result.from)?;
    writeln!(diag, "Queried to {}", result.to)?;
    writeln!(diag, "Queried expression {:?}", result.expression)?;
    writeln!(diag, "{} node(s) queried", stats.nodes_queried)?;
    writeln!(diag, "{} segment(s) queried", stats.segments_queried)?;
    writeln!(diag, "{} record(s) queried", stats.records_queried)?;
    writeln!(diag, "{} record(s) matched", stats.records_matched)?;
    writeln!(diag, "{} error(s)", stats.error_count)?;
    diag.flush()
}
