//! Query result decoding
//!
//! The store reports query metadata in response headers and streams the
//! matched records as the raw body:
//!
//! ```text
//! X-Oklog-Engine: lazy
//! X-Oklog-From: 2024-03-10T11:00:00Z
//! X-Oklog-To: 2024-03-10T12:00:00Z
//! X-Oklog-Q: err
//! X-Oklog-Nodes-Queried: 3
//! X-Oklog-Segments-Queried: 5
//! X-Oklog-Records-Queried: 100
//! X-Oklog-Records-Matched: 2
//! X-Oklog-Error-Count: 0
//!
//! <record bytes>
//! ```

use reqwest::header::HeaderMap;

use super::error::{QueryError, Result};
use super::records::RecordStream;

pub const HEADER_ENGINE: &str = "X-Oklog-Engine";
pub const HEADER_FROM: &str = "X-Oklog-From";
pub const HEADER_TO: &str = "X-Oklog-To";
pub const HEADER_Q: &str = "X-Oklog-Q";
pub const HEADER_NODES_QUERIED: &str = "X-Oklog-Nodes-Queried";
pub const HEADER_SEGMENTS_QUERIED: &str = "X-Oklog-Segments-Queried";
pub const HEADER_RECORDS_QUERIED: &str = "X-Oklog-Records-Queried";
pub const HEADER_RECORDS_MATCHED: &str = "X-Oklog-Records-Matched";
pub const HEADER_ERROR_COUNT: &str = "X-Oklog-Error-Count";

/// Counters reported by the store for one query
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryStats {
    pub nodes_queried: u64,
    pub segments_queried: u64,
    pub records_queried: u64,
    pub records_matched: u64,
    pub error_count: u64,
}

/// Decoded store response
#[derive(Debug)]
pub struct QueryResult {
    /// Engine the store actually used
    pub engine: String,
    pub from: String,
    pub to: String,
    /// Query expression as the store understood it
    pub expression: String,
    pub stats: QueryStats,
    /// Matched record bytes; released on close or drop
    pub records: RecordStream,
}

impl QueryResult {
    /// Decode the metadata envelope and attach `body` as the record stream.
    ///
    /// For metadata-only queries the body is released immediately and the
    /// result carries an empty stream, whatever the store sent. On error the
    /// body is released before returning.
    pub fn decode(headers: &HeaderMap, mut body: RecordStream, stats_only: bool) -> Result<Self> {
        let envelope = match Envelope::decode(headers) {
            Ok(envelope) => envelope,
            Err(e) => {
                body.close();
                return Err(e);
            }
        };

        let records = if stats_only {
            body.close();
            RecordStream::empty()
        } else {
            body
        };

        Ok(Self {
            engine: envelope.engine,
            from: envelope.from,
            to: envelope.to,
            expression: envelope.expression,
            stats: envelope.stats,
            records,
        })
    }

    /// Decode a transport response, keeping its body as the record stream.
    pub fn from_response(response: reqwest::Response, stats_only: bool) -> Result<Self> {
        let headers = response.headers().clone();
        Self::decode(&headers, RecordStream::new(response), stats_only)
    }
}

struct Envelope {
    engine: String,
    from: String,
    to: String,
    expression: String,
    stats: QueryStats,
}

impl Envelope {
    fn decode(headers: &HeaderMap) -> Result<Self> {
        Ok(Self {
            engine: text_header(headers, HEADER_ENGINE)?,
            from: text_header(headers, HEADER_FROM)?,
            to: text_header(headers, HEADER_TO)?,
            expression: text_header(headers, HEADER_Q)?,
            stats: QueryStats {
                nodes_queried: counter_header(headers, HEADER_NODES_QUERIED)?,
                segments_queried: counter_header(headers, HEADER_SEGMENTS_QUERIED)?,
                records_queried: counter_header(headers, HEADER_RECORDS_QUERIED)?,
                records_matched: counter_header(headers, HEADER_RECORDS_MATCHED)?,
                error_count: counter_header(headers, HEADER_ERROR_COUNT)?,
            },
        })
    }
}

fn text_header(headers: &HeaderMap, name: &'static str) -> Result<String> {
    let value = headers
        .get(name)
        .ok_or_else(|| malformed(name, "missing".to_string()))?;

    let text = std::str::from_utf8(value.as_bytes())
        .map_err(|e| malformed(name, format!("not valid UTF-8: {}", e)))?;

    Ok(text.to_string())
}

fn counter_header(headers: &HeaderMap, name: &'static str) -> Result<u64> {
    let text = text_header(headers, name)?;
    text.trim()
        .parse()
        .map_err(|e| malformed(name, format!("expected an unsigned integer, got {:?}: {}", text, e)))
}

fn malformed(header: &'static str, reason: String) -> QueryError {
    QueryError::MalformedResultEnvelope { header, reason }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::records::testing::{releases, TrackedSource};
    use reqwest::header::{HeaderName, HeaderValue};

    fn set(headers: &mut HeaderMap, name: &str, value: HeaderValue) {
        headers.insert(HeaderName::from_bytes(name.as_bytes()).unwrap(), value);
    }

    fn envelope() -> HeaderMap {
        let mut headers = HeaderMap::new();
        for (name, value) in [
            (HEADER_ENGINE, "lazy"),
            (HEADER_FROM, "2024-03-10T11:00:00Z"),
            (HEADER_TO, "2024-03-10T12:00:00Z"),
            (HEADER_Q, "err"),
            (HEADER_NODES_QUERIED, "3"),
            (HEADER_SEGMENTS_QUERIED, "5"),
            (HEADER_RECORDS_QUERIED, "100"),
            (HEADER_RECORDS_MATCHED, "2"),
            (HEADER_ERROR_COUNT, "0"),
        ] {
            set(&mut headers, name, HeaderValue::from_static(value));
        }
        headers
    }

    #[tokio::test]
    async fn test_decode_full_result() {
        let (source, released) = TrackedSource::with_chunks(&["a\n", "b\n"]);
        let mut result = QueryResult::decode(&envelope(), RecordStream::new(source), false).unwrap();

        assert_eq!(result.engine, "lazy");
        assert_eq!(result.from, "2024-03-10T11:00:00Z");
        assert_eq!(result.to, "2024-03-10T12:00:00Z");
        assert_eq!(result.expression, "err");
        assert_eq!(
            result.stats,
            QueryStats {
                nodes_queried: 3,
                segments_queried: 5,
                records_queried: 100,
                records_matched: 2,
                error_count: 0,
            }
        );

        // Body is left unread
        assert_eq!(releases(&released), 0);
        let mut out = Vec::new();
        result.records.copy_to(&mut out).await.unwrap();
        assert_eq!(out, b"a\nb\n");

        drop(result);
        assert_eq!(releases(&released), 1);
    }

    #[tokio::test]
    async fn test_stats_only_discards_body() {
        let (source, released) = TrackedSource::with_chunks(&["unexpected"]);
        let mut result = QueryResult::decode(&envelope(), RecordStream::new(source), true).unwrap();

        assert_eq!(releases(&released), 1);
        assert!(result.records.is_closed());

        let mut out = Vec::new();
        assert_eq!(result.records.copy_to(&mut out).await.unwrap(), 0);
        assert!(out.is_empty());

        drop(result);
        assert_eq!(releases(&released), 1);
    }

    #[test]
    fn test_empty_expression_is_valid() {
        let mut headers = envelope();
        set(&mut headers, HEADER_Q, HeaderValue::from_static(""));

        let result = QueryResult::decode(&headers, RecordStream::empty(), false).unwrap();
        assert_eq!(result.expression, "");
    }

    #[test]
    fn test_missing_header_is_malformed() {
        for name in [HEADER_ENGINE, HEADER_Q, HEADER_RECORDS_MATCHED, HEADER_ERROR_COUNT] {
            let mut headers = envelope();
            headers.remove(name);

            let (source, released) = TrackedSource::with_chunks(&["x"]);
            let err = QueryResult::decode(&headers, RecordStream::new(source), false).unwrap_err();

            match err {
                QueryError::MalformedResultEnvelope { header, reason } => {
                    assert_eq!(header, name);
                    assert_eq!(reason, "missing");
                }
                other => panic!("unexpected error: {other}"),
            }
            assert_eq!(releases(&released), 1);
        }
    }

    #[test]
    fn test_non_numeric_counter_is_malformed() {
        for bad in ["many", "-1", "1.5", ""] {
            let mut headers = envelope();
            set(&mut headers, HEADER_SEGMENTS_QUERIED, HeaderValue::from_str(bad).unwrap());

            let err = QueryResult::decode(&headers, RecordStream::empty(), false).unwrap_err();
            assert!(matches!(
                err,
                QueryError::MalformedResultEnvelope {
                    header: HEADER_SEGMENTS_QUERIED,
                    ..
                }
            ));
        }
    }

    #[test]
    fn test_non_utf8_text_is_malformed() {
        let mut headers = envelope();
        set(&mut headers, HEADER_FROM, HeaderValue::from_bytes(b"\xff\xfe").unwrap());

        let err = QueryResult::decode(&headers, RecordStream::empty(), false).unwrap_err();
        assert!(matches!(
            err,
            QueryError::MalformedResultEnvelope {
                header: HEADER_FROM,
                ..
            }
        ));
    }
}
