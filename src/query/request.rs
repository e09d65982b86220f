//! Query request construction
//!
//! Builds the method and target URL for a single store query. Construction is
//! pure: the same inputs always produce the same target, byte for byte.

use reqwest::{Method, Url};
use std::fmt;

use super::engine::Engine;
use super::error::{QueryError, Result};
use crate::time::ResolvedTime;

/// Path of the store's query endpoint
pub const QUERY_PATH: &str = "/store/query";

/// HTTP method used for a query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryMethod {
    /// Statistics and records
    Get,
    /// Statistics only
    Head,
}

impl QueryMethod {
    pub fn for_stats_only(stats_only: bool) -> Self {
        if stats_only {
            QueryMethod::Head
        } else {
            QueryMethod::Get
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QueryMethod::Get => "GET",
            QueryMethod::Head => "HEAD",
        }
    }
}

impl fmt::Display for QueryMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<QueryMethod> for Method {
    fn from(method: QueryMethod) -> Self {
        match method {
            QueryMethod::Get => Method::GET,
            QueryMethod::Head => Method::HEAD,
        }
    }
}

/// A fully specified query, ready to send
#[derive(Debug, Clone)]
pub struct QueryRequest {
    pub engine: Engine,
    pub from: ResolvedTime,
    pub to: ResolvedTime,
    pub expression: String,
    pub stats_only: bool,
    method: QueryMethod,
    url: Url,
}

impl QueryRequest {
    /// Assemble a request against `store_address` (`host:port`, or a base URL
    /// with an explicit `http://`/`https://` scheme).
    pub fn build(
        store_address: &str,
        engine: Engine,
        from: ResolvedTime,
        to: ResolvedTime,
        expression: &str,
        stats_only: bool,
    ) -> Result<Self> {
        let target = format!(
            "{}{}?engine={}&from={}&to={}&q={}",
            base_url(store_address)?,
            QUERY_PATH,
            urlencoding::encode(engine.as_str()),
            urlencoding::encode(from.as_str()),
            urlencoding::encode(to.as_str()),
            urlencoding::encode(expression),
        );

        let url = Url::parse(&target).map_err(|e| {
            QueryError::RequestConstruction(format!("invalid store address {:?}: {}", store_address, e))
        })?;

        Ok(Self {
            engine,
            from,
            to,
            expression: expression.to_string(),
            stats_only,
            method: QueryMethod::for_stats_only(stats_only),
            url,
        })
    }

    pub fn method(&self) -> QueryMethod {
        self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The request target as sent on the wire
    pub fn target(&self) -> &str {
        self.url.as_str()
    }
}

fn base_url(store_address: &str) -> Result<String> {
    let address = store_address.trim().trim_end_matches('/');
    if address.is_empty() {
        return Err(QueryError::RequestConstruction(
            "store address is empty".to_string(),
        ));
    }

    if address.starts_with("http://") || address.starts_with("https://") {
        Ok(address.to_string())
    } else {
        Ok(format!("http://{}", address))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::{resolve, TimeField};
    use chrono::DateTime;

    fn window() -> (ResolvedTime, ResolvedTime) {
        let now = DateTime::parse_from_rfc3339("2024-03-10T12:00:00.5+01:00").unwrap();
        (
            resolve(TimeField::From, "-1h", now).unwrap(),
            resolve(TimeField::To, "now", now).unwrap(),
        )
    }

    #[test]
    fn test_build_get_request() {
        let (from, to) = window();
        let request =
            QueryRequest::build("localhost:7650", Engine::Lazy, from, to, "err", false).unwrap();

        assert_eq!(request.method(), QueryMethod::Get);
        assert_eq!(
            request.target(),
            "http://localhost:7650/store/query?engine=lazy\
             &from=2024-03-10T11%3A00%3A00.5%2B01%3A00\
             &to=2024-03-10T12%3A00%3A00.5%2B01%3A00&q=err"
        );
    }

    #[test]
    fn test_stats_only_uses_head() {
        let (from, to) = window();
        let request =
            QueryRequest::build("localhost:7650", Engine::Naive, from, to, "", true).unwrap();

        assert_eq!(request.method(), QueryMethod::Head);
        assert_eq!(Method::from(request.method()), Method::HEAD);
        assert!(request.target().ends_with("&q="));
    }

    #[test]
    fn test_engine_name_is_escaped() {
        let (from, to) = window();
        let engine: Engine = "naïve".parse().unwrap();
        let request = QueryRequest::build("h:1", engine, from, to, "", false).unwrap();

        assert!(request
            .target()
            .starts_with("http://h:1/store/query?engine=na%C3%AFve&from="));
    }

    #[test]
    fn test_build_is_deterministic() {
        let (from, to) = window();
        let a = QueryRequest::build("store:7650", Engine::Ripgrep, from.clone(), to.clone(), "a b", false)
            .unwrap();
        let b = QueryRequest::build("store:7650", Engine::Ripgrep, from, to, "a b", false).unwrap();
        assert_eq!(a.target(), b.target());
    }

    #[test]
    fn test_expression_is_escaped() {
        let (from, to) = window();
        let expression = "level=error & msg=\"a+b\" #1 ?x /y";
        let request =
            QueryRequest::build("localhost:7650", Engine::Lazy, from, to, expression, false).unwrap();

        let query = request.target().split_once('?').unwrap().1;
        let params: Vec<&str> = query.split('&').collect();
        assert_eq!(params.len(), 4);
        assert_eq!(params[0], "engine=lazy");
        assert!(params[1].starts_with("from="));
        assert!(params[2].starts_with("to="));

        let q = params[3].strip_prefix("q=").unwrap();
        for delimiter in ['&', '=', '?', '#', ' ', '+', '"', '/'] {
            assert!(!q.contains(delimiter), "{:?} leaked into {}", delimiter, q);
        }
        assert_eq!(urlencoding::decode(q).unwrap(), expression);

        let decoded: Vec<(String, String)> = request
            .url()
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(decoded[3], ("q".to_string(), expression.to_string()));
    }

    #[test]
    fn test_store_address_forms() {
        let (from, to) = window();

        let request =
            QueryRequest::build("https://logs.example.com/", Engine::Lazy, from.clone(), to.clone(), "", false)
                .unwrap();
        assert!(request
            .target()
            .starts_with("https://logs.example.com/store/query?"));

        let err = QueryRequest::build("  ", Engine::Lazy, from.clone(), to.clone(), "", false).unwrap_err();
        assert!(matches!(err, QueryError::RequestConstruction(_)));

        let err = QueryRequest::build("bad host:7650", Engine::Lazy, from, to, "", false).unwrap_err();
        assert!(matches!(err, QueryError::RequestConstruction(_)));
    }
}
