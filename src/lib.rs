//! # Sluice
//!
//! Command-line client for querying a remote log store over a time window.
//! Matching records stream to stdout; the resolved window and the store's
//! query statistics go to stderr.
//!
//! ## Modules
//!
//! - [`time`]: `-from`/`-to` parsing (durations, RFC 3339, `now`)
//! - [`query`]: Request construction, result envelope, record stream
//! - [`client`]: HTTP transport to the store
//! - [`report`]: Statistics and record output
//! - [`command`]: The end-to-end query pipeline
//! - [`cli`], [`config`], [`logging`]: Process plumbing
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chrono::Local;
//! use sluice::cli::QueryCommand;
//! use sluice::{command, Config, Engine, StoreClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let client = StoreClient::new(&config.store)?;
//!
//!     let query = QueryCommand {
//!         store: config.store.address.clone(),
//!         engine: Engine::Lazy,
//!         from: "-15m".to_string(),
//!         to: "now".to_string(),
//!         expression: "level=error".to_string(),
//!         stats_only: false,
//!         suppress_body: false,
//!     };
//!
//!     let summary = command::run(
//!         &query,
//!         &client,
//!         Local::now().fixed_offset(),
//!         &mut std::io::stdout(),
//!         &mut std::io::stderr(),
//!     )
//!     .await?;
//!
//!     eprintln!("{} bytes of records", summary.bytes_copied);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod client;
pub mod command;
pub mod config;
pub mod logging;
pub mod query;
pub mod report;
pub mod time;

// Re-export top-level types for convenience
pub use client::StoreClient;

pub use config::{Config, ConfigError, LoggingConfig, StoreConfig};

pub use query::{
    Engine, QueryError, QueryMethod, QueryRequest, QueryResult, QueryStats, RecordSource,
    RecordStream,
};

pub use report::{report, ReportSummary};

pub use time::{ResolvedTime, TimeExpression, TimeExpressionError, TimeField};
