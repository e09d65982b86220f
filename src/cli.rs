//! Command-line interface
//!
//! Long flags may be written with a single dash (`-from -1h -stats`); they are
//! rewritten to the double-dash form before clap sees them.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::StoreConfig;
use crate::query::Engine;

/// Long flag names accepted with a single leading dash
const SINGLE_DASH_FLAGS: &[&str] = &[
    "store", "from", "to", "engine", "stats", "nocopy", "config", "output",
];

#[derive(Debug, Parser)]
#[command(name = "sluice")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Query a remote log store over a time window")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: first of <config dir>/sluice/config.toml,
    /// /etc/sluice/config.toml, ./sluice.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run a query and stream matching records to stdout
    Query(QueryArgs),

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Args)]
pub struct QueryArgs {
    /// Store instance, host:port (default from config: localhost:7650)
    #[arg(long)]
    pub store: Option<String>,

    /// From, as RFC 3339 timestamp, duration, or "now"
    #[arg(long, default_value = "-1h", allow_hyphen_values = true)]
    pub from: String,

    /// To, as RFC 3339 timestamp, duration, or "now"
    #[arg(long, default_value = "now", allow_hyphen_values = true)]
    pub to: String,

    /// Query expression
    #[arg(short, default_value = "", allow_hyphen_values = true)]
    pub q: String,

    /// Query engine (default from config: lazy)
    #[arg(long, value_enum)]
    pub engine: Option<Engine>,

    /// Statistics only, no records
    #[arg(long)]
    pub stats: bool,

    /// Don't read the response body
    #[arg(long)]
    pub nocopy: bool,
}

/// A query invocation with config defaults applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryCommand {
    pub store: String,
    pub engine: Engine,
    pub from: String,
    pub to: String,
    pub expression: String,
    pub stats_only: bool,
    pub suppress_body: bool,
}

impl QueryArgs {
    pub fn into_command(self, store: &StoreConfig) -> QueryCommand {
        QueryCommand {
            store: self.store.unwrap_or_else(|| store.address.clone()),
            engine: self.engine.unwrap_or(store.engine),
            from: self.from,
            to: self.to,
            expression: self.q,
            stats_only: self.stats,
            suppress_body: self.nocopy,
        }
    }
}

/// Rewrite single-dash long flags (`-store`, `-from=x`) to `--store`,
/// `--from=x`. Values and anything after `--` are left alone.
pub fn normalize_args<I>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut normalized = Vec::new();
    let mut passthrough = false;
    let mut expecting_value = false;

    for arg in args {
        if passthrough || expecting_value {
            expecting_value = false;
            normalized.push(arg);
            continue;
        }
        if arg == "--" {
            passthrough = true;
            normalized.push(arg);
            continue;
        }

        let arg = if is_single_dash_flag(&arg) {
            format!("-{}", arg)
        } else {
            arg
        };
        expecting_value = expects_separate_value(&arg);
        normalized.push(arg);
    }

    normalized
}

fn is_single_dash_flag(arg: &str) -> bool {
    match arg.strip_prefix('-') {
        Some(rest) if !rest.starts_with('-') => {
            let name = rest.split_once('=').map_or(rest, |(name, _)| name);
            SINGLE_DASH_FLAGS.contains(&name)
        }
        _ => false,
    }
}

fn expects_separate_value(arg: &str) -> bool {
    if matches!(arg, "-q" | "-o") {
        return true;
    }
    match arg.strip_prefix("--") {
        Some(name) => SINGLE_DASH_FLAGS.contains(&name) && !matches!(name, "stats" | "nocopy"),
        None => false,
    }
}
