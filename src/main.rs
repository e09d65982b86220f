//! Sluice CLI
//!
//! Queries a log store and streams the matching records to stdout.

use anyhow::Context;
use chrono::Local;
use clap::Parser;
use std::io::{self, BufWriter};

use sluice::cli::{normalize_args, Cli, Commands};
use sluice::config::{generate_default_config, Config};
use sluice::{command, logging, StoreClient};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse_from(normalize_args(std::env::args()));

    match cli.command {
        Commands::Query(args) => {
            let config = Config::resolve(cli.config.as_deref())
                .context("loading configuration")?;
            logging::init(&config.logging);

            let query = args.into_command(&config.store);
            let client = StoreClient::new(&config.store)?;

            let stdout = io::stdout();
            let mut out = BufWriter::new(stdout.lock());
            let mut diag = io::stderr();

            let summary = command::run(
                &query,
                &client,
                Local::now().fixed_offset(),
                &mut out,
                &mut diag,
            )
            .await
            .with_context(|| format!("querying {}", query.store))?;

            tracing::debug!(bytes_copied = summary.bytes_copied, "query complete");
        }

        Commands::Config { output } => {
            let config = generate_default_config();

            match output {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)
                            .with_context(|| format!("creating {:?}", parent))?;
                    }
                    std::fs::write(&path, &config)
                        .with_context(|| format!("writing {:?}", path))?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", config);
                }
            }
        }
    }

    Ok(())
}
