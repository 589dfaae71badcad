//! CLI entry point for the diva-storage tool.

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Parser;
use diva_storage::db::{DefaultDbConverterFactory, SqlxRecordReaderFactory};
use diva_storage::fedora::DefaultFedoraConverterFactory;
use diva_storage::http::ReqwestHttpHandlerFactory;
use diva_storage::{
    DataGroup, Database, DatabaseOptions, DbRecordStorage, FedoraRecordStorage, RecordStorage,
};
use tracing::{debug, info};

mod cli;
mod config;

use cli::{Args, Backend, Command};
use config::{AdapterConfig, FileConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    // stdout carries the JSON output, logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    debug!(?args, "CLI arguments parsed");

    let file_config = match &args.config {
        Some(path) => config::load_file_config(path)?,
        None => FileConfig::default(),
    };
    let config = AdapterConfig::resolve(args.overrides(), file_config)?;
    debug!(?config, "Configuration resolved");

    let json = match &args.command {
        Command::Read {
            backend,
            record_type,
            id,
        } => {
            let storage = build_storage(*backend, &config).await?;
            let record = storage
                .read(record_type, id)
                .await
                .with_context(|| format!("Failed to read {record_type} '{id}'"))?;
            serde_json::to_string_pretty(&record)?
        }
        Command::List {
            backend,
            record_type,
        } => {
            let storage = build_storage(*backend, &config).await?;
            let result = storage
                .read_list(record_type, &DataGroup::with_name_in_data("filter"))
                .await
                .with_context(|| format!("Failed to list {record_type}"))?;
            info!(count = result.total_number_of_matches, "Listed records");
            serde_json::to_string_pretty(&result)?
        }
    };

    println!("{json}");
    Ok(())
}

async fn build_storage(backend: Backend, config: &AdapterConfig) -> Result<Box<dyn RecordStorage>> {
    match backend {
        Backend::Fedora => {
            let Some(base_url) = config.fedora_base_url.as_deref() else {
                bail!("The fedora backend needs --fedora-base-url or `fedora_base_url` in --config");
            };
            let http = ReqwestHttpHandlerFactory::with_timeouts(
                config.connect_timeout_secs,
                config.read_timeout_secs,
            )
            .context("Failed to build HTTP client")?;
            Ok(Box::new(
                FedoraRecordStorage::using_http_handler_factory_and_converter_factory_and_base_url(
                    Arc::new(http),
                    Arc::new(DefaultFedoraConverterFactory::new()),
                    base_url,
                ),
            ))
        }
        Backend::Db => {
            let Some(database_url) = config.database_url.as_deref() else {
                bail!("The db backend needs --database-url or `database_url` in --config");
            };
            let options = DatabaseOptions {
                max_connections: config.db_max_connections,
                busy_timeout_ms: config.db_busy_timeout_ms,
            };
            let database = Database::connect(database_url, &options)
                .await
                .with_context(|| format!("Failed to open database '{database_url}'"))?;
            Ok(Box::new(
                DbRecordStorage::using_record_reader_factory_and_converter_factory(
                    Arc::new(SqlxRecordReaderFactory::new(database)),
                    Arc::new(DefaultDbConverterFactory::new()),
                ),
            ))
        }
    }
}
