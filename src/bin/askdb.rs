//! askdb CLI.
//!
//! Ask natural-language questions against the fixed dataset, inspect the
//! derived plan, or start the HTTP server.

use anyhow::Result;
use askdb::config::Config;
use askdb::engine::QueryEngine;
use askdb::server;
use askdb::store::TableStore;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

/// Natural-language queries over a fixed set of in-memory tables.
#[derive(Parser)]
#[command(name = "askdb")]
#[command(about = "Natural-language query engine over users, products, and orders", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a natural-language query
    Ask {
        /// Question in natural language
        question: String,

        /// Show the derived plan without executing
        #[arg(long)]
        plan: bool,
    },

    /// Explain how a query would be interpreted
    Explain {
        /// Question in natural language
        question: String,
    },

    /// Check whether a query is executable without running it
    Validate {
        /// Question in natural language
        question: String,
    },

    /// Start the HTTP server
    Serve {
        /// Config file (JSON)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Host to bind
        #[arg(long)]
        host: Option<String>,

        /// Port to bind
        #[arg(long)]
        port: Option<u16>,

        /// Shared secret for the x-api-key header
        #[arg(long, env = "ASKDB_API_KEY")]
        api_key: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Ask { question, plan } => {
            let engine = engine()?;
            if plan {
                println!("{}", serde_json::to_string_pretty(&engine.plan(&question))?);
            } else {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&engine.handle_query(&question))?
                );
            }
        }
        Commands::Explain { question } => {
            let engine = engine()?;
            println!(
                "{}",
                serde_json::to_string_pretty(&engine.explain_query(&question))?
            );
        }
        Commands::Validate { question } => {
            let engine = engine()?;
            println!(
                "{}",
                serde_json::to_string_pretty(&engine.validate_query(&question))?
            );
        }
        Commands::Serve {
            config,
            host,
            port,
            api_key,
        } => {
            let mut config = Config::load(config.as_deref()).or_else(|err| {
                // CLI-provided key is enough to run without file or env.
                if api_key.is_some() {
                    Ok(Config::default())
                } else {
                    Err(err)
                }
            })?;
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(api_key) = api_key {
                config.api_key = api_key;
            }
            server::run(config).await?;
        }
    }

    Ok(())
}

fn engine() -> Result<QueryEngine> {
    Ok(QueryEngine::new(Arc::new(TableStore::seeded()))?)
}
