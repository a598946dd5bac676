//! RocketShoes CLI - development tools.
//!
//! # Usage
//!
//! ```bash
//! # Serve the demo catalog on the port the storefront expects
//! rocketshoes-cli catalog
//!
//! # Serve a custom fixture on another port
//! rocketshoes-cli catalog --port 4000 --fixture my-catalog.json
//! ```
//!
//! # Commands
//!
//! - `catalog` - Serve the fixture catalog API (products and stock)

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::IpAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "rocketshoes-cli")]
#[command(author, version, about = "RocketShoes CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the fixture catalog API
    Catalog {
        /// Bind address
        #[arg(long, default_value = "127.0.0.1")]
        host: IpAddr,

        /// Listen port (the storefront's default catalog port)
        #[arg(short, long, default_value_t = 3333)]
        port: u16,

        /// Fixture file with products and stock
        #[arg(short, long, default_value = "demos/catalog.json")]
        fixture: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Catalog {
            host,
            port,
            fixture,
        } => {
            commands::catalog::serve(host, port, &fixture).await?;
        }
    }
    Ok(())
}
