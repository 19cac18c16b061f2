// SPDX-FileCopyrightText: 2026 Hubdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Hubdesk - a Messenger helpdesk service.
//!
//! This is the binary entry point for the Hubdesk server.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use clap::{Parser, Subcommand};

mod serve;

/// Hubdesk - a Messenger helpdesk service.
#[derive(Parser, Debug)]
#[command(name = "hubdesk", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the Hubdesk server.
    Serve,
    /// Mint a bearer token for an agent account.
    Token {
        /// The account id to mint a token for.
        account_id: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup.
    let config = match hubdesk_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            hubdesk_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Serve) => {
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("error: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::Token { account_id }) => {
            let auth = hubdesk_gateway::AuthConfig {
                secret: config.gateway.auth_secret.clone(),
            };
            match auth.mint(&account_id) {
                Some(token) => println!("{token}"),
                None => {
                    eprintln!(
                        "error: gateway.auth_secret is not configured; set it before minting tokens"
                    );
                    std::process::exit(1);
                }
            }
        }
        None => {
            println!("hubdesk: use --help for available commands");
        }
    }
}
