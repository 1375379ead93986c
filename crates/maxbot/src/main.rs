// SPDX-FileCopyrightText: 2026 Maxbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! maxbot - run a MAX chat bot's update ingestion from the command line.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod commands;
mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::SubscriptionAction;

/// maxbot - receive MAX Bot API updates by long polling or webhook.
#[derive(Parser, Debug)]
#[command(name = "maxbot", version, about, long_about = None)]
struct Cli {
    /// Load configuration from this file instead of the standard locations.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Receive updates by long polling until interrupted.
    Poll,
    /// Serve the webhook endpoint until interrupted.
    Webhook,
    /// Manage webhook subscriptions.
    Subscriptions {
        #[command(subcommand)]
        action: SubscriptionAction,
    },
    /// Print the resolved configuration.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => maxbot_config::load_and_validate_path(path),
        None => maxbot_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            maxbot_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Some(Commands::Poll) => serve::run_poll(config).await,
        Some(Commands::Webhook) => serve::run_webhook(config).await,
        Some(Commands::Subscriptions { action }) => {
            commands::run_subscriptions(&config, action).await
        }
        Some(Commands::Config) => commands::render_config(&config).map(|text| print!("{text}")),
        None => {
            println!("maxbot: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
