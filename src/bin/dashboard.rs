// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Terminal dashboard for the COVID Tracker.

use clap::{Parser, Subcommand};
use covid_tracker::client::render::{render_dashboard, render_messages, render_records};
use covid_tracker::client::{DashboardConfig, DashboardController, SelectionOutcome};
use std::io::{BufRead, Write};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "dashboard", about = "COVID Tracker terminal dashboard")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Commands {
    /// List selectable countries
    Countries,
    /// Show statistics for a country (auto-saves a record)
    Show {
        /// ISO alpha-2 country code
        code: String,
    },
    /// Show a country and store an additional copy of it
    Save {
        /// ISO alpha-2 country code
        code: String,
    },
    /// List saved records, newest first
    Records,
    /// Delete all saved records
    Clear {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging();

    let config = DashboardConfig::from_env();
    let controller = DashboardController::new(&config)?;

    match cli.command {
        Commands::Countries => {
            let countries = controller.init().await;
            print!("{}", render_messages(&controller.view().await));
            for country in countries {
                println!("{:<4} {}", country.code, country.name);
            }
        }
        Commands::Show { code } => {
            let outcome = controller.select_country(&code).await;
            let view = controller.view().await;
            if let Some(dashboard) = &view.dashboard {
                print!("{}", render_dashboard(dashboard));
            }
            print!("{}", render_messages(&view));
            if matches!(outcome, SelectionOutcome::Failed(_)) {
                std::process::exit(1);
            }
        }
        Commands::Save { code } => {
            // Selection already auto-saves; an explicit save stores a second copy.
            if let SelectionOutcome::Rendered { .. } = controller.select_country(&code).await {
                controller.save_current().await.ok();
            }
            print!("{}", render_messages(&controller.view().await));
        }
        Commands::Records => {
            let records = controller.view_records().await;
            print!("{}", render_records(&records));
        }
        Commands::Clear { yes } => {
            let cleared = controller.clear_records(|| yes || confirm_clear()).await;
            match cleared {
                Ok(true) => print!("{}", render_records(&controller.view().await.records)),
                Ok(false) => println!("Cancelled."),
                Err(_) => print!("{}", render_messages(&controller.view().await)),
            }
        }
    }

    Ok(())
}

fn confirm_clear() -> bool {
    print!("Are you sure you want to clear all saved records? [y/N] ");
    if std::io::stdout().flush().is_err() {
        return false;
    }

    let mut answer = String::new();
    match std::io::stdin().lock().read_line(&mut answer) {
        Ok(_) => matches!(answer.trim(), "y" | "Y" | "yes"),
        Err(_) => false,
    }
}

/// Human-readable logs on stderr so stdout stays clean.
fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
