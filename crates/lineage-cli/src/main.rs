//! Lineage CLI - Command-line interface for Lineage
//!
//! This is the main entry point for users interacting with a family
//! snapshot. It provides commands for inspecting persons, walking
//! ancestry, naming kinship and searching by name or birth date.

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "lineage")]
#[command(author = "Lineage Contributors")]
#[command(version)]
#[command(about = "Family graph queries: ancestry, kinship and search", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Snapshot file with persons, spouse links and child links
    #[arg(short, long, global = true, default_value = "lineage.json")]
    snapshot: PathBuf,

    /// Configuration file (defaults to .lineage/config.json when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Show graph statistics
    Stats,

    /// Show a person with their immediate family
    Person {
        /// Person id
        id: String,
    },

    /// Show the member-parent ancestor chain
    Ancestors {
        /// Person id
        id: String,
    },

    /// Show the father line and its rendered name
    Bloodline {
        /// Person id
        id: String,

        /// Maximum chain length, self included
        #[arg(short, long, default_value_t = lineage_graph::DEFAULT_PATRILINE_LEN)]
        max: usize,
    },

    /// Name the relation of A to B
    Kinship {
        /// Subject person id
        a: String,

        /// Reference person id
        b: String,

        /// Output as JSON instead of formatted text
        #[arg(long)]
        json: bool,
    },

    /// Search persons by name or birth date (e.g. "first:Ahmed birth:1950")
    Search {
        /// Search query
        query: String,

        /// Maximum results to return
        #[arg(short, long, default_value = "10")]
        limit: usize,

        /// Output as JSON instead of formatted text
        #[arg(long)]
        json: bool,
    },

    /// Export search labels as JSON
    Labels,

    /// Export member nodes and lineage edges as JSON
    Edges,
}

fn main() {
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(tracing_subscriber::EnvFilter::new(filter))
        .init();

    let ctx = commands::Context {
        snapshot: cli.snapshot,
        config: cli.config,
    };

    let result = match cli.command {
        Commands::Init { path } => commands::init(&path),
        Commands::Stats => commands::stats(&ctx),
        Commands::Person { id } => commands::person(&ctx, &id),
        Commands::Ancestors { id } => commands::ancestors(&ctx, &id),
        Commands::Bloodline { id, max } => commands::bloodline(&ctx, &id, max),
        Commands::Kinship { a, b, json } => commands::kinship(&ctx, &a, &b, json),
        Commands::Search { query, limit, json } => commands::search(&ctx, &query, limit, json),
        Commands::Labels => commands::labels(&ctx),
        Commands::Edges => commands::edges(&ctx),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}
