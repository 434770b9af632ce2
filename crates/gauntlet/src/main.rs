// SPDX-FileCopyrightText: 2026 Gauntlet Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gauntlet - test engine host.
//!
//! Binary entry point: discovers plugins and prints what was found.

mod extensions;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use gauntlet_config::GauntletConfig;

/// Gauntlet - plugin discovery for the test engine.
#[derive(Parser, Debug)]
#[command(name = "gauntlet", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List discovered extensions grouped by extension point.
    Extensions {
        /// Directory to start discovery from.
        #[arg(long)]
        dir: Option<PathBuf>,
        /// Include disabled extensions.
        #[arg(long)]
        all: bool,
        /// Output JSON.
        #[arg(long)]
        json: bool,
        /// Disable colors.
        #[arg(long)]
        plain: bool,
    },
    /// List extension points, built-in and module-declared.
    Points {
        #[arg(long)]
        dir: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// List built-in host capabilities, optionally filtered.
    Capabilities {
        /// Case-insensitive text to look for in paths and descriptions.
        query: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Print the resolved configuration as TOML.
    Config,
}

fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => gauntlet_config::load_and_validate_path(path),
        None => gauntlet_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            gauntlet_config::render_errors(&errors);
            std::process::exit(2);
        }
    };

    init_tracing(&config.log.level);

    let result = match cli.command {
        Some(Commands::Extensions {
            dir,
            all,
            json,
            plain,
        }) => extensions::run_extensions(&config, dir, all, json, plain),
        Some(Commands::Points { dir, json }) => extensions::run_points(&config, dir, json),
        Some(Commands::Capabilities { query, json }) => extensions::run_capabilities(query, json),
        Some(Commands::Config) => print_config(&config),
        None => {
            println!("gauntlet: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn print_config(config: &GauntletConfig) -> Result<(), gauntlet_core::GauntletError> {
    let rendered = toml::to_string_pretty(config)
        .map_err(|e| gauntlet_core::GauntletError::Config(e.to_string()))?;
    print!("{rendered}");
    Ok(())
}

/// Log to stderr so command output stays clean. `RUST_LOG` wins over the config.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("gauntlet={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
