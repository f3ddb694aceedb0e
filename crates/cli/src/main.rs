mod commands;
mod config;
mod logging;

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context};
use blueprint_schema::{grammar_for, Dialect};
use clap::{Parser, Subcommand};

use config::CliConfig;
use logging::{init_logging, LoggingConfig};

#[derive(Parser)]
#[command(name = "blueprint")]
#[command(about = "Render table blueprint manifests into MySQL and PostgreSQL DDL")]
#[command(version)]
struct Cli {
    /// Target dialect (mysql, postgres)
    #[arg(long, global = true)]
    dialect: Option<Dialect>,

    /// Configuration file (defaults to ./blueprint.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render manifests to SQL statements
    Render {
        /// Manifest files (YAML, or JSON with a .json extension)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Write the statements to a file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Compile manifests for every dialect and report failures
    Check {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Create a timestamped migration file from a manifest
    Make {
        /// Manifest file
        file: PathBuf,

        /// Migration name
        #[arg(long)]
        name: String,

        /// Target directory (defaults to the configured migrations directory)
        #[arg(long)]
        dir: Option<PathBuf>,
    },

    /// Show the SQL type used for each column type
    Types,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = CliConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    config.apply_flags(cli.dialect, cli.verbose);
    config.validate().context("Invalid configuration")?;

    init_logging(LoggingConfig::from_cli(&config)).map_err(|e| anyhow!(e))?;

    for (field, source) in config.sources() {
        tracing::debug!(field, source = %source, "configuration value");
    }
    let from_file = config.sources().filter(|(_, source)| source.is_file()).count();
    if from_file > 0 {
        tracing::info!(values = from_file, "configuration file applied");
    }
    if let Some(source) = config.source("dialect") {
        tracing::info!(dialect = %config.dialect, source = %source, "using dialect");
    }

    match cli.command {
        Commands::Render { files, output } => {
            let sql = commands::render::run(&files, output.as_deref(), &config)?;
            match output {
                Some(path) => println!("Rendered SQL written to {}", path.display()),
                None => print!("{}", sql),
            }
        }
        Commands::Check { files } => {
            let results = commands::check::run(&files, &config)?;
            let failures = results.iter().filter(|r| !r.passed()).count();

            for result in &results {
                println!("{}", result);
            }

            if failures > 0 {
                bail!("{} of {} check(s) failed", failures, results.len());
            }
            println!("All {} check(s) passed", results.len());
        }
        Commands::Make { file, name, dir } => {
            let path = commands::make::run(&file, &name, dir.as_deref(), &config)?;
            println!("Created migration: {}", path.display());
        }
        Commands::Types => {
            let grammar = grammar_for(config.dialect, config.grammar_config())?;
            print!("{}", commands::types::render(grammar.as_ref()));
        }
    }

    Ok(())
}
