//! optionspecs CLI - Main entry point

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "optionspecs")]
#[command(version)]
#[command(about = "Resolve builder- and format-scoped directive options", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a directive option block for a build target
    Resolve {
        /// File containing the option block (reads stdin if omitted)
        input: Option<PathBuf>,

        /// Active builder name (e.g. html, epub, latex)
        #[arg(short, long, default_value = "")]
        builder: String,

        /// Active output format (e.g. html, latex)
        #[arg(short, long, default_value = "")]
        format: String,

        /// Directive whose option table applies
        #[arg(short, long, default_value = "toctree")]
        directive: String,

        /// Option tables file (searches for _optionspecs.yml if omitted)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Show the specificity of option keys for a build target
    Weigh {
        /// Qualified option keys, e.g. caption:html:html
        #[arg(required = true)]
        keys: Vec<String>,

        /// Active builder name
        #[arg(short, long, default_value = "")]
        builder: String,

        /// Active output format
        #[arg(short, long, default_value = "")]
        format: String,
    },

    /// List directives and their option converters
    Tables {
        /// Option tables file (searches for _optionspecs.yml if omitted)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    // Initialize logging; stdout carries command output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "optionspecs=info,quarto_option_specs=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Resolve {
            input,
            builder,
            format,
            directive,
            config,
        } => commands::resolve::execute(commands::resolve::ResolveArgs {
            input,
            builder,
            format,
            directive,
            config,
        }),
        Commands::Weigh {
            keys,
            builder,
            format,
        } => commands::weigh::execute(&keys, &builder, &format),
        Commands::Tables { config } => commands::tables::execute(config.as_deref()),
    }
}
