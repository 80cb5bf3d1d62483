mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "eventfeed")]
#[command(about = "Render events from a shared spreadsheet into an HTML page")]
struct Cli {
    /// Config file (defaults to <config dir>/eventfeed/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render event cards as an HTML fragment, or into a page
    Render(commands::render::RenderArgs),

    /// Load events and list them
    Fetch {
        /// Print records as JSON
        #[arg(long)]
        json: bool,

        /// Use the built-in sample events instead of the sheet
        #[arg(long)]
        sample: bool,

        /// Exit with an error when the sheet cannot be loaded
        #[arg(long)]
        strict: bool,
    },

    /// Show the config file location and check it
    Config {
        /// Exit with an error when the config has validation errors
        #[arg(long)]
        validate: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    eventfeed_core::init()?;

    match cli.command {
        Commands::Render(args) => {
            let (config, _) = eventfeed_core::Config::load_validated(cli.config.as_deref())?;
            commands::render::run(&config, args).await
        }
        Commands::Fetch { json, sample, strict } => {
            let (config, _) = eventfeed_core::Config::load_validated(cli.config.as_deref())?;
            commands::fetch::run(&config, json, sample, strict).await
        }
        Commands::Config { validate } => commands::config::run(cli.config.as_deref(), validate),
    }
}
