//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod chat;
mod clean;
mod config_cmd;
mod llm;
mod menu;
mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::client::ServerClient;
use crate::config::{load_settings_with_options, LoadOptions, Settings};

use super::helpers::Prompter;

#[derive(Parser)]
#[command(name = "pitch")]
#[command(about = "Sales-pitch chat and document cleaning with a local LLM")]
#[command(version)]
pub struct Cli {
    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Base URL of the pitchcraft server (overrides config file)
    #[arg(long, global = true, env = "PITCH_SERVER_URL")]
    server: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive selection menu (default when no command is given)
    Menu,

    /// Chat with the skeptical buyer
    Chat,

    /// Clean documents, interactively or a single file
    Clean {
        /// Document to clean (looked up in the texts directory if not found as given)
        file: Option<PathBuf>,
    },

    /// Start the web server
    Serve {
        /// Address to bind to: port, host, or host:port (default from config)
        bind: Option<String>,
    },

    /// Show LLM configuration and installed models
    Models,

    /// Show the effective configuration
    Config,
}

fn server_client(settings: &Settings) -> anyhow::Result<ServerClient> {
    Ok(
        ServerClient::new(&settings.server_url, settings.request_timeout)?
            .with_clean_timeout(settings.clean_timeout),
    )
}

/// Run the CLI.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let options = LoadOptions {
        config_path: cli.config,
        server_url: cli.server,
    };
    let (settings, config) = load_settings_with_options(options).await?;

    match cli.command.unwrap_or(Commands::Menu) {
        Commands::Menu => {
            let client = server_client(&settings)?;
            menu::menu_loop(&client, &mut Prompter::stdin(), &settings).await
        }
        Commands::Chat => {
            let client = server_client(&settings)?;
            chat::chat_loop(&client, &mut Prompter::stdin(), &settings.exit_word).await?;
            Ok(())
        }
        Commands::Clean { file } => {
            let client = server_client(&settings)?;
            match file {
                Some(file) => clean::cmd_clean_file(&client, &settings, &file).await,
                None => {
                    clean::clean_loop(&client, &mut Prompter::stdin(), &settings).await?;
                    Ok(())
                }
            }
        }
        Commands::Serve { bind } => {
            let bind = bind.unwrap_or_else(|| settings.bind.clone());
            serve::cmd_serve(&config.llm, &bind).await
        }
        Commands::Models => llm::cmd_llm_models(&config.llm).await,
        Commands::Config => config_cmd::cmd_config_show(&settings, &config),
    }
}
