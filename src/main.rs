use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use ownchat::{chat, constants, web_server, Config, OpenAiClient, Persona};

// Define the command-line interface structure using clap
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Serve the chat UI over HTTP.
    Serve {
        #[arg(long, default_value_t = constants::DEFAULT_PORT, help = "Port for the web server.")]
        port: u16,
        #[arg(long, value_enum, default_value_t = Persona::Assistant, help = "Initial role of the bot.")]
        persona: Persona,
        #[arg(long, env = "OWNCHAT_ENV_FILE", help = "Path of the .env file to load.")]
        env_file: Option<PathBuf>,
    },
    /// Chat with the bot in the terminal.
    Chat {
        #[arg(long, value_enum, default_value_t = Persona::Assistant, help = "Role of the bot.")]
        persona: Persona,
        #[arg(long, env = "OWNCHAT_ENV_FILE", help = "Path of the .env file to load.")]
        env_file: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Reads log level from RUST_LOG (e.g., RUST_LOG=info,ownchat=debug)
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    info!("ownchat starting with command: {:?}", cli.command);

    match cli.command {
        Commands::Serve { port, persona, env_file } => {
            let config = Config::load(env_file.as_deref())?;

            let mut web_server_handle = tokio::spawn(async move {
                if let Err(e) = web_server::start_web_server(config, persona, port).await {
                    error!("Web server failed: {:?}", e);
                }
            });

            let ctrl_c = tokio::signal::ctrl_c();
            tokio::pin!(ctrl_c);

            tokio::select! {
                _ = &mut ctrl_c => {
                    info!("Ctrl-C received, initiating shutdown...");
                }
                res = &mut web_server_handle => {
                    match res {
                        Ok(_) => info!("Web server task completed unexpectedly."),
                        Err(e) if e.is_panic() => error!("Web server task panicked: {:?}", e),
                        Err(e) => error!("Web server task failed: {:?}", e),
                    }
                }
            }

            if !web_server_handle.is_finished() {
                info!("Aborting web server task...");
                web_server_handle.abort();
            }
            info!("Shutdown complete.");
        }
        Commands::Chat { persona, env_file } => {
            let config = Config::load(env_file.as_deref())?;
            let client = OpenAiClient::new(&config).context("Failed to build chat completion client")?;
            chat::run_terminal_chat(persona, &client)
                .await
                .context("Chat session failed")?;
        }
    }

    Ok(())
}
