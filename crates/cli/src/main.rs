//! Campaign dashboard CLI - database migrations, user management and a Gemini check.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! dash-cli migrate
//!
//! # Create a user (password read from DASH_CLI_PASSWORD)
//! DASH_CLI_PASSWORD='...' dash-cli user create -u jane -e jane@example.com -n "Jane Doe"
//!
//! # Check the Gemini key and model
//! dash-cli gemini check
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "dash-cli")]
#[command(author, version, about = "Campaign dashboard CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage dashboard users
    User {
        #[command(subcommand)]
        action: UserAction,
    },
    /// Gemini provider tools
    Gemini {
        #[command(subcommand)]
        action: GeminiAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a new user
    Create {
        /// Login name
        #[arg(short, long)]
        username: String,

        /// Email address
        #[arg(short, long)]
        email: String,

        /// Display name
        #[arg(short = 'n', long)]
        full_name: String,
    },
}

#[derive(Subcommand)]
enum GeminiAction {
    /// Send one prompt with the configured key and model and print the reply
    Check {
        /// Prompt to send instead of the default
        #[arg(short, long)]
        prompt: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::User { action } => match action {
            UserAction::Create {
                username,
                email,
                full_name,
            } => {
                commands::user::create(&username, &email, &full_name).await?;
            }
        },
        Commands::Gemini { action } => match action {
            GeminiAction::Check { prompt } => {
                commands::gemini::check(prompt.as_deref()).await?;
            }
        },
    }
    Ok(())
}
