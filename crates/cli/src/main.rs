//! Driftwood CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! dw-cli migrate
//!
//! # Provision the first sales admin (bootstrap; later ones can be added
//! # through the API)
//! dw-cli sales-user create -u mara -p 'a long password'
//!
//! # Seed demo products for local development
//! dw-cli seed
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` - `PostgreSQL` connection string

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "dw-cli")]
#[command(author, version, about = "Driftwood CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage sales-admin users
    SalesUser {
        #[command(subcommand)]
        action: SalesUserAction,
    },
    /// Seed demo products for local development
    Seed,
}

#[derive(Subcommand)]
enum SalesUserAction {
    /// Create a new sales admin
    Create {
        /// Username
        #[arg(short, long)]
        username: String,

        /// Plaintext password (hashed before storage)
        #[arg(short, long)]
        password: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::SalesUser { action } => match action {
            SalesUserAction::Create { username, password } => {
                commands::sales_user::create(&username, &password).await?;
            }
        },
        Commands::Seed => commands::seed::run().await?,
    }
    Ok(())
}
