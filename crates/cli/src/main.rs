//! Helpdesk CLI - database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! helpdesk-cli migrate
//!
//! # Create a staff user (password read from HELPDESK_USER_PASSWORD if -p is omitted)
//! helpdesk-cli user create -e admin@example.com -n "Admin Name" -r admin -p 'secret-pass'
//!
//! # Insert sample tickets for local development
//! helpdesk-cli seed tickets --count 25
//! ```
//!
//! All commands read `HELPDESK_DATABASE_URL` (or `DATABASE_URL`) from the
//! environment or a `.env` file.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "helpdesk-cli")]
#[command(author, version, about = "Helpdesk CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage staff users
    User {
        #[command(subcommand)]
        action: UserAction,
    },
    /// Insert sample data
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a new user
    Create {
        /// Email address
        #[arg(short, long)]
        email: String,

        /// Display name
        #[arg(short, long)]
        name: String,

        /// Role (`admin` or anything else for a non-admin user)
        #[arg(short, long, default_value = "admin")]
        role: String,

        /// Password
        #[arg(short, long, env = "HELPDESK_USER_PASSWORD", hide_env_values = true)]
        password: String,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Insert sample tickets across every priority
    Tickets {
        /// Number of tickets to insert
        #[arg(short, long, default_value_t = 20)]
        count: u32,
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
        Commands::User { action } => match action {
            UserAction::Create {
                email,
                name,
                role,
                password,
            } => {
                commands::user::create(&email, &name, &role, &password).await?;
            }
        },
        Commands::Seed { target } => match target {
            SeedTarget::Tickets { count } => commands::seed::tickets(count).await?,
        },
    }
    Ok(())
}
