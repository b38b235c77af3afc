//! Vacance CLI - Database migrations and account management.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! vacance-cli migrate
//!
//! # Create admin account
//! vacance-cli admin create -e admin@vacance.kr -n "Admin Name" -r super_admin -p '<password>'
//!
//! # Print the menu registry
//! vacance-cli menus
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "vacance-cli")]
#[command(author, version, about = "Vacance Admin CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage admin accounts
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Print the menu registry used by permission matrices
    Menus,
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create a new admin account
    Create {
        /// Login email address
        #[arg(short, long)]
        email: String,

        /// Display name
        #[arg(short, long)]
        name: String,

        /// Role (`super_admin`, `content_manager`, `marketer`)
        #[arg(short, long, default_value = "content_manager")]
        role: String,

        /// Initial password (at least 8 characters)
        #[arg(short, long)]
        password: String,
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

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Admin { action } => match action {
            AdminAction::Create {
                email,
                name,
                role,
                password,
            } => {
                commands::admin::create(&email, &name, &role, &password).await?;
            }
        },
        Commands::Menus => {
            #[allow(clippy::print_stdout)]
            {
                print!("{}", commands::menus::render());
            }
        }
    }
    Ok(())
}
