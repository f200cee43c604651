//! QKart CLI - browse the catalog, search and manage the cart from a terminal.
//!
//! # Usage
//!
//! ```bash
//! export QKART_API_URL=http://localhost:8082/api/v1
//!
//! # Browse and search
//! qkart products
//! qkart products --search phone
//! qkart watch            # one search query per stdin line, debounced
//!
//! # Account
//! qkart register -u crio.do
//! qkart login -u crio.do
//! qkart whoami
//! qkart logout
//!
//! # Cart
//! qkart cart show
//! qkart cart add BW0jAAeDJmlZCF8i
//! qkart cart set BW0jAAeDJmlZCF8i 3
//! ```
//!
//! Passwords are read from `--password` or `QKART_PASSWORD`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use qkart_storefront::{StorefrontClient, StorefrontConfig};

mod commands;
mod output;
mod session_store;

use commands::{CommandError, Context};
use session_store::SessionStore;

#[derive(Parser)]
#[command(name = "qkart")]
#[command(author, version, about = "QKart storefront from the command line")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List products
    Products {
        /// Only show products matching this text
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Search interactively, one query per input line
    Watch,
    /// Log in and remember the session
    Login {
        #[arg(short, long)]
        username: String,

        #[arg(short, long, env = "QKART_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account
    Register {
        #[arg(short, long)]
        username: String,

        #[arg(short, long, env = "QKART_PASSWORD", hide_env_values = true)]
        password: String,

        /// Repeat the password; defaults to `--password`
        #[arg(long)]
        confirm_password: Option<String>,
    },
    /// Forget the saved session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart contents and totals
    Show,
    /// Add one unit of a product
    Add {
        /// Product ID
        product_id: String,
    },
    /// Set the quantity of a product (0 removes it)
    Set {
        /// Product ID
        product_id: String,
        /// New quantity
        quantity: u32,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::debug!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR => sentry_tracing::EventFilter::Event,
        tracing::Level::WARN | tracing::Level::INFO => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load configuration from environment (needed for Sentry init)
    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            output::failure(&e.to_string(), false);
            std::process::exit(2);
        }
    };

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Diagnostics go to stderr so stdout stays clean for output
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "qkart_storefront=warn,qkart_cli=warn".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    if let Err(e) = run(cli, config).await {
        match &e {
            CommandError::Storefront { operation, source, .. } if !e.is_warning() => {
                tracing::error!(?operation, error = %source, "Command failed");
            }
            CommandError::Storefront { .. } => {}
            CommandError::Setup(_) | CommandError::SessionStore(_) | CommandError::Input(_) => {
                tracing::error!(error = %e, "Command failed");
            }
        }
        output::failure(&e.to_string(), e.is_warning());
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: StorefrontConfig) -> Result<(), CommandError> {
    let ctx = Context {
        client: StorefrontClient::new(config).map_err(CommandError::Setup)?,
        sessions: SessionStore::from_env()?,
    };

    match cli.command {
        Commands::Products { search } => {
            commands::products::list(&ctx, search.as_deref()).await?;
        }
        Commands::Watch => commands::watch::watch(&ctx).await?,
        Commands::Login { username, password } => {
            commands::auth::login(&ctx, &username, &password).await?;
        }
        Commands::Register {
            username,
            password,
            confirm_password,
        } => {
            let confirm = confirm_password.as_deref().unwrap_or(&password);
            commands::auth::register(&ctx, &username, &password, confirm).await?;
        }
        Commands::Logout => commands::auth::logout(&ctx).await?,
        Commands::Whoami => commands::auth::whoami(&ctx).await?,
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&ctx).await?,
            CartAction::Add { product_id } => commands::cart::add(&ctx, &product_id).await?,
            CartAction::Set {
                product_id,
                quantity,
            } => commands::cart::set(&ctx, &product_id, quantity).await?,
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_cart_set() {
        let cli = Cli::try_parse_from(["qkart", "cart", "set", "abc", "0"]).unwrap_or_else(|e| {
            panic!("parse failed: {e}");
        });
        assert!(matches!(
            cli.command,
            Commands::Cart {
                action: CartAction::Set { ref product_id, quantity: 0 }
            } if product_id == "abc"
        ));
    }

    #[test]
    fn test_negative_quantity_is_rejected() {
        assert!(Cli::try_parse_from(["qkart", "cart", "set", "abc", "-1"]).is_err());
    }
}
