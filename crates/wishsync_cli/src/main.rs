//! WishSync CLI
//!
//! Command-line tools for exploring WishSync against an in-memory store.
//!
//! # Commands
//!
//! - `demo` - Run a scripted sign-in / toggle / sign-out session
//! - `show` - Print an account's wishlist
//! - `toggle` - Add a product if absent, remove it if present
//! - `remove` - Remove a product by id
//!
//! Every command starts from an empty store, or from the JSON seed file
//! given with `--seed`. `toggle` and `remove` write the result back to it.

mod commands;
mod seed;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use wishsync_engine::WishlistConfig;
use wishsync_store::MemoryStore;

/// WishSync command-line tools.
#[derive(Parser)]
#[command(name = "wishsync")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON seed file holding every account's wishlist
    #[arg(global = true, short, long)]
    seed: Option<PathBuf>,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scripted session against the store
    Demo {
        /// Account to sign in as
        #[arg(short, long, default_value = "u1")]
        account: String,
    },

    /// Print an account's wishlist
    Show {
        /// Account id
        account: String,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Add a product if absent, remove it if present
    Toggle {
        /// Account id
        account: String,

        /// Product name
        name: String,

        /// Product id (generated when omitted)
        #[arg(short, long)]
        id: Option<String>,

        /// Unit price
        #[arg(short, long, default_value = "0", value_parser = parse_price)]
        price: f64,
    },

    /// Remove a product by id
    Remove {
        /// Account id
        account: String,

        /// Product id
        id: String,
    },

    /// Show version information
    Version,
}

/// Parses a price, rejecting NaN and infinities.
fn parse_price(raw: &str) -> Result<f64, String> {
    let price: f64 = raw.parse().map_err(|e| format!("invalid price `{raw}`: {e}"))?;
    if price.is_finite() {
        Ok(price)
    } else {
        Err(format!("price must be a finite number, got `{raw}`"))
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = WishlistConfig::default();
    let store = Arc::new(MemoryStore::new());
    let seeded = match &cli.seed {
        Some(path) => {
            let file = seed::load(path)?;
            seed::apply(&store, &file, &config)?;
            file
        }
        None => seed::SeedFile::new(),
    };

    match cli.command {
        Commands::Demo { account } => {
            commands::demo::run(store, config, &account).await?;
        }
        Commands::Show { account, format } => {
            commands::show::run(store, config, &account, &format).await?;
        }
        Commands::Toggle {
            account,
            name,
            id,
            price,
        } => {
            commands::toggle::run(Arc::clone(&store), config.clone(), &account, id, &name, price)
                .await?;
            save(&cli.seed, &store, &config, &seeded, &account).await?;
        }
        Commands::Remove { account, id } => {
            commands::remove::run(Arc::clone(&store), config.clone(), &account, &id).await?;
            save(&cli.seed, &store, &config, &seeded, &account).await?;
        }
        Commands::Version => {
            println!("WishSync CLI v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

/// Writes the store back to the seed file, if one was given.
async fn save(
    path: &Option<PathBuf>,
    store: &MemoryStore,
    config: &WishlistConfig,
    seeded: &seed::SeedFile,
    account: &str,
) -> Result<(), seed::SeedError> {
    let Some(path) = path else {
        return Ok(());
    };
    let accounts = seeded
        .keys()
        .map(String::as_str)
        .chain(std::iter::once(account));
    let file = seed::dump(store, config, accounts).await?;
    seed::save(path, &file)
}
