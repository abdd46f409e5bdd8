//! Pocketshop CLI - browse the catalog, manage a cart and check out from the
//! terminal.
//!
//! # Usage
//!
//! ```bash
//! # Browse
//! pocketshop catalog list --category electronics --sort price-low
//! pocketshop catalog show 9
//!
//! # Shop
//! pocketshop cart add 1 --color Blue --size M
//! pocketshop cart show --coupon SAVE10
//!
//! # Check out
//! pocketshop account register -e ada@example.com -p hunter22 -n Ada
//! pocketshop checkout --full-name "Ada Lovelace" --email ada@example.com \
//!     --address "12 Analytical Way" --city London --state LDN --zip "N1 9GU"
//! pocketshop orders
//! ```
//!
//! # Commands
//!
//! - `catalog` - List, search and inspect products
//! - `cart` - Add, remove and re-quantify cart lines
//! - `wishlist` - Save products for later
//! - `account` - Register, sign in and manage the profile
//! - `checkout` - Place an order for the cart
//! - `orders` - Show order history
//!
//! State is kept as JSON files under `POCKETSHOP_DATA_DIR`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pocketshop_core::{Price, ProductId};
use pocketshop_storefront::{AppError, Storefront};
use pocketshop_storefront::config::{LogFormat, StorefrontConfig};
use pocketshop_storefront::events::{Notifier, TracingObserver};
use pocketshop_storefront::models::product::Category;

mod commands;

use commands::ConsoleObserver;

#[derive(Parser)]
#[command(name = "pocketshop")]
#[command(author, version, about = "Pocketshop storefront CLI")]
struct Cli {
    /// Override the data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the product catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Manage the shopping cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Manage the wishlist
    Wishlist {
        #[command(subcommand)]
        action: WishlistAction,
    },
    /// Manage the local account
    Account {
        #[command(subcommand)]
        action: AccountAction,
    },
    /// Place an order for everything in the cart
    Checkout(CheckoutArgs),
    /// Show the signed-in account's orders
    Orders,
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List products, optionally filtered and sorted
    List {
        /// Only these categories (repeatable)
        #[arg(short, long)]
        category: Vec<Category>,

        /// Match against product name or category
        #[arg(short, long)]
        search: Option<String>,

        /// Minimum price, inclusive
        #[arg(long)]
        min: Option<Price>,

        /// Maximum price, inclusive
        #[arg(long)]
        max: Option<Price>,

        /// `relevance`, `price-low`, `price-high`, `rating` or `newest`
        #[arg(long, default_value = "relevance")]
        sort: String,
    },
    /// Show one product and related items
    Show { id: ProductId },
    /// Show the highest-rated products
    Trending {
        #[arg(short, long, default_value_t = 8)]
        limit: usize,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Add one unit of a product
    Add {
        id: ProductId,
        #[arg(long)]
        color: Option<String>,
        #[arg(long)]
        size: Option<String>,
    },
    /// Remove a product (every variant unless color or size is given)
    Remove {
        id: ProductId,
        #[arg(long)]
        color: Option<String>,
        #[arg(long)]
        size: Option<String>,
    },
    /// Set a product's quantity; zero or less removes it
    Set {
        id: ProductId,
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
        #[arg(long)]
        color: Option<String>,
        #[arg(long)]
        size: Option<String>,
    },
    /// Empty the cart
    Clear,
    /// Show cart contents and totals
    Show {
        /// Coupon code to preview
        #[arg(long)]
        coupon: Option<String>,
    },
}

#[derive(Subcommand)]
enum WishlistAction {
    /// Save a product
    Add { id: ProductId },
    /// Forget a product
    Remove { id: ProductId },
    /// Save if absent, forget if present
    Toggle { id: ProductId },
    /// List saved products
    Show,
}

#[derive(Subcommand)]
enum AccountAction {
    /// Create an account and sign in
    Register {
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
        #[arg(short, long)]
        name: String,
    },
    /// Sign in
    Login {
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
    },
    /// Sign out
    Logout,
    /// Show the signed-in account
    Whoami,
    /// Change the display name
    Rename { name: String },
}

#[derive(clap::Args)]
struct CheckoutArgs {
    #[arg(long)]
    full_name: String,
    #[arg(long)]
    email: String,
    #[arg(long, default_value = "")]
    phone: String,
    #[arg(long)]
    address: String,
    #[arg(long)]
    city: String,
    #[arg(long)]
    state: String,
    #[arg(long)]
    zip: String,
    /// Coupon code
    #[arg(long)]
    coupon: Option<String>,
}

fn init_tracing(format: LogFormat) {
    // Notifications already reach the terminal through ConsoleObserver, so
    // only warnings are logged unless RUST_LOG asks for more
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "warn".into());

    let registry = tracing_subscriber::registry().with(env_filter);
    match format {
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let mut config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            // Tracing is not up yet; report on stderr directly
            let _ = writeln!(std::io::stderr(), "Configuration error: {e}");
            std::process::exit(2);
        }
    };
    if let Some(dir) = cli.data_dir.clone() {
        config.data_dir = dir;
    }

    init_tracing(config.log_format);

    if let Err(e) = run(cli, config).await {
        // The shopper-facing message hides storage and catalog details
        if matches!(e, AppError::Storage(_) | AppError::Catalog(_)) {
            tracing::error!(error = %e, "Command failed");
        } else {
            tracing::debug!(error = ?e, "Command failed");
        }
        let _ = writeln!(std::io::stderr(), "Error: {}", e.user_message());
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: StorefrontConfig) -> Result<(), AppError> {
    let notifier = Notifier::new();
    notifier.subscribe(Arc::new(TracingObserver));
    notifier.subscribe(Arc::new(ConsoleObserver));

    let mut shop = Storefront::open_dir(config, notifier)?;
    let mut out = std::io::stdout();

    match cli.command {
        Commands::Catalog { action } => match action {
            CatalogAction::List {
                category,
                search,
                min,
                max,
                sort,
            } => {
                let filters = commands::catalog::ListFilters {
                    categories: category,
                    search,
                    min,
                    max,
                    sort,
                };
                commands::catalog::list(&shop, &filters, &mut out)?;
            }
            CatalogAction::Show { id } => commands::catalog::show(&shop, id, &mut out)?,
            CatalogAction::Trending { limit } => {
                commands::catalog::trending(&shop, limit, &mut out)?;
            }
        },
        Commands::Cart { action } => match action {
            CartAction::Add { id, color, size } => {
                commands::cart::add(&mut shop, id, color.as_deref(), size.as_deref())?;
            }
            CartAction::Remove { id, color, size } => {
                commands::cart::remove(&mut shop, id, color.as_deref(), size.as_deref())?;
            }
            CartAction::Set {
                id,
                quantity,
                color,
                size,
            } => {
                commands::cart::set(&mut shop, id, quantity, color.as_deref(), size.as_deref())?;
            }
            CartAction::Clear => shop.cart_mut().clear()?,
            CartAction::Show { coupon } => {
                commands::cart::show(&mut shop, coupon.as_deref(), &mut out)?;
            }
        },
        Commands::Wishlist { action } => match action {
            WishlistAction::Add { id } => commands::wishlist::add(&mut shop, id)?,
            WishlistAction::Remove { id } => {
                shop.wishlist_mut().remove(id)?;
            }
            WishlistAction::Toggle { id } => commands::wishlist::toggle(&mut shop, id)?,
            WishlistAction::Show => commands::wishlist::show(&shop, &mut out)?,
        },
        Commands::Account { action } => match action {
            AccountAction::Register {
                email,
                password,
                name,
            } => {
                shop.accounts_mut().register(&email, &password, &name)?;
            }
            AccountAction::Login { email, password } => {
                shop.accounts_mut().login(&email, &password)?;
            }
            AccountAction::Logout => shop.accounts_mut().logout()?,
            AccountAction::Whoami => commands::account::whoami(&shop, &mut out)?,
            AccountAction::Rename { name } => commands::account::rename(&mut shop, &name)?,
        },
        Commands::Checkout(args) => {
            let address = pocketshop_storefront::models::order::ShippingAddress {
                full_name: args.full_name,
                email: args.email,
                phone: args.phone,
                address: args.address,
                city: args.city,
                state: args.state,
                zip_code: args.zip,
            };
            commands::checkout::place(&mut shop, address, args.coupon.as_deref(), &mut out)
                .await?;
        }
        Commands::Orders => commands::checkout::history(&mut shop, &mut out)?,
    }
    Ok(())
}
