//! Warung CLI - a terminal till over the same cart file the storefront uses.
//!
//! # Usage
//!
//! ```bash
//! # Show the menu
//! warung menu
//!
//! # Add a burger, bump it to three, then look at the cart
//! warung cart add burger
//! warung cart set 1712345678901 3
//! warung cart show
//!
//! # Place the order and print a receipt
//! warung checkout --name Budi --phone 0812-3456-7890 --paid 100.000
//! ```
//!
//! # Environment Variables
//!
//! - `WARUNG_DATA_DIR` - Directory holding the persisted cart (default: ./data)
//! - `WARUNG_MENU` - JSON menu file replacing the built-in menu
//! - `RUST_LOG` - Log filter (default: warn)

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use warung_core::{ClosePolicy, LineItemId, Price};

mod commands;

use commands::Context;
use commands::cart::LineEdit;
use commands::checkout::CheckoutArgs;

#[derive(Parser)]
#[command(name = "warung")]
#[command(author, version, about = "Warung counter tools")]
struct Cli {
    /// Directory holding the persisted cart
    #[arg(long, global = true, env = "WARUNG_DATA_DIR", default_value = "data")]
    data_dir: PathBuf,

    /// JSON menu file (defaults to the built-in menu)
    #[arg(long, global = true, env = "WARUNG_MENU")]
    menu: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the menu
    Menu,
    /// Inspect or edit the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Place the order for the current cart and print a receipt
    Checkout {
        /// Customer name
        #[arg(short, long)]
        name: String,

        /// Customer phone number
        #[arg(short, long)]
        phone: String,

        /// Order notes for the kitchen
        #[arg(long, default_value = "")]
        notes: String,

        /// Cash handed over (e.g. 50000 or 50.000)
        #[arg(long, default_value = "0")]
        paid: Price,

        /// Keep the cart after the bill is printed
        #[arg(long)]
        keep_cart: bool,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Print the cart
    Show,
    /// Add one unit of a menu item
    Add {
        /// Menu handle (see `warung menu`)
        handle: String,
    },
    /// Increase a line's quantity by one
    Inc { id: LineItemId },
    /// Decrease a line's quantity by one (removes it at zero)
    Dec { id: LineItemId },
    /// Set a line's quantity (zero or less removes it)
    Set {
        id: LineItemId,
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove a line
    Remove { id: LineItemId },
    /// Empty the cart
    Clear,
}

fn main() {
    dotenvy::dotenv().ok();

    // Logs go to stderr so command output stays clean
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "warn".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli);

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = Context {
        data_dir: cli.data_dir,
        menu_path: cli.menu,
    };
    let mut out = std::io::stdout().lock();

    match cli.command {
        Commands::Menu => commands::menu::list(&ctx.catalog()?, &mut out)?,
        Commands::Cart { action } => {
            let mut store = ctx.open_store();
            match action {
                CartAction::Show => commands::cart::show(&store, &mut out)?,
                CartAction::Add { handle } => {
                    commands::cart::add(&mut store, &ctx.catalog()?, &handle, &mut out)?;
                }
                CartAction::Inc { id } => {
                    commands::cart::edit(&mut store, LineEdit::Increment(id), &mut out)?;
                }
                CartAction::Dec { id } => {
                    commands::cart::edit(&mut store, LineEdit::Decrement(id), &mut out)?;
                }
                CartAction::Set { id, quantity } => {
                    commands::cart::edit(&mut store, LineEdit::Set(id, quantity), &mut out)?;
                }
                CartAction::Remove { id } => {
                    commands::cart::edit(&mut store, LineEdit::Remove(id), &mut out)?;
                }
                CartAction::Clear => commands::cart::clear(&mut store, &mut out)?,
            }
        }
        Commands::Checkout {
            name,
            phone,
            notes,
            paid,
            keep_cart,
        } => {
            let policy = if keep_cart {
                ClosePolicy::KeepCart
            } else {
                ClosePolicy::ClearCart
            };
            let mut store = ctx.open_store();
            let args = CheckoutArgs {
                name,
                phone,
                notes,
                paid,
                policy,
            };
            commands::checkout::place(&mut store, args, &mut out)?;
        }
    }
    Ok(())
}
