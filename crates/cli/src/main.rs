//! Bookstore CLI - Browse the catalog, manage the cart and administer sliders.
//!
//! # Usage
//!
//! ```bash
//! # Search the catalog
//! bookstore books list --search dune
//!
//! # Add a book to the cart and check out
//! bookstore cart add 12
//! bookstore cart checkout --first-name Jan --last-name Kowalski ...
//!
//! # Toggle image 7 in slider 1, then move it to the front
//! bookstore slider toggle 1 7
//! bookstore slider position 1 7 0
//! ```
//!
//! # Commands
//!
//! - `books`, `categories`, `comments` - Catalog browsing and moderation
//! - `cart` - The locally persisted cart and checkout
//! - `orders` - Order history and status changes
//! - `profile`, `events`, `themes` - Account pages
//! - `images`, `slider` - Slider administration
//!
//! Configuration comes from the environment; see `bookstore_storefront::config`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::process::ExitCode;

use bookstore_core::{
    BookId, CategoryId, CommentId, ImageId, OrderId, OrderStatus, SliderId, ThemeId,
};
use bookstore_storefront::config::StorefrontConfig;
use bookstore_storefront::{AppError, AppState};
use clap::{Args, Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "bookstore")]
#[command(author, version, about = "Bookstore command-line client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse books
    Books {
        #[command(subcommand)]
        action: BooksAction,
    },
    /// List categories
    Categories,
    /// Read, post and moderate comments
    Comments {
        #[command(subcommand)]
        action: CommentsAction,
    },
    /// Manage the shopping cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Order history
    Orders {
        #[command(subcommand)]
        action: OrdersAction,
    },
    /// Show the current user's profile and roles
    Profile,
    /// Show the current user's notifications
    Events,
    /// Color themes
    Themes {
        #[command(subcommand)]
        action: ThemesAction,
    },
    /// List uploaded gallery images
    Images,
    /// Administer image sliders
    Slider {
        #[command(subcommand)]
        action: SliderAction,
    },
}

#[derive(Subcommand)]
enum BooksAction {
    /// List books, optionally filtered
    List {
        /// Only books in this category
        #[arg(short, long)]
        category: Option<CategoryId>,

        /// Free-text search over title, author and description
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Show one book
    Show { id: BookId },
    /// Approve a submitted book
    Approve { id: BookId },
    /// Reject a submitted book
    Reject { id: BookId },
}

#[derive(Subcommand)]
enum CommentsAction {
    /// List comments on a book
    List { book: BookId },
    /// Post a comment on a book
    Post { book: BookId, content: String },
    /// Approve a comment
    Approve { comment: CommentId },
    /// Reject a comment
    Reject { comment: CommentId },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart contents and total
    Show,
    /// Add one copy of a book
    Add { book: BookId },
    /// Set the quantity of a book already in the cart
    Set { book: BookId, quantity: u32 },
    /// Remove a book from the cart
    Remove { book: BookId },
    /// Empty the cart
    Clear,
    /// Refresh book details from the catalog
    Refresh,
    /// Place an order for the cart contents
    Checkout(CheckoutArgs),
}

/// Checkout details; unset fields are taken from the profile.
#[derive(Args)]
pub struct CheckoutArgs {
    #[arg(long)]
    pub first_name: Option<String>,
    #[arg(long)]
    pub last_name: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub address: Option<String>,
    #[arg(long)]
    pub city: Option<String>,
    #[arg(long)]
    pub postal_code: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
}

#[derive(Subcommand)]
enum OrdersAction {
    /// List orders
    List,
    /// Show one order
    Show { id: OrderId },
    /// Change an order's status (`pending`, `shipped`, `delivered`, `cancelled`)
    Status { id: OrderId, status: OrderStatus },
}

#[derive(Subcommand)]
enum ThemesAction {
    /// List available themes
    List,
    /// Show the default theme
    Default,
    /// Show the selected theme
    Selected,
    /// Select the site theme
    Select { id: ThemeId },
}

#[derive(Subcommand)]
enum SliderAction {
    /// List sliders
    List,
    /// Show a slider and its images in display order
    Show { id: SliderId },
    /// Create an empty slider
    Create { title: String },
    /// Delete a slider
    Delete { id: SliderId },
    /// Add an image to a slider, or remove it if already a member
    Toggle { slider: SliderId, image: ImageId },
    /// Set an image's position within a slider
    Position {
        slider: SliderId,
        image: ImageId,
        #[arg(allow_negative_numbers = true)]
        position: i64,
    },
    /// Make a slider the default
    Default { id: SliderId },
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

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[allow(clippy::print_stderr)]
#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", AppError::from(e).user_message());
            return ExitCode::FAILURE;
        }
    };

    // Sentry must be initialized before the tracing subscriber
    let _sentry_guard = init_sentry(&config);

    // Logs go to stderr so command output stays clean
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "bookstore_storefront=info,bookstore_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let result = match AppState::new(config) {
        Ok(state) => run(&state, cli.command).await,
        Err(e) => Err(e.into()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            e.report();
            eprintln!("Error: {}", e.user_message());
            ExitCode::FAILURE
        }
    }
}

async fn run(state: &AppState, command: Commands) -> bookstore_storefront::Result<()> {
    match command {
        Commands::Books { action } => match action {
            BooksAction::List { category, search } => {
                commands::catalog::list_books(state, category, search).await?;
            }
            BooksAction::Show { id } => commands::catalog::show_book(state, id).await?,
            BooksAction::Approve { id } => commands::catalog::moderate_book(state, id, true).await?,
            BooksAction::Reject { id } => commands::catalog::moderate_book(state, id, false).await?,
        },
        Commands::Categories => commands::catalog::list_categories(state).await?,
        Commands::Comments { action } => match action {
            CommentsAction::List { book } => commands::catalog::list_comments(state, book).await?,
            CommentsAction::Post { book, content } => {
                commands::catalog::post_comment(state, book, &content).await?;
            }
            CommentsAction::Approve { comment } => {
                commands::catalog::moderate_comment(state, comment, true).await?;
            }
            CommentsAction::Reject { comment } => {
                commands::catalog::moderate_comment(state, comment, false).await?;
            }
        },
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(state).await?,
            CartAction::Add { book } => commands::cart::add(state, book).await?,
            CartAction::Set { book, quantity } => {
                commands::cart::set_quantity(state, book, quantity).await?;
            }
            CartAction::Remove { book } => commands::cart::remove(state, book).await?,
            CartAction::Clear => commands::cart::clear(state).await?,
            CartAction::Refresh => commands::cart::refresh(state).await?,
            CartAction::Checkout(args) => commands::cart::checkout(state, args).await?,
        },
        Commands::Orders { action } => match action {
            OrdersAction::List => commands::orders::list(state).await?,
            OrdersAction::Show { id } => commands::orders::show(state, id).await?,
            OrdersAction::Status { id, status } => {
                commands::orders::update_status(state, id, status).await?;
            }
        },
        Commands::Profile => commands::account::profile(state).await?,
        Commands::Events => commands::account::events(state).await?,
        Commands::Themes { action } => match action {
            ThemesAction::List => commands::account::list_themes(state).await?,
            ThemesAction::Default => commands::account::default_theme(state).await?,
            ThemesAction::Selected => commands::account::selected_theme(state).await?,
            ThemesAction::Select { id } => commands::account::select_theme(state, id).await?,
        },
        Commands::Images => commands::slider::list_images(state).await?,
        Commands::Slider { action } => match action {
            SliderAction::List => commands::slider::list(state).await?,
            SliderAction::Show { id } => commands::slider::show(state, id).await?,
            SliderAction::Create { title } => commands::slider::create(state, &title).await?,
            SliderAction::Delete { id } => commands::slider::delete(state, id).await?,
            SliderAction::Toggle { slider, image } => {
                commands::slider::toggle(state, slider, image).await?;
            }
            SliderAction::Position {
                slider,
                image,
                position,
            } => commands::slider::set_position(state, slider, image, position).await?,
            SliderAction::Default { id } => commands::slider::select_default(state, id).await?,
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_unknown_order_status_rejected() {
        let result = Cli::try_parse_from(["bookstore", "orders", "status", "4", "lost"]);
        assert!(result.is_err());

        let result = Cli::try_parse_from(["bookstore", "orders", "status", "4", "Shipped"]);
        assert!(result.is_ok());
    }

    #[test]
    fn test_book_moderation_lives_under_books() {
        let result = Cli::try_parse_from(["bookstore", "books", "approve", "12"]);
        assert!(result.is_ok());

        let result = Cli::try_parse_from(["bookstore", "comments", "approve-book", "12"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_negative_position_accepted() {
        let result = Cli::try_parse_from(["bookstore", "slider", "position", "1", "7", "-3"]);
        assert!(result.is_ok());
    }
}
