//! Felis Server
//!
//! Axum server exposing the cat breed catalog over HTTP, plus a few CLI
//! commands that work against the same stored state.

mod api;

use axum::{routing::get, Router};
use clap::{Parser, Subcommand};
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use felis_core::source::CatApiClient;
use felis_core::state::{CatalogDb, CatalogPersistence, MemoryStore};
use felis_core::store::{reduce, Action};
use felis_core::{CatalogConfig, CatalogStore, CatalogView, ItemLookup, LoadStatus, RefreshOutcome};

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<CatalogStore>,
}

#[derive(Parser, Clone)]
#[command(author, version, about = "Felis - Cat breed catalog")]
struct Args {
    #[command(subcommand)]
    command: Option<CliCommand>,
}

#[derive(Subcommand, Clone)]
enum CliCommand {
    /// Start the Felis server (default)
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,
        /// Keep catalog state in memory only
        #[arg(long)]
        ephemeral: bool,
    },
    /// Fetch the remote catalog and store it
    Refresh,
    /// Print one page of the stored catalog
    List {
        /// Page to print (1-based)
        #[arg(short, long, default_value = "1")]
        page: usize,
        /// Only show favorites
        #[arg(short, long)]
        favorites: bool,
    },
    /// Print a single item
    Show {
        /// Item id
        id: String,
    },
    /// Delete the stored catalog; the next run starts empty
    Reset,
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

fn build_store(config: &CatalogConfig, ephemeral: bool) -> anyhow::Result<CatalogStore> {
    if !ephemeral {
        return CatalogStore::open(config);
    }

    tracing::info!("Using in-memory catalog storage");
    Ok(CatalogStore::initialize(
        CatalogPersistence::new(Arc::new(MemoryStore::new())),
        Arc::new(CatApiClient::new(config)?),
        config.page_size,
    ))
}

async fn run_server(config: CatalogConfig, port: u16, ephemeral: bool) -> anyhow::Result<()> {
    let store = Arc::new(build_store(&config, ephemeral)?);
    let state = AppState { store };

    let app = Router::new()
        .nest("/api/v1/catalog", api::catalog::catalog_routes())
        .nest("/api/v1/items", api::catalog::item_routes())
        .nest("/api/v1/view", api::view::view_routes())
        .route("/api/v1/openapi.json", get(api::serve_openapi))
        .with_state(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    println!("Felis server running at http://{}", addr);
    println!("   Catalog: /api/v1/catalog, /refresh, /events");
    println!("   Items:   /api/v1/items, /:id, /:id/favorite");
    println!("   View:    /api/v1/view/filter, /page, /page-size");
    println!("   Docs:    /api/v1/openapi.json");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn print_view(view: &CatalogView) {
    if let Some(error) = &view.load_error {
        println!("Last fetch failed: {}", error);
    }
    if view.items.is_empty() {
        if view.filter_favorites_only {
            println!("No favorites yet.");
        } else {
            println!("No cats.");
        }
        return;
    }

    for item in &view.items {
        let star = if item.is_favorite { "*" } else { " " };
        println!("{} {:<24} {}", star, item.id, item.display_name());
    }
    println!(
        "Page {}/{} ({} of {} cats)",
        view.current_page, view.total_pages, view.matching_items, view.total_items
    );
}

fn reset_storage(config: &CatalogConfig) -> anyhow::Result<()> {
    let db = CatalogDb::open_at(&config.db_path)?;
    CatalogPersistence::new(Arc::new(db)).clear()?;
    println!("Cleared stored catalog at {}", config.db_path.display());
    Ok(())
}

async fn run_cli(config: CatalogConfig, command: CliCommand) -> anyhow::Result<()> {
    if let CliCommand::Reset = command {
        return reset_storage(&config);
    }

    let store = CatalogStore::open(&config)?;

    match command {
        CliCommand::Refresh => match store.refresh().await {
            RefreshOutcome::Loaded { count } => println!("Fetched {} cats.", count),
            RefreshOutcome::Failed { message } => anyhow::bail!("Refresh failed: {}", message),
            RefreshOutcome::AlreadyLoading => println!("A refresh is already running."),
        },
        CliCommand::List { page, favorites } => {
            if store.load_status() == LoadStatus::NotStarted {
                store.refresh().await;
            }

            // Paging here is for printing only; nothing is written back
            let mut state = reduce(&store.state(), Action::SetFilterFavoritesOnly(favorites));
            state = reduce(&state, Action::GoToPage(page));
            print_view(&CatalogView::from_state(&state));
        }
        CliCommand::Show { id } => match store.lookup(&id).await {
            ItemLookup::Found(item) => println!("{}", serde_json::to_string_pretty(&item)?),
            ItemLookup::NotFound => anyhow::bail!("No cat with id '{}'", id),
            ItemLookup::Failed(message) => anyhow::bail!("Lookup failed: {}", message),
        },
        CliCommand::Serve { .. } | CliCommand::Reset => {
            anyhow::bail!("not a catalog command")
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let args = Args::parse();
    let config = CatalogConfig::from_env();

    match args.command {
        None => run_server(config, 8080, false).await,
        Some(CliCommand::Serve { port, ephemeral }) => run_server(config, port, ephemeral).await,
        Some(command) => run_cli(config, command).await,
    }
}
