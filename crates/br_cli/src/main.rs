use std::net::SocketAddr;
use std::sync::Arc;
use clap::{Parser, Subcommand};
use br_core::{ArticleStorage, Result};
use br_scrapers::cli::{run_discovery, run_refresh, DiscoverArgs, RefreshArgs};
use br_scrapers::logging::init_logging;
use br_web::AppState;
use tracing::{info, Level};

#[cfg(feature = "sqlite")]
const DEFAULT_STORAGE: &str = "sqlite";
#[cfg(not(feature = "sqlite"))]
const DEFAULT_STORAGE: &str = "memory";

#[derive(Parser, Debug)]
#[command(author, version, about = "Scrape, refresh and serve blog articles", long_about = None)]
pub struct Cli {
    /// Storage backend: sqlite or memory
    #[arg(long, env = "STORAGE_BACKEND", default_value = DEFAULT_STORAGE)]
    storage: String,
    /// Backend location, e.g. a SQLite file path
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: Level,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Store the oldest articles of the blog listing
    Discover(DiscoverArgs),
    /// Rewrite stored articles that have no updated content yet
    Refresh(RefreshArgs),
    /// Serve the read API and HTML view
    Serve {
        #[arg(long, env = "BIND_ADDR", default_value = "127.0.0.1:5000")]
        addr: SocketAddr,
    },
    /// Print stored articles and their refresh status
    List,
}

async fn list_articles(storage: &Arc<dyn ArticleStorage>) -> Result<()> {
    let articles = storage.list_articles().await?;
    if articles.is_empty() {
        println!("No articles stored yet. Run `br discover` first.");
        return Ok(());
    }

    for article in &articles {
        let status = if article.is_refreshed() { "✨" } else { "📄" };
        println!("{} #{} {} - {}", status, article.id, article.title, article.source_url);
    }
    let refreshed = articles.iter().filter(|a| a.is_refreshed()).count();
    println!("{} articles, {} refreshed", articles.len(), refreshed);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.log_level);

    let storage = br_storage::create_storage(&cli.storage, cli.database_url.as_deref()).await?;
    info!("✨ Storage initialized successfully (using {})", cli.storage);

    match cli.command {
        Commands::Discover(args) => {
            run_discovery(&args, storage).await?;
        }
        Commands::Refresh(args) => {
            run_refresh(&args, storage).await?;
        }
        Commands::Serve { addr } => {
            br_web::serve(AppState::new(storage), addr).await?;
        }
        Commands::List => list_articles(&storage).await?,
    }

    Ok(())
}
