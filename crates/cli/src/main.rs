use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context};
use clap::{Args, Parser, Subcommand};
use shelf_app::modules::books::{
    filter::FilterSpec, models::SearchParams, registration, render::ResultRenderer,
    search::search_books,
};
use shelf_db::{seed, MemoryStore, RecordStore};
use shelf_kernel::settings::Settings;

#[derive(Debug, Parser)]
#[command(name = "shelf")]
#[command(about = "Book catalog search")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server
    Serve,
    /// Search a catalog offline and print the result fragment
    Search(SearchArgs),
    /// Print the resolved settings as JSON
    Config,
}

#[derive(Debug, Args)]
struct SearchArgs {
    /// Seed catalog to search; defaults to `catalog.seed_path`
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Free text matched against title and description
    #[arg(long)]
    text: Option<String>,

    /// Author slug
    #[arg(long)]
    author: Option<String>,

    /// Publisher slug
    #[arg(long)]
    publisher: Option<String>,

    #[arg(long)]
    rating: Option<String>,

    #[arg(long)]
    price: Option<String>,
}

impl SearchArgs {
    fn params(&self) -> SearchParams {
        SearchParams {
            s: self.text.clone(),
            author: self.author.clone(),
            publisher: self.publisher.clone(),
            rating: self.rating.clone(),
            price: self.price.clone(),
            action: None,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load().context("failed to load Shelf settings")?;
    shelf_telemetry::init(&settings.telemetry)?;

    match cli.command {
        Command::Serve => shelf_app::run(&settings).await,
        Command::Search(args) => search(&settings, &args).await,
        Command::Config => {
            println!("{}", serde_json::to_string_pretty(&settings)?);
            Ok(())
        }
    }
}

async fn search(settings: &Settings, args: &SearchArgs) -> anyhow::Result<()> {
    let catalog = args
        .catalog
        .as_ref()
        .or(settings.catalog.seed_path.as_ref())
        .ok_or_else(|| anyhow!("no catalog given; pass --catalog or set catalog.seed_path"))?;

    let store: Arc<dyn RecordStore> = Arc::new(MemoryStore::new());
    registration::register(store.as_ref()).await?;
    seed::load_catalog(store.as_ref(), catalog)
        .await
        .with_context(|| format!("failed to load {}", catalog.display()))?;

    let spec = FilterSpec::from_params(&args.params(), settings.search.price_match);
    let matches = search_books(store.as_ref(), &spec).await?;
    tracing::info!(results = matches.len(), "offline search complete");

    print!("{}", ResultRenderer::new(&settings.search).results(matches));
    Ok(())
}
