use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use catalog_browser::{
    apply_search_filter, apply_title_sort, CatalogStore, HttpCatalogSource, SqliteCatalogStore,
    SyncController, DEFAULT_CATALOG_URL,
};

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(msg).with_context(|| format!("Error resolving path: {}", s));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to the SQLite catalog database file.
    #[clap(value_parser = parse_path)]
    pub catalog_db: PathBuf,

    /// URL of the remote catalog document.
    #[clap(long, default_value = DEFAULT_CATALOG_URL)]
    pub catalog_url: String,

    /// Timeout in seconds for the catalog fetch.
    #[clap(long, default_value_t = 30)]
    pub fetch_timeout_sec: u64,

    /// Order the items by title.
    #[clap(long)]
    pub sort_by_title: bool,

    /// Show only items whose title contains this phrase.
    #[clap(long, default_value = "")]
    pub search: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .unwrap();

    info!(
        "Opening SQLite catalog database at {:?}...",
        cli_args.catalog_db
    );
    let store = Arc::new(SqliteCatalogStore::new(&cli_args.catalog_db)?);

    let source = Arc::new(HttpCatalogSource::new(
        cli_args.catalog_url,
        cli_args.fetch_timeout_sec,
    )?);

    let controller = SyncController::new(source, store.clone());
    let outcome = controller.ensure_synced().await?;
    info!("Sync outcome: {:?}", outcome);

    let items = store.get_all()?;
    let items = apply_title_sort(items, cli_args.sort_by_title);
    let items = apply_search_filter(items, &cli_args.search);

    for item in &items {
        println!("{}  {:.2}", item.title, item.price);
    }

    Ok(())
}
