use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use shelf_client::{AdminClient, ArticleWriter, GistClient};
use shelf_common::Config;
use shelf_core::MemoryPreferenceStore;
use shelf_web::{router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("shelf=info".parse()?))
        .init();

    let config = Config::from_env()?;
    config.log_redacted();

    let writer: Option<Arc<dyn ArticleWriter>> = config
        .admin_key
        .as_deref()
        .map(|key| Arc::new(AdminClient::new(&config.admin_url, key)) as Arc<dyn ArticleWriter>);

    let state = Arc::new(AppState {
        source: Arc::new(GistClient::new(&config.articles_url)),
        writer,
        preferences: Arc::new(MemoryPreferenceStore::new()),
        grouping: config.grouping,
        search_debounce: config.search_debounce,
    });

    let addr = format!("{}:{}", config.web_host, config.web_port);
    info!("Shelf web server starting on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router(state)).await?;

    Ok(())
}
