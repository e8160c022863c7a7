pub mod admin;
pub mod error;

pub use admin::{AdminClient, AdminResponse, ArticleWriter};
pub use error::{Result, ShelfClientError};

use async_trait::async_trait;
use shelf_common::Article;
use tracing::{info, warn};

// --- ArticleSource trait ---

/// Anything that can produce the article collection.
#[async_trait]
pub trait ArticleSource: Send + Sync {
    /// Load the full collection. Implementations may reject; the view
    /// controller turns a rejection into a user-facing message.
    async fn load_articles(&self) -> Result<Vec<Article>>;
    fn name(&self) -> &str;
}

// --- Gist-backed source ---

/// Reads the article document from a static JSON URL (a raw gist by default).
pub struct GistClient {
    client: reqwest::Client,
    url: String,
}

impl GistClient {
    pub fn new(url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.to_string(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch and decode the document, surfacing every failure.
    pub async fn try_fetch_articles(&self) -> Result<Vec<Article>> {
        let resp = self.client.get(&self.url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(ShelfClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = resp.text().await?;
        let entries: Vec<serde_json::Value> = serde_json::from_str(&body)?;
        Ok(decode_entries(entries))
    }

    /// Best-effort fetch: any failure is logged and yields an empty collection.
    /// Single attempt, no retry.
    pub async fn fetch_articles(&self) -> Vec<Article> {
        match self.try_fetch_articles().await {
            Ok(articles) => {
                info!(count = articles.len(), url = self.url.as_str(), "Fetched articles");
                articles
            }
            Err(e) => {
                warn!(error = %e, url = self.url.as_str(), "Failed to fetch articles");
                Vec::new()
            }
        }
    }
}

/// Decode each entry on its own; entries that are not article objects are
/// skipped so they cannot hide the rest of the collection.
fn decode_entries(entries: Vec<serde_json::Value>) -> Vec<Article> {
    entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match serde_json::from_value::<Article>(entry) {
            Ok(article) => Some(article),
            Err(e) => {
                warn!(index, error = %e, "Skipping malformed article entry");
                None
            }
        })
        .collect()
}

#[async_trait]
impl ArticleSource for GistClient {
    async fn load_articles(&self) -> Result<Vec<Article>> {
        Ok(self.fetch_articles().await)
    }

    fn name(&self) -> &str {
        "gist"
    }
}
