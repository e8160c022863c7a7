use async_trait::async_trait;
use serde::Deserialize;
use shelf_common::NewArticle;
use tracing::{info, warn};

use crate::error::{Result, ShelfClientError};

/// Header carrying the shared admin secret.
pub const ADMIN_KEY_HEADER: &str = "X-Admin-Key";

/// JSON body returned by the admin function. Only `message` is read.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminResponse {
    #[serde(default)]
    pub message: Option<String>,
}

/// Write side of the article store.
#[async_trait]
pub trait ArticleWriter: Send + Sync {
    async fn submit_article(&self, article: &NewArticle) -> Result<AdminResponse>;
}

/// Posts new articles to the backend function that rewrites the document.
pub struct AdminClient {
    client: reqwest::Client,
    endpoint: String,
    key: String,
}

impl AdminClient {
    pub fn new(endpoint: &str, key: &str) -> Self {
        // The key is a static shared secret sent as a plain header.
        if url::Url::parse(endpoint).is_ok_and(|u| u.scheme() == "http") {
            warn!(endpoint, "Admin key will be sent over plaintext HTTP");
        }

        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.to_string(),
            key: key.to_string(),
        }
    }
}

#[async_trait]
impl ArticleWriter for AdminClient {
    async fn submit_article(&self, article: &NewArticle) -> Result<AdminResponse> {
        let resp = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .header(ADMIN_KEY_HEADER, &self.key)
            .json(article)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            // A non-JSON error body still counts as a rejection, just without a message.
            let message = serde_json::from_str::<AdminResponse>(&body)
                .ok()
                .and_then(|r| r.message)
                .unwrap_or_default();
            return Err(ShelfClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: AdminResponse = serde_json::from_str(&body)?;
        info!(title = article.title.as_str(), "Article submitted");
        Ok(parsed)
    }
}
