//! State for the admin "add article" form.

use serde::Serialize;
use shelf_client::{ArticleWriter, ShelfClientError};
use shelf_common::NewArticle;
use tracing::warn;

pub const MISSING_FIELDS_MESSAGE: &str = "Please fill in all fields.";
pub const SUCCESS_MESSAGE: &str = "Article added successfully! Gist updated.";
pub const FALLBACK_ERROR_MESSAGE: &str = "Something went wrong.";
pub const NETWORK_ERROR_MESSAGE: &str = "Network error or server issue. Check console for details.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum FormMessage {
    Success(String),
    Error(String),
}

impl FormMessage {
    pub fn text(&self) -> &str {
        match self {
            FormMessage::Success(t) | FormMessage::Error(t) => t,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, FormMessage::Error(_))
    }
}

#[derive(Debug, Clone, Default)]
pub struct AdminForm {
    pub title: String,
    pub url: String,
    pub website: String,
    message: Option<FormMessage>,
    submitting: bool,
}

impl AdminForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fields(title: &str, url: &str, website: &str) -> Self {
        Self {
            title: title.to_string(),
            url: url.to_string(),
            website: website.to_string(),
            ..Self::default()
        }
    }

    pub fn message(&self) -> Option<&FormMessage> {
        self.message.as_ref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Validate and post the form. Fields are cleared only on success; the
    /// form always leaves the submitting state, whatever the outcome.
    pub async fn submit(&mut self, writer: &dyn ArticleWriter) -> &FormMessage {
        self.message = None;
        self.submitting = true;

        let outcome = self.send(writer).await;

        self.submitting = false;
        self.message.insert(outcome)
    }

    async fn send(&mut self, writer: &dyn ArticleWriter) -> FormMessage {
        if [&self.title, &self.url, &self.website]
            .iter()
            .any(|f| f.trim().is_empty())
        {
            return FormMessage::Error(MISSING_FIELDS_MESSAGE.to_string());
        }

        let article = NewArticle {
            title: self.title.clone(),
            url: self.url.clone(),
            website: self.website.clone(),
        };

        match writer.submit_article(&article).await {
            Ok(_) => {
                self.title.clear();
                self.url.clear();
                self.website.clear();
                FormMessage::Success(SUCCESS_MESSAGE.to_string())
            }
            Err(ShelfClientError::Api { status, message }) => {
                warn!(status, message = message.as_str(), "Admin endpoint rejected article");
                let detail = if message.is_empty() {
                    FALLBACK_ERROR_MESSAGE
                } else {
                    message.as_str()
                };
                FormMessage::Error(format!("Error: {detail}"))
            }
            Err(e) => {
                warn!(error = %e, "Admin submission failed");
                FormMessage::Error(NETWORK_ERROR_MESSAGE.to_string())
            }
        }
    }
}
