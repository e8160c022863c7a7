//! Router behavior with in-memory article sources and writers.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use shelf_client::{AdminResponse, ArticleSource, ArticleWriter, Result, ShelfClientError};
use shelf_common::{Article, GroupingVariant, NewArticle};
use shelf_core::{MemoryPreferenceStore, PreferenceStore, LOAD_ERROR_MESSAGE, SEARCH_DEBOUNCE};
use shelf_web::{router, AppState, ADMIN_DISABLED_MESSAGE};

struct StaticSource(Vec<Article>);

#[async_trait]
impl ArticleSource for StaticSource {
    async fn load_articles(&self) -> Result<Vec<Article>> {
        Ok(self.0.clone())
    }

    fn name(&self) -> &str {
        "static"
    }
}

struct FailingSource;

#[async_trait]
impl ArticleSource for FailingSource {
    async fn load_articles(&self) -> Result<Vec<Article>> {
        Err(ShelfClientError::Network("offline".into()))
    }

    fn name(&self) -> &str {
        "failing"
    }
}

#[derive(Default)]
struct RecordingWriter(Mutex<Vec<NewArticle>>);

#[async_trait]
impl ArticleWriter for RecordingWriter {
    async fn submit_article(&self, article: &NewArticle) -> Result<AdminResponse> {
        self.0.lock().unwrap().push(article.clone());
        Ok(AdminResponse::default())
    }
}

fn article(title: &str, url: &str, website: &str, category: &str) -> Article {
    Article {
        title: title.into(),
        url: url.into(),
        website: Some(website.into()),
        category: Some(category.into()),
        ..Default::default()
    }
}

fn articles() -> Vec<Article> {
    vec![
        article("Tokio internals", "https://tokio.rs/blog/a", "Tokio", "rust, async"),
        article("React basics", "https://react.dev/learn", "React", "web, js"),
        article("Hooks in depth", "https://react.dev/reference", "React", "web, js, hooks"),
    ]
}

fn app_with(
    source: Arc<dyn ArticleSource>,
    writer: Option<Arc<dyn ArticleWriter>>,
    preferences: Arc<dyn PreferenceStore>,
) -> Router {
    router(Arc::new(AppState {
        source,
        writer,
        preferences,
        grouping: GroupingVariant::Website,
        search_debounce: SEARCH_DEBOUNCE,
    }))
}

fn app() -> Router {
    app_with(
        Arc::new(StaticSource(articles())),
        None,
        Arc::new(MemoryPreferenceStore::new()),
    )
}

async fn get(app: Router, uri: &str) -> (StatusCode, String) {
    let resp = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

async fn post_form(app: Router, uri: &str, body: &str) -> (StatusCode, String) {
    let resp = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = resp.status();
    let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

// =========================================================================
// JSON API
// =========================================================================

#[tokio::test]
async fn api_articles_applies_category_and_search() {
    let (status, body) = get(app(), "/api/articles?category=web&q=HOOK").await;
    assert_eq!(status, StatusCode::OK);

    let json: Value = serde_json::from_str(&body).unwrap();
    let titles: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Hooks in depth"]);
}

#[tokio::test]
async fn api_groups_lists_websites_with_origins() {
    let (_, body) = get(app(), "/api/groups").await;
    let json: Value = serde_json::from_str(&body).unwrap();
    let groups = json.as_array().unwrap();

    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0]["name"], "React");
    assert_eq!(groups[0]["url"], "https://react.dev");
    assert_eq!(groups[1]["name"], "Tokio");
}

#[tokio::test]
async fn api_categories_starts_with_all() {
    let (_, body) = get(app(), "/api/categories").await;
    let categories: Vec<String> = serde_json::from_str(&body).unwrap();
    assert_eq!(categories, vec!["All", "async", "hooks", "js", "rust", "web"]);
}

// =========================================================================
// HTML pages
// =========================================================================

#[tokio::test]
async fn list_page_renders_cards_with_badge_overflow() {
    let (status, body) = get(app(), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Tokio internals"));
    assert!(body.contains(r#"<span class="category-badge">+1</span>"#));
}

#[tokio::test]
async fn list_page_shows_group_tab() {
    let (_, body) = get(app(), "/?tab=websites").await;
    assert!(body.contains("Tracked Websites"));
    assert!(body.contains(r#"href="https://tokio.rs""#));
}

#[tokio::test]
async fn failing_source_shows_generic_error() {
    let app = app_with(
        Arc::new(FailingSource),
        None,
        Arc::new(MemoryPreferenceStore::new()),
    );
    let (_, body) = get(app, "/").await;
    assert!(body.contains(LOAD_ERROR_MESSAGE));
    assert!(!body.contains("offline"));
}

#[tokio::test]
async fn responses_are_not_cached() {
    let resp = app()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.headers()[header::CACHE_CONTROL], "no-store");
}

// =========================================================================
// Admin form and theme
// =========================================================================

#[tokio::test]
async fn add_without_key_reports_disabled() {
    let (status, body) = post_form(app(), "/add", "title=A&url=https%3A%2F%2Fa.com&website=A").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(ADMIN_DISABLED_MESSAGE));
}

#[tokio::test]
async fn add_page_without_key_says_submissions_are_disabled() {
    let (status, body) = get(app(), "/add").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(ADMIN_DISABLED_MESSAGE));

    let app = app_with(
        Arc::new(StaticSource(articles())),
        Some(Arc::new(RecordingWriter::default()) as Arc<dyn ArticleWriter>),
        Arc::new(MemoryPreferenceStore::new()),
    );
    let (_, body) = get(app, "/add").await;
    assert!(!body.contains(ADMIN_DISABLED_MESSAGE));
}

#[tokio::test]
async fn add_with_writer_submits_and_clears_form() {
    let writer = Arc::new(RecordingWriter::default());
    let app = app_with(
        Arc::new(StaticSource(articles())),
        Some(writer.clone() as Arc<dyn ArticleWriter>),
        Arc::new(MemoryPreferenceStore::new()),
    );

    let (_, body) = post_form(app, "/add", "title=Axum+guide&url=https%3A%2F%2Fdocs.rs%2Faxum&website=docs.rs").await;

    assert!(body.contains("Article added successfully! Gist updated."));
    let received = writer.0.lock().unwrap();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].title, "Axum guide");
    assert_eq!(received[0].url, "https://docs.rs/axum");
}

#[tokio::test]
async fn add_with_missing_field_is_rejected_locally() {
    let writer = Arc::new(RecordingWriter::default());
    let app = app_with(
        Arc::new(StaticSource(articles())),
        Some(writer.clone() as Arc<dyn ArticleWriter>),
        Arc::new(MemoryPreferenceStore::new()),
    );

    let (_, body) = post_form(app, "/add", "title=Only+title").await;

    assert!(body.contains("Please fill in all fields."));
    assert!(writer.0.lock().unwrap().is_empty());
}

#[tokio::test]
async fn theme_toggle_persists_across_requests() {
    let prefs = Arc::new(MemoryPreferenceStore::new());
    let app = app_with(Arc::new(StaticSource(articles())), None, prefs.clone());

    let (status, _) = post_form(app.clone(), "/theme", "").await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(prefs.get("theme").as_deref(), Some("dark"));

    let (_, body) = get(app, "/").await;
    assert!(body.contains(r#"<body class="dark">"#));
}

#[tokio::test]
async fn theme_toggle_returns_to_the_originating_view() {
    let (_, page) = get(app(), "/?tab=websites&category=web&q=re").await;
    assert!(page.contains(r#"name="return_to" value="/?tab=websites&amp;category=web&amp;q=re""#));

    let resp = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/theme")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("return_to=%2F%3Ftab%3Dwebsites%26category%3Dweb%26q%3Dre"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers()[header::LOCATION], "/?tab=websites&category=web&q=re");

    let resp = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/theme")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("return_to=https%3A%2F%2Fevil.example%2F"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.headers()[header::LOCATION], "/");
}
