use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Query, State},
    http::{header, HeaderValue},
    response::{Html, IntoResponse, Json, Redirect},
    routing::{get, post},
    Form, Router,
};
use serde::Deserialize;
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::{info, warn};

use shelf_client::{ArticleSource, ArticleWriter};
use shelf_common::{GroupingVariant, Tab};
use shelf_core::{AdminForm, FormMessage, PreferenceStore, ViewController};

pub mod templates;
use templates::*;

pub const ADMIN_DISABLED_MESSAGE: &str = "Error: Admin submissions are not configured.";

// --- App State ---

pub struct AppState {
    pub source: Arc<dyn ArticleSource>,
    /// `None` when no admin key is configured.
    pub writer: Option<Arc<dyn ArticleWriter>>,
    pub preferences: Arc<dyn PreferenceStore>,
    pub grouping: GroupingVariant,
    pub search_debounce: Duration,
}

impl AppState {
    /// A fresh view for one page visit. Selection state lives in the query string.
    fn new_view(&self) -> ViewController {
        ViewController::new(
            Arc::clone(&self.source),
            Arc::clone(&self.preferences),
            self.grouping,
            self.search_debounce,
        )
    }
}

// --- Router ---

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(list_page))
        .route("/add", get(add_page).post(add_submit))
        .route("/theme", post(toggle_theme))
        .route("/api/articles", get(api_articles))
        .route("/api/groups", get(api_groups))
        .route("/api/categories", get(api_categories))
        .with_state(state)
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .layer(
            tower_http::trace::TraceLayer::new_for_http().make_span_with(
                |request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                },
            ),
        )
}

// --- Handlers ---

#[derive(Debug, Default, Deserialize)]
struct ListQuery {
    tab: Option<String>,
    category: Option<String>,
    q: Option<String>,
}

/// Navigate to the list view: fetch, then apply the selection from the query.
async fn open_view(state: &AppState, query: &ListQuery) -> ViewController {
    let mut view = state.new_view();
    view.navigate_to_list().await;

    if query.tab.as_deref() == Some(state.grouping.tab_slug()) {
        view.set_active_tab(Tab::Groups);
    }
    if let Some(category) = query.category.as_deref().filter(|c| !c.is_empty()) {
        view.set_active_category(category);
    }
    if let Some(q) = query.q.as_deref() {
        view.commit_search(q);
    }
    view
}

async fn list_page(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    let view = open_view(&state, &query).await;
    Html(render_list(&view))
}

async fn api_articles(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    let view = open_view(&state, &query).await;
    Json(view.visible_articles().to_vec())
}

async fn api_groups(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    let view = open_view(&state, &query).await;
    Json(view.visible_groups().to_vec())
}

async fn api_categories(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let view = open_view(&state, &ListQuery::default()).await;
    Json(view.categories().to_vec())
}

async fn add_page(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let view = state.new_view();
    let form = AdminForm::new();
    if state.writer.is_none() {
        let message = FormMessage::Error(ADMIN_DISABLED_MESSAGE.to_string());
        return Html(render_add_form_with_message(&form, Some(&message), view.theme()));
    }
    Html(render_add_form(&form, view.theme()))
}

#[derive(Debug, Deserialize)]
struct AddArticleInput {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    website: String,
}

async fn add_submit(
    State(state): State<Arc<AppState>>,
    Form(input): Form<AddArticleInput>,
) -> impl IntoResponse {
    let theme = state.new_view().theme();
    let mut form = AdminForm::with_fields(&input.title, &input.url, &input.website);

    let Some(writer) = state.writer.as_deref() else {
        warn!("Admin submission attempted without a configured key");
        let message = FormMessage::Error(ADMIN_DISABLED_MESSAGE.to_string());
        return Html(render_add_form_with_message(&form, Some(&message), theme));
    };

    let message = form.submit(writer).await.clone();
    info!(success = !message.is_error(), "Admin form submitted");
    Html(render_add_form(&form, theme))
}

#[derive(Deserialize, Default)]
struct ThemeInput {
    return_to: Option<String>,
}

async fn toggle_theme(
    State(state): State<Arc<AppState>>,
    Form(input): Form<ThemeInput>,
) -> impl IntoResponse {
    let mut view = state.new_view();
    let theme = view.toggle_theme();
    info!(theme = theme.as_str(), "Theme changed");
    Redirect::to(local_path(input.return_to.as_deref()))
}

/// Only same-site paths are followed after a theme change; anything else
/// (absolute or protocol-relative URLs) lands on the list page.
fn local_path(target: Option<&str>) -> &str {
    match target {
        Some(path)
            if path.starts_with('/')
                && !path.starts_with("//")
                && !path.contains('\\')
                && !path.chars().any(char::is_control) =>
        {
            path
        }
        _ => "/",
    }
}
