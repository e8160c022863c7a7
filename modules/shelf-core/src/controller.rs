//! UI-facing view state: tabs, category, debounced search, load status and theme.
//!
//! The controller owns the article collection and recomputes facets and the
//! filtered views explicitly whenever one of their inputs changes.

use std::sync::Arc;
use std::time::Duration;

use shelf_client::{ArticleSource, Result as SourceResult};
use shelf_common::{Article, Group, GroupingVariant, Tab, Theme, ALL_CATEGORY};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::debounce::Debouncer;
use crate::facets::{derive_facets, Facets};
use crate::filter::{filter_articles, filter_groups};
use crate::preferences::PreferenceStore;

/// Shown when the article source rejects. The underlying cause is only logged.
pub const LOAD_ERROR_MESSAGE: &str =
    "Failed to load articles. Please check your network or Gist URL.";

/// Preference key holding the theme.
pub const THEME_KEY: &str = "theme";

/// Identifies one load. Only the most recently started load may apply its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

pub struct ViewController {
    source: Arc<dyn ArticleSource>,
    preferences: Arc<dyn PreferenceStore>,
    variant: GroupingVariant,

    articles: Vec<Article>,
    facets: Facets,

    active_tab: Tab,
    active_category: String,
    search_term: String,
    debounced_search_term: String,
    search: Debouncer<String>,
    search_rx: watch::Receiver<String>,

    loading: bool,
    error: Option<String>,
    theme: Theme,
    latest_load: u64,

    visible_articles: Vec<Article>,
    visible_groups: Vec<Group>,
    recomputations: u64,
}

impl ViewController {
    pub fn new(
        source: Arc<dyn ArticleSource>,
        preferences: Arc<dyn PreferenceStore>,
        variant: GroupingVariant,
        search_debounce: Duration,
    ) -> Self {
        let theme = preferences
            .get(THEME_KEY)
            .and_then(|t| Theme::parse(&t))
            .unwrap_or_default();
        let search = Debouncer::new(String::new(), search_debounce);
        let search_rx = search.subscribe();

        Self {
            source,
            preferences,
            variant,
            articles: Vec::new(),
            facets: derive_facets(&[], variant),
            active_tab: Tab::default(),
            active_category: ALL_CATEGORY.to_string(),
            search_term: String::new(),
            debounced_search_term: String::new(),
            search,
            search_rx,
            loading: false,
            error: None,
            theme,
            latest_load: 0,
            visible_articles: Vec::new(),
            visible_groups: Vec::new(),
            recomputations: 0,
        }
    }

    // --- Loading ---

    /// Fetch the collection for the list view. Never retried automatically.
    pub async fn navigate_to_list(&mut self) {
        let ticket = self.begin_load();
        let source = Arc::clone(&self.source);
        debug!(source = source.name(), "Loading articles");
        let result = source.load_articles().await;
        self.finish_load(ticket, result);
    }

    /// Mark a load as started. Any earlier ticket becomes stale.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.latest_load += 1;
        self.loading = true;
        self.error = None;
        LoadTicket(self.latest_load)
    }

    /// Apply a load result. Returns `false` (and changes nothing) when a newer
    /// load has started since `ticket` was issued.
    pub fn finish_load(&mut self, ticket: LoadTicket, result: SourceResult<Vec<Article>>) -> bool {
        if ticket.0 != self.latest_load {
            debug!(ticket = ticket.0, latest = self.latest_load, "Discarding stale load result");
            return false;
        }

        self.loading = false;
        match result {
            Ok(articles) => {
                info!(count = articles.len(), "Articles loaded");
                self.replace_articles(articles);
            }
            Err(e) => {
                warn!(error = %e, "Failed to load articles");
                self.error = Some(LOAD_ERROR_MESSAGE.to_string());
            }
        }
        true
    }

    fn replace_articles(&mut self, articles: Vec<Article>) {
        self.articles = articles;
        self.facets = derive_facets(&self.articles, self.variant);

        if !self.facets.categories.contains(&self.active_category) {
            debug!(category = self.active_category.as_str(), "Active category vanished, resetting");
            self.active_category = ALL_CATEGORY.to_string();
        }
        self.recompute();
    }

    // --- Selection ---

    pub fn set_active_tab(&mut self, tab: Tab) {
        self.active_tab = tab;
    }

    /// Select a category. Labels not present in the current facets are
    /// rejected and the selection is left unchanged.
    pub fn set_active_category(&mut self, category: &str) -> bool {
        if !self.facets.categories.iter().any(|c| c == category) {
            warn!(category, "Ignoring unknown category");
            return false;
        }
        if self.active_category != category {
            self.active_category = category.to_string();
            self.recompute();
        }
        true
    }

    /// Record a keystroke. The input value changes now; the filtered view
    /// follows once the debounce interval passes without further input.
    pub fn set_search_term(&mut self, term: &str) {
        self.search_term = term.to_string();
        self.search.push(term.to_string());
    }

    /// Apply a search term immediately, bypassing the debounce.
    pub fn commit_search(&mut self, term: &str) {
        self.search_term = term.to_string();
        self.search.flush(term.to_string());
        let published = self.search_rx.borrow_and_update().clone();
        self.apply_search(published);
    }

    /// Apply a debounced term if one was published. Non-blocking.
    pub fn poll_search(&mut self) -> bool {
        if !self.search_rx.has_changed().unwrap_or(false) {
            return false;
        }
        let published = self.search_rx.borrow_and_update().clone();
        self.apply_search(published)
    }

    /// Wait for the next debounced term and apply it.
    pub async fn wait_for_search(&mut self) -> bool {
        if self.search_rx.changed().await.is_err() {
            return false;
        }
        let published = self.search_rx.borrow_and_update().clone();
        self.apply_search(published)
    }

    fn apply_search(&mut self, term: String) -> bool {
        if term == self.debounced_search_term {
            return false;
        }
        self.debounced_search_term = term;
        self.recompute();
        true
    }

    // --- Theme ---

    pub fn toggle_theme(&mut self) -> Theme {
        self.set_theme(self.theme.toggled());
        self.theme
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        self.preferences.set(THEME_KEY, theme.as_str());
    }

    // --- Derived views ---

    fn recompute(&mut self) {
        self.visible_articles = filter_articles(
            &self.articles,
            self.variant,
            &self.active_category,
            &self.debounced_search_term,
        );
        self.visible_groups = filter_groups(
            &self.facets.groups,
            &self.active_category,
            &self.debounced_search_term,
        );
        self.recomputations += 1;
    }

    // --- Accessors ---

    pub fn grouping(&self) -> GroupingVariant {
        self.variant
    }

    pub fn active_tab(&self) -> Tab {
        self.active_tab
    }

    pub fn active_category(&self) -> &str {
        &self.active_category
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn debounced_search_term(&self) -> &str {
        &self.debounced_search_term
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    pub fn categories(&self) -> &[String] {
        &self.facets.categories
    }

    pub fn groups(&self) -> &[Group] {
        &self.facets.groups
    }

    pub fn visible_articles(&self) -> &[Article] {
        &self.visible_articles
    }

    pub fn visible_groups(&self) -> &[Group] {
        &self.visible_groups
    }

    /// How many times the filtered views have been rebuilt.
    pub fn recomputations(&self) -> u64 {
        self.recomputations
    }
}
