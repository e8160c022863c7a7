//! Facet derivation: category labels and grouped summaries computed from the
//! article collection. Everything here is a pure function of its input.

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;
use shelf_common::{Article, Group, GroupingVariant, ALL_CATEGORY, SENTINEL_URL};
use tracing::warn;
use url::Url;

/// Hosts whose links are shortened to `owner/repo`.
const CODE_HOSTS: &[&str] = &[
    "github.com",
    "www.github.com",
    "gitlab.com",
    "www.gitlab.com",
    "bitbucket.org",
    "www.bitbucket.org",
];

/// Hosts whose links are shortened to the `@handle` profile.
const PUBLISHING_HOSTS: &[&str] = &["medium.com", "www.medium.com"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Facets {
    /// `"All"` followed by every distinct label, ascending.
    pub categories: Vec<String>,
    /// One record per grouping key, in first-seen order.
    pub groups: Vec<Group>,
}

pub fn derive_facets(articles: &[Article], variant: GroupingVariant) -> Facets {
    Facets {
        categories: derive_categories(articles),
        groups: derive_groups(articles, variant),
    }
}

pub fn derive_categories(articles: &[Article]) -> Vec<String> {
    let labels: BTreeSet<&str> = articles
        .iter()
        .flat_map(|a| a.categories())
        .filter(|c| *c != ALL_CATEGORY)
        .collect();

    std::iter::once(ALL_CATEGORY)
        .chain(labels)
        .map(String::from)
        .collect()
}

pub fn derive_groups(articles: &[Article], variant: GroupingVariant) -> Vec<Group> {
    let mut groups: Vec<Group> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for article in articles {
        let key = variant.key(article);
        let slot = match index.get(key) {
            Some(&i) => i,
            None => {
                groups.push(Group {
                    name: key.to_string(),
                    url: representative_url(&article.url, variant),
                    categories: BTreeSet::new(),
                });
                index.insert(key, groups.len() - 1);
                groups.len() - 1
            }
        };

        groups[slot]
            .categories
            .extend(article.categories().into_iter().map(String::from));
    }

    groups
}

/// Link that stands for a whole group, derived from one member's URL.
/// Returns [`SENTINEL_URL`] when the URL cannot be parsed.
pub fn representative_url(raw: &str, variant: GroupingVariant) -> String {
    let parsed = match Url::parse(raw) {
        Ok(u) => u,
        Err(e) => {
            warn!(url = raw, error = %e, "Could not parse article URL");
            return SENTINEL_URL.to_string();
        }
    };

    let origin = parsed.origin();
    if !origin.is_tuple() {
        warn!(url = raw, "Article URL has no origin");
        return SENTINEL_URL.to_string();
    }
    let origin = origin.ascii_serialization();

    match variant {
        GroupingVariant::Website => origin,
        GroupingVariant::Author => provider_url(&parsed, origin),
    }
}

fn provider_url(parsed: &Url, origin: String) -> String {
    let host = parsed.host_str().unwrap_or_default().to_ascii_lowercase();
    let segments: Vec<&str> = parsed
        .path_segments()
        .map(|s| s.filter(|seg| !seg.is_empty()).collect())
        .unwrap_or_default();

    if CODE_HOSTS.contains(&host.as_str()) {
        return match segments.as_slice() {
            [owner, repo, ..] => format!("{origin}/{owner}/{repo}"),
            _ => origin,
        };
    }

    if PUBLISHING_HOSTS.contains(&host.as_str()) {
        if let Some(handle) = segments
            .first()
            .and_then(|seg| seg.strip_prefix('@'))
            .filter(|h| !h.is_empty())
        {
            return format!("{origin}/@{handle}");
        }
    }

    origin
}
