use std::collections::BTreeSet;

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

/// Selector value meaning "no category filter".
pub const ALL_CATEGORY: &str = "All";

/// Link substituted when a representative URL cannot be derived.
pub const SENTINEL_URL: &str = "#";

// --- Article ---

/// One bookmarked article as stored in the remote JSON document.
///
/// Fields are lenient: a missing, `null` or non-string value deserializes as
/// empty so a single malformed entry never rejects the whole payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub url: String,
    #[serde(default, deserialize_with = "lenient_opt_string", skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string", skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LenientField {
    Text(String),
    Other(#[allow(dead_code)] IgnoredAny),
}

fn lenient_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<LenientField>::deserialize(deserializer)? {
        Some(LenientField::Text(s)) => Some(s),
        Some(LenientField::Other(_)) | None => None,
    })
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_opt_string(deserializer).map(Option::unwrap_or_default)
}

impl Article {
    /// Trimmed, non-empty category labels in their original order.
    pub fn categories(&self) -> Vec<&str> {
        self.category.as_deref().map(split_categories).unwrap_or_default()
    }

    pub fn has_category(&self, label: &str) -> bool {
        self.categories().iter().any(|c| *c == label)
    }

    /// Badges shown on an article card: the first `max` labels, plus a
    /// `+N` badge when more exist.
    pub fn badges(&self, max: usize) -> Vec<String> {
        let categories = self.categories();
        let mut badges: Vec<String> = categories.iter().take(max).map(|c| c.to_string()).collect();
        if categories.len() > max {
            badges.push(format!("+{}", categories.len() - max));
        }
        badges
    }
}

/// Split a comma-joined category string into trimmed, non-empty labels.
pub fn split_categories(raw: &str) -> Vec<&str> {
    raw.split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .collect()
}

// --- Grouping ---

/// Which article field groups articles on the secondary tab.
///
/// The two schemas are mutually exclusive: a deployment groups either by
/// website or by author, never both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupingVariant {
    Website,
    Author,
}

impl GroupingVariant {
    /// The grouping key of an article. A missing field groups under "".
    pub fn key<'a>(&self, article: &'a Article) -> &'a str {
        let field = match self {
            GroupingVariant::Website => &article.website,
            GroupingVariant::Author => &article.author,
        };
        field.as_deref().unwrap_or("")
    }

    /// Tab label for the group listing.
    pub fn tab_label(&self) -> &'static str {
        match self {
            GroupingVariant::Website => "Websites",
            GroupingVariant::Author => "Authors",
        }
    }

    /// Query-string slug for the group tab.
    pub fn tab_slug(&self) -> &'static str {
        match self {
            GroupingVariant::Website => "websites",
            GroupingVariant::Author => "authors",
        }
    }
}

impl std::fmt::Display for GroupingVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GroupingVariant::Website => write!(f, "website"),
            GroupingVariant::Author => write!(f, "author"),
        }
    }
}

impl std::str::FromStr for GroupingVariant {
    type Err = crate::ShelfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "website" | "websites" => Ok(GroupingVariant::Website),
            "author" | "authors" => Ok(GroupingVariant::Author),
            other => Err(crate::ShelfError::Config(format!(
                "unknown grouping variant '{other}' (expected 'website' or 'author')"
            ))),
        }
    }
}

// --- Group ---

/// Summary of every article sharing one grouping key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub name: String,
    /// Representative link, or [`SENTINEL_URL`] when none could be derived.
    pub url: String,
    pub categories: BTreeSet<String>,
}

impl Group {
    pub fn has_category(&self, label: &str) -> bool {
        self.categories.contains(label)
    }
}

// --- View selection ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tab {
    #[default]
    Articles,
    Groups,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }
}

// --- Admin write path ---

/// Body posted to the admin endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewArticle {
    pub title: String,
    pub url: String,
    pub website: String,
}
