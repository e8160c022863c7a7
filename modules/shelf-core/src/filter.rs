//! Category + search filtering and display ordering.

use std::cmp::Ordering;

use shelf_common::{Article, Group, GroupingVariant, ALL_CATEGORY};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Articles passing both the category and the search predicate, sorted by title.
pub fn filter_articles(
    articles: &[Article],
    variant: GroupingVariant,
    active_category: &str,
    search_term: &str,
) -> Vec<Article> {
    let needle = search_term.to_lowercase();
    let mut visible: Vec<Article> = articles
        .iter()
        .filter(|a| active_category == ALL_CATEGORY || a.has_category(active_category))
        .filter(|a| needle.is_empty() || article_matches(a, variant, &needle))
        .cloned()
        .collect();

    visible.sort_by(|a, b| locale_compare(&a.title, &b.title));
    visible
}

/// Groups passing both predicates, sorted by name. Search looks at the name only.
pub fn filter_groups(groups: &[Group], active_category: &str, search_term: &str) -> Vec<Group> {
    let needle = search_term.to_lowercase();
    let mut visible: Vec<Group> = groups
        .iter()
        .filter(|g| active_category == ALL_CATEGORY || g.has_category(active_category))
        .filter(|g| needle.is_empty() || g.name.to_lowercase().contains(&needle))
        .cloned()
        .collect();

    visible.sort_by(|a, b| locale_compare(&a.name, &b.name));
    visible
}

fn article_matches(article: &Article, variant: GroupingVariant, needle: &str) -> bool {
    article.title.to_lowercase().contains(needle)
        || variant.key(article).to_lowercase().contains(needle)
        || article
            .category
            .as_deref()
            .is_some_and(|c| c.to_lowercase().contains(needle))
}

/// Display ordering close to a locale collation: letters compare first with
/// accents and case folded away, then accented forms follow their base
/// letter, then lowercase precedes uppercase.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    primary_key(a)
        .cmp(primary_key(b))
        .then_with(|| secondary_key(a).cmp(secondary_key(b)))
        .then_with(|| b.cmp(a))
}

fn primary_key(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
}

fn secondary_key(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd().flat_map(char::to_lowercase)
}
