use shelf_common::{Article, Group, Tab, Theme, ALL_CATEGORY};
use shelf_core::{AdminForm, FormMessage, ViewController};
use url::form_urlencoded;

/// Category badges shown per article card before collapsing into `+N`.
const CARD_BADGES: usize = 2;

/// Render the list view: tabs, filters and the active tab's content.
pub fn render_list(view: &ViewController) -> String {
    let grouping = view.grouping();
    let category = view.active_category();
    let q = view.search_term();

    let mut content = String::new();

    // Tabs
    let (articles_class, groups_class) = match view.active_tab() {
        Tab::Articles => ("active", ""),
        Tab::Groups => ("", "active"),
    };
    content.push_str(&format!(
        r#"<nav class="tabs"><a class="{groups_class}" href="{}">{}</a><a class="{articles_class}" href="{}">Articles</a></nav>"#,
        html_escape(&list_href(grouping.tab_slug(), category, q)),
        grouping.tab_label(),
        html_escape(&list_href("articles", category, q)),
    ));

    let tab_slug = match view.active_tab() {
        Tab::Articles => "articles",
        Tab::Groups => grouping.tab_slug(),
    };

    // Search
    content.push_str(&format!(
        r#"<form class="search" method="get" action="/"><input type="hidden" name="tab" value="{}"><input type="hidden" name="category" value="{}"><input type="search" name="q" value="{}" placeholder="Search..." aria-label="Search"></form>"#,
        html_escape(tab_slug),
        html_escape(category),
        html_escape(q),
    ));

    // Category chips
    content.push_str(r#"<div class="categories">"#);
    for label in view.categories() {
        let class = if label == category { "chip active" } else { "chip" };
        content.push_str(&format!(
            r#"<a class="{class}" href="{}">{}</a>"#,
            html_escape(&list_href(tab_slug, label, q)),
            html_escape(label),
        ));
    }
    content.push_str("</div>");

    if view.is_loading() {
        content.push_str(r#"<p class="loading-message">Loading articles from your Shelf...</p>"#);
    }
    if let Some(error) = view.error() {
        content.push_str(&format!(r#"<p class="error-message">{}</p>"#, html_escape(error)));
    }

    if !view.is_loading() && view.error().is_none() {
        match view.active_tab() {
            Tab::Articles => content.push_str(&render_articles(view.visible_articles(), view)),
            Tab::Groups => content.push_str(&render_groups(view.visible_groups(), view)),
        }
    }

    let here = list_href(tab_slug, category, q);
    build_page("Shelf", view.theme(), &here, &content)
}

fn render_articles(articles: &[Article], view: &ViewController) -> String {
    if articles.is_empty() {
        return r#"<p class="empty">No articles yet. Add some to get started!</p>"#.to_string();
    }

    let mut cards = String::from(r#"<div class="articles-grid">"#);
    for article in articles {
        let byline = view.grouping().key(article);
        let byline = if byline.is_empty() {
            String::new()
        } else {
            format!(r#"<p class="byline">{}</p>"#, html_escape(byline))
        };

        let badges: String = article
            .badges(CARD_BADGES)
            .iter()
            .map(|b| format!(r#"<span class="category-badge">{}</span>"#, html_escape(b)))
            .collect();

        cards.push_str(&format!(
            r#"<a href="{}" target="_blank" rel="noopener noreferrer" class="article-card"><h3>{}</h3><div class="card-footer">{byline}{badges}</div></a>"#,
            html_escape(&article.url),
            html_escape(&article.title),
        ));
    }
    cards.push_str("</div>");
    cards
}

fn render_groups(groups: &[Group], view: &ViewController) -> String {
    let label = view.grouping().tab_label();
    if groups.is_empty() {
        return format!(
            r#"<p class="empty">No {} found. Add articles to your Gist to see them here!</p>"#,
            label.to_lowercase()
        );
    }

    let mut items = format!(r#"<div class="groups-list"><h2>Tracked {label}</h2><ul>"#);
    for group in groups {
        let categories: Vec<&str> = group.categories.iter().map(String::as_str).collect();
        items.push_str(&format!(
            r#"<li><a href="{}" target="_blank" rel="noopener noreferrer">{}</a> <span class="group-categories">{}</span></li>"#,
            html_escape(&group.url),
            html_escape(&group.name),
            html_escape(&categories.join(", ")),
        ));
    }
    items.push_str("</ul></div>");
    items
}

/// Render the admin form, showing whatever message the last submit left.
pub fn render_add_form(form: &AdminForm, theme: Theme) -> String {
    render_add_form_with_message(form, form.message(), theme)
}

pub fn render_add_form_with_message(
    form: &AdminForm,
    message: Option<&FormMessage>,
    theme: Theme,
) -> String {
    let message = match message {
        Some(m) => format!(
            r#"<p class="form-message {}">{}</p>"#,
            if m.is_error() { "error" } else { "success" },
            html_escape(m.text()),
        ),
        None => String::new(),
    };
    let button = if form.is_submitting() { "Adding..." } else { "Add Article" };

    let content = format!(
        r#"<div class="add-article"><h2>Add New Article</h2>
<form method="post" action="/add">
<label for="title">Title:</label><input type="text" id="title" name="title" value="{}" required aria-label="Article Title">
<label for="url">URL:</label><input type="url" id="url" name="url" value="{}" required aria-label="Article URL">
<label for="website">Website/Source:</label><input type="text" id="website" name="website" value="{}" required aria-label="Website Name">
<button type="submit">{button}</button>
{message}
</form></div>"#,
        html_escape(&form.title),
        html_escape(&form.url),
        html_escape(&form.website),
    );

    build_page("Add Article", theme, "/add", &content)
}

fn list_href(tab: &str, category: &str, q: &str) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    query.append_pair("tab", tab);
    if category != ALL_CATEGORY {
        query.append_pair("category", category);
    }
    if !q.is_empty() {
        query.append_pair("q", q);
    }
    format!("/?{}", query.finish())
}

fn build_page(title: &str, theme: Theme, here: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} | Shelf</title>
<style>
:root{{--fg:#222;--bg:#fff;--muted:#777;--line:#ddd;--accent:#3a6ea5;--chip:#eef3f8;}}
body.dark{{--fg:#e6e6e6;--bg:#121417;--muted:#9aa;--line:#333;--accent:#7aa7d8;--chip:#1f2a36;}}
body{{margin:0;font:15px/1.5 system-ui,sans-serif;color:var(--fg);background:var(--bg);}}
a{{color:inherit;}}
.topbar{{display:flex;gap:16px;align-items:center;padding:10px 20px;border-bottom:1px solid var(--line);}}
.topbar .brand{{font-weight:700;text-decoration:none;margin-right:auto;}}
.topbar form{{margin:0;}}
.topbar button{{font:inherit;color:var(--accent);background:none;border:1px solid var(--line);border-radius:4px;padding:2px 10px;}}
main.shelf{{max-width:1000px;margin:0 auto;padding:20px;}}
.tabs a{{padding:6px 14px;text-decoration:none;border-bottom:2px solid transparent;}}
.tabs a.active{{border-color:var(--accent);color:var(--accent);}}
.search input{{box-sizing:border-box;width:100%;margin:14px 0;padding:8px;border:1px solid var(--line);background:var(--bg);color:var(--fg);}}
.categories{{display:flex;flex-wrap:wrap;gap:6px;margin-bottom:14px;}}
.chip,.category-badge{{padding:1px 9px;border-radius:10px;background:var(--chip);font-size:12px;text-decoration:none;}}
.chip.active{{background:var(--accent);color:var(--bg);}}
.articles-grid{{display:grid;grid-template-columns:repeat(auto-fill,minmax(240px,1fr));gap:14px;}}
.article-card{{display:block;padding:14px;border:1px solid var(--line);border-radius:6px;text-decoration:none;}}
.article-card h3{{margin:0 0 10px;font-size:16px;}}
.card-footer{{display:flex;flex-wrap:wrap;gap:6px;align-items:center;}}
.byline,.group-categories,.empty,.loading-message{{color:var(--muted);font-size:13px;margin:0;}}
.error-message,.form-message.error{{color:#c0392b;}}
.form-message.success{{color:#27ae60;}}
.add-article label{{display:block;margin-top:10px;}}
.add-article input{{box-sizing:border-box;width:100%;padding:6px;}}
.add-article button{{margin-top:14px;}}
</style>
</head>
<body class="{theme}">
<header class="topbar"><a class="brand" href="/">Shelf</a><a href="/add">Add article</a><form method="post" action="/theme"><input type="hidden" name="return_to" value="{here}"><button type="submit">{toggle}</button></form></header>
<main class="shelf">
{content}
</main>
</body>
</html>"#,
        theme = theme.as_str(),
        here = html_escape(here),
        toggle = match theme {
            Theme::Light => "Dark mode",
            Theme::Dark => "Light mode",
        },
    )
}

fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
