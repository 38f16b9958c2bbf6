//! Link preview meta rewriting
//!
//! Content pages share one app shell. When a request path matches a
//! configured page, the shell's title, description, canonical link, Open
//! Graph and Twitter tags are rewritten so crawlers see page-specific
//! previews. Tags missing from the shell are inserted before `</head>`.

use crate::config::{PageMeta, SiteConfig};
use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

static TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title>.*?</title>").expect("title pattern is valid"));

static CANONICAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<link\s+[^>]*rel=["']canonical["'][^>]*>"#)
        .expect("canonical pattern is valid")
});

static HEAD_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</head>").expect("head pattern is valid"));

/// Resolved values written into the shell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewMeta {
    pub title: String,
    pub description: String,
    pub url: String,
    pub image: Option<String>,
}

impl PreviewMeta {
    /// Combine a page's metadata with the site defaults
    pub fn for_page(page: &PageMeta, site: &SiteConfig) -> Self {
        let base = site.base_url.trim_end_matches('/');
        let slug = page.slug.trim_matches('/');
        let url = if slug.is_empty() {
            format!("{}/", base)
        } else {
            format!("{}/{}", base, slug)
        };

        Self {
            title: format!("{} | {}", page.title, site.name),
            description: page
                .description
                .clone()
                .or_else(|| site.description.clone())
                .unwrap_or_default(),
            url,
            image: page.image.clone().or_else(|| site.default_image.clone()),
        }
    }
}

fn meta_tag_pattern(attr: &str, key: &str) -> Option<Regex> {
    let pattern = format!(
        r#"(?i)<meta\s+[^>]*{}=["']{}["'][^>]*>"#,
        attr,
        regex::escape(key)
    );
    Regex::new(&pattern).ok()
}

fn attr(value: &str) -> Cow<'_, str> {
    html_escape::encode_double_quoted_attribute(value)
}

fn replace_or_insert(html: String, pattern: &Regex, tag: &str) -> String {
    if pattern.is_match(&html) {
        return pattern
            .replace(&html, regex::NoExpand(tag))
            .into_owned();
    }
    match HEAD_END.find(&html) {
        Some(m) => {
            let mut out = String::with_capacity(html.len() + tag.len() + 1);
            out.push_str(&html[..m.start()]);
            out.push_str(tag);
            out.push('\n');
            out.push_str(&html[m.start()..]);
            out
        }
        None => html,
    }
}

/// Rewrite the preview tags of `shell`
pub fn rewrite(shell: &str, meta: &PreviewMeta) -> String {
    let title = format!("<title>{}</title>", html_escape::encode_text(&meta.title));
    let mut html = replace_or_insert(shell.to_string(), &TITLE, &title);

    let mut named = vec![
        ("name", "description", meta.description.as_str()),
        ("property", "og:title", meta.title.as_str()),
        ("property", "og:description", meta.description.as_str()),
        ("property", "og:url", meta.url.as_str()),
        ("name", "twitter:title", meta.title.as_str()),
        ("name", "twitter:description", meta.description.as_str()),
        ("name", "twitter:url", meta.url.as_str()),
    ];
    if let Some(image) = &meta.image {
        named.push(("property", "og:image", image.as_str()));
        named.push(("name", "twitter:image", image.as_str()));
    }

    for (kind, key, value) in named {
        let tag = format!(r#"<meta {}="{}" content="{}">"#, kind, key, attr(value));
        match meta_tag_pattern(kind, key) {
            Some(pattern) => html = replace_or_insert(html, &pattern, &tag),
            None => tracing::warn!("Skipping {} tag: invalid pattern", key),
        }
    }

    let canonical = format!(r#"<link rel="canonical" href="{}">"#, attr(&meta.url));
    replace_or_insert(html, &CANONICAL, &canonical)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHELL: &str = r#"<!doctype html>
<html>
<head>
<title>Folio</title>
<meta name="description" content="Portfolio">
<meta property="og:title" content="Folio">
<link rel="canonical" href="https://example.com/">
</head>
<body><div id="root"></div></body>
</html>"#;

    fn site() -> SiteConfig {
        SiteConfig {
            name: "Jane".into(),
            base_url: "https://example.com/".into(),
            description: Some("Site description".into()),
            default_image: Some("https://example.com/og.png".into()),
        }
    }

    fn page() -> PageMeta {
        PageMeta {
            slug: "/work/atlas".into(),
            title: "Atlas & \"Maps\"".into(),
            description: Some("Charts <fast>".into()),
            image: None,
        }
    }

    #[test]
    fn test_preview_meta_uses_site_defaults() {
        let meta = PreviewMeta::for_page(&page(), &site());
        assert_eq!(meta.url, "https://example.com/work/atlas");
        assert_eq!(meta.image.as_deref(), Some("https://example.com/og.png"));
        assert_eq!(meta.title, "Atlas & \"Maps\" | Jane");
    }

    #[test]
    fn test_rewrites_existing_tags() {
        let meta = PreviewMeta::for_page(&page(), &site());
        let html = rewrite(SHELL, &meta);

        assert!(html.contains("<title>Atlas &amp; \"Maps\" | Jane</title>"));
        assert!(html.contains(
            r#"<meta name="description" content="Charts &lt;fast&gt;">"#
        ));
        assert!(html.contains(
            r#"<meta property="og:title" content="Atlas &amp; &quot;Maps&quot; | Jane">"#
        ));
        assert!(html.contains(r#"<link rel="canonical" href="https://example.com/work/atlas">"#));
        assert_eq!(html.matches("<title>").count(), 1);
        assert_eq!(html.matches("og:title").count(), 1);
    }

    #[test]
    fn test_inserts_missing_tags_before_head_end() {
        let meta = PreviewMeta::for_page(&page(), &site());
        let html = rewrite(SHELL, &meta);
        let head_end = html.find("</head>").unwrap();
        let image = html.find("twitter:image").unwrap();
        assert!(image < head_end);
        assert!(html.contains(r#"<meta property="og:url" content="https://example.com/work/atlas">"#));
    }

    #[test]
    fn test_shell_without_head_is_unchanged_except_existing_tags() {
        let meta = PreviewMeta::for_page(&page(), &site());
        let html = rewrite("<p>plain</p>", &meta);
        assert_eq!(html, "<p>plain</p>");
    }
}
