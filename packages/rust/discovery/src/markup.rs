//! Logo candidate scanning over a parsed HTML document.
//!
//! Three sources are read, in this order:
//! - `<meta property|name="og:image" content="...">` and related image hints
//! - `<link rel="...icon..." href="...">`
//! - `<img src="...">` that looks like a brand logo and not like partner,
//!   advertising, social, or hero imagery (exclusion always wins)

use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use url::Url;

/// Meta `property`/`name` values that carry a representative image.
const IMAGE_META_KEYS: &[&str] = &[
    "og:image",
    "og:image:url",
    "og:image:secure_url",
    "og:logo",
    "twitter:image",
    "twitter:image:src",
];

static META_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("meta[content]").expect("meta selector"));
static LINK_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("link[rel][href]").expect("link selector"));
static IMG_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("img[src]").expect("img selector"));

// ---------------------------------------------------------------------------
// ImageRules
// ---------------------------------------------------------------------------

/// Keyword lists deciding whether an `<img>` is a logo candidate.
///
/// All matching is case-insensitive substring matching. The lists are
/// heuristics and can be extended from config.
#[derive(Debug, Clone)]
pub struct ImageRules {
    /// Matched against the element's `alt`, `class`, and `id`.
    pub logo_keywords: Vec<String>,
    /// Matched against the `src` path.
    pub logo_paths: Vec<String>,
    /// Matched against `alt`/`class`/`id` and the `src` path.
    pub exclude_keywords: Vec<String>,
    /// Hosts (and their subdomains) whose images are never logos.
    pub exclude_domains: Vec<String>,
    /// Path fragments whose images are never logos.
    pub exclude_paths: Vec<String>,
}

impl Default for ImageRules {
    fn default() -> Self {
        Self {
            logo_keywords: owned(&["logo", "brand", "wordmark", "emblem", "site-title"]),
            logo_paths: owned(&[
                "/logo", "logo.", "-logo", "_logo", "/brand/", "/branding/",
            ]),
            exclude_keywords: owned(&[
                "partner",
                "sponsor",
                "client",
                "customer",
                "award",
                "badge",
                "certif",
                "payment",
                "visa",
                "mastercard",
                "paypal",
                "advert",
                "promo",
                "campaign",
                "banner",
                "hero",
                "cover",
                "testimonial",
                "avatar",
                "facebook",
                "twitter",
                "instagram",
                "linkedin",
                "youtube",
                "tiktok",
                "pinterest",
                "social",
                "share",
            ]),
            exclude_domains: owned(&[
                "doubleclick.net",
                "googlesyndication.com",
                "googleadservices.com",
                "facebook.com",
                "fbcdn.net",
                "twimg.com",
                "licdn.com",
                "gravatar.com",
            ]),
            exclude_paths: owned(&[
                "/ads/",
                "/partners/",
                "/clients/",
                "/customers/",
                "/sponsors/",
                "/social/",
                "/hero/",
                "/banners/",
                "/testimonials/",
            ]),
        }
    }
}

impl ImageRules {
    /// Append extra keywords to the built-in lists.
    pub fn extended(mut self, logo_keywords: &[String], exclude_keywords: &[String]) -> Self {
        self.logo_keywords
            .extend(logo_keywords.iter().map(|k| k.to_lowercase()));
        self.exclude_keywords
            .extend(exclude_keywords.iter().map(|k| k.to_lowercase()));
        self
    }

    fn looks_like_logo(&self, attrs: &str, src_path: &str) -> bool {
        contains_any(attrs, &self.logo_keywords) || contains_any(src_path, &self.logo_paths)
    }

    fn looks_excluded(&self, attrs: &str, src: &Url) -> bool {
        let path = src.path().to_lowercase();
        if contains_any(attrs, &self.exclude_keywords)
            || contains_any(&path, &self.exclude_keywords)
            || contains_any(&path, &self.exclude_paths)
        {
            return true;
        }

        src.host_str().is_some_and(|host| {
            let host = host.to_lowercase();
            self.exclude_domains
                .iter()
                .any(|d| host == *d || host.ends_with(&format!(".{d}")))
        })
    }
}

// ---------------------------------------------------------------------------
// Scanning
// ---------------------------------------------------------------------------

/// Collect candidate logo URLs from `html`, resolved against `base`.
///
/// The result may contain duplicates; the extractor dedupes the full list.
pub(crate) fn scan_markup(html: &str, base: &Url, rules: &ImageRules) -> Vec<String> {
    let doc = Html::parse_document(html);

    let mut candidates = meta_images(&doc, base);
    candidates.extend(link_icons(&doc, base));
    candidates.extend(logo_images(&doc, base, rules));
    candidates
}

fn meta_images(doc: &Html, base: &Url) -> Vec<String> {
    let metas: Vec<ElementRef<'_>> = doc.select(&META_SEL).collect();
    let mut out = Vec::new();

    for key in IMAGE_META_KEYS {
        for el in &metas {
            let value = el.value();
            let matches = ["property", "name"].iter().any(|attr| {
                value
                    .attr(attr)
                    .is_some_and(|v| v.trim().eq_ignore_ascii_case(key))
            });
            if !matches {
                continue;
            }
            if let Some(url) = value.attr("content").and_then(|c| resolve(base, c)) {
                out.push(url);
            }
        }
    }

    out
}

fn link_icons(doc: &Html, base: &Url) -> Vec<String> {
    doc.select(&LINK_SEL)
        .filter(|el| {
            el.value()
                .attr("rel")
                .is_some_and(|rel| rel.to_lowercase().contains("icon"))
        })
        .filter_map(|el| el.value().attr("href").and_then(|h| resolve(base, h)))
        .collect()
}

fn logo_images(doc: &Html, base: &Url, rules: &ImageRules) -> Vec<String> {
    let mut out = Vec::new();

    for el in doc.select(&IMG_SEL) {
        let value = el.value();
        let Some(src) = value.attr("src").and_then(|s| resolve_url(base, s)) else {
            continue;
        };

        let attrs = ["alt", "class", "id"]
            .iter()
            .filter_map(|a| value.attr(a))
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();
        let src_path = src.path().to_lowercase();

        if rules.looks_excluded(&attrs, &src) {
            continue;
        }
        if rules.looks_like_logo(&attrs, &src_path) {
            out.push(src.to_string());
        }
    }

    out
}

/// Resolve `href` against `base`, keeping only http(s) results.
fn resolve_url(base: &Url, href: &str) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() || href.starts_with("data:") || href.starts_with("javascript:") {
        return None;
    }

    let mut url = base.join(href).ok()?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return None;
    }
    url.set_fragment(None);
    Some(url)
}

fn resolve(base: &Url, href: &str) -> Option<String> {
    resolve_url(base, href).map(|u| u.to_string())
}

fn contains_any(haystack: &str, needles: &[String]) -> bool {
    needles.iter().any(|n| !n.is_empty() && haystack.contains(n.as_str()))
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}
