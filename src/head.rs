//! Document head resolution.
//!
//! One component owns everything that goes into the rendered `<head>`:
//! title, meta description, and the alternate-language annotation set
//! (hreflang entries, x-default, canonical). The set is recomputed from
//! scratch for every settled route, so nothing accumulates across
//! navigations, and an unknown slug produces no annotations at all.

use crate::html::escape_html;
use crate::i18n::{routes, ContentLibrary, Locale, RouteKey};

/// Per-route document title and description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageMeta {
    pub title: String,
    pub description: String,
}

/// One `<link>` annotation owned by the head.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadLink {
    pub rel: &'static str,
    /// Present on alternate links, absent on the canonical link.
    pub hreflang: Option<&'static str>,
    pub href: String,
}

/// The complete resolved head for one route in one locale.
#[derive(Debug, Clone)]
pub struct DocumentHead {
    pub locale: Locale,
    pub meta: PageMeta,
    pub links: Vec<HeadLink>,
}

impl DocumentHead {
    /// Resolve the head for the current slug.
    ///
    /// A known slug yields metadata from the route's content namespace and
    /// the full annotation set; an unknown slug yields the not-found
    /// metadata and an empty set (no broken alternate links).
    pub fn resolve(
        locale: Locale,
        slug: &str,
        content: &ContentLibrary,
        base_url: &str,
    ) -> DocumentHead {
        match routes::slug_to_route_key(slug) {
            Some(route) => DocumentHead {
                locale,
                meta: page_meta(locale, route, content),
                links: annotation_set(locale, route, base_url),
            },
            None => DocumentHead {
                locale,
                meta: PageMeta {
                    title: content.text(locale, "common", "notFound.title"),
                    description: content.text(locale, "common", "notFound.description"),
                },
                links: Vec::new(),
            },
        }
    }

    /// Render the owned head elements as HTML.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("<title>{}</title>\n", escape_html(&self.meta.title)));
        out.push_str(&format!(
            "<meta name=\"description\" content=\"{}\">\n",
            escape_html(&self.meta.description)
        ));
        for link in &self.links {
            match link.hreflang {
                Some(hreflang) => out.push_str(&format!(
                    "<link rel=\"{}\" hreflang=\"{}\" href=\"{}\">\n",
                    link.rel,
                    hreflang,
                    escape_html(&link.href)
                )),
                None => out.push_str(&format!(
                    "<link rel=\"{}\" href=\"{}\">\n",
                    link.rel,
                    escape_html(&link.href)
                )),
            }
        }
        out
    }
}

/// Title and description for a settled route, from the Content Resolver.
pub fn page_meta(locale: Locale, route: RouteKey, content: &ContentLibrary) -> PageMeta {
    let namespace = route.namespace();
    PageMeta {
        title: content.text(locale, namespace, "meta.title"),
        description: content.text(locale, namespace, "meta.description"),
    }
}

/// The alternate-language annotation set for a known route: one hreflang
/// entry per supported locale, one x-default pointing at the default
/// locale's path, and one canonical pointing at the current locale's path.
fn annotation_set(locale: Locale, route: RouteKey, base_url: &str) -> Vec<HeadLink> {
    let base = base_url.trim_end_matches('/');
    let mut links = Vec::with_capacity(Locale::all().count() + 2);

    for lang in Locale::all() {
        links.push(HeadLink {
            rel: "alternate",
            hreflang: Some(lang.code()),
            href: format!("{}{}", base, routes::locale_path(lang, route)),
        });
    }
    links.push(HeadLink {
        rel: "alternate",
        hreflang: Some("x-default"),
        href: format!("{}{}", base, routes::locale_path(Locale::DEFAULT, route)),
    });
    links.push(HeadLink {
        rel: "canonical",
        hreflang: None,
        href: format!("{}{}", base, routes::locale_path(locale, route)),
    });

    links
}
