//! Server-rendered page markup.
//!
//! Presentational composition only: every string comes from the content
//! bundles and every path from the route table. The document head is
//! delegated to [`DocumentHead`], which owns all metadata.

use crate::head::DocumentHead;
use crate::html::escape_html;
use crate::i18n::{routes, ContentLibrary, ContentRecord, Locale, RouteKey};

/// Render a full page for a settled, known route.
pub fn render_route(
    locale: Locale,
    route: RouteKey,
    content: &ContentLibrary,
    base_url: &str,
) -> String {
    let slug = routes::slug_for(locale, route);
    let head = DocumentHead::resolve(locale, slug, content, base_url);
    let main = match route {
        RouteKey::Contact => contact_main(locale, content),
        _ => article_main(locale, route, content),
    };
    layout(locale, slug, &head, &main, content)
}

/// Render the locale-prefixed not-found page. No alternate-language
/// annotations are emitted for it.
pub fn render_not_found(locale: Locale, content: &ContentLibrary, base_url: &str) -> String {
    let head = DocumentHead::resolve(locale, "this-slug-does-not-resolve", content, base_url);
    let main = format!(
        "<section class=\"not-found\">\n<h1>{}</h1>\n<p>{}</p>\n<p><a href=\"{}\">{}</a></p>\n</section>",
        escape_html(&content.text(locale, "common", "notFound.heading")),
        escape_html(&content.text(locale, "common", "notFound.body")),
        routes::locale_path(locale, RouteKey::Home),
        escape_html(&content.text(locale, "common", "notFound.backHome")),
    );
    layout(locale, "this-slug-does-not-resolve", &head, &main, content)
}

fn layout(
    locale: Locale,
    current_slug: &str,
    head: &DocumentHead,
    main: &str,
    content: &ContentLibrary,
) -> String {
    format!(
        "<!doctype html>\n<html lang=\"{lang}\">\n<head>\n<meta charset=\"utf-8\">\n<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n{head}</head>\n<body>\n{header}\n<main>\n{main}\n</main>\n{footer}\n</body>\n</html>\n",
        lang = locale.code(),
        head = head.render(),
        header = header(locale, current_slug, content),
        main = main,
        footer = footer(locale, content),
    )
}

fn header(locale: Locale, current_slug: &str, content: &ContentLibrary) -> String {
    let mut nav = String::new();
    for item in routes::nav_items(locale) {
        let label = content.text(locale, "common", item.key.nav_label_key());
        nav.push_str(&format!(
            "<a href=\"{}\">{}</a>\n",
            item.href,
            escape_html(&label)
        ));
    }

    // Language switcher: every locale links to the equivalent path of the
    // current route, degrading to the target locale's home for unknown slugs.
    let mut switcher = String::new();
    for target in Locale::all() {
        switcher.push_str(&format!(
            "<a href=\"{}\" lang=\"{}\" hreflang=\"{}\">{}</a>\n",
            routes::switch_locale_path(target, current_slug),
            target.code(),
            target.code(),
            escape_html(target.native_name()),
        ));
    }

    format!(
        "<header>\n<a class=\"brand\" href=\"{home}\">{brand}</a>\n<nav aria-label=\"{nav_label}\">\n{nav}</nav>\n<nav class=\"locale-switcher\" aria-label=\"{switch_label}\">\n{switcher}</nav>\n</header>",
        home = routes::locale_path(locale, RouteKey::Home),
        brand = escape_html(&content.text(locale, "common", "siteName")),
        nav_label = escape_html(&content.text(locale, "common", "nav.home")),
        nav = nav,
        switch_label = escape_html(&content.text(locale, "common", "switcher.label")),
        switcher = switcher,
    )
}

fn footer(locale: Locale, content: &ContentLibrary) -> String {
    format!(
        "<footer>\n<p>{}</p>\n<p>{}</p>\n</footer>",
        escape_html(&content.text(locale, "common", "footer.tagline")),
        escape_html(&content.text(locale, "common", "footer.rights")),
    )
}

/// Generic content page: hero plus the namespace's record list, if any.
fn article_main(locale: Locale, route: RouteKey, content: &ContentLibrary) -> String {
    let namespace = route.namespace();
    let mut main = format!(
        "<section class=\"hero\">\n<h1>{}</h1>\n<p>{}</p>\n</section>",
        escape_html(&content.text(locale, namespace, "hero.title")),
        escape_html(&content.text(locale, namespace, "hero.lead")),
    );

    let list_key = match route {
        RouteKey::Home => "highlights",
        RouteKey::Start => "steps",
        _ => "items",
    };
    let records = content.records(locale, namespace, list_key);
    if !records.is_empty() {
        if route == RouteKey::Home {
            main.push_str(&format!(
                "\n<h2>{}</h2>",
                escape_html(&content.text(locale, namespace, "highlightsTitle"))
            ));
        }
        main.push_str(&record_list(records));
    }

    // Home and start carry a call to action towards onboarding/contact.
    match route {
        RouteKey::Home => {
            main.push_str(&cta(
                &content.text(locale, namespace, "cta.title"),
                &content.text(locale, namespace, "cta.label"),
                &routes::locale_path(locale, RouteKey::Start),
            ));
        }
        RouteKey::Start => {
            main.push_str(&cta(
                &content.text(locale, namespace, "cta.title"),
                &content.text(locale, namespace, "cta.label"),
                &routes::locale_path(locale, RouteKey::Contact),
            ));
        }
        _ => {}
    }

    main
}

fn record_list(records: &[ContentRecord]) -> String {
    let mut out = String::from("\n<ul class=\"records\">");
    for record in records {
        out.push_str(&format!(
            "\n<li>\n<h3>{}</h3>\n<p>{}</p>\n</li>",
            escape_html(&record.title),
            escape_html(&record.description),
        ));
    }
    out.push_str("\n</ul>");
    out
}

fn cta(title: &str, label: &str, href: &str) -> String {
    format!(
        "\n<section class=\"cta\">\n<h2>{}</h2>\n<a class=\"button\" href=\"{}\">{}</a>\n</section>",
        escape_html(title),
        href,
        escape_html(label),
    )
}

/// Contact page: hero plus the submission form posting to the relay
/// endpoint. Field limits mirror the endpoint's validation.
fn contact_main(locale: Locale, content: &ContentLibrary) -> String {
    let t = |key: &str| escape_html(&content.text(locale, "contact", key));
    format!(
        "<section class=\"hero\">\n<h1>{title}</h1>\n<p>{lead}</p>\n</section>\n<form method=\"post\" action=\"/api/contact\" data-success=\"{success}\" data-error=\"{error}\">\n<label>{name}<input name=\"name\" required maxlength=\"100\"></label>\n<label>{email}<input name=\"email\" type=\"email\" required maxlength=\"254\"></label>\n<label>{phone}<input name=\"phone\" type=\"tel\" maxlength=\"30\"></label>\n<label>{organization}<input name=\"organization\" maxlength=\"100\"></label>\n<label>{message}<textarea name=\"message\" required maxlength=\"5000\"></textarea></label>\n<div class=\"g-recaptcha\"></div>\n<button type=\"submit\">{submit}</button>\n</form>",
        title = t("hero.title"),
        lead = t("hero.lead"),
        success = t("form.success"),
        error = t("form.error"),
        name = t("form.name"),
        email = t("form.email"),
        phone = t("form.phone"),
        organization = t("form.organization"),
        message = t("form.message"),
        submit = t("form.submit"),
    )
}
