//! Route keys and per-locale URL slugs.
//!
//! Every logical page has one abstract [`RouteKey`] and one slug per
//! locale. The slug tables are static configuration; [`verify`] checks
//! their invariants once at startup so lookups can stay total.

use anyhow::{bail, Result};
use std::collections::HashMap;

use crate::i18n::Locale;

/// Abstract, locale-independent identifier for a logical page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteKey {
    Home,
    Features,
    Solutions,
    Security,
    Start,
    Contact,
}

impl RouteKey {
    /// All route keys, in navigation order.
    pub const ALL: [RouteKey; 6] = [
        RouteKey::Home,
        RouteKey::Features,
        RouteKey::Solutions,
        RouteKey::Security,
        RouteKey::Start,
        RouteKey::Contact,
    ];

    /// Content namespace backing this route's page.
    pub fn namespace(&self) -> &'static str {
        match self {
            RouteKey::Home => "home",
            RouteKey::Features => "features",
            RouteKey::Solutions => "solutions",
            RouteKey::Security => "security",
            RouteKey::Start => "start",
            RouteKey::Contact => "contact",
        }
    }

    /// Key of this route's label under the `common` namespace.
    pub fn nav_label_key(&self) -> &'static str {
        match self {
            RouteKey::Home => "nav.home",
            RouteKey::Features => "nav.features",
            RouteKey::Solutions => "nav.solutions",
            RouteKey::Security => "nav.security",
            RouteKey::Start => "nav.start",
            RouteKey::Contact => "nav.contact",
        }
    }
}

/// Finnish slugs. Home is the empty slug (locale root) in every locale.
const FI_SLUGS: [(RouteKey, &str); 6] = [
    (RouteKey::Home, ""),
    (RouteKey::Features, "ominaisuudet"),
    (RouteKey::Solutions, "ratkaisut"),
    (RouteKey::Security, "turvallisuus-ja-saavutettavuus"),
    (RouteKey::Start, "aloita"),
    (RouteKey::Contact, "yhteystiedot"),
];

/// English slugs.
const EN_SLUGS: [(RouteKey, &str); 6] = [
    (RouteKey::Home, ""),
    (RouteKey::Features, "features"),
    (RouteKey::Solutions, "solutions"),
    (RouteKey::Security, "security-and-accessibility"),
    (RouteKey::Start, "get-started"),
    (RouteKey::Contact, "contact"),
];

fn slug_table(locale: Locale) -> &'static [(RouteKey, &'static str); 6] {
    match locale.code() {
        "en" => &EN_SLUGS,
        _ => &FI_SLUGS,
    }
}

/// The slug for a route in a locale. Total: every route has a slug in
/// every locale, enforced by [`verify`] at startup.
pub fn slug_for(locale: Locale, route: RouteKey) -> &'static str {
    slug_table(locale)
        .iter()
        .find(|entry| entry.0 == route)
        .map(|entry| entry.1)
        .expect("every RouteKey has a slug in every locale")
}

/// Build a locale-prefixed path: `locale_path(fi, Features)` -> `/fi/ominaisuudet`.
/// The home route maps to the locale root `/fi`.
pub fn locale_path(locale: Locale, route: RouteKey) -> String {
    let slug = slug_for(locale, route);
    if slug.is_empty() {
        format!("/{}", locale.code())
    } else {
        format!("/{}/{}", locale.code(), slug)
    }
}

/// Map a slug in any locale back to its RouteKey.
///
/// Locales are scanned in declared order and the first match wins; the
/// startup check in [`verify`] guarantees this is unambiguous. The empty
/// slug is the home route. Unknown slugs return None, which callers treat
/// as "unknown route", not a fault.
pub fn slug_to_route_key(slug: &str) -> Option<RouteKey> {
    for locale in Locale::all() {
        for entry in slug_table(locale) {
            if entry.1 == slug {
                return Some(entry.0);
            }
        }
    }
    None
}

/// The equivalent path for a different locale, given the current slug.
///
/// An unrecognized slug degrades to the target locale's root instead of
/// erroring, so a stale link under one locale lands on the other locale's
/// home page.
pub fn switch_locale_path(target: Locale, current_slug: &str) -> String {
    match slug_to_route_key(current_slug) {
        Some(route) => locale_path(target, route),
        None => format!("/{}", target.code()),
    }
}

/// A header navigation entry: the route plus its ready-built href.
#[derive(Debug, Clone)]
pub struct NavItem {
    pub key: RouteKey,
    pub href: String,
}

/// Navigation items for a locale, in display order. Labels come from the
/// `common` content namespace via [`RouteKey::nav_label_key`].
pub fn nav_items(locale: Locale) -> Vec<NavItem> {
    RouteKey::ALL
        .iter()
        .map(|&key| NavItem {
            key,
            href: locale_path(locale, key),
        })
        .collect()
}

/// Validate the slug tables. Called once at startup; a violation is a
/// configuration error and fatal.
pub fn verify() -> Result<()> {
    let tables: Vec<(Locale, &[(RouteKey, &'static str)])> = Locale::all()
        .map(|locale| (locale, &slug_table(locale)[..]))
        .collect();
    check_tables(&tables)
}

/// The actual invariants, over arbitrary tables so violations are testable:
/// - every route has exactly one slug per locale, and home's is empty
/// - within a locale, slug -> route is a bijection
/// - across locales, no slug string is claimed by two different routes
///   (otherwise [`slug_to_route_key`]'s first-match scan would silently
///   pick the first-declared locale's mapping)
fn check_tables(tables: &[(Locale, &[(RouteKey, &'static str)])]) -> Result<()> {
    let mut claims: HashMap<&str, RouteKey> = HashMap::new();

    for (locale, table) in tables {
        for route in RouteKey::ALL {
            let slugs: Vec<&str> = table
                .iter()
                .filter(|entry| entry.0 == route)
                .map(|entry| entry.1)
                .collect();
            if slugs.len() != 1 {
                bail!(
                    "locale '{}' must define exactly one slug for {:?}, found {}",
                    locale,
                    route,
                    slugs.len()
                );
            }
            if route == RouteKey::Home && !slugs[0].is_empty() {
                bail!(
                    "home slug for locale '{}' must be empty, got '{}'",
                    locale,
                    slugs[0]
                );
            }
        }

        let mut seen: HashMap<&str, RouteKey> = HashMap::new();
        for entry in *table {
            if let Some(previous) = seen.insert(entry.1, entry.0) {
                bail!(
                    "locale '{}' maps slug '{}' to both {:?} and {:?}",
                    locale,
                    entry.1,
                    previous,
                    entry.0
                );
            }
        }

        for entry in *table {
            match claims.get(entry.1) {
                Some(claimed) if *claimed != entry.0 => {
                    bail!(
                        "slug '{}' is claimed by {:?} and {:?} in different locales",
                        entry.1,
                        claimed,
                        entry.0
                    );
                }
                _ => {
                    claims.insert(entry.1, entry.0);
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Path Building Tests ====================

    #[test]
    fn test_locale_path_home_is_locale_root() {
        for locale in Locale::all() {
            assert_eq!(
                locale_path(locale, RouteKey::Home),
                format!("/{}", locale.code())
            );
        }
    }

    #[test]
    fn test_locale_path_finnish_slugs() {
        assert_eq!(locale_path(Locale::FINNISH, RouteKey::Features), "/fi/ominaisuudet");
        assert_eq!(locale_path(Locale::FINNISH, RouteKey::Solutions), "/fi/ratkaisut");
        assert_eq!(
            locale_path(Locale::FINNISH, RouteKey::Security),
            "/fi/turvallisuus-ja-saavutettavuus"
        );
        assert_eq!(locale_path(Locale::FINNISH, RouteKey::Start), "/fi/aloita");
        assert_eq!(locale_path(Locale::FINNISH, RouteKey::Contact), "/fi/yhteystiedot");
    }

    #[test]
    fn test_locale_path_english_slugs() {
        assert_eq!(locale_path(Locale::ENGLISH, RouteKey::Features), "/en/features");
        assert_eq!(locale_path(Locale::ENGLISH, RouteKey::Solutions), "/en/solutions");
        assert_eq!(
            locale_path(Locale::ENGLISH, RouteKey::Security),
            "/en/security-and-accessibility"
        );
        assert_eq!(locale_path(Locale::ENGLISH, RouteKey::Start), "/en/get-started");
        assert_eq!(locale_path(Locale::ENGLISH, RouteKey::Contact), "/en/contact");
    }

    // ==================== Slug Resolution Tests ====================

    #[test]
    fn test_slug_to_route_key_finnish() {
        assert_eq!(slug_to_route_key("ominaisuudet"), Some(RouteKey::Features));
        assert_eq!(slug_to_route_key("ratkaisut"), Some(RouteKey::Solutions));
        assert_eq!(slug_to_route_key("yhteystiedot"), Some(RouteKey::Contact));
    }

    #[test]
    fn test_slug_to_route_key_english() {
        assert_eq!(slug_to_route_key("features"), Some(RouteKey::Features));
        assert_eq!(slug_to_route_key("solutions"), Some(RouteKey::Solutions));
        assert_eq!(slug_to_route_key("contact"), Some(RouteKey::Contact));
    }

    #[test]
    fn test_empty_slug_is_home() {
        assert_eq!(slug_to_route_key(""), Some(RouteKey::Home));
    }

    #[test]
    fn test_unknown_slug_is_none() {
        assert_eq!(slug_to_route_key("unknown-page"), None);
        assert_eq!(slug_to_route_key("Ominaisuudet"), None);
    }

    #[test]
    fn test_round_trip_for_all_locales_and_routes() {
        for locale in Locale::all() {
            for key in RouteKey::ALL {
                assert_eq!(
                    slug_to_route_key(slug_for(locale, key)),
                    Some(key),
                    "round trip failed for {:?} in {}",
                    key,
                    locale
                );
            }
        }
    }

    // ==================== Locale Switch Tests ====================

    #[test]
    fn test_switch_locale_path_between_locales() {
        assert_eq!(switch_locale_path(Locale::ENGLISH, "ominaisuudet"), "/en/features");
        assert_eq!(switch_locale_path(Locale::ENGLISH, "ratkaisut"), "/en/solutions");
        assert_eq!(switch_locale_path(Locale::FINNISH, "features"), "/fi/ominaisuudet");
        assert_eq!(switch_locale_path(Locale::FINNISH, "solutions"), "/fi/ratkaisut");
    }

    #[test]
    fn test_switch_locale_path_all_pairs() {
        for source in Locale::all() {
            for target in Locale::all() {
                for key in RouteKey::ALL {
                    assert_eq!(
                        switch_locale_path(target, slug_for(source, key)),
                        locale_path(target, key)
                    );
                }
            }
        }
    }

    #[test]
    fn test_switch_locale_path_unknown_slug_goes_home() {
        assert_eq!(switch_locale_path(Locale::ENGLISH, "garbage-slug"), "/en");
        assert_eq!(switch_locale_path(Locale::FINNISH, "garbage-slug"), "/fi");
    }

    // ==================== Navigation Tests ====================

    #[test]
    fn test_nav_items_cover_all_routes() {
        let items = nav_items(Locale::FINNISH);
        assert_eq!(items.len(), RouteKey::ALL.len());
        assert_eq!(items[0].key, RouteKey::Home);
        assert_eq!(items[0].href, "/fi");
        assert_eq!(items[1].href, "/fi/ominaisuudet");
    }

    // ==================== Table Invariant Tests ====================

    #[test]
    fn test_verify_passes_for_declared_tables() {
        verify().expect("declared slug tables must satisfy the invariants");
    }

    #[test]
    fn test_check_tables_rejects_cross_locale_conflict() {
        // "ominaisuudet" claimed by Features in fi and Solutions in the
        // crafted second table: resolution would depend on scan order.
        let crafted: [(RouteKey, &str); 6] = [
            (RouteKey::Home, ""),
            (RouteKey::Features, "features"),
            (RouteKey::Solutions, "ominaisuudet"),
            (RouteKey::Security, "security-and-accessibility"),
            (RouteKey::Start, "get-started"),
            (RouteKey::Contact, "contact"),
        ];
        let tables: Vec<(Locale, &[(RouteKey, &str)])> =
            vec![(Locale::FINNISH, &FI_SLUGS[..]), (Locale::ENGLISH, &crafted[..])];
        let error = check_tables(&tables).unwrap_err().to_string();
        assert!(error.contains("ominaisuudet"), "unexpected error: {}", error);
    }

    #[test]
    fn test_check_tables_rejects_duplicate_within_locale() {
        let crafted: [(RouteKey, &str); 6] = [
            (RouteKey::Home, ""),
            (RouteKey::Features, "features"),
            (RouteKey::Solutions, "features"),
            (RouteKey::Security, "security-and-accessibility"),
            (RouteKey::Start, "get-started"),
            (RouteKey::Contact, "contact"),
        ];
        let tables: Vec<(Locale, &[(RouteKey, &str)])> = vec![(Locale::ENGLISH, &crafted[..])];
        assert!(check_tables(&tables).is_err());
    }

    #[test]
    fn test_check_tables_rejects_non_empty_home_slug() {
        let crafted: [(RouteKey, &str); 6] = [
            (RouteKey::Home, "etusivu"),
            (RouteKey::Features, "ominaisuudet"),
            (RouteKey::Solutions, "ratkaisut"),
            (RouteKey::Security, "turvallisuus-ja-saavutettavuus"),
            (RouteKey::Start, "aloita"),
            (RouteKey::Contact, "yhteystiedot"),
        ];
        let tables: Vec<(Locale, &[(RouteKey, &str)])> = vec![(Locale::FINNISH, &crafted[..])];
        let error = check_tables(&tables).unwrap_err().to_string();
        assert!(error.contains("home slug"), "unexpected error: {}", error);
    }

    #[test]
    fn test_check_tables_rejects_missing_route() {
        // Five entries: Contact has no slug at all.
        let crafted: [(RouteKey, &str); 5] = [
            (RouteKey::Home, ""),
            (RouteKey::Features, "features"),
            (RouteKey::Solutions, "solutions"),
            (RouteKey::Security, "security-and-accessibility"),
            (RouteKey::Start, "get-started"),
        ];
        let tables: Vec<(Locale, &[(RouteKey, &str)])> = vec![(Locale::ENGLISH, &crafted[..])];
        assert!(check_tables(&tables).is_err());
    }

    #[test]
    fn test_no_slug_shared_across_routes() {
        // The guarantee behind slug_to_route_key's first-match scan: a slug
        // string maps to the same route everywhere it appears.
        let mut claims: HashMap<&str, RouteKey> = HashMap::new();
        for locale in Locale::all() {
            for key in RouteKey::ALL {
                let slug = slug_for(locale, key);
                if let Some(claimed) = claims.insert(slug, key) {
                    assert_eq!(claimed, key, "slug '{}' is ambiguous", slug);
                }
            }
        }
    }
}
