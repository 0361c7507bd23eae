//! Locale type: validated representation of a supported site language.
//!
//! The set of locales is closed. Every `Locale` value is guaranteed to be
//! one of the declared codes, so downstream code never has to re-validate.

/// Configuration for a supported locale.
#[derive(Debug, Clone)]
pub struct LocaleConfig {
    /// ISO 639-1 language code used in URLs and hreflang annotations
    pub code: &'static str,

    /// English name of the language
    pub name: &'static str,

    /// Native name, shown in the language switcher
    pub native_name: &'static str,

    /// Whether this is the default locale (exactly one must be true)
    pub is_default: bool,
}

/// Supported locales, in declared order. The order matters: slug lookup
/// and hreflang emission iterate this table front to back.
const SUPPORTED: &[LocaleConfig] = &[
    LocaleConfig {
        code: "fi",
        name: "Finnish",
        native_name: "Suomi",
        is_default: true,
    },
    LocaleConfig {
        code: "en",
        name: "English",
        native_name: "English",
        is_default: false,
    },
];

/// A validated locale.
///
/// Construction goes through [`Locale::from_code`] (or the constants), so a
/// value of this type always refers to an entry in the supported table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Locale {
    code: &'static str,
}

impl Locale {
    pub const FINNISH: Locale = Locale { code: "fi" };
    pub const ENGLISH: Locale = Locale { code: "en" };

    /// The default locale, used as the fallback everywhere.
    pub const DEFAULT: Locale = Locale::FINNISH;

    /// Create a Locale from a code string.
    ///
    /// The match is case-sensitive and exact: `"fi"` is supported, `"FI"`
    /// and `"fi-FI"` are not.
    pub fn from_code(code: &str) -> Option<Locale> {
        SUPPORTED
            .iter()
            .find(|config| config.code == code)
            .map(|config| Locale { code: config.code })
    }

    /// Check whether a code string is exactly one of the supported codes.
    pub fn is_supported(code: &str) -> bool {
        Locale::from_code(code).is_some()
    }

    /// All supported locales, in declared order.
    pub fn all() -> impl Iterator<Item = Locale> {
        SUPPORTED.iter().map(|config| Locale { code: config.code })
    }

    /// The language code (e.g. "fi").
    pub fn code(&self) -> &'static str {
        self.code
    }

    /// Full configuration entry for this locale.
    pub fn config(&self) -> &'static LocaleConfig {
        SUPPORTED
            .iter()
            .find(|config| config.code == self.code)
            .expect("Locale code is always present in the supported table")
    }

    /// Native name of the language (e.g. "Suomi").
    pub fn native_name(&self) -> &'static str {
        self.config().native_name
    }

    /// Resolve the active locale from a URL path.
    ///
    /// Takes the first path segment; if it is a supported code, that locale
    /// is returned, otherwise the default. Total: never fails.
    pub fn resolve_from_path(path: &str) -> Locale {
        let segment = path.trim_start_matches('/').split('/').next().unwrap_or("");
        Locale::from_code(segment).unwrap_or(Locale::DEFAULT)
    }

    /// Decide the initial locale at the root-redirect boundary.
    ///
    /// Precedence: a stored, still-supported preference, then the client's
    /// reported languages, then the default. Only called for requests with
    /// no locale segment, never mid-session.
    pub fn detect_initial(stored: Option<&str>, accept_language: Option<&str>) -> Locale {
        if let Some(locale) = stored.and_then(Locale::from_code) {
            return locale;
        }
        if let Some(locale) = accept_language.and_then(parse_accept_language) {
            return locale;
        }
        Locale::DEFAULT
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code)
    }
}

/// Pick the best supported locale from an Accept-Language header value.
///
/// Entries are ordered by q-value; a full-tag match wins, then the primary
/// subtag (en-US -> en). Returns None when nothing matches.
fn parse_accept_language(header: &str) -> Option<Locale> {
    if header.is_empty() {
        return None;
    }

    let mut entries: Vec<(&str, f64)> = Vec::new();
    for part in header.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let mut segments = part.split(';');
        let lang = segments.next().unwrap_or("").trim();
        let mut q = 1.0_f64;
        for segment in segments {
            if let Some(value) = segment.trim().strip_prefix("q=") {
                if let Ok(parsed) = value.parse::<f64>() {
                    q = parsed;
                }
            }
        }
        entries.push((lang, q));
    }

    entries.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    for (lang, _) in &entries {
        if let Some(locale) = Locale::from_code(lang) {
            return Some(locale);
        }
        let primary = lang.split('-').next().unwrap_or("");
        if let Some(locale) = Locale::from_code(primary) {
            return Some(locale);
        }
    }

    None
}
