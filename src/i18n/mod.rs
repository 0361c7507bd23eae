//! Internationalization (i18n) module.
//!
//! Everything locale-related lives here: the closed set of supported
//! locales, the locale-specific route slugs, and the translated content
//! bundles the pages and document metadata are built from.
//!
//! # Architecture
//!
//! - `locale`: validated Locale type and the supported-locale table
//! - `routes`: route keys, per-locale slugs and path building
//! - `content`: translated string/record bundles with fallback lookup

mod content;
mod locale;
pub mod routes;

pub use content::{ContentLibrary, ContentRecord, ContentValue, NAMESPACES};
pub use locale::{Locale, LocaleConfig};
pub use routes::RouteKey;
