//! Translated content bundles.
//!
//! Bundles are static JSON, one file per locale and page namespace,
//! embedded at compile time and parsed once at startup. Nested objects are
//! flattened to dotted key paths and every leaf is validated into a typed
//! value: a string, or an ordered list of {title, description} records.
//!
//! Lookup applies the documented fallback chain: active locale, then the
//! default locale, then the literal `namespace.key` path as a visible
//! placeholder. Resolution never fails.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use tracing::warn;

use crate::i18n::Locale;

/// Page namespaces, one bundle per locale each.
pub const NAMESPACES: &[&str] = &[
    "common",
    "home",
    "features",
    "solutions",
    "security",
    "start",
    "contact",
];

/// One record of an array-valued translation (a feature, a step, ...).
/// Stored order is display order and is preserved exactly.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ContentRecord {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// A resolved translation value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentValue {
    Text(String),
    Records(Vec<ContentRecord>),
}

type Bundle = HashMap<String, ContentValue>;

/// All loaded bundles, keyed by locale and namespace.
///
/// Constructed once at startup and passed by reference to whatever
/// composes pages and metadata; there is no global translation state.
pub struct ContentLibrary {
    bundles: HashMap<(&'static str, &'static str), Bundle>,
}

/// Embedded bundle sources. Missing files fail the build, so the set of
/// namespaces is complete per locale by construction.
const SOURCES: &[(&str, &str, &str)] = &[
    ("fi", "common", include_str!("../../locales/fi/common.json")),
    ("fi", "home", include_str!("../../locales/fi/home.json")),
    ("fi", "features", include_str!("../../locales/fi/features.json")),
    ("fi", "solutions", include_str!("../../locales/fi/solutions.json")),
    ("fi", "security", include_str!("../../locales/fi/security.json")),
    ("fi", "start", include_str!("../../locales/fi/start.json")),
    ("fi", "contact", include_str!("../../locales/fi/contact.json")),
    ("en", "common", include_str!("../../locales/en/common.json")),
    ("en", "home", include_str!("../../locales/en/home.json")),
    ("en", "features", include_str!("../../locales/en/features.json")),
    ("en", "solutions", include_str!("../../locales/en/solutions.json")),
    ("en", "security", include_str!("../../locales/en/security.json")),
    ("en", "start", include_str!("../../locales/en/start.json")),
    ("en", "contact", include_str!("../../locales/en/contact.json")),
];

impl ContentLibrary {
    /// Parse and validate every embedded bundle. A malformed bundle or a
    /// page namespace without meta.title/meta.description is a
    /// configuration error, fatal at startup.
    pub fn load() -> Result<ContentLibrary> {
        let mut bundles = HashMap::new();

        for (locale, namespace, source) in SOURCES {
            let root: serde_json::Value = serde_json::from_str(source)
                .with_context(|| format!("parsing bundle {}/{}", locale, namespace))?;
            let bundle = flatten_bundle(root)
                .with_context(|| format!("validating bundle {}/{}", locale, namespace))?;
            bundles.insert((*locale, *namespace), bundle);
        }

        let library = ContentLibrary { bundles };
        library.verify()?;
        Ok(library)
    }

    fn verify(&self) -> Result<()> {
        for locale in Locale::all() {
            for namespace in NAMESPACES {
                let bundle = self
                    .bundles
                    .get(&(locale.code(), *namespace))
                    .with_context(|| {
                        format!("locale '{}' is missing namespace '{}'", locale, namespace)
                    })?;

                // Every page namespace must carry document metadata.
                if *namespace != "common" {
                    for key in ["meta.title", "meta.description"] {
                        if !matches!(bundle.get(key), Some(ContentValue::Text(_))) {
                            bail!(
                                "bundle {}/{} is missing required key '{}'",
                                locale,
                                namespace,
                                key
                            );
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Raw lookup with locale fallback, scoped to a namespace.
    pub fn lookup<'a>(&'a self, locale: Locale, namespace: &'a str, key: &str) -> Option<&'a ContentValue> {
        if let Some(value) = self
            .bundles
            .get(&(locale.code(), namespace))
            .and_then(|bundle| bundle.get(key))
        {
            return Some(value);
        }
        if locale != Locale::DEFAULT {
            return self
                .bundles
                .get(&(Locale::DEFAULT.code(), namespace))
                .and_then(|bundle| bundle.get(key));
        }
        None
    }

    /// A translated string. Missing keys resolve to the literal key path
    /// so a dropped translation is loud on the page instead of a crash.
    pub fn text(&self, locale: Locale, namespace: &str, key: &str) -> String {
        match self.lookup(locale, namespace, key) {
            Some(ContentValue::Text(text)) => text.clone(),
            Some(ContentValue::Records(_)) => {
                warn!("translation {}.{} is a list, expected text", namespace, key);
                format!("{}.{}", namespace, key)
            }
            None => {
                warn!("missing translation {}.{} for locale {}", namespace, key, locale);
                format!("{}.{}", namespace, key)
            }
        }
    }

    /// An array-valued translation, in stored order. Missing keys resolve
    /// to an empty list.
    pub fn records<'a>(&'a self, locale: Locale, namespace: &'a str, key: &str) -> &'a [ContentRecord] {
        match self.lookup(locale, namespace, key) {
            Some(ContentValue::Records(records)) => records,
            Some(ContentValue::Text(_)) => {
                warn!("translation {}.{} is text, expected a list", namespace, key);
                &[]
            }
            None => {
                warn!("missing translation list {}.{} for locale {}", namespace, key, locale);
                &[]
            }
        }
    }
}

/// Flatten a bundle's JSON tree into dotted key paths with typed leaves.
fn flatten_bundle(root: serde_json::Value) -> Result<Bundle> {
    let serde_json::Value::Object(map) = root else {
        bail!("bundle root must be a JSON object");
    };

    let mut bundle = Bundle::new();
    for (key, value) in map {
        flatten_into(&mut bundle, key, value)?;
    }
    Ok(bundle)
}

fn flatten_into(bundle: &mut Bundle, path: String, value: serde_json::Value) -> Result<()> {
    match value {
        serde_json::Value::String(text) => {
            bundle.insert(path, ContentValue::Text(text));
            Ok(())
        }
        serde_json::Value::Array(items) => {
            let records: Vec<ContentRecord> =
                serde_json::from_value(serde_json::Value::Array(items))
                    .with_context(|| format!("key '{}' must be a list of records", path))?;
            bundle.insert(path, ContentValue::Records(records));
            Ok(())
        }
        serde_json::Value::Object(map) => {
            for (key, nested) in map {
                flatten_into(bundle, format!("{}.{}", path, key), nested)?;
            }
            Ok(())
        }
        other => bail!("key '{}' has unsupported value {}", path, other),
    }
}
