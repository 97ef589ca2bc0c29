//! Locale resource bundles
//!
//! Translations live in embedded JSON files keyed by dotted paths. Bundles
//! are parsed once; lookup falls back requested language → primary subtag →
//! English → raw key, so a missing translation degrades to something
//! diagnosable instead of a crash.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde_json::Value;
use tracing::warn;

static BUNDLES: Lazy<HashMap<&'static str, Value>> = Lazy::new(|| {
    let sources = [
        ("en", include_str!("../locales/en.json")),
        ("de", include_str!("../locales/de.json")),
        ("es", include_str!("../locales/es.json")),
        ("fr", include_str!("../locales/fr.json")),
    ];

    let mut bundles = HashMap::new();
    for (lang, raw) in sources {
        match serde_json::from_str(raw) {
            Ok(value) => {
                bundles.insert(lang, value);
            }
            Err(err) => warn!(lang, %err, "failed to parse embedded locale bundle"),
        }
    }
    bundles
});

/// Resolve a dotted key such as `"item.moon_rise"` for a language tag.
pub fn translate(language: &str, key: &str) -> String {
    if let Some(text) = lookup(language, key) {
        return text;
    }

    // "de-AT" falls back to "de" before English
    if let Some(primary) = language.split(['-', '_']).next() {
        if primary != language {
            if let Some(text) = lookup(primary, key) {
                return text;
            }
        }
    }

    if let Some(text) = lookup("en", key) {
        return text;
    }

    warn!(language, key, "translation key missing in every bundle");
    key.to_string()
}

/// Walk the dotted path inside one bundle. Empty strings count as missing.
fn lookup(language: &str, key: &str) -> Option<String> {
    let mut node = BUNDLES.get(language)?;
    for part in key.split('.') {
        node = node.get(part)?;
    }
    node.as_str()
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}
