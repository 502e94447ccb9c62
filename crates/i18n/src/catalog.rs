//! Embedded message catalogs and the [`Translate`] seam.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde_json::Value;
use tracing::trace;

use crate::locale::{DEFAULT_LOCALE, Locale};

const ZH_CN_MESSAGES: &str = include_str!("../messages/zh-CN.json");
const EN_US_MESSAGES: &str = include_str!("../messages/en-US.json");

/// `{{ name }}` placeholders inside catalog strings.
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([\w.-]+)\s*\}\}").expect("Invalid placeholder regex")
});

/// Errors raised while loading message catalogs.
#[derive(Debug, thiserror::Error)]
pub enum I18nError {
    #[error("invalid message catalog for {locale}: {source}")]
    Catalog {
        locale: Locale,
        #[source]
        source: serde_json::Error,
    },
}

/// Resolves a dotted message key to display text.
///
/// Implementations fall back to the default locale and finally to the key
/// itself, so a lookup never fails.
pub trait Translate {
    fn translate(&self, key: &str, values: &[(&str, String)]) -> String;
}

/// Catalog-backed translator for the active locale.
#[derive(Debug, Clone)]
pub struct Translator {
    locale: Locale,
    catalogs: HashMap<Locale, Value>,
}

impl Translator {
    /// Loads the embedded catalogs and activates `locale`.
    pub fn new(locale: Locale) -> Result<Self, I18nError> {
        let mut catalogs = HashMap::new();
        for (catalog_locale, raw) in [
            (Locale::ZhCn, ZH_CN_MESSAGES),
            (Locale::EnUs, EN_US_MESSAGES),
        ] {
            let parsed = serde_json::from_str(raw).map_err(|source| I18nError::Catalog {
                locale: catalog_locale,
                source,
            })?;
            catalogs.insert(catalog_locale, parsed);
        }

        Ok(Self { locale, catalogs })
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn set_locale(&mut self, locale: Locale) {
        self.locale = locale;
    }

    fn lookup(&self, locale: Locale, key: &str) -> Option<&str> {
        let mut current = self.catalogs.get(&locale)?;
        for segment in key.split('.') {
            current = current.get(segment)?;
        }
        current.as_str()
    }
}

impl Translate for Translator {
    fn translate(&self, key: &str, values: &[(&str, String)]) -> String {
        let message = self
            .lookup(self.locale, key)
            .or_else(|| self.lookup(DEFAULT_LOCALE, key));

        let Some(message) = message else {
            trace!(key, locale = %self.locale, "missing translation, using key");
            return key.to_string();
        };

        format_message(message, values)
    }
}

/// Substitutes `{{ name }}` placeholders. Unknown names are left as `{{name}}`.
fn format_message(message: &str, values: &[(&str, String)]) -> String {
    if values.is_empty() {
        return message.to_string();
    }

    PLACEHOLDER
        .replace_all(message, |caps: &Captures<'_>| {
            let token = &caps[1];
            values
                .iter()
                .find(|(name, _)| *name == token)
                .map(|(_, value)| value.clone())
                .unwrap_or_else(|| format!("{{{{{token}}}}}"))
        })
        .into_owned()
}
