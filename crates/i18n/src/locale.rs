//! Supported UI locales and tag normalization.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A UI language supported by the message catalogs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Locale {
    #[serde(rename = "zh-CN")]
    ZhCn,
    #[serde(rename = "en-US")]
    EnUs,
}

/// Locale used when nothing better can be determined.
pub const DEFAULT_LOCALE: Locale = Locale::ZhCn;

/// Aliases accepted by [`normalize_locale`], lowercase.
const LOCALE_ALIASES: &[(&str, Locale)] = &[
    ("zh", Locale::ZhCn),
    ("zh-cn", Locale::ZhCn),
    ("zh-hans", Locale::ZhCn),
    ("zh-hant", Locale::ZhCn),
    ("en", Locale::EnUs),
    ("en-us", Locale::EnUs),
    ("en-gb", Locale::EnUs),
];

impl Locale {
    /// All supported locales, default first.
    pub const ALL: [Locale; 2] = [Locale::ZhCn, Locale::EnUs];

    /// BCP 47 tag sent on the wire (`locale=` and `Accept-Language`).
    pub fn as_str(self) -> &'static str {
        match self {
            Locale::ZhCn => "zh-CN",
            Locale::EnUs => "en-US",
        }
    }

    /// Human-readable name shown in a language switcher.
    pub fn label(self) -> &'static str {
        match self {
            Locale::ZhCn => "中文",
            Locale::EnUs => "English",
        }
    }
}

impl Default for Locale {
    fn default() -> Self {
        DEFAULT_LOCALE
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps an arbitrary language tag onto a supported locale.
///
/// Exact tags win, then the alias table, then the alias table keyed by the
/// primary language subtag. Anything else falls back to [`DEFAULT_LOCALE`].
pub fn normalize_locale(value: Option<&str>) -> Locale {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return DEFAULT_LOCALE;
    };

    let lowered = value.to_lowercase();
    if let Some(locale) = Locale::ALL
        .into_iter()
        .find(|l| l.as_str().to_lowercase() == lowered)
    {
        return locale;
    }

    let lookup = |tag: &str| {
        LOCALE_ALIASES
            .iter()
            .find(|(alias, _)| *alias == tag)
            .map(|(_, locale)| *locale)
    };

    if let Some(locale) = lookup(&lowered) {
        return locale;
    }

    // POSIX-style tags (`en_US.UTF-8`) reach here via the language part.
    let language = lowered
        .split(['-', '_', '.'])
        .next()
        .unwrap_or_default();
    lookup(language).unwrap_or(DEFAULT_LOCALE)
}

/// Picks the first language listed in an `Accept-Language` header.
///
/// Quality weights are ignored; order in the header is taken as preference.
pub fn locale_from_accept_language(header: &str) -> Locale {
    header
        .split(',')
        .filter_map(|segment| segment.split(';').next())
        .map(str::trim)
        .find(|language| !language.is_empty())
        .map(|language| normalize_locale(Some(language)))
        .unwrap_or(DEFAULT_LOCALE)
}
