//! Locales and message catalogs.
//!
//! The upload core never renders user-facing text itself; it produces a
//! translation key plus named values and hands them to a [`Translate`]
//! implementation. [`Translator`] is the stock implementation backed by the
//! embedded `zh-CN` and `en-US` catalogs.

pub mod catalog;
pub mod locale;

pub use catalog::{I18nError, Translate, Translator};
pub use locale::{DEFAULT_LOCALE, Locale, locale_from_accept_language, normalize_locale};
