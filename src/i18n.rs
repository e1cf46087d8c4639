// SPDX-License-Identifier: GPL-3.0-only

//! Provides localization support for this crate.
//!
//! Messages live in `i18n/<lang>/printqr.ftl` and are embedded into the binary
//! with `rust-embed`. English is the fallback language, so lookups always
//! resolve even when `init` was never called (as in unit tests).

use std::sync::LazyLock;

use i18n_embed::{
    DefaultLocalizer, LanguageLoader, Localizer,
    fluent::{FluentLanguageLoader, fluent_language_loader},
    unic_langid::LanguageIdentifier,
};
use rust_embed::RustEmbed;

/// Applies the requested language(s) to requested translations from the `fl!()` macro.
pub fn init(requested_languages: &[LanguageIdentifier]) {
    if let Err(why) = localizer().select(requested_languages) {
        tracing::error!("error while loading fluent localizations: {}", why);
    }
}

/// Get the `Localizer` to be used for localizing this library.
#[must_use]
pub fn localizer() -> Box<dyn Localizer> {
    Box::from(DefaultLocalizer::new(&*LANGUAGE_LOADER, &Localizations))
}

#[derive(RustEmbed)]
#[folder = "i18n/"]
struct Localizations;

/// Fluent loader shared by every `fl!()` lookup.
pub static LANGUAGE_LOADER: LazyLock<FluentLanguageLoader> = LazyLock::new(|| {
    let loader: FluentLanguageLoader = fluent_language_loader!();

    if let Err(why) = loader.load_fallback_language(&Localizations) {
        tracing::error!("error while loading fallback language: {}", why);
    }

    loader
});

/// Request a localized string by ID from the i18n/ directory.
#[macro_export]
macro_rules! fl {
    ($message_id:literal) => {{
        i18n_embed_fl::fl!($crate::i18n::LANGUAGE_LOADER, $message_id)
    }};

    ($message_id:literal, $($args:expr),*) => {{
        i18n_embed_fl::fl!($crate::i18n::LANGUAGE_LOADER, $message_id, $($args), *)
    }};
}

#[cfg(test)]
mod tests {
    /// Test: Fallback language resolves without calling init
    #[test]
    fn test_fallback_messages_resolve() {
        let message = fl!("too-long-url");
        assert!(
            message.contains("too long"),
            "English fallback should be loaded lazily, got: {}",
            message
        );
    }

    /// Test: Every message used by the crate exists in the fallback bundle
    #[test]
    fn test_known_message_ids_present() {
        for message in [
            fl!("install-message"),
            fl!("toggle-denied"),
            fl!("size-too-small"),
            fl!("color-too-light"),
            fl!("zoom-in"),
            fl!("zoom-out"),
        ] {
            assert!(!message.is_empty(), "Localized message should not be empty");
        }
    }
}
