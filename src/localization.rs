use fluent_bundle::concurrent::FluentBundle;
use fluent_bundle::{FluentArgs, FluentResource, FluentValue};
use std::collections::HashMap;
use tracing::warn;
use unic_langid::LanguageIdentifier;

/// Language used when a key or a whole locale is missing
pub const FALLBACK_LANGUAGE: &str = "en";

const RESOURCES: &[(&str, &str)] = &[
    ("en", include_str!("../locales/en/main.ftl")),
    ("ru", include_str!("../locales/ru/main.ftl")),
];

/// Localization manager for the relay bot
///
/// All bot texts, including the reply keyboard labels, come from here so
/// that the labels the dispatcher compares against are the ones users see.
pub struct LocalizationManager {
    bundles: HashMap<&'static str, FluentBundle<FluentResource>>,
}

impl LocalizationManager {
    /// Create a manager with every embedded locale loaded
    pub fn new() -> Self {
        let bundles = RESOURCES
            .iter()
            .map(|(lang, source)| (*lang, Self::create_bundle(lang, source)))
            .collect();

        Self { bundles }
    }

    /// Create a fluent bundle for a specific locale
    fn create_bundle(lang: &str, source: &str) -> FluentBundle<FluentResource> {
        let locale: LanguageIdentifier = lang.parse().unwrap_or_default();
        let mut bundle = FluentBundle::new_concurrent(vec![locale]);
        // Keep placeables bare so tokens like `/reply_111` stay clickable.
        bundle.set_use_isolating(false);

        let resource = match FluentResource::try_new(source.to_string()) {
            Ok(resource) => resource,
            Err((resource, errors)) => {
                warn!(language = lang, errors = ?errors, "Locale resource parsed with errors");
                resource
            }
        };
        if let Err(errors) = bundle.add_resource(resource) {
            warn!(language = lang, errors = ?errors, "Failed to add locale resource");
        }

        bundle
    }

    pub fn supports(&self, lang: &str) -> bool {
        self.bundles.contains_key(lang)
    }

    /// Get a message in the given language, falling back to English
    pub fn get_message_in_language(
        &self,
        key: &str,
        lang: &str,
        args: Option<&HashMap<&str, &str>>,
    ) -> String {
        let bundle = match self
            .bundles
            .get(lang)
            .filter(|bundle| bundle.has_message(key))
            .or_else(|| self.bundles.get(FALLBACK_LANGUAGE))
        {
            Some(bundle) => bundle,
            None => return format!("Missing translation: {}", key),
        };

        let msg = match bundle.get_message(key) {
            Some(msg) => msg,
            None => return format!("Missing translation: {}", key),
        };

        let pattern = match msg.value() {
            Some(pattern) => pattern,
            None => return format!("Missing value for key: {}", key),
        };

        let fluent_args = args.map(|args| {
            let mut fluent_args = FluentArgs::new();
            for (k, v) in args {
                fluent_args.set(*k, FluentValue::from(*v));
            }
            fluent_args
        });

        let mut errors = vec![];
        let value = bundle.format_pattern(pattern, fluent_args.as_ref(), &mut errors);
        if !errors.is_empty() {
            warn!(key, language = lang, errors = ?errors, "Message formatted with errors");
        }

        value.into_owned()
    }
}

impl Default for LocalizationManager {
    fn default() -> Self {
        Self::new()
    }
}

/// A [`LocalizationManager`] bound to the bot's configured language
pub struct Localizer {
    manager: LocalizationManager,
    language: String,
}

impl Localizer {
    /// Unknown languages fall back to English.
    pub fn new(language: &str) -> Self {
        let manager = LocalizationManager::new();
        let language = if manager.supports(language) {
            language.to_string()
        } else {
            warn!(language, fallback = FALLBACK_LANGUAGE, "Unsupported bot language");
            FALLBACK_LANGUAGE.to_string()
        };

        Self { manager, language }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Convenience function to get a localized message
    pub fn t(&self, key: &str) -> String {
        self.manager.get_message_in_language(key, &self.language, None)
    }

    /// Convenience function to get a localized message with arguments
    pub fn t_args(&self, key: &str, args: &[(&str, &str)]) -> String {
        let args_map: HashMap<&str, &str> = args.iter().cloned().collect();
        self.manager
            .get_message_in_language(key, &self.language, Some(&args_map))
    }
}
