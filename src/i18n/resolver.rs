//! UI text resolution against a snapshot of loaded translations.

use crate::i18n::Language;
use crate::store::TranslationEntry;
use std::collections::HashMap;

/// Resolves translation keys for one language.
///
/// Built from whatever the translation store has loaded (possibly nothing
/// yet). Lookups are pure and never fail.
#[derive(Debug, Clone)]
pub struct TextResolver {
    /// language code -> key -> value; `None` until translations are loaded
    index: Option<HashMap<String, HashMap<String, String>>>,
    language: Language,
}

impl TextResolver {
    pub fn new(entries: Option<&[TranslationEntry]>, language: Language) -> Self {
        let index = entries.map(|entries| {
            let mut index: HashMap<String, HashMap<String, String>> = HashMap::new();
            for entry in entries {
                index
                    .entry(entry.language_code.clone())
                    .or_default()
                    .insert(entry.translation_key.clone(), entry.translation_value.clone());
            }
            index
        });

        Self { index, language }
    }

    /// A resolver with no data loaded; every lookup yields its fallback.
    pub fn unloaded(language: Language) -> Self {
        Self {
            index: None,
            language,
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn is_loaded(&self) -> bool {
        self.index.is_some()
    }

    /// Resolve `key`: active language, then English, then `fallback`.
    pub fn resolve<'a>(&'a self, key: &str, fallback: &'a str) -> &'a str {
        let Some(index) = &self.index else {
            return fallback;
        };

        let lookup = |code: &str| index.get(code).and_then(|keys| keys.get(key));

        lookup(self.language.code())
            .or_else(|| lookup(Language::canonical().code()))
            .map(String::as_str)
            .unwrap_or(fallback)
    }
}
