//! Language type: a code validated against the registry.

use crate::error::ContentError;
use crate::i18n::{LanguageConfig, LanguageRegistry};
use std::fmt;

/// A language known to the registry.
///
/// Holding a `Language` means the code has already been checked, so consumers
/// can pass it around by value without revalidating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Language {
    /// ISO 639-1 language code (e.g., "fr", "en")
    code: &'static str,
}

impl Language {
    pub const FRENCH: Language = Language { code: "fr" };
    pub const ENGLISH: Language = Language { code: "en" };
    pub const SPANISH: Language = Language { code: "es" };
    pub const ARABIC: Language = Language { code: "ar" };
    pub const GERMAN: Language = Language { code: "de" };

    /// Create a Language from a code string.
    ///
    /// Surrounding whitespace is ignored; the code itself must match a
    /// registry entry exactly.
    pub fn from_code(code: &str) -> Result<Language, ContentError> {
        let code = code.trim();
        match LanguageRegistry::get().get_by_code(code) {
            Some(config) => Ok(Language { code: config.code }),
            None => Err(ContentError::validation(format!(
                "Unknown language code: '{}'",
                code
            ))),
        }
    }

    /// The fallback language used when a translation is missing.
    pub fn canonical() -> Language {
        let config = LanguageRegistry::get().canonical();
        Language { code: config.code }
    }

    pub fn code(&self) -> &'static str {
        self.code
    }

    /// # Panics
    /// Panics if the code is missing from the registry, which cannot happen
    /// for values built through `from_code` or the constants.
    pub fn config(&self) -> &'static LanguageConfig {
        LanguageRegistry::get()
            .get_by_code(self.code)
            .expect("Language code should always be valid")
    }

    pub fn name(&self) -> &'static str {
        self.config().name
    }

    pub fn native_name(&self) -> &'static str {
        self.config().native_name
    }

    pub fn is_canonical(&self) -> bool {
        self.config().is_canonical
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code)
    }
}
