//! Shared current-language state.
//!
//! One `LanguageContext` is created at startup and handed to every consumer
//! (it is cheap to clone). Writes are last-write-wins and a read that follows
//! a completed write always observes it.

use crate::error::ContentError;
use crate::i18n::Language;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::info;

#[derive(Debug, Clone)]
pub struct LanguageContext {
    current: Arc<RwLock<Language>>,
    permitted: Arc<[Language]>,
}

impl LanguageContext {
    /// Build a context restricted to `permitted`, starting at `initial`.
    ///
    /// Fails when `permitted` is empty or does not contain `initial`.
    pub fn new(initial: Language, permitted: Vec<Language>) -> Result<Self, ContentError> {
        if permitted.is_empty() {
            return Err(ContentError::validation(
                "at least one language must be permitted",
            ));
        }
        if !permitted.contains(&initial) {
            return Err(ContentError::validation(format!(
                "initial language '{}' is not among the permitted languages",
                initial
            )));
        }

        Ok(Self {
            current: Arc::new(RwLock::new(initial)),
            permitted: permitted.into(),
        })
    }

    pub fn get_language(&self) -> Language {
        *self.current.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Switch the active language.
    pub fn set_language(&self, code: &str) -> Result<Language, ContentError> {
        let language = self.permitted_language(code)?;

        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        if *current != language {
            info!("Active language changed: {} -> {}", *current, language);
            *current = language;
        }

        Ok(language)
    }

    /// Validate `code` against the permitted set without changing state.
    pub fn permitted_language(&self, code: &str) -> Result<Language, ContentError> {
        let language = Language::from_code(code)?;
        if !self.permitted.contains(&language) {
            return Err(ContentError::validation(format!(
                "Language '{}' is not enabled",
                language
            )));
        }
        Ok(language)
    }

    pub fn permitted(&self) -> &[Language] {
        &self.permitted
    }
}
