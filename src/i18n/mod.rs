//! Internationalization: languages, the shared language context, UI text
//! resolution and multilingual field values.
//!
//! # Architecture
//!
//! - `registry`: every language the storefront can display, with metadata
//! - `language`: `Language`, a code validated against the registry
//! - `context`: `LanguageContext`, the single holder of the active language
//! - `resolver`: `TextResolver`, key lookup with English and literal fallback
//! - `multilingual`: `MultilingualText` fields and slug generation
//!
//! # Example
//!
//! ```rust,ignore
//! use iptv_storefront::i18n::{Language, LanguageContext, TextResolver};
//!
//! let ctx = LanguageContext::new(Language::FRENCH, vec![Language::FRENCH, Language::ENGLISH])?;
//! let entries = translations.list_translations().await?;
//! let resolver = TextResolver::new(Some(entries.as_slice()), ctx.get_language());
//! let title = resolver.resolve("home.title", "Welcome");
//! ```

mod context;
mod language;
mod multilingual;
mod registry;
mod resolver;

pub use context::LanguageContext;
pub use language::Language;
pub use multilingual::{
    generate_slug, get_localized_text, parse_multilingual_text, MultilingualText,
    ACTIVATION_CATEGORY, ACTIVATION_SUFFIX,
};
pub use registry::{LanguageConfig, LanguageRegistry, TextDirection};
pub use resolver::TextResolver;
