//! Multilingual content service for an IPTV storefront.
//!
//! Admin-editable UI translations, homepage content blocks and the package
//! catalog, served over HTTP with a shared language context and fallback
//! text resolution.

pub mod cache;
pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod i18n;
pub mod retry;
pub mod scheduler;
pub mod security;
pub mod server;
pub mod store;

pub use error::ContentError;
