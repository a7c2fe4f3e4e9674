//! Data models: templates, extracted documents, configuration.

pub mod config;
pub mod document;
pub mod template;
