//! Core library: résumé extraction, listing collection, match scoring and export.

pub mod collector;
pub mod config;
pub mod embeddings;
pub mod entities;
pub mod export;
pub mod extractor;
pub mod models;
pub mod pipeline;
pub mod reasons;
pub mod scorer;
pub mod sections;
