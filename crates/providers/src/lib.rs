//! Provider abstractions for embeddings and job-listing collection.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use storage::models::{JobListing, SearchQuery};
use thiserror::Error;

pub mod fixture;
pub mod hashing;
pub mod http;
pub mod openai;
mod record;

pub use record::dedup_by_id;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    RequestFailed(String),
    #[error("unknown provider: {0}")]
    UnknownProvider(String),
    #[error("collection unavailable: {0}")]
    CollectionUnavailable(String),
    #[error("no embeddable text in input")]
    EmptyInput,
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedResponse {
    pub vectors: Vec<Vec<f32>>,
}

/// Maps text to fixed-length vectors. Implementations must be deterministic for a
/// given configuration so that scores are reproducible within a run.
#[async_trait::async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, texts: &[String]) -> Result<EmbedResponse, ProviderError>;

    async fn embed_one(&self, text: &str) -> Result<Vec<f32>, ProviderError> {
        let resp = self.embed(&[text.to_string()]).await?;
        resp.vectors
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::InvalidResponse("empty embedding batch".into()))
    }
}

/// Source of job listings for a search. An empty result is a valid outcome;
/// transport or service failures surface as [`ProviderError::CollectionUnavailable`].
#[async_trait::async_trait]
pub trait ListingCollector: Send + Sync {
    fn name(&self) -> &str;

    async fn search(&self, query: &SearchQuery) -> Result<Vec<JobListing>, ProviderError>;
}

#[derive(Default, Clone)]
pub struct ProviderRegistry {
    embeddings: HashMap<String, Arc<dyn EmbeddingProvider>>,
    collectors: HashMap<String, Arc<dyn ListingCollector>>,
    pub preferred_embedding: Option<String>,
    pub preferred_collector: Option<String>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_embedding(mut self, name: &str, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embeddings.insert(name.to_string(), provider);
        self
    }

    pub fn with_collector(mut self, name: &str, collector: Arc<dyn ListingCollector>) -> Self {
        self.collectors.insert(name.to_string(), collector);
        self
    }

    pub fn set_preferred_embedding(mut self, name: &str) -> Self {
        self.preferred_embedding = Some(name.to_string());
        self
    }

    pub fn set_preferred_collector(mut self, name: &str) -> Self {
        self.preferred_collector = Some(name.to_string());
        self
    }

    pub fn embedding(
        &self,
        name: Option<&str>,
    ) -> Result<Arc<dyn EmbeddingProvider>, ProviderError> {
        let key = name
            .map(str::to_string)
            .or_else(|| self.preferred_embedding.clone())
            .ok_or_else(|| {
                ProviderError::UnknownProvider("no embedding provider configured".into())
            })?;
        self.embeddings
            .get(&key)
            .cloned()
            .ok_or_else(|| ProviderError::UnknownProvider(key))
    }

    pub fn collector(
        &self,
        name: Option<&str>,
    ) -> Result<Arc<dyn ListingCollector>, ProviderError> {
        let key = name
            .map(str::to_string)
            .or_else(|| self.preferred_collector.clone())
            .ok_or_else(|| ProviderError::UnknownProvider("no collector configured".into()))?;
        self.collectors
            .get(&key)
            .cloned()
            .ok_or_else(|| ProviderError::UnknownProvider(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hashing::HashingEmbedder;

    #[tokio::test]
    async fn registry_resolves_preferred_and_named_providers() {
        let reg = ProviderRegistry::new()
            .with_embedding("hashing", Arc::new(HashingEmbedder::new(64)))
            .set_preferred_embedding("hashing");

        assert!(reg.embedding(None).is_ok());
        assert!(reg.embedding(Some("hashing")).is_ok());
        assert!(matches!(
            reg.embedding(Some("openai")),
            Err(ProviderError::UnknownProvider(name)) if name == "openai"
        ));
        assert!(reg.collector(None).is_err());
    }

    #[tokio::test]
    async fn embed_one_returns_the_single_vector() {
        let embedder = HashingEmbedder::new(32);
        let v = embedder.embed_one("rust tokio").await.unwrap();
        assert_eq!(v.len(), 32);
    }
}
