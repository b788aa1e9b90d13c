use crate::collector::{self, CollectOptions};
use crate::config::AppConfig;
use crate::export;
use crate::extractor::{self, ExtractError};
use crate::models::{JobListing, MatchRow, ResumeProfile, SearchQuery};
use crate::scorer::Scorer;
use anyhow::Context;
use providers::fixture::FixtureCollector;
use providers::hashing::HashingEmbedder;
use providers::http::{HttpCollector, HttpCollectorConfig};
use providers::openai::{OpenAiConfig, OpenAiEmbedder};
use providers::{ProviderError, ProviderRegistry};
use std::path::Path;
use std::sync::Arc;
use storage::{connect, migrate, SearchCache};
use thiserror::Error;
use tracing::{info, warn};

/// Typed outcome of a failed run. None of these end the process.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Document(#[from] ExtractError),
    #[error("listing collection failed: {0}")]
    Collection(#[source] ProviderError),
    #[error("provider setup failed: {0}")]
    Provider(#[source] ProviderError),
    #[error(transparent)]
    Setup(#[from] anyhow::Error),
}

pub struct RunSummary {
    pub profile: ResumeProfile,
    pub collected: usize,
    pub matches: Vec<MatchRow>,
}

pub fn parse_resume(path: &Path) -> Result<ResumeProfile, RunError> {
    info!(path = %path.display(), "Starting extraction phase...");
    let text = extractor::load_resume(path)?;
    let profile = extractor::extract(&text);
    info!(
        skills = profile.skills.len(),
        experience = profile.experience.len(),
        "Extraction complete."
    );
    Ok(profile)
}

pub async fn open_cache(config: &AppConfig) -> anyhow::Result<Option<SearchCache>> {
    if !config.cache.enabled {
        return Ok(None);
    }
    let pool = connect(&config.cache.database)
        .await
        .context("cache db connect")?;
    migrate(&pool).await.context("cache db migrate")?;
    Ok(Some(SearchCache::new(pool, config.cache.ttl_hours)))
}

pub async fn search(
    config: &AppConfig,
    registry: &ProviderRegistry,
    cache: Option<&SearchCache>,
    query: &SearchQuery,
) -> Result<Vec<JobListing>, RunError> {
    info!(title = %query.title, location = %query.location, job_type = %query.job_type, "Starting collection phase...");
    let collector = registry.collector(None).map_err(RunError::Provider)?;
    let opts = CollectOptions {
        max_results: config.collector.max_results,
        ..Default::default()
    };
    match collector::collect(collector.as_ref(), cache, query, &opts).await {
        Ok(listings) => {
            info!(count = listings.len(), "Collection complete.");
            Ok(listings)
        }
        Err(e) => {
            warn!(error = %e, "collection unavailable for this search, retry later");
            Err(RunError::Collection(e))
        }
    }
}

pub fn build_scorer(config: &AppConfig, registry: &ProviderRegistry) -> Result<Scorer, RunError> {
    let provider = registry.embedding(None).map_err(RunError::Provider)?;
    Ok(Scorer::new(provider, config.scoring.clone()).with_batch_size(config.embeddings.batch_size))
}

/// Extract → collect → rank, keeping the `top` best matches.
pub async fn run(
    config: &AppConfig,
    resume: &Path,
    query: &SearchQuery,
    top: usize,
) -> Result<RunSummary, RunError> {
    let profile = parse_resume(resume)?;
    let registry = build_registry(config);
    let cache = open_cache(config).await?;
    let listings = search(config, &registry, cache.as_ref(), query).await?;

    info!("Starting ranking phase...");
    let scorer = build_scorer(config, &registry)?;
    let ranked = scorer.rank(&profile, &listings).await;
    let mut matches = export::rows(&ranked);
    matches.truncate(top);
    info!(kept = matches.len(), "Ranking complete.");

    Ok(RunSummary {
        collected: listings.len(),
        profile,
        matches,
    })
}

pub fn build_registry(config: &AppConfig) -> ProviderRegistry {
    let mut reg = ProviderRegistry::new().with_embedding(
        "hashing",
        Arc::new(HashingEmbedder::new(config.embeddings.dimensions)),
    );

    if let (Some(key), Some(base)) = (
        std::env::var_os("OPENAI_API_KEY"),
        std::env::var_os("OPENAI_BASE_URL"),
    ) {
        match OpenAiEmbedder::new(OpenAiConfig {
            api_key: key.to_string_lossy().into_owned(),
            base_url: base.to_string_lossy().into_owned(),
            embedding_model: config.embeddings.model.clone(),
            timeout_secs: config.embeddings.timeout_secs,
        }) {
            Ok(provider) => reg = reg.with_embedding("openai", Arc::new(provider)),
            Err(e) => warn!(error = %e, "openai embedder unavailable"),
        }
    }

    if let Some(path) = &config.collector.fixture_path {
        reg = reg.with_collector("fixture", Arc::new(FixtureCollector::new(path)));
    }

    if let Some(base_url) = &config.collector.base_url {
        match HttpCollector::new(HttpCollectorConfig {
            base_url: base_url.clone(),
            timeout_secs: config.collector.timeout_secs,
            api_key: std::env::var("JOBS_API_KEY").ok(),
        }) {
            Ok(collector) => reg = reg.with_collector("http", Arc::new(collector)),
            Err(e) => warn!(error = %e, "http collector unavailable"),
        }
    }

    reg.set_preferred_embedding(&config.embeddings.provider)
        .set_preferred_collector(&config.collector.provider)
}
