use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub embeddings: EmbeddingConfig,
    pub collector: CollectorConfig,
    pub cache: CacheConfig,
    pub scoring: ScoringConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// `hashing` (local) or `openai`.
    pub provider: String,
    pub model: String,
    pub dimensions: usize,
    pub batch_size: usize,
    pub timeout_secs: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: "hashing".to_string(),
            model: "text-embedding-3-small".to_string(),
            dimensions: providers::hashing::DEFAULT_DIMENSIONS,
            batch_size: 64,
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    /// `fixture` or `http`.
    pub provider: String,
    pub fixture_path: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: u64,
    pub max_results: usize,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            provider: "fixture".to_string(),
            fixture_path: Some("config/listings.json".to_string()),
            base_url: None,
            timeout_secs: 30,
            max_results: 50,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,
    /// SQLite URL or file path. An in-memory database only lives for one run, so
    /// results are reused across runs only with a file path.
    pub database: String,
    pub ttl_hours: i64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            database: "sqlite::memory:".to_string(),
            ttl_hours: 24,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub max_reasons: usize,
    /// Minimum strength a signal needs to become a reason.
    pub reason_threshold: f32,
    /// Jaro-Winkler similarity needed for a fuzzy skill match.
    pub fuzzy_threshold: f64,
    pub location_strength: f32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            max_reasons: 5,
            reason_threshold: 0.5,
            fuzzy_threshold: 0.88,
            location_strength: 0.9,
        }
    }
}

pub fn load(path: Option<&str>) -> anyhow::Result<AppConfig> {
    let mut settings = config::Config::builder();
    if let Some(p) = path {
        settings = settings.add_source(config::File::with_name(p));
    } else {
        settings = settings.add_source(config::File::with_name("config/default").required(false));
    }
    settings = settings.add_source(config::Environment::with_prefix("JOBMATCH").separator("__"));
    let cfg = settings.build()?;
    Ok(cfg.try_deserialize()?)
}
