//! Match scoring: embeds the profile and each listing, ranks by cosine similarity.

use crate::config::ScoringConfig;
use crate::embeddings::{listing_text, profile_text};
use crate::models::{JobListing, MatchResult, ResumeProfile};
use crate::reasons::{self, INSUFFICIENT_LISTING_TEXT, INSUFFICIENT_PROFILE_TEXT};
use providers::EmbeddingProvider;
use std::sync::Arc;
use tracing::{debug, info, warn};

const DEFAULT_BATCH_SIZE: usize = 64;

pub struct Scorer {
    provider: Arc<dyn EmbeddingProvider>,
    cfg: ScoringConfig,
    batch_size: usize,
}

impl Scorer {
    pub fn new(provider: Arc<dyn EmbeddingProvider>, cfg: ScoringConfig) -> Self {
        Self {
            provider,
            cfg,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Ranks `listings` against `profile`, best first. Ties are broken by listing id.
    /// A listing that cannot be embedded scores 0 with an explanatory reason instead
    /// of failing the ranking.
    pub async fn rank<'a>(
        &self,
        profile: &ResumeProfile,
        listings: &'a [JobListing],
    ) -> Vec<MatchResult<'a>> {
        if listings.is_empty() {
            return Vec::new();
        }

        let Some(profile_vec) = self.embed_profile(profile).await else {
            warn!("profile has no embeddable text, every listing scores 0");
            let mut results: Vec<MatchResult<'a>> = listings
                .iter()
                .map(|l| degraded(l, INSUFFICIENT_PROFILE_TEXT))
                .collect();
            sort_results(&mut results);
            return results;
        };

        let vectors = self.embed_listings(listings).await;
        let mut results: Vec<MatchResult<'a>> = listings
            .iter()
            .zip(vectors)
            .map(|(listing, vector)| {
                match vector.and_then(|v| cosine(&profile_vec, &v)) {
                    Some(score) => {
                        let explanation = reasons::explain(profile, listing, score, &self.cfg);
                        MatchResult {
                            listing,
                            score,
                            reasons: explanation.reasons,
                            matching_skills: explanation.matching_skills,
                        }
                    }
                    None => degraded(listing, INSUFFICIENT_LISTING_TEXT),
                }
            })
            .collect();

        sort_results(&mut results);
        info!(listings = results.len(), "ranking complete");
        results
    }

    async fn embed_profile(&self, profile: &ResumeProfile) -> Option<Vec<f32>> {
        let text = profile_text(profile);
        if text.is_empty() {
            return None;
        }
        match self.provider.embed_one(&text).await {
            Ok(v) => Some(v),
            Err(e) => {
                warn!(error = %e, "profile embedding failed");
                None
            }
        }
    }

    /// One vector per listing, `None` where the listing has no description or the
    /// provider could not embed it.
    async fn embed_listings(&self, listings: &[JobListing]) -> Vec<Option<Vec<f32>>> {
        let mut out: Vec<Option<Vec<f32>>> = vec![None; listings.len()];
        let candidates: Vec<(usize, String)> = listings
            .iter()
            .enumerate()
            .filter(|(_, l)| !l.description.trim().is_empty())
            .map(|(i, l)| (i, listing_text(l)))
            .collect();

        for batch in candidates.chunks(self.batch_size) {
            let texts: Vec<String> = batch.iter().map(|(_, t)| t.clone()).collect();
            match self.provider.embed(&texts).await {
                Ok(resp) if resp.vectors.len() == batch.len() => {
                    for ((idx, _), v) in batch.iter().zip(resp.vectors) {
                        out[*idx] = Some(v);
                    }
                }
                Ok(_) | Err(_) => {
                    debug!(size = batch.len(), "batch embedding failed, embedding one by one");
                    for (idx, text) in batch {
                        match self.provider.embed_one(text).await {
                            Ok(v) => out[*idx] = Some(v),
                            Err(e) => {
                                warn!(listing = %listings[*idx].id, error = %e, "listing embedding failed")
                            }
                        }
                    }
                }
            }
        }
        out
    }
}

fn degraded<'a>(listing: &'a JobListing, reason: &str) -> MatchResult<'a> {
    MatchResult {
        listing,
        score: 0.0,
        reasons: vec![reason.to_string()],
        matching_skills: Vec::new(),
    }
}

fn sort_results(results: &mut [MatchResult<'_>]) {
    results.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.listing.id.cmp(&b.listing.id))
    });
}

/// Cosine similarity clipped to [0, 1]. `None` for mismatched lengths or zero vectors.
pub fn cosine(a: &[f32], b: &[f32]) -> Option<f32> {
    if a.len() != b.len() || a.is_empty() {
        return None;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let na = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let nb = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if na == 0.0 || nb == 0.0 {
        return None;
    }
    let sim = dot / (na * nb);
    sim.is_finite().then(|| sim.clamp(0.0, 1.0))
}
