//! Local, deterministic embedding via feature hashing.
//!
//! Tokens are hashed with blake3 into a fixed number of buckets, weighted with
//! sublinear term frequency and L2-normalized, so cosine similarity reduces to
//! weighted vocabulary overlap. Needs no model download and no network.

use crate::{EmbedResponse, EmbeddingProvider, ProviderError};
use std::collections::BTreeMap;

pub const DEFAULT_DIMENSIONS: usize = 512;

const STOPWORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "in", "into", "is", "it",
    "of", "on", "or", "our", "the", "to", "we", "with", "you", "your",
];

/// Job-posting boilerplate and company suffixes. They appear in most listings and
/// would otherwise dilute the overlap that carries the similarity.
const POSTING_BOILERPLATE: &[&str] = &[
    "seeking", "looking", "hiring", "experience", "experienced", "join", "role", "team",
    "position", "opportunity", "candidate", "ideal", "required", "preferred", "plus",
    "inc", "llc", "ltd", "corp", "corporation", "company", "co",
];

fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(&token) || POSTING_BOILERPLATE.contains(&token)
}

#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dimensions: usize,
}

impl HashingEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
        }
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn embed_text(&self, text: &str) -> Result<Vec<f32>, ProviderError> {
        let mut counts: BTreeMap<String, u32> = BTreeMap::new();
        for token in tokenize(text) {
            if is_stopword(&token) {
                continue;
            }
            *counts.entry(token).or_default() += 1;
        }
        if counts.is_empty() {
            return Err(ProviderError::EmptyInput);
        }

        let mut vector = vec![0f32; self.dimensions];
        for (token, tf) in counts {
            let weight = 1.0 + (tf as f32).ln();
            vector[self.bucket(&token)] += weight;
        }
        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|v| *v /= norm);
        }
        Ok(vector)
    }

    fn bucket(&self, token: &str) -> usize {
        let hash = blake3::hash(token.as_bytes());
        let mut buf = [0u8; 8];
        buf.copy_from_slice(&hash.as_bytes()[..8]);
        (u64::from_le_bytes(buf) % self.dimensions as u64) as usize
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSIONS)
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for HashingEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<EmbedResponse, ProviderError> {
        let vectors = texts
            .iter()
            .map(|t| self.embed_text(t))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(EmbedResponse { vectors })
    }
}

/// Lowercased word tokens. Keeps `+`, `#` and inner dots so that `c++`, `c#` and
/// `node.js` survive as single tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || matches!(c, '+' | '#' | '.')))
        .map(|piece| piece.trim_matches('.'))
        .filter(|piece| piece.chars().any(char::is_alphanumeric))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cosine(a: &[f32], b: &[f32]) -> f32 {
        a.iter().zip(b).map(|(x, y)| x * y).sum()
    }

    #[test]
    fn tokenize_keeps_tech_tokens() {
        let tokens = tokenize("Seeking React developer with Node.js, C++ and C# experience.");
        assert!(tokens.contains(&"node.js".to_string()));
        assert!(tokens.contains(&"c++".to_string()));
        assert!(tokens.contains(&"c#".to_string()));
        assert!(tokens.contains(&"experience".to_string()));
    }

    #[test]
    fn vectors_are_deterministic_and_unit_length() {
        let e = HashingEmbedder::new(256);
        let a = e.embed_text("Rust developer, tokio and serde").unwrap();
        let b = e.embed_text("Rust developer, tokio and serde").unwrap();
        assert_eq!(a, b);
        let norm: f32 = a.iter().map(|v| v * v).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn overlapping_texts_score_higher_than_disjoint_ones() {
        let e = HashingEmbedder::default();
        let profile = e.embed_text("python sql data analysis").unwrap();
        let close = e.embed_text("Data analyst with Python and SQL").unwrap();
        let far = e.embed_text("Forklift operator, night shift warehouse").unwrap();
        assert!(cosine(&profile, &close) > cosine(&profile, &far));
    }

    #[test]
    fn posting_boilerplate_does_not_dilute_overlap() {
        let e = HashingEmbedder::default();
        let profile = e.embed_text("react node.js").unwrap();
        let plain = e.embed_text("React developer Node.js").unwrap();
        let wordy = e
            .embed_text("Seeking React developer with Node.js experience. Join our team, Acme Inc.")
            .unwrap();
        assert_eq!(plain, e.embed_text("react developer node.js").unwrap());
        assert!(cosine(&profile, &wordy) > 0.5);
    }

    #[test]
    fn stopword_only_text_is_rejected() {
        let e = HashingEmbedder::default();
        assert!(matches!(e.embed_text("and the of"), Err(ProviderError::EmptyInput)));
        assert!(matches!(e.embed_text("   "), Err(ProviderError::EmptyInput)));
    }
}
