//! Entity resolution: free text to ranked candidate entities.
//!
//! The store does the case-insensitive substring filtering; this module scores
//! what comes back with [`fuzzy::partial_ratio`] and keeps the best matches.

pub mod fuzzy;

use crate::config::ResolverConfig;
use crate::store::{KnowledgeStore, LabelMatch};
use serde::Serialize;

/// Message returned for blank query text.
pub const EMPTY_QUERY_MESSAGE: &str = "Please enter a name to search for.";

/// A possible seed entity for graph expansion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    pub uri: String,
    pub label: String,
    /// Fuzzy score against the query, 0-100.
    pub score: f64,
}

/// Outcome of one resolve call.
///
/// An empty list without error means "no matches"; an empty list with an
/// error means the store query failed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Resolution {
    pub candidates: Vec<Candidate>,
    pub error: Option<String>,
}

impl Resolution {
    fn failed(message: impl Into<String>) -> Self {
        Self {
            candidates: Vec::new(),
            error: Some(message.into()),
        }
    }
}

pub struct Resolver<'a, S> {
    store: &'a S,
    config: ResolverConfig,
}

impl<'a, S: KnowledgeStore> Resolver<'a, S> {
    pub fn new(store: &'a S, config: ResolverConfig) -> Self {
        Self { store, config }
    }

    /// Resolve `query_text` to candidates ordered by descending score.
    ///
    /// Never returns an error: store failures become the configured
    /// user-facing message.
    pub async fn resolve(&self, query_text: &str) -> Resolution {
        let query_text = query_text.trim();
        if query_text.is_empty() {
            return Resolution::failed(EMPTY_QUERY_MESSAGE);
        }

        let matches = match self.store.find_entities_by_label(query_text).await {
            Ok(matches) => matches,
            Err(e) => {
                log::error!("Label search for '{}' failed: {}", query_text, e);
                return Resolution::failed(self.config.failure_message.clone());
            }
        };

        let candidates = rank_candidates(
            query_text,
            matches,
            self.config.score_threshold,
            self.config.candidate_limit,
        );
        log::debug!("Resolved '{}' to {} candidates", query_text, candidates.len());

        Resolution {
            candidates,
            error: None,
        }
    }
}

/// Keep the `limit` best-scoring matches, then drop those not strictly above `threshold`.
///
/// Query and labels are case-folded before scoring.
pub fn rank_candidates(
    query: &str,
    matches: Vec<LabelMatch>,
    threshold: f64,
    limit: usize,
) -> Vec<Candidate> {
    let query = query.to_lowercase();
    let labels: Vec<String> = matches.iter().map(|m| m.label.to_lowercase()).collect();
    fuzzy::extract(&query, &labels, limit)
        .into_iter()
        .filter(|&(_, score)| score > threshold)
        .map(|(i, score)| Candidate {
            uri: matches[i].uri.clone(),
            label: matches[i].label.clone(),
            score,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::mock::MockStore;

    fn label(uri: &str, label: &str) -> LabelMatch {
        LabelMatch {
            uri: uri.to_string(),
            label: label.to_string(),
            rank_hint: None,
        }
    }

    fn curie_store() -> MockStore {
        MockStore::new()
            .with_entity("http://dbpedia.org/resource/Marie_Curie", "Marie Curie")
            .with_entity("http://dbpedia.org/resource/Pierre_Curie", "Pierre Curie")
            .with_entity("http://dbpedia.org/resource/Albert_Einstein", "Albert Einstein")
            .with_entity("http://dbpedia.org/resource/Ève_Curie", "Ève Curie")
    }

    #[tokio::test]
    async fn test_curie_scenario() {
        let store = curie_store();
        let resolver = Resolver::new(&store, ResolverConfig::default());
        let resolution = resolver.resolve("Curie").await;

        assert!(resolution.error.is_none());
        let marie = resolution
            .candidates
            .iter()
            .find(|c| c.uri == "http://dbpedia.org/resource/Marie_Curie")
            .expect("Marie Curie should be a candidate");
        assert!(marie.score > 60.0);
        assert!(resolution.candidates.iter().all(|c| c.label != "Albert Einstein"));
    }

    #[test]
    fn test_match_ranked_above_unrelated_label() {
        let matches = vec![
            label("ex:einstein", "Albert Einstein"),
            label("ex:curie", "Marie Curie"),
        ];
        let ranked = rank_candidates("Curie", matches, 0.0, 20);
        assert_eq!(ranked[0].uri, "ex:curie");
        assert_eq!(ranked[1].uri, "ex:einstein");
        assert!(ranked[0].score > 60.0);
        assert!(ranked[1].score < ranked[0].score);
    }

    #[tokio::test]
    async fn test_store_failure_sets_error() {
        let store = curie_store().unavailable();
        let config = ResolverConfig {
            failure_message: "Wystąpił błąd podczas przetwarzania zapytania.".to_string(),
            ..ResolverConfig::default()
        };
        let resolution = Resolver::new(&store, config).resolve("Curie").await;
        assert!(resolution.candidates.is_empty());
        assert_eq!(
            resolution.error.as_deref(),
            Some("Wystąpił błąd podczas przetwarzania zapytania.")
        );
    }

    #[tokio::test]
    async fn test_no_match_is_not_an_error() {
        let store = curie_store();
        let resolution = Resolver::new(&store, ResolverConfig::default())
            .resolve("Bohr")
            .await;
        assert!(resolution.candidates.is_empty());
        assert!(resolution.error.is_none());
    }

    #[tokio::test]
    async fn test_blank_query_is_rejected() {
        let store = curie_store();
        let resolution = Resolver::new(&store, ResolverConfig::default())
            .resolve("   ")
            .await;
        assert!(resolution.candidates.is_empty());
        assert_eq!(resolution.error.as_deref(), Some(EMPTY_QUERY_MESSAGE));
    }

    #[tokio::test]
    async fn test_candidate_cap_and_order() {
        let mut store = MockStore::new();
        for i in 0..30 {
            store = store.with_entity(&format!("ex:c{}", i), &format!("Curie {}", i));
        }
        store = store.with_entity("ex:k", "Kurie Curi");
        let resolution = Resolver::new(&store, ResolverConfig::default())
            .resolve("Curi")
            .await;
        assert_eq!(resolution.candidates.len(), 20);
        assert!(resolution
            .candidates
            .windows(2)
            .all(|w| w[0].score >= w[1].score));
        // Equal scores keep store order
        assert_eq!(resolution.candidates[0].uri, "ex:c0");
        assert_eq!(resolution.candidates[1].uri, "ex:c1");
    }

    #[tokio::test]
    async fn test_resolve_is_idempotent() {
        let store = curie_store();
        let resolver = Resolver::new(&store, ResolverConfig::default());
        let first = resolver.resolve("Curie").await;
        let second = resolver.resolve("Curie").await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_uppercase_query_matches_label() {
        let store = curie_store();
        let resolution = Resolver::new(&store, ResolverConfig::default())
            .resolve("CURIE")
            .await;
        let marie = resolution
            .candidates
            .iter()
            .find(|c| c.uri == "http://dbpedia.org/resource/Marie_Curie")
            .expect("Marie Curie should be a candidate");
        assert_eq!(marie.score, 100.0);
        assert_eq!(marie.label, "Marie Curie");
    }

    #[test]
    fn test_transposed_label_kept() {
        let matches = vec![label("ex:m", "Marie Cruie")];
        let ranked = rank_candidates("Curie", matches, 60.0, 20);
        assert_eq!(ranked.len(), 1);
        assert!((ranked[0].score - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_threshold_is_strict() {
        let matches = vec![label("ex:m", "Marie Curie")];
        assert!(rank_candidates("Curie", matches.clone(), 100.0, 20).is_empty());
        assert_eq!(rank_candidates("Curie", matches, 99.5, 20).len(), 1);
    }
}
