use crate::config::StoreConfig;
use crate::error::{KgscopeError, Result};
use crate::store::query::{self, validate_uri};
use crate::store::results::SparqlResults;
use crate::store::{KnowledgeStore, LabelMatch, RelationRow};
use reqwest::header::ACCEPT;
use reqwest::Client;
use std::time::{Duration, Instant};

const SPARQL_JSON: &str = "application/sparql-results+json";

/// SPARQL 1.1 protocol client
///
/// Issues SELECT queries over HTTP GET and always asks for JSON results.
/// Holds no per-request state, so one instance can serve concurrent requests.
pub struct SparqlClient {
    client: Client,
    config: StoreConfig,
}

impl SparqlClient {
    /// Create a new client for the configured endpoint
    pub fn new(config: StoreConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("kgscope/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| KgscopeError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    /// Run one SELECT query and parse the JSON result set
    ///
    /// Transport errors, non-success statuses and undecodable bodies all map to
    /// [`KgscopeError::StoreQuery`].
    pub async fn select(&self, query: &str) -> Result<SparqlResults> {
        let start = Instant::now();

        let response = self
            .client
            .get(&self.config.endpoint)
            .header(ACCEPT, SPARQL_JSON)
            .query(&[("query", query), ("format", SPARQL_JSON)])
            .send()
            .await
            .map_err(|e| KgscopeError::StoreQuery(format!("Network error: {}", e)))?;

        let status = response.status();

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());

            return Err(KgscopeError::StoreQuery(format!(
                "SPARQL endpoint error {}: {}",
                status,
                body.chars().take(500).collect::<String>()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| KgscopeError::StoreQuery(format!("Failed to read response: {}", e)))?;

        let results = SparqlResults::from_json(&body)?;
        log::debug!(
            "SPARQL query returned {} rows in {:?}",
            results.len(),
            start.elapsed()
        );
        Ok(results)
    }
}

impl KnowledgeStore for SparqlClient {
    async fn find_entities_by_label(&self, text: &str) -> Result<Vec<LabelMatch>> {
        if text.trim().is_empty() {
            return Err(KgscopeError::InvalidInput("query text is empty".to_string()));
        }
        let sparql = query::label_search(&self.config, text);
        self.select(&sparql).await?.into_label_matches()
    }

    async fn find_outgoing_relations(&self, uri: &str) -> Result<Vec<RelationRow>> {
        validate_uri(uri)?;
        let sparql = query::outgoing_relations(&self.config, uri);
        self.select(&sparql).await?.into_relation_rows()
    }

    async fn find_abstract(&self, uri: &str) -> Result<Option<String>> {
        validate_uri(uri)?;
        let sparql = query::abstract_of(&self.config, uri);
        self.select(&sparql).await?.into_abstract()
    }
}
