use crate::graph::EntityType;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Main configuration structure
///
/// Every section is optional; missing keys fall back to the public DBpedia
/// endpoint and the default graph budgets.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub kgscope: KgscopeConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub resolver: ResolverConfig,
    #[serde(default)]
    pub graph: GraphConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub http_server: HttpServerConfig,
}

/// General settings
#[derive(Debug, Clone, Deserialize)]
pub struct KgscopeConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for KgscopeConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// SPARQL endpoint and query shape
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub endpoint: String,
    pub timeout_secs: u64,
    /// Language tag labels and abstracts are restricted to.
    pub language: String,
    /// Class label search is restricted to. Empty string searches every entity.
    pub search_class: String,
    /// Predicate used to order label matches. Empty string disables ordering.
    pub rank_property: String,
    pub abstract_property: String,
    /// Namespace the recognised type names (Person, Place, ...) live in.
    pub type_namespace: String,
    pub label_limit: usize,
    pub relation_limit: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://dbpedia.org/sparql".to_string(),
            timeout_secs: 30,
            language: "en".to_string(),
            search_class: "http://dbpedia.org/ontology/Person".to_string(),
            rank_property: "http://dbpedia.org/ontology/wikiPageRank".to_string(),
            abstract_property: "http://dbpedia.org/ontology/abstract".to_string(),
            type_namespace: "http://dbpedia.org/ontology/".to_string(),
            label_limit: 200,
            relation_limit: 50,
        }
    }
}

/// Fuzzy candidate ranking
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Candidates must score strictly above this (0-100).
    pub score_threshold: f64,
    pub candidate_limit: usize,
    /// Shown to the user when the store query fails.
    pub failure_message: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            score_threshold: 60.0,
            candidate_limit: 20,
            failure_message: "An error occurred while processing the query.".to_string(),
        }
    }
}

/// Graph expansion budgets
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    pub max_nodes: usize,
    pub max_edges: usize,
    pub max_depth: usize,
    pub root_type: EntityType,
    /// Stop expanding after this many seconds; 0 disables the deadline.
    pub build_timeout_secs: u64,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            max_nodes: 50,
            max_edges: 100,
            max_depth: 2,
            root_type: EntityType::Person,
            build_timeout_secs: 0,
        }
    }
}

/// Visualization settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub physics: bool,
    pub height: String,
    pub width: String,
    pub gravitational_constant: f64,
    pub spring_length: f64,
    /// Type name -> CSS color. Unlisted types fall back to the `Default` entry.
    pub colors: BTreeMap<String, String>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            physics: true,
            height: "600px".to_string(),
            width: "100%".to_string(),
            gravitational_constant: -8000.0,
            spring_length: 250.0,
            colors: default_colors(),
        }
    }
}

fn default_colors() -> BTreeMap<String, String> {
    [
        ("Person", "#1f78b4"),
        ("Place", "#33a02c"),
        ("Event", "#e31a1c"),
        ("Thing", "#ff7f00"),
        ("Default", "#6a3d9a"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpServerConfig {
    #[serde(default = "default_http_port")]
    pub port: u16,
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            port: default_http_port(),
            bind_address: default_bind_address(),
            allowed_origins: Vec::new(),
        }
    }
}

fn default_http_port() -> u16 {
    8080
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from file
    ///
    /// Loads environment variables from .env file (if present) before loading config.
    /// Looks for config file in this order:
    /// 1. Path specified in KGSCOPE_CONFIG environment variable
    /// 2. ./config.toml in current directory
    pub fn load() -> Result<Self> {
        let _ = dotenv::dotenv();

        let config_path = std::env::var("KGSCOPE_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config.toml"));

        let config_str = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        Self::from_toml(&config_str)
            .with_context(|| format!("Invalid config file: {}", config_path.display()))
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text).context("Failed to parse config.toml")?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        let endpoint = url::Url::parse(&self.store.endpoint)
            .with_context(|| format!("store.endpoint is not a valid URL: {}", self.store.endpoint))?;
        if endpoint.scheme() != "http" && endpoint.scheme() != "https" {
            anyhow::bail!("store.endpoint must use http or https, got {}", endpoint.scheme());
        }

        if self.store.language.trim().is_empty() {
            anyhow::bail!("store.language must not be empty");
        }

        if self.store.label_limit == 0 || self.store.relation_limit == 0 {
            anyhow::bail!("store.label_limit and store.relation_limit must be greater than 0");
        }

        if self.graph.max_depth == 0 {
            anyhow::bail!("graph.max_depth must be at least 1");
        }

        if self.graph.max_nodes == 0 {
            anyhow::bail!("graph.max_nodes must be at least 1 (the root node)");
        }

        if !(0.0..=100.0).contains(&self.resolver.score_threshold) {
            anyhow::bail!("resolver.score_threshold must be between 0 and 100");
        }

        if self.resolver.candidate_limit == 0 {
            anyhow::bail!("resolver.candidate_limit must be greater than 0");
        }

        for name in self.render.colors.keys() {
            name.parse::<EntityType>()
                .map_err(|e| anyhow::anyhow!("render.colors: {}", e))?;
        }

        Ok(())
    }
}
