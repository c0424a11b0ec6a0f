//! Note Graph
//!
//! Builds a similarity graph from a Markdown note vault:
//! - Note extraction from a document tree
//! - Relationship resolution through an external similarity service
//! - Batched, single-transaction persistence into Neo4j
//! - A companion reader for weak spaced-repetition cards

pub mod error;
pub mod graph;
pub mod neo4j;
pub mod notes;
pub mod orchestrator;
pub mod resolver;
pub mod review;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use error::{PersistenceError, PipelineError};

use anyhow::Result;
use graph::{GraphWriter, WriterConfig};
use notes::VaultNoteSource;
use orchestrator::{Orchestrator, PipelineOptions};
use resolver::HttpRelationshipResolver;
use review::ReviewClient;
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

// ============================================================================
// YAML config structs (deserialization targets)
// ============================================================================

/// Top-level YAML configuration file structure
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct YamlConfig {
    pub neo4j: Neo4jYamlConfig,
    pub resolver: ServiceYamlConfig,
    pub review: ServiceYamlConfig,
    pub vault: VaultYamlConfig,
    pub writer: WriterConfig,
    pub pipeline: PipelineOptions,
}

/// Neo4j configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Neo4jYamlConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
}

impl Default for Neo4jYamlConfig {
    fn default() -> Self {
        Self {
            uri: "bolt://localhost:7687".into(),
            user: "neo4j".into(),
            password: "password".into(),
        }
    }
}

/// HTTP service section (`resolver` and `review`). Missing URLs fall back to
/// the service's default endpoint.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ServiceYamlConfig {
    pub url: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Note tree section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VaultYamlConfig {
    pub path: String,
    pub extension: String,
    pub exclude_dirs: Vec<String>,
}

impl Default for VaultYamlConfig {
    fn default() -> Self {
        Self {
            path: ".".into(),
            extension: "md".into(),
            exclude_dirs: Vec::new(),
        }
    }
}

// ============================================================================
// Runtime config (what the application actually uses)
// ============================================================================

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub neo4j_uri: String,
    pub neo4j_user: String,
    pub neo4j_password: String,
    pub resolver_url: String,
    pub resolver_timeout: Duration,
    pub review_url: String,
    pub review_timeout: Duration,
    pub vault_path: String,
    pub note_extension: String,
    pub exclude_dirs: Vec<String>,
    pub writer: WriterConfig,
    pub pipeline: PipelineOptions,
}

impl Config {
    /// Load configuration from an optional YAML file, then override with env vars.
    ///
    /// Priority: env var > YAML > default. Only connection settings
    /// (`NEO4J_*`, `RESOLVER_URL`, `REVIEW_URL`) are read from the environment.
    ///
    /// If `yaml_path` is None, tries "config.yaml" in CWD.
    pub fn from_yaml_and_env(yaml_path: Option<&Path>) -> Result<Self> {
        let yaml = Self::load_yaml(yaml_path)?;

        Ok(Self {
            neo4j_uri: std::env::var("NEO4J_URI").unwrap_or(yaml.neo4j.uri),
            neo4j_user: std::env::var("NEO4J_USER").unwrap_or(yaml.neo4j.user),
            neo4j_password: std::env::var("NEO4J_PASSWORD").unwrap_or(yaml.neo4j.password),
            resolver_url: std::env::var("RESOLVER_URL")
                .ok()
                .or(yaml.resolver.url)
                .unwrap_or_else(|| resolver::DEFAULT_RESOLVER_URL.to_string()),
            resolver_timeout: Duration::from_secs(yaml.resolver.timeout_secs.unwrap_or(300)),
            review_url: std::env::var("REVIEW_URL")
                .ok()
                .or(yaml.review.url)
                .unwrap_or_else(|| review::DEFAULT_REVIEW_URL.to_string()),
            review_timeout: Duration::from_secs(yaml.review.timeout_secs.unwrap_or(30)),
            vault_path: yaml.vault.path,
            note_extension: yaml.vault.extension,
            exclude_dirs: yaml.vault.exclude_dirs,
            writer: yaml.writer,
            pipeline: yaml.pipeline,
        })
    }

    /// Load and parse a YAML config file.
    ///
    /// A missing file means defaults. An explicitly requested file that is
    /// missing, or any file that fails to parse, is an error.
    fn load_yaml(yaml_path: Option<&Path>) -> Result<YamlConfig> {
        let default_path = Path::new("config.yaml");
        let path = yaml_path.unwrap_or(default_path);

        match std::fs::read_to_string(path) {
            Ok(contents) => {
                let config = serde_yaml::from_str(&contents)
                    .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path.display(), e))?;
                tracing::info!("Loaded config from {}", path.display());
                Ok(config)
            }
            Err(e) if yaml_path.is_some() => {
                Err(anyhow::anyhow!("Failed to read {}: {}", path.display(), e))
            }
            Err(_) => {
                tracing::debug!(
                    "No config file at {}, using env vars / defaults",
                    path.display()
                );
                Ok(YamlConfig::default())
            }
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub graph: Arc<dyn neo4j::GraphStore>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Connect to Neo4j and keep the configuration for later stages.
    pub async fn new(config: Config) -> Result<Self> {
        let graph = Arc::new(
            neo4j::Neo4jClient::new(&config.neo4j_uri, &config.neo4j_user, &config.neo4j_password)
                .await?,
        );

        Ok(Self {
            graph,
            config: Arc::new(config),
        })
    }

    /// Wire the vault source, HTTP resolver and graph writer into a pipeline.
    pub fn orchestrator(&self) -> Result<Orchestrator> {
        let config = &self.config;
        let source = VaultNoteSource::new(config.note_extension.clone())
            .with_exclude_dirs(config.exclude_dirs.clone());
        let resolver =
            HttpRelationshipResolver::new(config.resolver_url.clone(), config.resolver_timeout)?;
        let writer = GraphWriter::new(self.graph.clone(), config.writer.clone());

        Ok(Orchestrator::new(
            Arc::new(source),
            Arc::new(resolver),
            writer,
            config.pipeline.clone(),
        ))
    }
}

/// Build a review client from configuration (no database needed).
pub fn review_client(config: &Config) -> Result<ReviewClient> {
    ReviewClient::new(config.review_url.clone(), config.review_timeout)
}

// ============================================================================
// Tests
// ============================================================================
