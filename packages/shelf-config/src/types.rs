use serde::Deserialize;
use serde_json::{Map, Value};

/// Minimum normalized score shown by default in hybrid modes.
pub const DEFAULT_RELEVANCE_THRESHOLD: f32 = 0.7;

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub backend: Backend,
	#[serde(default)]
	pub providers: Providers,
	#[serde(default)]
	pub search: Search,
	/// Optional. Replaces the built-in price phrase and color tables when present.
	pub vocabulary: Option<Vocabulary>,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	#[serde(default = "default_log_level")]
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Backend {
	/// Base URL of the GraphQL-capable vector database, e.g. "http://localhost:8080".
	pub url: String,
	pub api_key: Option<String>,
	#[serde(default = "default_class_name")]
	pub class_name: String,
	#[serde(default = "default_timeout_ms")]
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Providers {
	/// Optional. Without it every hybrid query degrades to keyword-only scoring.
	pub embedding: Option<EmbeddingProviderConfig>,
}

#[derive(Debug, Deserialize)]
pub struct EmbeddingProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: Option<String>,
	pub path: String,
	pub model: String,
	pub dimensions: Option<u32>,
	#[serde(default = "default_timeout_ms")]
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct Search {
	#[serde(default = "default_limit")]
	pub default_limit: u32,
	#[serde(default = "default_relevance_threshold")]
	pub relevance_threshold: f32,
}
impl Default for Search {
	fn default() -> Self {
		Self {
			default_limit: default_limit(),
			relevance_threshold: default_relevance_threshold(),
		}
	}
}

#[derive(Debug, Clone, Deserialize)]
pub struct Vocabulary {
	pub price_phrases: Vec<String>,
	pub colors: Vec<String>,
}

fn default_log_level() -> String {
	"info".to_string()
}

fn default_class_name() -> String {
	"Product".to_string()
}

fn default_timeout_ms() -> u64 {
	10_000
}

fn default_limit() -> u32 {
	12
}

fn default_relevance_threshold() -> f32 {
	DEFAULT_RELEVANCE_THRESHOLD
}
