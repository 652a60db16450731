use std::path::PathBuf;

use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub providers: Providers,
	pub table: Table,
	#[serde(default)]
	pub search: Search,
	#[serde(default)]
	pub lexicon: Lexicon,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
	/// Table holding the column metadata. May be schema-qualified, e.g. "public.column_embeddings".
	#[serde(default = "default_table")]
	pub table: String,
	pub vector_dim: u32,
}

#[derive(Debug, Deserialize)]
pub struct Providers {
	pub embedding: EmbeddingProviderConfig,
	pub llm: LlmProviderConfig,
}

#[derive(Debug, Deserialize)]
pub struct EmbeddingProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub dimensions: u32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct LlmProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	/// Must be zero.
	#[serde(default)]
	pub temperature: f32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

/// Context handed to the reformulation prompt.
#[derive(Debug, Deserialize)]
pub struct Table {
	pub domain_name: String,
	pub description: String,
	/// One entry per column, formatted as "<name> - <type> - <sample>".
	pub columns: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Search {
	pub unscoped_limit: u32,
	pub scoped_limit: u32,
	pub max_results: u32,
	pub distance: String,
	pub snippet_chars: u32,
	pub description_marker: String,
	pub cache: SearchCache,
}
impl Default for Search {
	fn default() -> Self {
		Self {
			unscoped_limit: 20,
			scoped_limit: 15,
			max_results: 15,
			distance: "cosine".to_string(),
			snippet_chars: 80,
			description_marker: "The column".to_string(),
			cache: SearchCache::default(),
		}
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SearchCache {
	pub policy: String,
	pub capacity: u32,
}
impl Default for SearchCache {
	fn default() -> Self {
		Self { policy: "lru".to_string(), capacity: 1_024 }
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Lexicon {
	pub expand_morphology: bool,
	/// Optional synonym table, one synset per line with lemmas separated by whitespace.
	pub synonyms_path: Option<PathBuf>,
}
impl Default for Lexicon {
	fn default() -> Self {
		Self { expand_morphology: true, synonyms_path: None }
	}
}

fn default_table() -> String {
	"column_embeddings".to_string()
}
