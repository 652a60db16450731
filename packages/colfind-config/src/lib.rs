mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Config, EmbeddingProviderConfig, Lexicon, LlmProviderConfig, Postgres, Providers, Search,
	SearchCache, Service, Storage, Table,
};

use std::{fs, path::Path};

pub const DISTANCES: [&str; 3] = ["cosine", "l2", "inner_product"];
pub const CACHE_POLICIES: [&str; 2] = ["lru", "unbounded"];

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;
	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
		});
	}
	if !is_table_identifier(&cfg.storage.postgres.table) {
		return Err(Error::Validation {
			message: "storage.postgres.table must be a plain or schema-qualified identifier."
				.to_string(),
		});
	}
	if cfg.providers.embedding.dimensions == 0 {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must be greater than zero.".to_string(),
		});
	}
	if cfg.providers.embedding.dimensions != cfg.storage.postgres.vector_dim {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must match storage.postgres.vector_dim."
				.to_string(),
		});
	}
	if cfg.providers.llm.temperature != 0.0 {
		return Err(Error::Validation {
			message: "providers.llm.temperature must be 0.".to_string(),
		});
	}

	for (label, key) in
		[("embedding", &cfg.providers.embedding.api_key), ("llm", &cfg.providers.llm.api_key)]
	{
		if key.trim().is_empty() {
			return Err(Error::Validation {
				message: format!("Provider {label} api_key must be non-empty."),
			});
		}
	}

	if cfg.table.domain_name.trim().is_empty() {
		return Err(Error::Validation {
			message: "table.domain_name must be non-empty.".to_string(),
		});
	}
	if cfg.table.description.trim().is_empty() {
		return Err(Error::Validation {
			message: "table.description must be non-empty.".to_string(),
		});
	}
	if cfg.table.columns.is_empty() {
		return Err(Error::Validation { message: "table.columns must be non-empty.".to_string() });
	}

	for (label, value) in [
		("search.unscoped_limit", cfg.search.unscoped_limit),
		("search.scoped_limit", cfg.search.scoped_limit),
		("search.max_results", cfg.search.max_results),
		("search.snippet_chars", cfg.search.snippet_chars),
	] {
		if value == 0 {
			return Err(Error::Validation { message: format!("{label} must be greater than zero.") });
		}
	}

	if !DISTANCES.iter().any(|distance| *distance == cfg.search.distance) {
		return Err(Error::Validation {
			message: "search.distance must be one of cosine, l2, or inner_product.".to_string(),
		});
	}
	if cfg.search.description_marker.trim().is_empty() {
		return Err(Error::Validation {
			message: "search.description_marker must be non-empty.".to_string(),
		});
	}
	if !CACHE_POLICIES.iter().any(|policy| *policy == cfg.search.cache.policy) {
		return Err(Error::Validation {
			message: "search.cache.policy must be one of lru or unbounded.".to_string(),
		});
	}
	if cfg.search.cache.policy == "lru" && cfg.search.cache.capacity == 0 {
		return Err(Error::Validation {
			message: "search.cache.capacity must be greater than zero when policy is lru."
				.to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	cfg.search.distance = cfg.search.distance.trim().to_ascii_lowercase();
	cfg.search.cache.policy = cfg.search.cache.policy.trim().to_ascii_lowercase();
	cfg.table.columns.retain(|column| !column.trim().is_empty());

	if cfg
		.lexicon
		.synonyms_path
		.as_deref()
		.map(|path| path.as_os_str().is_empty())
		.unwrap_or(false)
	{
		cfg.lexicon.synonyms_path = None;
	}
}

fn is_table_identifier(raw: &str) -> bool {
	let parts: Vec<&str> = raw.split('.').collect();

	if parts.is_empty() || parts.len() > 2 {
		return false;
	}

	parts.iter().all(|part| {
		let mut chars = part.chars();

		match chars.next() {
			Some(first) if first.is_ascii_alphabetic() || first == '_' =>
				chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_'),
			_ => false,
		}
	})
}
