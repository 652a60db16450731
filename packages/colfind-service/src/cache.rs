//! In-process result caches keyed by blake3 content hashes.

use std::{num::NonZeroUsize, sync::Mutex};

use lru::LruCache;
use serde_json::Value;

use colfind_config::{Config, SearchCache};

const KEY_PREFIX_LEN: usize = 12;

pub struct TextCache<V> {
	entries: Mutex<LruCache<String, V>>,
}
impl<V> TextCache<V>
where
	V: Clone,
{
	pub fn from_config(cfg: &SearchCache) -> Self {
		let entries = match (cfg.policy.as_str(), NonZeroUsize::new(cfg.capacity as usize)) {
			("lru", Some(capacity)) => LruCache::new(capacity),
			_ => LruCache::unbounded(),
		};

		Self { entries: Mutex::new(entries) }
	}

	pub fn get(&self, key: &str) -> Option<V> {
		let mut entries = self.entries.lock().unwrap_or_else(|err| err.into_inner());

		entries.get(key).cloned()
	}

	pub fn insert(&self, key: String, value: V) {
		let mut entries = self.entries.lock().unwrap_or_else(|err| err.into_inner());

		entries.put(key, value);
	}

	pub fn len(&self) -> usize {
		self.entries.lock().unwrap_or_else(|err| err.into_inner()).len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

pub fn reformulation_key(cfg: &Config, query: &str) -> String {
	let llm = &cfg.providers.llm;
	let payload = serde_json::json!({
		"kind": "reformulation",
		"query": query,
		"provider_id": llm.provider_id,
		"model": llm.model,
		"temperature": llm.temperature,
		"domain_name": cfg.table.domain_name,
		"table_description": cfg.table.description,
		"columns": cfg.table.columns,
		"marker": cfg.search.description_marker,
	});

	hash_cache_key(&payload)
}

pub fn embedding_key(cfg: &Config, text: &str) -> String {
	let embedding = &cfg.providers.embedding;
	let payload = serde_json::json!({
		"kind": "embedding",
		"text": text,
		"provider_id": embedding.provider_id,
		"model": embedding.model,
		"dimensions": embedding.dimensions,
	});

	hash_cache_key(&payload)
}

pub fn cache_key_prefix(key: &str) -> &str {
	&key[..key.len().min(KEY_PREFIX_LEN)]
}

fn hash_cache_key(payload: &Value) -> String {
	blake3::hash(payload.to_string().as_bytes()).to_hex().to_string()
}
