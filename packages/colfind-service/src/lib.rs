pub mod cache;
pub mod reformulate;
pub mod search;

mod error;

pub use error::{Error, Result};
pub use search::{FailureStage, SearchRequest, SearchResponse, SearchStatus, StageFailure};

use std::{future::Future, pin::Pin, sync::Arc};

use serde_json::Value;

use colfind_config::{Config, EmbeddingProviderConfig, LlmProviderConfig};
use colfind_domain::{
	keywords::Normalizer,
	lexicon::{NoThesaurus, SynonymTable, Thesaurus},
};
use colfind_providers::{completion, embedding};
use colfind_storage::db::Db;

use crate::cache::TextCache;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait EmbeddingProvider
where
	Self: Send + Sync,
{
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<Vec<Vec<f32>>>>;
}

pub trait CompletionProvider
where
	Self: Send + Sync,
{
	fn complete<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		messages: &'a [Value],
	) -> BoxFuture<'a, color_eyre::Result<String>>;
}

#[derive(Clone)]
pub struct Providers {
	pub embedding: Arc<dyn EmbeddingProvider>,
	pub completion: Arc<dyn CompletionProvider>,
}
impl Providers {
	pub fn new(
		embedding: Arc<dyn EmbeddingProvider>,
		completion: Arc<dyn CompletionProvider>,
	) -> Self {
		Self { embedding, completion }
	}
}
impl Default for Providers {
	fn default() -> Self {
		let provider = Arc::new(DefaultProviders);

		Self { embedding: provider.clone(), completion: provider }
	}
}

/// Process-lifetime caches keyed by content hashes.
pub struct Caches {
	pub reformulations: TextCache<Vec<String>>,
	pub embeddings: TextCache<Vec<f32>>,
}
impl Caches {
	pub fn from_config(cfg: &colfind_config::SearchCache) -> Self {
		Self {
			reformulations: TextCache::from_config(cfg),
			embeddings: TextCache::from_config(cfg),
		}
	}
}

pub struct ColumnFinder {
	pub cfg: Config,
	pub db: Db,
	pub providers: Providers,
	pub normalizer: Normalizer,
	pub caches: Caches,
}
impl ColumnFinder {
	pub fn new(cfg: Config, db: Db) -> Result<Self> {
		Self::with_providers(cfg, db, Providers::default())
	}

	pub fn with_providers(cfg: Config, db: Db, providers: Providers) -> Result<Self> {
		let normalizer = build_normalizer(&cfg.lexicon)?;
		let caches = Caches::from_config(&cfg.search.cache);

		Ok(Self { cfg, db, providers, normalizer, caches })
	}
}

struct DefaultProviders;
impl EmbeddingProvider for DefaultProviders {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<Vec<Vec<f32>>>> {
		Box::pin(embedding::embed(cfg, texts))
	}
}
impl CompletionProvider for DefaultProviders {
	fn complete<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		messages: &'a [Value],
	) -> BoxFuture<'a, color_eyre::Result<String>> {
		Box::pin(completion::complete(cfg, messages))
	}
}

fn build_normalizer(cfg: &colfind_config::Lexicon) -> Result<Normalizer> {
	let thesaurus: Arc<dyn Thesaurus> = match cfg.synonyms_path.as_deref() {
		Some(path) => {
			let table = SynonymTable::load(path).map_err(|err| Error::InvalidConfig {
				message: format!("Failed to read synonym table {}: {err}.", path.display()),
			})?;

			tracing::info!(path = %path.display(), synsets = table.len(), "Synonym table loaded.");

			Arc::new(table)
		},
		None => Arc::new(NoThesaurus),
	};

	Ok(Normalizer::new(thesaurus, cfg.expand_morphology))
}
