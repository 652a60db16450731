use std::{slice, time::Instant};

use futures_util::future;
use serde::{Deserialize, Serialize};
use sqlx::PgConnection;
use uuid::Uuid;

use colfind_domain::{
	evidence::{self, AnnotatedColumn, KeywordEvidence, KeywordMatch},
	keywords::KeywordSet,
	merge::{self, RankedColumn},
};
use colfind_providers::embedding;
use colfind_storage::queries;

use crate::{ColumnFinder, Error, Result, cache};

#[derive(Debug, Clone, Deserialize)]
pub struct SearchRequest {
	pub query: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStatus {
	Ok,
	NoResults,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureStage {
	Reformulation,
	Embedding,
}

/// A non-fatal provider failure. Embedding failures name the description they belong to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageFailure {
	pub stage: FailureStage,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
	pub request_id: Uuid,
	pub status: SearchStatus,
	pub keywords: KeywordSet,
	pub descriptions: Vec<String>,
	pub items: Vec<AnnotatedColumn>,
	pub failures: Vec<StageFailure>,
}
impl SearchResponse {
	fn new(request_id: Uuid, keywords: KeywordSet) -> Self {
		Self {
			request_id,
			status: SearchStatus::NoResults,
			keywords,
			descriptions: Vec::new(),
			items: Vec::new(),
			failures: Vec::new(),
		}
	}
}

impl ColumnFinder {
	pub async fn search(&self, req: SearchRequest) -> Result<SearchResponse> {
		let query = req.query.trim();

		if query.is_empty() {
			return Err(Error::EmptyQuery);
		}

		let request_id = Uuid::new_v4();
		let started = Instant::now();
		let keywords = self.normalizer.normalize([query]);
		let mut response = SearchResponse::new(request_id, keywords);

		tracing::info!(%request_id, keywords = response.keywords.len(), "Column search started.");

		// Held for the whole request and returned to the pool on drop.
		let mut conn = self.db.acquire().await?;
		let (evidence, descriptions) =
			tokio::join!(self.prefilter(&mut conn, &response.keywords), self.reformulate(query));
		let evidence = evidence?;

		tracing::info!(
			%request_id,
			prefiltered = evidence.len(),
			elapsed_ms = started.elapsed().as_millis() as u64,
			"Keyword prefilter finished."
		);

		let descriptions = match descriptions {
			Ok(descriptions) => descriptions,
			Err(err) => {
				tracing::warn!(%request_id, error = %err, "Query reformulation failed.");

				response.failures.push(StageFailure {
					stage: FailureStage::Reformulation,
					description: None,
					message: err.to_string(),
				});

				return Ok(response);
			},
		};

		if descriptions.is_empty() {
			tracing::info!(%request_id, "Reformulation produced no descriptions.");

			return Ok(response);
		}

		let vectors =
			future::join_all(descriptions.iter().map(|text| self.embed_description(text))).await;
		let mut lists = Vec::with_capacity(descriptions.len());

		for (description, vector) in descriptions.iter().zip(vectors) {
			let vector = match vector {
				Ok(vector) => vector,
				Err(err) => {
					tracing::warn!(%request_id, error = %err, "Description embedding failed.");

					response.failures.push(StageFailure {
						stage: FailureStage::Embedding,
						description: Some(description.clone()),
						message: err.to_string(),
					});

					continue;
				},
			};

			lists.push(self.similar_columns(&mut conn, &vector, evidence.column_names()).await?);
		}

		drop(conn);

		let merged = merge::merge_round_robin(&lists, self.cfg.search.max_results as usize);

		response.items =
			evidence::annotate(merged, &evidence, self.cfg.search.snippet_chars as usize);
		response.descriptions = descriptions;

		if !response.items.is_empty() {
			response.status = SearchStatus::Ok;
		}

		tracing::info!(
			%request_id,
			items = response.items.len(),
			failures = response.failures.len(),
			elapsed_ms = started.elapsed().as_millis() as u64,
			"Column search finished."
		);

		Ok(response)
	}

	/// Keyword-overlap evidence for `keywords`. An empty set never reaches the store.
	pub async fn prefilter(
		&self,
		conn: &mut PgConnection,
		keywords: &KeywordSet,
	) -> Result<KeywordEvidence> {
		if keywords.is_empty() {
			return Ok(KeywordEvidence::default());
		}

		let query_keywords: Vec<String> = keywords.iter().cloned().collect();
		let rows =
			queries::keyword_matches(conn, &self.cfg.storage.postgres.table, &query_keywords)
				.await?;
		let matches = rows.into_iter().map(|row| KeywordMatch {
			column_name: row.column_name,
			match_count: row.match_count,
			keywords: row.keywords,
		});

		Ok(KeywordEvidence::from_matches(keywords, matches))
	}

	pub async fn embed_description(&self, text: &str) -> Result<Vec<f32>> {
		let key = cache::embedding_key(&self.cfg, text);

		if let Some(cached) = self.caches.embeddings.get(&key) {
			tracing::debug!(
				cache_kind = "embedding",
				cache_key_prefix = cache::cache_key_prefix(&key),
				hit = true,
				"Cache hit."
			);

			return Ok(cached);
		}

		let cfg = &self.cfg.providers.embedding;
		let input = text.to_string();
		let mut vectors = self.providers.embedding.embed(cfg, slice::from_ref(&input)).await?;

		if vectors.len() != 1 {
			return Err(Error::Provider {
				message: format!("Expected one embedding, received {}.", vectors.len()),
			});
		}

		let vector = vectors.swap_remove(0);

		embedding::check_dimensions(&vector, cfg.dimensions)?;

		self.caches.embeddings.insert(key, vector.clone());

		Ok(vector)
	}

	async fn similar_columns(
		&self,
		conn: &mut PgConnection,
		vector: &[f32],
		scope: &[String],
	) -> Result<Vec<RankedColumn>> {
		let search = &self.cfg.search;
		let limit = if scope.is_empty() { search.unscoped_limit } else { search.scoped_limit };
		let vec_text = queries::vector_to_pg(vector);
		let hits = queries::nearest_columns(
			conn,
			&self.cfg.storage.postgres.table,
			&search.distance,
			&vec_text,
			scope,
			limit,
		)
		.await?;

		Ok(hits
			.into_iter()
			.map(|hit| RankedColumn { column_name: hit.column_name, description: hit.description })
			.collect())
	}
}
