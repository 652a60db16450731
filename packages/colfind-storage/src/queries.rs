use std::collections::BTreeSet;

use sqlx::{PgConnection, PgExecutor};

use crate::{
	Error, Result,
	models::{ColumnHit, ColumnRecord, KeywordMatchRow},
};

/// pgvector operator for a configured distance name.
pub fn distance_operator(distance: &str) -> Result<&'static str> {
	match distance {
		"cosine" => Ok("<=>"),
		"l2" => Ok("<->"),
		"inner_product" => Ok("<#>"),
		other => Err(Error::InvalidArgument(format!("Unknown distance {other:?}."))),
	}
}

pub fn vector_to_pg(vec: &[f32]) -> String {
	let mut out = String::with_capacity(vec.len() * 8);

	out.push('[');

	for (i, value) in vec.iter().enumerate() {
		if i > 0 {
			out.push(',');
		}

		out.push_str(&value.to_string());
	}

	out.push(']');

	out
}

/// Columns whose stored keywords overlap `keywords`, most overlaps first. An empty input skips the
/// round-trip.
pub async fn keyword_matches(
	conn: &mut PgConnection,
	table: &str,
	keywords: &[String],
) -> Result<Vec<KeywordMatchRow>> {
	if keywords.is_empty() {
		return Ok(Vec::new());
	}

	let sql = format!(
		"\
SELECT
	column_name,
	(SELECT count(*) FROM unnest(keywords) k WHERE k = ANY($1)) AS match_count,
	keywords
FROM {table}
WHERE keywords && $1
ORDER BY match_count DESC, column_name ASC"
	);
	let rows = sqlx::query_as::<_, KeywordMatchRow>(&sql).bind(keywords).fetch_all(conn).await?;

	Ok(rows)
}

/// Nearest columns to `vec_text` (a pgvector literal). A non-empty `scope` restricts the search to
/// those column names.
pub async fn nearest_columns(
	conn: &mut PgConnection,
	table: &str,
	distance: &str,
	vec_text: &str,
	scope: &[String],
	limit: u32,
) -> Result<Vec<ColumnHit>> {
	let op = distance_operator(distance)?;
	let limit = i64::from(limit);
	let rows = if scope.is_empty() {
		let sql = format!(
			"\
SELECT column_name, description
FROM {table}
ORDER BY embedding {op} $1::text::vector, column_name ASC
LIMIT $2"
		);

		sqlx::query_as::<_, ColumnHit>(&sql).bind(vec_text).bind(limit).fetch_all(conn).await?
	} else {
		let sql = format!(
			"\
SELECT column_name, description
FROM {table}
WHERE column_name = ANY($2)
ORDER BY embedding {op} $1::text::vector, column_name ASC
LIMIT $3"
		);

		sqlx::query_as::<_, ColumnHit>(&sql)
			.bind(vec_text)
			.bind(scope)
			.bind(limit)
			.fetch_all(conn)
			.await?
	};

	Ok(rows)
}

pub async fn upsert_column<'e, E>(executor: E, table: &str, record: &ColumnRecord) -> Result<()>
where
	E: PgExecutor<'e>,
{
	let sql = format!(
		"\
INSERT INTO {table} (column_name, description, embedding, keywords)
VALUES ($1, $2, $3::text::vector, $4)
ON CONFLICT (column_name) DO UPDATE
SET
	description = EXCLUDED.description,
	embedding = EXCLUDED.embedding,
	keywords = EXCLUDED.keywords"
	);

	sqlx::query(&sql)
		.bind(record.column_name.as_str())
		.bind(record.description.as_str())
		.bind(vector_to_pg(&record.embedding))
		.bind(stored_keywords(&record.keywords))
		.execute(executor)
		.await?;

	Ok(())
}

/// Lowercased, trimmed and deduplicated keywords in sorted order. Duplicates would inflate the
/// overlap count computed over `unnest(keywords)`.
pub fn stored_keywords(keywords: &[String]) -> Vec<String> {
	keywords
		.iter()
		.map(|keyword| keyword.trim().to_lowercase())
		.filter(|keyword| !keyword.is_empty())
		.collect::<BTreeSet<_>>()
		.into_iter()
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn maps_distance_names() {
		assert_eq!(distance_operator("cosine").ok(), Some("<=>"));
		assert_eq!(distance_operator("l2").ok(), Some("<->"));
		assert_eq!(distance_operator("inner_product").ok(), Some("<#>"));
		assert!(distance_operator("manhattan").is_err());
	}

	#[test]
	fn formats_vector_literal() {
		assert_eq!(vector_to_pg(&[0.5, -1.0, 2.25]), "[0.5,-1,2.25]");
		assert_eq!(vector_to_pg(&[]), "[]");
	}

	#[test]
	fn stored_keywords_form_a_lowercase_set() {
		let keywords = ["MA", "ma", " Massachusetts ", "", "ma"].map(str::to_string);

		assert_eq!(stored_keywords(&keywords), vec!["ma".to_string(), "massachusetts".to_string()]);
	}
}
