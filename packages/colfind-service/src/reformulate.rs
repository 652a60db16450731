//! LLM query reformulation into ranked column descriptions.

use std::time::Instant;

use colfind_config::Table;
use colfind_providers::completion;

use crate::{ColumnFinder, Result, cache};

const PROMPT_TEMPLATE: &str = "\
Generate short, highly technical, domain-specific descriptions of the columns of a database table \
that most likely contain the information requested by the user, using:
1. user_input: a natural language user query.
2. table_description: a description of the database table.
3. domain_name: the domain of the database.
4. all_columns: every column of the table with its data type and a sample value.

Methodology:
1. {common keywords and special terminology}: use common keywords and special terminology of the \
domain, based on prior knowledge of the domain, the table description and the user input.
2. {data type} and {structure}: infer the data type from all_columns and the structure of the \
requested data, state it explicitly and use it to guide the description (integer or double columns \
as measurements, text columns as descriptive text, categorical labels or short identifiers, \
datetime columns as temporal markers).
3. {represents}: describe what the column data means in enough detail to uniquely identify it in \
the context of the domain and table.
4. {column name}: analyse the column names, data types and samples to identify the column most \
likely to contain the requested information.
5. {relationship}: identify other columns related to that column and describe the relationship.
6. Combine 1-5 into a technical description of the next most relevant column as a single detailed \
paragraph.
7. Repeat 6 for further columns that may contain the requested information, from most to least \
likely.

Output rules for a single description:
1. Generate a single clean paragraph of text and nothing else.
2. Do not format the paragraph.
3. Do not include JSON.

Output format for a single description:
{marker} {column name} of type {data type} in {structure} describes {represents}, encompassing \
{common keywords and special terminology} and {relationship}

Full output format:
Description 1
{newline}
Description 2
{newline}
...
Description n

Context:
user_input: {{user_input}}
table_description: {{table_description}}
domain_name: {{domain_name}}
all_columns: {{all_columns}}";

pub fn build_prompt(table: &Table, marker: &str, query: &str) -> String {
	let all_columns =
		table.columns.iter().map(|column| format!("\"{column}\"")).collect::<Vec<_>>().join("\n");

	PROMPT_TEMPLATE
		.replace("{marker}", marker)
		.replace("{{table_description}}", &table.description)
		.replace("{{domain_name}}", &table.domain_name)
		.replace("{{all_columns}}", &all_columns)
		.replace("{{user_input}}", query)
}

/// Splits model output on `marker` and re-prefixes each non-empty fragment. Text before the first
/// marker is dropped.
pub fn parse_descriptions(raw: &str, marker: &str) -> Vec<String> {
	let mut fragments = raw.split(marker);

	// Preamble before the first marker.
	fragments.next();

	fragments
		.map(str::trim)
		.filter(|fragment| !fragment.is_empty())
		.map(|fragment| format!("{marker} {fragment}"))
		.collect()
}

impl ColumnFinder {
	/// Ranked column descriptions for `query`, most relevant first. Successful non-empty results
	/// are cached by exact query text.
	pub async fn reformulate(&self, query: &str) -> Result<Vec<String>> {
		let key = cache::reformulation_key(&self.cfg, query);

		if let Some(cached) = self.caches.reformulations.get(&key) {
			tracing::debug!(
				cache_kind = "reformulation",
				cache_key_prefix = cache::cache_key_prefix(&key),
				hit = true,
				"Cache hit."
			);

			return Ok(cached);
		}

		tracing::debug!(
			cache_kind = "reformulation",
			cache_key_prefix = cache::cache_key_prefix(&key),
			hit = false,
			"Cache miss."
		);

		let marker = self.cfg.search.description_marker.as_str();
		let prompt = build_prompt(&self.cfg.table, marker, query);
		let messages = vec![completion::user_message(&prompt)];
		let started = Instant::now();
		let raw = self.providers.completion.complete(&self.cfg.providers.llm, &messages).await?;
		let descriptions = parse_descriptions(raw.trim(), marker);

		tracing::info!(
			model = %self.cfg.providers.llm.model,
			descriptions = descriptions.len(),
			elapsed_ms = started.elapsed().as_millis() as u64,
			"Query reformulated."
		);

		if !descriptions.is_empty() {
			self.caches.reformulations.insert(key, descriptions.clone());
		}

		Ok(descriptions)
	}
}
