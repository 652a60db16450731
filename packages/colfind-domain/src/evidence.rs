//! Keyword-overlap evidence and result annotation.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::{keywords::KeywordSet, merge::RankedColumn};

pub const DEFAULT_SNIPPET_CHARS: usize = 80;

const ELLIPSIS: &str = "...";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchEvidence {
	pub match_count: u32,
	pub matched_keywords: BTreeSet<String>,
}

/// A raw keyword-overlap row as returned by the store.
#[derive(Clone, Debug)]
pub struct KeywordMatch {
	pub column_name: String,
	pub match_count: i64,
	pub keywords: Vec<String>,
}

/// Prefilter output keyed by column name. Iteration follows the prefilter order: descending match
/// count, then column name.
#[derive(Clone, Debug, Default)]
pub struct KeywordEvidence {
	order: Vec<String>,
	by_column: HashMap<String, MatchEvidence>,
}
impl KeywordEvidence {
	pub fn from_matches<I>(query_keywords: &KeywordSet, matches: I) -> Self
	where
		I: IntoIterator<Item = KeywordMatch>,
	{
		let mut rows: Vec<(String, MatchEvidence)> = Vec::new();

		for row in matches {
			let matched_keywords: BTreeSet<String> = row
				.keywords
				.into_iter()
				.filter(|keyword| query_keywords.contains(keyword))
				.collect();
			let match_count = u32::try_from(row.match_count.max(0)).unwrap_or(u32::MAX);

			rows.push((row.column_name, MatchEvidence { match_count, matched_keywords }));
		}

		rows.sort_by(|(left_name, left), (right_name, right)| {
			right.match_count.cmp(&left.match_count).then_with(|| left_name.cmp(right_name))
		});

		let mut evidence = Self::default();

		for (column_name, entry) in rows {
			if evidence.by_column.contains_key(&column_name) {
				continue;
			}

			evidence.order.push(column_name.clone());
			evidence.by_column.insert(column_name, entry);
		}

		evidence
	}

	pub fn get(&self, column_name: &str) -> Option<&MatchEvidence> {
		self.by_column.get(column_name)
	}

	/// Column names in prefilter order. This is the scope handed to similarity search.
	pub fn column_names(&self) -> &[String] {
		&self.order
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &MatchEvidence)> {
		self.order.iter().filter_map(|name| self.by_column.get(name).map(|e| (name.as_str(), e)))
	}

	pub fn len(&self) -> usize {
		self.order.len()
	}

	pub fn is_empty(&self) -> bool {
		self.order.is_empty()
	}
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatedColumn {
	/// 1-based position in the merged ranking.
	pub rank: usize,
	pub column_name: String,
	pub description: String,
	pub snippet: String,
	pub match_count: u32,
	pub matched_keywords: BTreeSet<String>,
}

pub fn annotate(
	merged: Vec<RankedColumn>,
	evidence: &KeywordEvidence,
	snippet_chars: usize,
) -> Vec<AnnotatedColumn> {
	merged
		.into_iter()
		.enumerate()
		.map(|(idx, column)| {
			let MatchEvidence { match_count, matched_keywords } =
				evidence.get(&column.column_name).cloned().unwrap_or_default();

			AnnotatedColumn {
				rank: idx + 1,
				snippet: snippet(&column.description, snippet_chars),
				column_name: column.column_name,
				description: column.description,
				match_count,
				matched_keywords,
			}
		})
		.collect()
}

/// First `max_chars` characters of `text`, with an ellipsis appended only when something was cut.
pub fn snippet(text: &str, max_chars: usize) -> String {
	match text.char_indices().nth(max_chars) {
		Some((cut, _)) => format!("{}{ELLIPSIS}", &text[..cut]),
		None => text.to_string(),
	}
}
