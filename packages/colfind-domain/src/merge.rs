use std::collections::HashSet;

use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_RESULTS: usize = 15;

/// One similarity hit. Lists of these are ordered nearest first.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedColumn {
	pub column_name: String,
	pub description: String,
}

/// Interleaves ranked lists round-robin, keeping the first occurrence of each column and stopping
/// as soon as `cap` entries are collected.
pub fn merge_round_robin(lists: &[Vec<RankedColumn>], cap: usize) -> Vec<RankedColumn> {
	let max_len = lists.iter().map(Vec::len).max().unwrap_or(0);
	let mut seen = HashSet::new();
	let mut out = Vec::new();

	if cap == 0 {
		return out;
	}

	'ranks: for rank in 0..max_len {
		for list in lists {
			let Some(column) = list.get(rank) else {
				continue;
			};

			if !seen.insert(column.column_name.as_str()) {
				continue;
			}

			out.push(column.clone());

			if out.len() >= cap {
				break 'ranks;
			}
		}
	}

	out
}
