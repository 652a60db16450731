use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre;

use colfind_domain::evidence::AnnotatedColumn;
use colfind_service::{ColumnFinder, FailureStage, SearchRequest, SearchResponse, SearchStatus};
use colfind_storage::db::Db;

const HEADERS: [&str; 5] = ["Rank", "Column", "Description", "Matches", "Matched keywords"];

/// Runs one column search and prints the ranked columns.
#[derive(Debug, Parser)]
#[command(
	version = colfind_cli::VERSION,
	rename_all = "kebab",
	styles = colfind_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
	/// Print the full response as JSON instead of a table.
	#[arg(long)]
	pub json: bool,
	#[arg(value_name = "QUERY", num_args = 1.., required = true)]
	pub query: Vec<String>,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = colfind_config::load(&args.config)?;
	colfind_cli::init_tracing(&config.service.log_level);

	let query = args.query.join(" ");

	if query.trim().is_empty() {
		return Err(eyre::eyre!("Query must be non-empty."));
	}

	let db = Db::connect(&config.storage.postgres).await?;
	let finder = ColumnFinder::new(config, db)?;
	let response = finder.search(SearchRequest { query }).await?;

	finder.db.pool.close().await;

	if args.json {
		println!("{}", serde_json::to_string_pretty(&response)?);
	} else {
		print!("{}", render(&response));
	}

	Ok(())
}

/// Plain-text rendering: a fixed-width table of results followed by any stage failures.
pub fn render(response: &SearchResponse) -> String {
	let mut out = String::new();

	if response.status == SearchStatus::NoResults {
		out.push_str("No matching columns found.\n");
	} else {
		out.push_str(&render_table(&response.items));
	}

	for failure in &response.failures {
		let stage = match failure.stage {
			FailureStage::Reformulation => "reformulation",
			FailureStage::Embedding => "embedding",
		};
		let line = match failure.description.as_deref() {
			Some(description) =>
				format!("warning: {stage} failed for {description:?}: {}\n", failure.message),
			None => format!("warning: {stage} failed: {}\n", failure.message),
		};

		out.push_str(&line);
	}

	out
}

fn render_table(items: &[AnnotatedColumn]) -> String {
	let rows: Vec<[String; 5]> = items
		.iter()
		.map(|item| {
			[
				item.rank.to_string(),
				item.column_name.clone(),
				item.snippet.clone(),
				item.match_count.to_string(),
				item.matched_keywords.iter().cloned().collect::<Vec<_>>().join(", "),
			]
		})
		.collect();
	let mut widths = HEADERS.map(|header| header.chars().count());

	for row in &rows {
		for (width, cell) in widths.iter_mut().zip(row) {
			*width = (*width).max(cell.chars().count());
		}
	}

	let mut out = String::new();

	push_row(&mut out, &HEADERS.map(str::to_string), &widths);
	push_row(&mut out, &widths.map(|width| "-".repeat(width)), &widths);

	for row in &rows {
		push_row(&mut out, row, &widths);
	}

	out
}

fn push_row(out: &mut String, cells: &[String; 5], widths: &[usize; 5]) {
	let line = cells
		.iter()
		.zip(widths)
		.map(|(cell, &width)| format!("{cell:<width$}"))
		.collect::<Vec<_>>()
		.join("  ");

	out.push_str(line.trim_end());
	out.push('\n');
}

#[cfg(test)]
mod tests {
	use std::collections::BTreeSet;

	use uuid::Uuid;

	use colfind_service::StageFailure;

	use super::*;

	fn response(items: Vec<AnnotatedColumn>, failures: Vec<StageFailure>) -> SearchResponse {
		let status = if items.is_empty() { SearchStatus::NoResults } else { SearchStatus::Ok };

		SearchResponse {
			request_id: Uuid::nil(),
			status,
			keywords: BTreeSet::new(),
			descriptions: Vec::new(),
			items,
			failures,
		}
	}

	#[test]
	fn renders_aligned_table() {
		let item = AnnotatedColumn {
			rank: 1,
			column_name: "state".to_string(),
			description: "The column state holds the US state.".to_string(),
			snippet: "The column state holds the US state.".to_string(),
			match_count: 1,
			matched_keywords: ["massachusetts".to_string()].into_iter().collect(),
		};
		let rendered = render(&response(vec![item], Vec::new()));
		let lines: Vec<&str> = rendered.lines().collect();

		assert_eq!(lines.len(), 3);
		assert!(lines[0].starts_with("Rank  Column  Description"));
		assert!(lines[1].starts_with("----  ------  -----"));
		assert!(lines[2].starts_with("1     state   The column state holds the US state."));
		assert!(lines[2].ends_with("massachusetts"));
	}

	#[test]
	fn renders_embedding_failures_with_their_description() {
		let failure = StageFailure {
			stage: FailureStage::Embedding,
			description: Some("The column notes.".to_string()),
			message: "Provider error: rejected".to_string(),
		};
		let rendered = render(&response(Vec::new(), vec![failure]));

		assert!(rendered.ends_with(
			"warning: embedding failed for \"The column notes.\": Provider error: rejected\n"
		));
	}

	#[test]
	fn renders_no_results_with_failures() {
		let failure = StageFailure {
			stage: FailureStage::Reformulation,
			description: None,
			message: "Provider error: timed out".to_string(),
		};
		let rendered = render(&response(Vec::new(), vec![failure]));

		assert_eq!(
			rendered,
			"No matching columns found.\nwarning: reformulation failed: Provider error: timed out\n"
		);
	}
}
