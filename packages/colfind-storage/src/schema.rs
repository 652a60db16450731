const INIT_SQL: &str = include_str!("../../../sql/init.sql");

/// Renders the bootstrap script for `table`. The table name must already be a validated
/// identifier; it is interpolated verbatim.
pub fn render_schema(table: &str, vector_dim: u32) -> String {
	INIT_SQL
		.replace("<TABLE>", table)
		.replace("<INDEX_PREFIX>", &index_prefix(table))
		.replace("<VECTOR_DIM>", &vector_dim.to_string())
}

fn index_prefix(table: &str) -> String {
	table.rsplit('.').next().unwrap_or(table).to_string()
}
