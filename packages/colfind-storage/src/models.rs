/// One row of column metadata. `embedding` is only written, never read back.
#[derive(Debug, Clone)]
pub struct ColumnRecord {
	pub column_name: String,
	pub description: String,
	pub embedding: Vec<f32>,
	pub keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ColumnHit {
	pub column_name: String,
	pub description: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct KeywordMatchRow {
	pub column_name: String,
	pub match_count: i64,
	pub keywords: Vec<String>,
}
