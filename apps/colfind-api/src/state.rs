use std::sync::Arc;

use colfind_service::ColumnFinder;
use colfind_storage::db::Db;

#[derive(Clone)]
pub struct AppState {
	pub finder: Arc<ColumnFinder>,
}
impl AppState {
	pub async fn new(config: colfind_config::Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres).await?;

		db.ensure_schema(&config.storage.postgres.table, config.storage.postgres.vector_dim)
			.await?;

		Ok(Self::from_finder(ColumnFinder::new(config, db)?))
	}

	pub fn from_finder(finder: ColumnFinder) -> Self {
		Self { finder: Arc::new(finder) }
	}
}
