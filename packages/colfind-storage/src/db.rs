use sqlx::{PgPool, Postgres, pool::PoolConnection, postgres::PgPoolOptions};

use crate::{Result, schema};

const SCHEMA_LOCK_ID: i64 = 7_120_115;

pub struct Db {
	pub pool: PgPool,
}
impl Db {
	pub async fn connect(cfg: &colfind_config::Postgres) -> Result<Self> {
		let pool =
			PgPoolOptions::new().max_connections(cfg.pool_max_conns).connect(&cfg.dsn).await?;

		Ok(Self { pool })
	}

	/// Builds the pool without opening a connection. Connections are established on first use.
	pub fn connect_lazy(cfg: &colfind_config::Postgres) -> Result<Self> {
		let pool = PgPoolOptions::new().max_connections(cfg.pool_max_conns).connect_lazy(&cfg.dsn)?;

		Ok(Self { pool })
	}

	/// Checks out one connection. It returns to the pool when dropped.
	pub async fn acquire(&self) -> Result<PoolConnection<Postgres>> {
		Ok(self.pool.acquire().await?)
	}

	pub async fn ensure_schema(&self, table: &str, vector_dim: u32) -> Result<()> {
		let sql = schema::render_schema(table, vector_dim);
		// Advisory locks are per connection; the transaction scopes the lock to one connection.
		let mut tx = self.pool.begin().await?;

		sqlx::query("SELECT pg_advisory_xact_lock($1)")
			.bind(SCHEMA_LOCK_ID)
			.execute(&mut *tx)
			.await?;

		for statement in sql.split(';') {
			let trimmed = statement.trim();

			if trimmed.is_empty() {
				continue;
			}

			sqlx::query(trimmed).execute(&mut *tx).await?;
		}

		tx.commit().await?;

		Ok(())
	}
}
