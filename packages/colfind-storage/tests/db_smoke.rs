use colfind_config::Postgres;
use colfind_storage::{
	db::Db,
	models::ColumnRecord,
	queries::{self, vector_to_pg},
};
use colfind_testkit::TestDatabase;

const TABLE: &str = "column_embeddings";
const DIM: u32 = 4;

fn postgres_cfg(dsn: &str) -> Postgres {
	Postgres { dsn: dsn.to_string(), pool_max_conns: 2, table: TABLE.to_string(), vector_dim: DIM }
}

fn record(name: &str, axis: usize, keywords: &[&str]) -> ColumnRecord {
	ColumnRecord {
		column_name: name.to_string(),
		description: format!("The column {name} stores sample data."),
		embedding: colfind_testkit::axis_vector(DIM as usize, axis),
		keywords: keywords.iter().map(|k| k.to_string()).collect(),
	}
}

async fn seeded_db(test_db: &TestDatabase) -> Db {
	let db = Db::connect(&postgres_cfg(test_db.dsn())).await.expect("Failed to connect to Postgres.");

	db.ensure_schema(TABLE, DIM).await.expect("Failed to ensure schema.");

	for column in [
		record("gmp_status", 0, &["gmp", "status", "approved"]),
		record("site_state", 1, &["state", "massachusetts", "ma"]),
		record("site_city", 2, &["city", "boston", "state"]),
		record("company_name", 3, &["company", "name"]),
	] {
		queries::upsert_column(&db.pool, TABLE, &column).await.expect("Failed to upsert column.");
	}

	db
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set COLFIND_PG_DSN to run."]
async fn bootstrap_is_idempotent() {
	let Some(base_dsn) = colfind_testkit::env_dsn() else {
		eprintln!("Skipping bootstrap_is_idempotent; set COLFIND_PG_DSN to run this test.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let db = Db::connect(&postgres_cfg(test_db.dsn())).await.expect("Failed to connect to Postgres.");

	db.ensure_schema(TABLE, DIM).await.expect("Failed to ensure schema.");
	db.ensure_schema(TABLE, DIM).await.expect("Failed to re-run schema.");

	let count: i64 = sqlx::query_scalar(
		"SELECT count(*) FROM information_schema.tables WHERE table_name = 'column_embeddings'",
	)
	.fetch_one(&db.pool)
	.await
	.expect("Failed to query schema tables.");

	assert_eq!(count, 1);

	db.pool.close().await;
	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set COLFIND_PG_DSN to run."]
async fn keyword_matches_order_by_overlap() {
	let Some(base_dsn) = colfind_testkit::env_dsn() else {
		eprintln!("Skipping keyword_matches_order_by_overlap; set COLFIND_PG_DSN to run this test.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let db = seeded_db(&test_db).await;
	let mut conn = db.acquire().await.expect("Failed to acquire connection.");
	let query = vec!["state".to_string(), "massachusetts".to_string(), "gmp".to_string()];
	let rows =
		queries::keyword_matches(&mut conn, TABLE, &query).await.expect("Failed to match keywords.");
	let ranked: Vec<(&str, i64)> =
		rows.iter().map(|row| (row.column_name.as_str(), row.match_count)).collect();

	assert_eq!(ranked, vec![("site_state", 2), ("gmp_status", 1), ("site_city", 1)]);

	let empty = queries::keyword_matches(&mut conn, TABLE, &[]).await.expect("Failed on empty.");

	assert!(empty.is_empty());

	drop(conn);
	db.pool.close().await;
	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set COLFIND_PG_DSN to run."]
async fn nearest_columns_respect_scope_and_limit() {
	let Some(base_dsn) = colfind_testkit::env_dsn() else {
		eprintln!(
			"Skipping nearest_columns_respect_scope_and_limit; set COLFIND_PG_DSN to run this test."
		);

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let db = seeded_db(&test_db).await;
	let mut conn = db.acquire().await.expect("Failed to acquire connection.");
	let target = vector_to_pg(&colfind_testkit::blended_vector(DIM as usize, 1, 2, 0.5));
	let unscoped = queries::nearest_columns(&mut conn, TABLE, "cosine", &target, &[], 2)
		.await
		.expect("Failed to run unscoped search.");
	let names: Vec<&str> = unscoped.iter().map(|hit| hit.column_name.as_str()).collect();

	assert_eq!(names, vec!["site_state", "site_city"]);

	let scope = vec!["gmp_status".to_string(), "site_city".to_string()];
	let scoped = queries::nearest_columns(&mut conn, TABLE, "cosine", &target, &scope, 15)
		.await
		.expect("Failed to run scoped search.");
	let names: Vec<&str> = scoped.iter().map(|hit| hit.column_name.as_str()).collect();

	assert_eq!(names, vec!["site_city", "gmp_status"]);

	drop(conn);
	db.pool.close().await;
	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set COLFIND_PG_DSN to run."]
async fn duplicate_keywords_count_once() {
	let Some(base_dsn) = colfind_testkit::env_dsn() else {
		eprintln!("Skipping duplicate_keywords_count_once; set COLFIND_PG_DSN to run this test.");

		return;
	};

	colfind_testkit::with_test_db(&base_dsn, |test_db| {
		let dsn = test_db.dsn().to_string();

		async move {
			let db = Db::connect(&postgres_cfg(&dsn)).await.expect("Failed to connect to Postgres.");

			db.ensure_schema(TABLE, DIM).await.expect("Failed to ensure schema.");

			let column = record("site_state", 1, &["MA", "ma", "massachusetts", "ma"]);

			queries::upsert_column(&db.pool, TABLE, &column).await.expect("Failed to upsert column.");

			let mut conn = db.acquire().await.expect("Failed to acquire connection.");
			let rows = queries::keyword_matches(&mut conn, TABLE, &["ma".to_string()])
				.await
				.expect("Failed to match keywords.");

			assert_eq!(rows.len(), 1);
			assert_eq!(rows[0].match_count, 1);
			assert_eq!(rows[0].keywords, vec!["ma".to_string(), "massachusetts".to_string()]);

			drop(conn);
			db.pool.close().await;

			Ok(())
		}
	})
	.await
	.expect("Failed to run against a test database.");
}
