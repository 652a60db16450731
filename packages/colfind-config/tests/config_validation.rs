use std::{
	env, fs,
	path::PathBuf,
	sync::atomic::{AtomicU64, Ordering},
	time::{SystemTime, UNIX_EPOCH},
};

use toml::Value;

use colfind_config::{Config, Error};

const SAMPLE_CONFIG_TEMPLATE_TOML: &str = include_str!("fixtures/sample_config.template.toml");

fn sample_value() -> Value {
	toml::from_str(SAMPLE_CONFIG_TEMPLATE_TOML).expect("Failed to parse template config.")
}

fn set_path(value: &mut Value, path: &[&str], leaf: Value) {
	let (last, parents) = path.split_last().expect("Path must be non-empty.");
	let mut table = value.as_table_mut().expect("Template config must be a table.");

	for key in parents {
		table = table
			.get_mut(*key)
			.and_then(Value::as_table_mut)
			.unwrap_or_else(|| panic!("Template config must include [{key}]."));
	}

	table.insert((*last).to_string(), leaf);
}

fn remove_path(value: &mut Value, path: &[&str]) {
	let (last, parents) = path.split_last().expect("Path must be non-empty.");
	let mut table = value.as_table_mut().expect("Template config must be a table.");

	for key in parents {
		table = table
			.get_mut(*key)
			.and_then(Value::as_table_mut)
			.unwrap_or_else(|| panic!("Template config must include [{key}]."));
	}

	table.remove(*last);
}

fn write_temp_config(value: &Value) -> PathBuf {
	static COUNTER: AtomicU64 = AtomicU64::new(0);

	let payload = toml::to_string(value).expect("Failed to render template config.");
	let nanos = SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.expect("System time must be valid.")
		.as_nanos();
	let ordinal = COUNTER.fetch_add(1, Ordering::SeqCst);
	let pid = std::process::id();
	let mut path = env::temp_dir();

	path.push(format!("colfind_config_test_{nanos}_{pid}_{ordinal}.toml"));

	fs::write(&path, payload).expect("Failed to write test config.");

	path
}

fn load_value(value: &Value) -> colfind_config::Result<Config> {
	let path = write_temp_config(value);
	let result = colfind_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	result
}

fn expect_validation(value: &Value, needle: &str) {
	let err = load_value(value).expect_err("Expected validation error.");

	assert!(matches!(err, Error::Validation { .. }), "Unexpected error kind: {err:?}");
	assert!(err.to_string().contains(needle), "Unexpected error message: {err}");
}

#[test]
fn sample_config_loads() {
	let cfg = load_value(&sample_value()).expect("Sample config must load.");

	assert_eq!(cfg.storage.postgres.table, "public.column_embeddings");
	assert_eq!(cfg.search.unscoped_limit, 20);
	assert_eq!(cfg.search.scoped_limit, 15);
	assert_eq!(cfg.table.columns.len(), 4);
	assert!(cfg.lexicon.synonyms_path.is_none());
}

#[test]
fn search_and_lexicon_sections_default_when_missing() {
	let mut value = sample_value();

	remove_path(&mut value, &["search"]);
	remove_path(&mut value, &["lexicon"]);
	remove_path(&mut value, &["storage", "postgres", "table"]);

	let cfg = load_value(&value).expect("Config without optional sections must load.");

	assert_eq!(cfg.search.unscoped_limit, 20);
	assert_eq!(cfg.search.scoped_limit, 15);
	assert_eq!(cfg.search.max_results, 15);
	assert_eq!(cfg.search.snippet_chars, 80);
	assert_eq!(cfg.search.distance, "cosine");
	assert_eq!(cfg.search.description_marker, "The column");
	assert_eq!(cfg.search.cache.policy, "lru");
	assert_eq!(cfg.storage.postgres.table, "column_embeddings");
	assert!(cfg.lexicon.expand_morphology);
}

#[test]
fn distance_and_policy_are_normalized() {
	let mut value = sample_value();

	set_path(&mut value, &["search", "distance"], Value::String(" L2 ".to_string()));
	set_path(&mut value, &["search", "cache", "policy"], Value::String("Unbounded".to_string()));

	let cfg = load_value(&value).expect("Config must load.");

	assert_eq!(cfg.search.distance, "l2");
	assert_eq!(cfg.search.cache.policy, "unbounded");
}

#[test]
fn llm_temperature_must_be_zero() {
	let mut value = sample_value();

	set_path(&mut value, &["providers", "llm", "temperature"], Value::Float(0.2));

	expect_validation(&value, "providers.llm.temperature must be 0.");
}

#[test]
fn embedding_dimensions_must_match_vector_dim() {
	let mut value = sample_value();

	set_path(&mut value, &["storage", "postgres", "vector_dim"], Value::Integer(768));

	expect_validation(&value, "must match storage.postgres.vector_dim");
}

#[test]
fn api_keys_must_be_non_empty() {
	let mut value = sample_value();

	set_path(&mut value, &["providers", "llm", "api_key"], Value::String("  ".to_string()));

	expect_validation(&value, "Provider llm api_key must be non-empty.");
}

#[test]
fn limits_must_be_positive() {
	for key in ["unscoped_limit", "scoped_limit", "max_results", "snippet_chars"] {
		let mut value = sample_value();

		set_path(&mut value, &["search", key], Value::Integer(0));

		expect_validation(&value, &format!("search.{key} must be greater than zero."));
	}
}

#[test]
fn unknown_distance_is_rejected() {
	let mut value = sample_value();

	set_path(&mut value, &["search", "distance"], Value::String("hamming".to_string()));

	expect_validation(&value, "search.distance must be one of");
}

#[test]
fn lru_capacity_must_be_positive() {
	let mut value = sample_value();

	set_path(&mut value, &["search", "cache", "capacity"], Value::Integer(0));

	expect_validation(&value, "search.cache.capacity must be greater than zero");

	set_path(&mut value, &["search", "cache", "policy"], Value::String("unbounded".to_string()));

	load_value(&value).expect("Unbounded policy ignores capacity.");
}

#[test]
fn table_identifier_is_validated() {
	let mut value = sample_value();

	set_path(
		&mut value,
		&["storage", "postgres", "table"],
		Value::String("column_embeddings; DROP TABLE users".to_string()),
	);

	expect_validation(&value, "storage.postgres.table must be");
}

#[test]
fn blank_columns_are_dropped_and_empty_list_rejected() {
	let mut value = sample_value();

	set_path(
		&mut value,
		&["table", "columns"],
		Value::Array(vec![Value::String(" ".to_string()), Value::String(String::new())]),
	);

	expect_validation(&value, "table.columns must be non-empty.");
}

#[test]
fn missing_file_reports_read_error() {
	let path = env::temp_dir().join("colfind_config_missing_file.toml");
	let err = colfind_config::load(&path).expect_err("Expected read error.");

	assert!(matches!(err, Error::ReadConfig { .. }));
}
