//! Shared test utilities for integration tests

#![allow(dead_code)]

use shopdal::{parser, Context, Schema, SqliteConnection};

/// Language with partial translations in the fixture database
pub const GERMAN: &str = "b7d2554b0ce847cd82f3ac9bd1c0dfca";

/// Install a test logger; repeated calls are ignored
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Load a schema fixture from the tests/test_data directory
pub fn load_fixture(name: &str) -> Schema {
    let path = format!("tests/test_data/{}", name);
    parser::parse_file(&path)
        .unwrap_or_else(|e| panic!("Failed to load test data {}: {}", name, e))
}

/// Fresh in-memory database seeded from tests/test_data/shop.sql
pub fn shop_connection() -> SqliteConnection {
    init_logging();
    let sql = std::fs::read_to_string("tests/test_data/shop.sql")
        .unwrap_or_else(|e| panic!("Failed to read shop.sql: {}", e));
    let conn = SqliteConnection::open_in_memory().expect("open in-memory database");
    conn.execute_batch(&sql).expect("seed fixture database");
    conn
}

/// Schema and seeded connection for the shop fixtures
pub fn shop() -> (Schema, SqliteConnection) {
    (load_fixture("shop.yaml"), shop_connection())
}

pub fn german() -> Context {
    Context::new(GERMAN)
}

pub fn ids(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

/// Compare floats produced by SQL averages
pub fn assert_close(actual: Option<f64>, expected: f64) {
    let actual = actual.unwrap_or_else(|| panic!("expected {}, got None", expected));
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {}, got {}",
        expected,
        actual
    );
}
