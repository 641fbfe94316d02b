//! Unit tests for the SqlBuilder query construction.

use duckdb::types::Value;
use weather_almanac::SqlBuilder;

#[test]
fn new_creates_select_star_from_table() {
    let (sql, params) = SqlBuilder::new("weather_5_years").build();
    assert_eq!(sql, "SELECT *\nFROM weather_5_years");
    assert!(params.is_empty());
}

#[test]
fn select_replaces_default_star() {
    let (sql, _) = SqlBuilder::new("weather_5_years")
        .select(&["COUNT(*) AS cnt"])
        .build();
    assert!(sql.starts_with("SELECT COUNT(*) AS cnt\n"));
}

#[test]
fn where_eq_conditions_are_anded_in_order() {
    let (sql, params) = SqlBuilder::new("weather_5_years")
        .where_eq("latitude", Value::Double(38.889722))
        .where_eq("year", Value::Int(2024))
        .build();
    assert!(sql.contains("WHERE latitude = ? AND year = ?"));
    assert_eq!(params, vec![Value::Double(38.889722), Value::Int(2024)]);
}

#[test]
fn order_and_limit_are_appended_last() {
    let (sql, params) = SqlBuilder::new("weather_5_years")
        .where_eq("year", Value::Int(2024))
        .order_by(&["id DESC"])
        .limit(1)
        .build();
    assert_eq!(
        sql,
        "SELECT *\nFROM weather_5_years\nWHERE year = ?\nORDER BY id DESC\nLIMIT 1"
    );
    assert_eq!(params, vec![Value::Int(2024)]);
}
