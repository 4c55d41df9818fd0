//! End-to-end tests of the text → intent → plan → result pipeline.

use askdb::engine::{QueryEngine, NOT_UNDERSTOOD};
use askdb::exec::QueryResult;
use askdb::store::TableStore;
use std::sync::Arc;

fn engine() -> QueryEngine {
    QueryEngine::new(Arc::new(TableStore::seeded())).unwrap()
}

fn rows(result: &QueryResult) -> &[serde_json::Map<String, serde_json::Value>] {
    match result {
        QueryResult::Rows { rows, .. } => rows,
        QueryResult::Scalar { .. } => panic!("expected rows"),
    }
}

fn scalar(result: &QueryResult) -> f64 {
    match result {
        QueryResult::Scalar { scalar, .. } => *scalar,
        QueryResult::Rows { .. } => panic!("expected scalar"),
    }
}

#[test]
fn select_products_returns_five_rows() {
    let response = engine().handle_query("list all products");
    assert!(response.success);
    assert_eq!(response.translated_query, "SELECT * FROM products");

    let result = response.result.unwrap();
    assert_eq!(result.count(), 5);
    assert_eq!(rows(&result).len(), 5);
}

#[test]
fn average_price_is_515() {
    let response = engine().handle_query("average price");
    assert!(response.success);
    assert_eq!(scalar(&response.result.unwrap()), 515.0);
}

#[test]
fn revenue_is_3575() {
    let engine = engine();
    for query in ["total sales", "what was the revenue last month"] {
        let response = engine.handle_query(query);
        assert!(response.success, "query: {}", query);
        assert_eq!(scalar(&response.result.unwrap()), 3575.0, "query: {}", query);
    }
}

#[test]
fn category_electronics_filter() {
    let response = engine().handle_query("show products with category electronics");
    assert!(response.success);
    assert_eq!(
        response.translated_query,
        "SELECT * FROM products WHERE category = electronics"
    );

    let result = response.result.unwrap();
    assert_eq!(result.count(), 3);
    for row in rows(&result) {
        assert_eq!(row["category"], "electronics");
    }
}

#[test]
fn stock_less_than_10_matches_phone_and_tablet() {
    let response = engine().handle_query("stock less than 10");
    assert!(response.success);

    let result = response.result.unwrap();
    let names: Vec<&str> = rows(&result)
        .iter()
        .filter_map(|r| r.get("name").and_then(|v| v.as_str()))
        .collect();
    assert_eq!(names, vec!["Phone", "Tablet"]);
}

#[test]
fn equivalent_phrasings_share_one_translation() {
    let engine = engine();
    let reference = engine.handle_query("price greater than 100");
    for query in ["price more than 100", "price above 100", "price > 100"] {
        let response = engine.handle_query(query);
        assert_eq!(
            response.translated_query, reference.translated_query,
            "query: {}",
            query
        );
        assert_eq!(response.result, reference.result, "query: {}", query);
    }
}

#[test]
fn gibberish_is_rejected_and_infeasible() {
    let engine = engine();

    let response = engine.handle_query("asdkjhasd");
    assert!(!response.success);
    assert_eq!(response.message.as_deref(), Some(NOT_UNDERSTOOD));

    let feasibility = engine.validate_query("asdkjhasd");
    assert!(!feasibility.feasible);
}

#[test]
fn unknown_field_falls_back_to_table_default() {
    // "popularity" is in no candidate list; the plan still resolves to
    // the products default field instead of failing.
    let plan = engine().plan("show popularity of products");
    assert_eq!(plan.table.as_deref(), Some("products"));
    assert_eq!(plan.field.as_deref(), Some("price"));
}

#[test]
fn pipeline_is_deterministic() {
    let engine = engine();
    for query in ["average price", "stock less than 10", "total sales", "list users"] {
        let a = engine.handle_query(query);
        let b = engine.handle_query(query);
        assert_eq!(a.result, b.result, "query: {}", query);
        assert_eq!(a.translated_query, b.translated_query, "query: {}", query);
    }
}
