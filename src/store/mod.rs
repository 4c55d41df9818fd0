//! Fixed read-only table store.
//!
//! The store is created once at process start and never mutated, so it can
//! be shared across arbitrarily many concurrent callers without locking.

use crate::types::Record;
use serde_json::{json, Value};
use std::collections::HashMap;

/// Named collections of records, read-only after construction.
#[derive(Debug, Clone)]
pub struct TableStore {
    tables: HashMap<String, Vec<Record>>,
}

impl TableStore {
    /// Build a store from pre-assembled tables.
    pub fn from_tables(tables: HashMap<String, Vec<Record>>) -> Self {
        Self { tables }
    }

    /// Build the reference dataset: 5 users, 5 products, 5 orders.
    ///
    /// Category values are stored lowercase to match the normalized form
    /// the intent extractor produces.
    pub fn seeded() -> Self {
        let users = rows(vec![
            json!({"id": 1, "name": "Alice", "email": "alice@example.com", "age": 25, "join_date": "2024-02-15"}),
            json!({"id": 2, "name": "Bob", "email": "bob@example.com", "age": 30, "join_date": "2024-03-01"}),
            json!({"id": 3, "name": "Charlie", "email": "charlie@example.com", "age": 35, "join_date": "2023-12-20"}),
            json!({"id": 4, "name": "David", "email": "david@example.com", "age": 28, "join_date": "2024-01-10"}),
            json!({"id": 5, "name": "Emma", "email": "emma@example.com", "age": 22, "join_date": "2024-02-28"}),
        ]);

        let products = rows(vec![
            json!({"id": 101, "name": "Laptop", "category": "electronics", "price": 1200, "stock": 10}),
            json!({"id": 102, "name": "Phone", "category": "electronics", "price": 800, "stock": 5}),
            json!({"id": 103, "name": "Tablet", "category": "electronics", "price": 500, "stock": 7}),
            json!({"id": 104, "name": "Keyboard", "category": "accessories", "price": 50, "stock": 20}),
            json!({"id": 105, "name": "Mouse", "category": "accessories", "price": 25, "stock": 15}),
        ]);

        let orders = rows(vec![
            json!({"id": 1001, "user_id": 1, "product_id": 101, "quantity": 1, "order_date": "2024-03-05"}),
            json!({"id": 1002, "user_id": 2, "product_id": 102, "quantity": 2, "order_date": "2024-03-10"}),
            json!({"id": 1003, "user_id": 3, "product_id": 103, "quantity": 1, "order_date": "2024-02-25"}),
            json!({"id": 1004, "user_id": 4, "product_id": 104, "quantity": 3, "order_date": "2024-01-15"}),
            json!({"id": 1005, "user_id": 5, "product_id": 105, "quantity": 5, "order_date": "2024-02-28"}),
        ]);

        let mut tables = HashMap::new();
        tables.insert("users".to_string(), users);
        tables.insert("products".to_string(), products);
        tables.insert("orders".to_string(), orders);
        Self { tables }
    }

    /// Get the rows of a table by name.
    pub fn get(&self, name: &str) -> Option<&[Record]> {
        self.tables.get(name).map(|rows| rows.as_slice())
    }

    /// Check whether a table exists.
    pub fn contains(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    /// Names of all tables in the store.
    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(|k| k.as_str())
    }
}

fn rows(values: Vec<Value>) -> Vec<Record> {
    values
        .into_iter()
        .filter_map(|v| v.as_object().cloned())
        .collect()
}
