//! Plan execution against the table store.
//!
//! Execution applies filter/aggregate/select semantics over the read-only
//! store. Runtime faults (missing fields, non-numeric operands) surface as
//! structured [`QueryError`] values rather than panics.

use crate::intent::{AggregateOp, Comparator, JoinSpec};
use crate::plan::{Plan, PlanKind};
use crate::store::TableStore;
use crate::types::record::as_number;
use crate::types::{QueryError, Record, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Result of executing a plan: a row set or a scalar, plus a count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryResult {
    Rows { rows: Vec<Record>, count: usize },
    Scalar { scalar: f64, count: usize },
}

impl QueryResult {
    /// Row count for row sets, 1 for scalars.
    pub fn count(&self) -> usize {
        match self {
            QueryResult::Rows { count, .. } => *count,
            QueryResult::Scalar { count, .. } => *count,
        }
    }
}

/// Run a plan against the store.
///
/// # Errors
///
/// - `QueryError::TableNotFound` when the plan references an absent table
/// - `QueryError::UnsupportedQueryType` for unknown or malformed plans
/// - `QueryError::Execution` for faults while evaluating a condition or
///   aggregate (missing field, non-numeric operand)
/// - `QueryError::EmptyAggregate` for AVG over a table with no rows
pub fn execute(plan: &Plan, store: &TableStore) -> Result<QueryResult> {
    if plan.kind == PlanKind::Unknown {
        return Err(QueryError::UnsupportedQueryType);
    }

    let table = plan
        .table
        .as_deref()
        .ok_or(QueryError::UnsupportedQueryType)?;
    let rows = store
        .get(table)
        .ok_or_else(|| QueryError::TableNotFound(table.to_string()))?;

    match plan.kind {
        PlanKind::Select => Ok(QueryResult::Rows {
            rows: rows.to_vec(),
            count: rows.len(),
        }),
        PlanKind::Filter => {
            let field = plan.field.as_deref().ok_or(QueryError::UnsupportedQueryType)?;
            let comparator = plan.comparator.ok_or(QueryError::UnsupportedQueryType)?;
            let value = plan.value.as_ref().ok_or(QueryError::UnsupportedQueryType)?;

            let mut matched = Vec::new();
            for row in rows {
                if matches_condition(row, table, field, comparator, value)? {
                    matched.push(row.clone());
                }
            }
            let count = matched.len();
            Ok(QueryResult::Rows {
                rows: matched,
                count,
            })
        }
        PlanKind::Aggregate => {
            let field = plan.field.as_deref().ok_or(QueryError::UnsupportedQueryType)?;
            let op = plan.aggregate.ok_or(QueryError::UnsupportedQueryType)?;
            aggregate(rows, table, field, op)
        }
        PlanKind::JoinedAggregate => {
            let join = plan.join.as_ref().ok_or(QueryError::UnsupportedQueryType)?;
            joined_aggregate(rows, table, join, store)
        }
        PlanKind::Unknown => Err(QueryError::UnsupportedQueryType),
    }
}

/// Evaluate a single condition against one row.
///
/// `=` is value equality; `>` and `<` are numeric ordering on the field's
/// value.
fn matches_condition(
    row: &Record,
    table: &str,
    field: &str,
    comparator: Comparator,
    value: &Value,
) -> Result<bool> {
    let actual = row.get(field).ok_or_else(|| {
        QueryError::execution(format!("field '{}' missing from record in table '{}'", field, table))
    })?;

    match comparator {
        Comparator::Eq => Ok(actual == value),
        Comparator::Gt | Comparator::Lt => {
            let lhs = as_number(actual).ok_or_else(|| {
                QueryError::execution(format!("field '{}' is not numeric in table '{}'", field, table))
            })?;
            let rhs = as_number(value).ok_or_else(|| {
                QueryError::execution(format!("comparison value for '{}' is not numeric", field))
            })?;
            Ok(match comparator {
                Comparator::Gt => lhs > rhs,
                _ => lhs < rhs,
            })
        }
    }
}

fn aggregate(rows: &[Record], table: &str, field: &str, op: AggregateOp) -> Result<QueryResult> {
    let mut sum = 0.0;
    for row in rows {
        let value = row.get(field).ok_or_else(|| {
            QueryError::execution(format!("field '{}' missing from record in table '{}'", field, table))
        })?;
        sum += as_number(value).ok_or_else(|| {
            QueryError::execution(format!("field '{}' is not numeric in table '{}'", field, table))
        })?;
    }

    let scalar = match op {
        AggregateOp::Sum => sum,
        AggregateOp::Avg => {
            // Averaging zero rows has no defined value; reject rather than
            // produce NaN.
            if rows.is_empty() {
                return Err(QueryError::EmptyAggregate {
                    op: op.keyword().to_string(),
                    table: table.to_string(),
                });
            }
            sum / rows.len() as f64
        }
    };

    Ok(QueryResult::Scalar { scalar, count: 1 })
}

/// The fixed revenue path: for each scanned row, find the joined row whose
/// foreign key matches and accumulate the product of the two factor fields.
/// Rows with no join partner are skipped.
fn joined_aggregate(
    rows: &[Record],
    table: &str,
    join: &JoinSpec,
    store: &TableStore,
) -> Result<QueryResult> {
    let joined_rows = store
        .get(&join.joined_table)
        .ok_or_else(|| QueryError::TableNotFound(join.joined_table.clone()))?;

    let mut sum = 0.0;
    for row in rows {
        let key = row.get(&join.local_key).ok_or_else(|| {
            QueryError::execution(format!(
                "field '{}' missing from record in table '{}'",
                join.local_key, table
            ))
        })?;

        let partner = joined_rows
            .iter()
            .find(|candidate| candidate.get(&join.foreign_key) == Some(key));
        let Some(partner) = partner else {
            continue;
        };

        let joined_factor = partner.get(&join.joined_field).and_then(as_number).ok_or_else(|| {
            QueryError::execution(format!(
                "field '{}' missing or not numeric in table '{}'",
                join.joined_field, join.joined_table
            ))
        })?;
        let local_factor = row.get(&join.local_field).and_then(as_number).ok_or_else(|| {
            QueryError::execution(format!(
                "field '{}' missing or not numeric in table '{}'",
                join.local_field, table
            ))
        })?;

        sum += joined_factor * local_factor;
    }

    Ok(QueryResult::Scalar { scalar: sum, count: 1 })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::{IntentExtractor, Vocabulary};
    use std::collections::HashMap;

    fn run(query: &str, store: &TableStore) -> Result<QueryResult> {
        let extractor = IntentExtractor::new(Vocabulary::default()).unwrap();
        let plan = Plan::from_intent(&extractor.extract(query));
        execute(&plan, store)
    }

    fn names(result: &QueryResult) -> Vec<String> {
        match result {
            QueryResult::Rows { rows, .. } => rows
                .iter()
                .filter_map(|r| r.get("name").and_then(|v| v.as_str()).map(str::to_string))
                .collect(),
            QueryResult::Scalar { .. } => panic!("expected rows"),
        }
    }

    #[test]
    fn test_select_returns_all_rows() {
        let store = TableStore::seeded();
        let result = run("list products", &store).unwrap();
        assert_eq!(result.count(), 5);
    }

    #[test]
    fn test_filter_stock_less_than_10() {
        let store = TableStore::seeded();
        let result = run("stock less than 10", &store).unwrap();
        assert_eq!(result.count(), 2);
        assert_eq!(names(&result), vec!["Phone", "Tablet"]);
    }

    #[test]
    fn test_filter_category_electronics() {
        let store = TableStore::seeded();
        let result = run("show products with category electronics", &store).unwrap();
        assert_eq!(result.count(), 3);
        assert_eq!(names(&result), vec!["Laptop", "Phone", "Tablet"]);
    }

    #[test]
    fn test_average_price() {
        let store = TableStore::seeded();
        let result = run("average price", &store).unwrap();
        assert_eq!(result, QueryResult::Scalar { scalar: 515.0, count: 1 });
    }

    #[test]
    fn test_revenue() {
        let store = TableStore::seeded();
        for query in ["total sales", "revenue"] {
            let result = run(query, &store).unwrap();
            assert_eq!(
                result,
                QueryResult::Scalar { scalar: 3575.0, count: 1 },
                "query: {}",
                query
            );
        }
    }

    #[test]
    fn test_unknown_plan_unsupported() {
        let store = TableStore::seeded();
        let err = run("asdkjhasd", &store).unwrap_err();
        assert!(matches!(err, QueryError::UnsupportedQueryType));
    }

    #[test]
    fn test_table_not_found() {
        let store = TableStore::from_tables(HashMap::new());
        let err = run("list products", &store).unwrap_err();
        assert_eq!(err.to_string(), "Table 'products' not found");
    }

    #[test]
    fn test_missing_field_is_execution_error() {
        let store = TableStore::seeded();
        // "foo" is not a column of products; the fault is caught and
        // converted, never propagated as a panic.
        let err = run("foo greater than 5", &store).unwrap_err();
        assert!(matches!(err, QueryError::Execution { .. }));
    }

    #[test]
    fn test_avg_over_empty_table_is_rejected() {
        let mut tables = HashMap::new();
        tables.insert("products".to_string(), Vec::new());
        let store = TableStore::from_tables(tables);
        let err = run("average price", &store).unwrap_err();
        assert!(matches!(err, QueryError::EmptyAggregate { .. }));
    }

    #[test]
    fn test_sum_over_empty_table_is_zero() {
        let mut tables = HashMap::new();
        tables.insert("products".to_string(), Vec::new());
        let store = TableStore::from_tables(tables);
        let result = run("sum of price", &store).unwrap();
        assert_eq!(result, QueryResult::Scalar { scalar: 0.0, count: 1 });
    }
}
