//! Executable plan derived from an intent.
//!
//! Building a plan is a pure mapping: the intent's structural fields carry
//! over, plus a rendered textual representation of the equivalent
//! declarative query for explainability. No validation against the table
//! store happens here; that is deferred to execution.

use crate::intent::{AggregateOp, Comparator, Intent, JoinSpec, OperationKind};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Operation descriptor kinds the executor dispatches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanKind {
    Select,
    Filter,
    Aggregate,
    JoinedAggregate,
    Unknown,
}

/// Executable description of a query, derived 1:1 from a non-unknown intent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub kind: PlanKind,
    pub table: Option<String>,
    pub field: Option<String>,
    pub comparator: Option<Comparator>,
    pub value: Option<Value>,
    pub aggregate: Option<AggregateOp>,
    pub join: Option<JoinSpec>,
    /// Human-readable translated query
    pub rendered: String,
}

/// Static message rendered for untranslatable queries.
pub const UNTRANSLATABLE: &str = "Could not translate the query";

impl Plan {
    /// Map an intent into an executable plan.
    pub fn from_intent(intent: &Intent) -> Self {
        let rendered = render(intent);
        let kind = match intent.kind {
            OperationKind::Select => PlanKind::Select,
            OperationKind::Filter => PlanKind::Filter,
            OperationKind::Aggregate => PlanKind::Aggregate,
            OperationKind::JoinedAggregate => PlanKind::JoinedAggregate,
            OperationKind::Unknown => PlanKind::Unknown,
        };
        Self {
            kind,
            table: intent.table.clone(),
            field: intent.field.clone(),
            comparator: intent.comparator,
            value: intent.value.clone(),
            aggregate: intent.aggregate,
            join: intent.join.clone(),
            rendered,
        }
    }
}

fn render(intent: &Intent) -> String {
    let table = intent.table.as_deref().unwrap_or_default();
    match intent.kind {
        OperationKind::Unknown => UNTRANSLATABLE.to_string(),
        OperationKind::Select => format!("SELECT * FROM {}", table),
        OperationKind::Filter => {
            let field = intent.field.as_deref().unwrap_or_default();
            let op = intent
                .comparator
                .map(|c| c.symbol())
                .unwrap_or("=");
            let value = intent
                .value
                .as_ref()
                .map(render_value)
                .unwrap_or_default();
            format!("SELECT * FROM {} WHERE {} {} {}", table, field, op, value)
        }
        OperationKind::Aggregate => {
            let op = intent
                .aggregate
                .map(|a| a.keyword())
                .unwrap_or(AggregateOp::Sum.keyword());
            let field = intent.field.as_deref().unwrap_or_default();
            format!("SELECT {}({}) FROM {}", op, field, table)
        }
        OperationKind::JoinedAggregate => match &intent.join {
            Some(join) => format!(
                "SELECT SUM({} * {}) FROM {} JOIN {} ON {}.{} = {}.{}",
                join.joined_field,
                join.local_field,
                table,
                join.joined_table,
                table,
                join.local_key,
                join.joined_table,
                join.foreign_key
            ),
            None => UNTRANSLATABLE.to_string(),
        },
    }
}

/// String values render unquoted-lowercase to match the store's format.
fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::{IntentExtractor, Vocabulary};

    fn plan_for(query: &str) -> Plan {
        let extractor = IntentExtractor::new(Vocabulary::default()).unwrap();
        Plan::from_intent(&extractor.extract(query))
    }

    #[test]
    fn test_select_rendering() {
        let plan = plan_for("list products");
        assert_eq!(plan.kind, PlanKind::Select);
        assert_eq!(plan.rendered, "SELECT * FROM products");
    }

    #[test]
    fn test_filter_rendering() {
        let plan = plan_for("price greater than 100");
        assert_eq!(plan.kind, PlanKind::Filter);
        assert_eq!(plan.rendered, "SELECT * FROM products WHERE price > 100");

        let plan = plan_for("show products with category electronics");
        assert_eq!(
            plan.rendered,
            "SELECT * FROM products WHERE category = electronics"
        );
    }

    #[test]
    fn test_aggregate_rendering() {
        let plan = plan_for("average price");
        assert_eq!(plan.kind, PlanKind::Aggregate);
        assert_eq!(plan.rendered, "SELECT AVG(price) FROM products");
    }

    #[test]
    fn test_joined_aggregate_rendering() {
        let plan = plan_for("total sales");
        assert_eq!(plan.kind, PlanKind::JoinedAggregate);
        assert_eq!(
            plan.rendered,
            "SELECT SUM(price * quantity) FROM orders JOIN products ON orders.product_id = products.id"
        );
    }

    #[test]
    fn test_unknown_rendering() {
        let plan = plan_for("asdkjhasd");
        assert_eq!(plan.kind, PlanKind::Unknown);
        assert_eq!(plan.rendered, UNTRANSLATABLE);
        assert!(plan.table.is_none());
    }
}
