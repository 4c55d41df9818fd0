//! Pipeline entry points consumed by the HTTP and CLI boundaries.
//!
//! Control flow is strictly linear: text → intent → plan → result. The
//! engine holds no per-request state; the table store is read-only and
//! shared, so concurrent calls need no locking.

use crate::exec::{self, QueryResult};
use crate::intent::{IntentExtractor, OperationKind, Vocabulary};
use crate::plan::Plan;
use crate::store::TableStore;
use crate::types::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Static user-facing message for unrecognized intents.
pub const NOT_UNDERSTOOD: &str = "The query could not be understood";

/// Failure class of a handled query, for boundary status mapping.
///
/// Translation faults are user-input problems; execution faults are
/// unexpected runtime failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    Translation,
    Execution,
}

/// Structured outcome of [`QueryEngine::handle_query`].
#[derive(Debug, Clone, Serialize)]
pub struct QueryResponse {
    pub success: bool,
    pub translated_query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<QueryResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip)]
    pub fault: Option<FaultKind>,
}

/// Human-readable rationale for why a query was interpreted as it was.
#[derive(Debug, Clone, Serialize)]
pub struct Explanation {
    pub explanation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword_trigger: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_accessed: Option<String>,
    pub operation: OperationKind,
}

/// Whether a query is executable, without running it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feasibility {
    pub feasible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Query engine: extractor plus the shared read-only store.
pub struct QueryEngine {
    store: Arc<TableStore>,
    extractor: IntentExtractor,
}

impl QueryEngine {
    /// Create an engine with the default vocabulary.
    pub fn new(store: Arc<TableStore>) -> Result<Self> {
        Self::with_vocabulary(store, Vocabulary::default())
    }

    /// Create an engine with a substituted vocabulary.
    pub fn with_vocabulary(store: Arc<TableStore>, vocabulary: Vocabulary) -> Result<Self> {
        Ok(Self {
            store,
            extractor: IntentExtractor::new(vocabulary)?,
        })
    }

    /// The shared table store.
    pub fn store(&self) -> &TableStore {
        &self.store
    }

    /// Derive the plan for a query without executing it.
    pub fn plan(&self, query: &str) -> Plan {
        Plan::from_intent(&self.extractor.extract(query))
    }

    /// Run the full pipeline for one query.
    ///
    /// Never returns an error; every failure is folded into the response.
    pub fn handle_query(&self, query: &str) -> QueryResponse {
        let intent = self.extractor.extract(query);
        debug!(?intent, "extracted intent");
        let plan = Plan::from_intent(&intent);

        if !intent.is_executable() {
            return QueryResponse {
                success: false,
                translated_query: plan.rendered,
                result: None,
                message: Some(NOT_UNDERSTOOD.to_string()),
                fault: Some(FaultKind::Translation),
            };
        }

        match exec::execute(&plan, &self.store) {
            Ok(result) => QueryResponse {
                success: true,
                translated_query: plan.rendered,
                result: Some(result),
                message: None,
                fault: None,
            },
            Err(err) => QueryResponse {
                success: false,
                translated_query: plan.rendered,
                result: None,
                message: Some(err.to_string()),
                fault: Some(FaultKind::Execution),
            },
        }
    }

    /// Explain why each cue led to the chosen operation, without executing.
    pub fn explain_query(&self, query: &str) -> Explanation {
        let classified = self.extractor.classify(query);
        let intent = &classified.intent;

        let explanation = match intent.kind {
            OperationKind::Unknown => {
                "No recognizable cue was found in the query.".to_string()
            }
            OperationKind::Filter => format!(
                "Cue '{}' selects a filter on '{}' of table '{}'.",
                classified.trigger.as_deref().unwrap_or_default(),
                intent.field.as_deref().unwrap_or_default(),
                intent.table.as_deref().unwrap_or_default(),
            ),
            OperationKind::Aggregate => format!(
                "Cue '{}' selects a {} aggregate over '{}' of table '{}'.",
                classified.trigger.as_deref().unwrap_or_default(),
                intent.aggregate.map(|a| a.keyword()).unwrap_or_default(),
                intent.field.as_deref().unwrap_or_default(),
                intent.table.as_deref().unwrap_or_default(),
            ),
            OperationKind::JoinedAggregate => format!(
                "Cue '{}' selects the fixed revenue aggregate across orders and products.",
                classified.trigger.as_deref().unwrap_or_default(),
            ),
            OperationKind::Select => format!(
                "Keyword '{}' selects all rows of table '{}'.",
                classified.trigger.as_deref().unwrap_or_default(),
                intent.table.as_deref().unwrap_or_default(),
            ),
        };

        Explanation {
            explanation,
            keyword_trigger: classified.trigger,
            table_accessed: intent.table.clone(),
            operation: intent.kind,
        }
    }

    /// Report whether a query is executable without running it.
    ///
    /// Feasible iff the intent is recognized, its table exists in the
    /// store, and the raw text names at least one known table or field.
    pub fn validate_query(&self, query: &str) -> Feasibility {
        let intent = self.extractor.extract(query);

        if !intent.is_executable() {
            return Feasibility {
                feasible: false,
                reason: Some(NOT_UNDERSTOOD.to_string()),
            };
        }

        if let Some(table) = intent.table.as_deref() {
            if !self.store.contains(table) {
                return Feasibility {
                    feasible: false,
                    reason: Some(format!("Table '{}' not found", table)),
                };
            }
        }

        if !self
            .extractor
            .vocabulary()
            .mentions_known_name(&query.to_lowercase())
        {
            return Feasibility {
                feasible: false,
                reason: Some("The query names no known table or field".to_string()),
            };
        }

        Feasibility {
            feasible: true,
            reason: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> QueryEngine {
        QueryEngine::new(Arc::new(TableStore::seeded())).unwrap()
    }

    #[test]
    fn test_handle_query_success() {
        let response = engine().handle_query("average price");
        assert!(response.success);
        assert_eq!(response.translated_query, "SELECT AVG(price) FROM products");
        assert_eq!(
            response.result,
            Some(QueryResult::Scalar { scalar: 515.0, count: 1 })
        );
        assert!(response.fault.is_none());
    }

    #[test]
    fn test_handle_query_not_understood() {
        let response = engine().handle_query("asdkjhasd");
        assert!(!response.success);
        assert_eq!(response.message.as_deref(), Some(NOT_UNDERSTOOD));
        assert_eq!(response.fault, Some(FaultKind::Translation));
    }

    #[test]
    fn test_handle_query_execution_fault() {
        let response = engine().handle_query("foo greater than 5");
        assert!(!response.success);
        assert_eq!(response.fault, Some(FaultKind::Execution));
        assert!(response
            .message
            .as_deref()
            .is_some_and(|m| m.starts_with("Error executing query")));
    }

    #[test]
    fn test_handle_query_is_pure() {
        let engine = engine();
        let a = engine.handle_query("stock less than 10");
        let b = engine.handle_query("stock less than 10");
        assert_eq!(a.result, b.result);
        assert_eq!(a.translated_query, b.translated_query);
    }

    #[test]
    fn test_explain_filter() {
        let explanation = engine().explain_query("price greater than 100");
        assert_eq!(explanation.operation, OperationKind::Filter);
        assert_eq!(explanation.keyword_trigger.as_deref(), Some("greater than"));
        assert_eq!(explanation.table_accessed.as_deref(), Some("products"));
        assert!(explanation.explanation.contains("filter"));
    }

    #[test]
    fn test_explain_unknown() {
        let explanation = engine().explain_query("asdkjhasd");
        assert_eq!(explanation.operation, OperationKind::Unknown);
        assert!(explanation.keyword_trigger.is_none());
        assert!(explanation.table_accessed.is_none());
    }

    #[test]
    fn test_validate_feasible() {
        let feasibility = engine().validate_query("stock less than 10");
        assert!(feasibility.feasible);
        assert!(feasibility.reason.is_none());
    }

    #[test]
    fn test_validate_not_understood() {
        let feasibility = engine().validate_query("asdkjhasd");
        assert!(!feasibility.feasible);
        assert_eq!(feasibility.reason.as_deref(), Some(NOT_UNDERSTOOD));
    }

    #[test]
    fn test_validate_no_known_name() {
        // Recognized select cue, but the text names nothing in the dataset.
        let feasibility = engine().validate_query("show everything");
        assert!(!feasibility.feasible);
        assert_eq!(
            feasibility.reason.as_deref(),
            Some("The query names no known table or field")
        );
    }
}
