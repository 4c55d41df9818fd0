//! Query intent model and extraction.
//!
//! An [`Intent`] is the structured interpretation of free-text query cues:
//! which table, which operation, which field, and (for filters) a comparator
//! and value. Extraction is a deterministic ordered rule pass driven by a
//! [`Vocabulary`] configuration value.

pub mod extractor;
pub mod vocabulary;

pub use extractor::IntentExtractor;
pub use vocabulary::Vocabulary;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Operation classification for a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    /// Return all rows of a table
    Select,
    /// Single-condition filter over one table
    Filter,
    /// SUM/AVG over one field of one table
    Aggregate,
    /// The fixed revenue path: SUM(price * quantity) across orders joined
    /// to products. A one-off, not a general join capability.
    JoinedAggregate,
    /// Text matched no cue; terminal, nothing executable derives from it
    Unknown,
}

/// Comparison operator for filter conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Comparator {
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "<")]
    Lt,
}

impl Comparator {
    /// SQL rendering of the operator.
    pub fn symbol(&self) -> &'static str {
        match self {
            Comparator::Eq => "=",
            Comparator::Gt => ">",
            Comparator::Lt => "<",
        }
    }
}

/// Aggregation function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AggregateOp {
    Sum,
    Avg,
}

impl AggregateOp {
    /// SQL keyword for the function.
    pub fn keyword(&self) -> &'static str {
        match self {
            AggregateOp::Sum => "SUM",
            AggregateOp::Avg => "AVG",
        }
    }
}

/// Explicit join specification for the fixed revenue aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinSpec {
    /// Table joined into the scan (products)
    pub joined_table: String,
    /// Key on the scanned table (orders.product_id)
    pub local_key: String,
    /// Key on the joined table (products.id)
    pub foreign_key: String,
    /// Factor taken from the joined table (price)
    pub joined_field: String,
    /// Factor taken from the scanned table (quantity)
    pub local_field: String,
}

/// Structured interpretation of a free-text query.
///
/// Invariant: `kind == Unknown` implies every optional field is `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    /// Target table; absent only for unknown intents
    pub table: Option<String>,
    /// Operation classification
    pub kind: OperationKind,
    /// Field the operation applies to
    pub field: Option<String>,
    /// Comparison operator (filter only)
    pub comparator: Option<Comparator>,
    /// Comparison value: integer, or normalized lowercase string
    pub value: Option<Value>,
    /// Aggregation function (aggregate only)
    pub aggregate: Option<AggregateOp>,
    /// Join specification (joined aggregate only)
    pub join: Option<JoinSpec>,
}

impl Intent {
    /// The terminal "could not understand" intent.
    pub fn unknown() -> Self {
        Self {
            table: None,
            kind: OperationKind::Unknown,
            field: None,
            comparator: None,
            value: None,
            aggregate: None,
            join: None,
        }
    }

    /// Whether an executable plan can be derived from this intent.
    pub fn is_executable(&self) -> bool {
        self.kind != OperationKind::Unknown
    }
}
