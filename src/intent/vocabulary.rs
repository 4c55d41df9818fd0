//! Cue and default-field configuration for intent extraction.
//!
//! Every literal the extractor matches against lives here as data rather
//! than inline in the matching logic, so tests can substitute a vocabulary
//! without touching the extractor.

use super::{Comparator, JoinSpec};

/// One family of comparison cues mapping to a single comparator.
#[derive(Debug, Clone)]
pub struct ComparisonFamily {
    /// Comparator this family produces
    pub comparator: Comparator,
    /// Word cues requiring surrounding whitespace ("greater than", "is")
    pub word_cues: Vec<String>,
    /// Symbol cues allowed to touch their operands (">", "==")
    pub symbol_cues: Vec<String>,
}

/// Per-table field candidates and keyword.
#[derive(Debug, Clone)]
pub struct TableVocabulary {
    /// Table name in the store
    pub name: String,
    /// Substring of the query that selects this table; `None` for the
    /// default table
    pub keyword: Option<String>,
    /// Candidate fields scanned for literal containment, in priority order
    pub candidate_fields: Vec<String>,
    /// Field used when no candidate appears in the query
    pub default_field: String,
}

/// Forced equality filter triggered by a category keyword.
#[derive(Debug, Clone)]
pub struct CategoryRule {
    /// Field the rule applies to
    pub field: String,
    /// Substring that triggers the rule ("electronic")
    pub cue: String,
    /// Normalized value the filter compares against ("electronics")
    pub value: String,
}

/// The fixed revenue aggregate: cues plus its explicit join specification.
#[derive(Debug, Clone)]
pub struct RevenueRule {
    /// Substrings that trigger the joined aggregate
    pub cues: Vec<String>,
    /// Table the aggregate scans
    pub table: String,
    /// Join specification
    pub join: JoinSpec,
}

/// Complete cue vocabulary for the extractor.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    /// Comparison families in priority order (first match wins)
    pub comparisons: Vec<ComparisonFamily>,
    /// Plain selection keywords ("show", "list", ...)
    pub select_cues: Vec<String>,
    /// Cues selecting AVG
    pub average_cues: Vec<String>,
    /// Cues selecting SUM
    pub sum_cues: Vec<String>,
    /// The hardcoded revenue aggregate
    pub revenue: RevenueRule,
    /// Table keywords, candidate fields, and default fields
    pub tables: Vec<TableVocabulary>,
    /// Table used when no table keyword appears
    pub default_table: String,
    /// Category special cases, applied last, dominating all other rules
    pub category_rules: Vec<CategoryRule>,
}

impl Vocabulary {
    /// Table vocabulary whose keyword appears in the lowercased text,
    /// falling back to the default table. `None` only for a vocabulary
    /// with no tables at all.
    pub fn resolve_table(&self, text: &str) -> Option<&TableVocabulary> {
        self.tables
            .iter()
            .find(|t| t.keyword.as_deref().is_some_and(|k| text.contains(k)))
            .or_else(|| self.tables.iter().find(|t| t.name == self.default_table))
            .or_else(|| self.tables.first())
    }

    /// Whether the lowercased text names any known table, table keyword,
    /// or candidate field. Used by feasibility checks.
    pub fn mentions_known_name(&self, text: &str) -> bool {
        self.tables.iter().any(|t| {
            text.contains(t.name.as_str())
                || t.keyword.as_deref().is_some_and(|k| text.contains(k))
                || t.candidate_fields.iter().any(|f| text.contains(f.as_str()))
        })
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            comparisons: vec![
                ComparisonFamily {
                    comparator: Comparator::Gt,
                    word_cues: words(&[
                        "greater than",
                        "more than",
                        "higher than",
                        "above",
                        "larger than",
                        "over",
                        "exceeds",
                    ]),
                    symbol_cues: words(&[">"]),
                },
                ComparisonFamily {
                    comparator: Comparator::Lt,
                    word_cues: words(&[
                        "less than",
                        "lower than",
                        "below",
                        "under",
                        "smaller than",
                    ]),
                    symbol_cues: words(&["<"]),
                },
                ComparisonFamily {
                    comparator: Comparator::Eq,
                    word_cues: words(&["equal to", "equals", "is"]),
                    symbol_cues: words(&["==", "="]),
                },
            ],
            select_cues: words(&[
                "show", "get", "find", "list", "search", "what", "provide", "select",
            ]),
            average_cues: words(&["average", "avg"]),
            sum_cues: words(&["total", "sum"]),
            revenue: RevenueRule {
                cues: words(&["total sales", "revenue"]),
                table: "orders".to_string(),
                join: JoinSpec {
                    joined_table: "products".to_string(),
                    local_key: "product_id".to_string(),
                    foreign_key: "id".to_string(),
                    joined_field: "price".to_string(),
                    local_field: "quantity".to_string(),
                },
            },
            tables: vec![
                TableVocabulary {
                    name: "users".to_string(),
                    keyword: Some("user".to_string()),
                    candidate_fields: words(&["age", "name", "email"]),
                    default_field: "age".to_string(),
                },
                TableVocabulary {
                    name: "orders".to_string(),
                    keyword: Some("order".to_string()),
                    candidate_fields: words(&["quantity", "order_date"]),
                    default_field: "quantity".to_string(),
                },
                TableVocabulary {
                    name: "products".to_string(),
                    keyword: None,
                    candidate_fields: words(&["price", "stock", "category"]),
                    default_field: "price".to_string(),
                },
            ],
            default_table: "products".to_string(),
            category_rules: vec![
                CategoryRule {
                    field: "category".to_string(),
                    cue: "electronic".to_string(),
                    value: "electronics".to_string(),
                },
                CategoryRule {
                    field: "category".to_string(),
                    cue: "accessor".to_string(),
                    value: "accessories".to_string(),
                },
            ],
        }
    }
}

fn words(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
