//! Rule-table intent extraction.
//!
//! Extraction is a single deterministic pass over an ordered list of rules
//! compiled from a [`Vocabulary`]: comparison regex families first, then the
//! revenue cue, then aggregate and selection keywords, with the category
//! special case applied last. Comparison cues dominate aggregate cues, which
//! dominate plain selection cues; category detection dominates all.
//!
//! Extraction never fails: text that matches no cue yields
//! [`OperationKind::Unknown`].

use super::vocabulary::{ComparisonFamily, Vocabulary};
use super::{Comparator, Intent, OperationKind};
use crate::types::Result;
use regex::Regex;
use serde_json::Value;

/// An intent plus the cue that produced it, for explainability.
#[derive(Debug, Clone)]
pub struct Classified {
    pub intent: Intent,
    /// Cue or keyword that fired; `None` when nothing matched
    pub trigger: Option<String>,
}

struct ComparisonRule {
    comparator: Comparator,
    pattern: Regex,
}

/// Vocabulary-driven intent extractor.
pub struct IntentExtractor {
    vocabulary: Vocabulary,
    comparison_rules: Vec<ComparisonRule>,
}

impl IntentExtractor {
    /// Compile an extractor from a vocabulary.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::InvalidPattern` if a cue cannot be compiled
    /// into a pattern. Cues are escaped before compilation, so this only
    /// occurs for degenerate vocabularies (e.g. an empty cue family).
    pub fn new(vocabulary: Vocabulary) -> Result<Self> {
        let comparison_rules = vocabulary
            .comparisons
            .iter()
            .map(|family| {
                Ok(ComparisonRule {
                    comparator: family.comparator,
                    pattern: compile_family(family)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            vocabulary,
            comparison_rules,
        })
    }

    /// The vocabulary this extractor was compiled from.
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Extract a typed intent from a free-text query.
    pub fn extract(&self, query: &str) -> Intent {
        self.classify(query).intent
    }

    /// Extract an intent along with the cue that produced it.
    pub fn classify(&self, query: &str) -> Classified {
        let text = query.to_lowercase();

        // Comparison families, in priority order.
        for rule in &self.comparison_rules {
            if let Some(caps) = rule.pattern.captures(&text) {
                let field = caps
                    .name("field")
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_default();
                let cue = caps
                    .name("wcue")
                    .or_else(|| caps.name("scue"))
                    .map(|m| m.as_str().to_string());
                let value = caps.name("value").map(|m| parse_value(m.as_str()));

                let mut classified = Classified {
                    intent: Intent {
                        table: self.vocabulary.resolve_table(&text).map(|t| t.name.clone()),
                        kind: OperationKind::Filter,
                        field: Some(field),
                        comparator: Some(rule.comparator),
                        value,
                        aggregate: None,
                        join: None,
                    },
                    trigger: cue,
                };
                self.apply_category_override(&text, &mut classified);
                return classified;
            }
        }

        // The fixed revenue aggregate.
        if let Some(cue) = contains_any(&self.vocabulary.revenue.cues, &text) {
            return Classified {
                intent: Intent {
                    table: Some(self.vocabulary.revenue.table.clone()),
                    kind: OperationKind::JoinedAggregate,
                    field: None,
                    comparator: None,
                    value: None,
                    aggregate: Some(super::AggregateOp::Sum),
                    join: Some(self.vocabulary.revenue.join.clone()),
                },
                trigger: Some(cue),
            };
        }

        // Aggregate cues and plain selection keywords.
        let avg_cue = contains_any(&self.vocabulary.average_cues, &text);
        let sum_cue = contains_any(&self.vocabulary.sum_cues, &text);
        let select_cue = contains_any(&self.vocabulary.select_cues, &text);

        if avg_cue.is_none() && sum_cue.is_none() && select_cue.is_none() {
            return Classified {
                intent: Intent::unknown(),
                trigger: None,
            };
        }

        let Some(table) = self.vocabulary.resolve_table(&text) else {
            return Classified {
                intent: Intent::unknown(),
                trigger: None,
            };
        };
        let (kind, aggregate, trigger) = if avg_cue.is_some() {
            (OperationKind::Aggregate, Some(super::AggregateOp::Avg), avg_cue)
        } else if sum_cue.is_some() {
            (OperationKind::Aggregate, Some(super::AggregateOp::Sum), sum_cue)
        } else {
            (OperationKind::Select, None, select_cue)
        };

        let field = table
            .candidate_fields
            .iter()
            .find(|f| text.contains(f.as_str()))
            .cloned()
            .unwrap_or_else(|| table.default_field.clone());

        let mut classified = Classified {
            intent: Intent {
                table: Some(table.name.clone()),
                kind,
                field: Some(field),
                comparator: None,
                value: None,
                aggregate,
                join: None,
            },
            trigger,
        };
        self.apply_category_override(&text, &mut classified);
        classified
    }

    /// Category keyword detection, applied last, dominating any earlier
    /// aggregate or selection determination.
    fn apply_category_override(&self, text: &str, classified: &mut Classified) {
        let Some(field) = classified.intent.field.as_deref() else {
            return;
        };
        for rule in &self.vocabulary.category_rules {
            if rule.field == field && text.contains(rule.cue.as_str()) {
                classified.intent.kind = OperationKind::Filter;
                classified.intent.comparator = Some(Comparator::Eq);
                classified.intent.value = Some(Value::String(rule.value.clone()));
                classified.intent.aggregate = None;
                classified.trigger = Some(rule.cue.clone());
                return;
            }
        }
    }
}

/// Compile one comparison family into a capturing pattern.
///
/// Word cues require surrounding whitespace so they never match inside a
/// longer word ("over" must not fire on "discover"); symbol cues may touch
/// their operands ("price>100"). The value is a bare integer or a quoted
/// string.
fn compile_family(family: &ComparisonFamily) -> Result<Regex> {
    let mut branches = Vec::new();
    if !family.word_cues.is_empty() {
        branches.push(format!(r"\s+(?P<wcue>{})\s+", alternation(&family.word_cues)));
    }
    if !family.symbol_cues.is_empty() {
        branches.push(format!(r"\s*(?P<scue>{})\s*", alternation(&family.symbol_cues)));
    }
    let pattern = format!(
        r#"(?P<field>\w+)(?:{})(?P<value>'[^']*'|"[^"]*"|\d+)"#,
        branches.join("|")
    );
    Ok(Regex::new(&pattern)?)
}

fn alternation(cues: &[String]) -> String {
    cues.iter()
        .map(|c| regex::escape(c))
        .collect::<Vec<_>>()
        .join("|")
}

fn contains_any(cues: &[String], text: &str) -> Option<String> {
    cues.iter()
        .find(|cue| text.contains(cue.as_str()))
        .cloned()
}

/// Normalize a captured value: bare digits become an integer, quoted
/// strings become lowercase unquoted strings.
fn parse_value(raw: &str) -> Value {
    let trimmed = raw.trim();
    let quoted = (trimmed.starts_with('\'') && trimmed.ends_with('\'')
        || trimmed.starts_with('"') && trimmed.ends_with('"'))
        && trimmed.len() >= 2;
    if quoted {
        return Value::String(trimmed[1..trimmed.len() - 1].to_lowercase());
    }
    trimmed
        .parse::<i64>()
        .map(Value::from)
        .unwrap_or_else(|_| Value::String(trimmed.to_lowercase()))
}
