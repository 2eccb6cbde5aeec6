//! Report layer and JSON loading shared by host UIs and the CLI.
//! No canvas or storage dependencies.

use chrono::Utc;
use serde::Serialize;

use crate::evaluator::{evaluate_rules_with_spacing, DEFAULT_PANEL_SPACING};
use crate::model::{Combinator, Component, Design, Rule, RuleViolation, Severity};

#[derive(Debug, thiserror::Error)]
pub enum PanelGuardError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Other(String),
}

/// Violation counts per severity.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct DrcStats {
    pub errors: usize,
    pub warnings: usize,
}

/// One design-rule-check pass: the violation list plus its counts.
#[derive(Debug, Clone, Serialize)]
pub struct DrcReport {
    pub violations: Vec<RuleViolation>,
    pub stats: DrcStats,
}

impl DrcReport {
    pub fn from_violations(violations: Vec<RuleViolation>) -> Self {
        let stats = violations_to_stats(&violations);
        Self { violations, stats }
    }

    pub fn has_errors(&self) -> bool {
        self.stats.errors > 0
    }

    pub fn total_violations(&self) -> usize {
        self.stats.errors + self.stats.warnings
    }
}

fn violations_to_stats(violations: &[RuleViolation]) -> DrcStats {
    let mut stats = DrcStats::default();
    for violation in violations {
        match violation.severity {
            Severity::Error => stats.errors += 1,
            Severity::Warning => stats.warnings += 1,
        }
    }
    stats
}

/// Runs the DRC over a design snapshot, using the design's panel spacing
/// for the shared canvas frame.
pub fn run_drc(
    rules: &[Rule],
    design: &Design,
    component_library: &[Component],
    combinator_library: &[Combinator],
) -> DrcReport {
    let spacing = design.panel_spacing.unwrap_or(DEFAULT_PANEL_SPACING);
    let violations = evaluate_rules_with_spacing(
        rules,
        &design.panels,
        &design.components,
        component_library,
        combinator_library,
        spacing,
    );
    DrcReport::from_violations(violations)
}

pub fn load_design_str(json: &str) -> Result<Design, PanelGuardError> {
    Ok(serde_json::from_str(json)?)
}

pub fn load_component_library_str(json: &str) -> Result<Vec<Component>, PanelGuardError> {
    Ok(serde_json::from_str(json)?)
}

pub fn load_combinator_library_str(json: &str) -> Result<Vec<Combinator>, PanelGuardError> {
    Ok(serde_json::from_str(json)?)
}

/// A rule-book entry that failed to deserialize.
#[derive(Debug, Clone)]
pub struct RejectedRule {
    /// Position in the source array.
    pub index: usize,
    /// The entry's `name` field when one was present.
    pub name: Option<String>,
    pub reason: String,
}

/// Result of tolerant rule-book loading.
#[derive(Debug, Clone, Default)]
pub struct RuleBook {
    pub rules: Vec<Rule>,
    pub rejected: Vec<RejectedRule>,
}

/// Loads a rule book, keeping individually malformed entries (unknown
/// constraint type, wrong field shape) from failing the batch. Rejects are
/// reported via [`rejected_rule_violations`] so the failure surfaces in the
/// violation list, matching the evaluator's never-throw policy.
pub fn load_rules_str(json: &str) -> Result<RuleBook, PanelGuardError> {
    let entries: Vec<serde_json::Value> = serde_json::from_str(json)?;
    let mut book = RuleBook::default();
    for (index, entry) in entries.into_iter().enumerate() {
        let name = entry
            .get("name")
            .and_then(|n| n.as_str())
            .map(|n| n.to_string());
        match serde_json::from_value::<Rule>(entry) {
            Ok(rule) => book.rules.push(rule),
            Err(e) => {
                tracing::warn!(index, name = name.as_deref(), error = %e, "rejecting malformed rule entry");
                book.rejected.push(RejectedRule {
                    index,
                    name,
                    reason: e.to_string(),
                });
            }
        }
    }
    Ok(book)
}

/// One diagnostic violation per rejected rule-book entry.
pub fn rejected_rule_violations(rejected: &[RejectedRule]) -> Vec<RuleViolation> {
    rejected
        .iter()
        .map(|r| {
            let name = r.name.clone().unwrap_or_else(|| format!("entry {}", r.index));
            RuleViolation {
                id: uuid::Uuid::new_v4().to_string(),
                rule_id: format!("rejected-{}", r.index),
                rule_name: name.clone(),
                severity: Severity::Error,
                message: format!("Rule '{}' could not be loaded: {}", name, r.reason),
                component_id: None,
                component_ids: Vec::new(),
                timestamp: Utc::now(),
                missing_component_id: None,
                required_component_id: None,
            }
        })
        .collect()
}
