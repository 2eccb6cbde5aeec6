//! The declarative rule schema: scoped rules guarding a list of constraints
//! behind a conjunction of conditions, and the violation record the
//! evaluator emits.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// Comparison applied by a [`RuleCondition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConditionOperator {
    Equals,
    NotEquals,
    GreaterThan,
    LessThan,
    /// Substring when the expected value is a string, membership when it is
    /// an array.
    Contains,
    /// Membership in an array of expected values.
    In,
}

/// Right-hand side of a condition: scalar or array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConditionValue {
    Number(f64),
    Text(String),
    Many(Vec<ConditionValue>),
}

/// A guard gating whether a rule's constraints apply to a given entity.
/// All conditions of a rule must hold (conjunction).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleCondition {
    /// Dot-path into the evaluated entity, e.g. `type`, `x`,
    /// `specs.current`, `properties.locked`.
    pub field: String,
    pub operator: ConditionOperator,
    pub value: ConditionValue,
}

/// Applicability scope of a rule. The tag and target field are flattened
/// into the rule object (`"type": "panel", "panelId": ...`), matching the
/// authoring UI's JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum RuleScope {
    /// Applies design-wide.
    Global,
    /// Applies only to placements on the named panel.
    Panel { panel_id: String },
    /// Applies only to placements of the named catalog component.
    Component { component_id: String },
    /// Applies only to placements of the named combinator.
    Combinator { combinator_id: String },
}

/// One checkable assertion, closed over the eight constraint kinds so the
/// evaluator's dispatch is exhaustiveness-checked and invalid field
/// combinations are unrepresentable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ConstraintKind {
    /// A named numeric property must lie within `[min, max]`.
    Dimension {
        property: String,
        #[serde(default)]
        min: Option<f64>,
        #[serde(default)]
        max: Option<f64>,
    },
    /// The number of matching entities in scope must satisfy the bounds, or
    /// equal `value` exactly when given.
    Count {
        #[serde(default)]
        min: Option<usize>,
        #[serde(default)]
        max: Option<usize>,
        #[serde(default)]
        value: Option<usize>,
    },
    /// Pairwise clearance between placements on the same panel must not fall
    /// below `spacing` millimeters.
    Spacing { spacing: f64 },
    /// Every placement of the target component must be accompanied on its
    /// panel by each of the required components.
    #[serde(rename = "co-usage")]
    CoUsage {
        target_component_id: String,
        #[serde(default)]
        required_component_ids: Vec<String>,
    },
    /// No two placements on the same panel may have intersecting bounding
    /// boxes.
    Overlap,
    /// Placement rectangles must lie fully inside their panel.
    Bounds,
    /// Placement rectangles must not reach into the listed panels.
    NoIntersectWithPanelBounds {
        #[serde(default)]
        panel_ids: Vec<String>,
    },
    /// Components of the listed types (all types when empty) must carry a
    /// `specs.panelSize` matching the owning panel's size class.
    PanelSizeMapping {
        #[serde(default)]
        component_types: Vec<String>,
        #[serde(default)]
        panel_size: Option<u32>,
    },
}

impl ConstraintKind {
    /// Wire name of the kind, as used in rule JSON and diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            ConstraintKind::Dimension { .. } => "dimension",
            ConstraintKind::Count { .. } => "count",
            ConstraintKind::Spacing { .. } => "spacing",
            ConstraintKind::CoUsage { .. } => "co-usage",
            ConstraintKind::Overlap => "overlap",
            ConstraintKind::Bounds => "bounds",
            ConstraintKind::NoIntersectWithPanelBounds { .. } => "noIntersectWithPanelBounds",
            ConstraintKind::PanelSizeMapping { .. } => "panelSizeMapping",
        }
    }
}

/// A constraint inside a rule: the kind-specific fields plus presentation
/// overrides shared by every kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constraint {
    #[serde(flatten)]
    pub kind: ConstraintKind,
    /// Absent means error.
    #[serde(default)]
    pub severity: Option<Severity>,
    /// Overrides the synthesized violation message when present.
    #[serde(default)]
    pub message: Option<String>,
}

impl Constraint {
    pub fn effective_severity(&self) -> Severity {
        self.severity.unwrap_or(Severity::Error)
    }
}

impl From<ConstraintKind> for Constraint {
    fn from(kind: ConstraintKind) -> Self {
        Constraint {
            kind,
            severity: None,
            message: None,
        }
    }
}

/// A named validation unit: conditions gate, constraints check.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub scope: RuleScope,
    #[serde(default)]
    pub conditions: Vec<RuleCondition>,
    #[serde(default)]
    pub constraints: Vec<Constraint>,
    /// Rule ids evaluated before this one. Ordering only; no pass/fail
    /// gating between dependent rules.
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

/// Evaluator output for one failed check, with enough context to locate and
/// fix the offending entity. Recomputed from scratch on every evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleViolation {
    /// Unique per occurrence.
    pub id: String,
    pub rule_id: String,
    pub rule_name: String,
    pub severity: Severity,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub component_ids: Vec<String>,
    pub timestamp: DateTime<Utc>,
    /// Set on co-usage failures: the absent catalog id a "quick add" action
    /// should place.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub missing_component_id: Option<String>,
    /// Set on co-usage failures: the catalog id that declared the
    /// requirement.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_component_id: Option<String>,
}
