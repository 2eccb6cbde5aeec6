//! The rule evaluator: walks an immutable design snapshot against a rule
//! list and returns a fresh violation list. Synchronous, re-entrant and
//! pure — no state is retained between calls, and no failure mode throws.
//! Malformed rules and dangling references surface as diagnostic
//! violations so the host never needs a fallback error state.

mod checks;
mod conditions;

use std::collections::{BTreeSet, HashMap};

use chrono::Utc;
use petgraph::algo::is_cyclic_directed;
use petgraph::graph::DiGraph;

use crate::model::{
    CanvasComponent, Combinator, Component, ConstraintKind, Panel, Rule, RuleScope,
    RuleViolation, Severity, SpecValue,
};

/// Horizontal spacing between panels in the shared canvas frame, assumed
/// when the host does not supply one.
pub const DEFAULT_PANEL_SPACING: f64 = 50.0;

/// Catalog entry a placement resolves to. Components and combinators share
/// the read surface the checks need.
#[derive(Clone, Copy)]
pub(crate) enum CatalogEntry<'a> {
    Component(&'a Component),
    Combinator(&'a Combinator),
}

impl<'a> CatalogEntry<'a> {
    pub fn name(&self) -> &'a str {
        match self {
            CatalogEntry::Component(c) => &c.name,
            CatalogEntry::Combinator(c) => &c.name,
        }
    }

    pub fn type_label(&self) -> &'a str {
        match self {
            CatalogEntry::Component(c) => &c.component_type,
            CatalogEntry::Combinator(_) => "combinator",
        }
    }

    pub fn width(&self) -> f64 {
        match self {
            CatalogEntry::Component(c) => c.width,
            CatalogEntry::Combinator(c) => c.width,
        }
    }

    pub fn height(&self) -> f64 {
        match self {
            CatalogEntry::Component(c) => c.height,
            CatalogEntry::Combinator(c) => c.height,
        }
    }

    pub fn depth(&self) -> Option<f64> {
        match self {
            CatalogEntry::Component(c) => c.depth,
            CatalogEntry::Combinator(c) => c.depth,
        }
    }

    pub fn spec(&self, key: &str) -> Option<&'a SpecValue> {
        match self {
            CatalogEntry::Component(c) => c.specs.get(key),
            CatalogEntry::Combinator(_) => None,
        }
    }

    pub fn category(&self) -> Option<&'a str> {
        match self {
            CatalogEntry::Component(c) => c.category.as_deref(),
            CatalogEntry::Combinator(_) => None,
        }
    }

    pub fn color(&self) -> Option<&'a str> {
        match self {
            CatalogEntry::Component(c) => c.color.as_deref(),
            CatalogEntry::Combinator(_) => None,
        }
    }

    pub fn brand(&self) -> Option<&'a str> {
        match self {
            CatalogEntry::Component(_) => None,
            CatalogEntry::Combinator(c) => c.brand.as_deref(),
        }
    }

    pub fn series(&self) -> Option<&'a str> {
        match self {
            CatalogEntry::Component(_) => None,
            CatalogEntry::Combinator(c) => c.series.as_deref(),
        }
    }

    pub fn current_a(&self) -> Option<f64> {
        match self {
            CatalogEntry::Component(c) => c.spec_number("current"),
            CatalogEntry::Combinator(c) => c.current_a,
        }
    }

    pub fn pole(&self) -> Option<&'a str> {
        match self {
            CatalogEntry::Component(_) => None,
            CatalogEntry::Combinator(c) => c.pole.as_deref(),
        }
    }

    /// The size class the entry is built for, when declared.
    pub fn panel_size(&self) -> Option<u32> {
        match self {
            CatalogEntry::Component(c) => c.spec_number("panelSize").map(|v| v.round() as u32),
            CatalogEntry::Combinator(c) => c.panel_size,
        }
    }
}

/// A placement together with its resolved catalog entry, after condition
/// gating.
pub(crate) struct Entity<'a> {
    pub placement: &'a CanvasComponent,
    pub entry: CatalogEntry<'a>,
}

pub(crate) struct EvalContext<'a> {
    pub panels: &'a [Panel],
    pub placements: &'a [CanvasComponent],
    components: HashMap<&'a str, &'a Component>,
    combinators: HashMap<&'a str, &'a Combinator>,
    /// Left edge of each panel in the shared canvas frame: panels lay out
    /// left to right in list order, separated by the panel spacing.
    panel_offsets: HashMap<&'a str, f64>,
}

impl<'a> EvalContext<'a> {
    fn new(
        panels: &'a [Panel],
        placements: &'a [CanvasComponent],
        component_library: &'a [Component],
        combinator_library: &'a [Combinator],
        panel_spacing: f64,
    ) -> Self {
        let mut panel_offsets = HashMap::new();
        let mut offset = 0.0;
        for panel in panels {
            panel_offsets.insert(panel.id.as_str(), offset);
            offset += panel.width + panel_spacing;
        }
        Self {
            panels,
            placements,
            components: component_library
                .iter()
                .map(|c| (c.id.as_str(), c))
                .collect(),
            combinators: combinator_library
                .iter()
                .map(|c| (c.id.as_str(), c))
                .collect(),
            panel_offsets,
        }
    }

    pub fn panel(&self, id: &str) -> Option<&'a Panel> {
        self.panels.iter().find(|p| p.id == id)
    }

    pub fn panel_offset(&self, id: &str) -> Option<f64> {
        self.panel_offsets.get(id).copied()
    }

    /// Components shadow combinators on an id collision; the libraries are
    /// expected to be disjoint.
    pub fn resolve(&self, catalog_id: &str) -> Option<CatalogEntry<'a>> {
        self.components
            .get(catalog_id)
            .copied()
            .map(CatalogEntry::Component)
            .or_else(|| {
                self.combinators
                    .get(catalog_id)
                    .copied()
                    .map(CatalogEntry::Combinator)
            })
    }
}

/// The sole evaluation entry point: rules against a design snapshot and
/// catalog libraries, producing violations in rule evaluation order, then
/// entity encounter order. Deterministic for identical inputs (up to
/// generated ids and timestamps).
pub fn evaluate_rules(
    rules: &[Rule],
    panels: &[Panel],
    placements: &[CanvasComponent],
    component_library: &[Component],
    combinator_library: &[Combinator],
) -> Vec<RuleViolation> {
    evaluate_rules_with_spacing(
        rules,
        panels,
        placements,
        component_library,
        combinator_library,
        DEFAULT_PANEL_SPACING,
    )
}

/// [`evaluate_rules`] with an explicit inter-panel spacing for the shared
/// canvas frame used by cross-panel intersection checks.
pub fn evaluate_rules_with_spacing(
    rules: &[Rule],
    panels: &[Panel],
    placements: &[CanvasComponent],
    component_library: &[Component],
    combinator_library: &[Combinator],
    panel_spacing: f64,
) -> Vec<RuleViolation> {
    let ctx = EvalContext::new(
        panels,
        placements,
        component_library,
        combinator_library,
        panel_spacing,
    );
    let mut violations = Vec::new();

    for index in evaluation_order(rules) {
        let rule = &rules[index];
        if !rule.enabled {
            tracing::debug!(rule = %rule.id, "rule disabled, skipping");
            continue;
        }
        if let Some(defect) = invalid_definition(rule) {
            tracing::warn!(rule = %rule.id, defect = %defect, "skipping invalid rule");
            violations.push(new_violation(
                rule,
                Severity::Error,
                format!("Rule '{}' skipped: {}", rule.name, defect),
            ));
            continue;
        }
        evaluate_rule(&ctx, rule, &mut violations);
    }

    tracing::debug!(
        rules = rules.len(),
        violations = violations.len(),
        "rule evaluation complete"
    );
    violations
}

/// Declared dependencies evaluate first; ties keep declaration order.
/// Unknown dependency ids are ignored and a cyclic dependency graph falls
/// back to declaration order. Dependencies affect ordering only.
fn evaluation_order(rules: &[Rule]) -> Vec<usize> {
    if rules.iter().all(|r| r.dependencies.is_empty()) {
        return (0..rules.len()).collect();
    }

    let index_of: HashMap<&str, usize> = rules
        .iter()
        .enumerate()
        .map(|(i, r)| (r.id.as_str(), i))
        .collect();
    let mut edges: Vec<(usize, usize)> = Vec::new();
    for (i, rule) in rules.iter().enumerate() {
        for dep in &rule.dependencies {
            match index_of.get(dep.as_str()) {
                Some(&d) if d != i => edges.push((d, i)),
                Some(_) => {}
                None => {
                    tracing::debug!(rule = %rule.id, dependency = %dep, "ignoring unknown rule dependency")
                }
            }
        }
    }

    let graph: DiGraph<(), ()> =
        DiGraph::from_edges(edges.iter().map(|&(a, b)| (a as u32, b as u32)));
    if is_cyclic_directed(&graph) {
        tracing::warn!("cyclic rule dependencies, keeping declaration order");
        return (0..rules.len()).collect();
    }

    let n = rules.len();
    let mut indegree = vec![0usize; n];
    let mut successors: Vec<Vec<usize>> = vec![Vec::new(); n];
    for &(d, i) in &edges {
        indegree[i] += 1;
        successors[d].push(i);
    }
    let mut ready: BTreeSet<usize> = (0..n).filter(|&i| indegree[i] == 0).collect();
    let mut order = Vec::with_capacity(n);
    while let Some(i) = ready.pop_first() {
        order.push(i);
        for &j in &successors[i] {
            indegree[j] -= 1;
            if indegree[j] == 0 {
                ready.insert(j);
            }
        }
    }
    order
}

/// Semantic defects that make a rule unevaluable. The typed constraint
/// model keeps unknown kinds and wrong field combinations out at the
/// boundary; what remains are degenerate field values.
fn invalid_definition(rule: &Rule) -> Option<String> {
    for constraint in &rule.constraints {
        let defect = match &constraint.kind {
            ConstraintKind::Dimension { property, min, max } => {
                if property.is_empty() {
                    Some("dimension constraint has an empty property".to_string())
                } else if min.is_none() && max.is_none() {
                    Some("dimension constraint needs min or max".to_string())
                } else if min.zip(*max).map_or(false, |(lo, hi)| lo > hi) {
                    Some(format!(
                        "dimension bounds are inverted (min {} > max {})",
                        min.unwrap_or_default(),
                        max.unwrap_or_default()
                    ))
                } else {
                    None
                }
            }
            ConstraintKind::Count { min, max, value } => {
                if min.is_none() && max.is_none() && value.is_none() {
                    Some("count constraint needs min, max or value".to_string())
                } else if min.zip(*max).map_or(false, |(lo, hi)| lo > hi) {
                    Some(format!(
                        "count bounds are inverted (min {} > max {})",
                        min.unwrap_or_default(),
                        max.unwrap_or_default()
                    ))
                } else {
                    None
                }
            }
            ConstraintKind::Spacing { spacing } => {
                if !spacing.is_finite() || *spacing < 0.0 {
                    Some(format!("spacing {} is not a usable clearance", spacing))
                } else {
                    None
                }
            }
            ConstraintKind::CoUsage {
                target_component_id,
                ..
            } => {
                if target_component_id.is_empty() {
                    Some("co-usage constraint has an empty target".to_string())
                } else {
                    None
                }
            }
            ConstraintKind::Overlap
            | ConstraintKind::Bounds
            | ConstraintKind::NoIntersectWithPanelBounds { .. }
            | ConstraintKind::PanelSizeMapping { .. } => None,
        };
        if defect.is_some() {
            return defect;
        }
    }
    None
}

fn evaluate_rule(ctx: &EvalContext, rule: &Rule, out: &mut Vec<RuleViolation>) {
    let candidates: Vec<&CanvasComponent> = match &rule.scope {
        RuleScope::Global => ctx.placements.iter().collect(),
        RuleScope::Panel { panel_id } => {
            if ctx.panel(panel_id).is_none() {
                out.push(new_violation(
                    rule,
                    Severity::Error,
                    format!(
                        "Rule '{}' targets panel '{}' which does not exist",
                        rule.name, panel_id
                    ),
                ));
                return;
            }
            ctx.placements
                .iter()
                .filter(|p| &p.panel_id == panel_id)
                .collect()
        }
        RuleScope::Component { component_id } => {
            if !ctx.components.contains_key(component_id.as_str()) {
                out.push(new_violation(
                    rule,
                    Severity::Error,
                    format!(
                        "Rule '{}' targets component '{}' which is not in the library",
                        rule.name, component_id
                    ),
                ));
                return;
            }
            ctx.placements
                .iter()
                .filter(|p| &p.component_id == component_id)
                .collect()
        }
        RuleScope::Combinator { combinator_id } => {
            if !ctx.combinators.contains_key(combinator_id.as_str()) {
                out.push(new_violation(
                    rule,
                    Severity::Error,
                    format!(
                        "Rule '{}' targets combinator '{}' which is not in the library",
                        rule.name, combinator_id
                    ),
                ));
                return;
            }
            ctx.placements
                .iter()
                .filter(|p| &p.component_id == combinator_id)
                .collect()
        }
    };

    let mut entities = Vec::new();
    for placement in candidates {
        match ctx.resolve(&placement.component_id) {
            Some(entry) => {
                if conditions::conditions_hold(&rule.conditions, placement, &entry) {
                    entities.push(Entity { placement, entry });
                }
            }
            None => {
                tracing::debug!(
                    placement = %placement.id,
                    catalog = %placement.component_id,
                    "dangling catalog reference"
                );
                let mut violation = new_violation(
                    rule,
                    Severity::Error,
                    format!(
                        "Placement '{}' references missing catalog definition '{}'",
                        placement.id, placement.component_id
                    ),
                );
                violation.component_id = Some(placement.id.clone());
                out.push(violation);
            }
        }
    }

    for constraint in &rule.constraints {
        checks::check_constraint(ctx, rule, constraint, &entities, out);
    }
}

pub(crate) fn new_violation(rule: &Rule, severity: Severity, message: String) -> RuleViolation {
    RuleViolation {
        id: uuid::Uuid::new_v4().to_string(),
        rule_id: rule.id.clone(),
        rule_name: rule.name.clone(),
        severity,
        message,
        component_id: None,
        component_ids: Vec::new(),
        timestamp: Utc::now(),
        missing_component_id: None,
        required_component_id: None,
    }
}
