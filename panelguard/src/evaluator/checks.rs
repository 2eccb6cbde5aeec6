//! The eight constraint checks. Each runs independently over the gated
//! entity set and appends one violation per failing occurrence.

use crate::catalog::panel_size_from_width;
use crate::model::{Constraint, ConstraintKind, Rule, RuleViolation, Severity};

use super::conditions::resolve_field;
use super::{new_violation, Entity, EvalContext};

pub(crate) fn check_constraint(
    ctx: &EvalContext,
    rule: &Rule,
    constraint: &Constraint,
    entities: &[Entity],
    out: &mut Vec<RuleViolation>,
) {
    match &constraint.kind {
        ConstraintKind::Dimension { property, min, max } => {
            check_dimension(rule, constraint, property, *min, *max, entities, out)
        }
        ConstraintKind::Count { min, max, value } => {
            check_count(rule, constraint, *min, *max, *value, entities, out)
        }
        ConstraintKind::Spacing { spacing } => {
            check_spacing(rule, constraint, *spacing, entities, out)
        }
        ConstraintKind::CoUsage {
            target_component_id,
            required_component_ids,
        } => check_co_usage(
            ctx,
            rule,
            constraint,
            target_component_id,
            required_component_ids,
            entities,
            out,
        ),
        ConstraintKind::Overlap => check_overlap(ctx, rule, constraint, entities, out),
        ConstraintKind::Bounds => check_bounds(ctx, rule, constraint, entities, out),
        ConstraintKind::NoIntersectWithPanelBounds { panel_ids } => {
            check_panel_intersections(ctx, rule, constraint, panel_ids, entities, out)
        }
        ConstraintKind::PanelSizeMapping {
            component_types,
            panel_size,
        } => check_panel_size_mapping(
            ctx,
            rule,
            constraint,
            component_types,
            *panel_size,
            entities,
            out,
        ),
    }
}

fn emit(rule: &Rule, constraint: &Constraint, default_message: String) -> RuleViolation {
    new_violation(
        rule,
        constraint.effective_severity(),
        constraint.message.clone().unwrap_or(default_message),
    )
}

#[derive(Debug, Clone, Copy)]
struct Rect {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

impl Rect {
    fn right(&self) -> f64 {
        self.x + self.width
    }

    fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Strict intersection: rectangles that merely touch do not intersect.
    fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Axis-aligned edge-to-edge clearance, 0 when touching or overlapping.
    fn clearance(&self, other: &Rect) -> f64 {
        let dx = (other.x - self.right()).max(self.x - other.right()).max(0.0);
        let dy = (other.y - self.bottom())
            .max(self.y - other.bottom())
            .max(0.0);
        (dx * dx + dy * dy).sqrt()
    }
}

fn entity_rect(entity: &Entity) -> Rect {
    Rect {
        x: entity.placement.x,
        y: entity.placement.y,
        width: entity.entry.width(),
        height: entity.entry.height(),
    }
}

fn check_dimension(
    rule: &Rule,
    constraint: &Constraint,
    property: &str,
    min: Option<f64>,
    max: Option<f64>,
    entities: &[Entity],
    out: &mut Vec<RuleViolation>,
) {
    for entity in entities {
        // Open bags tolerate missing keys; only a present numeric value is
        // checked.
        let Some(value) =
            resolve_field(entity.placement, &entity.entry, property).and_then(|v| v.as_number())
        else {
            continue;
        };
        let default_message = if min.map_or(false, |lo| value < lo) {
            format!(
                "{} {} of '{}' is below minimum {}",
                property,
                value,
                entity.entry.name(),
                min.unwrap_or_default()
            )
        } else if max.map_or(false, |hi| value > hi) {
            format!(
                "{} {} of '{}' exceeds maximum {}",
                property,
                value,
                entity.entry.name(),
                max.unwrap_or_default()
            )
        } else {
            continue;
        };
        let mut violation = emit(rule, constraint, default_message);
        violation.component_id = Some(entity.placement.id.clone());
        out.push(violation);
    }
}

fn check_count(
    rule: &Rule,
    constraint: &Constraint,
    min: Option<usize>,
    max: Option<usize>,
    value: Option<usize>,
    entities: &[Entity],
    out: &mut Vec<RuleViolation>,
) {
    let count = entities.len();
    let failure = if let Some(expected) = value {
        (count != expected).then(|| {
            format!(
                "expected exactly {} matching component(s), found {}",
                expected, count
            )
        })
    } else if min.map_or(false, |lo| count < lo) {
        Some(format!(
            "expected at least {} matching component(s), found {}",
            min.unwrap_or_default(),
            count
        ))
    } else if max.map_or(false, |hi| count > hi) {
        Some(format!(
            "expected at most {} matching component(s), found {}",
            max.unwrap_or_default(),
            count
        ))
    } else {
        None
    };

    if let Some(message) = failure {
        let mut violation = emit(rule, constraint, message);
        violation.component_ids = entities.iter().map(|e| e.placement.id.clone()).collect();
        out.push(violation);
    }
}

fn check_spacing(
    rule: &Rule,
    constraint: &Constraint,
    spacing: f64,
    entities: &[Entity],
    out: &mut Vec<RuleViolation>,
) {
    for i in 0..entities.len() {
        for j in (i + 1)..entities.len() {
            let (a, b) = (&entities[i], &entities[j]);
            if a.placement.panel_id != b.placement.panel_id {
                continue;
            }
            let gap = entity_rect(a).clearance(&entity_rect(b));
            if gap < spacing {
                let mut violation = emit(
                    rule,
                    constraint,
                    format!(
                        "'{}' and '{}' are {:.1}mm apart, minimum spacing is {:.1}mm",
                        a.entry.name(),
                        b.entry.name(),
                        gap,
                        spacing
                    ),
                );
                violation.component_ids =
                    vec![a.placement.id.clone(), b.placement.id.clone()];
                out.push(violation);
            }
        }
    }
}

fn check_co_usage(
    ctx: &EvalContext,
    rule: &Rule,
    constraint: &Constraint,
    target_component_id: &str,
    required_component_ids: &[String],
    entities: &[Entity],
    out: &mut Vec<RuleViolation>,
) {
    for entity in entities
        .iter()
        .filter(|e| e.placement.component_id == target_component_id)
    {
        for required in required_component_ids {
            // Required companions may sit anywhere on the same panel, not
            // just inside the rule's scope.
            let present = ctx.placements.iter().any(|p| {
                p.panel_id == entity.placement.panel_id && &p.component_id == required
            });
            if present {
                continue;
            }
            let required_name = ctx
                .resolve(required)
                .map(|e| e.name().to_string())
                .unwrap_or_else(|| required.clone());
            let mut violation = emit(
                rule,
                constraint,
                format!(
                    "'{}' requires '{}' on the same panel",
                    entity.entry.name(),
                    required_name
                ),
            );
            violation.component_id = Some(entity.placement.id.clone());
            violation.missing_component_id = Some(required.clone());
            violation.required_component_id = Some(target_component_id.to_string());
            out.push(violation);
        }
    }
}

fn check_overlap(
    ctx: &EvalContext,
    rule: &Rule,
    constraint: &Constraint,
    entities: &[Entity],
    out: &mut Vec<RuleViolation>,
) {
    for i in 0..entities.len() {
        for j in (i + 1)..entities.len() {
            let (a, b) = (&entities[i], &entities[j]);
            if a.placement.panel_id != b.placement.panel_id {
                continue;
            }
            if entity_rect(a).intersects(&entity_rect(b)) {
                let panel_name = ctx
                    .panel(&a.placement.panel_id)
                    .map(|p| p.name.as_str())
                    .unwrap_or(a.placement.panel_id.as_str());
                let mut violation = emit(
                    rule,
                    constraint,
                    format!(
                        "'{}' overlaps '{}' on panel '{}'",
                        a.entry.name(),
                        b.entry.name(),
                        panel_name
                    ),
                );
                violation.component_ids =
                    vec![a.placement.id.clone(), b.placement.id.clone()];
                out.push(violation);
            }
        }
    }
}

fn check_bounds(
    ctx: &EvalContext,
    rule: &Rule,
    constraint: &Constraint,
    entities: &[Entity],
    out: &mut Vec<RuleViolation>,
) {
    for entity in entities {
        let Some(panel) = ctx.panel(&entity.placement.panel_id) else {
            let mut violation = new_violation(
                rule,
                Severity::Error,
                format!(
                    "Placement '{}' references missing panel '{}'",
                    entity.placement.id, entity.placement.panel_id
                ),
            );
            violation.component_id = Some(entity.placement.id.clone());
            out.push(violation);
            continue;
        };
        let rect = entity_rect(entity);
        if rect.x < 0.0 || rect.y < 0.0 || rect.right() > panel.width || rect.bottom() > panel.height
        {
            let mut violation = emit(
                rule,
                constraint,
                format!(
                    "'{}' extends outside panel '{}' ({}x{}mm)",
                    entity.entry.name(),
                    panel.name,
                    panel.width,
                    panel.height
                ),
            );
            violation.component_id = Some(entity.placement.id.clone());
            out.push(violation);
        }
    }
}

fn check_panel_intersections(
    ctx: &EvalContext,
    rule: &Rule,
    constraint: &Constraint,
    panel_ids: &[String],
    entities: &[Entity],
    out: &mut Vec<RuleViolation>,
) {
    for listed in panel_ids {
        if ctx.panel(listed).is_none() {
            out.push(new_violation(
                rule,
                Severity::Error,
                format!(
                    "Rule '{}' lists panel '{}' which does not exist",
                    rule.name, listed
                ),
            ));
        }
    }

    for entity in entities {
        let Some(own_offset) = ctx.panel_offset(&entity.placement.panel_id) else {
            tracing::debug!(
                placement = %entity.placement.id,
                panel = %entity.placement.panel_id,
                "placement panel missing from layout frame"
            );
            continue;
        };
        let rect = entity_rect(entity);
        let absolute = Rect {
            x: own_offset + rect.x,
            ..rect
        };
        for listed in panel_ids {
            if listed == &entity.placement.panel_id {
                continue;
            }
            let Some(panel) = ctx.panel(listed) else {
                continue;
            };
            let offset = ctx.panel_offset(listed).unwrap_or(0.0);
            let panel_rect = Rect {
                x: offset,
                y: 0.0,
                width: panel.width,
                height: panel.height,
            };
            if absolute.intersects(&panel_rect) {
                let mut violation = emit(
                    rule,
                    constraint,
                    format!(
                        "'{}' reaches into panel '{}'",
                        entity.entry.name(),
                        panel.name
                    ),
                );
                violation.component_id = Some(entity.placement.id.clone());
                out.push(violation);
            }
        }
    }
}

fn check_panel_size_mapping(
    ctx: &EvalContext,
    rule: &Rule,
    constraint: &Constraint,
    component_types: &[String],
    override_size: Option<u32>,
    entities: &[Entity],
    out: &mut Vec<RuleViolation>,
) {
    for entity in entities {
        if !component_types.is_empty()
            && !component_types
                .iter()
                .any(|t| t == entity.entry.type_label())
        {
            continue;
        }
        // A component without a declared size class is not size-constrained.
        let Some(actual) = entity.entry.panel_size() else {
            continue;
        };
        let Some(panel) = ctx.panel(&entity.placement.panel_id) else {
            continue;
        };
        let expected = override_size.unwrap_or_else(|| panel_size_from_width(panel.width));
        if actual != expected {
            let mut violation = emit(
                rule,
                constraint,
                format!(
                    "'{}' is sized for panel class {} but panel '{}' is class {}",
                    entity.entry.name(),
                    actual,
                    panel.name,
                    expected
                ),
            );
            violation.component_id = Some(entity.placement.id.clone());
            out.push(violation);
        }
    }
}
