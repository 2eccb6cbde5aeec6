//! Condition gating: dot-path field resolution over an evaluated entity
//! and operator application. An unresolvable field fails the condition, so
//! the rule simply does not apply to that entity.

use crate::model::{CanvasComponent, ConditionOperator, ConditionValue, RuleCondition, SpecValue};

use super::CatalogEntry;

pub(crate) fn conditions_hold(
    conditions: &[RuleCondition],
    placement: &CanvasComponent,
    entry: &CatalogEntry,
) -> bool {
    conditions
        .iter()
        .all(|condition| condition_holds(condition, placement, entry))
}

fn condition_holds(
    condition: &RuleCondition,
    placement: &CanvasComponent,
    entry: &CatalogEntry,
) -> bool {
    match resolve_field(placement, entry, &condition.field) {
        Some(actual) => apply_operator(&actual, condition.operator, &condition.value),
        None => false,
    }
}

/// Resolves a dot-path against the placement first, then its catalog entry.
/// The two namespaces are disjoint (placement carries position and
/// properties, the catalog entry carries identity, dimensions and specs).
pub(crate) fn resolve_field(
    placement: &CanvasComponent,
    entry: &CatalogEntry,
    path: &str,
) -> Option<SpecValue> {
    let (head, rest) = match path.split_once('.') {
        Some((head, rest)) => (head, Some(rest)),
        None => (path, None),
    };
    match head {
        "id" => Some(SpecValue::Text(placement.id.clone())),
        "componentId" => Some(SpecValue::Text(placement.component_id.clone())),
        "panelId" => Some(SpecValue::Text(placement.panel_id.clone())),
        "x" => Some(SpecValue::Number(placement.x)),
        "y" => Some(SpecValue::Number(placement.y)),
        "rotation" => placement.rotation.map(SpecValue::Number),
        "scale" => placement.scale.map(SpecValue::Number),
        "properties" => rest.and_then(|key| placement.properties.get(key).cloned()),
        "specs" => rest.and_then(|key| entry.spec(key).cloned()),
        "type" => Some(SpecValue::Text(entry.type_label().to_string())),
        "name" => Some(SpecValue::Text(entry.name().to_string())),
        "category" => entry.category().map(|c| SpecValue::Text(c.to_string())),
        "width" => Some(SpecValue::Number(entry.width())),
        "height" => Some(SpecValue::Number(entry.height())),
        "depth" => entry.depth().map(SpecValue::Number),
        "color" => entry.color().map(|c| SpecValue::Text(c.to_string())),
        "brand" => entry.brand().map(|b| SpecValue::Text(b.to_string())),
        "series" => entry.series().map(|s| SpecValue::Text(s.to_string())),
        "currentA" => entry.current_a().map(SpecValue::Number),
        "pole" => entry.pole().map(|p| SpecValue::Text(p.to_string())),
        "panelSize" => entry.panel_size().map(|v| SpecValue::Number(v as f64)),
        _ => None,
    }
}

fn apply_operator(actual: &SpecValue, operator: ConditionOperator, expected: &ConditionValue) -> bool {
    match operator {
        ConditionOperator::Equals => scalar_equals(actual, expected),
        ConditionOperator::NotEquals => !scalar_equals(actual, expected),
        ConditionOperator::GreaterThan => compare_numbers(actual, expected).map_or(false, |(a, b)| a > b),
        ConditionOperator::LessThan => compare_numbers(actual, expected).map_or(false, |(a, b)| a < b),
        ConditionOperator::Contains => match expected {
            ConditionValue::Many(items) => items.iter().any(|item| scalar_equals(actual, item)),
            scalar => actual.display().contains(&scalar_display(scalar)),
        },
        ConditionOperator::In => match expected {
            ConditionValue::Many(items) => items.iter().any(|item| scalar_equals(actual, item)),
            scalar => scalar_equals(actual, scalar),
        },
    }
}

/// Numeric comparison when both sides read as numbers, string comparison
/// otherwise. An array never equals a scalar.
fn scalar_equals(actual: &SpecValue, expected: &ConditionValue) -> bool {
    match expected {
        ConditionValue::Many(_) => false,
        scalar => match (actual.as_number(), scalar_number(scalar)) {
            (Some(a), Some(b)) => a == b,
            _ => actual.display() == scalar_display(scalar),
        },
    }
}

fn compare_numbers(actual: &SpecValue, expected: &ConditionValue) -> Option<(f64, f64)> {
    Some((actual.as_number()?, scalar_number(expected)?))
}

fn scalar_number(value: &ConditionValue) -> Option<f64> {
    match value {
        ConditionValue::Number(n) if n.is_finite() => Some(*n),
        ConditionValue::Number(_) => None,
        ConditionValue::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        ConditionValue::Many(_) => None,
    }
}

fn scalar_display(value: &ConditionValue) -> String {
    match value {
        ConditionValue::Number(n) => SpecValue::Number(*n).display(),
        ConditionValue::Text(s) => s.clone(),
        ConditionValue::Many(_) => String::new(),
    }
}
