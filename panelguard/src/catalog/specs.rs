//! Spec-bag extraction feeding the editor UIs' dropdowns. The contract that
//! matters here is stable, deterministic ordering: numeric values sort
//! numerically and come first, everything else follows lexicographically.

use std::collections::HashSet;

use crate::model::{Combinator, Component, SpecValue};

/// Distinct display values present under `key` across the collection.
pub fn extract_spec_values(components: &[Component], key: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut values = Vec::new();
    for component in components {
        if let Some(value) = component.spec(key) {
            let display = value.display();
            if seen.insert(display.clone()) {
                values.push(display);
            }
        }
    }
    sort_mixed(&mut values);
    values
}

/// Distinct ampere ratings (`specs.current`).
pub fn extract_a_values(components: &[Component]) -> Vec<String> {
    extract_spec_values(components, "current")
}

/// Distinct voltage ratings (`specs.voltage`).
pub fn extract_v_values(components: &[Component]) -> Vec<String> {
    extract_spec_values(components, "voltage")
}

/// Distinct power ratings (`specs.power`).
pub fn extract_p_values(components: &[Component]) -> Vec<String> {
    extract_spec_values(components, "power")
}

pub fn extract_combinator_brands(combinators: &[Combinator]) -> Vec<String> {
    extract_field(combinators, |c| c.brand.clone())
}

pub fn extract_combinator_series(combinators: &[Combinator]) -> Vec<String> {
    extract_field(combinators, |c| c.series.clone())
}

pub fn extract_combinator_currents(combinators: &[Combinator]) -> Vec<String> {
    extract_field(combinators, |c| {
        c.current_a.map(|a| SpecValue::Number(a).display())
    })
}

pub fn extract_combinator_poles(combinators: &[Combinator]) -> Vec<String> {
    extract_field(combinators, |c| c.pole.clone())
}

fn extract_field<F>(combinators: &[Combinator], field: F) -> Vec<String>
where
    F: Fn(&Combinator) -> Option<String>,
{
    let mut seen = HashSet::new();
    let mut values = Vec::new();
    for combinator in combinators {
        if let Some(value) = field(combinator) {
            if seen.insert(value.clone()) {
                values.push(value);
            }
        }
    }
    sort_mixed(&mut values);
    values
}

fn parse_finite(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Numeric values first, ordered numerically among themselves; non-numeric
/// values after, ordered lexicographically.
fn sort_mixed(values: &mut [String]) {
    values.sort_by(|a, b| match (parse_finite(a), parse_finite(b)) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => a.cmp(b),
    });
}
