//! Derived geometry over catalog data.

use serde::{Deserialize, Serialize};

use crate::model::{Combinator, Component};

/// Bounding dimensions of a vertical stack of components, in millimeters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
}

/// Bounding dimensions of a stack: width is the widest member (0 when
/// empty), height is the member heights plus the gap before the first
/// member and after each one. `gaps` is normalized to
/// `components.len() + 1` entries — zero-padded when short, truncated when
/// long — so a stale editor payload cannot fail the calculation.
pub fn calculate_combinator_dimensions(components: &[Component], gaps: &[f64]) -> Dimensions {
    let expected = components.len() + 1;
    if gaps.len() != expected {
        tracing::debug!(
            expected,
            actual = gaps.len(),
            "normalizing combinator gap sequence"
        );
    }
    let width = components.iter().map(|c| c.width).fold(0.0, f64::max);
    let gap_sum: f64 = gaps.iter().take(expected).sum();
    let height = components.iter().map(|c| c.height).sum::<f64>() + gap_sum;
    Dimensions { width, height }
}

/// Recomputes a combinator's stack dimensions from the component library.
/// Member ids that do not resolve to a catalog component are skipped; ids
/// of other combinators never resolve (nesting is not allowed).
pub fn combinator_stack_dimensions(combinator: &Combinator, library: &[Component]) -> Dimensions {
    let members: Vec<Component> = combinator
        .component_ids
        .iter()
        .filter_map(|id| library.iter().find(|c| &c.id == id).cloned())
        .collect();
    if members.len() != combinator.component_ids.len() {
        tracing::debug!(
            combinator = %combinator.id,
            resolved = members.len(),
            declared = combinator.component_ids.len(),
            "skipping unresolved combinator members"
        );
    }
    let gaps = combinator.gaps.as_deref().unwrap_or(&[]);
    calculate_combinator_dimensions(&members, gaps)
}

/// Nearest cm-denominated panel size class: 600mm wide maps to class 60.
pub fn panel_size_from_width(width_mm: f64) -> u32 {
    if !width_mm.is_finite() || width_mm <= 0.0 {
        return 0;
    }
    (width_mm / 10.0).round() as u32
}

/// Components whose `specs.panelSize` matches the class derived from the
/// panel width, further narrowed by functional type when one is given.
/// No match yields an empty vec, never an error.
pub fn filter_by_size_and_type<'a>(
    components: &'a [Component],
    panel_width_mm: f64,
    component_type: Option<&str>,
) -> Vec<&'a Component> {
    let size = panel_size_from_width(panel_width_mm);
    components
        .iter()
        .filter(|c| {
            c.spec_number("panelSize")
                .map(|v| v.round() as u32 == size)
                .unwrap_or(false)
        })
        .filter(|c| component_type.map_or(true, |t| c.component_type == t))
        .collect()
}
