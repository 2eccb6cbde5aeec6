//! Catalog definitions: placeable component types and combinators.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A free-form spec value. Catalog attributes arrive from the editor UI as
/// either numbers or strings; the engine must tolerate both spellings of the
/// same quantity ("16" vs 16).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SpecValue {
    Number(f64),
    Text(String),
}

impl SpecValue {
    /// Numeric reading; string payloads are parsed on demand.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            SpecValue::Number(n) if n.is_finite() => Some(*n),
            SpecValue::Number(_) => None,
            SpecValue::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        }
    }

    /// Display form used for dedup and ordering in the extraction helpers.
    /// Whole numbers render without a trailing ".0" so "16" and 16.0 collapse
    /// to the same dropdown entry.
    pub fn display(&self) -> String {
        match self {
            SpecValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                format!("{}", *n as i64)
            }
            SpecValue::Number(n) => format!("{}", n),
            SpecValue::Text(s) => s.clone(),
        }
    }
}

impl From<f64> for SpecValue {
    fn from(n: f64) -> Self {
        SpecValue::Number(n)
    }
}

impl From<&str> for SpecValue {
    fn from(s: &str) -> Self {
        SpecValue::Text(s.to_string())
    }
}

/// A placeable part type from the component library.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    pub id: String,
    pub name: String,
    /// Functional class, e.g. "switch", "breaker".
    #[serde(rename = "type")]
    pub component_type: String,
    #[serde(default)]
    pub category: Option<String>,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub depth: Option<f64>,
    #[serde(default)]
    pub color: Option<String>,
    /// Open attribute bag (current, voltage, power, panelSize, ...). Keys are
    /// not schema-checked; readers parse-and-validate.
    #[serde(default)]
    pub specs: HashMap<String, SpecValue>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Catalog ids that must co-occur on the same panel as this component.
    #[serde(default)]
    pub required_components: Vec<String>,
}

impl Component {
    pub fn spec(&self, key: &str) -> Option<&SpecValue> {
        self.specs.get(key)
    }

    pub fn spec_number(&self, key: &str) -> Option<f64> {
        self.specs.get(key).and_then(SpecValue::as_number)
    }
}

/// A named, ordered composite of catalog components treated as a single
/// placeable unit. `component_ids` may only reference catalog components,
/// never another combinator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Combinator {
    pub id: String,
    pub name: String,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub depth: Option<f64>,
    /// Ordered member ids; duplicates allowed.
    #[serde(default)]
    pub component_ids: Vec<String>,
    /// Spacing sequence: one gap before the first member, one after each.
    /// Expected length is `component_ids.len() + 1`; consumers normalize
    /// rather than fail when an editor payload disagrees.
    #[serde(default)]
    pub gaps: Option<Vec<f64>>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub series: Option<String>,
    #[serde(default)]
    pub current_a: Option<f64>,
    #[serde(default)]
    pub pole: Option<String>,
    #[serde(default)]
    pub panel_size: Option<u32>,
}
