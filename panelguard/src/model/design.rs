//! Design snapshot: panels and the components placed on them.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::catalog::SpecValue;

/// A rectangular enclosure housing placed components. Dimensions are in
/// millimeters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Panel {
    pub id: String,
    pub name: String,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub depth: Option<f64>,
    #[serde(default, rename = "type")]
    pub panel_type: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    /// References into the excluded asset layer; carried, never dereferenced.
    #[serde(default)]
    pub model_2d: Option<String>,
    #[serde(default)]
    pub model_3d: Option<String>,
}

/// One placement of a catalog component or combinator on a specific panel.
/// `x`/`y` is the top-left corner relative to the panel origin.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasComponent {
    pub id: String,
    /// References `Component::id` or `Combinator::id`.
    pub component_id: String,
    /// Owning panel; deleting a panel cascades to its placements.
    pub panel_id: String,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub rotation: Option<f64>,
    #[serde(default)]
    pub scale: Option<f64>,
    #[serde(default)]
    pub properties: HashMap<String, SpecValue>,
}

/// The full design snapshot handed to the evaluator by the host.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Design {
    #[serde(default)]
    pub panels: Vec<Panel>,
    #[serde(default)]
    pub components: Vec<CanvasComponent>,
    #[serde(default)]
    pub active_panel_id: Option<String>,
    /// Horizontal spacing between panels in the shared canvas frame,
    /// consumed by cross-panel intersection checks.
    #[serde(default)]
    pub panel_spacing: Option<f64>,
}
