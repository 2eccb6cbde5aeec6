//! Node-graph representation of the rule book, consumed by the visual
//! rule-authoring surface. The graph is strictly layered: scope nodes own
//! constraint nodes, constraint nodes own condition nodes, edges point
//! parent to child.

pub mod convert;

pub use convert::{node_graph_to_rules, rules_to_node_graph};

use serde::{Deserialize, Serialize};

use crate::model::{Constraint, RuleCondition};

/// Sentinel `panelId` of the synthetic design-wide scope node. The global
/// scope is recognized by this value, not by a separate node kind.
pub const GLOBAL_SCOPE_ID: &str = "global";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodePosition {
    pub x: f64,
    pub y: f64,
}

/// Tier-specific payload of a graph node.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum NodePayload {
    /// One lane per panel referenced by a panel-scoped rule, plus the
    /// `"global"` sentinel lane when any global rule exists.
    Scope { panel_id: String, label: String },
    /// One node per `(rule, constraintIndex)` pair.
    Constraint {
        rule_id: String,
        rule_name: String,
        constraint: Constraint,
    },
    /// One node per `(rule, constraintIndex, conditionIndex)` pair. Every
    /// constraint node of a rule fans out to its own replica of the rule's
    /// conditions.
    Condition {
        rule_id: String,
        condition: RuleCondition,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub position: NodePosition,
    #[serde(flatten)]
    pub payload: NodePayload,
}

/// Directed edge, parent to child.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphEdge {
    pub id: String,
    pub source: String,
    pub target: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl RuleGraph {
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }
}
